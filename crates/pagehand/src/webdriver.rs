//! W3C WebDriver backend over fantoccini.
//!
//! [`FantocciniDriver`] adapts the async fantoccini client to the synchronous
//! [`WebDriver`] trait by driving every command to completion on a private
//! current-thread tokio runtime. Element handles carry the W3C element id, so
//! no element state is kept on this side of the wire.

use crate::capabilities::{build_capabilities, WINDOW_SIZE};
use crate::config::EngineConfig;
use crate::driver::{
    Cookie, ElementHandle, ElementRect, FrameTarget, ScriptArg, WebDriver, WindowHandle,
    WindowKind,
};
use crate::input::{ActionSequence, InputAction, PointerOrigin};
use crate::locator::{Locator, W3cQuery};
use crate::result::{PagehandError, PagehandResult};
use fantoccini::actions::{
    Actions, InputSource, KeyAction, KeyActions, MouseActions, PointerAction,
};
use fantoccini::elements::{Element, ElementRef};
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// Duration of zero-length pause ticks used to align input sources
const TICK: Duration = Duration::ZERO;

/// WebDriver session backed by a chromedriver, geckodriver or remote grid
pub struct FantocciniDriver {
    runtime: Runtime,
    client: Client,
}

impl std::fmt::Debug for FantocciniDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FantocciniDriver").finish_non_exhaustive()
    }
}

impl FantocciniDriver {
    /// Start a browser session for `config`
    ///
    /// Connects to the remote grid when one is configured, otherwise to the
    /// local driver at `config.webdriver_url`. The window is sized to
    /// [`WINDOW_SIZE`] and the implicit wait applied.
    pub fn connect(config: &EngineConfig, session_name: &str) -> PagehandResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let url = config
            .remote
            .as_ref()
            .map_or_else(|| config.webdriver_url.clone(), |r| r.url.clone());
        let capabilities = build_capabilities(config, session_name);

        let client = runtime.block_on(async {
            ClientBuilder::rustls()
                .map_err(|e| PagehandError::driver(format!("TLS setup failed: {e}")))?
                .capabilities(capabilities)
                .connect(&url)
                .await
                .map_err(|e| PagehandError::driver(format!("Failed to connect to {url}: {e}")))
        })?;

        let driver = Self { runtime, client };
        driver.call("set_window_size", |c| async move {
            c.set_window_size(WINDOW_SIZE.0, WINDOW_SIZE.1).await
        })?;
        let implicit = config.implicit_wait;
        driver.call("update_timeouts", |c| async move {
            c.update_timeouts(TimeoutConfiguration::new(None, None, Some(implicit)))
                .await
        })?;
        info!(browser = %config.browser, url = %url, headless = config.headless, "browser session started");
        Ok(driver)
    }

    /// End the browser session
    pub fn quit(self) -> PagehandResult<()> {
        let Self { runtime, client } = self;
        runtime
            .block_on(client.close())
            .map_err(|e| map_cmd_error(e, "quit"))?;
        debug!("browser session closed");
        Ok(())
    }

    fn call<T, F, Fut>(&self, subject: &str, command: F) -> PagehandResult<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T, CmdError>>,
    {
        self.runtime
            .block_on(command(self.client.clone()))
            .map_err(|e| map_cmd_error(e, subject))
    }

    fn element(&self, handle: &ElementHandle) -> Element {
        Element::from_element_id(self.client.clone(), ElementRef::from(handle.id().to_string()))
    }

    fn script_arg(&self, arg: &ScriptArg) -> PagehandResult<Value> {
        match arg {
            ScriptArg::Element(handle) => Ok(serde_json::to_value(self.element(handle))?),
            ScriptArg::Value(value) => Ok(value.clone()),
        }
    }
}

fn handle_of(element: &Element) -> ElementHandle {
    ElementHandle::new(element.element_id().to_string())
}

fn map_cmd_error(err: CmdError, subject: &str) -> PagehandError {
    match err {
        CmdError::Standard(wd) => {
            let message = wd.message.to_string();
            match wd.error {
                ErrorStatus::StaleElementReference => PagehandError::StaleElement {
                    element: subject.to_string(),
                },
                ErrorStatus::NoSuchElement => PagehandError::NoSuchElement {
                    target: subject.to_string(),
                },
                ErrorStatus::ElementNotInteractable | ErrorStatus::ElementClickIntercepted => {
                    PagehandError::NotInteractable {
                        target: subject.to_string(),
                        reason: message,
                    }
                }
                ErrorStatus::NoSuchWindow => PagehandError::NoSuchWindow {
                    handle: subject.to_string(),
                },
                ErrorStatus::NoSuchFrame => PagehandError::NoSuchFrame {
                    frame: subject.to_string(),
                },
                ErrorStatus::NoSuchAlert => PagehandError::NoSuchAlert,
                ErrorStatus::JavascriptError => PagehandError::Script { message },
                ErrorStatus::InvalidSelector => PagehandError::InvalidSelector { message },
                other => PagehandError::driver(format!("{subject}: {other:?}: {message}")),
            }
        }
        other => PagehandError::driver(format!("{subject}: {other}")),
    }
}

fn pointer_step(driver: &FantocciniDriver, step: &InputAction) -> PointerAction {
    match step {
        InputAction::PointerMove {
            origin: PointerOrigin::Element(handle),
            x,
            y,
        } => PointerAction::MoveToElement {
            element: driver.element(handle),
            duration: None,
            x: *x as _,
            y: *y as _,
        },
        InputAction::PointerMove {
            origin: PointerOrigin::Viewport,
            x,
            y,
        } => PointerAction::MoveTo {
            duration: None,
            x: *x as _,
            y: *y as _,
        },
        InputAction::PointerDown(button) => PointerAction::Down {
            button: button.code(),
        },
        InputAction::PointerUp(button) => PointerAction::Up {
            button: button.code(),
        },
        InputAction::Pause(duration) => PointerAction::Pause {
            duration: *duration,
        },
        InputAction::KeyDown(_) | InputAction::KeyUp(_) => PointerAction::Pause { duration: TICK },
    }
}

fn key_step(step: &InputAction) -> KeyAction {
    match step {
        InputAction::KeyDown(key) => KeyAction::Down {
            value: key.code_point(),
        },
        InputAction::KeyUp(key) => KeyAction::Up {
            value: key.code_point(),
        },
        InputAction::Pause(duration) => KeyAction::Pause {
            duration: *duration,
        },
        _ => KeyAction::Pause { duration: TICK },
    }
}

impl WebDriver for FantocciniDriver {
    fn name(&self) -> &str {
        "fantoccini"
    }

    fn find_elements(&mut self, locator: &Locator) -> PagehandResult<Vec<ElementHandle>> {
        let query = locator.selector().to_w3c();
        let subject = locator.to_string();
        let found = self.call(&subject, |c| async move {
            match &query {
                W3cQuery::Css(css) => c.find_all(fantoccini::Locator::Css(css)).await,
                W3cQuery::XPath(xpath) => c.find_all(fantoccini::Locator::XPath(xpath)).await,
                W3cQuery::LinkText(text) => c.find_all(fantoccini::Locator::LinkText(text)).await,
            }
        })?;
        Ok(found.iter().map(handle_of).collect())
    }

    fn find_child_elements(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> PagehandResult<Vec<ElementHandle>> {
        let query = locator.selector().to_w3c();
        let parent = self.element(parent);
        let found = self.call(&locator.to_string(), |_| async move {
            match &query {
                W3cQuery::Css(css) => parent.find_all(fantoccini::Locator::Css(css)).await,
                W3cQuery::XPath(xpath) => parent.find_all(fantoccini::Locator::XPath(xpath)).await,
                W3cQuery::LinkText(text) => {
                    parent.find_all(fantoccini::Locator::LinkText(text)).await
                }
            }
        })?;
        Ok(found.iter().map(handle_of).collect())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> PagehandResult<bool> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.is_displayed().await })
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> PagehandResult<bool> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.is_enabled().await })
    }

    fn is_selected(&mut self, element: &ElementHandle) -> PagehandResult<bool> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.is_selected().await })
    }

    fn tag_name(&mut self, element: &ElementHandle) -> PagehandResult<String> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.tag_name().await })
    }

    fn text(&mut self, element: &ElementHandle) -> PagehandResult<String> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.text().await })
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> PagehandResult<Option<String>> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.attr(name).await })
    }

    fn property(&mut self, element: &ElementHandle, name: &str) -> PagehandResult<Option<String>> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.prop(name).await })
    }

    fn rect(&mut self, element: &ElementHandle) -> PagehandResult<ElementRect> {
        let el = self.element(element);
        let (x, y, width, height) =
            self.call(element.id(), |_| async move { el.rectangle().await })?;
        Ok(ElementRect::new(x, y, width, height))
    }

    fn click(&mut self, element: &ElementHandle) -> PagehandResult<()> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.click().await })
    }

    fn clear(&mut self, element: &ElementHandle) -> PagehandResult<()> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.clear().await })
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> PagehandResult<()> {
        let el = self.element(element);
        self.call(element.id(), |_| async move { el.send_keys(text).await })
    }

    fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> PagehandResult<Value> {
        let args = args
            .iter()
            .map(|a| self.script_arg(a))
            .collect::<PagehandResult<Vec<_>>>()?;
        self.call("script", |c| async move { c.execute(script, args).await })
    }

    fn execute_async_script(&mut self, script: &str, args: &[ScriptArg]) -> PagehandResult<Value> {
        let args = args
            .iter()
            .map(|a| self.script_arg(a))
            .collect::<PagehandResult<Vec<_>>>()?;
        self.call("async script", |c| async move { c.execute_async(script, args).await })
    }

    fn perform_actions(&mut self, actions: &ActionSequence) -> PagehandResult<()> {
        let mut pointer = MouseActions::new("pointer".to_string());
        let mut keys = KeyActions::new("keyboard".to_string());
        for step in actions.steps() {
            pointer = pointer.then(pointer_step(self, step));
            keys = keys.then(key_step(step));
        }
        let sequence = Actions::from(pointer).and(keys);
        self.call("actions", |c| async move {
            c.perform_actions(sequence).await?;
            c.release_actions().await
        })
    }

    fn window_handles(&mut self) -> PagehandResult<Vec<WindowHandle>> {
        let handles = self.call("windows", |c| async move { c.windows().await })?;
        Ok(handles
            .into_iter()
            .map(|h| WindowHandle::new(String::from(h)))
            .collect())
    }

    fn current_window(&mut self) -> PagehandResult<WindowHandle> {
        let handle = self.call("window", |c| async move { c.window().await })?;
        Ok(WindowHandle::new(String::from(handle)))
    }

    fn switch_to_window(&mut self, handle: &WindowHandle) -> PagehandResult<()> {
        let target = fantoccini::wd::WindowHandle::try_from(handle.as_str().to_string())
            .map_err(|_| PagehandError::NoSuchWindow {
                handle: handle.to_string(),
            })?;
        self.call(handle.as_str(), |c| async move {
            c.switch_to_window(target).await
        })
    }

    fn close_window(&mut self) -> PagehandResult<Vec<WindowHandle>> {
        let current = self.current_window()?;
        let remaining: Vec<WindowHandle> = self
            .window_handles()?
            .into_iter()
            .filter(|h| h != &current)
            .collect();
        self.call("close_window", |c| async move { c.close_window().await })?;
        // Closing the last window ends the session, so there is nothing left to ask.
        if remaining.is_empty() {
            debug!("closed the last window, session ended");
            return Ok(remaining);
        }
        self.window_handles()
    }

    fn new_window(&mut self, kind: WindowKind) -> PagehandResult<WindowHandle> {
        let as_tab = kind == WindowKind::Tab;
        let created = self.call("new_window", |c| async move { c.new_window(as_tab).await })?;
        Ok(WindowHandle::new(String::from(created.handle)))
    }

    fn switch_to_frame(&mut self, target: &FrameTarget) -> PagehandResult<()> {
        match target {
            FrameTarget::Index(index) => {
                let index = *index;
                self.call(&format!("frame[{index}]"), |c| async move {
                    c.enter_frame(Some(index)).await
                })
            }
            FrameTarget::Element(handle) => {
                let el = self.element(handle);
                self.call(handle.id(), |_| async move { el.enter_frame().await })
            }
        }
    }

    fn switch_to_parent_frame(&mut self) -> PagehandResult<()> {
        self.call("parent frame", |c| async move {
            c.enter_parent_frame().await
        })
    }

    fn switch_to_default_content(&mut self) -> PagehandResult<()> {
        self.call("default content", |c| async move {
            c.enter_frame(None).await
        })
    }

    fn alert_text(&mut self) -> PagehandResult<String> {
        self.call("alert", |c| async move { c.get_alert_text().await })
    }

    fn accept_alert(&mut self) -> PagehandResult<()> {
        self.call("alert", |c| async move { c.accept_alert().await })
    }

    fn dismiss_alert(&mut self) -> PagehandResult<()> {
        self.call("alert", |c| async move { c.dismiss_alert().await })
    }

    fn send_alert_text(&mut self, text: &str) -> PagehandResult<()> {
        self.call("alert", |c| async move { c.send_alert_text(text).await })
    }

    fn goto(&mut self, url: &str) -> PagehandResult<()> {
        self.call(url, |c| async move { c.goto(url).await })
    }

    fn refresh(&mut self) -> PagehandResult<()> {
        self.call("refresh", |c| async move { c.refresh().await })
    }

    fn back(&mut self) -> PagehandResult<()> {
        self.call("back", |c| async move { c.back().await })
    }

    fn forward(&mut self) -> PagehandResult<()> {
        self.call("forward", |c| async move { c.forward().await })
    }

    fn current_url(&mut self) -> PagehandResult<String> {
        let url = self.call("current_url", |c| async move { c.current_url().await })?;
        Ok(url.to_string())
    }

    fn title(&mut self) -> PagehandResult<String> {
        self.call("title", |c| async move { c.title().await })
    }

    fn cookies(&mut self) -> PagehandResult<Vec<Cookie>> {
        let jar = self.call("cookies", |c| async move { c.get_all_cookies().await })?;
        Ok(jar
            .iter()
            .map(|c| Cookie {
                name: c.name().to_string(),
                value: c.value().to_string(),
                domain: c.domain().map(str::to_string),
                path: c.path().map(str::to_string),
                secure: c.secure().unwrap_or(false),
                http_only: c.http_only().unwrap_or(false),
            })
            .collect())
    }

    fn add_cookie(&mut self, cookie: &Cookie) -> PagehandResult<()> {
        let mut wire = fantoccini::cookies::Cookie::new(cookie.name.clone(), cookie.value.clone());
        if let Some(domain) = &cookie.domain {
            wire.set_domain(domain.clone());
        }
        if let Some(path) = &cookie.path {
            wire.set_path(path.clone());
        }
        wire.set_secure(cookie.secure);
        wire.set_http_only(cookie.http_only);
        self.call(&cookie.name, |c| async move { c.add_cookie(wire).await })
    }

    fn delete_cookie(&mut self, name: &str) -> PagehandResult<()> {
        self.call(name, |c| async move { c.delete_cookie(name).await })
    }

    fn delete_all_cookies(&mut self) -> PagehandResult<()> {
        self.call("cookies", |c| async move { c.delete_all_cookies().await })
    }

    fn screenshot(&mut self) -> PagehandResult<Vec<u8>> {
        self.runtime
            .block_on(self.client.screenshot())
            .map_err(|e| PagehandError::Screenshot {
                message: e.to_string(),
            })
    }
}
