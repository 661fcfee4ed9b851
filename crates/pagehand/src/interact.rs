//! Element Action Engine
//!
//! Element operations on a [`Session`]. Every operation resolves its element
//! through the condition evaluator, and single-element operations run under
//! the stale-element retry policy so each attempt re-resolves. Failures are
//! logged and captured by the diagnostics hook before they propagate.
//!
//! Operations that wait take `timeout: Option<Duration>`; `None` means the
//! configured explicit wait.
//!
//! ## Click with fallback
//!
//! A native click that the browser rejects as not interactable (covered,
//! off-screen, still animating) is retried once as a script click against a
//! freshly resolved element. Only a failing script click escalates.
//!
//! ## Reads
//!
//! [`Session::get_text`] raises on failure while
//! [`Session::get_attribute`] returns `None`; both capture a screenshot.
//!
//! ## Quick checks
//!
//! `is_present`, `is_visible` and `is_invisible` answer within the short
//! quick-check timeout and never fail.

use crate::diagnostics::FailureCategory;
use crate::driver::{ElementHandle, ElementRect, ScriptArg, WebDriver};
use crate::input::ActionSequence;
use crate::keys::Key;
use crate::locator::Locator;
use crate::logging::loggable;
use crate::result::{PagehandError, PagehandResult};
use crate::session::{timeout_or, Session};
use crate::wait::Condition;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const CLICK_SCRIPT: &str = "arguments[0].click();";
const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView(arguments[1]);";
const VIEWPORT_SCRIPT: &str =
    "return [window.pageXOffset, window.pageYOffset, window.innerWidth, window.innerHeight];";
const SCROLL_BY_SCRIPT: &str = "window.scrollBy(0, arguments[0]);";
const SCROLL_TO_SCRIPT: &str = "window.scrollTo(0, arguments[0]);";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

// =============================================================================
// TYPES
// =============================================================================

/// How to pick a dropdown option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectBy {
    /// By `value` attribute
    Value(String),
    /// By visible text
    Text(String),
    /// By position among the options
    Index(usize),
}

impl SelectBy {
    /// Parse a selection mode name (`value`, `text`/`visible_text`, `index`)
    ///
    /// # Errors
    ///
    /// [`PagehandError::InvalidSelector`] for an unknown mode or a
    /// non-numeric index.
    pub fn parse(mode: &str, argument: &str) -> PagehandResult<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(Self::Value(argument.to_string())),
            "text" | "visible_text" => Ok(Self::Text(argument.to_string())),
            "index" => argument
                .trim()
                .parse()
                .map(Self::Index)
                .map_err(|_| PagehandError::InvalidSelector {
                    message: format!("option index must be a number, got {argument:?}"),
                }),
            other => Err(PagehandError::InvalidSelector {
                message: format!("unknown selection mode {other:?} (use value, text or index)"),
            }),
        }
    }
}

impl fmt::Display for SelectBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "value={v}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::Index(i) => write!(f, "index={i}"),
        }
    }
}

/// Text comparison for by-text scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextMatch {
    /// Trimmed text equals the target as given
    #[default]
    Exact,
    /// Text contains the target
    Contains,
}

impl TextMatch {
    /// Whether `text` matches `target`
    #[must_use]
    pub fn matches(self, text: &str, target: &str) -> bool {
        match self {
            Self::Exact => text.trim() == target,
            Self::Contains => text.contains(target),
        }
    }
}

/// Page scroll step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// One viewport up
    Up,
    /// One viewport down
    Down,
    /// To the top
    Top,
    /// To the bottom
    Bottom,
}

/// Rendered size of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementSize {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Top-left corner of an element, relative to the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementLocation {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
}

/// Scroll offset and size of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal scroll offset
    pub scroll_x: f64,
    /// Vertical scroll offset
    pub scroll_y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Viewport {
    fn from_json(value: &serde_json::Value) -> PagehandResult<Self> {
        let numbers: Vec<f64> = value
            .as_array()
            .map(|items| items.iter().filter_map(serde_json::Value::as_f64).collect())
            .unwrap_or_default();
        match numbers.as_slice() {
            [scroll_x, scroll_y, width, height] => Ok(Self {
                scroll_x: *scroll_x,
                scroll_y: *scroll_y,
                width: *width,
                height: *height,
            }),
            _ => Err(PagehandError::driver(format!("unexpected viewport value {value}"))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum KeyStroke {
    Press,
    Down,
    Up,
}

// =============================================================================
// ELEMENT OPERATIONS
// =============================================================================

impl<D: WebDriver> Session<D> {
    fn resolve(
        &mut self,
        condition: Condition,
        timeout: Option<Duration>,
    ) -> PagehandResult<ElementHandle> {
        self.wait(&condition, timeout)?.into_element()
    }

    /// First element matching `locator`, once attached
    ///
    /// `timeout` overrides the explicit wait for this call.
    ///
    /// # Errors
    ///
    /// [`PagehandError::Timeout`] if nothing matches in time.
    pub fn find(&mut self, locator: &Locator, timeout: Option<Duration>) -> PagehandResult<ElementHandle> {
        let _session = self.span.clone().entered();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::TimeoutException, FailureCategory::WaitException),
            |s| s.resolve(Condition::Present(locator.clone()), timeout),
        )
    }

    /// All elements matching `locator` in document order, once at least one is attached
    pub fn find_all(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> PagehandResult<Vec<ElementHandle>> {
        let _session = self.span.clone().entered();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::TimeoutException, FailureCategory::WaitException),
            |s| {
                s.wait(&Condition::AllPresent(locator.clone()), timeout)?
                    .into_elements()
            },
        )
    }

    /// Click once the element is clickable, falling back to a script click
    /// when the native click is rejected as not interactable
    pub fn click(&mut self, locator: &Locator, timeout: Option<Duration>) -> PagehandResult<()> {
        self.click_with(locator, timeout, true)
    }

    /// [`click`](Self::click) with the script fallback switched on or off
    ///
    /// Without the fallback a rejected native click fails straight away as
    /// [`PagehandError::NotInteractable`].
    pub fn click_with(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
        use_js_fallback: bool,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::ClickFailed, |s| {
            s.with_stale_retry("click", |s| {
                let element = s.resolve(Condition::Clickable(locator.clone()), timeout)?;
                if use_js_fallback {
                    s.activate(&element, Some(locator))
                } else {
                    s.driver.click(&element)?;
                    debug!(element = %element, "clicked");
                    Ok(())
                }
            })
        })
    }

    /// Native click with one script-click fallback
    ///
    /// With a locator the fallback re-resolves the element first; without
    /// one it targets `element` directly.
    fn activate(&mut self, element: &ElementHandle, locator: Option<&Locator>) -> PagehandResult<()> {
        let rejection = match self.driver.click(element) {
            Ok(()) => {
                debug!(element = %element, "clicked");
                return Ok(());
            }
            Err(err) if err.is_not_interactable() => err,
            Err(err) => return Err(err),
        };
        warn!(element = %element, error = %rejection, "native click rejected, trying script click");

        let target = match locator {
            Some(locator) => {
                let timeout = self.config.fallback_lookup_timeout;
                self.wait(&Condition::Present(locator.clone()), Some(timeout))?
                    .into_element()?
            }
            None => element.clone(),
        };
        match self
            .driver
            .execute_script(CLICK_SCRIPT, &[ScriptArg::Element(target.clone())])
        {
            Ok(_) => {
                info!(element = %target, "clicked via script");
                Ok(())
            }
            Err(err) if err.is_stale() => Err(err),
            Err(err) => Err(PagehandError::NotInteractable {
                target: locator.map_or_else(|| element.to_string(), ToString::to_string),
                reason: format!("{rejection}; script click failed: {err}"),
            }),
        }
    }

    /// Type into a visible element, clearing it first if asked
    pub fn input_text(
        &mut self,
        locator: &Locator,
        text: &str,
        clear: bool,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::InputTextFailed, |s| {
            s.with_stale_retry("input_text", |s| {
                let element = s.resolve(Condition::Visible(locator.clone()), timeout)?;
                if clear {
                    s.driver.clear(&element)?;
                }
                s.driver.send_keys(&element, text)?;
                debug!(locator = %locator, text = loggable(locator, text), "typed text");
                Ok(())
            })
        })
    }

    /// Rendered text of a visible element
    ///
    /// # Errors
    ///
    /// Any failure, after a `get_text_failed` screenshot.
    pub fn get_text(&mut self, locator: &Locator, timeout: Option<Duration>) -> PagehandResult<String> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::GetTextFailed, |s| {
            s.with_stale_retry("get_text", |s| {
                let element = s.resolve(Condition::Visible(locator.clone()), timeout)?;
                let text = s.driver.text(&element)?;
                debug!(locator = %locator, text = loggable(locator, &text), "read text");
                Ok(text)
            })
        })
    }

    /// Attribute of an attached element
    ///
    /// `None` when the attribute is unset and also when the read fails; a
    /// failure still captures a `get_attribute_failed` screenshot.
    pub fn get_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
        timeout: Option<Duration>,
    ) -> Option<String> {
        let _session = self.span.clone().entered();
        let result = self.guarded(FailureCategory::GetAttributeFailed, |s| {
            s.with_stale_retry("get_attribute", |s| {
                let element = s.resolve(Condition::Present(locator.clone()), timeout)?;
                s.driver.attribute(&element, name)
            })
        });
        result.unwrap_or_else(|err| {
            debug!(locator = %locator, attribute = name, error = %err, "attribute read failed");
            None
        })
    }

    // ========================================================================
    // Quick checks
    // ========================================================================

    fn quick(&mut self, condition: Condition) -> bool {
        let timeout = self.config.quick_check_timeout;
        self.quick_within(condition, timeout)
    }

    fn quick_within(&mut self, condition: Condition, timeout: Duration) -> bool {
        match self.wait(&condition, Some(timeout)) {
            Ok(outcome) => outcome.is_met(),
            Err(err) => {
                debug!(condition = %condition.kind(), target = %condition.target(), error = %err, "quick check negative");
                false
            }
        }
    }

    /// Whether an element is attached (short timeout, never fails)
    pub fn is_present(&mut self, locator: &Locator) -> bool {
        let _session = self.span.clone().entered();
        self.quick(Condition::Present(locator.clone()))
    }

    /// Whether an element is rendered (short timeout, never fails)
    pub fn is_visible(&mut self, locator: &Locator) -> bool {
        let _session = self.span.clone().entered();
        self.quick(Condition::Visible(locator.clone()))
    }

    /// [`is_visible`](Self::is_visible) with an explicit timeout
    pub fn is_visible_within(&mut self, locator: &Locator, timeout: Duration) -> bool {
        let _session = self.span.clone().entered();
        self.quick_within(Condition::Visible(locator.clone()), timeout)
    }

    /// Whether an element is absent or hidden (short timeout, never fails)
    pub fn is_invisible(&mut self, locator: &Locator) -> bool {
        let _session = self.span.clone().entered();
        self.quick(Condition::Invisible(locator.clone()))
    }

    fn element_state<F>(&mut self, locator: &Locator, state: &str, check: F) -> bool
    where
        F: Fn(&mut D, &ElementHandle) -> PagehandResult<bool>,
    {
        let timeout = self.config.quick_check_timeout;
        let result = self.with_stale_retry(state, |s| {
            let element = s
                .wait(&Condition::Present(locator.clone()), Some(timeout))?
                .into_element()?;
            check(&mut s.driver, &element)
        });
        result.unwrap_or_else(|err| {
            debug!(locator = %locator, state, error = %err, "state check negative");
            false
        })
    }

    /// Whether the element accepts input (false on any failure)
    pub fn is_enabled(&mut self, locator: &Locator) -> bool {
        let _session = self.span.clone().entered();
        self.element_state(locator, "is_enabled", |d, e| d.is_enabled(e))
    }

    /// Whether a checkbox, radio or option is selected (false on any failure)
    pub fn is_selected(&mut self, locator: &Locator) -> bool {
        let _session = self.span.clone().entered();
        self.element_state(locator, "is_selected", |d, e| d.is_selected(e))
    }

    // ========================================================================
    // Dropdowns
    // ========================================================================

    fn dropdown_options(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> PagehandResult<Vec<ElementHandle>> {
        let select = self.resolve(Condition::Visible(locator.clone()), timeout)?;
        let tag = self.driver.tag_name(&select)?;
        if tag != "select" {
            return Err(PagehandError::invalid_argument(format!(
                "{locator} is a <{tag}>, not a <select>"
            )));
        }
        self.driver
            .find_child_elements(&select, &Locator::tag_name("option"))
    }

    /// Select an option of a native `<select>`
    ///
    /// # Errors
    ///
    /// [`PagehandError::NotFound`] if no option matches,
    /// [`PagehandError::InvalidArgument`] if the element is not a `<select>`.
    pub fn select(
        &mut self,
        locator: &Locator,
        by: &SelectBy,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::DropdownSelectFailed, |s| {
            s.with_stale_retry("select", |s| {
                let options = s.dropdown_options(locator, timeout)?;
                let mut chosen = None;
                for (index, option) in options.iter().enumerate() {
                    let hit = match by {
                        SelectBy::Index(wanted) => index == *wanted,
                        SelectBy::Value(value) => {
                            s.driver.attribute(option, "value")?.as_deref() == Some(value.as_str())
                        }
                        SelectBy::Text(text) => s.driver.text(option)?.trim() == text.trim(),
                    };
                    if hit {
                        chosen = Some(option.clone());
                        break;
                    }
                }
                let option = chosen.ok_or_else(|| PagehandError::NotFound {
                    target: locator.to_string(),
                    text: by.to_string(),
                })?;
                if !s.driver.is_selected(&option)? {
                    s.driver.click(&option)?;
                }
                info!(locator = %locator, option = %by, "selected option");
                Ok(())
            })
        })
    }

    /// Text of the selected option (`None` on any failure)
    pub fn selected_option_text(&mut self, locator: &Locator, timeout: Option<Duration>) -> Option<String> {
        let _session = self.span.clone().entered();
        let result = self.with_stale_retry("selected_option_text", |s| {
            for option in s.dropdown_options(locator, timeout)? {
                if s.driver.is_selected(&option)? {
                    return Ok(Some(s.driver.text(&option)?.trim().to_string()));
                }
            }
            Ok(None)
        });
        result.unwrap_or_else(|err| {
            debug!(locator = %locator, error = %err, "selected option read failed");
            None
        })
    }

    /// Texts of all options (empty on any failure)
    pub fn option_texts(&mut self, locator: &Locator, timeout: Option<Duration>) -> Vec<String> {
        let _session = self.span.clone().entered();
        let result = self.with_stale_retry("option_texts", |s| {
            let mut texts = Vec::new();
            for option in s.dropdown_options(locator, timeout)? {
                texts.push(s.driver.text(&option)?.trim().to_string());
            }
            Ok(texts)
        });
        result.unwrap_or_else(|err| {
            debug!(locator = %locator, error = %err, "option read failed");
            Vec::new()
        })
    }

    // ========================================================================
    // Pointer actions
    // ========================================================================

    fn pointer_action<F>(
        &mut self,
        category: FailureCategory,
        operation: &str,
        condition: fn(Locator) -> Condition,
        locator: &Locator,
        timeout: Option<Duration>,
        build: F,
    ) -> PagehandResult<()>
    where
        F: Fn(&ElementHandle) -> ActionSequence,
    {
        self.guarded(category, |s| {
            s.with_stale_retry(operation, |s| {
                let element = s.resolve(condition(locator.clone()), timeout)?;
                s.driver.perform_actions(&build(&element))?;
                debug!(locator = %locator, operation, "pointer action performed");
                Ok(())
            })
        })
    }

    /// Move the pointer over a visible element
    pub fn hover(&mut self, locator: &Locator, timeout: Option<Duration>) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.pointer_action(
            FailureCategory::HoverFailed,
            "hover",
            Condition::Visible,
            locator,
            timeout,
            ActionSequence::hover,
        )
    }

    /// Double-click a clickable element
    pub fn double_click(&mut self, locator: &Locator, timeout: Option<Duration>) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.pointer_action(
            FailureCategory::DoubleClickFailed,
            "double_click",
            Condition::Clickable,
            locator,
            timeout,
            ActionSequence::double_click,
        )
    }

    /// Context-click a clickable element
    pub fn right_click(&mut self, locator: &Locator, timeout: Option<Duration>) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.pointer_action(
            FailureCategory::RightClickFailed,
            "right_click",
            Condition::Clickable,
            locator,
            timeout,
            ActionSequence::context_click,
        )
    }

    /// Drag `source` onto `target`; both must be visible
    pub fn drag_and_drop(
        &mut self,
        source: &Locator,
        target: &Locator,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::DragDropFailed, |s| {
            s.with_stale_retry("drag_and_drop", |s| {
                let from = s.resolve(Condition::Visible(source.clone()), timeout)?;
                let to = s.resolve(Condition::Visible(target.clone()), timeout)?;
                s.driver
                    .perform_actions(&ActionSequence::drag_and_drop(&from, &to))?;
                info!(source = %source, target = %target, "dragged and dropped");
                Ok(())
            })
        })
    }

    // ========================================================================
    // Keys
    // ========================================================================

    /// Press a key by name, globally or on a visible `target`
    ///
    /// # Errors
    ///
    /// [`PagehandError::InvalidKey`] for an unknown name (no retry, no
    /// screenshot).
    pub fn press_key(
        &mut self,
        name: &str,
        target: Option<&Locator>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let key = Key::from_name(name)?;
        self.press(key, target, timeout)
    }

    /// Press a key, globally or on a visible `target`
    pub fn press(
        &mut self,
        key: Key,
        target: Option<&Locator>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.stroke(KeyStroke::Press, key, target, timeout)
    }

    /// Hold a key down by name
    pub fn key_down(
        &mut self,
        name: &str,
        target: Option<&Locator>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let key = Key::from_name(name)?;
        let _session = self.span.clone().entered();
        self.stroke(KeyStroke::Down, key, target, timeout)
    }

    /// Release a held key by name
    pub fn key_up(
        &mut self,
        name: &str,
        target: Option<&Locator>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let key = Key::from_name(name)?;
        let _session = self.span.clone().entered();
        self.stroke(KeyStroke::Up, key, target, timeout)
    }

    fn stroke(
        &mut self,
        stroke: KeyStroke,
        key: Key,
        target: Option<&Locator>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        self.guarded(FailureCategory::KeyPressFailed, |s| {
            s.with_stale_retry("press_key", |s| {
                let element = match target {
                    Some(locator) => Some(s.resolve(Condition::Visible(locator.clone()), timeout)?),
                    None => None,
                };
                let actions = match stroke {
                    KeyStroke::Press => ActionSequence::key_press(key, element.as_ref()),
                    KeyStroke::Down => ActionSequence::key_down(key, element.as_ref()),
                    KeyStroke::Up => ActionSequence::key_up(key, element.as_ref()),
                };
                s.driver.perform_actions(&actions)?;
                debug!(key = %key, stroke = ?stroke, target = ?target.map(ToString::to_string), "key dispatched");
                Ok(())
            })
        })
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Current scroll offset and viewport size
    pub fn viewport(&mut self) -> PagehandResult<Viewport> {
        let _session = self.span.clone().entered();
        let value = self.driver.execute_script(VIEWPORT_SCRIPT, &[])?;
        Viewport::from_json(&value)
    }

    /// Scroll an element into view (best-effort)
    ///
    /// `align_to_top` puts the element at the top of the viewport, otherwise
    /// at the bottom. Logs which way the page had to move; failures are
    /// logged, never raised.
    pub fn scroll_to_element(
        &mut self,
        locator: &Locator,
        align_to_top: bool,
        timeout: Option<Duration>,
    ) {
        let _session = self.span.clone().entered();
        if let Err(err) = self.scroll_into_view(locator, align_to_top, timeout) {
            warn!(locator = %locator, error = %err, "scroll to element failed");
        }
    }

    fn scroll_into_view(
        &mut self,
        locator: &Locator,
        align_to_top: bool,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let element = self.resolve(Condition::Present(locator.clone()), timeout)?;
        let rect = self.driver.rect(&element)?;
        let view = self.viewport()?;
        let direction = if rect.y < view.scroll_y {
            "up"
        } else if rect.y + rect.height > view.scroll_y + view.height {
            "down"
        } else {
            "none (already in view)"
        };
        info!(locator = %locator, element_y = rect.y, scroll_y = view.scroll_y, direction, align_to_top, "scrolling to element");
        self.driver.execute_script(
            SCROLL_INTO_VIEW_SCRIPT,
            &[ScriptArg::Element(element), ScriptArg::Value(json!(align_to_top))],
        )?;
        Ok(())
    }

    /// Scroll the page up or down by `pixels` (one viewport when `None`),
    /// or to either end
    pub fn scroll_page(&mut self, direction: ScrollDirection, pixels: Option<f64>) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::ScrollFailed, |s| {
            match direction {
                ScrollDirection::Up | ScrollDirection::Down => {
                    let step = match pixels {
                        Some(pixels) => pixels.abs(),
                        None => s.viewport()?.height,
                    };
                    let delta = if direction == ScrollDirection::Up { -step } else { step };
                    s.driver
                        .execute_script(SCROLL_BY_SCRIPT, &[ScriptArg::Value(json!(delta))])?;
                }
                ScrollDirection::Top => {
                    s.driver
                        .execute_script(SCROLL_TO_SCRIPT, &[ScriptArg::Value(json!(0))])?;
                }
                ScrollDirection::Bottom => {
                    s.driver.execute_script(SCROLL_TO_BOTTOM_SCRIPT, &[])?;
                }
            }
            debug!(direction = ?direction, pixels = ?pixels, "scrolled page");
            Ok(())
        })
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    fn visible_rect(&mut self, locator: &Locator, timeout: Option<Duration>) -> Option<ElementRect> {
        let result = self.with_stale_retry("element_rect", |s| {
            let element = s.resolve(Condition::Visible(locator.clone()), timeout)?;
            s.driver.rect(&element)
        });
        result.map_or_else(
            |err| {
                debug!(locator = %locator, error = %err, "element geometry read failed");
                None
            },
            Some,
        )
    }

    /// Size of a visible element (`None` on any failure)
    pub fn element_size(&mut self, locator: &Locator, timeout: Option<Duration>) -> Option<ElementSize> {
        let _session = self.span.clone().entered();
        let rect = self.visible_rect(locator, timeout)?;
        let size = ElementSize {
            width: rect.width,
            height: rect.height,
        };
        debug!(locator = %locator, width = size.width, height = size.height, "element size");
        Some(size)
    }

    /// Page position of a visible element (`None` on any failure)
    pub fn element_location(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Option<ElementLocation> {
        let _session = self.span.clone().entered();
        let rect = self.visible_rect(locator, timeout)?;
        let location = ElementLocation { x: rect.x, y: rect.y };
        debug!(locator = %locator, x = location.x, y = location.y, "element location");
        Some(location)
    }

    // ========================================================================
    // By-text scan
    // ========================================================================

    /// Rendered text, else `innerText`, else `value` (first non-empty wins)
    fn effective_text(&mut self, element: &ElementHandle) -> PagehandResult<String> {
        let text = self.driver.text(element)?;
        if !text.trim().is_empty() {
            return Ok(text.trim().to_string());
        }
        if let Some(inner) = self.driver.property(element, "innerText")? {
            if !inner.trim().is_empty() {
                return Ok(inner.trim().to_string());
            }
        }
        Ok(self
            .driver
            .attribute(element, "value")?
            .map(|v| v.trim().to_string())
            .unwrap_or_default())
    }

    fn candidates(
        &mut self,
        locator: &Locator,
        text: &str,
        timeout: Option<Duration>,
    ) -> PagehandResult<Vec<ElementHandle>> {
        match self.wait(&Condition::AllPresent(locator.clone()), timeout) {
            Ok(found) => found.into_elements(),
            Err(err) if err.is_timeout() => Err(PagehandError::NotFound {
                target: locator.to_string(),
                text: text.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    fn text_matches(&mut self, element: &ElementHandle, text: &str, mode: TextMatch) -> bool {
        match self.effective_text(element) {
            Ok(actual) => mode.matches(&actual, text),
            Err(err) => {
                debug!(element = %element, error = %err, "skipping candidate");
                false
            }
        }
    }

    /// First element matching `locator` whose effective text matches `text`
    ///
    /// Candidates are scanned in document order; stale or unreadable ones are
    /// skipped.
    ///
    /// # Errors
    ///
    /// [`PagehandError::NotFound`] if no candidate matches.
    pub fn find_by_text(
        &mut self,
        locator: &Locator,
        text: &str,
        mode: TextMatch,
        timeout: Option<Duration>,
    ) -> PagehandResult<ElementHandle> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::ClickByTextFailed, |s| {
            for element in s.candidates(locator, text, timeout)? {
                if s.text_matches(&element, text, mode) {
                    return Ok(element);
                }
            }
            Err(PagehandError::NotFound {
                target: locator.to_string(),
                text: text.to_string(),
            })
        })
    }

    /// Click the first element matching `locator` whose effective text
    /// matches `text`
    ///
    /// A candidate whose click fails is logged and the scan moves on.
    pub fn click_by_text(
        &mut self,
        locator: &Locator,
        text: &str,
        mode: TextMatch,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::ClickByTextFailed, |s| {
            let candidates = s.candidates(locator, text, timeout)?;
            let total = candidates.len();
            for (index, element) in candidates.into_iter().enumerate() {
                if !s.text_matches(&element, text, mode) {
                    continue;
                }
                match s.activate(&element, None) {
                    Ok(()) => {
                        info!(locator = %locator, text, index, total, "clicked by text");
                        return Ok(());
                    }
                    Err(err) => {
                        warn!(element = %element, error = %err, "matching candidate not clickable, continuing");
                    }
                }
            }
            Err(PagehandError::NotFound {
                target: locator.to_string(),
                text: text.to_string(),
            })
        })
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Type an absolute, existing file path into a file input
    ///
    /// # Errors
    ///
    /// [`PagehandError::InvalidArgument`] if the path is relative or missing.
    pub fn upload_file(
        &mut self,
        locator: &Locator,
        path: impl AsRef<Path>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        let path = path.as_ref();
        self.guarded(FailureCategory::UploadFileFailed, |s| {
            if !path.is_absolute() {
                return Err(PagehandError::invalid_argument(format!(
                    "upload path must be absolute: {}",
                    path.display()
                )));
            }
            if !path.exists() {
                return Err(PagehandError::invalid_argument(format!(
                    "upload file does not exist: {}",
                    path.display()
                )));
            }
            let value = path.display().to_string();
            s.with_stale_retry("upload_file", |s| {
                let element = s.resolve(Condition::Present(locator.clone()), timeout)?;
                s.driver.send_keys(&element, &value)
            })?;
            info!(locator = %locator, file = %value, "file uploaded");
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FakeClock};
    use crate::config::EngineConfig;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn session(mock: MockDriver) -> Session<MockDriver> {
        Session::with_clock(
            mock,
            EngineConfig::default().without_screenshots(),
            FakeClock::shared(),
        )
    }

    fn session_with_clock(mock: MockDriver) -> (Session<MockDriver>, Arc<FakeClock>) {
        let clock = FakeClock::shared();
        let s = Session::with_clock(
            mock,
            EngineConfig::default().without_screenshots(),
            clock.clone(),
        );
        (s, clock)
    }

    mod select_by_tests {
        use super::*;

        #[test]
        fn test_parse_modes() {
            assert_eq!(SelectBy::parse("value", "de").unwrap(), SelectBy::Value("de".into()));
            assert_eq!(
                SelectBy::parse("Visible_Text", "Germany").unwrap(),
                SelectBy::Text("Germany".into())
            );
            assert_eq!(SelectBy::parse("index", " 2 ").unwrap(), SelectBy::Index(2));
        }

        #[test]
        fn test_parse_rejects_bad_mode_and_index() {
            assert!(matches!(
                SelectBy::parse("label", "x"),
                Err(PagehandError::InvalidSelector { .. })
            ));
            assert!(matches!(
                SelectBy::parse("index", "two"),
                Err(PagehandError::InvalidSelector { .. })
            ));
        }

        #[test]
        fn test_text_match() {
            assert!(TextMatch::Exact.matches("  Mr. ", "Mr."));
            assert!(!TextMatch::Exact.matches("Mrs.", "Mr."));
            assert!(!TextMatch::Exact.matches("Mr.", " Mr."));
            assert!(TextMatch::Contains.matches("Mrs.", "Mr"));
        }
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_native_click() {
            let mut mock = MockDriver::new();
            let el = mock.add(Locator::id("go"), MockElement::button("Go"));
            let mut s = session(mock);
            s.click(&Locator::id("go"), None).unwrap();
            assert_eq!(s.driver().clicks()[0].element, el);
            assert_eq!(s.driver().script_clicks(), 0);
        }

        #[test]
        fn test_click_waits_until_enabled() {
            let mut mock = MockDriver::new();
            let el = mock.add(Locator::id("go"), MockElement::button("Go").appears_after(2));
            let (mut s, clock) = session_with_clock(mock);
            s.click(&Locator::id("go"), None).unwrap();
            assert_eq!(s.driver().clicks()[0].element, el);
            assert_eq!(clock.now(), Duration::from_millis(1_000));
        }

        #[test]
        fn test_explicit_timeout_overrides_default() {
            let (mut s, clock) = session_with_clock(MockDriver::new());
            let err = s
                .find(&Locator::id("never"), Some(Duration::from_secs(2)))
                .unwrap_err();
            assert!(err.is_timeout());
            assert_eq!(clock.now(), Duration::from_secs(2));

            assert!(s
                .click(&Locator::id("never"), Some(Duration::from_secs(1)))
                .unwrap_err()
                .is_timeout());
            assert_eq!(clock.now(), Duration::from_secs(3));
        }

        #[test]
        fn test_click_without_fallback_fails_on_rejection() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("covered"), MockElement::button("Go").not_interactable(1));
            let mut s = session(mock);
            let err = s
                .click_with(&Locator::id("covered"), None, false)
                .unwrap_err();
            assert!(err.is_not_interactable());
            assert!(!s.driver().was_called("execute_script"));
            assert!(s.driver().clicks().is_empty());
        }

        #[test]
        fn test_both_tiers_failing_is_not_interactable() {
            let mut mock = MockDriver::new();
            mock.add(
                Locator::id("covered"),
                MockElement::button("Go").not_interactable(5).script_click_fails(),
            );
            let mut s = session(mock);
            let err = s.click(&Locator::id("covered"), None).unwrap_err();
            assert!(err.is_not_interactable());
            assert_eq!(s.driver().call_count("execute_script"), 1);
        }
    }

    mod read_tests {
        use super::*;

        #[test]
        fn test_get_text() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("greeting"), MockElement::new("h1").with_text("Hello"));
            assert_eq!(session(mock).get_text(&Locator::id("greeting"), None).unwrap(), "Hello");
        }

        #[test]
        fn test_get_text_raises_but_attribute_returns_none() {
            let mut s = session(MockDriver::new());
            s.config.explicit_wait = Duration::from_secs(1);
            assert!(s.get_text(&Locator::id("missing"), None).unwrap_err().is_timeout());
            assert_eq!(s.get_attribute(&Locator::id("missing"), "href", None), None);
        }

        #[test]
        fn test_get_text_honours_call_timeout() {
            let (mut s, clock) = session_with_clock(MockDriver::new());
            let err = s
                .get_text(&Locator::id("missing"), Some(Duration::from_millis(1_500)))
                .unwrap_err();
            assert!(err.is_timeout());
            assert_eq!(clock.now(), Duration::from_millis(1_500));
        }

        #[test]
        fn test_get_attribute_unset_is_none() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("link"), MockElement::new("a").with_attribute("href", "/home"));
            let mut s = session(mock);
            assert_eq!(s.get_attribute(&Locator::id("link"), "href", None).as_deref(), Some("/home"));
            assert_eq!(s.get_attribute(&Locator::id("link"), "target", None), None);
        }

        #[test]
        fn test_input_text_clears_first() {
            let mut mock = MockDriver::new();
            let el = mock.add(
                Locator::id("email"),
                MockElement::input().with_attribute("value", "old@example.com"),
            );
            let mut s = session(mock);
            s.input_text(&Locator::id("email"), "new@example.com", true, None).unwrap();
            assert_eq!(s.driver().value_of(&el), Some("new@example.com"));
            s.input_text(&Locator::id("email"), ".uk", false, None).unwrap();
            assert_eq!(s.driver().value_of(&el), Some("new@example.com.uk"));
        }
    }

    mod quick_check_tests {
        use super::*;

        #[test]
        fn test_quick_checks_use_short_timeout() {
            let (mut s, clock) = session_with_clock(MockDriver::new());
            assert!(!s.is_present(&Locator::id("ghost")));
            assert_eq!(clock.now(), Duration::from_secs(1));
            assert!(s.is_invisible(&Locator::id("ghost")));
        }

        #[test]
        fn test_state_checks() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("terms"), MockElement::new("input").selected());
            mock.add(Locator::id("submit"), MockElement::button("Send").disabled());
            let mut s = session(mock);
            assert!(s.is_selected(&Locator::id("terms")));
            assert!(!s.is_enabled(&Locator::id("submit")));
            assert!(!s.is_enabled(&Locator::id("absent")));
            assert!(s.is_visible_within(&Locator::id("terms"), Duration::from_millis(10)));
        }
    }

    mod dropdown_tests {
        use super::*;

        fn country_select() -> (MockDriver, Vec<ElementHandle>) {
            let mut mock = MockDriver::new();
            let select = mock.add(Locator::id("country"), MockElement::new("select"));
            let options = vec![
                mock.add_child(&select, None, MockElement::option("de", "Germany").selected()),
                mock.add_child(&select, None, MockElement::option("fr", "France")),
                mock.add_child(&select, None, MockElement::option("it", "Italy")),
            ];
            (mock, options)
        }

        #[test]
        fn test_select_by_each_mode() {
            let (mock, options) = country_select();
            let mut s = session(mock);
            let country = Locator::id("country");

            s.select(&country, &SelectBy::Value("fr".into()), None).unwrap();
            assert!(s.driver().element(&options[1]).unwrap().selected);
            assert!(!s.driver().element(&options[0]).unwrap().selected);

            s.select(&country, &SelectBy::Text("Italy".into()), None).unwrap();
            assert_eq!(s.selected_option_text(&country, None).as_deref(), Some("Italy"));

            s.select(&country, &SelectBy::Index(0), None).unwrap();
            assert_eq!(s.selected_option_text(&country, None).as_deref(), Some("Germany"));
            assert_eq!(s.option_texts(&country, None), vec!["Germany", "France", "Italy"]);
        }

        #[test]
        fn test_already_selected_is_not_clicked() {
            let (mock, _) = country_select();
            let mut s = session(mock);
            s.select(&Locator::id("country"), &SelectBy::Value("de".into()), None).unwrap();
            assert!(s.driver().clicks().is_empty());
        }

        #[test]
        fn test_missing_option_is_not_found() {
            let (mock, _) = country_select();
            let mut s = session(mock);
            let err = s
                .select(&Locator::id("country"), &SelectBy::Text("Spain".into()), None)
                .unwrap_err();
            assert!(matches!(err, PagehandError::NotFound { .. }));
        }

        #[test]
        fn test_non_select_element_rejected() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("fake"), MockElement::new("div"));
            let mut s = session(mock);
            let err = s.select(&Locator::id("fake"), &SelectBy::Index(0), None).unwrap_err();
            assert!(matches!(err, PagehandError::InvalidArgument { .. }));
            assert!(s.option_texts(&Locator::id("fake"), None).is_empty());
            assert_eq!(s.selected_option_text(&Locator::id("fake"), None), None);
        }
    }

    mod action_tests {
        use super::*;
        use crate::input::InputAction;

        #[test]
        fn test_pointer_actions() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("card"), MockElement::new("div"));
            mock.add(Locator::id("lane"), MockElement::new("div"));
            let mut s = session(mock);
            s.hover(&Locator::id("card"), None).unwrap();
            s.double_click(&Locator::id("card"), None).unwrap();
            s.right_click(&Locator::id("card"), None).unwrap();
            s.drag_and_drop(&Locator::id("card"), &Locator::id("lane"), None).unwrap();
            assert_eq!(s.driver().performed_actions().len(), 4);
        }

        #[test]
        fn test_press_key_scoped_and_global() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("search"), MockElement::input());
            let mut s = session(mock);
            s.press_key("enter", Some(&Locator::id("search")), None).unwrap();
            s.press_key("ESC", None, None).unwrap();
            let last = s.driver().performed_actions().last().unwrap();
            assert!(last
                .steps()
                .iter()
                .any(|step| *step == InputAction::KeyDown(Key::Escape)));
        }

        #[test]
        fn test_invalid_key_is_typed_error_without_driver_traffic() {
            let mut s = session(MockDriver::new());
            let err = s.press_key("HYPERSPACE", None, None).unwrap_err();
            assert!(matches!(err, PagehandError::InvalidKey { .. }));
            assert!(s.driver().history().is_empty());
            assert!(matches!(
                s.key_down("NOPE", None, None),
                Err(PagehandError::InvalidKey { .. })
            ));
        }

        #[test]
        fn test_hidden_key_target_is_not_focused() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("search"), MockElement::input().hidden());
            let (mut s, clock) = session_with_clock(mock);
            let err = s
                .press_key("enter", Some(&Locator::id("search")), Some(Duration::from_secs(1)))
                .unwrap_err();
            assert!(err.is_timeout());
            assert_eq!(clock.now(), Duration::from_secs(1));
            assert!(s.driver().performed_actions().is_empty());
        }

        #[test]
        fn test_key_down_up() {
            let mut s = session(MockDriver::new());
            s.key_down("shift", None, None).unwrap();
            s.key_up("shift", None, None).unwrap();
            assert_eq!(s.driver().performed_actions().len(), 2);
        }
    }

    mod scroll_tests {
        use super::*;
        use crate::driver::ElementRect;

        #[test]
        fn test_scroll_to_element_centers() {
            let mut mock = MockDriver::new();
            mock.add(
                Locator::id("footer"),
                MockElement::new("footer").with_rect(ElementRect::new(0.0, 2400.0, 1280.0, 200.0)),
            );
            let mut s = session(mock);
            s.scroll_to_element(&Locator::id("footer"), true, None);
            assert!(s.driver().scripts().iter().any(|js| js.contains("scrollIntoView")));
        }

        #[test]
        fn test_scroll_to_element_alignment() {
            let mut mock = MockDriver::new();
            let footer = mock.add(Locator::id("footer"), MockElement::new("footer"));
            let mut s = session(mock);
            s.scroll_to_element(&Locator::id("footer"), false, None);
            let last = s.driver().script_args().last().unwrap();
            assert_eq!(
                last,
                &vec![ScriptArg::Element(footer), ScriptArg::Value(json!(false))]
            );
        }

        #[test]
        fn test_scroll_to_missing_element_never_raises() {
            let mut s = session(MockDriver::new());
            s.config.explicit_wait = Duration::from_secs(1);
            s.scroll_to_element(&Locator::id("nowhere"), true, None);
        }

        #[test]
        fn test_scroll_page() {
            let mut s = session(MockDriver::new());
            s.scroll_page(ScrollDirection::Down, None).unwrap();
            s.scroll_page(ScrollDirection::Down, None).unwrap();
            assert_eq!(s.viewport().unwrap().scroll_y, 1600.0);
            s.scroll_page(ScrollDirection::Up, None).unwrap();
            assert_eq!(s.viewport().unwrap().scroll_y, 800.0);
            s.scroll_page(ScrollDirection::Top, None).unwrap();
            assert_eq!(s.viewport().unwrap().scroll_y, 0.0);
            s.scroll_page(ScrollDirection::Bottom, None).unwrap();
            assert!(s.driver().scripts().last().unwrap().contains("scrollHeight"));
        }

        #[test]
        fn test_scroll_page_by_pixels() {
            let mut s = session(MockDriver::new());
            s.scroll_page(ScrollDirection::Down, Some(250.0)).unwrap();
            s.scroll_page(ScrollDirection::Up, Some(100.0)).unwrap();
            assert!(!s.driver().scripts().iter().any(|js| js.contains("innerHeight")));
            assert_eq!(s.viewport().unwrap().scroll_y, 150.0);
        }
    }

    mod geometry_tests {
        use super::*;
        use crate::driver::ElementRect;

        #[test]
        fn test_size_and_location() {
            let mut mock = MockDriver::new();
            mock.add(
                Locator::id("banner"),
                MockElement::new("div").with_rect(ElementRect::new(10.0, 20.0, 300.0, 40.0)),
            );
            let mut s = session(mock);
            assert_eq!(
                s.element_size(&Locator::id("banner"), None),
                Some(ElementSize { width: 300.0, height: 40.0 })
            );
            assert_eq!(
                s.element_location(&Locator::id("banner"), None),
                Some(ElementLocation { x: 10.0, y: 20.0 })
            );
        }

        #[test]
        fn test_hidden_or_missing_element_has_no_geometry() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("ghost"), MockElement::new("div").hidden());
            let (mut s, clock) = session_with_clock(mock);
            let wait = Some(Duration::from_secs(1));
            assert_eq!(s.element_size(&Locator::id("ghost"), wait), None);
            assert_eq!(s.element_location(&Locator::id("nowhere"), wait), None);
            assert_eq!(clock.now(), Duration::from_secs(2));
        }
    }

    mod by_text_tests {
        use super::*;

        #[test]
        fn test_effective_text_fallbacks() {
            let mut mock = MockDriver::new();
            let radio = Locator::css(".choice");
            mock.add(radio.clone(), MockElement::new("div"));
            let inner = mock.add(
                radio.clone(),
                MockElement::new("div").with_property("innerText", "Yearly"),
            );
            let valued = mock.add(radio.clone(), MockElement::input().with_attribute("value", "Monthly"));
            let mut s = session(mock);
            assert_eq!(s.find_by_text(&radio, "Yearly", TextMatch::Exact, None).unwrap(), inner);
            assert_eq!(s.find_by_text(&radio, "Month", TextMatch::Contains, None).unwrap(), valued);
        }

        #[test]
        fn test_no_candidates_is_not_found() {
            let mut s = session(MockDriver::new());
            s.config.explicit_wait = Duration::from_secs(1);
            let err = s
                .click_by_text(&Locator::css(".tab"), "Billing", TextMatch::Exact, None)
                .unwrap_err();
            assert!(matches!(err, PagehandError::NotFound { .. }));
        }

        #[test]
        fn test_unclickable_match_continues_scan() {
            let mut mock = MockDriver::new();
            let tabs = Locator::css(".tab");
            mock.add(
                tabs.clone(),
                MockElement::new("div")
                    .with_text("Billing")
                    .not_interactable(1)
                    .script_click_fails(),
            );
            let second = mock.add(tabs.clone(), MockElement::new("div").with_text("Billing"));
            let mut s = session(mock);
            s.click_by_text(&tabs, "Billing", TextMatch::Exact, None).unwrap();
            assert_eq!(s.driver().clicks().len(), 1);
            assert_eq!(s.driver().clicks()[0].element, second);
        }

        #[test]
        fn test_stale_candidate_is_skipped() {
            let mut mock = MockDriver::new();
            let tabs = Locator::css(".tab");
            mock.add(tabs.clone(), MockElement::new("div").with_text("Plans").stale_on_use(1));
            let second = mock.add(tabs.clone(), MockElement::new("div").with_text("Plans"));
            let mut s = session(mock);
            assert_eq!(s.find_by_text(&tabs, "Plans", TextMatch::Exact, None).unwrap(), second);
        }
    }

    mod upload_tests {
        use super::*;
        use tempfile::NamedTempFile;

        #[test]
        fn test_upload_types_path() {
            let file = NamedTempFile::new().unwrap();
            let mut mock = MockDriver::new();
            let input = mock.add(Locator::css("input[type=file]"), MockElement::input().hidden());
            let mut s = session(mock);
            s.upload_file(&Locator::css("input[type=file]"), file.path(), None).unwrap();
            assert_eq!(
                s.driver().value_of(&input),
                Some(file.path().display().to_string().as_str())
            );
        }

        #[test]
        fn test_relative_or_missing_path_rejected() {
            let mut mock = MockDriver::new();
            mock.add(Locator::id("file"), MockElement::input());
            let mut s = session(mock);
            for path in ["relative/report.pdf", "/definitely/not/here.pdf"] {
                let err = s.upload_file(&Locator::id("file"), path, None).unwrap_err();
                assert!(matches!(err, PagehandError::InvalidArgument { .. }));
            }
            assert!(!s.driver().was_called("send_keys"));
        }
    }
}
