//! Session: one exclusively-owned driver plus the engine around it.
//!
//! A [`Session`] owns the driver, the configuration resolved at construction,
//! the condition evaluator, the stale-element retry wrapper, the diagnostics
//! hook and the navigator's frame/window state. Operations run strictly in
//! call order on the calling thread.
//!
//! Element operations live in [`interact`](crate::interact), frame, window
//! and alert handling in [`navigator`](crate::navigator). This module holds
//! construction, the shared plumbing (waiting, retry composition, diagnostics
//! on failure) and page-level operations.
//!
//! # Example
//!
//! ```
//! use pagehand::prelude::*;
//!
//! let mut mock = MockDriver::new();
//! mock.add(Locator::id("login"), MockElement::button("Log in"));
//!
//! let mut session = Session::with_clock(mock, EngineConfig::default().without_screenshots(), FakeClock::shared());
//! session.click(&Locator::id("login"), None).unwrap();
//! assert_eq!(session.driver().native_clicks(), 1);
//! ```

use crate::clock::{SharedClock, SystemClock};
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostics, FailureCategory};
use crate::driver::{Cookie, ScriptArg, WebDriver};
use crate::locator::Locator;
use crate::navigator::FrameStack;
use crate::result::{PagehandError, PagehandResult};
use crate::retry::{RetryPolicy, StaleRetry};
use crate::wait::{Condition, ConditionEvaluator, Satisfied};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, info_span, Span};
use uuid::Uuid;

/// Browser session driven by the interaction engine
#[derive(Debug)]
pub struct Session<D: WebDriver> {
    pub(crate) driver: D,
    pub(crate) config: EngineConfig,
    pub(crate) evaluator: ConditionEvaluator,
    pub(crate) retry: StaleRetry,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) frames: FrameStack,
    pub(crate) no_window: bool,
    pub(crate) span: Span,
    id: Uuid,
    depth: u32,
}

impl<D: WebDriver> Session<D> {
    /// Session on the system clock
    pub fn new(driver: D, config: EngineConfig) -> Self {
        Self::with_clock(driver, config, SystemClock::shared())
    }

    /// Session on an explicit clock
    pub fn with_clock(driver: D, config: EngineConfig, clock: SharedClock) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("session", id = %id, driver = driver.name());
        span.in_scope(|| {
            info!(
                explicit_wait_ms = config.explicit_wait.as_millis() as u64,
                retry_attempts = config.retry.max_attempts,
                screenshots = config.capture_screenshots,
                "session started"
            );
        });
        Self {
            evaluator: ConditionEvaluator::new(clock.clone()),
            retry: StaleRetry::new(config.retry, clock),
            diagnostics: Diagnostics::from_config(&config),
            frames: FrameStack::new(),
            no_window: false,
            span,
            id,
            depth: 0,
            driver,
            config,
        }
    }

    /// Unique session id, also recorded on the session span
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Span every operation of this session runs in
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stale-element retry policy
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry.policy()
    }

    /// Diagnostics hook
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// End the session and hand back the driver
    pub fn into_driver(self) -> D {
        self.span.in_scope(|| info!("session ended"));
        self.driver
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    /// Poll `condition` with the session's poll interval
    pub(crate) fn wait(
        &mut self,
        condition: &Condition,
        timeout: Option<Duration>,
    ) -> PagehandResult<Satisfied> {
        let policy = self.config.wait_policy(timeout);
        self.evaluator.until(&mut self.driver, condition, &policy)
    }

    /// Run `op`; if it fails and no enclosing operation is already guarding,
    /// log the error and capture a screenshot under the chosen category
    pub(crate) fn guarded_by<T, C, F>(&mut self, categorize: C, op: F) -> PagehandResult<T>
    where
        C: FnOnce(&PagehandError) -> FailureCategory,
        F: FnOnce(&mut Self) -> PagehandResult<T>,
    {
        self.depth += 1;
        let result = op(self);
        self.depth -= 1;
        if let Err(err) = &result {
            if self.depth == 0 {
                let category = categorize(err);
                error!(category = %category, error = %err, "operation failed");
                self.diagnostics.capture(&mut self.driver, category);
            } else {
                debug!(error = %err, "nested operation failed");
            }
        }
        result
    }

    /// [`guarded_by`](Self::guarded_by) with a fixed category
    pub(crate) fn guarded<T, F>(&mut self, category: FailureCategory, op: F) -> PagehandResult<T>
    where
        F: FnOnce(&mut Self) -> PagehandResult<T>,
    {
        self.guarded_by(|_| category, op)
    }

    /// Run `op` under the session's stale-element retry policy
    ///
    /// `op` must resolve its element itself, so each attempt waits and
    /// locates afresh.
    pub(crate) fn with_stale_retry<T, F>(&mut self, operation: &str, mut op: F) -> PagehandResult<T>
    where
        F: FnMut(&mut Self) -> PagehandResult<T>,
    {
        let retry = self.retry.clone();
        retry.run(operation, |attempt| {
            if attempt > 1 {
                debug!(operation, attempt, "re-resolving element");
            }
            op(self)
        })
    }

    // ========================================================================
    // Waits
    // ========================================================================

    /// Wait for a condition; `None` uses the configured explicit wait
    ///
    /// # Errors
    ///
    /// [`PagehandError::Timeout`] when the condition never holds.
    pub fn wait_for(
        &mut self,
        condition: &Condition,
        timeout: Option<Duration>,
    ) -> PagehandResult<Satisfied> {
        let _session = self.span.clone().entered();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::TimeoutException, FailureCategory::WaitException),
            |s| s.wait(condition, timeout),
        )
    }

    /// Wait until the element's text contains `text`
    pub fn wait_for_text(
        &mut self,
        locator: &Locator,
        text: &str,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let condition = Condition::TextContains {
            locator: locator.clone(),
            text: text.to_string(),
        };
        self.wait_for(&condition, timeout).map(|_| ())
    }

    /// Wait until the element's trimmed text equals `text`
    pub fn wait_for_exact_text(
        &mut self,
        locator: &Locator,
        text: &str,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let condition = Condition::TextEquals {
            locator: locator.clone(),
            text: text.to_string(),
        };
        self.wait_for(&condition, timeout).map(|_| ())
    }

    /// Wait until an attribute has the given value
    pub fn wait_for_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
        value: &str,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let condition = Condition::AttributeEquals {
            locator: locator.clone(),
            name: name.to_string(),
            value: value.to_string(),
        };
        self.wait_for(&condition, timeout).map(|_| ())
    }

    /// Wait for `document.readyState == "complete"`
    pub fn wait_for_page_load(&mut self, timeout: Option<Duration>) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::PageLoadTimeout, FailureCategory::NavigationFailed),
            |s| s.wait(&Condition::DocumentReady, timeout).map(|_| ()),
        )
    }

    // ========================================================================
    // Page
    // ========================================================================

    /// Open a path relative to the configured base URL and wait for the load
    pub fn open(&mut self, path: &str) -> PagehandResult<()> {
        let url = join_url(&self.config.base_url, path);
        self.open_url(&url)
    }

    /// Open an absolute URL and wait for the load
    pub fn open_url(&mut self, url: &str) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        info!(url, "opening page");
        self.navigate(|d| d.goto(url))
    }

    /// Reload and wait for the load
    pub fn refresh(&mut self) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.navigate(|d| d.refresh())
    }

    /// History back and wait for the load
    pub fn back(&mut self) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.navigate(|d| d.back())
    }

    /// History forward and wait for the load
    pub fn forward(&mut self) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.navigate(|d| d.forward())
    }

    fn navigate<F>(&mut self, command: F) -> PagehandResult<()>
    where
        F: FnOnce(&mut D) -> PagehandResult<()>,
    {
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::PageLoadTimeout, FailureCategory::NavigationFailed),
            |s| {
                command(&mut s.driver)?;
                s.frames.clear();
                s.wait(&Condition::DocumentReady, None)?;
                Ok(())
            },
        )
    }

    /// Document title
    pub fn title(&mut self) -> PagehandResult<String> {
        let _session = self.span.clone().entered();
        self.driver.title()
    }

    /// Current URL
    pub fn current_url(&mut self) -> PagehandResult<String> {
        let _session = self.span.clone().entered();
        self.driver.current_url()
    }

    /// Run a script in the current browsing context
    pub fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> PagehandResult<Value> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::JavascriptError, |s| {
            let value = s.driver.execute_script(script, args)?;
            debug!(script, "script executed");
            Ok(value)
        })
    }

    /// Run an asynchronous script in the current browsing context
    ///
    /// The script finishes by calling the callback passed as its last
    /// argument; the value handed to the callback is returned.
    pub fn execute_async_script(&mut self, script: &str, args: &[ScriptArg]) -> PagehandResult<Value> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::AsyncJavascriptError, |s| {
            let value = s.driver.execute_async_script(script, args)?;
            debug!(script, "async script completed");
            Ok(value)
        })
    }

    // ========================================================================
    // Cookies
    // ========================================================================

    /// All cookies visible to the current document
    pub fn cookies(&mut self) -> PagehandResult<Vec<Cookie>> {
        let _session = self.span.clone().entered();
        self.driver.cookies()
    }

    /// Cookie by name
    pub fn cookie(&mut self, name: &str) -> PagehandResult<Option<Cookie>> {
        Ok(self.cookies()?.into_iter().find(|c| c.name == name))
    }

    /// Set a cookie
    pub fn add_cookie(&mut self, cookie: &Cookie) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        debug!(name = %cookie.name, "adding cookie");
        self.driver.add_cookie(cookie)
    }

    /// Delete a cookie by name
    pub fn delete_cookie(&mut self, name: &str) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.driver.delete_cookie(name)
    }

    /// Delete every cookie
    pub fn delete_all_cookies(&mut self) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.driver.delete_all_cookies()
    }

    // ========================================================================
    // Screenshots
    // ========================================================================

    /// Capture a screenshot now, named after `category`
    pub fn capture_screenshot(&mut self, category: FailureCategory) -> Option<PathBuf> {
        let _session = self.span.clone().entered();
        self.diagnostics.capture(&mut self.driver, category)
    }

    /// Current page as base64 PNG
    pub fn screenshot_base64(&mut self) -> Option<String> {
        let _session = self.span.clone().entered();
        self.diagnostics.capture_base64(&mut self.driver)
    }
}

/// Pick `on_timeout` for timeouts and `otherwise` for everything else
pub(crate) const fn timeout_or(
    err: &PagehandError,
    on_timeout: FailureCategory,
    otherwise: FailureCategory,
) -> FailureCategory {
    if err.is_timeout() {
        on_timeout
    } else {
        otherwise
    }
}

/// Join a base URL and a path; absolute URLs pass through
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{path}")
    }
}
