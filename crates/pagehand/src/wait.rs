//! Condition Evaluator
//!
//! Bounded polling of the browsing context against a closed set of
//! [`Condition`] kinds.
//!
//! ## Polling contract
//!
//! - The condition is checked immediately, then after every poll interval.
//! - Transient lookup failures (element not yet attached, element detached,
//!   frame or alert not yet there) count as "not yet" and are polled again.
//! - Any other driver error escalates at once.
//! - `Timeout` is raised only once the elapsed time has reached the timeout,
//!   never earlier; the last sleep is shortened so the final check lands on
//!   the deadline.

use crate::clock::SharedClock;
use crate::driver::{ElementHandle, FrameTarget, ScriptArg, WebDriver, WindowHandle};
use crate::locator::Locator;
use crate::navigator::FrameRef;
use crate::result::{PagehandError, PagehandResult};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default explicit wait (20 seconds)
pub const DEFAULT_EXPLICIT_WAIT_SECS: u64 = 20;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Timeout for fast negative checks such as `is_visible` (1 second)
pub const QUICK_CHECK_TIMEOUT_MS: u64 = 1_000;

/// Smallest sleep between polls
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

const READY_STATE_SCRIPT: &str = "return document.readyState;";

// =============================================================================
// CONDITIONS
// =============================================================================

/// Condition kind, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// Element attached to the DOM
    Present,
    /// At least one element attached
    AllPresent,
    /// Element rendered
    Visible,
    /// Element rendered and enabled
    Clickable,
    /// Element absent or not rendered
    Invisible,
    /// Element text equals a value
    TextEquals,
    /// Element text contains a value
    TextContains,
    /// Attribute equals a value
    AttributeEquals,
    /// An alert is open
    AlertPresent,
    /// A frame is attached and was entered
    FrameAvailable,
    /// A window not in a known set is open
    NewWindow,
    /// `document.readyState` is `complete`
    DocumentReady,
}

impl ConditionKind {
    /// Snake-case name used in logs and errors
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "presence",
            Self::AllPresent => "presence_of_all",
            Self::Visible => "visibility",
            Self::Clickable => "clickability",
            Self::Invisible => "invisibility",
            Self::TextEquals => "text_equals",
            Self::TextContains => "text_contains",
            Self::AttributeEquals => "attribute_equals",
            Self::AlertPresent => "alert_present",
            Self::FrameAvailable => "frame_available",
            Self::NewWindow => "new_window",
            Self::DocumentReady => "document_ready",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition with its kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// First match attached; yields the element
    Present(Locator),
    /// Any match attached; yields all matches
    AllPresent(Locator),
    /// First match rendered; yields the element
    Visible(Locator),
    /// First match rendered and enabled; yields the element
    Clickable(Locator),
    /// No match, or first match not rendered
    Invisible(Locator),
    /// First match's trimmed text equals `text`
    TextEquals {
        /// Element locator
        locator: Locator,
        /// Expected text
        text: String,
    },
    /// First match's text contains `text`
    TextContains {
        /// Element locator
        locator: Locator,
        /// Expected substring
        text: String,
    },
    /// First match's attribute equals `value`
    AttributeEquals {
        /// Element locator
        locator: Locator,
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// An alert is open; yields its text
    AlertPresent,
    /// Frame attached; the driver is switched into it when satisfied
    FrameAvailable(FrameRef),
    /// A handle outside `known` is open; yields the first such handle
    NewWindow {
        /// Handles open before the triggering action
        known: Vec<WindowHandle>,
    },
    /// Document finished loading
    DocumentReady,
}

impl Condition {
    /// Kind without payload
    #[must_use]
    pub const fn kind(&self) -> ConditionKind {
        match self {
            Self::Present(_) => ConditionKind::Present,
            Self::AllPresent(_) => ConditionKind::AllPresent,
            Self::Visible(_) => ConditionKind::Visible,
            Self::Clickable(_) => ConditionKind::Clickable,
            Self::Invisible(_) => ConditionKind::Invisible,
            Self::TextEquals { .. } => ConditionKind::TextEquals,
            Self::TextContains { .. } => ConditionKind::TextContains,
            Self::AttributeEquals { .. } => ConditionKind::AttributeEquals,
            Self::AlertPresent => ConditionKind::AlertPresent,
            Self::FrameAvailable(_) => ConditionKind::FrameAvailable,
            Self::NewWindow { .. } => ConditionKind::NewWindow,
            Self::DocumentReady => ConditionKind::DocumentReady,
        }
    }

    /// Locator the condition is evaluated against, if any
    #[must_use]
    pub const fn locator(&self) -> Option<&Locator> {
        match self {
            Self::Present(l)
            | Self::AllPresent(l)
            | Self::Visible(l)
            | Self::Clickable(l)
            | Self::Invisible(l)
            | Self::TextEquals { locator: l, .. }
            | Self::TextContains { locator: l, .. }
            | Self::AttributeEquals { locator: l, .. } => Some(l),
            Self::FrameAvailable(FrameRef::Locator(l)) => Some(l),
            _ => None,
        }
    }

    /// Human-readable target for logs and errors
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            Self::FrameAvailable(frame) => frame.to_string(),
            Self::AlertPresent => "alert".to_string(),
            Self::NewWindow { known } => format!("{} known windows", known.len()),
            Self::DocumentReady => "document".to_string(),
            other => other
                .locator()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

/// Value a satisfied condition yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Satisfied {
    /// One element
    Element(ElementHandle),
    /// All matching elements, in document order
    Elements(Vec<ElementHandle>),
    /// A predicate held
    Flag(bool),
    /// Alert text
    Alert(String),
    /// A window handle
    Window(WindowHandle),
}

impl Satisfied {
    fn mismatch(&self, wanted: &str) -> PagehandError {
        PagehandError::driver(format!("condition yielded {self:?}, expected {wanted}"))
    }

    /// The element
    ///
    /// # Errors
    ///
    /// Returns an error if the condition did not yield one element.
    pub fn into_element(self) -> PagehandResult<ElementHandle> {
        match self {
            Self::Element(e) => Ok(e),
            other => Err(other.mismatch("an element")),
        }
    }

    /// The elements
    ///
    /// # Errors
    ///
    /// Returns an error if the condition did not yield a list.
    pub fn into_elements(self) -> PagehandResult<Vec<ElementHandle>> {
        match self {
            Self::Elements(e) => Ok(e),
            Self::Element(e) => Ok(vec![e]),
            other => Err(other.mismatch("elements")),
        }
    }

    /// The alert text
    ///
    /// # Errors
    ///
    /// Returns an error if the condition did not yield an alert.
    pub fn into_alert_text(self) -> PagehandResult<String> {
        match self {
            Self::Alert(t) => Ok(t),
            other => Err(other.mismatch("an alert")),
        }
    }

    /// The window handle
    ///
    /// # Errors
    ///
    /// Returns an error if the condition did not yield a window.
    pub fn into_window(self) -> PagehandResult<WindowHandle> {
        match self {
            Self::Window(w) => Ok(w),
            other => Err(other.mismatch("a window")),
        }
    }

    /// Whether the outcome is a positive answer
    #[must_use]
    pub const fn is_met(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Timeout, poll interval and optional failure message for one wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Give up after this long
    pub timeout: Duration,
    /// Sleep between polls
    pub poll_interval: Duration,
    /// Appended to the timeout error
    pub message: Option<String>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_EXPLICIT_WAIT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            message: None,
        }
    }
}

impl WaitPolicy {
    /// Policy with the given timeout and the default poll interval
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set failure message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// =============================================================================
// EVALUATOR
// =============================================================================

/// Polls conditions against a driver
#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    clock: SharedClock,
}

impl ConditionEvaluator {
    /// Evaluator reading time from `clock`
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Poll until `condition` holds or `policy.timeout` elapses
    ///
    /// # Errors
    ///
    /// Returns [`PagehandError::Timeout`] when the deadline passes, or the
    /// first non-transient driver error.
    pub fn until<D: WebDriver + ?Sized>(
        &self,
        driver: &mut D,
        condition: &Condition,
        policy: &WaitPolicy,
    ) -> PagehandResult<Satisfied> {
        let start = self.clock.now();
        let mut polls: u32 = 0;
        loop {
            polls += 1;
            if let Some(value) = poll_once(driver, condition)? {
                debug!(
                    condition = %condition.kind(),
                    target = %condition.target(),
                    polls,
                    elapsed_ms = (self.clock.now().saturating_sub(start)).as_millis() as u64,
                    "condition satisfied"
                );
                return Ok(value);
            }

            let elapsed = self.clock.now().saturating_sub(start);
            if elapsed >= policy.timeout {
                warn!(
                    condition = %condition.kind(),
                    target = %condition.target(),
                    polls,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "condition timed out"
                );
                return Err(PagehandError::Timeout {
                    condition: condition.kind().as_str().to_string(),
                    target: condition.target(),
                    elapsed,
                    message: policy.message.clone(),
                });
            }

            let remaining = policy.timeout - elapsed;
            self.clock
                .sleep(policy.poll_interval.max(MIN_POLL_INTERVAL).min(remaining));
        }
    }
}

/// One poll; `Ok(None)` means "not yet"
fn poll_once<D: WebDriver + ?Sized>(
    driver: &mut D,
    condition: &Condition,
) -> PagehandResult<Option<Satisfied>> {
    match evaluate(driver, condition) {
        Err(err) if err.is_transient_lookup() => Ok(None),
        other => other,
    }
}

fn first<D: WebDriver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
) -> PagehandResult<Option<ElementHandle>> {
    Ok(driver.find_elements(locator)?.into_iter().next())
}

fn evaluate<D: WebDriver + ?Sized>(
    driver: &mut D,
    condition: &Condition,
) -> PagehandResult<Option<Satisfied>> {
    match condition {
        Condition::Present(locator) => Ok(first(driver, locator)?.map(Satisfied::Element)),
        Condition::AllPresent(locator) => {
            let all = driver.find_elements(locator)?;
            Ok((!all.is_empty()).then_some(Satisfied::Elements(all)))
        }
        Condition::Visible(locator) => {
            let Some(el) = first(driver, locator)? else {
                return Ok(None);
            };
            Ok(driver.is_displayed(&el)?.then_some(Satisfied::Element(el)))
        }
        Condition::Clickable(locator) => {
            let Some(el) = first(driver, locator)? else {
                return Ok(None);
            };
            let ready = driver.is_displayed(&el)? && driver.is_enabled(&el)?;
            Ok(ready.then_some(Satisfied::Element(el)))
        }
        Condition::Invisible(locator) => {
            let Some(el) = first(driver, locator)? else {
                return Ok(Some(Satisfied::Flag(true)));
            };
            match driver.is_displayed(&el) {
                Ok(false) => Ok(Some(Satisfied::Flag(true))),
                Ok(true) => Ok(None),
                Err(err) if err.is_transient_lookup() => Ok(Some(Satisfied::Flag(true))),
                Err(err) => Err(err),
            }
        }
        Condition::TextEquals { locator, text } => {
            let Some(el) = first(driver, locator)? else {
                return Ok(None);
            };
            Ok((driver.text(&el)?.trim() == text.trim()).then_some(Satisfied::Flag(true)))
        }
        Condition::TextContains { locator, text } => {
            let Some(el) = first(driver, locator)? else {
                return Ok(None);
            };
            Ok(driver
                .text(&el)?
                .contains(text.as_str())
                .then_some(Satisfied::Flag(true)))
        }
        Condition::AttributeEquals {
            locator,
            name,
            value,
        } => {
            let Some(el) = first(driver, locator)? else {
                return Ok(None);
            };
            let actual = driver.attribute(&el, name)?;
            Ok((actual.as_deref() == Some(value.as_str())).then_some(Satisfied::Flag(true)))
        }
        Condition::AlertPresent => match driver.alert_text() {
            Ok(text) => Ok(Some(Satisfied::Alert(text))),
            Err(PagehandError::NoSuchAlert) => Ok(None),
            Err(err) => Err(err),
        },
        Condition::FrameAvailable(frame) => {
            let target = match frame {
                FrameRef::Index(index) => FrameTarget::Index(*index),
                FrameRef::NameOrId(name) => {
                    let by_id = first(driver, &Locator::id(name.as_str()))?;
                    let found = match by_id {
                        Some(el) => Some(el),
                        None => first(driver, &Locator::name(name.as_str()))?,
                    };
                    let Some(el) = found else {
                        return Ok(None);
                    };
                    FrameTarget::Element(el)
                }
                FrameRef::Locator(locator) => {
                    let Some(el) = first(driver, locator)? else {
                        return Ok(None);
                    };
                    FrameTarget::Element(el)
                }
            };
            match driver.switch_to_frame(&target) {
                Ok(()) => Ok(Some(Satisfied::Flag(true))),
                Err(PagehandError::NoSuchFrame { .. }) => Ok(None),
                Err(err) => Err(err),
            }
        }
        Condition::NewWindow { known } => {
            let handles = driver.window_handles()?;
            let fresh: Vec<WindowHandle> = handles
                .into_iter()
                .filter(|h| !known.contains(h))
                .collect();
            if fresh.len() > 1 {
                warn!(
                    count = fresh.len(),
                    "several new windows opened, using the first"
                );
            }
            Ok(fresh.into_iter().next().map(Satisfied::Window))
        }
        Condition::DocumentReady => {
            let state = driver.execute_script(READY_STATE_SCRIPT, &[] as &[ScriptArg])?;
            Ok((state.as_str() == Some("complete")).then_some(Satisfied::Flag(true)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FakeClock};
    use crate::mock::{MockDriver, MockElement};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn evaluator() -> (ConditionEvaluator, Arc<FakeClock>) {
        let clock = FakeClock::shared();
        (ConditionEvaluator::new(clock.clone()), clock)
    }

    mod timeout_tests {
        use super::*;

        #[test]
        fn test_never_resolving_locator_times_out_at_deadline() {
            let (eval, clock) = evaluator();
            let mut mock = MockDriver::new();
            let policy = WaitPolicy::new(Duration::from_secs(20));
            let err = eval
                .until(&mut mock, &Condition::Present(Locator::id("ghost")), &policy)
                .unwrap_err();
            match err {
                PagehandError::Timeout {
                    condition,
                    target,
                    elapsed,
                    ..
                } => {
                    assert_eq!(condition, "presence");
                    assert_eq!(target, "id=ghost");
                    assert_eq!(elapsed, Duration::from_secs(20));
                }
                other => panic!("expected timeout, got {other:?}"),
            }
            assert_eq!(clock.now(), Duration::from_secs(20));
        }

        #[test]
        fn test_uneven_interval_lands_on_deadline() {
            let (eval, clock) = evaluator();
            let mut mock = MockDriver::new();
            let policy =
                WaitPolicy::new(Duration::from_millis(1_000)).with_poll_interval(Duration::from_millis(300));
            let err = eval
                .until(&mut mock, &Condition::Visible(Locator::id("x")), &policy)
                .unwrap_err();
            assert!(err.is_timeout());
            assert_eq!(clock.now(), Duration::from_millis(1_000));
            // polls at 0, 300, 600, 900, 1000
            assert_eq!(mock.call_count("find_elements"), 5);
        }

        #[test]
        fn test_zero_timeout_polls_once() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let policy = WaitPolicy::new(Duration::ZERO);
            assert!(eval
                .until(&mut mock, &Condition::Present(Locator::id("x")), &policy)
                .unwrap_err()
                .is_timeout());
            assert_eq!(mock.call_count("find_elements"), 1);
        }

        #[test]
        fn test_message_is_carried() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let policy = WaitPolicy::new(Duration::from_secs(1)).with_message("login never rendered");
            let err = eval
                .until(&mut mock, &Condition::Present(Locator::id("x")), &policy)
                .unwrap_err();
            assert!(err.to_string().contains("login never rendered"));
        }
    }

    mod condition_tests {
        use super::*;

        #[test]
        fn test_present_after_late_render() {
            let (eval, clock) = evaluator();
            let mut mock = MockDriver::new();
            let loc = Locator::id("late");
            let el = mock.add(loc.clone(), MockElement::new("div").appears_after(3));
            let got = eval
                .until(&mut mock, &Condition::Present(loc), &WaitPolicy::default())
                .unwrap();
            assert_eq!(got, Satisfied::Element(el));
            assert_eq!(clock.now(), Duration::from_millis(1_500));
        }

        #[test]
        fn test_visible_waits_for_display() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let loc = Locator::id("spinner-done");
            mock.add(loc.clone(), MockElement::new("div").hidden_for(2));
            let got = eval
                .until(&mut mock, &Condition::Visible(loc), &WaitPolicy::default())
                .unwrap();
            assert!(matches!(got, Satisfied::Element(_)));
            assert_eq!(mock.call_count("is_displayed"), 3);
        }

        #[test]
        fn test_clickable_requires_enabled() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let loc = Locator::id("submit");
            mock.add(loc.clone(), MockElement::button("Go").disabled());
            let err = eval
                .until(
                    &mut mock,
                    &Condition::Clickable(loc),
                    &WaitPolicy::new(Duration::from_secs(2)),
                )
                .unwrap_err();
            assert!(err.is_timeout());
        }

        #[test]
        fn test_invisible_when_absent_or_hidden() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let hidden = Locator::id("hidden");
            mock.add(hidden.clone(), MockElement::new("div").hidden());
            for loc in [Locator::id("absent"), hidden] {
                let got = eval
                    .until(&mut mock, &Condition::Invisible(loc), &WaitPolicy::default())
                    .unwrap();
                assert_eq!(got, Satisfied::Flag(true));
            }
        }

        #[test]
        fn test_all_present_yields_document_order() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let loc = Locator::css(".row");
            let a = mock.add(loc.clone(), MockElement::new("tr"));
            let b = mock.add(loc.clone(), MockElement::new("tr"));
            let got = eval
                .until(&mut mock, &Condition::AllPresent(loc), &WaitPolicy::default())
                .unwrap();
            assert_eq!(got.into_elements().unwrap(), vec![a, b]);
        }

        #[test]
        fn test_text_equals_after_change() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let loc = Locator::id("status");
            mock.add(
                loc.clone(),
                MockElement::new("span").with_text("Saving").text_after(2, "Saved"),
            );
            let cond = Condition::TextEquals {
                locator: loc,
                text: "Saved".to_string(),
            };
            assert!(eval.until(&mut mock, &cond, &WaitPolicy::default()).unwrap().is_met());
            assert_eq!(mock.call_count("text:"), 3);
        }

        #[test]
        fn test_attribute_equals() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let loc = Locator::id("panel");
            mock.add(loc.clone(), MockElement::new("div").with_attribute("aria-expanded", "true"));
            let cond = Condition::AttributeEquals {
                locator: loc,
                name: "aria-expanded".to_string(),
                value: "true".to_string(),
            };
            assert!(eval.until(&mut mock, &cond, &WaitPolicy::default()).is_ok());
        }

        #[test]
        fn test_alert_present_after_polls() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            mock.show_alert_after("Saved!", 2);
            let got = eval
                .until(&mut mock, &Condition::AlertPresent, &WaitPolicy::default())
                .unwrap();
            assert_eq!(got.into_alert_text().unwrap(), "Saved!");
        }

        #[test]
        fn test_new_window_yields_only_unknown_handle() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            let known = mock.window_handles().unwrap();
            mock.open_window_later("popup", 2);
            let got = eval
                .until(&mut mock, &Condition::NewWindow { known }, &WaitPolicy::default())
                .unwrap();
            assert_eq!(got.into_window().unwrap(), WindowHandle::new("popup"));
        }

        #[test]
        fn test_document_ready() {
            let (eval, _clock) = evaluator();
            let mut mock = MockDriver::new();
            mock.set_load_polls(2);
            mock.goto("https://example.com").unwrap();
            assert!(eval
                .until(&mut mock, &Condition::DocumentReady, &WaitPolicy::default())
                .is_ok());
            assert_eq!(mock.call_count("execute_script"), 3);
        }

        #[test]
        fn test_non_transient_error_escalates_immediately() {
            let (eval, clock) = evaluator();
            let mut mock = MockDriver::new();
            mock.fail_script("readyState", "page crashed");
            let err = eval
                .until(&mut mock, &Condition::DocumentReady, &WaitPolicy::default())
                .unwrap_err();
            assert!(matches!(err, PagehandError::Script { .. }));
            assert_eq!(clock.sleep_count(), 0);
        }
    }

    mod condition_metadata_tests {
        use super::*;

        #[test]
        fn test_kind_and_target() {
            let cond = Condition::Clickable(Locator::css("#go"));
            assert_eq!(cond.kind(), ConditionKind::Clickable);
            assert_eq!(cond.target(), "css=#go");
            assert_eq!(Condition::AlertPresent.target(), "alert");
        }

        #[test]
        fn test_satisfied_mismatch_is_error() {
            assert!(Satisfied::Flag(true).into_element().is_err());
            assert!(!Satisfied::Flag(false).is_met());
        }
    }

    proptest! {
        #[test]
        fn prop_timeout_never_raised_early(timeout_ms in 0u64..5_000, interval_ms in 1u64..1_000) {
            let (eval, clock) = evaluator();
            let mut mock = MockDriver::new();
            let policy = WaitPolicy::new(Duration::from_millis(timeout_ms))
                .with_poll_interval(Duration::from_millis(interval_ms));
            let err = eval
                .until(&mut mock, &Condition::Present(Locator::id("never")), &policy)
                .unwrap_err();
            prop_assert!(err.is_timeout());
            prop_assert!(clock.now() >= Duration::from_millis(timeout_ms));
            prop_assert!(clock.now() < Duration::from_millis(timeout_ms) + Duration::from_millis(interval_ms));
        }
    }
}
