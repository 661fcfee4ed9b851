//! Result and error types for Pagehand.
//!
//! Two layers of errors share one enum:
//!
//! - **Engine errors** (`Timeout`, `StaleRetryExhausted`, `NotInteractable`,
//!   `NotFound`, `InvalidKey`, `InvalidSelector`) are what callers see after
//!   the wait and retry layers have absorbed everything transient.
//! - **Driver errors** (`StaleElement`, `NoSuchElement`, `NoSuchWindow`, ...)
//!   are reported by a [`WebDriver`](crate::driver::WebDriver) backend and are
//!   classified by the wait and retry layers.

use std::time::Duration;
use thiserror::Error;

/// Result type for Pagehand operations
pub type PagehandResult<T> = Result<T, PagehandError>;

/// Errors that can occur in Pagehand
#[derive(Debug, Error)]
pub enum PagehandError {
    /// A wait condition was not satisfied in the allotted time
    #[error("Timed out after {}ms waiting for {condition} on {target}{}", .elapsed.as_millis(), message_suffix(.message))]
    Timeout {
        /// Condition kind that was polled
        condition: String,
        /// Locator or target the condition was evaluated against
        target: String,
        /// Time spent polling
        elapsed: Duration,
        /// Optional caller-supplied failure message
        message: Option<String>,
    },

    /// Element reference kept going stale across the whole retry budget
    #[error("{operation} failed: element went stale on all {attempts} attempts")]
    StaleRetryExhausted {
        /// Operation that was retried
        operation: String,
        /// Number of attempts made
        attempts: u32,
    },

    /// Element rejected a native interaction and the fallback failed too
    #[error("Element {target} is not interactable: {reason}")]
    NotInteractable {
        /// Locator of the element
        target: String,
        /// Driver message
        reason: String,
    },

    /// No candidate matched during a by-text scan
    #[error("No element under {target} matched text '{text}'")]
    NotFound {
        /// Locator that was scanned
        target: String,
        /// Text that was looked for
        text: String,
    },

    /// Unknown key name
    #[error("Invalid key name: '{name}'")]
    InvalidKey {
        /// Name supplied by the caller
        name: String,
    },

    /// Malformed selection mode or non-selectable element
    #[error("Invalid selector: {message}")]
    InvalidSelector {
        /// Error message
        message: String,
    },

    /// Driver reported a stale element reference
    #[error("Stale element reference: {element}")]
    StaleElement {
        /// Element id or locator
        element: String,
    },

    /// Driver found no element for a lookup
    #[error("No such element: {target}")]
    NoSuchElement {
        /// Locator that was looked up
        target: String,
    },

    /// Driver has no window with the handle
    #[error("No such window: {handle}")]
    NoSuchWindow {
        /// Window handle
        handle: String,
    },

    /// Frame is not attached or not available
    #[error("No such frame: {frame}")]
    NoSuchFrame {
        /// Frame reference
        frame: String,
    },

    /// No alert is open
    #[error("No alert is open")]
    NoSuchAlert,

    /// Script execution failed in the page
    #[error("Script error: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Any other driver or transport failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Caller supplied an argument the engine cannot use
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl PagehandError {
    /// Element reference went stale between resolution and use
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }

    /// Lookup failure that polling is expected to outlast
    #[must_use]
    pub const fn is_transient_lookup(&self) -> bool {
        matches!(
            self,
            Self::StaleElement { .. } | Self::NoSuchElement { .. }
        )
    }

    /// Wait condition expired
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Native interaction was rejected by the browser
    #[must_use]
    pub const fn is_not_interactable(&self) -> bool {
        matches!(self, Self::NotInteractable { .. })
    }

    pub(crate) fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod display_tests {
        use super::*;

        #[test]
        fn test_timeout_display_carries_kind_target_and_elapsed() {
            let err = PagehandError::Timeout {
                condition: "visible".to_string(),
                target: "css=#submit".to_string(),
                elapsed: Duration::from_millis(20_000),
                message: None,
            };
            assert_eq!(
                err.to_string(),
                "Timed out after 20000ms waiting for visible on css=#submit"
            );
        }

        #[test]
        fn test_timeout_display_appends_message() {
            let err = PagehandError::Timeout {
                condition: "alert_present".to_string(),
                target: "alert".to_string(),
                elapsed: Duration::from_millis(1500),
                message: Some("confirm dialog never opened".to_string()),
            };
            assert!(err.to_string().ends_with(": confirm dialog never opened"));
        }

        #[test]
        fn test_stale_exhausted_display() {
            let err = PagehandError::StaleRetryExhausted {
                operation: "click".to_string(),
                attempts: 3,
            };
            assert_eq!(
                err.to_string(),
                "click failed: element went stale on all 3 attempts"
            );
        }
    }

    mod classification_tests {
        use super::*;

        #[test]
        fn test_stale_is_transient_and_stale() {
            let err = PagehandError::StaleElement {
                element: "e-1".to_string(),
            };
            assert!(err.is_stale());
            assert!(err.is_transient_lookup());
            assert!(!err.is_timeout());
        }

        #[test]
        fn test_missing_element_is_transient_not_stale() {
            let err = PagehandError::NoSuchElement {
                target: "css=.late".to_string(),
            };
            assert!(err.is_transient_lookup());
            assert!(!err.is_stale());
        }

        #[test]
        fn test_driver_error_is_not_transient() {
            let err = PagehandError::driver("session deleted");
            assert!(!err.is_transient_lookup());
            assert!(!err.is_stale());
        }

        #[test]
        fn test_io_conversion() {
            let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
            let err: PagehandError = io.into();
            assert!(matches!(err, PagehandError::Io(_)));
        }
    }
}
