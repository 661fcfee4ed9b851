//! WebDriver - Abstract Browser Command Trait
//!
//! The engine talks to a browser only through [`WebDriver`], the outbound
//! command set of a remote-automation session: element lookup, element state,
//! actions, scripts, windows, frames, alerts, navigation, cookies and
//! screenshots.
//!
//! Commands are synchronous. A session is exclusively owned by one test, and
//! every wait in the engine is a blocking poll, so the trait mirrors the
//! command/response model of the protocol directly.
//!
//! # Implementations
//!
//! - [`MockDriver`](crate::mock::MockDriver) - in-memory browser for unit testing
//! - `FantocciniDriver` - W3C WebDriver client (feature `webdriver`)
//!
//! Implementations report failures with the driver-level variants of
//! [`PagehandError`](crate::result::PagehandError): `StaleElement`,
//! `NoSuchElement`, `NotInteractable`, `NoSuchWindow`, `NoSuchFrame`,
//! `NoSuchAlert`, `Script` and `Driver`.

use crate::input::ActionSequence;
use crate::locator::Locator;
use crate::result::PagehandResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a live element in the current browsing context
///
/// Valid only until the document mutates; never cached across operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: String,
}

impl ElementHandle {
    /// Wrap a driver element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Driver element id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element({})", self.id)
    }
}

/// Opaque window or tab handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHandle(String);

impl WindowHandle {
    /// Wrap a driver window handle
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Raw handle string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Kind of browsing context to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    /// New tab in the current window
    Tab,
    /// New top-level window
    Window,
}

/// Frame addressed the way the protocol accepts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameTarget {
    /// Index among the child frames of the current document
    Index(u16),
    /// A `frame`/`iframe` element
    Element(ElementHandle),
}

/// Script argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptArg {
    /// Passed to the page as the DOM element
    Element(ElementHandle),
    /// Passed as JSON
    Value(serde_json::Value),
}

/// Element position and size in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl ElementRect {
    /// Create a rect
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Browser cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain, if restricted
    pub domain: Option<String>,
    /// Path, if restricted
    pub path: Option<String>,
    /// HTTPS only
    pub secure: bool,
    /// Hidden from scripts
    pub http_only: bool,
}

impl Cookie {
    /// Create a session cookie
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: false,
            http_only: false,
        }
    }

    /// Restrict to a domain
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Restrict to a path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Abstract browser command set
///
/// All element commands take a handle resolved by a previous lookup in the
/// same browsing context and report `StaleElement` once it has detached.
pub trait WebDriver {
    /// Backend name used in logs
    fn name(&self) -> &str {
        "webdriver"
    }

    // ========================================================================
    // Elements
    // ========================================================================

    /// All elements matching `locator` in document order (empty if none)
    fn find_elements(&mut self, locator: &Locator) -> PagehandResult<Vec<ElementHandle>>;

    /// Descendants of `parent` matching `locator`
    fn find_child_elements(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> PagehandResult<Vec<ElementHandle>>;

    /// Whether the element is rendered
    fn is_displayed(&mut self, element: &ElementHandle) -> PagehandResult<bool>;

    /// Whether the element accepts input
    fn is_enabled(&mut self, element: &ElementHandle) -> PagehandResult<bool>;

    /// Whether an option, checkbox or radio is selected
    fn is_selected(&mut self, element: &ElementHandle) -> PagehandResult<bool>;

    /// Lowercase tag name
    fn tag_name(&mut self, element: &ElementHandle) -> PagehandResult<String>;

    /// Rendered text
    fn text(&mut self, element: &ElementHandle) -> PagehandResult<String>;

    /// Attribute value, `None` when unset
    fn attribute(&mut self, element: &ElementHandle, name: &str)
        -> PagehandResult<Option<String>>;

    /// DOM property value (e.g. `innerText`), `None` when unset
    fn property(&mut self, element: &ElementHandle, name: &str) -> PagehandResult<Option<String>>;

    /// Position and size
    fn rect(&mut self, element: &ElementHandle) -> PagehandResult<ElementRect>;

    /// Native click
    fn click(&mut self, element: &ElementHandle) -> PagehandResult<()>;

    /// Clear an editable element
    fn clear(&mut self, element: &ElementHandle) -> PagehandResult<()>;

    /// Type into an element
    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> PagehandResult<()>;

    // ========================================================================
    // Scripts and input
    // ========================================================================

    /// Run a synchronous script in the current browsing context
    fn execute_script(
        &mut self,
        script: &str,
        args: &[ScriptArg],
    ) -> PagehandResult<serde_json::Value>;

    /// Run an asynchronous script; it signals completion by calling the
    /// callback passed as its last argument
    fn execute_async_script(
        &mut self,
        script: &str,
        args: &[ScriptArg],
    ) -> PagehandResult<serde_json::Value>;

    /// Perform a pointer/key action sequence and release all inputs
    fn perform_actions(&mut self, actions: &ActionSequence) -> PagehandResult<()>;

    // ========================================================================
    // Windows and frames
    // ========================================================================

    /// Open window handles in driver order
    fn window_handles(&mut self) -> PagehandResult<Vec<WindowHandle>>;

    /// Handle of the active window
    fn current_window(&mut self) -> PagehandResult<WindowHandle>;

    /// Activate a window; `NoSuchWindow` if it is closed
    fn switch_to_window(&mut self, handle: &WindowHandle) -> PagehandResult<()>;

    /// Close the active window and return the windows still open
    ///
    /// Closing the last window ends the W3C session, so an empty list is the
    /// final answer and must not be followed by another window query.
    fn close_window(&mut self) -> PagehandResult<Vec<WindowHandle>>;

    /// Open a new tab or window without switching to it
    fn new_window(&mut self, kind: WindowKind) -> PagehandResult<WindowHandle>;

    /// Enter a child frame; `NoSuchFrame` if it is not available
    fn switch_to_frame(&mut self, target: &FrameTarget) -> PagehandResult<()>;

    /// Leave the current frame (no-op at top level)
    fn switch_to_parent_frame(&mut self) -> PagehandResult<()>;

    /// Return to the top-level document
    fn switch_to_default_content(&mut self) -> PagehandResult<()>;

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Text of the open alert; `NoSuchAlert` if none
    fn alert_text(&mut self) -> PagehandResult<String>;

    /// Accept the open alert
    fn accept_alert(&mut self) -> PagehandResult<()>;

    /// Dismiss the open alert
    fn dismiss_alert(&mut self) -> PagehandResult<()>;

    /// Type into a prompt
    fn send_alert_text(&mut self, text: &str) -> PagehandResult<()>;

    // ========================================================================
    // Navigation, cookies, capture
    // ========================================================================

    /// Load a URL
    fn goto(&mut self, url: &str) -> PagehandResult<()>;

    /// Reload
    fn refresh(&mut self) -> PagehandResult<()>;

    /// History back
    fn back(&mut self) -> PagehandResult<()>;

    /// History forward
    fn forward(&mut self) -> PagehandResult<()>;

    /// Current URL
    fn current_url(&mut self) -> PagehandResult<String>;

    /// Document title
    fn title(&mut self) -> PagehandResult<String>;

    /// Cookies visible to the current document
    fn cookies(&mut self) -> PagehandResult<Vec<Cookie>>;

    /// Set a cookie
    fn add_cookie(&mut self, cookie: &Cookie) -> PagehandResult<()>;

    /// Delete a cookie by name
    fn delete_cookie(&mut self, name: &str) -> PagehandResult<()>;

    /// Delete every cookie
    fn delete_all_cookies(&mut self) -> PagehandResult<()>;

    /// PNG screenshot of the viewport
    fn screenshot(&mut self) -> PagehandResult<Vec<u8>>;
}
