//! Context Navigator
//!
//! Frame, window and alert switching on a [`Session`].
//!
//! ## Frames
//!
//! The active browsing context is `Default` (top-level document) or
//! `InFrame(ref)`, with nested frames kept as a stack:
//!
//! - `switch_to_frame` polls until the frame is attached, enters it and pushes
//! - `switch_to_parent_frame` pops one level (no-op at `Default`)
//! - `switch_to_default_content` clears the stack
//!
//! ## Windows
//!
//! Switching to a handle is immediate and fails fast. New windows are
//! detected by diffing the handle set taken before a triggering action
//! against later polls. Closing the last window leaves the session in a
//! defined [`WindowFocus::NoWindow`] state instead of failing.
//!
//! ## Alerts
//!
//! Every alert operation waits for the alert first.

use crate::diagnostics::FailureCategory;
use crate::driver::{WebDriver, WindowHandle, WindowKind};
use crate::locator::Locator;
use crate::result::{PagehandError, PagehandResult};
use crate::session::{timeout_or, Session};
use crate::wait::Condition;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

// =============================================================================
// FRAMES
// =============================================================================

/// How a frame is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRef {
    /// Index among the child frames of the current document
    Index(u16),
    /// `id` or `name` attribute of the frame element
    NameOrId(String),
    /// Locator of the frame element
    Locator(Locator),
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "frame[{index}]"),
            Self::NameOrId(name) => write!(f, "frame '{name}'"),
            Self::Locator(locator) => write!(f, "frame {locator}"),
        }
    }
}

impl From<u16> for FrameRef {
    fn from(index: u16) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for FrameRef {
    fn from(name: &str) -> Self {
        Self::NameOrId(name.to_string())
    }
}

impl From<Locator> for FrameRef {
    fn from(locator: Locator) -> Self {
        Self::Locator(locator)
    }
}

/// Active browsing context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowsingContext {
    /// Top-level document
    Default,
    /// Innermost entered frame
    InFrame(FrameRef),
}

/// Stack of entered frames, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStack {
    frames: Vec<FrameRef>,
}

impl FrameStack {
    /// Empty stack (`Default` context)
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Enter a frame
    pub fn push(&mut self, frame: FrameRef) {
        self.frames.push(frame);
    }

    /// Leave the innermost frame
    pub fn pop(&mut self) -> Option<FrameRef> {
        self.frames.pop()
    }

    /// Back to `Default`
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Nesting depth (0 at `Default`)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Active context
    #[must_use]
    pub fn current(&self) -> BrowsingContext {
        self.frames
            .last()
            .cloned()
            .map_or(BrowsingContext::Default, BrowsingContext::InFrame)
    }

    /// Entered frames, outermost first
    #[must_use]
    pub fn frames(&self) -> &[FrameRef] {
        &self.frames
    }
}

// =============================================================================
// WINDOWS
// =============================================================================

/// Snapshot of open window handles in driver order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSet {
    handles: Vec<WindowHandle>,
}

impl WindowSet {
    /// Snapshot from handles
    #[must_use]
    pub fn new(handles: Vec<WindowHandle>) -> Self {
        Self { handles }
    }

    /// Handles in driver order
    #[must_use]
    pub fn handles(&self) -> &[WindowHandle] {
        &self.handles
    }

    /// Number of open windows
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// No window open
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Whether `handle` is open
    #[must_use]
    pub fn contains(&self, handle: &WindowHandle) -> bool {
        self.handles.contains(handle)
    }

    /// Handle at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WindowHandle> {
        self.handles.get(index)
    }

    /// Handles in `self` that are not in `earlier`
    #[must_use]
    pub fn difference(&self, earlier: &Self) -> Vec<WindowHandle> {
        self.handles
            .iter()
            .filter(|h| !earlier.contains(h))
            .cloned()
            .collect()
    }

    /// Consume into the handle list
    #[must_use]
    pub fn into_vec(self) -> Vec<WindowHandle> {
        self.handles
    }
}

/// Where focus went after a window closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowFocus {
    /// Focused on this window
    Window(WindowHandle),
    /// Every window is closed
    NoWindow,
}

impl WindowFocus {
    /// The focused handle, if any
    #[must_use]
    pub const fn handle(&self) -> Option<&WindowHandle> {
        match self {
            Self::Window(h) => Some(h),
            Self::NoWindow => None,
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

impl<D: WebDriver> Session<D> {
    /// Active browsing context
    #[must_use]
    pub fn browsing_context(&self) -> BrowsingContext {
        self.frames.current()
    }

    /// Frame nesting depth
    #[must_use]
    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    /// Wait for a frame and enter it
    ///
    /// # Errors
    ///
    /// [`PagehandError::Timeout`] if the frame never becomes available.
    pub fn switch_to_frame(
        &mut self,
        frame: impl Into<FrameRef>,
        timeout: Option<Duration>,
    ) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        let frame = frame.into();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::FrameSwitchTimeout, FailureCategory::FrameSwitchFailed),
            |s| {
                s.wait(&Condition::FrameAvailable(frame.clone()), timeout)?;
                info!(frame = %frame, depth = s.frames.depth() + 1, "switched to frame");
                s.frames.push(frame);
                Ok(())
            },
        )
    }

    /// Leave the innermost frame
    pub fn switch_to_parent_frame(&mut self) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        if self.frames.depth() == 0 {
            debug!("already at default content");
            return Ok(());
        }
        self.guarded(FailureCategory::FrameSwitchFailed, |s| {
            s.driver.switch_to_parent_frame()?;
            let left = s.frames.pop();
            debug!(left = ?left, context = ?s.frames.current(), "switched to parent frame");
            Ok(())
        })
    }

    /// Return to the top-level document
    pub fn switch_to_default_content(&mut self) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::FrameSwitchFailed, |s| {
            s.driver.switch_to_default_content()?;
            s.frames.clear();
            debug!("switched to default content");
            Ok(())
        })
    }

    /// Snapshot of open windows
    pub fn window_handles(&mut self) -> PagehandResult<WindowSet> {
        let _session = self.span.clone().entered();
        Ok(WindowSet::new(self.driver.window_handles()?))
    }

    /// Handle of the active window
    ///
    /// # Errors
    ///
    /// [`PagehandError::NoSuchWindow`] once every window was closed.
    pub fn current_window(&mut self) -> PagehandResult<WindowHandle> {
        let _session = self.span.clone().entered();
        if self.no_window {
            return Err(PagehandError::NoSuchWindow {
                handle: "<none open>".to_string(),
            });
        }
        self.driver.current_window()
    }

    /// Whether the session still has a window to work in
    #[must_use]
    pub const fn has_window(&self) -> bool {
        !self.no_window
    }

    /// Switch to a window; immediate, no polling
    ///
    /// # Errors
    ///
    /// [`PagehandError::NoSuchWindow`] if the handle is no longer open.
    pub fn switch_to_window(&mut self, handle: &WindowHandle) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::WindowSwitchFailed, |s| s.focus_window(handle))
    }

    fn focus_window(&mut self, handle: &WindowHandle) -> PagehandResult<()> {
        self.driver.switch_to_window(handle)?;
        self.frames.clear();
        self.no_window = false;
        info!(window = %handle, "switched to window");
        Ok(())
    }

    /// Switch to the window at `index` in driver order
    pub fn switch_to_window_by_index(&mut self, index: usize) -> PagehandResult<WindowHandle> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::WindowSwitchFailed, |s| {
            let windows = WindowSet::new(s.driver.window_handles()?);
            let handle = windows.get(index).cloned().ok_or_else(|| {
                PagehandError::invalid_argument(format!(
                    "window index {index} out of range ({} open)",
                    windows.len()
                ))
            })?;
            s.focus_window(&handle)?;
            Ok(handle)
        })
    }

    /// Switch to the first window that is not `original`
    pub fn switch_to_other_window(&mut self, original: &WindowHandle) -> PagehandResult<WindowHandle> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::WindowSwitchFailed, |s| {
            let handle = s
                .driver
                .window_handles()?
                .into_iter()
                .find(|h| h != original)
                .ok_or_else(|| PagehandError::NoSuchWindow {
                    handle: format!("any window other than {original}"),
                })?;
            s.focus_window(&handle)?;
            Ok(handle)
        })
    }

    /// Run `action` and wait for the window it opens
    ///
    /// The handle set is taken before `action` runs; the first handle not in
    /// it is returned. The session stays on its current window.
    ///
    /// # Errors
    ///
    /// [`PagehandError::Timeout`] if no new window appears, or the error
    /// returned by `action`.
    pub fn wait_for_new_window<F>(
        &mut self,
        action: F,
        timeout: Option<Duration>,
    ) -> PagehandResult<WindowHandle>
    where
        F: FnOnce(&mut Self) -> PagehandResult<()>,
    {
        let _session = self.span.clone().entered();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::NewWindowTimeout, FailureCategory::NewWindowFailed),
            |s| {
                let before = WindowSet::new(s.driver.window_handles()?);
                action(s)?;
                let handle = s
                    .wait(
                        &Condition::NewWindow {
                            known: before.into_vec(),
                        },
                        timeout,
                    )?
                    .into_window()?;
                info!(window = %handle, "new window opened");
                Ok(handle)
            },
        )
    }

    /// Run `action`, wait for the window it opens and switch to it
    pub fn switch_to_new_window<F>(
        &mut self,
        action: F,
        timeout: Option<Duration>,
    ) -> PagehandResult<WindowHandle>
    where
        F: FnOnce(&mut Self) -> PagehandResult<()>,
    {
        let _session = self.span.clone().entered();
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::NewWindowTimeout, FailureCategory::NewWindowFailed),
            |s| {
                let handle = s.wait_for_new_window(action, timeout)?;
                s.focus_window(&handle)?;
                Ok(handle)
            },
        )
    }

    /// Open a new tab and switch to it
    pub fn open_new_tab(&mut self) -> PagehandResult<WindowHandle> {
        self.open_new(WindowKind::Tab)
    }

    /// Open a new window and switch to it
    pub fn open_new_window(&mut self) -> PagehandResult<WindowHandle> {
        self.open_new(WindowKind::Window)
    }

    fn open_new(&mut self, kind: WindowKind) -> PagehandResult<WindowHandle> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::WindowSwitchFailed, |s| {
            let handle = s.driver.new_window(kind)?;
            s.focus_window(&handle)?;
            Ok(handle)
        })
    }

    /// Close the active window and move focus
    ///
    /// Focus goes to `preferred` if it is still open, else to the first
    /// remaining window. With no window left the session enters
    /// [`WindowFocus::NoWindow`]; that is not an error.
    pub fn close_current_and_switch_back(
        &mut self,
        preferred: Option<&WindowHandle>,
    ) -> PagehandResult<WindowFocus> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::WindowCloseFailed, |s| {
            let remaining = WindowSet::new(s.driver.close_window()?);
            s.frames.clear();
            let target = match preferred {
                Some(handle) if remaining.contains(handle) => Some(handle.clone()),
                Some(handle) => {
                    warn!(preferred = %handle, "preferred window is closed, using first remaining");
                    remaining.get(0).cloned()
                }
                None => remaining.get(0).cloned(),
            };
            match target {
                Some(handle) => {
                    s.focus_window(&handle)?;
                    Ok(WindowFocus::Window(handle))
                }
                None => {
                    s.no_window = true;
                    info!("closed the last window, no window open");
                    Ok(WindowFocus::NoWindow)
                }
            }
        })
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Wait for an alert and return its text
    pub fn wait_for_alert(&mut self, timeout: Option<Duration>) -> PagehandResult<String> {
        let _session = self.span.clone().entered();
        self.alert_op(timeout, |_, _| Ok(()))
    }

    /// Text of the alert, waiting for it first
    pub fn alert_text(&mut self, timeout: Option<Duration>) -> PagehandResult<String> {
        self.wait_for_alert(timeout)
    }

    /// Accept the alert, waiting for it first; returns its text
    pub fn accept_alert(&mut self, timeout: Option<Duration>) -> PagehandResult<String> {
        let _session = self.span.clone().entered();
        self.alert_op(timeout, |s, text| {
            s.driver.accept_alert()?;
            info!(text, "alert accepted");
            Ok(())
        })
    }

    /// Dismiss the alert, waiting for it first; returns its text
    pub fn dismiss_alert(&mut self, timeout: Option<Duration>) -> PagehandResult<String> {
        let _session = self.span.clone().entered();
        self.alert_op(timeout, |s, text| {
            s.driver.dismiss_alert()?;
            info!(text, "alert dismissed");
            Ok(())
        })
    }

    /// Type into a prompt, waiting for it first
    pub fn send_alert_text(&mut self, input: &str, timeout: Option<Duration>) -> PagehandResult<()> {
        let _session = self.span.clone().entered();
        self.alert_op(timeout, |s, _| s.driver.send_alert_text(input))
            .map(|_| ())
    }

    fn alert_op<F>(&mut self, timeout: Option<Duration>, then: F) -> PagehandResult<String>
    where
        F: FnOnce(&mut Self, &str) -> PagehandResult<()>,
    {
        self.guarded_by(
            |err| timeout_or(err, FailureCategory::AlertTimeout, FailureCategory::AlertFailed),
            |s| {
                let text = s.wait(&Condition::AlertPresent, timeout)?.into_alert_text()?;
                debug!(text = %text, "alert present");
                then(s, &text)?;
                Ok(text)
            },
        )
    }
}
