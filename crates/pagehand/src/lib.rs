//! Pagehand: resilient WebDriver interaction engine
//!
//! Pagehand sits between a page object and a browser session and makes each
//! interaction robust against the usual sources of flakiness: elements that
//! are not there yet, elements re-rendered under the caller's feet, overlays
//! that swallow clicks, frames and windows that change the command target.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      PAGEHAND Architecture                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐             │
//! │   │ Page       │    │ Session    │    │ WebDriver  │             │
//! │   │ Object     │───►│ waits +    │───►│ backend    │             │
//! │   │ (caller)   │    │ retry      │    │ (mock/W3C) │             │
//! │   └────────────┘    └─────┬──────┘    └────────────┘             │
//! │                           │                                       │
//! │                     ┌─────▼──────┐                                │
//! │                     │ Diagnostics│  <category>_<ts>.png           │
//! │                     └────────────┘                                │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`ConditionEvaluator`]: polls a typed [`Condition`] until it holds or
//!   the deadline passes
//! - [`StaleRetry`]: re-runs an operation whose element reference went stale
//! - [`Session`]: clicks, typing, reads, dropdowns, gestures, keys, scrolling,
//!   by-text scans, frames, windows, alerts, navigation and cookies
//! - [`Diagnostics`]: screenshot on failure, one per failed public operation

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod capabilities;
mod clock;
mod config;
mod diagnostics;
mod driver;
mod input;
mod interact;
mod keys;
mod locator;
mod logging;
mod navigator;
mod result;
mod retry;
mod session;
mod table;
mod wait;

/// In-memory browser for unit and integration tests
pub mod mock;

/// W3C WebDriver backend (requires a running driver or grid)
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use capabilities::{
    build_capabilities, local_capabilities, remote_capabilities, GridVendor, BUILD_NAME,
    PROJECT_NAME, WINDOW_SIZE,
};
pub use clock::{Clock, FakeClock, SharedClock, SystemClock};
pub use config::{
    BrowserKind, EngineConfig, RemoteConfig, DEFAULT_BASE_URL, DEFAULT_IMPLICIT_WAIT_SECS,
    DEFAULT_SCREENSHOTS_DIR, DEFAULT_WEBDRIVER_URL, FALLBACK_LOOKUP_TIMEOUT_SECS,
};
pub use diagnostics::{screenshot_filename, Diagnostics, FailureCategory};
pub use driver::{
    Cookie, ElementHandle, ElementRect, FrameTarget, ScriptArg, WebDriver, WindowHandle,
    WindowKind,
};
pub use input::{ActionSequence, InputAction, MouseButton, PointerOrigin};
pub use interact::{ElementLocation, ElementSize, ScrollDirection, SelectBy, TextMatch, Viewport};
pub use keys::Key;
pub use locator::{Locator, Selector, W3cQuery};
pub use logging::{init_tracing, init_tracing_with, loggable, session_scope, LogFormat, MASK};
pub use navigator::{BrowsingContext, FrameRef, FrameStack, WindowFocus, WindowSet};
pub use result::{PagehandError, PagehandResult};
pub use retry::{RetryPolicy, StaleRetry, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
pub use session::Session;
pub use table::{Table, TableLocators};
pub use wait::{
    Condition, ConditionEvaluator, ConditionKind, Satisfied, WaitPolicy,
    DEFAULT_EXPLICIT_WAIT_SECS, DEFAULT_POLL_INTERVAL_MS, QUICK_CHECK_TIMEOUT_MS,
};
#[cfg(feature = "webdriver")]
pub use webdriver::FantocciniDriver;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::capabilities::*;
    pub use super::clock::*;
    pub use super::config::*;
    pub use super::diagnostics::*;
    pub use super::driver::*;
    pub use super::input::*;
    pub use super::interact::*;
    pub use super::keys::*;
    pub use super::locator::*;
    pub use super::logging::*;
    pub use super::mock::*;
    pub use super::navigator::*;
    pub use super::result::*;
    pub use super::retry::*;
    pub use super::session::*;
    pub use super::table::*;
    pub use super::wait::*;
    #[cfg(feature = "webdriver")]
    pub use super::webdriver::*;
}
