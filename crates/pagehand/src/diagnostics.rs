//! Diagnostics Hook
//!
//! Captures a screenshot when an operation fails for good. Capture is
//! best-effort: a failing screenshot is logged and swallowed so the original
//! error always reaches the caller unchanged.
//!
//! Files are named `<category>_<YYYYmmdd_HHMMSS_micro>.png`.

use crate::config::EngineConfig;
use crate::driver::WebDriver;
use crate::result::{PagehandError, PagehandResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Why a screenshot was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureCategory {
    /// Click failed on both tiers
    ClickFailed,
    /// Typing failed
    InputTextFailed,
    /// Reading text failed
    GetTextFailed,
    /// Reading an attribute failed
    GetAttributeFailed,
    /// Dropdown selection failed
    DropdownSelectFailed,
    /// Hover failed
    HoverFailed,
    /// Double click failed
    DoubleClickFailed,
    /// Context click failed
    RightClickFailed,
    /// Drag and drop failed
    DragDropFailed,
    /// Page scroll failed
    ScrollFailed,
    /// No candidate matched a by-text scan
    ClickByTextFailed,
    /// File upload failed
    UploadFileFailed,
    /// Key press failed
    KeyPressFailed,
    /// Explicit wait timed out
    TimeoutException,
    /// Explicit wait failed for another reason
    WaitException,
    /// No alert appeared
    AlertTimeout,
    /// Alert handling failed
    AlertFailed,
    /// Frame never became available
    FrameSwitchTimeout,
    /// Frame switch failed for another reason
    FrameSwitchFailed,
    /// No new window appeared
    NewWindowTimeout,
    /// New window detection failed for another reason
    NewWindowFailed,
    /// Switching windows failed
    WindowSwitchFailed,
    /// Closing a window failed
    WindowCloseFailed,
    /// Document never finished loading
    PageLoadTimeout,
    /// Navigation failed
    NavigationFailed,
    /// Page script threw
    JavascriptError,
    /// Asynchronous page script threw or never called back
    AsyncJavascriptError,
}

impl FailureCategory {
    /// Filename prefix
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClickFailed => "click_failed",
            Self::InputTextFailed => "input_text_failed",
            Self::GetTextFailed => "get_text_failed",
            Self::GetAttributeFailed => "get_attribute_failed",
            Self::DropdownSelectFailed => "dropdown_select_failed",
            Self::HoverFailed => "hover_failed",
            Self::DoubleClickFailed => "double_click_failed",
            Self::RightClickFailed => "right_click_failed",
            Self::DragDropFailed => "drag_drop_failed",
            Self::ScrollFailed => "scroll_failed",
            Self::ClickByTextFailed => "click_by_text_failed",
            Self::UploadFileFailed => "upload_file_failed",
            Self::KeyPressFailed => "key_press_failed",
            Self::TimeoutException => "timeout_exception",
            Self::WaitException => "wait_exception",
            Self::AlertTimeout => "alert_timeout",
            Self::AlertFailed => "alert_failed",
            Self::FrameSwitchTimeout => "frame_switch_timeout",
            Self::FrameSwitchFailed => "frame_switch_failed",
            Self::NewWindowTimeout => "new_window_timeout",
            Self::NewWindowFailed => "new_window_failed",
            Self::WindowSwitchFailed => "window_switch_failed",
            Self::WindowCloseFailed => "window_close_failed",
            Self::PageLoadTimeout => "page_load_timeout",
            Self::NavigationFailed => "navigation_failed",
            Self::JavascriptError => "javascript_error",
            Self::AsyncJavascriptError => "async_javascript_error",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screenshot filename for a category at the current local time
#[must_use]
pub fn screenshot_filename(category: FailureCategory) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%6f");
    format!("{category}_{stamp}.png")
}

/// Writes failure screenshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    dir: PathBuf,
    enabled: bool,
}

impl Diagnostics {
    /// Capture into `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// Never capture
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Settings from the engine configuration
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            dir: config.screenshots_dir.clone(),
            enabled: config.capture_screenshots,
        }
    }

    /// Output directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether capture is on
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Capture a screenshot for `category`, returning the written path
    ///
    /// Never fails: problems are logged and yield `None`.
    pub fn capture<D: WebDriver + ?Sized>(
        &self,
        driver: &mut D,
        category: FailureCategory,
    ) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        match self.write(driver, category) {
            Ok(path) => {
                info!(category = %category, path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(err) => {
                warn!(category = %category, error = %err, "failure screenshot not captured");
                None
            }
        }
    }

    fn write<D: WebDriver + ?Sized>(
        &self,
        driver: &mut D,
        category: FailureCategory,
    ) -> PagehandResult<PathBuf> {
        let png = driver.screenshot().map_err(|err| PagehandError::Screenshot {
            message: err.to_string(),
        })?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(screenshot_filename(category));
        std::fs::write(&path, png)?;
        Ok(path)
    }

    /// Screenshot of the current page as base64 PNG, for embedding in reports
    pub fn capture_base64<D: WebDriver + ?Sized>(&self, driver: &mut D) -> Option<String> {
        match driver.screenshot() {
            Ok(png) => Some(STANDARD.encode(png)),
            Err(err) => {
                warn!(error = %err, "base64 screenshot not captured");
                None
            }
        }
    }
}
