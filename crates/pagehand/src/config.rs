//! Engine configuration
//!
//! Resolved once, before a session is created, and read-only afterwards.
//! Values come from environment-style keys:
//!
//! | Key | Default |
//! |---|---|
//! | `EXPLICIT_WAIT` | `20` (seconds) |
//! | `IMPLICIT_WAIT` | `10` (seconds) |
//! | `SCREENSHOTS_DIR` | `reports/screenshots` |
//! | `BROWSER` | `chrome` (`chrome`, `firefox`, `edge`) |
//! | `HEADLESS` | `false` |
//! | `UI_BASE_URL` | `https://example.com` |
//! | `WEBDRIVER_URL` | `http://localhost:9515` |
//! | `REMOTE_URL` | unset (local execution) |
//! | `BS_USERNAME`, `BS_ACCESS_KEY` | unset |
//! | `BROWSER_VERSION` | `latest` |
//! | `PLATFORM` | `Windows` |
//! | `RESOLUTION` | `1920x1080` |

use crate::result::{PagehandError, PagehandResult};
use crate::retry::RetryPolicy;
use crate::wait::{
    WaitPolicy, DEFAULT_EXPLICIT_WAIT_SECS, DEFAULT_POLL_INTERVAL_MS, QUICK_CHECK_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default implicit wait in seconds
pub const DEFAULT_IMPLICIT_WAIT_SECS: u64 = 10;

/// Timeout for re-resolving an element before the script click fallback
pub const FALLBACK_LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Default screenshot directory
pub const DEFAULT_SCREENSHOTS_DIR: &str = "reports/screenshots";

/// Default base URL for relative page paths
pub const DEFAULT_BASE_URL: &str = "https://example.com";

/// Default local WebDriver endpoint (chromedriver)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Target browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    #[default]
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge
    Edge,
}

impl BrowserKind {
    /// W3C `browserName`
    #[must_use]
    pub const fn browser_name(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "MicrosoftEdge",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        })
    }
}

impl FromStr for BrowserKind {
    type Err = PagehandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" | "msedge" => Ok(Self::Edge),
            other => Err(PagehandError::Config {
                message: format!("Unsupported browser: {other}"),
            }),
        }
    }
}

/// Remote grid settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Hub URL
    pub url: String,
    /// Grid user name
    pub username: Option<String>,
    /// Grid access key
    pub access_key: Option<String>,
    /// Browser version
    pub browser_version: String,
    /// Platform name
    pub platform: String,
    /// Screen resolution (e.g. `1920x1080`)
    pub resolution: String,
}

impl RemoteConfig {
    /// Remote settings for a hub URL with default version, platform and resolution
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            access_key: None,
            browser_version: "latest".to_string(),
            platform: "Windows".to_string(),
            resolution: "1920x1080".to_string(),
        }
    }

    /// Set grid credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.access_key = Some(access_key.into());
        self
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default timeout for explicit waits
    pub explicit_wait: Duration,
    /// Driver-side implicit wait
    pub implicit_wait: Duration,
    /// Sleep between condition polls
    pub poll_interval: Duration,
    /// Timeout for `is_present`/`is_visible`/`is_invisible`
    pub quick_check_timeout: Duration,
    /// Timeout for re-resolving an element before a script click
    pub fallback_lookup_timeout: Duration,
    /// Stale-element retry budget
    pub retry: RetryPolicy,
    /// Screenshot output directory
    pub screenshots_dir: PathBuf,
    /// Whether failures capture screenshots
    pub capture_screenshots: bool,
    /// Base URL for `open`
    pub base_url: String,
    /// Target browser
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Local WebDriver endpoint
    pub webdriver_url: String,
    /// Remote grid, if any
    pub remote: Option<RemoteConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            explicit_wait: Duration::from_secs(DEFAULT_EXPLICIT_WAIT_SECS),
            implicit_wait: Duration::from_secs(DEFAULT_IMPLICIT_WAIT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            quick_check_timeout: Duration::from_millis(QUICK_CHECK_TIMEOUT_MS),
            fallback_lookup_timeout: Duration::from_secs(FALLBACK_LOOKUP_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            screenshots_dir: PathBuf::from(DEFAULT_SCREENSHOTS_DIR),
            capture_screenshots: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            remote: None,
        }
    }
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> Duration {
    match raw {
        None => Duration::from_secs(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(key, value = %value, default, "invalid wait value, using default");
                Duration::from_secs(default)
            }
        },
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    raw.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
}

impl EngineConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`PagehandError::Config`] for an unsupported browser name.
    pub fn from_env() -> PagehandResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a key lookup; empty values count as unset
    ///
    /// # Errors
    ///
    /// Returns [`PagehandError::Config`] for an unsupported browser name.
    pub fn from_lookup<F>(lookup: F) -> PagehandResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let browser = match get("BROWSER") {
            Some(name) => name.parse()?,
            None => defaults.browser,
        };
        let remote = get("REMOTE_URL").map(|url| RemoteConfig {
            url,
            username: get("BS_USERNAME"),
            access_key: get("BS_ACCESS_KEY"),
            browser_version: get("BROWSER_VERSION").unwrap_or_else(|| "latest".to_string()),
            platform: get("PLATFORM").unwrap_or_else(|| "Windows".to_string()),
            resolution: get("RESOLUTION").unwrap_or_else(|| "1920x1080".to_string()),
        });

        Ok(Self {
            explicit_wait: parse_secs("EXPLICIT_WAIT", get("EXPLICIT_WAIT"), DEFAULT_EXPLICIT_WAIT_SECS),
            implicit_wait: parse_secs("IMPLICIT_WAIT", get("IMPLICIT_WAIT"), DEFAULT_IMPLICIT_WAIT_SECS),
            screenshots_dir: get("SCREENSHOTS_DIR").map_or(defaults.screenshots_dir, PathBuf::from),
            base_url: get("UI_BASE_URL").unwrap_or(defaults.base_url),
            webdriver_url: get("WEBDRIVER_URL").unwrap_or(defaults.webdriver_url),
            headless: parse_flag(get("HEADLESS")),
            browser,
            remote,
            ..defaults
        })
    }

    /// Set explicit wait
    #[must_use]
    pub const fn with_explicit_wait(mut self, timeout: Duration) -> Self {
        self.explicit_wait = timeout;
        self
    }

    /// Set implicit wait
    #[must_use]
    pub const fn with_implicit_wait(mut self, timeout: Duration) -> Self {
        self.implicit_wait = timeout;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set quick-check timeout
    #[must_use]
    pub const fn with_quick_check_timeout(mut self, timeout: Duration) -> Self {
        self.quick_check_timeout = timeout;
        self
    }

    /// Set stale-element retry policy
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Capture failure screenshots into `dir`
    ///
    /// Turns capture back on after [`without_screenshots`](Self::without_screenshots).
    #[must_use]
    pub fn with_screenshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots_dir = dir.into();
        self.capture_screenshots = true;
        self
    }

    /// Disable failure screenshots
    #[must_use]
    pub fn without_screenshots(mut self) -> Self {
        self.capture_screenshots = false;
        self
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set browser
    #[must_use]
    pub const fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Run on a remote grid
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Wait policy for a call, falling back to the explicit wait
    #[must_use]
    pub fn wait_policy(&self, timeout: Option<Duration>) -> WaitPolicy {
        WaitPolicy::new(timeout.unwrap_or(self.explicit_wait))
            .with_poll_interval(self.poll_interval)
    }
}
