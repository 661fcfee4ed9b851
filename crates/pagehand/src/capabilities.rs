//! W3C capabilities for a new browser session
//!
//! Local sessions get browser-specific options (`goog:chromeOptions`,
//! `moz:firefoxOptions`, `ms:edgeOptions`). Remote sessions add the grid's
//! vendor block, chosen from the hub URL:
//!
//! - BrowserStack: `bstack:options`
//! - LambdaTest: `LT:Options`

use crate::config::{BrowserKind, EngineConfig, RemoteConfig};
use serde_json::{json, Map, Value};
use std::fmt;

/// Project name reported to remote grids
pub const PROJECT_NAME: &str = "Automation Framework";

/// Build name reported to remote grids
pub const BUILD_NAME: &str = "Build 1.0";

/// Window size for every session
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Remote grid vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridVendor {
    /// BrowserStack Automate
    BrowserStack,
    /// LambdaTest
    LambdaTest,
}

impl GridVendor {
    /// Vendor for a hub URL; anything that is not LambdaTest is treated as BrowserStack
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        if url.to_ascii_lowercase().contains("lambdatest") {
            Self::LambdaTest
        } else {
            Self::BrowserStack
        }
    }

    /// Capability key of the vendor block
    #[must_use]
    pub const fn options_key(self) -> &'static str {
        match self {
            Self::BrowserStack => "bstack:options",
            Self::LambdaTest => "LT:Options",
        }
    }
}

impl fmt::Display for GridVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BrowserStack => "browserstack",
            Self::LambdaTest => "lambdatest",
        })
    }
}

fn chromium_args(headless: bool) -> Vec<String> {
    let mut args = Vec::new();
    if headless {
        args.push("--headless=new".to_string());
    }
    args.extend(
        ["--no-sandbox", "--disable-dev-shm-usage", "--log-level=3"]
            .iter()
            .map(|a| (*a).to_string()),
    );
    args.push(format!("--window-size={},{}", WINDOW_SIZE.0, WINDOW_SIZE.1));
    args
}

/// Capabilities for a local driver
#[must_use]
pub fn local_capabilities(config: &EngineConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".into(), json!(config.browser.browser_name()));
    match config.browser {
        BrowserKind::Chrome => {
            caps.insert(
                "goog:chromeOptions".into(),
                json!({ "args": chromium_args(config.headless) }),
            );
        }
        BrowserKind::Edge => {
            caps.insert(
                "ms:edgeOptions".into(),
                json!({ "args": chromium_args(config.headless) }),
            );
        }
        BrowserKind::Firefox => {
            let args: Vec<&str> = if config.headless { vec!["-headless"] } else { Vec::new() };
            caps.insert("moz:firefoxOptions".into(), json!({ "args": args }));
        }
    }
    caps
}

/// Capabilities for a remote grid session
#[must_use]
pub fn remote_capabilities(
    config: &EngineConfig,
    remote: &RemoteConfig,
    session_name: &str,
) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".into(), json!(config.browser.browser_name()));
    caps.insert("browserVersion".into(), json!(remote.browser_version));
    caps.insert("platformName".into(), json!(remote.platform));

    let vendor = GridVendor::from_url(&remote.url);
    let options = match vendor {
        GridVendor::BrowserStack => json!({
            "userName": remote.username,
            "accessKey": remote.access_key,
            "resolution": remote.resolution,
            "projectName": PROJECT_NAME,
            "buildName": BUILD_NAME,
            "sessionName": session_name,
            "local": "false",
            "seleniumVersion": "4.0.0",
        }),
        GridVendor::LambdaTest => json!({
            "username": remote.username,
            "accessKey": remote.access_key,
            "resolution": remote.resolution,
            "project": PROJECT_NAME,
            "build": BUILD_NAME,
            "name": session_name,
            "w3c": true,
        }),
    };
    caps.insert(vendor.options_key().into(), options);
    caps
}

/// Capabilities for the configured target, local or remote
#[must_use]
pub fn build_capabilities(config: &EngineConfig, session_name: &str) -> Map<String, Value> {
    match &config.remote {
        Some(remote) => remote_capabilities(config, remote, session_name),
        None => local_capabilities(config),
    }
}
