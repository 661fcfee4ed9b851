//! Locator abstraction for element lookup.
//!
//! A [`Locator`] is an immutable strategy + value pair. The engine never
//! caches the elements a locator resolved to: every operation performs a
//! fresh lookup.
//!
//! Backends speak the W3C WebDriver locator strategies (`css selector`,
//! `xpath`, `link text`), so the richer Selenium-style strategies are
//! translated by [`Selector::to_w3c`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup strategy and value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath expression
    XPath(String),
    /// Element id attribute
    Id(String),
    /// Element name attribute
    Name(String),
    /// Single class name
    ClassName(String),
    /// Tag name (e.g., "option")
    TagName(String),
    /// Exact link text of an anchor
    LinkText(String),
    /// Substring of the link text of an anchor
    PartialLinkText(String),
}

/// Query in one of the strategies every W3C backend supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum W3cQuery {
    /// `css selector`
    Css(String),
    /// `xpath`
    XPath(String),
    /// `link text`
    LinkText(String),
}

impl W3cQuery {
    /// W3C strategy name
    #[must_use]
    pub const fn using(&self) -> &'static str {
        match self {
            Self::Css(_) => "css selector",
            Self::XPath(_) => "xpath",
            Self::LinkText(_) => "link text",
        }
    }

    /// Query value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v) | Self::XPath(v) | Self::LinkText(v) => v,
        }
    }
}

impl Selector {
    /// Strategy name as used in log output
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::ClassName(_) => "class",
            Self::TagName(_) => "tag",
            Self::LinkText(_) => "link",
            Self::PartialLinkText(_) => "partial_link",
        }
    }

    /// Raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v)
            | Self::XPath(v)
            | Self::Id(v)
            | Self::Name(v)
            | Self::ClassName(v)
            | Self::TagName(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v) => v,
        }
    }

    /// Translate to a W3C strategy
    #[must_use]
    pub fn to_w3c(&self) -> W3cQuery {
        match self {
            Self::Css(s) => W3cQuery::Css(s.clone()),
            Self::XPath(s) => W3cQuery::XPath(s.clone()),
            Self::Id(id) => W3cQuery::Css(format!("[id={}]", css_string(id))),
            Self::Name(name) => W3cQuery::Css(format!("[name={}]", css_string(name))),
            Self::ClassName(class) => W3cQuery::Css(format!(".{class}")),
            Self::TagName(tag) => W3cQuery::Css(tag.clone()),
            Self::LinkText(text) => W3cQuery::LinkText(text.clone()),
            Self::PartialLinkText(text) => W3cQuery::XPath(format!(
                ".//a[contains(normalize-space(.), {})]",
                xpath_literal(text)
            )),
        }
    }
}

/// Quote a value as a CSS string literal
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Quote a value as an XPath string literal
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let parts: Vec<String> = value.split('"').map(|p| format!("\"{p}\"")).collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// Immutable element locator with an optional human label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    label: Option<String>,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub const fn new(selector: Selector) -> Self {
        Self {
            selector,
            label: None,
        }
    }

    /// CSS selector locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Selector::Css(selector.into()))
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(Selector::XPath(expression.into()))
    }

    /// Id locator
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Selector::Id(id.into()))
    }

    /// Name attribute locator
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Selector::Name(name.into()))
    }

    /// Class name locator
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::new(Selector::ClassName(class.into()))
    }

    /// Tag name locator
    #[must_use]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::new(Selector::TagName(tag.into()))
    }

    /// Exact link text locator
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Selector::LinkText(text.into()))
    }

    /// Partial link text locator
    #[must_use]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(Selector::PartialLinkText(text.into()))
    }

    /// Attach a human-readable label used in logs and errors
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The label, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether values typed into or read from this element must be masked
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        let hit = |s: &str| s.to_ascii_lowercase().contains("password");
        hit(self.selector.value()) || self.label.as_deref().is_some_and(hit)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}"),
            None => write!(f, "{}={}", self.selector.strategy(), self.selector.value()),
        }
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::new(selector)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod w3c_tests {
        use super::*;

        #[test]
        fn test_css_and_xpath_pass_through() {
            assert_eq!(
                Locator::css("button.primary").selector().to_w3c(),
                W3cQuery::Css("button.primary".to_string())
            );
            assert_eq!(
                Locator::xpath("//div[@id='x']").selector().to_w3c(),
                W3cQuery::XPath("//div[@id='x']".to_string())
            );
        }

        #[test]
        fn test_id_and_name_become_attribute_selectors() {
            assert_eq!(
                Locator::id("login").selector().to_w3c().value(),
                "[id=\"login\"]"
            );
            assert_eq!(
                Locator::name("q\"x").selector().to_w3c().value(),
                "[name=\"q\\\"x\"]"
            );
        }

        #[test]
        fn test_class_and_tag_become_css() {
            assert_eq!(Locator::class_name("card").selector().to_w3c().value(), ".card");
            assert_eq!(Locator::tag_name("option").selector().to_w3c().value(), "option");
        }

        #[test]
        fn test_partial_link_text_becomes_xpath() {
            let q = Locator::partial_link_text("Sign").selector().to_w3c();
            assert_eq!(q.using(), "xpath");
            assert_eq!(q.value(), ".//a[contains(normalize-space(.), \"Sign\")]");
        }

        #[test]
        fn test_xpath_literal_with_both_quotes() {
            assert_eq!(
                xpath_literal("say \"hi\" it's"),
                "concat(\"say \", '\"', \"hi\", '\"', \" it's\")"
            );
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_display_strategy_and_value() {
            assert_eq!(Locator::css("#submit").to_string(), "css=#submit");
            assert_eq!(Locator::link_text("Home").to_string(), "link=Home");
        }

        #[test]
        fn test_display_prefers_label() {
            let loc = Locator::xpath("//button[1]").with_label("Submit button");
            assert_eq!(loc.to_string(), "Submit button");
        }
    }

    mod sensitivity_tests {
        use super::*;

        #[test]
        fn test_password_value_is_sensitive() {
            assert!(Locator::id("Password").is_sensitive());
            assert!(Locator::css("input[type=password]").is_sensitive());
        }

        #[test]
        fn test_password_label_is_sensitive() {
            assert!(Locator::id("pw").with_label("password field").is_sensitive());
        }

        #[test]
        fn test_plain_locator_is_not_sensitive() {
            assert!(!Locator::id("username").is_sensitive());
        }
    }
}
