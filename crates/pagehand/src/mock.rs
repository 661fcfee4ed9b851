//! In-memory browser for unit testing.
//!
//! [`MockDriver`] implements [`WebDriver`] over a small simulated page model:
//! documents nested through frame elements, windows that can open some polls
//! after the click that triggered them, alerts, history and cookies. Elements
//! can be scripted to misbehave the way real pages do:
//!
//! - appear only after a number of lookups ([`MockElement::appears_after`])
//! - re-render on use, so the handle in hand goes stale and a fresh lookup
//!   returns a new one ([`MockElement::stale_on_use`])
//! - reject native clicks as not interactable ([`MockElement::not_interactable`])
//! - stay hidden for a number of visibility checks ([`MockElement::hidden_for`])
//!
//! Every command is recorded in a call history for verification.

use crate::driver::{
    Cookie, ElementHandle, ElementRect, FrameTarget, ScriptArg, WebDriver, WindowHandle,
    WindowKind,
};
use crate::input::ActionSequence;
use crate::locator::{Locator, Selector};
use crate::result::{PagehandError, PagehandResult};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Document id inside the mock page model
pub type DocumentId = usize;

/// Top-level document of every window
pub const TOP_DOCUMENT: DocumentId = 0;

/// Handle of the window a new mock starts with
pub const MAIN_WINDOW: &str = "window-main";

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Scripted element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Lowercase tag name
    pub tag: String,
    /// Rendered text
    pub text: String,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// DOM properties (fall back to attributes)
    pub properties: HashMap<String, String>,
    /// Rendered
    pub displayed: bool,
    /// Accepts input
    pub enabled: bool,
    /// Selected (options, checkboxes)
    pub selected: bool,
    /// Position and size
    pub rect: ElementRect,
    /// Lookups that miss the element before it appears
    pub appears_after: u32,
    /// Interactions that find the handle stale (the element re-renders each time)
    pub stale_uses: u32,
    /// Native clicks rejected as not interactable
    pub not_interactable_clicks: u32,
    /// Script clicks fail too
    pub script_click_fails: bool,
    /// Visibility checks that report hidden before the element shows
    pub hidden_checks: u32,
    /// Text reads before the text changes, and the new text
    pub text_change: Option<(u32, String)>,
    /// Window opened by a click, and the handle polls before it shows up
    pub opens_window: Option<(WindowHandle, u32)>,
    /// Alert opened by a click
    pub opens_alert: Option<String>,
    /// Content document, for frame elements
    pub content: Option<DocumentId>,
}

impl MockElement {
    /// Displayed, enabled element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        let tag: String = tag.into();
        Self {
            tag: tag.to_ascii_lowercase(),
            text: String::new(),
            attributes: HashMap::new(),
            properties: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: false,
            rect: ElementRect::new(0.0, 0.0, 100.0, 20.0),
            appears_after: 0,
            stale_uses: 0,
            not_interactable_clicks: 0,
            script_click_fails: false,
            hidden_checks: 0,
            text_change: None,
            opens_window: None,
            opens_alert: None,
            content: None,
        }
    }

    /// `<button>` with text
    #[must_use]
    pub fn button(text: impl Into<String>) -> Self {
        Self::new("button").with_text(text)
    }

    /// `<input>` with an empty value
    #[must_use]
    pub fn input() -> Self {
        Self::new("input").with_attribute("value", "")
    }

    /// `<option>` with value and text
    #[must_use]
    pub fn option(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new("option")
            .with_attribute("value", value)
            .with_text(text)
    }

    /// Set rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a DOM property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set position and size
    #[must_use]
    pub fn with_rect(mut self, rect: ElementRect) -> Self {
        self.rect = rect;
        self
    }

    /// Not rendered
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Rejects input
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Starts selected
    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Missing from the first `lookups` lookups
    #[must_use]
    pub fn appears_after(mut self, lookups: u32) -> Self {
        self.appears_after = lookups;
        self
    }

    /// Re-render on each of the next `times` interactions
    ///
    /// The handle used goes stale and a fresh lookup yields a new handle.
    /// Visibility, enabled and selected checks are unaffected.
    #[must_use]
    pub fn stale_on_use(mut self, times: u32) -> Self {
        self.stale_uses = times;
        self
    }

    /// Reject the next `times` native clicks
    #[must_use]
    pub fn not_interactable(mut self, times: u32) -> Self {
        self.not_interactable_clicks = times;
        self
    }

    /// Script clicks fail as well
    #[must_use]
    pub fn script_click_fails(mut self) -> Self {
        self.script_click_fails = true;
        self
    }

    /// Report hidden for the first `checks` visibility checks
    #[must_use]
    pub fn hidden_for(mut self, checks: u32) -> Self {
        self.hidden_checks = checks;
        self
    }

    /// Change text after `reads` text reads
    #[must_use]
    pub fn text_after(mut self, reads: u32, text: impl Into<String>) -> Self {
        self.text_change = Some((reads, text.into()));
        self
    }

    /// Clicking opens a window that shows up after `polls` handle polls
    #[must_use]
    pub fn opens_window(mut self, handle: impl Into<String>, polls: u32) -> Self {
        self.opens_window = Some((WindowHandle::new(handle), polls));
        self
    }

    /// Clicking opens an alert
    #[must_use]
    pub fn opens_alert(mut self, text: impl Into<String>) -> Self {
        self.opens_alert = Some(text.into());
        self
    }
}

/// How an alert was closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Accepted, with any prompt input
    Accepted {
        /// Alert text
        text: String,
        /// Prompt input
        input: Option<String>,
    },
    /// Dismissed
    Dismissed {
        /// Alert text
        text: String,
    },
}

/// Click recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    /// Handle that was clicked
    pub element: ElementHandle,
    /// Native pointer click (`false` for script clicks)
    pub native: bool,
}

#[derive(Debug, Clone)]
enum ScriptReply {
    Value(Value),
    Error(String),
}

#[derive(Debug, Clone)]
struct Entry {
    handle: ElementHandle,
    doc: DocumentId,
    parent: Option<ElementHandle>,
    locators: Vec<Locator>,
    detached: bool,
    element: MockElement,
}

impl Entry {
    fn matches(&self, locator: &Locator) -> bool {
        if self.locators.contains(locator) {
            return true;
        }
        match locator.selector() {
            Selector::TagName(tag) => self.element.tag.eq_ignore_ascii_case(tag),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct MockAlert {
    text: String,
    input: Option<String>,
}

/// Mock driver for unit testing
#[derive(Debug)]
pub struct MockDriver {
    entries: Vec<Entry>,
    next_element: u64,
    next_document: DocumentId,
    frame_path: Vec<DocumentId>,
    windows: Vec<WindowHandle>,
    current_window: Option<WindowHandle>,
    pending_windows: Vec<(WindowHandle, u32)>,
    next_window: u32,
    alert: Option<MockAlert>,
    pending_alert: Option<(String, u32)>,
    alert_outcomes: Vec<AlertOutcome>,
    history: Vec<String>,
    history_pos: usize,
    title: String,
    load_polls: u32,
    loading: u32,
    cookies: Vec<Cookie>,
    screenshot_data: Option<Vec<u8>>,
    script_replies: Vec<(String, ScriptReply)>,
    scripts: Vec<String>,
    script_args: Vec<Vec<ScriptArg>>,
    actions: Vec<ActionSequence>,
    clicks: Vec<ClickRecord>,
    scroll_y: f64,
    end_session_on_last_close: bool,
    session_ended: bool,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Blank page in a single window
    #[must_use]
    pub fn new() -> Self {
        let main = WindowHandle::new(MAIN_WINDOW);
        Self {
            entries: Vec::new(),
            next_element: 0,
            next_document: TOP_DOCUMENT + 1,
            frame_path: Vec::new(),
            windows: vec![main.clone()],
            current_window: Some(main),
            pending_windows: Vec::new(),
            next_window: 1,
            alert: None,
            pending_alert: None,
            alert_outcomes: Vec::new(),
            history: vec!["about:blank".to_string()],
            history_pos: 0,
            title: String::new(),
            load_polls: 0,
            loading: 0,
            cookies: Vec::new(),
            screenshot_data: Some(PNG_MAGIC.to_vec()),
            script_replies: Vec::new(),
            scripts: Vec::new(),
            script_args: Vec::new(),
            actions: Vec::new(),
            clicks: Vec::new(),
            scroll_y: 0.0,
            end_session_on_last_close: false,
            session_ended: false,
            call_history: Vec::new(),
        }
    }

    // ========================================================================
    // Page building
    // ========================================================================

    fn next_handle(&mut self) -> ElementHandle {
        self.next_element += 1;
        ElementHandle::new(format!("e-{}", self.next_element))
    }

    /// Add an element to the top-level document
    pub fn add(&mut self, locator: Locator, element: MockElement) -> ElementHandle {
        self.add_in(TOP_DOCUMENT, locator, element)
    }

    /// Add an element to a document
    pub fn add_in(
        &mut self,
        doc: DocumentId,
        locator: Locator,
        element: MockElement,
    ) -> ElementHandle {
        let handle = self.next_handle();
        self.entries.push(Entry {
            handle: handle.clone(),
            doc,
            parent: None,
            locators: vec![locator],
            detached: false,
            element,
        });
        handle
    }

    /// Add a child element, optionally findable by its own locator
    pub fn add_child(
        &mut self,
        parent: &ElementHandle,
        locator: Option<Locator>,
        element: MockElement,
    ) -> ElementHandle {
        let doc = self
            .entries
            .iter()
            .find(|e| &e.handle == parent)
            .map_or(TOP_DOCUMENT, |e| e.doc);
        let handle = self.next_handle();
        self.entries.push(Entry {
            handle: handle.clone(),
            doc,
            parent: Some(parent.clone()),
            locators: locator.into_iter().collect(),
            detached: false,
            element,
        });
        handle
    }

    /// Add a frame element and return it with its content document
    pub fn add_frame(
        &mut self,
        doc: DocumentId,
        locator: Locator,
        element: MockElement,
    ) -> (ElementHandle, DocumentId) {
        let content = self.next_document;
        self.next_document += 1;
        let mut element = element;
        element.content = Some(content);
        let handle = self.add_in(doc, locator, element);
        (handle, content)
    }

    /// Make an element findable by another locator
    pub fn also_matches(&mut self, handle: &ElementHandle, locator: Locator) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.handle == handle) {
            entry.locators.push(locator);
        }
    }

    /// Detach an element; its handle goes stale
    pub fn remove(&mut self, handle: &ElementHandle) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.handle == handle) {
            entry.detached = true;
        }
    }

    /// Mutable access to a live element
    pub fn element_mut(&mut self, handle: &ElementHandle) -> Option<&mut MockElement> {
        self.entries
            .iter_mut()
            .find(|e| &e.handle == handle && !e.detached)
            .map(|e| &mut e.element)
    }

    /// Live element by handle
    #[must_use]
    pub fn element(&self, handle: &ElementHandle) -> Option<&MockElement> {
        self.entries
            .iter()
            .find(|e| &e.handle == handle && !e.detached)
            .map(|e| &e.element)
    }

    /// First live element registered under `locator`, in any document
    #[must_use]
    pub fn live_handle(&self, locator: &Locator) -> Option<ElementHandle> {
        self.entries
            .iter()
            .find(|e| !e.detached && e.locators.contains(locator))
            .map(|e| e.handle.clone())
    }

    /// Register a script reply for scripts containing `fragment`
    pub fn on_script(&mut self, fragment: impl Into<String>, reply: Value) {
        self.script_replies
            .push((fragment.into(), ScriptReply::Value(reply)));
    }

    /// Make scripts containing `fragment` throw
    pub fn fail_script(&mut self, fragment: impl Into<String>, message: impl Into<String>) {
        self.script_replies
            .push((fragment.into(), ScriptReply::Error(message.into())));
    }

    /// Open a window now
    pub fn open_window(&mut self, handle: impl Into<String>) -> WindowHandle {
        let handle = WindowHandle::new(handle);
        self.windows.push(handle.clone());
        handle
    }

    /// Open a window that shows up after `polls` handle polls
    pub fn open_window_later(&mut self, handle: impl Into<String>, polls: u32) {
        self.pending_windows
            .push((WindowHandle::new(handle), polls));
    }

    /// Open an alert now
    pub fn show_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(MockAlert {
            text: text.into(),
            input: None,
        });
    }

    /// Open an alert after `polls` alert polls
    pub fn show_alert_after(&mut self, text: impl Into<String>, polls: u32) {
        self.pending_alert = Some((text.into(), polls));
    }

    /// Navigations report `loading` for this many ready-state polls
    pub fn set_load_polls(&mut self, polls: u32) {
        self.load_polls = polls;
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Make screenshots fail
    pub fn fail_screenshots(&mut self) {
        self.screenshot_data = None;
    }

    /// End the session when its last window closes, as W3C drivers do
    ///
    /// Window commands then fail with an invalid-session error.
    pub fn end_session_on_last_close(&mut self) {
        self.end_session_on_last_close = true;
    }

    fn check_session(&self) -> PagehandResult<()> {
        if self.session_ended {
            return Err(PagehandError::driver("invalid session id: session deleted"));
        }
        Ok(())
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Number of calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    /// Clicks in order
    #[must_use]
    pub fn clicks(&self) -> &[ClickRecord] {
        &self.clicks
    }

    /// Number of successful native clicks
    #[must_use]
    pub fn native_clicks(&self) -> usize {
        self.clicks.iter().filter(|c| c.native).count()
    }

    /// Number of successful script clicks
    #[must_use]
    pub fn script_clicks(&self) -> usize {
        self.clicks.iter().filter(|c| !c.native).count()
    }

    /// Scripts executed, in order
    #[must_use]
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Arguments of each script, aligned with [`scripts`](Self::scripts)
    #[must_use]
    pub fn script_args(&self) -> &[Vec<ScriptArg>] {
        &self.script_args
    }

    /// Action sequences performed, in order
    #[must_use]
    pub fn performed_actions(&self) -> &[ActionSequence] {
        &self.actions
    }

    /// How alerts were closed, in order
    #[must_use]
    pub fn alert_outcomes(&self) -> &[AlertOutcome] {
        &self.alert_outcomes
    }

    /// Document the driver is currently in
    #[must_use]
    pub fn current_document(&self) -> DocumentId {
        self.frame_path.last().copied().unwrap_or(TOP_DOCUMENT)
    }

    /// Open window handles, pending ones excluded
    #[must_use]
    pub fn open_windows(&self) -> &[WindowHandle] {
        &self.windows
    }

    /// Active window, `None` once it was closed
    #[must_use]
    pub fn active_window(&self) -> Option<&WindowHandle> {
        self.current_window.as_ref()
    }

    /// Current value of an input
    #[must_use]
    pub fn value_of(&self, handle: &ElementHandle) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.handle == handle)
            .and_then(|e| e.element.attributes.get("value"))
            .map(String::as_str)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn record(&mut self, call: String) {
        self.call_history.push(call);
    }

    fn lookup_visible(&mut self, idx: usize) -> bool {
        let element = &mut self.entries[idx].element;
        if element.appears_after > 0 {
            element.appears_after -= 1;
            return false;
        }
        true
    }

    fn is_descendant(&self, entry: &Entry, ancestor: &ElementHandle) -> bool {
        let mut parent = entry.parent.clone();
        while let Some(p) = parent {
            if &p == ancestor {
                return true;
            }
            parent = self
                .entries
                .iter()
                .find(|e| e.handle == p)
                .and_then(|e| e.parent.clone());
        }
        false
    }

    /// Resolve a handle for a command, applying staleness rules
    fn live_index(&mut self, handle: &ElementHandle, interaction: bool) -> PagehandResult<usize> {
        let stale = || PagehandError::StaleElement {
            element: handle.id().to_string(),
        };
        let doc = self.current_document();
        let idx = self
            .entries
            .iter()
            .position(|e| &e.handle == handle)
            .ok_or_else(stale)?;
        if self.entries[idx].detached || self.entries[idx].doc != doc {
            return Err(stale());
        }
        if interaction && self.entries[idx].element.stale_uses > 0 {
            let mut fresh = self.entries[idx].clone();
            fresh.element.stale_uses -= 1;
            fresh.handle = self.next_handle();
            self.entries[idx].detached = true;
            for entry in &mut self.entries {
                if entry.parent.as_ref() == Some(handle) {
                    entry.parent = Some(fresh.handle.clone());
                }
            }
            self.entries.insert(idx + 1, fresh);
            return Err(stale());
        }
        Ok(idx)
    }

    fn element_arg(&mut self, args: &[ScriptArg]) -> PagehandResult<Option<usize>> {
        match args.first() {
            Some(ScriptArg::Element(handle)) => {
                let handle = handle.clone();
                self.live_index(&handle, true).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn on_click(&mut self, idx: usize, native: bool) {
        let handle = self.entries[idx].handle.clone();
        self.clicks.push(ClickRecord {
            element: handle,
            native,
        });
        if let Some((window, polls)) = self.entries[idx].element.opens_window.take() {
            self.pending_windows.push((window, polls));
        }
        if let Some(text) = self.entries[idx].element.opens_alert.clone() {
            self.show_alert(text);
        }
        if self.entries[idx].element.tag == "option" {
            let parent = self.entries[idx].parent.clone();
            for entry in &mut self.entries {
                if entry.element.tag == "option" && entry.parent == parent {
                    entry.element.selected = false;
                }
            }
            self.entries[idx].element.selected = true;
        }
    }

    fn navigate_to(&mut self, url: String) {
        self.history.truncate(self.history_pos + 1);
        self.history.push(url);
        self.history_pos = self.history.len() - 1;
        self.loading = self.load_polls;
        self.frame_path.clear();
    }
}

impl WebDriver for MockDriver {
    fn name(&self) -> &str {
        "mock"
    }

    fn find_elements(&mut self, locator: &Locator) -> PagehandResult<Vec<ElementHandle>> {
        self.record(format!("find_elements:{locator}"));
        let doc = self.current_document();
        let candidates: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.detached && e.doc == doc && e.matches(locator))
            .map(|(i, _)| i)
            .collect();
        let mut found = Vec::new();
        for idx in candidates {
            if self.lookup_visible(idx) {
                found.push(self.entries[idx].handle.clone());
            }
        }
        Ok(found)
    }

    fn find_child_elements(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> PagehandResult<Vec<ElementHandle>> {
        self.record(format!("find_child_elements:{parent}:{locator}"));
        self.live_index(parent, false)?;
        let found = self
            .entries
            .iter()
            .filter(|e| !e.detached && e.matches(locator) && self.is_descendant(e, parent))
            .map(|e| e.handle.clone())
            .collect();
        Ok(found)
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> PagehandResult<bool> {
        self.record(format!("is_displayed:{}", element.id()));
        let idx = self.live_index(element, false)?;
        let el = &mut self.entries[idx].element;
        if el.hidden_checks > 0 {
            el.hidden_checks -= 1;
            return Ok(false);
        }
        Ok(el.displayed)
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> PagehandResult<bool> {
        self.record(format!("is_enabled:{}", element.id()));
        let idx = self.live_index(element, false)?;
        Ok(self.entries[idx].element.enabled)
    }

    fn is_selected(&mut self, element: &ElementHandle) -> PagehandResult<bool> {
        self.record(format!("is_selected:{}", element.id()));
        let idx = self.live_index(element, false)?;
        Ok(self.entries[idx].element.selected)
    }

    fn tag_name(&mut self, element: &ElementHandle) -> PagehandResult<String> {
        self.record(format!("tag_name:{}", element.id()));
        let idx = self.live_index(element, true)?;
        Ok(self.entries[idx].element.tag.clone())
    }

    fn text(&mut self, element: &ElementHandle) -> PagehandResult<String> {
        self.record(format!("text:{}", element.id()));
        let idx = self.live_index(element, true)?;
        let el = &mut self.entries[idx].element;
        if let Some((reads, next)) = el.text_change.take() {
            if reads == 0 {
                el.text = next;
            } else {
                el.text_change = Some((reads - 1, next));
            }
        }
        if el.displayed {
            Ok(el.text.clone())
        } else {
            Ok(String::new())
        }
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> PagehandResult<Option<String>> {
        self.record(format!("attribute:{}:{name}", element.id()));
        let idx = self.live_index(element, true)?;
        Ok(self.entries[idx].element.attributes.get(name).cloned())
    }

    fn property(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> PagehandResult<Option<String>> {
        self.record(format!("property:{}:{name}", element.id()));
        let idx = self.live_index(element, true)?;
        let el = &self.entries[idx].element;
        Ok(el
            .properties
            .get(name)
            .or_else(|| el.attributes.get(name))
            .cloned())
    }

    fn rect(&mut self, element: &ElementHandle) -> PagehandResult<ElementRect> {
        self.record(format!("rect:{}", element.id()));
        let idx = self.live_index(element, true)?;
        Ok(self.entries[idx].element.rect)
    }

    fn click(&mut self, element: &ElementHandle) -> PagehandResult<()> {
        self.record(format!("click:{}", element.id()));
        let idx = self.live_index(element, true)?;
        let el = &mut self.entries[idx].element;
        if el.not_interactable_clicks > 0 {
            el.not_interactable_clicks -= 1;
            return Err(PagehandError::NotInteractable {
                target: element.to_string(),
                reason: "element click intercepted".to_string(),
            });
        }
        if !el.displayed {
            return Err(PagehandError::NotInteractable {
                target: element.to_string(),
                reason: "element not visible".to_string(),
            });
        }
        self.on_click(idx, true);
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> PagehandResult<()> {
        self.record(format!("clear:{}", element.id()));
        let idx = self.live_index(element, true)?;
        let el = &mut self.entries[idx].element;
        el.attributes.insert("value".to_string(), String::new());
        el.properties.insert("value".to_string(), String::new());
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> PagehandResult<()> {
        self.record(format!("send_keys:{}", element.id()));
        let idx = self.live_index(element, true)?;
        let el = &mut self.entries[idx].element;
        if !el.enabled {
            return Err(PagehandError::NotInteractable {
                target: element.to_string(),
                reason: "element is disabled".to_string(),
            });
        }
        let mut value = el.attributes.get("value").cloned().unwrap_or_default();
        value.push_str(text);
        el.attributes.insert("value".to_string(), value.clone());
        el.properties.insert("value".to_string(), value);
        Ok(())
    }

    fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> PagehandResult<Value> {
        self.record(format!("execute_script:{script}"));
        self.scripts.push(script.to_string());
        self.script_args.push(args.to_vec());

        let reply = self
            .script_replies
            .iter()
            .find(|(fragment, _)| script.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone());
        match reply {
            Some(ScriptReply::Value(value)) => return Ok(value),
            Some(ScriptReply::Error(message)) => return Err(PagehandError::Script { message }),
            None => {}
        }

        if script.contains(".click()") {
            let idx = self.element_arg(args)?.ok_or_else(|| PagehandError::Script {
                message: "click script needs an element argument".to_string(),
            })?;
            if self.entries[idx].element.script_click_fails {
                return Err(PagehandError::Script {
                    message: "script click had no effect".to_string(),
                });
            }
            self.on_click(idx, false);
            return Ok(Value::Null);
        }
        if script.contains("document.readyState") {
            if self.loading > 0 {
                self.loading -= 1;
                return Ok(json!("loading"));
            }
            return Ok(json!("complete"));
        }
        if script.contains("scrollIntoView") {
            self.element_arg(args)?;
            return Ok(Value::Null);
        }
        if script.contains("innerHeight") {
            return Ok(json!([0.0, self.scroll_y, 1280.0, 800.0]));
        }
        if script.contains("scrollBy") || script.contains("scrollTo") {
            if let Some(ScriptArg::Value(v)) = args.first() {
                if let Some(y) = v.as_f64() {
                    self.scroll_y = if script.contains("scrollBy") {
                        (self.scroll_y + y).max(0.0)
                    } else {
                        y.max(0.0)
                    };
                }
            }
            return Ok(Value::Null);
        }
        Ok(Value::Null)
    }

    fn execute_async_script(&mut self, script: &str, args: &[ScriptArg]) -> PagehandResult<Value> {
        self.record(format!("execute_async_script:{script}"));
        self.scripts.push(script.to_string());
        self.script_args.push(args.to_vec());
        let reply = self
            .script_replies
            .iter()
            .find(|(fragment, _)| script.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone());
        match reply {
            Some(ScriptReply::Value(value)) => Ok(value),
            Some(ScriptReply::Error(message)) => Err(PagehandError::Script { message }),
            None => Ok(Value::Null),
        }
    }

    fn perform_actions(&mut self, actions: &ActionSequence) -> PagehandResult<()> {
        self.record(format!("perform_actions:{}", actions.len()));
        let targets: Vec<ElementHandle> = actions.targets().into_iter().cloned().collect();
        for target in &targets {
            self.live_index(target, true)?;
        }
        self.actions.push(actions.clone());
        Ok(())
    }

    fn window_handles(&mut self) -> PagehandResult<Vec<WindowHandle>> {
        self.record("window_handles".to_string());
        self.check_session()?;
        let mut still_pending = Vec::new();
        for (handle, polls) in self.pending_windows.drain(..) {
            if polls == 0 {
                self.windows.push(handle);
            } else {
                still_pending.push((handle, polls - 1));
            }
        }
        self.pending_windows = still_pending;
        Ok(self.windows.clone())
    }

    fn current_window(&mut self) -> PagehandResult<WindowHandle> {
        self.record("current_window".to_string());
        self.check_session()?;
        self.current_window
            .clone()
            .ok_or_else(|| PagehandError::NoSuchWindow {
                handle: "<closed>".to_string(),
            })
    }

    fn switch_to_window(&mut self, handle: &WindowHandle) -> PagehandResult<()> {
        self.record(format!("switch_to_window:{handle}"));
        if !self.windows.contains(handle) {
            return Err(PagehandError::NoSuchWindow {
                handle: handle.to_string(),
            });
        }
        self.current_window = Some(handle.clone());
        self.frame_path.clear();
        Ok(())
    }

    fn close_window(&mut self) -> PagehandResult<Vec<WindowHandle>> {
        self.record("close_window".to_string());
        self.check_session()?;
        let current = self
            .current_window
            .take()
            .ok_or_else(|| PagehandError::NoSuchWindow {
                handle: "<closed>".to_string(),
            })?;
        self.windows.retain(|w| w != &current);
        self.frame_path.clear();
        if self.windows.is_empty() && self.end_session_on_last_close {
            self.session_ended = true;
        }
        Ok(self.windows.clone())
    }

    fn new_window(&mut self, kind: WindowKind) -> PagehandResult<WindowHandle> {
        self.record(format!("new_window:{kind:?}"));
        self.check_session()?;
        self.next_window += 1;
        let prefix = match kind {
            WindowKind::Tab => "tab",
            WindowKind::Window => "window",
        };
        let handle = WindowHandle::new(format!("{prefix}-{}", self.next_window));
        self.windows.push(handle.clone());
        Ok(handle)
    }

    fn switch_to_frame(&mut self, target: &FrameTarget) -> PagehandResult<()> {
        self.record(format!("switch_to_frame:{target:?}"));
        let content = match target {
            FrameTarget::Index(index) => {
                let doc = self.current_document();
                let frames: Vec<usize> = self
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| !e.detached && e.doc == doc && e.element.content.is_some())
                    .map(|(i, _)| i)
                    .collect();
                let idx = frames
                    .get(usize::from(*index))
                    .copied()
                    .ok_or_else(|| PagehandError::NoSuchFrame {
                        frame: format!("index {index}"),
                    })?;
                if !self.lookup_visible(idx) {
                    return Err(PagehandError::NoSuchFrame {
                        frame: format!("index {index}"),
                    });
                }
                self.entries[idx].element.content
            }
            FrameTarget::Element(handle) => {
                let idx = self.live_index(handle, false)?;
                self.entries[idx].element.content
            }
        };
        let content = content.ok_or_else(|| PagehandError::NoSuchFrame {
            frame: format!("{target:?} is not a frame"),
        })?;
        self.frame_path.push(content);
        Ok(())
    }

    fn switch_to_parent_frame(&mut self) -> PagehandResult<()> {
        self.record("switch_to_parent_frame".to_string());
        self.frame_path.pop();
        Ok(())
    }

    fn switch_to_default_content(&mut self) -> PagehandResult<()> {
        self.record("switch_to_default_content".to_string());
        self.frame_path.clear();
        Ok(())
    }

    fn alert_text(&mut self) -> PagehandResult<String> {
        self.record("alert_text".to_string());
        if self.alert.is_none() {
            if let Some((text, polls)) = self.pending_alert.take() {
                if polls == 0 {
                    self.show_alert(text);
                } else {
                    self.pending_alert = Some((text, polls - 1));
                }
            }
        }
        self.alert
            .as_ref()
            .map(|a| a.text.clone())
            .ok_or(PagehandError::NoSuchAlert)
    }

    fn accept_alert(&mut self) -> PagehandResult<()> {
        self.record("accept_alert".to_string());
        let alert = self.alert.take().ok_or(PagehandError::NoSuchAlert)?;
        self.alert_outcomes.push(AlertOutcome::Accepted {
            text: alert.text,
            input: alert.input,
        });
        Ok(())
    }

    fn dismiss_alert(&mut self) -> PagehandResult<()> {
        self.record("dismiss_alert".to_string());
        let alert = self.alert.take().ok_or(PagehandError::NoSuchAlert)?;
        self.alert_outcomes
            .push(AlertOutcome::Dismissed { text: alert.text });
        Ok(())
    }

    fn send_alert_text(&mut self, text: &str) -> PagehandResult<()> {
        self.record("send_alert_text".to_string());
        let alert = self.alert.as_mut().ok_or(PagehandError::NoSuchAlert)?;
        alert.input = Some(text.to_string());
        Ok(())
    }

    fn goto(&mut self, url: &str) -> PagehandResult<()> {
        self.record(format!("goto:{url}"));
        self.navigate_to(url.to_string());
        Ok(())
    }

    fn refresh(&mut self) -> PagehandResult<()> {
        self.record("refresh".to_string());
        self.loading = self.load_polls;
        self.frame_path.clear();
        Ok(())
    }

    fn back(&mut self) -> PagehandResult<()> {
        self.record("back".to_string());
        self.history_pos = self.history_pos.saturating_sub(1);
        self.loading = self.load_polls;
        self.frame_path.clear();
        Ok(())
    }

    fn forward(&mut self) -> PagehandResult<()> {
        self.record("forward".to_string());
        if self.history_pos + 1 < self.history.len() {
            self.history_pos += 1;
        }
        self.loading = self.load_polls;
        self.frame_path.clear();
        Ok(())
    }

    fn current_url(&mut self) -> PagehandResult<String> {
        self.record("current_url".to_string());
        Ok(self.history[self.history_pos].clone())
    }

    fn title(&mut self) -> PagehandResult<String> {
        self.record("title".to_string());
        Ok(self.title.clone())
    }

    fn cookies(&mut self) -> PagehandResult<Vec<Cookie>> {
        self.record("cookies".to_string());
        Ok(self.cookies.clone())
    }

    fn add_cookie(&mut self, cookie: &Cookie) -> PagehandResult<()> {
        self.record(format!("add_cookie:{}", cookie.name));
        self.cookies.retain(|c| c.name != cookie.name);
        self.cookies.push(cookie.clone());
        Ok(())
    }

    fn delete_cookie(&mut self, name: &str) -> PagehandResult<()> {
        self.record(format!("delete_cookie:{name}"));
        self.cookies.retain(|c| c.name != name);
        Ok(())
    }

    fn delete_all_cookies(&mut self) -> PagehandResult<()> {
        self.record("delete_all_cookies".to_string());
        self.cookies.clear();
        Ok(())
    }

    fn screenshot(&mut self) -> PagehandResult<Vec<u8>> {
        self.record("screenshot".to_string());
        self.screenshot_data
            .clone()
            .ok_or_else(|| PagehandError::Screenshot {
                message: "No mock screenshot set".to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_find_in_document_order() {
            let mut mock = MockDriver::new();
            let loc = Locator::css(".title");
            let a = mock.add(loc.clone(), MockElement::new("div").with_text("Mr."));
            let b = mock.add(loc.clone(), MockElement::new("div").with_text("Mrs."));
            assert_eq!(mock.find_elements(&loc).unwrap(), vec![a, b]);
        }

        #[test]
        fn test_appears_after_lookups() {
            let mut mock = MockDriver::new();
            let loc = Locator::id("late");
            mock.add(loc.clone(), MockElement::new("div").appears_after(2));
            assert!(mock.find_elements(&loc).unwrap().is_empty());
            assert!(mock.find_elements(&loc).unwrap().is_empty());
            assert_eq!(mock.find_elements(&loc).unwrap().len(), 1);
        }

        #[test]
        fn test_children_by_tag() {
            let mut mock = MockDriver::new();
            let select = mock.add(Locator::id("country"), MockElement::new("select"));
            mock.add_child(&select, None, MockElement::option("de", "Germany"));
            mock.add_child(&select, None, MockElement::option("fr", "France"));
            let options = mock
                .find_child_elements(&select, &Locator::tag_name("option"))
                .unwrap();
            assert_eq!(options.len(), 2);
        }

        #[test]
        fn test_was_called() {
            let mut mock = MockDriver::new();
            mock.find_elements(&Locator::id("x")).unwrap();
            assert!(mock.was_called("find_elements"));
            assert!(!mock.was_called("click"));
            assert_eq!(mock.call_count("find_elements"), 1);
        }
    }

    mod staleness_tests {
        use super::*;

        #[test]
        fn test_stale_on_use_rerenders_with_new_handle() {
            let mut mock = MockDriver::new();
            let loc = Locator::id("save");
            let first = mock.add(loc.clone(), MockElement::button("Save").stale_on_use(1));
            let err = mock.click(&first).unwrap_err();
            assert!(err.is_stale());
            let fresh = mock.find_elements(&loc).unwrap();
            assert_eq!(fresh.len(), 1);
            assert_ne!(fresh[0], first);
            mock.click(&fresh[0]).unwrap();
            assert_eq!(mock.native_clicks(), 1);
        }

        #[test]
        fn test_state_checks_do_not_consume_staleness() {
            let mut mock = MockDriver::new();
            let el = mock.add(Locator::id("x"), MockElement::button("X").stale_on_use(1));
            assert!(mock.is_displayed(&el).unwrap());
            assert!(mock.is_enabled(&el).unwrap());
            assert!(mock.click(&el).unwrap_err().is_stale());
        }

        #[test]
        fn test_removed_element_is_stale() {
            let mut mock = MockDriver::new();
            let el = mock.add(Locator::id("x"), MockElement::new("div"));
            mock.remove(&el);
            assert!(mock.text(&el).unwrap_err().is_stale());
        }
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_not_interactable_then_clickable() {
            let mut mock = MockDriver::new();
            let el = mock.add(Locator::id("x"), MockElement::button("X").not_interactable(1));
            assert!(mock.click(&el).unwrap_err().is_not_interactable());
            mock.click(&el).unwrap();
        }

        #[test]
        fn test_script_click_records_non_native() {
            let mut mock = MockDriver::new();
            let el = mock.add(Locator::id("x"), MockElement::button("X"));
            mock.execute_script("arguments[0].click();", &[ScriptArg::Element(el)])
                .unwrap();
            assert_eq!(mock.script_clicks(), 1);
            assert_eq!(mock.native_clicks(), 0);
        }

        #[test]
        fn test_clicking_option_selects_it_exclusively() {
            let mut mock = MockDriver::new();
            let select = mock.add(Locator::id("s"), MockElement::new("select"));
            let a = mock.add_child(&select, None, MockElement::option("a", "A").selected());
            let b = mock.add_child(&select, None, MockElement::option("b", "B"));
            mock.click(&b).unwrap();
            assert!(!mock.element(&a).unwrap().selected);
            assert!(mock.element(&b).unwrap().selected);
        }
    }

    mod context_tests {
        use super::*;

        #[test]
        fn test_frames_scope_lookups() {
            let mut mock = MockDriver::new();
            let (frame, doc) = mock.add_frame(TOP_DOCUMENT, Locator::id("f"), MockElement::new("iframe"));
            let inner = Locator::id("inner");
            mock.add_in(doc, inner.clone(), MockElement::new("div"));
            assert!(mock.find_elements(&inner).unwrap().is_empty());
            mock.switch_to_frame(&FrameTarget::Element(frame)).unwrap();
            assert_eq!(mock.current_document(), doc);
            assert_eq!(mock.find_elements(&inner).unwrap().len(), 1);
            mock.switch_to_parent_frame().unwrap();
            assert_eq!(mock.current_document(), TOP_DOCUMENT);
        }

        #[test]
        fn test_pending_window_appears_after_polls() {
            let mut mock = MockDriver::new();
            mock.open_window_later("popup", 1);
            assert_eq!(mock.window_handles().unwrap().len(), 1);
            assert_eq!(mock.window_handles().unwrap().len(), 2);
        }

        #[test]
        fn test_close_leaves_no_active_window() {
            let mut mock = MockDriver::new();
            assert!(mock.close_window().unwrap().is_empty());
            assert!(mock.active_window().is_none());
            assert!(mock.window_handles().unwrap().is_empty());
        }

        #[test]
        fn test_close_returns_remaining_windows() {
            let mut mock = MockDriver::new();
            mock.open_window("popup");
            mock.switch_to_window(&WindowHandle::new("popup")).unwrap();
            assert_eq!(mock.close_window().unwrap(), vec![WindowHandle::new(MAIN_WINDOW)]);
        }

        #[test]
        fn test_session_ends_with_last_window() {
            let mut mock = MockDriver::new();
            mock.end_session_on_last_close();
            assert!(mock.close_window().unwrap().is_empty());
            assert!(matches!(mock.window_handles(), Err(PagehandError::Driver { .. })));
            assert!(mock.new_window(WindowKind::Tab).is_err());
        }

        #[test]
        fn test_alert_lifecycle() {
            let mut mock = MockDriver::new();
            assert!(matches!(mock.alert_text(), Err(PagehandError::NoSuchAlert)));
            mock.show_alert("Are you sure?");
            mock.send_alert_text("yes").unwrap();
            mock.accept_alert().unwrap();
            assert_eq!(
                mock.alert_outcomes(),
                &[AlertOutcome::Accepted {
                    text: "Are you sure?".to_string(),
                    input: Some("yes".to_string()),
                }]
            );
        }

        #[test]
        fn test_screenshot_failure() {
            let mut mock = MockDriver::new();
            assert!(mock.screenshot().is_ok());
            mock.fail_screenshots();
            assert!(matches!(mock.screenshot(), Err(PagehandError::Screenshot { .. })));
        }
    }
}
