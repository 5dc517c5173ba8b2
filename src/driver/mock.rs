//! In-memory driver for development and testing
//!
//! [`MockDriver`] keeps a flat list of [`MockNode`]s keyed by the exact
//! [`Locator`] a page object will ask for. Click and hover hooks mutate the
//! document the same way a real page would (open a modal, load another page),
//! and programmable faults reproduce the flakiness a live browser shows.

use super::scripts;
use super::traits::{ElementHandle, ScriptArg, WebDriver, WebElement};
use crate::error::{Error, Result};
use crate::Locator;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Hook run against the document when a node is clicked or hovered
pub type DomHook = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// Hook run after the driver navigates to a URL
pub type NavigateHook = Arc<dyn Fn(&mut MockDom, &str) + Send + Sync>;

/// 1x1 transparent PNG
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89,
];

/// Fault injected into a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFault {
    /// Node is replaced in the DOM; the handle that was clicked goes stale
    Stale,
    /// Another element receives the click
    Intercepted,
    /// Driver round-trip fails
    Driver,
}

impl MockFault {
    fn to_error(self, what: &str) -> Error {
        match self {
            MockFault::Stale => Error::stale(format!("{} is no longer attached", what)),
            MockFault::Intercepted => {
                Error::intercepted(format!("{} is obscured by another element", what))
            }
            MockFault::Driver => Error::driver(format!("lost connection while clicking {}", what)),
        }
    }
}

/// One element of the mock document
#[derive(Clone)]
pub struct MockNode {
    id: u64,
    generation: u64,
    locator: Locator,
    text: String,
    value: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    selected: bool,
    checkbox: bool,
    appears_at: Option<Instant>,
    visible_at: Option<Instant>,
    click_faults: VecDeque<MockFault>,
    persistent_fault: Option<MockFault>,
    on_click: Option<DomHook>,
    on_hover: Option<DomHook>,
    native_hover: bool,
    files: Vec<String>,
}

impl fmt::Debug for MockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockNode")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("locator", &self.locator)
            .field("text", &self.text)
            .field("value", &self.value)
            .field("displayed", &self.displayed)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl MockNode {
    /// A visible, enabled node answering to `locator`
    pub fn new(locator: Locator) -> Self {
        Self {
            id: 0,
            generation: 0,
            locator,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: false,
            checkbox: false,
            appears_at: None,
            visible_at: None,
            click_faults: VecDeque::new(),
            persistent_fault: None,
            on_click: None,
            on_hover: None,
            native_hover: true,
            files: Vec::new(),
        }
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn value<S: Into<String>>(mut self, value: S) -> Self {
        self.value = value.into();
        self
    }

    pub fn attr<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Present in the DOM but not rendered
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Clicking toggles the selected state
    pub fn checkbox(mut self) -> Self {
        self.checkbox = true;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Not attached to the DOM until `delay` has passed
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_at = Some(Instant::now() + delay);
        self
    }

    /// Attached at once but not rendered until `delay` has passed
    pub fn visible_after(mut self, delay: Duration) -> Self {
        self.visible_at = Some(Instant::now() + delay);
        self
    }

    /// Fail the next clicks with these faults, in order
    pub fn fail_clicks<I: IntoIterator<Item = MockFault>>(mut self, faults: I) -> Self {
        self.click_faults.extend(faults);
        self
    }

    /// Fail every click with `fault`
    pub fn always_fail(mut self, fault: MockFault) -> Self {
        self.persistent_fault = Some(fault);
        self
    }

    pub fn on_click<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(hook));
        self
    }

    pub fn on_hover<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.on_hover = Some(Arc::new(hook));
        self
    }

    /// Reject native pointer moves so only the scripted hover reaches it
    pub fn without_native_hover(mut self) -> Self {
        self.native_hover = false;
        self
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    fn is_attached(&self, now: Instant) -> bool {
        self.appears_at.map_or(true, |at| at <= now)
    }

    fn is_rendered(&self, now: Instant) -> bool {
        self.displayed && self.visible_at.map_or(true, |at| at <= now)
    }

    fn handle_id(&self) -> String {
        format!("{}:{}", self.id, self.generation)
    }
}

/// Mutable state of the mock document
#[derive(Default)]
pub struct MockDom {
    url: String,
    nodes: Vec<MockNode>,
    next_id: u64,
    alert: Option<String>,
    handled_alerts: Vec<String>,
    scroll_y: i64,
    scripts: Vec<String>,
    clicks: HashMap<Locator, u32>,
    hovers: HashMap<Locator, u32>,
    scrolls: HashMap<Locator, u32>,
    on_navigate: Option<NavigateHook>,
    quit_calls: u32,
    closed: bool,
}

impl fmt::Debug for MockDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDom")
            .field("url", &self.url)
            .field("nodes", &self.nodes.len())
            .field("alert", &self.alert)
            .field("closed", &self.closed)
            .finish()
    }
}

impl MockDom {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url<S: Into<String>>(&mut self, url: S) {
        self.url = url.into();
    }

    /// Attach a node; returns its internal id
    pub fn insert(&mut self, mut node: MockNode) -> u64 {
        self.next_id += 1;
        node.id = self.next_id;
        self.nodes.push(node);
        self.next_id
    }

    /// Detach every node, as a full page load would
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Detach every node matching `locator`
    pub fn remove(&mut self, locator: &Locator) {
        self.nodes.retain(|n| &n.locator != locator);
    }

    /// Whether any node answers to `locator`, attached or not
    pub fn contains(&self, locator: &Locator) -> bool {
        self.nodes.iter().any(|n| &n.locator == locator)
    }

    /// Number of nodes answering to `locator`
    pub fn count(&self, locator: &Locator) -> usize {
        self.nodes.iter().filter(|n| &n.locator == locator).count()
    }

    /// Current value of the first node answering to `locator`
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| &n.locator == locator)
            .map(|n| n.value.clone())
    }

    /// Selected state of the first node answering to `locator`
    pub fn is_selected(&self, locator: &Locator) -> bool {
        self.nodes
            .iter()
            .find(|n| &n.locator == locator)
            .map_or(false, |n| n.selected)
    }

    /// Files attached to the first node answering to `locator`
    pub fn files_of(&self, locator: &Locator) -> Vec<String> {
        self.nodes
            .iter()
            .find(|n| &n.locator == locator)
            .map(|n| n.files.clone())
            .unwrap_or_default()
    }

    pub fn set_text<S: Into<String>>(&mut self, locator: &Locator, text: S) {
        let text = text.into();
        for node in self.nodes.iter_mut().filter(|n| &n.locator == locator) {
            node.text = text.clone();
        }
    }

    pub fn set_displayed(&mut self, locator: &Locator, displayed: bool) {
        for node in self.nodes.iter_mut().filter(|n| &n.locator == locator) {
            node.displayed = displayed;
            node.visible_at = None;
        }
    }

    /// Replace the nodes matching `locator` with fresh copies, leaving
    /// previously resolved handles stale
    pub fn refresh(&mut self, locator: &Locator) {
        for node in self.nodes.iter_mut().filter(|n| &n.locator == locator) {
            node.generation += 1;
        }
    }

    pub fn open_alert<S: Into<String>>(&mut self, text: S) {
        self.alert = Some(text.into());
    }

    pub fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    pub fn set_scroll_y(&mut self, offset: i64) {
        self.scroll_y = offset;
    }

    /// Markup standing in for the serialized document: one element per
    /// attached node, tagged with its locator
    pub fn page_source(&self) -> String {
        let now = Instant::now();
        let body: String = self
            .nodes
            .iter()
            .filter(|n| n.is_attached(now))
            .map(|n| format!("<div data-locator=\"{}\">{}</div>", n.locator, n.text))
            .collect();
        format!("<html><body>{}</body></html>", body)
    }

    fn hover_node(&mut self, index: usize) {
        let locator = self.nodes[index].locator.clone();
        *self.hovers.entry(locator).or_insert(0) += 1;
        if let Some(hook) = self.nodes[index].on_hover.clone() {
            hook(self);
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn node_index(&self, handle_id: &str) -> Result<usize> {
        let (id, generation) = handle_id
            .split_once(':')
            .and_then(|(id, generation)| Some((id.parse::<u64>().ok()?, generation.parse::<u64>().ok()?)))
            .ok_or_else(|| Error::internal(format!("Malformed mock element id: {}", handle_id)))?;

        self.nodes
            .iter()
            .position(|n| n.id == id && n.generation == generation)
            .ok_or_else(|| Error::stale(format!("mock element {} is no longer attached", handle_id)))
    }
}

/// Driver over an in-memory document
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    dom: Arc<Mutex<MockDom>>,
}

impl MockDriver {
    /// Create an empty mock driver
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockDom> {
        lock_dom(&self.dom)
    }

    /// Run `f` against the document
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        f(&mut *self.lock())
    }

    /// Attach a node to the document
    pub fn insert(&self, node: MockNode) -> u64 {
        self.lock().insert(node)
    }

    /// Install the hook run after every navigation
    pub fn on_navigate<F>(&self, hook: F)
    where
        F: Fn(&mut MockDom, &str) + Send + Sync + 'static,
    {
        self.lock().on_navigate = Some(Arc::new(hook));
    }

    /// Click attempts made against `locator`, faulted ones included
    pub fn click_attempts(&self, locator: &Locator) -> u32 {
        self.lock().clicks.get(locator).copied().unwrap_or(0)
    }

    pub fn hover_count(&self, locator: &Locator) -> u32 {
        self.lock().hovers.get(locator).copied().unwrap_or(0)
    }

    pub fn scroll_count(&self, locator: &Locator) -> u32 {
        self.lock().scrolls.get(locator).copied().unwrap_or(0)
    }

    /// Every script passed to `execute_script`, in order
    pub fn scripts(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    /// Alerts accepted or dismissed so far
    pub fn handled_alerts(&self) -> Vec<String> {
        self.lock().handled_alerts.clone()
    }

    pub fn quit_calls(&self) -> u32 {
        self.lock().quit_calls
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn element(&self, node: &MockNode) -> MockElement {
        MockElement {
            dom: Arc::clone(&self.dom),
            handle_id: node.handle_id(),
            locator: node.locator.clone(),
            label: node.locator.to_string(),
        }
    }
}

fn lock_dom(dom: &Mutex<MockDom>) -> MutexGuard<'_, MockDom> {
    dom.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl WebDriver for MockDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut dom = self.lock();
        dom.ensure_open()?;
        debug!("Mock navigation to {}", url);
        dom.url = url.to_string();
        dom.scroll_y = 0;
        if let Some(hook) = dom.on_navigate.clone() {
            hook(&mut *dom, url);
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let dom = self.lock();
        dom.ensure_open()?;
        Ok(dom.url.clone())
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let dom = self.lock();
        dom.ensure_open()?;
        let now = Instant::now();
        Ok(dom
            .nodes
            .iter()
            .filter(|n| &n.locator == locator && n.is_attached(now))
            .map(|n| Arc::new(self.element(n)) as ElementHandle)
            .collect())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        let mut dom = self.lock();
        dom.ensure_open()?;
        dom.scripts.push(script.to_string());

        let target = match args.first() {
            Some(ScriptArg::Element(element)) => Some(dom.node_index(element.element_id())?),
            _ => None,
        };

        match (script, target) {
            (scripts::SCROLL_INTO_VIEW, Some(index)) => {
                let locator = dom.nodes[index].locator.clone();
                *dom.scrolls.entry(locator).or_insert(0) += 1;
                Ok(Value::Null)
            }
            (scripts::HOVER, Some(index)) => {
                dom.hover_node(index);
                Ok(Value::Null)
            }
            (scripts::SCROLL_TO_TOP, _) => {
                dom.scroll_y = 0;
                Ok(Value::Null)
            }
            (scripts::SCROLL_TO_BOTTOM, _) => {
                dom.scroll_y = 10_000;
                Ok(Value::Null)
            }
            (scripts::SCROLL_OFFSET, _) => Ok(json!(dom.scroll_y)),
            (scripts::PAGE_SOURCE, _) => Ok(json!(dom.page_source())),
            _ => Ok(Value::Null),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.lock().ensure_open()?;
        Ok(PIXEL_PNG.to_vec())
    }

    async fn alert_text(&self) -> Result<Option<String>> {
        let dom = self.lock();
        dom.ensure_open()?;
        Ok(dom.alert.clone())
    }

    async fn accept_alert(&self) -> Result<()> {
        let mut dom = self.lock();
        dom.ensure_open()?;
        let text = dom.alert.take().ok_or(Error::AlertNotPresent)?;
        dom.handled_alerts.push(text);
        Ok(())
    }

    async fn dismiss_alert(&self) -> Result<()> {
        self.accept_alert().await
    }

    async fn quit(&self) -> Result<()> {
        let mut dom = self.lock();
        dom.quit_calls += 1;
        dom.closed = true;
        Ok(())
    }
}

/// Handle to a [`MockNode`]
#[derive(Debug, Clone)]
pub struct MockElement {
    dom: Arc<Mutex<MockDom>>,
    handle_id: String,
    locator: Locator,
    label: String,
}

impl MockElement {
    fn read<R>(&self, f: impl FnOnce(&MockNode) -> R) -> Result<R> {
        let dom = lock_dom(&self.dom);
        dom.ensure_open()?;
        let index = dom.node_index(&self.handle_id)?;
        Ok(f(&dom.nodes[index]))
    }

    fn write<R>(&self, f: impl FnOnce(&mut MockNode) -> R) -> Result<R> {
        let mut dom = lock_dom(&self.dom);
        dom.ensure_open()?;
        let index = dom.node_index(&self.handle_id)?;
        Ok(f(&mut dom.nodes[index]))
    }
}

#[async_trait]
impl WebElement for MockElement {
    fn element_id(&self) -> &str {
        &self.handle_id
    }

    async fn is_displayed(&self) -> Result<bool> {
        let now = Instant::now();
        self.read(|n| n.is_rendered(now))
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.read(|n| n.enabled)
    }

    async fn is_selected(&self) -> Result<bool> {
        self.read(|n| n.selected)
    }

    async fn click(&self) -> Result<()> {
        let mut dom = lock_dom(&self.dom);
        dom.ensure_open()?;
        // counted per locator so clicks on stale handles still register
        *dom.clicks.entry(self.locator.clone()).or_insert(0) += 1;
        let index = dom.node_index(&self.handle_id)?;

        let node = &mut dom.nodes[index];
        if let Some(fault) = node.click_faults.pop_front() {
            if fault == MockFault::Stale {
                node.generation += 1;
            }
            return Err(fault.to_error(&self.label));
        }
        if let Some(fault) = node.persistent_fault {
            return Err(fault.to_error(&self.label));
        }
        if !node.is_rendered(Instant::now()) || !node.enabled {
            return Err(Error::driver(format!("{} is not interactable", self.label)));
        }
        if node.checkbox {
            node.selected = !node.selected;
        }

        if let Some(hook) = node.on_click.clone() {
            hook(&mut *dom);
        }
        Ok(())
    }

    async fn hover(&self) -> Result<()> {
        let mut dom = lock_dom(&self.dom);
        dom.ensure_open()?;
        let index = dom.node_index(&self.handle_id)?;
        if !dom.nodes[index].native_hover {
            return Err(Error::driver(format!("pointer cannot reach {}", self.label)));
        }
        dom.hover_node(index);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.write(|n| n.value.clear())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.write(|n| n.value.push_str(text))
    }

    async fn text(&self) -> Result<String> {
        let now = Instant::now();
        self.read(|n| if n.is_rendered(now) { n.text.clone() } else { String::new() })
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.read(|n| match name {
            "value" => Some(n.value.clone()),
            _ => n.attributes.get(name).cloned(),
        })
    }

    async fn select_by_value(&self, value: &str) -> Result<()> {
        self.write(|n| n.value = value.to_string())
    }

    async fn set_files(&self, paths: &[String]) -> Result<()> {
        self.write(|n| {
            n.files = paths.to_vec();
            n.value = paths.last().cloned().unwrap_or_default();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: Locator = Locator::id("go");

    #[tokio::test]
    async fn test_find_elements_matches_locator() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).text("Go"));
        driver.insert(MockNode::new(Locator::id("other")));

        let found = driver.find_elements(&BUTTON).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text().await.unwrap(), "Go");
    }

    #[tokio::test]
    async fn test_stale_fault_invalidates_handle() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).fail_clicks([MockFault::Stale]));

        let first = driver.find_elements(&BUTTON).await.unwrap().remove(0);
        assert!(matches!(first.click().await, Err(Error::StaleElement(_))));
        assert!(matches!(first.click().await, Err(Error::StaleElement(_))));

        let fresh = driver.find_elements(&BUTTON).await.unwrap().remove(0);
        fresh.click().await.unwrap();
        assert_eq!(driver.click_attempts(&BUTTON), 3);
    }

    #[tokio::test]
    async fn test_click_on_detached_handle_is_counted() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON));

        let handle = driver.find_elements(&BUTTON).await.unwrap().remove(0);
        driver.with_dom(|dom| dom.refresh(&BUTTON));
        assert!(matches!(handle.click().await, Err(Error::StaleElement(_))));
        assert!(matches!(handle.click().await, Err(Error::StaleElement(_))));
        assert_eq!(driver.click_attempts(&BUTTON), 2);
    }

    #[tokio::test]
    async fn test_click_hook_mutates_dom() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).on_click(|dom| {
            dom.insert(MockNode::new(Locator::css(".modal-content")));
        }));

        let button = driver.find_elements(&BUTTON).await.unwrap().remove(0);
        button.click().await.unwrap();

        let modal = driver.find_elements(&Locator::css(".modal-content")).await.unwrap();
        assert_eq!(modal.len(), 1);
    }

    #[tokio::test]
    async fn test_quit_closes_driver() {
        let driver = MockDriver::new();
        driver.quit().await.unwrap();

        assert!(driver.is_closed());
        assert!(matches!(driver.current_url().await, Err(Error::SessionClosed)));
    }

    #[tokio::test]
    async fn test_alert_lifecycle() {
        let driver = MockDriver::new();
        assert!(matches!(driver.accept_alert().await, Err(Error::AlertNotPresent)));

        driver.with_dom(|dom| dom.open_alert("Press OK to proceed!"));
        assert_eq!(
            driver.alert_text().await.unwrap().as_deref(),
            Some("Press OK to proceed!")
        );
        driver.accept_alert().await.unwrap();
        assert_eq!(driver.alert_text().await.unwrap(), None);
        assert_eq!(driver.handled_alerts(), vec!["Press OK to proceed!".to_string()]);
    }
}
