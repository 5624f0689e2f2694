//! Browser host: binds the controller to the live document.
//!
//! Only built with the `web` feature for `wasm32-unknown-unknown`. The
//! controller's timer queue is driven by a single real timeout that is
//! re-armed for the next due task after every event.

use crate::config::Config;
use crate::dashboard::{Dashboard, SEARCH_INPUT_ID};
use crate::error::{LinkDeckError, Result};
use crate::page::{ImageState, Insert, NodeId, PageView, TextSegment, HIGHLIGHT_CLASS};
use crate::platform::{Environment, PreferenceStore, ScrollMetrics};
use crate::render::CONFIG_ELEMENT_ID;
use chrono::NaiveDateTime;
use gloo::events::EventListener;
use gloo::storage::{LocalStorage, Storage};
use gloo::timers::callback::Timeout;
use js_sys::Reflect;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, Node, Window};

fn js_error(context: &str, err: &JsValue) -> LinkDeckError {
    LinkDeckError::Generic(format!("{context}: {err:?}"))
}

/// Logs a rejected DOM call; setters have no caller to report to
fn check<T>(context: &str, result: std::result::Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{context} failed: {e:?}");
            None
        }
    }
}

/// Routes `tracing` events to the browser console. Later calls keep the
/// first subscriber.
pub fn init_tracing() {
    if tracing_wasm::try_set_as_global_default().is_err() {
        tracing::debug!("Console subscriber already installed");
    }
}

static NEXT_PAGE: AtomicU32 = AtomicU32::new(0);

/// The live document, with nodes interned into stable [`NodeId`]s.
///
/// Each interned node carries its slot under a property private to this
/// page, so lookups never scan the table. Removed nodes give their slot
/// back.
pub struct DomPage {
    document: Document,
    key: JsValue,
    nodes: RefCell<Vec<Option<Node>>>,
    free: RefCell<Vec<usize>>,
}

impl DomPage {
    #[must_use]
    pub fn new(document: Document) -> Self {
        let page = NEXT_PAGE.fetch_add(1, Ordering::Relaxed);
        Self {
            document,
            key: JsValue::from_str(&format!("__linkdeckNode{page}")),
            nodes: RefCell::new(Vec::new()),
            free: RefCell::new(Vec::new()),
        }
    }

    fn slot_of(&self, node: &Node) -> Option<usize> {
        let stored = Reflect::get(node, &self.key).ok()?.as_f64()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = stored as usize;
        let nodes = self.nodes.borrow();
        nodes
            .get(index)?
            .as_ref()
            .filter(|n| n.is_same_node(Some(node)))
            .map(|_| index)
    }

    fn intern(&self, node: Node) -> NodeId {
        if let Some(index) = self.slot_of(&node) {
            return NodeId(index);
        }
        let mut nodes = self.nodes.borrow_mut();
        let reused = self.free.borrow_mut().pop();
        let index = match reused.and_then(|i| nodes.get_mut(i).map(|slot| (i, slot))) {
            Some((i, slot)) => {
                *slot = Some(node.clone());
                i
            }
            None => {
                nodes.push(Some(node.clone()));
                nodes.len() - 1
            }
        };
        #[allow(clippy::cast_precision_loss)]
        let tag = JsValue::from_f64(index as f64);
        check("tag node", Reflect::set(&node, &self.key, &tag));
        NodeId(index)
    }

    /// Frees the slots of `node` and of its interned descendants
    fn release(&self, node: &Node) {
        let mut detached = vec![node.clone()];
        if let Some(element) = node.dyn_ref::<Element>() {
            if let Ok(list) = element.query_selector_all("*") {
                detached.extend((0..list.length()).filter_map(|i| list.get(i)));
            }
        }
        for node in detached {
            let Some(index) = self.slot_of(&node) else {
                continue;
            };
            if let Some(slot) = self.nodes.borrow_mut().get_mut(index) {
                *slot = None;
            }
            self.free.borrow_mut().push(index);
            check("untag node", Reflect::delete_property(&node, &self.key));
        }
    }

    /// Number of nodes currently holding a slot
    #[must_use]
    pub fn interned(&self) -> usize {
        self.nodes.borrow().iter().flatten().count()
    }

    /// The DOM node behind an id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes.borrow().get(id.0).cloned().flatten()
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.node(id).and_then(|n| n.dyn_into::<Element>().ok())
    }

    fn html_element(&self, id: NodeId) -> Option<HtmlElement> {
        self.node(id).and_then(|n| n.dyn_into::<HtmlElement>().ok())
    }

    fn collect(&self, list: &web_sys::NodeList) -> Vec<NodeId> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|n| self.intern(n))
            .collect()
    }

    fn text_nodes(node: &Node, out: &mut Vec<Node>) {
        let children = node.child_nodes();
        for i in 0..children.length() {
            let Some(child) = children.get(i) else {
                continue;
            };
            if child.node_type() == Node::TEXT_NODE {
                out.push(child);
            } else {
                Self::text_nodes(&child, out);
            }
        }
    }
}

impl PageView for DomPage {
    fn root(&self) -> NodeId {
        match self.document.document_element() {
            Some(root) => self.intern(root.into()),
            None => self.intern(self.document.clone().into()),
        }
    }

    fn body(&self) -> NodeId {
        match self.document.body() {
            Some(body) => self.intern(body.into()),
            None => self.root(),
        }
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.document
            .get_element_by_id(id)
            .map(|e| self.intern(e.into()))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(|e| self.intern(e.into()))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.document
            .query_selector_all(selector)
            .map(|list| self.collect(&list))
            .unwrap_or_default()
    }

    fn query_all_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.element(scope)
            .and_then(|e| e.query_selector_all(selector).ok())
            .map(|list| self.collect(&list))
            .unwrap_or_default()
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| js_error("createElement", &e))?;
        Ok(self.intern(element.into()))
    }

    fn insert(&mut self, node: NodeId, at: Insert) -> Result<()> {
        let missing = || LinkDeckError::MissingElement(format!("node {}", node.0));
        let child = self.node(node).ok_or_else(missing)?;
        let result = match at {
            Insert::Prepend(parent) => {
                let parent = self.node(parent).ok_or_else(missing)?;
                let first = parent.first_child();
                parent.insert_before(&child, first.as_ref())
            }
            Insert::Append(parent) => {
                let parent = self.node(parent).ok_or_else(missing)?;
                parent.append_child(&child)
            }
            Insert::Before { parent, reference } => {
                let parent = self.node(parent).ok_or_else(missing)?;
                let reference = self.node(reference).ok_or_else(missing)?;
                parent.insert_before(&child, Some(&reference))
            }
        };
        result.map(|_| ()).map_err(|e| js_error("insertBefore", &e))
    }

    fn remove(&mut self, node: NodeId) {
        let Some(node) = self.node(node) else {
            return;
        };
        if let Some(parent) = node.parent_node() {
            check("removeChild", parent.remove_child(&node));
        }
        self.release(&node);
    }

    fn text_content(&self, node: NodeId) -> String {
        self.node(node)
            .and_then(|n| n.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(node) = self.node(node) {
            node.set_text_content(Some(text));
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node).and_then(|e| e.get_attribute(name))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            check("setAttribute", element.set_attribute(name, value));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            check("classList.add", element.class_list().add_1(class));
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            check("classList.remove", element.class_list().remove_1(class));
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.html_element(node)
            .and_then(|e| e.style().get_property_value(property).ok())
            .filter(|v| !v.is_empty())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.html_element(node) {
            check("style.setProperty", element.style().set_property(property, value));
        }
    }

    fn input_value(&self, node: NodeId) -> Option<String> {
        self.node(node)
            .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn resolved_href(&self, node: NodeId) -> Option<String> {
        let href = self.attribute(node, "href")?;
        let base = self.document.base_uri().ok().flatten()?;
        url::Url::parse(&base)
            .and_then(|base| base.join(&href))
            .ok()
            .map(String::from)
    }

    fn image_state(&self, node: NodeId) -> ImageState {
        self.node(node)
            .and_then(|n| n.dyn_into::<HtmlImageElement>().ok())
            .map(|img| ImageState {
                complete: img.complete(),
                natural_width: img.natural_width(),
            })
            .unwrap_or_default()
    }

    fn highlight(&mut self, node: NodeId, full_text: &str, segments: &[TextSegment]) -> bool {
        let Some(scope) = self.node(node) else {
            return false;
        };
        if full_text.is_empty() {
            return false;
        }
        let mut runs = Vec::new();
        Self::text_nodes(&scope, &mut runs);
        let Some((run, pos, text)) = runs.into_iter().find_map(|run| {
            let text = run.text_content().unwrap_or_default();
            text.find(full_text).map(|pos| (run, pos, text))
        }) else {
            return false;
        };
        let Some(parent) = run.parent_node() else {
            return false;
        };

        let prefix = &text[..pos];
        let suffix = &text[pos + full_text.len()..];
        let mut replacement: Vec<Node> = Vec::new();
        if !prefix.is_empty() {
            replacement.push(self.document.create_text_node(prefix).into());
        }
        for segment in segments {
            match segment {
                TextSegment::Plain(plain) => {
                    replacement.push(self.document.create_text_node(plain).into());
                }
                TextSegment::Highlight(marked) => {
                    let Ok(span) = self.document.create_element("span") else {
                        return false;
                    };
                    span.set_class_name(HIGHLIGHT_CLASS);
                    span.set_text_content(Some(marked));
                    replacement.push(span.into());
                }
            }
        }
        if !suffix.is_empty() {
            replacement.push(self.document.create_text_node(suffix).into());
        }

        for new_node in &replacement {
            if parent.insert_before(new_node, Some(&run)).is_err() {
                return false;
            }
        }
        parent.remove_child(&run).is_ok()
    }

    fn clear_highlights(&mut self, node: NodeId) {
        let Some(scope) = self.element(node) else {
            return;
        };
        let Ok(spans) = scope.query_selector_all(&format!("span.{HIGHLIGHT_CLASS}")) else {
            return;
        };
        for i in 0..spans.length() {
            let Some(span) = spans.get(i) else {
                continue;
            };
            let Some(parent) = span.parent_node() else {
                continue;
            };
            let text = span.text_content().unwrap_or_default();
            let plain = self.document.create_text_node(&text);
            if check("replaceChild", parent.replace_child(&plain, &span)).is_some() {
                self.release(&span);
            }
        }
        scope.normalize();
    }
}

/// Window services of the running browser
pub struct BrowserEnvironment {
    window: Window,
}

impl BrowserEnvironment {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Environment for BrowserEnvironment {
    fn local_now(&self) -> Result<NaiveDateTime> {
        let date = js_sys::Date::new_0();
        let offset_ms = date.get_timezone_offset() * 60_000.0;
        #[allow(clippy::cast_possible_truncation)]
        let local_ms = (date.get_time() - offset_ms) as i64;
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(local_ms)
            .map(|utc| utc.naive_utc())
            .ok_or_else(|| LinkDeckError::Format(format!("time out of range: {local_ms}")))
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .map_or(false, |mq| mq.matches())
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let document = self.window.document();
        let root = document.as_ref().and_then(Document::document_element);
        let body = document.as_ref().and_then(Document::body);
        ScrollMetrics {
            scroll_top: root.as_ref().map_or(0.0, |r| f64::from(r.scroll_top())),
            body_scroll_top: body.as_ref().map_or(0.0, |b| f64::from(b.scroll_top())),
            scroll_height: root.as_ref().map_or(0.0, |r| f64::from(r.scroll_height())),
            client_height: root.as_ref().map_or(0.0, |r| f64::from(r.client_height())),
            page_y_offset: self.window.scroll_y().unwrap_or(0.0),
        }
    }

    fn scroll_to_top(&mut self) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn open_in_new_tab(&mut self, url: &str) -> Result<()> {
        self.window
            .open_with_url_and_target(url, "_blank")
            .map(|_| ())
            .map_err(|e| js_error("window.open", &e))
    }
}

/// `localStorage`-backed preference store
#[derive(Debug, Default)]
pub struct LocalStore;

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| LinkDeckError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| LinkDeckError::Storage(format!("{e:?}")))
    }
}

type BrowserDashboard = Dashboard<DomPage, BrowserEnvironment, LocalStore>;

/// Owns the controller and the single real timer driving its queue
struct Driver<E, S> {
    dashboard: RefCell<Dashboard<DomPage, E, S>>,
    timer: RefCell<Option<Timeout>>,
    /// The timeout whose callback is running; dropped on the next firing
    spent: RefCell<Option<Timeout>>,
    started_at: f64,
}

impl<E, S> Driver<E, S>
where
    E: Environment + 'static,
    S: PreferenceStore + 'static,
{
    fn new(dashboard: Dashboard<DomPage, E, S>) -> Rc<Self> {
        Rc::new(Self {
            dashboard: RefCell::new(dashboard),
            timer: RefCell::new(None),
            spent: RefCell::new(None),
            started_at: js_sys::Date::now(),
        })
    }

    fn elapsed_ms(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let elapsed = (js_sys::Date::now() - self.started_at).max(0.0) as u64;
        elapsed
    }

    /// Runs due tasks and arms the timeout for the next one
    fn pump(self: &Rc<Self>) {
        let now = self.elapsed_ms();
        self.dashboard.borrow_mut().advance_to(now);
        let next = self.dashboard.borrow().next_due();
        let timer = next.map(|due| {
            let delay = u32::try_from(due.saturating_sub(now)).unwrap_or(u32::MAX);
            let driver = Rc::clone(self);
            Timeout::new(delay, move || driver.fire())
        });
        // Dropping a pending Timeout cancels it
        self.timer.replace(timer);
    }

    fn fire(self: &Rc<Self>) {
        let running = self.timer.take();
        self.spent.replace(running);
        self.pump();
    }

    fn on<F>(self: &Rc<Self>, target: &web_sys::EventTarget, event: &'static str, handler: F)
    where
        F: Fn(&mut Dashboard<DomPage, E, S>) + 'static,
    {
        let driver = Rc::clone(self);
        EventListener::new(target, event, move |_| {
            handler(&mut *driver.dashboard.borrow_mut());
            driver.pump();
        })
        .forget();
    }
}

/// Settles an icon that finished before its listeners were attached
fn sync_settled_icon<E, S>(
    dashboard: &mut Dashboard<DomPage, E, S>,
    id: NodeId,
    icon: &HtmlImageElement,
) where
    E: Environment,
    S: PreferenceStore,
{
    if !icon.complete() {
        return;
    }
    if icon.natural_width() > 0 {
        dashboard.icon_loaded(id);
    } else {
        dashboard.icon_failed(id);
    }
}

fn load_config(document: &Document) -> Config {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return Config::default();
    };
    let text = element.text_content().unwrap_or_default();
    match serde_json::from_str::<Config>(&text) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Embedded configuration unreadable, using defaults: {e}");
            Config::default()
        }
    }
}

/// Entry point run when the wasm module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_tracing();

    let window = gloo::utils::window();
    let document = gloo::utils::document();
    let config = load_config(&document);

    let dashboard = Dashboard::new(
        DomPage::new(document.clone()),
        BrowserEnvironment::new(window.clone()),
        LocalStore,
        config,
    );
    let driver = Driver::new(dashboard);

    driver.dashboard.borrow_mut().init();

    driver.on(&window, "scroll", BrowserDashboard::on_scroll);

    let (back_to_top, icons) = {
        let dashboard = driver.dashboard.borrow();
        let page = dashboard.page();
        let back_to_top = dashboard
            .back_to_top_control()
            .and_then(|id| page.element(id));
        let icons: Vec<(NodeId, Element)> = dashboard
            .watched_icons()
            .into_iter()
            .filter_map(|id| page.element(id).map(|e| (id, e)))
            .collect();
        (back_to_top, icons)
    };

    if let Some(button) = back_to_top {
        driver.on(&button, "click", BrowserDashboard::back_to_top_clicked);
    }

    for (id, icon) in icons {
        driver.on(&icon, "load", move |d| d.icon_loaded(id));
        driver.on(&icon, "error", move |d| d.icon_failed(id));
        // Images that settled before the listeners existed
        if let Ok(img) = icon.dyn_into::<HtmlImageElement>() {
            sync_settled_icon(&mut *driver.dashboard.borrow_mut(), id, &img);
        }
    }

    if let Some(input) = document.get_element_by_id(SEARCH_INPUT_ID) {
        driver.on(&input, "input", |d| {
            d.search_from_input();
        });
    }
    if let Some(toggle) = document.get_element_by_id(crate::theme::MODE_TOGGLE_ID) {
        driver.on(&toggle, "click", |d| {
            d.toggle_theme();
        });
    }
    if let Some(random) = document.get_element_by_id("randomLink") {
        driver.on(&random, "click", |d| {
            d.random_link();
        });
    }

    driver.pump();
    tracing::info!("Link directory controller started");
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::config::{Category, Link};
    use crate::icons::IconLoadState;
    use crate::platform::{FixedEnvironment, MemoryStore};
    use crate::render::render_page;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    type TestDashboard = Dashboard<DomPage, FixedEnvironment, MemoryStore>;

    fn config() -> Config {
        let link = |name: &str, url: &str| Link {
            name: name.to_string(),
            url: url.to_string(),
            icon: None,
        };
        Config {
            categories: vec![
                Category {
                    name: "Code".to_string(),
                    links: vec![
                        link("GitHub", "https://github.com"),
                        link("GitLab", "https://gitlab.com"),
                        link("Example", "https://example.com"),
                    ],
                },
                Category {
                    name: "Search".to_string(),
                    links: vec![link("Google", "https://www.google.com")],
                },
            ],
            ..Config::default()
        }
    }

    /// Loads the rendered page into a fixture element of the test document,
    /// replacing whatever an earlier test mounted
    fn mount(config: &Config) -> Document {
        let document = gloo::utils::document();
        let fixture = match document.get_element_by_id("fixture") {
            Some(fixture) => fixture,
            None => {
                let fixture = document.create_element("div").unwrap();
                fixture.set_id("fixture");
                document.body().unwrap().append_child(&fixture).unwrap();
                fixture
            }
        };
        fixture.set_inner_html(&render_page(config).unwrap());
        document
    }

    fn dashboard() -> TestDashboard {
        let config = config();
        let document = mount(&config);
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap();
        let mut dashboard = Dashboard::with_rng(
            DomPage::new(document),
            FixedEnvironment::new(now),
            MemoryStore::new(),
            config,
            StdRng::seed_from_u64(11),
        );
        dashboard.init();
        dashboard
    }

    fn link(name: &str) -> HtmlElement {
        let links = gloo::utils::document()
            .query_selector_all(".link-item")
            .unwrap();
        (0..links.length())
            .filter_map(|i| links.get(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .find(|e| e.text_content().as_deref() == Some(name))
            .unwrap()
    }

    fn display(element: &HtmlElement) -> String {
        element.style().get_property_value("display").unwrap()
    }

    #[wasm_bindgen_test]
    fn test_git_query_on_live_document() {
        let mut dashboard = dashboard();
        let outcome = dashboard.search("git").unwrap();
        assert_eq!(outcome.matched_links, 2);

        for name in ["GitHub", "GitLab"] {
            let element = link(name);
            assert_eq!(display(&element), "flex");
            let spans = element.query_selector_all("span.highlight").unwrap();
            assert_eq!(spans.length(), 1);
            assert_eq!(spans.get(0).unwrap().text_content().as_deref(), Some("Git"));
        }
        assert_eq!(display(&link("Example")), "none");
        assert_eq!(display(&link("Google")), "none");
        let document = gloo::utils::document();
        assert!(document.query_selector(".no-results").unwrap().is_none());
    }

    #[wasm_bindgen_test]
    fn test_unmatched_query_places_one_notice_before_footer() {
        let mut dashboard = dashboard();
        dashboard.search("zzzempty").unwrap();
        dashboard.search("zzzempty").unwrap();

        let document = gloo::utils::document();
        assert_eq!(document.query_selector_all(".no-results").unwrap().length(), 1);
        let footer = document.query_selector("footer").unwrap().unwrap();
        let notice = footer.previous_element_sibling().unwrap();
        assert!(notice.class_list().contains("no-results"));
        let categories = document.query_selector_all(".category").unwrap();
        for i in 0..categories.length() {
            let category = categories.get(i).unwrap().dyn_into::<HtmlElement>().unwrap();
            assert_eq!(display(&category), "none");
        }
    }

    #[wasm_bindgen_test]
    fn test_clearing_restores_original_markup() {
        let mut dashboard = dashboard();
        let before: Vec<(String, u32)> = ["GitHub", "GitLab", "Example", "Google"]
            .iter()
            .map(|name| {
                let element = link(name);
                (element.inner_html(), element.child_nodes().length())
            })
            .collect();
        let icon = link("Google").query_selector("img").unwrap().unwrap();

        dashboard.search("o").unwrap();
        dashboard.search("gi").unwrap();
        dashboard.search("").unwrap();

        let after: Vec<(String, u32)> = ["GitHub", "GitLab", "Example", "Google"]
            .iter()
            .map(|name| {
                let element = link(name);
                assert_eq!(display(&element), "flex");
                (element.inner_html(), element.child_nodes().length())
            })
            .collect();
        assert_eq!(after, before);
        // highlighting works on text runs and leaves the icon node in place
        let icon_after = link("Google").query_selector("img").unwrap().unwrap();
        assert!(icon.is_same_node(Some(&icon_after)));
    }

    #[wasm_bindgen_test]
    fn test_removed_nodes_give_back_their_slots() {
        let mut page = DomPage::new(mount(&config()));
        let toggle = page.by_id("modeToggle").unwrap();
        assert_eq!(page.by_id("modeToggle"), Some(toggle));

        let baseline = page.interned();
        let toast = page.create_element("div").unwrap();
        let line = page.create_element("p").unwrap();
        page.insert(line, Insert::Append(toast)).unwrap();
        let body = page.body();
        page.insert(toast, Insert::Append(body)).unwrap();
        assert_eq!(page.interned(), baseline + 3);

        page.remove(toast);
        assert_eq!(page.interned(), baseline + 1);
        let reused = page.create_element("div").unwrap();
        assert!(reused == toast || reused == line);
        assert_eq!(page.by_id("modeToggle"), Some(toggle));
    }

    #[wasm_bindgen_test]
    fn test_pages_over_one_document_keep_separate_ids() {
        let document = mount(&config());
        let first = DomPage::new(document.clone());
        let second = DomPage::new(document);
        let links = first.query_all(".link-item");
        second.query_all(".category");
        second.query_all(".link-item");
        assert_eq!(first.query_all(".link-item"), links);
    }

    #[wasm_bindgen_test]
    fn test_rejected_dom_calls_are_contained() {
        let mut page = DomPage::new(mount(&config()));
        let toggle = page.by_id("modeToggle").unwrap();
        page.set_attribute(toggle, "1bad", "x");
        page.add_class(toggle, "");
        assert_eq!(page.attribute(toggle, "1bad"), None);
        assert_eq!(page.attribute(toggle, "class"), None);
    }

    #[wasm_bindgen_test]
    fn test_icon_settled_before_listeners_is_resolved() {
        let mut dashboard = dashboard();
        let id = dashboard.watched_icons()[0];
        let icon = dashboard
            .page()
            .element(id)
            .unwrap()
            .dyn_into::<HtmlImageElement>()
            .unwrap();
        // without a source the image is complete with no pixels
        icon.remove_attribute("src").unwrap();
        sync_settled_icon(&mut dashboard, id, &icon);

        assert_eq!(dashboard.icon_state(id), Some(IconLoadState::Failed));
        assert_eq!(icon.get_attribute("src").as_deref(), Some("favicon.svg"));
    }

    #[wasm_bindgen_test]
    fn test_driver_arms_next_timer_after_each_firing() {
        let driver = Driver::new(dashboard());
        assert!(driver.timer.borrow().is_none());

        driver.pump();
        assert!(driver.timer.borrow().is_some());
        assert!(driver.dashboard.borrow().next_due().is_some());

        driver.fire();
        assert!(driver.spent.borrow().is_some());
        assert!(driver.timer.borrow().is_some());
    }

    #[wasm_bindgen_test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
        let mut page = DomPage::new(mount(&config()));
        crate::boundary::report(
            &mut page,
            crate::config::Locale::EnUs,
            &LinkDeckError::NoLinks,
            "getRandomLink function",
        );
        let document = gloo::utils::document();
        assert!(document.query_selector(".error-boundary").unwrap().is_some());
    }
}
