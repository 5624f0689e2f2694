//! In-memory document implementing [`PageView`].
//!
//! Holds a small element/text tree with ids, classes, attributes, inline
//! styles and image load state. Supports the simple selectors the controller
//! uses: `tag`, `.class`, `#id`, compounds such as `span.highlight`, and
//! descendant chains such as `.links a`.

use crate::config::Config;
use crate::error::{LinkDeckError, Result};
use crate::page::{ImageState, Insert, NodeId, PageView, TextSegment, HIGHLIGHT_CLASS};
use std::collections::BTreeMap;
use url::Url;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: BTreeMap<String, String>,
        style: BTreeMap<String, String>,
        image: ImageState,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Element tree standing in for a rendered page
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    base_url: Option<Url>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// An empty `<html><body></body></html>` document
    #[must_use]
    pub fn new() -> Self {
        let mut page = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            base_url: None,
        };
        let root = page.element("html");
        let body = page.element("body");
        page.attach(body, root);
        page.root = root;
        page.body = body;
        page
    }

    /// Builds the same structure `render::render_page` emits for `config`
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut page = Self::new();
        let root = page.root;
        page.set_attribute(root, "lang", config.locale.tag());

        let container = page.element_with_class("div", "container");
        page.attach(container, page.body);

        let header = page.element("header");
        page.attach(header, container);
        let title = page.element("h1");
        page.set_text(title, &config.site_name);
        page.attach(title, header);
        for id in ["current-time", "current-date"] {
            let slot = page.element("div");
            page.set_attribute(slot, "id", id);
            page.attach(slot, header);
        }
        let input = page.element("input");
        page.set_attribute(input, "id", "searchInput");
        page.set_attribute(input, "type", "text");
        page.attach(input, header);
        let toggle = page.element("button");
        page.set_attribute(toggle, "id", "modeToggle");
        page.attach(toggle, header);
        let random = page.element("button");
        page.set_attribute(random, "id", "randomLink");
        page.attach(random, header);

        for category in &config.categories {
            let section = page.element_with_class("div", "category");
            page.attach(section, container);
            let heading = page.element("h2");
            page.set_text(heading, &category.name);
            page.attach(heading, section);
            let links = page.element_with_class("div", "links");
            page.attach(links, section);

            for link in &category.links {
                let anchor = page.element_with_class("a", "link-item");
                page.set_attribute(anchor, "href", &link.url);
                page.set_attribute(anchor, "target", "_blank");
                page.attach(anchor, links);
                let icon = page.element_with_class("img", "link-icon");
                let src = link.icon.as_deref().unwrap_or(&config.fallback_icon);
                page.set_attribute(icon, "src", src);
                page.set_attribute(icon, "alt", "");
                page.attach(icon, anchor);
                page.append_text(anchor, &link.name);
            }
        }

        let footer = page.element("footer");
        page.attach(footer, container);
        page
    }

    /// Sets the base URL used to resolve relative `href`s
    #[must_use]
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    /// Creates a detached element
    pub fn element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            image: ImageState::default(),
        })
    }

    /// Creates a detached element carrying one class
    pub fn element_with_class(&mut self, tag: &str, class: &str) -> NodeId {
        let node = self.element(tag);
        self.add_class(node, class);
        node
    }

    /// Appends `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.attach(child, parent);
    }

    /// Appends a text node to `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.push(NodeKind::Text(text.to_string()));
        self.attach(node, parent);
        node
    }

    /// Records the load state an image reports
    pub fn set_image_state(&mut self, node: NodeId, state: ImageState) {
        if let Some(NodeKind::Element { image, .. }) = self.kind_mut(node) {
            *image = state;
        }
    }

    /// Whether the node is reachable from the document root
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    /// Child nodes in order
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Serializes the children of `node` as HTML
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        match &n.kind {
            NodeKind::Text(text) => out.push_str(&escape(text)),
            NodeKind::Element {
                tag,
                classes,
                attributes,
                style,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
                }
                for (name, value) in attributes {
                    out.push_str(&format!(" {name}=\"{}\"", escape(value)));
                }
                if !style.is_empty() {
                    let rules: Vec<String> =
                        style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                    out.push_str(&format!(" style=\"{}\"", rules.join("; ")));
                }
                out.push('>');
                if tag == "img" || tag == "input" {
                    return;
                }
                for &child in &n.children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn kind_mut(&mut self, node: NodeId) -> Option<&mut NodeKind> {
        self.nodes.get_mut(node.0).map(|n| &mut n.kind)
    }

    fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.detach(child);
        if let Some(n) = self.nodes.get_mut(child.0) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(child);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = None;
        }
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    fn text_of(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    fn compound_matches(&self, node: NodeId, compound: &Compound) -> bool {
        let Some(NodeKind::Element {
            tag,
            classes,
            attributes,
            ..
        }) = self.nodes.get(node.0).map(|n| &n.kind)
        else {
            return false;
        };
        if compound.tag.as_ref().is_some_and(|t| t != tag) {
            return false;
        }
        if compound
            .id
            .as_ref()
            .is_some_and(|id| attributes.get("id") != Some(id))
        {
            return false;
        }
        compound.classes.iter().all(|c| classes.contains(c))
    }

    fn selector_matches(&self, node: NodeId, chain: &[Compound], scope: NodeId) -> bool {
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !self.compound_matches(node, last) {
            return false;
        }
        let mut remaining = ancestors;
        let mut current = self.parent(node);
        while let Some((wanted, rest)) = remaining.split_last() {
            let mut found = false;
            while let Some(candidate) = current {
                if candidate == scope {
                    current = None;
                    break;
                }
                current = self.parent(candidate);
                if self.compound_matches(candidate, wanted) {
                    found = true;
                    break;
                }
            }
            if !found {
                return false;
            }
            remaining = rest;
        }
        true
    }

    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let chain = parse_selector(selector);
        // Scope boundary for ancestor matching; the root scope admits everything.
        let boundary = if scope == self.root {
            NodeId(usize::MAX)
        } else {
            scope
        };
        let mut matches: Vec<NodeId> = Vec::new();
        if scope == self.root && self.selector_matches(scope, &chain, boundary) {
            matches.push(scope);
        }
        matches.extend(
            self.descendants(scope)
                .into_iter()
                .filter(|&n| self.selector_matches(n, &chain, boundary)),
        );
        matches
    }

    /// Merges adjacent text runs and drops empty ones
    fn normalize(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            let Some(text) = self.text_of(child).map(str::to_string) else {
                kept.push(child);
                continue;
            };
            let previous_text = kept.last().and_then(|&p| self.text_of(p).map(|_| p));
            if let Some(previous) = previous_text {
                if let Some(NodeKind::Text(existing)) = self.kind_mut(previous) {
                    existing.push_str(&text);
                }
                if let Some(n) = self.nodes.get_mut(child.0) {
                    n.parent = None;
                }
            } else if text.is_empty() {
                if let Some(n) = self.nodes.get_mut(child.0) {
                    n.parent = None;
                }
            } else {
                kept.push(child);
            }
        }
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children = kept;
        }
    }
}

impl PageView for MemoryPage {
    fn root(&self) -> NodeId {
        self.root
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&format!("#{id}"))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.select(self.root, selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.root, selector)
    }

    fn query_all_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.select(scope, selector)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        Ok(self.element(tag))
    }

    fn insert(&mut self, node: NodeId, at: Insert) -> Result<()> {
        let parent = match at {
            Insert::Prepend(parent) | Insert::Append(parent) => parent,
            Insert::Before { parent, .. } => parent,
        };
        if parent.0 >= self.nodes.len() || node.0 >= self.nodes.len() {
            return Err(LinkDeckError::MissingElement(format!("node {}", parent.0)));
        }
        let position = match at {
            Insert::Prepend(_) => 0,
            Insert::Append(_) => self.children(parent).len(),
            Insert::Before { reference, .. } => {
                if self.parent(reference) != Some(parent) {
                    return Err(LinkDeckError::Generic(
                        "Insertion reference is not a child of the parent".to_string(),
                    ));
                }
                // Compute after detaching in case `node` is already a sibling
                self.detach(node);
                self.children(parent)
                    .iter()
                    .position(|&c| c == reference)
                    .unwrap_or(0)
            }
        };
        self.detach(node);
        let position = position.min(self.children(parent).len());
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.insert(position, node);
        }
        Ok(())
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text_of(node) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text_of(n))
            .collect()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(NodeKind::Text(existing)) = self.kind_mut(node) {
            *existing = text.to_string();
            return;
        }
        let children = self.children(node).to_vec();
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            self.append_text(node, text);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element {
                classes,
                attributes,
                ..
            }) => {
                if name == "class" {
                    (!classes.is_empty()).then(|| classes.join(" "))
                } else {
                    attributes.get(name).cloned()
                }
            }
            _ => None,
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element {
            classes,
            attributes,
            ..
        }) = self.kind_mut(node)
        {
            if name == "class" {
                *classes = value.split_whitespace().map(str::to_string).collect();
            } else {
                attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        matches!(
            self.nodes.get(node.0).map(|n| &n.kind),
            Some(NodeKind::Element { classes, .. }) if classes.iter().any(|c| c == class)
        )
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(NodeKind::Element { classes, .. }) = self.kind_mut(node) {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(NodeKind::Element { classes, .. }) = self.kind_mut(node) {
            classes.retain(|c| c != class);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element { style, .. }) => style.get(property).cloned(),
            _ => None,
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(NodeKind::Element { style, .. }) = self.kind_mut(node) {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn input_value(&self, node: NodeId) -> Option<String> {
        Some(self.attribute(node, "value").unwrap_or_default())
    }

    fn resolved_href(&self, node: NodeId) -> Option<String> {
        let href = self.attribute(node, "href")?;
        match &self.base_url {
            Some(base) => base.join(&href).ok().map(String::from),
            None => Url::parse(&href).ok().map(String::from).or(Some(href)),
        }
    }

    fn image_state(&self, node: NodeId) -> ImageState {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element { image, .. }) => *image,
            _ => ImageState::default(),
        }
    }

    fn highlight(&mut self, node: NodeId, full_text: &str, segments: &[TextSegment]) -> bool {
        if full_text.is_empty() {
            return false;
        }
        let target = self.descendants(node).into_iter().find_map(|n| {
            self.text_of(n)
                .and_then(|text| text.find(full_text).map(|pos| (n, pos, text.to_string())))
        });
        let Some((text_node, pos, text)) = target else {
            return false;
        };
        let Some(parent) = self.parent(text_node) else {
            return false;
        };
        let Some(index) = self.children(parent).iter().position(|&c| c == text_node) else {
            return false;
        };

        let mut replacement = Vec::new();
        let prefix = &text[..pos];
        let suffix = &text[pos + full_text.len()..];
        if !prefix.is_empty() {
            replacement.push(self.push(NodeKind::Text(prefix.to_string())));
        }
        for segment in segments {
            match segment {
                TextSegment::Plain(plain) => {
                    replacement.push(self.push(NodeKind::Text(plain.clone())));
                }
                TextSegment::Highlight(marked) => {
                    let span = self.element_with_class("span", HIGHLIGHT_CLASS);
                    self.append_text(span, marked);
                    replacement.push(span);
                }
            }
        }
        if !suffix.is_empty() {
            replacement.push(self.push(NodeKind::Text(suffix.to_string())));
        }

        for &new_node in &replacement {
            if let Some(n) = self.nodes.get_mut(new_node.0) {
                n.parent = Some(parent);
            }
        }
        if let Some(n) = self.nodes.get_mut(text_node.0) {
            n.parent = None;
        }
        if let Some(p) = self.nodes.get_mut(parent.0) {
            let tail = p.children.split_off(index + 1);
            p.children.truncate(index);
            p.children.extend(replacement);
            p.children.extend(tail);
        }
        true
    }

    fn clear_highlights(&mut self, node: NodeId) {
        let spans = self.select(node, &format!("span.{HIGHLIGHT_CLASS}"));
        let mut parents = Vec::new();
        for span in spans {
            let Some(parent) = self.parent(span) else {
                continue;
            };
            let text = self.text_content(span);
            let replacement = self.push(NodeKind::Text(text));
            if let Some(n) = self.nodes.get_mut(replacement.0) {
                n.parent = Some(parent);
            }
            if let Some(p) = self.nodes.get_mut(parent.0) {
                for child in &mut p.children {
                    if *child == span {
                        *child = replacement;
                    }
                }
            }
            if let Some(n) = self.nodes.get_mut(span.0) {
                n.parent = None;
            }
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        for parent in parents {
            self.normalize(parent);
        }
    }
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector.split_whitespace().map(parse_compound).collect()
}

fn parse_compound(compound: &str) -> Compound {
    let is_marker = |c: char| c == '.' || c == '#';
    let mut parsed = Compound::default();
    let tag_end = compound.find(is_marker).unwrap_or(compound.len());
    if tag_end > 0 {
        parsed.tag = Some(compound[..tag_end].to_ascii_lowercase());
    }
    let mut rest = &compound[tag_end..];
    while let Some(marker) = rest.chars().next() {
        rest = &rest[marker.len_utf8()..];
        let end = rest.find(is_marker).unwrap_or(rest.len());
        let name = rest[..end].to_string();
        if marker == '#' {
            parsed.id = Some(name);
        } else {
            parsed.classes.push(name);
        }
        rest = &rest[end..];
    }
    parsed
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
