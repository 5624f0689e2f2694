//! The page surface the controller reads and writes.
//!
//! Every component works against [`PageView`] so matching, history and theme
//! logic run the same way over the in-memory document used in tests and over
//! the live browser document.

use crate::error::{LinkDeckError, Result};

/// Handle to an element or text node owned by a [`PageView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Where to place a node relative to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    /// As the first child of the given parent
    Prepend(NodeId),
    /// As the last child of the given parent
    Append(NodeId),
    /// As a child of `parent`, immediately before `reference`
    Before { parent: NodeId, reference: NodeId },
}

/// A run of link text after highlighting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Plain(String),
    Highlight(String),
}

/// Load state of an image element at the moment it is inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageState {
    pub complete: bool,
    pub natural_width: u32,
}

impl ImageState {
    /// Whether the image finished loading with real pixels
    #[must_use]
    pub fn is_loaded(self) -> bool {
        self.complete && self.natural_width > 0
    }
}

/// Class name of highlight spans inserted by search
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// Minimal document interface used by every component
pub trait PageView {
    /// The document root (`<html>`)
    fn root(&self) -> NodeId;

    /// The `<body>` element
    fn body(&self) -> NodeId;

    fn by_id(&self, id: &str) -> Option<NodeId>;

    /// First element in document order matching a simple selector
    fn query(&self, selector: &str) -> Option<NodeId>;

    /// Every element in document order matching a simple selector
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// Every descendant of `scope` matching a simple selector
    fn query_all_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;

    /// Creates a detached element
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the tag name
    fn create_element(&mut self, tag: &str) -> Result<NodeId>;

    /// Attaches a detached node
    ///
    /// # Errors
    ///
    /// Returns an error if the parent or reference node is not part of the document
    fn insert(&mut self, node: NodeId, at: Insert) -> Result<()>;

    /// Detaches a node and its subtree; unknown or detached nodes are ignored
    fn remove(&mut self, node: NodeId);

    /// Concatenated text of the node and its descendants
    fn text_content(&self, node: NodeId) -> String;

    /// Replaces all children with a single text run
    fn set_text(&mut self, node: NodeId, text: &str);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Current value of a text input
    fn input_value(&self, node: NodeId) -> Option<String>;

    /// Link target resolved against the document base, as `a.href` reports it
    fn resolved_href(&self, node: NodeId) -> Option<String>;

    fn image_state(&self, node: NodeId) -> ImageState;

    /// Substitutes the first text run containing `full_text` with `segments`.
    ///
    /// Returns `false` when no single text run holds the whole text, in which
    /// case the node is left untouched.
    fn highlight(&mut self, node: NodeId, full_text: &str, segments: &[TextSegment]) -> bool;

    /// Replaces every highlight span under `node` with its plain text
    fn clear_highlights(&mut self, node: NodeId);
}

/// Looks up an element by id or fails with the `#id` selector in the error
///
/// # Errors
///
/// Returns [`LinkDeckError::MissingElement`] when no element carries the id
pub fn require_id<P: PageView + ?Sized>(page: &P, id: &str) -> Result<NodeId> {
    page.by_id(id)
        .ok_or_else(|| LinkDeckError::MissingElement(format!("#{id}")))
}

/// Looks up the first element matching `selector` or fails naming it
///
/// # Errors
///
/// Returns [`LinkDeckError::MissingElement`] when nothing matches
pub fn require<P: PageView + ?Sized>(page: &P, selector: &str) -> Result<NodeId> {
    page.query(selector)
        .ok_or_else(|| LinkDeckError::MissingElement(selector.to_string()))
}
