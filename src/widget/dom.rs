//! Retained element tree standing in for the host page's DOM.
//!
//! A [`Document`] owns the named target containers a widget writes into and
//! hands out element identities. Elements keep their children as a mix of
//! child elements, text (escaped on output), and pre-rendered HTML fragments
//! (inserted verbatim).

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("No element with id '{0}' in document")]
    MissingTarget(String),
}

/// Identity of one element within its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Html(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    tag: &'static str,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text and HTML nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    // --- builder ------------------------------------------------------------

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.children.push(Node::Html(html.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    // --- classes and attributes --------------------------------------------

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    // --- content -----------------------------------------------------------

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Replace all children with a pre-rendered HTML fragment.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.children = vec![Node::Html(html.into())];
    }

    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.children = children.into_iter().map(Node::Element).collect();
    }

    /// Concatenated text of all descendant text nodes.
    ///
    /// HTML fragments contribute their source text unchanged.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) | Node::Html(text) => out.push_str(text),
            }
        }
    }

    // --- queries -----------------------------------------------------------

    pub fn find(&self, id: ElementId) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) => el.find_mut(id),
            _ => None,
        })
    }

    /// All descendants (not including `self`) carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        for child in self.child_elements() {
            child.collect_by_class(class, &mut found);
        }
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_by_class(class, found);
        }
    }

    /// First descendant carrying `class`.
    pub fn first_by_class(&self, class: &str) -> Option<&Element> {
        self.child_elements().find_map(|child| {
            if child.has_class(class) {
                Some(child)
            } else {
                child.first_by_class(class)
            }
        })
    }

    // --- serialization -----------------------------------------------------

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_node(child, &mut out);
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "hr" | "br" | "img" | "input" | "meta" | "link")
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) => out.push_str(&encode_text(text)),
        Node::Html(html) => out.push_str(html),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(el.tag);
    if !el.classes.is_empty() {
        let _ = write!(
            out,
            " class=\"{}\"",
            encode_double_quoted_attribute(&el.classes.join(" "))
        );
    }
    for (name, value) in &el.attributes {
        let _ = write!(out, " {}=\"{}\"", name, encode_double_quoted_attribute(value));
    }
    out.push('>');
    if is_void(el.tag) {
        return;
    }
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(el.tag);
    out.push('>');
}

/// Host page holding the target containers widgets render into.
#[derive(Debug, Default)]
pub struct Document {
    next_id: u64,
    containers: Vec<(String, Element)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element with a fresh identity.
    pub fn create_element(&mut self, tag: &'static str) -> Element {
        self.next_id += 1;
        Element {
            id: ElementId(self.next_id),
            tag,
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an empty `div` container addressable by `target_id`.
    ///
    /// Re-adding an existing target id leaves the existing container alone.
    pub fn add_container(&mut self, target_id: &str) -> ElementId {
        if let Some(existing) = self.container(target_id) {
            return existing.id();
        }
        let el = self.create_element("div").with_attr("id", target_id);
        let id = el.id();
        self.containers.push((target_id.to_string(), el));
        id
    }

    pub fn container(&self, target_id: &str) -> Option<&Element> {
        self.containers
            .iter()
            .find(|(name, _)| name == target_id)
            .map(|(_, el)| el)
    }

    pub fn container_mut(&mut self, target_id: &str) -> Option<&mut Element> {
        self.containers
            .iter_mut()
            .find(|(name, _)| name == target_id)
            .map(|(_, el)| el)
    }

    /// Swap the whole content of a container.
    pub fn replace_children(
        &mut self,
        target_id: &str,
        children: Vec<Element>,
    ) -> Result<(), DomError> {
        let container = self
            .container_mut(target_id)
            .ok_or_else(|| DomError::MissingTarget(target_id.to_string()))?;
        container.replace_children(children);
        Ok(())
    }

    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.containers.iter().find_map(|(_, el)| el.find(id))
    }

    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.containers.iter_mut().find_map(|(_, el)| el.find_mut(id))
    }

    /// Serialize all containers, in the order they were added.
    pub fn to_html(&self) -> String {
        self.containers
            .iter()
            .map(|(_, el)| el.to_html())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize as a standalone HTML page.
    pub fn to_page_html(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            encode_text(title),
            self.to_html()
        )
    }
}
