//! In-memory document model.
//!
//! Nodes are shared as `Rc<RefCell<Node>>`. A node owns its children, and
//! points weakly at its parent and at the document that created it, so
//! dropping the last handle to a [`Document`] releases the whole tree.

mod document;
mod tree;

pub use document::{Doctype, Document};
pub use tree::{
    append_child, children, first_child, insert_before, is_connected, last_child,
    owner_document, parent, remove_child, set_text_content, style_sheet, text_content,
};
pub(crate) use tree::refresh_style_sheet;

use crate::style::StyleSheet;
use html5ever::{LocalName, Namespace, QualName};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Namespace of every element this crate creates.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Shared handle to a node.
pub type NodeRef = Rc<RefCell<Node>>;

/// A node of the tree together with its links.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    parent: Option<Weak<RefCell<Node>>>,
    children: Vec<NodeRef>,
    owner: Weak<Document>,
}

/// The payload of a node.
#[derive(Debug)]
pub enum NodeData {
    DocumentRoot,
    DocumentFragment,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Element payload.
#[derive(Debug)]
pub struct ElementData {
    pub tag: String,
    pub qual_name: QualName,
    pub attributes: Vec<(String, String)>,
    /// Content fragment of a `<template>` element.
    pub template_contents: Option<NodeRef>,
    sheet: Option<Rc<StyleSheet>>,
}

impl Node {
    pub(crate) fn new_ref(data: NodeData, owner: Weak<Document>) -> NodeRef {
        Rc::new(RefCell::new(Node {
            data,
            parent: None,
            children: Vec::new(),
            owner,
        }))
    }

    /// Whether this node may hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self.data,
            NodeData::DocumentRoot | NodeData::DocumentFragment | NodeData::Element(_)
        )
    }

    /// The element payload, if this node is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable element payload, if this node is an element.
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Lowercase tag name, if this node is an element.
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|element| element.tag.as_str())
    }

    /// Number of child nodes.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

// Unlinks descendants on an explicit stack so that dropping a very deep
// tree does not recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        if let NodeData::Element(element) = &mut self.data {
            pending.extend(element.template_contents.take());
        }
        while let Some(child) = pending.pop() {
            // Nodes still shared elsewhere stay intact.
            if let Ok(cell) = Rc::try_unwrap(child) {
                let mut node = cell.into_inner();
                pending.append(&mut node.children);
                if let NodeData::Element(element) = &mut node.data {
                    pending.extend(element.template_contents.take());
                }
            }
        }
    }
}

impl ElementData {
    pub fn new(qual_name: QualName) -> Self {
        let tag = qual_name.local.to_string();
        // A fresh <style> starts out with an empty sheet.
        let sheet = (tag == "style").then(|| Rc::new(StyleSheet::new()));
        ElementData {
            tag,
            qual_name,
            attributes: Vec::new(),
            template_contents: None,
            sheet,
        }
    }

    /// Build the qualified name of an HTML element.
    pub fn html_name(tag: &str) -> QualName {
        QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(tag.to_ascii_lowercase()),
        )
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn is_style(&self) -> bool {
        self.tag == "style"
    }

    /// The sheet of a `<style>` element, regardless of connection state.
    pub fn sheet(&self) -> Option<&Rc<StyleSheet>> {
        self.sheet.as_ref()
    }

    pub(crate) fn replace_sheet(&mut self, sheet: StyleSheet) {
        if self.is_style() {
            self.sheet = Some(Rc::new(sheet));
        }
    }
}
