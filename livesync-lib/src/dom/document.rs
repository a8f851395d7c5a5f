use super::{tree, ElementData, Node, NodeData, NodeRef};
use crate::parser::html;
use crate::style::StyleSheet;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A document: the root of a node tree plus document-level metadata.
///
/// Documents are always handled through `Rc<Document>`; nodes refer back to
/// their document weakly, so node handles never keep a document alive.
#[derive(Debug)]
pub struct Document {
    root: NodeRef,
    doctype: RefCell<Option<Doctype>>,
    this: Weak<Document>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

impl Doctype {
    pub fn html() -> Self {
        Doctype {
            name: "html".to_owned(),
            public_id: String::new(),
            system_id: String::new(),
        }
    }
}

impl Document {
    /// An empty document with no doctype and no children.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Document>| Document {
            root: Node::new_ref(NodeData::DocumentRoot, this.clone()),
            doctype: RefCell::new(None),
            this: this.clone(),
        })
    }

    /// A minimal HTML document: `<!DOCTYPE html><html><head>[<title>]</head><body></body></html>`.
    pub fn create_html_document(title: Option<&str>) -> Rc<Self> {
        let document = Self::new();
        document.set_doctype(Some(Doctype::html()));

        let html = document.create_element("html");
        let head = document.create_element("head");
        let body = document.create_element("body");
        if let Some(title) = title {
            let title_element = document.create_element("title");
            tree::set_text_content(&title_element, title);
            document.append_owned(&head, title_element);
        }
        document.append_owned(&html, head);
        document.append_owned(&html, body);
        document.append_owned(&document.root, html);
        document
    }

    /// Parse a complete HTML document.
    pub fn parse(markup: &str) -> Rc<Self> {
        let document = Self::new();
        html::parse_into_document(&document, markup);
        document
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn doctype(&self) -> Option<Doctype> {
        self.doctype.borrow().clone()
    }

    pub fn set_doctype(&self, doctype: Option<Doctype>) {
        *self.doctype.borrow_mut() = doctype;
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> Option<NodeRef> {
        tree::children(&self.root)
            .into_iter()
            .find(|child| child.borrow().as_element().is_some())
    }

    /// The metadata root (`<head>`).
    pub fn head(&self) -> Option<NodeRef> {
        self.html_child("head")
    }

    /// The content root (`<body>`).
    pub fn body(&self) -> Option<NodeRef> {
        self.html_child("body")
    }

    pub fn create_element(&self, tag: &str) -> NodeRef {
        let data = ElementData::new(ElementData::html_name(tag));
        Node::new_ref(NodeData::Element(data), self.this.clone())
    }

    pub fn create_text_node(&self, text: &str) -> NodeRef {
        Node::new_ref(NodeData::Text(text.to_owned()), self.this.clone())
    }

    pub fn create_comment(&self, text: &str) -> NodeRef {
        Node::new_ref(NodeData::Comment(text.to_owned()), self.this.clone())
    }

    pub fn create_document_fragment(&self) -> NodeRef {
        Node::new_ref(NodeData::DocumentFragment, self.this.clone())
    }

    /// Parse `markup` as the children of a `<body>` element, in this
    /// document's own parsing context.
    ///
    /// Every node of the returned fragment is owned by this document.
    pub fn create_contextual_fragment(&self, markup: &str) -> NodeRef {
        html::parse_fragment(self, markup)
    }

    /// Sheets of every connected `<style>` element, in tree order.
    pub fn style_sheets(&self) -> Vec<Rc<StyleSheet>> {
        let mut sheets = Vec::new();
        collect_sheets(&self.root, &mut sheets);
        sheets
    }

    pub(crate) fn weak(&self) -> Weak<Document> {
        self.this.clone()
    }

    fn html_child(&self, tag: &str) -> Option<NodeRef> {
        let html = self.document_element()?;
        let found = tree::children(&html)
            .into_iter()
            .find(|child| child.borrow().tag() == Some(tag));
        found
    }

    // Nodes created by this document always satisfy the insertion checks.
    fn append_owned(&self, parent: &NodeRef, child: NodeRef) {
        if let Err(err) = tree::append_child(parent, child) {
            log::error!("failed to build document skeleton: {err}");
        }
    }
}

fn collect_sheets(node: &NodeRef, out: &mut Vec<Rc<StyleSheet>>) {
    let mut pending = vec![Rc::clone(node)];
    while let Some(next) = pending.pop() {
        let current = next.borrow();
        if let Some(sheet) = current.as_element().and_then(ElementData::sheet) {
            out.push(Rc::clone(sheet));
        }
        pending.extend(current.children.iter().rev().cloned());
    }
}
