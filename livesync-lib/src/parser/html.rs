//! HTML parsing into the document model.
//!
//! html5ever drives [`PreviewTreeSink`], which builds [`NodeRef`] trees owned
//! by the document being parsed into. Markup is never rejected: html5ever
//! repairs it and reports problems through `parse_error`, which only logs.

use crate::dom::{self, Doctype, Document, ElementData, Node, NodeData, NodeRef};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, ParseOpts, QualName,
};
use std::borrow::Cow;
use std::rc::{Rc, Weak};

/// Parse a complete document into the (empty) root of `document`.
pub(crate) fn parse_into_document(document: &Rc<Document>, markup: &str) {
    let sink = PreviewTreeSink::new(document.weak(), Rc::clone(document.root()), true);
    html5ever::parse_document(sink, ParseOpts::default()).one(markup);
}

/// Parse `markup` as the children of a `<body>` element.
///
/// The returned document fragment and every node under it belong to
/// `document`.
pub(crate) fn parse_fragment(document: &Document, markup: &str) -> NodeRef {
    let fragment = document.create_document_fragment();
    let sink = PreviewTreeSink::new(document.weak(), Rc::clone(&fragment), false);
    let context = ElementData::html_name("body");
    html5ever::parse_fragment(sink, ParseOpts::default(), context, Vec::new()).one(markup);

    // html5ever builds the fragment under a synthetic <html> root.
    if let Some(html) = dom::first_child(&fragment) {
        relink(dom::remove_child(&fragment, &html).map(drop));
        move_children(&html, &fragment);
    }
    fragment
}

/// A `TreeSink` that builds the crate's node tree.
pub struct PreviewTreeSink {
    owner: Weak<Document>,
    root: NodeRef,
    accepts_doctype: bool,
}

impl PreviewTreeSink {
    /// Creates a sink that appends into `root` and marks nodes as owned by `owner`.
    pub fn new(owner: Weak<Document>, root: NodeRef, accepts_doctype: bool) -> Self {
        PreviewTreeSink {
            owner,
            root,
            accepts_doctype,
        }
    }

    fn new_node(&self, data: NodeData) -> NodeRef {
        Node::new_ref(data, self.owner.clone())
    }

    fn text_node(&self, text: &str) -> NodeRef {
        self.new_node(NodeData::Text(text.to_owned()))
    }
}

/// Element name handed back to html5ever.
#[derive(Debug)]
pub struct PreviewElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for PreviewElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for PreviewTreeSink {
    type Handle = NodeRef;
    type Output = NodeRef;
    type ElemName<'a>
        = PreviewElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.root
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::debug!("html parse error: {msg}");
    }

    fn get_document(&self) -> Self::Handle {
        Rc::clone(&self.root)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match target.borrow().as_element() {
            Some(element) => PreviewElemName {
                ns: element.qual_name.ns.clone(),
                local: element.qual_name.local.clone(),
            },
            None => PreviewElemName {
                ns: Namespace::from(""),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let mut element = ElementData::new(name);
        for attr in attrs {
            element.set_attribute(attr.name.local.to_string(), attr.value.to_string());
        }
        if flags.template {
            element.template_contents = Some(self.new_node(NodeData::DocumentFragment));
        }
        self.new_node(NodeData::Element(element))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.new_node(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        self.new_node(NodeData::Comment(format!("?{target} {data}")))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => relink(dom::append_child(parent, node)),
            NodeOrText::AppendText(text) => {
                if let Some(last) = dom::last_child(parent) {
                    if let NodeData::Text(existing) = &mut last.borrow_mut().data {
                        existing.push_str(&text);
                        return;
                    }
                }
                relink(dom::append_child(parent, self.text_node(&text)));
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if dom::parent(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        if !self.accepts_doctype {
            return;
        }
        if let Some(document) = self.owner.upgrade() {
            document.set_doctype(Some(Doctype {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            }));
        }
    }

    fn pop(&self, node: &Self::Handle) {
        dom::refresh_style_sheet(node);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target
            .borrow()
            .as_element()
            .and_then(|element| element.template_contents.clone())
            .unwrap_or_else(|| Rc::clone(target))
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        log::trace!("quirks mode set to {mode:?}");
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let Some(parent) = dom::parent(sibling) else {
            return;
        };
        let node = match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                if let Some(previous) = previous_sibling(&parent, sibling) {
                    if let NodeData::Text(existing) = &mut previous.borrow_mut().data {
                        existing.push_str(&text);
                        return;
                    }
                }
                self.text_node(&text)
            }
        };
        relink(dom::insert_before(&parent, node, Some(sibling)));
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let Some(element) = target.borrow_mut().as_element_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if element.attribute(&key).is_none() {
                    element.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        if let Some(parent) = dom::parent(target) {
            relink(dom::remove_child(&parent, target).map(drop));
        }
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        move_children(node, new_parent);
    }
}

fn previous_sibling(parent: &NodeRef, node: &NodeRef) -> Option<NodeRef> {
    let siblings = dom::children(parent);
    let index = siblings
        .iter()
        .position(|candidate| Rc::ptr_eq(candidate, node))?;
    index.checked_sub(1).map(|previous| Rc::clone(&siblings[previous]))
}

fn move_children(from: &NodeRef, to: &NodeRef) {
    for child in dom::children(from) {
        relink(dom::append_child(to, child));
    }
}

// The sink only links nodes it created itself, so failures indicate a bug in
// the sink rather than bad input.
fn relink(result: Result<(), crate::error::DomError>) {
    if let Err(err) = result {
        log::warn!("html tree builder could not link node: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::serialize::inner_html;

    #[test]
    fn fragment_nodes_belong_to_document() {
        let document = Document::create_html_document(None);
        let fragment = document.create_contextual_fragment("<p>one</p><p>two</p>");

        let children = dom::children(&fragment);
        assert_eq!(children.len(), 2);
        for child in &children {
            let owner = dom::owner_document(child).unwrap();
            assert!(Rc::ptr_eq(&owner, &document));
        }
    }

    #[test]
    fn fragment_merges_adjacent_text() {
        let document = Document::create_html_document(None);
        let fragment = document.create_contextual_fragment("a &amp; b");

        let children = dom::children(&fragment);
        assert_eq!(children.len(), 1);
        assert_eq!(dom::text_content(&fragment), "a & b");
    }

    #[test]
    fn foster_parenting_moves_text_before_table() {
        let document = Document::create_html_document(None);
        let fragment = document.create_contextual_fragment("<table>oops<tr><td>1</td></tr></table>");

        assert_eq!(
            inner_html(&fragment),
            "oops<table><tbody><tr><td>1</td></tr></tbody></table>"
        );
    }

    #[test]
    fn misnested_formatting_is_repaired() {
        let document = Document::create_html_document(None);
        let fragment = document.create_contextual_fragment("<b>1<p>2</b>3</p>");

        assert_eq!(inner_html(&fragment), "<b>1</b><p><b>2</b>3</p>");
    }

    #[test]
    fn template_contents_are_separate() {
        let document = Document::create_html_document(None);
        let fragment = document.create_contextual_fragment("<template><span>x</span></template>");

        let template = dom::first_child(&fragment).unwrap();
        assert_eq!(template.borrow().child_count(), 0);
        let contents = template
            .borrow()
            .as_element()
            .and_then(|element| element.template_contents.clone())
            .unwrap();
        assert_eq!(inner_html(&contents), "<span>x</span>");
    }
}
