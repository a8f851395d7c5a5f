//! Tree mutations and queries on [`NodeRef`] handles.

use super::{Document, Node, NodeData, NodeRef};
use crate::error::DomError;
use crate::style::StyleSheet;
use std::rc::{Rc, Weak};

pub fn parent(node: &NodeRef) -> Option<NodeRef> {
    node.borrow().parent.as_ref().and_then(Weak::upgrade)
}

pub fn first_child(node: &NodeRef) -> Option<NodeRef> {
    node.borrow().children.first().cloned()
}

pub fn last_child(node: &NodeRef) -> Option<NodeRef> {
    node.borrow().children.last().cloned()
}

/// Snapshot of the children of `node`.
pub fn children(node: &NodeRef) -> Vec<NodeRef> {
    node.borrow().children.clone()
}

/// The document that created `node`, if it is still alive.
pub fn owner_document(node: &NodeRef) -> Option<Rc<Document>> {
    node.borrow().owner.upgrade()
}

/// Whether `node` is attached, directly or through ancestors, to a document root.
pub fn is_connected(node: &NodeRef) -> bool {
    let mut current = Some(Rc::clone(node));
    while let Some(candidate) = current {
        if matches!(candidate.borrow().data, NodeData::DocumentRoot) {
            return true;
        }
        current = parent(&candidate);
    }
    false
}

/// Append `child` as the last child of `parent`.
///
/// A document fragment is not inserted itself: its children move over in
/// order and the fragment is left empty.
pub fn append_child(parent: &NodeRef, child: NodeRef) -> Result<(), DomError> {
    insert_before(parent, child, None)
}

/// Insert `child` before `reference`, or at the end when `reference` is `None`.
pub fn insert_before(
    parent: &NodeRef,
    child: NodeRef,
    reference: Option<&NodeRef>,
) -> Result<(), DomError> {
    ensure_insertable(parent, &child)?;
    if let Some(reference) = reference {
        if !is_child_of(parent, reference) {
            return Err(DomError::NotFound);
        }
    }

    if matches!(child.borrow().data, NodeData::DocumentFragment) {
        let moved = std::mem::take(&mut child.borrow_mut().children);
        for node in moved {
            node.borrow_mut().parent = None;
            attach(parent, node, reference);
        }
        return Ok(());
    }

    if let Some(old_parent) = self::parent(&child) {
        // Re-inserting the reference node itself leaves the tree unchanged.
        if reference.is_some_and(|reference| Rc::ptr_eq(reference, &child)) {
            return Ok(());
        }
        detach(&old_parent, &child);
    }
    attach(parent, child, reference);
    Ok(())
}

/// Remove `child` from `parent` and return it.
pub fn remove_child(parent: &NodeRef, child: &NodeRef) -> Result<NodeRef, DomError> {
    if !is_child_of(parent, child) {
        return Err(DomError::NotFound);
    }
    detach(parent, child);
    Ok(Rc::clone(child))
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &NodeRef) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

/// Replace all children of `node` with a single text node.
///
/// Setting the text of a `<style>` element rebuilds its sheet.
pub fn set_text_content(node: &NodeRef, text: &str) {
    if !node.borrow().is_container() {
        if let NodeData::Text(existing) | NodeData::Comment(existing) = &mut node.borrow_mut().data
        {
            *existing = text.to_owned();
        }
        return;
    }

    let removed = std::mem::take(&mut node.borrow_mut().children);
    for child in removed {
        child.borrow_mut().parent = None;
    }
    if !text.is_empty() {
        let owner = node.borrow().owner.clone();
        let text_node = Node::new_ref(NodeData::Text(text.to_owned()), owner);
        attach(node, text_node, None);
    }
    refresh_style_sheet(node);
}

/// The live sheet of a connected `<style>` element.
pub fn style_sheet(node: &NodeRef) -> Option<Rc<StyleSheet>> {
    let sheet = node.borrow().as_element()?.sheet().cloned()?;
    is_connected(node).then_some(sheet)
}

/// Rebuild the sheet of a `<style>` element from its current text.
pub(crate) fn refresh_style_sheet(node: &NodeRef) {
    let is_style = node
        .borrow()
        .as_element()
        .is_some_and(|element| element.is_style());
    if !is_style {
        return;
    }
    let text = text_content(node);
    if let Some(element) = node.borrow_mut().as_element_mut() {
        element.replace_sheet(StyleSheet::from_source(&text));
    }
}

fn ensure_insertable(parent: &NodeRef, child: &NodeRef) -> Result<(), DomError> {
    let childless = {
        let parent_node = parent.borrow();
        let child_node = child.borrow();
        if !parent_node.is_container() || matches!(child_node.data, NodeData::DocumentRoot) {
            return Err(DomError::HierarchyRequest);
        }
        if !Weak::ptr_eq(&parent_node.owner, &child_node.owner) {
            return Err(DomError::WrongDocument);
        }
        child_node.children.is_empty()
    };

    // A node may not become its own descendant. Without children it can only
    // be the parent itself.
    if childless {
        return if Rc::ptr_eq(parent, child) {
            Err(DomError::HierarchyRequest)
        } else {
            Ok(())
        };
    }
    let mut current = Some(Rc::clone(parent));
    while let Some(ancestor) = current {
        if Rc::ptr_eq(&ancestor, child) {
            return Err(DomError::HierarchyRequest);
        }
        current = self::parent(&ancestor);
    }
    Ok(())
}

fn is_child_of(parent: &NodeRef, child: &NodeRef) -> bool {
    self::parent(child).is_some_and(|actual| Rc::ptr_eq(&actual, parent))
}

fn attach(parent: &NodeRef, child: NodeRef, reference: Option<&NodeRef>) {
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    let mut parent_node = parent.borrow_mut();
    let position = reference.and_then(|reference| {
        parent_node
            .children
            .iter()
            .position(|candidate| Rc::ptr_eq(candidate, reference))
    });
    match position {
        Some(index) => parent_node.children.insert(index, child),
        None => parent_node.children.push(child),
    }
}

fn detach(parent: &NodeRef, child: &NodeRef) {
    {
        let mut parent_node = parent.borrow_mut();
        // Searching from the back keeps tail removal cheap.
        if let Some(index) = parent_node
            .children
            .iter()
            .rposition(|candidate| Rc::ptr_eq(candidate, child))
        {
            parent_node.children.remove(index);
        }
    }
    child.borrow_mut().parent = None;
}

fn collect_text(node: &NodeRef, out: &mut String) {
    let mut pending = vec![Rc::clone(node)];
    while let Some(next) = pending.pop() {
        let current = next.borrow();
        match &current.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Comment(_) => {}
            _ => pending.extend(current.children.iter().rev().cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_children_move_in_order() {
        let document = Document::new();
        let parent = document.create_element("div");
        let fragment = document.create_document_fragment();
        for tag in ["a", "b", "c"] {
            append_child(&fragment, document.create_element(tag)).unwrap();
        }

        append_child(&parent, Rc::clone(&fragment)).unwrap();

        let tags: Vec<String> = children(&parent)
            .iter()
            .map(|child| child.borrow().tag().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(tags, ["a", "b", "c"]);
        assert!(children(&fragment).is_empty());
    }

    #[test]
    fn rejects_nodes_from_another_document() {
        let first = Document::new();
        let second = Document::new();
        let parent = first.create_element("div");
        let foreign = second.create_element("span");

        assert_eq!(
            append_child(&parent, foreign),
            Err(DomError::WrongDocument)
        );
    }

    #[test]
    fn rejects_cycles_and_text_parents() {
        let document = Document::new();
        let outer = document.create_element("div");
        let inner = document.create_element("p");
        append_child(&outer, Rc::clone(&inner)).unwrap();

        assert_eq!(
            append_child(&inner, Rc::clone(&outer)),
            Err(DomError::HierarchyRequest)
        );
        let text = document.create_text_node("x");
        assert_eq!(
            append_child(&text, document.create_element("b")),
            Err(DomError::HierarchyRequest)
        );
    }

    #[test]
    fn insert_before_and_remove() {
        let document = Document::new();
        let list = document.create_element("ul");
        let first = document.create_element("li");
        let second = document.create_element("li");
        append_child(&list, Rc::clone(&second)).unwrap();
        insert_before(&list, Rc::clone(&first), Some(&second)).unwrap();

        assert!(Rc::ptr_eq(&first_child(&list).unwrap(), &first));
        assert!(Rc::ptr_eq(&last_child(&list).unwrap(), &second));

        remove_child(&list, &first).unwrap();
        assert!(matches!(
            remove_child(&list, &first),
            Err(DomError::NotFound)
        ));
        assert!(parent(&first).is_none());
        assert_eq!(list.borrow().child_count(), 1);
    }

    #[test]
    fn style_sheet_requires_connection() {
        let document = Document::create_html_document(None);
        let style = document.create_element("style");
        set_text_content(&style, "a{color:red}");
        assert!(style_sheet(&style).is_none());

        let head = document.head().unwrap();
        append_child(&head, Rc::clone(&style)).unwrap();
        let sheet = style_sheet(&style).unwrap();
        assert_eq!(sheet.rule_texts(), ["a{color:red}"]);
    }

    #[test]
    fn very_deep_chains_are_walked_and_dropped() {
        let document = Document::create_html_document(None);
        let body = document.body().unwrap();
        let top = document.create_element("div");
        let mut tip = Rc::clone(&top);
        for _ in 0..200_000 {
            let next = document.create_element("div");
            append_child(&tip, Rc::clone(&next)).unwrap();
            tip = next;
        }
        append_child(&tip, document.create_text_node("leaf")).unwrap();
        append_child(&body, Rc::clone(&top)).unwrap();
        drop(tip);

        assert_eq!(text_content(&body), "leaf");
        assert!(document.style_sheets().is_empty());

        remove_child(&body, &top).unwrap();
        drop(top);
        assert_eq!(body.borrow().child_count(), 0);
    }
}
