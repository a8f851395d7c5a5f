//! HTML serialization of the document model.

use crate::dom::{self, Document, NodeData, NodeRef};
use std::fmt::Write as _;
use std::rc::Rc;

/// A list of void (self-closing) elements in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are written out verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the children of `node`.
pub fn inner_html(node: &NodeRef) -> String {
    let mut pending = Vec::new();
    push_children(node, &mut pending);
    let mut out = String::new();
    write_steps(pending, &mut out);
    out
}

/// Serialize `node` itself, including its children.
pub fn outer_html(node: &NodeRef) -> String {
    let mut out = String::new();
    write_steps(
        vec![Step::Node {
            node: Rc::clone(node),
            raw_text: false,
        }],
        &mut out,
    );
    out
}

/// Serialize a whole document, starting with its doctype.
pub fn serialize_document(document: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = document.doctype() {
        let _ = write!(out, "<!DOCTYPE {}>", doctype.name);
    }
    out.push_str(&inner_html(document.root()));
    out
}

/// Pending serialization work, popped from the back.
enum Step {
    Node { node: NodeRef, raw_text: bool },
    EndTag(String),
}

fn push_children(node: &NodeRef, pending: &mut Vec<Step>) {
    let raw_text = is_raw_text_parent(node);
    for child in dom::children(node).into_iter().rev() {
        pending.push(Step::Node {
            node: child,
            raw_text,
        });
    }
}

fn write_steps(mut pending: Vec<Step>, out: &mut String) {
    while let Some(step) = pending.pop() {
        let (node, raw_text) = match step {
            Step::EndTag(tag) => {
                let _ = write!(out, "</{tag}>");
                continue;
            }
            Step::Node { node, raw_text } => (node, raw_text),
        };

        let node_ref = node.borrow();
        match &node_ref.data {
            NodeData::DocumentRoot | NodeData::DocumentFragment => {
                push_children(&node, &mut pending);
            }
            NodeData::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            NodeData::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    let _ = write!(out, " {name}=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    continue;
                }
                pending.push(Step::EndTag(element.tag.clone()));
                match &element.template_contents {
                    Some(fragment) => push_children(fragment, &mut pending),
                    None => push_children(&node, &mut pending),
                }
            }
        }
    }
}

fn is_raw_text_parent(node: &NodeRef) -> bool {
    node.borrow()
        .tag()
        .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag))
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let document = Document::create_html_document(None);
        let fragment =
            document.create_contextual_fragment(r#"<a title="say &quot;hi&quot;">1 &lt; 2 &amp; 3</a>"#);

        assert_eq!(
            inner_html(&fragment),
            r#"<a title="say &quot;hi&quot;">1 &lt; 2 &amp; 3</a>"#
        );
    }

    #[test]
    fn void_and_raw_text_elements() {
        let document = Document::create_html_document(None);
        let fragment = document.create_contextual_fragment("<br><style>a > b { color: red }</style>");

        assert_eq!(
            inner_html(&fragment),
            "<br><style>a > b { color: red }</style>"
        );
    }

    #[test]
    fn document_with_doctype() {
        let document = Document::create_html_document(Some("t"));

        assert_eq!(
            serialize_document(&document),
            "<!DOCTYPE html><html><head><title>t</title></head><body></body></html>"
        );
    }
}
