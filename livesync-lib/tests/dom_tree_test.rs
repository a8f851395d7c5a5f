use livesync_lib::dom::{self, Document, NodeData, NodeRef};
use livesync_lib::synchronize_content;
use std::rc::Rc;

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A preview document whose body holds `html`.
    pub fn create_test_dom(html: &str) -> Rc<Document> {
        let document = Document::create_html_document(None);
        synchronize_content(&document, html).unwrap();
        document
    }

    fn collect_structure(node: &NodeRef) -> String {
        let mut output = String::new();
        traverse_node(node, 0, &mut output);
        output
    }

    fn traverse_node(node: &NodeRef, depth: usize, output: &mut String) {
        let node_ref = node.borrow();
        match &node_ref.data {
            NodeData::DocumentRoot | NodeData::DocumentFragment => {
                for child in dom::children(node) {
                    traverse_node(&child, depth, output);
                }
            }
            NodeData::Element(element) => {
                *output += &format!("{}<{}>\n", "  ".repeat(depth), element.tag);
                for child in dom::children(node) {
                    traverse_node(&child, depth + 1, output);
                }
            }
            NodeData::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    *output += &format!("{}{}\n", "  ".repeat(depth), trimmed);
                }
            }
            NodeData::Comment(_) => {}
        }
    }

    #[test]
    fn test_basic_structure() {
        let document = create_test_dom("<h1>Hello</h1>\n<p>World</p>");
        let structure = collect_structure(document.root());

        let expected = r#"
<html>
  <head>
  <body>
    <h1>
      Hello
    <p>
      World
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_void_elements() {
        let html = r#"
            <img src="test.jpg" alt="Test">
            <br>
            <input type="text">
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.body().unwrap());

        let expected = r#"
<body>
  <img>
  <br>
  <input>
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_nested_elements() {
        let html = r#"
            <div class="container">
                <div class="row">
                    <div class="col">1</div>
                    <div class="col">2</div>
                </div>
            </div>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.body().unwrap());

        let expected = r#"
<body>
  <div>
    <div>
      <div>
        1
      <div>
        2
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_attributes() {
        let html = r#"
            <a href="https://example.com" target="_blank" data-test="123">
                Link
            </a>
        "#;

        let document = create_test_dom(html);
        let body = document.body().unwrap();
        let link = dom::children(&body)
            .into_iter()
            .find(|child| child.borrow().tag() == Some("a"))
            .unwrap();
        let attributes = link.borrow().as_element().unwrap().attributes.clone();

        assert_eq!(
            attributes,
            vec![
                ("href".to_string(), "https://example.com".to_string()),
                ("target".to_string(), "_blank".to_string()),
                ("data-test".to_string(), "123".to_string())
            ]
        );
    }

    #[test]
    fn test_mixed_content() {
        let html = r#"
            <p>
                This is <strong>bold</strong> and <em>italic</em> text.
                <br>
                Next line.
            </p>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.body().unwrap());

        let expected = r#"
<body>
  <p>
    This is
    <strong>
      bold
    and
    <em>
      italic
    text.
    <br>
    Next line.
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_doctype() {
        let html = r#"
            <!DOCTYPE html>
            <html>
                <head></head>
            </html>
        "#;

        let document = Document::parse(html);
        assert_eq!(document.doctype().unwrap().name, "html");
        assert!(document.body().is_some());
    }

    #[test]
    fn test_malformed_html() {
        let html = r#"
            <div>
                <p>Unclosed
                <img>
                </div>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.body().unwrap());

        let expected = r#"
<body>
  <div>
    <p>
      Unclosed
      <img>
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_table_autocorrection() {
        let document = create_test_dom("<table><td>Cell</td></table>");
        let structure = collect_structure(&document.body().unwrap());

        let expected = r#"
<body>
  <table>
    <tbody>
      <tr>
        <td>
          Cell
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_form_containment() {
        let document = create_test_dom("<form><div><input type='text'></div></form>");
        let structure = collect_structure(&document.body().unwrap());

        let expected = r#"
<body>
  <form>
    <div>
      <input>
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_nodes_belong_to_target_document() {
        let document = create_test_dom("<section><p>x</p></section>");
        let section = dom::first_child(&document.body().unwrap()).unwrap();
        let paragraph = dom::first_child(&section).unwrap();

        let owner = dom::owner_document(&paragraph).unwrap();
        assert!(Rc::ptr_eq(&owner, &document));
        assert!(dom::is_connected(&paragraph));
    }
}
