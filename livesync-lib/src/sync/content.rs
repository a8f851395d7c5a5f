use crate::dom::{self, Document};
use crate::error::SyncError;

/// Replace the children of `document`'s `<body>` with the nodes parsed from
/// `markup`.
///
/// The markup is parsed in `document`'s own context, so the new nodes belong
/// to it. The fragment is built before the body is touched; old children are
/// then removed from the last one backward and the fragment is appended.
pub fn synchronize_content(document: &Document, markup: &str) -> Result<(), SyncError> {
    let body = document.body().ok_or(SyncError::MissingContentRoot)?;
    let fragment = document.create_contextual_fragment(markup);

    let mut removed = 0usize;
    while let Some(child) = dom::last_child(&body) {
        dom::remove_child(&body, &child)?;
        removed += 1;
    }

    let added = fragment.borrow().child_count();
    dom::append_child(&body, fragment)?;
    log::debug!("content synchronized: removed {removed} nodes, added {added}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::inner_html;

    #[test]
    fn replaces_body_children() {
        let document = Document::parse("<body><p>old</p><p>older</p></body>");

        synchronize_content(&document, "<h1>new</h1>").unwrap();

        let body = document.body().unwrap();
        assert_eq!(inner_html(&body), "<h1>new</h1>");
    }

    #[test]
    fn missing_body_is_reported() {
        let document = Document::new();

        assert!(matches!(
            synchronize_content(&document, "<p>x</p>"),
            Err(SyncError::MissingContentRoot)
        ));
    }
}
