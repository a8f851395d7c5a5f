use super::registry::StyleRegistry;
use crate::config::RuleFailurePolicy;
use crate::dom::{self, Document};
use crate::error::SyncError;
use crate::style::RuleSet;
use std::rc::Rc;

/// Replace the rules of `document`'s managed style container with the rules
/// of `css`.
///
/// `css` is parsed in a throwaway staging document, never in the live
/// container. The container is then emptied from its last rule down, and the
/// staged rules are inserted at the tail in source order. What happens when
/// a rule is rejected depends on `policy`.
pub fn synchronize_styles(
    registry: &mut StyleRegistry,
    document: &Rc<Document>,
    css: &str,
    policy: RuleFailurePolicy,
) -> Result<(), SyncError> {
    let container = registry.lookup(document)?;
    let staged = stage_rules(css);
    let sheet = container.sheet().ok_or(SyncError::ContainerDetached)?;

    for index in (0..sheet.len()).rev() {
        sheet
            .delete_rule(index)
            .map_err(|source| SyncError::RuleDeletion { index, source })?;
    }

    let Some(rules) = staged else {
        log::debug!("stylesheet produced no rule list, container left empty");
        return Ok(());
    };

    let mut skipped = 0usize;
    for (index, rule) in rules.iter().enumerate() {
        let text = rule.css_text();
        match sheet.insert_rule(text, sheet.len()) {
            Ok(at) => log::trace!("inserted rule {index} at {at}: {text}"),
            Err(source) => match policy {
                RuleFailurePolicy::Abort => {
                    return Err(SyncError::RuleInsertion {
                        index,
                        rule: text.to_owned(),
                        source,
                    });
                }
                RuleFailurePolicy::Skip => {
                    log::warn!("skipping rule {index} (`{text}`): {source}");
                    skipped += 1;
                }
            },
        }
    }

    log::debug!(
        "styles synchronized: {} rules active, {skipped} skipped",
        sheet.len()
    );
    Ok(())
}

/// Parse `css` through a `<style>` element of a fresh document.
fn stage_rules(css: &str) -> Option<RuleSet> {
    let staging = Document::create_html_document(Some(""));
    let body = staging.body()?;
    let style = staging.create_element("style");
    dom::set_text_content(&style, css);
    if let Err(err) = dom::append_child(&body, Rc::clone(&style)) {
        log::debug!("could not stage stylesheet: {err}");
        return None;
    }
    dom::style_sheet(&style).map(|sheet| sheet.css_rules())
}
