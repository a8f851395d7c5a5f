use super::rules::{CssRule, RuleSet};
use super::syntax::{parse_rule, parse_stylesheet};
use crate::error::RuleError;
use lightningcss::error::{Error as LcssError, ParserError};
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};
use std::cell::RefCell;

/// The live, ordered rule list of one `<style>` element.
///
/// Sheets are shared behind `Rc` by the element that owns them, so rule
/// mutations go through `&self`.
#[derive(Debug, Default)]
pub struct StyleSheet {
    rules: RefCell<Vec<CssRule>>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source` permissively. Rules that cannot be read are kept as
    /// unparsed entries rather than dropped.
    pub fn from_source(source: &str) -> Self {
        StyleSheet {
            rules: RefCell::new(parse_stylesheet(source)),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.borrow().is_empty()
    }

    /// The rule at `index`, if any.
    pub fn item(&self, index: usize) -> Option<CssRule> {
        self.rules.borrow().get(index).cloned()
    }

    /// Snapshot of the current rules.
    pub fn css_rules(&self) -> RuleSet {
        RuleSet::from(self.rules.borrow().clone())
    }

    pub fn rule_texts(&self) -> Vec<String> {
        self.rules
            .borrow()
            .iter()
            .map(|rule| rule.css_text().to_owned())
            .collect()
    }

    /// Insert a single rule at `index` and return the index it landed at.
    ///
    /// The text must parse as exactly one valid rule; the sheet is left
    /// untouched otherwise.
    pub fn insert_rule(&self, rule: &str, index: usize) -> Result<usize, RuleError> {
        let len = self.len();
        if index > len {
            return Err(RuleError::IndexOutOfRange { index, len });
        }
        validate_rule(rule)?;
        self.rules.borrow_mut().insert(index, parse_rule(rule.trim()));
        Ok(index)
    }

    /// Remove the rule at `index`.
    pub fn delete_rule(&self, index: usize) -> Result<(), RuleError> {
        let len = self.len();
        if index >= len {
            return Err(RuleError::IndexOutOfRange { index, len });
        }
        self.rules.borrow_mut().remove(index);
        Ok(())
    }
}

/// Strict parse with lightningcss and no error recovery.
fn validate_rule(rule: &str) -> Result<(), RuleError> {
    let sheet = LightningStyleSheet::parse(rule, ParserOptions::default()).map_err(
        |err: LcssError<ParserError<'_>>| RuleError::syntax(rule, err.kind.to_string()),
    )?;
    match sheet.rules.0.len() {
        1 => Ok(()),
        count => Err(RuleError::RuleCount(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_and_delete_keep_order() {
        let sheet = StyleSheet::new();
        sheet.insert_rule("b { color: blue }", 0).unwrap();
        sheet.insert_rule("a { color: red }", 0).unwrap();
        sheet.insert_rule("c { color: green }", 2).unwrap();

        assert_eq!(
            sheet.rule_texts(),
            ["a{color:red}", "b{color:blue}", "c{color:green}"]
        );

        sheet.delete_rule(1).unwrap();
        assert_eq!(sheet.rule_texts(), ["a{color:red}", "c{color:green}"]);
    }

    #[test]
    fn out_of_range_indices() {
        let sheet = StyleSheet::from_source("a{color:red}");

        assert_eq!(
            sheet.insert_rule("b{color:blue}", 3),
            Err(RuleError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            sheet.delete_rule(1),
            Err(RuleError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn rejects_invalid_rule_text() {
        let sheet = StyleSheet::new();

        assert!(matches!(
            sheet.insert_rule("]bad[ b{color:blue}", 0),
            Err(RuleError::Syntax { .. })
        ));
        assert!(matches!(
            sheet.insert_rule("a{color:red} b{color:blue}", 0),
            Err(RuleError::RuleCount(2))
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn accepts_at_rules() {
        let sheet = StyleSheet::new();
        sheet
            .insert_rule("@media (min-width: 10px) { a { color: red } }", 0)
            .unwrap();

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.item(0).unwrap().selector_text(), None);
    }
}
