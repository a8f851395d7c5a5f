//! Owned rule types of the CSS object model.

use std::fmt;
use std::slice;
use std::vec;

/// A single `name: value [!important]` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name; custom properties keep their case.
    pub name: String,
    /// Value text with whitespace runs collapsed.
    pub value: String,
    pub important: bool,
}

/// What a rule turned out to be when parsed at the document level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// `selector { declarations nested-rules }`
    Style {
        selector: String,
        declarations: Vec<Declaration>,
        rules: Vec<CssRule>,
    },
    /// An at-rule such as `@media` or `@keyframes`. Its body, if any, is
    /// only kept in the rule text.
    At { name: String, prelude: String },
    /// Text that has no parsable block. Kept so that it can be rejected on insertion.
    Unparsed,
}

/// One rule with its serialized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    css_text: String,
    kind: RuleKind,
}

impl CssRule {
    pub(crate) fn new(css_text: String, kind: RuleKind) -> Self {
        CssRule { css_text, kind }
    }

    /// The serialized text of the rule.
    pub fn css_text(&self) -> &str {
        &self.css_text
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn selector_text(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Style { selector, .. } => Some(selector),
            _ => None,
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        match &self.kind {
            RuleKind::Style { declarations, .. } => declarations,
            _ => &[],
        }
    }

    /// Rules nested inside a style rule's block, in source order.
    pub fn nested_rules(&self) -> &[CssRule] {
        match &self.kind {
            RuleKind::Style { rules, .. } => rules,
            _ => &[],
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)?;
        if self.important {
            f.write_str("!important")?;
        }
        Ok(())
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_text)
    }
}

/// Ordered rules parsed from one piece of stylesheet text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CssRule>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CssRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, CssRule> {
        self.rules.iter()
    }

    /// Serialized text of every rule, in order.
    pub fn texts(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.css_text.clone()).collect()
    }
}

impl From<Vec<CssRule>> for RuleSet {
    fn from(rules: Vec<CssRule>) -> Self {
        RuleSet { rules }
    }
}

impl IntoIterator for RuleSet {
    type Item = CssRule;
    type IntoIter = vec::IntoIter<CssRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a CssRule;
    type IntoIter = slice::Iter<'a, CssRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
