//! CSS object model: rule types, permissive parsing and live style sheets.

pub mod rules;
pub mod stylesheet;
pub mod syntax;

pub use rules::{CssRule, Declaration, RuleKind, RuleSet};
pub use stylesheet::StyleSheet;
