//! Document-level stylesheet parsing.
//!
//! This is the permissive half of the CSS object model. cssparser's
//! [`StyleSheetParser`] walks the top-level rules and [`RuleBodyParser`]
//! reads each block into declarations and nested rules. Nothing here rejects
//! input: a rule that cannot be read is kept as [`RuleKind::Unparsed`] and
//! only fails later, when it is inserted into a live sheet.

use super::rules::{CssRule, Declaration, RuleKind};
use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseError, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser, Token,
};
use log::trace;

/// Parse a whole stylesheet into its top-level rules, in source order.
pub fn parse_stylesheet(source: &str) -> Vec<CssRule> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();

    for result in StyleSheetParser::new(&mut parser, &mut TopLevelParser) {
        match result {
            Ok(rule) => rules.push(rule),
            Err((_, slice)) => {
                let text = collapse_whitespace(slice);
                if !text.is_empty() {
                    rules.push(CssRule::new(text, RuleKind::Unparsed));
                }
            }
        }
    }
    rules
}

/// Parse the text of a single rule. Anything after the first rule is ignored.
pub fn parse_rule(text: &str) -> CssRule {
    parse_stylesheet(text)
        .into_iter()
        .next()
        .unwrap_or_else(|| CssRule::new(collapse_whitespace(text), RuleKind::Unparsed))
}

/// Rules at the top of a stylesheet.
struct TopLevelParser;

/// Declarations, nested style rules and nested at-rules inside a block.
struct BodyParser;

enum BodyItem {
    Declaration(Declaration),
    Rule(CssRule),
}

/// An at-rule name with its prelude text.
struct AtPrelude {
    name: String,
    prelude: String,
}

impl AtPrelude {
    fn read(name: &str, input: &mut Parser<'_, '_>) -> Self {
        let (text, _) = read_to_end(input);
        AtPrelude {
            name: name.to_ascii_lowercase(),
            prelude: collapse_whitespace(text),
        }
    }

    fn head(&self) -> String {
        if self.prelude.is_empty() {
            format!("@{}", self.name)
        } else {
            format!("@{} {}", self.name, self.prelude)
        }
    }

    fn without_block(self) -> CssRule {
        let css_text = format!("{};", self.head());
        CssRule::new(
            css_text,
            RuleKind::At {
                name: self.name,
                prelude: self.prelude,
            },
        )
    }

    fn with_block(self, input: &mut Parser<'_, '_>) -> CssRule {
        let (declarations, rules) = parse_body(input);
        let css_text = format!("{}{{{}}}", self.head(), serialize_body(&declarations, &rules));
        CssRule::new(
            css_text,
            RuleKind::At {
                name: self.name,
                prelude: self.prelude,
            },
        )
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelParser {
    type Prelude = String;
    type QualifiedRule = CssRule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<String, ParseError<'i, ()>> {
        selector_prelude(input)
    }

    fn parse_block<'t>(
        &mut self,
        selector: String,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<CssRule, ParseError<'i, ()>> {
        Ok(style_rule(selector, input))
    }
}

impl<'i> AtRuleParser<'i> for TopLevelParser {
    type Prelude = AtPrelude;
    type AtRule = CssRule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<AtPrelude, ParseError<'i, ()>> {
        Ok(AtPrelude::read(&name, input))
    }

    fn rule_without_block(
        &mut self,
        prelude: AtPrelude,
        _start: &ParserState,
    ) -> Result<CssRule, ()> {
        Ok(prelude.without_block())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: AtPrelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<CssRule, ParseError<'i, ()>> {
        Ok(prelude.with_block(input))
    }
}

impl<'i> DeclarationParser<'i> for BodyParser {
    type Declaration = BodyItem;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<BodyItem, ParseError<'i, ()>> {
        let custom = name.starts_with("--");
        let (text, has_block) = read_to_end(input);
        // `a:hover { ... }` reads like a declaration up to its block. Failing
        // here makes cssparser retry the item as a nested rule.
        if has_block && !custom {
            return Err(input.new_custom_error(()));
        }
        let (value, important) = split_important_tail(text);
        let value = collapse_whitespace(&value);
        if value.is_empty() && !custom {
            return Err(input.new_custom_error(()));
        }
        let name = if custom {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };
        Ok(BodyItem::Declaration(Declaration {
            name,
            value,
            important,
        }))
    }
}

impl<'i> QualifiedRuleParser<'i> for BodyParser {
    type Prelude = String;
    type QualifiedRule = BodyItem;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<String, ParseError<'i, ()>> {
        selector_prelude(input)
    }

    fn parse_block<'t>(
        &mut self,
        selector: String,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<BodyItem, ParseError<'i, ()>> {
        Ok(BodyItem::Rule(style_rule(selector, input)))
    }
}

impl<'i> AtRuleParser<'i> for BodyParser {
    type Prelude = AtPrelude;
    type AtRule = BodyItem;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<AtPrelude, ParseError<'i, ()>> {
        Ok(AtPrelude::read(&name, input))
    }

    fn rule_without_block(
        &mut self,
        prelude: AtPrelude,
        _start: &ParserState,
    ) -> Result<BodyItem, ()> {
        Ok(BodyItem::Rule(prelude.without_block()))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: AtPrelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<BodyItem, ParseError<'i, ()>> {
        Ok(BodyItem::Rule(prelude.with_block(input)))
    }
}

impl<'i> RuleBodyItemParser<'i, BodyItem, ()> for BodyParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Consume the rest of `input`, returning its source text and whether a
/// `{}` block appeared at this nesting level.
fn read_to_end<'i>(input: &mut Parser<'i, '_>) -> (&'i str, bool) {
    let start = input.position();
    let mut has_block = false;
    while let Ok(token) = input.next_including_whitespace_and_comments() {
        if matches!(token, Token::CurlyBracketBlock) {
            has_block = true;
        }
    }
    (input.slice_from(start), has_block)
}

fn selector_prelude<'i>(input: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    let (text, _) = read_to_end(input);
    let selector = collapse_whitespace(text);
    if selector.is_empty() {
        return Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid));
    }
    Ok(selector)
}

fn style_rule(selector: String, input: &mut Parser<'_, '_>) -> CssRule {
    let (declarations, rules) = parse_body(input);
    let css_text = format!("{selector}{{{}}}", serialize_body(&declarations, &rules));
    CssRule::new(
        css_text,
        RuleKind::Style {
            selector,
            declarations,
            rules,
        },
    )
}

fn parse_body(input: &mut Parser<'_, '_>) -> (Vec<Declaration>, Vec<CssRule>) {
    let mut declarations = Vec::new();
    let mut rules = Vec::new();
    for item in RuleBodyParser::new(input, &mut BodyParser) {
        match item {
            Ok(BodyItem::Declaration(declaration)) => declarations.push(declaration),
            Ok(BodyItem::Rule(rule)) => rules.push(rule),
            Err((_, slice)) => trace!("dropping unreadable block item {:?}", slice),
        }
    }
    (declarations, rules)
}

/// Declarations first, then nested rules.
fn serialize_body(declarations: &[Declaration], rules: &[CssRule]) -> String {
    let mut body = declarations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";");
    if !declarations.is_empty() && !rules.is_empty() {
        body.push(';');
    }
    for rule in rules {
        body.push_str(rule.css_text());
    }
    body
}

/// Split a trailing `!important` off a value.
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if let Some(head) = lowered.strip_suffix("important") {
        let head = head.trim_end();
        if let Some(head) = head.strip_suffix('!') {
            return (trimmed[..head.len()].trim_end().to_owned(), true);
        }
    }
    (trimmed.to_owned(), false)
}

/// Collapse whitespace runs to single spaces, leaving quoted strings intact.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for ch in text.trim().chars() {
        if let Some(open) = quote {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        }
        out.push(ch);
    }
    out
}
