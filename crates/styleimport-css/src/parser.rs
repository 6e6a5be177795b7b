//! Stylesheet parser adapter.
//!
//! Drives `cssparser`'s rule iterators and keeps only what selector lookup
//! needs. Top-level style rules become [`Rule`]s; their preludes are split
//! into selectors on top-level commas, and their bodies into raw
//! declarations. Comments are dropped from selectors and values. At-rules
//! are consumed and dropped since they carry no selectors.

use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseErrorKind, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser, Token,
};

use crate::ast::{Declaration, Rule, Stylesheet};
use crate::ParseError;

type CssError<'i> = cssparser::ParseError<'i, ()>;

/// Parse CSS text into a [`Stylesheet`].
///
/// `source` is a hint used in error messages and recorded on the result,
/// usually the path the text was read from.
#[tracing::instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn parse(text: &str, source: &str) -> Result<Stylesheet, ParseError> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser;

    let mut rules = Vec::new();
    for item in StyleSheetParser::new(&mut parser, &mut top) {
        match item {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {}
            Err((err, _)) => return Err(to_parse_error(err, source)),
        }
    }

    tracing::debug!(rules = rules.len(), "stylesheet parsed");
    Ok(Stylesheet {
        source: source.to_owned(),
        rules,
    })
}

fn to_parse_error(err: CssError<'_>, source: &str) -> ParseError {
    let message = match err.kind {
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("unexpected token {token:?}")
        }
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "unexpected end of input".to_owned()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::QualifiedRuleInvalid) => {
            "invalid rule".to_owned()
        }
        ParseErrorKind::Basic(other) => format!("{other:?}"),
        ParseErrorKind::Custom(()) => "invalid declaration".to_owned(),
    };
    ParseError {
        message,
        file: source.to_owned(),
        // cssparser lines are 0-based, columns 1-based
        line: err.location.line + 1,
        column: err.location.column,
    }
}

/// Consume the rest of `input` and return its source text, trimmed, with
/// top-level comments removed.
fn text_without_comments(input: &mut Parser<'_, '_>) -> String {
    let mut out = String::new();
    let mut start = input.position();
    loop {
        let before = input.position();
        let is_comment = match input.next_including_whitespace_and_comments() {
            Ok(token) => matches!(token, Token::Comment(_)),
            Err(_) => break,
        };
        if is_comment {
            out.push_str(input.slice(start..before));
            start = input.position();
        }
    }
    out.push_str(input.slice_from(start));
    out.trim().to_owned()
}

/// Builds one optional [`Rule`] per top-level item. At-rules and rules
/// without any selector produce `None`.
struct TopLevelParser;

impl<'i> QualifiedRuleParser<'i> for TopLevelParser {
    type Prelude = Vec<String>;
    type QualifiedRule = Option<Rule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssError<'i>> {
        let selectors = input
            .parse_comma_separated(|input| Ok::<_, CssError<'i>>(text_without_comments(input)))?;
        Ok(selectors.into_iter().filter(|s| !s.is_empty()).collect())
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, CssError<'i>> {
        let mut collector = DeclarationCollector;
        let mut declarations = Vec::new();
        for item in RuleBodyParser::new(input, &mut collector) {
            let declaration = item.map_err(|(err, _)| err)?;
            declarations.push(declaration);
        }

        if selectors.is_empty() {
            return Ok(None);
        }
        Ok(Some(Rule {
            selectors,
            declarations,
        }))
    }
}

impl<'i> AtRuleParser<'i> for TopLevelParser {
    type Prelude = ();
    type AtRule = Option<Rule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssError<'i>> {
        tracing::trace!(at_rule = &*name, "skipping at-rule");
        while input.next().is_ok() {}
        Ok(())
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(None)
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, CssError<'i>> {
        while input.next().is_ok() {}
        Ok(None)
    }
}

/// Collects `property: value` items of a rule body as raw text.
struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, CssError<'i>> {
        Ok(Declaration::new(&*name, text_without_comments(input)))
    }
}

// Nested rules are not part of the model; the default impls reject them.
impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
