//! Stylesheet parsing on top of the `cssparser` tokenizer.
//!
//! Rule and at-rule preludes are captured as raw source slices;
//! declaration values are tokenized into the [`Component`] tree.
//! Parsing is all-or-nothing: any structural error fails the whole
//! parse, and the caller falls back to returning its input unchanged
//! rather than risking a partially-modeled document.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser, ToCss, Token,
};

use crate::color::math;

use super::document::{AtBody, AtRule, Declaration, Document, Item, StyleRule};
use super::value::{Alpha, Component, CssColor};

/// The input could not be modeled as a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure;

/// Parse css text into a [`Document`].
pub fn parse_stylesheet(css: &str) -> Result<Document, ParseFailure> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rule_parser = RuleParser;

    let mut document = Document::default();
    for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
        match result {
            Ok(item) => document.push(item),
            Err(_) => return Err(ParseFailure),
        }
    }
    Ok(document)
}

struct RuleParser;

impl<'i> QualifiedRuleParser<'i> for RuleParser {
    type Prelude = String;
    type QualifiedRule = Item;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let selectors = input.slice_from(start).trim().to_string();
        if selectors.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(selectors)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(Item::Style(StyleRule {
            selectors: prelude,
            declarations: parse_declaration_list(input)?,
        }))
    }
}

impl<'i> AtRuleParser<'i> for RuleParser {
    type Prelude = (String, String);
    type AtRule = Item;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let prelude = input.slice_from(start).trim().to_string();
        Ok((name.as_ref().to_string(), prelude))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let (name, prelude) = prelude;

        let body = if has_declaration_body(&name) {
            AtBody::Declarations(parse_declaration_list(input)?)
        } else {
            let mut items = Vec::new();
            let mut nested = RuleParser;
            let mut iter = StyleSheetParser::new(input, &mut nested);
            for result in &mut iter {
                match result {
                    Ok(item) => items.push(item),
                    Err((error, _)) => return Err(error),
                }
            }
            AtBody::Rules(items)
        };

        Ok(Item::At(AtRule {
            name,
            prelude,
            body,
        }))
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        let (name, prelude) = prelude;
        Ok(Item::At(AtRule {
            name,
            prelude,
            body: AtBody::None,
        }))
    }
}

/// At-rules whose block holds declarations rather than nested rules.
fn has_declaration_body(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "font-face" | "page" | "counter-style" | "property" | "viewport"
    )
}

fn parse_declaration_list<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<Vec<Declaration>, ParseError<'i, ()>> {
    let mut decl_parser = DeclParser;
    let mut declarations = Vec::new();
    let mut iter = RuleBodyParser::new(input, &mut decl_parser);
    for result in &mut iter {
        match result {
            Ok(declaration) => declarations.push(declaration),
            Err((error, _)) => return Err(error),
        }
    }
    Ok(declarations)
}

struct DeclParser;

impl<'i> DeclarationParser<'i> for DeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let mut value = parse_components(input)?;
        let important = strip_important(&mut value);
        trim_whitespace(&mut value);
        Ok(Declaration {
            property: name.as_ref().to_string(),
            value,
            important,
        })
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> AtRuleParser<'i> for DeclParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Tokenize a declaration value into components, depth-first through
/// nested functions and bracketed groups.
fn parse_components<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<Vec<Component>, ParseError<'i, ()>> {
    let mut components = Vec::new();
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Hash(ref value) | Token::IDHash(ref value) => {
                let raw = format!("#{}", value);
                match math::hex_to_rgb(&raw) {
                    Some((r, g, b)) => components.push(Component::Color(CssColor {
                        r,
                        g,
                        b,
                        alpha: None,
                        raw,
                    })),
                    None => components.push(Component::Raw(raw)),
                }
            }
            Token::Ident(ref name) => components.push(Component::Ident(name.as_ref().to_string())),
            Token::Function(ref name) => {
                let lower = name.as_ref().to_ascii_lowercase();
                if lower == "rgb" || lower == "rgba" {
                    if let Ok((r, g, b, alpha)) =
                        input.try_parse(|p| p.parse_nested_block(parse_rgb_args))
                    {
                        components.push(Component::Color(CssColor {
                            r,
                            g,
                            b,
                            alpha,
                            raw: input.slice_from(start).to_string(),
                        }));
                        continue;
                    }
                }
                let args = input.parse_nested_block(parse_components)?;
                components.push(Component::Function {
                    name: name.as_ref().to_string(),
                    args,
                });
            }
            Token::ParenthesisBlock => {
                let children = input.parse_nested_block(parse_components)?;
                components.push(Component::Paren(children));
            }
            Token::SquareBracketBlock => {
                let children = input.parse_nested_block(parse_components)?;
                components.push(Component::Square(children));
            }
            Token::CurlyBracketBlock => {
                input.parse_nested_block(|p| -> Result<(), ParseError<'i, ()>> {
                    while p.next_including_whitespace().is_ok() {}
                    Ok(())
                })?;
                components.push(Component::Raw(input.slice_from(start).to_string()));
            }
            ref other => components.push(Component::Raw(other.to_css_string())),
        }
    }
    Ok(components)
}

type RgbArgs = (u8, u8, u8, Option<Alpha>);

/// Parse the comma-separated arguments of `rgb()`/`rgba()`.
///
/// Only integer channels and a 0..1 alpha qualify; anything else (percent
/// channels, slash syntax, `var()` channels) is rejected so the caller
/// falls back to treating the function generically.
fn parse_rgb_args<'i, 't>(input: &mut Parser<'i, 't>) -> Result<RgbArgs, ParseError<'i, ()>> {
    let r = expect_channel(input)?;
    input.expect_comma()?;
    let g = expect_channel(input)?;
    input.expect_comma()?;
    let b = expect_channel(input)?;

    let alpha = if input.is_exhausted() {
        None
    } else {
        input.expect_comma()?;
        Some(expect_alpha(input)?)
    };
    input.expect_exhausted()?;

    Ok((r, g, b, alpha))
}

fn expect_channel<'i, 't>(input: &mut Parser<'i, 't>) -> Result<u8, ParseError<'i, ()>> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    if let Token::Number {
        int_value: Some(value),
        ..
    } = token
    {
        if (0..=255).contains(&value) {
            return Ok(value as u8);
        }
    }
    Err(location.new_unexpected_token_error(token))
}

fn expect_alpha<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Alpha, ParseError<'i, ()>> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    if let Token::Number { value, .. } = &token {
        if (0.0..=1.0).contains(value) {
            return Ok(Alpha {
                value: *value,
                css: token.to_css_string(),
            });
        }
    }
    Err(location.new_unexpected_token_error(token))
}

/// Detect and remove a trailing `!important`.
fn strip_important(components: &mut Vec<Component>) -> bool {
    let significant: Vec<usize> = components
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .collect();

    let [.., bang, keyword] = significant.as_slice() else {
        return false;
    };
    let is_bang = matches!(&components[*bang], Component::Raw(text) if text == "!");
    let is_keyword = matches!(
        &components[*keyword],
        Component::Ident(name) if name.eq_ignore_ascii_case("important")
    );
    if is_bang && is_keyword {
        components.truncate(*bang);
        true
    } else {
        false
    }
}

fn trim_whitespace(components: &mut Vec<Component>) {
    while components.last().is_some_and(|c| c.is_whitespace()) {
        components.pop();
    }
    while components.first().is_some_and(|c| c.is_whitespace()) {
        components.remove(0);
    }
}
