// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parser for path queries using nom parsers over the token stream
//!
//! Grammar:
//! ```text
//! path := term ('/' term)*        left-associative
//! term := atom | '(' path ')'
//! atom := <digits> '+' | <digits> '-'
//! ```

use log::debug;
use nom::{
    branch::alt,
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

use super::ast::{Atom, PathExpr};
use super::lexer::{tokenize, Token};
use super::pretty_printer::pretty_print_path;

/// Parser error type
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Lexer error: {0}")]
    LexerError(String),
    #[error("Unexpected token: {0}")]
    UnexpectedToken(Token),
    #[error("Expected token: {0}")]
    ExpectedToken(Token),
    #[error("Malformed atom '{0}': expected <label>+ or <label>-")]
    MalformedAtom(String),
    #[error("Empty path query")]
    EmptyQuery,
    #[error("Parentheses nested {0} levels deep, at most {max} allowed", max = MAX_NESTING_DEPTH)]
    TooDeep(usize),
}

/// Deepest parenthesis nesting accepted by `parse_path_query`
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse path query text such as `0+/(1-/2+)` into a `PathExpr`
pub fn parse_path_query(input: &str) -> Result<PathExpr, ParserError> {
    let tokens = tokenize(input).map_err(ParserError::LexerError)?;

    if tokens.len() == 1 {
        return Err(ParserError::EmptyQuery);
    }

    // Report bad atom text before structural errors so callers can tell the
    // two apart.
    if let Some(text) = tokens.iter().find_map(|token| match token {
        Token::Atom(text) if Atom::from_text(text).is_none() => Some(text.clone()),
        _ => None,
    }) {
        return Err(ParserError::MalformedAtom(text));
    }

    // The parser recurses once per open parenthesis.
    let depth = nesting_depth(&tokens);
    if depth > MAX_NESTING_DEPTH {
        return Err(ParserError::TooDeep(depth));
    }

    match path(&tokens) {
        Ok((remaining, expr)) => match remaining.first() {
            Some(Token::EOF) | None => {
                debug!("Successfully parsed path query '{}' into AST", input.trim());
                pretty_print_path(&expr);
                Ok(expr)
            }
            Some(unexpected) => Err(ParserError::UnexpectedToken(unexpected.clone())),
        },
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(match e.input.first() {
            Some(Token::EOF) | None => {
                ParserError::ExpectedToken(Token::Atom("<label>+|<label>-".to_string()))
            }
            Some(token) => ParserError::UnexpectedToken(token.clone()),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParserError::ExpectedToken(Token::EOF)),
    }
}

/// Deepest point reached by the parentheses in `tokens`, balanced or not
fn nesting_depth(tokens: &[Token]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for token in tokens {
        match token {
            Token::LeftParen => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Token::RightParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn path(tokens: &[Token]) -> IResult<&[Token], PathExpr> {
    let (tokens, first) = term(tokens)?;
    let (tokens, rest) = many0(preceded(slash, term))(tokens)?;

    let expr = rest
        .into_iter()
        .fold(first, |left, right| PathExpr::concat(left, right));
    Ok((tokens, expr))
}

fn term(tokens: &[Token]) -> IResult<&[Token], PathExpr> {
    alt((atom, delimited(left_paren, path, right_paren)))(tokens)
}

fn atom(tokens: &[Token]) -> IResult<&[Token], PathExpr> {
    match tokens.first() {
        Some(Token::Atom(text)) => match Atom::from_text(text) {
            Some(atom) => Ok((&tokens[1..], PathExpr::Leaf(atom))),
            None => Err(nom::Err::Failure(nom::error::Error::new(
                tokens,
                nom::error::ErrorKind::Verify,
            ))),
        },
        _ => Err(nom::Err::Error(nom::error::Error::new(
            tokens,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

fn expect_token<'a>(tokens: &'a [Token], expected: &Token) -> IResult<&'a [Token], ()> {
    match tokens.first() {
        Some(token) if token == expected => Ok((&tokens[1..], ())),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            tokens,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

fn slash(tokens: &[Token]) -> IResult<&[Token], ()> {
    expect_token(tokens, &Token::Slash)
}

fn left_paren(tokens: &[Token]) -> IResult<&[Token], ()> {
    expect_token(tokens, &Token::LeftParen)
}

fn right_paren(tokens: &[Token]) -> IResult<&[Token], ()> {
    expect_token(tokens, &Token::RightParen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ast::Direction;

    #[test]
    fn test_parse_single_atom() {
        let expr = parse_path_query("0-").unwrap();
        assert_eq!(expr, PathExpr::leaf(Atom::inverse(0)));
    }

    #[test]
    fn test_parse_is_left_associative() {
        let expr = parse_path_query("0+/1-/2+").unwrap();
        let expected = PathExpr::concat(
            PathExpr::concat(
                PathExpr::leaf(Atom::forward(0)),
                PathExpr::leaf(Atom::inverse(1)),
            ),
            PathExpr::leaf(Atom::forward(2)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_brackets_override_associativity() {
        let expr = parse_path_query("0+/(1-/2+)").unwrap();
        match expr {
            PathExpr::Concat(left, right) => {
                assert!(left.is_leaf());
                assert_eq!(right.atoms().len(), 2);
            }
            other => panic!("expected concatenation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_redundant_outer_parentheses() {
        let bracketed = parse_path_query("((1+/2-))").unwrap();
        let plain = parse_path_query("1+/2-").unwrap();
        assert_eq!(bracketed, plain);
    }

    #[test]
    fn test_serialize_then_parse() {
        for text in ["3+", "0+/1-", "(0+/1-)/2+", "0+/(1-/(2+/3-))"] {
            let expr = parse_path_query(text).unwrap();
            assert_eq!(expr.to_query_string(), text);
            assert_eq!(parse_path_query(&expr.to_query_string()).unwrap(), expr);
        }
    }

    #[test]
    fn test_malformed_atom() {
        match parse_path_query("abc") {
            Err(ParserError::MalformedAtom(text)) => assert_eq!(text, "abc"),
            other => panic!("expected MalformedAtom, got {:?}", other),
        }
        assert!(matches!(
            parse_path_query("1+/x-"),
            Err(ParserError::MalformedAtom(_))
        ));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(parse_path_query(""), Err(ParserError::EmptyQuery)));
        assert!(matches!(parse_path_query("   "), Err(ParserError::EmptyQuery)));
        assert!(matches!(
            parse_path_query("1+/"),
            Err(ParserError::UnexpectedToken(Token::Slash))
        ));
        assert!(matches!(
            parse_path_query("(1+/2+"),
            Err(ParserError::ExpectedToken(_)) | Err(ParserError::UnexpectedToken(_))
        ));
        assert!(matches!(
            parse_path_query("1+)"),
            Err(ParserError::UnexpectedToken(Token::RightParen))
        ));
        assert!(matches!(
            parse_path_query("1+ 2+"),
            Err(ParserError::UnexpectedToken(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}0+{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(
            parse_path_query(&nested(MAX_NESTING_DEPTH)).unwrap(),
            PathExpr::leaf(Atom::forward(0))
        );
        match parse_path_query(&nested(5000)) {
            Err(ParserError::TooDeep(depth)) => assert_eq!(depth, 5000),
            other => panic!("expected TooDeep, got {:?}", other),
        }
        // unbalanced input is rejected before it is parsed
        assert!(matches!(
            parse_path_query(&"(".repeat(MAX_NESTING_DEPTH + 1)),
            Err(ParserError::TooDeep(_))
        ));
    }

    #[test]
    fn test_long_flat_chain_parses() {
        let query = vec!["0+"; 2000].join("/");
        assert_eq!(parse_path_query(&query).unwrap().len(), 2000);
    }

    #[test]
    fn test_directions() {
        let atoms = parse_path_query("5+/6-").unwrap().atoms();
        assert_eq!(atoms[0].direction, Direction::Forward);
        assert_eq!(atoms[1].direction, Direction::Inverse);
        assert_eq!(atoms[1].label, 6);
    }
}
