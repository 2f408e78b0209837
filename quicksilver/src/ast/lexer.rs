// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lexer for path query text
//!
//! Every token parser must either consume input or return an error; the
//! tokenize loop rejects a parser that succeeds without advancing.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, value},
    IResult,
};
use std::fmt;

/// Token types for path queries
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Raw atom text such as `3+`; validated by the parser
    Atom(String),
    Slash,
    LeftParen,
    RightParen,
    Whitespace,
    EOF,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(text) => write!(f, "{}", text),
            Token::Slash => write!(f, "/"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Whitespace => write!(f, " "),
            Token::EOF => write!(f, "end of input"),
        }
    }
}

/// Split query text into tokens, dropping whitespace and appending `EOF`
pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut remaining = input;
    let mut tokens = Vec::new();

    while !remaining.is_empty() {
        match token(remaining) {
            Ok((next_remaining, token)) => {
                if next_remaining.len() == remaining.len() {
                    return Err(format!(
                        "Lexer made no progress at '{}' (token {:?})",
                        remaining, token
                    ));
                }
                if token != Token::Whitespace {
                    tokens.push(token);
                }
                remaining = next_remaining;
            }
            Err(e) => return Err(format!("Lexer error: {:?}", e)),
        }
    }

    tokens.push(Token::EOF);
    Ok(tokens)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        whitespace,
        value(Token::Slash, char('/')),
        value(Token::LeftParen, char('(')),
        value(Token::RightParen, char(')')),
        atom_text,
    ))(input)
}

fn whitespace(input: &str) -> IResult<&str, Token> {
    let (remaining, spaces) = take_while(|c: char| c.is_whitespace())(input)?;
    if spaces.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Space,
        )));
    }
    Ok((remaining, Token::Whitespace))
}

fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '/' | '(' | ')')
}

fn atom_text(input: &str) -> IResult<&str, Token> {
    map(take_while1(is_atom_char), |text: &str| {
        Token::Atom(text.to_string())
    })(input)
}
