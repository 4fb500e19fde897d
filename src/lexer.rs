// ABOUTME: Token boundary scanner for the s-expression reader

use nom::branch::alt;
use nom::bytes::complete::{take_till1, take_while};
use nom::character::complete::{char, multispace0, one_of};
use nom::combinator::recognize;
use nom::{IResult, Parser};

/// Characters that are whole tokens on their own.
const PREFIX: &str = "()'\"";

/// Characters that end a bare token: parentheses, a string quote, or
/// whitespace.
fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '"' | ' ' | '\t' | '\r' | '\n')
}

/// One token span together with the input that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub rest: &'a str,
}

/// A `;` comment running to the end of the line.
fn comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

/// Skip whitespace and comments between tokens.
fn skip_atmosphere(input: &str) -> IResult<&str, ()> {
    let mut input = input;
    loop {
        let (rest, _) = multispace0(input)?;
        match comment(rest) {
            Ok((rest, ())) => input = rest,
            Err(_) => return Ok((rest, ())),
        }
    }
}

fn token_text(input: &str) -> IResult<&str, &str> {
    alt((recognize(one_of(PREFIX)), take_till1(is_delimiter))).parse(input)
}

/// Finds the next token. Returns None at end of input; an empty line is a
/// condition for the caller, not an error.
pub fn next_token(input: &str) -> Option<Token<'_>> {
    let (input, ()) = skip_atmosphere(input).ok()?;
    match token_text(input) {
        Ok((rest, text)) => Some(Token { text, rest }),
        Err(_) => None,
    }
}

/// Renders every token span in `input`, the reader's debug tracing.
pub fn trace_tokens(input: &str) -> String {
    let mut out = String::new();
    let mut rest = input;
    while let Some(token) = next_token(rest) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push('\'');
        out.push_str(token.text);
        out.push('\'');
        rest = token.rest;
    }
    out
}
