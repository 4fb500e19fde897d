// ABOUTME: Recursive-descent reader turning source text into heap values

use crate::error::Error;
use crate::interp::Interp;
use crate::lexer;
use crate::value::Value;
use std::num::IntErrorKind;

/// What one reader step produced. `ListEnd` and `Empty` are conditions,
/// not errors: a list parse consumes the former, and a host driving the
/// reader in a loop stops on the latter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed {
    /// A complete expression.
    Expr(Value),
    /// A complete expression produced by the `'` shorthand.
    Quoted(Value),
    /// The `)` terminating the list the caller is reading.
    ListEnd,
    /// Nothing left but whitespace and comments.
    Empty,
}

impl Parsed {
    /// The value carried by `Expr` and `Quoted` outcomes.
    pub fn value(self) -> Option<Value> {
        match self {
            Parsed::Expr(v) | Parsed::Quoted(v) => Some(v),
            Parsed::ListEnd | Parsed::Empty => None,
        }
    }
}

/// Parses one expression starting at `input`, returning the outcome and
/// the unconsumed remainder.
pub fn parse_expr<'a>(interp: &mut Interp, input: &'a str) -> Result<(Parsed, &'a str), Error> {
    let Some(token) = lexer::next_token(input) else {
        return Ok((Parsed::Empty, input));
    };

    match token.text {
        "(" => parse_list(interp, token.rest),
        ")" => Ok((Parsed::ListEnd, token.rest)),
        "'" => parse_quote(interp, token.rest),
        "\"" => parse_string(interp, token.rest),
        text => {
            let value = parse_primitive(interp, text)?;
            Ok((Parsed::Expr(value), token.rest))
        }
    }
}

/// `'expr` reads as the two-element list `(QUOTE expr)`.
fn parse_quote<'a>(interp: &mut Interp, input: &'a str) -> Result<(Parsed, &'a str), Error> {
    let (parsed, rest) = parse_expr(interp, input)?;
    match parsed {
        Parsed::Expr(value) | Parsed::Quoted(value) => {
            let quote = Value::Symbol(interp.forms.quote);
            let tail = interp.cons(value, Value::Nil);
            let list = interp.cons(quote, tail);
            Ok((Parsed::Quoted(list), rest))
        }
        Parsed::ListEnd => Err(Error::syntax("quote before )")),
        Parsed::Empty => Err(Error::syntax("quote requires an expression")),
    }
}

/// String literals hold their text verbatim; there are no escape
/// sequences, so the literal simply runs to the next `"`.
fn parse_string<'a>(interp: &mut Interp, input: &'a str) -> Result<(Parsed, &'a str), Error> {
    match input.find('"') {
        Some(end) => {
            let value = interp.string(&input[..end]);
            Ok((Parsed::Expr(value), &input[end + 1..]))
        }
        None => Err(Error::syntax("unterminated string literal")),
    }
}

/// Reads list elements after `(`. A `.` token makes the next expression
/// the final tail, which must be followed by `)`.
fn parse_list<'a>(interp: &mut Interp, input: &'a str) -> Result<(Parsed, &'a str), Error> {
    let mut head = Value::Nil;
    let mut last: Option<crate::heap::PairRef> = None;
    let mut pending_dot = false;
    let mut tail_closed = false;
    let mut input = input;

    loop {
        if let Some(token) = lexer::next_token(input) {
            if token.text == "." {
                if last.is_none() {
                    return Err(Error::syntax("dotted pair with no left-hand side"));
                }
                if pending_dot || tail_closed {
                    return Err(Error::syntax("misplaced . in list"));
                }
                pending_dot = true;
                input = token.rest;
                continue;
            }
        }

        let (parsed, rest) = parse_expr(interp, input)?;
        input = rest;
        match parsed {
            Parsed::ListEnd => {
                if pending_dot {
                    return Err(Error::syntax("dotted pair with no right-hand side"));
                }
                return Ok((Parsed::Expr(head), input));
            }
            Parsed::Empty => return Err(Error::syntax("unterminated list")),
            Parsed::Expr(value) | Parsed::Quoted(value) => {
                if tail_closed {
                    return Err(Error::syntax("expression after dotted pair tail"));
                }
                match last {
                    None => {
                        let p = interp.heap.alloc_pair(value, Value::Nil);
                        head = Value::Pair(p);
                        last = Some(p);
                    }
                    Some(prev) if pending_dot => {
                        interp.heap.set_cdr(prev, value);
                        pending_dot = false;
                        tail_closed = true;
                    }
                    Some(prev) => {
                        let p = interp.heap.alloc_pair(value, Value::Nil);
                        interp.heap.set_cdr(prev, Value::Pair(p));
                        last = Some(p);
                    }
                }
            }
        }
    }
}

/// Dispatches a bare token: hash literal, number, or symbol.
fn parse_primitive(interp: &mut Interp, text: &str) -> Result<Value, Error> {
    let first = text
        .chars()
        .next()
        .expect("the lexer never yields an empty token");

    if first == '#' {
        return match text {
            "#t" | "#T" => Ok(Value::Bool(true)),
            "#f" | "#F" => Ok(Value::Bool(false)),
            _ => Err(Error::syntax(format!("unknown hash literal: {text}"))),
        };
    }

    // A bare sign is an ordinary symbol; a sign followed by anything
    // attempts numeric parsing, as does a leading digit.
    let numeric_lead =
        first.is_ascii_digit() || ((first == '+' || first == '-') && text.len() > 1);
    if numeric_lead {
        return parse_number(text);
    }

    Ok(symbol_or_nil(interp, text))
}

/// Symbol names are upper-cased; the spelling NIL denotes the nil value.
fn symbol_or_nil(interp: &mut Interp, text: &str) -> Value {
    let name = text.to_uppercase();
    if name == "NIL" {
        return Value::Nil;
    }
    Value::Symbol(interp.intern(&name))
}

/// Integer first, float second; anything else is malformed.
fn parse_number(text: &str) -> Result<Value, Error> {
    if let Some(result) = parse_integer(text)? {
        return Ok(Value::Integer(result));
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_infinite() => Err(Error::NumericOverflow(text.to_string())),
        Ok(f) => Ok(Value::Float(f)),
        Err(_) => Err(Error::syntax(format!("malformed number: {text}"))),
    }
}

/// strtol-style base detection: after an optional sign, `0x`/`0X` is hex
/// and a leading `0` is octal; everything else is decimal. Returns
/// Ok(None) when the token is not an integer in the detected base.
fn parse_integer(text: &str) -> Result<Option<i64>, Error> {
    let (sign, magnitude) = match text.as_bytes()[0] {
        b'+' => ("+", &text[1..]),
        b'-' => ("-", &text[1..]),
        _ => ("", text),
    };

    let (radix, digits) = if let Some(hex) = magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        (16, hex)
    } else if magnitude.len() > 1 && magnitude.starts_with('0') {
        (8, &magnitude[1..])
    } else {
        (10, magnitude)
    };

    if digits.is_empty() {
        return Ok(None);
    }

    let signed = format!("{sign}{digits}");
    match i64::from_str_radix(&signed, radix) {
        Ok(n) => Ok(Some(n)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Err(Error::NumericOverflow(text.to_string())),
            IntErrorKind::NegOverflow => Err(Error::NumericUnderflow(text.to_string())),
            _ => Ok(None),
        },
    }
}
