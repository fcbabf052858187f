//! Default recognizers for the lexemes of an expression.
//!
//! A tokenizer receives the remaining input, starting at the current scan
//! position, and returns the input left after the recognized lexeme together
//! with the token for it. A tokenizer which does not recognize the input
//! returns it unchanged with [`Token::invalid`](../struct.Token.html).

use crate::token::{Token, VARIABLE_SENTINEL};

/// Boxed form in which the shunter stores tokenizers
pub type Tokenizer = Box<dyn Fn(&str) -> (&str, Token)>;

/// Pin the signature of a tokenizer closure, so that it accepts input of
/// any lifetime.
pub fn tokenizer<F>(function: F) -> F
where
    F: Fn(&str) -> (&str, Token),
{
    function
}

/// Recognize an unsigned integer literal: `0`, `42`, ...
pub fn integer(input: &str) -> (&str, Token) {
    let end = digits(input);
    if end == 0 {
        return (input, Token::invalid());
    }
    (&input[end..], Token::number(&input[..end]))
}

/// Recognize an unsigned floating point literal: `12`, `1.5`, `.5`, `2e-3`,
/// `6.02E23`.
pub fn float(input: &str) -> (&str, Token) {
    let bytes = input.as_bytes();
    let mut end = digits(input);
    let mut mantissa = end;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits(&input[end + 1..]);
        mantissa += fraction;
        end += 1 + fraction;
    }
    if mantissa == 0 {
        return (input, Token::invalid());
    }
    if let Some(b'e') | Some(b'E') = bytes.get(end) {
        let mut exponent = end + 1;
        if let Some(b'+') | Some(b'-') = bytes.get(exponent) {
            exponent += 1;
        }
        let count = digits(&input[exponent..]);
        // `2e` is the literal `2` followed by something else
        if count > 0 {
            end = exponent + count;
        }
    }
    (&input[end..], Token::number(&input[..end]))
}

/// Recognize a variable introduced by the default `@` sentinel: `@x`,
/// `@rate_2`, `@s0.t[1]`. The token text keeps the sentinel.
pub fn variable(input: &str) -> (&str, Token) {
    sentinel_variable(input, VARIABLE_SENTINEL)
}

/// Build a variable tokenizer using `sentinel` in place of `@`.
pub fn variable_with_sentinel(sentinel: char) -> impl Fn(&str) -> (&str, Token) {
    tokenizer(move |input| sentinel_variable(input, sentinel))
}

fn sentinel_variable(input: &str, sentinel: char) -> (&str, Token) {
    let rest = match input.strip_prefix(sentinel) {
        Some(rest) => rest,
        None => return (input, Token::invalid()),
    };
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if is_variable_start(c) => {}
        _ => return (input, Token::invalid()),
    }
    let end = chars
        .find(|&(_, c)| !is_variable_part(c))
        .map_or(rest.len(), |(i, _)| i);
    let length = sentinel.len_utf8() + end;
    (&input[length..], Token::variable(&input[..length]))
}

/// Recognize a function name: an ASCII identifier such as `sin` or `log10`.
/// Whether the function exists is only checked when building the tree.
pub fn function(input: &str) -> (&str, Token) {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return (input, Token::invalid()),
    }
    let end = chars
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(input.len(), |(i, _)| i);
    (&input[end..], Token::function(&input[..end]))
}

/// Recognize a single character operator. Any ASCII punctuation which is not
/// a parenthesis or a comma is accepted here; the shunter checks it against
/// its operator table.
pub fn operator(input: &str) -> (&str, Token) {
    match input.chars().next() {
        Some(c) if c.is_ascii_punctuation() && !matches!(c, '(' | ')' | ',') => {
            (&input[1..], Token::operator(c))
        }
        _ => (input, Token::invalid()),
    }
}

/// Length of the run of ASCII digits at the start of `input`
fn digits(input: &str) -> usize {
    input.bytes().take_while(u8::is_ascii_digit).count()
}

/// Check if `c` can appear at the first character of a variable
fn is_variable_start(c: char) -> bool {
    c == '_' || (c.is_ascii() && c.is_alphabetic())
}

/// Check if `c` can appear inside a variable
fn is_variable_part(c: char) -> bool {
    c == '.' || c == '_' || c == '[' || c == ']' || (c.is_ascii() && c.is_alphanumeric())
}
