//! Substitution of example arguments into step messages.
//!
//! `{0}`, `{1}`, … are replaced by the bound argument at that index. `{{` and
//! `}}` produce literal braces. Any other brace sequence is copied verbatim.

use std::{iter::Peekable, str::Chars};

use crate::error::ConstructionError;

/// Replace positional placeholders in `template` with `arguments`.
///
/// # Errors
///
/// Returns [`ConstructionError::PlaceholderOutOfRange`] if a placeholder
/// names an index with no bound argument.
pub(crate) fn render(template: &str, arguments: &[String]) -> Result<String, ConstructionError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => match placeholder(&mut chars) {
                Placeholder::Index(index) => {
                    let argument =
                        arguments
                            .get(index)
                            .ok_or(ConstructionError::PlaceholderOutOfRange {
                                index,
                                available: arguments.len(),
                            })?;
                    out.push_str(argument);
                }
                Placeholder::Literal(text) => {
                    out.push('{');
                    out.push_str(&text);
                }
            },
            other => out.push(other),
        }
    }
    Ok(out)
}

enum Placeholder {
    Index(usize),
    Literal(String),
}

/// Consume the remainder of a placeholder after its opening brace.
fn placeholder(chars: &mut Peekable<Chars<'_>>) -> Placeholder {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    if digits.is_empty() || chars.peek() != Some(&'}') {
        return Placeholder::Literal(digits);
    }
    chars.next();
    match digits.parse() {
        Ok(index) => Placeholder::Index(index),
        Err(_) => Placeholder::Literal(format!("{digits}}}")),
    }
}
