//! Escaping for each output language.

use std::fmt::Write;

use serde_json::Value;

/// Escape text for HTML content and double-quoted attributes.
#[must_use]
pub fn html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A JavaScript string literal, double-quoted. `<`, `>` and `&` are
/// written as unicode escapes so the literal never contains markup.
#[must_use]
pub fn js_string(input: &str) -> String {
    Value::String(input.to_string())
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// JSX child text. Plain text is emitted as-is; anything JSX would interpret
/// is wrapped in a string expression.
#[must_use]
pub fn jsx_text(input: &str) -> String {
    let needs_expression = input
        .chars()
        .any(|c| matches!(c, '{' | '}' | '<' | '>' | '&' | '"' | '\'' | '\\' | '\n' | '\r'));
    if needs_expression {
        format!("{{{}}}", js_string(input))
    } else {
        input.to_string()
    }
}

/// A JSX attribute value including its delimiters.
#[must_use]
pub fn jsx_attr(input: &str) -> String {
    let needs_expression = input
        .chars()
        .any(|c| matches!(c, '{' | '}' | '"' | '\\' | '\n' | '\r' | '<' | '>' | '&'));
    if needs_expression {
        format!("{{{}}}", js_string(input))
    } else {
        format!("\"{input}\"")
    }
}

/// Object key for a JSX style object: bare when it is an identifier,
/// quoted otherwise.
#[must_use]
pub fn js_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        key.to_string()
    } else {
        js_string(key)
    }
}

/// Convert a camelCase style key to a CSS property name.
///
/// Characters outside `[a-z0-9-]` are dropped, so the result is always a safe
/// property name (possibly empty).
#[must_use]
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }
    out
}

/// Strip characters that would end a CSS declaration or block.
#[must_use]
pub fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// A class name or identifier fragment: only `[A-Za-z0-9_-]` survive.
#[must_use]
pub fn identifier(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('-');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A single class name as a CSS identifier, backslash-escaping anything a
/// selector would otherwise interpret.
#[must_use]
pub fn css_class(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut first = true;
    while let Some(c) = chars.next() {
        let leading_digit = first
            && (c.is_ascii_digit()
                || (c == '-' && chars.peek().is_some_and(char::is_ascii_digit)));
        if c.is_ascii_control() || (leading_digit && c.is_ascii_digit()) {
            let _ = write!(out, "\\{:x} ", u32::from(c));
        } else if leading_digit
            || !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
        {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
        first = false;
    }
    out
}
