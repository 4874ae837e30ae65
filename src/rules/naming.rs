//! Naming convention checks shared by the rule families

use crate::config::NamingStyle;
use regex::Regex;
use std::sync::OnceLock;

fn snake_case_regex() -> &'static Regex {
    static SNAKE_CASE: OnceLock<Regex> = OnceLock::new();
    SNAKE_CASE.get_or_init(|| {
        Regex::new(r"^[a-z]+(_[a-z0-9]+)*$").unwrap_or_else(|e| panic!("snake_case regex: {e}"))
    })
}

fn upper_camel_regex() -> &'static Regex {
    static UPPER_CAMEL: OnceLock<Regex> = OnceLock::new();
    UPPER_CAMEL.get_or_init(|| {
        Regex::new(r"^([A-Z][a-z]+)+$").unwrap_or_else(|e| panic!("UpperCamelCase regex: {e}"))
    })
}

/// Lowercase words joined by single underscores; digits allowed except in the first word
pub fn is_snake_case(name: &str) -> bool {
    snake_case_regex().is_match(name)
}

/// Single `UpperCamelCase` word made of letters only
pub fn is_upper_camel_case(word: &str) -> bool {
    upper_camel_regex().is_match(word)
}

/// Space-separated words, each `UpperCamelCase` or an uppercase acronym of at most five letters
pub fn is_title_words(name: &str) -> bool {
    !name.is_empty()
        && name.split(' ').all(|word| {
            let acronym = !word.is_empty()
                && word.chars().count() <= 5
                && word.chars().all(|c| c.is_ascii_uppercase());
            acronym || is_upper_camel_case(word)
        })
}

/// Whether `name` follows the given naming style
pub fn follows_style(name: &str, style: NamingStyle) -> bool {
    match style {
        NamingStyle::SnakeCase => is_snake_case(name),
        NamingStyle::TitleWords => is_title_words(name),
    }
}

/// Convert a display name to its snake_case form
///
/// Separators (whitespace, `-`, `.`, `,`) become underscores and an underscore
/// is inserted before each uppercase letter that does not already follow one.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_whitespace() || matches!(c, '-' | '.' | ',' | '_') {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out.trim_matches('_').to_string()
}

/// Describe the style for failure messages
pub fn style_hint(style: NamingStyle) -> &'static str {
    match style {
        NamingStyle::SnakeCase => "lowercase words separated by underscores",
        NamingStyle::TitleWords => {
            "space-separated UpperCamelCase words or uppercase acronyms of at most 5 letters"
        }
    }
}
