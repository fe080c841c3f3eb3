//! Rule checks
//!
//! Each submodule exposes `find_*`/`scan` functions that return plain
//! findings, plus the evaluators the catalog registers. The deep compliance
//! report reuses the findings directly.

pub mod accessibility;
pub mod components;
pub mod localization;
pub mod performance;
pub mod rtl;
pub mod tokens;

use crate::markup::{Attribute, Position, Span};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\s"'`{}(),+?]+"#).unwrap());

/// One whitespace-delimited class name inside a `className`/`class` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassToken<'a> {
    /// Byte offset inside the attribute value text.
    pub offset: usize,
    pub full: &'a str,
    /// Variants, `!` and `-` in front of the utility (`md:hover:-`).
    pub prefix: &'a str,
    pub utility: &'a str,
}

pub fn class_tokens(text: &str) -> Vec<ClassToken<'_>> {
    CLASS_TOKEN_RE
        .find_iter(text)
        .map(|m| {
            let full = m.as_str();
            let core_start = full.rfind(':').map(|i| i + 1).unwrap_or(0);
            let core = &full[core_start..];
            let stripped = core.trim_start_matches('!').trim_start_matches('-');
            let prefix_len = full.len() - stripped.len();
            ClassToken {
                offset: m.start(),
                full,
                prefix: &full[..prefix_len],
                utility: stripped,
            }
        })
        .collect()
}

/// Span of `matched` found at byte `offset` of an attribute value.
pub fn value_span(attr: &Attribute, offset: usize, matched: &str) -> Option<Span> {
    let text = attr.value.text();
    let start = attr.value_start()?.advance(text.get(..offset)?);
    Some(Span::new(start, start.advance(matched)))
}

/// Span of a regex match on a single source line.
pub fn line_span(line_no: usize, line: &str, start: usize, end: usize) -> Span {
    let col = line[..start].chars().count();
    let start_pos = Position::new(line_no, col);
    Span::new(start_pos, start_pos.advance(&line[start..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_tokens_split_variants() {
        let tokens = class_tokens("flex md:hover:-mt-2 !p-4");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].prefix, "md:hover:-");
        assert_eq!(tokens[1].utility, "mt-2");
        assert_eq!(tokens[1].offset, 5);
        assert_eq!(tokens[2].prefix, "!");
        assert_eq!(tokens[2].utility, "p-4");
    }

    #[test]
    fn test_class_tokens_inside_expression() {
        let tokens = class_tokens(r#"cn("pl-2", active && "mr-1")"#);
        let utilities: Vec<&str> = tokens.iter().map(|t| t.utility).collect();
        assert_eq!(utilities, vec!["cn", "pl-2", "active", "&&", "mr-1"]);
    }

    #[test]
    fn test_line_span_counts_chars() {
        let span = line_span(4, "é p-7", 3, 6);
        assert_eq!(span.start, Position::new(4, 2));
        assert_eq!(span.end, Position::new(4, 5));
    }
}
