//! Hardcoded user-facing text.

use super::value_span;
use crate::error::RuleError;
use crate::markup::{AttrValue, Span};
use crate::rules::{RuleLevel, RuleOutput, ValidationContext, Violation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Attributes whose values are shown to users.
pub const TRANSLATABLE_ATTRIBUTES: &[&str] = &["placeholder", "title", "alt", "aria-label"];

static TRANSLATION_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:t|translate|trans|i18n(?:\.\w+)+)\s*\(").unwrap());

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:&(?:[A-Za-z]+|#\d+|#x[0-9A-Fa-f]+);\s*)+$").unwrap());

/// Text that needs no translation: a single character, anything without
/// letters (digits, punctuation, ellipsis, dashes) or HTML entities only.
pub fn is_acceptable_literal(text: &str) -> bool {
    let text = text.trim();
    text.chars().count() <= 1 || !text.chars().any(char::is_alphabetic) || ENTITY_RE.is_match(text)
}

pub fn is_translation_call(expr: &str) -> bool {
    TRANSLATION_CALL_RE.is_match(expr)
}

/// String literal written as an expression (`{"Save"}`, `` {`Save`} ``).
fn expression_literal(expr: &str) -> Option<(usize, &str)> {
    let trimmed = expr.trim();
    let lead = expr.len() - expr.trim_start().len();
    let quote = trimmed.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || trimmed.len() < 2 || !trimmed.ends_with(quote) {
        return None;
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    if quote == '`' && inner.contains("${") {
        return None;
    }
    Some((lead + 1, inner))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationFinding {
    pub text: String,
    pub span: Span,
    /// Set when the text came from an attribute value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

pub fn find_hardcoded_text(ctx: &ValidationContext) -> Vec<LocalizationFinding> {
    // Everything nested in <Trans> is already handled by the translation layer.
    let trans_spans: Vec<Span> = ctx
        .elements()
        .iter()
        .filter(|e| e.tag == "Trans")
        .map(|e| e.span)
        .collect();
    let inside_trans = |span: &Span| {
        trans_spans
            .iter()
            .any(|t| t.start <= span.start && span.end <= t.end)
    };

    let mut findings: Vec<LocalizationFinding> = ctx
        .texts()
        .iter()
        .filter(|t| t.parent_tag.as_deref() != Some("Trans") && !inside_trans(&t.span))
        .filter(|t| !is_acceptable_literal(&t.text))
        .map(|t| LocalizationFinding {
            text: t.text.clone(),
            span: t.span,
            attribute: None,
        })
        .collect();

    for element in ctx.elements() {
        for attr in &element.attributes {
            if !TRANSLATABLE_ATTRIBUTES.contains(&attr.name.as_str()) {
                continue;
            }
            let (offset, literal) = match &attr.value {
                AttrValue::Literal(s) => (0, s.as_str()),
                AttrValue::Expression(expr) if !is_translation_call(expr) => {
                    match expression_literal(expr) {
                        Some(found) => found,
                        None => continue,
                    }
                }
                _ => continue,
            };
            if is_acceptable_literal(literal) {
                continue;
            }
            let span = value_span(attr, offset, literal).unwrap_or(attr.span);
            findings.push(LocalizationFinding {
                text: literal.to_string(),
                span,
                attribute: Some(attr.name.clone()),
            });
        }
    }

    findings.sort_by_key(|f| f.span.start);
    findings
}

pub fn evaluate_hardcoded_text(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let languages = ctx.config.supported_languages.join(", ");
    let mut out = RuleOutput::new();
    for f in find_hardcoded_text(ctx) {
        let message = match &f.attribute {
            Some(attr) => format!("Hardcoded text \"{}\" in `{}`", f.text, attr),
            None => format!("Hardcoded text \"{}\"", f.text),
        };
        out.push(
            Violation::at(RuleLevel::Warning, message, f.span)
                .with_suggestion(format!("Wrap the text in t(...) and translate it for: {}", languages)),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::markup::Position;

    fn ctx(src: &str) -> ValidationContext {
        ValidationContext::build("View.tsx", src, &Configuration::strict()).0
    }

    fn texts(src: &str) -> Vec<String> {
        find_hardcoded_text(&ctx(src)).into_iter().map(|f| f.text).collect()
    }

    #[test]
    fn test_acceptable_literals() {
        for ok in ["42", "x", "—", "…", "1,234.5", "&nbsp;", "&copy; &#169;", "  ", "3 / 4"] {
            assert!(is_acceptable_literal(ok), "{ok:?} should be acceptable");
        }
        assert!(!is_acceptable_literal("Save"));
        assert!(!is_acceptable_literal("&nbsp;Hi"));
    }

    #[test]
    fn test_translation_calls() {
        assert!(is_translation_call("t('save')"));
        assert!(is_translation_call(" i18n.t(\"save\")"));
        assert!(is_translation_call("translate(key)"));
        assert!(!is_translation_call("format(label)"));
    }

    #[test]
    fn test_text_children_are_flagged() {
        assert_eq!(texts("<Box>Welcome back</Box>"), vec!["Welcome back"]);
        assert_eq!(texts(r#"<Box>{"Literal"}</Box>"#), vec!["Literal"]);
        assert!(texts("<Box>{t('welcome')}</Box>").is_empty());
        assert!(texts("<Box>42</Box>").is_empty());
    }

    #[test]
    fn test_trans_children_are_exempt() {
        assert!(texts("<Trans>Hello <b>there</b></Trans>").is_empty());
        assert!(texts("<Trans>Hello</Trans>").is_empty());
    }

    #[test]
    fn test_translatable_attributes() {
        let found = find_hardcoded_text(&ctx(r#"<Input placeholder="Your name" title={t("x")} alt={"Logo"} label="Name" />"#));
        let attrs: Vec<_> = found.iter().map(|f| f.attribute.clone().unwrap_or_default()).collect();
        assert_eq!(attrs, vec!["placeholder", "alt"]);
        assert_eq!(found[0].span.start, Position::new(1, 20));
    }

    #[test]
    fn test_dynamic_attribute_expressions_pass() {
        assert!(texts(r#"<Input placeholder={label} title={`Hi ${name}`} />"#).is_empty());
    }
}
