//! Layout direction: physical left/right utilities and style properties that
//! do not mirror in right-to-left locales.

use super::{class_tokens, line_span, value_span};
use crate::error::RuleError;
use crate::markup::{AttrValue, Attribute, FileKind, Span};
use crate::rules::{Fix, RuleLevel, RuleOutput, ValidationContext, Violation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const EXACT_CLASSES: &[(&str, &str)] = &[
    ("text-left", "text-start"),
    ("text-right", "text-end"),
    ("float-left", "float-start"),
    ("float-right", "float-end"),
    ("margin-left", "margin-inline-start"),
    ("margin-right", "margin-inline-end"),
    ("padding-left", "padding-inline-start"),
    ("padding-right", "padding-inline-end"),
    ("border-left", "border-inline-start"),
    ("border-right", "border-inline-end"),
];

/// Utility roots matched as `root` or `root-*`; longer roots first.
const PREFIX_CLASSES: &[(&str, &str)] = &[
    ("border-l", "border-s"),
    ("border-r", "border-e"),
    ("rounded-l", "rounded-s"),
    ("rounded-r", "rounded-e"),
    ("left", "start"),
    ("right", "end"),
    ("ml", "ms"),
    ("mr", "me"),
    ("pl", "ps"),
    ("pr", "pe"),
];

struct StylePattern {
    re: Regex,
    left: &'static str,
    right: &'static str,
}

static STYLE_PATTERNS: Lazy<Vec<StylePattern>> = Lazy::new(|| {
    let pattern = |re: &str, left, right| StylePattern {
        re: Regex::new(re).unwrap(),
        left,
        right,
    };
    vec![
        pattern(r"\b(?:margin|padding|border)(?P<side>Left|Right)\b", "InlineStart", "InlineEnd"),
        pattern(r"\b(?:margin|padding|border)-(?P<side>left|right)\b", "inline-start", "inline-end"),
        pattern(r#"\btext-?[aA]lign["']?\s*:\s*["']?(?P<side>left|right)\b"#, "start", "end"),
        pattern(r#"\bfloat["']?\s*:\s*["']?(?P<side>left|right)\b"#, "inline-start", "inline-end"),
        pattern(r#"(?:^|[^-\w])(?P<side>left|right)["']?\s*:"#, "inset-inline-start", "inset-inline-end"),
    ]
});

/// Logical counterpart of a physical utility, without variants.
pub fn logical_class(utility: &str) -> Option<String> {
    if let Some((_, logical)) = EXACT_CLASSES.iter().find(|(p, _)| *p == utility) {
        return Some(logical.to_string());
    }
    PREFIX_CLASSES.iter().find_map(|(physical, logical)| {
        if utility == *physical {
            Some(logical.to_string())
        } else {
            utility
                .strip_prefix(physical)
                .and_then(|rest| rest.strip_prefix('-'))
                .map(|rest| format!("{}-{}", logical, rest))
        }
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RtlFinding {
    pub physical: String,
    pub logical: String,
    pub span: Span,
    /// A literal class string can be rewritten in place.
    pub fixable: bool,
}

pub fn scan(ctx: &ValidationContext) -> Vec<RtlFinding> {
    let mut findings = Vec::new();
    for element in ctx.elements() {
        for attr in element.class_attributes() {
            scan_classes(attr, &mut findings);
        }
        if let Some(style) = element.attribute("style") {
            for (start, end, physical, logical) in style_matches(style.value.text()) {
                let span = value_span(style, start, &style.value.text()[start..end]).unwrap_or(style.span);
                findings.push(RtlFinding { physical, logical, span, fixable: false });
            }
        }
    }
    if ctx.file_kind == FileKind::Stylesheet {
        for (i, line) in ctx.lines().enumerate() {
            for (start, end, physical, logical) in style_matches(line) {
                findings.push(RtlFinding {
                    physical,
                    logical,
                    span: line_span(i + 1, line, start, end),
                    fixable: false,
                });
            }
        }
    }
    findings.sort_by_key(|f| f.span.start);
    findings
}

fn scan_classes(attr: &Attribute, findings: &mut Vec<RtlFinding>) {
    let fixable = matches!(attr.value, AttrValue::Literal(_));
    for token in class_tokens(attr.value.text()) {
        let Some(logical) = logical_class(token.utility) else {
            continue;
        };
        let Some(span) = value_span(attr, token.offset, token.full) else {
            continue;
        };
        findings.push(RtlFinding {
            physical: token.full.to_string(),
            logical: format!("{}{}", token.prefix, logical),
            span,
            fixable,
        });
    }
}

/// `(start, end, physical, logical)` for every physical property in `text`.
fn style_matches(text: &str) -> Vec<(usize, usize, String, String)> {
    let mut found = Vec::new();
    for pattern in STYLE_PATTERNS.iter() {
        for caps in pattern.re.captures_iter(text) {
            let (Some(whole), Some(side)) = (caps.get(0), caps.name("side")) else {
                continue;
            };
            // offset matches carry the delimiter in front of the side
            let start = if whole.as_str().starts_with(|c: char| c.is_alphanumeric()) {
                whole.start()
            } else {
                side.start()
            };
            let physical = &text[start..whole.end()];
            let replacement = if side.as_str().eq_ignore_ascii_case("left") {
                pattern.left
            } else {
                pattern.right
            };
            let side_offset = side.start() - start;
            let logical = format!(
                "{}{}{}",
                &physical[..side_offset],
                replacement,
                &physical[side_offset + side.len()..]
            );
            found.push((start, whole.end(), physical.to_string(), logical));
        }
    }
    found.sort_by_key(|m| m.0);
    found
}

pub fn evaluate_logical_properties(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for f in scan(ctx) {
        out.push(
            Violation::at(
                RuleLevel::Warning,
                format!("Physical direction `{}` does not mirror in RTL layouts", f.physical),
                f.span,
            )
            .with_suggestion(format!("Use `{}`", f.logical)),
        );
        if f.fixable {
            out.push_fix(Fix::replace(
                format!("Replace `{}` with `{}`", f.physical, f.logical),
                f.span,
                f.logical,
            ));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::markup::Position;

    fn ctx(path: &str, src: &str) -> ValidationContext {
        ValidationContext::build(path, src, &Configuration::strict()).0
    }

    #[test]
    fn test_logical_class_table() {
        assert_eq!(logical_class("ml-4").as_deref(), Some("ms-4"));
        assert_eq!(logical_class("pr-0.5").as_deref(), Some("pe-0.5"));
        assert_eq!(logical_class("text-left").as_deref(), Some("text-start"));
        assert_eq!(logical_class("border-l").as_deref(), Some("border-s"));
        assert_eq!(logical_class("border-r-2").as_deref(), Some("border-e-2"));
        assert_eq!(logical_class("rounded-l-lg").as_deref(), Some("rounded-s-lg"));
        assert_eq!(logical_class("left-0").as_deref(), Some("start-0"));
        assert_eq!(logical_class("border-lime-500"), None);
        assert_eq!(logical_class("ms-4"), None);
        assert_eq!(logical_class("mx-4"), None);
    }

    #[test]
    fn test_literal_classes_get_fixes() {
        let c = ctx("View.tsx", r#"<Box className="flex md:ml-4 text-right" />"#);
        let out = evaluate_logical_properties(&c).unwrap();
        assert_eq!(out.violations.len(), 2);
        let fixes: Vec<&str> = out.fixes.iter().map(|f| f.fix.as_str()).collect();
        assert_eq!(fixes, vec!["md:ms-4", "text-end"]);
        assert_eq!(out.fixes[0].range.map(|r| r.start), Some(Position::new(1, 21)));
    }

    #[test]
    fn test_dynamic_classes_are_flag_only() {
        let c = ctx("View.tsx", r#"<Box className={cn("pl-2", open && "mr-1")} />"#);
        let out = evaluate_logical_properties(&c).unwrap();
        assert_eq!(out.violations.len(), 2);
        assert!(out.fixes.is_empty());
    }

    #[test]
    fn test_inline_style_properties() {
        let c = ctx("View.tsx", r#"<Box style={{ marginLeft: 8, textAlign: "right", left: 0 }} />"#);
        let found = scan(&c);
        let pairs: Vec<(String, String)> = found.into_iter().map(|f| (f.physical, f.logical)).collect();
        assert_eq!(
            pairs,
            vec![
                ("marginLeft".to_string(), "marginInlineStart".to_string()),
                ("textAlign: \"right".to_string(), "textAlign: \"end".to_string()),
                ("left:".to_string(), "inset-inline-start:".to_string()),
            ]
        );
    }

    #[test]
    fn test_stylesheet_lines() {
        let c = ctx("app.css", ".a { padding-right: 4px; float: left; }\n.b { margin-inline-start: 4px; }");
        let found = scan(&c);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].logical, "padding-inline-end");
        assert_eq!(found[1].logical, "float: inline-start");
    }
}
