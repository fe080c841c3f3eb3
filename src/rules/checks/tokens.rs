//! Design token checks: hardcoded colors, off-grid spacing and bracketed
//! arbitrary values.

use super::{class_tokens, line_span, value_span};
use crate::error::RuleError;
use crate::markup::Span;
use crate::rules::{Fix, RuleLevel, RuleOutput, ValidationContext, Violation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Permitted spacing scale indices; valid pixel values are `index * 4`.
pub const GRID_INDICES: [f64; 18] = [
    0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 12.0, 16.0, 20.0, 24.0, 32.0, 40.0, 48.0, 56.0, 64.0,
];

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{3,4})\b|\b(?:rgba?|hsla?)\(").unwrap()
});

static SPACING_PROPERTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b(?:padding|margin|gap|space)[\w-]*["']?\s*[:=]"#).unwrap());

static SPACING_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)(px|rem|em)\b").unwrap());

static SPACING_UTILITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(p[xytrblse]?|m[xytrblse]?|gap(?:-[xy])?|space-[xy])-(\d+(?:\.\d+)?|\[\d+(?:\.\d+)?(?:px|rem|em)\])$")
        .unwrap()
});

static ARBITRARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[(?:-?\d+(?:\.\d+)?(?:px|rem|em|%|vh|vw)|#[0-9a-fA-F]{3,8}|(?:rgba?|hsla?)\([^\]]*\))\]",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenIssue {
    HardcodedColor,
    OffGridSpacing,
    ArbitraryValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFinding {
    pub issue: TokenIssue,
    pub value: String,
    pub span: Span,
    pub suggestion: String,
    /// Mechanical rewrite of `value`, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// Grid index closest to `px`; the first entry wins a tie.
pub fn nearest_grid_index(px: f64) -> f64 {
    let target = (px.abs() / 4.0).round();
    let mut best = GRID_INDICES[0];
    for &idx in GRID_INDICES.iter() {
        if (idx - target).abs() < (best - target).abs() {
            best = idx;
        }
    }
    best
}

pub fn is_on_grid(px: f64) -> bool {
    GRID_INDICES.iter().any(|idx| (idx * 4.0 - px.abs()).abs() < 1e-9)
}

fn format_index(idx: f64) -> String {
    if idx.fract() == 0.0 {
        format!("{}", idx as i64)
    } else {
        format!("{}", idx)
    }
}

fn to_pixels(number: f64, unit: &str) -> f64 {
    match unit {
        "rem" | "em" => number * 16.0,
        _ => number,
    }
}

/// First hardcoded color on every line. Numeric entities (`&#169;`) are text.
pub fn find_colors(ctx: &ValidationContext) -> Vec<TokenFinding> {
    let token = ctx.config.token("color-primary");
    ctx.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let m = COLOR_RE
                .find_iter(line)
                .find(|m| m.start() == 0 || line.as_bytes()[m.start() - 1] != b'&')?;
            let value = m.as_str().trim_end_matches('(').to_string();
            Some(TokenFinding {
                issue: TokenIssue::HardcodedColor,
                span: line_span(i + 1, line, m.start(), m.end()),
                suggestion: format!("Replace `{}` with a color token such as `{}`", value, token),
                value,
                replacement: None,
            })
        })
        .collect()
}

/// Off-grid spacing in declarations (unless allowed) and in class utilities.
pub fn find_spacing(ctx: &ValidationContext) -> Vec<TokenFinding> {
    let mut findings = Vec::new();
    if !ctx.config.allow_hardcoded_spacing {
        for (i, line) in ctx.lines().enumerate() {
            find_declaration_spacing(ctx, i + 1, line, &mut findings);
        }
    }
    find_class_spacing(ctx, &mut findings);
    findings.sort_by_key(|f| f.span.start);
    findings
}

fn find_declaration_spacing(
    ctx: &ValidationContext,
    line_no: usize,
    line: &str,
    findings: &mut Vec<TokenFinding>,
) {
    for prop in SPACING_PROPERTY_RE.find_iter(line) {
        let rest = &line[prop.end()..];
        let lead = rest.len()
            - rest
                .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '{' | '`'))
                .len();
        let body = &rest[lead..];
        let body_end = body
            .find(|c: char| matches!(c, ';' | ',' | '}' | '"' | '\'' | '`'))
            .unwrap_or(body.len());
        let base = prop.end() + lead;

        for caps in SPACING_VALUE_RE.captures_iter(&body[..body_end]) {
            let (Some(whole), Some(number), Some(unit)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            let Ok(n) = number.as_str().parse::<f64>() else {
                continue;
            };
            let px = to_pixels(n, unit.as_str());
            if is_on_grid(px) {
                continue;
            }
            let idx = nearest_grid_index(px);
            findings.push(TokenFinding {
                issue: TokenIssue::OffGridSpacing,
                value: whole.as_str().to_string(),
                span: line_span(line_no, line, base + whole.start(), base + whole.end()),
                suggestion: format!(
                    "Use {}px or the token `{}`",
                    format_index(idx * 4.0),
                    ctx.config.token(&format!("spacing-{}", format_index(idx)))
                ),
                replacement: None,
            });
        }
    }
}

fn find_class_spacing(ctx: &ValidationContext, findings: &mut Vec<TokenFinding>) {
    for element in ctx.elements() {
        for attr in element.class_attributes() {
            for token in class_tokens(attr.value.text()) {
                let Some(caps) = SPACING_UTILITY_RE.captures(token.utility) else {
                    continue;
                };
                let (Some(name), Some(raw)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let raw = raw.as_str();
                let px = match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                    Some(inner) => {
                        let Some(m) = SPACING_VALUE_RE.captures(inner) else {
                            continue;
                        };
                        let n: f64 = m[1].parse().unwrap_or(0.0);
                        to_pixels(n, &m[2])
                    }
                    None => match raw.parse::<f64>() {
                        Ok(idx) => idx * 4.0,
                        Err(_) => continue,
                    },
                };
                if is_on_grid(px) {
                    continue;
                }
                let Some(span) = value_span(attr, token.offset, token.full) else {
                    continue;
                };
                let fixed = format!(
                    "{}{}-{}",
                    token.prefix,
                    name.as_str(),
                    format_index(nearest_grid_index(px))
                );
                findings.push(TokenFinding {
                    issue: TokenIssue::OffGridSpacing,
                    value: token.full.to_string(),
                    span,
                    suggestion: format!("Use `{}` to stay on the 8-point grid", fixed),
                    replacement: Some(fixed),
                });
            }
        }
    }
}

/// Every bracketed arbitrary value on every line.
pub fn find_arbitrary(ctx: &ValidationContext) -> Vec<TokenFinding> {
    let mut findings = Vec::new();
    for (i, line) in ctx.lines().enumerate() {
        for m in ARBITRARY_RE.find_iter(line) {
            findings.push(TokenFinding {
                issue: TokenIssue::ArbitraryValue,
                value: m.as_str().to_string(),
                span: line_span(i + 1, line, m.start(), m.end()),
                suggestion: "Use a scale utility or a design token instead of an arbitrary value".to_string(),
                replacement: None,
            });
        }
    }
    findings
}

/// All token findings for the deep compliance report.
pub fn scan(ctx: &ValidationContext) -> Vec<TokenFinding> {
    let mut findings = find_colors(ctx);
    findings.extend(find_spacing(ctx));
    findings.extend(find_arbitrary(ctx));
    findings
}

fn to_output(findings: Vec<TokenFinding>, message: fn(&TokenFinding) -> String) -> RuleOutput {
    let mut out = RuleOutput::new();
    for f in findings {
        out.push(Violation::at(RuleLevel::Error, message(&f), f.span).with_suggestion(f.suggestion.clone()));
        if let Some(replacement) = f.replacement {
            out.push_fix(Fix::replace(
                format!("Replace `{}` with `{}`", f.value, replacement),
                f.span,
                replacement,
            ));
        }
    }
    out
}

pub fn evaluate_colors(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    Ok(to_output(find_colors(ctx), |f| {
        format!("Hardcoded color `{}`; use a design token", f.value)
    }))
}

pub fn evaluate_spacing(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    Ok(to_output(find_spacing(ctx), |f| {
        format!("Spacing `{}` is off the 8-point grid", f.value)
    }))
}

pub fn evaluate_arbitrary(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    Ok(to_output(find_arbitrary(ctx), |f| {
        format!("Arbitrary value `{}` bypasses the design system", f.value)
    }))
}
