//! WCAG checks over the markup tree.

use crate::config::WcagLevel;
use crate::error::RuleError;
use crate::markup::{Element, Span};
use crate::rules::{Fix, RuleLevel, RuleOutput, ValidationContext, Violation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

const INTERACTIVE_TAGS: &[&str] = &["button", "a", "input", "select", "textarea"];
const INTERACTIVE_HANDLERS: &[&str] = &["onClick", "onKeyDown", "onKeyPress"];
const INTERACTIVE_ROLES: &[&str] = &[
    "button", "link", "checkbox", "menuitem", "tab", "switch", "radio", "option", "slider",
    "textbox", "combobox", "spinbutton", "searchbox",
];
const LABEL_ATTRIBUTES: &[&str] = &["aria-label", "aria-labelledby", "aria-describedby"];

static FOREGROUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|[^-\w])["']?color["']?\s*:"#).unwrap());
static BACKGROUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bbackground(?:Color|-color)?["']?\s*:"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Impact::Critical => "critical",
            Impact::Serious => "serious",
            Impact::Moderate => "moderate",
            Impact::Minor => "minor",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityIssue {
    pub criterion: &'static str,
    pub impact: Impact,
    pub tag: String,
    pub message: String,
    pub span: Span,
}

impl AccessibilityIssue {
    fn documentation(&self) -> &'static str {
        match self.criterion {
            "1.1.1" => "https://www.w3.org/WAI/WCAG21/Understanding/non-text-content.html",
            "1.4.3" => "https://www.w3.org/WAI/WCAG21/Understanding/contrast-minimum.html",
            "1.4.6" => "https://www.w3.org/WAI/WCAG21/Understanding/contrast-enhanced.html",
            _ => "https://www.w3.org/WAI/WCAG21/Understanding/name-role-value.html",
        }
    }

    fn into_violation(self, severity: RuleLevel, suggestion: &str) -> Violation {
        Violation::at(severity, self.message.clone(), self.span)
            .with_suggestion(suggestion)
            .with_documentation(self.documentation())
            .with_context("wcag", self.criterion)
            .with_context("impact", self.impact.to_string())
            .with_context("element", self.tag)
    }
}

pub fn is_interactive(element: &Element) -> bool {
    if element.tag == "input" && element.literal("type") == Some("hidden") {
        return false;
    }
    INTERACTIVE_TAGS.contains(&element.tag.as_str())
        || INTERACTIVE_HANDLERS.iter().any(|h| element.has_attribute(h))
        || element
            .literal("role")
            .is_some_and(|role| INTERACTIVE_ROLES.contains(&role.trim()))
}

pub fn has_accessible_name(element: &Element) -> bool {
    let labelled = LABEL_ATTRIBUTES
        .iter()
        .any(|name| element.attribute(name).is_some_and(|a| a.has_value()));
    if labelled {
        return true;
    }
    matches!(element.tag.as_str(), "button" | "a")
        && (!element.text_content.trim().is_empty() || element.has_dynamic_children)
}

pub fn find_unlabeled_interactive(ctx: &ValidationContext) -> Vec<AccessibilityIssue> {
    ctx.elements()
        .iter()
        .filter(|e| is_interactive(e) && !has_accessible_name(e))
        .map(|e| AccessibilityIssue {
            criterion: "4.1.2",
            impact: Impact::Serious,
            tag: e.tag.clone(),
            message: format!("Interactive <{}> has no accessible name", e.tag),
            span: e.name_span,
        })
        .collect()
}

pub fn find_missing_alt(ctx: &ValidationContext) -> Vec<AccessibilityIssue> {
    ctx.elements()
        .iter()
        .filter(|e| e.tag == "img" || e.literal("role").map(str::trim) == Some("img"))
        .filter(|e| !["alt", "aria-label", "aria-labelledby"].iter().any(|a| e.has_attribute(a)))
        .map(|e| AccessibilityIssue {
            criterion: "1.1.1",
            impact: Impact::Critical,
            tag: e.tag.clone(),
            message: format!("<{}> has no text alternative", e.tag),
            span: e.name_span,
        })
        .collect()
}

/// Inline styles that set both a foreground and a background color. The
/// ratio itself is left for manual review.
pub fn find_contrast_candidates(ctx: &ValidationContext) -> Vec<AccessibilityIssue> {
    if ctx.config.wcag_level < WcagLevel::AA {
        return Vec::new();
    }
    let criterion = if ctx.config.wcag_level == WcagLevel::AAA { "1.4.6" } else { "1.4.3" };
    ctx.elements()
        .iter()
        .filter_map(|e| {
            let style = e.attribute("style")?;
            let text = style.value.text();
            if !(FOREGROUND_RE.is_match(text) && BACKGROUND_RE.is_match(text)) {
                return None;
            }
            Some(AccessibilityIssue {
                criterion,
                impact: Impact::Moderate,
                tag: e.tag.clone(),
                message: format!("Color pair on <{}> needs a contrast review", e.tag),
                span: style.span,
            })
        })
        .collect()
}

pub fn scan(ctx: &ValidationContext) -> Vec<AccessibilityIssue> {
    let mut issues = find_unlabeled_interactive(ctx);
    issues.extend(find_missing_alt(ctx));
    issues.extend(find_contrast_candidates(ctx));
    issues.sort_by_key(|i| i.span.start);
    issues
}

pub fn evaluate_interactive_label(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for issue in find_unlabeled_interactive(ctx) {
        out.push(issue.into_violation(
            RuleLevel::Error,
            "Add visible text, aria-label or aria-labelledby",
        ));
    }
    Ok(out)
}

pub fn evaluate_image_alt(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for issue in find_missing_alt(ctx) {
        let tag = issue.tag.clone();
        out.push(issue.into_violation(
            RuleLevel::Error,
            "Describe the image with alt, or use alt=\"\" if it is decorative",
        ));
        out.push_fix(Fix::advice(
            format!("Add alternative text to <{}>", tag),
            "alt=\"…\"",
        ));
    }
    Ok(out)
}

pub fn evaluate_color_contrast(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for issue in find_contrast_candidates(ctx) {
        out.push(issue.into_violation(
            RuleLevel::Warning,
            "Use paired foreground/background tokens with verified contrast",
        ));
    }
    Ok(out)
}
