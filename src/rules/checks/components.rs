//! Semantic component checks: raw HTML elements, components outside the
//! approved catalog and inline `style` attributes.

use crate::error::RuleError;
use crate::markup::{Element, Position, Span};
use crate::rules::{Fix, RuleLevel, RuleOutput, ValidationContext, Violation};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;

pub static RAW_HTML_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "div", "span", "p", "h1", "h2", "h3", "h4", "h5", "h6", "a", "button", "input", "select",
        "textarea", "form", "ul", "ol", "li", "table", "tr", "td", "th", "header", "footer", "main",
        "section", "article", "aside", "nav", "img", "video", "audio", "canvas", "svg",
    ]
    .into_iter()
    .collect()
});

pub static APPROVED_COMPONENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // targets of the raw element table
        "Box", "Text", "Heading", "Link", "Button", "Input", "Select", "Textarea", "Form", "List",
        "ListItem", "Table", "TableRow", "TableCell", "TableHeader", "Header", "Footer", "Main",
        "Section", "Article", "Aside", "Nav", "Image", "Video", "Audio", "Canvas", "Icon",
        // layout
        "Flex", "Grid", "Stack", "HStack", "VStack", "Container",
        // controls and surfaces
        "IconButton", "Checkbox", "Radio", "Switch", "FormField", "Label", "Card", "Modal", "Dialog",
        "Tooltip", "Badge", "Avatar", "Divider", "Spinner", "Alert", "Tabs", "Tab", "Menu",
        "MenuItem",
    ]
    .into_iter()
    .collect()
});

const FRAMEWORK_BUILTINS: &[&str] = &["Fragment", "Suspense", "StrictMode", "Trans"];

/// Design-system component that replaces a raw element.
pub fn semantic_replacement(tag: &str) -> &'static str {
    match tag {
        "div" => "Box",
        "span" | "p" => "Text",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "Heading",
        "a" => "Link",
        "button" => "Button",
        "input" => "Input",
        "select" => "Select",
        "textarea" => "Textarea",
        "form" => "Form",
        "ul" | "ol" => "List",
        "li" => "ListItem",
        "table" => "Table",
        "tr" => "TableRow",
        "td" => "TableCell",
        "th" => "TableHeader",
        "header" => "Header",
        "footer" => "Footer",
        "main" => "Main",
        "section" => "Section",
        "article" => "Article",
        "aside" => "Aside",
        "nav" => "Nav",
        "img" => "Image",
        "video" => "Video",
        "audio" => "Audio",
        "canvas" => "Canvas",
        "svg" => "Icon",
        _ => "Box",
    }
}

/// Member tags (`Menu.Item`) are judged by their root component.
pub fn is_approved_component(tag: &str) -> bool {
    let root = tag.split('.').next().unwrap_or(tag);
    root == "React"
        || FRAMEWORK_BUILTINS.contains(&tag)
        || APPROVED_COMPONENTS.contains(tag)
        || APPROVED_COMPONENTS.contains(root)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentIssue {
    RawElement,
    UnapprovedComponent,
    InlineStyle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFinding {
    pub issue: ComponentIssue,
    pub tag: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

pub fn find_raw_elements(ctx: &ValidationContext) -> Vec<ComponentFinding> {
    ctx.elements()
        .iter()
        .filter(|e| RAW_HTML_TAGS.contains(e.tag.as_str()))
        .map(|e| ComponentFinding {
            issue: ComponentIssue::RawElement,
            tag: e.tag.clone(),
            span: e.name_span,
            replacement: Some(semantic_replacement(&e.tag).to_string()),
        })
        .collect()
}

pub fn find_unapproved_components(ctx: &ValidationContext) -> Vec<ComponentFinding> {
    ctx.elements()
        .iter()
        .filter(|e| e.is_component() && !is_approved_component(&e.tag))
        .map(|e| ComponentFinding {
            issue: ComponentIssue::UnapprovedComponent,
            tag: e.tag.clone(),
            span: e.name_span,
            replacement: None,
        })
        .collect()
}

pub fn find_inline_styles(ctx: &ValidationContext) -> Vec<ComponentFinding> {
    ctx.elements()
        .iter()
        .filter_map(|e| {
            let attr = e.attribute("style")?;
            Some(ComponentFinding {
                issue: ComponentIssue::InlineStyle,
                tag: e.tag.clone(),
                span: attr.span,
                replacement: None,
            })
        })
        .collect()
}

pub fn scan(ctx: &ValidationContext) -> Vec<ComponentFinding> {
    let mut findings = find_raw_elements(ctx);
    findings.extend(find_unapproved_components(ctx));
    findings.extend(find_inline_styles(ctx));
    findings.sort_by_key(|f| f.span.start);
    findings
}

pub fn evaluate_raw_html(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for element in ctx.elements() {
        if !RAW_HTML_TAGS.contains(element.tag.as_str()) {
            continue;
        }
        let replacement = semantic_replacement(&element.tag);
        out.push(
            Violation::at(
                RuleLevel::Error,
                format!("Raw <{}> element; use the {} component", element.tag, replacement),
                element.name_span,
            )
            .with_suggestion(format!("Replace <{}> with <{}>", element.tag, replacement))
            .with_context("element", element.tag.clone()),
        );
        out.push_fix(rename_fix(element, element.name_span, replacement));
        if let Some(closing) = element.closing_name_span {
            out.push_fix(rename_fix(element, closing, replacement));
        }
    }
    Ok(out)
}

fn rename_fix(element: &Element, span: Span, replacement: &str) -> Fix {
    Fix::replace(
        format!("Rename <{}> to <{}>", element.tag, replacement),
        span,
        replacement,
    )
}

pub fn evaluate_approved_components(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for f in find_unapproved_components(ctx) {
        out.push(
            Violation::at(
                RuleLevel::Warning,
                format!("<{}> is not in the approved component catalog", f.tag),
                f.span,
            )
            .with_suggestion("Use an approved design-system component")
            .with_context("element", f.tag),
        );
    }
    Ok(out)
}

pub fn evaluate_inline_styles(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    for f in find_inline_styles(ctx) {
        out.push(
            Violation::at(
                RuleLevel::Error,
                format!("Inline style on <{}>", f.tag),
                f.span,
            )
            .with_suggestion("Move the styles to design-token utilities or a styled component"),
        );
        let start = removal_start(ctx, f.span.start);
        out.push_fix(Fix::replace(
            format!("Remove the inline style from <{}>", f.tag),
            Span::new(start, f.span.end),
            "",
        ));
    }
    Ok(out)
}

/// Start of the whitespace run in front of `pos`. An attribute alone on its
/// line takes the preceding line break with it.
fn removal_start(ctx: &ValidationContext, pos: Position) -> Position {
    let lines: Vec<&str> = ctx.lines().collect();
    let Some(line) = lines.get(pos.line.saturating_sub(1)) else {
        return pos;
    };
    let before: Vec<char> = line.chars().take(pos.column).collect();
    let kept = before.iter().rposition(|c| !c.is_whitespace()).map(|i| i + 1).unwrap_or(0);
    if kept == 0 && pos.line > 1 {
        let prev = lines[pos.line - 2];
        return Position::new(pos.line - 1, prev.trim_end().chars().count());
    }
    Position::new(pos.line, kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    fn ctx(src: &str) -> ValidationContext {
        ValidationContext::build("View.tsx", src, &Configuration::strict()).0
    }

    #[test]
    fn test_raw_div_suggests_box() {
        let out = evaluate_raw_html(&ctx("<div>x</div>")).unwrap();
        assert_eq!(out.violations.len(), 1);
        let v = &out.violations[0];
        assert!(v.message.contains("div"));
        assert!(v.suggestion.as_deref().unwrap_or("").contains("Box"));
        assert_eq!(out.fixes.len(), 2);
        assert!(out.fixes.iter().all(|f| f.fix == "Box"));
    }

    #[test]
    fn test_replacement_table() {
        assert_eq!(semantic_replacement("h3"), "Heading");
        assert_eq!(semantic_replacement("a"), "Link");
        assert_eq!(semantic_replacement("svg"), "Icon");
        assert_eq!(semantic_replacement("marquee"), "Box");
    }

    #[test]
    fn test_custom_lowercase_tags_are_ignored() {
        assert!(find_raw_elements(&ctx("<my-widget />")).is_empty());
    }

    #[test]
    fn test_approved_and_builtin_components() {
        assert!(is_approved_component("Button"));
        assert!(is_approved_component("React.Fragment"));
        assert!(is_approved_component("Suspense"));
        assert!(is_approved_component("Menu.Item"));
        assert!(!is_approved_component("FancyCard"));

        let found = find_unapproved_components(&ctx("<Box><FancyCard /><Trans>Hi</Trans></Box>"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tag, "FancyCard");
    }

    #[test]
    fn test_inline_style_fix_removes_leading_space() {
        let c = ctx(r#"<Box id="a" style={{ color: "red" }}>x</Box>"#);
        let out = evaluate_inline_styles(&c).unwrap();
        assert_eq!(out.violations.len(), 1);
        let range = out.fixes[0].range.unwrap();
        assert_eq!(range.start, Position::new(1, 11));
        assert_eq!(range.end, Position::new(1, 36));
        assert_eq!(out.fixes[0].fix, "");
    }

    #[test]
    fn test_inline_style_on_own_line_takes_line_break() {
        let c = ctx("<Box\n  style={s}\n  id=\"a\"\n/>");
        let out = evaluate_inline_styles(&c).unwrap();
        let range = out.fixes[0].range.unwrap();
        assert_eq!(range.start, Position::new(1, 4));
        assert_eq!(range.end, Position::new(2, 11));
    }
}
