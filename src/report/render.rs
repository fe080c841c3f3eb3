use super::{ComplianceReport, FileReport};
use crate::config::{OutputFormat, ReportingLevel, UI_SENTINEL_VERSION};
use crate::rules::{RuleLevel, Violation};
use std::fmt::{self, Write};

const RECOMMENDATIONS: &[&str] = &[
    "Replace raw HTML elements with approved design-system components.",
    "Take colors and spacing from design tokens and keep spacing on the 8-point grid.",
    "Give every interactive element and image an accessible name.",
    "Route all user-facing text through the translation layer.",
    "Prefer logical start/end utilities and properties so layouts mirror in RTL.",
];

const SEVERITY_ORDER: [RuleLevel; 3] = [RuleLevel::Error, RuleLevel::Warning, RuleLevel::Info];

/// Renders in the configured output format.
pub fn render(report: &ComplianceReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Html => render_html(report),
        OutputFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &ComplianceReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

fn severity_heading(level: RuleLevel) -> &'static str {
    match level {
        RuleLevel::Error => "Errors",
        RuleLevel::Warning => "Warnings",
        RuleLevel::Info => "Info",
    }
}

fn files_with_violations(report: &ComplianceReport) -> impl Iterator<Item = &FileReport> {
    report.files.iter().filter(|f| !f.violations.is_empty())
}

fn violations_at(file: &FileReport, level: RuleLevel) -> impl Iterator<Item = &Violation> {
    file.violations.iter().filter(move |v| v.severity == level)
}

pub fn render_markdown(report: &ComplianceReport) -> String {
    let mut out = String::new();
    write_markdown(&mut out, report).map(|()| out).unwrap_or_default()
}

fn write_markdown(out: &mut String, report: &ComplianceReport) -> fmt::Result {
    let level = report.config.reporting_level;
    let s = &report.summary;

    writeln!(out, "# UI Compliance Report\n")?;
    writeln!(out, "Generated: {}\n", report.timestamp.to_rfc3339())?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| Files | {} |", s.total_files)?;
    writeln!(out, "| Files scanned | {} |", s.files_scanned)?;
    writeln!(out, "| Violations | {} |", s.total_violations)?;
    writeln!(out, "| Errors | {} |", s.violations_by_severity.error)?;
    writeln!(out, "| Warnings | {} |", s.violations_by_severity.warning)?;
    writeln!(out, "| Info | {} |", s.violations_by_severity.info)?;
    writeln!(out, "| Score | {}/100 |", s.score)?;
    writeln!(
        out,
        "| Status | {} |",
        if s.compliant { "✅ Compliant" } else { "❌ Non-compliant" }
    )?;

    if !s.violations_by_type.is_empty() {
        writeln!(out, "\n### Violations by type\n")?;
        writeln!(out, "| Type | Count |")?;
        writeln!(out, "|---|---|")?;
        for (rule_type, count) in &s.violations_by_type {
            writeln!(out, "| {} | {} |", rule_type, count)?;
        }
    }

    if level != ReportingLevel::Minimal && s.total_violations > 0 {
        writeln!(out, "\n## Files")?;
        for file in files_with_violations(report) {
            writeln!(out, "\n### `{}` (score {}/100)", file.file_path, file.score)?;
            for severity in SEVERITY_ORDER {
                let mut items = violations_at(file, severity).peekable();
                if items.peek().is_none() {
                    continue;
                }
                writeln!(out, "\n#### {}\n", severity_heading(severity))?;
                for v in items {
                    writeln!(out, "- **L{}:{}** `{}` {}", v.line, v.column, v.rule_id, v.message)?;
                    if level == ReportingLevel::Detailed {
                        if let Some(suggestion) = &v.suggestion {
                            writeln!(out, "  - Suggestion: {}", suggestion)?;
                        }
                        if let Some(wcag) = v.context_value("wcag") {
                            writeln!(out, "  - WCAG {}", wcag)?;
                        }
                    }
                }
            }
            if level == ReportingLevel::Detailed && !file.fixes.is_empty() {
                writeln!(out, "\n#### Available fixes\n")?;
                for fix in &file.fixes {
                    writeln!(out, "- {}: `{}`", fix.description, fix.fix)?;
                }
            }
        }
    }

    if s.total_violations > 0 {
        writeln!(out, "\n## Recommendations\n")?;
        for (i, rec) in RECOMMENDATIONS.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, rec)?;
        }
    }

    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_html(report: &ComplianceReport) -> String {
    let mut out = String::new();
    write_html(&mut out, report).map(|()| out).unwrap_or_default()
}

fn write_html(out: &mut String, report: &ComplianceReport) -> fmt::Result {
    let level = report.config.reporting_level;
    let s = &report.summary;

    writeln!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">\n<title>UI Compliance Report</title>")?;
    writeln!(
        out,
        "<style>body{{font-family:system-ui,sans-serif;margin:2rem}}table{{border-collapse:collapse}}td,th{{border:1px solid #ccc;padding:4px 8px}}.error{{color:#b00020}}.warning{{color:#8a6d00}}.info{{color:#0b5cad}}</style>"
    )?;
    writeln!(out, "</head>\n<body>\n<h1>UI Compliance Report</h1>")?;
    writeln!(out, "<p>Generated: {}</p>", report.timestamp.to_rfc3339())?;
    writeln!(out, "<table>")?;
    for (label, value) in [
        ("Files", s.total_files.to_string()),
        ("Files scanned", s.files_scanned.to_string()),
        ("Violations", s.total_violations.to_string()),
        ("Errors", s.violations_by_severity.error.to_string()),
        ("Warnings", s.violations_by_severity.warning.to_string()),
        ("Info", s.violations_by_severity.info.to_string()),
        ("Score", format!("{}/100", s.score)),
        ("Status", if s.compliant { "Compliant" } else { "Non-compliant" }.to_string()),
    ] {
        writeln!(out, "<tr><th>{}</th><td>{}</td></tr>", label, value)?;
    }
    writeln!(out, "</table>")?;

    if level != ReportingLevel::Minimal {
        for file in files_with_violations(report) {
            writeln!(
                out,
                "<h2>{} <small>({}/100)</small></h2>\n<ul>",
                escape_html(&file.file_path),
                file.score
            )?;
            for severity in SEVERITY_ORDER {
                for v in violations_at(file, severity) {
                    write!(
                        out,
                        "<li class=\"{}\"><strong>L{}:{}</strong> <code>{}</code> {}",
                        v.severity,
                        v.line,
                        v.column,
                        escape_html(&v.rule_id),
                        escape_html(&v.message)
                    )?;
                    if level == ReportingLevel::Detailed {
                        if let Some(suggestion) = &v.suggestion {
                            write!(out, "<br><em>{}</em>", escape_html(suggestion))?;
                        }
                    }
                    writeln!(out, "</li>")?;
                }
            }
            writeln!(out, "</ul>")?;
        }
    }

    if s.total_violations > 0 {
        writeln!(out, "<h2>Recommendations</h2>\n<ol>")?;
        for rec in RECOMMENDATIONS {
            writeln!(out, "<li>{}</li>", escape_html(rec))?;
        }
        writeln!(out, "</ol>")?;
    }

    writeln!(out, "</body>\n</html>")?;
    Ok(())
}

/// SARIF 2.1.0 log with one result per violation.
pub fn render_sarif(report: &ComplianceReport) -> String {
    let mut seen_rules: Vec<&str> = Vec::new();
    for file in &report.files {
        for v in &file.violations {
            if !seen_rules.contains(&v.rule_id.as_str()) {
                seen_rules.push(&v.rule_id);
            }
        }
    }

    let rules_json: Vec<serde_json::Value> = seen_rules
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r,
                "shortDescription": { "text": r }
            })
        })
        .collect();

    let results_json: Vec<serde_json::Value> = report
        .files
        .iter()
        .flat_map(|f| f.violations.iter().map(move |v| (f, v)))
        .map(|(f, v)| {
            let level = match v.severity {
                RuleLevel::Error => "error",
                RuleLevel::Warning => "warning",
                RuleLevel::Info => "note",
            };
            let mut region = serde_json::json!({
                "startLine": v.line,
                "startColumn": v.column,
            });
            if let (Some(end_line), Some(end_column)) = (v.end_line, v.end_column) {
                region["endLine"] = end_line.into();
                region["endColumn"] = end_column.into();
            }
            serde_json::json!({
                "ruleId": v.rule_id,
                "level": level,
                "message": { "text": v.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": f.file_path,
                            "uriBaseId": "%SRCROOT%"
                        },
                        "region": region
                    }
                }]
            })
        })
        .collect();

    let sarif = serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "ui-sentinel",
                    "version": UI_SENTINEL_VERSION,
                    "rules": rules_json
                }
            },
            "results": results_json
        }]
    });

    serde_json::to_string_pretty(&sarif).unwrap_or_default()
}
