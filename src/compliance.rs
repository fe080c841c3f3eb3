//! Deep compliance: the five sub-check analyses run side by side on one file,
//! each with its own coverage figure, independent of rule enablement.

use crate::markup::FileKind;
use crate::rules::checks::accessibility::AccessibilityIssue;
use crate::rules::checks::components::ComponentFinding;
use crate::rules::checks::localization::LocalizationFinding;
use crate::rules::checks::rtl::RtlFinding;
use crate::rules::checks::tokens::TokenFinding;
use crate::rules::checks::{accessibility, components, localization, rtl, tokens};
use crate::rules::ValidationContext;
use serde::Serialize;
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCheck<T> {
    pub findings: Vec<T>,
    pub coverage: f64,
    pub passed: bool,
}

impl<T> SubCheck<T> {
    pub fn new(findings: Vec<T>) -> Self {
        Self {
            coverage: coverage(findings.len()),
            passed: findings.is_empty(),
            findings,
        }
    }
}

/// `max(0, 100 - findings / 100 * 100)`
pub fn coverage(findings: usize) -> f64 {
    (100.0 - findings as f64 / 100.0 * 100.0).max(0.0)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepComplianceReport {
    pub file_path: String,
    pub file_kind: FileKind,
    pub parsed: bool,
    pub design_tokens: SubCheck<TokenFinding>,
    pub components: SubCheck<ComponentFinding>,
    pub accessibility: SubCheck<AccessibilityIssue>,
    pub localization: SubCheck<LocalizationFinding>,
    pub rtl: SubCheck<RtlFinding>,
    pub overall_coverage: f64,
}

impl DeepComplianceReport {
    pub fn analyze(ctx: &ValidationContext) -> Self {
        let design_tokens = SubCheck::new(tokens::scan(ctx));
        let components = SubCheck::new(components::scan(ctx));
        let accessibility = SubCheck::new(accessibility::scan(ctx));
        let localization = SubCheck::new(localization::find_hardcoded_text(ctx));
        let rtl = SubCheck::new(rtl::scan(ctx));

        let overall_coverage = [
            design_tokens.coverage,
            components.coverage,
            accessibility.coverage,
            localization.coverage,
            rtl.coverage,
        ]
        .iter()
        .sum::<f64>()
            / 5.0;

        Self {
            file_path: ctx.file_path.clone(),
            file_kind: ctx.file_kind,
            parsed: ctx.tree.is_some(),
            design_tokens,
            components,
            accessibility,
            localization,
            rtl,
            overall_coverage,
        }
    }

    pub fn passed(&self) -> bool {
        self.design_tokens.passed
            && self.components.passed
            && self.accessibility.passed
            && self.localization.passed
            && self.rtl.passed
    }

    /// `(name, findings, coverage)` rows in display order.
    pub fn rows(&self) -> [(&'static str, usize, f64); 5] {
        [
            ("Design tokens", self.design_tokens.findings.len(), self.design_tokens.coverage),
            ("Components", self.components.findings.len(), self.components.coverage),
            ("Accessibility", self.accessibility.findings.len(), self.accessibility.coverage),
            ("Localization", self.localization.findings.len(), self.localization.coverage),
            ("RTL", self.rtl.findings.len(), self.rtl.coverage),
        ]
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        self.write_markdown(&mut out).map(|()| out).unwrap_or_default()
    }

    fn write_markdown(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "# Deep Compliance: `{}`\n", self.file_path)?;
        if !self.parsed && self.file_kind.is_parseable() {
            writeln!(out, "> Markup could not be parsed; only text checks ran.\n")?;
        }
        writeln!(out, "| Check | Findings | Coverage |")?;
        writeln!(out, "|---|---|---|")?;
        for (name, count, cov) in self.rows() {
            writeln!(out, "| {} | {} | {:.0}% |", name, count, cov)?;
        }
        writeln!(out, "\n**Overall coverage:** {:.1}%", self.overall_coverage)?;

        if !self.design_tokens.findings.is_empty() {
            writeln!(out, "\n## Design tokens\n")?;
            for f in &self.design_tokens.findings {
                writeln!(out, "- L{}: `{}` {}", f.span.start.line, f.value, f.suggestion)?;
            }
        }
        if !self.components.findings.is_empty() {
            writeln!(out, "\n## Components\n")?;
            for f in &self.components.findings {
                match &f.replacement {
                    Some(r) => {
                        writeln!(out, "- L{}: <{}> should be <{}>", f.span.start.line, f.tag, r)?;
                    }
                    None => {
                        writeln!(out, "- L{}: <{}> ({:?})", f.span.start.line, f.tag, f.issue)?;
                    }
                }
            }
        }
        if !self.accessibility.findings.is_empty() {
            writeln!(out, "\n## Accessibility\n")?;
            for f in &self.accessibility.findings {
                writeln!(
                    out,
                    "- L{}: WCAG {} ({}) {}",
                    f.span.start.line, f.criterion, f.impact, f.message
                )?;
            }
        }
        if !self.localization.findings.is_empty() {
            writeln!(out, "\n## Localization\n")?;
            for f in &self.localization.findings {
                writeln!(out, "- L{}: \"{}\"", f.span.start.line, f.text)?;
            }
        }
        if !self.rtl.findings.is_empty() {
            writeln!(out, "\n## RTL\n")?;
            for f in &self.rtl.findings {
                writeln!(out, "- L{}: `{}` -> `{}`", f.span.start.line, f.physical, f.logical)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn test_coverage_formula() {
        assert_eq!(coverage(0), 100.0);
        assert_eq!(coverage(3), 97.0);
        assert_eq!(coverage(250), 0.0);
    }

    #[test]
    fn test_analysis_of_mixed_file() {
        let src = r#"<div className="ml-3 p-7"><img src="a.png" />Hello</div>"#;
        let (ctx, _) = ValidationContext::build("View.tsx", src, &Configuration::strict());
        let report = DeepComplianceReport::analyze(&ctx);
        assert!(report.parsed);
        assert_eq!(report.design_tokens.findings.len(), 1);
        assert_eq!(report.components.findings.len(), 2);
        assert_eq!(report.accessibility.findings.len(), 1);
        assert_eq!(report.localization.findings.len(), 1);
        assert_eq!(report.rtl.findings.len(), 1);
        assert!(!report.passed());
        assert!((report.overall_coverage - 98.8).abs() < 1e-9);

        let md = report.render_markdown();
        assert!(md.contains("| Accessibility | 1 | 99% |"));
        assert!(md.contains("`ml-3` -> `ms-3`"));
    }

    #[test]
    fn test_clean_file_passes() {
        let (ctx, _) = ValidationContext::build("View.tsx", "<Box />", &Configuration::strict());
        let report = DeepComplianceReport::analyze(&ctx);
        assert!(report.passed());
        assert_eq!(report.overall_coverage, 100.0);
    }
}
