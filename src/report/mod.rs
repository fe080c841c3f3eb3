//! File and project compliance reports.

pub mod render;

pub use render::{render, render_html, render_json, render_markdown, render_sarif};

use crate::config::Configuration;
use crate::markup::FileKind;
use crate::rules::{Fix, Violation, PARSE_ERROR_RULE_ID};
use crate::scoring::{self, SeverityCounts};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file_path: String,
    pub file_kind: FileKind,
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
    pub score: u8,
    pub compliant: bool,
}

impl FileReport {
    pub fn new(file_path: &str, file_kind: FileKind, violations: Vec<Violation>, fixes: Vec<Fix>) -> Self {
        let counts = SeverityCounts::from_violations(&violations);
        Self {
            file_path: file_path.to_string(),
            file_kind,
            score: scoring::score(&counts),
            compliant: scoring::is_compliant(&counts),
            violations,
            fixes,
        }
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_violations(&self.violations)
    }

    pub fn has_parse_error(&self) -> bool {
        self.violations.iter().any(|v| v.rule_id == PARSE_ERROR_RULE_ID)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total_files: usize,
    pub files_scanned: usize,
    pub total_violations: usize,
    pub violations_by_type: BTreeMap<String, usize>,
    pub violations_by_severity: SeverityCounts,
    pub score: u8,
    pub compliant: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub summary: ComplianceSummary,
    pub files: Vec<FileReport>,
    pub timestamp: DateTime<Utc>,
    pub config: Configuration,
}

impl ComplianceReport {
    /// Folds per-file reports into a project summary. An empty project
    /// scores 100 and is compliant.
    pub fn build(files: Vec<FileReport>, config: &Configuration) -> Self {
        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_severity = SeverityCounts::default();

        for file in &files {
            for v in &file.violations {
                let key = v
                    .rule_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| PARSE_ERROR_RULE_ID.to_string());
                *by_type.entry(key).or_default() += 1;
                by_severity.add(v.severity);
            }
        }

        let score = if files.is_empty() {
            100
        } else {
            let total: f64 = files.iter().map(|f| f.score as f64).sum();
            (total / files.len() as f64).round() as u8
        };

        let summary = ComplianceSummary {
            total_files: files.len(),
            files_scanned: files.iter().filter(|f| f.file_kind != FileKind::Other).count(),
            total_violations: by_severity.total(),
            violations_by_type: by_type,
            violations_by_severity: by_severity,
            score,
            compliant: files.iter().all(|f| f.compliant),
        };

        Self {
            summary,
            files,
            timestamp: Utc::now(),
            config: config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleLevel, RuleType};

    fn violation(level: RuleLevel, rule_type: Option<RuleType>) -> Violation {
        let mut v = Violation::new(level, "m", 1, 1);
        v.rule_type = rule_type;
        if rule_type.is_none() {
            v.rule_id = PARSE_ERROR_RULE_ID.to_string();
        }
        v
    }

    #[test]
    fn test_file_report_scores() {
        let report = FileReport::new(
            "a.tsx",
            FileKind::MarkupComponent,
            vec![violation(RuleLevel::Warning, Some(RuleType::Localization))],
            vec![],
        );
        assert_eq!(report.score, 95);
        assert!(report.compliant);
        assert!(!report.has_parse_error());
    }

    #[test]
    fn test_summary_folds_files() {
        let files = vec![
            FileReport::new(
                "a.tsx",
                FileKind::MarkupComponent,
                vec![
                    violation(RuleLevel::Error, Some(RuleType::Semantic)),
                    violation(RuleLevel::Error, None),
                ],
                vec![],
            ),
            FileReport::new("b.css", FileKind::Stylesheet, vec![], vec![]),
            FileReport::new("notes.txt", FileKind::Other, vec![], vec![]),
        ];
        let report = ComplianceReport::build(files, &Configuration::strict());
        let s = &report.summary;
        assert_eq!(s.total_files, 3);
        assert_eq!(s.files_scanned, 2);
        assert_eq!(s.total_violations, 2);
        assert_eq!(s.violations_by_type.get("semantic"), Some(&1));
        assert_eq!(s.violations_by_type.get("parse-error"), Some(&1));
        assert_eq!(s.violations_by_severity.error, 2);
        assert_eq!(s.score, 93);
        assert!(!s.compliant);
    }

    #[test]
    fn test_empty_project_is_compliant() {
        let report = ComplianceReport::build(vec![], &Configuration::strict());
        assert_eq!(report.summary.score, 100);
        assert!(report.summary.compliant);
    }
}
