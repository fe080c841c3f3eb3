//! # UI Sentinel
//!
//! Validates TSX/JSX components and stylesheets against a design system:
//! design tokens and the 8-point grid, approved components, WCAG
//! accessibility, localization and RTL readiness. Produces per-file reports,
//! project summaries and range fixes that can be applied back to the source.
//!
//! ```no_run
//! use ui_sentinel::{validate_file, Configuration};
//!
//! let report = validate_file("src/App.tsx", "<div>Hello</div>", &Configuration::strict())?;
//! assert!(!report.compliant);
//! # Ok::<(), ui_sentinel::error::ConfigError>(())
//! ```

pub mod compliance;
pub mod config;
pub mod error;
pub mod fixes;
pub mod markup;
pub mod report;
pub mod rules;
pub mod scoring;

pub use compliance::DeepComplianceReport;
pub use config::{Configuration, OutputFormat, Preset, ReportingLevel, WcagLevel};
pub use error::{ConfigError, EngineError, ParseError, RuleError};
pub use fixes::{apply_fixes_detailed, FixOutcome};
pub use report::{ComplianceReport, FileReport};
pub use rules::{Fix, Rule, RuleEngine, RuleLevel, RuleType, ValidationContext, ValidationResult, Violation};

/// Validates one file with a fresh engine built from `config`.
pub fn validate_file(path: &str, content: &str, config: &Configuration) -> Result<FileReport, ConfigError> {
    Ok(RuleEngine::new(config.clone())?.validate_file(path, content))
}

/// Validates `(path, content)` pairs and folds them into a project report.
pub fn validate_files<P, C>(files: &[(P, C)], config: &Configuration) -> Result<ComplianceReport, ConfigError>
where
    P: AsRef<str> + Sync,
    C: AsRef<str> + Sync,
{
    Ok(RuleEngine::new(config.clone())?.validate_files(files))
}

/// Applies the range fixes of a report to `content`; invalid fixes are dropped.
pub fn apply_fixes(path: &str, content: &str, fixes: &[Fix]) -> String {
    let outcome = fixes::apply_fixes_detailed(content, fixes);
    tracing::debug!(
        file = path,
        applied = outcome.applied,
        skipped = outcome.skipped.len(),
        "fixes applied"
    );
    outcome.content
}
