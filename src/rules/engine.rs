use crate::compliance::DeepComplianceReport;
use crate::config::Configuration;
use crate::error::{ConfigError, EngineError};
use crate::fixes::{self, FixOutcome};
use crate::report::{ComplianceReport, FileReport};
use crate::rules::{catalog, Fix, Rule, RuleLevel, ValidationContext, Violation, PARSE_ERROR_RULE_ID};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Ordered rule registry bound to one configuration.
pub struct RuleEngine {
    config: Configuration,
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Validates the configuration and registers the built-in catalog with
    /// enablement derived from it.
    pub fn new(config: Configuration) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = catalog::builtin_rules(&config);
        Ok(Self { config, rules })
    }

    /// Engine without any rules, for callers that register their own.
    pub fn empty(config: Configuration) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rules: Vec::new(),
        })
    }

    pub fn register(&mut self, rule: Rule) -> Result<(), EngineError> {
        if self.rule(&rule.id).is_some() {
            return Err(EngineError::DuplicateRule(rule.id));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Returns false when no rule has that id.
    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn validate_file(&self, file_path: &str, content: &str) -> FileReport {
        self.validate_file_with_metadata(file_path, content, &BTreeMap::new())
    }

    /// Same as [`validate_file`](Self::validate_file), with caller metadata
    /// exposed to every rule through [`ValidationContext::metadata`].
    pub fn validate_file_with_metadata(
        &self,
        file_path: &str,
        content: &str,
        metadata: &BTreeMap<String, String>,
    ) -> FileReport {
        let (ctx, parse_error) = ValidationContext::build(file_path, content, &self.config);
        let ctx = metadata
            .iter()
            .fold(ctx, |ctx, (key, value)| ctx.with_metadata(key, value));
        debug!(file = file_path, kind = %ctx.file_kind, "validating");

        let mut violations = Vec::new();
        let mut fixes = Vec::new();

        if let Some(err) = parse_error {
            debug!(file = file_path, error = %err, "parse failed, running text checks only");
            let mut v = Violation::new(RuleLevel::Error, format!("Failed to parse markup: {}", err), 1, 1)
                .with_context("line", err.line.to_string())
                .with_context("column", err.column.to_string());
            v.rule_id = PARSE_ERROR_RULE_ID.to_string();
            violations.push(v);
        }

        for rule in self.rules.iter().filter(|r| r.enabled) {
            match rule.evaluate(&ctx) {
                Ok(result) => {
                    debug!(file = file_path, rule = %rule.id, violations = result.violations.len(), "rule done");
                    violations.extend(result.violations);
                    fixes.extend(result.fixes);
                }
                Err(e) => {
                    warn!(file = file_path, rule = %rule.id, error = %e, "rule failed, skipping");
                }
            }
        }

        FileReport::new(file_path, ctx.file_kind, violations, fixes)
    }

    /// Validates files in parallel; reports keep the input order.
    pub fn validate_files<P, C>(&self, files: &[(P, C)]) -> ComplianceReport
    where
        P: AsRef<str> + Sync,
        C: AsRef<str> + Sync,
    {
        let reports: Vec<FileReport> = files
            .par_iter()
            .map(|(path, content)| self.validate_file(path.as_ref(), content.as_ref()))
            .collect();
        ComplianceReport::build(reports, &self.config)
    }

    pub fn apply_fixes(&self, content: &str, fixes: &[Fix]) -> FixOutcome {
        fixes::apply_fixes_detailed(content, fixes)
    }

    pub fn deep_compliance(&self, file_path: &str, content: &str) -> DeepComplianceReport {
        let (ctx, _) = ValidationContext::build(file_path, content, &self.config);
        DeepComplianceReport::analyze(&ctx)
    }
}
