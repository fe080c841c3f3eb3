pub mod catalog;
pub mod checks;
pub mod context;
pub mod engine;

pub use context::ValidationContext;
pub use engine::RuleEngine;

use crate::error::RuleError;
use crate::markup::Span;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warning,
    Info,
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleLevel::Error => "error",
            RuleLevel::Warning => "warning",
            RuleLevel::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RuleType {
    DesignToken,
    ComponentUsage,
    Accessibility,
    Localization,
    Styling,
    Responsive,
    Semantic,
    Performance,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleType::DesignToken => "design-token",
            RuleType::ComponentUsage => "component-usage",
            RuleType::Accessibility => "accessibility",
            RuleType::Localization => "localization",
            RuleType::Styling => "styling",
            RuleType::Responsive => "responsive",
            RuleType::Semantic => "semantic",
            RuleType::Performance => "performance",
        };
        f.write_str(s)
    }
}

/// Rule id used for the synthetic violation recorded when a file fails to parse.
pub const PARSE_ERROR_RULE_ID: &str = "parse-error";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule_id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    pub message: String,
    pub severity: RuleLevel,
    /// 1-based.
    pub line: usize,
    /// 1-based.
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl Violation {
    pub fn new(severity: RuleLevel, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            rule_id: String::new(),
            rule_type: None,
            message: message.into(),
            severity,
            line,
            column,
            end_line: None,
            end_column: None,
            suggestion: None,
            documentation: None,
            context: BTreeMap::new(),
        }
    }

    /// Violation covering a markup span (0-based columns become 1-based).
    pub fn at(severity: RuleLevel, message: impl Into<String>, span: Span) -> Self {
        let mut v = Self::new(severity, message, span.start.line, span.start.column + 1);
        v.end_line = Some(span.end.line);
        v.end_column = Some(span.end.column + 1);
        v
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = Some(url.into());
        self
    }

    pub fn with_context(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

/// Proposed text edit. Without a range it is advice only and never applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fix {
    pub description: String,
    pub fix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Span>,
}

impl Fix {
    pub fn replace(description: impl Into<String>, range: Span, text: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            fix: text.into(),
            range: Some(range),
        }
    }

    pub fn advice(description: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            fix: text.into(),
            range: None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        self.range.is_some()
    }
}

/// What an evaluator hands back; the rule wraps it into a [`ValidationResult`].
#[derive(Debug, Default)]
pub struct RuleOutput {
    pub violations: Vec<Violation>,
    pub fixes: Vec<Fix>,
}

impl RuleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn push_fix(&mut self, fix: Fix) {
        self.fixes.push(fix);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub rule_id: String,
    pub valid: bool,
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
}

pub type Evaluator =
    Arc<dyn Fn(&ValidationContext) -> Result<RuleOutput, RuleError> + Send + Sync>;

/// Tagged rule record: descriptive data plus the function that checks it.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub severity: RuleLevel,
    pub category: String,
    pub enabled: bool,
    pub auto_fixable: bool,
    #[serde(skip)]
    evaluator: Evaluator,
}

impl Rule {
    pub fn new<F>(
        id: &str,
        name: &str,
        rule_type: RuleType,
        severity: RuleLevel,
        evaluator: F,
    ) -> Self
    where
        F: Fn(&ValidationContext) -> Result<RuleOutput, RuleError> + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            rule_type,
            severity,
            category: rule_type.to_string(),
            enabled: true,
            auto_fixable: false,
            evaluator: Arc::new(evaluator),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_auto_fix(mut self, auto_fixable: bool) -> Self {
        self.auto_fixable = auto_fixable;
        self
    }

    pub fn enabled_when(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Runs the evaluator and stamps every violation with this rule's id and type.
    ///
    /// A panicking evaluator is reported as [`RuleError::Panicked`] instead of
    /// unwinding into the caller.
    pub fn evaluate(&self, ctx: &ValidationContext) -> Result<ValidationResult, RuleError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.evaluator)(ctx)));
        let output = match outcome {
            Ok(result) => result?,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                return Err(RuleError::Panicked {
                    rule: self.id.clone(),
                    message,
                });
            }
        };

        let violations: Vec<Violation> = output
            .violations
            .into_iter()
            .map(|mut v| {
                v.rule_id = self.id.clone();
                v.rule_type = Some(self.rule_type);
                v
            })
            .collect();

        Ok(ValidationResult {
            rule_id: self.id.clone(),
            valid: violations.is_empty(),
            violations,
            fixes: output.fixes,
        })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("type", &self.rule_type)
            .field("severity", &self.severity)
            .field("enabled", &self.enabled)
            .field("auto_fixable", &self.auto_fixable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::markup::Position;

    fn ctx() -> ValidationContext {
        ValidationContext::build("App.tsx", "<Box />", &Configuration::strict()).0
    }

    fn flag_everything(_ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
        let mut out = RuleOutput::new();
        out.push(Violation::new(RuleLevel::Warning, "always", 1, 1));
        Ok(out)
    }

    fn explode(_ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
        panic!("boom")
    }

    #[test]
    fn test_evaluate_stamps_rule_identity() {
        let rule = Rule::new("always", "Always", RuleType::Styling, RuleLevel::Warning, flag_everything);
        let result = rule.evaluate(&ctx()).unwrap();
        assert_eq!(result.rule_id, "always");
        assert!(!result.valid);
        assert_eq!(result.violations[0].rule_id, "always");
        assert_eq!(result.violations[0].rule_type, Some(RuleType::Styling));
    }

    #[test]
    fn test_panicking_evaluator_becomes_error() {
        let rule = Rule::new("explode", "Explode", RuleType::Semantic, RuleLevel::Error, explode);
        let err = rule.evaluate(&ctx()).unwrap_err();
        assert!(matches!(err, RuleError::Panicked { ref rule, ref message } if rule == "explode" && message == "boom"));
    }

    #[test]
    fn test_violation_at_converts_columns() {
        let span = Span::new(Position::new(2, 0), Position::new(2, 4));
        let v = Violation::at(RuleLevel::Error, "x", span);
        assert_eq!((v.line, v.column), (2, 1));
        assert_eq!((v.end_line, v.end_column), (Some(2), Some(5)));
    }

    #[test]
    fn test_violation_serializes_camel_case() {
        let v = Violation::new(RuleLevel::Info, "note", 1, 1).with_suggestion("do this");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["severity"], "info");
        assert_eq!(json["suggestion"], "do this");
        assert!(json.get("endLine").is_none());
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_rule_serializes_without_evaluator() {
        let rule = Rule::new("always", "Always", RuleType::DesignToken, RuleLevel::Error, flag_everything)
            .with_auto_fix(true);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "design-token");
        assert_eq!(json["autoFixable"], true);
        assert_eq!(json["category"], "design-token");
    }
}
