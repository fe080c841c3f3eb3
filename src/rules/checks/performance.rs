use crate::error::RuleError;
use crate::markup::FileKind;
use crate::rules::{RuleLevel, RuleOutput, ValidationContext, Violation};

pub fn evaluate_component_size(ctx: &ValidationContext) -> Result<RuleOutput, RuleError> {
    let mut out = RuleOutput::new();
    if ctx.file_kind != FileKind::MarkupComponent {
        return Ok(out);
    }
    let lines = ctx.line_count();
    let limit = ctx.config.max_component_size;
    if lines > limit {
        out.push(
            Violation::new(
                RuleLevel::Warning,
                format!("Component file has {} lines (limit {})", lines, limit),
                1,
                1,
            )
            .with_suggestion("Split it into smaller components or lazy-load the heavy parts")
            .with_context("lines", lines.to_string()),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn test_long_component_is_flagged() {
        let mut config = Configuration::strict();
        config.max_component_size = 3;
        let src = "<Box>\n<Box />\n<Box />\n</Box>";
        let (ctx, _) = ValidationContext::build("Big.tsx", src, &config);
        let out = evaluate_component_size(&ctx).unwrap();
        assert_eq!(out.violations.len(), 1);
        assert_eq!(out.violations[0].context_value("lines"), Some("4"));

        let (ctx, _) = ValidationContext::build("big.css", src, &config);
        assert!(evaluate_component_size(&ctx).unwrap().violations.is_empty());
    }

    #[test]
    fn test_limit_is_inclusive() {
        let mut config = Configuration::strict();
        config.max_component_size = 4;
        let (ctx, _) = ValidationContext::build("Big.tsx", "<Box>\n<Box />\n<Box />\n</Box>\n", &config);
        assert!(evaluate_component_size(&ctx).unwrap().violations.is_empty());
    }
}
