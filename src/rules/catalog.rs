//! Built-in rule catalog. Registration order is the order violations appear
//! in a file report.

use crate::config::{Configuration, WcagLevel};
use crate::rules::checks::{accessibility, components, localization, performance, rtl, tokens};
use crate::rules::{Rule, RuleLevel, RuleType};

pub fn builtin_rules(config: &Configuration) -> Vec<Rule> {
    vec![
        Rule::new(
            "no-hardcoded-colors",
            "No hardcoded colors",
            RuleType::DesignToken,
            RuleLevel::Error,
            tokens::evaluate_colors,
        )
        .with_description("Colors must come from design tokens instead of hex, rgb() or hsl() literals")
        .with_category("design-tokens")
        .enabled_when(config.enforce_design_tokens && !config.allow_hardcoded_colors),
        Rule::new(
            "no-hardcoded-spacing",
            "8-point grid spacing",
            RuleType::DesignToken,
            RuleLevel::Error,
            tokens::evaluate_spacing,
        )
        .with_description("Spacing values must sit on the enhanced 8-point grid")
        .with_category("spacing")
        .with_auto_fix(true)
        .enabled_when(config.enforce_enhanced_8pt_grid),
        Rule::new(
            "no-arbitrary-values",
            "No arbitrary values",
            RuleType::DesignToken,
            RuleLevel::Error,
            tokens::evaluate_arbitrary,
        )
        .with_description("Bracketed arbitrary utility values bypass the design system")
        .with_category("design-tokens")
        .enabled_when(!config.allow_arbitrary_values),
        Rule::new(
            "no-inline-styles",
            "No inline styles",
            RuleType::Styling,
            RuleLevel::Error,
            components::evaluate_inline_styles,
        )
        .with_description("The style attribute is not allowed on markup elements")
        .with_category("styling")
        .with_auto_fix(true)
        .enabled_when(!config.allow_inline_styles),
        Rule::new(
            "no-raw-html",
            "Semantic components only",
            RuleType::Semantic,
            RuleLevel::Error,
            components::evaluate_raw_html,
        )
        .with_description("Raw HTML elements must be replaced by design-system components")
        .with_category("components")
        .with_auto_fix(true)
        .enabled_when(config.enforce_semantic_components && !config.allow_raw_html),
        Rule::new(
            "approved-components",
            "Approved components",
            RuleType::ComponentUsage,
            RuleLevel::Warning,
            components::evaluate_approved_components,
        )
        .with_description("Components must come from the approved catalog")
        .with_category("components")
        .enabled_when(config.enforce_semantic_components),
        Rule::new(
            "interactive-label",
            "Interactive elements are labelled",
            RuleType::Accessibility,
            RuleLevel::Error,
            accessibility::evaluate_interactive_label,
        )
        .with_description("Interactive elements need an accessible name (WCAG 4.1.2)")
        .with_category("accessibility")
        .enabled_when(config.enforce_wcag_compliance),
        Rule::new(
            "image-alt",
            "Images have text alternatives",
            RuleType::Accessibility,
            RuleLevel::Error,
            accessibility::evaluate_image_alt,
        )
        .with_description("Images need alt text or an ARIA label (WCAG 1.1.1)")
        .with_category("accessibility")
        .enabled_when(config.enforce_wcag_compliance),
        Rule::new(
            "color-contrast",
            "Color contrast review",
            RuleType::Accessibility,
            RuleLevel::Warning,
            accessibility::evaluate_color_contrast,
        )
        .with_description("Inline foreground/background pairs need a contrast review (WCAG 1.4.3/1.4.6)")
        .with_category("accessibility")
        .enabled_when(config.enforce_wcag_compliance && config.wcag_level >= WcagLevel::AA),
        Rule::new(
            "no-hardcoded-text",
            "Localized text",
            RuleType::Localization,
            RuleLevel::Warning,
            localization::evaluate_hardcoded_text,
        )
        .with_description("User-facing text must go through the translation layer")
        .with_category("localization")
        .enabled_when(config.enforce_localization && !config.allow_hardcoded_text),
        Rule::new(
            "rtl-logical-properties",
            "Logical direction properties",
            RuleType::Localization,
            RuleLevel::Warning,
            rtl::evaluate_logical_properties,
        )
        .with_description("Use start/end utilities and logical properties so layouts mirror in RTL")
        .with_category("rtl")
        .with_auto_fix(true)
        .enabled_when(config.enforce_rtl_support),
        Rule::new(
            "max-component-size",
            "Component size",
            RuleType::Performance,
            RuleLevel::Warning,
            performance::evaluate_component_size,
        )
        .with_description("Large component files should be split")
        .with_category("performance")
        .enabled_when(config.enforce_code_splitting),
    ]
}
