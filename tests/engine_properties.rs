use ui_sentinel::markup::{Position, Span};
use ui_sentinel::rules::PARSE_ERROR_RULE_ID;
use ui_sentinel::{apply_fixes, apply_fixes_detailed, validate_file, validate_files, Configuration, Fix, RuleLevel};

fn strict() -> Configuration {
    Configuration::strict()
}

fn span(line: usize, start: usize, end: usize) -> Span {
    Span::new(Position::new(line, start), Position::new(line, end))
}

#[test]
fn raw_div_suggests_box() {
    let report = validate_file("App.tsx", "<div>x</div>", &strict()).unwrap();
    let raw: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.rule_id == "no-raw-html")
        .collect();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].severity, RuleLevel::Error);
    assert!(raw[0].message.contains("div"));
    assert!(raw[0].suggestion.as_deref().unwrap_or("").contains("Box"));
    assert!(!report.compliant);
}

#[test]
fn off_grid_padding_suggests_nearest_step() {
    let report = validate_file("Card.tsx", r#"<Box className="p-7" />"#, &strict()).unwrap();
    let spacing: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.rule_id == "no-hardcoded-spacing")
        .collect();
    assert_eq!(spacing.len(), 1);
    assert_eq!(spacing[0].severity, RuleLevel::Error);
    assert!(spacing[0].suggestion.as_deref().unwrap_or("").contains("p-6"));
}

#[test]
fn image_without_alt_is_a_critical_failure() {
    let report = validate_file("Hero.tsx", r#"<Image src="hero.png" />"#, &strict()).unwrap();
    assert!(report.violations.is_empty());

    let report = validate_file("Hero.tsx", r#"<img src="hero.png" />"#, &strict()).unwrap();
    let alt: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.context_value("wcag") == Some("1.1.1"))
        .collect();
    assert_eq!(alt.len(), 1);
    assert_eq!(alt[0].context_value("impact"), Some("critical"));

    let report = validate_file("Hero.tsx", r#"<img src="hero.png" alt="x" />"#, &strict()).unwrap();
    assert!(report.violations.iter().all(|v| v.rule_id != "image-alt"));
}

#[test]
fn fixes_apply_in_either_order() {
    let source = "line1\nline2\nline3";
    let first = Fix::replace("first", span(1, 0, 5), "LINE1");
    let third = Fix::replace("third", span(3, 0, 5), "LINE3");
    let expected = "LINE1\nline2\nLINE3";

    assert_eq!(apply_fixes("a.tsx", source, &[first.clone(), third.clone()]), expected);
    assert_eq!(apply_fixes("a.tsx", source, &[third, first]), expected);
}

#[test]
fn multi_line_fix_joins_prefix_and_suffix() {
    let source = "keep <a\nremoved\nb> tail";
    let fix = Fix::replace("join", Span::new(Position::new(1, 5), Position::new(3, 2)), "<X>");
    assert_eq!(apply_fixes("a.tsx", source, &[fix]), "keep <X> tail");
}

#[test]
fn fixed_content_does_not_report_the_fixed_rules_again() {
    let source = "<section className=\"p-7 ml-2\">\n  <Text>{t(\"title\")}</Text>\n</section>\n";
    let report = validate_file("Page.tsx", source, &strict()).unwrap();
    for rule in ["no-raw-html", "no-hardcoded-spacing", "rtl-logical-properties"] {
        assert!(report.violations.iter().any(|v| v.rule_id == rule), "{rule} not reported");
    }

    let fixed = apply_fixes("Page.tsx", source, &report.fixes);
    assert_eq!(
        fixed,
        "<Section className=\"p-6 ms-2\">\n  <Text>{t(\"title\")}</Text>\n</Section>\n"
    );

    let again = validate_file("Page.tsx", &fixed, &strict()).unwrap();
    for rule in ["no-raw-html", "no-hardcoded-spacing", "rtl-logical-properties"] {
        assert!(again.violations.iter().all(|v| v.rule_id != rule), "{rule} reported again");
    }
    assert!(again.compliant);
}

#[test]
fn removed_inline_styles_are_not_reported_again() {
    let cases = [
        ("<Box id=\"main\" style={{ width: 200 }} />", "<Box id=\"main\" />"),
        ("<Box\n  style={s}\n  id=\"a\"\n/>", "<Box\n  id=\"a\"\n/>"),
    ];
    for (source, expected) in cases {
        let report = validate_file("Panel.tsx", source, &strict()).unwrap();
        assert!(report.violations.iter().any(|v| v.rule_id == "no-inline-styles"));

        let fixed = apply_fixes("Panel.tsx", source, &report.fixes);
        assert_eq!(fixed, expected);

        let again = validate_file("Panel.tsx", &fixed, &strict()).unwrap();
        assert!(again.violations.iter().all(|v| v.rule_id != "no-inline-styles"));
        assert!(again.compliant);
    }
}

#[test]
fn numeric_entities_keep_a_file_compliant() {
    let report = validate_file("Footer.tsx", "<Text>{t(\"copy\")} &#169; &#8212;</Text>", &strict()).unwrap();
    assert!(report.violations.is_empty(), "{:?}", report.violations);
    assert!(report.compliant);
}

#[test]
fn whitespace_only_button_needs_a_label() {
    let report = validate_file("Toolbar.tsx", r#"<Button>{" "}</Button>"#, &strict()).unwrap();
    let labels: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.rule_id == "interactive-label")
        .collect();
    assert!(labels.is_empty());

    let report = validate_file("Toolbar.tsx", r#"<button>{" "}</button>"#, &strict()).unwrap();
    assert!(report.violations.iter().any(|v| v.rule_id == "interactive-label"));
}

#[test]
fn malformed_markup_yields_a_parse_error_violation() {
    let report = validate_file("Broken.tsx", "<Box><Text></Box", &strict()).unwrap();
    assert!(report.has_parse_error());
    let parse = report
        .violations
        .iter()
        .find(|v| v.rule_id == PARSE_ERROR_RULE_ID)
        .unwrap();
    assert_eq!((parse.line, parse.column), (1, 1));
    assert!(parse.rule_type.is_none());
    assert!(!report.compliant);
}

#[test]
fn out_of_bounds_fixes_are_dropped() {
    let source = "one\ntwo";
    let valid = Fix::replace("valid", span(2, 0, 3), "TWO");
    let past_end = Fix::replace("past end", span(9, 0, 1), "x");
    let too_wide = Fix::replace("too wide", span(1, 2, 40), "x");

    let outcome = apply_fixes_detailed(source, &[past_end, valid, too_wide]);
    assert_eq!(outcome.content, "one\nTWO");
    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.skipped.len(), 2);
}

#[test]
fn project_report_keeps_input_order_and_totals() {
    let files = vec![
        ("b/Clean.tsx", "<Box />"),
        ("a/Raw.tsx", "<div />"),
        ("theme.css", ".card { color: #ff0000; }"),
    ];
    let report = validate_files(&files, &strict()).unwrap();
    let paths: Vec<&str> = report.files.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(paths, vec!["b/Clean.tsx", "a/Raw.tsx", "theme.css"]);
    assert_eq!(report.summary.total_files, 3);
    assert_eq!(
        report.summary.total_violations,
        report.files.iter().map(|f| f.violations.len()).sum::<usize>()
    );
    assert!(!report.summary.compliant);
    assert!(report.files[0].compliant);
}

#[test]
fn invalid_configuration_is_rejected_before_running() {
    let mut config = strict();
    config.max_component_size = 0;
    assert!(validate_file("App.tsx", "<Box />", &config).is_err());
}
