use proptest::prelude::*;
use ui_sentinel::scoring::{is_compliant, score, SeverityCounts};

fn counts() -> impl Strategy<Value = SeverityCounts> {
    (0usize..40, 0usize..40, 0usize..60).prop_map(|(error, warning, info)| SeverityCounts {
        error,
        warning,
        info,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn score_stays_within_bounds(c in counts()) {
        prop_assert!(score(&c) <= 100);
    }

    #[test]
    fn score_never_rises_with_more_findings(c in counts(), extra in 1usize..10) {
        let base = score(&c);
        let more_errors = SeverityCounts { error: c.error + extra, ..c };
        let more_warnings = SeverityCounts { warning: c.warning + extra, ..c };
        let more_infos = SeverityCounts { info: c.info + extra, ..c };
        prop_assert!(score(&more_errors) <= base);
        prop_assert!(score(&more_warnings) <= base);
        prop_assert!(score(&more_infos) <= base);
    }

    #[test]
    fn compliance_only_depends_on_errors(c in counts()) {
        prop_assert_eq!(is_compliant(&c), c.error == 0);
    }
}

#[test]
fn clean_counts_score_full_marks() {
    assert_eq!(score(&SeverityCounts::default()), 100);
}
