//! Applies range fixes to source text, last edit first so earlier positions
//! stay valid.

use crate::markup::Span;
use crate::rules::Fix;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFix {
    pub description: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcome {
    pub content: String,
    pub applied: usize,
    pub skipped: Vec<SkippedFix>,
}

pub fn apply_fixes(source: &str, fixes: &[Fix]) -> String {
    apply_fixes_detailed(source, fixes).content
}

/// Range-less fixes are ignored. Out-of-range, inverted and overlapping fixes
/// are skipped and reported; the rest still apply.
pub fn apply_fixes_detailed(source: &str, fixes: &[Fix]) -> FixOutcome {
    let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();

    let mut ranged: Vec<(&Fix, Span)> = fixes
        .iter()
        .filter_map(|f| f.range.map(|r| (f, r)))
        .collect();
    // stable: equal starts keep their input order
    ranged.sort_by(|a, b| b.1.start.cmp(&a.1.start));

    let mut outcome = FixOutcome::default();
    let mut lowest_applied = None;

    for (fix, range) in ranged {
        if let Err(reason) = check_range(&lines, range) {
            skip(&mut outcome, fix, reason);
            continue;
        }
        if lowest_applied.is_some_and(|low| range.end > low) {
            skip(&mut outcome, fix, "overlaps a fix that was already applied".to_string());
            continue;
        }
        splice(&mut lines, range, &fix.fix);
        lowest_applied = Some(range.start);
        outcome.applied += 1;
    }

    outcome.content = lines.join("\n");
    outcome
}

fn skip(outcome: &mut FixOutcome, fix: &Fix, reason: String) {
    warn!(fix = %fix.description, %reason, "skipping fix");
    outcome.skipped.push(SkippedFix {
        description: fix.description.clone(),
        reason,
    });
}

fn check_range(lines: &[String], range: Span) -> Result<(), String> {
    let (start, end) = (range.start, range.end);
    if start.line == 0 || end.line > lines.len() {
        return Err(format!("lines {}..{} are outside the document", start.line, end.line));
    }
    if end < start {
        return Err("range ends before it starts".to_string());
    }
    let start_len = lines[start.line - 1].chars().count();
    let end_len = lines[end.line - 1].chars().count();
    if start.column > start_len || end.column > end_len {
        return Err(format!(
            "column {}:{} or {}:{} is past the end of the line",
            start.line, start.column, end.line, end.column
        ));
    }
    Ok(())
}

fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map(|(i, _)| i).unwrap_or(line.len())
}

fn splice(lines: &mut Vec<String>, range: Span, replacement: &str) {
    let (start, end) = (range.start, range.end);
    let first = &lines[start.line - 1];
    let last = &lines[end.line - 1];
    let prefix = &first[..byte_index(first, start.column)];
    let suffix = &last[byte_index(last, end.column)..];
    let joined = format!("{}{}{}", prefix, replacement, suffix);

    let new_lines: Vec<String> = joined.split('\n').map(str::to_string).collect();
    lines.splice(start.line - 1..end.line, new_lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Position;

    fn fix(sl: usize, sc: usize, el: usize, ec: usize, text: &str) -> Fix {
        Fix::replace(
            format!("{sl}:{sc}-{el}:{ec}"),
            Span::new(Position::new(sl, sc), Position::new(el, ec)),
            text,
        )
    }

    #[test]
    fn test_fixes_apply_in_any_order() {
        let src = "line1\nline2\nline3";
        let a = fix(1, 0, 1, 5, "first");
        let b = fix(3, 0, 3, 5, "third");
        let expected = "first\nline2\nthird";
        assert_eq!(apply_fixes(src, &[a.clone(), b.clone()]), expected);
        assert_eq!(apply_fixes(src, &[b, a]), expected);
    }

    #[test]
    fn test_same_line_fixes() {
        let src = r#"<Box className="p-7 ml-2">"#;
        let out = apply_fixes(src, &[fix(1, 16, 1, 19, "p-6"), fix(1, 20, 1, 24, "ms-2")]);
        assert_eq!(out, r#"<Box className="p-6 ms-2">"#);
    }

    #[test]
    fn test_multi_line_fix_removes_inner_lines() {
        let src = "a\nbXc\nd\neYf";
        assert_eq!(apply_fixes(src, &[fix(2, 1, 4, 1, "-")]), "a\nb-Yf");
    }

    #[test]
    fn test_range_less_fixes_are_ignored() {
        let out = apply_fixes_detailed("abc", &[Fix::advice("hint", "alt=\"…\"")]);
        assert_eq!(out.content, "abc");
        assert_eq!(out.applied, 0);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_invalid_fixes_are_dropped() {
        let src = "one\ntwo";
        let out = apply_fixes_detailed(
            src,
            &[fix(9, 0, 9, 1, "x"), fix(1, 0, 1, 3, "ONE"), fix(2, 3, 2, 1, "y"), fix(2, 0, 2, 10, "z")],
        );
        assert_eq!(out.content, "ONE\ntwo");
        assert_eq!(out.applied, 1);
        assert_eq!(out.skipped.len(), 3);
    }

    #[test]
    fn test_overlapping_fix_is_dropped() {
        let out = apply_fixes_detailed("abcdef", &[fix(1, 0, 1, 4, "X"), fix(1, 2, 1, 6, "Y")]);
        assert_eq!(out.content, "abY");
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn test_non_ascii_columns() {
        assert_eq!(apply_fixes("héllo wörld", &[fix(1, 6, 1, 11, "there")]), "héllo there");
    }
}
