use crate::classify::{LineClass, LineClassifier};
use crate::config::LanguageRule;
use crate::scan::ScanError;
use std::fs;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::Path;

/// Line counts for one file, or a sum over many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCounts {
    pub total_lines: usize,
    pub comment_lines: usize,
    pub method_specific_lines: usize,
}

impl FileCounts {
    /// Comment density in percent.
    ///
    /// Comment and method-specific counts are added together, so a line that
    /// is both contributes twice. Zero lines give a density of zero.
    pub fn density(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        (self.comment_lines + self.method_specific_lines) as f64 / self.total_lines as f64
            * 100.0
    }

    fn record(&mut self, class: LineClass) {
        if class.is_comment() {
            self.comment_lines += 1;
        }
        self.method_specific_lines += class.method_specific();
    }
}

impl Add for FileCounts {
    type Output = FileCounts;

    fn add(self, rhs: FileCounts) -> FileCounts {
        FileCounts {
            total_lines: self.total_lines + rhs.total_lines,
            comment_lines: self.comment_lines + rhs.comment_lines,
            method_specific_lines: self.method_specific_lines + rhs.method_specific_lines,
        }
    }
}

impl AddAssign for FileCounts {
    fn add_assign(&mut self, rhs: FileCounts) {
        *self = *self + rhs;
    }
}

impl Sum for FileCounts {
    fn sum<I: Iterator<Item = FileCounts>>(iter: I) -> Self {
        iter.fold(FileCounts::default(), Add::add)
    }
}

/// Split on `\r\n`, `\n` or a bare `\r`. A final terminator does not start
/// another line.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(&['\n', '\r'][..]) {
            Some(idx) => {
                let line = &rest[..idx];
                let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Count lines of in-memory content with a fresh classifier.
///
/// A leading byte order mark is dropped before classification.
pub fn scan_content(content: &str, rule: &LanguageRule) -> FileCounts {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut classifier = LineClassifier::new(rule);
    let mut counts = FileCounts::default();

    for line in split_lines(content) {
        counts.total_lines += 1;
        counts.record(classifier.classify(line.trim()));
    }

    counts
}

/// Read a file as UTF-8 and count its lines.
pub fn scan_file(path: &Path, rule: &LanguageRule) -> Result<FileCounts, ScanError> {
    let content = fs::read_to_string(path).map_err(|source| ScanError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let counts = scan_content(&content, rule);
    log::debug!(
        "{}: {} lines, {} comment, {} method-specific ({})",
        path.display(),
        counts.total_lines,
        counts.comment_lines,
        counts.method_specific_lines,
        rule.name
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn c_rule() -> LanguageRule {
        LanguageRule {
            name: "c".into(),
            file_extensions: vec![".c".into()],
            single_line_comment: "//".into(),
            multi_line_comment_start: Some("/*".into()),
            multi_line_comment_end: Some("*/".into()),
            ..Default::default()
        }
    }

    #[test]
    fn pragma_is_skipped_but_counted_in_total() {
        let rule = LanguageRule {
            ignore_patterns: vec!["#pragma".into()],
            ..c_rule()
        };
        let counts = scan_content("// a\n#pragma once\nint x=1;\n\n", &rule);
        assert_eq!(counts.total_lines, 4);
        assert_eq!(counts.comment_lines, 1);
        assert_eq!(counts.density(), 25.0);
    }

    #[test]
    fn block_comment_density() {
        let counts = scan_content("/*\ncomment\n*/\ncode();\n", &c_rule());
        assert_eq!(counts.total_lines, 4);
        assert_eq!(counts.comment_lines, 3);
        assert_eq!(counts.density(), 75.0);
    }

    #[test]
    fn all_comments_is_full_density() {
        let counts = scan_content("// one\n  // two\n\t// three", &c_rule());
        assert_eq!(counts.comment_lines, counts.total_lines);
        assert_eq!(counts.density(), 100.0);
    }

    #[test]
    fn method_specific_is_double_counted() {
        let rule = LanguageRule {
            method_specific_comments: vec!["@param".into(), "@return".into()],
            ..c_rule()
        };
        let counts = scan_content("// @param a @return b\n", &rule);
        assert_eq!(counts.total_lines, 1);
        assert_eq!(counts.comment_lines, 1);
        assert_eq!(counts.method_specific_lines, 2);
        assert_eq!(counts.density(), 300.0);
    }

    #[test]
    fn crlf_and_indentation_are_trimmed() {
        let counts = scan_content("   // a\r\ncode();\r\n    */\r\n", &c_rule());
        assert_eq!(counts.total_lines, 3);
        assert_eq!(counts.comment_lines, 2);
    }

    #[test]
    fn byte_order_mark_does_not_hide_first_comment() {
        let counts = scan_content("\u{feff}// copyright\n// more\n", &c_rule());
        assert_eq!(counts.total_lines, 2);
        assert_eq!(counts.comment_lines, 2);
    }

    #[test]
    fn scan_file_strips_byte_order_mark() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Program.c");
        fs::write(&path, "\u{feff}// header\r\nint main() {}\r\n").unwrap();
        let counts = scan_file(&path, &c_rule()).unwrap();
        assert_eq!(counts.total_lines, 2);
        assert_eq!(counts.comment_lines, 1);
    }

    #[test]
    fn bare_carriage_return_ends_a_line() {
        let counts = scan_content("// a\rcode();\r// b\r", &c_rule());
        assert_eq!(counts.total_lines, 3);
        assert_eq!(counts.comment_lines, 2);
    }

    #[test]
    fn blank_lines_between_terminators_are_counted() {
        let counts = scan_content("a\r\n\r\n\n\rb", &c_rule());
        assert_eq!(counts.total_lines, 5);
    }

    #[test]
    fn empty_content_has_zero_density() {
        let counts = scan_content("", &c_rule());
        assert_eq!(counts, FileCounts::default());
        assert_eq!(counts.density(), 0.0);
    }

    #[test]
    fn counts_sum() {
        let a = FileCounts {
            total_lines: 4,
            comment_lines: 1,
            method_specific_lines: 0,
        };
        let b = FileCounts {
            total_lines: 6,
            comment_lines: 2,
            method_specific_lines: 3,
        };
        let total: FileCounts = vec![a, b].into_iter().sum();
        assert_eq!(total.total_lines, 10);
        assert_eq!(total.comment_lines, 3);
        assert_eq!(total.method_specific_lines, 3);
        assert_eq!(total.density(), 60.0);
    }

    #[test]
    fn scan_file_reads_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.c");
        fs::write(&path, "// header\nint main() {}\n").unwrap();
        let counts = scan_file(&path, &c_rule()).unwrap();
        assert_eq!(counts.total_lines, 2);
        assert_eq!(counts.comment_lines, 1);
    }

    #[test]
    fn scan_file_missing_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.c");
        let err = scan_file(&path, &c_rule()).unwrap_err();
        assert!(matches!(err, ScanError::FileRead { ref path, .. } if path.ends_with("gone.c")));
    }

    #[test]
    fn scan_file_invalid_utf8_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.c");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(matches!(
            scan_file(&path, &c_rule()),
            Err(ScanError::FileRead { .. })
        ));
    }
}
