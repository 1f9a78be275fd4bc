use crate::config::LanguageRule;

/// Outcome of classifying one trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Matched an ignore pattern; counts toward the total only.
    Skipped,
    Comment { method_specific: usize },
    Code { method_specific: usize },
}

impl LineClass {
    pub fn is_comment(&self) -> bool {
        matches!(self, LineClass::Comment { .. })
    }

    pub fn method_specific(&self) -> usize {
        match self {
            LineClass::Skipped => 0,
            LineClass::Comment { method_specific } | LineClass::Code { method_specific } => {
                *method_specific
            }
        }
    }
}

/// Line-by-line comment classifier for a single file.
///
/// The only state is whether a block comment is open. Build a new classifier
/// per file so that state never carries over.
#[derive(Debug)]
pub struct LineClassifier<'a> {
    rule: &'a LanguageRule,
    in_multi_line_comment: bool,
}

impl<'a> LineClassifier<'a> {
    pub fn new(rule: &'a LanguageRule) -> Self {
        Self {
            rule,
            in_multi_line_comment: false,
        }
    }

    pub fn in_multi_line_comment(&self) -> bool {
        self.in_multi_line_comment
    }

    /// Classify an already trimmed line and advance the block comment state.
    ///
    /// Prefix checks run in a fixed order and the first hit wins: single-line
    /// prefix, block start, block end (suffix), then the open-block state. A
    /// line that both opens and closes a block still leaves the block open.
    pub fn classify(&mut self, line: &str) -> LineClass {
        let rule = self.rule;

        if rule.ignore_patterns.iter().any(|p| line.starts_with(p.as_str())) {
            return LineClass::Skipped;
        }

        let is_comment = if !rule.single_line_comment.is_empty()
            && line.starts_with(rule.single_line_comment.as_str())
        {
            true
        } else if rule.multi_line_start().is_some_and(|s| line.starts_with(s)) {
            self.in_multi_line_comment = true;
            true
        } else if rule.multi_line_end().is_some_and(|e| line.ends_with(e)) {
            self.in_multi_line_comment = false;
            true
        } else {
            self.in_multi_line_comment
        };

        let method_specific = rule
            .method_specific_comments
            .iter()
            .filter(|marker| line.contains(marker.as_str()))
            .count();

        if is_comment {
            LineClass::Comment { method_specific }
        } else {
            LineClass::Code { method_specific }
        }
    }
}
