use std::path::Path;

/// Comment recognition rules for one language or file type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageRule {
    pub name: String,
    /// Lowercased extensions, leading dot included (`.rs`).
    pub file_extensions: Vec<String>,
    /// Extensions excluded from scanning regardless of which rule matched.
    pub ignore_extensions: Vec<String>,
    /// Whole-line comment prefix. Empty disables it.
    pub single_line_comment: String,
    pub multi_line_comment_start: Option<String>,
    pub multi_line_comment_end: Option<String>,
    /// Lines starting with any of these are counted in the total only.
    pub ignore_patterns: Vec<String>,
    pub density_threshold: Option<f64>,
    /// Each listed substring present on a non-skipped line adds one.
    pub method_specific_comments: Vec<String>,
}

impl LanguageRule {
    /// Lowercase both extension lists so lookups are case-insensitive.
    pub fn normalized(mut self) -> Self {
        for ext in self
            .file_extensions
            .iter_mut()
            .chain(self.ignore_extensions.iter_mut())
        {
            *ext = ext.to_lowercase();
        }
        self
    }

    pub fn matches_extension(&self, ext: &str) -> bool {
        self.file_extensions.iter().any(|e| e == ext)
    }

    pub fn ignores_extension(&self, ext: &str) -> bool {
        self.ignore_extensions.iter().any(|e| e == ext)
    }

    pub fn multi_line_start(&self) -> Option<&str> {
        self.multi_line_comment_start
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn multi_line_end(&self) -> Option<&str> {
        self.multi_line_comment_end
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

/// Ordered list of rules. Order decides which rule scans a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<LanguageRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<LanguageRule>) -> Self {
        Self {
            rules: rules.into_iter().map(LanguageRule::normalized).collect(),
        }
    }

    pub fn rules(&self) -> &[LanguageRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule in configured order listing `ext` in its file extensions.
    pub fn rule_for_extension(&self, ext: &str) -> Option<(usize, &LanguageRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches_extension(ext))
    }

    /// True when any rule lists `ext` in its ignore extensions.
    pub fn is_ignored_extension(&self, ext: &str) -> bool {
        self.rules.iter().any(|rule| rule.ignores_extension(ext))
    }

    /// Pick the scanning rule for a path, or `None` if the file is filtered out.
    pub fn select(&self, path: &Path) -> Option<(usize, &LanguageRule)> {
        let ext = file_extension(path)?;
        if self.is_ignored_extension(&ext) {
            return None;
        }
        self.rule_for_extension(&ext)
    }
}

/// Lowercased final `.`-suffix of the file name, dot included.
///
/// A dotfile like `.bashrc` yields `.bashrc`. Names without a dot, or ending
/// in one, have no extension.
pub fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let idx = name.rfind('.')?;
    if idx + 1 == name.len() {
        return None;
    }
    Some(name[idx..].to_lowercase())
}
