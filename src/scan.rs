use crate::cli::config_file::{self, ConfigFormatError};
use crate::config::RuleSet;
use crate::file_scan::{self, FileCounts};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ScanError {
    ConfigRead(std::io::Error),
    ConfigParse(ConfigFormatError),
    ConfigInvalid(String),
    PathNotFound(PathBuf),
    GlobParse(globset::Error),
    Walk(ignore::Error),
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::ConfigRead(e) => write!(f, "failed to read config: {}", e),
            ScanError::ConfigParse(e) => write!(f, "failed to parse config: {}", e),
            ScanError::ConfigInvalid(msg) => write!(f, "invalid config: {}", msg),
            ScanError::PathNotFound(p) => write!(f, "directory not found: {}", p.display()),
            ScanError::GlobParse(e) => write!(f, "invalid glob pattern: {}", e),
            ScanError::Walk(e) => write!(f, "failed to walk directory: {}", e),
            ScanError::FileRead { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::ConfigRead(e) => Some(e),
            ScanError::ConfigParse(e) => Some(e),
            ScanError::GlobParse(e) => Some(e),
            ScanError::Walk(e) => Some(e),
            ScanError::FileRead { source, .. } => Some(source),
            ScanError::ConfigInvalid(_) | ScanError::PathNotFound(_) => None,
        }
    }
}

/// Which density a rule's threshold is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThresholdMode {
    /// Every rule's threshold is checked against the overall density.
    #[default]
    Overall,
    /// Each rule's threshold is checked against the density of its own files.
    PerLanguage,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Honour `.gitignore` files and skip hidden entries while walking.
    pub respect_gitignore: bool,
    pub threshold_mode: ThresholdMode,
}

/// Directory walk settings.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub respect_gitignore: bool,
    /// Matched against paths relative to the walk root.
    pub exclude: GlobSet,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: false,
            exclude: GlobSet::empty(),
        }
    }
}

/// A file chosen for scanning and the index of the rule that scans it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub rule_index: usize,
}

/// Totals for the files handled by one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleTotals {
    pub counts: FileCounts,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub totals: FileCounts,
    /// Indexed like the rule set.
    pub per_rule: Vec<RuleTotals>,
    pub files_scanned: usize,
}

impl Aggregate {
    pub fn overall_density(&self) -> f64 {
        self.totals.density()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCheck {
    pub rule: String,
    pub threshold: f64,
    /// The density that was compared against `threshold`.
    pub density: f64,
    pub exceeded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSummary {
    pub name: String,
    pub files: usize,
    pub counts: FileCounts,
}

#[derive(Debug)]
pub struct ScanResult {
    pub overall_density: f64,
    pub totals: FileCounts,
    pub languages: Vec<LanguageSummary>,
    pub checks: Vec<ThresholdCheck>,
    pub files_scanned: usize,
    pub rules_loaded: usize,
}

impl ScanResult {
    pub fn any_exceeded(&self) -> bool {
        self.checks.iter().any(|c| c.exceeded)
    }
}

/// Run a full scan: load config, walk the directory, aggregate, check thresholds.
pub fn run_scan(
    config_path: &Path,
    root: &Path,
    options: &ScanOptions,
) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }

    let config = config_file::load_config(config_path)?;
    let rules = config.rule_set();
    let walk = WalkOptions {
        respect_gitignore: options.respect_gitignore,
        exclude: build_glob_set(&config.exclude)?,
    };

    let aggregate = aggregate(root, &rules, &walk)?;
    let checks = threshold_checks(&aggregate, &rules, options.threshold_mode);

    let languages = rules
        .rules()
        .iter()
        .zip(&aggregate.per_rule)
        .map(|(rule, totals)| LanguageSummary {
            name: rule.name.clone(),
            files: totals.files,
            counts: totals.counts,
        })
        .collect();

    log::info!(
        "{} files, {} lines, {} comment, {} method-specific",
        aggregate.files_scanned,
        aggregate.totals.total_lines,
        aggregate.totals.comment_lines,
        aggregate.totals.method_specific_lines
    );

    Ok(ScanResult {
        overall_density: aggregate.overall_density(),
        totals: aggregate.totals,
        languages,
        checks,
        files_scanned: aggregate.files_scanned,
        rules_loaded: rules.len(),
    })
}

/// Scan every selected file under `root` and sum the results.
pub fn aggregate(root: &Path, rules: &RuleSet, walk: &WalkOptions) -> Result<Aggregate, ScanError> {
    ensure_rules(rules)?;
    let files = collect_files(root, rules, walk)?;
    aggregate_files(&files, rules)
}

/// Scan `files` in parallel, then fold the per-file counts on this thread.
///
/// The first unreadable file fails the whole aggregation.
pub fn aggregate_files(files: &[SelectedFile], rules: &RuleSet) -> Result<Aggregate, ScanError> {
    ensure_rules(rules)?;
    let scanned: Vec<(usize, FileCounts)> = files
        .par_iter()
        .map(|file| {
            let rule = rules.rules().get(file.rule_index).ok_or_else(|| {
                ScanError::ConfigInvalid(format!(
                    "no rule at index {} for {}",
                    file.rule_index,
                    file.path.display()
                ))
            })?;
            file_scan::scan_file(&file.path, rule).map(|counts| (file.rule_index, counts))
        })
        .collect::<Result<_, _>>()?;

    let mut per_rule = vec![RuleTotals::default(); rules.len()];
    let mut totals = FileCounts::default();
    for (rule_index, counts) in &scanned {
        let entry = &mut per_rule[*rule_index];
        entry.counts += *counts;
        entry.files += 1;
        totals += *counts;
    }

    Ok(Aggregate {
        totals,
        per_rule,
        files_scanned: scanned.len(),
    })
}

fn ensure_rules(rules: &RuleSet) -> Result<(), ScanError> {
    if rules.is_empty() {
        return Err(ScanError::ConfigInvalid("no languages configured".to_string()));
    }
    Ok(())
}

/// Walk `root` recursively and keep files a rule selects, sorted by path.
pub fn collect_files(
    root: &Path,
    rules: &RuleSet,
    walk: &WalkOptions,
) -> Result<Vec<SelectedFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }

    let mut builder = WalkBuilder::new(root);
    if walk.respect_gitignore {
        // Standard filters, but without requiring a git repository.
        builder.require_git(false);
    } else {
        builder.standard_filters(false);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(ScanError::Walk)?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.into_path();

        let rel = path.strip_prefix(root).unwrap_or(&path);
        if walk.exclude.is_match(rel) {
            log::trace!("excluded {}", path.display());
            continue;
        }

        match rules.select(&path) {
            Some((rule_index, _)) => files.push(SelectedFile { path, rule_index }),
            None => log::trace!("no rule for {}", path.display()),
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    log::debug!("{} file(s) selected under {}", files.len(), root.display());
    Ok(files)
}

/// Compare densities against each configured threshold.
///
/// Rules without a threshold produce no check. A density equal to the
/// threshold does not exceed it.
pub fn threshold_checks(
    aggregate: &Aggregate,
    rules: &RuleSet,
    mode: ThresholdMode,
) -> Vec<ThresholdCheck> {
    let overall = aggregate.overall_density();

    rules
        .rules()
        .iter()
        .enumerate()
        .filter_map(|(idx, rule)| {
            let threshold = rule.density_threshold?;
            let density = match mode {
                ThresholdMode::Overall => overall,
                ThresholdMode::PerLanguage => aggregate
                    .per_rule
                    .get(idx)
                    .map(|t| t.counts.density())
                    .unwrap_or(0.0),
            };
            Some(ThresholdCheck {
                rule: rule.name.clone(),
                threshold,
                density,
                exceeded: density > threshold,
            })
        })
        .collect()
}

pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(ScanError::GlobParse)?);
    }
    builder.build().map_err(ScanError::GlobParse)
}
