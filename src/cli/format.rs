use crate::scan::ScanResult;
use serde_json::json;

/// Print the density score, exceeded thresholds and a per-language table.
pub fn print_pretty(result: &ScanResult) {
    println!(
        "\x1b[1mOverall Comments Density Score: {:.2}%\x1b[0m",
        result.overall_density
    );

    for check in result.checks.iter().filter(|c| c.exceeded) {
        println!(
            "\x1b[33mwarn \x1b[0m Comments density for {} exceeds configured threshold of {}%.",
            check.rule, check.threshold
        );
    }

    if result.files_scanned > 0 {
        println!();
        println!(
            "  \x1b[90m{:<20} {:>6} {:>8} {:>8} {:>8} {:>9}\x1b[0m",
            "language", "files", "lines", "comment", "method", "density"
        );
        for lang in result.languages.iter().filter(|l| l.files > 0) {
            println!(
                "  {:<20} {:>6} {:>8} {:>8} {:>8} {:>8.2}%",
                lang.name,
                lang.files,
                lang.counts.total_lines,
                lang.counts.comment_lines,
                lang.counts.method_specific_lines,
                lang.counts.density()
            );
        }
    }

    println!();
    let status = if result.any_exceeded() {
        "\x1b[31m✗\x1b[0m"
    } else {
        "\x1b[32m✓\x1b[0m"
    };
    println!(
        "{} {} files scanned, {} rules loaded",
        status, result.files_scanned, result.rules_loaded
    );
}

/// Build the structured report printed by `print_json`.
pub fn json_report(result: &ScanResult) -> serde_json::Value {
    let languages: Vec<_> = result
        .languages
        .iter()
        .map(|l| {
            json!({
                "name": l.name,
                "files": l.files,
                "total_lines": l.counts.total_lines,
                "comment_lines": l.counts.comment_lines,
                "method_specific_lines": l.counts.method_specific_lines,
                "density": l.counts.density(),
            })
        })
        .collect();

    let thresholds: Vec<_> = result
        .checks
        .iter()
        .map(|c| {
            json!({
                "rule": c.rule,
                "threshold": c.threshold,
                "density": c.density,
                "exceeded": c.exceeded,
            })
        })
        .collect();

    json!({
        "overall_density": result.overall_density,
        "totals": {
            "total_lines": result.totals.total_lines,
            "comment_lines": result.totals.comment_lines,
            "method_specific_lines": result.totals.method_specific_lines,
        },
        "languages": languages,
        "thresholds": thresholds,
        "summary": {
            "files_scanned": result.files_scanned,
            "rules_loaded": result.rules_loaded,
            "exceeded": result.checks.iter().filter(|c| c.exceeded).count(),
        },
    })
}

/// Print the report as pretty JSON.
pub fn print_json(result: &ScanResult) {
    println!("{:#}", json_report(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_scan::FileCounts;
    use crate::scan::{LanguageSummary, ThresholdCheck};

    fn sample() -> ScanResult {
        let counts = FileCounts {
            total_lines: 8,
            comment_lines: 2,
            method_specific_lines: 1,
        };
        ScanResult {
            overall_density: counts.density(),
            totals: counts,
            languages: vec![LanguageSummary {
                name: "C".into(),
                files: 2,
                counts,
            }],
            checks: vec![ThresholdCheck {
                rule: "C".into(),
                threshold: 30.0,
                density: counts.density(),
                exceeded: true,
            }],
            files_scanned: 2,
            rules_loaded: 1,
        }
    }

    #[test]
    fn json_report_shape() {
        let report = json_report(&sample());
        assert_eq!(report["overall_density"], 37.5);
        assert_eq!(report["totals"]["total_lines"], 8);
        assert_eq!(report["languages"][0]["name"], "C");
        assert_eq!(report["thresholds"][0]["exceeded"], true);
        assert_eq!(report["summary"]["exceeded"], 1);
        assert_eq!(report["summary"]["rules_loaded"], 1);
    }
}
