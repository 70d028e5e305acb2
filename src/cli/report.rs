//! Report formatting and printing utilities.
//!
//! Diagnostics are printed cargo-style; the summary follows the same marks and colors
//! for every command.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary};
use crate::{
    config::CONFIG_FILE_NAME,
    core::stats::{DeferredBinding, Sample},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Sample texts longer than this (in terminal columns) are truncated.
const MAX_TEXT_WIDTH: usize = 40;

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Extract(summary) => {
            print_extract_to(summary, verbose, &mut io::stdout().lock())
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

pub fn print_extract_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    let report = &summary.report;

    let mut missing: Vec<&Sample> = report.missing_samples().collect();
    missing.sort_by(|a, b| a.location.cmp(&b.location));
    for sample in &missing {
        print_sample(sample, "warning".bold().yellow(), writer);
    }

    if verbose {
        let mut unrecognized: Vec<&Sample> = report
            .files
            .iter()
            .flat_map(|f| f.stats.unrecognized_samples.iter())
            .collect();
        unrecognized.sort_by(|a, b| a.location.cmp(&b.location));
        for sample in unrecognized {
            print_sample(sample, "note".bold().cyan(), writer);
        }
    }

    for binding in &report.deferred_bindings {
        print_deferred(binding, writer);
    }

    for collision in &report.collisions {
        let _ = writeln!(
            writer,
            "{}: key \"{}\" already holds \"{}\"; \"{}\" stored as \"{}\"",
            "warning".bold().yellow(),
            collision.key,
            collision.existing_text,
            collision.text,
            collision.assigned_key
        );
        let _ = writeln!(writer, "  {} {}", "-->".blue(), collision.file);
    }

    for error in &report.errors {
        let _ = writeln!(writer, "{}: {}", "error".bold().red(), error.error);
        let _ = writeln!(writer, "  {} {}", "-->".blue(), error.file);
    }

    print_extract_summary(summary, writer);
}

fn print_sample<W: Write>(sample: &Sample, severity: colored::ColoredString, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity,
        truncate_to_width(&sample.text, MAX_TEXT_WIDTH),
        sample.reason.to_string().dimmed().cyan()
    );
    let _ = writeln!(writer, "  {} {}", "-->".blue(), sample.location);
}

fn print_deferred<W: Write>(binding: &DeferredBinding, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}: `{}` looks up \"{}\" when the module loads",
        "warning".bold().yellow(),
        binding.name,
        binding.key
    );
    let _ = writeln!(writer, "  {} {}", "-->".blue(), binding.location);
    let _ = writeln!(
        writer,
        "  {} {} move the lookup into a function if the locale can change at runtime",
        "=".blue(),
        "note:".bold()
    );
}

fn print_extract_summary<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let totals = &summary.report.totals;

    if totals.extracted == 0 && summary.report.errors.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} - nothing to extract",
                totals.files_scanned,
                plural(totals.files_scanned, "file", "files")
            )
            .green()
        );
    } else if totals.extracted > 0 {
        let verb = if summary.is_apply {
            "Extracted".green().bold()
        } else {
            "Would extract".yellow().bold()
        };
        let _ = writeln!(
            writer,
            "{} {} text(s) in {} file(s):",
            verb, totals.extracted, totals.files_changed
        );
        let _ = writeln!(writer, "  - new keys: {}", totals.new_keys);
        let _ = writeln!(writer, "  - reused keys: {}", totals.reused_keys);
        if totals.interpolation_count > 0 {
            let _ = writeln!(writer, "  - interpolated: {}", totals.interpolation_count);
        }
        if totals.lazy_accessors > 0 {
            let _ = writeln!(writer, "  - lazy accessors: {}", totals.lazy_accessors);
        }
        if totals.deferred_bindings > 0 {
            let _ = writeln!(writer, "  - deferred bindings: {}", totals.deferred_bindings);
        }
        if summary.is_apply {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Wrote {}", summary.translations_file).green()
            );
        } else {
            let _ = writeln!(writer, "Run with {} to rewrite these files.", "--apply".cyan());
        }
    }

    let problems = totals.missing + summary.report.errors.len();
    if problems > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} problems ({} missing, {} failed {})",
            FAILURE_MARK.red(),
            problems,
            totals.missing,
            summary.report.errors.len(),
            plural(summary.report.errors.len(), "file", "files")
        );
    }
    if totals.unrecognized > 0 {
        let _ = writeln!(
            writer,
            "{} {} text(s) left in place on purpose (use {} for details)",
            "note:".bold(),
            totals.unrecognized,
            "-v".cyan()
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(error) = &summary.error {
        eprintln!("Error: {}", error);
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `...`.
fn truncate_to_width(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max.saturating_sub(3) {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        RunReport,
        stats::{FileStats, Location, NodeKind, SkipReason},
    };
    use pretty_assertions::assert_eq;

    fn render(summary: &ExtractSummary, verbose: bool) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_extract_to(summary, verbose, &mut out);
        String::from_utf8(out).unwrap()
    }

    fn sample(text: &str, reason: SkipReason, line: usize) -> Sample {
        Sample {
            text: text.to_string(),
            node_kind: NodeKind::StringLiteral,
            reason,
            location: Location::new("src/App.tsx", line, 7),
        }
    }

    #[test]
    fn test_truncate_counts_columns() {
        assert_eq!(truncate_to_width("保存", 40), "保存");
        assert_eq!(truncate_to_width("一二三四五六", 8), "一二...");
        assert_eq!(truncate_to_width("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_nothing_to_extract() {
        let mut report = RunReport::default();
        report.add_file("src/App.tsx", false, FileStats::default());
        let summary = ExtractSummary {
            report,
            is_apply: false,
            translations_file: "./i18n/translations.json".to_string(),
        };
        assert_eq!(
            render(&summary, false),
            "\u{2713} Checked 1 source file - nothing to extract\n"
        );
    }

    #[test]
    fn test_dry_run_summary_with_missing_sample() {
        let mut report = RunReport::default();
        report.add_file(
            "src/App.tsx",
            true,
            FileStats {
                extracted: 2,
                reused_keys: 1,
                missing_samples: vec![sample("确认", SkipReason::Unextracted, 3)],
                unrecognized_samples: vec![sample(
                    "调试",
                    SkipReason::SkipFunctionCall("console.log".to_string()),
                    5,
                )],
                ..Default::default()
            },
        );
        report.totals.new_keys = 1;
        let summary = ExtractSummary {
            report,
            is_apply: false,
            translations_file: "./i18n/translations.json".to_string(),
        };

        let out = render(&summary, true);
        assert!(out.starts_with("warning: \"确认\"  unextracted\n  --> src/App.tsx:3:7\n"));
        assert!(out.contains("note: \"调试\"  skipFunctionCall:console.log\n"));
        assert!(out.contains("Would extract 2 text(s) in 1 file(s):\n"));
        assert!(out.contains("  - new keys: 1\n  - reused keys: 1\n"));
        assert!(out.contains("Run with --apply to rewrite these files.\n"));
        assert!(out.contains("\u{2718} 1 problems (1 missing, 0 failed files)\n"));
        assert!(out.contains("note: 1 text(s) left in place on purpose (use -v for details)\n"));
    }
}
