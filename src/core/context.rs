use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use tracing::{debug, warn};

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        classify::FileClassifier,
        extract::{EngineOptions, process_file},
        file_scanner::scan_files,
        keygen::KeyGenerator,
        parsers::json::{
            load_translation_table, save_messages, save_translation_table, write_pretty_json,
        },
        stats::RunReport,
        table::TranslationTable,
    },
};

/// Result of one extraction run.
pub struct RunOutcome {
    pub report: RunReport,
    /// Whether rewrites, the table and the report were written to disk.
    pub applied: bool,
}

/// Run driver for `extract`.
///
/// Owns the merged configuration, the sorted file list and the translation table that
/// every file is processed against.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g., `--translations-file`)
/// 2. `.glotmodrc.json` config file
/// 3. Built-in defaults
pub struct ExtractContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (for resolving relative paths).
    pub root_dir: PathBuf,

    /// Source files to process, in sorted path order.
    pub files: Vec<String>,

    /// Translation table loaded from `translationsFile`.
    pub table: TranslationTable,

    pub verbose: bool,
}

impl ExtractContext {
    /// Load config, then scan source files and load the translation table in parallel.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = root_dir
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(Path::new(path))?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No .glotmodrc.json found, using default configuration");
        }

        let mut config = config_result.config;
        if let Some(ref translations_file) = common_args.translations_file {
            config.translations_file = translations_file.to_string_lossy().to_string();
        }

        let scan_dir = resolve_path(&root_dir, &config.source_root);
        let scan_dir = scan_dir.to_string_lossy();
        let table_path = resolve_path(&root_dir, &config.translations_file);

        let (scan_result, table) = rayon::join(
            || {
                scan_files(
                    &scan_dir,
                    &config.includes,
                    &config.ignores,
                    config.ignore_test_files,
                )
            },
            || load_translation_table(&table_path),
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        let mut files: Vec<String> = scan_result.files.into_iter().collect();
        files.sort();

        Ok(Self {
            table: table?,
            config,
            root_dir,
            files,
            verbose,
        })
    }

    /// Resolve a config path against the project root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve_path(&self.root_dir, path)
    }

    /// Path of a scanned file as shown in reports and stored in the table.
    pub fn display_path(&self, path: &str) -> String {
        let path = Path::new(path);
        let relative = path.strip_prefix(&self.root_dir).unwrap_or(path);
        let relative = relative.strip_prefix(".").unwrap_or(relative);
        relative.to_string_lossy().replace('\\', "/")
    }

    /// Process every file in order against the table.
    ///
    /// Without `apply` nothing is written: the table is only mutated in memory so later
    /// files still see keys assigned to earlier ones.
    pub async fn run<G: KeyGenerator>(&mut self, keygen: &mut G, apply: bool) -> Result<RunOutcome> {
        let options = EngineOptions::from_config(&self.config);
        let classifier = FileClassifier::new(&self.config.data_files);
        let mut report = RunReport::default();

        for path in &self.files {
            let shown = self.display_path(path);
            let file = classifier.classify(&shown);
            debug!("processing {} ({})", shown, file.kind);

            let source = match fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", shown))
            {
                Ok(source) => source,
                Err(err) => {
                    warn!("{:#}", err);
                    report.add_error(&shown, &err);
                    continue;
                }
            };

            let outcome = match process_file(source, &file, &mut self.table, keygen, &options).await
            {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!("{:#}", err);
                    report.add_error(&shown, &err);
                    continue;
                }
            };

            if apply
                && let Some(rewritten) = &outcome.rewritten
                && let Err(err) = write_rewrite(&mut self.table, path, rewritten, &outcome.inserted)
                    .with_context(|| format!("Failed to write {}", shown))
            {
                warn!("{:#}", err);
                report.add_error(&shown, &err);
                continue;
            }

            report.totals.new_keys += outcome.new_keys;
            report.deferred_bindings.extend(outcome.deferred);
            report.collisions.extend(outcome.collisions);
            report.add_file(&shown, outcome.rewritten.is_some(), outcome.stats);
        }

        if apply {
            self.write_outputs(&report)?;
        }

        Ok(RunOutcome {
            report,
            applied: apply,
        })
    }

    fn write_outputs(&self, report: &RunReport) -> Result<()> {
        save_translation_table(&self.resolve(&self.config.translations_file), &self.table)?;
        if let Some(messages_file) = &self.config.messages_file {
            save_messages(&self.resolve(messages_file), &self.table)?;
        }
        write_pretty_json(&self.resolve(&self.config.report_file), report)
    }
}

/// Write a rewritten file. The keys it added leave the table again if the write fails.
fn write_rewrite(
    table: &mut TranslationTable,
    path: impl AsRef<Path>,
    rewritten: &str,
    inserted: &[String],
) -> Result<()> {
    fs::write(path, rewritten).inspect_err(|_| table.rollback(inserted))?;
    Ok(())
}

fn resolve_path(root_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}
