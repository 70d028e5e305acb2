use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::{
    classify::FileInfo,
    extract::{
        EngineOptions,
        edits::splice,
        imports::import_edits,
        markup::MarkupPlan,
        residual::residual_scan,
        sites::{Applier, Collector, SiteIntegrity},
        walker::Walker,
    },
    keygen::KeyGenerator,
    parsers::jsx::parse_jsx_source,
    resolve::resolve_sites,
    stats::{DeferredBinding, FileStats, Location},
    table::{KeyCollision, TranslationTable},
};

/// What processing one file produced.
#[derive(Debug, Default)]
pub struct FileOutcome {
    /// New source text, present only when it differs from the input.
    pub rewritten: Option<String>,
    pub stats: FileStats,
    pub deferred: Vec<DeferredBinding>,
    /// Module-level getters returning a fresh array on each access.
    pub container_accessors: Vec<Location>,
    pub collisions: Vec<KeyCollision>,
    /// Keys this file added to the table.
    pub new_keys: usize,
    /// The added keys themselves, for rolling back a file that cannot be written.
    pub inserted: Vec<String>,
    pub integrity: SiteIntegrity,
}

/// Extract and rewrite one file against `table`.
///
/// On error the table holds no entries from this file and the source must be left
/// as is.
pub async fn process_file<G: KeyGenerator>(
    source: String,
    file: &FileInfo,
    table: &mut TranslationTable,
    keygen: &mut G,
    options: &EngineOptions,
) -> Result<FileOutcome> {
    let parsed = parse_jsx_source(source, &file.path, file.jsx)?;
    let markup = MarkupPlan::build(&parsed, file.is_pure_data);

    // Pass 1
    let collected = Walker::new(&parsed, file, options, &markup, Collector::default()).walk();
    let sites = collected.handler.into_sites();
    debug!("{}: {} candidate sites", file.path, sites.len());

    let resolution = resolve_sites(&sites, table, keygen, file)
        .await
        .with_context(|| format!("Failed to assign keys for {}", file.path))?;

    // Pass 2
    let applied = Walker::new(&parsed, file, options, &markup, Applier::new(resolution.keys)).walk();
    let integrity = applied.handler.finish();
    let report = applied.report;
    let mut edits = applied.edits;

    if report.applied > 0 {
        edits.extend(import_edits(&parsed, options));
    }
    let output = splice(&parsed.code, 0, parsed.code.len(), edits);

    let reparsed = match parse_jsx_source(output.clone(), &file.path, file.jsx) {
        Ok(reparsed) => reparsed,
        Err(err) => {
            table.rollback(&resolution.inserted);
            return Err(err.context(format!("Rewritten {} no longer parses", file.path)));
        }
    };
    let missing = residual_scan(&reparsed, file, options);

    for location in &report.depth_aborts {
        warn!("extraction depth limit reached at {}; subtree left untouched", location);
    }
    if !integrity.is_clean() {
        warn!(
            "{}: {} unmatched, {} double-consumed, {} unconsumed sites",
            file.path, integrity.unmatched, integrity.double_consumed, integrity.unconsumed
        );
    }
    for location in &report.container_accessors {
        warn!(
            "getter at {} builds a new array on every access; identity and mutations are not kept",
            location
        );
    }
    for binding in &report.deferred {
        warn!(
            "top-level binding `{}` at {} evaluates \"{}\" at load time",
            binding.name, binding.location, binding.key
        );
    }

    let stats = FileStats {
        extracted: report.applied,
        reused_keys: resolution.reused,
        deferred_bindings: report.deferred.len(),
        interpolation_count: report.interpolated,
        lazy_accessors: report.lazy_accessors,
        unrecognized_samples: report.unrecognized,
        missing_samples: missing,
    };

    let rewritten = (output != parsed.code).then_some(output);
    Ok(FileOutcome {
        rewritten,
        stats,
        deferred: report.deferred,
        container_accessors: report.container_accessors,
        collisions: resolution.collisions,
        new_keys: resolution.inserted.len(),
        inserted: resolution.inserted,
        integrity,
    })
}
