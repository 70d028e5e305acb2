//! Core extraction engine.
//!
//! - `file_scanner` / `classify`: which files to process and how to treat them
//! - `extract`: the per-file extraction-and-rewrite pipeline
//! - `table` / `resolve` / `keygen`: translation keys and their dedup
//! - `context`: the run driver tying config, files and the table together

pub mod classify;
pub mod context;
pub mod extract;
pub mod file_scanner;
pub mod keygen;
pub mod parsers;
pub mod resolve;
pub mod stats;
pub mod table;

pub use context::{ExtractContext, RunOutcome};
pub use keygen::{HashKeyGenerator, KeyContext, KeyGenerator, KeyRequest};
pub use stats::{FileStats, RunReport};
pub use table::{TranslationEntry, TranslationTable};
