//! glotmod - CJK text extraction codemod for JS/TS/JSX
//!
//! glotmod finds natural-language text embedded in JavaScript and TypeScript sources,
//! gives each distinct text a stable key, rewrites the source to look the key up at
//! runtime and records every extracted text in a translation table.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine, translation table and run driver
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

#[cfg(test)]
mod test_utils;
