//! File parsers for source code and the translation table.
//!
//! - `json`: translation table and messages export persistence
//! - `jsx`: JS/TS/JSX/TSX source parser (uses swc for AST generation)

pub mod json;
pub mod jsx;
