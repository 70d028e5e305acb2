//! Path-based file classification.
//!
//! The extractor only needs two facts about a file: its [`FileKind`] (passed to the
//! key generator as context) and whether it is a pure data module, which suppresses
//! markup-text extraction.

use std::path::Path;

use glob::Pattern;
use serde::Serialize;

/// Coarse role of a source file inside the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    Component,
    Data,
    Router,
    Constants,
    Utils,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Component => write!(f, "component"),
            FileKind::Data => write!(f, "data"),
            FileKind::Router => write!(f, "router"),
            FileKind::Constants => write!(f, "constants"),
            FileKind::Utils => write!(f, "utils"),
        }
    }
}

/// Everything the engine is told about the file it processes.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Path used in reports and translation entries.
    pub path: String,
    pub kind: FileKind,
    /// Pure data modules keep their markup text (see `SkipReason::DataFileSkip`).
    pub is_pure_data: bool,
    /// Parse with JSX enabled.
    pub jsx: bool,
}

impl FileInfo {
    pub fn new(path: impl Into<String>, kind: FileKind) -> Self {
        let path = path.into();
        let jsx = !path.ends_with(".ts");
        Self {
            is_pure_data: kind == FileKind::Data,
            path,
            kind,
            jsx,
        }
    }
}

/// Classifies files by path segments and the configured data-file globs.
pub struct FileClassifier {
    data_patterns: Vec<Pattern>,
}

impl FileClassifier {
    pub fn new(data_files: &[String]) -> Self {
        Self {
            data_patterns: data_files
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    pub fn classify(&self, path: &str) -> FileInfo {
        FileInfo::new(path, self.kind_of(path))
    }

    fn kind_of(&self, path: &str) -> FileKind {
        if self.data_patterns.iter().any(|p| p.matches(path)) {
            return FileKind::Data;
        }

        let segments: Vec<String> = Path::new(path)
            .iter()
            .filter_map(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .collect();
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let has_segment = |names: &[&str]| {
            segments
                .iter()
                .any(|s| names.contains(&s.as_str()))
                || names.contains(&stem.as_str())
        };

        if has_segment(&["router", "routes", "routers"]) {
            FileKind::Router
        } else if has_segment(&["constants", "constant", "const", "enums"]) {
            FileKind::Constants
        } else if has_segment(&["utils", "util", "helpers", "helper", "lib"]) {
            FileKind::Utils
        } else {
            FileKind::Component
        }
    }
}
