//! Per-file counters, diagnostic samples and the run-level report.

use serde::Serialize;

use crate::core::table::KeyCollision;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Syntactic shape a diagnostic sample was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    StringLiteral,
    TemplateLiteral,
    #[serde(rename = "JSXText")]
    JsxText,
    #[serde(rename = "JSXAttribute")]
    JsxAttribute,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::StringLiteral => write!(f, "StringLiteral"),
            NodeKind::TemplateLiteral => write!(f, "TemplateLiteral"),
            NodeKind::JsxText => write!(f, "JSXText"),
            NodeKind::JsxAttribute => write!(f, "JSXAttribute"),
        }
    }
}

/// Why a piece of target text was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Argument of a skip-listed call; carries the resolved dotted callee.
    SkipFunctionCall(String),
    /// Markup text inside a pure data module.
    DataFileSkip,
    /// Direct operand of an equality, `in` or `switch` case test.
    Comparison,
    /// Computed member key.
    MemberKey,
    /// TypeScript enum initializer.
    EnumMember,
    /// Module specifier of `import(...)` or `require(...)`.
    ModuleSpecifier,
    /// Inside a scope where a local binding hides the lookup function.
    ShadowedLookup,
    /// Found by the residual scan after rewriting.
    Unextracted,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::SkipFunctionCall(name) => write!(f, "skipFunctionCall:{}", name),
            SkipReason::DataFileSkip => write!(f, "data-file-skip"),
            SkipReason::Comparison => write!(f, "comparison"),
            SkipReason::MemberKey => write!(f, "memberKey"),
            SkipReason::EnumMember => write!(f, "enumMember"),
            SkipReason::ModuleSpecifier => write!(f, "moduleSpecifier"),
            SkipReason::ShadowedLookup => write!(f, "shadowedLookup"),
            SkipReason::Unextracted => write!(f, "unextracted"),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub text: String,
    pub node_kind: NodeKind,
    pub reason: SkipReason,
    pub location: Location,
}

/// A module-level binding that now calls the lookup function at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredBinding {
    pub name: String,
    pub key: String,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    /// Sites replaced by a lookup call.
    pub extracted: usize,
    /// Sites resolved to a key that already existed.
    pub reused_keys: usize,
    pub deferred_bindings: usize,
    /// Extracted sites carrying at least one interpolation.
    pub interpolation_count: usize,
    pub lazy_accessors: usize,
    pub unrecognized_samples: Vec<Sample>,
    pub missing_samples: Vec<Sample>,
}

/// A file the run could not process. The file is left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub changed: bool,
    #[serde(flatten)]
    pub stats: FileStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTotals {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub extracted: usize,
    pub reused_keys: usize,
    pub new_keys: usize,
    pub deferred_bindings: usize,
    pub interpolation_count: usize,
    pub lazy_accessors: usize,
    pub unrecognized: usize,
    pub missing: usize,
}

/// Everything a run produced, in file order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub totals: RunTotals,
    pub files: Vec<FileReport>,
    pub deferred_bindings: Vec<DeferredBinding>,
    pub collisions: Vec<KeyCollision>,
    pub errors: Vec<FileError>,
}

impl RunReport {
    pub fn add_file(&mut self, file: &str, changed: bool, stats: FileStats) {
        let totals = &mut self.totals;
        totals.files_scanned += 1;
        if changed {
            totals.files_changed += 1;
        }
        totals.extracted += stats.extracted;
        totals.reused_keys += stats.reused_keys;
        totals.deferred_bindings += stats.deferred_bindings;
        totals.interpolation_count += stats.interpolation_count;
        totals.lazy_accessors += stats.lazy_accessors;
        totals.unrecognized += stats.unrecognized_samples.len();
        totals.missing += stats.missing_samples.len();

        // Files without anything to say stay out of the per-file list.
        if changed || stats != FileStats::default() {
            self.files.push(FileReport {
                file: file.to_string(),
                changed,
                stats,
            });
        }
    }

    pub fn add_error(&mut self, file: &str, error: &anyhow::Error) {
        self.totals.files_scanned += 1;
        self.errors.push(FileError {
            file: file.to_string(),
            error: format!("{:#}", error),
        });
    }

    pub fn missing_samples(&self) -> impl Iterator<Item = &Sample> {
        self.files.iter().flat_map(|f| f.stats.missing_samples.iter())
    }
}
