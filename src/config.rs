use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::utils::is_identifier;

pub const CONFIG_FILE_NAME: &str = ".glotmodrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    /// Name of the runtime lookup function inserted in place of extracted text.
    #[serde(default = "default_lookup_function")]
    pub lookup_function: String,
    /// Module the lookup function is default-imported from.
    #[serde(default = "default_lookup_import_source")]
    pub lookup_import_source: String,
    /// Dotted call targets whose arguments are never extracted (e.g. `console`).
    #[serde(default = "default_skip_functions")]
    pub skip_functions: Vec<String>,
    /// Glob patterns classifying files as pure data modules.
    #[serde(default = "default_data_files")]
    pub data_files: Vec<String>,
    #[serde(default = "default_translations_file")]
    pub translations_file: String,
    /// Optional flat `key -> text` export written next to the translation table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_file: Option<String>,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_lookup_function() -> String {
    "t".to_string()
}

fn default_lookup_import_source() -> String {
    "@/i18n".to_string()
}

fn default_skip_functions() -> Vec<String> {
    ["console", "logger", "debug"].map(String::from).to_vec()
}

fn default_data_files() -> Vec<String> {
    ["**/data/**", "**/mock/**", "**/mocks/**", "**/*.data.ts", "**/*.data.js"]
        .map(String::from)
        .to_vec()
}

fn default_translations_file() -> String {
    "./i18n/translations.json".to_string()
}

fn default_report_file() -> String {
    "./i18n/extract-report.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: default_includes(),
            source_root: default_source_root(),
            ignore_test_files: default_ignore_test_files(),
            lookup_function: default_lookup_function(),
            lookup_import_source: default_lookup_import_source(),
            skip_functions: default_skip_functions(),
            data_files: default_data_files(),
            translations_file: default_translations_file(),
            messages_file: None,
            report_file: default_report_file(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern is invalid or the lookup function
    /// name is not a plain identifier.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are treated as literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for pattern in &self.data_files {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'dataFiles': \"{}\"", pattern)
            })?;
        }

        if !is_identifier(&self.lookup_function) {
            bail!(
                "Invalid 'lookupFunction': \"{}\" is not an identifier",
                self.lookup_function
            );
        }

        if self.lookup_import_source.trim().is_empty() {
            bail!("'lookupImportSource' must not be empty");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
