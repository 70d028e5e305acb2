use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;

use crate::core::table::{TranslationEntry, TranslationTable};

/// Load a persisted translation table.
///
/// A missing file yields an empty table so the first run can create it.
pub fn load_translation_table(path: &Path) -> Result<TranslationTable> {
    if !path.exists() {
        return Ok(TranslationTable::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read translation table: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(TranslationTable::new());
    }

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse translation table: {}", path.display()))?;
    if !value.is_object() {
        bail!(
            "Root of translation table must be an object: {}",
            path.display()
        );
    }

    let entries: BTreeMap<String, TranslationEntry> = serde_json::from_value(value)
        .with_context(|| format!("Invalid translation entry in {}", path.display()))?;
    Ok(TranslationTable::from_entries(entries))
}

pub fn save_translation_table(path: &Path, table: &TranslationTable) -> Result<()> {
    write_pretty_json(path, table.entries())
}

/// Write the flat `key -> text` messages export.
pub fn save_messages(path: &Path, table: &TranslationTable) -> Result<()> {
    write_pretty_json(path, &table.messages())
}

/// Serialize `value` with 2-space indentation and a trailing newline, creating parent
/// directories as needed.
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON: {}", path.display()))?;
    fs::write(path, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}
