//! Run-wide translation table.
//!
//! The table is owned by the run and lent `&mut` to every file in sequence. Each key
//! holds exactly one entry; a generator that hands out an occupied key for a different
//! text gets the text stored under a suffixed key instead, and the clash is returned
//! as a [`KeyCollision`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// One extracted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    /// Message text with `{name}` placeholders.
    pub text: String,
    /// File the text was first extracted from.
    pub source_file: String,
    /// Interpolation variable names in order of first appearance.
    #[serde(default)]
    pub interpolations: Vec<String>,
}

/// Dedup signature: the text plus its sorted interpolation variable names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub text: String,
    pub vars: Vec<String>,
}

impl Signature {
    pub fn new(text: &str, vars: &[String]) -> Self {
        let mut vars = vars.to_vec();
        vars.sort();
        Self {
            text: text.to_string(),
            vars,
        }
    }
}

/// A generated key that was already taken by a different text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCollision {
    /// The key returned by the generator.
    pub key: String,
    /// Text already stored under `key`.
    pub existing_text: String,
    /// Text that was assigned the same key.
    pub text: String,
    /// Key the new text was stored under.
    pub assigned_key: String,
    pub file: String,
}

#[derive(Debug, Default)]
pub struct TranslationTable {
    entries: BTreeMap<String, TranslationEntry>,
    index: HashMap<Signature, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from persisted entries. The first key seen for a signature wins
    /// the reuse index.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, TranslationEntry)>) -> Self {
        let mut table = Self::new();
        for (key, entry) in entries {
            let signature = Signature::new(&entry.text, &entry.interpolations);
            table.index.entry(signature).or_insert_with(|| key.clone());
            table.entries.insert(key, entry);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &BTreeMap<String, TranslationEntry> {
        &self.entries
    }

    /// Key of an existing entry with the same dedup signature.
    pub fn find(&self, signature: &Signature) -> Option<&str> {
        self.index.get(signature).map(String::as_str)
    }

    /// Insert a freshly generated entry under `key`.
    ///
    /// Returns the key the entry ended up under and, when `key` already held a
    /// different message, the collision that forced a suffixed key. An occupied key
    /// with the same signature is shared rather than duplicated.
    pub fn insert(
        &mut self,
        key: String,
        entry: TranslationEntry,
    ) -> (String, Option<KeyCollision>) {
        let signature = Signature::new(&entry.text, &entry.interpolations);

        let Some(existing) = self.entries.get(&key) else {
            self.index.entry(signature).or_insert_with(|| key.clone());
            self.entries.insert(key.clone(), entry);
            return (key, None);
        };

        if Signature::new(&existing.text, &existing.interpolations) == signature {
            self.index.entry(signature).or_insert_with(|| key.clone());
            return (key, None);
        }

        let existing_text = existing.text.clone();
        let assigned_key = self.free_key(&key);
        let collision = KeyCollision {
            key,
            existing_text,
            text: entry.text.clone(),
            assigned_key: assigned_key.clone(),
            file: entry.source_file.clone(),
        };
        self.index
            .entry(signature)
            .or_insert_with(|| assigned_key.clone());
        self.entries.insert(assigned_key.clone(), entry);
        (assigned_key, Some(collision))
    }

    /// Remove entries inserted for a file whose rewrite was abandoned.
    pub fn rollback(&mut self, keys: &[String]) {
        for key in keys {
            self.entries.remove(key);
        }
        self.index.retain(|_, key| !keys.contains(key));
    }

    /// Flat `key -> text` view for runtime message files.
    pub fn messages(&self) -> BTreeMap<&str, &str> {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_str(), e.text.as_str()))
            .collect()
    }

    fn free_key(&self, key: &str) -> String {
        (2..)
            .map(|n| format!("{}_{}", key, n))
            .find(|candidate| !self.entries.contains_key(candidate))
            .unwrap_or_else(|| key.to_string())
    }
}
