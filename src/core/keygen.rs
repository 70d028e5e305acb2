//! Key generation seam.
//!
//! The engine never decides what a key looks like. It batches every unknown text of a
//! file into one [`KeyGenerator::assign_keys`] call; implementations may be local
//! (the built-in [`HashKeyGenerator`]) or remote.

use std::{future::Future, path::Path};

use anyhow::{Result, bail};

use crate::{core::classify::FileKind, utils::to_lower_camel};

/// Context handed to the generator alongside each text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyContext {
    pub file_path: String,
    pub file_kind: FileKind,
    /// Name of the enclosing component, when one is known.
    pub component_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRequest {
    /// Message text with `{name}` placeholders.
    pub text: String,
    pub context: KeyContext,
}

pub trait KeyGenerator {
    /// Assign one key per request, in request order.
    fn assign_keys(&mut self, requests: &[KeyRequest])
    -> impl Future<Output = Result<Vec<String>>>;

    /// Single-request form of [`KeyGenerator::assign_keys`].
    fn assign_key(&mut self, request: KeyRequest) -> impl Future<Output = Result<String>> {
        async move {
            let mut keys = self.assign_keys(std::slice::from_ref(&request)).await?;
            match keys.pop() {
                Some(key) => Ok(key),
                None => bail!("Key generator returned no key for \"{}\"", request.text),
            }
        }
    }
}

/// Deterministic generator: `<namespace>.<first 8 hex digits of blake3(text)>`.
///
/// The namespace is the lower-camel component hint, or else the file stem (the parent
/// directory for `index` files).
#[derive(Debug, Default, Clone, Copy)]
pub struct HashKeyGenerator;

impl HashKeyGenerator {
    pub fn key_for(request: &KeyRequest) -> String {
        let hash = blake3::hash(request.text.as_bytes()).to_hex();
        format!("{}.{}", namespace(&request.context), &hash[..8])
    }
}

impl KeyGenerator for HashKeyGenerator {
    async fn assign_keys(&mut self, requests: &[KeyRequest]) -> Result<Vec<String>> {
        Ok(requests.iter().map(Self::key_for).collect())
    }
}

fn namespace(context: &KeyContext) -> String {
    if let Some(hint) = &context.component_hint {
        let ns = to_lower_camel(hint);
        if !ns.is_empty() {
            return ns;
        }
    }

    let path = Path::new(&context.file_path);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stem = stem.split('.').next().unwrap_or_default();
    let segment = if stem == "index" {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or(stem)
    } else {
        stem
    };

    match to_lower_camel(segment) {
        ns if ns.is_empty() => "common".to_string(),
        ns => ns,
    }
}
