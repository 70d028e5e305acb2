//! Key resolution: the step between Pass 1 and Pass 2.
//!
//! Every site of a file is resolved against the translation table by dedup signature.
//! Signatures still unknown are sent to the key generator in one batch, then inserted.

use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::warn;

use crate::core::{
    classify::FileInfo,
    extract::{CandidateSite, SiteId},
    keygen::{KeyContext, KeyGenerator, KeyRequest},
    table::{KeyCollision, Signature, TranslationEntry, TranslationTable},
};

/// Keys for every site of one file.
#[derive(Debug, Default)]
pub struct Resolution {
    pub keys: HashMap<SiteId, String>,
    /// Sites whose key already existed, in the table or earlier in the same file.
    pub reused: usize,
    pub collisions: Vec<KeyCollision>,
    /// Keys created for this file, in insertion order.
    pub inserted: Vec<String>,
}

pub async fn resolve_sites<G: KeyGenerator>(
    sites: &[CandidateSite],
    table: &mut TranslationTable,
    keygen: &mut G,
    file: &FileInfo,
) -> Result<Resolution> {
    let mut resolution = Resolution::default();

    // Unknown signatures, first site wins the request context.
    let mut pending: Vec<(Signature, &CandidateSite)> = Vec::new();
    let mut waiting: Vec<(SiteId, usize)> = Vec::new();

    for site in sites {
        let signature = Signature::new(&site.text, &site.interpolation_vars);
        if let Some(key) = table.find(&signature) {
            resolution.keys.insert(site.id, key.to_string());
            resolution.reused += 1;
            continue;
        }
        match pending.iter().position(|(s, _)| *s == signature) {
            Some(i) => {
                resolution.reused += 1;
                waiting.push((site.id, i));
            }
            None => {
                waiting.push((site.id, pending.len()));
                pending.push((signature, site));
            }
        }
    }

    if pending.is_empty() {
        return Ok(resolution);
    }

    let requests: Vec<KeyRequest> = pending
        .iter()
        .map(|(_, site)| KeyRequest {
            text: site.text.clone(),
            context: KeyContext {
                file_path: file.path.clone(),
                file_kind: file.kind,
                component_hint: site.component_hint.clone(),
            },
        })
        .collect();

    let generated = keygen.assign_keys(&requests).await?;
    if generated.len() != requests.len() {
        bail!(
            "Key generator returned {} keys for {} texts",
            generated.len(),
            requests.len()
        );
    }

    let mut assigned = Vec::with_capacity(generated.len());
    for ((_, site), key) in pending.iter().zip(generated) {
        let fresh = table.get(&key).is_none();
        let entry = TranslationEntry {
            text: site.text.clone(),
            source_file: file.path.clone(),
            interpolations: site.interpolation_vars.clone(),
        };
        let (key, collision) = table.insert(key, entry);
        if let Some(collision) = collision {
            warn!(
                "key \"{}\" already holds \"{}\"; \"{}\" stored as \"{}\" ({})",
                collision.key,
                collision.existing_text,
                collision.text,
                collision.assigned_key,
                collision.file
            );
            resolution.collisions.push(collision);
            resolution.inserted.push(key.clone());
        } else if fresh {
            resolution.inserted.push(key.clone());
        }
        assigned.push(key);
    }

    for (id, i) in waiting {
        resolution.keys.insert(id, assigned[i].clone());
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{classify::FileKind, extract::SiteKind, stats::Location},
        test_utils::FixedKeyGenerator,
    };
    use pretty_assertions::assert_eq;
    use swc_common::{BytePos, Span};

    fn site(lo: u32, text: &str, vars: &[&str]) -> CandidateSite {
        let span = Span::new(BytePos(lo), BytePos(lo + 4));
        CandidateSite {
            id: SiteId::new(span, SiteKind::Literal),
            text: text.to_string(),
            kind: SiteKind::Literal,
            span_start: lo as usize,
            span_end: lo as usize + 4,
            interpolation_vars: vars.iter().map(|v| v.to_string()).collect(),
            location: Location::new("src/App.tsx", 1, lo as usize),
            component_hint: None,
        }
    }

    fn file() -> FileInfo {
        FileInfo::new("src/App.tsx", FileKind::Component)
    }

    #[tokio::test]
    async fn test_reuses_table_and_in_file_repeats() {
        let mut table = TranslationTable::from_entries([(
            "common.save".to_string(),
            TranslationEntry {
                text: "保存".to_string(),
                source_file: "src/Other.tsx".to_string(),
                interpolations: vec![],
            },
        )]);
        let mut keygen = FixedKeyGenerator::new(["app.cancel"]);
        let sites = vec![site(1, "保存", &[]), site(10, "取消", &[]), site(20, "取消", &[])];

        let resolution = resolve_sites(&sites, &mut table, &mut keygen, &file())
            .await
            .unwrap();

        assert_eq!(resolution.reused, 2);
        assert_eq!(resolution.inserted, vec!["app.cancel"]);
        assert_eq!(resolution.keys[&sites[0].id], "common.save");
        assert_eq!(resolution.keys[&sites[1].id], "app.cancel");
        assert_eq!(resolution.keys[&sites[2].id], "app.cancel");
        assert_eq!(keygen.requests().len(), 1);
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_same_text_different_vars_are_distinct() {
        let mut table = TranslationTable::new();
        let mut keygen = FixedKeyGenerator::new(["app.a", "app.b"]);
        let sites = vec![site(1, "你好{name}", &["name"]), site(10, "你好{name}", &[])];

        let resolution = resolve_sites(&sites, &mut table, &mut keygen, &file())
            .await
            .unwrap();

        assert_eq!(resolution.reused, 0);
        assert_eq!(resolution.inserted, vec!["app.a", "app.b"]);
    }

    #[tokio::test]
    async fn test_collision_gets_suffixed_key() {
        let mut table = TranslationTable::from_entries([(
            "app.ok".to_string(),
            TranslationEntry {
                text: "确定".to_string(),
                source_file: "src/Other.tsx".to_string(),
                interpolations: vec![],
            },
        )]);
        let mut keygen = FixedKeyGenerator::new(["app.ok"]);
        let sites = vec![site(1, "完成", &[])];

        let resolution = resolve_sites(&sites, &mut table, &mut keygen, &file())
            .await
            .unwrap();

        assert_eq!(resolution.keys[&sites[0].id], "app.ok_2");
        assert_eq!(resolution.collisions.len(), 1);
        assert_eq!(table.get("app.ok").unwrap().text, "确定");
        assert_eq!(table.get("app.ok_2").unwrap().text, "完成");
    }

    #[tokio::test]
    async fn test_short_batch_is_an_error() {
        let mut table = TranslationTable::new();
        let mut keygen = FixedKeyGenerator::new(["app.a"]);
        let sites = vec![site(1, "保存", &[]), site(10, "取消", &[])];

        let err = resolve_sites(&sites, &mut table, &mut keygen, &file())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("returned 1 keys for 2 texts"));
        assert!(table.is_empty());
    }
}
