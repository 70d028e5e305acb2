//! Key generators for tests.

use anyhow::{Result, bail};

use crate::core::keygen::{KeyGenerator, KeyRequest};

/// Hands out a fixed list of keys in order. Runs dry once the list is exhausted.
#[derive(Debug, Default)]
pub struct FixedKeyGenerator {
    keys: Vec<String>,
    requests: Vec<KeyRequest>,
}

impl FixedKeyGenerator {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut keys: Vec<String> = keys.into_iter().map(String::from).collect();
        keys.reverse();
        Self {
            keys,
            requests: Vec::new(),
        }
    }

    pub fn requests(&self) -> &[KeyRequest] {
        &self.requests
    }
}

impl KeyGenerator for FixedKeyGenerator {
    async fn assign_keys(&mut self, requests: &[KeyRequest]) -> Result<Vec<String>> {
        self.requests.extend_from_slice(requests);
        Ok(requests.iter().map_while(|_| self.keys.pop()).collect())
    }
}

/// `k1`, `k2`, ... under a fixed namespace.
#[derive(Debug)]
pub struct SequentialKeyGenerator {
    namespace: String,
    next: usize,
    pub batches: usize,
}

impl SequentialKeyGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            next: 1,
            batches: 0,
        }
    }
}

impl KeyGenerator for SequentialKeyGenerator {
    async fn assign_keys(&mut self, requests: &[KeyRequest]) -> Result<Vec<String>> {
        self.batches += 1;
        let keys = (self.next..self.next + requests.len())
            .map(|n| format!("{}.k{}", self.namespace, n))
            .collect();
        self.next += requests.len();
        Ok(keys)
    }
}

/// Always fails, like an unreachable remote generator.
#[derive(Debug, Default)]
pub struct FailingKeyGenerator;

impl KeyGenerator for FailingKeyGenerator {
    async fn assign_keys(&mut self, _requests: &[KeyRequest]) -> Result<Vec<String>> {
        bail!("key service unavailable")
    }
}
