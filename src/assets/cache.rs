use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use crate::foundation::hash::{Digest128, content_hash};

/// A resolved resource: its bytes plus a content-addressed hash.
#[derive(Clone, Debug)]
pub struct ResolvedAsset {
    /// Raw resource bytes.
    pub bytes: Arc<Vec<u8>>,
    /// XXH3-128 hash of `bytes`. Participates in the output-cache key so
    /// edited local files invalidate cached renders even at an unchanged
    /// path.
    pub hash: Digest128,
}

/// Result of a batch resolution.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    /// Per-identifier result in request order. `None` marks a resource that
    /// could not be fetched; callers omit the element it would have drawn.
    pub assets: Vec<Option<ResolvedAsset>>,
    /// Whether at least one identifier was fetched during this call (as
    /// opposed to served from cache).
    pub fetched_new: bool,
}

#[derive(Clone, Debug)]
enum Entry {
    Loaded(ResolvedAsset),
    // Failed fetches are remembered and not retried within the process.
    Unavailable,
}

/// Shared loader/cache for font and image resources.
///
/// Entries live for the lifetime of the cache and are never evicted. The
/// interior mutex doubles as the single-flight gate: one batch fills the
/// cache while concurrent resolvers wait, so the same identifier is never
/// fetched twice.
pub struct AssetCache {
    agent: ureq::Agent,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    /// Construct an empty cache with a shared HTTP agent.
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        Self {
            agent: config.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a batch of identifiers, fetching any that are not yet cached.
    ///
    /// Remote identifiers (`http://`/`https://`) are fetched over the
    /// network; anything else is read from the filesystem.
    pub fn resolve_batch(&self, ids: &[String]) -> BatchOutcome {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut fetched_new = false;
        let mut assets = Vec::with_capacity(ids.len());
        for id in ids {
            if !entries.contains_key(id) {
                fetched_new = true;
                let entry = match self.fetch(id) {
                    Ok(bytes) => Entry::Loaded(ResolvedAsset {
                        hash: content_hash(&bytes),
                        bytes: Arc::new(bytes),
                    }),
                    Err(e) => {
                        tracing::error!(id, error = %e, "failed to load asset");
                        Entry::Unavailable
                    }
                };
                entries.insert(id.clone(), entry);
            }
            assets.push(match &entries[id] {
                Entry::Loaded(asset) => Some(asset.clone()),
                Entry::Unavailable => None,
            });
        }

        BatchOutcome {
            assets,
            fetched_new,
        }
    }

    /// Resolve a single identifier.
    pub fn resolve(&self, id: &str) -> Option<ResolvedAsset> {
        self.resolve_batch(std::slice::from_ref(&id.to_string()))
            .assets
            .pop()
            .flatten()
    }

    /// Drop every cached entry, including unavailable markers.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn fetch(&self, id: &str) -> anyhow::Result<Vec<u8>> {
        if id.starts_with("http://") || id.starts_with("https://") {
            tracing::debug!(url = id, "downloading resource");
            let mut response = self.agent.get(id).call()?;
            Ok(response.body_mut().read_to_vec()?)
        } else {
            Ok(std::fs::read(id)?)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
