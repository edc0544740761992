// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation collection with best-effort persistence.
//!
//! The store owns the full annotation list in insertion order and writes
//! it back through an [`AnnotationStorage`] backend on every mutation.
//! Persistence failures are logged and never surfaced to callers: the
//! in-memory collection stays authoritative.

use crate::models::annotation::{Annotation, AnnotationId, AnnotationKind};
use anyhow::Result;

/// Key under which the serialized annotation collection is stored.
pub const STORAGE_KEY: &str = "radview.annotations";

/// External key-value persistence for the annotation collection.
pub trait AnnotationStorage {
    /// Read the serialized collection, `None` when the key is absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Write the serialized collection.
    fn save(&self, key: &str, payload: &str) -> Result<()>;
}

/// Discards every write and never finds a stored collection.
///
/// Fallback backend when no data directory is available.
pub struct NullStorage;

impl AnnotationStorage for NullStorage {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _payload: &str) -> Result<()> {
        Ok(())
    }
}

pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    next_id: AnnotationId,
    storage: Box<dyn AnnotationStorage>,
}

impl AnnotationStore {
    /// Create a store, loading any previously persisted collection.
    ///
    /// Read or parse failures are logged and the store starts empty.
    pub fn new(storage: Box<dyn AnnotationStorage>) -> Self {
        let annotations = match storage.load(STORAGE_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Annotation>>(&payload) {
                Ok(list) => {
                    log::info!("Loaded {} persisted annotations", list.len());
                    list
                }
                Err(e) => {
                    log::warn!("Failed to parse persisted annotations: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to load persisted annotations: {}", e);
                Vec::new()
            }
        };

        // Re-seed the id counter above anything loaded so identifiers stay
        // unique across restarts.
        let next_id = annotations.iter().map(|a| a.id + 1).max().unwrap_or(1);

        Self {
            annotations,
            next_id,
            storage,
        }
    }

    /// Append a new annotation for `slot` and schedule a save.
    pub fn add(&mut self, slot: usize, kind: AnnotationKind) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        self.annotations.push(Annotation::new(id, slot, kind));
        log::info!(
            "Added annotation {} to slot {}, total: {}",
            id,
            slot,
            self.annotations.len()
        );
        self.persist();
        id
    }

    /// Remove the annotation with `id`; a no-op when absent.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        let removed = self.annotations.len() != before;
        if removed {
            log::info!("Removed annotation {}, total: {}", id, self.annotations.len());
            self.persist();
        }
        removed
    }

    /// Remove every annotation owned by `slot`.
    pub fn clear_slot(&mut self, slot: usize) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.slot != slot);
        let removed = before - self.annotations.len();
        if removed > 0 {
            log::info!("Cleared {} annotations from slot {}", removed, slot);
            self.persist();
        }
        removed
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Annotations owned by `slot` in insertion order.
    ///
    /// Recomputed on each call; restartable.
    pub fn for_slot(&self, slot: usize) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.slot == slot)
    }

    /// Annotations owned by `slot`, newest first, for display listings.
    pub fn newest_first(&self, slot: usize) -> Vec<&Annotation> {
        let mut list: Vec<&Annotation> = self.for_slot(slot).collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        list
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.annotations) {
            Ok(p) => p,
            Err(e) => {
                log::error!("Failed to serialize annotations: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.save(STORAGE_KEY, &payload) {
            log::error!("Failed to persist annotations: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// In-memory backend shared between store instances in tests.
    #[derive(Default, Clone)]
    pub struct MemoryStorage {
        map: Rc<RefCell<HashMap<String, String>>>,
    }

    impl AnnotationStorage for MemoryStorage {
        fn load(&self, key: &str) -> Result<Option<String>> {
            Ok(self.map.borrow().get(key).cloned())
        }

        fn save(&self, key: &str, payload: &str) -> Result<()> {
            self.map.borrow_mut().insert(key.to_string(), payload.to_string());
            Ok(())
        }
    }

    /// Backend whose writes always fail, for best-effort coverage.
    pub struct FailingStorage;

    impl AnnotationStorage for FailingStorage {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("storage offline")
        }

        fn save(&self, _key: &str, _payload: &str) -> Result<()> {
            anyhow::bail!("storage offline")
        }
    }
}
