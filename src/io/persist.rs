// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! File-backed key-value persistence for the annotation collection.
//!
//! One key maps to one JSON file in the per-user data directory. All
//! failures bubble up as `anyhow` errors; the annotation store treats
//! them as best-effort and only logs.

use crate::models::store::AnnotationStorage;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at the per-user data directory.
    pub fn new() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("No user data directory available")?
            .join("radview");
        Ok(Self { dir })
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl AnnotationStorage for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let payload = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(payload))
    }

    fn save(&self, key: &str, payload: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, payload)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
