// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema store manager
//!
//! This module manages the schema store lifecycle for the LSP server.
//!
//! The manager is responsible for:
//! - Loading the store from the configured schema directory
//! - Rebuilding the store when the configuration changes
//! - Handing out cheap `Arc` snapshots to request handlers
//!
//! Requests hold on to the snapshot they started with; a reload swaps the
//! `Arc` and never mutates a store an in-flight request is reading.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use xmlview_lsp_store::{SchemaStore, StoreResult};

/// Schema store manager
///
/// Guards the current store snapshot and the directory it was loaded
/// from.
#[derive(Debug, Default)]
pub struct SchemaStoreManager {
    /// Current store snapshot
    store: RwLock<Arc<SchemaStore>>,

    /// Directory of the last successful load, for reloads
    schema_dir: RwLock<Option<PathBuf>>,
}

impl SchemaStoreManager {
    /// Create a manager with an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a schema directory and swap it in
    ///
    /// # Returns
    ///
    /// The number of schemas loaded.
    pub async fn load(&self, dir: &Path) -> StoreResult<usize> {
        let store = SchemaStore::load_dir(dir)?;
        let count = store.len();

        *self.store.write().await = Arc::new(store);
        *self.schema_dir.write().await = Some(dir.to_path_buf());

        info!(schemas = count, dir = %dir.display(), "Schema store swapped");
        Ok(count)
    }

    /// Rebuild the store from the last loaded directory
    ///
    /// Without a recorded directory this is a no-op returning zero.
    pub async fn reload(&self) -> StoreResult<usize> {
        let dir = self.schema_dir.read().await.clone();
        match dir {
            Some(dir) => self.load(&dir).await,
            None => Ok(0),
        }
    }

    /// Get the current store snapshot
    pub async fn snapshot(&self) -> Arc<SchemaStore> {
        self.store.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                                     targetNamespace="urn:test">
      <xsd:complexType name="RootType"/>
      <xsd:element name="Root" type="RootType"/>
    </xsd:schema>"#;

    #[tokio::test]
    async fn test_load_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.xsd"), XSD).unwrap();

        let manager = SchemaStoreManager::new();
        assert!(manager.snapshot().await.is_empty());

        let count = manager.load(dir.path()).await.unwrap();
        assert_eq!(count, 1);
        assert!(manager.snapshot().await.contains("urn:test"));
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xsd"), XSD).unwrap();

        let manager = SchemaStoreManager::new();
        manager.load(dir.path()).await.unwrap();

        std::fs::write(
            dir.path().join("b.xsd"),
            XSD.replace("urn:test", "urn:other"),
        )
        .unwrap();

        let count = manager.reload().await.unwrap();
        assert_eq!(count, 2);
        assert!(manager.snapshot().await.contains("urn:other"));
    }

    #[tokio::test]
    async fn test_reload_without_directory() {
        let manager = SchemaStoreManager::new();
        assert_eq!(manager.reload().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xsd"), XSD).unwrap();

        let manager = SchemaStoreManager::new();
        manager.load(dir.path()).await.unwrap();
        let held = manager.snapshot().await;

        std::fs::remove_file(dir.path().join("a.xsd")).unwrap();
        manager.reload().await.unwrap();

        // The old snapshot still sees the schema; the new one does not.
        assert!(held.contains("urn:test"));
        assert!(!manager.snapshot().await.contains("urn:test"));
    }
}
