// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema store
//!
//! This module holds the loaded schemas keyed by target namespace and
//! provides the lookups the resolver builds on.
//!
//! ## Load policy
//!
//! Directory loading reads `*.xsd` files sorted by file name, so the
//! duplicate-namespace policy is deterministic: when two files declare the
//! same `targetNamespace`, the later file in sort order replaces the
//! earlier one. The replacement is logged as a warning, not an error.

use crate::error::{LoadError, StoreResult};
use crate::loader::parse_schema;
use crate::model::{ComplexTypeDecl, ElementDecl, Schema};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// In-memory collection of parsed XSD schemas keyed by target namespace URI
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    /// Map of target namespace to schema
    schemas: HashMap<String, Schema>,
}

impl SchemaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.xsd` file in a directory
    ///
    /// Files are processed sorted by file name. Per-file failures are
    /// logged as warnings and skipped; only a failure to read the
    /// directory itself is returned as an error.
    ///
    /// # Arguments
    ///
    /// - `dir`: the schema directory path
    pub fn load_dir(dir: &Path) -> StoreResult<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("xsd"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = %source, error = %e, "Failed to read schema file, skipping");
                    continue;
                }
            };

            if let Err(e) = store.load_source(&source, &text) {
                warn!(file = %source, error = %e, "Failed to load schema file, skipping");
            }
        }

        info!(
            schemas = store.len(),
            dir = %dir.display(),
            "Schema store loaded"
        );
        Ok(store)
    }

    /// Parse one schema source and insert it into the store
    ///
    /// # Arguments
    ///
    /// - `source`: origin label for the schema (file name)
    /// - `text`: the raw XSD content
    pub fn load_source(&mut self, source: &str, text: &str) -> Result<(), LoadError> {
        let schema = parse_schema(source, text)?;
        self.insert(schema);
        Ok(())
    }

    /// Insert a schema, replacing any previous entry for its namespace
    pub fn insert(&mut self, schema: Schema) {
        if let Some(previous) = self.schemas.get(&schema.target_namespace) {
            warn!(
                namespace = %schema.target_namespace,
                previous = %previous.source,
                replacement = %schema.source,
                "Duplicate target namespace, later file wins"
            );
        }
        self.schemas.insert(schema.target_namespace.clone(), schema);
    }

    /// Get a schema by its target namespace
    pub fn get(&self, namespace: &str) -> Option<&Schema> {
        self.schemas.get(namespace)
    }

    /// Check whether a namespace is present in the store
    pub fn contains(&self, namespace: &str) -> bool {
        self.schemas.contains_key(namespace)
    }

    /// Iterate over all target namespaces
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_str())
    }

    /// Iterate over all schemas
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Number of loaded schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Find a top-level element declaration by local name
    pub fn find_element<'a>(&self, schema: &'a Schema, name: &str) -> Option<&'a ElementDecl> {
        schema.elements.iter().find(|e| e.name == name)
    }

    /// Find a top-level complex type declaration by local name
    pub fn find_complex_type<'a>(
        &self,
        schema: &'a Schema,
        local_name: &str,
    ) -> Option<&'a ComplexTypeDecl> {
        schema.complex_types.iter().find(|t| t.name == local_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn schema_text(namespace: &str) -> String {
        format!(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                          targetNamespace="{namespace}">
              <xsd:element name="Root" type="RootType"/>
              <xsd:complexType name="RootType"/>
            </xsd:schema>"#
        )
    }

    #[test]
    fn test_store_load_source() {
        let mut store = SchemaStore::new();
        store.load_source("a.xsd", &schema_text("urn:a")).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains("urn:a"));
        assert!(!store.contains("urn:b"));

        let schema = store.get("urn:a").unwrap();
        assert!(store.find_element(schema, "Root").is_some());
        assert!(store.find_complex_type(schema, "RootType").is_some());
        assert!(store.find_complex_type(schema, "Missing").is_none());
    }

    #[test]
    fn test_store_duplicate_namespace_last_wins() {
        let mut store = SchemaStore::new();
        store.load_source("a.xsd", &schema_text("urn:dup")).unwrap();
        store.load_source("b.xsd", &schema_text("urn:dup")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("urn:dup").unwrap().source, "b.xsd");
    }

    #[test]
    fn test_store_load_dir_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut good = std::fs::File::create(dir.path().join("a_good.xsd")).unwrap();
        good.write_all(schema_text("urn:good").as_bytes()).unwrap();

        let mut bad = std::fs::File::create(dir.path().join("b_bad.xsd")).unwrap();
        bad.write_all(b"<not xml").unwrap();

        let mut other = std::fs::File::create(dir.path().join("readme.txt")).unwrap();
        other.write_all(b"not a schema").unwrap();

        let store = SchemaStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains("urn:good"));
    }

    #[test]
    fn test_store_load_dir_sorted_duplicate_policy() {
        let dir = tempfile::tempdir().unwrap();

        // Written out of order; the loader must sort by file name so that
        // z.xsd wins over a.xsd for the shared namespace.
        std::fs::write(dir.path().join("z.xsd"), schema_text("urn:dup")).unwrap();
        std::fs::write(dir.path().join("a.xsd"), schema_text("urn:dup")).unwrap();

        let store = SchemaStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.get("urn:dup").unwrap().source, "z.xsd");
    }

    #[test]
    fn test_store_load_dir_missing() {
        let result = SchemaStore::load_dir(Path::new("/nonexistent/schemas"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
