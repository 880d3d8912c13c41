// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion module
//!
//! This module provides schema-aware completion for XML views.
//!
//! ## Architecture
//!
//! The completion system is organized into:
//! - `render`: Converts schema declarations to LSP completion items
//! - `error`: Error types for completion operations
//!
//! ## Flow
//!
//! ```text
//! 1. Backend receives completion request
//!    ↓
//! 2. Structural scan locates the cursor (element path, header state)
//!    ↓
//! 3. Cursor in a tag header → attribute set of the resolved type,
//!    minus attributes already present
//!    Cursor in element content → allowed child elements plus
//!    cross-schema derivations
//!    Cursor in an attribute value → nothing (definition owns that)
//!    ↓
//! 4. Render and return CompletionResponse
//! ```

pub mod error;
pub mod render;

use std::collections::HashSet;
use std::sync::Arc;
use tower_lsp::lsp_types::CompletionItem;
use tracing::debug;
use xmlview_lsp_resolver::{
    attributes_of, derived_elements, elements_allowed_at, resolve_element_type, type_at_path,
    ResolvedType,
};
use xmlview_lsp_scanner::{scan_at_offset, CancelToken, FoundCursor, UsedNamespaces};
use xmlview_lsp_store::SchemaStore;

pub use error::CompletionError;
use render::CompletionRenderer;

/// Completion engine
///
/// Orchestrates the completion flow from the structural scan to
/// rendering. Holds the schema store snapshot the request started with.
pub struct CompletionEngine {
    store: Arc<SchemaStore>,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    ///
    /// * `store` - Schema store snapshot for this request
    pub fn new(store: Arc<SchemaStore>) -> Self {
        Self { store }
    }

    /// Perform completion at the given byte offset
    ///
    /// # Arguments
    ///
    /// * `text` - Current document text
    /// * `offset` - Byte offset of the cursor
    /// * `token` - Cancellation token for this request
    ///
    /// # Returns
    ///
    /// - `Ok(Some(items))` - Completion items available
    /// - `Ok(None)` - No completion in this context
    /// - `Err(CompletionError)` - Error occurred
    pub fn complete(
        &self,
        text: &str,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Option<Vec<CompletionItem>>, CompletionError> {
        let cursor = scan_at_offset(text, offset, token)?;
        if cursor.path.is_empty() {
            return Ok(None);
        }
        let used = UsedNamespaces::scan(text);

        if cursor.is_in_element {
            if cursor.is_in_attribute_value {
                // Attribute values are the definition provider's surface
                return Ok(None);
            }
            let items = self.attribute_items(&cursor, &used, token)?;
            return Ok(if items.is_empty() { None } else { Some(items) });
        }

        let items = self.element_items(&cursor, &used, token)?;
        Ok(if items.is_empty() { None } else { Some(items) })
    }

    /// Attributes of the enclosing element's type, inherited included,
    /// minus names already written in the header
    fn attribute_items(
        &self,
        cursor: &FoundCursor,
        used: &UsedNamespaces,
        token: &CancelToken,
    ) -> Result<Vec<CompletionItem>, CompletionError> {
        let Some(resolved) = self.cursor_element_type(cursor, used, token)? else {
            debug!(element = %cursor.qualified_name(), "No type for attribute completion");
            return Ok(Vec::new());
        };

        let items = attributes_of(&self.store, &resolved)?
            .iter()
            .filter(|owned| !cursor.has_attribute(&owned.attribute.name))
            .map(CompletionRenderer::attribute_item)
            .collect();
        Ok(items)
    }

    /// Resolve the type of the element under the cursor
    ///
    /// The element is looked up directly in its own prefix's schema, so
    /// an ancestor with an unbound prefix or an unloaded schema does not
    /// block the lookup. Elements declared inline on an enclosing type
    /// (aggregation slots) fall back to the full path descent.
    fn cursor_element_type<'a>(
        &'a self,
        cursor: &FoundCursor,
        used: &UsedNamespaces,
        token: &CancelToken,
    ) -> Result<Option<ResolvedType<'a>>, CompletionError> {
        if let Some(uri) = used.uri_for(cursor.prefix.as_deref()) {
            if let Some(schema) = self.store.get(uri) {
                if let Some(element) = self.store.find_element(schema, &cursor.local_name) {
                    if let Some(resolved) = resolve_element_type(&self.store, schema, element)? {
                        return Ok(Some(resolved));
                    }
                }
            }
        }
        Ok(type_at_path(&self.store, used, &cursor.path, token)?)
    }

    /// Child elements the schema permits here, plus elements from other
    /// schemas whose types extend a permitted child's type
    fn element_items(
        &self,
        cursor: &FoundCursor,
        used: &UsedNamespaces,
        token: &CancelToken,
    ) -> Result<Vec<CompletionItem>, CompletionError> {
        let allowed = elements_allowed_at(&self.store, used, &cursor.path, token)?;

        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for entry in &allowed {
            let prefix = self.prefix_of(used, &entry.namespace);
            if seen.insert(qualified(prefix, &entry.element.name)) {
                items.push(CompletionRenderer::element_item(
                    &entry.element,
                    prefix,
                    &entry.namespace,
                ));
            }

            // Substitutable derivations from other schemas
            let Some(schema) = self.store.get(&entry.namespace) else {
                continue;
            };
            let Some(base) = resolve_element_type(&self.store, schema, &entry.element)? else {
                continue;
            };
            for derived in derived_elements(&self.store, used, &base, token)? {
                if seen.insert(qualified(Some(derived.prefix.as_str()), &derived.element.name)) {
                    items.push(CompletionRenderer::element_item(
                        &derived.element,
                        Some(derived.prefix.as_str()),
                        &derived.namespace,
                    ));
                }
            }
        }
        Ok(items)
    }

    /// The document prefix a namespace is addressed by, if it is not the
    /// default namespace
    fn prefix_of<'u>(&self, used: &'u UsedNamespaces, namespace: &str) -> Option<&'u str> {
        match used.prefix_for(namespace) {
            Some(prefix) => Some(prefix),
            None => {
                if used.uri_for(None) == Some(namespace) {
                    None
                } else {
                    debug!(namespace, "Namespace not bound in document");
                    None
                }
            }
        }
    }
}

fn qualified(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{name}"),
        None => name.to_string(),
    }
}
