// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Management
//!
//! This module provides document management for the LSP server.
//!
//! ## Overview
//!
//! The document manager handles:
//! - Multiple open documents identified by URI
//! - Full-text document synchronization (open, change, close)
//! - Text content management using Ropey
//! - Position/byte-offset conversion for the scanner and diagnostics
//!
//! The scanner works on byte offsets while the protocol speaks in
//! line/character positions, so [`Document::byte_offset`] and
//! [`Document::position_of`] convert in both directions.

use ropey::Rope;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{Position, Url};

/// Errors that can occur during document operations
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document not found in the store
    #[error("Document not found: {0}")]
    DocumentNotFound(Url),
}

/// Document metadata
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Document URI
    pub uri: Url,

    /// Language identifier (e.g., "xml")
    pub language_id: String,

    /// Document version, incremented by the client on each change
    pub version: i32,
}

/// A document managed by the LSP server
///
/// Contains the document's content and metadata. Uses Ropey for the text
/// buffer; synchronization is full-text, so each change replaces the rope.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document metadata
    metadata: DocumentMetadata,

    /// Document content
    content: Rope,
}

impl Document {
    /// Create a new document
    pub fn new(uri: Url, content: &str, version: i32, language_id: String) -> Self {
        Self {
            metadata: DocumentMetadata {
                uri,
                language_id,
                version,
            },
            content: Rope::from_str(content),
        }
    }

    /// Get the document URI
    pub fn uri(&self) -> &Url {
        &self.metadata.uri
    }

    /// Get the document language ID
    pub fn language_id(&self) -> &str {
        &self.metadata.language_id
    }

    /// Get the document version
    pub fn version(&self) -> i32 {
        self.metadata.version
    }

    /// Get the full document content as a string
    pub fn get_content(&self) -> String {
        self.content.to_string()
    }

    /// Replace the full document content
    pub fn set_content(&mut self, content: &str, version: i32) {
        self.content = Rope::from_str(content);
        self.metadata.version = version;
    }

    /// Convert an LSP position to a byte offset
    ///
    /// # Returns
    ///
    /// `None` when the position lies outside the document.
    pub fn byte_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        if line >= self.content.len_lines() {
            return None;
        }
        let char_idx = self.content.line_to_char(line) + position.character as usize;
        if char_idx > self.content.len_chars() {
            return None;
        }
        Some(self.content.char_to_byte(char_idx))
    }

    /// Convert a byte offset back to an LSP position
    ///
    /// Offsets past the end of the document clamp to the last position.
    pub fn position_of(&self, byte: usize) -> Position {
        let byte = byte.min(self.content.len_bytes());
        let char_idx = self.content.byte_to_char(byte);
        let line = self.content.char_to_line(char_idx);
        let character = char_idx - self.content.line_to_char(line);
        Position::new(line as u32, character as u32)
    }
}

/// Thread-safe store of open documents keyed by URI
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<Url, Document>>,
}

impl DocumentStore {
    /// Create an empty document store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document
    ///
    /// Replaces any previous document with the same URI.
    pub async fn open_document(&self, uri: Url, content: &str, version: i32, language_id: String) {
        let document = Document::new(uri.clone(), content, version, language_id);
        self.documents.write().await.insert(uri, document);
    }

    /// Replace a document's content
    pub async fn update_document(
        &self,
        uri: &Url,
        content: &str,
        version: i32,
    ) -> Result<(), DocumentError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(uri)
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?;
        document.set_content(content, version);
        Ok(())
    }

    /// Close a document
    ///
    /// # Returns
    ///
    /// `true` when the document was open.
    pub async fn close_document(&self, uri: &Url) -> bool {
        self.documents.write().await.remove(uri).is_some()
    }

    /// Get a snapshot of a document
    pub async fn get_document(&self, uri: &Url) -> Option<Document> {
        self.documents.read().await.get(uri).cloned()
    }

    /// Number of open documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Check whether no documents are open
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}
