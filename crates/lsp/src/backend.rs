// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! This module provides the main LSP server backend using tower-lsp.
//!
//! ## Overview
//!
//! The backend handles:
//! - LSP protocol communication via tower-lsp
//! - Document lifecycle (open, change, close) with full-text sync
//! - Schema store loading at initialize and on configuration change
//! - Delegation to the completion, hover, diagnostic and definition
//!   engines
//!
//! ## Architecture
//!
//! ```text
//! Client → XmlViewBackend → Document Store
//!                ↓
//!        Schema Store Manager
//!                ↓
//!        Feature Engines (per request, over an Arc snapshot)
//! ```
//!
//! Provider failures degrade to empty LSP results with a logged error;
//! nothing a request does can terminate the server.

use crate::completion::CompletionEngine;
use crate::config::ServerConfig;
use crate::definition::{DefinitionEngine, WalkdirWorkspace};
use crate::diagnostic::DiagnosticCollector;
use crate::document::{Document, DocumentStore};
use crate::hover::HoverEngine;
use crate::store_manager::SchemaStoreManager;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};
use xmlview_lsp_scanner::CancelToken;

/// LSP backend implementation
///
/// Main entry point for all LSP protocol operations.
pub struct XmlViewBackend {
    /// LSP client for sending notifications and requests
    client: Client,

    /// Document store for managing open documents
    documents: Arc<DocumentStore>,

    /// Schema store lifecycle
    store_manager: Arc<SchemaStoreManager>,

    /// Server configuration
    config: RwLock<ServerConfig>,
}

impl XmlViewBackend {
    /// Create a new backend
    ///
    /// # Arguments
    ///
    /// - `client`: LSP client handle
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            store_manager: Arc::new(SchemaStoreManager::new()),
            config: RwLock::new(ServerConfig::default()),
        }
    }

    /// Get the document store
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Apply a configuration, loading the schema store when a directory
    /// is set
    ///
    /// A failing load keeps the previous store and logs the failure;
    /// configuration is never allowed to take the server down.
    async fn apply_config(&self, config: ServerConfig) {
        if let Some(dir) = &config.schema_dir {
            match self.store_manager.load(dir).await {
                Ok(count) => {
                    info!(schemas = count, dir = %dir.display(), "Schema store loaded");
                    self.client
                        .log_message(
                            MessageType::INFO,
                            format!("Loaded {count} schemas from {}", dir.display()),
                        )
                        .await;
                }
                Err(e) => {
                    error!(dir = %dir.display(), error = %e, "Failed to load schema store");
                    self.client
                        .show_message(
                            MessageType::ERROR,
                            format!("Failed to load schemas from {}: {e}", dir.display()),
                        )
                        .await;
                }
            }
        }
        *self.config.write().await = config;
    }

    /// The workspace root for definition lookups
    async fn workspace_root(&self) -> Option<PathBuf> {
        self.config.read().await.workspace_root.clone()
    }

    /// Run diagnostics over a document and publish the result
    async fn publish_diagnostics_for(&self, uri: &Url) {
        let Some(document) = self.documents.get_document(uri).await else {
            warn!(uri = %uri, "Document not found for diagnostics");
            return;
        };

        let collector = DiagnosticCollector::new(self.store_manager.snapshot().await);
        let text = document.get_content();
        let diagnostics = match collector.collect(&text, &CancelToken::new()) {
            Ok(diagnostics) => diagnostics
                .iter()
                .map(|d| d.to_lsp(&document))
                .collect(),
            Err(e) => {
                error!(uri = %uri, error = %e, "Diagnostics aborted");
                return;
            }
        };

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(document.version()))
            .await;
    }

    /// Byte offset of an LSP position in a document, if both exist
    async fn offset_at(&self, uri: &Url, position: Position) -> Option<(Document, usize)> {
        let document = self.documents.get_document(uri).await?;
        let offset = document.byte_offset(position)?;
        Some((document, offset))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for XmlViewBackend {
    /// Initialize the LSP server
    ///
    /// Reads the configuration from `initializationOptions` and loads the
    /// schema store before answering; requests arriving after initialize
    /// always see a ready store.
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing LSP server");
        info!("Client info: {:?}", params.client_info);

        let mut config = match ServerConfig::from_value(params.initialization_options) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Invalid initialization options, using defaults");
                ServerConfig::default()
            }
        };
        if config.workspace_root.is_none() {
            config.workspace_root = params
                .root_uri
                .as_ref()
                .and_then(|uri| uri.to_file_path().ok());
        }
        self.apply_config(config).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Full-text synchronization; view documents are small
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),

                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: Some(vec![".".to_string(), ">".to_string()]),
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: Some(false),
                    },
                    all_commit_characters: None,
                    completion_item: None,
                }),

                hover_provider: Some(HoverProviderCapability::Simple(true)),

                definition_provider: Some(OneOf::Left(true)),

                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: crate::SERVER_NAME.to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
        })
    }

    /// Initialized notification
    async fn initialized(&self, _params: InitializedParams) {
        info!("LSP server initialized successfully");
    }

    /// Shutdown the LSP server
    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down LSP server");
        Ok(())
    }

    /// Configuration change notification
    ///
    /// Accepts a new schema directory and rebuilds the store.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match ServerConfig::from_value(Some(params.settings)) {
            Ok(config) => {
                info!(?config, "Configuration changed");
                self.apply_config(config).await;
            }
            Err(e) => warn!(error = %e, "Ignoring invalid configuration change"),
        }
    }

    /// Document opened notification
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        info!(uri = %doc.uri, version = doc.version, "Document opened");

        self.documents
            .open_document(doc.uri.clone(), &doc.text, doc.version, doc.language_id)
            .await;
        self.publish_diagnostics_for(&doc.uri).await;
    }

    /// Document changed notification
    ///
    /// Full-text sync: the last change event carries the whole document.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let Some(change) = params.content_changes.into_iter().last() else {
            warn!(uri = %uri, "Change notification without content");
            return;
        };

        if let Err(e) = self
            .documents
            .update_document(&uri, &change.text, version)
            .await
        {
            warn!(uri = %uri, error = %e, "Change for unknown document, opening");
            self.documents
                .open_document(uri.clone(), &change.text, version, "xml".to_string())
                .await;
        }
        self.publish_diagnostics_for(&uri).await;
    }

    /// Document closed notification
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!(uri = %uri, "Document closed");

        if !self.documents.close_document(&uri).await {
            warn!(uri = %uri, "Document not found for close");
        }
        // Clear published diagnostics for the closed document
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    /// Completion request
    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some((document, offset)) = self.offset_at(&uri, position).await else {
            warn!(uri = %uri, "No document/offset for completion");
            return Ok(None);
        };

        let engine = CompletionEngine::new(self.store_manager.snapshot().await);
        match engine.complete(&document.get_content(), offset, &CancelToken::new()) {
            Ok(Some(items)) => {
                info!(uri = %uri, items = items.len(), "Completion computed");
                Ok(Some(CompletionResponse::Array(items)))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                if !e.should_return_empty() {
                    error!(uri = %uri, error = %e, "Completion failed");
                }
                Ok(None)
            }
        }
    }

    /// Completion item resolve request
    ///
    /// Items leave the completion engine fully populated, so resolution
    /// is a passthrough.
    async fn completion_resolve(&self, params: CompletionItem) -> Result<CompletionItem> {
        Ok(params)
    }

    /// Hover request
    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some((document, offset)) = self.offset_at(&uri, position).await else {
            return Ok(None);
        };

        let engine = HoverEngine::new(self.store_manager.snapshot().await);
        match engine.hover(&document, offset, &CancelToken::new()) {
            Ok(hover) => Ok(hover),
            Err(e) => {
                error!(uri = %uri, error = %e, "Hover failed");
                Ok(None)
            }
        }
    }

    /// Definition request
    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some((document, offset)) = self.offset_at(&uri, position).await else {
            return Ok(None);
        };
        let Some(root) = self.workspace_root().await else {
            warn!("No workspace root, definition unavailable");
            return Ok(None);
        };

        let engine = DefinitionEngine::new(WalkdirWorkspace::new(root));
        match engine.definition(&document.get_content(), offset, &CancelToken::new()) {
            Ok(Some(locations)) => Ok(Some(GotoDefinitionResponse::Array(locations))),
            Ok(None) => Ok(None),
            Err(e) => {
                error!(uri = %uri, error = %e, "Definition failed");
                Ok(None)
            }
        }
    }
}
