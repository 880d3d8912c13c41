// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # xmlview-lsp - Language Server Protocol
//!
//! This crate provides the LSP server implementation for xmlview-lsp, an
//! XML view language server backed by XSD schemas.
//!
//! ## Overview
//!
//! The LSP server provides:
//! - Schema-aware completion for attributes and child elements
//! - Hover documentation from XSD annotations
//! - Well-formedness and namespace diagnostics
//! - Go-to-definition for controller and view references
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Client (VS Code, etc.)          │
//! └──────────────┬──────────────────────────┘
//!                │ LSP Protocol
//!                ↓
//! ┌─────────────────────────────────────────┐
//! │       XmlViewBackend (tower-lsp)        │
//! ├─────────────────────────────────────────┤
//! │  • did_open / did_change / did_close    │
//! │  • completion / hover / definition      │
//! └──────────────┬──────────────────────────┘
//!                │
//!         ┌──────┴──────┬────────────────┐
//!         ↓             ↓                ↓
//! ┌────────────┐ ┌──────────┐  ┌──────────────┐
//! │   Schema   │ │ Document │  │   Feature    │
//! │   Store    │ │   Store  │  │   Engines    │
//! └────────────┘ └──────────┘  └──────────────┘
//! ```
//!
//! Every request runs a fresh structural scan over the current document
//! text against an `Arc` snapshot of the schema store; nothing derived
//! from a previous document version is ever reused.
//!
//! ## Error Handling
//!
//! The server uses graceful degradation:
//! - Missing configuration → start with an empty store, log warning
//! - Unloadable schema file → skip, log warning
//! - Provider errors → empty LSP result, log error
//!
//! Nothing a single request does can terminate the process.
//!
//! ## Modules
//!
//! - [`backend`]: Main LSP server implementation
//! - [`document`]: Document management and storage
//! - [`store_manager`]: Schema store lifecycle
//! - [`completion`] / [`hover`] / [`diagnostic`] / [`definition`]:
//!   feature engines

pub mod backend;
pub mod completion;
pub mod config;
pub mod definition;
pub mod diagnostic;
pub mod document;
pub mod hover;
pub mod store_manager;

// Re-exports for convenience
pub use backend::XmlViewBackend;
pub use completion::{CompletionEngine, CompletionError};
pub use config::{ConfigError, ServerConfig};
pub use definition::{DefinitionEngine, DefinitionError, WalkdirWorkspace, WorkspaceFiles};
pub use diagnostic::{DiagnosticCode, DiagnosticCollector, XmlDiagnostic};
pub use document::{Document, DocumentError, DocumentStore};
pub use hover::{HoverEngine, HoverError};
pub use store_manager::SchemaStoreManager;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const SERVER_NAME: &str = "xmlview-lsp";
