// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # XSD Schema Store
//!
//! This crate loads XSD schema files into an in-memory store keyed by
//! target namespace.
//!
//! ## Overview
//!
//! The store is built once at server startup (or on an explicit reload) by
//! reading every `*.xsd` file in a configured directory. Each file produces
//! one [`Schema`] holding:
//! - the declared `targetNamespace` (the store key)
//! - the `xmlns:` prefix bindings declared on the schema root
//! - the top-level element and complex type declarations
//!
//! Per-file load failures (unparsable XML, missing target namespace, missing
//! XSD namespace binding) are logged and skipped; they never abort the load
//! of the remaining files.
//!
//! ## Key normalization
//!
//! XSD vocabulary nodes (`element`, `complexType`, `attribute`, ...) are
//! matched by their resolved namespace URI rather than by prefixed tag text,
//! so lookups at query time never need to strip the file's XSD prefix. A
//! schema that binds the XSD vocabulary to the *default* (empty) prefix is
//! rejected at load time because the normalization cannot distinguish its
//! own vocabulary from instance elements.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xmlview_lsp_store::SchemaStore;
//!
//! let store = SchemaStore::load_dir("./schemas")?;
//! if let Some(schema) = store.get("sap.m") {
//!     let button = store.find_element(schema, "Button");
//! }
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod store;

pub use error::{LoadError, StoreResult};
pub use loader::{parse_schema, XSD_NAMESPACE};
pub use model::{AttributeDecl, ComplexTypeDecl, ContentParticle, ElementDecl, Schema};
pub use store::SchemaStore;
