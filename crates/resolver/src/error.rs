// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for resolution operations
//!
//! All resolution errors are per-lookup and recoverable: feature providers
//! convert them into empty results or user-visible diagnostics. Nothing in
//! this taxonomy should ever terminate the hosting process.

use thiserror::Error;

/// Result type alias for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that can occur during type resolution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A referenced namespace is absent from the schema store
    #[error("Schema not found for namespace '{namespace}'")]
    SchemaNotFound { namespace: String },

    /// A namespace prefix has no binding in the referencing schema
    #[error("Prefix '{prefix}' is not bound in schema '{schema}'")]
    UnknownPrefix { prefix: String, schema: String },

    /// A base-type chain revisited a type it already walked
    #[error("Cyclic type chain at '{type_name}'")]
    CyclicType { type_name: String },

    /// The request was cancelled mid-resolution
    #[error("Resolution cancelled")]
    Cancelled,
}
