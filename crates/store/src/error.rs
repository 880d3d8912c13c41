// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for schema store operations
//!
//! This module defines the error types used while loading XSD files.

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading a schema file
///
/// All of these are per-file and non-fatal: the directory loader logs the
/// failure, skips the file and continues with the remaining schemas.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The schema file could not be read
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// The schema file is not well-formed XML
    #[error("Failed to parse schema XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The schema root carries no `targetNamespace` attribute
    #[error("Schema has no targetNamespace attribute")]
    MissingTargetNamespace,

    /// No `xmlns:` binding on the schema root declares the XSD namespace
    #[error("Schema declares no binding for the XSD namespace")]
    MissingXsdNamespace,

    /// The XSD namespace is bound to the default (empty) prefix
    ///
    /// Key normalization cannot distinguish an unprefixed XSD vocabulary
    /// from instance elements, so such files are rejected at load time.
    #[error("Schema binds the XSD namespace to the default prefix")]
    DefaultXsdPrefix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::MissingTargetNamespace;
        assert_eq!(err.to_string(), "Schema has no targetNamespace attribute");

        let err = LoadError::DefaultXsdPrefix;
        assert!(err.to_string().contains("default prefix"));
    }
}
