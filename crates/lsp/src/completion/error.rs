// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion error types
//!
//! This module defines error types for the completion system.

use tower_lsp::lsp_types::Position;
use xmlview_lsp_resolver::ResolveError;
use xmlview_lsp_scanner::ScanError;

/// Errors that can occur during completion
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Invalid position for completion
    #[error("Invalid position: {0:?}")]
    InvalidPosition(Position),

    /// Structural scan error
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Type resolution error
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

impl CompletionError {
    /// Check if this error should result in an empty completion list
    /// (vs. being logged as a server-side failure)
    pub fn should_return_empty(&self) -> bool {
        matches!(
            self,
            CompletionError::InvalidPosition(_)
                | CompletionError::Scan(ScanError::Cancelled)
                | CompletionError::Resolve(ResolveError::Cancelled)
        )
    }
}
