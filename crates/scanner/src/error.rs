// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for scanner operations
//!
//! Structural anomalies (malformed headers, unterminated attribute values,
//! stray closing tags) are deliberately *not* errors: the scanner degrades
//! to partial results and logs them, because the buffer being scanned is
//! usually mid-edit. The only hard error is cancellation.

use thiserror::Error;

/// Result type alias for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can abort a scan
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The scan was cancelled through its [`CancelToken`](crate::CancelToken)
    #[error("Scan cancelled")]
    Cancelled,
}
