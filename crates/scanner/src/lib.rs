// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Cursor-Aware Structural Scanner
//!
//! This crate walks raw XML text and locates the element or attribute
//! enclosing an arbitrary cursor offset.
//!
//! ## Overview
//!
//! The scanner is not a DOM parser. Documents arrive keystroke-by-keystroke
//! and are frequently invalid past the edit point, so the scan must tolerate
//! malformed trailing content and must not cost more than the distance to
//! the cursor. The design is a two-phase regex walk:
//!
//! 1. a coarse regex matches inter-tag spans (the `>...<` text between a
//!    tag's closing `>` and the next tag's opening `<`)
//! 2. the tag header captured between span boundaries is re-parsed with a
//!    second regex extracting the closing-slash flag, namespace prefix,
//!    local name, attribute remainder and self-closing flag
//!
//! Ancestry is tracked with an explicit stack of open qualified names, not
//! a tree. When a stop offset is given, scanning terminates at the first
//! tag boundary past it and returns a [`FoundCursor`] without touching the
//! rest of the buffer.
//!
//! ## Modules
//!
//! - [`scan`]: the two-phase walk, [`FoundCursor`] and the full-document
//!   element tree
//! - [`attributes`]: the attribute sub-scan over a tag header string
//! - [`namespaces`]: the per-document `xmlns:` prefix binding scan
//! - [`cancel`]: the cancellation token threaded through scan loops

pub mod attributes;
pub mod cancel;
pub mod error;
pub mod namespaces;
pub mod scan;

pub use attributes::{scan_attributes, ScannedAttribute};
pub use cancel::CancelToken;
pub use error::{ScanError, ScanResult};
pub use namespaces::{NamespaceBinding, UsedNamespaces};
pub use scan::{scan_at_offset, scan_document, Anomaly, DocumentScan, ElementNode, FoundCursor};

/// Split a qualified name into its optional prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("m:Button"), (Some("m"), "Button"));
        assert_eq!(split_qname("View"), (None, "View"));
    }
}
