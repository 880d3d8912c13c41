// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostics Infrastructure
//!
//! This module provides the diagnostic pipeline for XML views.
//!
//! ## Overview
//!
//! Three document-level checks run independently, so one failing check
//! never suppresses the findings of another:
//! - structural scan anomalies (mismatched or stray close tags,
//!   unclosed elements)
//! - a second well-formedness opinion from a streaming XML parse
//! - `xmlns` declarations whose namespace no loaded schema defines
//!
//! A fourth check walks the full element tree for attributes written
//! twice on one element, flagging the second occurrence.
//!
//! ## Architecture
//!
//! ```text
//! Document text → DiagnosticCollector → XmlDiagnostic → LSP Diagnostic → Client
//! ```
//!
//! Diagnostics carry byte offsets; the backend converts them to
//! line/character ranges against the live document before publishing.

use crate::document::Document;
use std::sync::Arc;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};
use tracing::debug;
use xmlview_lsp_scanner::{
    scan_document, CancelToken, DocumentScan, ElementNode, ScanResult, UsedNamespaces,
};
use xmlview_lsp_store::SchemaStore;

/// Diagnostic code identifying the type of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Structural anomaly found by the scanner
    NotWellFormed,

    /// Well-formedness error reported by the streaming parse
    XmlSyntax,

    /// Declared namespace with no loaded schema
    UnknownNamespace,

    /// Attribute written twice on one element
    DoubleAttribute,
}

impl DiagnosticCode {
    /// Get the string representation of this diagnostic code
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::NotWellFormed => "WELLFORMED-001",
            DiagnosticCode::XmlSyntax => "WELLFORMED-002",
            DiagnosticCode::UnknownNamespace => "NAMESPACE-001",
            DiagnosticCode::DoubleAttribute => "ATTR-001",
        }
    }

    /// Severity this code is published with
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::UnknownNamespace => DiagnosticSeverity::WARNING,
            _ => DiagnosticSeverity::ERROR,
        }
    }
}

impl From<DiagnosticCode> for NumberOrString {
    fn from(code: DiagnosticCode) -> Self {
        NumberOrString::String(code.as_str().to_string())
    }
}

/// A diagnostic with byte-offset extent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDiagnostic {
    /// Human-readable message
    pub message: String,

    /// Diagnostic code
    pub code: DiagnosticCode,

    /// Byte offset where the extent starts
    pub start: usize,

    /// Byte offset just past the extent
    pub end: usize,
}

impl XmlDiagnostic {
    /// Convert to the LSP wire representation
    pub fn to_lsp(&self, document: &Document) -> Diagnostic {
        Diagnostic {
            range: Range {
                start: document.position_of(self.start),
                end: document.position_of(self.end),
            },
            severity: Some(self.code.severity()),
            code: Some(self.code.into()),
            source: Some("xmlview-lsp".to_string()),
            message: self.message.clone(),
            ..Default::default()
        }
    }
}

/// Diagnostic collector
///
/// Runs every check over one document text against a schema store
/// snapshot.
pub struct DiagnosticCollector {
    store: Arc<SchemaStore>,
}

impl DiagnosticCollector {
    /// Create a new collector
    pub fn new(store: Arc<SchemaStore>) -> Self {
        Self { store }
    }

    /// Run all checks over a document text
    ///
    /// Only cancellation aborts collection; every other failure mode is
    /// itself a diagnostic or a logged skip.
    pub fn collect(&self, text: &str, token: &CancelToken) -> ScanResult<Vec<XmlDiagnostic>> {
        let scan = scan_document(text, token)?;

        let mut diagnostics = Vec::new();
        self.check_structure(&scan, &mut diagnostics);
        self.check_syntax(text, &mut diagnostics);
        self.check_namespaces(text, &mut diagnostics);
        for root in &scan.roots {
            Self::check_double_attributes(root, &mut diagnostics);
        }
        Ok(diagnostics)
    }

    /// Scanner anomalies, one diagnostic each
    fn check_structure(&self, scan: &DocumentScan, diagnostics: &mut Vec<XmlDiagnostic>) {
        for anomaly in &scan.anomalies {
            diagnostics.push(XmlDiagnostic {
                message: anomaly.message.clone(),
                code: DiagnosticCode::NotWellFormed,
                start: anomaly.offset,
                end: anomaly.offset + 1,
            });
        }
    }

    /// Streaming parse as a second opinion; only the first error is
    /// reported, the rest of the buffer is usually noise after it
    fn check_syntax(&self, text: &str, diagnostics: &mut Vec<XmlDiagnostic>) {
        let mut reader = quick_xml::Reader::from_str(text);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => continue,
                Err(e) => {
                    let offset = reader.buffer_position().min(text.len());
                    diagnostics.push(XmlDiagnostic {
                        message: format!("XML syntax error: {e}"),
                        code: DiagnosticCode::XmlSyntax,
                        start: offset.saturating_sub(1),
                        end: offset,
                    });
                    break;
                }
            }
        }
    }

    /// Declared namespaces the store has no schema for
    fn check_namespaces(&self, text: &str, diagnostics: &mut Vec<XmlDiagnostic>) {
        for binding in UsedNamespaces::scan(text).bindings() {
            if self.store.contains(&binding.uri) {
                continue;
            }
            debug!(uri = %binding.uri, "Namespace without schema");
            diagnostics.push(XmlDiagnostic {
                message: format!("No schema loaded for namespace '{}'", binding.uri),
                code: DiagnosticCode::UnknownNamespace,
                start: binding.offset,
                end: binding.offset + binding.len,
            });
        }
    }

    /// Attributes written twice on one element; the second occurrence is
    /// flagged
    fn check_double_attributes(element: &ElementNode, diagnostics: &mut Vec<XmlDiagnostic>) {
        let mut seen: Vec<&str> = Vec::new();
        for attribute in &element.attributes {
            if seen.contains(&attribute.name.as_str()) {
                diagnostics.push(XmlDiagnostic {
                    message: format!("Attribute '{}' is written twice", attribute.name),
                    code: DiagnosticCode::DoubleAttribute,
                    start: element.header_offset + attribute.name_start,
                    end: element.header_offset + attribute.value_end + 1,
                });
            } else {
                seen.push(&attribute.name);
            }
        }
        for child in &element.children {
            Self::check_double_attributes(child, diagnostics);
        }
    }
}
