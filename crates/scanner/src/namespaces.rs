// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Instance-document namespace bindings
//!
//! Collects the `xmlns:` prefix bindings declared in the *instance*
//! document being edited (not in a schema). The scan is a cheap regex pass
//! and is recomputed on every request: edits can change prefix bindings at
//! any point, so the result is never cached across document versions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `xmlns="uri"` and `xmlns:prefix="uri"` declarations
static XMLNS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"xmlns(?::([A-Za-z_][\w.\-]*))?\s*=\s*["']([^"']*)["']"#).unwrap());

/// One `xmlns` declaration found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// Declared prefix, None for the default namespace
    pub prefix: Option<String>,

    /// Bound namespace URI
    pub uri: String,

    /// Byte offset of the `xmlns` token in the document
    pub offset: usize,

    /// Byte length of the whole declaration
    pub len: usize,
}

/// Per-document mapping from namespace prefix to namespace URI
///
/// Built fresh per request from the current document text.
#[derive(Debug, Clone, Default)]
pub struct UsedNamespaces {
    bindings: Vec<NamespaceBinding>,
}

impl UsedNamespaces {
    /// Scan a document for `xmlns` declarations
    pub fn scan(text: &str) -> Self {
        let bindings = XMLNS_RE
            .captures_iter(text)
            .map(|caps| {
                let whole = caps.get(0).expect("whole match");
                NamespaceBinding {
                    prefix: caps.get(1).map(|m| m.as_str().to_string()),
                    uri: caps
                        .get(2)
                        .expect("xmlns regex has a uri group")
                        .as_str()
                        .to_string(),
                    offset: whole.start(),
                    len: whole.len(),
                }
            })
            .collect();
        Self { bindings }
    }

    /// Look up the namespace URI bound to a prefix
    ///
    /// `None` looks up the default namespace.
    pub fn uri_for(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.prefix.as_deref() == prefix)
            .map(|b| b.uri.as_str())
    }

    /// Look up the prefix a namespace URI is bound to
    ///
    /// Returns the first non-default binding for the URI.
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.uri == uri && b.prefix.is_some())
            .and_then(|b| b.prefix.as_deref())
    }

    /// All declarations in document order
    pub fn bindings(&self) -> &[NamespaceBinding] {
        &self.bindings
    }

    /// Check whether any declarations were found
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
