// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Two-phase structural scan
//!
//! This module walks raw XML text with a coarse inter-tag span regex and a
//! secondary tag-header regex, maintaining an explicit stack of open
//! qualified names.
//!
//! ## Modes
//!
//! - [`scan_at_offset`]: stop at the first tag boundary past a cursor
//!   offset and return the [`FoundCursor`] describing the enclosing node.
//!   Work is bounded by the cursor offset, not the document length.
//! - [`scan_document`]: walk the whole buffer and build the root element
//!   tree plus the list of structural anomalies encountered.
//!
//! ## Malformed input policy
//!
//! The buffer is usually mid-edit, so nothing here panics or errors on bad
//! structure: malformed headers are skipped, mismatched or stray closing
//! tags are recorded as [`Anomaly`] values, unclosed elements are attached
//! best-effort at end of input, and a cursor outside any element yields a
//! placeholder result.

use crate::attributes::{scan_attributes, ScannedAttribute};
use crate::cancel::CancelToken;
use crate::error::{ScanError, ScanResult};
use crate::split_qname;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

/// Phase 1: the text between a tag's closing `>` and the next tag's `<`
static SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">[^<>]*<").unwrap());

/// Phase 2: one tag header, between `<` and `>`
///
/// Captures: closing slash, namespace prefix, local name, attribute
/// remainder, self-closing slash.
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(/?)\s*(?:([A-Za-z_][\w.\-]*):)?([A-Za-z_][\w.\-]*)(.*?)(/?)\s*$")
        .unwrap()
});

/// The XML node enclosing a cursor offset
///
/// Ephemeral, per-request value: created fresh for every completion, hover
/// or diagnostic request and owned exclusively by the request handler.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundCursor {
    /// Namespace prefix of the enclosing element, if any
    pub prefix: Option<String>,

    /// Local name of the enclosing element
    pub local_name: String,

    /// Qualified names from the document root to the enclosing element,
    /// root first, innermost last
    pub path: Vec<String>,

    /// Raw header text of the enclosing element
    pub header: String,

    /// Byte offset of the header in the document (just past `<`)
    pub header_offset: usize,

    /// Attributes of the enclosing element, offsets relative to `header`
    pub attributes: Vec<ScannedAttribute>,

    /// True when the cursor sits inside the tag header (`<tag ... |>`)
    pub is_in_element: bool,

    /// True when the cursor sits inside an attribute value
    pub is_in_attribute_value: bool,

    /// True when the cursor sits on an attribute name, before its `=`
    pub is_on_attribute_name: bool,
}

impl FoundCursor {
    /// Placeholder for a cursor outside any element
    fn placeholder() -> Self {
        Self {
            prefix: None,
            local_name: String::new(),
            path: Vec::new(),
            header: String::new(),
            header_offset: 0,
            attributes: Vec::new(),
            is_in_element: false,
            is_in_attribute_value: false,
            is_on_attribute_name: false,
        }
    }

    /// The enclosing element's qualified name
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Check whether the header already declares an attribute name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Find the attribute whose span contains a document byte offset
    pub fn attribute_at(&self, document_offset: usize) -> Option<&ScannedAttribute> {
        let rel = document_offset.checked_sub(self.header_offset)?;
        self.attributes
            .iter()
            .find(|a| a.contains_name_offset(rel) || a.contains_value_offset(rel))
    }
}

/// One element in the full-document tree built by [`scan_document`]
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Namespace prefix, if any
    pub prefix: Option<String>,

    /// Local name
    pub local_name: String,

    /// Raw header text
    pub header: String,

    /// Byte offset of the header in the document
    pub header_offset: usize,

    /// Attributes with offsets relative to `header`
    pub attributes: Vec<ScannedAttribute>,

    /// Child elements in document order
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// The element's qualified name
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// A structural problem found while scanning
///
/// Anomalies never abort the scan; they are collected for the
/// well-formedness diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    /// Human-readable description
    pub message: String,

    /// Byte offset of the offending tag header
    pub offset: usize,
}

/// Result of a whole-document scan
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentScan {
    /// Root elements in document order
    pub roots: Vec<ElementNode>,

    /// Structural anomalies encountered
    pub anomalies: Vec<Anomaly>,
}

/// Locate the XML node enclosing a byte offset
///
/// Scanning stops at the first tag boundary past `offset`; the remainder
/// of the buffer is never touched. An offset outside any element yields a
/// placeholder [`FoundCursor`] with an empty path.
pub fn scan_at_offset(text: &str, offset: usize, token: &CancelToken) -> ScanResult<FoundCursor> {
    let outcome = Scanner::new(text, Some(offset), token).run()?;
    Ok(outcome.cursor.unwrap_or_else(FoundCursor::placeholder))
}

/// Scan the whole buffer and build the root element tree
pub fn scan_document(text: &str, token: &CancelToken) -> ScanResult<DocumentScan> {
    let outcome = Scanner::new(text, None, token).run()?;
    Ok(DocumentScan {
        roots: outcome.roots,
        anomalies: outcome.anomalies,
    })
}

/// What a parsed tag header opens or closes
enum HeaderKind {
    Open,
    Close,
    SelfClose,
}

/// A tag header after the phase-2 regex
struct ParsedHeader {
    kind: HeaderKind,
    prefix: Option<String>,
    local_name: String,
}

impl ParsedHeader {
    fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// Parse one tag header, returning None when it is malformed
fn parse_header(header: &str) -> Option<ParsedHeader> {
    let caps = HEADER_RE.captures(header)?;
    let closing = !caps.get(1).map_or(true, |m| m.as_str().is_empty());
    let self_closing = !caps.get(5).map_or(true, |m| m.as_str().is_empty());
    let kind = if closing {
        HeaderKind::Close
    } else if self_closing {
        HeaderKind::SelfClose
    } else {
        HeaderKind::Open
    };
    Some(ParsedHeader {
        kind,
        prefix: caps.get(2).map(|m| m.as_str().to_string()),
        local_name: caps.get(3)?.as_str().to_string(),
    })
}

/// An element on the open stack
struct OpenElement {
    qname: String,
    node: ElementNode,
}

/// Internal result of one scan run
struct ScanOutcome {
    roots: Vec<ElementNode>,
    anomalies: Vec<Anomaly>,
    cursor: Option<FoundCursor>,
}

/// The scan state machine
struct Scanner<'t> {
    text: &'t str,
    stop: Option<usize>,
    token: &'t CancelToken,
    stack: Vec<OpenElement>,
    roots: Vec<ElementNode>,
    anomalies: Vec<Anomaly>,
    in_comment: bool,
}

impl<'t> Scanner<'t> {
    fn new(text: &'t str, stop: Option<usize>, token: &'t CancelToken) -> Self {
        Self {
            text,
            stop,
            token,
            stack: Vec::new(),
            roots: Vec::new(),
            anomalies: Vec::new(),
            in_comment: false,
        }
    }

    fn run(mut self) -> ScanResult<ScanOutcome> {
        let first = match self.text.find('<') {
            Some(i) => i,
            None => {
                let cursor = self.stop.map(|_| self.body_cursor());
                return Ok(self.finish_with(cursor));
            }
        };
        let mut header_start = first + 1;

        let text = self.text;
        for m in SPAN_RE.find_iter(text) {
            let (gt, span_end) = (m.start(), m.end());
            if self.token.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            // A '>' before the first '<' is stray text, not a tag boundary
            if gt < header_start {
                continue;
            }

            // Cursor strictly before this tag: it sits in the text content
            // of whatever is currently open
            if let Some(off) = self.stop {
                if off + 1 < header_start {
                    let cursor = self.body_cursor();
                    return Ok(self.finish_with(Some(cursor)));
                }
            }

            let header = &self.text[header_start..gt];
            if self.skip_non_element(header) {
                header_start = span_end;
                continue;
            }

            // Cursor inside this header, '<' and '>' inclusive
            if let Some(off) = self.stop {
                if off <= gt {
                    let cursor = self.header_cursor(header, header_start, off);
                    return Ok(self.finish_with(Some(cursor)));
                }
            }

            self.apply_header(header, header_start);

            // Cursor inside the span between this '>' and the next '<'
            if let Some(off) = self.stop {
                if off < span_end {
                    let cursor = self.body_cursor();
                    return Ok(self.finish_with(Some(cursor)));
                }
            }

            header_start = span_end;
        }

        let tail_cursor = self.tail(header_start);
        let cursor = match (self.stop, tail_cursor) {
            (Some(_), Some(cursor)) => Some(cursor),
            (Some(_), None) => Some(self.body_cursor()),
            (None, _) => None,
        };
        Ok(self.finish_with(cursor))
    }

    /// Process the final tag header, which has no following inter-tag span
    fn tail(&mut self, header_start: usize) -> Option<FoundCursor> {
        if header_start >= self.text.len() {
            return None;
        }
        let rest = &self.text[header_start..];
        let header_end = rest.find('>').map(|i| header_start + i);
        let header = &self.text[header_start..header_end.unwrap_or(self.text.len())];
        if header.is_empty() || self.skip_non_element(header) {
            return None;
        }

        let cursor = match self.stop {
            Some(off) if off <= header_end.unwrap_or(self.text.len()) => {
                Some(self.header_cursor(header, header_start, off))
            }
            _ => None,
        };

        // An unterminated header (no closing '>') is the edit point itself;
        // it is classified for the cursor but never enters the tree
        if header_end.is_some() {
            self.apply_header(header, header_start);
        }
        cursor
    }

    /// Track comment state and skip processing instructions and doctypes
    fn skip_non_element(&mut self, header: &str) -> bool {
        if self.in_comment {
            if header.ends_with("--") {
                self.in_comment = false;
            }
            return true;
        }
        if let Some(body) = header.strip_prefix("!--") {
            if !body.ends_with("--") {
                self.in_comment = true;
            }
            return true;
        }
        header.starts_with('!') || header.starts_with('?')
    }

    /// Push, pop or attach according to one tag header
    fn apply_header(&mut self, header: &str, header_start: usize) {
        let parsed = match parse_header(header) {
            Some(parsed) => parsed,
            None => {
                debug!(offset = header_start, "Skipping malformed tag header");
                self.anomalies.push(Anomaly {
                    message: "Malformed tag header".to_string(),
                    offset: header_start,
                });
                return;
            }
        };

        match parsed.kind {
            HeaderKind::Close => match self.stack.pop() {
                Some(open) => {
                    if open.qname != parsed.qualified_name() {
                        self.anomalies.push(Anomaly {
                            message: format!(
                                "Closing tag </{}> does not match open element <{}>",
                                parsed.qualified_name(),
                                open.qname
                            ),
                            offset: header_start,
                        });
                    }
                    self.attach(open.node);
                }
                None => {
                    error!(
                        offset = header_start,
                        tag = %parsed.qualified_name(),
                        "Closing tag at document root with no open element"
                    );
                    self.anomalies.push(Anomaly {
                        message: format!(
                            "Closing tag </{}> has no matching open element",
                            parsed.qualified_name()
                        ),
                        offset: header_start,
                    });
                }
            },
            HeaderKind::SelfClose => {
                let node = make_node(&parsed, header, header_start);
                self.attach(node);
            }
            HeaderKind::Open => {
                let qname = parsed.qualified_name();
                let node = make_node(&parsed, header, header_start);
                self.stack.push(OpenElement { qname, node });
            }
        }
    }

    /// Attach a finished element to its parent, or to the root list
    fn attach(&mut self, node: ElementNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.node.children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Build the cursor result for an offset inside a tag header
    fn header_cursor(&self, header: &str, header_start: usize, off: usize) -> FoundCursor {
        let attributes = scan_attributes(header);
        let rel = off.saturating_sub(header_start);
        let is_in_attribute_value = attributes.iter().any(|a| a.contains_value_offset(rel));
        let is_on_attribute_name = attributes.iter().any(|a| a.contains_name_offset(rel));
        let mut path: Vec<String> = self.stack.iter().map(|o| o.qname.clone()).collect();

        let (prefix, local_name) = match parse_header(header) {
            Some(parsed) => {
                if !matches!(parsed.kind, HeaderKind::Close) {
                    path.push(parsed.qualified_name());
                }
                (parsed.prefix, parsed.local_name)
            }
            None => {
                debug!(offset = header_start, "Cursor in malformed tag header");
                (None, String::new())
            }
        };

        FoundCursor {
            prefix,
            local_name,
            path,
            header: header.to_string(),
            header_offset: header_start,
            attributes,
            is_in_element: true,
            is_in_attribute_value,
            is_on_attribute_name,
        }
    }

    /// Build the cursor result for an offset in element text content
    fn body_cursor(&self) -> FoundCursor {
        match self.stack.last() {
            Some(open) => {
                let (prefix, local_name) = split_qname(&open.qname);
                FoundCursor {
                    prefix: prefix.map(str::to_string),
                    local_name: local_name.to_string(),
                    path: self.stack.iter().map(|o| o.qname.clone()).collect(),
                    header: open.node.header.clone(),
                    header_offset: open.node.header_offset,
                    attributes: open.node.attributes.clone(),
                    is_in_element: false,
                    is_in_attribute_value: false,
                    is_on_attribute_name: false,
                }
            }
            None => {
                debug!("Cursor outside any element, returning placeholder");
                FoundCursor::placeholder()
            }
        }
    }

    /// Drain still-open elements and produce the outcome
    fn finish_with(mut self, cursor: Option<FoundCursor>) -> ScanOutcome {
        while let Some(open) = self.stack.pop() {
            self.anomalies.push(Anomaly {
                message: format!("Unclosed element <{}>", open.qname),
                offset: open.node.header_offset,
            });
            self.attach(open.node);
        }
        ScanOutcome {
            roots: self.roots,
            anomalies: self.anomalies,
            cursor,
        }
    }
}

/// Build a tree node from a parsed header
fn make_node(parsed: &ParsedHeader, header: &str, header_start: usize) -> ElementNode {
    ElementNode {
        prefix: parsed.prefix.clone(),
        local_name: parsed.local_name.clone(),
        header: header.to_string(),
        header_offset: header_start,
        attributes: scan_attributes(header),
        children: Vec::new(),
    }
}
