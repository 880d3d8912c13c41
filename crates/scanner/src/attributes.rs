// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Attribute sub-scan
//!
//! Given the raw text of a tag header, this module produces the ordered
//! attribute list with byte offsets.
//!
//! A regex locates `name = quote` openings; the matching closing quote is
//! then found by walking forward character-by-character from after the
//! opening quote. The walk is required because attribute values may contain
//! the other quote kind (`text="it's"`) or may be unterminated mid-edit, in
//! which case the value runs to the end of the header instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an attribute opening: name, `=`, opening quote
static ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_][\w.:\-]*)\s*=\s*(["'])"#).unwrap());

/// One attribute found in a tag header
///
/// All offsets are byte offsets relative to the header string the scan ran
/// over. `value_end` points at the closing quote, or at the end of the
/// header for an unterminated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedAttribute {
    /// Attribute name as written, including any namespace prefix
    pub name: String,

    /// Attribute value without quotes
    pub value: String,

    /// Offset of the first character of the name
    pub name_start: usize,

    /// Offset just past the last character of the name
    pub name_end: usize,

    /// Offset of the first character of the value (after the opening quote)
    pub value_start: usize,

    /// Offset of the closing quote, or of the header end if unterminated
    pub value_end: usize,
}

impl ScannedAttribute {
    /// Check whether a header-relative offset falls inside the value span
    pub fn contains_value_offset(&self, offset: usize) -> bool {
        offset >= self.value_start && offset <= self.value_end
    }

    /// Check whether a header-relative offset falls on the name, before `=`
    pub fn contains_name_offset(&self, offset: usize) -> bool {
        offset >= self.name_start && offset <= self.name_end
    }
}

/// Scan a tag header for attributes
///
/// Produces the ordered sequence of attributes with their byte spans.
/// Matches that begin inside a previous attribute's value are skipped so
/// that `name='...'` patterns embedded in values are not misread as
/// attributes.
pub fn scan_attributes(header: &str) -> Vec<ScannedAttribute> {
    let mut attributes = Vec::new();
    let mut scanned_until = 0usize;

    for caps in ATTR_RE.captures_iter(header) {
        let name = caps.get(1).expect("attribute regex has a name group");
        if name.start() < scanned_until {
            continue;
        }

        let quote = caps.get(2).expect("attribute regex has a quote group");
        let quote_char = quote.as_str().chars().next().expect("quote is one char");

        let value_start = quote.end();
        let mut value_end = header.len();
        for (i, c) in header[value_start..].char_indices() {
            if c == quote_char {
                value_end = value_start + i;
                break;
            }
        }

        attributes.push(ScannedAttribute {
            name: name.as_str().to_string(),
            value: header[value_start..value_end].to_string(),
            name_start: name.start(),
            name_end: name.end(),
            value_start,
            value_end,
        });

        scanned_until = value_end.saturating_add(1);
    }

    attributes
}
