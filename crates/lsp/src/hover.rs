// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Hover Information Provider
//!
//! This module provides hover functionality for XML views using the
//! structural scan and schema annotations.
//!
//! ## Architecture
//!
//! The hover engine:
//! 1. Scans the document to locate the cursor
//! 2. Cursor on an attribute → that attribute's documentation from the
//!    resolved type (inherited attributes included), range bound to the
//!    attribute's span
//! 3. Cursor on the element otherwise → the element declaration's
//!    documentation
//!
//! ## Example
//!
//! ```xml
//! <m:Button te|xt="Go"/>
//! ```
//!
//! Hovering over `text`, the engine resolves `ButtonType`, finds the
//! `text` attribute declaration and returns its `annotation/documentation`
//! text as markdown.

use crate::document::Document;
use std::sync::Arc;
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Range};
use tracing::debug;
use xmlview_lsp_resolver::{attributes_of, element_at_path, type_at_path, ResolveError};
use xmlview_lsp_scanner::{scan_at_offset, CancelToken, ScanError, UsedNamespaces};
use xmlview_lsp_store::SchemaStore;

/// Errors that can occur during hover
#[derive(Debug, thiserror::Error)]
pub enum HoverError {
    /// Structural scan error
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Type resolution error
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Hover engine for XML views
///
/// Provides documentation from schema annotations at the cursor.
pub struct HoverEngine {
    store: Arc<SchemaStore>,
}

impl HoverEngine {
    /// Create a new hover engine
    pub fn new(store: Arc<SchemaStore>) -> Self {
        Self { store }
    }

    /// Get hover information for a byte offset in a document
    ///
    /// # Returns
    ///
    /// - `Ok(Some(hover))` - Documentation available at the cursor
    /// - `Ok(None)` - Nothing documented here
    pub fn hover(
        &self,
        document: &Document,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Option<Hover>, HoverError> {
        let text = document.get_content();
        let cursor = scan_at_offset(&text, offset, token)?;
        if cursor.path.is_empty() {
            return Ok(None);
        }
        let used = UsedNamespaces::scan(&text);

        if let Some(attribute) = cursor.attribute_at(offset) {
            let Some(resolved) = type_at_path(&self.store, &used, &cursor.path, token)? else {
                return Ok(None);
            };
            let attributes = attributes_of(&self.store, &resolved)?;
            let Some(owned) = attributes
                .iter()
                .find(|owned| owned.attribute.name == attribute.name)
            else {
                debug!(attribute = %attribute.name, "Attribute not declared, no hover");
                return Ok(None);
            };

            let mut value = format!("**{}**", owned.attribute.name);
            if let Some(type_name) = &owned.attribute.type_name {
                value.push_str(&format!(" `{type_name}`"));
            }
            value.push_str(&format!(" — {}", owned.owner));
            if let Some(doc) = &owned.attribute.documentation {
                value.push_str("\n\n");
                value.push_str(doc);
            }

            let start = cursor.header_offset + attribute.name_start;
            let end = cursor.header_offset + attribute.value_end + 1;
            return Ok(Some(Hover {
                contents: Self::markdown(value),
                range: Some(Range {
                    start: document.position_of(start),
                    end: document.position_of(end.min(text.len())),
                }),
            }));
        }

        let Some(found) = element_at_path(&self.store, &used, &cursor.path, token)? else {
            return Ok(None);
        };
        let Some(doc) = &found.element.documentation else {
            return Ok(None);
        };

        let value = format!("**{}**\n\n{}", cursor.qualified_name(), doc);
        Ok(Some(Hover {
            contents: Self::markdown(value),
            range: None,
        }))
    }

    fn markdown(value: String) -> HoverContents {
        HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Url;
    use xmlview_lsp_test_utils::fixture_store;

    fn doc(text: &str) -> Document {
        let uri = Url::parse("file:///test.view.xml").unwrap();
        Document::new(uri, text, 1, "xml".to_string())
    }

    fn markdown_value(hover: &Hover) -> &str {
        match &hover.contents {
            HoverContents::Markup(markup) => &markup.value,
            other => panic!("Expected markup contents, found {other:?}"),
        }
    }

    #[test]
    fn test_hover_attribute_documentation() {
        let engine = HoverEngine::new(Arc::new(fixture_store()));
        let text = r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m">
  <mvc:content>
    <m:Button text="Go"/>
  </mvc:content>
</mvc:View>"#;
        let document = doc(text);
        let offset = text.find("text=").unwrap() + 1;

        let hover = engine
            .hover(&document, offset, &CancelToken::new())
            .unwrap()
            .unwrap();
        let value = markdown_value(&hover);
        assert!(value.contains("**text**"));
        assert!(value.contains("The text shown on the button."));
        assert!(value.contains("ButtonType"));

        // Range covers the attribute, starting at its name
        let range = hover.range.unwrap();
        assert_eq!(range.start.line, 2);
        let name_col = text.lines().nth(2).unwrap().find("text").unwrap();
        assert_eq!(range.start.character, name_col as u32);
    }

    #[test]
    fn test_hover_inherited_attribute() {
        let engine = HoverEngine::new(Arc::new(fixture_store()));
        let text = r#"<m:Button xmlns:m="sap.m" id="b1"/>"#;
        let document = doc(text);
        let offset = text.find("id=").unwrap() + 1;

        let hover = engine
            .hover(&document, offset, &CancelToken::new())
            .unwrap()
            .unwrap();
        let value = markdown_value(&hover);
        assert!(value.contains("Unique control identifier."));
        assert!(value.contains("ControlType"));
    }

    #[test]
    fn test_hover_element_documentation() {
        let engine = HoverEngine::new(Arc::new(fixture_store()));
        let text = r#"<m:Button xmlns:m="sap.m" text="Go">Go</m:Button>"#;
        let document = doc(text);
        // Cursor in the element body, not on any attribute
        let offset = text.find(">Go<").unwrap() + 2;

        let hover = engine
            .hover(&document, offset, &CancelToken::new())
            .unwrap()
            .unwrap();
        assert!(markdown_value(&hover).contains("A clickable button control."));
        assert!(hover.range.is_none());
    }

    #[test]
    fn test_hover_unknown_attribute() {
        let engine = HoverEngine::new(Arc::new(fixture_store()));
        let text = r#"<m:Button xmlns:m="sap.m" nosuch="1"/>"#;
        let document = doc(text);
        let offset = text.find("nosuch").unwrap() + 1;

        let hover = engine
            .hover(&document, offset, &CancelToken::new())
            .unwrap();
        assert!(hover.is_none());
    }
}
