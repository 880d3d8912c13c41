// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion rendering
//!
//! This module converts schema declarations to LSP completion items.
//! Items leave here fully populated; the `completionItem/resolve`
//! round-trip is a passthrough.

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind,
};
use xmlview_lsp_resolver::OwnedAttribute;
use xmlview_lsp_store::ElementDecl;

/// Completion renderer
///
/// Converts schema declarations to LSP CompletionItem representations.
pub struct CompletionRenderer;

impl CompletionRenderer {
    /// Render an attribute completion item
    ///
    /// The snippet places the cursor between the quotes; `detail` names
    /// the type the attribute is declared on, so inherited attributes are
    /// attributable to their ancestor.
    pub fn attribute_item(owned: &OwnedAttribute) -> CompletionItem {
        let name = &owned.attribute.name;
        CompletionItem {
            label: name.clone(),
            kind: Some(CompletionItemKind::PROPERTY),
            detail: Some(owned.owner.clone()),
            documentation: owned
                .attribute
                .documentation
                .as_ref()
                .map(|doc| Self::markdown(doc)),
            insert_text: Some(format!("{name}=\"$0\"")),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            ..Default::default()
        }
    }

    /// Render a child-element completion item
    ///
    /// # Arguments
    ///
    /// - `element`: the permitted element's declaration
    /// - `prefix`: the document prefix of its namespace, if any
    /// - `namespace`: the declaring schema's target namespace
    pub fn element_item(
        element: &ElementDecl,
        prefix: Option<&str>,
        namespace: &str,
    ) -> CompletionItem {
        let qualified = match prefix {
            Some(prefix) => format!("{}:{}", prefix, element.name),
            None => element.name.clone(),
        };
        CompletionItem {
            label: qualified.clone(),
            kind: Some(CompletionItemKind::CLASS),
            detail: Some(namespace.to_string()),
            documentation: element
                .documentation
                .as_ref()
                .map(|doc| Self::markdown(doc)),
            insert_text: Some(format!("<{qualified} $0></{qualified}>")),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            ..Default::default()
        }
    }

    fn markdown(text: &str) -> Documentation {
        Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: text.to_string(),
        })
    }
}
