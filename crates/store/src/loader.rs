// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # XSD file parsing
//!
//! This module turns the text of one XSD file into a [`Schema`].
//!
//! ## Overview
//!
//! The parse walks the roxmltree document once, matching XSD vocabulary
//! nodes by resolved namespace URI. Only the constructs the resolver
//! consumes are extracted:
//! - top-level `element` declarations (name, type, ref, inline type)
//! - top-level `complexType` declarations
//! - `complexContent/extension` base types and extension bodies
//! - `sequence` and `sequence/choice` content particles
//! - `attribute` declarations and `annotation/documentation` text
//!
//! Anything else (facets, wildcards, identity constraints) is ignored.

use crate::error::LoadError;
use crate::model::{AttributeDecl, ComplexTypeDecl, ContentParticle, ElementDecl, Schema};
use std::collections::HashMap;
use tracing::debug;

/// The namespace URI of the XSD vocabulary itself
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Parse one XSD file into a [`Schema`]
///
/// # Arguments
///
/// - `source`: origin label for the schema (file name)
/// - `text`: the raw XSD file content
///
/// # Errors
///
/// - [`LoadError::Xml`] if the file is not well-formed XML
/// - [`LoadError::MissingTargetNamespace`] if the root has no
///   `targetNamespace` attribute
/// - [`LoadError::MissingXsdNamespace`] if no `xmlns:` binding declares
///   the XSD namespace
/// - [`LoadError::DefaultXsdPrefix`] if the XSD namespace is bound to the
///   default (empty) prefix
pub fn parse_schema(source: &str, text: &str) -> Result<Schema, LoadError> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();

    let target_namespace = root
        .attribute("targetNamespace")
        .ok_or(LoadError::MissingTargetNamespace)?
        .to_string();

    let mut referenced_namespaces = HashMap::new();
    let mut xsd_prefixed = false;
    for ns in root.namespaces() {
        match ns.name() {
            Some(prefix) => {
                if ns.uri() == XSD_NAMESPACE {
                    xsd_prefixed = true;
                }
                referenced_namespaces.insert(prefix.to_string(), ns.uri().to_string());
            }
            None => {
                if ns.uri() == XSD_NAMESPACE {
                    return Err(LoadError::DefaultXsdPrefix);
                }
                referenced_namespaces.insert(String::new(), ns.uri().to_string());
            }
        }
    }
    if !xsd_prefixed {
        return Err(LoadError::MissingXsdNamespace);
    }

    let mut elements = Vec::new();
    let mut complex_types = Vec::new();

    for child in root.children().filter(|n| n.is_element()) {
        if !is_xsd(&child) {
            continue;
        }
        match child.tag_name().name() {
            "element" => {
                if let Some(element) = parse_element(&child) {
                    elements.push(element);
                }
            }
            "complexType" => {
                if let Some(ty) = parse_complex_type(&child) {
                    complex_types.push(ty);
                }
            }
            other => debug!(source, construct = other, "Skipping top-level construct"),
        }
    }

    Ok(Schema {
        target_namespace,
        source: source.to_string(),
        referenced_namespaces,
        elements,
        complex_types,
    })
}

/// Check whether a node belongs to the XSD vocabulary
fn is_xsd(node: &roxmltree::Node) -> bool {
    node.tag_name().namespace() == Some(XSD_NAMESPACE)
}

/// Parse an `element` declaration
///
/// Returns None for declarations without a `name` or `ref` attribute;
/// those cannot be addressed by the resolver.
fn parse_element(node: &roxmltree::Node) -> Option<ElementDecl> {
    let name = node.attribute("name");
    let ref_name = node.attribute("ref");
    if name.is_none() && ref_name.is_none() {
        debug!("Skipping element declaration without name or ref");
        return None;
    }

    let inline_type = node
        .children()
        .filter(|n| n.is_element() && is_xsd(n))
        .find(|n| n.tag_name().name() == "complexType")
        .and_then(|n| parse_complex_type(&n))
        .map(Box::new);

    // Ref-only particles still get an addressable local name
    let name = name
        .or_else(|| ref_name.map(|r| r.rsplit(':').next().unwrap_or(r)))
        .unwrap_or_default();

    Some(ElementDecl {
        name: name.to_string(),
        type_name: node.attribute("type").map(str::to_string),
        inline_type,
        ref_name: ref_name.map(str::to_string),
        documentation: parse_documentation(node),
    })
}

/// Parse a `complexType` declaration
///
/// Collects attributes and content particles from the type body itself and
/// from a `complexContent/extension` body when present. The extension's
/// `base` attribute becomes the type's base type name.
fn parse_complex_type(node: &roxmltree::Node) -> Option<ComplexTypeDecl> {
    let mut ty = ComplexTypeDecl {
        name: node.attribute("name").unwrap_or_default().to_string(),
        base_type_name: None,
        attributes: Vec::new(),
        content: Vec::new(),
        documentation: parse_documentation(node),
    };

    parse_type_body(node, &mut ty);

    if let Some(complex_content) = node
        .children()
        .filter(|n| n.is_element() && is_xsd(n))
        .find(|n| n.tag_name().name() == "complexContent")
    {
        if let Some(extension) = complex_content
            .children()
            .filter(|n| n.is_element() && is_xsd(n))
            .find(|n| n.tag_name().name() == "extension")
        {
            ty.base_type_name = extension.attribute("base").map(str::to_string);
            parse_type_body(&extension, &mut ty);
        }
    }

    Some(ty)
}

/// Collect attributes and sequence particles from a type or extension body
fn parse_type_body(node: &roxmltree::Node, ty: &mut ComplexTypeDecl) {
    for child in node.children().filter(|n| n.is_element() && is_xsd(n)) {
        match child.tag_name().name() {
            "attribute" => {
                if let Some(attr) = parse_attribute(&child) {
                    ty.attributes.push(attr);
                }
            }
            "sequence" => parse_sequence(&child, &mut ty.content),
            _ => {}
        }
    }
}

/// Parse a `sequence` body into content particles
fn parse_sequence(node: &roxmltree::Node, content: &mut Vec<ContentParticle>) {
    for child in node.children().filter(|n| n.is_element() && is_xsd(n)) {
        match child.tag_name().name() {
            "element" => {
                if let Some(element) = parse_element(&child) {
                    content.push(ContentParticle::Element(element));
                }
            }
            "choice" => {
                let choices: Vec<ElementDecl> = child
                    .children()
                    .filter(|n| n.is_element() && is_xsd(n))
                    .filter(|n| n.tag_name().name() == "element")
                    .filter_map(|n| parse_element(&n))
                    .collect();
                if !choices.is_empty() {
                    content.push(ContentParticle::Choice(choices));
                }
            }
            _ => {}
        }
    }
}

/// Parse an `attribute` declaration
fn parse_attribute(node: &roxmltree::Node) -> Option<AttributeDecl> {
    let name = node.attribute("name")?;
    Some(AttributeDecl {
        name: name.to_string(),
        type_name: node.attribute("type").map(str::to_string),
        documentation: parse_documentation(node),
    })
}

/// Extract the text of an `annotation/documentation` child, if present
fn parse_documentation(node: &roxmltree::Node) -> Option<String> {
    let annotation = node
        .children()
        .filter(|n| n.is_element() && is_xsd(n))
        .find(|n| n.tag_name().name() == "annotation")?;
    let documentation = annotation
        .children()
        .filter(|n| n.is_element() && is_xsd(n))
        .find(|n| n.tag_name().name() == "documentation")?;
    documentation
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
