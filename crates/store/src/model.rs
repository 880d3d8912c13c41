// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema data model
//!
//! Owned, immutable representations of the XSD constructs the resolver
//! needs. The model deliberately carries no parent or owner back-pointers;
//! resolution functions thread the owning [`Schema`] through their calls
//! instead.

use std::collections::HashMap;

/// A loaded XSD schema
///
/// Identified by its target namespace, which is the unique key in the
/// [`SchemaStore`](crate::SchemaStore). Created once per XSD file at store
/// initialization and immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// The namespace URI this schema defines (`targetNamespace` attribute)
    pub target_namespace: String,

    /// Origin label, the file name the schema was loaded from
    pub source: String,

    /// Prefix to namespace URI bindings from `xmlns:` declarations
    /// on the schema root
    pub referenced_namespaces: HashMap<String, String>,

    /// Top-level element declarations
    pub elements: Vec<ElementDecl>,

    /// Top-level complex type declarations
    pub complex_types: Vec<ComplexTypeDecl>,
}

impl Schema {
    /// Look up the namespace URI a prefix is bound to in this schema
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.referenced_namespaces.get(prefix).map(|s| s.as_str())
    }
}

/// A top-level or particle element declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    /// The element's local name
    pub name: String,

    /// Named type reference, qualified (`m:ButtonType`) or bare
    pub type_name: Option<String>,

    /// Inline anonymous type, mutually exclusive with `type_name`
    pub inline_type: Option<Box<ComplexTypeDecl>>,

    /// Reference to another named element, same or different schema
    pub ref_name: Option<String>,

    /// Text of the `annotation/documentation` node, if present
    pub documentation: Option<String>,
}

impl ElementDecl {
    /// Create a named element declaration with no type information
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            inline_type: None,
            ref_name: None,
            documentation: None,
        }
    }
}

/// A complex type declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexTypeDecl {
    /// The type's local name, empty for inline anonymous types
    pub name: String,

    /// Base type from `complexContent/extension@base`, qualified or bare
    pub base_type_name: Option<String>,

    /// Attributes declared directly on this type (own, not inherited)
    pub attributes: Vec<AttributeDecl>,

    /// Child content particles from `sequence` and `sequence/choice`
    pub content: Vec<ContentParticle>,

    /// Text of the `annotation/documentation` node, if present
    pub documentation: Option<String>,
}

impl ComplexTypeDecl {
    /// Iterate over every element declaration in this type's content,
    /// flattening choice groups
    pub fn declared_elements(&self) -> impl Iterator<Item = &ElementDecl> {
        self.content.iter().flat_map(|particle| match particle {
            ContentParticle::Element(el) => std::slice::from_ref(el).iter(),
            ContentParticle::Choice(els) => els.iter(),
        })
    }
}

/// An attribute declaration on a complex type
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    /// The attribute's local name
    pub name: String,

    /// Declared value type, if any
    pub type_name: Option<String>,

    /// Text of the `annotation/documentation` node, if present
    pub documentation: Option<String>,
}

/// A child content particle of a complex type
///
/// Only the particle shapes the resolver consumes are modeled: plain
/// elements inside `sequence` and the elements of a `sequence/choice`
/// group. Wildcards (`xs:any`) and occurrence facets are out of scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentParticle {
    /// A single element inside a sequence
    Element(ElementDecl),

    /// A choice group of elements inside a sequence
    Choice(Vec<ElementDecl>),
}
