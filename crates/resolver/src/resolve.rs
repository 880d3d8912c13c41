// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Element type resolution
//!
//! This module resolves an element declaration to its complex type and
//! walks base-type chains, following qualified names across schemas.
//!
//! ## Qualified name lookup
//!
//! A type or ref name may carry a prefix (`m:ButtonType`). The prefix is
//! resolved against the *referencing schema's own* `xmlns:` bindings; a
//! prefix denoting a foreign namespace recurses into that schema through
//! the store. A namespace absent from the store is a recoverable
//! [`ResolveError::SchemaNotFound`].

use crate::error::{ResolveError, ResolveResult};
use std::collections::HashSet;
use tracing::debug;
use xmlview_lsp_scanner::split_qname;
use xmlview_lsp_store::{AttributeDecl, ComplexTypeDecl, ElementDecl, Schema, SchemaStore};

/// A complex type paired with the schema that declares it
///
/// The pair replaces owner back-pointers on model nodes: resolution
/// results always carry their owning schema explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedType<'a> {
    /// The schema the type is declared in
    pub schema: &'a Schema,

    /// The type declaration itself
    pub ty: &'a ComplexTypeDecl,
}

impl ResolvedType<'_> {
    /// Clark-notation qualified name, `{namespace}LocalName`
    pub fn qualified_name(&self) -> String {
        format!("{{{}}}{}", self.schema.target_namespace, self.ty.name)
    }
}

/// An attribute tagged with the type that declares it
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedAttribute {
    /// The attribute declaration
    pub attribute: AttributeDecl,

    /// Local name of the declaring type
    pub owner: String,
}

/// Resolve a qualified name to its owning schema and local name
///
/// A bare name, or a prefix bound to the schema's own target namespace,
/// stays in `schema`; a foreign prefix crosses into the referenced schema
/// through the store.
pub fn schema_for_qname<'a, 'q>(
    store: &'a SchemaStore,
    schema: &'a Schema,
    qname: &'q str,
) -> ResolveResult<(&'a Schema, &'q str)> {
    let (prefix, local) = split_qname(qname);
    let Some(prefix) = prefix else {
        return Ok((schema, local));
    };

    let Some(uri) = schema.namespace_for_prefix(prefix) else {
        return Err(ResolveError::UnknownPrefix {
            prefix: prefix.to_string(),
            schema: schema.target_namespace.clone(),
        });
    };

    if uri == schema.target_namespace {
        return Ok((schema, local));
    }

    match store.get(uri) {
        Some(target) => Ok((target, local)),
        None => Err(ResolveError::SchemaNotFound {
            namespace: uri.to_string(),
        }),
    }
}

/// Resolve an element declaration to its complex type
///
/// Follows `ref` indirection first, then the element's inline type, then
/// its named type reference. Returns `Ok(None)` when the element has no
/// resolvable complex type (best-effort degradation for simple-typed or
/// untyped elements).
///
/// Idempotent: resolving the same element/schema pair twice yields
/// structurally equal results.
pub fn resolve_element_type<'a>(
    store: &'a SchemaStore,
    schema: &'a Schema,
    element: &'a ElementDecl,
) -> ResolveResult<Option<ResolvedType<'a>>> {
    if let Some(ref_name) = &element.ref_name {
        let (target_schema, local) = schema_for_qname(store, schema, ref_name)?;
        return match store.find_element(target_schema, local) {
            Some(target) => resolve_element_type(store, target_schema, target),
            None => {
                debug!(
                    r#ref = %ref_name,
                    schema = %target_schema.target_namespace,
                    "Referenced element not declared, degrading to no type"
                );
                Ok(None)
            }
        };
    }

    if let Some(inline) = &element.inline_type {
        return Ok(Some(ResolvedType { schema, ty: inline }));
    }

    if let Some(type_name) = &element.type_name {
        let (target_schema, local) = schema_for_qname(store, schema, type_name)?;
        return Ok(store
            .find_complex_type(target_schema, local)
            .map(|ty| ResolvedType {
                schema: target_schema,
                ty,
            }));
    }

    Ok(None)
}

/// Walk a type's base-type chain, nearest ancestor first
///
/// A type with no `complexContent/extension` yields an empty chain. A
/// base type whose declaration is missing from its schema ends the chain
/// (tolerated, logged); a chain that revisits a type fails fast with
/// [`ResolveError::CyclicType`].
pub fn base_types<'a>(
    store: &'a SchemaStore,
    resolved: &ResolvedType<'a>,
) -> ResolveResult<Vec<ResolvedType<'a>>> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(resolved.qualified_name());

    let mut current = *resolved;
    while let Some(base_name) = &current.ty.base_type_name {
        let (base_schema, local) = schema_for_qname(store, current.schema, base_name)?;
        let Some(base_ty) = store.find_complex_type(base_schema, local) else {
            debug!(
                base = %base_name,
                schema = %base_schema.target_namespace,
                "Base type not declared, ending chain"
            );
            break;
        };

        let base = ResolvedType {
            schema: base_schema,
            ty: base_ty,
        };
        if !visited.insert(base.qualified_name()) {
            return Err(ResolveError::CyclicType {
                type_name: base.qualified_name(),
            });
        }
        chain.push(base);
        current = base;
    }
    Ok(chain)
}

/// Collect a type's attributes, inherited first, own last
///
/// Inherited attributes come from the base chain walked most distant
/// ancestor down; every attribute is tagged with the local name of the
/// type that declares it.
pub fn attributes_of(
    store: &SchemaStore,
    resolved: &ResolvedType<'_>,
) -> ResolveResult<Vec<OwnedAttribute>> {
    let chain = base_types(store, resolved)?;

    let mut attributes = Vec::new();
    for base in chain.iter().rev() {
        for attr in &base.ty.attributes {
            attributes.push(OwnedAttribute {
                attribute: attr.clone(),
                owner: base.ty.name.clone(),
            });
        }
    }
    for attr in &resolved.ty.attributes {
        attributes.push(OwnedAttribute {
            attribute: attr.clone(),
            owner: resolved.ty.name.clone(),
        });
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(sources: &[(&str, &str)]) -> SchemaStore {
        let mut store = SchemaStore::new();
        for (name, text) in sources {
            store.load_source(name, text).unwrap();
        }
        store
    }

    const M_XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                xmlns:m="sap.m" xmlns:core="sap.ui.core"
                targetNamespace="sap.m">
      <xsd:complexType name="ButtonType">
        <xsd:complexContent>
          <xsd:extension base="core:ControlType">
            <xsd:attribute name="text" type="xsd:string"/>
          </xsd:extension>
        </xsd:complexContent>
      </xsd:complexType>
      <xsd:element name="Button" type="m:ButtonType"/>
      <xsd:element name="PrimaryButton" ref="m:Button"/>
    </xsd:schema>"#;

    const CORE_XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                xmlns:core="sap.ui.core"
                targetNamespace="sap.ui.core">
      <xsd:complexType name="ObjectType">
        <xsd:attribute name="id" type="xsd:string"/>
      </xsd:complexType>
      <xsd:complexType name="ControlType">
        <xsd:complexContent>
          <xsd:extension base="core:ObjectType">
            <xsd:attribute name="visible" type="xsd:boolean"/>
          </xsd:extension>
        </xsd:complexContent>
      </xsd:complexType>
    </xsd:schema>"#;

    #[test]
    fn test_resolve_element_type_same_schema() {
        let store = store_with(&[("m.xsd", M_XSD), ("core.xsd", CORE_XSD)]);
        let schema = store.get("sap.m").unwrap();
        let button = store.find_element(schema, "Button").unwrap();

        let resolved = resolve_element_type(&store, schema, button)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.ty.name, "ButtonType");
        assert_eq!(resolved.schema.target_namespace, "sap.m");
    }

    #[test]
    fn test_resolve_element_type_follows_ref() {
        let store = store_with(&[("m.xsd", M_XSD), ("core.xsd", CORE_XSD)]);
        let schema = store.get("sap.m").unwrap();
        let primary = store.find_element(schema, "PrimaryButton").unwrap();

        let resolved = resolve_element_type(&store, schema, primary)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.ty.name, "ButtonType");
    }

    #[test]
    fn test_resolve_element_type_idempotent() {
        let store = store_with(&[("m.xsd", M_XSD), ("core.xsd", CORE_XSD)]);
        let schema = store.get("sap.m").unwrap();
        let button = store.find_element(schema, "Button").unwrap();

        let first = resolve_element_type(&store, schema, button).unwrap();
        let second = resolve_element_type(&store, schema, button).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_missing_namespace_is_schema_not_found() {
        // Only sap.m is loaded; its base type lives in sap.ui.core
        let store = store_with(&[("m.xsd", M_XSD)]);
        let schema = store.get("sap.m").unwrap();
        let button = store.find_element(schema, "Button").unwrap();
        let resolved = resolve_element_type(&store, schema, button)
            .unwrap()
            .unwrap();

        let result = base_types(&store, &resolved);
        assert_eq!(
            result,
            Err(ResolveError::SchemaNotFound {
                namespace: "sap.ui.core".to_string()
            })
        );
    }

    #[test]
    fn test_base_types_ordering() {
        let store = store_with(&[("m.xsd", M_XSD), ("core.xsd", CORE_XSD)]);
        let schema = store.get("sap.m").unwrap();
        let button = store.find_element(schema, "Button").unwrap();
        let resolved = resolve_element_type(&store, schema, button)
            .unwrap()
            .unwrap();

        // ButtonType -> ControlType -> ObjectType, nearest ancestor first
        let chain = base_types(&store, &resolved).unwrap();
        let names: Vec<&str> = chain.iter().map(|t| t.ty.name.as_str()).collect();
        assert_eq!(names, vec!["ControlType", "ObjectType"]);
    }

    #[test]
    fn test_base_types_leaf_is_empty() {
        let store = store_with(&[("core.xsd", CORE_XSD)]);
        let schema = store.get("sap.ui.core").unwrap();
        let object = store.find_complex_type(schema, "ObjectType").unwrap();

        let chain = base_types(&store, &ResolvedType { schema, ty: object }).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_base_types_cycle_fails_fast() {
        let cyclic = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                    xmlns:t="urn:cyclic" targetNamespace="urn:cyclic">
          <xsd:complexType name="A">
            <xsd:complexContent><xsd:extension base="t:B"/></xsd:complexContent>
          </xsd:complexType>
          <xsd:complexType name="B">
            <xsd:complexContent><xsd:extension base="t:A"/></xsd:complexContent>
          </xsd:complexType>
        </xsd:schema>"#;

        let store = store_with(&[("cyclic.xsd", cyclic)]);
        let schema = store.get("urn:cyclic").unwrap();
        let a = store.find_complex_type(schema, "A").unwrap();

        let result = base_types(&store, &ResolvedType { schema, ty: a });
        assert!(matches!(result, Err(ResolveError::CyclicType { .. })));
    }

    #[test]
    fn test_attributes_of_inherited_first_own_last() {
        let store = store_with(&[("m.xsd", M_XSD), ("core.xsd", CORE_XSD)]);
        let schema = store.get("sap.m").unwrap();
        let button = store.find_element(schema, "Button").unwrap();
        let resolved = resolve_element_type(&store, schema, button)
            .unwrap()
            .unwrap();

        let attrs = attributes_of(&store, &resolved).unwrap();
        let pairs: Vec<(&str, &str)> = attrs
            .iter()
            .map(|a| (a.attribute.name.as_str(), a.owner.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("id", "ObjectType"),
                ("visible", "ControlType"),
                ("text", "ButtonType"),
            ]
        );
    }

    #[test]
    fn test_unknown_prefix() {
        let xsd = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                  targetNamespace="urn:t">
          <xsd:element name="E" type="nope:T"/>
        </xsd:schema>"#;
        let store = store_with(&[("t.xsd", xsd)]);
        let schema = store.get("urn:t").unwrap();
        let element = store.find_element(schema, "E").unwrap();

        let result = resolve_element_type(&store, schema, element);
        assert!(matches!(result, Err(ResolveError::UnknownPrefix { .. })));
    }
}
