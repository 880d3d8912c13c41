// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Allowed child elements
//!
//! Walks an element path from the document root down and computes the set
//! of child elements the schema permits at the innermost position. Each
//! path segment's prefix is resolved against the *instance document's*
//! `xmlns` bindings, not a schema's, because the editor controls which
//! prefixes mean what.
//!
//! Descent degrades to an empty result whenever the document references
//! something the schemas do not declare; only a namespace that is bound in
//! the document but absent from the store is reported as an error.

use crate::error::{ResolveError, ResolveResult};
use crate::resolve::{base_types, resolve_element_type, schema_for_qname, ResolvedType};
use tracing::debug;
use xmlview_lsp_scanner::{split_qname, CancelToken, UsedNamespaces};
use xmlview_lsp_store::{ElementDecl, Schema, SchemaStore};

/// A child element the schema permits at a position
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedElement {
    /// The permitted element's declaration
    pub element: ElementDecl,

    /// Target namespace of the schema declaring it
    pub namespace: String,
}

/// Compute the child elements insertable at the end of an element path
///
/// `path` is the chain of qualified element names from the document root
/// down to (and including) the element whose content is being edited.
/// Elements are looked up top-level in their prefix's schema first, then
/// among the enclosing type's content particles, which covers inline
/// declarations like aggregation slots. The result includes content
/// declared on the innermost type's base chain, most distant ancestor
/// first.
///
/// # Arguments
///
/// - `store`: the loaded schema store
/// - `used`: `xmlns` bindings of the instance document
/// - `path`: qualified element names, root first
/// - `token`: cooperative cancellation checked once per path segment
pub fn elements_allowed_at(
    store: &SchemaStore,
    used: &UsedNamespaces,
    path: &[String],
    token: &CancelToken,
) -> ResolveResult<Vec<AllowedElement>> {
    let Some(innermost) = type_at_path(store, used, path, token)? else {
        return Ok(Vec::new());
    };

    let chain = base_types(store, &innermost)?;
    let mut allowed = Vec::new();
    for ty in chain.iter().rev().chain(std::iter::once(&innermost)) {
        for element in ty.ty.declared_elements() {
            allowed.push(resolve_ref_particle(store, ty, element));
        }
    }
    Ok(allowed)
}

/// Resolve the complex type of the element an element path ends on
///
/// Walks the same descent as [`elements_allowed_at`]; `Ok(None)` when any
/// segment is undeclared, unbound, or untyped.
pub fn type_at_path<'a>(
    store: &'a SchemaStore,
    used: &UsedNamespaces,
    path: &[String],
    token: &CancelToken,
) -> ResolveResult<Option<ResolvedType<'a>>> {
    Ok(descend(store, used, path, token)?.and_then(|(_, ty)| ty))
}

/// Resolve the declaration of the element an element path ends on
pub fn element_at_path(
    store: &SchemaStore,
    used: &UsedNamespaces,
    path: &[String],
    token: &CancelToken,
) -> ResolveResult<Option<AllowedElement>> {
    Ok(descend(store, used, path, token)?.map(|(element, _)| element))
}

/// Walk an element path from the root down
///
/// Yields the innermost element (with the namespace of the schema
/// declaring it) and its resolved type. The final segment may legally
/// lack a complex type; every earlier segment must resolve for the
/// descent to continue.
#[allow(clippy::type_complexity)]
fn descend<'a>(
    store: &'a SchemaStore,
    used: &UsedNamespaces,
    path: &[String],
    token: &CancelToken,
) -> ResolveResult<Option<(AllowedElement, Option<ResolvedType<'a>>)>> {
    let mut current: Option<ResolvedType<'a>> = None;
    let mut found: Option<AllowedElement> = None;

    for (index, segment) in path.iter().enumerate() {
        if token.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        let (prefix, local) = split_qname(segment);
        let Some(uri) = used.uri_for(prefix) else {
            debug!(segment = %segment, "Path segment prefix not bound in document");
            return Ok(None);
        };
        let Some(schema) = store.get(uri) else {
            return Err(ResolveError::SchemaNotFound {
                namespace: uri.to_string(),
            });
        };

        let (element, owning_schema) = match store.find_element(schema, local) {
            Some(element) => (element, schema),
            None => {
                let slot = match &current {
                    Some(ty) => find_slot_element(store, ty, local)?,
                    None => None,
                };
                match slot {
                    Some(pair) => pair,
                    None => {
                        debug!(segment = %segment, "Path segment not declared");
                        return Ok(None);
                    }
                }
            }
        };

        found = Some(AllowedElement {
            element: element.clone(),
            namespace: owning_schema.target_namespace.clone(),
        });

        current = resolve_element_type(store, owning_schema, element)?;
        if current.is_none() && index + 1 < path.len() {
            debug!(segment = %segment, "Path segment has no complex type");
            return Ok(None);
        }
    }

    Ok(found.map(|element| (element, current)))
}

/// Find a slot element declared on a type or on any of its base types
///
/// Aggregation slots are content particles; a slot declared on an
/// ancestor type is reachable through the extension chain.
fn find_slot_element<'a>(
    store: &'a SchemaStore,
    ty: &ResolvedType<'a>,
    local: &str,
) -> ResolveResult<Option<(&'a ElementDecl, &'a Schema)>> {
    if let Some(element) = ty.ty.declared_elements().find(|e| e.name == local) {
        return Ok(Some((element, ty.schema)));
    }
    for base in base_types(store, ty)? {
        if let Some(element) = base.ty.declared_elements().find(|e| e.name == local) {
            return Ok(Some((element, base.schema)));
        }
    }
    Ok(None)
}

/// Turn a content particle into an [`AllowedElement`]
///
/// A `ref` particle is swapped for the declaration it points at, so the
/// result carries the referenced element's namespace and documentation.
/// A dangling ref keeps the particle itself, tagged with the declaring
/// schema's namespace.
fn resolve_ref_particle(
    store: &SchemaStore,
    owner: &ResolvedType<'_>,
    element: &ElementDecl,
) -> AllowedElement {
    if let Some(ref_name) = &element.ref_name {
        match schema_for_qname(store, owner.schema, ref_name) {
            Ok((target_schema, local)) => {
                if let Some(target) = store.find_element(target_schema, local) {
                    return AllowedElement {
                        element: target.clone(),
                        namespace: target_schema.target_namespace.clone(),
                    };
                }
                debug!(r#ref = %ref_name, "Referenced element not declared, keeping particle");
            }
            Err(e) => {
                debug!(r#ref = %ref_name, error = %e, "Cannot resolve ref particle");
            }
        }
    }
    AllowedElement {
        element: element.clone(),
        namespace: owner.schema.target_namespace.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MVC_XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m"
                targetNamespace="sap.ui.core.mvc">
      <xsd:complexType name="ViewType">
        <xsd:sequence>
          <xsd:element name="content">
            <xsd:complexType>
              <xsd:sequence>
                <xsd:choice>
                  <xsd:element ref="m:Button"/>
                  <xsd:element ref="m:Page"/>
                </xsd:choice>
              </xsd:sequence>
            </xsd:complexType>
          </xsd:element>
        </xsd:sequence>
      </xsd:complexType>
      <xsd:element name="View" type="mvc:ViewType"/>
    </xsd:schema>"#;

    const M_XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                xmlns:m="sap.m" targetNamespace="sap.m">
      <xsd:complexType name="ButtonType">
        <xsd:attribute name="text" type="xsd:string"/>
      </xsd:complexType>
      <xsd:complexType name="PageType">
        <xsd:sequence>
          <xsd:element ref="m:Button"/>
        </xsd:sequence>
      </xsd:complexType>
      <xsd:element name="Button" type="m:ButtonType"/>
      <xsd:element name="Page" type="m:PageType"/>
    </xsd:schema>"#;

    fn store() -> SchemaStore {
        let mut store = SchemaStore::new();
        store.load_source("mvc.xsd", MVC_XSD).unwrap();
        store.load_source("m.xsd", M_XSD).unwrap();
        store
    }

    fn used() -> UsedNamespaces {
        UsedNamespaces::scan(r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m">"#)
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allowed_at_root_element() {
        let store = store();
        let allowed =
            elements_allowed_at(&store, &used(), &path(&["mvc:View"]), &CancelToken::new())
                .unwrap();

        let names: Vec<&str> = allowed.iter().map(|a| a.element.name.as_str()).collect();
        assert_eq!(names, vec!["content"]);
        assert_eq!(allowed[0].namespace, "sap.ui.core.mvc");
    }

    #[test]
    fn test_allowed_descends_inline_declaration() {
        // "content" is not a top-level element in any schema; it must be
        // found among ViewType's content particles.
        let store = store();
        let allowed = elements_allowed_at(
            &store,
            &used(),
            &path(&["mvc:View", "mvc:content"]),
            &CancelToken::new(),
        )
        .unwrap();

        let names: Vec<&str> = allowed.iter().map(|a| a.element.name.as_str()).collect();
        assert_eq!(names, vec!["Button", "Page"]);
        // Ref particles resolve to the referenced schema's namespace
        assert!(allowed.iter().all(|a| a.namespace == "sap.m"));
    }

    #[test]
    fn test_allowed_crosses_namespaces() {
        let store = store();
        let allowed = elements_allowed_at(
            &store,
            &used(),
            &path(&["mvc:View", "mvc:content", "m:Page"]),
            &CancelToken::new(),
        )
        .unwrap();

        let names: Vec<&str> = allowed.iter().map(|a| a.element.name.as_str()).collect();
        assert_eq!(names, vec!["Button"]);
        assert_eq!(allowed[0].namespace, "sap.m");
    }

    #[test]
    fn test_allowed_descends_slot_inherited_from_base() {
        // "content" is declared on PageType; the document uses SubPage,
        // whose type extends PageType without redeclaring the slot.
        let sub_xsd = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                    xmlns:m="sap.m" targetNamespace="sap.m">
          <xsd:complexType name="ButtonType">
            <xsd:attribute name="text" type="xsd:string"/>
          </xsd:complexType>
          <xsd:complexType name="PageType">
            <xsd:sequence>
              <xsd:element name="content">
                <xsd:complexType>
                  <xsd:sequence>
                    <xsd:element ref="m:Button"/>
                  </xsd:sequence>
                </xsd:complexType>
              </xsd:element>
            </xsd:sequence>
          </xsd:complexType>
          <xsd:complexType name="SubPageType">
            <xsd:complexContent>
              <xsd:extension base="m:PageType"/>
            </xsd:complexContent>
          </xsd:complexType>
          <xsd:element name="Button" type="m:ButtonType"/>
          <xsd:element name="SubPage" type="m:SubPageType"/>
        </xsd:schema>"#;

        let mut store = SchemaStore::new();
        store.load_source("m.xsd", sub_xsd).unwrap();
        let used = UsedNamespaces::scan(r#"<m:SubPage xmlns:m="sap.m">"#);

        let allowed = elements_allowed_at(
            &store,
            &used,
            &path(&["m:SubPage", "m:content"]),
            &CancelToken::new(),
        )
        .unwrap();

        let names: Vec<&str> = allowed.iter().map(|a| a.element.name.as_str()).collect();
        assert_eq!(names, vec!["Button"]);
    }

    #[test]
    fn test_type_at_path_innermost() {
        let store = store();
        let ty = type_at_path(
            &store,
            &used(),
            &path(&["mvc:View", "mvc:content", "m:Button"]),
            &CancelToken::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(ty.ty.name, "ButtonType");
        assert_eq!(ty.schema.target_namespace, "sap.m");
    }

    #[test]
    fn test_element_at_path_returns_declaration() {
        let store = store();
        let element = element_at_path(&store, &used(), &path(&["mvc:View"]), &CancelToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(element.element.name, "View");
        assert_eq!(element.namespace, "sap.ui.core.mvc");
    }

    #[test]
    fn test_allowed_unknown_segment_is_empty() {
        let store = store();
        let allowed = elements_allowed_at(
            &store,
            &used(),
            &path(&["mvc:View", "mvc:nosuch"]),
            &CancelToken::new(),
        )
        .unwrap();
        assert!(allowed.is_empty());
    }

    #[test]
    fn test_allowed_unbound_prefix_is_empty() {
        let store = store();
        let allowed = elements_allowed_at(
            &store,
            &used(),
            &path(&["zz:View"]),
            &CancelToken::new(),
        )
        .unwrap();
        assert!(allowed.is_empty());
    }

    #[test]
    fn test_allowed_missing_schema_is_error() {
        let store = store();
        let used = UsedNamespaces::scan(r#"<f:Card xmlns:f="sap.f">"#);
        let result = elements_allowed_at(&store, &used, &path(&["f:Card"]), &CancelToken::new());
        assert_eq!(
            result,
            Err(ResolveError::SchemaNotFound {
                namespace: "sap.f".to_string()
            })
        );
    }

    #[test]
    fn test_allowed_cancelled() {
        let store = store();
        let token = CancelToken::new();
        token.cancel();
        let result = elements_allowed_at(&store, &used(), &path(&["mvc:View"]), &token);
        assert_eq!(result, Err(ResolveError::Cancelled));
    }
}
