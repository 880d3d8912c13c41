// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Cross-schema derivation sweep
//!
//! Finds elements in *other* schemas whose types extend a given base type.
//! A schema whose slot accepts `core:Control` should also offer `m:Button`
//! when `sap.m` declares `ButtonType` as an extension of `ControlType`.
//!
//! Only schemas that both reference the base type's namespace and are
//! bound to a prefix in the edited document are swept; anything else could
//! not legally appear in the document anyway.

use crate::error::{ResolveError, ResolveResult};
use crate::resolve::{base_types, resolve_element_type, ResolvedType};
use tracing::debug;
use xmlview_lsp_scanner::{CancelToken, UsedNamespaces};
use xmlview_lsp_store::{ElementDecl, SchemaStore};

/// An element from another schema whose type extends a base type
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedElement {
    /// The derived element's declaration
    pub element: ElementDecl,

    /// The prefix the declaring schema's namespace is bound to in the
    /// edited document
    pub prefix: String,

    /// Target namespace of the declaring schema
    pub namespace: String,
}

/// Sweep the store for elements whose types derive from `base`
///
/// Candidate schemas are those other than the base type's own schema that
/// reference its namespace and are bound to a prefix in the document.
/// Candidates that fail to resolve are skipped with a debug log; the sweep
/// never fails on a broken candidate.
///
/// # Arguments
///
/// - `store`: the loaded schema store
/// - `used`: `xmlns` bindings of the instance document
/// - `base`: the base type derivations must extend
/// - `token`: cooperative cancellation checked once per schema
pub fn derived_elements(
    store: &SchemaStore,
    used: &UsedNamespaces,
    base: &ResolvedType<'_>,
    token: &CancelToken,
) -> ResolveResult<Vec<DerivedElement>> {
    let base_key = base.qualified_name();
    let mut derived = Vec::new();

    for schema in store.schemas() {
        if token.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }
        if schema.target_namespace == base.schema.target_namespace {
            continue;
        }
        if !schema
            .referenced_namespaces
            .values()
            .any(|uri| uri == &base.schema.target_namespace)
        {
            continue;
        }
        let Some(prefix) = used.prefix_for(&schema.target_namespace) else {
            continue;
        };

        for element in &schema.elements {
            let resolved = match resolve_element_type(store, schema, element) {
                Ok(Some(resolved)) => resolved,
                Ok(None) => continue,
                Err(e) => {
                    debug!(
                        element = %element.name,
                        schema = %schema.target_namespace,
                        error = %e,
                        "Skipping unresolvable derivation candidate"
                    );
                    continue;
                }
            };

            let chain = match base_types(store, &resolved) {
                Ok(chain) => chain,
                Err(e) => {
                    debug!(
                        element = %element.name,
                        error = %e,
                        "Skipping candidate with broken base chain"
                    );
                    continue;
                }
            };

            if chain.iter().any(|t| t.qualified_name() == base_key) {
                derived.push(DerivedElement {
                    element: element.clone(),
                    prefix: prefix.to_string(),
                    namespace: schema.target_namespace.clone(),
                });
            }
        }
    }
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE_XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                xmlns:core="urn:example:core" targetNamespace="urn:example:core">
      <xsd:complexType name="BaseType">
        <xsd:attribute name="id" type="xsd:string"/>
      </xsd:complexType>
      <xsd:element name="Base" type="core:BaseType"/>
    </xsd:schema>"#;

    const WIDGETS_XSD: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                xmlns:w="urn:example:widgets" xmlns:core="urn:example:core"
                targetNamespace="urn:example:widgets">
      <xsd:complexType name="DerivedType">
        <xsd:complexContent>
          <xsd:extension base="core:BaseType">
            <xsd:attribute name="label" type="xsd:string"/>
          </xsd:extension>
        </xsd:complexContent>
      </xsd:complexType>
      <xsd:complexType name="UnrelatedType"/>
      <xsd:element name="Derived" type="w:DerivedType"/>
      <xsd:element name="Unrelated" type="w:UnrelatedType"/>
    </xsd:schema>"#;

    fn store() -> SchemaStore {
        let mut store = SchemaStore::new();
        store.load_source("core.xsd", CORE_XSD).unwrap();
        store.load_source("widgets.xsd", WIDGETS_XSD).unwrap();
        store
    }

    fn base_of<'a>(store: &'a SchemaStore) -> ResolvedType<'a> {
        let schema = store.get("urn:example:core").unwrap();
        let ty = store.find_complex_type(schema, "BaseType").unwrap();
        ResolvedType { schema, ty }
    }

    #[test]
    fn test_derived_found_with_document_prefix() {
        let store = store();
        let used = UsedNamespaces::scan(
            r#"<core:Root xmlns:core="urn:example:core" xmlns:w="urn:example:widgets">"#,
        );

        let derived =
            derived_elements(&store, &used, &base_of(&store), &CancelToken::new()).unwrap();

        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].element.name, "Derived");
        assert_eq!(derived[0].prefix, "w");
        assert_eq!(derived[0].namespace, "urn:example:widgets");
    }

    #[test]
    fn test_derived_requires_document_binding() {
        // urn:example:widgets is loaded but not bound in the document, so
        // its elements cannot be offered.
        let store = store();
        let used = UsedNamespaces::scan(r#"<core:Root xmlns:core="urn:example:core">"#);

        let derived =
            derived_elements(&store, &used, &base_of(&store), &CancelToken::new()).unwrap();
        assert!(derived.is_empty());
    }

    #[test]
    fn test_derived_skips_unrelated_types() {
        let store = store();
        let used = UsedNamespaces::scan(
            r#"<core:Root xmlns:core="urn:example:core" xmlns:w="urn:example:widgets">"#,
        );

        let derived =
            derived_elements(&store, &used, &base_of(&store), &CancelToken::new()).unwrap();
        assert!(derived.iter().all(|d| d.element.name != "Unrelated"));
    }

    #[test]
    fn test_derived_cancelled() {
        let store = store();
        let used = UsedNamespaces::scan(r#"<core:Root xmlns:core="urn:example:core">"#);
        let token = CancelToken::new();
        token.cancel();

        let result = derived_elements(&store, &used, &base_of(&store), &token);
        assert_eq!(result, Err(ResolveError::Cancelled));
    }
}
