// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Type Resolution Engine
//!
//! Given an element and its owning schema, this crate resolves the
//! element's complex type, its base-type chain, and the attribute and
//! child-element sets legally insertable at a given point, following
//! cross-namespace type references through the
//! [`SchemaStore`](xmlview_lsp_store::SchemaStore).
//!
//! ## Context threading
//!
//! Nothing here stashes owner back-pointers on model nodes. Every function
//! takes the store and the owning schema as explicit parameters, and
//! results carry their owning schema in a [`ResolvedType`] pair.
//!
//! ## Error policy
//!
//! Lookups that cross into a namespace absent from the store fail with
//! [`ResolveError::SchemaNotFound`]; callers surface that as a degraded
//! result or a diagnostic, never a crash. Base-type traversal guards
//! against cyclic `extension` chains with a visited set and fails fast
//! with [`ResolveError::CyclicType`] instead of looping.

pub mod children;
pub mod derived;
pub mod error;
pub mod resolve;

pub use children::{element_at_path, elements_allowed_at, type_at_path, AllowedElement};
pub use derived::{derived_elements, DerivedElement};
pub use error::{ResolveError, ResolveResult};
pub use resolve::{
    attributes_of, base_types, resolve_element_type, schema_for_qname, OwnedAttribute,
    ResolvedType,
};
