// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! In-memory schema store builders

use crate::fixtures::XsdFixtures;
use xmlview_lsp_store::SchemaStore;

/// Build a store from `(file name, xsd text)` pairs
///
/// Panics on parse failure; fixtures are expected to be valid.
pub fn store_from_sources(sources: &[(&str, &str)]) -> SchemaStore {
    let mut store = SchemaStore::new();
    for (source, text) in sources {
        store
            .load_source(source, text)
            .unwrap_or_else(|e| panic!("fixture schema {source} failed to load: {e}"));
    }
    store
}

/// The standard fixture store: `sap.m`, `sap.ui.core.mvc`, and both
/// `urn:example` schemas
pub fn fixture_store() -> SchemaStore {
    store_from_sources(&[
        ("sap_m.xsd", XsdFixtures::sap_m()),
        ("mvc.xsd", XsdFixtures::mvc()),
        ("example_core.xsd", XsdFixtures::example_core()),
        ("example_widgets.xsd", XsdFixtures::example_widgets()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_store_loads_all_schemas() {
        let store = fixture_store();
        assert_eq!(store.len(), 4);
        assert!(store.contains("sap.m"));
        assert!(store.contains("sap.ui.core.mvc"));
        assert!(store.contains("urn:example:core"));
        assert!(store.contains("urn:example:widgets"));
    }
}
