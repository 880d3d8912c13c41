// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end diagnostic scenarios over the fixture schemas

use std::sync::Arc;
use tower_lsp::lsp_types::DiagnosticSeverity;
use xmlview_lsp_lsp::{DiagnosticCode, DiagnosticCollector};
use xmlview_lsp_scanner::CancelToken;
use xmlview_lsp_test_utils::{fixture_store, ViewFixtures};

fn collector() -> DiagnosticCollector {
    DiagnosticCollector::new(Arc::new(fixture_store()))
}

#[test]
fn clean_view_has_no_diagnostics() {
    let diagnostics = collector()
        .collect(ViewFixtures::simple_view(), &CancelToken::new())
        .unwrap();
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
}

#[test]
fn duplicate_attribute_flags_second_occurrence() {
    let text = ViewFixtures::view_with_duplicate_attribute();
    let diagnostics = collector().collect(text, &CancelToken::new()).unwrap();

    let doubles: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::DoubleAttribute)
        .collect();
    assert_eq!(doubles.len(), 1);
    assert_eq!(&text[doubles[0].start..doubles[0].end], r#"text="Two""#);
    assert_eq!(doubles[0].code.severity(), DiagnosticSeverity::ERROR);
}

#[test]
fn unknown_namespace_is_a_warning_and_nothing_else() {
    let text = ViewFixtures::view_with_unknown_namespace();
    let diagnostics = collector().collect(text, &CancelToken::new()).unwrap();

    assert_eq!(diagnostics.len(), 1, "unexpected: {diagnostics:?}");
    let ns = &diagnostics[0];
    assert_eq!(ns.code, DiagnosticCode::UnknownNamespace);
    assert_eq!(ns.code.severity(), DiagnosticSeverity::WARNING);
    assert_eq!(&text[ns.start..ns.end], r#"xmlns:f="sap.f""#);
    assert!(ns.message.contains("sap.f"));
}

#[test]
fn mismatched_close_tag_is_reported() {
    let text = ViewFixtures::view_with_mismatched_tags();
    let diagnostics = collector().collect(text, &CancelToken::new()).unwrap();

    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::NotWellFormed));
    assert!(diagnostics
        .iter()
        .all(|d| d.code != DiagnosticCode::UnknownNamespace));
}

#[test]
fn collection_respects_cancellation() {
    let token = CancelToken::new();
    token.cancel();

    let result = collector().collect(ViewFixtures::simple_view(), &token);
    assert!(result.is_err());
}
