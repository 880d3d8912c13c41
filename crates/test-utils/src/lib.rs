// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for xmlview-lsp
//!
//! This crate provides common testing components including:
//! - XSD schema fixtures modeling a small UI5-like control library
//! - XML view document fixtures for cursor and diagnostic scenarios
//! - Schema store builders for in-memory test stores

pub mod fixtures;
pub mod store_builder;

// Re-exports for convenience
pub use fixtures::{ViewFixtures, XsdFixtures};
pub use store_builder::{fixture_store, store_from_sources};
