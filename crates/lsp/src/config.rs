// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Server Configuration
//!
//! This module provides configuration management for the server.
//!
//! ## Configuration Structure
//!
//! The configuration arrives as JSON, either in `initializationOptions`
//! of the `initialize` request or in a
//! `workspace/didChangeConfiguration` notification:
//!
//! ```json
//! {
//!   "schemaDir": "/path/to/schemas",
//!   "workspaceRoot": "/path/to/project"
//! }
//! ```
//!
//! Both fields are optional. Without a `schemaDir` the server starts with
//! an empty schema store; without a `workspaceRoot` go-to-definition
//! falls back to the workspace folder the client reported.

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration JSON did not match the expected shape
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Directory the XSD schemas are loaded from
    pub schema_dir: Option<PathBuf>,

    /// Workspace root for controller and view file lookup
    pub workspace_root: Option<PathBuf>,
}

impl ServerConfig {
    /// Parse configuration from a JSON value
    ///
    /// A missing value yields the default (empty) configuration.
    pub fn from_value(value: Option<Value>) -> Result<Self, ConfigError> {
        match value {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Self::default()),
        }
    }
}
