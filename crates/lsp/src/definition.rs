// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Go-to-definition Provider
//!
//! This module resolves attribute values to workspace files.
//!
//! ## Overview
//!
//! Two value shapes are navigable:
//! - dot-separated names on `*Name` attributes (`controllerName="app.Main"`)
//!   resolve to the matching `Main.controller.(js|ts)`,
//!   `Main.view.(xml|json)` and `Main.fragment.(xml|json)` files
//! - bare handler names (`press=".onGo"`) resolve to the declaration of
//!   that method inside the view's controller file, located by a line
//!   scan over the controller source
//!
//! File enumeration sits behind the [`WorkspaceFiles`] trait so tests can
//! swap in a fixed file list; [`WalkdirWorkspace`] is the production
//! implementation.

use regex::Regex;
use std::path::{Path, PathBuf};
use tower_lsp::lsp_types::{Location, Position, Range, Url};
use tracing::debug;
use walkdir::WalkDir;
use xmlview_lsp_scanner::{scan_at_offset, scan_document, CancelToken, ScanError};

/// Errors that can occur during definition lookup
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// Structural scan error
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Invalid method-lookup pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Source of candidate workspace files
pub trait WorkspaceFiles {
    /// Enumerate the files definition targets may live in
    fn files(&self) -> Vec<PathBuf>;

    /// Read a file's text
    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Walkdir-backed workspace enumeration
///
/// Skips hidden directories and `node_modules`.
pub struct WalkdirWorkspace {
    root: PathBuf,
}

impl WalkdirWorkspace {
    /// Create an enumerator rooted at a workspace directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl WorkspaceFiles for WalkdirWorkspace {
    fn files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| {
                // The root itself may legitimately be a dot-directory
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !(name.starts_with('.') && name.len() > 1) && name != "node_modules"
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }
}

/// File suffixes a dotted name can resolve to
const NAME_SUFFIXES: [&str; 6] = [
    "controller.js",
    "controller.ts",
    "view.xml",
    "view.json",
    "fragment.xml",
    "fragment.json",
];

/// Controller file suffixes for method lookup
const CONTROLLER_SUFFIXES: [&str; 2] = ["controller.js", "controller.ts"];

/// Definition engine for XML views
pub struct DefinitionEngine<W: WorkspaceFiles> {
    workspace: W,
}

impl<W: WorkspaceFiles> DefinitionEngine<W> {
    /// Create a new definition engine
    pub fn new(workspace: W) -> Self {
        Self { workspace }
    }

    /// Find definition targets for the attribute value at a byte offset
    ///
    /// # Returns
    ///
    /// - `Ok(Some(locations))` - Matching workspace files or method lines
    /// - `Ok(None)` - Cursor not on a navigable attribute value
    pub fn definition(
        &self,
        text: &str,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Option<Vec<Location>>, DefinitionError> {
        let cursor = scan_at_offset(text, offset, token)?;
        let Some(attribute) = cursor.attribute_at(offset) else {
            return Ok(None);
        };
        let value = attribute.value.trim();
        if value.is_empty() {
            return Ok(None);
        }

        if attribute.name.ends_with("Name") && value.contains('.') {
            return Ok(self.dotted_name_targets(value));
        }
        self.method_targets(text, value, token)
    }

    /// Resolve `x.y.Z` to the `Z.*` files the convention maps it to
    fn dotted_name_targets(&self, value: &str) -> Option<Vec<Location>> {
        let base = value.rsplit('.').next()?;
        if base.is_empty() {
            return None;
        }
        let wanted: Vec<String> = NAME_SUFFIXES
            .iter()
            .map(|suffix| format!("{base}.{suffix}"))
            .collect();

        let locations: Vec<Location> = self
            .workspace
            .files()
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| wanted.iter().any(|w| name.to_string_lossy() == *w))
                    .unwrap_or(false)
            })
            .filter_map(|path| Url::from_file_path(&path).ok())
            .map(|uri| Location::new(uri, Range::default()))
            .collect();

        if locations.is_empty() {
            None
        } else {
            Some(locations)
        }
    }

    /// Resolve a handler name to its declaration in the view's controller
    ///
    /// The controller is named by the root element's `controllerName`
    /// attribute; the method is located with a line-anchored pattern over
    /// the controller source.
    fn method_targets(
        &self,
        text: &str,
        value: &str,
        token: &CancelToken,
    ) -> Result<Option<Vec<Location>>, DefinitionError> {
        let method = value.trim_start_matches('.');
        if method.is_empty() || !method.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Ok(None);
        }

        let scan = scan_document(text, token)?;
        let Some(controller) = scan.roots.iter().find_map(|root| {
            root.attributes
                .iter()
                .find(|a| a.name == "controllerName")
                .map(|a| a.value.clone())
        }) else {
            debug!("View has no controllerName, no method lookup");
            return Ok(None);
        };
        let Some(base) = controller.rsplit('.').next() else {
            return Ok(None);
        };

        let wanted: Vec<String> = CONTROLLER_SUFFIXES
            .iter()
            .map(|suffix| format!("{base}.{suffix}"))
            .collect();
        let pattern = Regex::new(&format!(
            r"(?m)^\s*(?:async\s+)?{}\s*[:(=]",
            regex::escape(method)
        ))?;

        let mut locations = Vec::new();
        for path in self.workspace.files() {
            let matches = path
                .file_name()
                .map(|name| wanted.iter().any(|w| name.to_string_lossy() == *w))
                .unwrap_or(false);
            if !matches {
                continue;
            }

            let source = match self.workspace.read(&path) {
                Ok(source) => source,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Cannot read controller");
                    continue;
                }
            };
            let Some(found) = pattern.find(&source) else {
                continue;
            };
            let Ok(uri) = Url::from_file_path(&path) else {
                continue;
            };

            let line = source[..found.start()].matches('\n').count() as u32;
            let position = Position::new(line, 0);
            locations.push(Location::new(uri, Range::new(position, position)));
        }

        if locations.is_empty() {
            Ok(None)
        } else {
            Ok(Some(locations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: &str = r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m" controllerName="app.Main">
  <m:Button press=".onGo"/>
</mvc:View>"#;

    const CONTROLLER: &str = "sap.ui.define([], function () {\n  return {\n    onGo: function () {},\n    onStop() {}\n  };\n});\n";

    fn workspace() -> (tempfile::TempDir, WalkdirWorkspace) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Main.controller.js"), CONTROLLER).unwrap();
        std::fs::write(dir.path().join("Main.view.xml"), VIEW).unwrap();
        std::fs::write(dir.path().join("Other.controller.js"), "").unwrap();
        let workspace = WalkdirWorkspace::new(dir.path().to_path_buf());
        (dir, workspace)
    }

    #[test]
    fn test_dotted_name_finds_controller_and_view() {
        let (_dir, workspace) = workspace();
        let engine = DefinitionEngine::new(workspace);

        let offset = VIEW.find("app.Main").unwrap() + 1;
        let locations = engine
            .definition(VIEW, offset, &CancelToken::new())
            .unwrap()
            .unwrap();

        assert_eq!(locations.len(), 2);
        let mut files: Vec<String> = locations
            .iter()
            .map(|l| l.uri.path().rsplit('/').next().unwrap().to_string())
            .collect();
        files.sort();
        assert_eq!(files, vec!["Main.controller.js", "Main.view.xml"]);
    }

    #[test]
    fn test_method_lookup_finds_declaration_line() {
        let (_dir, workspace) = workspace();
        let engine = DefinitionEngine::new(workspace);

        let offset = VIEW.find(".onGo").unwrap() + 2;
        let locations = engine
            .definition(VIEW, offset, &CancelToken::new())
            .unwrap()
            .unwrap();

        assert_eq!(locations.len(), 1);
        assert!(locations[0].uri.path().ends_with("Main.controller.js"));
        // onGo is declared on the third line of the controller
        assert_eq!(locations[0].range.start.line, 2);
    }

    #[test]
    fn test_method_lookup_shorthand_declaration() {
        let (_dir, workspace) = workspace();
        let engine = DefinitionEngine::new(workspace);

        let view = VIEW.replace(".onGo", ".onStop");
        let offset = view.find(".onStop").unwrap() + 2;
        let locations = engine
            .definition(&view, offset, &CancelToken::new())
            .unwrap()
            .unwrap();

        assert_eq!(locations[0].range.start.line, 3);
    }

    #[test]
    fn test_unknown_method_yields_none() {
        let (_dir, workspace) = workspace();
        let engine = DefinitionEngine::new(workspace);

        let view = VIEW.replace(".onGo", ".onMissing");
        let offset = view.find(".onMissing").unwrap() + 2;
        let result = engine
            .definition(&view, offset, &CancelToken::new())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_workspace_rooted_in_hidden_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".work");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("Main.controller.js"), CONTROLLER).unwrap();

        // Hidden subdirectories are still skipped
        std::fs::create_dir(root.join(".git")).unwrap();
        std::fs::write(root.join(".git").join("Stale.controller.js"), CONTROLLER).unwrap();

        let workspace = WalkdirWorkspace::new(root);
        let files = workspace.files();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Main.controller.js"));
    }

    #[test]
    fn test_cursor_outside_attribute_value() {
        let (_dir, workspace) = workspace();
        let engine = DefinitionEngine::new(workspace);

        let offset = VIEW.find("mvc:View").unwrap();
        let result = engine
            .definition(VIEW, offset, &CancelToken::new())
            .unwrap();
        assert!(result.is_none());
    }
}
