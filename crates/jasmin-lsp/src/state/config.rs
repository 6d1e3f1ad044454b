//! Server configuration management.
//!
//! The master (compilation entry point) file and the namespace → directory
//! map, updated by the custom notifications and by the response to the
//! startup `workspace/configuration` request. Path values may carry a
//! `${workspaceFolder}` placeholder, substituted once on receipt.

use jasmin_analysis::uri::path_to_uri;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::path::PathBuf;

const WORKSPACE_FOLDER_VAR: &str = "${workspaceFolder}";

/// Runtime configuration, mutated only by its dedicated handlers.
#[derive(Debug, Default)]
pub struct ServerConfig {
    /// URI of the designated compilation entry point.
    pub master_file: Option<String>,
    /// Namespace id → directory for require resolution.
    pub namespace_paths: FxHashMap<String, PathBuf>,
    /// Client-provided workspace root, used for placeholder substitution.
    pub workspace_root: Option<PathBuf>,
}

impl ServerConfig {
    /// Set the master file from a URI or plain path.
    pub fn set_master_file(&mut self, value: &str) {
        let uri = if value.contains("://") {
            Some(value.to_string())
        } else {
            path_to_uri(&self.substitute(value))
        };
        if let Some(uri) = &uri {
            tracing::info!("master file set to {uri}");
        }
        self.master_file = uri;
    }

    /// Replace the namespace map from a JSON object of id → path.
    pub fn set_namespace_paths(&mut self, value: &Value) {
        let mut paths = FxHashMap::default();
        if let Some(obj) = value.as_object() {
            for (ns, path) in obj {
                if let Some(path) = path.as_str() {
                    paths.insert(ns.clone(), self.substitute(path));
                }
            }
        }
        tracing::info!("namespace paths set: {} entries", paths.len());
        self.namespace_paths = paths;
    }

    /// Apply a `workspace/configuration` payload section.
    pub fn apply_configuration(&mut self, section: &Value) {
        if let Some(master) = section.get("masterFile").and_then(|v| v.as_str()) {
            if !master.is_empty() {
                self.set_master_file(master);
            }
        }
        if let Some(paths) = section.get("namespacePaths") {
            if paths.is_object() {
                self.set_namespace_paths(paths);
            }
        }
    }

    fn substitute(&self, path: &str) -> PathBuf {
        match (&self.workspace_root, path.contains(WORKSPACE_FOLDER_VAR)) {
            (Some(root), true) => {
                PathBuf::from(path.replace(WORKSPACE_FOLDER_VAR, &root.to_string_lossy()))
            }
            _ => PathBuf::from(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_master_file_accepts_uri_and_path() {
        let mut config = ServerConfig::default();
        config.set_master_file("file:///tmp/p/main.jazz");
        assert_eq!(config.master_file.as_deref(), Some("file:///tmp/p/main.jazz"));

        config.set_master_file("/tmp/p/other.jazz");
        assert_eq!(config.master_file.as_deref(), Some("file:///tmp/p/other.jazz"));
    }

    #[test]
    fn test_workspace_folder_substitution() {
        let mut config = ServerConfig {
            workspace_root: Some(PathBuf::from("/work/project")),
            ..Default::default()
        };
        config.set_namespace_paths(&json!({ "Common": "${workspaceFolder}/src/common" }));
        assert_eq!(
            config.namespace_paths.get("Common"),
            Some(&PathBuf::from("/work/project/src/common"))
        );
    }

    #[test]
    fn test_apply_configuration_section() {
        let mut config = ServerConfig::default();
        config.apply_configuration(&json!({
            "masterFile": "file:///tmp/m.jazz",
            "namespacePaths": { "NS": "/somewhere" }
        }));
        assert_eq!(config.master_file.as_deref(), Some("file:///tmp/m.jazz"));
        assert_eq!(config.namespace_paths.get("NS"), Some(&PathBuf::from("/somewhere")));
    }

    #[test]
    fn test_non_object_namespace_payload_clears_nothing() {
        let mut config = ServerConfig::default();
        config.set_namespace_paths(&json!({ "NS": "/a" }));
        config.apply_configuration(&json!({ "namespacePaths": 42 }));
        assert_eq!(config.namespace_paths.len(), 1);
    }
}
