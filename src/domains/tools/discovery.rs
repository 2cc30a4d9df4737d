//! Plugin discovery - builds the registry once at startup.
//!
//! Builtins from the registration table come first, then every plugin
//! executable found in the configured directory, visited in file-name order.
//! A later tool with an already registered name replaces the earlier one.
//! A candidate that fails to load is reported as a warning and skipped;
//! discovery itself never fails.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::definitions::builtin_tools;
use super::error::DiscoveryError;
use super::external::ExternalTool;
use super::registry::ToolRegistry;
use crate::core::config::PluginsConfig;

/// File names in the plugin directory that are never loaded: the runner
/// itself and the contract document.
pub const DENY_LIST: &[&str] = &["toolbelt", "toolbelt.exe", "PLUGIN.md"];

/// Discovers tools and fills a [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct PluginDiscovery {
    directory: Option<PathBuf>,
    describe_timeout: Duration,
    include_builtins: bool,
}

impl PluginDiscovery {
    pub fn new(config: &PluginsConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            describe_timeout: Duration::from_secs(config.describe_timeout_secs),
            include_builtins: true,
        }
    }

    /// Skip the builtin registration table.
    pub fn without_builtins(mut self) -> Self {
        self.include_builtins = false;
        self
    }

    /// Run discovery. Sequential: each candidate is fully loaded before the
    /// next one is looked at.
    pub async fn discover(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();

        if self.include_builtins {
            for handler in builtin_tools() {
                registry.register_handler(handler);
            }
        }

        if let Some(directory) = &self.directory {
            self.discover_plugins(directory, &mut registry).await;
        }

        info!("Discovered {} tool(s)", registry.len());
        registry
    }

    async fn discover_plugins(&self, directory: &Path, registry: &mut ToolRegistry) {
        let candidates = match candidates(directory) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Plugin directory skipped: {}", e);
                return;
            }
        };

        for path in candidates {
            match ExternalTool::load(&path, self.describe_timeout).await {
                Ok(tool) => {
                    info!("Loaded plugin {}", tool.path().display());
                    registry.register_handler(Arc::new(tool));
                }
                Err(e) => {
                    warn!(candidate = %path.display(), "Failed to load plugin: {}", e);
                }
            }
        }
    }
}

/// Plugin candidates in `directory`, sorted by file name.
///
/// Hidden files, deny-listed names, directories and (on unix) files without
/// an executable bit are left out.
pub fn candidates(directory: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = fs::read_dir(directory).map_err(|source| DiscoveryError::Io {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            if name.starts_with('.') || DENY_LIST.contains(&name) {
                return false;
            }
            let usable = fs::metadata(path)
                .map(|metadata| metadata.is_file() && is_executable(&metadata))
                .unwrap_or(false);
            if !usable {
                debug!("Not a plugin: {}", path.display());
            }
            usable
        })
        .collect();

    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(found)
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(directory: Option<PathBuf>) -> PluginsConfig {
        PluginsConfig {
            directory,
            describe_timeout_secs: 5,
        }
    }

    #[cfg(unix)]
    fn write_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\nexit 1\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn test_builtins_only() {
        let registry = PluginDiscovery::new(&config(None)).discover().await;
        assert_eq!(registry.tool_names(), vec!["ping", "code_counter", "countdown"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let registry = PluginDiscovery::new(&config(Some(temp_dir.path().join("absent"))))
            .discover()
            .await;
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_without_builtins() {
        let temp_dir = TempDir::new().unwrap();
        let registry = PluginDiscovery::new(&config(Some(temp_dir.path().to_path_buf())))
            .without_builtins()
            .discover()
            .await;
        assert!(registry.is_empty());
    }

    #[test]
    fn test_candidates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = candidates(&temp_dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, DiscoveryError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_candidates_filtering_and_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write_executable(&root.join("zeta"));
        write_executable(&root.join("alpha"));
        write_executable(&root.join(".hidden"));
        write_executable(&root.join("toolbelt"));
        fs::write(root.join("PLUGIN.md"), "# contract").unwrap();
        fs::write(root.join("notes.txt"), "not executable").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();

        let names: Vec<_> = candidates(root)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
