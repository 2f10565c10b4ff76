//! Runtime-reconfigurable dialect options shared with the compiler host.
//!
//! The editor pushes SDK locations and alias tables at runtime; the manager
//! records them, logs every transition, and overlays the dialect-compatible
//! compilation mode on whatever the project's own configuration requested.
//! The loader configuration shipped with the SDK is parsed lazily and cached
//! by path and modification time so the hot settings-read path never re-reads
//! an unchanged file.

use std::time::SystemTime;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::options::{
    CompilerOptions, ModuleDetectionKind, ModuleKind, ModuleResolutionKind, PathsMap, ScriptTarget,
};
use crate::resolve::ConfigResolver;

/// Tracing target for options manager operations.
const MANAGER_TARGET: &str = "arkhost_tsconfig::manager";

/// SDK-related options pushed from the editor at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SdkOptions {
    /// Root of the installed dialect SDK.
    pub sdk_path: Utf8PathBuf,
    /// Directory of the SDK's component declarations.
    pub ets_component_path: Utf8PathBuf,
    /// Configuration file shipped with the dialect loader.
    pub ets_loader_config_path: Utf8PathBuf,
    /// Location of the dialect loader itself.
    pub ets_loader_path: Utf8PathBuf,
    /// Base directory for non-relative module names.
    pub base_url: String,
    /// Ambient library set provided by the SDK.
    pub lib: Vec<String>,
    /// Type declaration roots provided by the SDK.
    pub type_roots: Vec<String>,
    /// Module alias map provided by the SDK.
    pub paths: PathsMap,
}

/// Host compiler distribution options pushed from the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypescriptOptions {
    /// Directory holding the host compiler's built-in library files.
    pub tsdk: Utf8PathBuf,
}

/// Configuration payload carried by a configuration-changed notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientOptions {
    /// SDK-related options.
    pub sdk: SdkOptions,
    /// Host compiler distribution options.
    pub typescript: TypescriptOptions,
}

/// Cached parse of the loader configuration file.
#[derive(Debug, Clone)]
struct LoaderConfigCache {
    path: Utf8PathBuf,
    modified: Option<SystemTime>,
    options: CompilerOptions,
}

/// Records runtime options and derives the final compilation settings.
#[derive(Debug, Default)]
pub struct OptionsManager {
    options: ClientOptions,
    loader_cache: Option<LoaderConfigCache>,
}

impl OptionsManager {
    /// Creates a manager with empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current options snapshot.
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Updates the SDK root.
    pub fn set_sdk_path(&mut self, sdk_path: impl Into<Utf8PathBuf>) -> &mut Self {
        let sdk_path = sdk_path.into();
        info!(
            target: MANAGER_TARGET,
            new = %sdk_path,
            old = %self.options.sdk.sdk_path,
            "sdk path changed"
        );
        self.options.sdk.sdk_path = sdk_path;
        self
    }

    /// Updates the component declarations directory.
    pub fn set_ets_component_path(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        let path = path.into();
        info!(
            target: MANAGER_TARGET,
            new = %path,
            old = %self.options.sdk.ets_component_path,
            "component path changed"
        );
        self.options.sdk.ets_component_path = path;
        self
    }

    /// Updates the loader configuration path after checking it exists.
    ///
    /// A path that does not name a readable file is logged and ignored so a
    /// stale editor setting cannot wipe a working configuration.
    pub fn set_ets_loader_config_path(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        let path = path.into();
        info!(
            target: MANAGER_TARGET,
            new = %path,
            old = %self.options.sdk.ets_loader_config_path,
            "loader configuration path changed"
        );
        if !path.exists() {
            warn!(target: MANAGER_TARGET, path = %path, "loader configuration does not exist");
        } else if !path.is_file() {
            warn!(target: MANAGER_TARGET, path = %path, "loader configuration is not a file");
        } else {
            self.options.sdk.ets_loader_config_path = path;
        }
        self
    }

    /// Updates the loader location.
    pub fn set_ets_loader_path(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        let path = path.into();
        info!(
            target: MANAGER_TARGET,
            new = %path,
            old = %self.options.sdk.ets_loader_path,
            "loader path changed"
        );
        self.options.sdk.ets_loader_path = path;
        self
    }

    /// Updates the base URL.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        let base_url = base_url.into();
        info!(
            target: MANAGER_TARGET,
            new = %base_url,
            old = %self.options.sdk.base_url,
            "base url changed"
        );
        self.options.sdk.base_url = base_url;
        self
    }

    /// Replaces the ambient library set.
    pub fn set_lib(&mut self, lib: Vec<String>) -> &mut Self {
        debug!(target: MANAGER_TARGET, new = ?lib, old = ?self.options.sdk.lib, "lib changed");
        self.options.sdk.lib = lib;
        self
    }

    /// Appends one ambient library entry.
    pub fn append_lib(&mut self, lib: impl Into<String>) -> &mut Self {
        let lib = lib.into();
        debug!(target: MANAGER_TARGET, appended = %lib, "lib appended");
        self.options.sdk.lib.push(lib);
        self
    }

    /// Replaces the type declaration roots.
    pub fn set_type_roots(&mut self, type_roots: Vec<String>) -> &mut Self {
        info!(
            target: MANAGER_TARGET,
            new = ?type_roots,
            old = ?self.options.sdk.type_roots,
            "type roots changed"
        );
        self.options.sdk.type_roots = type_roots;
        self
    }

    /// Appends one type declaration root.
    pub fn append_type_root(&mut self, type_root: impl Into<String>) -> &mut Self {
        let type_root = type_root.into();
        debug!(target: MANAGER_TARGET, appended = %type_root, "type root appended");
        self.options.sdk.type_roots.push(type_root);
        self
    }

    /// Replaces the module alias map.
    pub fn set_paths(&mut self, paths: PathsMap) -> &mut Self {
        info!(
            target: MANAGER_TARGET,
            new = ?paths,
            old = ?self.options.sdk.paths,
            "paths changed"
        );
        self.options.sdk.paths = paths;
        self
    }

    /// Adds or replaces one alias entry.
    pub fn append_path(&mut self, alias: impl Into<String>, targets: Vec<String>) -> &mut Self {
        let alias = alias.into();
        debug!(target: MANAGER_TARGET, alias = %alias, targets = ?targets, "path alias appended");
        self.options.sdk.paths.insert(alias, targets);
        self
    }

    /// Updates the host compiler distribution directory.
    pub fn set_tsdk(&mut self, tsdk: impl Into<Utf8PathBuf>) -> &mut Self {
        let tsdk = tsdk.into();
        if tsdk.as_str().is_empty() {
            return self;
        }
        info!(
            target: MANAGER_TARGET,
            new = %tsdk,
            old = %self.options.typescript.tsdk,
            "tsdk path changed"
        );
        self.options.typescript.tsdk = tsdk;
        self
    }

    /// Applies a configuration-changed payload field by field.
    ///
    /// Empty fields in the payload leave the recorded value untouched, so a
    /// partial notification never erases previously pushed options.
    pub fn apply(&mut self, incoming: &ClientOptions) -> &mut Self {
        if !incoming.sdk.base_url.is_empty() {
            self.set_base_url(incoming.sdk.base_url.clone());
        }
        if !incoming.sdk.ets_component_path.as_str().is_empty() {
            self.set_ets_component_path(incoming.sdk.ets_component_path.clone());
        }
        if !incoming.sdk.ets_loader_config_path.as_str().is_empty() {
            self.set_ets_loader_config_path(incoming.sdk.ets_loader_config_path.clone());
        }
        if !incoming.sdk.ets_loader_path.as_str().is_empty() {
            self.set_ets_loader_path(incoming.sdk.ets_loader_path.clone());
        }
        if !incoming.sdk.lib.is_empty() {
            self.set_lib(incoming.sdk.lib.clone());
        }
        if !incoming.sdk.paths.is_empty() {
            self.set_paths(incoming.sdk.paths.clone());
        }
        if !incoming.sdk.sdk_path.as_str().is_empty() {
            self.set_sdk_path(incoming.sdk.sdk_path.clone());
        }
        if !incoming.sdk.type_roots.is_empty() {
            self.set_type_roots(incoming.sdk.type_roots.clone());
        }
        if !incoming.typescript.tsdk.as_str().is_empty() {
            self.set_tsdk(incoming.typescript.tsdk.clone());
        }
        self
    }

    /// Options contributed by the loader configuration file, cached.
    ///
    /// The cache is keyed by path and modification time; editing the file or
    /// pointing the option at a different file invalidates it, a repeated
    /// settings read does not.
    pub fn loader_config_options(&mut self) -> CompilerOptions {
        let path = self.options.sdk.ets_loader_config_path.clone();
        if path.as_str().is_empty() {
            return CompilerOptions::default();
        }

        let modified = modification_time(&path);
        if let Some(cache) = &self.loader_cache {
            if cache.path == path && cache.modified == modified {
                return cache.options.clone();
            }
        }

        let parent = path.parent().unwrap_or(Utf8Path::new("")).to_path_buf();
        let options = ConfigResolver::new(parent).resolve(&path);
        info!(
            target: MANAGER_TARGET,
            path = %path,
            "loader configuration parsed"
        );
        debug!(target: MANAGER_TARGET, options = ?options, "loader configuration options");

        self.loader_cache = Some(LoaderConfigCache {
            path,
            modified,
            options: options.clone(),
        });
        options
    }

    /// Final compilation settings handed to the owning compiler host.
    ///
    /// Precedence, weakest first: loader configuration defaults, the
    /// project's resolved options, then the dialect pins and SDK-provided
    /// values, which win unconditionally.
    pub fn compilation_settings(&mut self, project: CompilerOptions) -> CompilerOptions {
        let defaults = self.loader_config_options();
        let forced = self.forced_overlay();
        defaults.merged_with(project).merged_with(forced)
    }

    /// The compilation mode the dialect requires regardless of user wishes.
    ///
    /// List- and path-valued SDK options join the overlay only when
    /// non-empty so an unconfigured SDK cannot blank out project values.
    fn forced_overlay(&self) -> CompilerOptions {
        let sdk = &self.options.sdk;
        CompilerOptions {
            target: Some(ScriptTarget::EsNext),
            module: Some(ModuleKind::EsNext),
            module_resolution: Some(ModuleResolutionKind::NodeNext),
            module_detection: Some(ModuleDetectionKind::Force),
            experimental_decorators: Some(true),
            emit_decorator_metadata: Some(true),
            strict: Some(true),
            strict_property_initialization: Some(false),
            incremental: Some(true),
            allow_arbitrary_extensions: None,
            lib: non_empty(&sdk.lib),
            type_roots: non_empty(&sdk.type_roots),
            base_url: (!sdk.base_url.is_empty()).then(|| sdk.base_url.clone()),
            paths: (!sdk.paths.is_empty()).then(|| sdk.paths.clone()),
            ets_loader_path: (!sdk.ets_loader_path.as_str().is_empty())
                .then(|| sdk.ets_loader_path.clone()),
        }
    }
}

/// Modification time of a file, when the filesystem reports one.
fn modification_time(path: &Utf8Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

/// Clones a list only when it carries entries.
fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn partial_apply_keeps_existing_values() {
        let mut manager = OptionsManager::new();
        manager.set_sdk_path("/sdk").set_base_url("./oh_modules");

        let incoming = ClientOptions {
            sdk: SdkOptions {
                lib: vec!["es2021".into()],
                ..SdkOptions::default()
            },
            ..ClientOptions::default()
        };
        manager.apply(&incoming);

        assert_eq!(manager.options().sdk.sdk_path, Utf8PathBuf::from("/sdk"));
        assert_eq!(manager.options().sdk.base_url, "./oh_modules");
        assert_eq!(manager.options().sdk.lib, vec!["es2021".to_string()]);
    }

    #[rstest]
    fn empty_tsdk_is_rejected() {
        let mut manager = OptionsManager::new();
        manager.set_tsdk("/tsdk/lib");
        manager.set_tsdk("");
        assert_eq!(
            manager.options().typescript.tsdk,
            Utf8PathBuf::from("/tsdk/lib")
        );
    }

    #[rstest]
    fn dialect_pins_override_project_options() {
        let mut manager = OptionsManager::new();
        let project = CompilerOptions {
            target: Some(ScriptTarget::Es5),
            strict: Some(false),
            ..CompilerOptions::default()
        };

        let settings = manager.compilation_settings(project);
        assert_eq!(settings.target, Some(ScriptTarget::EsNext));
        assert_eq!(settings.strict, Some(true));
        assert_eq!(settings.strict_property_initialization, Some(false));
        assert_eq!(settings.experimental_decorators, Some(true));
    }

    #[rstest]
    fn empty_sdk_lists_do_not_blank_project_values() {
        let mut manager = OptionsManager::new();
        let project = CompilerOptions {
            lib: Some(vec!["dom".into()]),
            ..CompilerOptions::default()
        };

        let settings = manager.compilation_settings(project);
        assert_eq!(settings.lib, Some(vec!["dom".to_string()]));
    }

    #[rstest]
    fn sdk_lists_win_when_configured() {
        let mut manager = OptionsManager::new();
        manager.set_lib(vec!["es2021".into(), "arkts".into()]);
        let project = CompilerOptions {
            lib: Some(vec!["dom".into()]),
            ..CompilerOptions::default()
        };

        let settings = manager.compilation_settings(project);
        assert_eq!(
            settings.lib,
            Some(vec!["es2021".to_string(), "arkts".to_string()])
        );
    }
}
