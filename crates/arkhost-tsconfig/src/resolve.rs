//! Resolution of project configuration inheritance chains.
//!
//! A project configuration may extend one or more parents, each of which may
//! extend further. The resolver walks that chain depth-first in declaration
//! order, merges contributions with later parents overriding earlier ones,
//! and rewrites inherited path aliases so they stay correct relative to the
//! project root. Every failure along the chain degrades to an empty
//! contribution: the editor must keep working on a broken configuration.

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::jsonc;
use crate::options::CompilerOptions;

/// Tracing target for resolver operations.
const RESOLVE_TARGET: &str = "arkhost_tsconfig::resolve";

/// File name assumed when a reference points at a directory or package.
const DEFAULT_CONFIG_NAME: &str = "tsconfig.json";

/// Cooperative cancellation flag polled between inheritance hops.
///
/// Resolution is synchronous by design; a deep `extends` chain on slow
/// storage is the one place it can stall the request thread, so callers may
/// hand the resolver a flag and flip it when the result is no longer wanted.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of any resolution sharing this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Raw shape of a configuration file on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigFile {
    /// Inherited configuration references, when present.
    pub extends: Option<ExtendsField>,
    /// Options declared by this file itself.
    pub compiler_options: CompilerOptions,
}

/// The `extends` field accepts a single reference or an ordered list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExtendsField {
    /// A single inherited configuration.
    One(String),
    /// An ordered list; later entries override earlier ones.
    Many(Vec<String>),
}

impl ExtendsField {
    /// References in declaration order.
    #[must_use]
    pub fn references(&self) -> &[String] {
        match self {
            Self::One(reference) => std::slice::from_ref(reference),
            Self::Many(references) => references.as_slice(),
        }
    }
}

/// Resolves a project configuration file and its `extends` chain.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    root_dir: Utf8PathBuf,
    cancel: CancellationFlag,
}

impl ConfigResolver {
    /// Creates a resolver anchored at the project root directory.
    #[must_use]
    pub fn new(root_dir: impl Into<Utf8PathBuf>) -> Self {
        Self::with_cancellation(root_dir, CancellationFlag::new())
    }

    /// Creates a resolver that polls the supplied cancellation flag.
    #[must_use]
    pub fn with_cancellation(root_dir: impl Into<Utf8PathBuf>, cancel: CancellationFlag) -> Self {
        Self {
            root_dir: normalise(&root_dir.into()),
            cancel,
        }
    }

    /// Directory inherited path aliases are re-expressed against.
    #[must_use]
    pub fn root_dir(&self) -> &Utf8Path {
        self.root_dir.as_path()
    }

    /// Resolves the project's `tsconfig.json` under the root directory.
    #[must_use]
    pub fn resolve_project(&self) -> CompilerOptions {
        self.resolve(&self.root_dir.join(DEFAULT_CONFIG_NAME))
    }

    /// Resolves the options contributed by `config_path` and its chain.
    ///
    /// A missing or malformed file contributes nothing; the result is then
    /// whatever the `extends` chain produced on its own.
    #[must_use]
    pub fn resolve(&self, config_path: &Utf8Path) -> CompilerOptions {
        let config_path = self.absolutise(config_path);
        if !config_path.is_file() {
            debug!(
                target: RESOLVE_TARGET,
                path = %config_path,
                "project configuration absent, contributing nothing"
            );
            return CompilerOptions::default();
        }

        let file = match load_config_file(&config_path) {
            Ok(file) => file,
            Err(error) => {
                warn!(
                    target: RESOLVE_TARGET,
                    path = %config_path,
                    error = %error,
                    "project configuration unreadable, contributing nothing"
                );
                return CompilerOptions::default();
            }
        };

        let mut visited = BTreeSet::new();
        visited.insert(config_path.clone());

        let inherited = self.resolve_extends(&file, &config_path, &mut visited);
        // The project's own options win key-for-key and are already
        // expressed relative to the root, so no rewrite applies here.
        inherited.merged_with(file.compiler_options)
    }

    /// Folds the contributions of every reference in declaration order.
    fn resolve_extends(
        &self,
        file: &ConfigFile,
        referrer: &Utf8Path,
        visited: &mut BTreeSet<Utf8PathBuf>,
    ) -> CompilerOptions {
        let mut inherited = CompilerOptions::default();
        let Some(extends) = &file.extends else {
            return inherited;
        };

        for reference in extends.references() {
            if self.cancel.is_cancelled() {
                debug!(
                    target: RESOLVE_TARGET,
                    referrer = %referrer,
                    "resolution cancelled between inheritance hops"
                );
                break;
            }
            let contribution = self.resolve_reference(reference, referrer, visited);
            inherited = inherited.merged_with(contribution);
        }
        inherited
    }

    /// Resolves a single `extends` reference, recursively.
    fn resolve_reference(
        &self,
        reference: &str,
        referrer: &Utf8Path,
        visited: &mut BTreeSet<Utf8PathBuf>,
    ) -> CompilerOptions {
        let Some(target) = locate_reference(reference, referrer) else {
            let error = ConfigError::NotFound {
                reference: reference.to_string(),
                referrer: referrer.to_path_buf(),
            };
            warn!(
                target: RESOLVE_TARGET,
                error = %error,
                "skipping unresolvable extends reference"
            );
            return CompilerOptions::default();
        };

        if !visited.insert(target.clone()) {
            let error = ConfigError::CyclicExtends {
                path: target.clone(),
            };
            warn!(
                target: RESOLVE_TARGET,
                error = %error,
                "truncating cyclic extends chain"
            );
            return CompilerOptions::default();
        }

        let file = match load_config_file(&target) {
            Ok(file) => file,
            Err(error) => {
                warn!(
                    target: RESOLVE_TARGET,
                    path = %target,
                    error = %error,
                    "skipping unreadable extended configuration"
                );
                return CompilerOptions::default();
            }
        };

        let inherited = self.resolve_extends(&file, &target, visited);

        let mut own = file.compiler_options;
        let parent_dir = target.parent().unwrap_or(Utf8Path::new(""));
        self.rewrite_paths(&mut own, parent_dir);

        inherited.merged_with(own)
    }

    /// Re-expresses a parent's path aliases relative to the root directory.
    ///
    /// Each alias target is first resolved against the parent's own
    /// directory, then rewritten relative to the root, so the alias keeps
    /// pointing at the same file however deep the chain reaches.
    fn rewrite_paths(&self, options: &mut CompilerOptions, parent_dir: &Utf8Path) {
        let Some(paths) = options.paths.as_mut() else {
            return;
        };
        for targets in paths.values_mut() {
            for target in targets.iter_mut() {
                let resolved = normalise(&parent_dir.join(target.as_str()));
                *target = relative_to(&resolved, &self.root_dir).into_string();
            }
        }
    }

    /// Anchors a possibly relative configuration path at the root.
    fn absolutise(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            normalise(path)
        } else {
            normalise(&self.root_dir.join(path))
        }
    }
}

/// Reads and parses one configuration file.
fn load_config_file(path: &Utf8Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    jsonc::parse_str(path, &text)
}

/// Resolves an `extends` reference the way the host compiler resolves modules.
///
/// Relative and absolute references resolve against the referencing file's
/// directory. Bare specifiers walk `node_modules` directories upward from the
/// referencing file. A reference without a `.json` extension falls back to
/// the name with `.json` appended, then to `tsconfig.json` inside the
/// referenced directory.
fn locate_reference(reference: &str, referrer: &Utf8Path) -> Option<Utf8PathBuf> {
    let referrer_dir = referrer.parent().unwrap_or(Utf8Path::new(""));

    if reference.starts_with("./")
        || reference.starts_with("../")
        || Utf8Path::new(reference).is_absolute()
    {
        return existing_config_file(normalise(&referrer_dir.join(reference)));
    }

    let mut current = Some(referrer_dir);
    while let Some(dir) = current {
        let candidate = normalise(&dir.join("node_modules").join(reference));
        if let Some(found) = existing_config_file(candidate) {
            return Some(found);
        }
        current = dir.parent();
    }
    None
}

/// Picks the concrete file a reference denotes, if any exists.
fn existing_config_file(candidate: Utf8PathBuf) -> Option<Utf8PathBuf> {
    if candidate.extension() == Some("json") {
        return candidate.is_file().then_some(candidate);
    }
    let with_extension = Utf8PathBuf::from(format!("{candidate}.json"));
    if with_extension.is_file() {
        return Some(with_extension);
    }
    let nested = candidate.join(DEFAULT_CONFIG_NAME);
    if nested.is_file() {
        return Some(nested);
    }
    if candidate.is_file() {
        return Some(candidate);
    }
    None
}

/// Collapses `.` and `..` components without touching the filesystem.
fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(Utf8Component::as_str).collect()
}

/// Expresses `target` relative to `base` by walking the common prefix.
fn relative_to(target: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(t, b)| t == b)
        .count();

    let mut relative = Utf8PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_str());
    }
    if relative.as_str().is_empty() {
        relative.push(".");
    }
    relative
}
