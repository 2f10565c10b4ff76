//! Typed compiler options and their merge semantics.
//!
//! The tooling core recognises a closed set of option keys. Merging is an
//! explicit, per-key operation rather than a generic deep merge: scalar keys
//! are overridden, array keys are replaced wholesale, and `paths` is merged
//! key-by-key so aliases accumulate across an inheritance chain.

use std::collections::BTreeMap;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Compilation target understood by the host compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScriptTarget {
    /// ECMAScript 5.
    Es5,
    /// ECMAScript 2015, also accepted as `es6`.
    #[strum(to_string = "es2015", serialize = "es6")]
    Es2015,
    /// ECMAScript 2017.
    Es2017,
    /// ECMAScript 2020.
    Es2020,
    /// ECMAScript 2021.
    Es2021,
    /// ECMAScript 2022.
    Es2022,
    /// Latest ratified plus in-flight proposals.
    EsNext,
}

/// Module emission kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModuleKind {
    /// CommonJS modules.
    CommonJs,
    /// ECMAScript 2015 modules, also accepted as `es6`.
    #[strum(to_string = "es2015", serialize = "es6")]
    Es2015,
    /// ECMAScript 2020 modules.
    Es2020,
    /// ECMAScript 2022 modules.
    Es2022,
    /// Latest module semantics.
    EsNext,
    /// Node.js 16 interop rules.
    Node16,
    /// Evolving Node.js interop rules.
    NodeNext,
}

/// Module resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModuleResolutionKind {
    /// Legacy classic resolution.
    Classic,
    /// Node.js CommonJS resolution.
    Node,
    /// Node.js 16 resolution.
    Node16,
    /// Evolving Node.js resolution.
    NodeNext,
    /// Bundler-style resolution.
    Bundler,
}

/// How the compiler decides whether a file is a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModuleDetectionKind {
    /// Infer from import/export syntax.
    Auto,
    /// Pre-module-detection behaviour.
    Legacy,
    /// Treat every file as a module.
    Force,
}

/// Alias map from module patterns to candidate paths.
pub type PathsMap = BTreeMap<String, Vec<String>>;

/// Closed set of compiler options the tooling core recognises.
///
/// Unknown keys in user configuration are ignored rather than rejected so a
/// project can carry options this core does not interpret. Enum-valued keys
/// accept any casing the host compiler accepts (`ES2021`, `es2021`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Compilation target.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "case_insensitive"
    )]
    pub target: Option<ScriptTarget>,
    /// Module emission kind.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "case_insensitive"
    )]
    pub module: Option<ModuleKind>,
    /// Module resolution strategy.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "case_insensitive"
    )]
    pub module_resolution: Option<ModuleResolutionKind>,
    /// Module detection mode.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "case_insensitive"
    )]
    pub module_detection: Option<ModuleDetectionKind>,
    /// Legacy decorator support, required by the dialect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental_decorators: Option<bool>,
    /// Decorator metadata emission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit_decorator_metadata: Option<bool>,
    /// Umbrella strictness flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    /// Property-initialisation strictness, relaxed for dialect structs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_property_initialization: Option<bool>,
    /// Incremental compilation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incremental: Option<bool>,
    /// Permit imports of arbitrary declaration extensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_arbitrary_extensions: Option<bool>,
    /// Ambient library set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib: Option<Vec<String>>,
    /// Type declaration roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_roots: Option<Vec<String>>,
    /// Base directory for non-relative module names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Module alias map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsMap>,
    /// Location of the dialect loader shipped with the SDK.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ets_loader_path: Option<Utf8PathBuf>,
}

impl CompilerOptions {
    /// Overlays `winner` onto `self` and returns the merged result.
    ///
    /// Per-key semantics: scalar keys take `winner`'s value when present;
    /// array keys (`lib`, `typeRoots`) are replaced wholesale, never
    /// concatenated; `paths` merges key-by-key with `winner`'s entries
    /// replacing same-named aliases.
    #[must_use]
    pub fn merged_with(self, winner: CompilerOptions) -> CompilerOptions {
        let paths = match (self.paths, winner.paths) {
            (Some(mut base), Some(over)) => {
                base.extend(over);
                Some(base)
            }
            (base, over) => over.or(base),
        };

        CompilerOptions {
            target: winner.target.or(self.target),
            module: winner.module.or(self.module),
            module_resolution: winner.module_resolution.or(self.module_resolution),
            module_detection: winner.module_detection.or(self.module_detection),
            experimental_decorators: winner
                .experimental_decorators
                .or(self.experimental_decorators),
            emit_decorator_metadata: winner
                .emit_decorator_metadata
                .or(self.emit_decorator_metadata),
            strict: winner.strict.or(self.strict),
            strict_property_initialization: winner
                .strict_property_initialization
                .or(self.strict_property_initialization),
            incremental: winner.incremental.or(self.incremental),
            allow_arbitrary_extensions: winner
                .allow_arbitrary_extensions
                .or(self.allow_arbitrary_extensions),
            lib: winner.lib.or(self.lib),
            type_roots: winner.type_roots.or(self.type_roots),
            base_url: winner.base_url.or(self.base_url),
            paths,
            ets_loader_path: winner.ets_loader_path.or(self.ets_loader_path),
        }
    }
}

/// Deserialises an optional enum value through its case-insensitive parser.
fn case_insensitive<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(text) => T::from_str(&text).map(Some).map_err(serde::de::Error::custom),
    }
}
