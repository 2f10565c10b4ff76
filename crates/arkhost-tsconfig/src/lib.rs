//! Configuration resolution for dialect-aware editor tooling.
//!
//! The crate turns a project's configuration file, its `extends` inheritance
//! chain, and the SDK options pushed by the editor into the single flat
//! options object the owning compiler host reads before every type-checking
//! pass. Parsing tolerates comments and trailing commas, every failure
//! degrades to an empty contribution instead of breaking the session, and
//! merge semantics are explicit per key rather than delegated to a generic
//! deep merge.

#![deny(missing_docs)]

mod error;
mod jsonc;
mod manager;
mod options;
mod resolve;

pub use error::ConfigError;
pub use jsonc::parse_str;
pub use manager::{ClientOptions, OptionsManager, SdkOptions, TypescriptOptions};
pub use options::{
    CompilerOptions, ModuleDetectionKind, ModuleKind, ModuleResolutionKind, PathsMap, ScriptTarget,
};
pub use resolve::{CancellationFlag, ConfigFile, ConfigResolver, ExtendsField};
