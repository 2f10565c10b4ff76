//! SDK declaration staging for the host compiler.
//!
//! The dialect SDK ships its ambient API as declaration files grouped into
//! `api/`, `kits/`, and `arkts/` directories. Before the host compiler can
//! consume them they are staged into a distribution layout: each file gains a
//! `// @ts-nocheck` banner so the host never diagnoses SDK internals, kit
//! declarations are renamed to the dialect declaration extension, and a
//! generated base configuration maps bare module names onto the staged
//! files.

#![deny(missing_docs)]

mod error;
mod module_paths;
mod stage;

pub use error::DeclarationsError;
pub use module_paths::{module_paths, write_base_config};
pub use stage::{stage, StageSummary};
