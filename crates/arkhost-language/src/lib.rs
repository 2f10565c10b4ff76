//! File classification and virtual-document projection for dialect tooling.
//!
//! Two compiler hosts coexist in one editor session: a standalone
//! dialect-aware language server and a dialect-unaware plugin inside the host
//! editor's own TypeScript tooling. This crate decides which host owns each
//! source file and projects files into virtual documents whose capability
//! profiles stop the hosts from producing duplicate or conflicting results
//! for the same file. Classification is pure and total; projection is driven
//! by an explicit context built from the editor's configuration, never by
//! ambient state.

#![deny(missing_docs)]

mod classify;
mod document;
mod host;
mod projector;

pub use classify::{classify, Classification, DocumentKind, ProjectionContext};
pub use document::{
    CapabilityProfile, ChangeRange, LanguageId, LanguageIdParseError, SegmentMapping,
    SourceSnapshot, VirtualDocument, ROOT_DOCUMENT_ID,
};
pub use host::{HostMode, ScriptKindTable, ETS_SCRIPT_KIND, TS_SCRIPT_KIND};
pub use projector::{DocumentProjector, ExtensionRegistration, ServiceScript};
