//! Virtual document model shared by both compiler hosts.
//!
//! A virtual document is the projection of a source file a compiler host is
//! allowed to see: its text (possibly emptied), a capability profile gating
//! which features may run against it, and a single identity mapping span.
//! Dialect files are single-language, so no embedded-code splitting happens
//! at this layer.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// Identifier of the root projection of a document.
pub const ROOT_DOCUMENT_ID: &str = "root";

/// Immutable text snapshot owned by the editor.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    text: Arc<str>,
    change_range: Option<ChangeRange>,
}

impl SourceSnapshot {
    /// Wraps the full text of a document.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            change_range: None,
        }
    }

    /// Wraps text together with the edit that produced it.
    #[must_use]
    pub fn with_change_range(text: impl Into<Arc<str>>, change_range: ChangeRange) -> Self {
        Self {
            text: text.into(),
            change_range: Some(change_range),
        }
    }

    /// A zero-length snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Full text of the snapshot.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the snapshot in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the snapshot holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The incremental change relative to the previous snapshot, if known.
    #[must_use]
    pub fn change_range(&self) -> Option<ChangeRange> {
        self.change_range
    }
}

/// Span replaced by an edit, relative to the previous snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRange {
    /// Start offset of the replaced span.
    pub start: usize,
    /// Length of the replaced span.
    pub length: usize,
    /// Length of the replacement text.
    pub new_length: usize,
}

/// Feature flags attached to a projected document.
///
/// Profiles are uniform by construction: every capability is on or every
/// capability is off. The two constructors are the only way to build one, so
/// a partially-enabled document cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProfile {
    completion: bool,
    format: bool,
    navigation: bool,
    semantic: bool,
    structure: bool,
    verification: bool,
}

impl CapabilityProfile {
    /// Profile with every capability on.
    #[must_use]
    pub const fn enabled() -> Self {
        Self {
            completion: true,
            format: true,
            navigation: true,
            semantic: true,
            structure: true,
            verification: true,
        }
    }

    /// Profile with every capability off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            completion: false,
            format: false,
            navigation: false,
            semantic: false,
            structure: false,
            verification: false,
        }
    }

    /// Whether completion requests may run against the document.
    #[must_use]
    pub const fn completion(self) -> bool {
        self.completion
    }

    /// Whether formatting requests may run against the document.
    #[must_use]
    pub const fn format(self) -> bool {
        self.format
    }

    /// Whether navigation requests may run against the document.
    #[must_use]
    pub const fn navigation(self) -> bool {
        self.navigation
    }

    /// Whether semantic features may run against the document.
    #[must_use]
    pub const fn semantic(self) -> bool {
        self.semantic
    }

    /// Whether structural features may run against the document.
    #[must_use]
    pub const fn structure(self) -> bool {
        self.structure
    }

    /// Whether diagnostics may be produced for the document.
    #[must_use]
    pub const fn verification(self) -> bool {
        self.verification
    }

    /// Whether the profile is the fully enabled one.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.semantic
    }
}

/// Editor language identifiers understood by the projection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// The dialect.
    Ets,
    /// The host language.
    TypeScript,
}

impl LanguageId {
    /// Identifier string used by the editor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ets => "ets",
            Self::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors raised when parsing language identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language identifier '{0}'")]
pub struct LanguageIdParseError(String);

impl LanguageIdParseError {
    /// The input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for LanguageId {
    type Err = LanguageIdParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "ets" => Ok(Self::Ets),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(LanguageIdParseError(other.to_string())),
        }
    }
}

/// Offset mapping between source text and projected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMapping {
    /// Offset in the source snapshot.
    pub source_offset: usize,
    /// Offset in the projected text.
    pub generated_offset: usize,
    /// Length of the mapped span.
    pub length: usize,
}

/// Projection of a source file presented to a compiler host.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    id: &'static str,
    language_id: LanguageId,
    snapshot: SourceSnapshot,
    capabilities: CapabilityProfile,
    mappings: Vec<SegmentMapping>,
}

impl VirtualDocument {
    /// Full projection: content intact, every capability on.
    #[must_use]
    pub fn full(language_id: LanguageId, snapshot: SourceSnapshot) -> Self {
        Self::identity(language_id, snapshot, CapabilityProfile::enabled())
    }

    /// Inert projection: content intact, every capability off.
    ///
    /// The file stays addressable, so navigation targets inside it still
    /// resolve, but it produces no competing semantics.
    #[must_use]
    pub fn inert(language_id: LanguageId, snapshot: SourceSnapshot) -> Self {
        Self::identity(language_id, snapshot, CapabilityProfile::disabled())
    }

    /// Emptied projection: zero-length content, original span retained.
    ///
    /// The owning host's file enumeration sees an empty module; the mapping
    /// still covers the original source span so offsets that leak through
    /// stay anchored.
    #[must_use]
    pub fn emptied(language_id: LanguageId, source: &SourceSnapshot) -> Self {
        Self {
            id: ROOT_DOCUMENT_ID,
            language_id,
            snapshot: SourceSnapshot::empty(),
            capabilities: CapabilityProfile::disabled(),
            mappings: vec![SegmentMapping {
                source_offset: 0,
                generated_offset: 0,
                length: source.len(),
            }],
        }
    }

    fn identity(
        language_id: LanguageId,
        snapshot: SourceSnapshot,
        capabilities: CapabilityProfile,
    ) -> Self {
        let length = snapshot.len();
        Self {
            id: ROOT_DOCUMENT_ID,
            language_id,
            snapshot,
            capabilities,
            mappings: vec![SegmentMapping {
                source_offset: 0,
                generated_offset: 0,
                length,
            }],
        }
    }

    /// Projection identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id
    }

    /// Language the document is presented as.
    #[must_use]
    pub const fn language_id(&self) -> LanguageId {
        self.language_id
    }

    /// Text the compiler host is allowed to see.
    #[must_use]
    pub fn snapshot(&self) -> &SourceSnapshot {
        &self.snapshot
    }

    /// Capability profile gating feature dispatch.
    #[must_use]
    pub const fn capabilities(&self) -> CapabilityProfile {
        self.capabilities
    }

    /// Mapping spans between source and projected text.
    #[must_use]
    pub fn mappings(&self) -> &[SegmentMapping] {
        self.mappings.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn full_documents_map_the_whole_file() {
        let document = VirtualDocument::full(LanguageId::Ets, SourceSnapshot::new("struct Foo {}"));
        assert!(document.capabilities().is_enabled());
        assert_eq!(document.mappings().len(), 1);
        assert_eq!(document.mappings()[0].length, document.snapshot().len());
    }

    #[rstest]
    fn inert_documents_keep_their_text() {
        let document =
            VirtualDocument::inert(LanguageId::TypeScript, SourceSnapshot::new("declare const x: number;"));
        assert!(!document.capabilities().is_enabled());
        assert_eq!(document.snapshot().text(), "declare const x: number;");
    }

    #[rstest]
    fn emptied_documents_zero_the_text_but_keep_the_span() {
        let source = SourceSnapshot::new("declare module 'm' {}");
        let document = VirtualDocument::emptied(LanguageId::TypeScript, &source);
        assert_eq!(document.snapshot().len(), 0);
        assert_eq!(document.mappings()[0].length, source.len());
        assert!(!document.capabilities().is_enabled());
    }

    #[rstest]
    #[case("ets", Ok(LanguageId::Ets))]
    #[case("TypeScript", Ok(LanguageId::TypeScript))]
    #[case("ts", Ok(LanguageId::TypeScript))]
    #[case("rust", Err(()))]
    fn parses_language_identifiers(#[case] input: &str, #[case] expected: Result<LanguageId, ()>) {
        assert_eq!(input.parse::<LanguageId>().map_err(|_| ()), expected);
    }

    #[rstest]
    fn snapshots_share_text_cheaply() {
        let snapshot = SourceSnapshot::new("let a = 1;");
        let copy = snapshot.clone();
        assert_eq!(snapshot.text(), copy.text());
        assert!(snapshot.change_range().is_none());
    }

    #[rstest]
    fn change_ranges_travel_with_the_snapshot() {
        let snapshot = SourceSnapshot::with_change_range(
            "let ab = 1;",
            ChangeRange {
                start: 4,
                length: 1,
                new_length: 2,
            },
        );
        assert_eq!(
            snapshot.change_range(),
            Some(ChangeRange {
                start: 4,
                length: 1,
                new_length: 2,
            })
        );
    }
}
