//! Pure path classification against the configured SDK and library roots.
//!
//! Classification runs on every keystroke, so it is a total function over
//! plain strings: no I/O, no caching, no failure modes beyond "not a file
//! this tooling handles". Root ownership is a case-sensitive prefix test and
//! an empty root never owns anything.

use camino::{Utf8Path, Utf8PathBuf};

use arkhost_tsconfig::ClientOptions;

/// Extension category of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `.ets` dialect source.
    Ets,
    /// `.d.ets` dialect declaration.
    EtsDeclaration,
    /// `.ts` host-language source.
    Ts,
    /// `.d.ts` host-language declaration.
    TsDeclaration,
}

impl DocumentKind {
    /// Categorises a path by extension, declaration suffixes first.
    #[must_use]
    pub fn of_path(path: &str) -> Option<Self> {
        if path.ends_with(".d.ets") {
            Some(Self::EtsDeclaration)
        } else if path.ends_with(".ets") {
            Some(Self::Ets)
        } else if path.ends_with(".d.ts") {
            Some(Self::TsDeclaration)
        } else if path.ends_with(".ts") {
            Some(Self::Ts)
        } else {
            None
        }
    }

    /// Whether the file is a declaration file of either language.
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        matches!(self, Self::EtsDeclaration | Self::TsDeclaration)
    }

    /// Whether the file is written in the dialect.
    #[must_use]
    pub const fn is_dialect(self) -> bool {
        matches!(self, Self::Ets | Self::EtsDeclaration)
    }
}

/// Root paths ownership is tested against.
///
/// Built once per configuration-changed notification and passed explicitly
/// into classification and projection, never read from ambient state. A new
/// context invalidates every previously computed classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionContext {
    sdk_root: Utf8PathBuf,
    host_lib_root: Utf8PathBuf,
}

impl ProjectionContext {
    /// Creates a context from the SDK root and host library root.
    #[must_use]
    pub fn new(sdk_root: impl Into<Utf8PathBuf>, host_lib_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            sdk_root: sdk_root.into(),
            host_lib_root: host_lib_root.into(),
        }
    }

    /// Builds the context from the editor-supplied options snapshot.
    #[must_use]
    pub fn from_client_options(options: &ClientOptions) -> Self {
        Self::new(
            options.sdk.sdk_path.clone(),
            options.typescript.tsdk.clone(),
        )
    }

    /// Root of the installed dialect SDK.
    #[must_use]
    pub fn sdk_root(&self) -> &Utf8Path {
        self.sdk_root.as_path()
    }

    /// Directory holding the host compiler's built-in declaration files.
    #[must_use]
    pub fn host_lib_root(&self) -> &Utf8Path {
        self.host_lib_root.as_path()
    }
}

/// Ownership classification for a single source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Extension category of the file.
    pub kind: DocumentKind,
    /// Whether the file lives under the configured SDK root.
    pub in_sdk_root: bool,
    /// Whether the file lives under the host compiler's library root.
    pub in_host_lib_root: bool,
}

/// Classifies a path against the configured roots.
///
/// Returns `None` for paths no compiler host should project. Never panics,
/// for any path and any roots including empty ones.
#[must_use]
pub fn classify(path: &Utf8Path, context: &ProjectionContext) -> Option<Classification> {
    let kind = DocumentKind::of_path(path.as_str())?;
    Some(Classification {
        kind,
        in_sdk_root: is_under(path, context.sdk_root()),
        in_host_lib_root: is_under(path, context.host_lib_root()),
    })
}

/// Case-sensitive prefix ownership test; an empty root owns nothing.
fn is_under(path: &Utf8Path, root: &Utf8Path) -> bool {
    !root.as_str().is_empty() && path.as_str().starts_with(root.as_str())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a.ets", Some(DocumentKind::Ets))]
    #[case("a.d.ets", Some(DocumentKind::EtsDeclaration))]
    #[case("a.ts", Some(DocumentKind::Ts))]
    #[case("a.d.ts", Some(DocumentKind::TsDeclaration))]
    #[case("a.json", None)]
    #[case("a", None)]
    #[case("", None)]
    #[case(".ets", Some(DocumentKind::Ets))]
    fn categorises_by_extension(#[case] path: &str, #[case] expected: Option<DocumentKind>) {
        assert_eq!(DocumentKind::of_path(path), expected);
    }

    #[rstest]
    fn declaration_suffixes_shadow_source_suffixes() {
        // `.d.ets` also ends with `.ets`; the declaration test must run first.
        assert_eq!(
            DocumentKind::of_path("sdk/api/foo.d.ets"),
            Some(DocumentKind::EtsDeclaration)
        );
        assert_eq!(
            DocumentKind::of_path("lib/lib.es2021.d.ts"),
            Some(DocumentKind::TsDeclaration)
        );
    }

    #[rstest]
    #[case("", "", "")]
    #[case("sdk/ets/api/foo.d.ets", "", "")]
    #[case("weird/..//path.ts", "sdk", "lib")]
    #[case("no-extension", "sdk", "lib")]
    #[case("../escape.ets", "sdk", "lib")]
    fn classification_is_total(#[case] path: &str, #[case] sdk: &str, #[case] lib: &str) {
        let context = ProjectionContext::new(sdk, lib);
        // Must terminate without panicking for any inputs; the result value
        // is secondary here.
        let _ = classify(Utf8Path::new(path), &context);
    }

    #[rstest]
    fn empty_roots_never_own_files() {
        let context = ProjectionContext::new("", "");
        let classification = classify(Utf8Path::new("sdk/ets/api/foo.d.ets"), &context)
            .expect("declaration files classify");
        assert!(!classification.in_sdk_root);
        assert!(!classification.in_host_lib_root);
    }

    #[rstest]
    fn prefix_tests_are_case_sensitive() {
        let context = ProjectionContext::new("/Sdk", "");
        let classification = classify(Utf8Path::new("/sdk/api/foo.d.ets"), &context)
            .expect("declaration files classify");
        assert!(!classification.in_sdk_root);
    }

    #[rstest]
    fn roots_are_matched_as_prefixes() {
        let context = ProjectionContext::new("/sdk", "/tsdk/lib");
        let classification = classify(Utf8Path::new("/sdk/ets/api/foo.d.ets"), &context)
            .expect("declaration files classify");
        assert!(classification.in_sdk_root);
        assert!(!classification.in_host_lib_root);

        let lib = classify(Utf8Path::new("/tsdk/lib/lib.es2021.d.ts"), &context)
            .expect("lib files classify");
        assert!(lib.in_host_lib_root);
    }
}
