//! Projection rules deciding which host materialises which document.
//!
//! Host exclusivity is the central invariant: a file owned by the other
//! host's exclusive domain must never receive a live, capability-enabled
//! document from this host, or both compilers would diagnose it. Files the
//! asking host must stay aware of are projected inert (content intact,
//! capabilities off); files it must not index at all are emptied or not
//! materialised.

use camino::Utf8Path;
use tracing::debug;

use crate::classify::{classify, Classification, DocumentKind, ProjectionContext};
use crate::document::{LanguageId, SourceSnapshot, VirtualDocument};
use crate::host::{HostMode, ETS_SCRIPT_KIND, TS_SCRIPT_KIND};

/// Tracing target for projection decisions.
const PROJECTOR_TARGET: &str = "arkhost_language::projector";

/// Registration of an extra file extension with the host compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionRegistration {
    /// Extension without the leading dot, e.g. `ets`.
    pub extension: &'static str,
    /// Script kind the host should assign to matching files.
    pub script_kind: u32,
    /// Whether the extension hosts embedded languages.
    pub is_mixed_content: bool,
}

/// Extensions the dialect server teaches the host compiler about.
const SERVER_EXTENSIONS: &[ExtensionRegistration] = &[
    ExtensionRegistration {
        extension: "ets",
        script_kind: ETS_SCRIPT_KIND,
        is_mixed_content: false,
    },
    ExtensionRegistration {
        extension: "d.ets",
        script_kind: ETS_SCRIPT_KIND,
        is_mixed_content: false,
    },
];

/// How a projected root is presented to the host compiler's services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceScript {
    /// Extension reported for the service script.
    pub extension: &'static str,
    /// Script kind reported for the service script.
    pub script_kind: u32,
}

/// Applies the host-exclusivity rules for one host process.
#[derive(Debug, Clone)]
pub struct DocumentProjector {
    mode: HostMode,
    context: ProjectionContext,
}

impl DocumentProjector {
    /// Creates a projector for the detected host mode and current roots.
    #[must_use]
    pub fn new(mode: HostMode, context: ProjectionContext) -> Self {
        Self { mode, context }
    }

    /// Host mode the projector was built for.
    #[must_use]
    pub const fn mode(&self) -> HostMode {
        self.mode
    }

    /// Roots currently used for classification.
    #[must_use]
    pub fn context(&self) -> &ProjectionContext {
        &self.context
    }

    /// Replaces the roots after a configuration-changed notification.
    ///
    /// Classifications derived from the previous context are stale; the
    /// caller must re-project every open document.
    pub fn set_context(&mut self, context: ProjectionContext) {
        debug!(
            target: PROJECTOR_TARGET,
            mode = %self.mode,
            sdk_root = %context.sdk_root(),
            host_lib_root = %context.host_lib_root(),
            "projection roots replaced"
        );
        self.context = context;
    }

    /// Language identifier hint for the editor.
    #[must_use]
    pub fn language_id(&self, path: &Utf8Path) -> Option<LanguageId> {
        DocumentKind::of_path(path.as_str()).map(|kind| {
            if kind.is_dialect() {
                LanguageId::Ets
            } else {
                LanguageId::TypeScript
            }
        })
    }

    /// Projects a source snapshot for this host.
    ///
    /// Returning `None` means this host must not materialise any document
    /// for the path.
    #[must_use]
    pub fn project(&self, path: &Utf8Path, snapshot: SourceSnapshot) -> Option<VirtualDocument> {
        let classification = classify(path, &self.context)?;
        let language_id = if classification.kind.is_dialect() {
            LanguageId::Ets
        } else {
            LanguageId::TypeScript
        };

        match self.mode {
            HostMode::EtsServer => {
                Some(self.project_for_server(classification, language_id, snapshot))
            }
            HostMode::TsPlugin => self.project_for_plugin(path, classification, language_id, snapshot),
        }
    }

    /// Projection rules for the dialect-aware server.
    ///
    /// The server materialises a document for every classified file: it is
    /// authoritative over dialect files and SDK declarations, proxies the
    /// host's built-in libraries inertly, and empties ordinary host-language
    /// files so the in-host plugin alone diagnoses them.
    fn project_for_server(
        &self,
        classification: Classification,
        language_id: LanguageId,
        snapshot: SourceSnapshot,
    ) -> VirtualDocument {
        if classification.in_sdk_root && classification.kind.is_declaration() {
            return VirtualDocument::inert(language_id, snapshot);
        }
        if classification.in_host_lib_root && !classification.kind.is_dialect() {
            return VirtualDocument::inert(language_id, snapshot);
        }
        if classification.kind.is_dialect() {
            return VirtualDocument::full(language_id, snapshot);
        }
        VirtualDocument::emptied(language_id, &snapshot)
    }

    /// Projection rules for the dialect-unaware in-host plugin.
    ///
    /// The plugin owns ordinary host-language files outright, must not see
    /// SDK-internal declarations at all, and never materialises dialect
    /// files it cannot parse.
    fn project_for_plugin(
        &self,
        path: &Utf8Path,
        classification: Classification,
        language_id: LanguageId,
        snapshot: SourceSnapshot,
    ) -> Option<VirtualDocument> {
        if classification.in_sdk_root && classification.kind.is_declaration() {
            return Some(VirtualDocument::emptied(language_id, &snapshot));
        }
        if classification.kind.is_dialect() {
            debug!(
                target: PROJECTOR_TARGET,
                path = %path,
                "dialect file left to the dialect server"
            );
            return None;
        }
        Some(VirtualDocument::full(language_id, snapshot))
    }

    /// Extensions to register with the host compiler, beyond its defaults.
    ///
    /// Only the dialect-aware server teaches the host about dialect files;
    /// the in-host plugin leaves the extension table untouched.
    #[must_use]
    pub const fn extra_extensions(&self) -> &'static [ExtensionRegistration] {
        match self.mode {
            HostMode::EtsServer => SERVER_EXTENSIONS,
            HostMode::TsPlugin => &[],
        }
    }

    /// Service-script mapping for a projected root.
    ///
    /// Projected roots are always presented to the host compiler's language
    /// services as plain host-language scripts, whatever their source
    /// extension.
    #[must_use]
    pub const fn service_script(&self) -> ServiceScript {
        ServiceScript {
            extension: ".ets",
            script_kind: TS_SCRIPT_KIND,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::classify::ProjectionContext;

    fn projector(mode: HostMode) -> DocumentProjector {
        DocumentProjector::new(mode, ProjectionContext::new("/sdk", "/tsdk/lib"))
    }

    #[rstest]
    fn unknown_extensions_are_never_projected() {
        for mode in [HostMode::EtsServer, HostMode::TsPlugin] {
            let document = projector(mode).project(
                Utf8Path::new("/project/readme.md"),
                SourceSnapshot::new("# readme"),
            );
            assert!(document.is_none());
        }
    }

    #[rstest]
    fn server_registers_dialect_extensions_and_plugin_does_not() {
        assert_eq!(projector(HostMode::EtsServer).extra_extensions().len(), 2);
        assert!(projector(HostMode::TsPlugin).extra_extensions().is_empty());
    }

    #[rstest]
    fn service_scripts_are_host_language_scripts() {
        let script = projector(HostMode::EtsServer).service_script();
        assert_eq!(script.script_kind, TS_SCRIPT_KIND);
    }

    #[rstest]
    #[case("/project/pages/index.ets", Some(LanguageId::Ets))]
    #[case("/project/src/util.ts", Some(LanguageId::TypeScript))]
    #[case("/project/src/util.d.ts", Some(LanguageId::TypeScript))]
    #[case("/project/assets/logo.png", None)]
    fn language_ids_follow_the_extension(
        #[case] path: &str,
        #[case] expected: Option<LanguageId>,
    ) {
        assert_eq!(
            projector(HostMode::EtsServer).language_id(Utf8Path::new(path)),
            expected
        );
    }

    #[rstest]
    fn replacing_the_context_changes_ownership() {
        let mut projector = projector(HostMode::EtsServer);
        let path = Utf8Path::new("/other-sdk/api/foo.d.ets");

        let before = projector
            .project(path, SourceSnapshot::new("declare const x: number;"))
            .expect("server projects declarations");
        assert!(before.capabilities().is_enabled(), "outside the SDK root");

        projector.set_context(ProjectionContext::new("/other-sdk", "/tsdk/lib"));
        let after = projector
            .project(path, SourceSnapshot::new("declare const x: number;"))
            .expect("server projects declarations");
        assert!(!after.capabilities().is_enabled(), "now inside the SDK root");
    }
}
