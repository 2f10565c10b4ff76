//! Host-mode detection for the two compiler hosts.
//!
//! The same projection code runs inside two processes: the standalone
//! dialect-aware language server and the dialect-unaware plugin loaded by the
//! host editor's own tooling. Which one is executing is decided once, at
//! plugin construction, by probing the loaded compiler module for the
//! dialect's script-kind marker. The probe sits behind a trait so tests can
//! model either compiler without loading one.

use std::fmt;

/// Script-kind value the dialect compiler assigns to dialect sources.
pub const ETS_SCRIPT_KIND: u32 = 8;

/// Script-kind value used when presenting projected roots to the host.
pub const TS_SCRIPT_KIND: u32 = 3;

/// Name of the script-kind member that marks a dialect-aware compiler.
const DIALECT_MARKER: &str = "ETS";

/// Which of the two compiler hosts is executing this code path.
///
/// The two hosts never share a process, so the value is fixed for the
/// process lifetime once detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostMode {
    /// Standalone dialect-aware language server.
    EtsServer,
    /// Dialect-unaware plugin running inside the host's own tooling.
    TsPlugin,
}

impl HostMode {
    /// Probes the compiler module's script-kind table for the dialect marker.
    ///
    /// An unrecognised module cannot be assumed dialect-aware, so a missing
    /// marker, or a marker with an unexpected value, yields
    /// [`HostMode::TsPlugin`].
    #[must_use]
    pub fn detect(script_kinds: &dyn ScriptKindTable) -> Self {
        match script_kinds.value_of(DIALECT_MARKER) {
            Some(ETS_SCRIPT_KIND) => Self::EtsServer,
            _ => Self::TsPlugin,
        }
    }

    /// Whether this host understands dialect syntax.
    #[must_use]
    pub const fn is_dialect_aware(self) -> bool {
        matches!(self, Self::EtsServer)
    }

    /// Lower-case identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EtsServer => "ets-server",
            Self::TsPlugin => "ts-plugin",
        }
    }
}

impl fmt::Display for HostMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Script-kind table exposed by a loaded compiler module.
///
/// The only structural fact detection relies on: whether the module's
/// script-kind enumeration carries a named member and what numeric value it
/// holds.
pub trait ScriptKindTable {
    /// Numeric value of the named script-kind member, when present.
    fn value_of(&self, member: &str) -> Option<u32>;
}
