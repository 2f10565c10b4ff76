//! Generation of the bare-module alias table for staged declarations.
//!
//! Every top-level declaration file in the SDK's `api/`, `kits/`, and
//! `arkts/` directories becomes an alias from its bare module name to the
//! staged file, so `import window from '@ohos.window'`-style imports resolve
//! without a package manager. Files that export nothing cannot be imported
//! and are skipped; the scan always continues with the next file.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::debug;

use arkhost_tsconfig::{CompilerOptions, PathsMap};

use crate::error::DeclarationsError;
use crate::stage::{is_declaration_file, read_entries, KITS_DIR, SOURCE_DIRS};

/// Tracing target for module path generation.
const MODULE_PATHS_TARGET: &str = "arkhost_declarations::module_paths";

/// File name of the generated base configuration.
const BASE_CONFIG_NAME: &str = "tsconfig.base.json";

/// Builds the bare-module alias map for the SDK declaration root.
///
/// Only the top level of each category directory is scanned; nested files
/// are reachable through their containing module. A missing category
/// directory contributes nothing.
///
/// # Errors
///
/// Returns [`DeclarationsError::Io`] when a present directory or file cannot
/// be read.
pub fn module_paths(source_root: &Utf8Path) -> Result<PathsMap, DeclarationsError> {
    let mut paths = PathsMap::new();
    for category in SOURCE_DIRS {
        let dir = source_root.join(category);
        if !dir.is_dir() {
            continue;
        }
        for entry in read_entries(&dir)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            if !is_declaration_file(name) {
                continue;
            }
            let text =
                fs::read_to_string(&entry).map_err(|source| DeclarationsError::io(&entry, source))?;
            if !text.contains("export") {
                // Nothing importable in the file; move on to the next one.
                debug!(
                    target: MODULE_PATHS_TARGET,
                    path = %entry,
                    "declaration exports nothing, skipping"
                );
                continue;
            }
            let staged_name = if category == KITS_DIR {
                name.replace(".d.ts", ".d.ets")
            } else {
                name.to_string()
            };
            paths.insert(
                module_name(name),
                vec![format!("./{category}/{staged_name}")],
            );
        }
    }
    Ok(paths)
}

/// Writes the generated base configuration next to the staged files.
///
/// # Errors
///
/// Returns [`DeclarationsError::Serialize`] when the configuration cannot be
/// encoded and [`DeclarationsError::Io`] when it cannot be written.
pub fn write_base_config(
    dest_root: &Utf8Path,
    paths: PathsMap,
) -> Result<Utf8PathBuf, DeclarationsError> {
    let config = GeneratedBaseConfig {
        compiler_options: CompilerOptions {
            paths: Some(paths),
            allow_arbitrary_extensions: Some(true),
            ..CompilerOptions::default()
        },
    };
    let text =
        serde_json::to_string_pretty(&config).map_err(DeclarationsError::Serialize)?;

    let path = dest_root.join(BASE_CONFIG_NAME);
    fs::write(&path, text).map_err(|source| DeclarationsError::io(&path, source))?;
    Ok(path)
}

/// Shape of the generated `tsconfig.base.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedBaseConfig {
    compiler_options: CompilerOptions,
}

/// Strips the declaration suffix to obtain the bare module name.
fn module_name(file_name: &str) -> String {
    file_name
        .strip_suffix(".d.ets")
        .or_else(|| file_name.strip_suffix(".d.ts"))
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::module_name;

    #[rstest]
    #[case("@ohos.window.d.ts", "@ohos.window")]
    #[case("@kit.ArkUI.d.ets", "@kit.ArkUI")]
    #[case("plain", "plain")]
    fn strips_declaration_suffixes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(module_name(input), expected);
    }
}
