//! Copying SDK declaration trees into the distribution layout.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::error::DeclarationsError;

/// Tracing target for staging operations.
const STAGE_TARGET: &str = "arkhost_declarations::stage";

/// Category directories staged from the SDK declaration root.
pub(crate) const SOURCE_DIRS: [&str; 3] = ["api", "kits", "arkts"];

/// Category whose files are renamed to the dialect declaration extension.
pub(crate) const KITS_DIR: &str = "kits";

/// Banner stopping the host compiler from diagnosing staged SDK internals.
const NOCHECK_BANNER: &str = "// @ts-nocheck\n";

/// Counts of files written per staging run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    /// Number of declaration files written to the destination.
    pub files_written: usize,
}

/// Stages every declaration file under the SDK root into `dest_root`.
///
/// Directory structure is preserved per category, each file is prefixed
/// with the no-check banner, and `kits` declarations are renamed from
/// `.d.ts` to `.d.ets`. Missing category directories are skipped.
///
/// # Errors
///
/// Returns [`DeclarationsError`] when a file cannot be read, renamed into
/// UTF-8, or written.
pub fn stage(source_root: &Utf8Path, dest_root: &Utf8Path) -> Result<StageSummary, DeclarationsError> {
    let mut summary = StageSummary::default();
    for category in SOURCE_DIRS {
        let source_dir = source_root.join(category);
        if !source_dir.is_dir() {
            continue;
        }
        let dest_dir = dest_root.join(category);
        stage_directory(&source_dir, &dest_dir, category == KITS_DIR, &mut summary)?;
    }
    info!(
        target: STAGE_TARGET,
        source = %source_root,
        dest = %dest_root,
        files = summary.files_written,
        "declaration staging finished"
    );
    Ok(summary)
}

/// Recursively stages one directory.
fn stage_directory(
    source_dir: &Utf8Path,
    dest_dir: &Utf8Path,
    rename_to_dialect: bool,
    summary: &mut StageSummary,
) -> Result<(), DeclarationsError> {
    for entry in read_entries(source_dir)? {
        if entry.is_dir() {
            let Some(name) = entry.file_name() else {
                continue;
            };
            stage_directory(&entry, &dest_dir.join(name), rename_to_dialect, summary)?;
            continue;
        }
        let Some(name) = entry.file_name() else {
            continue;
        };
        if !is_declaration_file(name) {
            continue;
        }
        let staged_name = if rename_to_dialect {
            name.replace(".d.ts", ".d.ets")
        } else {
            name.to_string()
        };

        let text =
            fs::read_to_string(&entry).map_err(|source| DeclarationsError::io(&entry, source))?;
        fs::create_dir_all(dest_dir)
            .map_err(|source| DeclarationsError::io(dest_dir, source))?;
        let dest_path = dest_dir.join(staged_name);
        fs::write(&dest_path, format!("{NOCHECK_BANNER}{text}"))
            .map_err(|source| DeclarationsError::io(&dest_path, source))?;
        summary.files_written += 1;
    }
    Ok(())
}

/// Lists a directory's entries as UTF-8 paths, sorted for determinism.
pub(crate) fn read_entries(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, DeclarationsError> {
    let mut entries = Vec::new();
    let reader = fs::read_dir(dir).map_err(|source| DeclarationsError::io(dir, source))?;
    for entry in reader {
        let entry = entry.map_err(|source| DeclarationsError::io(dir, source))?;
        let path = Utf8PathBuf::from_path_buf(entry.path()).map_err(|_| {
            DeclarationsError::NonUtf8Path {
                parent: dir.to_path_buf(),
            }
        })?;
        entries.push(path);
    }
    entries.sort();
    Ok(entries)
}

/// Whether a file name carries either declaration extension.
pub(crate) fn is_declaration_file(name: &str) -> bool {
    name.ends_with(".d.ts") || name.ends_with(".d.ets")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::is_declaration_file;

    #[rstest]
    #[case("@ohos.window.d.ts", true)]
    #[case("@kit.ArkUI.d.ets", true)]
    #[case("index.ets", false)]
    #[case("index.ts", false)]
    #[case("README.md", false)]
    fn recognises_declaration_files(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_declaration_file(name), expected);
    }
}
