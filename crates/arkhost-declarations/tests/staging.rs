//! Filesystem-backed tests for declaration staging and alias generation.

use std::fs;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use arkhost_declarations::{module_paths, stage, write_base_config};
use arkhost_tsconfig::{ConfigFile, parse_str};

struct SdkTree {
    _guard: TempDir,
    source: Utf8PathBuf,
    dest: Utf8PathBuf,
}

impl SdkTree {
    fn new() -> Self {
        let guard = TempDir::new().expect("temporary directory should be created");
        let root = Utf8PathBuf::from_path_buf(guard.path().to_path_buf())
            .expect("temporary directory should be UTF-8");
        let source = root.join("ets");
        let dest = root.join("dist");
        fs::create_dir_all(&dest).expect("destination should be created");
        Self {
            _guard: guard,
            source,
            dest,
        }
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.source.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent directories should be created");
        }
        fs::write(&path, contents).expect("declaration should be written");
    }
}

#[fixture]
fn sdk() -> SdkTree {
    SdkTree::new()
}

#[rstest]
fn staged_files_carry_the_nocheck_banner(sdk: SdkTree) {
    sdk.write("api/@ohos.window.d.ts", "export declare function on(): void;");

    let summary = stage(&sdk.source, &sdk.dest).expect("staging should succeed");
    assert_eq!(summary.files_written, 1);

    let staged = fs::read_to_string(sdk.dest.join("api/@ohos.window.d.ts"))
        .expect("staged file should exist");
    assert!(staged.starts_with("// @ts-nocheck\n"));
    assert!(staged.contains("export declare function on()"));
}

#[rstest]
fn kit_declarations_are_renamed_to_the_dialect_extension(sdk: SdkTree) {
    sdk.write("kits/@kit.ArkUI.d.ts", "export * from '@ohos.window';");

    stage(&sdk.source, &sdk.dest).expect("staging should succeed");
    assert!(sdk.dest.join("kits/@kit.ArkUI.d.ets").is_file());
    assert!(!sdk.dest.join("kits/@kit.ArkUI.d.ts").exists());
}

#[rstest]
fn nested_directories_are_preserved(sdk: SdkTree) {
    sdk.write(
        "api/graphics/@ohos.display.d.ts",
        "export declare const id: number;",
    );

    stage(&sdk.source, &sdk.dest).expect("staging should succeed");
    assert!(sdk.dest.join("api/graphics/@ohos.display.d.ts").is_file());
}

#[rstest]
fn non_declaration_files_are_left_behind(sdk: SdkTree) {
    sdk.write("api/README.md", "# not a declaration");
    sdk.write("api/@ohos.window.d.ts", "export {};");

    let summary = stage(&sdk.source, &sdk.dest).expect("staging should succeed");
    assert_eq!(summary.files_written, 1);
    assert!(!sdk.dest.join("api/README.md").exists());
}

#[rstest]
fn module_paths_map_bare_names_to_staged_files(sdk: SdkTree) {
    sdk.write("api/@ohos.window.d.ts", "export declare function on(): void;");
    sdk.write("kits/@kit.ArkUI.d.ts", "export * from '@ohos.window';");
    sdk.write("arkts/@arkts.collections.d.ets", "export declare class List {}");

    let paths = module_paths(&sdk.source).expect("alias generation should succeed");
    assert_eq!(
        paths["@ohos.window"],
        vec!["./api/@ohos.window.d.ts".to_string()]
    );
    assert_eq!(
        paths["@kit.ArkUI"],
        vec!["./kits/@kit.ArkUI.d.ets".to_string()],
        "kit aliases point at the renamed staged file"
    );
    assert_eq!(
        paths["@arkts.collections"],
        vec!["./arkts/@arkts.collections.d.ets".to_string()]
    );
}

#[rstest]
fn exportless_files_are_skipped_without_truncating_the_scan(sdk: SdkTree) {
    // Alphabetically first, so a faulty early exit would drop everything
    // that follows it.
    sdk.write("api/@ohos.aaa.d.ts", "declare const internal: number;");
    sdk.write("api/@ohos.window.d.ts", "export declare function on(): void;");

    let paths = module_paths(&sdk.source).expect("alias generation should succeed");
    assert!(!paths.contains_key("@ohos.aaa"));
    assert!(
        paths.contains_key("@ohos.window"),
        "files after a skipped one must still be scanned"
    );
}

#[rstest]
fn generated_base_config_round_trips_through_the_resolver_types(sdk: SdkTree) {
    sdk.write("api/@ohos.window.d.ts", "export {};");

    let paths = module_paths(&sdk.source).expect("alias generation should succeed");
    let config_path = write_base_config(&sdk.dest, paths).expect("config should be written");

    let text = fs::read_to_string(&config_path).expect("generated config should exist");
    let parsed: ConfigFile = parse_str(&config_path, &text).expect("generated config should parse");
    assert_eq!(parsed.compiler_options.allow_arbitrary_extensions, Some(true));
    let parsed_paths = parsed
        .compiler_options
        .paths
        .expect("generated config should carry the alias table");
    assert_eq!(
        parsed_paths["@ohos.window"],
        vec!["./api/@ohos.window.d.ts".to_string()]
    );
}

#[rstest]
fn missing_category_directories_are_tolerated(sdk: SdkTree) {
    sdk.write("api/@ohos.window.d.ts", "export {};");
    // No kits/ or arkts/ directories exist.

    let summary = stage(&sdk.source, &sdk.dest).expect("staging should succeed");
    assert_eq!(summary.files_written, 1);
    let paths = module_paths(&sdk.source).expect("alias generation should succeed");
    assert_eq!(paths.len(), 1);
}
