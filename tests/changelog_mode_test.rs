//! Changelog merge semantics driven through configuration.

use docwatch::{Settings, Synchronizer};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_project(root: &Path) {
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(root.join("lib/util.ts"), "export const noop = () => {};\n").unwrap();
    fs::write(root.join("README.md"), "# Demo\n\nIntro.\n").unwrap();
}

fn settings_for(root: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.project_root = Some(root.to_path_buf());
    settings
}

#[test]
fn test_replace_mode_keeps_one_block() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_project(root);

    let synchronizer = Synchronizer::new(settings_for(root));
    synchronizer.run_once();
    synchronizer.run_once();
    synchronizer.run_once();

    let readme = fs::read_to_string(root.join("README.md")).unwrap();
    assert_eq!(readme.matches("### Recent Changes").count(), 1);
}

#[test]
fn test_append_mode_accumulates_blocks() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_project(root);

    let mut settings = settings_for(root);
    settings.changelog.mode = docwatch::ChangelogMode::Append;

    let synchronizer = Synchronizer::new(settings);
    synchronizer.run_once();
    synchronizer.run_once();

    let readme = fs::read_to_string(root.join("README.md")).unwrap();
    assert_eq!(readme.matches("### Recent Changes").count(), 2);
    // The rest of the document survives repeated appends
    assert!(readme.starts_with("# Demo\n\nIntro.\n"));
    assert_eq!(readme.matches("## Changelog").count(), 1);
}
