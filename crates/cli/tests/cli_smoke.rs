//! Runs the compiled `synchro-pm-docs` binary end to end.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use synchro_pm_docs::{fonts, report};

const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
];

fn cmd() -> Command {
    Command::cargo_bin("synchro-pm-docs").expect("binary is built")
}

fn find_font() -> Option<PathBuf> {
    std::env::var_os("SYNCHRO_PM_TEST_FONT")
        .map(PathBuf::from)
        .into_iter()
        .chain(std::iter::once(PathBuf::from(fonts::DEFAULT_FONT_PATH)))
        .chain(FALLBACK_FONTS.iter().map(|path| PathBuf::from(*path)))
        .find(|path| fonts::font_available(path))
}

#[test]
fn help_lists_the_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--font"));
}

#[test]
fn missing_font_exits_with_status_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("report.pdf");

    cmd()
        .arg("--font")
        .arg(dir.path().join("missing.ttf"))
        .arg("--output")
        .arg(&output)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PDF generated").not())
        .stderr(predicate::str::contains("Error: failed to load font"))
        .stderr(predicate::str::contains("caused by:"));
    assert!(!output.exists());
}

#[test]
fn without_arguments_writes_to_the_download_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir(dir.path().join("download")).expect("create download dir");
    let output = dir.path().join(report::DEFAULT_OUTPUT_PATH);

    let assert = cmd().current_dir(dir.path()).assert();
    if fonts::font_available(fonts::DEFAULT_FONT_PATH) {
        assert
            .success()
            .stdout(predicate::str::contains(format!(
                "PDF generated: {}",
                report::DEFAULT_OUTPUT_PATH
            )));
        assert!(output.is_file());
    } else {
        assert.code(1).stderr(predicate::str::contains("Font file missing"));
        assert!(!output.exists());
    }
}

#[test]
fn explicit_paths_generate_and_verify_the_report() {
    let Some(font) = find_font() else {
        eprintln!("Skipping explicit_paths_generate_and_verify_the_report: no TrueType font found.");
        return;
    };
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("architecture.pdf");

    cmd()
        .arg("--font")
        .arg(&font)
        .arg("--output")
        .arg(&output)
        .arg("--verify")
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "PDF generated: {}",
            output.display()
        )))
        .stderr(predicate::str::contains("Title: SynchroPM_Architecture_Documentation"));

    let bytes = std::fs::read(&output).expect("read output");
    assert!(bytes.starts_with(b"%PDF-"));
}
