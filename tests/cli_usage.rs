//! Integration tests for the CLI surface.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_no_arguments_is_a_usage_error() {
    let mut cmd = cargo_bin_cmd!("voxsplit");

    cmd.assert().failure().stderr(predicate::str::contains(
        "expected <captions_dir> and <video_file> arguments",
    ));
}

#[test]
fn test_single_argument_is_a_usage_error() {
    let mut cmd = cargo_bin_cmd!("voxsplit");
    cmd.arg("captions");

    cmd.assert().failure().stderr(predicate::str::contains(
        "expected <captions_dir> and <video_file> arguments",
    ));
}

#[test]
fn test_missing_caption_file_aborts_before_any_work() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let mut cmd = cargo_bin_cmd!("voxsplit");
    cmd.arg(dir.path()).arg("talk.mkv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("caption file not found"));

    // Nothing was written before the abort.
    assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn test_caption_file_without_cues_succeeds() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("talk.vtt"), "WEBVTT\n\nno cues here\n").expect("write vtt");

    let mut cmd = cargo_bin_cmd!("voxsplit");
    cmd.arg(dir.path()).arg("talk.mkv").arg("--no-progress");

    cmd.assert().success();
}

#[test]
fn test_config_path_prints_toml_location() {
    let mut cmd = cargo_bin_cmd!("voxsplit");
    cmd.arg("config").arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
