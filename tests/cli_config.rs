use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn copy_fixture_datasets() -> (tempfile::TempDir, PathBuf) {
    let src_root = PathBuf::from("tests/fixtures/datasets");
    let tmp = tempdir().expect("tempdir");
    let dst_root = tmp.path().join("project");
    fs::create_dir_all(&dst_root).expect("create dst_root");

    for entry in fs::read_dir(&src_root).expect("read src_root") {
        let entry = entry.expect("entry");
        if entry.file_type().expect("file_type").is_file() {
            fs::copy(entry.path(), dst_root.join(entry.file_name())).expect("copy file");
        }
    }

    (tmp, dst_root)
}

#[test]
fn cli_run_uses_project_config_datasets_and_search_terms() {
    let (_tmp, project) = copy_fixture_datasets();
    let config_dir = project.join(".mergebench");
    fs::create_dir_all(&config_dir).expect("create .mergebench directory");

    let config_toml = r#"
[run]
format = "json"

[[run.datasets]]
path = "small.csv"
search = "awp | asiimov"

[[run.datasets]]
path = "no_quantity.csv"

[[run.datasets]]
path = "coerce.csv"
"#;
    fs::write(config_dir.join("config.toml"), config_toml).expect("write config.toml");

    let mut cmd = cargo_bin_cmd!("mergebench");
    cmd.current_dir(&project);
    cmd.arg("run");

    let assert = cmd.assert().success();
    let value: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json output");

    let outcomes = value["outcomes"].as_array().expect("outcomes");
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["search"]["index"], 1);
    assert_eq!(outcomes[1]["status"], "skipped");
    assert_eq!(outcomes[2]["coerced"], 1);
    assert!(outcomes[2].get("search").is_none());

    assert_eq!(value["series"]["recursive"].as_array().expect("series").len(), 2);
}

#[test]
fn cli_flags_override_project_config() {
    let (_tmp, project) = copy_fixture_datasets();
    let config_dir = project.join(".mergebench");
    fs::create_dir_all(&config_dir).expect("create .mergebench directory");

    let config_toml = r#"
[run]
sources = ["no_quantity.csv"]
format = "text"
"#;
    fs::write(config_dir.join("config.toml"), config_toml).expect("write config.toml");

    let mut cmd = cargo_bin_cmd!("mergebench");
    cmd.current_dir(&project);
    cmd.args(["run", "small.csv", "--format", "json"]);

    let assert = cmd.assert().success();
    let value: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json output");

    let outcomes = value["outcomes"].as_array().expect("outcomes");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0]["dataset"], "small.csv");
}

#[test]
fn cli_reports_invalid_config() {
    let (_tmp, project) = copy_fixture_datasets();
    let config_dir = project.join(".mergebench");
    fs::create_dir_all(&config_dir).expect("create .mergebench directory");
    fs::write(config_dir.join("config.toml"), "[run\n").expect("write config.toml");

    let mut cmd = cargo_bin_cmd!("mergebench");
    cmd.current_dir(&project);
    cmd.args(["run", "small.csv"]);

    cmd.assert().failure();
}
