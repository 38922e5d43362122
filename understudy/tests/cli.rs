// SPDX-License-Identifier: GPL-3.0-or-later

use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use tempfile::tempdir;

#[test]
fn test_understudy_help() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains("Usage: understudy"));
    Ok(())
}

#[test]
fn test_missing_subcommand_fails() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.assert().failure();
    Ok(())
}

#[test]
fn test_list() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.arg("list").current_dir(work_dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("full-double"))
        .stdout(predicate::str::contains("protected-indirect"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_run_every_scenario() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.arg("run").current_dir(work_dir.path());
    cmd.assert().success().stdout(predicate::str::contains("10 passed, 0 failed"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_run_selected_scenarios_as_json() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.args(["run", "--format", "json", "partial-double", "private-direct"]).current_dir(work_dir.path());
    let output = cmd.assert().success().get_output().stdout.clone();

    let report: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(report["passed"], 2);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["outcomes"][0]["name"], "partial-double");
    assert_eq!(report["outcomes"][1]["name"], "private-direct");

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_run_unknown_scenario_fails() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.args(["run", "no-such-scenario"]).current_dir(work_dir.path());
    cmd.assert().failure().stderr(predicate::str::contains("no-such-scenario"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_strict_config_fails_full_double() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let config_file = work_dir.path().join("strict.yml");
    std::fs::write(&config_file, "schema: 1.0\ndoubles:\n  unstubbed: fail\n")?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.arg("--config").arg(&config_file).args(["run", "full-double"]).current_dir(work_dir.path());
    cmd.assert().failure().stdout(predicate::str::contains("FAILED full-double"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_config_in_current_directory_is_picked_up() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    std::fs::write(work_dir.path().join("understudy.yml"), "schema: 1.0\ndoubles:\n  unstubbed: fail\n")?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.args(["run", "full-double"]).current_dir(work_dir.path());
    cmd.assert().failure();

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let config_file = work_dir.path().join("broken.yml");
    std::fs::write(&config_file, "schema: 2.0\n")?;

    let mut cmd = Command::cargo_bin("understudy")?;
    cmd.arg("--config").arg(&config_file).arg("list").current_dir(work_dir.path());
    cmd.assert().failure();

    work_dir.close()?;
    Ok(())
}
