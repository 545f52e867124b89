use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_filter_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    cmd.arg("filter")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("closest query chromosomes"));

    Ok(())
}

#[test]
fn command_filter_raw_table() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd
        .arg("filter")
        .arg("tests/sg/Ath_Bna_mashDistance")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let expected = std::fs::read_to_string("tests/sg/Ath_Bna_mashDistance.filter.Gadd")?;
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_filter_single_subgenome() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd
        .arg("filter")
        .arg("tests/sg/Ath_Bna_mashDistance")
        .arg("-s")
        .arg("1")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("chr1\tchrA01\tSG1\t0.05"));
    assert!(!stdout.contains("SG2"));

    Ok(())
}

#[test]
fn command_filter_idempotent() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd
        .arg("filter")
        .arg("tests/sg/Ath_Bna_mashDistance.filter.Gadd")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let expected = std::fs::read_to_string("tests/sg/Ath_Bna_mashDistance.filter.Gadd")?;
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_filter_empty_input() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let infile = tempdir.path().join("empty.tsv");
    std::fs::write(&infile, "")?;

    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd.arg("filter").arg(infile.to_str().unwrap()).output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "Rchr\tQchr\tSubg\tMashD\n");

    Ok(())
}

#[test]
fn command_filter_malformed_input() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let infile = tempdir.path().join("bad.tsv");
    std::fs::write(&infile, "only\ttwo\n")?;

    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd.arg("filter").arg(infile.to_str().unwrap()).output()?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("expected 5 fields"));

    Ok(())
}

#[test]
fn command_filter_subgenomes_out_of_range() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd
        .arg("filter")
        .arg("tests/sg/Ath_Bna_mashDistance")
        .arg("-s")
        .arg("11")
        .output()?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("between 1 and 10"));

    Ok(())
}
