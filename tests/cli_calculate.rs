use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_calculate_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd.arg("calculate").arg("--help").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("Split genomes, run Mash and filter distances"));
    Ok(())
}

#[test]
fn command_all_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd.arg("all").arg("--help").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("complete pipeline"));
    Ok(())
}

#[test]
fn command_calculate_run() -> anyhow::Result<()> {
    // The real pipeline needs seqkit and mash
    if which::which("seqkit").is_err() || which::which("mash").is_err() {
        return Ok(());
    }

    let tempdir = TempDir::new()?;

    let ref_fa = tempdir.path().join("ref.fa");
    let qry_fa = tempdir.path().join("qry.fa");
    std::fs::write(&ref_fa, fasta(&["chr1", "chr2"]))?;
    std::fs::write(&qry_fa, fasta(&["chrA1", "chrB1"]))?;

    let mut cmd = Command::cargo_bin("sgmash")?;
    let output = cmd
        .current_dir(tempdir.path())
        .arg("calculate")
        .arg("Ref")
        .arg(ref_fa.to_str().unwrap())
        .arg("Qry")
        .arg(qry_fa.to_str().unwrap())
        .arg("-s")
        .arg("1")
        .arg("-t")
        .arg("2")
        .output()?;
    if !output.status.success() {
        let stderr = String::from_utf8(output.stderr)?;
        println!("stderr: {}", stderr);
    }
    assert!(output.status.success());

    let filter_file = tempdir.path().join("Ref_Qry_mashDistance.filter.Gadd");
    assert!(filter_file.exists());

    let content = std::fs::read_to_string(&filter_file)?;
    assert!(content.starts_with("Rchr\tQchr\tSubg\tMashD"));
    // one SG1 row per reference chromosome
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("SG1"));

    Ok(())
}

// Pseudo-random FASTA, 500 bp per record, so 31-mers exist and differ
fn fasta(names: &[&str]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!(">{}\n", name));

        let mut state = 0x9e3779b9u64.wrapping_mul(i as u64 + 17);
        for _ in 0..500 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            out.push(b"ACGT"[(state >> 33) as usize % 4] as char);
        }
        out.push('\n');
    }
    out
}
