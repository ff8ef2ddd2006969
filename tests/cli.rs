use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

fn write_wav(path: &Path, frames: usize) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for index in 0..frames {
        let phase = index as f64 * std::f64::consts::PI * 2.0 * 440.0 / 8_000.0;
        writer.write_sample((phase.sin() * 10_000.0) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn prints_chunk_table_for_valid_wav() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("input.wav");
    write_wav(&path, 400)?;

    Command::cargo_bin("wavescan")?
        .arg(&path)
        .args(["--chunks", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Channel 0"))
        .stdout(predicate::str::contains("400 frames"));
    Ok(())
}

#[test]
fn emits_parseable_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("input.wav");
    write_wav(&path, 128)?;

    let output = Command::cargo_bin("wavescan")?
        .arg(&path)
        .args(["--chunks", "8", "--json"])
        .output()?;
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let channels = parsed.as_array().expect("top-level array");
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0]["chunk_count"], 8);
    assert!(channels[0]["average"].as_array().is_some());
    Ok(())
}

#[test]
fn rejects_range_beyond_chunk_count() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("input.wav");
    write_wav(&path, 64)?;

    Command::cargo_bin("wavescan")?
        .arg(&path)
        .args(["--chunks", "4", "--to", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Range end"));
    Ok(())
}

#[test]
fn rejects_missing_input() -> Result<()> {
    Command::cargo_bin("wavescan")?
        .arg("missing.wav")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}
