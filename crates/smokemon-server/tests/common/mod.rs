#![allow(dead_code)]

use anyhow::Result;
use smokemon_server::config::ReplayConfig;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "Time (UTC),Channel1,Channel2,Channel3";

/// Writes `rows` under a header into a fresh temp dir.
pub fn write_csv(rows: &[&str]) -> Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("smoker-temps.csv");
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content)?;
    Ok((dir, path))
}

pub fn replay_config(csv_path: PathBuf) -> ReplayConfig {
    ReplayConfig {
        csv_path,
        interval_ms: 0,
        ..ReplayConfig::default()
    }
}
