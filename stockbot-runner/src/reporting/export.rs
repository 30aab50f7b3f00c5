//! JSON export of run results.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn export_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("serialize report")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BatchReport;
    use stockbot_core::Signal;

    #[test]
    fn writes_batch_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/scan.json");
        let report = BatchReport {
            results: vec![Signal::skipped("ZZZZ", "unknown ticker: ZZZZ")],
            ..BatchReport::default()
        };
        export_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["analysis_results"][0]["ticker"], "ZZZZ");
        assert_eq!(value["analysis_results"][0]["signal_kind"], "Skip");
        assert!(value["comparison_series"].as_object().unwrap().is_empty());
    }
}
