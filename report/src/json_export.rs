//! JSON export functionality

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use quiz_bots_core::RunReport;

/// Writes run reports as JSON
pub struct JsonExporter;

impl JsonExporter {
    /// Full document: run settings, summary and one entry per bot
    pub fn to_value(report: &RunReport) -> Result<Value> {
        let summary = report.summary();

        Ok(json!({
            "run": {
                "total_bots": report.total_bots,
                "max_delay_secs": report.max_delay_secs,
                "stop_requested": report.stop_requested,
                "started_at": report.started_at,
                "finished_at": report.finished_at,
            },
            "summary": {
                "overall": serde_json::to_value(&summary)?,
                "success_rate_percent": summary.success_rate() * 100.0,
            },
            "bots": serde_json::to_value(&report.bots)?,
        }))
    }

    /// Export the full report to `path`
    pub fn export(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let output = Self::to_value(report)?;

        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &output)?;
        writer.flush()?;

        Ok(())
    }

    /// Export the summary only (smaller file)
    pub fn export_summary(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let output = serde_json::to_string_pretty(&report.summary())?;

        let mut file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_bots_core::{BotOutcome, BotRecord, BotState, FailureReason, SubmitResult};

    fn sample_report() -> RunReport {
        let started_at = chrono::Utc::now();
        RunReport {
            total_bots: 3,
            max_delay_secs: 5.0,
            stop_requested: true,
            started_at,
            finished_at: started_at + chrono::Duration::seconds(42),
            bots: vec![
                BotRecord {
                    bot_id: 0,
                    name: "WebBot 0".to_string(),
                    outcome: BotOutcome::Completed {
                        result: SubmitResult {
                            percentage: Some(80.0),
                            ..Default::default()
                        },
                    },
                    answers: vec![1, 0, 2],
                    question_times: vec![2, 3, 1],
                    elapsed_ms: 40_000,
                },
                BotRecord {
                    bot_id: 1,
                    name: "WebBot 1".to_string(),
                    outcome: BotOutcome::Stopped {
                        during: BotState::Answering,
                    },
                    answers: vec![1, -1, -1],
                    question_times: vec![4, 0, 0],
                    elapsed_ms: 12_000,
                },
                BotRecord {
                    bot_id: 2,
                    name: "WebBot 2".to_string(),
                    outcome: BotOutcome::Failed {
                        reason: FailureReason::ConnectError,
                        message: "HTTP 500: boom".to_string(),
                    },
                    answers: vec![],
                    question_times: vec![],
                    elapsed_ms: 3,
                },
            ],
        }
    }

    #[test]
    fn test_to_value_layout() {
        let value = JsonExporter::to_value(&sample_report()).unwrap();

        assert_eq!(value["run"]["total_bots"], 3);
        assert_eq!(value["run"]["stop_requested"], true);
        assert_eq!(value["summary"]["overall"]["submitted"], 1);
        assert_eq!(value["summary"]["overall"]["failures"]["connect_error"], 1);
        assert_eq!(value["summary"]["overall"]["duration_ms"], 42_000);
        assert_eq!(value["bots"].as_array().unwrap().len(), 3);
        assert_eq!(value["bots"][1]["outcome"]["status"], "stopped");
        assert_eq!(value["bots"][1]["outcome"]["during"], "answering");
    }

    #[test]
    fn test_export_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        JsonExporter::export(&sample_report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["bots"][0]["name"], "WebBot 0");
        assert_eq!(parsed["bots"][0]["answers"], json!([1, 0, 2]));
    }

    #[test]
    fn test_export_summary_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let report = sample_report();

        JsonExporter::export_summary(&report, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let summary: quiz_bots_core::RunSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(summary, report.summary());
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");

        let err = JsonExporter::export(&sample_report(), &path).unwrap_err();
        assert!(err.to_string().contains("failed to create"));
    }
}
