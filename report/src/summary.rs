//! Terminal summary of a run

use std::fmt::Write;

use quiz_bots_core::{BotOutcome, RunReport};

/// Human readable summary of `report`
pub fn render_summary(report: &RunReport) -> String {
    let summary = report.summary();
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "   Quiz Bot Run");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Bots:                 {}", summary.total_bots);
    let _ = writeln!(out, "  Max delay:            {:.1} s", report.max_delay_secs);
    let _ = writeln!(
        out,
        "  Duration:             {:.1} s",
        summary.duration_ms as f64 / 1000.0
    );
    if report.stop_requested {
        let _ = writeln!(out, "  Stop requested:       yes");
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Submitted:            {} ({:.1}%)",
        summary.submitted,
        summary.success_rate() * 100.0
    );
    let _ = writeln!(out, "  Stopped:              {}", summary.stopped);
    let _ = writeln!(out, "  Failed:               {}", summary.failed);
    for (reason, count) in &summary.failures {
        let _ = writeln!(out, "    {reason:<20}{count}");
    }
    let _ = writeln!(out, "  Questions answered:   {}", summary.total_answers);
    if let Some(mean) = summary.mean_percentage {
        let _ = writeln!(out, "  Mean score:           {mean:.1}%");
    }
    let _ = writeln!(out);

    for bot in &report.bots {
        let detail = match &bot.outcome {
            BotOutcome::Completed { result } => format!(
                "submitted  score {}  time {}s",
                result.score_label(),
                bot.time_taken()
            ),
            BotOutcome::Stopped { during } => format!("stopped    during {during}"),
            BotOutcome::Failed { reason, message } => format!("failed     {reason}: {message}"),
        };
        let _ = writeln!(out, "  {:<16}{}", bot.name, detail);
    }

    let _ = writeln!(out, "{}", "=".repeat(60));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_bots_core::{BotRecord, BotState, FailureReason, SubmitResult};

    fn report(bots: Vec<BotRecord>, stop_requested: bool) -> RunReport {
        let started_at = chrono::Utc::now();
        RunReport {
            total_bots: bots.len(),
            max_delay_secs: 2.5,
            stop_requested,
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(7500),
            bots,
        }
    }

    fn bot(bot_id: usize, outcome: BotOutcome) -> BotRecord {
        BotRecord {
            bot_id,
            name: format!("WebBot {bot_id}"),
            outcome,
            answers: vec![0, 1],
            question_times: vec![2, 2],
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_summary_lists_every_bot() {
        let text = render_summary(&report(
            vec![
                bot(
                    0,
                    BotOutcome::Completed {
                        result: SubmitResult {
                            score: Some(2.0),
                            max_score: Some(2.0),
                            percentage: Some(100.0),
                            ..Default::default()
                        },
                    },
                ),
                bot(
                    1,
                    BotOutcome::Failed {
                        reason: FailureReason::SubmitError,
                        message: "HTTP 404: Client not found".to_string(),
                    },
                ),
            ],
            false,
        ));

        assert!(text.contains("Bots:                 2"));
        assert!(text.contains("Duration:             7.5 s"));
        assert!(text.contains("Submitted:            1 (50.0%)"));
        assert!(text.contains("submit_error"));
        assert!(text.contains("score 2/2  time 4s"));
        assert!(text.contains("Client not found"));
        assert!(text.contains("Mean score:           100.0%"));
        assert!(!text.contains("Stop requested"));
    }

    #[test]
    fn test_summary_marks_stop() {
        let text = render_summary(&report(
            vec![bot(
                0,
                BotOutcome::Stopped {
                    during: BotState::AwaitingStart,
                },
            )],
            true,
        ));

        assert!(text.contains("Stop requested:       yes"));
        assert!(text.contains("stopped    during awaiting_start"));
        assert!(!text.contains("Mean score"));
    }
}
