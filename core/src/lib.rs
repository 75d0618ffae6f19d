//! quiz-bots-core: Core types and engine for the quiz bot swarm
//!
//! This crate provides everything the swarm needs apart from a transport
//! and a random source, including:
//!
//! - Quiz service data model (status, quiz, connect/submit bodies)
//! - Core traits (QuizApi, AnswerSampler)
//! - Bot session state machine and status poller
//! - Orchestrator with live run statistics and stop propagation
//! - Run report and summary
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bot;
pub mod channel;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod quiz;
pub mod report;
pub mod traits;

pub use bot::{BotOutcome, BotSession, BotSessionBuilder, BotState};
pub use channel::{BotEvent, BotEventKind, ChannelConfig};
pub use config::{RunConfig, MAX_BOTS, MIN_BOTS};
pub use error::*;
pub use orchestrator::{
    ensure_quiz_started, Orchestrator, OrchestratorBuilder, RunStats, RunStatsSnapshot, StopHandle,
};
pub use poller::{PollOutcome, StatusPoller};
pub use quiz::*;
pub use report::{BotRecord, RunReport, RunSummary};
pub use traits::*;

#[cfg(test)]
mod integration_tests {
    use super::*;

    // =========================================================================
    // Wire format compatibility tests
    // =========================================================================

    #[test]
    fn test_status_tolerates_missing_fields() {
        let status: QuizStatus = serde_json::from_str(r#"{"quizLoaded":true}"#).unwrap();

        assert!(status.quiz_loaded);
        assert!(!status.quiz_in_progress);
        assert_eq!(status.current_question_index, -1);
        assert_eq!(status.active_question(), None);
        assert_eq!(status.num_questions, None);
    }

    #[test]
    fn test_status_camel_case() {
        let status: QuizStatus = serde_json::from_str(
            r#"{"quizLoaded":true,"quizInProgress":true,"numQuestions":8,
                "currentQuestionIndex":2,"quizTitle":"Rust","totalClients":12,
                "completedClients":3}"#,
        )
        .unwrap();

        assert_eq!(status.active_question(), Some(2));
        assert_eq!(status.num_questions, Some(8));
        assert_eq!(status.quiz_title.as_deref(), Some("Rust"));
        assert_eq!(status.completed_clients, Some(3));
    }

    #[test]
    fn test_connect_response_with_inlined_quiz() {
        let resp: ConnectResponse = serde_json::from_str(
            r#"{"clientId":"abc","quizData":{"title":"T","questions":[
                {"text":"Q1","options":["a","b","c"]},
                {"text":"Q2","options":[]}]},
                "quizInProgress":false,"totalClients":4}"#,
        )
        .unwrap();

        let session = ClientSession::from(resp);
        let quiz = session.quiz.unwrap();
        assert_eq!(session.client_id, "abc");
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.option_count(0), 3);
        assert_eq!(quiz.option_count(1), 0);
        assert_eq!(quiz.option_count(9), 0);
    }

    #[test]
    fn test_submission_json_format() {
        let mut sheet = AnswerSheet::new(3);
        sheet.record(AnswerRecord {
            index: 1,
            chosen_option: 2,
            time_spent_secs: 4,
        });

        let json = serde_json::to_value(sheet.to_payload("abc")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "clientId": "abc",
                "answers": [-1, 2, -1],
                "questionTimes": [0, 4, 0],
                "timeTaken": 4
            })
        );
    }

    #[test]
    fn test_submit_result_alternate_shape() {
        let result: SubmitResult = serde_json::from_str(
            r#"{"correctAnswers":3,"totalQuestions":5,"accuracy":60.0}"#,
        )
        .unwrap();

        assert_eq!(result.percent(), Some(60.0));
        assert_eq!(result.score_label(), "3/5");
    }

    #[test]
    fn test_report_json_includes_outcome_tag() {
        let outcome = BotOutcome::Failed {
            reason: FailureReason::QuizFetchError,
            message: "HTTP 404: ".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "quiz_fetch_error");
    }
}
