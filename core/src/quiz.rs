//! Quiz service data model
//!
//! Wire types mirror the JSON bodies of the quiz service and tolerate
//! missing optional fields. Session-side types ([`BotConfig`],
//! [`AnswerRecord`], [`AnswerSheet`]) are owned by a single bot.

use serde::{Deserialize, Serialize};

/// Sentinel stored for a question the bot never answered
pub const UNANSWERED: i64 = -1;

/// Default question count when neither status nor quiz provides one
pub const DEFAULT_NUM_QUESTIONS: usize = 5;

/// Largest answer sheet a bot will allocate
pub const MAX_QUESTIONS: usize = 1_000;

/// Upper bound for the per-question thinking delay, in seconds
pub const MAX_DELAY_SECS: f64 = 10.0;

// ============================================================================
// Server snapshots
// ============================================================================

/// Snapshot returned by `GET /api/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatus {
    /// Whether a quiz has been uploaded
    #[serde(default)]
    pub quiz_loaded: bool,

    /// Whether the quiz is currently running
    #[serde(default)]
    pub quiz_in_progress: bool,

    /// Question count reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<i64>,

    /// Index of the active question, −1 if none
    #[serde(default = "no_active_question")]
    pub current_question_index: i64,

    /// Title of the loaded quiz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_title: Option<String>,

    /// Number of connected clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_clients: Option<u64>,

    /// Number of clients that have submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_clients: Option<u64>,
}

fn no_active_question() -> i64 {
    -1
}

impl Default for QuizStatus {
    fn default() -> Self {
        Self {
            quiz_loaded: false,
            quiz_in_progress: false,
            num_questions: None,
            current_question_index: no_active_question(),
            quiz_title: None,
            total_clients: None,
            completed_clients: None,
        }
    }
}

impl QuizStatus {
    /// The active question index, if one is active
    pub fn active_question(&self) -> Option<usize> {
        usize::try_from(self.current_question_index).ok()
    }
}

/// Quiz content returned by `GET /api/quiz` or inlined on connect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Quiz title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Questions in presentation order
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Number of options offered by the question at `index` (0 if unknown)
    pub fn option_count(&self, index: usize) -> usize {
        self.questions.get(index).map_or(0, |q| q.options.len())
    }

    /// Number of questions in the quiz
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the quiz has no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A single quiz question. Only the options matter to a bot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Answer options; their content is opaque
    #[serde(default)]
    pub options: Vec<serde_json::Value>,
}

impl Question {
    /// Question with `n` placeholder options
    pub fn with_options(n: usize) -> Self {
        Self {
            options: (0..n).map(|i| serde_json::Value::from(i as u64)).collect(),
        }
    }
}

// ============================================================================
// Connect / submit bodies
// ============================================================================

/// Body of `POST /api/client/connect`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// Display name shown on the admin panel
    pub name: String,
}

/// Response of `POST /api/client/connect`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    /// Identity used for submission
    pub client_id: String,

    /// Quiz content, if the server inlines it
    #[serde(default)]
    pub quiz_data: Option<Quiz>,

    /// Whether the quiz was already running at join time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_in_progress: Option<bool>,

    /// Active question at join time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_question_index: Option<i64>,

    /// Connected clients including this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_clients: Option<u64>,
}

/// A joined participant. Immutable after connect.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSession {
    /// Identity used for submission
    pub client_id: String,

    /// Quiz content inlined on connect
    pub quiz: Option<Quiz>,
}

impl From<ConnectResponse> for ClientSession {
    fn from(resp: ConnectResponse) -> Self {
        Self {
            client_id: resp.client_id,
            quiz: resp.quiz_data,
        }
    }
}

/// Body of `POST /api/client/submit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Identity obtained on connect
    pub client_id: String,

    /// Chosen option per question, [`UNANSWERED`] for gaps
    pub answers: Vec<i64>,

    /// Seconds spent per question, 0 for gaps
    pub question_times: Vec<u64>,

    /// Sum of `question_times`
    pub time_taken: u64,
}

/// Response of `POST /api/client/submit`
///
/// The service has returned both a score-based and an accuracy-based
/// shape over time, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    /// Points scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Maximum attainable points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,

    /// Score as a percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,

    /// Time recorded by the server, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<u64>,

    /// Number of correct answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u64>,

    /// Number of questions graded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u64>,

    /// Accuracy percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl SubmitResult {
    /// Percentage score, falling back to accuracy
    pub fn percent(&self) -> Option<f64> {
        self.percentage.or(self.accuracy)
    }

    /// Human readable score, e.g. `3/5`
    pub fn score_label(&self) -> String {
        match (self.score, self.max_score, self.correct_answers, self.total_questions) {
            (Some(s), Some(m), _, _) => format!("{s}/{m}"),
            (_, _, Some(c), Some(t)) => format!("{c}/{t}"),
            _ => "?".to_string(),
        }
    }
}

// ============================================================================
// Session-side types
// ============================================================================

/// Per-bot configuration, fixed at launch
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Bot index in `[0, total_bots)`
    pub id: usize,

    /// Name sent on connect
    pub display_name: String,

    /// Maximum thinking time per question, clamped to `[0, 10]`
    pub max_delay_secs: f64,
}

impl BotConfig {
    /// Create a config, clamping the delay
    pub fn new(id: usize, display_name: impl Into<String>, max_delay_secs: f64) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            max_delay_secs: clamp_delay(max_delay_secs),
        }
    }

    /// Inclusive upper bound of the thinking time in whole seconds (at least 1)
    pub fn max_think_secs(&self) -> u64 {
        (self.max_delay_secs.round() as u64).max(1)
    }
}

/// Clamp a delay to `[0, MAX_DELAY_SECS]`, mapping NaN to 0
pub fn clamp_delay(secs: f64) -> f64 {
    if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, MAX_DELAY_SECS)
    }
}

/// One answered question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Question index
    pub index: usize,

    /// Chosen option
    pub chosen_option: usize,

    /// Thinking time in seconds, at least 1
    pub time_spent_secs: u64,
}

/// Answers collected by one bot, keyed by question index
///
/// Indices are accepted in strictly increasing order; the highest accepted
/// index is the watermark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSheet {
    num_questions: usize,
    records: Vec<AnswerRecord>,
}

impl AnswerSheet {
    /// Empty sheet for a quiz of `num_questions`
    pub fn new(num_questions: usize) -> Self {
        Self {
            num_questions,
            records: Vec::with_capacity(num_questions.min(MAX_QUESTIONS)),
        }
    }

    /// Number of question slots
    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    /// Highest recorded index, if any
    pub fn watermark(&self) -> Option<usize> {
        self.records.last().map(|r| r.index)
    }

    /// Whether `index` is a new question this sheet should act on
    pub fn accepts(&self, index: usize) -> bool {
        index < self.num_questions && self.watermark().map_or(true, |w| index > w)
    }

    /// Record an answer. Returns `false` and leaves the sheet untouched if the
    /// index was already passed or is out of range.
    pub fn record(&mut self, record: AnswerRecord) -> bool {
        if !self.accepts(record.index) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Recorded answers in index order
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    /// Number of answered questions
    pub fn answered(&self) -> usize {
        self.records.len()
    }

    /// Whether every slot has been answered
    pub fn is_complete(&self) -> bool {
        self.records.len() == self.num_questions
    }

    /// Per-slot answers with [`UNANSWERED`] for gaps
    pub fn answers(&self) -> Vec<i64> {
        let mut out = vec![UNANSWERED; self.num_questions];
        for r in &self.records {
            out[r.index] = r.chosen_option as i64;
        }
        out
    }

    /// Per-slot thinking times with 0 for gaps
    pub fn question_times(&self) -> Vec<u64> {
        let mut out = vec![0; self.num_questions];
        for r in &self.records {
            out[r.index] = r.time_spent_secs;
        }
        out
    }

    /// Build the submission body
    pub fn to_payload(&self, client_id: impl Into<String>) -> SubmissionPayload {
        let question_times = self.question_times();
        SubmissionPayload {
            client_id: client_id.into(),
            answers: self.answers(),
            time_taken: question_times.iter().sum(),
            question_times,
        }
    }
}
