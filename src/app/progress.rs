use crate::scorer::SectionScore;
use serde::{Deserialize, Serialize};

/// Notification for a user-progress aggregator outside this screen, sent
/// once per completed session.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub completed_test_id: String,
    pub percentage_score: f32,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub time_taken_seconds: u64,
    pub per_section_scores: Vec<SectionScore>,
}

/// Consumer of progress updates. Injected into the app at construction;
/// there is deliberately no process-wide default instance.
pub trait ProgressSink: Send + Sync {
    fn record(&self, update: &ProgressUpdate);
}

/// Default sink: just logs the update.
pub struct LoggingProgressSink;

impl ProgressSink for LoggingProgressSink {
    fn record(&self, update: &ProgressUpdate) {
        log::info!(
            "completed `{}`: {:.1}% ({}/{} correct, {} s)",
            update.completed_test_id,
            update.percentage_score,
            update.correct_answers,
            update.total_questions,
            update.time_taken_seconds
        );
    }
}
