use super::*;
use crate::api::{AttemptUpload, LocalSummary};
use crate::compose::{local_result, merge_backend};
use crate::scorer::GroupBy;
use std::collections::BTreeMap;
use std::sync::mpsc;

impl ExamApp {
    /// Records (or overwrites) the answer for a working-set question.
    /// Ignored outside Running — contract violation, not a user error.
    pub fn select_answer(&mut self, question_id: &str, option_index: usize) {
        let Some(session) = self.session.as_mut() else {
            log::debug!("select_answer with no session");
            return;
        };
        if session.status != SessionStatus::Running {
            log::debug!("select_answer ignored: session not running");
            return;
        }
        let Some(question) = session
            .working_questions
            .iter()
            .find(|q| q.id == question_id)
        else {
            log::debug!("select_answer: `{question_id}` not in the working set");
            return;
        };
        if option_index >= question.options.len() {
            log::debug!("select_answer: option {option_index} out of range");
            return;
        }
        session.answers.insert(question_id.to_string(), option_index);
    }

    /// Moves the pointer forward; clamped at the last question, no wrap.
    pub fn next_question(&mut self) {
        if let Some(session) = self.running_session_mut() {
            let last = session.working_questions.len().saturating_sub(1);
            session.current_index = (session.current_index + 1).min(last);
        }
    }

    /// Moves the pointer back; clamped at zero, no wrap.
    pub fn previous_question(&mut self) {
        if let Some(session) = self.running_session_mut() {
            session.current_index = session.current_index.saturating_sub(1);
        }
    }

    pub fn jump_to_question(&mut self, index: usize) {
        if let Some(session) = self.running_session_mut() {
            if index < session.working_questions.len() {
                session.current_index = index;
            }
        }
    }

    /// Advances the countdown; on expiry, completes the session with
    /// whatever answers exist. The timer signals at most once, so this and
    /// an explicit finish can never both complete the same session.
    pub(crate) fn tick(&mut self) {
        let expired = self
            .session
            .as_mut()
            .filter(|s| s.status == SessionStatus::Running)
            .and_then(|s| s.timer.as_mut())
            .map(|t| t.poll_expired())
            .unwrap_or(false);

        if expired {
            log::info!("time is up, auto-submitting");
            self.message = "⏰ Time is up! Your test was submitted automatically.".to_string();
            self.finish_session();
        }
    }

    /// Running → Results. Stops the timer, scores locally, notifies the
    /// progress sink and fires the backend submission. Explicit finish and
    /// timer expiry both land here.
    pub fn finish_session(&mut self) {
        let Some(session) = self.session.as_mut() else {
            log::debug!("finish_session with no session");
            return;
        };
        if session.status != SessionStatus::Running {
            log::debug!("finish_session ignored: session not running");
            return;
        }

        // Stop the clock first so a pending expiry can never re-enter.
        let time_taken = session
            .timer
            .take()
            .map(|t| t.elapsed_seconds())
            .unwrap_or(session.scheme.duration_seconds);
        session.status = SessionStatus::Completed;

        let group_by = GroupBy::for_mode(session.mode);
        let result = local_result(
            &session.working_questions,
            &session.answers,
            &session.scheme,
            group_by,
        );

        self.progress_sink.record(&ProgressUpdate {
            completed_test_id: session.test_id.clone(),
            percentage_score: result.summary.percentage,
            correct_answers: result.summary.correct_count,
            total_questions: result.summary.total_questions,
            time_taken_seconds: time_taken,
            per_section_scores: result.per_section.clone(),
        });

        let upload = build_upload(session, &result.summary, time_taken);
        self.result = Some(result);
        self.state = AppState::Results;
        self.spawn_submit(upload);
    }

    fn spawn_submit(&mut self, upload: AttemptUpload) {
        let (tx, rx) = mpsc::channel();
        self.submit_rx = Some(rx);
        self.submit_pending = true;

        let api = Arc::clone(&self.api);
        std::thread::spawn(move || {
            let _ = tx.send(api.submit_attempt(&upload));
        });
    }

    /// Merges a finished submission into the displayed result. A failed
    /// submission never blocks the results screen: the local computation
    /// stays up, flagged as such.
    pub(crate) fn poll_submit_result(&mut self) {
        let Some(outcome) = self.submit_rx.as_ref().and_then(|rx| rx.try_recv().ok()) else {
            return;
        };
        self.submit_rx = None;
        self.submit_pending = false;

        match outcome {
            Ok(response) => {
                if let (Some(result), Some(session)) = (self.result.take(), self.session.as_ref()) {
                    self.result = Some(merge_backend(
                        result,
                        &response,
                        &session.working_questions,
                    ));
                }
            }
            Err(e) => {
                log::warn!("submission failed, keeping local result: {e}");
                self.error = Some(SessionError::SubmissionFailed(e));
            }
        }
    }

    fn running_session_mut(&mut self) -> Option<&mut Session> {
        self.session
            .as_mut()
            .filter(|s| s.status == SessionStatus::Running)
    }
}

fn build_upload(session: &Session, summary: &crate::scorer::ScoreSummary, time_taken: u64) -> AttemptUpload {
    let mut answers_by_section: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for q in &session.working_questions {
        if let Some(&answer) = session.answers.get(&q.id) {
            answers_by_section
                .entry(q.section_title.clone())
                .or_default()
                .insert(q.id.clone(), answer);
        }
    }
    AttemptUpload {
        test_id: session.test_id.clone(),
        answers_by_section,
        time_taken_seconds: time_taken,
        local_result_summary: LocalSummary {
            total_score: summary.total_score,
            percentage: summary.percentage,
            correct_count: summary.correct_count,
            attempted_count: summary.attempted_count,
            total_questions: summary.total_questions,
        },
    }
}
