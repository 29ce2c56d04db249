use exam_prep::api::{AttemptUpload, EmbeddedApi, SubmitResponse, TestApi};
use exam_prep::app::{ExamApp, ProgressSink, ProgressUpdate, Session};
use exam_prep::data::read_sample_bank;
use exam_prep::error::{ApiError, SessionError};
use exam_prep::model::{AppState, MarkingScheme, Question, SessionStatus, Subject, TestMode, TestTemplate};
use exam_prep::timer::CountdownTimer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingSink {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl ProgressSink for RecordingSink {
    fn record(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}

/// Embedded bank behind switchable failure injection, for the error paths
/// the real backends only hit under network trouble.
struct FlakyApi {
    inner: EmbeddedApi,
    fail_listing: AtomicBool,
    fail_submit: AtomicBool,
}

impl FlakyApi {
    fn new() -> Self {
        Self {
            inner: EmbeddedApi::new(read_sample_bank()),
            fail_listing: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
        }
    }
}

impl TestApi for FlakyApi {
    fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.inner.list_subjects()
    }

    fn list_tests(
        &self,
        mode: TestMode,
        subject_id: Option<&str>,
    ) -> Result<Vec<TestTemplate>, ApiError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(ApiError::Status(503));
        }
        self.inner.list_tests(mode, subject_id)
    }

    fn get_test(&self, id: &str) -> Result<TestTemplate, ApiError> {
        self.inner.get_test(id)
    }

    fn submit_attempt(&self, attempt: &AttemptUpload) -> Result<SubmitResponse, ApiError> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ApiError::Status(500));
        }
        self.inner.submit_attempt(attempt)
    }

    fn generate_composite_test(&self) -> Result<TestTemplate, ApiError> {
        self.inner.generate_composite_test()
    }
}

fn app_with_sink() -> (ExamApp, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let app = ExamApp::new(
        Arc::new(EmbeddedApi::new(read_sample_bank())),
        Arc::clone(&sink) as Arc<dyn ProgressSink>,
    );
    (app, sink)
}

/// Pumps the cooperative loop until `pred` holds, failing after ~1 s.
fn pump_until(app: &mut ExamApp, pred: impl Fn(&ExamApp) -> bool, what: &str) {
    for _ in 0..200 {
        app.poll_background();
        if pred(app) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for: {what}");
}

#[test]
fn subject_mode_runs_end_to_end() {
    let (mut app, sink) = app_with_sink();

    app.select_mode(TestMode::Subject);
    assert_eq!(app.state, AppState::SourceSelect);
    pump_until(&mut app, |a| !a.available_tests.is_empty(), "test listing");

    let test_id = app.available_tests[0].id.clone();
    app.select_test(&test_id);
    assert_eq!(app.state, AppState::Previewing);

    app.start_session();
    assert_eq!(app.state, AppState::Running);
    let session = app.session.as_ref().expect("session frozen at start");
    assert_eq!(session.working_questions.len(), 30);
    assert_eq!(session.status, SessionStatus::Running);
    assert!(session.remaining_seconds() <= 1800);
    assert!(session.remaining_seconds() >= 1795);

    // Answer a mix of right and wrong; the pool is smaller than the
    // working set here, so duplicates share ids and answers.
    let questions = session.working_questions.clone();
    for (i, q) in questions.iter().enumerate().take(12) {
        if i % 3 == 0 {
            let wrong = (q.correct_answer_index + 1) % q.options.len();
            app.select_answer(&q.id, wrong);
        } else {
            app.select_answer(&q.id, q.correct_answer_index);
        }
    }
    let answers = app.session.as_ref().unwrap().answers.clone();
    let scheme = app.session.as_ref().unwrap().scheme;

    app.finish_session();
    assert_eq!(app.state, AppState::Results);
    let result = app.result.as_ref().expect("local result is immediate");
    assert_eq!(result.summary.total_questions, 30);
    assert_eq!(result.breakdown.len(), 30);
    assert!(result.summary.attempted_count >= 1);
    assert!((0.0..=100.0).contains(&result.summary.percentage));
    // The displayed summary is exactly the scorer's pure function of the
    // frozen working set and the captured answers.
    let expected = exam_prep::scorer::score(&questions, &answers, &scheme);
    assert_eq!(result.summary, expected);

    // The embedded backend acknowledges without overriding anything.
    pump_until(&mut app, |a| !a.submit_pending, "submission to settle");
    let result = app.result.as_ref().unwrap();
    assert!(!result.locally_computed);
    assert_eq!(
        result.message.as_deref(),
        Some("Attempt recorded on this device.")
    );

    let updates = sink.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].total_questions, 30);
    assert!(!updates[0].per_section_scores.is_empty());
}

#[test]
fn full_mode_generates_a_composite_exam_when_listing_is_empty() {
    let (mut app, _sink) = app_with_sink();

    app.select_mode(TestMode::Full);
    pump_until(&mut app, |a| !a.available_tests.is_empty(), "composite test");
    assert_eq!(app.available_tests.len(), 1);

    let test_id = app.available_tests[0].id.clone();
    app.select_test(&test_id);
    app.start_session();

    let session = app.session.as_ref().unwrap();
    assert_eq!(session.working_questions.len(), 50);
    assert_eq!(session.scheme, MarkingScheme::COMPOSITE);
    assert!(session.working_questions.iter().all(|q| q.marks_on_correct == 2));
}

#[test]
fn custom_mode_mixes_the_selected_subjects() {
    let (mut app, _sink) = app_with_sink();

    app.select_mode(TestMode::Custom);
    pump_until(&mut app, |a| !a.subjects.is_empty(), "subject listing");
    assert!(app.subjects.len() >= 2);

    let first = app.subjects[0].id.clone();
    let second = app.subjects[1].id.clone();
    app.toggle_subject(&first);
    app.toggle_subject(&second);
    assert_eq!(app.selected_subject_ids, vec![first.clone(), second.clone()]);

    app.confirm_subjects();
    pump_until(
        &mut app,
        |a| a.state == AppState::Previewing,
        "custom preview",
    );

    app.start_session();
    let session = app.session.as_ref().unwrap();
    assert_eq!(session.working_questions.len(), 30);
    let subjects: Vec<&str> = session
        .working_questions
        .iter()
        .map(|q| q.subject_id.as_str())
        .collect();
    assert!(subjects.contains(&first.as_str()));
    assert!(subjects.contains(&second.as_str()));
    assert!(subjects.iter().all(|s| *s == first || *s == second));
}

#[test]
fn toggling_a_subject_twice_deselects_it() {
    let (mut app, _sink) = app_with_sink();
    app.select_mode(TestMode::Custom);
    pump_until(&mut app, |a| !a.subjects.is_empty(), "subject listing");

    let id = app.subjects[0].id.clone();
    app.toggle_subject(&id);
    app.toggle_subject(&id);
    assert!(app.selected_subject_ids.is_empty());

    // Confirming an empty selection goes nowhere.
    app.confirm_subjects();
    assert_eq!(app.state, AppState::SourceSelect);
}

#[test]
fn events_outside_their_state_are_ignored() {
    let (mut app, _sink) = app_with_sink();

    // Nothing is running yet: all of these must be no-ops.
    app.select_answer("q1", 0);
    app.next_question();
    app.previous_question();
    app.finish_session();
    app.start_session();
    assert_eq!(app.state, AppState::ModeSelect);
    assert!(app.session.is_none());
    assert!(app.result.is_none());

    // select_test before a mode was picked is also a no-op.
    app.select_test("os-mock-1");
    assert_eq!(app.state, AppState::ModeSelect);
}

#[test]
fn navigation_clamps_and_answers_overwrite() {
    let (mut app, _sink) = app_with_sink();
    app.select_mode(TestMode::Subject);
    pump_until(&mut app, |a| !a.available_tests.is_empty(), "test listing");
    let test_id = app.available_tests[0].id.clone();
    app.select_test(&test_id);
    app.start_session();

    // No wraparound below zero.
    app.previous_question();
    assert_eq!(app.session.as_ref().unwrap().current_index, 0);

    // No wraparound past the end.
    for _ in 0..100 {
        app.next_question();
    }
    assert_eq!(app.session.as_ref().unwrap().current_index, 29);
    assert!(app.on_last_question());

    // Direct jumps land in range; out-of-range jumps are ignored.
    app.jump_to_question(10);
    assert_eq!(app.session.as_ref().unwrap().current_index, 10);
    app.jump_to_question(999);
    assert_eq!(app.session.as_ref().unwrap().current_index, 10);

    // Re-selecting replaces, never accumulates.
    let q = app.session.as_ref().unwrap().working_questions[0].clone();
    app.select_answer(&q.id, 0);
    app.select_answer(&q.id, 1);
    assert_eq!(app.selected_answer(&q.id), Some(1));
    let answer_entries = app
        .session
        .as_ref()
        .unwrap()
        .answers
        .iter()
        .filter(|(id, _)| **id == q.id)
        .count();
    assert_eq!(answer_entries, 1);

    // An out-of-range option index is rejected.
    app.select_answer(&q.id, 99);
    assert_eq!(app.selected_answer(&q.id), Some(1));
}

#[test]
fn fetch_failure_keeps_state_and_retry_recovers() {
    let api = Arc::new(FlakyApi::new());
    api.fail_listing.store(true, Ordering::SeqCst);
    let sink = Arc::new(RecordingSink::default());
    let mut app = ExamApp::new(
        Arc::clone(&api) as Arc<dyn TestApi>,
        sink as Arc<dyn ProgressSink>,
    );

    app.select_mode(TestMode::Subject);
    pump_until(&mut app, |a| a.error.is_some(), "fetch failure to surface");

    // The failure is retryable and leaves the machine exactly where it was.
    assert!(matches!(
        app.error,
        Some(SessionError::SourceFetchFailed(_))
    ));
    assert!(app.error.as_ref().unwrap().is_recoverable());
    assert_eq!(app.state, AppState::SourceSelect);
    assert_eq!(app.mode, Some(TestMode::Subject));
    assert!(app.available_tests.is_empty());

    // Retry re-attempts the same fetch; once the backend recovers, the
    // listing arrives and the error clears.
    api.fail_listing.store(false, Ordering::SeqCst);
    app.retry_fetch();
    pump_until(&mut app, |a| !a.available_tests.is_empty(), "listing after retry");
    assert!(app.error.is_none());
    assert_eq!(app.state, AppState::SourceSelect);
}

#[test]
fn submission_failure_keeps_the_local_result() {
    let api = Arc::new(FlakyApi::new());
    api.fail_submit.store(true, Ordering::SeqCst);
    let sink = Arc::new(RecordingSink::default());
    let mut app = ExamApp::new(
        Arc::clone(&api) as Arc<dyn TestApi>,
        Arc::clone(&sink) as Arc<dyn ProgressSink>,
    );

    app.select_mode(TestMode::Subject);
    pump_until(&mut app, |a| !a.available_tests.is_empty(), "test listing");
    let test_id = app.available_tests[0].id.clone();
    app.select_test(&test_id);
    app.start_session();

    let q = app.session.as_ref().unwrap().working_questions[0].clone();
    app.select_answer(&q.id, q.correct_answer_index);
    app.finish_session();
    pump_until(&mut app, |a| !a.submit_pending, "submission to settle");

    // The results screen stays up on the local computation, flagged as such;
    // the failure is recorded but not retryable.
    assert_eq!(app.state, AppState::Results);
    let result = app.result.as_ref().unwrap();
    assert!(result.locally_computed);
    assert!(result.summary.total_score > 0);
    assert!(matches!(app.error, Some(SessionError::SubmissionFailed(_))));
    assert!(!app.error.as_ref().unwrap().is_recoverable());

    // Progress was still recorded: the sink does not depend on the backend.
    assert_eq!(sink.updates.lock().unwrap().len(), 1);
}

#[test]
fn timer_expiry_completes_the_session_automatically() {
    let (mut app, sink) = app_with_sink();

    // A session whose clock has already run out.
    let question = Question {
        id: "q0".to_string(),
        text: "placeholder".to_string(),
        options: vec!["a".into(), "b".into()],
        correct_answer_index: 0,
        explanation: None,
        subject_id: "s".into(),
        subject_name: "Subject".into(),
        section_title: "Section".into(),
        section_index: 0,
        marks_on_correct: 4,
        marks_lost_on_incorrect: 1,
    };
    app.state = AppState::Running;
    app.session = Some(Session {
        mode: TestMode::Subject,
        test_id: "t".into(),
        test_title: "T".into(),
        scheme: MarkingScheme::STANDARD,
        working_questions: vec![question],
        answers: HashMap::new(),
        current_index: 0,
        status: SessionStatus::Running,
        timer: Some(CountdownTimer::start(0)),
    });

    app.poll_background();
    assert_eq!(app.state, AppState::Results);
    assert_eq!(
        app.session.as_ref().unwrap().status,
        SessionStatus::Completed
    );
    let result = app.result.as_ref().unwrap();
    assert_eq!(result.summary.attempted_count, 0);
    assert_eq!(result.summary.total_score, 0);

    // Expiry completes once; further polling must not double-finish.
    let before = sink.updates.lock().unwrap().len();
    app.poll_background();
    app.poll_background();
    assert_eq!(sink.updates.lock().unwrap().len(), before);
}

#[test]
fn reset_clears_everything_and_cancels_the_timer() {
    let (mut app, sink) = app_with_sink();
    app.select_mode(TestMode::Subject);
    pump_until(&mut app, |a| !a.available_tests.is_empty(), "test listing");
    let test_id = app.available_tests[0].id.clone();
    app.select_test(&test_id);
    app.start_session();
    assert!(app.session.is_some());

    // Leaving Running without finishing: no scoring, no submission, no
    // progress update.
    app.reset_session();
    assert_eq!(app.state, AppState::ModeSelect);
    assert!(app.session.is_none());
    assert!(app.result.is_none());
    assert!(app.mode.is_none());
    assert!(app.selected_test.is_none());
    assert!(!app.submit_pending);

    app.poll_background();
    assert!(sink.updates.lock().unwrap().is_empty());
}
