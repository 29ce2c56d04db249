use crate::api::{EmbeddedApi, HttpApi, SubmitResponse, TestApi};
use crate::compose::ExamResult;
use crate::data::read_sample_bank;
use crate::error::{ApiError, SessionError};
use crate::model::{
    AppState, MarkingScheme, Question, SessionStatus, Subject, TestMode, TestTemplate,
};
use crate::timer::CountdownTimer;
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub mod actions;
pub mod progress;
pub mod queries;
pub mod resets;
pub mod session;
pub mod view_models;

pub use progress::{LoggingProgressSink, ProgressSink, ProgressUpdate};

/// Background fetch in flight (or the last one, for retry).
#[derive(Clone, Debug)]
pub enum FetchRequest {
    /// Subject mode: every subject's own mock test.
    SubjectTests,
    /// Full mode: composite listing; generated once when empty.
    FullTests,
    /// Custom mode: the subject list to pick from.
    Subjects,
    /// Custom mode: each selected subject's templates, in selection order.
    CustomSources(Vec<Subject>),
    /// A single template whose listing entry had no sections loaded.
    TestById(String),
}

pub enum FetchOutcome {
    Tests(Vec<TestTemplate>),
    Subjects(Vec<Subject>),
    Test(TestTemplate),
    CustomSources(Vec<(Subject, Vec<TestTemplate>)>),
}

/// The active test attempt. Created when the user confirms a start,
/// destroyed on reset. Only one exists at a time.
pub struct Session {
    pub mode: TestMode,
    pub test_id: String,
    pub test_title: String,
    pub scheme: MarkingScheme,
    /// Frozen at start; exactly `scheme.question_count` entries.
    pub working_questions: Vec<Question>,
    /// Keys exist only for answered questions; re-selection overwrites.
    pub answers: HashMap<String, usize>,
    pub current_index: usize,
    pub status: SessionStatus,
    /// At most one live timer; replacing or dropping it cancels the old one.
    pub timer: Option<CountdownTimer>,
}

impl Session {
    pub fn remaining_seconds(&self) -> u64 {
        self.timer.as_ref().map_or(0, |t| t.remaining_seconds())
    }
}

/// Global store for the whole exam screen, owned by the frame loop. All
/// mutation happens synchronously inside `update()`; background threads
/// only ever talk back through the polled channels.
pub struct ExamApp {
    pub(crate) api: Arc<dyn TestApi>,
    pub(crate) progress_sink: Arc<dyn ProgressSink>,

    pub state: AppState,
    pub mode: Option<TestMode>,

    // Source-selection data.
    pub subjects: Vec<Subject>,
    pub available_tests: Vec<TestTemplate>,
    pub selected_subject_ids: Vec<String>,
    pub selected_test: Option<TestTemplate>,
    pub(crate) custom_sources: Option<Vec<(Subject, Vec<TestTemplate>)>>,

    pub session: Option<Session>,
    pub result: Option<ExamResult>,

    pub error: Option<SessionError>,
    pub message: String,

    // Background plumbing, polled once per frame.
    pub(crate) last_fetch: Option<FetchRequest>,
    pub(crate) fetch_rx: Option<Receiver<Result<FetchOutcome, ApiError>>>,
    pub(crate) submit_rx: Option<Receiver<Result<SubmitResponse, ApiError>>>,
    pub submit_pending: bool,
}

impl ExamApp {
    pub fn new(api: Arc<dyn TestApi>, progress_sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            api,
            progress_sink,
            state: AppState::ModeSelect,
            mode: None,
            subjects: Vec::new(),
            available_tests: Vec::new(),
            selected_subject_ids: Vec::new(),
            selected_test: None,
            custom_sources: None,
            session: None,
            result: None,
            error: None,
            message: String::new(),
            last_fetch: None,
            fetch_rx: None,
            submit_rx: None,
            submit_pending: false,
        }
    }

    /// Talks to the REST backend when `EXAM_PREP_API_URL` is set, otherwise
    /// serves the embedded bank.
    pub fn with_default_backend() -> Self {
        let api: Arc<dyn TestApi> = match std::env::var("EXAM_PREP_API_URL") {
            Ok(url) if !url.is_empty() => {
                log::info!("using REST backend at {url}");
                Arc::new(HttpApi::new(url))
            }
            _ => {
                log::info!("no EXAM_PREP_API_URL set, using the embedded bank");
                Arc::new(EmbeddedApi::new(read_sample_bank()))
            }
        };
        Self::new(api, Arc::new(LoggingProgressSink))
    }

    /// One cooperative step: drains finished background work and advances
    /// the countdown. Called once per frame (and by tests).
    pub fn poll_background(&mut self) {
        self.poll_fetch_result();
        self.poll_submit_result();
        self.tick();
    }
}
