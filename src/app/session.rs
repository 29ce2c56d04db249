use super::*;
use crate::pool::{build_custom_pool, build_pool};
use crate::randomizer::working_set;
use std::sync::mpsc;

impl ExamApp {
    /// ModeSelect → SourceSelect. Kicks off the fetch the mode needs.
    pub fn select_mode(&mut self, mode: TestMode) {
        if self.state != AppState::ModeSelect {
            log::debug!("select_mode ignored in state {:?}", self.state);
            return;
        }
        self.mode = Some(mode);
        self.state = AppState::SourceSelect;
        self.error = None;
        self.message.clear();
        self.subjects.clear();
        self.available_tests.clear();
        self.selected_subject_ids.clear();
        self.selected_test = None;
        self.custom_sources = None;

        let request = match mode {
            TestMode::Subject => FetchRequest::SubjectTests,
            TestMode::Full => FetchRequest::FullTests,
            TestMode::Custom => FetchRequest::Subjects,
        };
        self.spawn_fetch(request);
    }

    /// SourceSelect → Previewing for subject/full modes.
    pub fn select_test(&mut self, test_id: &str) {
        if self.state != AppState::SourceSelect {
            log::debug!("select_test ignored in state {:?}", self.state);
            return;
        }
        let Some(test) = self.available_tests.iter().find(|t| t.id == test_id) else {
            log::debug!("select_test: unknown id `{test_id}`");
            return;
        };
        if test.question_count() > 0 {
            self.selected_test = Some(test.clone());
            self.state = AppState::Previewing;
            self.error = None;
        } else {
            // Shallow listing entry: load the full template first.
            self.spawn_fetch(FetchRequest::TestById(test_id.to_string()));
        }
    }

    /// Custom mode: toggles a subject, keeping selection order.
    pub fn toggle_subject(&mut self, subject_id: &str) {
        if self.state != AppState::SourceSelect {
            return;
        }
        if let Some(pos) = self
            .selected_subject_ids
            .iter()
            .position(|id| id == subject_id)
        {
            self.selected_subject_ids.remove(pos);
        } else {
            self.selected_subject_ids.push(subject_id.to_string());
        }
    }

    /// Custom mode: SourceSelect → (fetch) → Previewing. Needs ≥1 subject.
    pub fn confirm_subjects(&mut self) {
        if self.state != AppState::SourceSelect || self.selected_subject_ids.is_empty() {
            return;
        }
        let selection: Vec<Subject> = self
            .selected_subject_ids
            .iter()
            .filter_map(|id| self.subjects.iter().find(|s| &s.id == id))
            .cloned()
            .collect();
        self.spawn_fetch(FetchRequest::CustomSources(selection));
    }

    /// Re-attempts exactly the fetch that failed, keeping all selections.
    pub fn retry_fetch(&mut self) {
        if let Some(request) = self.last_fetch.clone() {
            self.error = None;
            self.spawn_fetch(request);
        }
    }

    pub fn fetch_pending(&self) -> bool {
        self.fetch_rx.is_some()
    }

    pub(crate) fn spawn_fetch(&mut self, request: FetchRequest) {
        let (tx, rx) = mpsc::channel();
        self.last_fetch = Some(request.clone());
        self.fetch_rx = Some(rx);

        let api = Arc::clone(&self.api);
        std::thread::spawn(move || {
            let outcome = match request {
                FetchRequest::SubjectTests => {
                    api.list_tests(TestMode::Subject, None).map(FetchOutcome::Tests)
                }
                FetchRequest::FullTests => api.list_tests(TestMode::Full, None).and_then(|tests| {
                    if tests.is_empty() {
                        // No composite test stored yet: have the backend
                        // generate one, once per entry into full mode.
                        api.generate_composite_test().map(|t| FetchOutcome::Tests(vec![t]))
                    } else {
                        Ok(FetchOutcome::Tests(tests))
                    }
                }),
                FetchRequest::Subjects => api.list_subjects().map(FetchOutcome::Subjects),
                FetchRequest::CustomSources(subjects) => {
                    let mut sources = Vec::with_capacity(subjects.len());
                    let mut failure = None;
                    for subject in subjects {
                        match api.list_tests(TestMode::Custom, Some(&subject.id)) {
                            Ok(tests) => sources.push((subject, tests)),
                            Err(e) => {
                                failure = Some(e);
                                break;
                            }
                        }
                    }
                    match failure {
                        Some(e) => Err(e),
                        None => Ok(FetchOutcome::CustomSources(sources)),
                    }
                }
                FetchRequest::TestById(id) => api.get_test(&id).map(FetchOutcome::Test),
            };
            // Receiver may be gone after a reset; nothing to do then.
            let _ = tx.send(outcome);
        });
    }

    /// Applies a finished fetch. Failures leave the state machine exactly
    /// where it was and surface a retryable error.
    pub(crate) fn poll_fetch_result(&mut self) {
        let Some(outcome) = self.fetch_rx.as_ref().and_then(|rx| rx.try_recv().ok()) else {
            return;
        };
        self.fetch_rx = None;

        match outcome {
            Ok(FetchOutcome::Tests(tests)) => {
                self.available_tests = tests;
                self.error = None;
            }
            Ok(FetchOutcome::Subjects(subjects)) => {
                self.subjects = subjects;
                self.error = None;
            }
            Ok(FetchOutcome::Test(test)) => {
                self.selected_test = Some(test);
                self.state = AppState::Previewing;
                self.error = None;
            }
            Ok(FetchOutcome::CustomSources(sources)) => {
                self.selected_test = Some(synthesize_custom_template(&sources));
                self.custom_sources = Some(sources);
                self.state = AppState::Previewing;
                self.error = None;
            }
            Err(e) => {
                log::warn!("fetch failed: {e}");
                self.error = Some(SessionError::SourceFetchFailed(e));
            }
        }
    }

    /// Previewing → Running: builds the pool, freezes the working set and
    /// starts the countdown. On failure the state stays Previewing.
    pub fn start_session(&mut self) {
        if self.state != AppState::Previewing {
            log::debug!("start_session ignored in state {:?}", self.state);
            return;
        }
        let Some(mode) = self.mode else { return };
        let scheme = MarkingScheme::for_mode(mode);
        let mut rng = rand::thread_rng();

        let pool = match mode {
            TestMode::Custom => match &self.custom_sources {
                Some(sources) => build_custom_pool(sources, &scheme, &mut rng),
                None => Err(SessionError::NoQuestionsAvailable),
            },
            TestMode::Subject | TestMode::Full => match &self.selected_test {
                Some(test) => build_pool(test, &scheme),
                None => Err(SessionError::NoQuestionsAvailable),
            },
        };

        let pool = match pool {
            Ok(pool) => pool,
            Err(e) => {
                log::warn!("pool build failed: {e}");
                self.error = Some(e);
                return;
            }
        };

        let working_questions = working_set(&pool, scheme.question_count, &mut rng);
        let (test_id, test_title) = self
            .selected_test
            .as_ref()
            .map(|t| (t.id.clone(), t.title.clone()))
            .unwrap_or_default();

        log::info!(
            "starting {:?} session on `{test_id}` ({} questions, {} s)",
            mode,
            working_questions.len(),
            scheme.duration_seconds
        );

        // Assigning a fresh timer drops (and so cancels) any previous one.
        self.session = Some(Session {
            mode,
            test_id,
            test_title,
            scheme,
            working_questions,
            answers: HashMap::new(),
            current_index: 0,
            status: SessionStatus::Running,
            timer: Some(CountdownTimer::start(scheme.duration_seconds)),
        });
        self.result = None;
        self.error = None;
        self.message.clear();
        self.state = AppState::Running;
    }
}

/// Preview-only template for a custom selection: one section per subject,
/// in selection order.
fn synthesize_custom_template(sources: &[(Subject, Vec<TestTemplate>)]) -> TestTemplate {
    let sections = sources
        .iter()
        .map(|(subject, tests)| crate::model::Section {
            title: subject.name.clone(),
            subject_id: Some(subject.id.clone()),
            subject_name: Some(subject.name.clone()),
            questions: tests
                .iter()
                .flat_map(|t| t.sections.iter())
                .flat_map(|s| s.questions.iter().cloned())
                .collect(),
        })
        .collect();

    TestTemplate {
        id: "custom-generated".to_string(),
        title: format!("Custom Test ({} subjects)", sources.len()),
        description: "Mixed test over your selected subjects.".to_string(),
        sections,
    }
}
