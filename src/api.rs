use crate::data::SampleBank;
use crate::error::ApiError;
use crate::model::{Section, Subject, TestMode, TestTemplate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Local score summary sent along with an attempt so the backend can audit
/// the client-side computation.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LocalSummary {
    pub total_score: i32,
    pub percentage: f32,
    pub correct_count: usize,
    pub attempted_count: usize,
    pub total_questions: usize,
}

/// Payload for `submit_attempt`. Answers are grouped by section title, as
/// the backend expects them.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AttemptUpload {
    pub test_id: String,
    pub answers_by_section: BTreeMap<String, BTreeMap<String, usize>>,
    pub time_taken_seconds: u64,
    pub local_result_summary: LocalSummary,
}

/// Per-question entry of a backend-confirmed result. Every field except the
/// question text may be absent; the composer backfills from the working set.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BackendQuestionResult {
    pub question: String,
    #[serde(default)]
    pub user_answer: Option<usize>,
    #[serde(default)]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Backend response to a submitted attempt. All fields optional: the
/// composer merges them field by field over the local result.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub percentage: Option<f32>,
    #[serde(default)]
    pub correct_answers: Option<usize>,
    #[serde(default)]
    pub total_questions: Option<usize>,
    #[serde(default)]
    pub results: Option<Vec<BackendQuestionResult>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend contract consumed by the session controller. Implementations
/// must be callable from a background thread.
pub trait TestApi: Send + Sync {
    fn list_subjects(&self) -> Result<Vec<Subject>, ApiError>;
    fn list_tests(&self, mode: TestMode, subject_id: Option<&str>)
        -> Result<Vec<TestTemplate>, ApiError>;
    fn get_test(&self, id: &str) -> Result<TestTemplate, ApiError>;
    fn submit_attempt(&self, attempt: &AttemptUpload) -> Result<SubmitResponse, ApiError>;
    fn generate_composite_test(&self) -> Result<TestTemplate, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// REST client. Runs on a background thread, so the blocking client is fine.
pub struct HttpApi {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send()?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        resp.json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TestApi for HttpApi {
    fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.get_json("/subjects")
    }

    fn list_tests(
        &self,
        mode: TestMode,
        subject_id: Option<&str>,
    ) -> Result<Vec<TestTemplate>, ApiError> {
        let mode_str = match mode {
            TestMode::Subject => "subject",
            TestMode::Full => "full",
            TestMode::Custom => "custom",
        };
        let path = match subject_id {
            Some(id) => format!("/tests?mode={mode_str}&subject={id}"),
            None => format!("/tests?mode={mode_str}"),
        };
        self.get_json(&path)
    }

    fn get_test(&self, id: &str) -> Result<TestTemplate, ApiError> {
        self.get_json(&format!("/tests/{id}"))
    }

    fn submit_attempt(&self, attempt: &AttemptUpload) -> Result<SubmitResponse, ApiError> {
        let url = format!("{}/attempts", self.base_url);
        let resp = self.client.post(&url).json(attempt).send()?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        resp.json::<SubmitResponse>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn generate_composite_test(&self) -> Result<TestTemplate, ApiError> {
        let url = format!("{}/tests/composite/generate", self.base_url);
        let resp = self.client.post(&url).send()?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        resp.json::<TestTemplate>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Embedded implementation
// ---------------------------------------------------------------------------

/// Serves the bundled YAML bank. Default backend when no API URL is
/// configured; also the double used by the integration tests.
pub struct EmbeddedApi {
    bank: SampleBank,
}

impl EmbeddedApi {
    pub fn new(bank: SampleBank) -> Self {
        Self { bank }
    }
}

impl TestApi for EmbeddedApi {
    fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        Ok(self.bank.subjects())
    }

    fn list_tests(
        &self,
        mode: TestMode,
        subject_id: Option<&str>,
    ) -> Result<Vec<TestTemplate>, ApiError> {
        match mode {
            // No stored composite test; the controller will ask us to
            // generate one.
            TestMode::Full => Ok(vec![]),
            TestMode::Subject | TestMode::Custom => {
                let tests = self
                    .bank
                    .subjects
                    .iter()
                    .filter(|s| subject_id.map_or(true, |id| s.id == id))
                    .flat_map(|s| s.tests.iter().cloned())
                    .collect();
                Ok(tests)
            }
        }
    }

    fn get_test(&self, id: &str) -> Result<TestTemplate, ApiError> {
        self.bank
            .subjects
            .iter()
            .flat_map(|s| &s.tests)
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ApiError::UnknownTest(id.to_string()))
    }

    fn submit_attempt(&self, attempt: &AttemptUpload) -> Result<SubmitResponse, ApiError> {
        // Nothing to persist offline: acknowledge and echo nothing back, so
        // the composer keeps every locally computed field.
        log::info!(
            "recording attempt for test `{}` locally ({} s taken)",
            attempt.test_id,
            attempt.time_taken_seconds
        );
        Ok(SubmitResponse {
            message: Some("Attempt recorded on this device.".to_string()),
            ..SubmitResponse::default()
        })
    }

    fn generate_composite_test(&self) -> Result<TestTemplate, ApiError> {
        // One section per subject, each carrying that subject's whole bank.
        let sections: Vec<Section> = self
            .bank
            .subjects
            .iter()
            .map(|s| Section {
                title: s.name.clone(),
                subject_id: Some(s.id.clone()),
                subject_name: Some(s.name.clone()),
                questions: s
                    .tests
                    .iter()
                    .flat_map(|t| t.sections.iter())
                    .flat_map(|sec| sec.questions.iter().cloned())
                    .collect(),
            })
            .collect();

        Ok(TestTemplate {
            id: "full-mock-generated".to_string(),
            title: "Full Mock Exam".to_string(),
            description: "Composite exam generated from every subject.".to_string(),
            sections,
        })
    }
}
