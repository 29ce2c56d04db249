use thiserror::Error;

/// Backend call failures. Wrapped into [`SessionError`] at the app boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("could not decode backend response: {0}")]
    Decode(String),
    #[error("no test with id `{0}`")]
    UnknownTest(String),
}

/// Session-scoped errors. Stored on the app and rendered with a retry
/// affordance; never propagated out of the frame loop.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("could not load tests: {0}")]
    SourceFetchFailed(#[from] ApiError),
    #[error("no questions available for the current selection")]
    NoQuestionsAvailable,
    #[error("could not submit the attempt: {0}")]
    SubmissionFailed(ApiError),
}

impl SessionError {
    /// Recoverable errors keep prior selections and offer a retry of the
    /// exact operation that failed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::SourceFetchFailed(_) | SessionError::NoQuestionsAvailable
        )
    }
}
