use std::fmt;

use reader_core::{JobId, JobStatus, Paper, PaperPage, RequestId, Stats, TriggerResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PapersLoaded {
        request_id: RequestId,
        result: Result<PaperPage, ApiError>,
    },
    PaperLoaded {
        arxiv_id: String,
        result: Result<Paper, ApiError>,
    },
    FetchTriggered {
        result: Result<TriggerResponse, ApiError>,
    },
    JobStatus {
        job_id: JobId,
        result: Result<JobStatus, ApiError>,
    },
    CategoriesLoaded {
        result: Result<Vec<String>, ApiError>,
    },
    StatsLoaded {
        result: Result<Stats, ApiError>,
    },
}

/// Service-layer failure with a message fit for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Encode,
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Encode => write!(f, "request encoding error"),
            ApiErrorKind::Decode => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}
