use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque backend job identifier.
pub type JobId = String;

/// Sequence number attached to every list request issued by the browse state.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub arxiv_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Abstract text as published.
    #[serde(default)]
    pub summary: String,
    pub published_date: String,
    pub updated_date: String,
    pub primary_category: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_insights: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaperPage {
    pub items: Vec<Paper>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Conjunctive browse predicate. `None` means the field is not applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    pub topic: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

/// A fully resolved `/papers` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperQuery {
    pub filter: Filter,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Running => write!(f, "running"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: JobId,
    pub status: JobState,
    #[serde(default)]
    pub processed: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub new_papers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl JobStatus {
    /// Rounded completion percentage; 0 while the total is still unknown.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let ratio = f64::from(self.processed.min(self.total)) / f64::from(self.total);
        (ratio * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub status: String,
    pub job_id: JobId,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    #[serde(default)]
    pub last_fetch_time: Option<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
    #[serde(default)]
    pub with_summary: u64,
    #[serde(default)]
    pub without_summary: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient toast shown once by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
}
