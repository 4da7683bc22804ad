use reader_core::{JobStatus, Paper, PaperPage, PaperQuery, Stats, TriggerRequest, TriggerResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, ApiErrorKind, ClientSettings};

const LIST_PAPERS: &str = "Failed to fetch papers";
const GET_PAPER: &str = "Failed to get paper";
const TRIGGER_FETCH: &str = "Failed to trigger fetch";
const JOB_STATUS: &str = "Failed to get job status";
const CATEGORIES: &str = "Failed to get categories";
const STATS: &str = "Failed to get stats";

/// Typed view of the backend HTTP API. One call is one round trip.
#[async_trait::async_trait]
pub trait PaperApi: Send + Sync {
    async fn list_papers(&self, query: &PaperQuery) -> Result<PaperPage, ApiError>;

    async fn paper(&self, arxiv_id: &str) -> Result<Paper, ApiError>;

    async fn trigger_fetch(&self, request: &TriggerRequest) -> Result<TriggerResponse, ApiError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError>;

    async fn categories(&self) -> Result<Vec<String>, ApiError>;

    async fn stats(&self) -> Result<Stats, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestPaperApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestPaperApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        settings.validate()?;
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ApiError::new(ApiErrorKind::InvalidUrl, "base url cannot carry paths")
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, context))?;
        read_json(response, context).await
    }
}

#[async_trait::async_trait]
impl PaperApi for ReqwestPaperApi {
    async fn list_papers(&self, query: &PaperQuery) -> Result<PaperPage, ApiError> {
        let mut url = self.endpoint(&["papers"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            pairs.append_pair("offset", &query.offset.to_string());
            if let Some(topic) = &query.filter.topic {
                pairs.append_pair("topic", topic);
            }
            if let Some(start) = &query.filter.start_date {
                pairs.append_pair("start_date", start);
            }
            if let Some(end) = &query.filter.end_date {
                pairs.append_pair("end_date", end);
            }
        }
        self.get_json(url, LIST_PAPERS).await
    }

    async fn paper(&self, arxiv_id: &str) -> Result<Paper, ApiError> {
        let url = self.endpoint(&["papers", arxiv_id])?;
        self.get_json(url, GET_PAPER).await
    }

    async fn trigger_fetch(&self, request: &TriggerRequest) -> Result<TriggerResponse, ApiError> {
        let url = self.endpoint(&["trigger"])?;
        let body = serde_json::to_vec(request).map_err(|err| {
            ApiError::new(ApiErrorKind::Encode, format!("{TRIGGER_FETCH}: {err}"))
        })?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, TRIGGER_FETCH))?;
        read_json(response, TRIGGER_FETCH).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        let url = self.endpoint(&["jobs", job_id])?;
        self.get_json(url, JOB_STATUS).await
    }

    async fn categories(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["categories"])?;
        let response: CategoriesResponse = self.get_json(url, CATEGORIES).await?;
        Ok(response.categories)
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        let url = self.endpoint(&["stats"])?;
        self.get_json(url, STATS).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| map_reqwest_error(err, context))?;

    if !status.is_success() {
        let detail = error_detail(&body).unwrap_or_else(|| status_text(status));
        return Err(ApiError::new(
            ApiErrorKind::HttpStatus(status.as_u16()),
            format!("{context}: {detail}"),
        ));
    }

    serde_json::from_slice(&body).map_err(|err| {
        ApiError::new(
            ApiErrorKind::Decode,
            format!("{context}: malformed response body ({err})"),
        )
    })
}

/// Structured message from an error body: `message` first, then FastAPI's `detail`.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "detail"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
    })
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| status.as_str().to_string())
}

fn map_reqwest_error(err: reqwest::Error, context: &str) -> ApiError {
    let kind = if err.is_timeout() {
        ApiErrorKind::Timeout
    } else {
        ApiErrorKind::Network
    };
    ApiError::new(kind, format!("{context}: {err}"))
}
