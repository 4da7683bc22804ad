use crate::{JobId, JobStatus, Paper, PaperPage, RequestId, Stats, TriggerResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page mounted: load the first page, categories and stats.
    Started,
    /// User edited the topic box of the filter bar.
    TopicChanged(String),
    /// User edited the start date of the filter bar.
    StartDateChanged(String),
    /// User edited the end date of the filter bar.
    EndDateChanged(String),
    /// User submitted the filter bar.
    ApplyFilters,
    /// User cleared the filter bar.
    ClearFilters,
    NextPage,
    PrevPage,
    /// User picked a 1-based page number.
    PageSelected(u32),
    /// User asked to reload the current page.
    RefreshClicked,
    /// Engine delivered a page of papers.
    PapersLoaded {
        request_id: RequestId,
        page: PaperPage,
    },
    /// Engine failed to load a page of papers.
    PapersFailed {
        request_id: RequestId,
        message: String,
    },
    /// Trigger panel: category expression edited.
    FetchCategoryChanged(String),
    /// Trigger panel: topic edited.
    FetchTopicChanged(String),
    /// Trigger panel: recent-days window selected.
    FetchDaysChanged(String),
    /// Trigger panel: explicit date range selected.
    FetchRangeChanged { start: String, end: String },
    /// Trigger panel submitted.
    TriggerClicked,
    /// Backend accepted the fetch job.
    FetchTriggered(TriggerResponse),
    /// Backend rejected the fetch job or the call failed.
    TriggerFailed { message: String },
    /// Observe a job, or stop observing with `None`.
    WatchJob(Option<JobId>),
    /// A poll tick returned a status.
    JobStatusReceived { job_id: JobId, status: JobStatus },
    /// A poll tick failed.
    JobStatusFailed { job_id: JobId, message: String },
    CategoriesLoaded(Vec<String>),
    CategoriesFailed { message: String },
    StatsRequested,
    StatsLoaded(Stats),
    StatsFailed { message: String },
    /// User asked for the details of one paper.
    PaperRequested(String),
    PaperLoaded(Paper),
    PaperFailed { arxiv_id: String, message: String },
    /// Fallback for unrecognised input.
    NoOp,
}
