//! DeepReader core: pure browse/polling state machine and view-model helpers.
pub mod browse;
mod effect;
pub mod fetch_form;
mod msg;
pub mod polling;
mod state;
mod types;
mod update;
mod view_model;

pub use browse::{BrowseState, FilterDraft, PAGE_SIZE};
pub use effect::Effect;
pub use fetch_form::{FetchForm, FormError, WindowMode, DEFAULT_FETCH_CATEGORY, MAX_FETCH_DAYS};
pub use msg::Msg;
pub use polling::{JobOutcome, JobWatch, WatchChange, WatchPhase};
pub use state::AppState;
pub use types::{
    Filter, JobId, JobState, JobStatus, Notice, NoticeLevel, Paper, PaperPage, PaperQuery,
    RequestId, Stats, TriggerRequest, TriggerResponse,
};
pub use update::update;
pub use view_model::{AppViewModel, JobBanner, ListView, PaginationView, PaperRowView};
