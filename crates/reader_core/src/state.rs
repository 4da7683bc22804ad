use crate::browse::BrowseState;
use crate::fetch_form::FetchForm;
use crate::polling::JobWatch;
use crate::view_model::{AppViewModel, JobBanner, ListView, PaginationView, PaperRowView};
use crate::{JobState, Paper, Stats};

/// Page-level state composed from the browse, polling and trigger controllers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) browse: BrowseState,
    pub(crate) watch: JobWatch,
    pub(crate) form: FetchForm,
    pub(crate) categories: Vec<String>,
    pub(crate) stats: Option<Stats>,
    pub(crate) detail: Option<Paper>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn browse(&self) -> &BrowseState {
        &self.browse
    }

    pub fn watch(&self) -> &JobWatch {
        &self.watch
    }

    pub fn form(&self) -> &FetchForm {
        &self.form
    }

    pub fn view(&self) -> AppViewModel {
        let browse = &self.browse;
        let list = if browse.is_loading() {
            ListView::Loading
        } else if browse.papers().is_empty() {
            ListView::Empty
        } else {
            ListView::Ready {
                total: browse.total(),
                rows: browse.papers().iter().map(PaperRowView::from).collect(),
            }
        };

        AppViewModel {
            filter: browse.draft().clone(),
            list,
            pagination: PaginationView {
                offset: browse.offset(),
                limit: browse.limit(),
                total: browse.total(),
                current_page: browse.current_page(),
                page_count: browse.page_count(),
                has_prev: browse.has_prev_page(),
                has_next: browse.has_next_page(),
            },
            banner: self.banner(),
            form: self.form.clone(),
            categories: self.categories.clone(),
            stats: self.stats.clone(),
            detail: self.detail.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn banner(&self) -> Option<JobBanner> {
        let status = self.watch.last_status()?;
        match status.status {
            // Completion is announced by a notice, not a banner.
            JobState::Completed => None,
            JobState::Failed => Some(JobBanner::Failed {
                error: status
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
            JobState::Pending | JobState::Running => Some(JobBanner::InProgress {
                processed: status.processed,
                total: status.total,
                new_papers: status.new_papers,
                percent: status.progress_percent(),
            }),
        }
    }
}
