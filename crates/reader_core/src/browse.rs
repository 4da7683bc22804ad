//! Browse controller: filter, pagination cursor and the currently displayed page.
//!
//! Every list request gets a fresh [`RequestId`]. Only the response to the most
//! recently issued request is applied, so a slow filtered response can never
//! overwrite the result of a later `clear`.

use reader_logging::{reader_debug, reader_error, reader_warn};

use crate::fetch_form::{non_empty, optional_date, FormError};
use crate::{Filter, Paper, PaperPage, PaperQuery, RequestId};

pub const PAGE_SIZE: u32 = 20;

/// Raw text of the filter bar inputs, committed only on apply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterDraft {
    pub topic: String,
    pub start_date: String,
    pub end_date: String,
}

impl FilterDraft {
    fn to_filter(&self) -> Result<Filter, FormError> {
        Ok(Filter {
            topic: non_empty(&self.topic),
            start_date: optional_date("start", &self.start_date)?,
            end_date: optional_date("end", &self.end_date)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    draft: FilterDraft,
    committed: Filter,
    offset: u32,
    limit: u32,
    papers: Vec<Paper>,
    total: u64,
    loading: bool,
    latest_request: Option<RequestId>,
    next_request_id: RequestId,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            draft: FilterDraft::default(),
            committed: Filter::default(),
            offset: 0,
            limit: PAGE_SIZE,
            papers: Vec::new(),
            total: 0,
            // The first load starts as soon as the page is mounted.
            loading: true,
            latest_request: None,
            next_request_id: 1,
        }
    }
}

impl BrowseState {
    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FilterDraft {
        &mut self.draft
    }

    pub fn committed(&self) -> &Filter {
        &self.committed
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.offset) + u64::from(self.limit) < self.total
    }

    pub fn has_prev_page(&self) -> bool {
        self.offset > 0
    }

    pub fn page_count(&self) -> u32 {
        let limit = u64::from(self.limit.max(1));
        u32::try_from(self.total.div_ceil(limit)).unwrap_or(u32::MAX)
    }

    /// 1-based page number of the current offset.
    pub fn current_page(&self) -> u32 {
        self.offset / self.limit.max(1) + 1
    }

    /// Commits the draft filter and restarts from the first page.
    pub fn apply_filters(&mut self) -> Result<(RequestId, PaperQuery), FormError> {
        self.committed = self.draft.to_filter()?;
        self.offset = 0;
        Ok(self.issue())
    }

    /// Resets the draft and committed filters, then requests the unfiltered first page.
    pub fn clear_filters(&mut self) -> (RequestId, PaperQuery) {
        self.draft = FilterDraft::default();
        self.committed = Filter::default();
        self.offset = 0;
        self.issue()
    }

    pub fn set_offset(&mut self, offset: u32) -> (RequestId, PaperQuery) {
        self.offset = offset;
        self.issue()
    }

    pub fn next_page(&mut self) -> Option<(RequestId, PaperQuery)> {
        self.has_next_page()
            .then(|| self.set_offset(self.offset.saturating_add(self.limit)))
    }

    pub fn prev_page(&mut self) -> Option<(RequestId, PaperQuery)> {
        self.has_prev_page()
            .then(|| self.set_offset(self.offset.saturating_sub(self.limit)))
    }

    /// Jumps to a 1-based page, clamped to the known page count.
    pub fn go_to_page(&mut self, page: u32) -> (RequestId, PaperQuery) {
        let last = self.page_count().max(1);
        let page = page.clamp(1, last);
        self.set_offset((page - 1).saturating_mul(self.limit))
    }

    /// Re-requests the current page with the committed filter.
    pub fn refresh(&mut self) -> (RequestId, PaperQuery) {
        self.issue()
    }

    /// Returns to the first page so newly imported papers become visible.
    pub fn reload_from_start(&mut self) -> (RequestId, PaperQuery) {
        self.set_offset(0)
    }

    /// Applies a loaded page. Returns `false` when the response was superseded.
    pub fn on_page_loaded(&mut self, request_id: RequestId, mut page: PaperPage) -> bool {
        if !self.is_latest(request_id) {
            reader_debug!("Discarding stale paper page for request {}", request_id);
            return false;
        }
        let limit = self.limit as usize;
        if page.items.len() > limit {
            reader_warn!(
                "Backend returned {} papers for limit {}, truncating",
                page.items.len(),
                limit
            );
            page.items.truncate(limit);
        }
        self.papers = page.items;
        self.total = page.total;
        self.loading = false;
        true
    }

    /// Records a failed load; previously displayed papers are kept.
    pub fn on_page_failed(&mut self, request_id: RequestId, message: &str) -> bool {
        if !self.is_latest(request_id) {
            reader_debug!(
                "Ignoring failure of stale request {}: {}",
                request_id,
                message
            );
            return false;
        }
        reader_error!("Failed to load papers: {}", message);
        self.loading = false;
        true
    }

    fn is_latest(&self, request_id: RequestId) -> bool {
        self.latest_request == Some(request_id)
    }

    fn issue(&mut self) -> (RequestId, PaperQuery) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.latest_request = Some(request_id);
        self.loading = true;
        let query = PaperQuery {
            filter: self.committed.clone(),
            limit: self.limit,
            offset: self.offset,
        };
        (request_id, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: u64, count: usize) -> PaperPage {
        PaperPage {
            items: (0..count)
                .map(|i| Paper {
                    arxiv_id: format!("2401.{i:05}"),
                    title: format!("Paper {i}"),
                    authors: Vec::new(),
                    summary: String::new(),
                    published_date: "2024-01-01T00:00:00".to_string(),
                    updated_date: "2024-01-01T00:00:00".to_string(),
                    primary_category: "cs.AI".to_string(),
                    categories: vec!["cs.AI".to_string()],
                    pdf_url: None,
                    llm_summary: None,
                    key_insights: None,
                })
                .collect(),
            total,
            limit: PAGE_SIZE,
            offset: 0,
        }
    }

    #[test]
    fn next_page_is_gated_by_total() {
        let mut browse = BrowseState::default();
        let (id, _) = browse.refresh();
        browse.on_page_loaded(id, page_of(40, 20));
        assert!(browse.has_next_page());

        let (id, query) = browse.next_page().expect("second page");
        assert_eq!(query.offset, 20);
        browse.on_page_loaded(id, page_of(40, 20));
        assert!(!browse.has_next_page());
        assert!(browse.next_page().is_none());
        assert_eq!(browse.current_page(), 2);
        assert_eq!(browse.page_count(), 2);
    }

    #[test]
    fn prev_page_is_unavailable_on_first_page() {
        let mut browse = BrowseState::default();
        assert!(browse.prev_page().is_none());
    }

    #[test]
    fn go_to_page_clamps_to_known_pages() {
        let mut browse = BrowseState::default();
        let (id, _) = browse.refresh();
        browse.on_page_loaded(id, page_of(45, 20));

        let (_, query) = browse.go_to_page(9);
        assert_eq!(query.offset, 40);
        let (_, query) = browse.go_to_page(0);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn oversized_page_is_truncated_to_limit() {
        let mut browse = BrowseState::default();
        let (id, _) = browse.refresh();
        assert!(browse.on_page_loaded(id, page_of(100, 25)));
        assert_eq!(browse.papers().len(), PAGE_SIZE as usize);
        assert_eq!(browse.total(), 100);
    }

    #[test]
    fn invalid_draft_date_does_not_commit() {
        let mut browse = BrowseState::default();
        browse.draft_mut().start_date = "yesterday".to_string();
        assert!(browse.apply_filters().is_err());
        assert!(browse.committed().is_empty());
    }
}
