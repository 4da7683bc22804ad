use crate::browse::FilterDraft;
use crate::fetch_form::FetchForm;
use crate::{Paper, Stats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub filter: FilterDraft,
    pub list: ListView,
    pub pagination: PaginationView,
    pub banner: Option<JobBanner>,
    pub form: FetchForm,
    pub categories: Vec<String>,
    pub stats: Option<Stats>,
    pub detail: Option<Paper>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Empty,
    Ready { total: u64, rows: Vec<PaperRowView> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub offset: u32,
    pub limit: u32,
    pub total: u64,
    pub current_page: u32,
    pub page_count: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobBanner {
    InProgress {
        processed: u32,
        total: u32,
        new_papers: u32,
        percent: u8,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRowView {
    pub arxiv_id: String,
    pub title: String,
    pub authors: String,
    pub published_date: String,
    pub primary_category: String,
    /// Categories other than the primary one.
    pub extra_categories: Vec<String>,
    /// AI insight when present, the abstract otherwise.
    pub blurb: String,
    pub has_insight: bool,
    pub pdf_url: Option<String>,
}

impl From<&Paper> for PaperRowView {
    fn from(paper: &Paper) -> Self {
        let (blurb, has_insight) = match &paper.llm_summary {
            Some(insight) => (insight.clone(), true),
            None => (paper.summary.clone(), false),
        };
        Self {
            arxiv_id: paper.arxiv_id.clone(),
            title: paper.title.clone(),
            authors: paper.authors.join(", "),
            published_date: paper.published_date.clone(),
            primary_category: paper.primary_category.clone(),
            extra_categories: paper
                .categories
                .iter()
                .filter(|category| **category != paper.primary_category)
                .cloned()
                .collect(),
            blurb,
            has_insight,
            pdf_url: paper.pdf_url.clone(),
        }
    }
}
