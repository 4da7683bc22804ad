use crate::{JobId, Notice, PaperQuery, RequestId, TriggerRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadPapers {
        request_id: RequestId,
        query: PaperQuery,
    },
    TriggerFetch { request: TriggerRequest },
    StartPolling { job_id: JobId },
    StopPolling { job_id: JobId },
    LoadCategories,
    LoadStats,
    LoadPaper { arxiv_id: String },
    Notify(Notice),
}
