use std::sync::{mpsc, Arc};

use reader_core::{Effect, Msg, Notice};
use reader_engine::{ClientSettings, EngineError, EngineEvent, EngineHandle, EventSink};
use reader_logging::reader_info;

use super::commands::Input;

/// Forwards engine results into the main loop as core messages.
struct MsgSink {
    tx: mpsc::Sender<Input>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Input::Dispatch(map_event(event)));
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ClientSettings, tx: mpsc::Sender<Input>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    /// Hands IO effects to the engine and returns the notices to display.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::LoadPapers { request_id, query } => {
                    reader_info!(
                        "LoadPapers request_id={} offset={} filtered={}",
                        request_id,
                        query.offset,
                        !query.filter.is_empty()
                    );
                    self.engine.load_papers(request_id, query);
                }
                Effect::TriggerFetch { request } => self.engine.trigger_fetch(request),
                Effect::StartPolling { job_id } => self.engine.watch_job(job_id),
                Effect::StopPolling { job_id } => self.engine.stop_watching(job_id),
                Effect::LoadCategories => self.engine.load_categories(),
                Effect::LoadStats => self.engine.load_stats(),
                Effect::LoadPaper { arxiv_id } => self.engine.load_paper(arxiv_id),
                Effect::Notify(notice) => notices.push(notice),
            }
        }
        notices
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PapersLoaded { request_id, result } => match result {
            Ok(page) => Msg::PapersLoaded { request_id, page },
            Err(err) => Msg::PapersFailed {
                request_id,
                message: err.message,
            },
        },
        EngineEvent::PaperLoaded { arxiv_id, result } => match result {
            Ok(paper) => Msg::PaperLoaded(paper),
            Err(err) => Msg::PaperFailed {
                arxiv_id,
                message: err.message,
            },
        },
        EngineEvent::FetchTriggered { result } => match result {
            Ok(response) => Msg::FetchTriggered(response),
            Err(err) => Msg::TriggerFailed {
                message: err.message,
            },
        },
        EngineEvent::JobStatus { job_id, result } => match result {
            Ok(status) => Msg::JobStatusReceived { job_id, status },
            Err(err) => Msg::JobStatusFailed {
                job_id,
                message: err.message,
            },
        },
        EngineEvent::CategoriesLoaded { result } => match result {
            Ok(categories) => Msg::CategoriesLoaded(categories),
            Err(err) => Msg::CategoriesFailed {
                message: err.message,
            },
        },
        EngineEvent::StatsLoaded { result } => match result {
            Ok(stats) => Msg::StatsLoaded(stats),
            Err(err) => Msg::StatsFailed {
                message: err.message,
            },
        },
    }
}
