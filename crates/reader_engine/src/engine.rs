use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use reader_core::{JobId, PaperQuery, RequestId, TriggerRequest};
use reader_logging::{reader_debug, reader_info};

use crate::poller::{EventSink, JobWatcher};
use crate::{ClientSettings, EngineError, EngineEvent, PaperApi, ReqwestPaperApi};

enum EngineCommand {
    LoadPapers {
        request_id: RequestId,
        query: PaperQuery,
    },
    LoadPaper {
        arxiv_id: String,
    },
    TriggerFetch {
        request: TriggerRequest,
    },
    WatchJob {
        job_id: JobId,
    },
    StopWatching {
        job_id: JobId,
    },
    LoadCategories,
    LoadStats,
}

/// Runs backend calls on a private tokio runtime and reports results to a sink.
///
/// Dropping the handle shuts the runtime down and stops any active poll loop.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestPaperApi::new(settings)?);
        Self::with_api(api, settings.poll_interval, sink)
    }

    pub fn with_api(
        api: Arc<dyn PaperApi>,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("reader-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let mut watcher = JobWatcher::new(
                runtime.handle().clone(),
                api.clone(),
                poll_interval,
                sink.clone(),
            );
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::WatchJob { job_id } => watcher.watch(job_id),
                    EngineCommand::StopWatching { job_id } => watcher.stop_job(&job_id),
                    command => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), command, sink.as_ref()).await;
                        });
                    }
                }
            }
            watcher.stop();
            reader_debug!("Engine command loop finished");
        });

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            worker: Some(worker),
        })
    }

    pub fn load_papers(&self, request_id: RequestId, query: PaperQuery) {
        self.send(EngineCommand::LoadPapers { request_id, query });
    }

    pub fn load_paper(&self, arxiv_id: impl Into<String>) {
        self.send(EngineCommand::LoadPaper {
            arxiv_id: arxiv_id.into(),
        });
    }

    pub fn trigger_fetch(&self, request: TriggerRequest) {
        self.send(EngineCommand::TriggerFetch { request });
    }

    pub fn watch_job(&self, job_id: impl Into<JobId>) {
        self.send(EngineCommand::WatchJob {
            job_id: job_id.into(),
        });
    }

    pub fn stop_watching(&self, job_id: impl Into<JobId>) {
        self.send(EngineCommand::StopWatching {
            job_id: job_id.into(),
        });
    }

    pub fn load_categories(&self) {
        self.send(EngineCommand::LoadCategories);
    }

    pub fn load_stats(&self) {
        self.send(EngineCommand::LoadStats);
    }

    fn send(&self, command: EngineCommand) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(command);
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        // Closing the channel ends the command loop, which drops the runtime.
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        reader_info!("Engine stopped");
    }
}

async fn handle_command(api: &dyn PaperApi, command: EngineCommand, sink: &dyn EventSink) {
    let event = match command {
        EngineCommand::LoadPapers { request_id, query } => EngineEvent::PapersLoaded {
            request_id,
            result: api.list_papers(&query).await,
        },
        EngineCommand::LoadPaper { arxiv_id } => {
            let result = api.paper(&arxiv_id).await;
            EngineEvent::PaperLoaded { arxiv_id, result }
        }
        EngineCommand::TriggerFetch { request } => EngineEvent::FetchTriggered {
            result: api.trigger_fetch(&request).await,
        },
        EngineCommand::LoadCategories => EngineEvent::CategoriesLoaded {
            result: api.categories().await,
        },
        EngineCommand::LoadStats => EngineEvent::StatsLoaded {
            result: api.stats().await,
        },
        // Routed to the watcher by the command loop.
        EngineCommand::WatchJob { .. } | EngineCommand::StopWatching { .. } => return,
    };
    sink.emit(event);
}
