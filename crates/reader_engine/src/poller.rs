//! Cancellable repeating job-status query.
//!
//! Each tick spawns its own query, so a slow backend can produce overlapping
//! requests; every query is independent and results after cancellation are
//! discarded. The first terminal status cancels the loop.

use std::sync::Arc;
use std::time::Duration;

use reader_core::JobId;
use reader_logging::{reader_debug, reader_info};
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, PaperApi};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Owner of one polling loop. Dropping the handle stops the loop.
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    token: CancellationToken,
}

impl PollHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once cancelled or after a terminal status was observed.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

pub fn spawn_poller(
    runtime: &Handle,
    api: Arc<dyn PaperApi>,
    job_id: JobId,
    interval: Duration,
    sink: Arc<dyn EventSink>,
) -> PollHandle {
    let token = CancellationToken::new();
    runtime.spawn(poll_loop(
        api,
        job_id.clone(),
        interval,
        sink,
        token.clone(),
    ));
    PollHandle { job_id, token }
}

async fn poll_loop(
    api: Arc<dyn PaperApi>,
    job_id: JobId,
    interval: Duration,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) {
    // The first tick completes immediately.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::spawn(poll_once(
            api.clone(),
            job_id.clone(),
            sink.clone(),
            token.clone(),
        ));
    }
    reader_debug!("Stopped polling job {}", job_id);
}

async fn poll_once(
    api: Arc<dyn PaperApi>,
    job_id: JobId,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) {
    let result = api.job_status(&job_id).await;
    if token.is_cancelled() {
        return;
    }
    if let Ok(status) = &result {
        if status.status.is_terminal() {
            token.cancel();
        }
    }
    sink.emit(EngineEvent::JobStatus { job_id, result });
}

/// Keeps at most one polling loop alive: watching a new id cancels the previous one.
pub struct JobWatcher {
    runtime: Handle,
    api: Arc<dyn PaperApi>,
    interval: Duration,
    sink: Arc<dyn EventSink>,
    current: Option<PollHandle>,
}

impl JobWatcher {
    pub fn new(
        runtime: Handle,
        api: Arc<dyn PaperApi>,
        interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            runtime,
            api,
            interval,
            sink,
            current: None,
        }
    }

    pub fn current_job(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|handle| !handle.is_stopped())
            .map(PollHandle::job_id)
    }

    pub fn watch(&mut self, job_id: JobId) {
        if self.current_job() == Some(job_id.as_str()) {
            return;
        }
        self.stop();
        reader_info!(
            "Polling job {} every {} ms",
            job_id,
            self.interval.as_millis()
        );
        self.current = Some(spawn_poller(
            &self.runtime,
            self.api.clone(),
            job_id,
            self.interval,
            self.sink.clone(),
        ));
    }

    /// Stops the loop only if it still belongs to `job_id`.
    pub fn stop_job(&mut self, job_id: &str) {
        if self
            .current
            .as_ref()
            .is_some_and(|handle| handle.job_id() == job_id)
        {
            self.stop();
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }
}

impl Drop for JobWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
