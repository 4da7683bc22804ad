//! Observer side of job polling.
//!
//! The timer itself lives in the engine; this state decides which responses
//! count. A watch reports its terminal outcome at most once, and statuses for
//! any id other than the current one are dropped.

use reader_logging::{reader_debug, reader_info, reader_warn};

use crate::{JobId, JobState, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchPhase {
    #[default]
    Idle,
    Polling,
    Finished,
}

/// Outcome reported once when the watched job reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { new_papers: u32 },
    Failed { error: Option<String> },
}

/// What the engine timer must do after a watch change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchChange {
    pub stop: Option<JobId>,
    pub start: Option<JobId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobWatch {
    job_id: Option<JobId>,
    last_status: Option<JobStatus>,
    phase: WatchPhase,
}

impl JobWatch {
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn last_status(&self) -> Option<&JobStatus> {
        self.last_status.as_ref()
    }

    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    /// Switches the observed job. `None` clears it.
    ///
    /// Re-watching the current id is a no-op, matching an unchanged dependency.
    pub fn watch(&mut self, job_id: Option<JobId>) -> WatchChange {
        if job_id == self.job_id {
            return WatchChange::default();
        }

        let stop = match self.phase {
            WatchPhase::Polling => self.job_id.clone(),
            WatchPhase::Idle | WatchPhase::Finished => None,
        };

        self.last_status = None;
        self.job_id = job_id.clone();
        self.phase = if job_id.is_some() {
            WatchPhase::Polling
        } else {
            WatchPhase::Idle
        };

        if let Some(id) = &job_id {
            reader_info!("Watching job {}", id);
        }
        WatchChange {
            stop,
            start: job_id,
        }
    }

    /// Applies a polled status and returns the terminal outcome on first observation.
    pub fn on_status(&mut self, job_id: &str, status: JobStatus) -> Option<JobOutcome> {
        if self.job_id.as_deref() != Some(job_id) {
            reader_debug!("Dropping status for unwatched job {}", job_id);
            return None;
        }
        if self.phase != WatchPhase::Polling {
            reader_debug!("Dropping status for finished job {}", job_id);
            return None;
        }

        let outcome = match status.status {
            JobState::Completed => Some(JobOutcome::Completed {
                new_papers: status.new_papers,
            }),
            JobState::Failed => Some(JobOutcome::Failed {
                error: status.error.clone(),
            }),
            JobState::Pending | JobState::Running => None,
        };
        if outcome.is_some() {
            reader_info!("Job {} reached {}", job_id, status.status);
            self.phase = WatchPhase::Finished;
        }
        self.last_status = Some(status);
        outcome
    }

    /// A failed poll tick is logged and otherwise ignored.
    pub fn on_poll_error(&self, job_id: &str, message: &str) {
        if self.job_id.as_deref() == Some(job_id) {
            reader_warn!("Polling error for job {}: {}", job_id, message);
        }
    }
}
