//! DeepReader engine: backend HTTP client, job poller and effect execution.
mod client;
mod engine;
mod poller;
mod settings;
mod types;

pub use client::{PaperApi, ReqwestPaperApi};
pub use engine::EngineHandle;
pub use poller::{spawn_poller, ChannelEventSink, EventSink, JobWatcher, PollHandle};
pub use settings::{ClientSettings, API_URL_ENV, DEFAULT_API_URL};
pub use types::{ApiError, ApiErrorKind, EngineError, EngineEvent};
