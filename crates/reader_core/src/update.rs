use reader_logging::{reader_error, reader_info, reader_warn};

use crate::polling::{JobOutcome, WatchPhase};
use crate::{AppState, Effect, JobId, Msg, Notice, PaperQuery, RequestId};

const TRIGGER_FAILED_FALLBACK: &str = "Failed to trigger fetch job.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            let (request_id, query) = state.browse.refresh();
            state.mark_dirty();
            vec![
                load_papers(request_id, query),
                Effect::LoadCategories,
                Effect::LoadStats,
            ]
        }
        Msg::TopicChanged(topic) => {
            state.browse.draft_mut().topic = topic;
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartDateChanged(date) => {
            state.browse.draft_mut().start_date = date;
            state.mark_dirty();
            Vec::new()
        }
        Msg::EndDateChanged(date) => {
            state.browse.draft_mut().end_date = date;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ApplyFilters => match state.browse.apply_filters() {
            Ok((request_id, query)) => {
                state.mark_dirty();
                vec![load_papers(request_id, query)]
            }
            Err(err) => {
                reader_warn!("Rejected filter: {}", err);
                vec![Effect::Notify(Notice::error(err.to_string()))]
            }
        },
        Msg::ClearFilters => {
            let (request_id, query) = state.browse.clear_filters();
            state.mark_dirty();
            vec![load_papers(request_id, query)]
        }
        Msg::NextPage => {
            let request = state.browse.next_page();
            paginate(&mut state, request)
        }
        Msg::PrevPage => {
            let request = state.browse.prev_page();
            paginate(&mut state, request)
        }
        Msg::PageSelected(page) => {
            let request = Some(state.browse.go_to_page(page));
            paginate(&mut state, request)
        }
        Msg::RefreshClicked => {
            let (request_id, query) = state.browse.refresh();
            state.mark_dirty();
            vec![load_papers(request_id, query)]
        }
        Msg::PapersLoaded { request_id, page } => {
            if state.browse.on_page_loaded(request_id, page) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PapersFailed {
            request_id,
            message,
        } => {
            // List failures stay in the log; only the loading indicator changes.
            if state.browse.on_page_failed(request_id, &message) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FetchCategoryChanged(category) => {
            state.form.category = category;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FetchTopicChanged(topic) => {
            state.form.topic = topic;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FetchDaysChanged(days) => {
            state.form.set_days(days);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FetchRangeChanged { start, end } => {
            state.form.set_range(start, end);
            state.mark_dirty();
            Vec::new()
        }
        Msg::TriggerClicked => {
            if state.form.submitting {
                return (state, Vec::new());
            }
            match state.form.to_request() {
                Ok(request) => {
                    state.form.submitting = true;
                    state.mark_dirty();
                    vec![Effect::TriggerFetch { request }]
                }
                Err(err) => vec![Effect::Notify(Notice::error(err.to_string()))],
            }
        }
        Msg::FetchTriggered(response) => {
            reader_info!(
                "Fetch job {} accepted with status {}",
                response.job_id,
                response.status
            );
            state.form.submitting = false;
            let text = if response.message.trim().is_empty() {
                format!("Fetch job {} started", response.job_id)
            } else {
                response.message
            };
            let mut effects = vec![Effect::Notify(Notice::success(text))];
            effects.extend(switch_watch(&mut state, Some(response.job_id)));
            effects
        }
        Msg::TriggerFailed { message } => {
            reader_error!("Trigger failed: {}", message);
            state.form.submitting = false;
            state.mark_dirty();
            let text = if message.trim().is_empty() {
                TRIGGER_FAILED_FALLBACK.to_string()
            } else {
                message
            };
            vec![Effect::Notify(Notice::error(text))]
        }
        Msg::WatchJob(job_id) => switch_watch(&mut state, job_id),
        Msg::JobStatusReceived { job_id, status } => {
            let observed = state.watch.job_id() == Some(job_id.as_str())
                && state.watch.phase() == WatchPhase::Polling;
            if observed {
                state.mark_dirty();
            }
            match state.watch.on_status(&job_id, status) {
                Some(outcome) => finish_job(&mut state, job_id, outcome),
                None => Vec::new(),
            }
        }
        Msg::JobStatusFailed { job_id, message } => {
            state.watch.on_poll_error(&job_id, &message);
            Vec::new()
        }
        Msg::CategoriesLoaded(categories) => {
            state.categories = categories;
            state.mark_dirty();
            Vec::new()
        }
        Msg::CategoriesFailed { message } => {
            reader_error!("Failed to load categories: {}", message);
            Vec::new()
        }
        Msg::StatsRequested => vec![Effect::LoadStats],
        Msg::StatsLoaded(stats) => {
            state.stats = Some(stats);
            state.mark_dirty();
            Vec::new()
        }
        Msg::StatsFailed { message } => {
            reader_error!("Failed to load stats: {}", message);
            Vec::new()
        }
        Msg::PaperRequested(arxiv_id) => {
            let arxiv_id = arxiv_id.trim().to_string();
            if arxiv_id.is_empty() {
                Vec::new()
            } else {
                vec![Effect::LoadPaper { arxiv_id }]
            }
        }
        Msg::PaperLoaded(paper) => {
            state.detail = Some(paper);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PaperFailed { arxiv_id, message } => {
            reader_error!("Failed to load paper {}: {}", arxiv_id, message);
            vec![Effect::Notify(Notice::error(message))]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn load_papers(request_id: RequestId, query: PaperQuery) -> Effect {
    Effect::LoadPapers { request_id, query }
}

fn paginate(state: &mut AppState, request: Option<(RequestId, PaperQuery)>) -> Vec<Effect> {
    match request {
        Some((request_id, query)) => {
            state.mark_dirty();
            vec![load_papers(request_id, query)]
        }
        None => Vec::new(),
    }
}

/// Stop always precedes start so two poll loops never overlap.
fn switch_watch(state: &mut AppState, job_id: Option<JobId>) -> Vec<Effect> {
    let change = state.watch.watch(job_id);
    state.mark_dirty();
    let mut effects = Vec::with_capacity(2);
    if let Some(job_id) = change.stop {
        effects.push(Effect::StopPolling { job_id });
    }
    if let Some(job_id) = change.start {
        effects.push(Effect::StartPolling { job_id });
    }
    effects
}

fn finish_job(state: &mut AppState, job_id: JobId, outcome: JobOutcome) -> Vec<Effect> {
    let stop = Effect::StopPolling { job_id };
    match outcome {
        JobOutcome::Completed { new_papers } => {
            let (request_id, query) = state.browse.reload_from_start();
            vec![
                stop,
                Effect::Notify(Notice::success(format!(
                    "Job completed! {new_papers} new papers found."
                ))),
                load_papers(request_id, query),
            ]
        }
        JobOutcome::Failed { error } => {
            let error = error.unwrap_or_else(|| "unknown error".to_string());
            vec![
                stop,
                Effect::Notify(Notice::error(format!("Job failed: {error}"))),
            ]
        }
    }
}
