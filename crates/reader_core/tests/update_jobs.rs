use std::sync::Once;

use reader_core::{
    update, AppState, Effect, JobBanner, JobState, JobStatus, Msg, Notice, NoticeLevel, PaperPage,
    TriggerRequest, TriggerResponse, DEFAULT_FETCH_CATEGORY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reader_logging::initialize_for_tests);
}

fn status(job_id: &str, state: JobState, processed: u32, total: u32, new_papers: u32) -> JobStatus {
    JobStatus {
        job_id: job_id.to_string(),
        status: state,
        processed,
        total,
        new_papers,
        error: None,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-01T10:00:02Z".to_string(),
    }
}

fn received(state: AppState, job: JobStatus) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::JobStatusReceived {
            job_id: job.job_id.clone(),
            status: job,
        },
    )
}

fn notices(effects: &[Effect]) -> Vec<Notice> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}

fn load_offsets(effects: &[Effect]) -> Vec<u32> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::LoadPapers { query, .. } => Some(query.offset),
            _ => None,
        })
        .collect()
}

fn triggered(job_id: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, effects) = update(state, Msg::TriggerClicked);
    assert_eq!(
        effects,
        vec![Effect::TriggerFetch {
            request: TriggerRequest {
                category: Some(DEFAULT_FETCH_CATEGORY.to_string()),
                days: Some(1),
                ..TriggerRequest::default()
            }
        }]
    );
    update(
        state,
        Msg::FetchTriggered(TriggerResponse {
            status: "ok".to_string(),
            job_id: job_id.to_string(),
            message: "Job started".to_string(),
        }),
    )
}

#[test]
fn trigger_response_starts_polling_the_returned_job() {
    init_logging();
    let (state, effects) = triggered("abc123");

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Notice::success("Job started")),
            Effect::StartPolling {
                job_id: "abc123".to_string()
            },
        ]
    );
    assert_eq!(state.watch().job_id(), Some("abc123"));
    assert!(!state.form().submitting);
}

#[test]
fn completed_job_notifies_once_and_refetches_once_from_start() {
    init_logging();
    let (state, _) = triggered("abc123");
    let mut all_effects = Vec::new();

    let (state, effects) = received(state, status("abc123", JobState::Running, 3, 10, 1));
    all_effects.extend(effects);
    assert_eq!(
        state.view().banner,
        Some(JobBanner::InProgress {
            processed: 3,
            total: 10,
            new_papers: 1,
            percent: 30,
        })
    );

    let (state, effects) = received(state, status("abc123", JobState::Running, 10, 10, 4));
    all_effects.extend(effects);
    let (state, effects) = received(state, status("abc123", JobState::Completed, 10, 10, 4));
    all_effects.extend(effects);
    // Overlapping ticks may deliver the terminal status again.
    let (state, effects) = received(state, status("abc123", JobState::Completed, 10, 10, 4));
    all_effects.extend(effects);

    assert_eq!(
        notices(&all_effects),
        vec![Notice::success("Job completed! 4 new papers found.")]
    );
    assert_eq!(load_offsets(&all_effects), vec![0]);
    assert_eq!(
        all_effects
            .iter()
            .filter(|e| matches!(e, Effect::StopPolling { .. }))
            .count(),
        1
    );
    assert_eq!(state.view().banner, None);
    assert_eq!(state.browse().offset(), 0);
}

#[test]
fn completion_resets_offset_from_later_page() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadPapers { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("initial load");
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id,
            page: PaperPage {
                items: Vec::new(),
                total: 80,
                limit: 20,
                offset: 0,
            },
        },
    );
    let (state, effects) = update(state, Msg::PageSelected(3));
    assert_eq!(load_offsets(&effects), vec![40]);

    let (state, _) = update(state, Msg::WatchJob(Some("job-1".to_string())));
    let (state, effects) = received(state, status("job-1", JobState::Completed, 5, 5, 2));
    assert_eq!(load_offsets(&effects), vec![0]);
    assert_eq!(state.browse().offset(), 0);
}

#[test]
fn failed_job_notifies_once_without_refetch() {
    init_logging();
    let (state, _) = triggered("job-f");
    let mut failed = status("job-f", JobState::Failed, 2, 10, 0);
    failed.error = Some("arXiv unreachable".to_string());

    let (state, effects) = received(state, failed.clone());
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling {
                job_id: "job-f".to_string()
            },
            Effect::Notify(Notice::error("Job failed: arXiv unreachable")),
        ]
    );
    assert_eq!(
        state.view().banner,
        Some(JobBanner::Failed {
            error: "arXiv unreachable".to_string()
        })
    );

    let (_, effects) = received(state, failed);
    assert!(effects.is_empty());
}

#[test]
fn poll_errors_are_swallowed() {
    init_logging();
    let (state, _) = triggered("job-e");
    let (state, effects) = update(
        state,
        Msg::JobStatusFailed {
            job_id: "job-e".to_string(),
            message: "Failed to get job status: Bad Gateway".to_string(),
        },
    );
    assert!(effects.is_empty());

    // Polling continues and a later terminal status is still honoured.
    let (_, effects) = received(state, status("job-e", JobState::Completed, 1, 1, 1));
    assert_eq!(
        notices(&effects),
        vec![Notice::success("Job completed! 1 new papers found.")]
    );
}

#[test]
fn switching_jobs_stops_previous_and_ignores_its_statuses() {
    init_logging();
    let (state, _) = triggered("old");
    let (state, effects) = update(state, Msg::WatchJob(Some("new".to_string())));
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling {
                job_id: "old".to_string()
            },
            Effect::StartPolling {
                job_id: "new".to_string()
            },
        ]
    );

    let (state, effects) = received(state, status("old", JobState::Completed, 1, 1, 9));
    assert!(effects.is_empty());
    assert!(state.watch().last_status().is_none());
}

#[test]
fn clearing_watch_stops_polling_and_hides_banner() {
    init_logging();
    let (state, _) = triggered("job-c");
    let (state, _) = received(state, status("job-c", JobState::Running, 1, 4, 0));
    let (state, effects) = update(state, Msg::WatchJob(None));
    assert_eq!(
        effects,
        vec![Effect::StopPolling {
            job_id: "job-c".to_string()
        }]
    );
    assert_eq!(state.view().banner, None);
}

#[test]
fn failed_job_without_message_reads_unknown_error() {
    init_logging();
    let (state, _) = triggered("job-u");
    let (_, effects) = received(state, status("job-u", JobState::Failed, 0, 0, 0));
    let notices = notices(&effects);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].text, "Job failed: unknown error");
}
