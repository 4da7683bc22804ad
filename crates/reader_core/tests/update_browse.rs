use std::sync::Once;

use reader_core::{
    update, AppState, Effect, Filter, ListView, Msg, Paper, PaperPage, PaperQuery, RequestId,
    PAGE_SIZE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reader_logging::initialize_for_tests);
}

fn paper(id: &str) -> Paper {
    Paper {
        arxiv_id: id.to_string(),
        title: format!("Title {id}"),
        authors: vec!["Ada Lovelace".to_string()],
        summary: "Abstract".to_string(),
        published_date: "2024-05-01T00:00:00".to_string(),
        updated_date: "2024-05-01T00:00:00".to_string(),
        primary_category: "cs.CL".to_string(),
        categories: vec!["cs.CL".to_string()],
        pdf_url: None,
        llm_summary: None,
        key_insights: None,
    }
}

fn page(ids: &[&str], total: u64, offset: u32) -> PaperPage {
    PaperPage {
        items: ids.iter().map(|id| paper(id)).collect(),
        total,
        limit: PAGE_SIZE,
        offset,
    }
}

fn single_load(effects: &[Effect]) -> (RequestId, PaperQuery) {
    let loads: Vec<_> = effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::LoadPapers { request_id, query } => Some((*request_id, query.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(loads.len(), 1, "expected exactly one list request: {effects:?}");
    loads.into_iter().next().unwrap()
}

fn started() -> (AppState, RequestId) {
    let (state, effects) = update(AppState::new(), Msg::Started);
    let (request_id, _) = single_load(&effects);
    (state, request_id)
}

#[test]
fn started_loads_first_page_categories_and_stats() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);

    let (_, query) = single_load(&effects);
    assert_eq!(
        query,
        PaperQuery {
            filter: Filter::default(),
            limit: PAGE_SIZE,
            offset: 0,
        }
    );
    assert!(effects.contains(&Effect::LoadCategories));
    assert!(effects.contains(&Effect::LoadStats));
    assert_eq!(state.view().list, ListView::Loading);
}

#[test]
fn apply_filters_commits_draft_and_resets_offset() {
    init_logging();
    let (state, id) = started();
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: id,
            page: page(&["a"], 60, 0),
        },
    );
    let (state, effects) = update(state, Msg::NextPage);
    assert_eq!(single_load(&effects).1.offset, 20);

    let (state, _) = update(state, Msg::TopicChanged("  RAG ".to_string()));
    let (state, _) = update(state, Msg::StartDateChanged("2024-01-01".to_string()));
    let (state, effects) = update(state, Msg::ApplyFilters);

    let (_, query) = single_load(&effects);
    assert_eq!(query.offset, 0);
    assert_eq!(
        query.filter,
        Filter {
            topic: Some("RAG".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        }
    );
    assert_eq!(state.browse().offset(), 0);
}

#[test]
fn pagination_keeps_committed_filter_not_draft() {
    init_logging();
    let (state, _) = started();
    let (state, _) = update(state, Msg::TopicChanged("agents".to_string()));
    let (state, effects) = update(state, Msg::ApplyFilters);
    let (id, _) = single_load(&effects);
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: id,
            page: page(&["a"], 45, 0),
        },
    );

    // Editing without applying must not leak into the next page request.
    let (state, _) = update(state, Msg::TopicChanged("vision".to_string()));
    let (_, effects) = update(state, Msg::NextPage);
    let (_, query) = single_load(&effects);
    assert_eq!(query.offset, 20);
    assert_eq!(query.filter.topic.as_deref(), Some("agents"));
}

#[test]
fn clear_filters_requests_unfiltered_first_page_and_drops_stale_response() {
    init_logging();
    let (state, _) = started();
    let (state, _) = update(state, Msg::TopicChanged("RAG".to_string()));
    let (state, _) = update(state, Msg::EndDateChanged("2024-03-01".to_string()));
    let (state, effects) = update(state, Msg::ApplyFilters);
    let (filtered_id, _) = single_load(&effects);

    // Clear while the filtered request is still in flight.
    let (state, effects) = update(state, Msg::ClearFilters);
    let (clear_id, query) = single_load(&effects);
    assert_eq!(
        query,
        PaperQuery {
            filter: Filter::default(),
            limit: PAGE_SIZE,
            offset: 0,
        }
    );
    assert!(state.view().filter.topic.is_empty());

    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: clear_id,
            page: page(&["all-1", "all-2"], 2, 0),
        },
    );
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: filtered_id,
            page: page(&["rag-1"], 1, 0),
        },
    );

    let ids: Vec<_> = state
        .browse()
        .papers()
        .iter()
        .map(|p| p.arxiv_id.clone())
        .collect();
    assert_eq!(ids, vec!["all-1", "all-2"]);
    assert_eq!(state.browse().total(), 2);
}

#[test]
fn failed_fetch_keeps_previous_papers_and_stops_loading() {
    init_logging();
    let (state, id) = started();
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: id,
            page: page(&["kept"], 1, 0),
        },
    );
    let (state, _) = update(state, Msg::TopicChanged("RAG".to_string()));
    let (state, effects) = update(state, Msg::ApplyFilters);
    let (id, _) = single_load(&effects);
    assert!(state.browse().is_loading());

    let (mut state, effects) = update(
        state,
        Msg::PapersFailed {
            request_id: id,
            message: "Failed to fetch papers: Internal Server Error".to_string(),
        },
    );

    assert!(effects.is_empty(), "list errors are not surfaced as notices");
    assert!(!state.browse().is_loading());
    assert_eq!(state.browse().papers()[0].arxiv_id, "kept");
    assert!(state.consume_dirty());
}

#[test]
fn failed_first_load_shows_empty_list() {
    init_logging();
    let (state, id) = started();
    let (state, _) = update(
        state,
        Msg::PapersFailed {
            request_id: id,
            message: "connection refused".to_string(),
        },
    );
    assert_eq!(state.view().list, ListView::Empty);
}

#[test]
fn next_page_disabled_when_total_reached() {
    init_logging();
    let (state, id) = started();
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: id,
            page: page(&["a", "b"], 2, 0),
        },
    );
    assert!(!state.view().pagination.has_next);

    let (_, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
}

#[test]
fn refresh_reuses_current_offset() {
    init_logging();
    let (state, id) = started();
    let (state, _) = update(
        state,
        Msg::PapersLoaded {
            request_id: id,
            page: page(&["a"], 100, 0),
        },
    );
    let (state, _) = update(state, Msg::PageSelected(3));
    let (_, effects) = update(state, Msg::RefreshClicked);
    assert_eq!(single_load(&effects).1.offset, 40);
}

#[test]
fn malformed_filter_date_is_reported_without_request() {
    init_logging();
    let (state, _) = started();
    let (state, _) = update(state, Msg::StartDateChanged("March".to_string()));
    let (_, effects) = update(state, Msg::ApplyFilters);

    assert_eq!(effects.len(), 1);
    assert!(matches!(&effects[0], Effect::Notify(notice) if notice.text.contains("March")));
}
