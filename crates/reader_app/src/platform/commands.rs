use reader_core::Msg;

/// Everything the main loop reacts to: user commands and engine results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Dispatch(Msg),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Filter:    topic <text> | from <YYYY-MM-DD> | to <YYYY-MM-DD> | apply | clear
Pages:     next | prev | page <n> | refresh
Fetch:     fetch-category <expr> | fetch-topic <text> | fetch-days <n>
           fetch-range <from> <to> | trigger
Jobs:      watch <job_id> | unwatch
Other:     show <arxiv_id> | stats | help | quit";

/// Parses one stdin line. Blank lines map to `Msg::NoOp`.
pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let msg = match command.to_ascii_lowercase().as_str() {
        "" => Msg::NoOp,
        "help" | "?" => return Input::Help,
        "quit" | "exit" | "q" => return Input::Quit,
        "topic" => Msg::TopicChanged(rest.to_string()),
        "from" => Msg::StartDateChanged(rest.to_string()),
        "to" => Msg::EndDateChanged(rest.to_string()),
        "apply" | "search" => Msg::ApplyFilters,
        "clear" => Msg::ClearFilters,
        "next" => Msg::NextPage,
        "prev" => Msg::PrevPage,
        "page" => match rest.parse::<u32>() {
            Ok(page) => Msg::PageSelected(page),
            Err(_) => return Input::Unknown(line.to_string()),
        },
        "refresh" => Msg::RefreshClicked,
        "fetch-category" => Msg::FetchCategoryChanged(rest.to_string()),
        "fetch-topic" => Msg::FetchTopicChanged(rest.to_string()),
        "fetch-days" => Msg::FetchDaysChanged(rest.to_string()),
        "fetch-range" => {
            let mut dates = rest.split_whitespace();
            Msg::FetchRangeChanged {
                start: dates.next().unwrap_or_default().to_string(),
                end: dates.next().unwrap_or_default().to_string(),
            }
        }
        "trigger" => Msg::TriggerClicked,
        "watch" if !rest.is_empty() => Msg::WatchJob(Some(rest.to_string())),
        "unwatch" => Msg::WatchJob(None),
        "show" if !rest.is_empty() => Msg::PaperRequested(rest.to_string()),
        "stats" => Msg::StatsRequested,
        _ => return Input::Unknown(line.to_string()),
    };
    Input::Dispatch(msg)
}
