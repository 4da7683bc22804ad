use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reader_core::{
    AppViewModel, FetchForm, JobBanner, ListView, Notice, NoticeLevel, PaginationView, Paper,
    PaperRowView, Stats, WindowMode,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const PROGRESS_WIDTH: usize = 30;
const BLURB_CHARS: usize = 240;
const MAX_CATEGORY_HINTS: usize = 8;

/// Full screen text for one frame, starting with a terminal clear sequence.
pub fn render(view: &AppViewModel, notices: &[Notice]) -> String {
    let mut out = String::from(CLEAR_SCREEN);
    for line in render_lines(view, notices) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_lines(view: &AppViewModel, notices: &[Notice]) -> Vec<String> {
    let mut lines = vec!["DeepReader".to_string(), String::new()];

    if let Some(banner) = &view.banner {
        lines.push(format_banner(banner));
        lines.push(String::new());
    }

    lines.push(format!(
        "Filter: topic [{}]  from [{}]  to [{}]",
        view.filter.topic, view.filter.start_date, view.filter.end_date
    ));
    if !view.categories.is_empty() {
        let hints: Vec<&str> = view
            .categories
            .iter()
            .take(MAX_CATEGORY_HINTS)
            .map(String::as_str)
            .collect();
        lines.push(format!("Categories: {}", hints.join(", ")));
    }
    lines.push(String::new());

    match &view.list {
        ListView::Loading => lines.push("Loading papers...".to_string()),
        ListView::Empty => {
            lines.push("No papers found. Try adjusting filters or fetch new papers.".to_string())
        }
        ListView::Ready { total, rows } => {
            lines.push(format!("Found {} papers", format_with_commas(*total)));
            lines.push(String::new());
            for row in rows {
                lines.extend(format_row(row));
                lines.push(String::new());
            }
            lines.push(format_pagination(&view.pagination));
        }
    }
    lines.push(String::new());

    lines.push(format_form(&view.form));
    if let Some(stats) = &view.stats {
        lines.push(format_stats(stats));
    }

    if let Some(paper) = &view.detail {
        lines.push(String::new());
        lines.extend(format_detail(paper));
    }

    if !notices.is_empty() {
        lines.push(String::new());
        lines.extend(notices.iter().map(format_notice));
    }

    lines.push(String::new());
    lines.push("Type 'help' for commands.".to_string());
    lines
}

fn format_banner(banner: &JobBanner) -> String {
    match banner {
        JobBanner::InProgress {
            processed,
            total,
            new_papers,
            percent,
        } => {
            let filled = PROGRESS_WIDTH * usize::from(*percent) / 100;
            format!(
                "Fetching papers [{}{}] {}/{} processed, {} new ({}%)",
                "#".repeat(filled),
                ".".repeat(PROGRESS_WIDTH - filled),
                processed,
                total,
                new_papers,
                percent
            )
        }
        JobBanner::Failed { error } => format!("Job failed: {error}"),
    }
}

fn format_row(row: &PaperRowView) -> Vec<String> {
    let mut categories = vec![row.primary_category.clone()];
    categories.extend(row.extra_categories.iter().cloned());

    let mut lines = vec![
        format!("[{}] {}", row.arxiv_id, row.title),
        format!(
            "    {} | {} | {}",
            row.authors,
            format_date(&row.published_date),
            categories.join(" ")
        ),
    ];
    let label = if row.has_insight { "AI insight" } else { "Abstract" };
    lines.push(format!("    {label}: {}", truncate(&row.blurb, BLURB_CHARS)));
    if let Some(url) = &row.pdf_url {
        lines.push(format!("    PDF: {url}"));
    }
    lines
}

fn format_pagination(pagination: &PaginationView) -> String {
    let prev = if pagination.has_prev { "< prev" } else { "      " };
    let next = if pagination.has_next { "next >" } else { "" };
    format!(
        "{prev}  Page {} of {}  {next}",
        pagination.current_page,
        pagination.page_count.max(1)
    )
    .trim_end()
    .to_string()
}

fn format_form(form: &FetchForm) -> String {
    let window = match form.mode {
        WindowMode::RecentDays => format!("last {} day(s)", form.days),
        WindowMode::DateRange => format!("{} to {}", form.start_date, form.end_date),
    };
    let topic = if form.topic.is_empty() {
        String::new()
    } else {
        format!(" topic [{}]", form.topic)
    };
    let state = if form.submitting { " (submitting...)" } else { "" };
    format!("Fetch: [{}]{topic} {window}{state}", form.category)
}

fn format_stats(stats: &Stats) -> String {
    let last_fetch = stats
        .last_fetch_time
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "never".to_string());
    format!(
        "Stats: {} papers, {} summarized, {} pending, last fetch {}",
        format_with_commas(stats.total),
        format_with_commas(stats.with_summary),
        format_with_commas(stats.without_summary),
        last_fetch
    )
}

fn format_detail(paper: &Paper) -> Vec<String> {
    let mut lines = vec![
        format!("== {} ({})", paper.title, paper.arxiv_id),
        format!("Authors: {}", paper.authors.join(", ")),
        format!(
            "Published: {}  Updated: {}",
            format_date(&paper.published_date),
            format_date(&paper.updated_date)
        ),
        format!("Categories: {}", paper.categories.join(" ")),
        format!("Abstract: {}", paper.summary),
    ];
    if let Some(summary) = &paper.llm_summary {
        lines.push(format!("AI insight: {summary}"));
    }
    if let Some(insights) = &paper.key_insights {
        lines.push(format!("Key insights: {insights}"));
    }
    if let Some(url) = &paper.pdf_url {
        lines.push(format!("PDF: {url}"));
    }
    lines
}

fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.text)
}

/// Reduces backend timestamps to `YYYY-MM-DD`; unparseable input is shown as is.
fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
