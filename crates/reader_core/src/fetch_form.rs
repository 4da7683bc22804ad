use chrono::NaiveDate;

use crate::TriggerRequest;

pub const DEFAULT_FETCH_CATEGORY: &str = "cs.AI OR cs.LG OR cs.CV OR cs.CL";
pub const MAX_FETCH_DAYS: u32 = 30;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please select both start and end dates.")]
    MissingRangeDates,
    #[error("Invalid {field} date '{value}', expected YYYY-MM-DD.")]
    InvalidDate { field: &'static str, value: String },
    #[error("Start date must not be after end date.")]
    InvertedRange,
}

/// Time window requested from the backend fetch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    #[default]
    RecentDays,
    DateRange,
}

/// Editable state of the trigger panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchForm {
    pub category: String,
    pub topic: String,
    pub mode: WindowMode,
    pub days: String,
    pub start_date: String,
    pub end_date: String,
    pub submitting: bool,
}

impl Default for FetchForm {
    fn default() -> Self {
        Self {
            category: DEFAULT_FETCH_CATEGORY.to_string(),
            topic: String::new(),
            mode: WindowMode::RecentDays,
            days: "1".to_string(),
            start_date: String::new(),
            end_date: String::new(),
            submitting: false,
        }
    }
}

impl FetchForm {
    pub fn set_days(&mut self, days: impl Into<String>) {
        self.days = days.into();
        self.mode = WindowMode::RecentDays;
    }

    pub fn set_range(&mut self, start: impl Into<String>, end: impl Into<String>) {
        self.start_date = start.into();
        self.end_date = end.into();
        self.mode = WindowMode::DateRange;
    }

    /// Validates the form into the body posted to `/trigger`.
    pub fn to_request(&self) -> Result<TriggerRequest, FormError> {
        let mut request = TriggerRequest {
            category: non_empty(&self.category),
            topic: non_empty(&self.topic),
            ..TriggerRequest::default()
        };

        match self.mode {
            WindowMode::RecentDays => {
                request.days = Some(parse_days(&self.days));
            }
            WindowMode::DateRange => {
                let (Some(start), Some(end)) = (non_empty(&self.start_date), non_empty(&self.end_date))
                else {
                    return Err(FormError::MissingRangeDates);
                };
                let start_day = parse_date("start", &start)?;
                let end_day = parse_date("end", &end)?;
                if start_day > end_day {
                    return Err(FormError::InvertedRange);
                }
                request.start_date = Some(start);
                request.end_date = Some(end);
            }
        }

        Ok(request)
    }
}

/// Unparsable or zero input falls back to a single day.
fn parse_days(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => 1,
        Ok(days) => days.min(MAX_FETCH_DAYS),
    }
}

pub(crate) fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FormError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Trims the input and checks its format, keeping the original text on success.
pub(crate) fn optional_date(field: &'static str, raw: &str) -> Result<Option<String>, FormError> {
    match non_empty(raw) {
        Some(value) => parse_date(field, &value).map(|_| Some(value)),
        None => Ok(None),
    }
}
