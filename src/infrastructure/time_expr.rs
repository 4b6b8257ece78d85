// Time expression parsing for --from-time / --to-time
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};
use thiserror::Error;

const ABSOLUTE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unable to parse datetime: {0}")]
pub struct TimeExprError(String);

/// Parse `now`, an absolute local timestamp, or a relative `"<N><unit> ago"`
/// expression (units: m/min/minute/minutes, h/hr/hour/hours, d/day/days).
pub fn parse_time_expr(input: &str, now: DateTime<Local>) -> Result<DateTime<Local>, TimeExprError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Some(naive) = ABSOLUTE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| TimeExprError(input.to_string()));
    }

    if input.contains("ago") {
        if let Some(offset) = relative_offset(input) {
            return now
                .checked_sub_signed(offset)
                .ok_or_else(|| TimeExprError(input.to_string()));
        }
    }

    Err(TimeExprError(input.to_string()))
}

/// `"30m ago"` -> 30 minutes. Only the first word is read, so `"2 hours ago"`
/// does not parse.
fn relative_offset(input: &str) -> Option<TimeDelta> {
    let stripped = input.replace("ago", "");
    let word = stripped.split_whitespace().next()?;

    let digits = word.find(|c: char| !c.is_ascii_digit()).unwrap_or(word.len());
    let amount: i64 = word[..digits].parse().ok()?;

    let rest = &word[digits..];
    let letters = rest.find(|c: char| !c.is_ascii_lowercase()).unwrap_or(rest.len());

    match &rest[..letters] {
        "m" | "min" | "minute" | "minutes" => TimeDelta::try_minutes(amount),
        "h" | "hr" | "hour" | "hours" => TimeDelta::try_hours(amount),
        "d" | "day" | "days" => TimeDelta::try_days(amount),
        _ => None,
    }
}
