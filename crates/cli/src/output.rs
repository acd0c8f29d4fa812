//! Terminal rendering shared by every command

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use console::style;
use greentick_sdk::views::{NoticeLevel, Notices};

/// Width at which table cells are cut
pub const TRUNCATE_AT: usize = 30;

/// Print pending notices. Failures are returned instead of printed, so the
/// caller exits with `Error: ...`.
pub fn flush_notices(notices: &mut Notices) -> Result<(), String> {
    let mut failures = Vec::new();
    for notice in notices.drain() {
        match notice.level {
            NoticeLevel::Success => println!("{} {}", style("✓").green(), notice.message),
            NoticeLevel::Info => println!("{} {}", style("-").cyan(), notice.message),
            NoticeLevel::Warning | NoticeLevel::Error => failures.push(notice.message),
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("\n"))
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// Render a backend timestamp in local time. Unparsable input is shown as is.
pub fn format_date(value: &str) -> String {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return date
            .with_timezone(&Local)
            .format("%b %d, %Y %H:%M")
            .to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return date.format("%b %d, %Y %H:%M").to_string();
        }
    }
    value.to_string()
}

/// Parse a send time typed by the user.
///
/// Accepts RFC 3339, or `YYYY-MM-DD HH:MM` in local time. Returns a UTC
/// timestamp with millisecond precision.
pub fn parse_send_time(input: &str) -> Result<String, String> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date.to_utc().to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| {
            format!(
                "Invalid send time '{}': expected YYYY-MM-DD HH:MM or RFC 3339",
                input
            )
        })?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("Send time '{}' does not exist in the local time zone", input))?;
    Ok(local.to_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Validate a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", input))
}

pub fn truncate(text: &str) -> String {
    if text.chars().count() > TRUNCATE_AT {
        let cut: String = text.chars().take(TRUNCATE_AT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Colored status badge
pub fn status_badge(status: &str) -> String {
    match status {
        "sent" | "completed" | "paid" => style(status).green().to_string(),
        "failed" | "cancelled" => style(status).red().to_string(),
        _ => style(status).yellow().to_string(),
    }
}

/// Print a section title followed by a rule
pub fn heading(title: &str) {
    println!("{}", style(title).bold());
    println!("{}", style("─".repeat(title.chars().count().max(20))).dim());
}
