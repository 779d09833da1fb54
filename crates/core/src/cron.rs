//! Cron expression grammar for orchestration schedules.
//!
//! Schedules use the classic five-field layout
//! (`minute hour day-of-month month day-of-week`). Validation is purely
//! syntactic: each field may only contain ASCII digits and the `* / , -`
//! operators. Values are not range-checked, so `"99 * * * *"` is accepted.

use std::sync::LazyLock;

use regex::Regex;

/// Number of whitespace-separated fields in a schedule.
pub const CRON_FIELD_COUNT: usize = 5;

/// Field names in positional order, used in error messages.
const FIELD_NAMES: [&str; CRON_FIELD_COUNT] =
    ["minute", "hour", "day-of-month", "month", "day-of-week"];

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9*/,\-]+$").expect("valid regex"));

/// Validate a cron expression and return its canonical form.
///
/// The canonical form joins the five fields with single spaces, so
/// `" 0  9 * * 1-5 "` becomes `"0 9 * * 1-5"`. Errors carry a message
/// suitable for showing to the user as-is.
pub fn normalize_cron(expr: &str) -> Result<String, String> {
    let fields: Vec<&str> = expr.split_whitespace().collect();

    if fields.len() != CRON_FIELD_COUNT {
        return Err(format!(
            "Invalid cron expression: expected {CRON_FIELD_COUNT} fields \
             (minute hour day-of-month month day-of-week), got {}",
            fields.len()
        ));
    }

    for (field, name) in fields.iter().zip(FIELD_NAMES) {
        if !FIELD_RE.is_match(field) {
            return Err(format!(
                "Invalid cron expression: {name} field '{field}' may only contain \
                 digits and the characters * / , -"
            ));
        }
    }

    Ok(fields.join(" "))
}

/// Returns `true` if `expr` satisfies the five-field cron grammar.
pub fn is_valid_cron(expr: &str) -> bool {
    normalize_cron(expr).is_ok()
}
