//! Restriction duration parsing
//!
//! Restriction commands accept an optional duration argument: a bare integer
//! counts seconds, an `h` suffix counts hours and a `d` suffix counts days.
//! Parsing produces the absolute expiry timestamp sent to Telegram together
//! with a human-readable suffix used in replies and audit entries
//! (e.g. " for 2 hours"). Anything unparseable means "no expiry".

use chrono::{DateTime, Duration, Utc};

/// Parsed expiry of a timed restriction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntilDate {
    /// Absolute expiry, `None` for a permanent restriction
    pub until: Option<DateTime<Utc>>,
    /// Human-readable suffix, empty when there is no expiry
    pub display: String,
}

impl UntilDate {
    /// A permanent restriction with no expiry
    pub fn none() -> Self {
        Self { until: None, display: String::new() }
    }

    pub fn is_some(&self) -> bool {
        self.until.is_some()
    }
}

/// Parse a duration argument into an absolute expiry relative to `now`
pub fn parse_until_date(input: &str, now: DateTime<Utc>) -> UntilDate {
    let input = input.trim();
    let (digits, unit) = if let Some(digits) = input.strip_suffix('h') {
        (digits, "h")
    } else if let Some(digits) = input.strip_suffix('d') {
        (digits, "d")
    } else {
        (input, "")
    };

    let amount: i64 = match digits.parse() {
        Ok(n) if n > 0 => n,
        _ => return UntilDate::none(),
    };

    // The checked constructors reject amounts past the TimeDelta bounds;
    // absurd durations degrade to "no expiry" instead of panicking.
    let (duration, noun) = match unit {
        "h" => (Duration::try_hours(amount), "hour"),
        "d" => (Duration::try_days(amount), "day"),
        _ => (Duration::try_seconds(amount), "second"),
    };
    let Some(until) = duration.and_then(|d| now.checked_add_signed(d)) else {
        return UntilDate::none();
    };

    UntilDate {
        until: Some(until),
        display: format!(
            " for {} {}{}",
            amount,
            noun,
            if amount == 1 { "" } else { "s" }
        ),
    }
}

/// Whether a duration argument is valid, used when a command requires one
pub fn is_valid_duration(input: &str) -> bool {
    parse_until_date(input, Utc::now()).is_some()
}
