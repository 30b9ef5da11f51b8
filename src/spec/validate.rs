//! Pure format predicates shared by the DAG and default_args models.
//!
//! These are total functions over strings; entity constructors call them and
//! turn rejections into typed `ValidationError`s. The grammars:
//! - email: local-part@domain shape (syntactic only)
//! - date: strict YYYY-MM-DD, calendar-valid
//! - timedelta: [n]d[n]h[n]m — each unit optional, at least one present,
//!   fixed d -> h -> m order, no repeats
//! - schedule interval: @preset | 5-field cron | timedelta

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Required namespace prefix for all DAG names.
pub const DAG_NAME_PREFIX: &str = "bqetl_";

/// Named schedule presets accepted verbatim.
pub const SCHEDULE_PRESETS: &[&str] = &[
    "@once", "@hourly", "@daily", "@weekly", "@monthly", "@yearly",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap()
});

static TIMEDELTA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)d)?(?:(\d+)h)?(?:(\d+)m)?$").unwrap());

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

// Exactly 5 whitespace-separated fields; field contents are not interpreted.
static CRON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+\s+\S+\s+\S+\s+\S+\s+\S+$").unwrap());

/// Syntactic email-address check, applied uniformly to `owner` and every
/// entry of `email`.
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Strict `YYYY-MM-DD` check: zero-padded fields and a real calendar date.
pub fn is_date_string(s: &str) -> bool {
    DATE_RE.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Timedelta literal check, e.g. `30m`, `1h15m`, `1d4h45m`. A literal must
/// also be representable: a digit run too large for u64 is rejected here
/// rather than truncated later.
pub fn is_timedelta_string(s: &str) -> bool {
    parse_timedelta(s).is_some()
}

/// Split a timedelta literal into (days, hours, minutes). None if `s` does
/// not match the grammar or a unit value does not fit in u64. An absent unit
/// is 0; a present-but-unparsable one is an error, never 0.
pub fn parse_timedelta(s: &str) -> Option<(u64, u64, u64)> {
    if s.is_empty() {
        return None;
    }
    let caps = TIMEDELTA_RE.captures(s)?;
    let unit = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some((unit(1)?, unit(2)?, unit(3)?))
}

/// Schedule interval check: named preset, 5-field cron, or timedelta.
pub fn is_schedule_interval(s: &str) -> bool {
    SCHEDULE_PRESETS.contains(&s) || CRON_RE.is_match(s) || is_timedelta_string(s)
}

/// DAG names must carry the orchestration namespace prefix.
pub fn is_valid_dag_name(s: &str) -> bool {
    s.starts_with(DAG_NAME_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last+tag@sub-domain.example.org"));
    }

    #[test]
    fn email_rejects_non_addresses() {
        assert!(!is_email("not-an-email"));
        assert!(!is_email(""));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
    }

    #[test]
    fn date_accepts_strict_calendar_dates() {
        assert!(is_date_string("2020-01-01"));
        assert!(is_date_string("2020-02-29")); // leap year
    }

    #[test]
    fn date_rejects_bad_formats_and_impossible_dates() {
        assert!(!is_date_string("2020-1-1")); // not zero-padded
        assert!(!is_date_string("01-01-2020"));
        assert!(!is_date_string("2019-02-29")); // not a leap year
        assert!(!is_date_string("2020-13-01"));
        assert!(!is_date_string(""));
    }

    #[test]
    fn timedelta_accepts_composable_units_in_order() {
        assert!(is_timedelta_string("30m"));
        assert!(is_timedelta_string("1h"));
        assert!(is_timedelta_string("1h15m"));
        assert!(is_timedelta_string("1d4h45m"));
        assert!(is_timedelta_string("2d"));
    }

    #[test]
    fn timedelta_rejects_bad_units_order_and_repeats() {
        assert!(!is_timedelta_string("30")); // no unit
        assert!(!is_timedelta_string("1x")); // bad unit
        assert!(!is_timedelta_string("45m1d")); // wrong order
        assert!(!is_timedelta_string("2d2d")); // repeated unit
        assert!(!is_timedelta_string(""));
    }

    #[test]
    fn timedelta_rejects_unrepresentable_values() {
        // Grammar-valid but larger than u64: must be rejected, not zeroed.
        assert!(!is_timedelta_string("99999999999999999999m"));
        assert!(!is_timedelta_string("1d99999999999999999999h45m"));
        assert_eq!(parse_timedelta("99999999999999999999m"), None);

        // Largest representable value still passes.
        assert!(is_timedelta_string("18446744073709551615m"));
        assert_eq!(
            parse_timedelta("18446744073709551615m"),
            Some((0, 0, u64::MAX))
        );
    }

    #[test]
    fn parse_timedelta_splits_units() {
        assert_eq!(parse_timedelta("1d4h45m"), Some((1, 4, 45)));
        assert_eq!(parse_timedelta("30m"), Some((0, 0, 30)));
        assert_eq!(parse_timedelta("1h"), Some((0, 1, 0)));
        assert_eq!(parse_timedelta("45m1d"), None);
        assert_eq!(parse_timedelta(""), None);
    }

    #[test]
    fn schedule_interval_accepts_presets_cron_and_timedelta() {
        for preset in SCHEDULE_PRESETS {
            assert!(is_schedule_interval(preset), "preset {preset} rejected");
        }
        assert!(is_schedule_interval("0 1 * * *"));
        assert!(is_schedule_interval("*/5 0-12 1,15 * MON-FRI"));
        assert!(is_schedule_interval("1d4h45m"));
    }

    #[test]
    fn schedule_interval_rejects_malformed_values() {
        assert!(!is_schedule_interval(""));
        assert!(!is_schedule_interval("@fortnightly"));
        assert!(!is_schedule_interval("0 1 * *")); // 4 cron fields
        assert!(!is_schedule_interval("45m1d"));
        assert!(!is_schedule_interval("2d2d"));
    }

    #[test]
    fn dag_name_requires_prefix() {
        assert!(is_valid_dag_name("bqetl_example"));
        assert!(is_valid_dag_name("bqetl_")); // any suffix, including empty
        assert!(!is_valid_dag_name("example"));
        assert!(!is_valid_dag_name(""));
        assert!(!is_valid_dag_name("Bqetl_example"));
    }
}
