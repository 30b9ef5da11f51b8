//! Template formatter registry.
//!
//! A fixed, statically declared mapping from filter name to filter function.
//! Every filter the DAG template may call is listed in `FORMATTERS`; the
//! table is registered once per engine construction and never changes.
//!
//! All filters turn model values into python source fragments, e.g.
//! `"1h15m" | format_timedelta` -> `datetime.timedelta(hours=1, minutes=15)`.

use crate::spec::validate::{is_timedelta_string, parse_timedelta};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use tera::{Tera, Value};

type FilterFn = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

pub const FORMATTERS: &[(&str, FilterFn)] = &[
    ("format_schedule_interval", format_schedule_interval),
    ("format_timedelta", format_timedelta),
    ("format_date", format_date),
    ("python_bool", python_bool),
    ("python_list", python_list),
];

/// Register the whole table on a tera engine.
pub fn register_all(tera: &mut Tera) {
    for (name, filter) in FORMATTERS {
        tera.register_filter(name, *filter);
    }
}

fn expect_str<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} expects a string, got {value}")))
}

/// Single-quoted python string literal.
fn py_str(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Presets and cron expressions become quoted strings; timedelta strings
/// become `datetime.timedelta(...)` expressions.
fn format_schedule_interval(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "format_schedule_interval")?;
    if is_timedelta_string(s) {
        return format_timedelta(value, args);
    }
    Ok(Value::String(py_str(s)))
}

/// `"1d4h45m"` -> `datetime.timedelta(days=1, hours=4, minutes=45)`.
fn format_timedelta(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "format_timedelta")?;
    let (days, hours, minutes) = parse_timedelta(s)
        .ok_or_else(|| tera::Error::msg(format!("format_timedelta: not a timedelta: {s:?}")))?;
    Ok(Value::String(format!(
        "datetime.timedelta(days={days}, hours={hours}, minutes={minutes})"
    )))
}

/// `"2020-01-01"` -> `datetime.datetime(2020, 1, 1, 0, 0)`.
fn format_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "format_date")?;
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| tera::Error::msg(format!("format_date: bad date {s:?}: {e}")))?;
    Ok(Value::String(format!(
        "datetime.datetime({}, {}, {}, 0, 0)",
        date.year(),
        date.month(),
        date.day()
    )))
}

fn python_bool(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let b = value
        .as_bool()
        .ok_or_else(|| tera::Error::msg(format!("python_bool expects a bool, got {value}")))?;
    Ok(Value::String(if b { "True" } else { "False" }.to_string()))
}

/// List of strings -> python list literal, e.g. `['a@b.com', 'c@d.org']`.
fn python_list(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let items = value
        .as_array()
        .ok_or_else(|| tera::Error::msg(format!("python_list expects a list, got {value}")))?;
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(py_str(expect_str(item, "python_list")?));
    }
    Ok(Value::String(format!("[{}]", parts.join(", "))))
}
