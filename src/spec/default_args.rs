//! Scheduler-wide execution defaults (ownership, timing, retry and
//! notification policy).
//!
//! Two representations, same split as the DAG model:
//! - DefaultArgsSpec: raw config shape (serde-friendly, carries defaults)
//! - DefaultArgs: validated value object — cannot exist with an invalid field

use crate::error::ValidationError;
use crate::spec::validate::{is_date_string, is_email, is_timedelta_string};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Raw `default_args` shape as it appears in the DAG config body.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultArgsSpec {
    pub owner: String,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub email: Vec<String>,

    #[serde(default)]
    pub depends_on_past: bool,

    #[serde(default = "default_retry_delay")]
    pub retry_delay: String,

    #[serde(default = "default_true")]
    pub email_on_failure: bool,

    #[serde(default = "default_true")]
    pub email_on_retry: bool,

    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_retry_delay() -> String {
    "30m".to_string()
}

fn default_true() -> bool {
    true
}

fn default_retries() -> u32 {
    2
}

/// Validated default_args. Fields are private: the only way in is
/// `from_spec`, which runs every field validator exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultArgs {
    owner: String,
    start_date: Option<String>,
    email: Vec<String>,
    depends_on_past: bool,
    retry_delay: String,
    email_on_failure: bool,
    email_on_retry: bool,
    retries: u32,
}

impl DefaultArgs {
    /// Validate every field; the first violation aborts construction.
    /// Validators are independent — no cross-field rules here.
    pub fn from_spec(spec: DefaultArgsSpec) -> Result<Self, ValidationError> {
        if !is_email(&spec.owner) {
            return Err(ValidationError::InvalidEmail {
                field: "owner",
                value: spec.owner,
            });
        }

        if let Some(date) = &spec.start_date {
            if !is_date_string(date) {
                return Err(ValidationError::InvalidDate {
                    field: "start_date",
                    value: date.clone(),
                });
            }
        }

        for entry in &spec.email {
            if !is_email(entry) {
                return Err(ValidationError::InvalidEmail {
                    field: "email",
                    value: entry.clone(),
                });
            }
        }

        if !is_timedelta_string(&spec.retry_delay) {
            return Err(ValidationError::InvalidTimedelta {
                field: "retry_delay",
                value: spec.retry_delay,
            });
        }

        Ok(Self {
            owner: spec.owner,
            start_date: spec.start_date,
            email: spec.email,
            depends_on_past: spec.depends_on_past,
            retry_delay: spec.retry_delay,
            email_on_failure: spec.email_on_failure,
            email_on_retry: spec.email_on_retry,
            retries: spec.retries,
        })
    }

    /// Plain mapping for templating: every field by name, in declaration
    /// order, no filtering. Relies on serde_json's preserve_order map.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("owner".to_string(), json!(self.owner));
        m.insert("start_date".to_string(), json!(self.start_date));
        m.insert("email".to_string(), json!(self.email));
        m.insert("depends_on_past".to_string(), json!(self.depends_on_past));
        m.insert("retry_delay".to_string(), json!(self.retry_delay));
        m.insert("email_on_failure".to_string(), json!(self.email_on_failure));
        m.insert("email_on_retry".to_string(), json!(self.email_on_retry));
        m.insert("retries".to_string(), json!(self.retries));
        m
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    pub fn email(&self) -> &[String] {
        &self.email
    }

    pub fn retry_delay(&self) -> &str {
        &self.retry_delay
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}
