use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Caller-assigned support call identifier.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The two work queues of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Submission,
    Processing,
}

impl QueueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueKind::Submission => "submission",
            QueueKind::Processing => "processing",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the store does when a new support call reuses an existing id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse the new record with a `Conflict` error.
    #[default]
    Reject,
    /// Replace the existing record (status resets to `Created`).
    Overwrite,
    /// Keep the existing record and report it back unchanged.
    Ignore,
}

impl FromStr for DuplicatePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "overwrite" => Ok(Self::Overwrite),
            "ignore" => Ok(Self::Ignore),
            other => Err(CoreError::Validation(format!(
                "Unknown duplicate id policy '{other}', expected reject, overwrite or ignore"
            ))),
        }
    }
}
