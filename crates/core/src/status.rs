//! Support call lifecycle status.
//!
//! The lifecycle is strictly linear:
//!
//! ```text
//! Created -> Transcribing -> Processing -> Processed
//! ```
//!
//! A status may only move to its immediate successor.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Stored by the router, possibly waiting in the submission queue.
    Created,
    /// Accepted by the provider; the callback has not arrived yet.
    Transcribing,
    /// Provider result stored, waiting in the processing queue.
    Processing,
    /// Terminal.
    Processed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Created,
        JobStatus::Transcribing,
        JobStatus::Processing,
        JobStatus::Processed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "Created",
            JobStatus::Transcribing => "Transcribing",
            JobStatus::Processing => "Processing",
            JobStatus::Processed => "Processed",
        }
    }

    /// The only status this one may advance to, or `None` when terminal.
    pub fn next(self) -> Option<JobStatus> {
        match self {
            JobStatus::Created => Some(JobStatus::Transcribing),
            JobStatus::Transcribing => Some(JobStatus::Processing),
            JobStatus::Processing => Some(JobStatus::Processed),
            JobStatus::Processed => None,
        }
    }

    pub fn can_advance_to(self, target: JobStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
