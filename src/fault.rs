//! The error signal callers see.
//!
//! [`IngestError`] carries full detail for logs; a [`Fault`] is what leaves
//! the process. Validation and not-found messages pass through verbatim,
//! everything else is logged and replaced by a generic message.
//!
//! ```json
//! { "status": 400, "error": "Bad Request",
//!   "message": "File at index 1 is empty",
//!   "timestamp": "2024-06-01T08:00:00Z" }
//! ```

use crate::ingest::IngestError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::error;

/// Message shown for any fault that is not the caller's doing.
pub const GENERIC_SERVER_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultStatus {
    Client,
    NotFound,
    Server,
}

impl FaultStatus {
    pub fn http_status(self) -> u16 {
        match self {
            FaultStatus::Client => 400,
            FaultStatus::NotFound => 404,
            FaultStatus::Server => 500,
        }
    }

    pub fn reason_phrase(self) -> &'static str {
        match self {
            FaultStatus::Client => "Bad Request",
            FaultStatus::NotFound => "Not Found",
            FaultStatus::Server => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub status: FaultStatus,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl Fault {
    pub fn new(
        status: FaultStatus,
        message: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            occurred_at,
        }
    }

    /// Map an ingestion error onto the fault surface.
    ///
    /// Unexpected errors are logged in full here and never echoed.
    pub fn from_error(err: &IngestError, now: DateTime<Utc>) -> Self {
        match err {
            IngestError::Validation(message) => {
                Self::new(FaultStatus::Client, message.clone(), now)
            }
            IngestError::NotFound(_) => Self::new(FaultStatus::NotFound, err.to_string(), now),
            IngestError::Unexpected(source) => {
                error!(error = %source, "unexpected failure");
                Self::new(FaultStatus::Server, GENERIC_SERVER_MESSAGE, now)
            }
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status.http_status(), self.status.reason_phrase(), self.message)
    }
}

#[derive(Serialize)]
struct FaultBody<'a> {
    status: u16,
    error: &'static str,
    message: &'a str,
    timestamp: DateTime<Utc>,
}

impl Serialize for Fault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FaultBody {
            status: self.status.http_status(),
            error: self.status.reason_phrase(),
            message: &self.message,
            timestamp: self.occurred_at,
        }
        .serialize(serializer)
    }
}
