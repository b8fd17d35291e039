use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque, stable locator for an object in the remote storage backend.
/// Immutable once returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteReference(String);

impl RemoteReference {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One try of one transfer. Not persisted; used for retry bookkeeping and
/// diagnostics only.
#[derive(Debug)]
pub struct UploadAttempt {
    pub destination: String,
    pub byte_len: u64,
    pub elapsed: Duration,
    pub outcome: AttemptOutcome,
}

#[derive(Debug)]
pub enum AttemptOutcome {
    Succeeded,
    RetryScheduled,
    Failed,
}

impl UploadAttempt {
    pub fn outcome_label(&self) -> &'static str {
        match self.outcome {
            AttemptOutcome::Succeeded => "succeeded",
            AttemptOutcome::RetryScheduled => "retry_scheduled",
            AttemptOutcome::Failed => "failed",
        }
    }
}
