//! Mosaic job tracking.
//!
//! Each requested mosaic becomes a job with a monotonic lifecycle:
//!
//! ```text
//!            ┌──► Created
//! New ─► Working
//!            └──► Failed
//! ```
//!
//! Status is stored as an atomic u8 and only ever advances; a late or
//! duplicate transition that would move a job backwards is refused. Terminal
//! states are frozen.

mod registry;

pub use registry::JobRegistry;

use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

/// Unique identifier for a mosaic job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct JobId(u64);

impl JobId {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value, for keys and URLs.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a mosaic job.
///
/// The numeric ordering is the lifecycle ordering: a job's status value
/// never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum JobStatus {
    /// Job accepted, not yet generating
    New = 0,
    /// Mosaic generation in progress
    Working = 1,
    /// Mosaic generated and stored
    Created = 2,
    /// Generation failed; see the job's error
    Failed = 3,
}

impl JobStatus {
    /// Converts from u8 representation.
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::New),
            1 => Some(Self::Working),
            2 => Some(Self::Created),
            3 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true if no further transitions are allowed.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Created | Self::Failed)
    }

    /// Returns the status name for logging and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Working => "working",
            Self::Created => "created",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tracked mosaic job.
///
/// Status updates are lock-free; the error slot is only written once, on
/// failure.
pub struct JobRecord {
    pub id: JobId,
    pub tag: String,
    status: AtomicU8,
    error: Mutex<Option<String>>,
}

impl JobRecord {
    pub(crate) fn new(id: JobId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            status: AtomicU8::new(JobStatus::New as u8),
            error: Mutex::new(None),
        }
    }

    /// Returns the current status.
    #[inline]
    pub fn status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Acquire)).unwrap_or(JobStatus::New)
    }

    /// Advances the status, refusing any non-forward transition.
    ///
    /// Returns true if the transition was applied. A job already in a
    /// terminal state, or already at or past `next`, is left untouched.
    pub fn advance(&self, next: JobStatus) -> bool {
        let mut current = self.status.load(Ordering::Acquire);
        loop {
            match JobStatus::from_u8(current) {
                Some(s) if !s.is_terminal() && (s as u8) < next as u8 => {}
                _ => return false,
            }
            match self.status.compare_exchange_weak(
                current,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Records the failure reason. The first write wins.
    pub(crate) fn set_error(&self, message: impl Into<String>) {
        let mut error = self.error.lock().unwrap();
        if error.is_none() {
            *error = Some(message.into());
        }
    }

    /// The failure reason, if the job failed.
    pub fn error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for JobRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRecord")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("status", &self.status())
            .field("error", &self.error())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_from_u8() {
        assert_eq!(JobStatus::from_u8(0), Some(JobStatus::New));
        assert_eq!(JobStatus::from_u8(1), Some(JobStatus::Working));
        assert_eq!(JobStatus::from_u8(2), Some(JobStatus::Created));
        assert_eq!(JobStatus::from_u8(3), Some(JobStatus::Failed));
        assert_eq!(JobStatus::from_u8(4), None);
        assert_eq!(JobStatus::from_u8(255), None);
    }

    #[test]
    fn test_job_status_is_terminal() {
        assert!(!JobStatus::New.is_terminal());
        assert!(!JobStatus::Working.is_terminal());
        assert!(JobStatus::Created.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_record_advances_forward() {
        let record = JobRecord::new(JobId::from_raw(1), "cats");
        assert_eq!(record.status(), JobStatus::New);

        assert!(record.advance(JobStatus::Working));
        assert_eq!(record.status(), JobStatus::Working);

        assert!(record.advance(JobStatus::Created));
        assert_eq!(record.status(), JobStatus::Created);
    }

    #[test]
    fn test_record_refuses_regression() {
        let record = JobRecord::new(JobId::from_raw(1), "cats");
        record.advance(JobStatus::Working);

        assert!(!record.advance(JobStatus::New));
        assert_eq!(record.status(), JobStatus::Working);
        assert!(!record.advance(JobStatus::Working));
    }

    #[test]
    fn test_terminal_status_is_frozen() {
        let record = JobRecord::new(JobId::from_raw(1), "cats");
        record.advance(JobStatus::Created);

        assert!(!record.advance(JobStatus::Failed));
        assert_eq!(record.status(), JobStatus::Created);
    }

    #[test]
    fn test_skipping_working_is_allowed() {
        // A job that fails before generation starts goes straight to Failed.
        let record = JobRecord::new(JobId::from_raw(1), "cats");
        assert!(record.advance(JobStatus::Failed));
        assert_eq!(record.status(), JobStatus::Failed);
    }

    #[test]
    fn test_first_error_wins() {
        let record = JobRecord::new(JobId::from_raw(1), "cats");
        record.set_error("no images available");
        record.set_error("later error");
        assert_eq!(record.error().as_deref(), Some("no images available"));
    }
}
