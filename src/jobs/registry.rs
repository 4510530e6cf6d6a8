//! Registry of mosaic jobs and their finished output.
//!
//! Lookup is lock-free via DashMap; a side list preserves creation order
//! for listings. Finished mosaics are written to a result cache keyed by
//! job id, so the registry itself stays small.

use super::{JobId, JobRecord, JobStatus};
use crate::cache::{CacheError, CacheKey, ImageCache};
use dashmap::DashMap;
use image::RgbaImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Tracks every mosaic job and stores finished mosaics.
pub struct JobRegistry {
    jobs: DashMap<JobId, Arc<JobRecord>>,
    order: Mutex<Vec<JobId>>,
    next_id: AtomicU64,
    results: Arc<dyn ImageCache>,
}

impl JobRegistry {
    /// Creates a registry storing results in `results`.
    pub fn new(results: Arc<dyn ImageCache>) -> Self {
        Self {
            jobs: DashMap::new(),
            order: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            results,
        }
    }

    fn result_key(id: JobId) -> CacheKey {
        CacheKey::of(&format!("job:{}", id))
    }

    /// Creates a new job for `tag` in status `New`.
    pub fn create(&self, tag: &str) -> Arc<JobRecord> {
        let id = JobId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = Arc::new(JobRecord::new(id, tag));
        self.jobs.insert(id, Arc::clone(&record));
        self.order.lock().unwrap().push(id);
        debug!(job_id = %id, tag, "job created");
        record
    }

    /// Looks up a job by id.
    pub fn get(&self, id: JobId) -> Option<Arc<JobRecord>> {
        self.jobs.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// All jobs in creation order.
    pub fn list(&self) -> Vec<Arc<JobRecord>> {
        let order = self.order.lock().unwrap();
        order.iter().filter_map(|id| self.get(*id)).collect()
    }

    /// Number of jobs ever created.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Stores the finished mosaic and marks the job `Created`.
    ///
    /// The write happens before the status flip, so a `Created` status
    /// always has a retrievable result behind it.
    pub fn store_result(&self, id: JobId, mosaic: &RgbaImage) -> Result<(), CacheError> {
        self.results.put(&Self::result_key(id), mosaic)?;
        if let Some(record) = self.get(id) {
            record.advance(JobStatus::Created);
            debug!(
                job_id = %id,
                width = mosaic.width(),
                height = mosaic.height(),
                "job result stored"
            );
        }
        Ok(())
    }

    /// The finished mosaic for `id`, if the job reached `Created`.
    pub fn result(&self, id: JobId) -> Option<RgbaImage> {
        let record = self.get(id)?;
        if record.status() != JobStatus::Created {
            return None;
        }
        match self.results.get(&Self::result_key(id)) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!(job_id = %id, error = %e, "stored result unreadable");
                None
            }
        }
    }

    /// Marks the job `Failed` and records the reason.
    pub fn mark_failed(&self, id: JobId, reason: &str) {
        if let Some(record) = self.get(id) {
            record.set_error(reason);
            record.advance(JobStatus::Failed);
            debug!(job_id = %id, reason, "job failed");
        }
    }
}
