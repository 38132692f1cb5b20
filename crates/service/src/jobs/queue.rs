//! Time-ordered queue of delayed reminder jobs.

use std::sync::Mutex;

use domain::models::DelayedJob;

/// In-memory queue of pending reminder jobs, kept sorted by fire time.
///
/// The queue is shared between the scheduler and the worker behind an
/// `Arc`; every method takes `&self` and holds the lock only for the
/// duration of the call. Queue state lives in memory only, so a restart
/// starts empty and is reseeded from the database.
#[derive(Default)]
pub struct JobQueue {
    jobs: Mutex<Vec<DelayedJob>>,
}

impl JobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job, keeping the queue ordered by `fire_at`.
    ///
    /// The sort is stable: jobs with the same fire time keep their
    /// insertion order.
    pub fn push(&self, job: DelayedJob) {
        let mut jobs = self.jobs.lock().expect("job queue lock poisoned");
        jobs.push(job);
        jobs.sort_by_key(|job| job.fire_at);
    }

    /// Remove and return the earliest job, or `None` if the queue is empty.
    ///
    /// A popped job is gone: if it is not executed it is never seen again.
    pub fn pop(&self) -> Option<DelayedJob> {
        let mut jobs = self.jobs.lock().expect("job queue lock poisoned");
        if jobs.is_empty() {
            None
        } else {
            Some(jobs.remove(0))
        }
    }

    /// Drop every queued job for the given questionnaire.
    ///
    /// Unknown ids are a no-op. A job the worker already popped is out of
    /// reach here; the notifier re-checks state at fire time instead.
    pub fn remove_by_questionnaire(&self, questionnaire_id: i32) {
        let mut jobs = self.jobs.lock().expect("job queue lock poisoned");
        jobs.retain(|job| job.questionnaire_id != questionnaire_id);
    }

    /// Whether any queued job belongs to the given questionnaire.
    pub fn has_pending(&self, questionnaire_id: i32) -> bool {
        let jobs = self.jobs.lock().expect("job queue lock poisoned");
        jobs.iter()
            .any(|job| job.questionnaire_id == questionnaire_id)
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.lock().expect("job queue lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
