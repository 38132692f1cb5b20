//! Background worker that drains the reminder job queue.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::jobs::queue::JobQueue;

/// Single consumer of the job queue.
///
/// The loop pops the earliest job, sleeps until its fire time, and runs
/// the action on a tracked task so one slow or panicking reminder never
/// stalls the loop. An empty queue is polled at `poll_interval`, which
/// also bounds how long a freshly scheduled job can sit unnoticed.
pub struct ReminderWorker {
    queue: Arc<JobQueue>,
    poll_interval: Duration,
    cancel: CancellationToken,
    tracker: TaskTracker,
    handle: Option<JoinHandle<()>>,
}

impl ReminderWorker {
    pub fn new(queue: Arc<JobQueue>, poll_interval: Duration) -> Self {
        Self {
            queue,
            poll_interval,
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            handle: None,
        }
    }

    /// Start the worker loop on a background task.
    pub fn start(&mut self) {
        let queue = Arc::clone(&self.queue);
        let poll_interval = self.poll_interval;
        let cancel = self.cancel.clone();
        let tracker = self.tracker.clone();

        let handle = tokio::spawn(async move {
            info!(poll_interval_secs = poll_interval.as_secs(), "Reminder worker started");

            loop {
                if cancel.is_cancelled() {
                    break;
                }

                let job = match queue.pop() {
                    Some(job) => job,
                    None => {
                        tokio::select! {
                            _ = tokio::time::sleep(poll_interval) => continue,
                            _ = cancel.cancelled() => break,
                        }
                    }
                };

                let now = Utc::now();
                if job.fire_at > now {
                    let wait = (job.fire_at - now).to_std().unwrap_or(Duration::ZERO);
                    debug!(
                        questionnaire_id = job.questionnaire_id,
                        wait_secs = wait.as_secs(),
                        "Waiting for next reminder"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = cancel.cancelled() => {
                            // Not due yet and we are stopping; the next
                            // bootstrap reschedules it from the database.
                            debug!(
                                questionnaire_id = job.questionnaire_id,
                                "Dropping undue job on shutdown"
                            );
                            break;
                        }
                    }
                }

                debug!(questionnaire_id = job.questionnaire_id, "Reminder job firing");
                tracker.spawn(job.action);
            }

            info!("Reminder worker stopped");
        });

        self.handle = Some(handle);
    }

    /// Initiate graceful shutdown.
    /// Returns immediately after signaling the worker loop.
    pub fn shutdown(&self) {
        info!("Initiating reminder worker shutdown");
        self.cancel.cancel();
    }

    /// Wait for the worker loop and in-flight reminder actions, up to the
    /// timeout.
    pub async fn wait_for_shutdown(mut self, timeout: Duration) {
        info!("Waiting for reminder worker to stop (timeout: {:?})", timeout);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Reminder worker task panicked: {}", e);
            }
        }

        self.tracker.close();
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => info!("All reminder actions completed"),
            Err(_) => warn!("Reminder shutdown timed out after {:?}", timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use domain::models::DelayedJob;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const POLL: Duration = Duration::from_millis(10);

    fn counting_job(
        queue: &JobQueue,
        offset: ChronoDuration,
        questionnaire_id: i32,
        counter: Arc<AtomicUsize>,
    ) {
        queue.push(DelayedJob::new(
            Utc::now() + offset,
            questionnaire_id,
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        ));
    }

    #[tokio::test]
    async fn test_worker_executes_due_job() {
        let queue = Arc::new(JobQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));
        counting_job(&queue, ChronoDuration::seconds(-1), 1, Arc::clone(&counter));

        let mut worker = ReminderWorker::new(Arc::clone(&queue), POLL);
        worker.start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(queue.is_empty());

        worker.shutdown();
        worker.wait_for_shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_worker_picks_up_job_pushed_after_start() {
        let queue = Arc::new(JobQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let mut worker = ReminderWorker::new(Arc::clone(&queue), POLL);
        worker.start();

        tokio::time::sleep(Duration::from_millis(30)).await;
        counting_job(&queue, ChronoDuration::seconds(-1), 1, Arc::clone(&counter));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        worker.shutdown();
        worker.wait_for_shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_worker_waits_until_fire_time() {
        let queue = Arc::new(JobQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));
        counting_job(
            &queue,
            ChronoDuration::milliseconds(300),
            1,
            Arc::clone(&counter),
        );

        let mut worker = ReminderWorker::new(Arc::clone(&queue), POLL);
        worker.start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        worker.shutdown();
        worker.wait_for_shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_worker_survives_panicking_action() {
        let queue = Arc::new(JobQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));

        queue.push(DelayedJob::new(
            Utc::now() - ChronoDuration::seconds(2),
            1,
            Box::pin(async {
                panic!("reminder blew up");
            }),
        ));
        counting_job(&queue, ChronoDuration::seconds(-1), 2, Arc::clone(&counter));

        let mut worker = ReminderWorker::new(Arc::clone(&queue), POLL);
        worker.start();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        worker.shutdown();
        worker.wait_for_shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_inflight_action() {
        let queue = Arc::new(JobQueue::new());
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        queue.push(DelayedJob::new(
            Utc::now() - ChronoDuration::seconds(1),
            1,
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                flag.store(true, Ordering::SeqCst);
            }),
        ));

        let mut worker = ReminderWorker::new(Arc::clone(&queue), POLL);
        worker.start();

        // Let the worker pick the job up, then stop while it is running.
        tokio::time::sleep(Duration::from_millis(30)).await;
        worker.shutdown();
        worker.wait_for_shutdown(Duration::from_secs(2)).await;

        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_of_idle_worker_returns_promptly() {
        let queue = Arc::new(JobQueue::new());
        let mut worker = ReminderWorker::new(queue, Duration::from_secs(60));
        worker.start();

        tokio::time::sleep(Duration::from_millis(20)).await;
        worker.shutdown();

        // Must not wait out the 60s poll interval.
        tokio::time::timeout(
            Duration::from_secs(1),
            worker.wait_for_shutdown(Duration::from_secs(1)),
        )
        .await
        .expect("idle worker should stop quickly");
    }

    #[tokio::test]
    async fn test_shutdown_drops_undue_job() {
        let queue = Arc::new(JobQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));
        counting_job(&queue, ChronoDuration::hours(1), 1, Arc::clone(&counter));

        let mut worker = ReminderWorker::new(Arc::clone(&queue), POLL);
        worker.start();

        tokio::time::sleep(Duration::from_millis(30)).await;
        worker.shutdown();
        worker.wait_for_shutdown(Duration::from_secs(1)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
