//! Turns questionnaire deadlines into queued reminder jobs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use domain::models::{DelayedJob, LEAD_TIMES};
use domain::services::QuestionnaireStore;

use crate::jobs::queue::JobQueue;
use crate::services::ReminderNotifier;

/// Creates reminder jobs from questionnaire deadlines and feeds the queue.
///
/// One job is queued per lead time that is still ahead of the clock, so a
/// deadline more than a week away gets the full set and a deadline in two
/// hours only gets the short ones.
pub struct ReminderScheduler {
    queue: Arc<JobQueue>,
    store: Arc<dyn QuestionnaireStore>,
    notifier: Arc<ReminderNotifier>,
}

impl ReminderScheduler {
    pub fn new(
        queue: Arc<JobQueue>,
        store: Arc<dyn QuestionnaireStore>,
        notifier: Arc<ReminderNotifier>,
    ) -> Self {
        Self {
            queue,
            store,
            notifier,
        }
    }

    /// Queue reminder jobs for one questionnaire deadline.
    ///
    /// Lead times whose fire time has already passed are skipped silently,
    /// including the whole set when the deadline itself is in the past.
    /// The job action logs notification errors instead of returning them;
    /// one failed reminder never affects the others.
    pub fn schedule_for_deadline(&self, questionnaire_id: i32, response_due_at: DateTime<Utc>) {
        let now = Utc::now();
        let mut queued = 0usize;

        for lead in LEAD_TIMES {
            let fire_at = response_due_at - lead.duration();
            if fire_at <= now {
                continue;
            }

            let notifier = Arc::clone(&self.notifier);
            let action = Box::pin(async move {
                if let Err(e) = notifier.send_reminder(questionnaire_id, lead.label).await {
                    error!(
                        questionnaire_id = questionnaire_id,
                        remaining = lead.label,
                        error = %e,
                        "Reminder notification failed"
                    );
                }
            });

            self.queue
                .push(DelayedJob::new(fire_at, questionnaire_id, action));
            queued += 1;
        }

        debug!(
            questionnaire_id = questionnaire_id,
            queued = queued,
            due_at = %response_due_at,
            "Scheduled reminder jobs"
        );
    }

    /// Drop every pending reminder for a questionnaire.
    pub fn cancel_for_questionnaire(&self, questionnaire_id: i32) {
        self.queue.remove_by_questionnaire(questionnaire_id);
        debug!(
            questionnaire_id = questionnaire_id,
            "Cancelled pending reminders"
        );
    }

    /// Replace the pending reminders after a deadline change.
    ///
    /// Passing `None` just cancels, for questionnaires whose deadline was
    /// removed.
    pub fn reschedule(&self, questionnaire_id: i32, response_due_at: Option<DateTime<Utc>>) {
        self.queue.remove_by_questionnaire(questionnaire_id);
        if let Some(due) = response_due_at {
            self.schedule_for_deadline(questionnaire_id, due);
        }
    }

    /// Whether the questionnaire still has queued reminders.
    pub fn has_scheduled_reminder(&self, questionnaire_id: i32) -> bool {
        self.queue.has_pending(questionnaire_id)
    }

    /// Load every live questionnaire with a deadline and queue its
    /// reminders. Called once at startup; a store failure is fatal and
    /// left to the caller.
    pub async fn bootstrap(&self) -> anyhow::Result<()> {
        let candidates = self.store.list_questionnaires_needing_reminders().await?;
        let count = candidates.len();

        for candidate in candidates {
            self.schedule_for_deadline(candidate.questionnaire_id, candidate.response_due_at);
        }

        info!(
            questionnaires = count,
            jobs = self.queue.len(),
            "Reminder queue bootstrapped"
        );
        Ok(())
    }
}
