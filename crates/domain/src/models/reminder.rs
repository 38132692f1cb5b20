//! Delayed reminder jobs and the lead-time table.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A deferred, parameterless, side-effecting operation: everything the job
/// needs (questionnaire id, lead-time label, service handles) is captured
/// when the job is built, and the future runs only when the job fires.
pub type JobAction = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A reminder waiting in the job queue.
///
/// `questionnaire_id` is not unique within the queue: a questionnaire gets
/// one job per lead time still ahead of it when scheduled, so up to
/// [`LEAD_TIMES`]`.len()` jobs share an id. Once popped, a job is never
/// re-inserted; it executes at most once.
pub struct DelayedJob {
    /// Absolute time at which the job becomes due.
    pub fire_at: DateTime<Utc>,
    /// Questionnaire the reminder belongs to; cancellation and status
    /// lookups key on this.
    pub questionnaire_id: i32,
    /// Work to run when the job fires.
    pub action: JobAction,
}

impl DelayedJob {
    pub fn new(fire_at: DateTime<Utc>, questionnaire_id: i32, action: JobAction) -> Self {
        Self {
            fire_at,
            questionnaire_id,
            action,
        }
    }
}

impl fmt::Debug for DelayedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayedJob")
            .field("fire_at", &self.fire_at)
            .field("questionnaire_id", &self.questionnaire_id)
            .finish_non_exhaustive()
    }
}

/// How long before a deadline a reminder fires, plus the remaining-time
/// label used verbatim in the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadTime {
    pub minutes: i64,
    pub label: &'static str,
}

impl LeadTime {
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes)
    }
}

/// The reminder schedule applied to every questionnaire deadline, largest
/// lead first. Process-wide fixed configuration, not state.
pub const LEAD_TIMES: [LeadTime; 5] = [
    LeadTime {
        minutes: 7 * 24 * 60,
        label: "1 week",
    },
    LeadTime {
        minutes: 24 * 60,
        label: "1 day",
    },
    LeadTime {
        minutes: 60,
        label: "1 hour",
    },
    LeadTime {
        minutes: 30,
        label: "30 minutes",
    },
    LeadTime {
        minutes: 5,
        label: "5 minutes",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_times_descend_from_one_week_to_five_minutes() {
        let minutes: Vec<i64> = LEAD_TIMES.iter().map(|lead| lead.minutes).collect();
        assert_eq!(minutes, vec![10080, 1440, 60, 30, 5]);
    }

    #[test]
    fn test_lead_time_labels() {
        let labels: Vec<&str> = LEAD_TIMES.iter().map(|lead| lead.label).collect();
        assert_eq!(
            labels,
            vec!["1 week", "1 day", "1 hour", "30 minutes", "5 minutes"]
        );
    }

    #[test]
    fn test_lead_time_duration() {
        let lead = LeadTime {
            minutes: 30,
            label: "30 minutes",
        };
        assert_eq!(lead.duration(), Duration::minutes(30));
    }

    #[test]
    fn test_delayed_job_debug_omits_action() {
        let job = DelayedJob::new(Utc::now(), 7, Box::pin(async {}));
        let rendered = format!("{:?}", job);

        assert!(rendered.contains("questionnaire_id: 7"));
        assert!(!rendered.contains("action"));
    }
}
