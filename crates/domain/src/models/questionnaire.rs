//! Questionnaire read models consumed by the reminder subsystem.
//!
//! These are projections of questionnaire state owned by the surrounding
//! backend; the reminder subsystem only ever reads them.

use chrono::{DateTime, Utc};

/// A questionnaire eligible for reminder scheduling: not soft-deleted and
/// carrying a response deadline. Loaded once at startup to seed the job
/// queue.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderCandidate {
    pub questionnaire_id: i32,
    pub response_due_at: DateTime<Utc>,
}

/// A user designated to answer a questionnaire. A target may be canceled
/// (excluded from reminders) without being removed from the target list.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireTarget {
    pub user_id: String,
    pub is_canceled: bool,
}

/// Everything the notifier needs to know about a questionnaire at the
/// moment a reminder fires. Fetched fresh per reminder so that late edits,
/// cancellations and new responses are reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireDetail {
    pub questionnaire_id: i32,
    pub title: String,
    pub description: String,
    /// Administrator user ids, named in the reminder message.
    pub administrators: Vec<String>,
    pub response_due_at: Option<DateTime<Utc>>,
    pub targets: Vec<QuestionnaireTarget>,
    /// Users who have already submitted a response.
    pub respondent_ids: Vec<String>,
}

impl QuestionnaireDetail {
    /// Targets that still owe a response: not canceled and not among the
    /// respondents. These are the users a reminder mentions.
    pub fn outstanding_targets(&self) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|target| !target.is_canceled)
            .filter(|target| !self.respondent_ids.iter().any(|r| r == &target.user_id))
            .map(|target| target.user_id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(user_id: &str, is_canceled: bool) -> QuestionnaireTarget {
        QuestionnaireTarget {
            user_id: user_id.to_string(),
            is_canceled,
        }
    }

    fn detail_with(targets: Vec<QuestionnaireTarget>, respondents: &[&str]) -> QuestionnaireDetail {
        QuestionnaireDetail {
            questionnaire_id: 1,
            title: "Team lunch survey".to_string(),
            description: "Pick a date".to_string(),
            administrators: vec!["alice".to_string()],
            response_due_at: Some(Utc::now()),
            targets,
            respondent_ids: respondents.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_outstanding_targets_excludes_canceled() {
        let detail = detail_with(vec![target("bob", false), target("carol", true)], &[]);

        assert_eq!(detail.outstanding_targets(), vec!["bob"]);
    }

    #[test]
    fn test_outstanding_targets_excludes_respondents() {
        let detail = detail_with(
            vec![target("bob", false), target("carol", false)],
            &["carol"],
        );

        assert_eq!(detail.outstanding_targets(), vec!["bob"]);
    }

    #[test]
    fn test_outstanding_targets_empty_when_everyone_answered() {
        let detail = detail_with(
            vec![target("bob", false), target("carol", true)],
            &["bob"],
        );

        assert!(detail.outstanding_targets().is_empty());
    }

    #[test]
    fn test_outstanding_targets_keeps_target_order() {
        let detail = detail_with(
            vec![target("carol", false), target("bob", false), target("dave", false)],
            &[],
        );

        assert_eq!(detail.outstanding_targets(), vec!["carol", "bob", "dave"]);
    }
}
