//! Questionnaire store abstraction.
//!
//! The reminder subsystem only ever reads questionnaire state, so the seam
//! is two queries: the bootstrap listing and the per-questionnaire detail
//! fetched again at fire time.

use std::collections::HashMap;

use crate::models::{QuestionnaireDetail, ReminderCandidate};

/// Read access to questionnaire state.
#[async_trait::async_trait]
pub trait QuestionnaireStore: Send + Sync {
    /// List every live questionnaire that has a response deadline.
    ///
    /// Includes questionnaires whose deadline already passed; the scheduler
    /// drops lead times that are no longer in the future, so stale rows
    /// simply produce no jobs.
    async fn list_questionnaires_needing_reminders(
        &self,
    ) -> anyhow::Result<Vec<ReminderCandidate>>;

    /// Fetch the current state of one questionnaire, or `None` if it was
    /// deleted after the reminder was scheduled.
    async fn get_questionnaire_detail(
        &self,
        questionnaire_id: i32,
    ) -> anyhow::Result<Option<QuestionnaireDetail>>;
}

/// Mock store for development and testing.
///
/// Serves canned questionnaire state without a database.
#[derive(Debug, Clone, Default)]
pub struct MockQuestionnaireStore {
    candidates: Vec<ReminderCandidate>,
    details: HashMap<i32, QuestionnaireDetail>,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockQuestionnaireStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock store that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Add candidates returned by the bootstrap listing.
    pub fn with_candidates(mut self, candidates: Vec<ReminderCandidate>) -> Self {
        self.candidates.extend(candidates);
        self
    }

    /// Add a questionnaire detail, keyed by its id.
    pub fn with_detail(mut self, detail: QuestionnaireDetail) -> Self {
        self.details.insert(detail.questionnaire_id, detail);
        self
    }
}

#[async_trait::async_trait]
impl QuestionnaireStore for MockQuestionnaireStore {
    async fn list_questionnaires_needing_reminders(
        &self,
    ) -> anyhow::Result<Vec<ReminderCandidate>> {
        if self.simulate_failure {
            tracing::warn!("Mock questionnaire store simulating listing failure");
            anyhow::bail!("simulated store failure");
        }

        Ok(self.candidates.clone())
    }

    async fn get_questionnaire_detail(
        &self,
        questionnaire_id: i32,
    ) -> anyhow::Result<Option<QuestionnaireDetail>> {
        if self.simulate_failure {
            tracing::warn!(
                questionnaire_id = %questionnaire_id,
                "Mock questionnaire store simulating detail failure"
            );
            anyhow::bail!("simulated store failure");
        }

        Ok(self.details.get(&questionnaire_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_mock_store_lists_candidates() {
        let candidate = ReminderCandidate {
            questionnaire_id: 1,
            response_due_at: Utc::now() + Duration::days(2),
        };
        let store = MockQuestionnaireStore::new().with_candidates(vec![candidate.clone()]);

        let listed = store.list_questionnaires_needing_reminders().await.unwrap();
        assert_eq!(listed, vec![candidate]);
    }

    #[tokio::test]
    async fn test_mock_store_detail_lookup() {
        let detail = QuestionnaireDetail {
            questionnaire_id: 3,
            title: "Team survey".to_string(),
            description: String::new(),
            administrators: vec!["admin".to_string()],
            response_due_at: Some(Utc::now() + Duration::hours(1)),
            targets: vec![],
            respondent_ids: vec![],
        };
        let store = MockQuestionnaireStore::new().with_detail(detail.clone());

        assert_eq!(
            store.get_questionnaire_detail(3).await.unwrap(),
            Some(detail)
        );
        assert_eq!(store.get_questionnaire_detail(4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_store_failure() {
        let store = MockQuestionnaireStore::failing();

        assert!(store.list_questionnaires_needing_reminders().await.is_err());
        assert!(store.get_questionnaire_detail(1).await.is_err());
    }
}
