//! Questionnaire entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{QuestionnaireTarget, ReminderCandidate};

/// Database row mapping for the questionnaires table.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionnaireEntity {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub response_due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Projection of the bootstrap listing: one live questionnaire with a
/// deadline. `response_due_at` is non-optional because the query filters
/// on it.
#[derive(Debug, Clone, FromRow)]
pub struct ReminderCandidateEntity {
    pub id: i32,
    pub response_due_at: DateTime<Utc>,
}

impl From<ReminderCandidateEntity> for ReminderCandidate {
    fn from(entity: ReminderCandidateEntity) -> Self {
        Self {
            questionnaire_id: entity.id,
            response_due_at: entity.response_due_at,
        }
    }
}

/// Database row mapping for the questionnaire_targets table.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionnaireTargetEntity {
    pub id: i64,
    pub questionnaire_id: i32,
    pub user_id: String,
    pub is_canceled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<QuestionnaireTargetEntity> for QuestionnaireTarget {
    fn from(entity: QuestionnaireTargetEntity) -> Self {
        Self {
            user_id: entity.user_id,
            is_canceled: entity.is_canceled,
        }
    }
}
