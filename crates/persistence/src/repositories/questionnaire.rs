//! Questionnaire repository for database operations.
//!
//! The reminder subsystem never writes questionnaire state; every method
//! here is a read.

use sqlx::PgPool;

use domain::models::{QuestionnaireDetail, ReminderCandidate};
use domain::services::QuestionnaireStore;

use crate::entities::{QuestionnaireEntity, QuestionnaireTargetEntity, ReminderCandidateEntity};

/// Repository for questionnaire-related database operations.
#[derive(Clone)]
pub struct QuestionnaireRepository {
    pool: PgPool,
}

impl QuestionnaireRepository {
    /// Creates a new QuestionnaireRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List live questionnaires carrying a response deadline.
    ///
    /// Past deadlines are deliberately not filtered out here; the scheduler
    /// decides which lead times are still worth queueing.
    pub async fn list_reminder_candidates(
        &self,
    ) -> Result<Vec<ReminderCandidateEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReminderCandidateEntity>(
            r#"
            SELECT id, response_due_at FROM questionnaires
            WHERE deleted_at IS NULL AND response_due_at IS NOT NULL
            ORDER BY response_due_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Find a live questionnaire by id.
    pub async fn find_by_id(
        &self,
        questionnaire_id: i32,
    ) -> Result<Option<QuestionnaireEntity>, sqlx::Error> {
        sqlx::query_as::<_, QuestionnaireEntity>(
            r#"
            SELECT * FROM questionnaires
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(questionnaire_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List administrator user ids for a questionnaire.
    pub async fn list_administrators(
        &self,
        questionnaire_id: i32,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT user_id FROM questionnaire_administrators
            WHERE questionnaire_id = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    /// List targets for a questionnaire in assignment order.
    pub async fn list_targets(
        &self,
        questionnaire_id: i32,
    ) -> Result<Vec<QuestionnaireTargetEntity>, sqlx::Error> {
        sqlx::query_as::<_, QuestionnaireTargetEntity>(
            r#"
            SELECT * FROM questionnaire_targets
            WHERE questionnaire_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await
    }

    /// List user ids with a live, submitted response for a questionnaire.
    pub async fn list_respondent_ids(
        &self,
        questionnaire_id: i32,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT user_id FROM questionnaire_responses
            WHERE questionnaire_id = $1
              AND submitted_at IS NOT NULL
              AND deleted_at IS NULL
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }
}

#[async_trait::async_trait]
impl QuestionnaireStore for QuestionnaireRepository {
    async fn list_questionnaires_needing_reminders(
        &self,
    ) -> anyhow::Result<Vec<ReminderCandidate>> {
        let entities = self.list_reminder_candidates().await?;
        Ok(entities.into_iter().map(ReminderCandidate::from).collect())
    }

    async fn get_questionnaire_detail(
        &self,
        questionnaire_id: i32,
    ) -> anyhow::Result<Option<QuestionnaireDetail>> {
        let entity = match self.find_by_id(questionnaire_id).await? {
            Some(entity) => entity,
            None => return Ok(None),
        };

        let administrators = self.list_administrators(questionnaire_id).await?;
        let targets = self.list_targets(questionnaire_id).await?;
        let respondent_ids = self.list_respondent_ids(questionnaire_id).await?;

        Ok(Some(QuestionnaireDetail {
            questionnaire_id: entity.id,
            title: entity.title,
            description: entity.description,
            administrators,
            response_due_at: entity.response_due_at,
            targets: targets.into_iter().map(Into::into).collect(),
            respondent_ids,
        }))
    }
}
