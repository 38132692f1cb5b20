//! Builds and sends the "deadline approaching" reminder message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use domain::models::QuestionnaireDetail;
use domain::services::{MessageDispatch, QuestionnaireStore};

/// Sends one reminder for a questionnaire.
///
/// Questionnaire state is re-read at fire time rather than captured when
/// the job was scheduled, so deletions, deadline edits, and new responses
/// that happened in between are honored. A questionnaire that no longer
/// needs the reminder is skipped without error.
pub struct ReminderNotifier {
    store: Arc<dyn QuestionnaireStore>,
    dispatch: Arc<dyn MessageDispatch>,
    base_url: String,
}

impl ReminderNotifier {
    pub fn new(
        store: Arc<dyn QuestionnaireStore>,
        dispatch: Arc<dyn MessageDispatch>,
        base_url: String,
    ) -> Self {
        Self {
            store,
            dispatch,
            base_url,
        }
    }

    /// Send the reminder for `questionnaire_id`, labelled with the time
    /// remaining until the deadline.
    pub async fn send_reminder(
        &self,
        questionnaire_id: i32,
        remaining_label: &str,
    ) -> anyhow::Result<()> {
        let detail = match self.store.get_questionnaire_detail(questionnaire_id).await? {
            Some(detail) => detail,
            None => {
                warn!(
                    questionnaire_id = questionnaire_id,
                    "Questionnaire disappeared before its reminder fired, skipping"
                );
                return Ok(());
            }
        };

        let due = match detail.response_due_at {
            Some(due) => due,
            None => {
                debug!(
                    questionnaire_id = questionnaire_id,
                    "Deadline was removed, skipping reminder"
                );
                return Ok(());
            }
        };

        let outstanding = detail.outstanding_targets();
        if outstanding.is_empty() {
            debug!(
                questionnaire_id = questionnaire_id,
                "Everyone already responded, skipping reminder"
            );
            return Ok(());
        }

        let message = self.render_message(&detail, &outstanding, remaining_label, due);
        self.dispatch.post_message(&message).await?;

        info!(
            questionnaire_id = questionnaire_id,
            remaining = remaining_label,
            targets = outstanding.len(),
            "Reminder sent"
        );
        Ok(())
    }

    fn render_message(
        &self,
        detail: &QuestionnaireDetail,
        outstanding: &[&str],
        remaining_label: &str,
        due: DateTime<Utc>,
    ) -> String {
        let url = format!("{}/questionnaires/{}", self.base_url, detail.questionnaire_id);
        let administrators = detail.administrators.join(", ");
        let mentions = outstanding
            .iter()
            .map(|user| format!("@{}", user))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "### Survey [{}]({}) is due soon!\n\
             (**{}** remaining)\n\n\
             #### Administrators\n{}\n\n\
             #### Description\n{}\n\n\
             #### Deadline\n{}\n\n\
             #### Waiting on\n{}\n\n\
             Respond here: {}",
            detail.title,
            url,
            remaining_label,
            administrators,
            detail.description,
            due.format("%Y/%m/%d %H:%M"),
            mentions,
            url,
        )
    }
}
