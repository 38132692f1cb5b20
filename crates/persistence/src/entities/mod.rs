//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod questionnaire;

pub use questionnaire::{QuestionnaireEntity, QuestionnaireTargetEntity, ReminderCandidateEntity};
