//! Domain models for the survey reminder service.

pub mod questionnaire;
pub mod reminder;

pub use questionnaire::{QuestionnaireDetail, QuestionnaireTarget, ReminderCandidate};
pub use reminder::{DelayedJob, JobAction, LeadTime, LEAD_TIMES};
