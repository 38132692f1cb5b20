//! Repository implementations for database operations.

pub mod questionnaire;

pub use questionnaire::QuestionnaireRepository;
