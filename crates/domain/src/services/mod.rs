//! Domain service traits for the survey reminder service.
//!
//! These seams keep the scheduling logic independent of the database and
//! the chat platform; each trait ships with a mock used in tests.

pub mod dispatch;
pub mod store;

pub use dispatch::{MessageDispatch, MockMessageDispatch};
pub use store::{MockQuestionnaireStore, QuestionnaireStore};
