//! Domain layer for the survey reminder service.
//!
//! This crate contains:
//! - Read models for questionnaire state (candidates, detail, targets)
//! - The delayed-job value type and the reminder lead-time table
//! - Service traits for the store and messaging seams, with mocks

pub mod models;
pub mod services;
