//! Persistence layer for the survey reminder service.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - The questionnaire repository backing the domain store trait

pub mod db;
pub mod entities;
pub mod repositories;
