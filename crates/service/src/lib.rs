//! Survey reminder service.
//!
//! Watches questionnaire deadlines and posts "deadline approaching"
//! messages to the chat platform at fixed lead times. The moving parts:
//!
//! - [`jobs::JobQueue`]: time-ordered queue of pending reminder jobs
//! - [`jobs::ReminderScheduler`]: turns deadlines into queued jobs
//! - [`jobs::ReminderWorker`]: background loop that fires due jobs
//! - [`services::ReminderNotifier`]: renders and sends one reminder

pub mod config;
pub mod jobs;
pub mod logging;
pub mod services;
