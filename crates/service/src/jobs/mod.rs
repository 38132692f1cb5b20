//! Delayed-job queue, reminder scheduling, and the background worker.

pub mod queue;
pub mod scheduler;
pub mod worker;

pub use queue::JobQueue;
pub use scheduler::ReminderScheduler;
pub use worker::ReminderWorker;
