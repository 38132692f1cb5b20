//! External service integrations.

pub mod messaging;
pub mod notifier;

pub use messaging::{build_dispatch, ConsoleMessageDispatch, WebhookMessageDispatch};
pub use notifier::ReminderNotifier;
