use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use domain::services::QuestionnaireStore;
use persistence::repositories::QuestionnaireRepository;
use survey_reminder_service::config::Config;
use survey_reminder_service::jobs::{JobQueue, ReminderScheduler, ReminderWorker};
use survey_reminder_service::logging;
use survey_reminder_service::services::{build_dispatch, ReminderNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!(
        "Starting survey reminder service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    // Wire the reminder pipeline
    let store: Arc<dyn QuestionnaireStore> = Arc::new(QuestionnaireRepository::new(pool));
    let dispatch = build_dispatch(&config.messaging)?;
    let notifier = Arc::new(ReminderNotifier::new(
        Arc::clone(&store),
        dispatch,
        config.messaging.base_url.clone(),
    ));

    let queue = Arc::new(JobQueue::new());
    let scheduler =
        ReminderScheduler::new(Arc::clone(&queue), Arc::clone(&store), Arc::clone(&notifier));

    // Seed the queue from current questionnaire state; a store failure
    // here aborts startup.
    scheduler.bootstrap().await?;

    let mut worker = ReminderWorker::new(
        Arc::clone(&queue),
        Duration::from_secs(config.reminder.poll_interval_secs),
    );
    worker.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    worker.shutdown();
    worker
        .wait_for_shutdown(Duration::from_secs(config.reminder.shutdown_grace_secs))
        .await;

    Ok(())
}
