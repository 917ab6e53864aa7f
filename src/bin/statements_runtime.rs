//! Statements Runtime - periodic statement worker
//!
//! Scans the statements directory on a schedule, aggregates each account's
//! transactions into a monthly summary, and mails every account its report
//! through a SendGrid dynamic template.
//!
//! Usage:
//!   cargo run --release --bin statements_runtime
//!
//! Environment variables:
//!   STATEMENTS_DIR       - directory of per-account CSV files (default: statements)
//!   WORKER_START_AT      - "now" or a 12-hour clock string, e.g. 12:00AM (default: now)
//!   WORKER_INTERVAL      - tick interval, e.g. 24h / 30m / 10s (default: 24h)
//!   SENDGRID_API_KEY     - mail API key (required)
//!   SENDGRID_TEMPLATE_ID - dynamic template id (required)
//!   FROM_EMAIL           - sender address (default: statements@localhost)

use dotenv::dotenv;
use log::{error, info};
use statements::config::Config;
use statements::pipeline::notifier::SendGridNotifier;
use statements::pipeline::runner::StatementRunner;
use statements::pipeline::scheduler::{ScheduleConfig, Scheduler};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    info!("starting statements worker");
    info!("   statements dir: {}", config.statements_dir);
    info!("   start at: {}", config.start_at);
    info!("   interval: {}", config.interval);

    // Fail fast on schedule problems; the worker is never armed
    let schedule = match ScheduleConfig::parse(&config.start_at, &config.interval) {
        Ok(schedule) => schedule,
        Err(e) => {
            error!("configuration error: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let notifier = Arc::new(SendGridNotifier::new(
        config.sendgrid_api_key,
        config.template_id,
        config.from_email,
    )?);
    let runner = Arc::new(StatementRunner::new(config.statements_dir, notifier));
    let scheduler = Scheduler::new(schedule, runner);

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    let worker = tokio::spawn(scheduler.run(shutdown_rx));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received interrupt, stopping worker"),
        Err(e) => error!("failed to listen for interrupt: {}", e),
    }

    // Cooperative shutdown: signal the scheduler and wait for it to finish
    // its in-flight run before the process exits
    let _ = shutdown_tx.send(()).await;
    let _ = worker.await;

    info!("shutting down");
    Ok(())
}
