//! Recurring-job scheduling
//!
//! Computes the delay to a configured start-of-day time ("now" or a 12-hour
//! clock string such as `12:00AM`), fires the batch job once when it elapses,
//! and thereafter on a fixed interval until the shutdown signal arrives.
//!
//! A single loop owns the whole firing protocol: initial-delay wait, first
//! invocation, then the tick/invoke cycle. The first run and the periodic
//! runs are never scheduled concurrently, so a very short interval cannot
//! produce a duplicate dispatch. An in-flight run is awaited, never
//! interrupted; cancellation only prevents the next one from starting.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

/// Schedule configuration problem, fatal before the scheduler is armed
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    EmptyStartTime,
    InvalidStartTime(String),
    InvalidInterval(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::EmptyStartTime => write!(f, "start time is empty"),
            ScheduleError::InvalidStartTime(raw) => {
                write!(f, "invalid start time {:?} (expected \"now\" or e.g. \"12:00AM\")", raw)
            }
            ScheduleError::InvalidInterval(raw) => {
                write!(f, "invalid interval {:?} (expected e.g. \"24h\", \"30m\", \"10s\")", raw)
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// When the first run fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartAt {
    /// Fire immediately
    Now,
    /// Fire at the next occurrence of this local time of day
    Clock(NaiveTime),
}

impl StartAt {
    /// Parse the configured start time
    ///
    /// An empty string is a configuration error, `"now"` fires immediately,
    /// anything else must be a 12-hour kitchen-clock string.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        if raw.is_empty() {
            return Err(ScheduleError::EmptyStartTime);
        }
        if raw == "now" {
            return Ok(StartAt::Now);
        }
        NaiveTime::parse_from_str(raw, "%I:%M%p")
            .map(StartAt::Clock)
            .map_err(|_| ScheduleError::InvalidStartTime(raw.to_string()))
    }

    /// Delay from `now` until the first run
    ///
    /// If the configured time of day has already passed today the target
    /// rolls over to the next day, so the result is always in `[0, 24h)`
    /// relative to a whole-day schedule.
    pub fn delay_from(&self, now: NaiveDateTime) -> Duration {
        match self {
            StartAt::Now => Duration::ZERO,
            StartAt::Clock(clock) => {
                let mut next = now.date().and_time(*clock);
                if next < now {
                    next += ChronoDuration::days(1);
                }
                (next - now).to_std().unwrap_or(Duration::ZERO)
            }
        }
    }
}

/// Delay from the local wall clock until the next occurrence of `clock`
pub fn duration_to_next_time(clock: &str) -> Result<Duration, ScheduleError> {
    Ok(StartAt::parse(clock)?.delay_from(Local::now().naive_local()))
}

/// Parse an interval string with an `s`/`m`/`h` unit suffix
///
/// A zero interval is rejected; the ticker would spin.
pub fn parse_interval(raw: &str) -> Result<Duration, ScheduleError> {
    let invalid = || ScheduleError::InvalidInterval(raw.to_string());

    let trimmed = raw.trim();
    let unit = trimmed.chars().next_back().ok_or_else(invalid)?;
    let value: u64 = trimmed[..trimmed.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if value == 0 {
        return Err(invalid());
    }

    let seconds = match unit {
        's' => value,
        'm' => value * 60,
        'h' => value * 3600,
        _ => return Err(invalid()),
    };
    Ok(Duration::from_secs(seconds))
}

/// Validated schedule parameters
///
/// Validation happens once, here; the scheduler itself can no longer fail
/// on configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    pub start_at: StartAt,
    pub interval: Duration,
}

impl ScheduleConfig {
    pub fn parse(start_at: &str, interval: &str) -> Result<Self, ScheduleError> {
        Ok(Self {
            start_at: StartAt::parse(start_at)?,
            interval: parse_interval(interval)?,
        })
    }
}

/// The unit of work the scheduler fires on every tick
#[async_trait]
pub trait BatchJob: Send + Sync {
    async fn run_once(&self);
}

/// Fires a [`BatchJob`] at the configured start time and interval
pub struct Scheduler {
    config: ScheduleConfig,
    job: Arc<dyn BatchJob>,
}

impl Scheduler {
    pub fn new(config: ScheduleConfig, job: Arc<dyn BatchJob>) -> Self {
        Self { config, job }
    }

    /// Run until the shutdown signal arrives
    ///
    /// The loop waits out the initial delay, fires the first run, then
    /// alternates between interval ticks and runs. Closing or signalling
    /// `shutdown` stops the loop after any in-flight run completes.
    pub async fn run(self, mut shutdown: mpsc::Receiver<()>) {
        let delay = self.config.start_at.delay_from(Local::now().naive_local());
        log::info!(
            "worker armed: first run in {:?}, then every {:?}",
            delay,
            self.config.interval
        );

        tokio::select! {
            _ = time::sleep(delay) => {}
            _ = shutdown.recv() => {
                log::info!("worker cancelled before first run");
                return;
            }
        }

        let mut ticker = time::interval(self.config.interval);
        ticker.tick().await; // the first tick completes immediately

        loop {
            log::info!("start calculating");
            self.job.run_once().await;

            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => {
                    log::info!("worker stopped");
                    return;
                }
            }
        }
    }
}
