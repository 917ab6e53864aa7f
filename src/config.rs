//! Runtime configuration from environment variables

use std::env;

/// Configuration loaded from environment variables
///
/// Schedule values are kept as raw strings here; they are validated once,
/// when the `ScheduleConfig` is constructed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the per-account statement CSV files
    pub statements_dir: String,
    /// `"now"` or a 12-hour clock string such as `12:00AM`
    pub start_at: String,
    /// Tick interval, e.g. `24h`, `30m`, `10s`
    pub interval: String,
    /// SendGrid API key
    pub sendgrid_api_key: String,
    /// SendGrid dynamic template id
    pub template_id: String,
    /// Sender address for the notification mails
    pub from_email: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `STATEMENTS_DIR` (default: statements)
    /// - `WORKER_START_AT` (default: now)
    /// - `WORKER_INTERVAL` (default: 24h)
    /// - `SENDGRID_API_KEY` (required)
    /// - `SENDGRID_TEMPLATE_ID` (required)
    /// - `FROM_EMAIL` (default: statements@localhost)
    pub fn from_env() -> Self {
        Self {
            statements_dir: env::var("STATEMENTS_DIR")
                .unwrap_or_else(|_| "statements".to_string()),

            start_at: env::var("WORKER_START_AT").unwrap_or_else(|_| "now".to_string()),

            interval: env::var("WORKER_INTERVAL").unwrap_or_else(|_| "24h".to_string()),

            sendgrid_api_key: env::var("SENDGRID_API_KEY")
                .expect("SENDGRID_API_KEY must be set in .env file"),

            template_id: env::var("SENDGRID_TEMPLATE_ID")
                .expect("SENDGRID_TEMPLATE_ID must be set in .env file"),

            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "statements@localhost".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_values_override_defaults() {
        env::set_var("STATEMENTS_DIR", "/tmp/statements");
        env::set_var("WORKER_START_AT", "12:00AM");
        env::set_var("WORKER_INTERVAL", "30m");
        env::set_var("SENDGRID_API_KEY", "key");
        env::set_var("SENDGRID_TEMPLATE_ID", "template");
        env::remove_var("FROM_EMAIL");

        let config = Config::from_env();

        assert_eq!(config.statements_dir, "/tmp/statements");
        assert_eq!(config.start_at, "12:00AM");
        assert_eq!(config.interval, "30m");
        assert_eq!(config.sendgrid_api_key, "key");
        assert_eq!(config.template_id, "template");
        assert_eq!(config.from_email, "statements@localhost");

        // Cleanup
        env::remove_var("STATEMENTS_DIR");
        env::remove_var("WORKER_START_AT");
        env::remove_var("WORKER_INTERVAL");
        env::remove_var("SENDGRID_API_KEY");
        env::remove_var("SENDGRID_TEMPLATE_ID");
    }
}
