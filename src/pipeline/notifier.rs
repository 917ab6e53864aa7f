//! Outbound notification dispatch
//!
//! The batch runner only depends on the [`Notifier`] trait; the production
//! implementation posts to the SendGrid v3 mail API with a dynamic template.
//! A failed dispatch is recoverable at the runner level and is never retried
//! here.

use super::report::TemplateData;
use async_trait::async_trait;
use std::time::Duration;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification dispatch failure
#[derive(Debug)]
pub struct NotifyError {
    reason: String,
}

impl NotifyError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification failed: {}", self.reason)
    }
}

impl std::error::Error for NotifyError {}

/// Contract for dispatching one account's report
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, account_id: &str, report: &TemplateData) -> Result<(), NotifyError>;
}

/// SendGrid dynamic-template mail notifier
pub struct SendGridNotifier {
    client: reqwest::Client,
    api_key: String,
    template_id: String,
    from_email: String,
}

impl SendGridNotifier {
    pub fn new(
        api_key: impl Into<String>,
        template_id: impl Into<String>,
        from_email: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::new(format!("cannot build http client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            template_id: template_id.into(),
            from_email: from_email.into(),
        })
    }

    /// Request body for the v3 mail/send endpoint
    fn payload(&self, account_id: &str, report: &TemplateData) -> serde_json::Value {
        serde_json::json!({
            "personalizations": [
                {
                    "to": [{ "email": account_id }],
                    "dynamic_template_data": report,
                }
            ],
            "from": { "email": self.from_email },
            "template_id": self.template_id,
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send(&self, account_id: &str, report: &TemplateData) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&self.payload(account_id, report))
            .send()
            .await
            .map_err(|e| NotifyError::new(format!("request error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::new(format!("mail API returned {}", status)));
        }
        log::debug!("notification accepted for {} ({})", account_id, status);
        Ok(())
    }
}
