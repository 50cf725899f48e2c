// --- File: crates/timelish_dispatch/src/sms.rs ---
use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use timelish_common::services::{BoxedError, NotificationResult, NotificationService};
use timelish_common::HTTP_CLIENT;
use timelish_config::{AppConfig, SmsConfig};

/// SMS-gateway-specific error types.
#[derive(Error, Debug)]
pub enum SmsError {
    /// Error occurred during a gateway API request
    #[error("SMS gateway request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the gateway API
    #[error("SMS gateway returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or incomplete SMS configuration
    #[error("SMS configuration missing or incomplete")]
    ConfigError,
}

/// Notification service sending SMS through a REST gateway.
/// The secret auth token is loaded from the `SMS_AUTH_TOKEN` environment
/// variable.
pub struct SmsNotificationService {
    config: Arc<AppConfig>,
}

impl SmsNotificationService {
    /// Create a new SMS notification service
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    fn sms_config(&self) -> Result<&SmsConfig, SmsError> {
        self.config.sms.as_ref().ok_or(SmsError::ConfigError)
    }

    async fn send(&self, to: &str, body: &str) -> Result<NotificationResult, SmsError> {
        let sms_config = self.sms_config()?;
        let auth_token = env::var("SMS_AUTH_TOKEN").map_err(|_| SmsError::ConfigError)?;

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            sms_config.gateway_url, sms_config.account
        );

        let params = [
            ("To", to),
            ("From", sms_config.sender.as_str()),
            ("Body", body),
        ];
        info!("Sending SMS to {}", to);
        let response = HTTP_CLIENT
            .post(&url)
            .basic_auth(&sms_config.account, Some(&auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let response_body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            // Bubble up the gateway JSON error so it can be debugged
            error!("SMS gateway returned {}: {}", status, response_body);
            return Err(SmsError::ApiError {
                status_code: status.as_u16(),
                message: response_body,
            });
        }

        let message_id = serde_json::from_str::<serde_json::Value>(&response_body)
            .ok()
            .and_then(|v| v.get("sid").and_then(|s| s.as_str()).map(String::from))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(NotificationResult {
            id: message_id,
            status: "sent".to_string(),
        })
    }
}

impl NotificationService for SmsNotificationService {
    type Error = BoxedError;

    fn send_sms(
        &self,
        to: &str,
        body: &str,
    ) -> Pin<Box<dyn Future<Output = Result<NotificationResult, Self::Error>> + Send + '_>> {
        // Clone the values to avoid lifetime issues
        let to = to.to_string();
        let body = body.to_string();

        Box::pin(async move {
            self.send(&to, &body)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}
