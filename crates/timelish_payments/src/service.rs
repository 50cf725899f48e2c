// --- File: crates/timelish_payments/src/service.rs ---
use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::PaymentError;
use timelish_common::services::{
    BoxedError, PaymentIntentResult, PaymentService, RefundResult,
};
use timelish_common::HTTP_CLIENT;
use timelish_config::{AppConfig, PaymentsConfig};

/// Payment service implementation speaking form-encoded REST to the
/// configured processor. The secret API key is loaded from the
/// `PROCESSOR_SECRET_KEY` environment variable.
pub struct RestPaymentService {
    config: Arc<AppConfig>,
}

impl RestPaymentService {
    /// Create a new REST payment service
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    fn payments_config(&self) -> Result<&PaymentsConfig, PaymentError> {
        self.config.payments.as_ref().ok_or(PaymentError::ConfigError)
    }

    /// POSTs a form to the processor and returns the raw response body,
    /// unwrapping the processor's `{"error": {"message": ...}}` envelope on
    /// non-success statuses.
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<String, PaymentError> {
        let secret_key =
            env::var("PROCESSOR_SECRET_KEY").map_err(|_| PaymentError::ConfigError)?;

        let response = HTTP_CLIENT
            .post(url)
            .basic_auth(secret_key, None::<&str>)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            Ok(body_text)
        } else {
            let error_message = match serde_json::from_str::<serde_json::Value>(&body_text) {
                Ok(json_body) => json_body
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or(&body_text)
                    .to_string(),
                Err(_) => body_text,
            };
            error!(
                "Processor API request to {} failed: {} - {}",
                url, status, error_message
            );
            Err(PaymentError::ApiError {
                status_code: status.as_u16(),
                message: error_message,
            })
        }
    }
}

// Response FROM the processor API for intent operations.
#[derive(serde::Deserialize, Debug)]
struct ProcessorIntentApiResponse {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub client_secret: Option<String>,
}

// Response FROM the processor API for refund operations.
#[derive(serde::Deserialize, Debug)]
struct ProcessorRefundApiResponse {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

fn boxed(err: PaymentError) -> BoxedError {
    BoxedError(Box::new(err))
}

impl PaymentService for RestPaymentService {
    type Error = BoxedError;

    fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        description: Option<&str>,
        metadata: Option<serde_json::Value>,
    ) -> Pin<Box<dyn Future<Output = Result<PaymentIntentResult, Self::Error>> + Send + '_>> {
        // Clone the values to avoid lifetime issues
        let currency = currency.to_string();
        let description = description.map(|s| s.to_string());

        Box::pin(async move {
            let payments_config = self.payments_config().map_err(boxed)?;

            let mut form_body: Vec<(String, String)> = vec![
                ("amount".to_string(), amount.to_string()),
                ("currency".to_string(), currency.to_lowercase()),
            ];
            if let Some(description) = description.or_else(|| payments_config.statement_label.clone())
            {
                form_body.push(("description".to_string(), description));
            }
            if let Some(serde_json::Value::Object(map)) = metadata {
                for (key, value) in map {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    form_body.push((format!("metadata[{}]", key), value));
                }
            }

            let url = format!("{}/payment_intents", payments_config.processor_url);
            info!("[Payments] Creating payment intent for {} {}", amount, currency);
            let body = self.post_form(&url, &form_body).await.map_err(boxed)?;

            let response: ProcessorIntentApiResponse =
                serde_json::from_str(&body).map_err(|e| boxed(PaymentError::ParseError(e)))?;
            Ok(PaymentIntentResult {
                id: response.id,
                status: response.status,
                amount: response.amount,
                currency: response.currency,
                client_secret: response.client_secret,
            })
        })
    }

    fn cancel_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<PaymentIntentResult, Self::Error>> + Send + '_>> {
        let payment_intent_id = payment_intent_id.to_string();

        Box::pin(async move {
            let payments_config = self.payments_config().map_err(boxed)?;
            let url = format!(
                "{}/payment_intents/{}/cancel",
                payments_config.processor_url, payment_intent_id
            );
            info!("[Payments] Cancelling payment intent {}", payment_intent_id);
            let body = self.post_form(&url, &[]).await.map_err(boxed)?;

            let response: ProcessorIntentApiResponse =
                serde_json::from_str(&body).map_err(|e| boxed(PaymentError::ParseError(e)))?;
            Ok(PaymentIntentResult {
                id: response.id,
                status: response.status,
                amount: response.amount,
                currency: response.currency,
                client_secret: response.client_secret,
            })
        })
    }

    fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Option<i64>,
        reason: Option<&str>,
    ) -> Pin<Box<dyn Future<Output = Result<RefundResult, Self::Error>> + Send + '_>> {
        let payment_intent_id = payment_intent_id.to_string();
        let reason = reason.map(|s| s.to_string());

        Box::pin(async move {
            let payments_config = self.payments_config().map_err(boxed)?;

            let mut form_body: Vec<(String, String)> = vec![(
                "payment_intent".to_string(),
                payment_intent_id.clone(),
            )];
            if let Some(amount) = amount {
                form_body.push(("amount".to_string(), amount.to_string()));
            }
            if let Some(reason) = reason {
                form_body.push(("reason".to_string(), reason));
            }

            let url = format!("{}/refunds", payments_config.processor_url);
            info!(
                "[Payments] Creating refund for intent {} (amount: {:?})",
                payment_intent_id, amount
            );
            let body = self.post_form(&url, &form_body).await.map_err(boxed)?;

            let response: ProcessorRefundApiResponse =
                serde_json::from_str(&body).map_err(|e| boxed(PaymentError::ParseError(e)))?;
            Ok(RefundResult {
                id: response.id,
                status: response.status,
                amount: response.amount,
                currency: response.currency,
            })
        })
    }
}
