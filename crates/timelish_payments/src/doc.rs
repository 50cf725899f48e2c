// --- File: crates/timelish_payments/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{ProcessorEvent, ProcessorEventData, ProcessorIntentObject};

#[utoipa::path(
    post,
    path = "/payments/webhook", // Path relative to /api
    request_body = ProcessorEvent,
    responses(
        (status = 200, description = "Webhook received and acknowledged"),
        (status = 400, description = "Bad Request (invalid payload)"),
        (status = 401, description = "Invalid signature"),
        (status = 500, description = "Internal Server Error processing webhook")
    ),
    tag = "Payments Webhooks"
)]
fn doc_processor_webhook_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_processor_webhook_handler),
    components(schemas(ProcessorEvent, ProcessorEventData, ProcessorIntentObject)),
    tags(
        (name = "Payments Webhooks", description = "Payment processor server-to-server webhooks")
    )
)]
pub struct PaymentsApiDoc;
