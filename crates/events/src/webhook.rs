//! Single-attempt webhook delivery.
//!
//! [`WebhookDelivery`] POSTs an outbox payload to an automation's target URL
//! and reports timing and status either way. It never retries on its own:
//! the dispatcher decides whether a failure gets another attempt by
//! rescheduling the outbox row.

use std::time::{Duration, Instant};

use reqwest::header;

use hiperflow_core::signing::sign_payload;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the event type, e.g. `saleflow.stage.changed`.
pub const EVENT_HEADER: &str = "x-hiperflow-event";

/// Header carrying the hex HMAC-SHA256 of the request body. Only present
/// when the automation has a signing secret configured.
pub const SIGNATURE_HEADER: &str = "x-hiperflow-signature";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
///
/// Both variants carry how long the attempt took, so failed attempts get the
/// same latency bookkeeping as successful ones.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {source}")]
    Request {
        source: reqwest::Error,
        response_time_ms: i32,
    },

    /// The remote server answered with a non-2xx status code.
    #[error("Webhook returned HTTP {status}")]
    HttpStatus { status: u16, response_time_ms: i32 },
}

impl WebhookError {
    /// HTTP status of the failed attempt, if the server answered at all.
    pub fn response_status(&self) -> Option<i16> {
        match self {
            Self::Request { .. } => None,
            Self::HttpStatus { status, .. } => Some(*status as i16),
        }
    }

    /// How long the attempt took before failing.
    pub fn response_time_ms(&self) -> i32 {
        match self {
            Self::Request {
                response_time_ms, ..
            }
            | Self::HttpStatus {
                response_time_ms, ..
            } => *response_time_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Response metadata of a successful delivery.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryReceipt {
    pub response_status: i16,
    pub response_time_ms: i32,
}

/// Delivers outbox payloads to automation endpoints.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Execute one POST attempt against `url`.
    ///
    /// The body is the payload's canonical JSON serialization; when `secret`
    /// is set, the signature header is the HMAC of exactly those bytes.
    pub async fn deliver(
        &self,
        url: &str,
        secret: Option<&str>,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<DeliveryReceipt, WebhookError> {
        let body = payload.to_string();
        let signature = secret.map(|s| sign_payload(s, body.as_bytes()));

        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(EVENT_HEADER, event_type)
            .body(body);
        if let Some(signature) = signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }

        let started = Instant::now();
        let result = request.send().await;
        let response_time_ms = elapsed_ms(started);

        let response = result.map_err(|source| WebhookError::Request {
            source,
            response_time_ms,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::HttpStatus {
                status: status.as_u16(),
                response_time_ms,
            });
        }
        Ok(DeliveryReceipt {
            response_status: status.as_u16() as i16,
            response_time_ms,
        })
    }
}

impl Default for WebhookDelivery {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_ms(started: Instant) -> i32 {
    i32::try_from(started.elapsed().as_millis()).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _delivery = WebhookDelivery::new();
    }

    #[test]
    fn default_does_not_panic() {
        let _delivery = WebhookDelivery::default();
    }

    #[test]
    fn webhook_error_display_http_status() {
        let err = WebhookError::HttpStatus {
            status: 502,
            response_time_ms: 31,
        };
        assert_eq!(err.to_string(), "Webhook returned HTTP 502");
        assert_eq!(err.response_status(), Some(502));
        assert_eq!(err.response_time_ms(), 31);
    }

    #[test]
    fn webhook_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = WebhookError::Request {
            source: req_err,
            response_time_ms: 11,
        };
        assert!(err.to_string().contains("HTTP request failed"));
        assert_eq!(err.response_status(), None);
        assert_eq!(err.response_time_ms(), 11);
    }
}
