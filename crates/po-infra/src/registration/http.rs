//! Partner registration over HTTP.
//!
//! 通过 HTTP 调用合作伙伴注册接口。只有传输层失败会自动重试，字段校验
//! 失败与业务错误直接返回给调用方。

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use po_core::ports::RegistrationPort;
use po_core::wizard::{FieldErrors, RegistrationError, RegistrationPayload, RegistrationReceipt};
use rand::Rng;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

const REGISTER_PATH: &str = "/auth/register-partner";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRegistrationConfig {
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Total attempts, including the first. Zero behaves as one.
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
}

pub struct HttpRegistrationClient {
    client: reqwest::Client,
    endpoint: String,
    max_attempts: u32,
    retry_base_delay: Duration,
}

/// Error body shapes the backend answers with.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    errors: Vec<FieldErrors>,
    message: Option<Value>,
}

impl HttpRegistrationClient {
    pub fn new(config: HttpRegistrationConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("build registration HTTP client failed")?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), REGISTER_PATH),
            max_attempts: config.max_attempts.max(1),
            retry_base_delay: config.retry_base_delay,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| RegistrationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RegistrationError::Transport(e.to_string()))?;

        if status.is_success() {
            parse_receipt(&body)
        } else {
            Err(parse_error_body(status, &body))
        }
    }

    /// Exponential backoff with jitter of up to one base delay.
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.retry_base_delay.as_millis() as u64;
        let exponential = base.saturating_mul(1u64 << attempt.saturating_sub(1).min(16));
        let jitter = if base == 0 {
            0
        } else {
            rand::rng().random_range(0..=base)
        };
        Duration::from_millis(exponential.saturating_add(jitter))
    }
}

#[async_trait]
impl RegistrationPort for HttpRegistrationClient {
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let mut attempt = 1;
        loop {
            match self.send_once(payload).await {
                Ok(receipt) => {
                    info!(attempt, user_id = %receipt.user.id, "partner registered");
                    return Ok(receipt);
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let backoff = self.backoff(attempt);
                    warn!(
                        attempt,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "registration attempt failed, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(attempt, error = %err, "registration failed");
                    return Err(err);
                }
            }
        }
    }
}

/// Accepts the receipt either bare or wrapped in `{ "data": ... }`.
fn parse_receipt(body: &str) -> Result<RegistrationReceipt, RegistrationError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| RegistrationError::InvalidResponse(e.to_string()))?;
    let inner = match value.get("data") {
        Some(data) if data.is_object() && value.get("accessToken").is_none() => data.clone(),
        _ => value,
    };
    serde_json::from_value(inner).map_err(|e| RegistrationError::InvalidResponse(e.to_string()))
}

fn parse_error_body(status: StatusCode, body: &str) -> RegistrationError {
    if matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    ) {
        return RegistrationError::Transport(format!("backend unavailable ({})", status.as_u16()));
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if !parsed.errors.is_empty() {
        debug!(count = parsed.errors.len(), "registration rejected with field errors");
        return RegistrationError::Rejected(parsed.errors);
    }

    // Validation pipes report `message` as a list of strings.
    let message = match parsed.message {
        Some(Value::String(message)) => message,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .next()
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    RegistrationError::Server {
        status: Some(status.as_u16()),
        message,
    }
}
