use crate::utils::error::{AutomlError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vertex-automl/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Turns a non-2xx response into `PlatformError`, pulling `error.message` out of
/// Google's JSON error envelope when there is one.
pub async fn check_response(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);

    tracing::debug!("{} failed: HTTP {} {}", operation, status, message);

    Err(AutomlError::PlatformError {
        operation: operation.to_string(),
        status: status.as_u16(),
        message,
    })
}
