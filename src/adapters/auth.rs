use crate::utils::error::{AutomlError, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Bearer token shared by the platform clients. Resolved on the first request,
/// so stages that stop before touching the network never need credentials.
#[derive(Clone)]
pub struct AccessToken {
    explicit: Option<String>,
    resolved: Arc<OnceCell<String>>,
}

impl AccessToken {
    pub fn new(explicit: Option<String>) -> Self {
        Self {
            explicit,
            resolved: Arc::new(OnceCell::new()),
        }
    }

    pub fn fixed(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    pub async fn get(&self) -> Result<&str> {
        let token = self
            .resolved
            .get_or_try_init(|| resolve_access_token(self.explicit.as_deref()))
            .await?;
        Ok(token.as_str())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// OAuth bearer token lookup order: explicit value, `GOOGLE_OAUTH_ACCESS_TOKEN`,
/// then `gcloud auth print-access-token`.
pub async fn resolve_access_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        tracing::debug!("🔑 Using access token from configuration");
        return Ok(token.to_string());
    }

    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.trim().is_empty() {
            tracing::debug!("🔑 Using access token from {}", ACCESS_TOKEN_ENV);
            return Ok(token.trim().to_string());
        }
    }

    tracing::debug!("🔑 Requesting access token from gcloud");
    gcloud_access_token().await
}

async fn gcloud_access_token() -> Result<String> {
    let output = tokio::process::Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| AutomlError::AuthError {
            message: format!(
                "could not run gcloud ({}); pass --access-token or set {}",
                e, ACCESS_TOKEN_ENV
            ),
        })?;

    if !output.status.success() {
        return Err(AutomlError::AuthError {
            message: format!(
                "gcloud auth print-access-token failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(AutomlError::AuthError {
            message: "gcloud returned an empty access token".to_string(),
        });
    }
    Ok(token)
}
