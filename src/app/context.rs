use crate::adapters::auth::AccessToken;
use crate::adapters::http::build_client;
use crate::adapters::{GcsObjectStore, LocalStorage, VertexClient};
use crate::config::PlatformSettings;
use crate::utils::error::Result;

/// Live adapters for one stage run, built from resolved settings.
/// Nothing here talks to the network; the access token is fetched on first use.
pub struct PlatformContext {
    pub storage: LocalStorage,
    pub objects: GcsObjectStore,
    pub vertex: VertexClient,
}

impl PlatformContext {
    pub fn connect(settings: &PlatformSettings) -> Result<Self> {
        let token = AccessToken::new(settings.access_token.clone());
        let client = build_client(settings.request_timeout)?;

        let vertex = VertexClient::new(
            client.clone(),
            &settings.api_endpoint,
            settings.project_id.clone(),
            settings.location.clone(),
            token.clone(),
        )
        .with_poll_interval(settings.poll_interval);
        let objects = GcsObjectStore::new(client, settings.storage_endpoint.clone(), token);
        let storage = LocalStorage::new(settings.work_dir.clone());

        tracing::debug!("API endpoint: {}", settings.api_endpoint);
        tracing::debug!("Working directory: {}", settings.work_dir);

        Ok(Self {
            storage,
            objects,
            vertex,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_does_not_resolve_credentials() {
        let mut settings = PlatformSettings::default();
        settings.access_token = None;

        let ctx = PlatformContext::connect(&settings).unwrap();

        assert!(!ctx.vertex.access_token().is_resolved());
        assert_eq!(ctx.storage.base_path(), ".");
    }
}
