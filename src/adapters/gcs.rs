use crate::adapters::auth::AccessToken;
use crate::adapters::http::check_response;
use crate::domain::model::StorageObject;
use crate::domain::ports::ObjectStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Cloud Storage over its JSON API.
#[derive(Debug, Clone)]
pub struct GcsObjectStore {
    client: Client,
    base_url: String,
    access_token: AccessToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectListPage {
    #[serde(default)]
    items: Vec<StorageObject>,
    next_page_token: Option<String>,
}

impl GcsObjectStore {
    pub fn new(client: Client, base_url: impl Into<String>, access_token: AccessToken) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageObject>> {
        let url = format!("{}/storage/v1/b/{}/o", self.base_url, bucket);
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;
        let access_token = self.access_token.get().await?;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(access_token)
                .query(&[("prefix", prefix)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = check_response("list objects", request.send().await?).await?;
            let page: ObjectListPage = response.json().await?;
            tracing::debug!("📄 Listed {} objects from gs://{}/{}", page.items.len(), bucket, prefix);
            objects.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.base_url, bucket);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.access_token.get().await?)
            .query(&[("uploadType", "media"), ("name", name)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        check_response("upload object", response).await?;

        Ok(format!("gs://{}/{}", bucket, name))
    }
}
