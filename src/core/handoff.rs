//! Files the stages leave in the working directory for the next stage.

use crate::core::presets::{DeploymentSize, ModelType};
use crate::domain::ports::Storage;
use crate::utils::error::{AutomlError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DATASET_INFO_FILE: &str = "dataset_info.json";
pub const ENDPOINT_CONFIG_FILE: &str = "endpoint_config.json";

pub fn model_info_file(model_type: ModelType) -> String {
    format!("model_info_{}.json", model_type)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub dataset_id: String,
    pub display_name: String,
    pub resource_name: String,
    pub project_id: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub model_resource_name: String,
    pub display_name: String,
    pub model_type: ModelType,
    pub project_id: String,
    pub location: String,
    pub created_time: String,
    pub artifact_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub endpoint_id: String,
    pub endpoint_resource_name: String,
    pub endpoint_display_name: String,
    pub endpoint_uri: String,
    pub model_id: String,
    pub model_display_name: String,
    pub deployment_size: DeploymentSize,
    pub project_id: String,
    pub location: String,
    pub deployed_time: String,
}

/// Reads a hand-off file. A missing file maps to `MissingPrerequisite` naming
/// the stage that writes it.
pub async fn load_json<T, S>(storage: &S, path: &str, producer: &str) -> Result<T>
where
    T: DeserializeOwned,
    S: Storage,
{
    let data = match storage.read_file(path).await {
        Ok(data) => data,
        Err(AutomlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AutomlError::MissingPrerequisite {
                file: path.to_string(),
                producer: producer.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    Ok(serde_json::from_slice(&data)?)
}

pub async fn save_json<T, S>(storage: &S, path: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: Storage,
{
    let json = serde_json::to_string_pretty(value)?;
    storage.write_file(path, json.as_bytes()).await?;
    tracing::debug!("Wrote {} ({} bytes)", path, json.len());
    Ok(())
}
