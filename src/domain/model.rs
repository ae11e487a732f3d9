use serde::{Deserialize, Serialize};

/// One line of the dataset import manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub image_gcs_uri: String,
    pub classification_annotation: ClassificationAnnotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationAnnotation {
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObject {
    pub name: String,
    #[serde(default)]
    pub bucket: String,
    pub content_type: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    pub name: String,
    pub display_name: String,
    pub metadata_schema_uri: Option<String>,
    pub create_time: Option<String>,
}

impl DatasetRecord {
    pub fn id(&self) -> &str {
        resource_id(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub name: String,
    pub display_name: String,
    pub artifact_uri: Option<String>,
    pub create_time: Option<String>,
}

impl ModelRecord {
    pub fn id(&self) -> &str {
        resource_id(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub deployed_models: Vec<DeployedModel>,
}

impl EndpointRecord {
    pub fn id(&self) -> &str {
        resource_id(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEvaluation {
    pub name: String,
    pub metrics_schema_uri: Option<String>,
    #[serde(default)]
    pub metrics: serde_json::Value,
}

/// Everything the platform needs to start an AutoML image classification run.
#[derive(Debug, Clone)]
pub struct TrainingJobSpec {
    pub dataset_id: String,
    pub job_display_name: String,
    pub model_display_name: String,
    pub model_type: String,
    pub budget_milli_node_hours: u64,
    pub training_fraction: f64,
    pub validation_fraction: f64,
    pub test_fraction: f64,
    pub disable_early_stopping: bool,
}

#[derive(Debug, Clone)]
pub struct DeploymentSpec {
    pub deployed_model_display_name: String,
    pub machine_type: String,
    pub accelerator_type: Option<String>,
    pub accelerator_count: u32,
    pub min_replica_count: u32,
    pub max_replica_count: u32,
    pub traffic_percentage: u32,
}

/// Last segment of a resource name such as `projects/p/locations/l/datasets/123`.
pub fn resource_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
