//! In-memory ports shared by the stage unit tests.

use crate::domain::model::{
    DatasetRecord, DeployedModel, DeploymentSpec, EndpointRecord, ModelEvaluation, ModelRecord,
    StorageObject, TrainingJobSpec,
};
use crate::domain::ports::{MlPlatform, ObjectStore, Storage};
use crate::utils::error::{AutomlError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

const PARENT: &str = "projects/pelagic-magpie-469618-k8/locations/us-central1";

pub fn dataset(id: &str, display_name: &str) -> DatasetRecord {
    DatasetRecord {
        name: format!("{}/datasets/{}", PARENT, id),
        display_name: display_name.to_string(),
        metadata_schema_uri: None,
        create_time: None,
    }
}

pub fn model(id: &str, display_name: &str) -> ModelRecord {
    ModelRecord {
        name: format!("{}/models/{}", PARENT, id),
        display_name: display_name.to_string(),
        artifact_uri: Some(format!("gs://artifacts/{}", id)),
        create_time: None,
    }
}

pub fn endpoint(id: &str, display_name: &str) -> EndpointRecord {
    EndpointRecord {
        name: format!("{}/endpoints/{}", PARENT, id),
        display_name: display_name.to_string(),
        description: None,
        deployed_models: vec![],
    }
}

#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }

    pub async fn put_file(&self, path: &str, data: &[u8]) {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            AutomlError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}

#[derive(Clone)]
pub struct MockObjectStore {
    names: Vec<String>,
    uploads: Arc<StdMutex<Vec<(String, String)>>>,
}

impl MockObjectStore {
    pub fn new(names: Vec<&str>) -> Self {
        Self {
            names: names.into_iter().map(str::to_string).collect(),
            uploads: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// `(object name, body)` pairs in upload order.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageObject>> {
        Ok(self
            .names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| StorageObject {
                name: name.clone(),
                bucket: bucket.to_string(),
                content_type: None,
                size: None,
            })
            .collect())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((name.to_string(), String::from_utf8_lossy(&data).to_string()));
        Ok(format!("gs://{}/{}", bucket, name))
    }
}

/// Records every call as `"<method> <key argument>"`.
#[derive(Clone, Default)]
pub struct MockPlatform {
    existing_datasets: Vec<DatasetRecord>,
    existing_endpoints: Vec<EndpointRecord>,
    deployed_models: Vec<DeployedModel>,
    fail_evaluations: bool,
    calls: Arc<StdMutex<Vec<String>>>,
    training_specs: Arc<StdMutex<Vec<TrainingJobSpec>>>,
    deployment_specs: Arc<StdMutex<Vec<DeploymentSpec>>>,
}

impl MockPlatform {
    pub fn with_existing_dataset(mut self, dataset: DatasetRecord) -> Self {
        self.existing_datasets.push(dataset);
        self
    }

    pub fn with_existing_endpoint(mut self, endpoint: EndpointRecord) -> Self {
        self.existing_endpoints.push(endpoint);
        self
    }

    pub fn with_deployed_model(mut self, display_name: &str) -> Self {
        self.deployed_models.push(DeployedModel {
            id: "1".to_string(),
            model: format!("{}/models/1", PARENT),
            display_name: display_name.to_string(),
        });
        self
    }

    pub fn failing_evaluations(mut self) -> Self {
        self.fail_evaluations = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn training_specs(&self) -> Vec<TrainingJobSpec> {
        self.training_specs.lock().unwrap().clone()
    }

    pub fn deployment_specs(&self) -> Vec<DeploymentSpec> {
        self.deployment_specs.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MlPlatform for MockPlatform {
    async fn find_datasets(&self, display_name: &str) -> Result<Vec<DatasetRecord>> {
        self.record(format!("find_datasets {}", display_name));
        Ok(self.existing_datasets.clone())
    }

    async fn create_image_dataset(&self, display_name: &str) -> Result<DatasetRecord> {
        self.record(format!("create_image_dataset {}", display_name));
        Ok(dataset("1001", display_name))
    }

    async fn import_manifest(&self, _dataset: &DatasetRecord, manifest_uri: &str) -> Result<()> {
        self.record(format!("import_manifest {}", manifest_uri));
        Ok(())
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetRecord> {
        self.record(format!("get_dataset {}", dataset_id));
        Ok(dataset(dataset_id, "elephant-detection-dataset"))
    }

    async fn run_automl_training(&self, spec: &TrainingJobSpec) -> Result<ModelRecord> {
        self.record(format!("run_automl_training {}", spec.model_type));
        self.training_specs.lock().unwrap().push(spec.clone());
        Ok(model("555", &spec.model_display_name))
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelRecord> {
        self.record(format!("get_model {}", model_id));
        Ok(model(model_id, "Loaded Model"))
    }

    async fn list_model_evaluations(&self, model: &ModelRecord) -> Result<Vec<ModelEvaluation>> {
        self.record(format!("list_model_evaluations {}", model.id()));
        if self.fail_evaluations {
            return Err(AutomlError::PlatformError {
                operation: "list model evaluations".to_string(),
                status: 404,
                message: "evaluations not ready".to_string(),
            });
        }
        Ok(vec![ModelEvaluation {
            name: format!("{}/evaluations/1", model.name),
            metrics_schema_uri: None,
            metrics: serde_json::json!({"auPrc": 0.95, "auRoc": 0.97, "logLoss": 0.1}),
        }])
    }

    async fn find_endpoints(&self, display_name: &str) -> Result<Vec<EndpointRecord>> {
        self.record(format!("find_endpoints {}", display_name));
        Ok(self.existing_endpoints.clone())
    }

    async fn create_endpoint(
        &self,
        display_name: &str,
        _description: &str,
    ) -> Result<EndpointRecord> {
        self.record(format!("create_endpoint {}", display_name));
        Ok(endpoint("9", display_name))
    }

    async fn get_endpoint(&self, endpoint_name: &str) -> Result<EndpointRecord> {
        self.record(format!("get_endpoint {}", endpoint_name));
        let mut record = endpoint(crate::domain::model::resource_id(endpoint_name), "ep");
        record.deployed_models = self.deployed_models.clone();
        Ok(record)
    }

    async fn deploy_model(
        &self,
        _endpoint: &EndpointRecord,
        model: &ModelRecord,
        spec: &DeploymentSpec,
    ) -> Result<()> {
        self.record(format!("deploy_model {}", model.id()));
        self.deployment_specs.lock().unwrap().push(spec.clone());
        Ok(())
    }
}
