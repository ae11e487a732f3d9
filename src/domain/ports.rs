use crate::domain::model::{
    DatasetRecord, DeploymentSpec, EndpointRecord, ModelEvaluation, ModelRecord, StorageObject,
    TrainingJobSpec,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Files in the stage working directory.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every object under `prefix`, across all result pages.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageObject>>;

    /// Returns the `gs://` URI of the uploaded object.
    async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;
}

/// The managed ML platform. Calls that start long-running work only return once it finished.
#[async_trait]
pub trait MlPlatform: Send + Sync {
    /// Newest first.
    async fn find_datasets(&self, display_name: &str) -> Result<Vec<DatasetRecord>>;
    async fn create_image_dataset(&self, display_name: &str) -> Result<DatasetRecord>;
    async fn import_manifest(&self, dataset: &DatasetRecord, manifest_uri: &str) -> Result<()>;
    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetRecord>;

    async fn run_automl_training(&self, spec: &TrainingJobSpec) -> Result<ModelRecord>;
    async fn get_model(&self, model_id: &str) -> Result<ModelRecord>;
    async fn list_model_evaluations(&self, model: &ModelRecord) -> Result<Vec<ModelEvaluation>>;

    /// Newest first.
    async fn find_endpoints(&self, display_name: &str) -> Result<Vec<EndpointRecord>>;
    async fn create_endpoint(&self, display_name: &str, description: &str)
        -> Result<EndpointRecord>;
    async fn get_endpoint(&self, endpoint_name: &str) -> Result<EndpointRecord>;
    async fn deploy_model(
        &self,
        endpoint: &EndpointRecord,
        model: &ModelRecord,
        spec: &DeploymentSpec,
    ) -> Result<()>;
}
