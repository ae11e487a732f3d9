use crate::adapters::auth::AccessToken;
use crate::adapters::http::check_response;
use crate::domain::model::{
    DatasetRecord, DeploymentSpec, EndpointRecord, ModelEvaluation, ModelRecord, TrainingJobSpec,
};
use crate::domain::ports::MlPlatform;
use crate::utils::error::{AutomlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const IMAGE_METADATA_SCHEMA: &str =
    "gs://google-cloud-aiplatform/schema/dataset/metadata/image_1.0.0.yaml";
pub const SINGLE_LABEL_IMPORT_SCHEMA: &str = "gs://google-cloud-aiplatform/schema/dataset/ioformat/image_classification_single_label_io_format_1.0.0.yaml";
pub const AUTOML_IMAGE_CLASSIFICATION_DEFINITION: &str =
    "gs://google-cloud-aiplatform/schema/trainingjob/definition/automl_image_classification_1.0.0.yaml";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub fn default_api_endpoint(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com", location)
}

/// Long-running operation envelope.
#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<Status>,
    response: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrainingPipeline {
    name: String,
    #[serde(default)]
    state: String,
    error: Option<Status>,
    model_to_upload: Option<UploadedModel>,
}

#[derive(Debug, Deserialize)]
struct UploadedModel {
    #[serde(default)]
    name: String,
}

impl TrainingPipeline {
    fn is_finished(&self) -> bool {
        matches!(
            self.state.as_str(),
            "PIPELINE_STATE_SUCCEEDED" | "PIPELINE_STATE_FAILED" | "PIPELINE_STATE_CANCELLED"
        )
    }
}

/// One page of a `list` response.
trait ListPage: DeserializeOwned {
    type Item;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetList {
    #[serde(default)]
    datasets: Vec<DatasetRecord>,
    next_page_token: Option<String>,
}

impl ListPage for DatasetList {
    type Item = DatasetRecord;

    fn into_parts(self) -> (Vec<DatasetRecord>, Option<String>) {
        (self.datasets, self.next_page_token)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointList {
    #[serde(default)]
    endpoints: Vec<EndpointRecord>,
    next_page_token: Option<String>,
}

impl ListPage for EndpointList {
    type Item = EndpointRecord;

    fn into_parts(self) -> (Vec<EndpointRecord>, Option<String>) {
        (self.endpoints, self.next_page_token)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationList {
    #[serde(default)]
    model_evaluations: Vec<ModelEvaluation>,
}

/// Vertex AI over its v1 REST surface.
#[derive(Debug, Clone)]
pub struct VertexClient {
    client: Client,
    base_url: String,
    project_id: String,
    location: String,
    access_token: AccessToken,
    poll_interval: Duration,
}

impl VertexClient {
    pub fn new(
        client: Client,
        api_endpoint: &str,
        project_id: impl Into<String>,
        location: impl Into<String>,
        access_token: AccessToken,
    ) -> Self {
        Self {
            client,
            base_url: format!("{}/v1", api_endpoint.trim_end_matches('/')),
            project_id: project_id.into(),
            location: location.into(),
            access_token,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    /// Accepts a short id or a full resource name.
    pub fn resource_name(&self, collection: &str, id: &str) -> String {
        if id.starts_with("projects/") {
            id.to_string()
        } else {
            format!("{}/{}/{}", self.parent(), collection, id)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        tracing::debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(self.access_token.get().await?)
            .query(query)
            .send()
            .await?;
        let response = check_response(operation, response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        tracing::debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(self.access_token.get().await?)
            .json(body)
            .send()
            .await?;
        let response = check_response(operation, response).await?;
        Ok(response.json().await?)
    }

    async fn wait_for_operation(&self, label: &str, mut operation: Operation) -> Result<Value> {
        let mut polls = 0u32;
        while !operation.done {
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;
            tracing::debug!("⏳ Waiting for {} ({}), poll #{}", label, operation.name, polls);
            operation = self.get_json(label, &operation.name, &[]).await?;
        }

        if let Some(status) = operation.error {
            return Err(AutomlError::OperationFailed {
                operation: label.to_string(),
                message: format!("code {}: {}", status.code, status.message),
            });
        }

        Ok(operation.response.unwrap_or(Value::Null))
    }

    /// Every page of `collection` matching `display_name`, newest first.
    async fn list_by_display_name<T: ListPage>(
        &self,
        operation: &str,
        collection: &str,
        display_name: &str,
    ) -> Result<Vec<T::Item>> {
        let path = format!("{}/{}", self.parent(), collection);
        let filter = format!("display_name=\"{}\"", display_name);
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("filter", filter.as_str()), ("orderBy", "create_time desc")];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.as_str()));
            }

            let page: T = self.get_json(operation, &path, &query).await?;
            let (page_items, next) = page.into_parts();
            items.extend(page_items);

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl MlPlatform for VertexClient {
    async fn find_datasets(&self, display_name: &str) -> Result<Vec<DatasetRecord>> {
        let datasets = self
            .list_by_display_name::<DatasetList>("list datasets", "datasets", display_name)
            .await?;

        // Only image datasets qualify for reuse.
        Ok(datasets
            .into_iter()
            .filter(|d| {
                d.metadata_schema_uri
                    .as_deref()
                    .map_or(true, |uri| uri == IMAGE_METADATA_SCHEMA)
            })
            .collect())
    }

    async fn create_image_dataset(&self, display_name: &str) -> Result<DatasetRecord> {
        let body = json!({
            "displayName": display_name,
            "metadataSchemaUri": IMAGE_METADATA_SCHEMA,
        });
        let operation: Operation = self
            .post_json(
                "create dataset",
                &format!("{}/datasets", self.parent()),
                &body,
            )
            .await?;
        let response = self.wait_for_operation("create dataset", operation).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn import_manifest(&self, dataset: &DatasetRecord, manifest_uri: &str) -> Result<()> {
        let body = json!({
            "importConfigs": [{
                "gcsSource": {"uris": [manifest_uri]},
                "importSchemaUri": SINGLE_LABEL_IMPORT_SCHEMA,
            }]
        });
        let operation: Operation = self
            .post_json("import data", &format!("{}:import", dataset.name), &body)
            .await?;
        self.wait_for_operation("import data", operation).await?;
        Ok(())
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetRecord> {
        self.get_json(
            "get dataset",
            &self.resource_name("datasets", dataset_id),
            &[],
        )
        .await
    }

    async fn run_automl_training(&self, spec: &TrainingJobSpec) -> Result<ModelRecord> {
        let body = json!({
            "displayName": spec.job_display_name,
            "trainingTaskDefinition": AUTOML_IMAGE_CLASSIFICATION_DEFINITION,
            "trainingTaskInputs": {
                "multiLabel": false,
                "modelType": spec.model_type,
                "budgetMilliNodeHours": spec.budget_milli_node_hours,
                "disableEarlyStopping": spec.disable_early_stopping,
            },
            "inputDataConfig": {
                "datasetId": spec.dataset_id,
                "fractionSplit": {
                    "trainingFraction": spec.training_fraction,
                    "validationFraction": spec.validation_fraction,
                    "testFraction": spec.test_fraction,
                },
            },
            "modelToUpload": {"displayName": spec.model_display_name},
        });

        let mut pipeline: TrainingPipeline = self
            .post_json(
                "create training pipeline",
                &format!("{}/trainingPipelines", self.parent()),
                &body,
            )
            .await?;
        tracing::info!("  Training pipeline: {}", pipeline.name);

        while !pipeline.is_finished() {
            tokio::time::sleep(self.poll_interval).await;
            pipeline = self
                .get_json("get training pipeline", &pipeline.name, &[])
                .await?;
            tracing::debug!("⏳ {} is {}", pipeline.name, pipeline.state);
        }

        if pipeline.state != "PIPELINE_STATE_SUCCEEDED" {
            let message = pipeline
                .error
                .map(|s| s.message)
                .unwrap_or_else(|| pipeline.state.clone());
            return Err(AutomlError::OperationFailed {
                operation: "training pipeline".to_string(),
                message,
            });
        }

        let model_name = pipeline
            .model_to_upload
            .map(|m| m.name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AutomlError::OperationFailed {
                operation: "training pipeline".to_string(),
                message: "pipeline succeeded without producing a model".to_string(),
            })?;

        self.get_model(&model_name).await
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelRecord> {
        self.get_json("get model", &self.resource_name("models", model_id), &[])
            .await
    }

    async fn list_model_evaluations(&self, model: &ModelRecord) -> Result<Vec<ModelEvaluation>> {
        let list: EvaluationList = self
            .get_json(
                "list model evaluations",
                &format!("{}/evaluations", model.name),
                &[],
            )
            .await?;
        Ok(list.model_evaluations)
    }

    async fn find_endpoints(&self, display_name: &str) -> Result<Vec<EndpointRecord>> {
        self.list_by_display_name::<EndpointList>("list endpoints", "endpoints", display_name)
            .await
    }

    async fn create_endpoint(
        &self,
        display_name: &str,
        description: &str,
    ) -> Result<EndpointRecord> {
        let body = json!({
            "displayName": display_name,
            "description": description,
        });
        let operation: Operation = self
            .post_json(
                "create endpoint",
                &format!("{}/endpoints", self.parent()),
                &body,
            )
            .await?;
        let response = self.wait_for_operation("create endpoint", operation).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn get_endpoint(&self, endpoint_name: &str) -> Result<EndpointRecord> {
        self.get_json(
            "get endpoint",
            &self.resource_name("endpoints", endpoint_name),
            &[],
        )
        .await
    }

    async fn deploy_model(
        &self,
        endpoint: &EndpointRecord,
        model: &ModelRecord,
        spec: &DeploymentSpec,
    ) -> Result<()> {
        let mut machine_spec = json!({"machineType": spec.machine_type});
        if let Some(accelerator) = &spec.accelerator_type {
            if spec.accelerator_count > 0 {
                machine_spec["acceleratorType"] = json!(accelerator);
                machine_spec["acceleratorCount"] = json!(spec.accelerator_count);
            }
        }

        // Key "0" refers to the model being deployed in this request.
        let body = json!({
            "deployedModel": {
                "model": model.name,
                "displayName": spec.deployed_model_display_name,
                "dedicatedResources": {
                    "machineSpec": machine_spec,
                    "minReplicaCount": spec.min_replica_count,
                    "maxReplicaCount": spec.max_replica_count,
                },
            },
            "trafficSplit": {"0": spec.traffic_percentage},
        });

        let operation: Operation = self
            .post_json(
                "deploy model",
                &format!("{}:deployModel", endpoint.name),
                &body,
            )
            .await?;
        self.wait_for_operation("deploy model", operation).await?;
        Ok(())
    }
}
