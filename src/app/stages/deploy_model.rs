use crate::app::stages::{log_platform, now_iso, run_timestamp};
use crate::config::DeploySettings;
use crate::core::artifacts::{
    prediction_uri, render_php_config, PREDICTION_EXAMPLE, PREDICTION_EXAMPLE_FILE,
};
use crate::core::handoff::{
    load_json, model_info_file, save_json, EndpointConfig, ModelInfo, ENDPOINT_CONFIG_FILE,
};
use crate::core::stage::{Stage, StageReport};
use crate::domain::model::{DeploymentSpec, EndpointRecord, ModelRecord};
use crate::domain::ports::{MlPlatform, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const DEPLOYED_MODEL_PREFIX: &str = "elephant-detector";
pub const ENDPOINT_DESCRIPTION: &str = "Endpoint for elephant detection model";
pub const CUSTOM_MODEL_DISPLAY_NAME: &str = "Custom Model";

/// Stage 3: put the trained model behind a prediction endpoint.
pub struct DeployModelStage<P: MlPlatform, S: Storage> {
    settings: DeploySettings,
    platform: P,
    storage: S,
}

/// The model id plus the name recorded for it in `endpoint_config.json`.
struct ModelRef {
    model_id: String,
    display_name: String,
}

impl<P: MlPlatform, S: Storage> DeployModelStage<P, S> {
    pub fn new(settings: DeploySettings, platform: P, storage: S) -> Self {
        Self {
            settings,
            platform,
            storage,
        }
    }

    async fn model_ref(&self) -> Result<ModelRef> {
        if let Some(id) = &self.settings.model_id {
            return Ok(ModelRef {
                model_id: id.clone(),
                display_name: CUSTOM_MODEL_DISPLAY_NAME.to_string(),
            });
        }

        let filename = model_info_file(self.settings.model_type);
        let info: ModelInfo = load_json(&self.storage, &filename, "train-model").await?;
        Ok(ModelRef {
            model_id: info.model_id,
            display_name: info.display_name,
        })
    }

    async fn create_or_get_endpoint(&self) -> Result<EndpointRecord> {
        let name = &self.settings.endpoint_name;
        tracing::info!("🎯 Setting up endpoint: {}", name);

        if let Some(endpoint) = self.platform.find_endpoints(name).await?.into_iter().next() {
            tracing::info!("✓ Using existing endpoint: {}", endpoint.display_name);
            tracing::info!("  Resource name: {}", endpoint.name);
            return Ok(endpoint);
        }

        tracing::info!("  Creating new endpoint...");
        let endpoint = self
            .platform
            .create_endpoint(name, ENDPOINT_DESCRIPTION)
            .await?;
        tracing::info!("✓ Endpoint created successfully");
        tracing::info!("  Resource name: {}", endpoint.name);
        Ok(endpoint)
    }

    fn deployment_spec(&self, timestamp: &str) -> DeploymentSpec {
        let size = self.settings.deployment_size;
        let profile = size.profile();
        DeploymentSpec {
            deployed_model_display_name: format!("{}-{}-{}", DEPLOYED_MODEL_PREFIX, size, timestamp),
            machine_type: profile.machine_type.to_string(),
            accelerator_type: profile.accelerator_type.map(str::to_string),
            accelerator_count: profile.accelerator_count,
            min_replica_count: profile.min_replica_count,
            max_replica_count: profile.max_replica_count,
            traffic_percentage: 100,
        }
    }

    async fn deploy(&self, model: &ModelRecord, endpoint: &EndpointRecord) -> Result<()> {
        let size = self.settings.deployment_size;
        let profile = size.profile();
        let spec = self.deployment_spec(&run_timestamp());

        tracing::info!("🚀 Deploying model to endpoint");
        tracing::info!("  Deployment size: {}", size);
        tracing::info!("  Configuration: {}", profile.description);
        tracing::info!("  Machine type: {}", profile.machine_type);
        tracing::info!("  Min replicas: {}", profile.min_replica_count);
        tracing::info!("  Max replicas: {}", profile.max_replica_count);
        if let Some(accelerator) = profile.accelerator_type {
            tracing::info!("  Accelerator: {} x{}", accelerator, profile.accelerator_count);
        }
        tracing::info!("⏳ Deployment in progress...");
        tracing::info!("  This may take 10-15 minutes...");

        self.platform.deploy_model(endpoint, model, &spec).await?;
        tracing::info!("✅ Model deployed successfully!");
        Ok(())
    }

    /// No prediction is sent; a real check needs image data.
    fn report_readiness(&self, endpoint: &EndpointRecord) {
        tracing::info!("🧪 Testing endpoint...");
        tracing::info!("  Endpoint is ready for predictions");
        tracing::info!("  Endpoint ID: {}", endpoint.id());
        tracing::info!("  Endpoint resource name: {}", endpoint.name);
    }

    async fn write_artifacts(&self, config: &EndpointConfig) -> Result<()> {
        save_json(&self.storage, ENDPOINT_CONFIG_FILE, config).await?;
        tracing::info!("✓ Endpoint configuration saved to: {}", ENDPOINT_CONFIG_FILE);

        let php = render_php_config(config);
        self.storage
            .write_file(&self.settings.php_config_path, php.as_bytes())
            .await?;
        tracing::info!("✓ PHP configuration saved to: {}", self.settings.php_config_path);

        self.storage
            .write_file(PREDICTION_EXAMPLE_FILE, PREDICTION_EXAMPLE.as_bytes())
            .await?;
        tracing::info!("✓ Prediction example saved to: {}", PREDICTION_EXAMPLE_FILE);
        Ok(())
    }
}

#[async_trait]
impl<P: MlPlatform, S: Storage> Stage for DeployModelStage<P, S> {
    fn title(&self) -> &str {
        "MODEL DEPLOYMENT"
    }

    async fn execute(&self) -> Result<StageReport> {
        log_platform(&self.settings.platform);

        let model_ref = self.model_ref().await?;

        tracing::info!("📦 Loading model: {}", model_ref.model_id);
        let model = self.platform.get_model(&model_ref.model_id).await?;
        tracing::info!("✓ Model loaded: {}", model.display_name);

        let endpoint = self.create_or_get_endpoint().await?;

        let current = self.platform.get_endpoint(&endpoint.name).await?;
        if current.deployed_models.is_empty() {
            self.deploy(&model, &endpoint).await?;
        } else {
            tracing::warn!("⚠️ Model already deployed to this endpoint");
            tracing::info!("  Deployed models: {}", current.deployed_models.len());
            for deployed in &current.deployed_models {
                tracing::info!("    - {}", deployed.display_name);
            }
        }

        if self.settings.test {
            self.report_readiness(&endpoint);
        }

        let platform = &self.settings.platform;
        let config = EndpointConfig {
            endpoint_id: endpoint.id().to_string(),
            endpoint_resource_name: endpoint.name.clone(),
            endpoint_display_name: endpoint.display_name.clone(),
            endpoint_uri: prediction_uri(&platform.location, &endpoint.name),
            model_id: model_ref.model_id,
            model_display_name: model_ref.display_name,
            deployment_size: self.settings.deployment_size,
            project_id: platform.project_id.clone(),
            location: platform.location.clone(),
            deployed_time: now_iso(),
        };
        self.write_artifacts(&config).await?;

        Ok(StageReport::new("DEPLOYMENT COMPLETE")
            .detail("Endpoint URI", &config.endpoint_uri)
            .detail("Endpoint ID", &config.endpoint_id)
            .file(format!("{} (deployment details)", ENDPOINT_CONFIG_FILE))
            .file(format!("{} (PHP configuration)", self.settings.php_config_path))
            .file(format!("{} (example prediction script)", PREDICTION_EXAMPLE_FILE))
            .next_step("The endpoint is ready to receive prediction requests!"))
    }
}
