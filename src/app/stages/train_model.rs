use crate::app::stages::{log_platform, now_iso, run_timestamp};
use crate::config::TrainSettings;
use crate::core::evaluation::EvaluationSummary;
use crate::core::handoff::{load_json, model_info_file, save_json, DatasetInfo, ModelInfo, DATASET_INFO_FILE};
use crate::core::presets::{TEST_FRACTION, TRAINING_FRACTION, VALIDATION_FRACTION};
use crate::core::stage::{Stage, StageReport};
use crate::domain::model::{ModelRecord, TrainingJobSpec};
use crate::domain::ports::{MlPlatform, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const TRAINING_DISPLAY_NAME: &str = "elephant-detection-training";
pub const MODEL_DISPLAY_NAME: &str = "elephant-detection-model";

/// Stage 2: AutoML image classification training on the imported dataset.
pub struct TrainModelStage<P: MlPlatform, S: Storage> {
    settings: TrainSettings,
    platform: P,
    storage: S,
}

impl<P: MlPlatform, S: Storage> TrainModelStage<P, S> {
    pub fn new(settings: TrainSettings, platform: P, storage: S) -> Self {
        Self {
            settings,
            platform,
            storage,
        }
    }

    async fn dataset_id(&self) -> Result<String> {
        if let Some(id) = &self.settings.dataset_id {
            return Ok(id.clone());
        }
        let info: DatasetInfo = load_json(&self.storage, DATASET_INFO_FILE, "dataset-import").await?;
        Ok(info.dataset_id)
    }

    fn job_spec(&self, dataset_id: &str, timestamp: &str) -> TrainingJobSpec {
        let model_type = self.settings.model_type;
        TrainingJobSpec {
            dataset_id: dataset_id.to_string(),
            job_display_name: format!("{}_{}_{}", TRAINING_DISPLAY_NAME, model_type, timestamp),
            model_display_name: format!("{}_{}_{}", MODEL_DISPLAY_NAME, model_type, timestamp),
            model_type: model_type.preset().model_type.to_string(),
            budget_milli_node_hours: u64::from(self.settings.budget_hours) * 1000,
            training_fraction: TRAINING_FRACTION,
            validation_fraction: VALIDATION_FRACTION,
            test_fraction: TEST_FRACTION,
            disable_early_stopping: false,
        }
    }

    async fn evaluate(&self, model: &ModelRecord) -> Result<()> {
        tracing::info!("📈 Model Evaluation Metrics:");
        let evaluations = self.platform.list_model_evaluations(model).await?;
        if evaluations.is_empty() {
            tracing::info!("  No evaluations available yet");
        }

        for evaluation in &evaluations {
            let summary = EvaluationSummary::from_metrics(&evaluation.metrics);
            tracing::debug!("  Evaluation: {}", evaluation.name);
            for line in summary.lines() {
                tracing::info!("  {}", line);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<P: MlPlatform, S: Storage> Stage for TrainModelStage<P, S> {
    fn title(&self) -> &str {
        "MODEL TRAINING"
    }

    async fn execute(&self) -> Result<StageReport> {
        log_platform(&self.settings.platform);

        let dataset_id = self.dataset_id().await?;

        tracing::info!("📊 Loading dataset: {}", dataset_id);
        let dataset = self.platform.get_dataset(&dataset_id).await?;
        tracing::info!("✓ Dataset loaded: {}", dataset.display_name);

        let preset = self.settings.model_type.preset();
        let spec = self.job_spec(dataset.id(), &run_timestamp());

        tracing::info!("🚀 Starting training job: {}", spec.job_display_name);
        tracing::info!("  Model type: {}", preset.display_name);
        tracing::info!("  Training budget: {} node hours", self.settings.budget_hours);
        tracing::info!("  Description: {}", preset.description);
        tracing::info!("⏳ Training in progress...");
        tracing::info!("  This may take several hours depending on dataset size and model complexity");

        let model = self.platform.run_automl_training(&spec).await?;
        tracing::info!("✅ Training completed successfully!");
        tracing::info!("  Model resource name: {}", model.name);
        tracing::info!("  Model display name: {}", model.display_name);

        if self.settings.evaluate {
            if let Err(e) = self.evaluate(&model).await {
                tracing::warn!("⚠️ Could not retrieve evaluation metrics: {}", e);
            }
        }

        let info = ModelInfo {
            model_id: model.id().to_string(),
            model_resource_name: model.name.clone(),
            display_name: model.display_name.clone(),
            model_type: self.settings.model_type,
            project_id: self.settings.platform.project_id.clone(),
            location: self.settings.platform.location.clone(),
            created_time: now_iso(),
            artifact_uri: model.artifact_uri.clone(),
        };
        let filename = model_info_file(self.settings.model_type);
        save_json(&self.storage, &filename, &info).await?;
        tracing::info!("✓ Model info saved to: {}", filename);

        Ok(StageReport::new("MODEL TRAINING COMPLETE")
            .detail("Model ID", &info.model_id)
            .detail("Display Name", &info.display_name)
            .file(filename)
            .next_step("Next step: run deploy-model to deploy this model"))
    }
}
