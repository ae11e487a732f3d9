use crate::adapters::vertex::default_api_endpoint;
use crate::config::toml_config::TomlConfig;
use crate::config::{DeploySettings, ImportSettings, PlatformSettings, TrainSettings};
use crate::core::presets::{DeploymentSize, ModelType};
use crate::utils::error::Result;
use clap::{Args, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Flags shared by all three stages. Anything left unset falls back to the
/// `--config` file, then to the built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to a TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GCP Project ID
    #[arg(long)]
    pub project_id: Option<String>,

    /// Vertex AI location
    #[arg(long)]
    pub location: Option<String>,

    /// Override the Vertex AI API endpoint (defaults to the regional endpoint)
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Override the Cloud Storage API endpoint
    #[arg(long)]
    pub storage_endpoint: Option<String>,

    /// OAuth access token (falls back to GOOGLE_OAUTH_ACCESS_TOKEN, then gcloud)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Seconds between polls of long-running operations
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Directory holding the hand-off JSON files
    #[arg(long)]
    pub work_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CommonArgs {
    pub fn load_file_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TomlConfig::from_file(path)
            }
            None => Ok(TomlConfig::default()),
        }
    }

    fn apply(&self, settings: &mut PlatformSettings, file: &TomlConfig) {
        if let Some(project_id) = &self.project_id {
            settings.project_id = project_id.clone();
        }
        if let Some(location) = &self.location {
            settings.location = location.clone();
            // 區域端點跟著 location 走，除非有明確指定
            if self.api_endpoint.is_none() && file.platform.api_endpoint.is_none() {
                settings.api_endpoint = default_api_endpoint(location);
            }
        }
        if let Some(endpoint) = &self.api_endpoint {
            settings.api_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.storage_endpoint {
            settings.storage_endpoint = endpoint.clone();
        }
        if self.access_token.is_some() {
            settings.access_token = self.access_token.clone();
        }
        if let Some(secs) = self.poll_interval_secs {
            settings.poll_interval = Duration::from_secs(secs);
        }
        if let Some(dir) = &self.work_dir {
            settings.work_dir = dir.clone();
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dataset-import")]
#[command(about = "Import the elephant image dataset from Cloud Storage into Vertex AI")]
pub struct ImportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// GCS bucket name
    #[arg(long)]
    pub bucket: Option<String>,

    /// Dataset path in bucket
    #[arg(long)]
    pub dataset_path: Option<String>,

    /// Dataset display name
    #[arg(long)]
    pub dataset_name: Option<String>,

    /// Label for images that are not inside a label folder
    #[arg(long)]
    pub default_label: Option<String>,

    /// Force create new dataset
    #[arg(long)]
    pub force_create: bool,
}

impl ImportArgs {
    pub fn resolve(&self) -> Result<ImportSettings> {
        let file = self.common.load_file_config()?;
        let mut settings = ImportSettings::from_file_config(&file);
        self.common.apply(&mut settings.platform, &file);

        if let Some(bucket) = &self.bucket {
            settings.bucket = bucket.clone();
        }
        if let Some(path) = &self.dataset_path {
            settings.dataset_path = path.clone();
        }
        if let Some(name) = &self.dataset_name {
            settings.dataset_name = name.clone();
        }
        if let Some(label) = &self.default_label {
            settings.default_label = label.clone();
        }
        settings.force_create = self.force_create;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "train-model")]
#[command(about = "Train the elephant detection model on Vertex AI")]
pub struct TrainArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Dataset ID (from dataset-import)
    #[arg(long)]
    pub dataset_id: Option<String>,

    /// Model architecture type
    #[arg(long, value_enum)]
    pub model_type: Option<ModelType>,

    /// Training budget in node hours (defaults to the model type's preset)
    #[arg(long)]
    pub budget_hours: Option<u32>,

    /// Show model evaluation metrics after training
    #[arg(long)]
    pub evaluate: bool,
}

impl TrainArgs {
    pub fn resolve(&self) -> Result<TrainSettings> {
        let file = self.common.load_file_config()?;
        let mut settings = TrainSettings::from_file_config(&file);
        self.common.apply(&mut settings.platform, &file);

        if let Some(model_type) = self.model_type {
            settings.model_type = model_type;
            if file.training.budget_hours.is_none() {
                settings.budget_hours = model_type.preset().node_hours;
            }
        }
        if let Some(hours) = self.budget_hours {
            settings.budget_hours = hours;
        }
        settings.dataset_id = self.dataset_id.clone();
        settings.evaluate = self.evaluate;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "deploy-model")]
#[command(about = "Deploy the elephant detection model to a Vertex AI endpoint")]
pub struct DeployArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Model ID to deploy
    #[arg(long)]
    pub model_id: Option<String>,

    /// Model type (used to load model info)
    #[arg(long, value_enum)]
    pub model_type: Option<ModelType>,

    /// Endpoint display name
    #[arg(long)]
    pub endpoint_name: Option<String>,

    /// Deployment configuration size
    #[arg(long, value_enum)]
    pub deployment_size: Option<DeploymentSize>,

    /// Test the endpoint after deployment
    #[arg(long)]
    pub test: bool,

    /// Where to write the PHP configuration, relative to the working directory
    #[arg(long)]
    pub php_config_path: Option<String>,
}

impl DeployArgs {
    pub fn resolve(&self) -> Result<DeploySettings> {
        let file = self.common.load_file_config()?;
        let mut settings = DeploySettings::from_file_config(&file);
        self.common.apply(&mut settings.platform, &file);

        if let Some(model_type) = self.model_type {
            settings.model_type = model_type;
        }
        if let Some(name) = &self.endpoint_name {
            settings.endpoint_name = name.clone();
        }
        if let Some(size) = self.deployment_size {
            settings.deployment_size = size;
        }
        if let Some(path) = &self.php_config_path {
            settings.php_config_path = path.clone();
        }
        settings.model_id = self.model_id.clone();
        settings.test = self.test;
        Ok(settings)
    }
}
