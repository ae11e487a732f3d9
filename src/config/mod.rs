#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::gcs::DEFAULT_STORAGE_ENDPOINT;
use crate::adapters::vertex::{default_api_endpoint, DEFAULT_POLL_INTERVAL};
use crate::core::artifacts::DEFAULT_PHP_CONFIG_PATH;
use crate::core::manifest::DEFAULT_LABEL;
use crate::core::presets::{DeploymentSize, ModelType};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_bucket_name, validate_location, validate_non_empty_string, validate_object_prefix,
    validate_path, validate_positive_number, validate_url, Validate,
};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_PROJECT_ID: &str = "pelagic-magpie-469618-k8";
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_BUCKET: &str = "prasa_bucket";
pub const DEFAULT_DATASET_PATH: &str = "Elephant_Dataset_Finalized";
pub const DEFAULT_DATASET_DISPLAY_NAME: &str = "elephant-detection-dataset";
pub const DEFAULT_ENDPOINT_DISPLAY_NAME: &str = "elephant-detection-endpoint";
pub const DEFAULT_WORK_DIR: &str = ".";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings every stage needs to reach the platform.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    pub project_id: String,
    pub location: String,
    pub api_endpoint: String,
    pub storage_endpoint: String,
    pub access_token: Option<String>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub work_dir: String,
}

impl PlatformSettings {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            project_id: project_id.into(),
            api_endpoint: default_api_endpoint(&location),
            location,
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            access_token: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            work_dir: DEFAULT_WORK_DIR.to_string(),
        }
    }

    /// Built-in defaults overlaid with the `[platform]` and `[storage]` sections.
    pub fn from_file_config(file: &TomlConfig) -> Self {
        let project_id = file
            .platform
            .project_id
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());
        let location = file
            .platform
            .location
            .clone()
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let mut settings = Self::new(project_id, location);
        if let Some(endpoint) = &file.platform.api_endpoint {
            settings.api_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &file.storage.endpoint {
            settings.storage_endpoint = endpoint.clone();
        }
        settings.access_token = file.platform.access_token.clone();
        if let Some(secs) = file.platform.poll_interval_secs {
            settings.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = file.platform.request_timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = &file.platform.work_dir {
            settings.work_dir = dir.clone();
        }
        settings
    }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_ID, DEFAULT_LOCATION)
    }
}

impl Validate for PlatformSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("project_id", &self.project_id)?;
        validate_location("location", &self.location)?;
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_url("storage_endpoint", &self.storage_endpoint)?;
        validate_path("work_dir", &self.work_dir)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub platform: PlatformSettings,
    pub bucket: String,
    pub dataset_path: String,
    pub dataset_name: String,
    pub default_label: String,
    pub force_create: bool,
}

impl ImportSettings {
    pub fn from_file_config(file: &TomlConfig) -> Self {
        Self {
            platform: PlatformSettings::from_file_config(file),
            bucket: file
                .storage
                .bucket
                .clone()
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            dataset_path: file
                .storage
                .dataset_path
                .clone()
                .unwrap_or_else(|| DEFAULT_DATASET_PATH.to_string()),
            dataset_name: file
                .dataset
                .display_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DATASET_DISPLAY_NAME.to_string()),
            default_label: file
                .dataset
                .default_label
                .clone()
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            force_create: false,
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self::from_file_config(&TomlConfig::default())
    }
}

impl Validate for ImportSettings {
    fn validate(&self) -> Result<()> {
        self.platform.validate()?;
        validate_bucket_name("bucket", &self.bucket)?;
        validate_object_prefix("dataset_path", &self.dataset_path)?;
        validate_non_empty_string("dataset_name", &self.dataset_name)?;
        validate_non_empty_string("default_label", &self.default_label)?;

        tracing::debug!("✅ Import configuration validation passed");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TrainSettings {
    pub platform: PlatformSettings,
    /// Overrides the id stored in `dataset_info.json`.
    pub dataset_id: Option<String>,
    pub model_type: ModelType,
    pub budget_hours: u32,
    pub evaluate: bool,
}

impl TrainSettings {
    pub fn from_file_config(file: &TomlConfig) -> Self {
        let model_type = file.training.model_type.unwrap_or_default();
        Self {
            platform: PlatformSettings::from_file_config(file),
            dataset_id: None,
            model_type,
            budget_hours: file
                .training
                .budget_hours
                .unwrap_or_else(|| model_type.preset().node_hours),
            evaluate: false,
        }
    }
}

impl Default for TrainSettings {
    fn default() -> Self {
        Self::from_file_config(&TomlConfig::default())
    }
}

impl Validate for TrainSettings {
    fn validate(&self) -> Result<()> {
        self.platform.validate()?;
        validate_positive_number("budget_hours", u64::from(self.budget_hours), 1)?;
        if let Some(id) = &self.dataset_id {
            validate_non_empty_string("dataset_id", id)?;
        }

        tracing::debug!("✅ Training configuration validation passed");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeploySettings {
    pub platform: PlatformSettings,
    /// Overrides the id stored in `model_info_<type>.json`.
    pub model_id: Option<String>,
    pub model_type: ModelType,
    pub endpoint_name: String,
    pub deployment_size: DeploymentSize,
    pub test: bool,
    /// Relative to the working directory.
    pub php_config_path: String,
}

impl DeploySettings {
    pub fn from_file_config(file: &TomlConfig) -> Self {
        Self {
            platform: PlatformSettings::from_file_config(file),
            model_id: None,
            model_type: file.training.model_type.unwrap_or_default(),
            endpoint_name: file
                .deployment
                .endpoint_display_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT_DISPLAY_NAME.to_string()),
            deployment_size: file.deployment.deployment_size.unwrap_or_default(),
            test: false,
            php_config_path: file
                .deployment
                .php_config_path
                .clone()
                .unwrap_or_else(|| DEFAULT_PHP_CONFIG_PATH.to_string()),
        }
    }
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self::from_file_config(&TomlConfig::default())
    }
}

impl Validate for DeploySettings {
    fn validate(&self) -> Result<()> {
        self.platform.validate()?;
        validate_non_empty_string("endpoint_name", &self.endpoint_name)?;
        validate_path("php_config_path", &self.php_config_path)?;
        if let Some(id) = &self.model_id {
            validate_non_empty_string("model_id", id)?;
        }

        tracing::debug!("✅ Deployment configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ImportSettings::default();
        assert_eq!(settings.platform.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(
            settings.platform.api_endpoint,
            "https://us-central1-aiplatform.googleapis.com"
        );
        assert_eq!(settings.bucket, "prasa_bucket");
        assert_eq!(settings.default_label, "elephant");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_location_drives_api_endpoint() {
        let file = TomlConfig::from_toml_str("[platform]\nlocation = \"europe-west4\"\n").unwrap();
        let settings = PlatformSettings::from_file_config(&file);
        assert_eq!(
            settings.api_endpoint,
            "https://europe-west4-aiplatform.googleapis.com"
        );
    }

    #[test]
    fn test_budget_defaults_to_preset_hours() {
        let file = TomlConfig::from_toml_str("[training]\nmodel_type = \"mobilenet\"\n").unwrap();
        let settings = TrainSettings::from_file_config(&file);
        assert_eq!(settings.budget_hours, 4);

        assert_eq!(TrainSettings::default().budget_hours, 8);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let mut settings = TrainSettings::default();
        settings.budget_hours = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_dataset_path_lists_whole_bucket() {
        let mut settings = ImportSettings::default();
        settings.dataset_path = String::new();
        assert!(settings.validate().is_ok());

        settings.dataset_path = "images\0".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_deploy_defaults() {
        let settings = DeploySettings::default();
        assert_eq!(settings.deployment_size, DeploymentSize::Small);
        assert_eq!(settings.php_config_path, "../vertex_ai_config.php");
        assert_eq!(settings.endpoint_name, "elephant-detection-endpoint");
    }
}
