pub mod dataset_import;
pub mod deploy_model;
pub mod train_model;

#[cfg(test)]
pub(crate) mod testing;

pub use dataset_import::DatasetImportStage;
pub use deploy_model::DeployModelStage;
pub use train_model::TrainModelStage;

use crate::config::PlatformSettings;

/// First lines of every stage, printed under the banner.
pub(crate) fn log_platform(settings: &PlatformSettings) {
    tracing::info!("✓ Initialized Vertex AI");
    tracing::info!("  Project: {}", settings.project_id);
    tracing::info!("  Location: {}", settings.location);
}

/// `YYYYmmdd_HHMMSS` in local time, used to make display names unique per run.
pub(crate) fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub(crate) fn now_iso() -> String {
    chrono::Local::now().to_rfc3339()
}
