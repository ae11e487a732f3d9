pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{GcsObjectStore, LocalStorage, VertexClient};
pub use app::stages::{DatasetImportStage, DeployModelStage, TrainModelStage};
pub use app::PlatformContext;
pub use config::{DeploySettings, ImportSettings, PlatformSettings, TrainSettings};
pub use core::stage::{Stage, StageReport, StageRunner};
pub use utils::error::{AutomlError, Result};
