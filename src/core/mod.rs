pub mod artifacts;
pub mod evaluation;
pub mod handoff;
pub mod manifest;
pub mod presets;
pub mod stage;

pub use crate::domain::model::{DatasetRecord, EndpointRecord, ManifestEntry, ModelRecord};
pub use crate::domain::ports::{MlPlatform, ObjectStore, Storage};
pub use crate::utils::error::Result;
