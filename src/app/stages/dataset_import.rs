use crate::app::stages::log_platform;
use crate::config::ImportSettings;
use crate::core::handoff::{save_json, DatasetInfo, DATASET_INFO_FILE};
use crate::core::manifest::{build_manifest, gcs_uri, to_jsonl};
use crate::core::stage::{Stage, StageReport};
use crate::domain::model::DatasetRecord;
use crate::domain::ports::{MlPlatform, ObjectStore, Storage};
use crate::utils::error::{AutomlError, Result};
use async_trait::async_trait;

pub const MANIFEST_FILE: &str = "import_data.jsonl";
pub const MANIFEST_PREFIX: &str = "import_files";

/// Stage 1: manifest from bucket listing, then reuse or create the managed dataset.
pub struct DatasetImportStage<O: ObjectStore, P: MlPlatform, S: Storage> {
    settings: ImportSettings,
    objects: O,
    platform: P,
    storage: S,
}

impl<O: ObjectStore, P: MlPlatform, S: Storage> DatasetImportStage<O, P, S> {
    pub fn new(settings: ImportSettings, objects: O, platform: P, storage: S) -> Self {
        Self {
            settings,
            objects,
            platform,
            storage,
        }
    }

    async fn find_existing(&self) -> Result<Option<DatasetRecord>> {
        tracing::info!("🔍 Checking for existing dataset: {}", self.settings.dataset_name);
        let datasets = self.platform.find_datasets(&self.settings.dataset_name).await?;

        match datasets.into_iter().next() {
            Some(dataset) => {
                tracing::info!("✓ Found existing dataset");
                Ok(Some(dataset))
            }
            None => {
                tracing::info!("  No existing dataset found");
                Ok(None)
            }
        }
    }

    /// Writes the manifest locally, uploads it and returns its `gs://` URI.
    async fn create_import_file(&self) -> Result<String> {
        let bucket = &self.settings.bucket;
        let prefix = &self.settings.dataset_path;
        tracing::info!("📦 Creating import file from {}", gcs_uri(bucket, prefix));

        let objects = self.objects.list_objects(bucket, prefix).await?;
        let entries = build_manifest(bucket, &objects, &self.settings.default_label);
        tracing::debug!(
            "{} of {} objects are images",
            entries.len(),
            objects.len()
        );

        if entries.is_empty() {
            return Err(AutomlError::NoImagesFound {
                uri: gcs_uri(bucket, prefix),
            });
        }

        let jsonl = to_jsonl(&entries)?;
        self.storage.write_file(MANIFEST_FILE, jsonl.as_bytes()).await?;
        tracing::info!("✓ Created import file: {}", MANIFEST_FILE);
        tracing::info!("  Total images found: {}", entries.len());

        let object_name = format!("{}/{}", MANIFEST_PREFIX, MANIFEST_FILE);
        let uri = self
            .objects
            .upload_object(bucket, &object_name, jsonl.into_bytes(), "application/jsonl")
            .await?;
        tracing::info!("✓ Uploaded import file to: {}", uri);

        Ok(uri)
    }

    async fn create_and_import(&self) -> Result<DatasetRecord> {
        let manifest_uri = self.create_import_file().await?;

        tracing::info!("🗂️ Creating Vertex AI dataset: {}", self.settings.dataset_name);
        let dataset = self
            .platform
            .create_image_dataset(&self.settings.dataset_name)
            .await?;
        tracing::info!("✓ Dataset created successfully");
        tracing::info!("  Resource name: {}", dataset.name);

        tracing::info!("📥 Importing data into dataset...");
        tracing::info!("  Import file: {}", manifest_uri);
        self.platform.import_manifest(&dataset, &manifest_uri).await?;
        tracing::info!("✓ Data import completed successfully");

        Ok(dataset)
    }
}

#[async_trait]
impl<O: ObjectStore, P: MlPlatform, S: Storage> Stage for DatasetImportStage<O, P, S> {
    fn title(&self) -> &str {
        "VERTEX AI DATASET IMPORT"
    }

    async fn execute(&self) -> Result<StageReport> {
        log_platform(&self.settings.platform);

        let existing = if self.settings.force_create {
            tracing::info!("⚠️ --force-create set, skipping existing dataset lookup");
            None
        } else {
            self.find_existing().await?
        };

        let dataset = match existing {
            Some(dataset) => dataset,
            None => self.create_and_import().await?,
        };

        let info = DatasetInfo {
            dataset_id: dataset.id().to_string(),
            display_name: dataset.display_name.clone(),
            resource_name: dataset.name.clone(),
            project_id: self.settings.platform.project_id.clone(),
            location: self.settings.platform.location.clone(),
        };
        save_json(&self.storage, DATASET_INFO_FILE, &info).await?;
        tracing::info!("✓ Dataset info saved to: {}", DATASET_INFO_FILE);

        Ok(StageReport::new("DATASET READY FOR TRAINING")
            .detail("Dataset ID", &info.dataset_id)
            .detail("Display Name", &info.display_name)
            .detail("Resource Name", &info.resource_name)
            .file(DATASET_INFO_FILE)
            .next_step(format!(
                "Use this dataset ID for training: {}",
                info.dataset_id
            )))
    }
}
