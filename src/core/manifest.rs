//! Import manifest construction: one JSON object per image, newline-delimited.

use crate::domain::model::{ClassificationAnnotation, ManifestEntry, StorageObject};
use crate::utils::error::Result;

pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".bmp"];
pub const DEFAULT_LABEL: &str = "elephant";

pub fn is_image(object_name: &str) -> bool {
    let lower = object_name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Label is the parent folder, e.g. `Dataset/savanna/img1.jpg` -> `savanna`.
/// Objects sitting directly under the dataset folder get `default_label`.
pub fn infer_label<'a>(object_name: &'a str, default_label: &'a str) -> &'a str {
    let parts: Vec<&str> = object_name.split('/').collect();
    if parts.len() > 2 {
        parts[parts.len() - 2]
    } else {
        default_label
    }
}

pub fn gcs_uri(bucket: &str, object_name: &str) -> String {
    format!("gs://{}/{}", bucket, object_name)
}

pub fn build_manifest(
    bucket: &str,
    objects: &[StorageObject],
    default_label: &str,
) -> Vec<ManifestEntry> {
    objects
        .iter()
        .filter(|object| is_image(&object.name))
        .map(|object| ManifestEntry {
            image_gcs_uri: gcs_uri(bucket, &object.name),
            classification_annotation: ClassificationAnnotation {
                display_name: infer_label(&object.name, default_label).to_string(),
            },
        })
        .collect()
}

pub fn to_jsonl(entries: &[ManifestEntry]) -> Result<String> {
    let mut output = String::new();
    for entry in entries {
        output.push_str(&serde_json::to_string(entry)?);
        output.push('\n');
    }
    Ok(output)
}
