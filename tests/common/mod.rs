#![allow(dead_code)]

use httpmock::MockServer;
use std::time::Duration;
use tempfile::TempDir;
use vertex_automl::PlatformSettings;

pub const PROJECT: &str = "test-project";
pub const PARENT: &str = "projects/test-project/locations/us-central1";

/// Platform settings pointed at the mock server, with a fast poll and a temp work dir.
pub fn platform_settings(server: &MockServer, work_dir: &TempDir) -> PlatformSettings {
    let mut settings = PlatformSettings::new(PROJECT, "us-central1");
    settings.api_endpoint = server.base_url();
    settings.storage_endpoint = server.base_url();
    settings.access_token = Some("test-token".to_string());
    settings.poll_interval = Duration::from_millis(5);
    settings.work_dir = work_dir.path().to_str().unwrap().to_string();
    settings
}

pub fn write_json(dir: &TempDir, file: &str, value: &serde_json::Value) {
    std::fs::write(dir.path().join(file), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

pub fn read_json(dir: &TempDir, file: &str) -> serde_json::Value {
    let data = std::fs::read(dir.path().join(file)).unwrap();
    serde_json::from_slice(&data).unwrap()
}
