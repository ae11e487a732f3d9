mod common;

use common::{platform_settings, read_json, PARENT};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use vertex_automl::{
    AutomlError, DatasetImportStage, ImportSettings, PlatformContext, StageRunner,
};

fn import_settings(server: &MockServer, dir: &TempDir) -> ImportSettings {
    let mut settings = ImportSettings::default();
    settings.platform = platform_settings(server, dir);
    settings.bucket = "test-bucket".to_string();
    settings
}

#[tokio::test]
async fn test_import_creates_dataset_from_bucket_listing() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let settings = import_settings(&server, &temp_dir);

    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/v1/{}/datasets", PARENT))
            .query_param("filter", "display_name=\"elephant-detection-dataset\"")
            .header("Authorization", "Bearer test-token");
        then.status(200).json_body(json!({}));
    });
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/storage/v1/b/test-bucket/o")
            .query_param("prefix", "Elephant_Dataset_Finalized");
        then.status(200).json_body(json!({
            "items": [
                {"name": "Elephant_Dataset_Finalized/forest/IMG_001.JPG", "bucket": "test-bucket"},
                {"name": "Elephant_Dataset_Finalized/savanna/IMG_002.png", "bucket": "test-bucket"},
                {"name": "Elephant_Dataset_Finalized/README.md", "bucket": "test-bucket"}
            ]
        }));
    });
    let upload = server.mock(|when, then| {
        when.method(POST)
            .path("/upload/storage/v1/b/test-bucket/o")
            .query_param("uploadType", "media")
            .query_param("name", "import_files/import_data.jsonl")
            .body_contains("gs://test-bucket/Elephant_Dataset_Finalized/forest/IMG_001.JPG");
        then.status(200)
            .json_body(json!({"name": "import_files/import_data.jsonl", "bucket": "test-bucket"}));
    });
    let create_op = format!("{}/datasets/42/operations/1", PARENT);
    let create = server.mock(|when, then| {
        when.method(POST).path(format!("/v1/{}/datasets", PARENT));
        then.status(200).json_body(json!({"name": create_op, "done": false}));
    });
    let create_poll = server.mock(|when, then| {
        when.method(GET).path(format!("/v1/{}", create_op));
        then.status(200).json_body(json!({
            "name": create_op,
            "done": true,
            "response": {
                "name": format!("{}/datasets/42", PARENT),
                "displayName": "elephant-detection-dataset"
            }
        }));
    });
    let import = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1/{}/datasets/42:import", PARENT))
            .body_contains("gs://test-bucket/import_files/import_data.jsonl");
        then.status(200).json_body(json!({"name": "import-op", "done": true}));
    });

    let ctx = PlatformContext::connect(&settings.platform).unwrap();
    let stage = DatasetImportStage::new(settings, ctx.objects, ctx.vertex, ctx.storage);
    let report = StageRunner::new(stage).run().await.unwrap();

    lookup.assert();
    listing.assert();
    upload.assert();
    create.assert();
    create_poll.assert();
    import.assert();
    assert_eq!(report.get("Dataset ID"), Some("42"));

    let manifest = std::fs::read_to_string(temp_dir.path().join("import_data.jsonl")).unwrap();
    let lines: Vec<&str> = manifest.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(
        first["classificationAnnotation"]["displayName"],
        json!("forest")
    );

    let info = read_json(&temp_dir, "dataset_info.json");
    assert_eq!(info["dataset_id"], json!("42"));
    assert_eq!(info["project_id"], json!("test-project"));
    assert_eq!(info["resource_name"], json!(format!("{}/datasets/42", PARENT)));
}

#[tokio::test]
async fn test_import_reuses_newest_existing_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let settings = import_settings(&server, &temp_dir);

    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/v1/{}/datasets", PARENT))
            .query_param("orderBy", "create_time desc");
        then.status(200).json_body(json!({
            "datasets": [
                {"name": format!("{}/datasets/7", PARENT), "displayName": "elephant-detection-dataset"},
                {"name": format!("{}/datasets/3", PARENT), "displayName": "elephant-detection-dataset"}
            ]
        }));
    });
    let listing = server.mock(|when, then| {
        when.method(GET).path("/storage/v1/b/test-bucket/o");
        then.status(200).json_body(json!({}));
    });

    let ctx = PlatformContext::connect(&settings.platform).unwrap();
    let stage = DatasetImportStage::new(settings, ctx.objects, ctx.vertex, ctx.storage);
    StageRunner::new(stage).run().await.unwrap();

    listing.assert_hits(0);
    let info = read_json(&temp_dir, "dataset_info.json");
    assert_eq!(info["dataset_id"], json!("7"));
}

#[tokio::test]
async fn test_import_with_empty_bucket_stops_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let settings = import_settings(&server, &temp_dir);

    server.mock(|when, then| {
        when.method(GET).path(format!("/v1/{}/datasets", PARENT));
        then.status(200).json_body(json!({"datasets": []}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/storage/v1/b/test-bucket/o");
        then.status(200)
            .json_body(json!({"items": [{"name": "Elephant_Dataset_Finalized/notes.txt"}]}));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path(format!("/v1/{}/datasets", PARENT));
        then.status(500);
    });

    let ctx = PlatformContext::connect(&settings.platform).unwrap();
    let stage = DatasetImportStage::new(settings, ctx.objects, ctx.vertex, ctx.storage);
    let err = StageRunner::new(stage).run().await.unwrap_err();

    assert!(matches!(err, AutomlError::NoImagesFound { .. }));
    assert_eq!(err.exit_code(), 0);
    create.assert_hits(0);
    assert!(!temp_dir.path().join("dataset_info.json").exists());
}

#[tokio::test]
async fn test_import_reports_permission_errors() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let settings = import_settings(&server, &temp_dir);

    server.mock(|when, then| {
        when.method(GET).path(format!("/v1/{}/datasets", PARENT));
        then.status(403).json_body(json!({
            "error": {"code": 403, "message": "Permission 'aiplatform.datasets.list' denied", "status": "PERMISSION_DENIED"}
        }));
    });

    let ctx = PlatformContext::connect(&settings.platform).unwrap();
    let stage = DatasetImportStage::new(settings, ctx.objects, ctx.vertex, ctx.storage);
    let err = StageRunner::new(stage).run().await.unwrap_err();

    match &err {
        AutomlError::PlatformError { status, message, .. } => {
            assert_eq!(*status, 403);
            assert!(message.contains("aiplatform.datasets.list"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.exit_code(), 1);
}
