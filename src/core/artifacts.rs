//! Text files generated next to `endpoint_config.json` for the web backend and for operators.

use crate::core::handoff::EndpointConfig;

pub const DEFAULT_PHP_CONFIG_PATH: &str = "../vertex_ai_config.php";
pub const PREDICTION_EXAMPLE_FILE: &str = "predict_example.sh";

pub fn prediction_uri(location: &str, endpoint_resource_name: &str) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/v1/{}:predict",
        location, endpoint_resource_name
    )
}

fn php_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

pub fn render_php_config(config: &EndpointConfig) -> String {
    let endpoint_uri = php_quote(&config.endpoint_uri);
    let project_id = php_quote(&config.project_id);
    let location = php_quote(&config.location);

    format!(
        r#"<?php
/**
 * Vertex AI Endpoint Configuration
 * Auto-generated by deploy-model
 */

define('VERTEX_AI_ENDPOINT', {endpoint_uri});
define('VERTEX_AI_PROJECT_ID', {project_id});
define('VERTEX_AI_LOCATION', {location});
define('VERTEX_AI_MODEL_NAME', {model_name});

// Endpoint details
$endpoint_config = [
    'endpoint_id' => {endpoint_id},
    'endpoint_resource_name' => {endpoint_resource_name},
    'endpoint_uri' => {endpoint_uri},
    'model_id' => {model_id},
    'project_id' => {project_id},
    'location' => {location}
];
"#,
        model_name = php_quote(&config.model_display_name),
        endpoint_id = php_quote(&config.endpoint_id),
        endpoint_resource_name = php_quote(&config.endpoint_resource_name),
        model_id = php_quote(&config.model_id),
    )
}

/// Static; the script reads everything it needs from `endpoint_config.json` at run time.
pub const PREDICTION_EXAMPLE: &str = r#"#!/usr/bin/env bash
# Example: classify one image with the deployed endpoint.
# Usage: ./predict_example.sh test_elephant.jpg
# Requires: gcloud, jq, base64, curl
set -euo pipefail

IMAGE_PATH="${1:-test_elephant.jpg}"
CONFIG="${ENDPOINT_CONFIG:-endpoint_config.json}"

ENDPOINT_URI="$(jq -r '.endpoint_uri' "$CONFIG")"
TOKEN="$(gcloud auth print-access-token)"
CONTENT="$(base64 < "$IMAGE_PATH" | tr -d '\n')"

REQUEST="$(jq -n --arg content "$CONTENT" \
  '{instances: [{content: $content}], parameters: {confidenceThreshold: 0.5, maxPredictions: 5}}')"

RESPONSE="$(curl -sS -X POST \
  -H "Authorization: Bearer ${TOKEN}" \
  -H "Content-Type: application/json" \
  -d "$REQUEST" \
  "$ENDPOINT_URI")"

echo "Predictions:"
echo "$RESPONSE" | jq -r '
  .predictions[0] as $p
  | [$p.displayNames, $p.confidences] | transpose
  | sort_by(-.[1]) | .[:5][]
  | "  \(.[0]): \((.[1] * 10000 | round) / 100)%"'
"#;
