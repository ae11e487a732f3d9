//! Fixed training presets and deployment profiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TRAINING_FRACTION: f64 = 0.8;
pub const VALIDATION_FRACTION: f64 = 0.1;
pub const TEST_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Efficientnet,
    Mobilenet,
    Automl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPreset {
    pub display_name: &'static str,
    /// Platform model type enum value.
    pub model_type: &'static str,
    pub node_hours: u32,
    pub description: &'static str,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Efficientnet => "efficientnet",
            ModelType::Mobilenet => "mobilenet",
            ModelType::Automl => "automl",
        }
    }

    pub fn preset(&self) -> TrainingPreset {
        match self {
            ModelType::Efficientnet => TrainingPreset {
                display_name: "EfficientNet-B4 Elephant Detector",
                model_type: "CLOUD_HIGH_ACCURACY_1",
                node_hours: 8,
                description: "High accuracy model using EfficientNet architecture",
            },
            ModelType::Mobilenet => TrainingPreset {
                display_name: "MobileNet Elephant Detector",
                model_type: "CLOUD_LOW_LATENCY_1",
                node_hours: 4,
                description: "Fast inference model optimized for real-time detection",
            },
            ModelType::Automl => TrainingPreset {
                display_name: "AutoML Elephant Detector",
                model_type: "CLOUD",
                node_hours: 8,
                description: "AutoML optimized model with automatic architecture selection",
            },
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Efficientnet
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "efficientnet" => Ok(ModelType::Efficientnet),
            "mobilenet" => Ok(ModelType::Mobilenet),
            "automl" => Ok(ModelType::Automl),
            other => Err(format!(
                "unknown model type '{}' (expected efficientnet, mobilenet or automl)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DeploymentSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentProfile {
    pub machine_type: &'static str,
    pub accelerator_type: Option<&'static str>,
    pub accelerator_count: u32,
    pub min_replica_count: u32,
    pub max_replica_count: u32,
    pub description: &'static str,
}

impl DeploymentSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentSize::Small => "small",
            DeploymentSize::Medium => "medium",
            DeploymentSize::Large => "large",
        }
    }

    pub fn profile(&self) -> DeploymentProfile {
        match self {
            DeploymentSize::Small => DeploymentProfile {
                machine_type: "n1-standard-2",
                accelerator_type: None,
                accelerator_count: 0,
                min_replica_count: 1,
                max_replica_count: 2,
                description: "Small deployment for testing (2 vCPUs, 7.5 GB RAM)",
            },
            DeploymentSize::Medium => DeploymentProfile {
                machine_type: "n1-standard-4",
                accelerator_type: None,
                accelerator_count: 0,
                min_replica_count: 1,
                max_replica_count: 3,
                description: "Medium deployment for moderate traffic (4 vCPUs, 15 GB RAM)",
            },
            DeploymentSize::Large => DeploymentProfile {
                machine_type: "n1-standard-8",
                accelerator_type: Some("NVIDIA_TESLA_T4"),
                accelerator_count: 1,
                min_replica_count: 1,
                max_replica_count: 5,
                description: "Large deployment with GPU for high performance",
            },
        }
    }
}

impl Default for DeploymentSize {
    fn default() -> Self {
        DeploymentSize::Small
    }
}

impl fmt::Display for DeploymentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(DeploymentSize::Small),
            "medium" => Ok(DeploymentSize::Medium),
            "large" => Ok(DeploymentSize::Large),
            other => Err(format!(
                "unknown deployment size '{}' (expected small, medium or large)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_profile() {
        let profile = DeploymentSize::Small.profile();
        assert_eq!(profile.machine_type, "n1-standard-2");
        assert_eq!(profile.accelerator_type, None);
        assert_eq!(profile.accelerator_count, 0);
        assert_eq!((profile.min_replica_count, profile.max_replica_count), (1, 2));
    }

    #[test]
    fn test_medium_profile() {
        let profile = DeploymentSize::Medium.profile();
        assert_eq!(profile.machine_type, "n1-standard-4");
        assert_eq!(profile.accelerator_type, None);
        assert_eq!((profile.min_replica_count, profile.max_replica_count), (1, 3));
    }

    #[test]
    fn test_large_profile_has_gpu() {
        let profile = DeploymentSize::Large.profile();
        assert_eq!(profile.machine_type, "n1-standard-8");
        assert_eq!(profile.accelerator_type, Some("NVIDIA_TESLA_T4"));
        assert_eq!(profile.accelerator_count, 1);
        assert_eq!((profile.min_replica_count, profile.max_replica_count), (1, 5));
    }

    #[test]
    fn test_size_keywords() {
        assert_eq!("small".parse::<DeploymentSize>(), Ok(DeploymentSize::Small));
        assert_eq!("LARGE".parse::<DeploymentSize>(), Ok(DeploymentSize::Large));
        assert!("huge".parse::<DeploymentSize>().is_err());
        assert_eq!(DeploymentSize::Medium.to_string(), "medium");
    }

    #[test]
    fn test_training_presets() {
        assert_eq!(ModelType::Efficientnet.preset().model_type, "CLOUD_HIGH_ACCURACY_1");
        assert_eq!(ModelType::Mobilenet.preset().model_type, "CLOUD_LOW_LATENCY_1");
        assert_eq!(ModelType::Mobilenet.preset().node_hours, 4);
        assert_eq!(ModelType::Automl.preset().model_type, "CLOUD");
        assert_eq!("mobilenet".parse::<ModelType>(), Ok(ModelType::Mobilenet));
    }

    #[test]
    fn test_split_sums_to_one() {
        let total = TRAINING_FRACTION + VALIDATION_FRACTION + TEST_FRACTION;
        assert!((total - 1.0).abs() < f64::EPSILON * 4.0);
    }
}
