use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Instant;

/// What a finished stage reports back to the operator.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub headline: String,
    pub details: Vec<(String, String)>,
    pub files: Vec<String>,
    pub next_step: Option<String>,
}

impl StageReport {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Default::default()
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn next_step(mut self, step: impl Into<String>) -> Self {
        self.next_step = Some(step.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn title(&self) -> &str;
    async fn execute(&self) -> Result<StageReport>;
}

pub struct StageRunner<S: Stage> {
    stage: S,
}

impl<S: Stage> StageRunner<S> {
    pub fn new(stage: S) -> Self {
        Self { stage }
    }

    pub async fn run(&self) -> Result<StageReport> {
        let rule = "=".repeat(60);
        println!("{}", rule);
        println!("🐘 ELEPHANT DETECTION - {}", self.stage.title());
        println!("{}", rule);

        let started = Instant::now();
        let result = self.stage.execute().await;
        let elapsed = started.elapsed();

        match &result {
            Ok(report) => {
                tracing::info!("⏱️ {} finished in {:?}", self.stage.title(), elapsed);
                print_report(report, &rule);
            }
            Err(e) => {
                tracing::debug!(
                    "{} stopped after {:?}: {}",
                    self.stage.title(),
                    elapsed,
                    e
                );
            }
        }

        result
    }
}

fn print_report(report: &StageReport, rule: &str) {
    println!();
    println!("{}", rule);
    println!("✅ {}", report.headline);
    println!("{}", rule);
    for (key, value) in &report.details {
        println!("{}: {}", key, value);
    }
    if !report.files.is_empty() {
        println!("\nFiles written:");
        for file in &report.files {
            println!("  - {}", file);
        }
    }
    if let Some(step) = &report.next_step {
        println!("\n{}", step);
    }
}
