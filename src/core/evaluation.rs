//! Reading the classification metrics Vertex AI attaches to a model evaluation.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationSummary {
    pub au_prc: Option<f64>,
    pub au_roc: Option<f64>,
    pub log_loss: Option<f64>,
    pub confusion_matrix: Option<ConfusionMatrix>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl EvaluationSummary {
    pub fn from_metrics(metrics: &Value) -> Self {
        Self {
            au_prc: metrics.get("auPrc").and_then(Value::as_f64),
            au_roc: metrics.get("auRoc").and_then(Value::as_f64),
            log_loss: metrics.get("logLoss").and_then(Value::as_f64),
            confusion_matrix: metrics.get("confusionMatrix").and_then(ConfusionMatrix::from_value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Human-readable lines, one metric per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(v) = self.au_prc {
            lines.push(format!("AU-PRC: {:.4}", v));
        }
        if let Some(v) = self.au_roc {
            lines.push(format!("AU-ROC: {:.4}", v));
        }
        if let Some(v) = self.log_loss {
            lines.push(format!("Log Loss: {:.4}", v));
        }
        if let Some(matrix) = &self.confusion_matrix {
            lines.push("Confusion Matrix (rows = actual, columns = predicted):".to_string());
            lines.push(format!("  {:>12} {}", "", matrix.labels.join(" | ")));
            for (label, row) in matrix.labels.iter().zip(&matrix.rows) {
                let cells: Vec<String> = row.iter().map(|c| format!("{}", c)).collect();
                lines.push(format!("  {:>12} {}", label, cells.join(" | ")));
            }
        }
        lines
    }
}

impl ConfusionMatrix {
    fn from_value(value: &Value) -> Option<Self> {
        let labels: Vec<String> = value
            .get("annotationSpecs")?
            .as_array()?
            .iter()
            .map(|spec| {
                spec.get("displayName")
                    .and_then(Value::as_str)
                    .unwrap_or("?")
                    .to_string()
            })
            .collect();

        let rows: Vec<Vec<f64>> = value
            .get("rows")?
            .as_array()?
            .iter()
            .map(|row| {
                row.as_array()
                    .map(|cells| cells.iter().filter_map(Value::as_f64).collect())
                    .unwrap_or_default()
            })
            .collect();

        Some(Self { labels, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_metrics() {
        let summary = EvaluationSummary::from_metrics(&json!({
            "auPrc": 0.98765,
            "auRoc": 0.99,
            "logLoss": 0.05,
            "confusionMatrix": {
                "annotationSpecs": [{"id": "1", "displayName": "forest"}, {"id": "2", "displayName": "savanna"}],
                "rows": [[40, 2], [1, 57]]
            }
        }));

        assert_eq!(summary.au_prc, Some(0.98765));
        let matrix = summary.confusion_matrix.as_ref().unwrap();
        assert_eq!(matrix.labels, vec!["forest", "savanna"]);
        assert_eq!(matrix.rows[1], vec![1.0, 57.0]);

        let lines = summary.lines();
        assert_eq!(lines[0], "AU-PRC: 0.9877");
        assert_eq!(lines[2], "Log Loss: 0.0500");
        assert!(lines.iter().any(|l| l.contains("savanna") && l.contains("57")));
    }

    #[test]
    fn test_missing_metrics_are_skipped() {
        let summary = EvaluationSummary::from_metrics(&json!({"auPrc": 0.5}));
        assert_eq!(summary.lines(), vec!["AU-PRC: 0.5000".to_string()]);
        assert!(!summary.is_empty());

        assert!(EvaluationSummary::from_metrics(&json!(null)).is_empty());
    }
}
