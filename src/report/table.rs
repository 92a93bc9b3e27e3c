use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use crate::metrics::binary::BinaryMetricsResult;
use crate::metrics::category::{LabelMatrix, OverallMetrics, OVERALL_KEY};
use crate::utils::format_percent;

/// Four-outcome breakdown of a binary confusion matrix.
pub fn matrix_breakdown(result: &BinaryMetricsResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Outcome", "Count", "Description"]);
    table.add_row(vec![
        "True Negatives (TN)".to_string(),
        result.true_negatives().to_string(),
        "Correctly rejected".to_string(),
    ]);
    table.add_row(vec![
        "False Positives (FP)".to_string(),
        result.false_positives().to_string(),
        "Incorrectly accepted".to_string(),
    ]);
    table.add_row(vec![
        "False Negatives (FN)".to_string(),
        result.false_negatives().to_string(),
        "Incorrectly rejected".to_string(),
    ]);
    table.add_row(vec![
        "True Positives (TP)".to_string(),
        result.true_positives().to_string(),
        "Correctly accepted".to_string(),
    ]);
    table
}

/// Scalar metric summary, percentages like the dashboard cards.
pub fn metric_summary(result: &BinaryMetricsResult, beta: f64) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Sample Count".to_string(), result.total().to_string()]);
    table.add_row(vec!["Accuracy".to_string(), format_percent(result.accuracy)]);
    table.add_row(vec!["Precision".to_string(), format_percent(result.precision)]);
    table.add_row(vec!["Recall".to_string(), format_percent(result.recall)]);
    table.add_row(vec![
        format!("F{:.1}-Score", beta),
        format_percent(result.fbeta_score),
    ]);
    table
}

/// Macro-averaged summary of the whole-dataset view.
pub fn overall_summary(overall: &OverallMetrics, beta: f64) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric".to_string(), format!("Value ({})", OVERALL_KEY)]);
    table.add_row(vec![
        "Sample Count".to_string(),
        overall.matrix.total().to_string(),
    ]);
    table.add_row(vec![
        "Agreement".to_string(),
        format_percent(overall.matrix.agreement()),
    ]);
    table.add_row(vec![
        "Precision (macro)".to_string(),
        format_percent(overall.precision),
    ]);
    table.add_row(vec![
        "Recall (macro)".to_string(),
        format_percent(overall.recall),
    ]);
    table.add_row(vec![
        format!("F{:.1}-Score (macro)", beta),
        format_percent(overall.fbeta_score),
    ]);
    table
}

/// Raw count matrix, truth labels down the side and predicted labels across.
pub fn label_matrix(matrix: &LabelMatrix) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["True \\ Predicted".to_string()];
    header.extend(matrix.labels.iter().cloned());
    table.set_header(header);

    for (label, row) in matrix.labels.iter().zip(matrix.counts.iter()) {
        let mut cells = vec![label.clone()];
        cells.extend(row.iter().map(|c| c.to_string()));
        table.add_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::binary::compute_binary_metrics;

    fn result() -> BinaryMetricsResult {
        let truth = [true, true, false, false];
        let prediction = [true, false, false, true];
        compute_binary_metrics(&truth, &prediction, 1.0).unwrap()
    }

    #[test]
    fn breakdown_lists_all_four_outcomes() {
        let rendered = matrix_breakdown(&result()).to_string();
        for outcome in ["TN", "FP", "FN", "TP"] {
            assert!(rendered.contains(outcome), "missing {}", outcome);
        }
    }

    #[test]
    fn summary_echoes_beta_and_percentages() {
        let rendered = metric_summary(&result(), 2.0).to_string();
        assert!(rendered.contains("F2.0-Score"));
        assert!(rendered.contains("50.0%"));
        assert!(rendered.contains("Sample Count"));
    }

    #[test]
    fn label_matrix_shows_every_label() {
        let matrix = LabelMatrix {
            labels: vec!["a".to_string(), "b".to_string()],
            counts: vec![vec![3, 1], vec![0, 2]],
        };
        let rendered = label_matrix(&matrix).to_string();
        assert!(rendered.contains('a'));
        assert!(rendered.contains('b'));
        assert!(rendered.contains('3'));
    }
}
