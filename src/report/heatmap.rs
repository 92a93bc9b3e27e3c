use std::fs;
use std::io;

use plotly::{HeatMap, Plot};

use crate::metrics::binary::BinaryMetricsResult;
use crate::metrics::category::LabelMatrix;

/// Render a confusion-matrix heatmap as a self-contained HTML page. Rows of
/// `counts` follow the true label, columns the predicted label.
pub fn confusion_heatmap_html(labels: &[String], counts: &[Vec<u64>], title: &str) -> String {
    let x: Vec<String> = labels.to_vec();
    let y: Vec<String> = labels.to_vec();
    let z: Vec<Vec<u64>> = counts.to_vec();

    let trace = HeatMap::new(x, y, z).name(title);
    let mut plot = Plot::new();
    plot.add_trace(trace);
    let plot_html = plot.to_inline_html(None);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
</head>
<body>
<h2 style="font-family:sans-serif;">{title}</h2>
{plot_html}
</body>
</html>
"#,
        title = title,
        plot_html = plot_html
    )
}

pub fn save_heatmap_html(
    path: &str,
    labels: &[String],
    counts: &[Vec<u64>],
    title: &str,
) -> io::Result<()> {
    fs::write(path, confusion_heatmap_html(labels, counts, title))
}

/// Heatmap of a raw label-space matrix.
pub fn save_label_matrix_html(path: &str, matrix: &LabelMatrix, title: &str) -> io::Result<()> {
    save_heatmap_html(path, &matrix.labels, &matrix.counts, title)
}

/// Heatmap of a 2x2 binary matrix with the 0/1 class axes.
pub fn save_binary_heatmap_html(
    path: &str,
    result: &BinaryMetricsResult,
    title: &str,
) -> io::Result<()> {
    let labels = vec!["0".to_string(), "1".to_string()];
    let counts: Vec<Vec<u64>> = result
        .confusion_matrix
        .iter()
        .map(|row| row.to_vec())
        .collect();
    save_heatmap_html(path, &labels, &counts, title)
}
