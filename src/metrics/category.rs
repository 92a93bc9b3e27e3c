use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::data::columnar::{ColumnError, LabelTable};
use crate::metrics::binary::{compute_binary_metrics, BinaryMetricsResult, InvalidInputError};
use crate::utils;

/// Key under which the unpartitioned dataset is reported.
pub const OVERALL_KEY: &str = "overall";

#[derive(Debug, Error)]
#[error("no rows match group '{0}'")]
pub struct EmptyGroupError(pub String);

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error(transparent)]
    Input(#[from] InvalidInputError),
    #[error(transparent)]
    EmptyGroup(#[from] EmptyGroupError),
}

/// Raw count matrix over the original label space: `counts[truth][pred]`,
/// both axes ordered like `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl LabelMatrix {
    fn from_columns(truth: &[String], prediction: &[String], labels: &[String]) -> Self {
        let index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();
        let mut counts = vec![vec![0u64; labels.len()]; labels.len()];
        for (t, p) in truth.iter().zip(prediction.iter()) {
            if let (Some(&i), Some(&j)) = (index.get(t.as_str()), index.get(p.as_str())) {
                counts[i][j] += 1;
            }
        }
        Self {
            labels: labels.to_vec(),
            counts,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Fraction of rows where prediction agrees with truth. Kept on the raw
    /// matrix: accuracy is never macro-averaged over label values.
    pub fn agreement(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let diagonal: u64 = (0..self.labels.len()).map(|i| self.counts[i][i]).sum();
        diagonal as f64 / total as f64
    }
}

/// One-vs-rest metrics for a single label value of the overall view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMetrics {
    pub label: String,
    pub metrics: BinaryMetricsResult,
}

/// Whole-dataset view: raw count matrix over the original label space next
/// to macro-averaged one-vs-rest scalars. Both views describe the same rows
/// and are reported together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallMetrics {
    pub matrix: LabelMatrix,
    pub precision: f64,
    pub recall: f64,
    pub fbeta_score: f64,
    pub per_label: Vec<LabelMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub group: String,
    pub sample_count: usize,
    pub metrics: BinaryMetricsResult,
}

/// Result of one partitioned computation. Freshly allocated per call; the
/// overall entry, when present, comes before any group breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResultSet {
    pub overall: Option<OverallMetrics>,
    pub groups: Vec<GroupMetrics>,
    /// Requested groups that matched no rows, in canonical group order.
    pub skipped: Vec<String>,
}

impl CategoryResultSet {
    pub fn get(&self, group: &str) -> Option<&BinaryMetricsResult> {
        self.groups
            .iter()
            .find(|g| g.group == group)
            .map(|g| &g.metrics)
    }
}

/// Partition the dataset by `group_field` and evaluate each selected group
/// independently, or evaluate the whole dataset one-vs-rest when no grouping
/// is requested.
///
/// Selected groups that match no rows are skipped and recorded instead of
/// aborting the remaining groups. Groups are evaluated in parallel but the
/// result set always follows the natural ascending group order.
pub fn compute_by_category(
    table: &LabelTable,
    truth_field: &str,
    pred_field: &str,
    group_field: Option<&str>,
    selected_groups: Option<&[String]>,
    beta: f64,
) -> Result<CategoryResultSet, MetricsError> {
    if !(beta > 0.0) {
        return Err(InvalidInputError::NonPositiveBeta(beta).into());
    }
    if table.is_empty() {
        return Err(InvalidInputError::EmptySeries.into());
    }

    let truth = table.column(truth_field)?;
    let prediction = table.column(pred_field)?;

    let selected = selected_groups.filter(|groups| !groups.is_empty());
    match (group_field, selected) {
        (Some(field), Some(groups)) => {
            table.column(field)?;
            compute_groups(table, truth_field, pred_field, field, groups, beta)
        }
        _ => {
            let overall = compute_overall(truth, prediction, beta)?;
            Ok(CategoryResultSet {
                overall: Some(overall),
                groups: Vec::new(),
                skipped: Vec::new(),
            })
        }
    }
}

fn compute_groups(
    table: &LabelTable,
    truth_field: &str,
    pred_field: &str,
    group_field: &str,
    selected: &[String],
    beta: f64,
) -> Result<CategoryResultSet, MetricsError> {
    let mut ordered: Vec<String> = selected.to_vec();
    utils::sort_natural(&mut ordered);

    // Independent slices; fan out, then reassemble in the sorted order.
    let per_group: Vec<Result<GroupMetrics, MetricsError>> = ordered
        .par_iter()
        .map(|group| {
            let rows = table.matching_rows(group_field, group)?;
            if rows.is_empty() {
                return Err(EmptyGroupError(group.clone()).into());
            }

            let t = utils::to_indicators(&table.gather(truth_field, &rows)?);
            let p = utils::to_indicators(&table.gather(pred_field, &rows)?);
            let metrics = compute_binary_metrics(&t, &p, beta)?;
            Ok(GroupMetrics {
                group: group.clone(),
                sample_count: rows.len(),
                metrics,
            })
        })
        .collect();

    let mut groups = Vec::with_capacity(per_group.len());
    let mut skipped = Vec::new();
    for outcome in per_group {
        match outcome {
            Ok(group) => groups.push(group),
            Err(MetricsError::EmptyGroup(e)) => skipped.push(e.0),
            Err(other) => return Err(other),
        }
    }

    Ok(CategoryResultSet {
        overall: None,
        groups,
        skipped,
    })
}

fn compute_overall(
    truth: &[String],
    prediction: &[String],
    beta: f64,
) -> Result<OverallMetrics, MetricsError> {
    let labels = utils::distinct_union(truth, prediction);
    let matrix = LabelMatrix::from_columns(truth, prediction, &labels);

    let per_label: Vec<LabelMetrics> = labels
        .par_iter()
        .map(|label| {
            let t = utils::one_vs_rest(truth, label);
            let p = utils::one_vs_rest(prediction, label);
            compute_binary_metrics(&t, &p, beta).map(|metrics| LabelMetrics {
                label: label.clone(),
                metrics,
            })
        })
        .collect::<Result<_, InvalidInputError>>()?;

    // Macro average: every label value weighs the same regardless of how
    // often it occurs.
    let n = per_label.len() as f64;
    let precision = per_label.iter().map(|l| l.metrics.precision).sum::<f64>() / n;
    let recall = per_label.iter().map(|l| l.metrics.recall).sum::<f64>() / n;
    let fbeta_score = per_label.iter().map(|l| l.metrics.fbeta_score).sum::<f64>() / n;

    Ok(OverallMetrics {
        matrix,
        precision,
        recall,
        fbeta_score,
        per_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    fn grouped_table() -> LabelTable {
        // A: rows 0-1, B: rows 2-4.
        LabelTable::from_columns(vec![
            ("category".to_string(), strings(&["A", "A", "B", "B", "B"])),
            ("truth".to_string(), strings(&["1", "0", "1", "1", "0"])),
            ("pred".to_string(), strings(&["1", "1", "0", "1", "0"])),
        ])
        .expect("columns share one length")
    }

    #[test]
    fn each_group_sees_only_its_own_rows() {
        let table = grouped_table();
        let selected = strings(&["A", "B"]);
        let results = compute_by_category(&table, "truth", "pred", Some("category"), Some(&selected), 1.0).unwrap();

        assert!(results.overall.is_none());
        assert!(results.skipped.is_empty());
        assert_eq!(results.groups.len(), 2);

        let a = results.get("A").unwrap();
        assert_eq!(a.total(), 2);
        // A: truth=[1,0], pred=[1,1] -> TP=1, FP=1.
        assert_eq!(a.confusion_matrix, [[0, 1], [0, 1]]);
        assert_abs_diff_eq!(a.precision, 0.5);
        assert_abs_diff_eq!(a.recall, 1.0);

        let b = results.get("B").unwrap();
        assert_eq!(b.total(), 3);
        // B: truth=[1,1,0], pred=[0,1,0] -> TN=1, FN=1, TP=1.
        assert_eq!(b.confusion_matrix, [[1, 0], [1, 1]]);
        assert_abs_diff_eq!(b.precision, 1.0);
        assert_abs_diff_eq!(b.recall, 0.5);
    }

    #[test]
    fn absent_group_is_skipped_with_a_warning() {
        let table = grouped_table();
        let selected = strings(&["C", "A", "B"]);
        let results = compute_by_category(&table, "truth", "pred", Some("category"), Some(&selected), 1.0).unwrap();

        assert_eq!(results.skipped, strings(&["C"]));
        assert!(results.get("A").is_some());
        assert!(results.get("B").is_some());
    }

    #[test]
    fn groups_come_back_in_natural_order() {
        let table = LabelTable::from_columns(vec![
            ("category".to_string(), strings(&["10", "2", "2", "10"])),
            ("truth".to_string(), strings(&["1", "0", "1", "0"])),
            ("pred".to_string(), strings(&["1", "0", "1", "0"])),
        ])
        .expect("columns share one length");

        let selected = strings(&["10", "2"]);
        let results = compute_by_category(&table, "truth", "pred", Some("category"), Some(&selected), 1.0).unwrap();
        let order: Vec<&str> = results.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(order, vec!["2", "10"]);
    }

    #[test]
    fn no_grouping_produces_the_overall_view() {
        let table = grouped_table();
        let results = compute_by_category(&table, "truth", "pred", None, None, 1.0).unwrap();

        assert!(results.groups.is_empty());
        let overall = results.overall.unwrap();
        assert_eq!(overall.matrix.labels, strings(&["0", "1"]));
        assert_eq!(overall.matrix.total(), 5);

        // truth=[1,0,1,1,0], pred=[1,1,0,1,0]:
        // value "1": TP=2, FP=1, FN=1 -> p=2/3, r=2/3.
        // value "0": TP=1, FP=1, FN=1 -> p=1/2, r=1/2.
        assert_abs_diff_eq!(overall.precision, (2.0 / 3.0 + 0.5) / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(overall.recall, (2.0 / 3.0 + 0.5) / 2.0, epsilon = 1e-12);
        assert_eq!(overall.per_label.len(), 2);

        // Agreement stays a raw-matrix property: 3 of 5 rows match.
        assert_abs_diff_eq!(overall.matrix.agreement(), 0.6);
    }

    #[test]
    fn empty_selection_falls_back_to_overall() {
        let table = grouped_table();
        let selected: Vec<String> = Vec::new();
        let results = compute_by_category(&table, "truth", "pred", Some("category"), Some(&selected), 1.0).unwrap();
        assert!(results.overall.is_some());
        assert!(results.groups.is_empty());
    }

    #[test]
    fn macro_average_ignores_label_frequency() {
        // value "x" dominates but both values weigh the same.
        let table = LabelTable::from_columns(vec![
            ("truth".to_string(), strings(&["x", "x", "x", "x", "y"])),
            ("pred".to_string(), strings(&["x", "x", "x", "x", "x"])),
        ])
        .expect("columns share one length");

        let results = compute_by_category(&table, "truth", "pred", None, None, 1.0).unwrap();
        let overall = results.overall.unwrap();
        // "x": TP=4, FP=1 -> p=0.8, r=1. "y": TP=0, FN=1 -> p=0, r=0.
        assert_abs_diff_eq!(overall.precision, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(overall.recall, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn bad_beta_aborts_the_whole_computation() {
        let table = grouped_table();
        let selected = strings(&["A"]);
        let err = compute_by_category(&table, "truth", "pred", Some("category"), Some(&selected), 0.0).unwrap_err();
        assert!(matches!(err, MetricsError::Input(InvalidInputError::NonPositiveBeta(_))));
    }

    #[test]
    fn missing_column_is_reported() {
        let table = grouped_table();
        let err = compute_by_category(&table, "nope", "pred", None, None, 1.0).unwrap_err();
        assert!(matches!(err, MetricsError::Column(ColumnError::Missing(_))));
    }
}
