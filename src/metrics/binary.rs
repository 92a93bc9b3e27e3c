use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("label series length mismatch: truth has {truth} rows, prediction has {prediction}")]
    LengthMismatch { truth: usize, prediction: usize },
    #[error("label series are empty")]
    EmptySeries,
    #[error("beta must be positive, got {0}")]
    NonPositiveBeta(f64),
}

/// Outcome of one binary evaluation. The confusion matrix is laid out as
/// `[[TN, FP], [FN, TP]]`: rows indexed by the true class, columns by the
/// predicted class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryMetricsResult {
    pub confusion_matrix: [[u64; 2]; 2],
    pub precision: f64,
    pub recall: f64,
    pub fbeta_score: f64,
    pub accuracy: f64,
}

impl BinaryMetricsResult {
    pub fn true_negatives(&self) -> u64 {
        self.confusion_matrix[0][0]
    }

    pub fn false_positives(&self) -> u64 {
        self.confusion_matrix[0][1]
    }

    pub fn false_negatives(&self) -> u64 {
        self.confusion_matrix[1][0]
    }

    pub fn true_positives(&self) -> u64 {
        self.confusion_matrix[1][1]
    }

    pub fn total(&self) -> u64 {
        self.confusion_matrix.iter().flatten().sum()
    }
}

/// Compute the confusion matrix and precision / recall / F-beta / accuracy
/// for two co-indexed binary label series.
///
/// Zero denominators are a defined output, not an error: a classifier that
/// predicts nothing positive has precision 0, a dataset with no positive
/// truth has recall 0, and F-beta is 0 when both are 0.
pub fn compute_binary_metrics(
    truth: &[bool],
    prediction: &[bool],
    beta: f64,
) -> Result<BinaryMetricsResult, InvalidInputError> {
    if truth.len() != prediction.len() {
        return Err(InvalidInputError::LengthMismatch {
            truth: truth.len(),
            prediction: prediction.len(),
        });
    }
    if truth.is_empty() {
        return Err(InvalidInputError::EmptySeries);
    }
    if !(beta > 0.0) {
        return Err(InvalidInputError::NonPositiveBeta(beta));
    }

    let (mut tn, mut fp, mut fn_, mut tp) = (0u64, 0u64, 0u64, 0u64);
    for (&t, &p) in truth.iter().zip(prediction.iter()) {
        match (t, p) {
            (false, false) => tn += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (true, true) => tp += 1,
        }
    }

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };

    // One formula for every beta; beta = 1 is not special-cased.
    let beta2 = beta * beta;
    let denominator = beta2 * precision + recall;
    let fbeta_score = if denominator > 0.0 {
        (1.0 + beta2) * precision * recall / denominator
    } else {
        0.0
    };

    let accuracy = (tp + tn) as f64 / truth.len() as f64;

    Ok(BinaryMetricsResult {
        confusion_matrix: [[tn, fp], [fn_, tp]],
        precision,
        recall,
        fbeta_score,
        accuracy,
    })
}
