use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::columnar::LabelTable;

/// Shape of the generated demo dataset.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub rows: usize,
    pub categories: usize,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            rows: 10_000,
            categories: 7,
            seed: 42,
        }
    }
}

/// Generate a demo classification dataset: id, category, binary ground truth
/// and a prediction that agrees with the truth with a per-category
/// probability drawn from {0.5, 0.6, ..., 1.0}. Deterministic for a fixed
/// seed.
pub fn generate_sample(spec: &SampleSpec) -> LabelTable {
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let names: Vec<String> = (1..=spec.categories)
        .map(|i| format!("CATEGORY_{}", i))
        .collect();
    let performance: Vec<f64> = names
        .iter()
        .map(|_| rng.gen_range(5..=10) as f64 / 10.0)
        .collect();

    let mut ids = Vec::with_capacity(spec.rows);
    let mut categories = Vec::with_capacity(spec.rows);
    let mut truth = Vec::with_capacity(spec.rows);
    let mut prediction = Vec::with_capacity(spec.rows);

    for _ in 0..spec.rows {
        let c = rng.gen_range(0..names.len());
        let ground_truth = rng.gen_range(0..2u8);
        let hit = rng.gen::<f64>() < performance[c];
        let predicted = if hit { ground_truth } else { 1 - ground_truth };

        ids.push(format!("{:016x}", rng.gen::<u64>()));
        categories.push(names[c].clone());
        truth.push(ground_truth.to_string());
        prediction.push(predicted.to_string());
    }

    LabelTable::from_columns(vec![
        ("id".to_string(), ids),
        ("category".to_string(), categories),
        ("is_category_real_value".to_string(), truth),
        ("is_category_prediction".to_string(), prediction),
    ])
    .expect("generated columns share one length")
}
