use std::env;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use clf_metrics::config::AppConfig;
use clf_metrics::data::loader;
use clf_metrics::data::sample::{generate_sample, SampleSpec};
use clf_metrics::data::sqlite;
use clf_metrics::metrics::category::compute_by_category;
use clf_metrics::report::{heatmap, table};

fn main() -> Result<()> {
    let cfg = AppConfig::from_env();
    let args: Vec<String> = env::args().collect();

    // With a dataset path: evaluate it. Without: generate the demo sample
    // and cache it so the backend can serve the same data.
    let data = match args.get(1) {
        Some(path) => loader::load_dataset(path, &cfg.db_path)?,
        None => {
            println!("[INFO] No dataset given, generating demo sample ...");
            let data = generate_sample(&SampleSpec::default());
            sqlite::save_dataset(&data, &cfg.db_path)?;
            data
        }
    };
    println!(
        "[INFO] Loaded {} rows, {} columns",
        data.len(),
        data.column_names().len()
    );

    // Demo sample column pairing; override for real datasets.
    let truth_col = env::var("CLF_TRUTH_COL").unwrap_or_else(|_| "is_category_real_value".into());
    let pred_col = env::var("CLF_PRED_COL").unwrap_or_else(|_| "is_category_prediction".into());
    let group_col = env::var("CLF_GROUP_COL").unwrap_or_else(|_| "category".into());
    let beta = cfg.beta;

    // Whole-dataset view first.
    println!("[INFO] Computing overall metrics ...");
    let overall = compute_by_category(&data, &truth_col, &pred_col, None, None, beta)?;
    if let Some(o) = &overall.overall {
        println!("{}", table::label_matrix(&o.matrix));
        println!("{}", table::overall_summary(o, beta));
        heatmap::save_label_matrix_html("overall_confusion.html", &o.matrix, "Classification Matrix")?;
    }

    // Then every category on its own slice of rows.
    let groups = data.distinct_values(&group_col)?;
    println!("[INFO] Computing metrics for {} categories ...", groups.len());
    let results = compute_by_category(
        &data,
        &truth_col,
        &pred_col,
        Some(&group_col),
        Some(&groups),
        beta,
    )?;

    let pb = ProgressBar::new(results.groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );
    for group in &results.groups {
        heatmap::save_binary_heatmap_html(
            &format!("confusion_{}.html", group.group),
            &group.metrics,
            &format!("Classification Matrix: {}", group.group),
        )?;
        pb.inc(1);
    }
    pb.finish();

    for group in &results.groups {
        println!(
            "\nCategory {} ({} samples)",
            group.group, group.sample_count
        );
        println!("{}", table::matrix_breakdown(&group.metrics));
        println!("{}", table::metric_summary(&group.metrics, beta));
    }
    for skipped in &results.skipped {
        eprintln!("[WARN] Skipped category with no rows: {}", skipped);
    }

    println!("[INFO] Completed pipeline. Heatmap HTML saved.");
    Ok(())
}
