//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the inference code stays free of presentation concerns
//! - the CLI and the TUI render numbers identically

use chrono::Local;

use crate::artifacts::{CategoryEncoder, ModelMetadata};
use crate::domain::{FEATURE_LABELS, FEATURE_NAMES, FeatureVector, PredictionResult, ReceivableInput};

/// Number of feature importances shown in summaries.
pub const TOP_FEATURES: usize = 3;

/// Position of `PERSENTASE_TERBAYAR` in the feature vector.
const PERCENT_PAID_IDX: usize = 3;

/// `1234567` -> `"1,234,567"`.
pub fn format_amount(value: i64) -> String {
    let grouped = group_digits(value.unsigned_abs());
    if value < 0 { format!("-{grouped}") } else { grouped }
}

/// Record counts and other unsigned totals, grouped like `format_amount`.
pub fn format_count(value: u64) -> String {
    group_digits(value)
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Header line: model name, accuracy and F1.
pub fn format_model_line(metadata: &ModelMetadata) -> String {
    format!(
        "Model: {} | Accuracy: {} | F1-score: {:.4}",
        metadata.model_name,
        format_percent(metadata.accuracy * 100.0),
        metadata.f1_score
    )
}

/// Top feature importances, one per line.
pub fn format_top_features(metadata: &ModelMetadata) -> Vec<String> {
    metadata
        .top_features(TOP_FEATURES)
        .into_iter()
        .map(|f| format!("{}: {}", f.feature, format_percent(f.importance * 100.0)))
        .collect()
}

/// One feature value as shown to the operator: percent paid keeps two
/// decimals, the integral columns none.
pub fn format_feature_value(idx: usize, value: f64) -> String {
    if idx == PERCENT_PAID_IDX {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    }
}

/// Table of the exact feature values fed to the scaler.
pub fn format_feature_table(features: &FeatureVector) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:<16} {:>18}\n", "column", "meaning", "value"));
    for (idx, (name, value)) in features.named().enumerate() {
        let shown = format_feature_value(idx, value);
        out.push_str(&format!("{name:<24} {:<16} {shown:>18}\n", FEATURE_LABELS[idx]));
    }
    out
}

/// Full report for one prediction.
pub fn format_prediction(
    input: &ReceivableInput,
    result: &PredictionResult,
    metadata: &ModelMetadata,
    details: bool,
) -> String {
    let mut out = String::new();

    out.push_str("=== Tax Receivable Settlement Prediction ===\n");
    out.push_str(&format!("{}\n", format_model_line(metadata)));
    out.push_str(&format!("Generated: {}\n\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    out.push_str(&format!("Tax year:        {}\n", input.tax_year));
    out.push_str(&format!("Category:        {}\n", input.tax_category));
    out.push_str(&format!("Opening balance: {}\n", format_amount(input.opening_balance)));
    out.push_str(&format!("Amount paid:     {}\n", format_amount(input.amount_paid)));
    out.push_str(&format!("Percent paid:    {}\n\n", format_percent(input.percent_paid())));

    out.push_str(&format!("Outcome:    {}\n", result.outcome_label()));
    out.push_str(&format!("Confidence: {}\n\n", format_percent(result.confidence)));

    out.push_str(&format!("{}:\n", result.recommendation.title()));
    for line in result.recommendation.lines() {
        out.push_str(&format!("  - {line}\n"));
    }

    if details {
        out.push_str("\nFeature values used:\n");
        out.push_str(&format_feature_table(&result.features));
    }

    out
}

/// `settle info` output.
pub fn format_model_info(metadata: &ModelMetadata, classifier_kind: &str, encoder: &CategoryEncoder) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_model_line(metadata)));
    out.push_str(&format!("Classifier: {classifier_kind}\n"));
    if let Some(n) = metadata.training_records {
        out.push_str(&format!("Trained on: {} historical records\n", format_count(n)));
    }
    out.push_str(&format!("Categories: {}\n", encoder.len()));
    out.push_str(&format!("Features:   {}\n", FEATURE_NAMES.join(", ")));

    let top = format_top_features(metadata);
    if !top.is_empty() {
        out.push_str("\nTop features:\n");
        for line in top {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

/// `settle categories` output.
pub fn format_categories(encoder: &CategoryEncoder) -> String {
    let mut out = String::new();
    for (code, label) in encoder.classes().iter().enumerate() {
        out.push_str(&format!("{code:>3}  {label}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::FeatureImportance;
    use crate::domain::Recommendation;

    fn metadata() -> ModelMetadata {
        ModelMetadata {
            model_name: "Random Forest".into(),
            accuracy: 0.9989,
            f1_score: 0.99891,
            feature_importance: vec![
                FeatureImportance { feature: "PERSENTASE_TERBAYAR".into(), importance: 0.6123 },
                FeatureImportance { feature: "REALISASI PIUTANG".into(), importance: 0.2 },
            ],
            training_records: Some(4539),
        }
    }

    #[test]
    fn amounts_get_thousands_separators() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1,000");
        assert_eq!(format_amount(1_000_000), "1,000,000");
        assert_eq!(format_amount(-12_345), "-12,345");
        assert_eq!(format_amount(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn counts_above_i64_range_do_not_wrap() {
        assert_eq!(format_count(4539), "4,539");
        assert_eq!(format_count(u64::MAX), "18,446,744,073,709,551,615");

        let mut meta = metadata();
        meta.training_records = Some(u64::MAX);
        let encoder = CategoryEncoder::new(vec!["PBB".into()]).unwrap();
        let info = format_model_info(&meta, "Random Forest", &encoder);
        assert!(info.contains("Trained on: 18,446,744,073,709,551,615 historical records"));
    }

    #[test]
    fn feature_values_keep_two_decimals_for_percent_only() {
        assert_eq!(format_feature_value(3, 33.333_333), "33.33");
        assert_eq!(format_feature_value(1, 1_000_000.0), "1000000");
        assert_eq!(format_feature_value(0, 2025.0), "2025");
    }

    #[test]
    fn model_line_matches_header_format() {
        assert_eq!(
            format_model_line(&metadata()),
            "Model: Random Forest | Accuracy: 99.89% | F1-score: 0.9989"
        );
    }

    #[test]
    fn top_features_are_percentages() {
        assert_eq!(format_top_features(&metadata())[0], "PERSENTASE_TERBAYAR: 61.23%");
    }

    #[test]
    fn report_uses_template_for_outcome() {
        let input = ReceivableInput {
            tax_year: 2020,
            tax_category: "PBB".into(),
            opening_balance: 500_000,
            amount_paid: 0,
        };
        let result = PredictionResult {
            settled: false,
            label: 0,
            confidence: 97.5,
            probabilities: [0.975, 0.025],
            recommendation: Recommendation::IntensiveCollection,
            features: FeatureVector([2020.0, 500_000.0, 0.0, 0.0, 1.0]),
        };
        let text = format_prediction(&input, &result, &metadata(), true);
        assert!(text.contains("PREDICTED NOT SETTLED"));
        assert!(text.contains("Confidence: 97.50%"));
        assert!(text.contains("intensive collection"));
        assert!(!text.contains("routine monitoring"));
        assert!(text.contains("KATEGORI_PAJAK_ENCODED"));

        let short = format_prediction(&input, &result, &metadata(), false);
        assert!(!short.contains("Feature values used"));
    }
}
