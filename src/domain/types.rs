//! Shared domain types.
//!
//! Everything here is created fresh per prediction request and dropped once the
//! result has been rendered. Nothing is persisted.

use serde::{Deserialize, Serialize};

/// First tax year offered by the input form.
pub const TAX_YEAR_MIN: i32 = 2012;
/// Last tax year offered by the input form.
pub const TAX_YEAR_MAX: i32 = 2025;

/// Number of features the scaler and classifier were fit on.
pub const FEATURE_COUNT: usize = 5;

/// Training-time column names, in the exact order of `FeatureVector`.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "TAHUN",
    "SALDO AWAL",
    "REALISASI PIUTANG",
    "PERSENTASE_TERBAYAR",
    "KATEGORI_PAJAK_ENCODED",
];

/// Operator-facing labels for the same columns.
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Tax year",
    "Opening balance",
    "Amount paid",
    "Percent paid",
    "Category code",
];

/// One prediction request, as entered by the operator.
///
/// Amounts are signed so that a negative value coming from an upstream form can
/// be rejected explicitly instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivableInput {
    pub tax_year: i32,
    pub tax_category: String,
    pub opening_balance: i64,
    pub amount_paid: i64,
}

impl ReceivableInput {
    /// Share of the opening balance already paid, in percent.
    ///
    /// Returns `0.0` for a zero opening balance rather than NaN.
    pub fn percent_paid(&self) -> f64 {
        percent_paid(self.opening_balance, self.amount_paid)
    }

    pub fn year_in_range(&self) -> bool {
        (TAX_YEAR_MIN..=TAX_YEAR_MAX).contains(&self.tax_year)
    }
}

/// `amount_paid / opening_balance * 100`, or `0.0` when nothing is owed.
pub fn percent_paid(opening_balance: i64, amount_paid: i64) -> f64 {
    if opening_balance > 0 {
        amount_paid as f64 / opening_balance as f64 * 100.0
    } else {
        0.0
    }
}

/// Ordered numeric features consumed by the scaler.
///
/// Layout: `[tax_year, opening_balance, amount_paid, percent_paid, category_code]`.
/// The fixed-size array makes the cardinality part of the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn percent_paid(&self) -> f64 {
        self.0[3]
    }

    pub fn category_code(&self) -> f64 {
        self.0[4]
    }

    /// Pair each value with its training column name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

/// Static guidance shown next to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Receivable is expected to be paid off.
    RoutineMonitoring,
    /// Receivable is expected to remain outstanding.
    IntensiveCollection,
}

impl Recommendation {
    pub fn for_outcome(settled: bool) -> Self {
        if settled {
            Recommendation::RoutineMonitoring
        } else {
            Recommendation::IntensiveCollection
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Recommendation::RoutineMonitoring => "Recommendation",
            Recommendation::IntensiveCollection => "Recommended actions",
        }
    }

    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Recommendation::RoutineMonitoring => &[
                "This receivable has a high likelihood of being paid off",
                "Keep up routine monitoring",
                "Acknowledge taxpayers who pay on time",
            ],
            Recommendation::IntensiveCollection => &[
                "Prioritize this receivable for intensive collection",
                "Contact the taxpayer to negotiate payment",
                "Consider an installment scheme or incentives",
                "Monitor periodically and escalate if needed",
            ],
        }
    }
}

/// Output of one inference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub settled: bool,
    /// Class index returned by the classifier (1 = settled).
    pub label: u8,
    /// Probability of the predicted class, in percent.
    pub confidence: f64,
    /// `[p_not_settled, p_settled]`.
    pub probabilities: [f64; 2],
    pub recommendation: Recommendation,
    /// Exact (unscaled) features the classifier was fed.
    pub features: FeatureVector,
}

impl PredictionResult {
    pub fn outcome_label(&self) -> &'static str {
        if self.settled {
            "PREDICTED SETTLED"
        } else {
            "PREDICTED NOT SETTLED"
        }
    }
}

/// How strictly the supported tax-year range is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearPolicy {
    /// Out-of-range years are scored, with a logged warning.
    #[default]
    Advisory,
    /// Out-of-range years are rejected as invalid input.
    Strict,
}

impl YearPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "advisory" => Some(YearPolicy::Advisory),
            "strict" => Some(YearPolicy::Strict),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(opening: i64, paid: i64) -> ReceivableInput {
        ReceivableInput {
            tax_year: 2025,
            tax_category: "PBB".to_string(),
            opening_balance: opening,
            amount_paid: paid,
        }
    }

    #[test]
    fn percent_paid_handles_zero_balance() {
        assert_eq!(input(0, 0).percent_paid(), 0.0);
    }

    #[test]
    fn percent_paid_bounds() {
        assert_eq!(input(1_000_000, 1_000_000).percent_paid(), 100.0);
        assert_eq!(input(500_000, 0).percent_paid(), 0.0);
        assert!((input(400, 100).percent_paid() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn recommendation_tracks_outcome() {
        assert_eq!(Recommendation::for_outcome(true), Recommendation::RoutineMonitoring);
        assert_eq!(Recommendation::for_outcome(false), Recommendation::IntensiveCollection);
        assert_ne!(
            Recommendation::RoutineMonitoring.lines(),
            Recommendation::IntensiveCollection.lines()
        );
    }

    #[test]
    fn year_policy_parses_case_insensitively() {
        assert_eq!(YearPolicy::parse("Strict"), Some(YearPolicy::Strict));
        assert_eq!(YearPolicy::parse(" advisory "), Some(YearPolicy::Advisory));
        assert_eq!(YearPolicy::parse("loose"), None);
    }

    #[test]
    fn feature_names_follow_vector_order() {
        let v = FeatureVector([2025.0, 10.0, 5.0, 50.0, 3.0]);
        let named: Vec<_> = v.named().collect();
        assert_eq!(named[0], ("TAHUN", 2025.0));
        assert_eq!(named[4], ("KATEGORI_PAJAK_ENCODED", 3.0));
    }
}
