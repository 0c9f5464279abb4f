use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One year of the discounted-cash-flow projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedYear {
    /// Zero-based year index; year 0 is not discounted.
    pub year: u32,
    pub cash_flow: Decimal,
    /// `(1 + discount_rate)^year`
    pub discount_factor: Decimal,
    pub discounted_cash_flow: Decimal,
}

/// Output of a valuation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    /// WACC as a fraction (0.085 means 8.5%).
    pub discount_rate: Decimal,
    pub present_value: Decimal,
    pub schedule: Vec<ProjectedYear>,
}

/// Output of a unit-economics run.
///
/// The optional metrics are only produced when their preconditions hold. A `None` means
/// "not recomputed", which is different from zero; see [`UnitEconomicsSnapshot::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEconomicsResult {
    pub margin: Decimal,
    pub margin_rate_pct: Option<Decimal>, // None when the average order value is 0
    pub ltv: Option<Decimal>,             // None when AOV or CAC is 0
    pub ltv_to_cac_ratio: Option<Decimal>,
}

/// The last known value of every unit-economics metric, owned by the caller.
///
/// Stored alongside the inputs so the next run can leave untouched whatever it could not
/// recompute. The short aliases are the names the metrics were originally stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnitEconomicsSnapshot {
    pub margin: Decimal,
    #[serde(alias = "marginRate")]
    pub margin_rate_pct: Decimal,
    pub ltv: Decimal,
    #[serde(alias = "ratio")]
    pub ltv_to_cac_ratio: Decimal,
}

impl UnitEconomicsSnapshot {
    /// Overlays a result onto this snapshot: present metrics overwrite, absent ones keep
    /// their prior value.
    pub fn apply(&self, result: &UnitEconomicsResult) -> Self {
        Self {
            margin: result.margin,
            margin_rate_pct: result.margin_rate_pct.unwrap_or(self.margin_rate_pct),
            ltv: result.ltv.unwrap_or(self.ltv),
            ltv_to_cac_ratio: result.ltv_to_cac_ratio.unwrap_or(self.ltv_to_cac_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn apply_keeps_prior_values_for_absent_metrics() {
        let prior = UnitEconomicsSnapshot {
            margin: dec!(1),
            margin_rate_pct: dec!(42),
            ltv: dec!(300),
            ltv_to_cac_ratio: dec!(3),
        };
        let result = UnitEconomicsResult {
            margin: dec!(-30),
            margin_rate_pct: None,
            ltv: None,
            ltv_to_cac_ratio: None,
        };

        let next = prior.apply(&result);
        assert_eq!(next.margin, dec!(-30));
        assert_eq!(next.margin_rate_pct, dec!(42));
        assert_eq!(next.ltv, dec!(300));
        assert_eq!(next.ltv_to_cac_ratio, dec!(3));
    }

    #[test]
    fn snapshot_reads_legacy_string_metrics() {
        // Older records stored the rounded metrics as display strings.
        let snapshot: UnitEconomicsSnapshot = serde_json::from_value(serde_json::json!({
            "margin": 70, "marginRate": "70.00", "ltv": "2000.00", "ratio": 20
        }))
        .unwrap();
        assert_eq!(snapshot.margin_rate_pct, dec!(70));
        assert_eq!(snapshot.ltv, dec!(2000));
        assert_eq!(snapshot.ltv_to_cac_ratio, dec!(20));
    }
}
