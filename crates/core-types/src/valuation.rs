use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business and capital-structure parameters for a discounted-cash-flow valuation.
///
/// Percentages are plain percent numbers (`25` means 25%). Every field defaults to zero so a
/// partially filled record still deserializes. The short aliases are the names records were
/// originally stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValuationInputs {
    #[serde(alias = "revenue")]
    pub annual_revenue: Decimal,
    /// Carried for display; does not feed the valuation formula.
    #[serde(alias = "marketSize")]
    pub total_addressable_market: Decimal,
    /// Carried for display; does not feed the valuation formula.
    #[serde(alias = "som")]
    pub serviceable_obtainable_market_pct: Decimal,
    #[serde(alias = "outflow")]
    pub annual_cash_outflow: Decimal,
    #[serde(alias = "growth")]
    pub annual_growth_rate_pct: Decimal,
    #[serde(alias = "numYears")]
    pub projection_years: u32,

    // Capital structure
    #[serde(alias = "equityValue")]
    pub market_value_of_equity: Decimal,
    #[serde(alias = "debtValue")]
    pub market_value_of_debt: Decimal,
    #[serde(alias = "tax")]
    pub tax_rate_pct: Decimal,
    /// Used as the expected market return when pricing equity.
    #[serde(alias = "equityCost")]
    pub expected_market_return_pct: Decimal,
    /// Pre-tax cost of debt.
    #[serde(alias = "debtCost")]
    pub annual_interest_rate_pct: Decimal,
}

impl ValuationInputs {
    /// The record a newly onboarded user starts from: a one-year horizon with a token
    /// cash outflow of 1 and everything else zeroed.
    pub fn onboarding() -> Self {
        Self {
            annual_cash_outflow: Decimal::ONE,
            projection_years: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn legacy_field_names_are_accepted() {
        let legacy = serde_json::json!({
            "revenue": 100, "marketSize": 5000, "som": 10, "outflow": 20,
            "growth": 5, "numYears": 3, "equityValue": 50, "debtValue": 50,
            "tax": 20, "equityCost": 10, "debtCost": 5
        });
        let current = serde_json::json!({
            "annualRevenue": 100, "totalAddressableMarket": 5000,
            "serviceableObtainableMarketPct": 10, "annualCashOutflow": 20,
            "annualGrowthRatePct": 5, "projectionYears": 3, "marketValueOfEquity": 50,
            "marketValueOfDebt": 50, "taxRatePct": 20, "expectedMarketReturnPct": 10,
            "annualInterestRatePct": 5
        });

        let from_legacy: ValuationInputs = serde_json::from_value(legacy).unwrap();
        let from_current: ValuationInputs = serde_json::from_value(current).unwrap();
        assert_eq!(from_legacy, from_current);
        assert_eq!(from_current.annual_revenue, dec!(100));
        assert_eq!(from_current.projection_years, 3);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let inputs: ValuationInputs =
            serde_json::from_value(serde_json::json!({ "revenue": 12.5 })).unwrap();
        assert_eq!(inputs.annual_revenue, dec!(12.5));
        assert_eq!(inputs.projection_years, 0);
        assert_eq!(inputs.market_value_of_debt, Decimal::ZERO);
    }

    #[test]
    fn onboarding_record_has_one_year_horizon() {
        let inputs = ValuationInputs::onboarding();
        assert_eq!(inputs.projection_years, 1);
        assert_eq!(inputs.annual_cash_outflow, Decimal::ONE);
        assert_eq!(inputs.annual_revenue, Decimal::ZERO);
    }
}
