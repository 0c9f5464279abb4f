use crate::error::AnalyticsError;
use crate::report::{
    ProjectedYear, UnitEconomicsResult, UnitEconomicsSnapshot, ValuationResult,
};
use core_types::{UnitEconomicsInputs, ValuationInputs};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Risk-free rate used when pricing equity (CAPM).
pub const RISK_FREE_RATE: Decimal = dec!(0.04);

/// Equity beta used when pricing equity (CAPM).
pub const EQUITY_BETA: Decimal = dec!(1.5);

/// Longest projection `compute_valuation` accepts.
pub const MAX_PROJECTION_YEARS: u32 = 1000;

const HUNDRED: Decimal = dec!(100);

/// A stateless calculator for the valuation and unit-economics metrics.
///
/// Every method takes all of its state as arguments, so one engine can be shared freely
/// between callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the weighted average cost of capital as a fraction.
    ///
    /// When equity and debt sum to zero the rate is zero. Otherwise the cost of equity is
    /// `4% + 1.5 × (market return − 4%)` and the cost of debt is taken after tax.
    ///
    /// # Errors
    ///
    /// `AnalyticsError::NonFinite` if an intermediate value leaves the decimal range.
    pub fn compute_wacc(&self, inputs: &ValuationInputs) -> Result<Decimal, AnalyticsError> {
        const METRIC: &str = "discount_rate";

        let equity = inputs.market_value_of_equity;
        let debt = inputs.market_value_of_debt;
        let total_capital = finite(equity.checked_add(debt), METRIC)?;
        if total_capital.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let market_return = inputs.expected_market_return_pct / HUNDRED;
        let cost_of_equity = RISK_FREE_RATE + EQUITY_BETA * (market_return - RISK_FREE_RATE);
        let cost_of_debt = inputs.annual_interest_rate_pct / HUNDRED;
        let tax_shield = Decimal::ONE - inputs.tax_rate_pct / HUNDRED;
        let after_tax_cost_of_debt = finite(cost_of_debt.checked_mul(tax_shield), METRIC)?;

        let equity_weight = finite(equity.checked_div(total_capital), METRIC)?;
        let debt_weight = finite(debt.checked_div(total_capital), METRIC)?;
        let equity_part = finite(equity_weight.checked_mul(cost_of_equity), METRIC)?;
        let debt_part = finite(debt_weight.checked_mul(after_tax_cost_of_debt), METRIC)?;

        finite(equity_part.checked_add(debt_part), METRIC)
    }

    /// The main entry point for a discounted-cash-flow valuation.
    ///
    /// Year `i` contributes `(revenue − outflow) × (1 + g)^i / (1 + wacc)^i` for `i` in
    /// `0..projection_years`, so year 0 enters undiscounted. Market size and SOM are not
    /// part of the formula.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ValuationResult`, or `AnalyticsError::NonFinite` when a
    /// year cannot be discounted (a WACC of exactly -1) or a factor overflows.
    /// Horizons past [`MAX_PROJECTION_YEARS`] are rejected with `HorizonTooLong`.
    pub fn compute_valuation(
        &self,
        inputs: &ValuationInputs,
    ) -> Result<ValuationResult, AnalyticsError> {
        const METRIC: &str = "present_value";

        if inputs.projection_years > MAX_PROJECTION_YEARS {
            return Err(AnalyticsError::HorizonTooLong {
                years: inputs.projection_years,
                max: MAX_PROJECTION_YEARS,
            });
        }

        let discount_rate = self.compute_wacc(inputs)?;
        let growth_step = Decimal::ONE + inputs.annual_growth_rate_pct / HUNDRED;
        let discount_step = Decimal::ONE + discount_rate;

        let mut growth_factor = Decimal::ONE;
        let mut discount_factor = Decimal::ONE;
        let mut present_value = Decimal::ZERO;
        let mut schedule = Vec::new();

        for year in 0..inputs.projection_years {
            if year > 0 {
                growth_factor = finite(growth_factor.checked_mul(growth_step), METRIC)?;
                discount_factor = finite(discount_factor.checked_mul(discount_step), METRIC)?;
            }

            let inflow = finite(inputs.annual_revenue.checked_mul(growth_factor), METRIC)?;
            let outflow = finite(inputs.annual_cash_outflow.checked_mul(growth_factor), METRIC)?;
            let cash_flow = finite(inflow.checked_sub(outflow), METRIC)?;
            let discounted_cash_flow = finite(cash_flow.checked_div(discount_factor), METRIC)?;
            present_value = finite(present_value.checked_add(discounted_cash_flow), METRIC)?;

            schedule.push(ProjectedYear {
                year,
                cash_flow,
                discount_factor,
                discounted_cash_flow,
            });
        }

        tracing::debug!(
            %discount_rate,
            %present_value,
            years = inputs.projection_years,
            "Valuation computed."
        );

        Ok(ValuationResult {
            discount_rate,
            present_value,
            schedule,
        })
    }

    /// Derives margin, margin rate, LTV and LTV:CAC from per-order economics.
    ///
    /// `margin_rate_pct` needs a non-zero AOV; `ltv` and `ltv_to_cac_ratio` need a non-zero
    /// AOV and CAC. When churn is enabled but the churn rate is zero both are reported as an
    /// explicit zero rather than left out.
    pub fn compute_unit_economics(
        &self,
        inputs: &UnitEconomicsInputs,
    ) -> Result<UnitEconomicsResult, AnalyticsError> {
        let aov = inputs.average_order_value;
        let cac = inputs.customer_acquisition_cost;

        let mut cost_total = Decimal::ZERO;
        for amount in inputs.cost_of_goods_sold.amounts() {
            cost_total = finite(cost_total.checked_add(amount), "margin")?;
        }
        let margin = finite(aov.checked_sub(cost_total), "margin")?;

        let mut result = UnitEconomicsResult {
            margin,
            margin_rate_pct: None,
            ltv: None,
            ltv_to_cac_ratio: None,
        };

        if !aov.is_zero() {
            let rate = finite(margin.checked_div(aov), "margin_rate_pct")?;
            result.margin_rate_pct = Some(finite(rate.checked_mul(HUNDRED), "margin_rate_pct")?);
        }

        if !aov.is_zero() && !cac.is_zero() {
            let (ltv, ratio) = self.lifetime_value(inputs)?;
            result.ltv = Some(ltv);
            result.ltv_to_cac_ratio = Some(ratio);
        } else {
            tracing::debug!(%aov, %cac, "AOV or CAC is zero; lifetime value left unchanged.");
        }

        Ok(result)
    }

    /// Recomputes the metrics and overlays them onto the caller's prior snapshot.
    ///
    /// Metrics whose preconditions do not hold keep the value they had in `prior`.
    pub fn update_unit_economics(
        &self,
        inputs: &UnitEconomicsInputs,
        prior: &UnitEconomicsSnapshot,
    ) -> Result<UnitEconomicsSnapshot, AnalyticsError> {
        let result = self.compute_unit_economics(inputs)?;
        Ok(prior.apply(&result))
    }

    /// Computes `(ltv, ltv_to_cac_ratio)`. Callers guarantee AOV and CAC are non-zero.
    fn lifetime_value(
        &self,
        inputs: &UnitEconomicsInputs,
    ) -> Result<(Decimal, Decimal), AnalyticsError> {
        let aov = inputs.average_order_value;
        let orders = inputs.average_orders_per_customer;

        let ltv = if inputs.churn_enabled {
            let churn = inputs.churn_rate();
            if churn.is_zero() {
                return Ok((Decimal::ZERO, Decimal::ZERO));
            }
            let expected_lifetime = finite(Decimal::ONE.checked_div(churn / HUNDRED), "ltv")?;
            let per_customer = finite(expected_lifetime.checked_mul(orders), "ltv")?;
            finite(per_customer.checked_mul(aov), "ltv")?
        } else {
            finite(aov.checked_mul(orders), "ltv")?
        };

        let ratio = finite(
            ltv.checked_div(inputs.customer_acquisition_cost),
            "ltv_to_cac_ratio",
        )?;
        Ok((ltv, ratio))
    }
}

fn finite(value: Option<Decimal>, metric: &'static str) -> Result<Decimal, AnalyticsError> {
    value.ok_or(AnalyticsError::NonFinite { metric })
}
