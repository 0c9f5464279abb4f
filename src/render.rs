//! Terminal tables for the calculator results.

use analytics::{UnitEconomicsSnapshot, ValuationResult};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use configuration::Display;
use core_types::{UnitEconomicsInputs, ValuationInputs};
use rust_decimal::Decimal;
use vc_matching::{Page, VcRecord};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal, display: &Display) -> String {
    let rounded = value.round_dp(display.decimal_places);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", display.currency_symbol, rounded.abs())
    } else {
        format!("{}{}", display.currency_symbol, rounded)
    }
}

fn number(value: Decimal, display: &Display) -> String {
    value.round_dp(display.decimal_places).to_string()
}

fn percent(value: Decimal, display: &Display) -> String {
    format!("{}%", number(value, display))
}

/// Formats a fractional rate as a percentage.
fn rate_percent(rate: Decimal, display: &Display) -> String {
    rate.checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| percent(value, display))
        .unwrap_or_else(|| NOT_FINITE.to_string())
}

const NOT_FINITE: &str = "not finite";

pub fn valuation(inputs: &ValuationInputs, result: &ValuationResult, display: &Display) {
    let mut summary = table(vec!["Metric", "Value"]);
    summary.add_row(vec!["Annual revenue".to_string(), money(inputs.annual_revenue, display)]);
    summary.add_row(vec![
        "Addressable market".to_string(),
        money(inputs.total_addressable_market, display),
    ]);
    summary.add_row(vec![
        "Obtainable share".to_string(),
        percent(inputs.serviceable_obtainable_market_pct, display),
    ]);
    summary.add_row(vec![
        "Annual cash outflow".to_string(),
        money(inputs.annual_cash_outflow, display),
    ]);
    summary.add_row(vec![
        "Annual growth".to_string(),
        percent(inputs.annual_growth_rate_pct, display),
    ]);
    summary.add_row(vec![
        "Discount rate (WACC)".to_string(),
        rate_percent(result.discount_rate, display),
    ]);
    summary.add_row(vec![
        "Present value".to_string(),
        money(result.present_value, display),
    ]);
    println!("{summary}");

    if result.schedule.is_empty() {
        return;
    }
    let mut schedule = table(vec!["Year", "Cash flow", "Discount factor", "Discounted"]);
    for year in &result.schedule {
        schedule.add_row(vec![
            year.year.to_string(),
            money(year.cash_flow, display),
            year.discount_factor.round_dp(4).to_string(),
            money(year.discounted_cash_flow, display),
        ]);
    }
    for index in 1..4 {
        if let Some(column) = schedule.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{schedule}");
}

pub fn non_finite_valuation(discount_rate: Option<Decimal>, metric: &str, display: &Display) {
    let mut summary = table(vec!["Metric", "Value"]);
    let rate = discount_rate
        .map(|rate| rate_percent(rate, display))
        .unwrap_or_else(|| NOT_FINITE.to_string());
    summary.add_row(vec!["Discount rate (WACC)".to_string(), rate]);
    summary.add_row(vec!["Present value".to_string(), NOT_FINITE.to_string()]);
    println!("{summary}");
    println!("The {metric} cannot be represented for these inputs; check the discount rate.");
}

pub fn unit_economics(
    inputs: &UnitEconomicsInputs,
    snapshot: &UnitEconomicsSnapshot,
    display: &Display,
) {
    let mut costs = table(vec!["Cost of goods sold", "Amount"]);
    for (name, amount) in inputs.cost_of_goods_sold.iter() {
        costs.add_row(vec![name.to_string(), money(amount, display)]);
    }
    println!("{costs}");

    let churn = if inputs.churn_enabled {
        percent(inputs.churn_rate(), display)
    } else {
        "off".to_string()
    };
    let mut metrics = table(vec!["Metric", "Value"]);
    metrics.add_row(vec!["Category".to_string(), inputs.category.clone()]);
    metrics.add_row(vec![
        "Average order value".to_string(),
        money(inputs.average_order_value, display),
    ]);
    metrics.add_row(vec![
        "Orders per customer".to_string(),
        number(inputs.average_orders_per_customer, display),
    ]);
    metrics.add_row(vec![
        "Acquisition cost".to_string(),
        money(inputs.customer_acquisition_cost, display),
    ]);
    metrics.add_row(vec!["Churn".to_string(), churn]);
    metrics.add_row(vec!["Margin".to_string(), money(snapshot.margin, display)]);
    metrics.add_row(vec![
        "Margin rate".to_string(),
        percent(snapshot.margin_rate_pct, display),
    ]);
    metrics.add_row(vec!["LTV".to_string(), money(snapshot.ltv, display)]);
    metrics.add_row(vec![
        "LTV : CAC".to_string(),
        number(snapshot.ltv_to_cac_ratio, display),
    ]);
    println!("{metrics}");
}

fn cheque_range(record: &VcRecord, display: &Display) -> String {
    match (record.first_cheque_minimum, record.first_cheque_maximum) {
        (Some(min), Some(max)) => format!("{} - {}", money(min, display), money(max, display)),
        (Some(min), None) => format!("from {}", money(min, display)),
        (None, Some(max)) => format!("up to {}", money(max, display)),
        (None, None) => String::new(),
    }
}

pub fn vc_page(page: &Page<VcRecord>, display: &Display) {
    if page.total_count == 0 {
        println!("No investors match these filters.");
        return;
    }

    let mut results = table(vec!["Investor", "HQ", "Stage", "Type", "First cheque"]);
    for record in &page.items {
        results.add_row(vec![
            record.name.clone().unwrap_or_default(),
            record.global_hq.clone().unwrap_or_default(),
            record.stage_of_investment.clone().unwrap_or_default(),
            record.investor_type.clone().unwrap_or_default(),
            cheque_range(record, display),
        ]);
    }
    println!("{results}");

    let navigation = page
        .window()
        .map(|window| {
            window
                .map(|n| if n == page.page { format!("[{n}]") } else { n.to_string() })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    println!(
        "Page {} of {} ({} investors) {}",
        page.page, page.total_pages, page.total_count, navigation
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> Display {
        Display {
            decimal_places: 2,
            currency_symbol: "$".to_string(),
        }
    }

    #[test]
    fn rate_is_shown_as_a_percentage() {
        assert_eq!(rate_percent(Decimal::new(85, 3), &display()), "8.50%");
    }

    #[test]
    fn rate_too_large_to_scale_is_not_finite() {
        assert_eq!(rate_percent(Decimal::MAX, &display()), NOT_FINITE);
    }

    #[test]
    fn negative_money_puts_the_sign_before_the_symbol() {
        assert_eq!(money(Decimal::new(-6050, 2), &display()), "-$60.50");
    }
}
