use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category recorded when the user has not picked one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Prefix of the names generated for newly added cost lines.
const GENERATED_LINE_PREFIX: &str = "COGS";

/// Cost-of-goods-sold lines, keyed by a unique line name.
///
/// Line order follows entry order and only matters for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostOfGoodsSold {
    lines: IndexMap<String, Decimal>,
}

impl CostOfGoodsSold {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two zero-amount lines a fresh calculator starts with.
    pub fn starter() -> Self {
        [("Manufacture", Decimal::ZERO), ("Package", Decimal::ZERO)]
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.lines.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lines.contains_key(name)
    }

    /// Iterates over `(name, amount)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.lines.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn amounts(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.lines.values().copied()
    }

    /// Sets the amount of a line, creating it at the end if it does not exist.
    pub fn set_amount(&mut self, name: impl Into<String>, amount: Decimal) {
        self.lines.insert(name.into(), amount);
    }

    /// Removes a line, returning its amount.
    pub fn remove(&mut self, name: &str) -> Option<Decimal> {
        self.lines.shift_remove(name)
    }

    /// Moves the amount of `old` under the name `new`.
    ///
    /// If `new` already names a line, that line's amount is overwritten and `old` disappears,
    /// so the mapping shrinks by one. Returns `false` (and changes nothing) when `old` does
    /// not exist.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        let new = new.into();
        if old == new {
            return self.lines.contains_key(old);
        }

        let Some((index, _, amount)) = self.lines.shift_remove_full(old) else {
            return false;
        };

        match self.lines.get_mut(&new) {
            Some(existing) => {
                tracing::debug!(from = old, to = %new, "Cost line renamed onto an existing line; overwriting it.");
                *existing = amount;
            }
            None => {
                self.lines.shift_insert(index, new, amount);
            }
        }
        true
    }

    /// Appends a zero-amount line named after the current line count and returns its name.
    ///
    /// The suffix is advanced past any name the user already took by hand.
    pub fn add_line(&mut self) -> String {
        let mut suffix = self.lines.len() + 1;
        let mut name = format!("{GENERATED_LINE_PREFIX}{suffix}");
        while self.lines.contains_key(&name) {
            suffix += 1;
            name = format!("{GENERATED_LINE_PREFIX}{suffix}");
        }
        self.lines.insert(name.clone(), Decimal::ZERO);
        name
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for CostOfGoodsSold {
    fn from_iter<T: IntoIterator<Item = (K, Decimal)>>(iter: T) -> Self {
        Self {
            lines: iter
                .into_iter()
                .map(|(name, amount)| (name.into(), amount))
                .collect(),
        }
    }
}

/// Per-order economics supplied by the user.
///
/// The short aliases are the names records were originally stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnitEconomicsInputs {
    #[serde(alias = "aov")]
    pub average_order_value: Decimal,
    #[serde(alias = "order")]
    pub average_orders_per_customer: Decimal,
    #[serde(alias = "cac")]
    pub customer_acquisition_cost: Decimal,
    #[serde(alias = "cogs")]
    pub cost_of_goods_sold: CostOfGoodsSold,
    /// Only consulted when `churn_enabled` is set; a missing rate counts as zero.
    #[serde(alias = "churn")]
    pub churn_rate_pct: Option<Decimal>,
    #[serde(alias = "enableChurn")]
    pub churn_enabled: bool,
    pub category: String,
}

impl UnitEconomicsInputs {
    /// The churn rate the lifetime-value formula uses.
    pub fn churn_rate(&self) -> Decimal {
        self.churn_rate_pct.unwrap_or(Decimal::ZERO)
    }
}

impl Default for UnitEconomicsInputs {
    fn default() -> Self {
        Self {
            average_order_value: Decimal::ZERO,
            average_orders_per_customer: Decimal::ZERO,
            customer_acquisition_cost: Decimal::ZERO,
            cost_of_goods_sold: CostOfGoodsSold::starter(),
            churn_rate_pct: None,
            churn_enabled: true,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_lines() -> CostOfGoodsSold {
        [("Manufacture", dec!(20)), ("Package", dec!(10)), ("Shipping", dec!(5))]
            .into_iter()
            .collect()
    }

    #[test]
    fn rename_onto_existing_line_overwrites_and_shrinks() {
        let mut cogs = sample_lines();
        assert!(cogs.rename("Manufacture", "Package"));

        assert_eq!(cogs.len(), 2);
        assert!(!cogs.contains("Manufacture"));
        assert_eq!(cogs.get("Package"), Some(dec!(20)));
    }

    #[test]
    fn rename_to_fresh_name_keeps_position() {
        let mut cogs = sample_lines();
        assert!(cogs.rename("Package", "Boxes"));

        let names: Vec<&str> = cogs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Manufacture", "Boxes", "Shipping"]);
        assert_eq!(cogs.get("Boxes"), Some(dec!(10)));
    }

    #[test]
    fn rename_of_missing_line_changes_nothing() {
        let mut cogs = sample_lines();
        assert!(!cogs.rename("Labour", "Manufacture"));
        assert_eq!(cogs, sample_lines());
    }

    #[test]
    fn rename_to_same_name_is_a_no_op() {
        let mut cogs = sample_lines();
        assert!(cogs.rename("Package", "Package"));
        assert_eq!(cogs, sample_lines());
    }

    #[test]
    fn add_line_names_after_count() {
        let mut cogs = CostOfGoodsSold::starter();
        assert_eq!(cogs.add_line(), "COGS3");
        assert_eq!(cogs.get("COGS3"), Some(Decimal::ZERO));
        assert_eq!(cogs.len(), 3);
    }

    #[test]
    fn add_line_skips_names_taken_by_hand() {
        let mut cogs: CostOfGoodsSold =
            [("COGS3", dec!(7)), ("Rent", dec!(3))].into_iter().collect();
        assert_eq!(cogs.add_line(), "COGS4");
        assert_eq!(cogs.get("COGS3"), Some(dec!(7)));
        assert_eq!(cogs.get("COGS4"), Some(Decimal::ZERO));
        assert_eq!(cogs.len(), 3);
    }

    #[test]
    fn remove_and_set_amount() {
        let mut cogs = sample_lines();
        assert_eq!(cogs.remove("Shipping"), Some(dec!(5)));
        cogs.set_amount("Package", dec!(12));
        cogs.set_amount("Labels", dec!(1));
        assert_eq!(cogs.amounts().sum::<Decimal>(), dec!(33));
    }

    #[test]
    fn legacy_record_deserializes_with_defaults() {
        let record = serde_json::json!({
            "aov": 100, "cac": 40, "order": 3, "churn": 5,
            "cogs": { "Manufacture": 20, "Package": 10 },
            "isOpen": false
        });
        let inputs: UnitEconomicsInputs = serde_json::from_value(record).unwrap();

        assert_eq!(inputs.average_order_value, dec!(100));
        assert_eq!(inputs.churn_rate(), dec!(5));
        assert!(inputs.churn_enabled);
        assert_eq!(inputs.category, DEFAULT_CATEGORY);
        assert_eq!(inputs.cost_of_goods_sold.len(), 2);
    }

    #[test]
    fn empty_record_starts_from_starter_lines() {
        let inputs: UnitEconomicsInputs = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(inputs.cost_of_goods_sold, CostOfGoodsSold::starter());
        assert_eq!(inputs.churn_rate(), Decimal::ZERO);
    }
}
