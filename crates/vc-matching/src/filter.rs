use crate::dataset::VcRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Search criteria. Every criterion is optional and blank strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcFilter {
    /// Matched against the countries of investment and the global HQ.
    pub location: Option<String>,
    pub stage: Option<String>,
    pub investor_type: Option<String>,
    pub min_cheque: Option<Decimal>,
    pub max_cheque: Option<Decimal>,
}

impl VcFilter {
    /// Whether `record` passes every active criterion.
    ///
    /// Text criteria are case-insensitive substring matches. An investor with no recorded
    /// cheque bound passes the corresponding cheque criterion.
    pub fn matches(&self, record: &VcRecord) -> bool {
        if let Some(location) = active(&self.location) {
            let in_countries = contains(&record.countries_of_investment, location);
            let in_hq = contains(&record.global_hq, location);
            if !in_countries && !in_hq {
                return false;
            }
        }
        if let Some(stage) = active(&self.stage) {
            if !contains(&record.stage_of_investment, stage) {
                return false;
            }
        }
        if let Some(investor_type) = active(&self.investor_type) {
            if !contains(&record.investor_type, investor_type) {
                return false;
            }
        }
        if let (Some(min), Some(cheque)) = (self.min_cheque, record.first_cheque_minimum) {
            if cheque < min {
                return false;
            }
        }
        if let (Some(max), Some(cheque)) = (self.max_cheque, record.first_cheque_maximum) {
            if cheque > max {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[VcRecord]) -> Vec<VcRecord> {
        let matched: Vec<VcRecord> = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        tracing::debug!(before = records.len(), after = matched.len(), "Investor filter applied.");
        matched
    }
}

fn active(criterion: &Option<String>) -> Option<&str> {
    criterion
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn contains(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}
