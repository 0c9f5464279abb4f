use crate::error::VcError;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::path::Path;
use std::str::FromStr;

/// Column names of the investor spreadsheet.
pub mod columns {
    pub const NAME: &str = "Investor name";
    pub const GLOBAL_HQ: &str = "Global HQ";
    pub const COUNTRIES: &str = "Countries of investment";
    pub const STAGE: &str = "Stage of investment";
    pub const INVESTOR_TYPE: &str = "Investor type";
    pub const CHEQUE_MIN: &str = "First cheque minimum";
    pub const CHEQUE_MAX: &str = "First cheque maximum";
}

/// One investor, with the columns the search looks at pulled out and typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VcRecord {
    pub name: Option<String>,
    pub global_hq: Option<String>,
    pub countries_of_investment: Option<String>,
    pub stage_of_investment: Option<String>,
    pub investor_type: Option<String>,
    /// `None` when the cell is empty or not a number.
    pub first_cheque_minimum: Option<Decimal>,
    pub first_cheque_maximum: Option<Decimal>,
    /// Every column of the row, untouched, for display.
    pub columns: Map<String, JsonValue>,
}

impl VcRecord {
    pub fn from_columns(columns: Map<String, JsonValue>) -> Self {
        Self {
            name: text(columns.get(columns::NAME)),
            global_hq: text(columns.get(columns::GLOBAL_HQ)),
            countries_of_investment: text(columns.get(columns::COUNTRIES)),
            stage_of_investment: text(columns.get(columns::STAGE)),
            investor_type: text(columns.get(columns::INVESTOR_TYPE)),
            first_cheque_minimum: numeric(columns.get(columns::CHEQUE_MIN)),
            first_cheque_maximum: numeric(columns.get(columns::CHEQUE_MAX)),
            columns,
        }
    }
}

/// Reads a JSON array of investor objects from `path`.
pub fn load_dataset(path: &Path) -> Result<Vec<VcRecord>, VcError> {
    let raw = std::fs::read_to_string(path)?;
    let records = parse_dataset(&raw)?;
    tracing::info!(path = %path.display(), investors = records.len(), "Investor dataset loaded.");
    Ok(records)
}

pub fn parse_dataset(raw: &str) -> Result<Vec<VcRecord>, VcError> {
    let rows: Vec<JsonValue> = serde_json::from_str(raw)?;
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            JsonValue::Object(columns) => Ok(VcRecord::from_columns(columns)),
            _ => Err(VcError::InvalidRecord(index)),
        })
        .collect()
}

fn text(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Anything that is not cleanly numeric counts as a missing value.
fn numeric(value: Option<&JsonValue>) -> Option<Decimal> {
    let raw = match value? {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cheque_columns_are_coerced() {
        let records = parse_dataset(
            r#"[
                {"Investor name": "Alpha", "First cheque minimum": 50000, "First cheque maximum": "250000"},
                {"Investor name": "Beta", "First cheque minimum": "n/a", "First cheque maximum": null},
                {"Investor name": "Gamma", "First cheque minimum": "1e5"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].first_cheque_minimum, Some(dec!(50000)));
        assert_eq!(records[0].first_cheque_maximum, Some(dec!(250000)));
        assert_eq!(records[1].first_cheque_minimum, None);
        assert_eq!(records[1].first_cheque_maximum, None);
        assert_eq!(records[2].first_cheque_minimum, Some(dec!(100000)));
    }

    #[test]
    fn extra_columns_are_kept() {
        let records =
            parse_dataset(r#"[{"Investor name": "Alpha", "Website": "alpha.vc", "Founded": 2011}]"#)
                .unwrap();
        assert_eq!(records[0].name.as_deref(), Some("Alpha"));
        assert_eq!(records[0].columns.len(), 3);
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = parse_dataset(r#"[{"Investor name": "Alpha"}, 7]"#).unwrap_err();
        assert!(matches!(err, VcError::InvalidRecord(1)));
    }
}
