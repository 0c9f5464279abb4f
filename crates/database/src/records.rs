use analytics::UnitEconomicsSnapshot;
use core_types::{RecordKind, UnitEconomicsInputs, ValuationInputs};
use serde_json::Value as JsonValue;

/// A stored unit-economics record: the user's inputs plus the metrics last shown to them.
///
/// Both halves live side by side in one flat JSON object, which is how the records have
/// always been shaped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitEconomicsRecord {
    pub inputs: UnitEconomicsInputs,
    pub snapshot: UnitEconomicsSnapshot,
}

impl UnitEconomicsRecord {
    pub fn from_json(payload: JsonValue) -> Result<Self, serde_json::Error> {
        // Each half ignores the other half's keys.
        let snapshot = serde_json::from_value(payload.clone())?;
        let inputs = serde_json::from_value(payload)?;
        Ok(Self { inputs, snapshot })
    }

    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        let mut payload = serde_json::to_value(&self.inputs)?;
        if let (JsonValue::Object(fields), JsonValue::Object(metrics)) =
            (&mut payload, serde_json::to_value(&self.snapshot)?)
        {
            fields.extend(metrics);
        }
        Ok(payload)
    }
}

/// The records a user is given at onboarding, keyed by kind.
pub fn onboarding_records() -> Result<Vec<(RecordKind, JsonValue)>, serde_json::Error> {
    RecordKind::ALL
        .into_iter()
        .map(|kind| {
            let payload = match kind {
                RecordKind::UnitEconomics => UnitEconomicsRecord::default().to_json()?,
                RecordKind::Valuation => serde_json::to_value(ValuationInputs::onboarding())?,
            };
            Ok((kind, payload))
        })
        .collect()
}
