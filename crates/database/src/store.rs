use crate::error::DbError;
use crate::records::UnitEconomicsRecord;
use async_trait::async_trait;
use core_types::{RecordKind, ValuationInputs};
use serde_json::Value as JsonValue;

/// Per-user record persistence, injected into whatever drives the calculators.
///
/// Callers load the inputs before a calculation and save them afterwards; the engines never
/// touch storage themselves.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Registers a user and seeds the onboarding records.
    ///
    /// Returns `false` if the user already existed; their records are left as they are.
    async fn register_user(&self, uid: &str) -> Result<bool, DbError>;

    /// Fetches the raw record of `kind` for `uid`.
    ///
    /// Fails with `UserNotRegistered` for unknown users and `NotFound` when the user has no
    /// record of that kind.
    async fn load_record(&self, uid: &str, kind: RecordKind) -> Result<JsonValue, DbError>;

    /// Replaces an existing record. Records are only created by onboarding, so saving a
    /// record that does not exist fails the same way loading it would.
    async fn save_record(
        &self,
        uid: &str,
        kind: RecordKind,
        payload: JsonValue,
    ) -> Result<(), DbError>;

    async fn load_valuation(&self, uid: &str) -> Result<ValuationInputs, DbError> {
        let payload = self.load_record(uid, RecordKind::Valuation).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn save_valuation(&self, uid: &str, inputs: &ValuationInputs) -> Result<(), DbError> {
        let payload = serde_json::to_value(inputs)?;
        self.save_record(uid, RecordKind::Valuation, payload).await
    }

    async fn load_unit_economics(&self, uid: &str) -> Result<UnitEconomicsRecord, DbError> {
        let payload = self.load_record(uid, RecordKind::UnitEconomics).await?;
        Ok(UnitEconomicsRecord::from_json(payload)?)
    }

    async fn save_unit_economics(
        &self,
        uid: &str,
        record: &UnitEconomicsRecord,
    ) -> Result<(), DbError> {
        let payload = record.to_json()?;
        self.save_record(uid, RecordKind::UnitEconomics, payload).await
    }
}
