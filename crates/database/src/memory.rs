use crate::error::DbError;
use crate::records::onboarding_records;
use crate::store::RecordStore;
use async_trait::async_trait;
use core_types::RecordKind;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type UserRecords = HashMap<RecordKind, JsonValue>;

/// A process-local `RecordStore`. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<String, UserRecords>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn register_user(&self, uid: &str) -> Result<bool, DbError> {
        let defaults = onboarding_records()?;
        let mut users = self.users.write().await;
        let created = !users.contains_key(uid);

        // Existing records are never reset; only missing kinds are seeded.
        let records = users.entry(uid.to_string()).or_default();
        for (kind, payload) in defaults {
            records.entry(kind).or_insert(payload);
        }

        if created {
            tracing::info!(uid, "User onboarded.");
        }
        Ok(created)
    }

    async fn load_record(&self, uid: &str, kind: RecordKind) -> Result<JsonValue, DbError> {
        let users = self.users.read().await;
        let records = users
            .get(uid)
            .ok_or_else(|| DbError::UserNotRegistered(uid.to_string()))?;
        records.get(&kind).cloned().ok_or_else(|| DbError::NotFound {
            uid: uid.to_string(),
            kind,
        })
    }

    async fn save_record(
        &self,
        uid: &str,
        kind: RecordKind,
        payload: JsonValue,
    ) -> Result<(), DbError> {
        let mut users = self.users.write().await;
        let records = users
            .get_mut(uid)
            .ok_or_else(|| DbError::UserNotRegistered(uid.to_string()))?;
        let slot = records.get_mut(&kind).ok_or_else(|| DbError::NotFound {
            uid: uid.to_string(),
            kind,
        })?;
        *slot = payload;
        tracing::debug!(uid, %kind, "Record saved.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{UnitEconomicsInputs, ValuationInputs};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn unknown_user_is_not_registered() {
        let store = InMemoryStore::new();
        let err = store.load_valuation("nobody").await.unwrap_err();
        assert!(matches!(err, DbError::UserNotRegistered(uid) if uid == "nobody"));

        let err = store
            .save_valuation("nobody", &ValuationInputs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UserNotRegistered(_)));
    }

    #[tokio::test]
    async fn onboarding_seeds_default_records() {
        let store = InMemoryStore::new();
        assert!(store.register_user("founder-1").await.unwrap());

        let valuation = store.load_valuation("founder-1").await.unwrap();
        assert_eq!(valuation, ValuationInputs::onboarding());

        let unit = store.load_unit_economics("founder-1").await.unwrap();
        assert!(unit.inputs.churn_enabled);
        assert_eq!(unit.snapshot.ltv, dec!(0));
    }

    #[tokio::test]
    async fn registering_twice_keeps_saved_records() {
        let store = InMemoryStore::new();
        store.register_user("founder-1").await.unwrap();

        let inputs = ValuationInputs {
            annual_revenue: dec!(250000),
            projection_years: 5,
            ..ValuationInputs::default()
        };
        store.save_valuation("founder-1", &inputs).await.unwrap();

        assert!(!store.register_user("founder-1").await.unwrap());
        assert_eq!(store.load_valuation("founder-1").await.unwrap(), inputs);
    }

    #[tokio::test]
    async fn registering_again_seeds_only_missing_kinds() {
        let store = InMemoryStore::new();
        let inputs = ValuationInputs {
            annual_revenue: dec!(90),
            ..ValuationInputs::default()
        };
        let mut partial = HashMap::new();
        partial.insert(RecordKind::Valuation, serde_json::to_value(&inputs).unwrap());
        store.users.write().await.insert("half-done".to_string(), partial);

        assert!(!store.register_user("half-done").await.unwrap());
        assert_eq!(store.load_valuation("half-done").await.unwrap(), inputs);
        let unit = store.load_unit_economics("half-done").await.unwrap();
        assert_eq!(unit.inputs, UnitEconomicsInputs::default());
    }

    #[tokio::test]
    async fn saving_a_missing_record_is_not_found() {
        let store = InMemoryStore::new();
        store.users.write().await.insert("half-done".to_string(), HashMap::new());

        let err = store
            .save_record("half-done", RecordKind::Valuation, serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound { kind: RecordKind::Valuation, .. }
        ));
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        store.register_user("founder-2").await.unwrap();

        let mut record = handle.load_unit_economics("founder-2").await.unwrap();
        record.inputs.average_order_value = dec!(80);
        handle.save_unit_economics("founder-2", &record).await.unwrap();

        let reloaded = store.load_unit_economics("founder-2").await.unwrap();
        assert_eq!(reloaded.inputs.average_order_value, dec!(80));
    }
}
