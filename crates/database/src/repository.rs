use crate::DbError;
use crate::records::onboarding_records;
use crate::store::RecordStore;
use async_trait::async_trait;
use core_types::RecordKind;
use serde_json::Value as JsonValue;
use sqlx::Row;
use sqlx::postgres::PgPool;

/// The `DbRepository` provides the PostgreSQL-backed `RecordStore`.
/// Each record is a JSONB payload keyed by user uid and record kind.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, uid: &str) -> Result<bool, DbError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE uid = $1)")
            .bind(uid)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl RecordStore for DbRepository {
    async fn register_user(&self, uid: &str) -> Result<bool, DbError> {
        let defaults = onboarding_records()?;
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT INTO users (uid) VALUES ($1) ON CONFLICT (uid) DO NOTHING")
            .bind(uid)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // Existing records are never reset; only missing kinds are seeded.
        for (kind, payload) in defaults {
            sqlx::query(
                r#"
                INSERT INTO user_records (uid, kind, payload)
                VALUES ($1, $2, $3)
                ON CONFLICT (uid, kind) DO NOTHING
                "#,
            )
            .bind(uid)
            .bind(kind.attribute())
            .bind(payload)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let created = inserted == 1;
        if created {
            tracing::info!(uid, "User onboarded.");
        }
        Ok(created)
    }

    async fn load_record(&self, uid: &str, kind: RecordKind) -> Result<JsonValue, DbError> {
        let row = sqlx::query("SELECT payload FROM user_records WHERE uid = $1 AND kind = $2")
            .bind(uid)
            .bind(kind.attribute())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return Ok(row.try_get::<JsonValue, _>("payload")?);
        }
        if !self.user_exists(uid).await? {
            return Err(DbError::UserNotRegistered(uid.to_string()));
        }
        Err(DbError::NotFound {
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
        let updated = sqlx::query(
            "UPDATE user_records SET payload = $3, updated_at = now() WHERE uid = $1 AND kind = $2",
        )
        .bind(uid)
        .bind(kind.attribute())
        .bind(payload)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            if !self.user_exists(uid).await? {
                return Err(DbError::UserNotRegistered(uid.to_string()));
            }
            return Err(DbError::NotFound {
                uid: uid.to_string(),
                kind,
            });
        }

        tracing::debug!(uid, %kind, "Record saved.");
        Ok(())
    }
}
