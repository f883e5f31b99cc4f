//! Saved-history queries.

use async_trait::async_trait;
use betslip_core::db::unix_timestamp;
use betslip_core::history::HistoryStore;
use serde_json::Value;

use super::db::{DatabaseError, HistoryDatabase};
use super::models::SavedBetslipRow;

impl HistoryDatabase {
    /// Every saved record in display order.
    pub async fn list_records(&self) -> Result<Vec<Value>, DatabaseError> {
        let rows = sqlx::query_as::<_, SavedBetslipRow>(
            "SELECT position, payload, updated_at FROM saved_betslips ORDER BY position",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_str(&row.payload).map_err(|e| {
                    DatabaseError::Query(format!("Corrupt saved betslip at {}: {e}", row.position))
                })
            })
            .collect()
    }

    /// Replace the whole history in one transaction.
    pub async fn replace_records(&self, records: &[Value]) -> Result<(), DatabaseError> {
        let now = unix_timestamp();
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM saved_betslips")
            .execute(&mut *tx)
            .await?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO saved_betslips (position, payload, updated_at)
                VALUES (?, ?, ?)
                ",
            )
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(record.to_string())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Unix time of the last write, or `None` for an empty history.
    pub async fn last_updated(&self) -> Result<Option<i64>, DatabaseError> {
        let row: (Option<i64>,) = sqlx::query_as("SELECT MAX(updated_at) FROM saved_betslips")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }
}

#[async_trait]
impl HistoryStore for HistoryDatabase {
    async fn list(&self) -> betslip_core::Result<Vec<Value>> {
        Ok(self.list_records().await?)
    }

    async fn replace(&self, records: Vec<Value>) -> betslip_core::Result<()> {
        Ok(self.replace_records(&records).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use betslip_core::history::{delete_betslip, load_betslips, save_betslip};
    use betslip_core::normalize_betslip;
    use serde_json::json;

    #[tokio::test]
    async fn empty_history() {
        let db = HistoryDatabase::open_in_memory().await.unwrap();
        assert!(db.list_records().await.unwrap().is_empty());
        assert_eq!(db.last_updated().await.unwrap(), None);
    }

    #[tokio::test]
    async fn replace_keeps_order_and_payloads() {
        let db = HistoryDatabase::open_in_memory().await.unwrap();
        let records = vec![
            json!({ "_id": "b", "totalOdd": 3.2 }),
            json!({ "_id": "a", "selections": [] }),
        ];
        db.replace_records(&records).await.unwrap();
        assert_eq!(db.list_records().await.unwrap(), records);
        assert!(db.last_updated().await.unwrap().is_some());

        db.replace_records(&records[1..]).await.unwrap();
        assert_eq!(db.list_records().await.unwrap(), vec![records[1].clone()]);
    }

    #[tokio::test]
    async fn corrupt_payload_is_reported() {
        let db = HistoryDatabase::open_in_memory().await.unwrap();
        sqlx::query("INSERT INTO saved_betslips (position, payload, updated_at) VALUES (0, '{', 0)")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(matches!(
            db.list_records().await,
            Err(DatabaseError::Query(_))
        ));
    }

    #[tokio::test]
    async fn history_operations_through_the_store() {
        let db = HistoryDatabase::open_in_memory().await.unwrap();
        let first = normalize_betslip(&json!({ "id": "s1", "totalOdd": 2.5 }), 0);
        let second = normalize_betslip(&json!({ "id": "s2", "totalOdd": 4.0 }), 1);
        assert!(save_betslip(&db, &first).await.unwrap());
        assert!(save_betslip(&db, &second).await.unwrap());

        assert!(delete_betslip(&db, "s1").await.unwrap());
        assert!(!delete_betslip(&db, "s1").await.unwrap());

        let left = load_betslips(&db).await.unwrap();
        assert_eq!(left, vec![second]);
    }
}
