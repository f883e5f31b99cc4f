//! Saved-betslip history.
//!
//! The store keeps raw records and only supports whole-collection reads and
//! writes; deleting one betslip is filter-by-id followed by a replace.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::normalize::{Betslip, normalize_betslip, text};

/// Record keys that may carry a saved betslip's id.
const RECORD_ID_KEYS: &[&str] = &["_id", "id"];
/// Prefix of the ids given to stored records that carry none.
const STORED_ID_PREFIX: &str = "saved";

/// Persistence collaborator holding raw saved betslips in display order.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Value>>;
    async fn replace(&self, records: Vec<Value>) -> Result<()>;
}

/// Whether a raw record is identified by `id` under `_id` or `id`.
pub fn record_matches(record: &Value, id: &str) -> bool {
    RECORD_ID_KEYS
        .iter()
        .any(|key| record.get(key).and_then(text).as_deref() == Some(id))
}

/// Whether a raw record carries an id of its own.
pub fn has_record_id(record: &Value) -> bool {
    RECORD_ID_KEYS
        .iter()
        .any(|key| record.get(key).and_then(text).is_some())
}

/// Id of an id-less record at `position` in the stored list.
///
/// Derived from the position alone, so every load of the same list agrees.
pub fn stored_id(position: usize) -> String {
    format!("{STORED_ID_PREFIX}-{position}")
}

/// Remove the first record matching `id`, keeping the others in order.
///
/// Id-less records match the [`stored_id`] of their position.
pub fn remove_record(records: &mut Vec<Value>, id: &str) -> Option<Value> {
    let pos = records.iter().enumerate().position(|(position, r)| {
        record_matches(r, id) || (!has_record_id(r) && stored_id(position) == id)
    })?;
    Some(records.remove(pos))
}

/// Normalize a stored record, giving an id-less one its [`stored_id`].
pub fn normalize_stored(record: &Value, position: usize) -> Betslip {
    if has_record_id(record) {
        return normalize_betslip(record, position);
    }
    let mut keyed = match record {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    keyed.insert("id".to_string(), Value::String(stored_id(position)));
    normalize_betslip(&Value::Object(keyed), position)
}

/// Delete one saved betslip. Returns `false` when no record matched.
pub async fn delete_betslip<S: HistoryStore + ?Sized>(store: &S, id: &str) -> Result<bool> {
    let mut records = store.list().await?;
    if remove_record(&mut records, id).is_none() {
        debug!(id, "No saved betslip to delete");
        return Ok(false);
    }
    store.replace(records).await?;
    Ok(true)
}

/// Append a betslip to the history. Returns `false` if its id is already saved.
pub async fn save_betslip<S: HistoryStore + ?Sized>(store: &S, betslip: &Betslip) -> Result<bool> {
    let mut records = store.list().await?;
    if records.iter().any(|r| record_matches(r, &betslip.id)) {
        return Ok(false);
    }
    records.push(betslip.to_raw()?);
    store.replace(records).await?;
    Ok(true)
}

/// Load and normalize every saved betslip.
///
/// Every returned id is accepted by [`delete_betslip`] on the same list.
pub async fn load_betslips<S: HistoryStore + ?Sized>(store: &S) -> Result<Vec<Betslip>> {
    let records = store.list().await?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(position, raw)| normalize_stored(raw, position))
        .collect())
}
