use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::rsvp::RsvpRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence seam for RSVP records. One record per group identifier;
/// `upsert` fully replaces any prior record for the same group but keeps
/// its store-assigned id, so an id handed out earlier stays deletable.
#[async_trait]
pub trait RsvpStore: Send + Sync {
    async fn find_by_group(&self, group_id: &str) -> Result<Option<RsvpRecord>, StoreError>;

    /// Returns the record as persisted, carrying the surviving id.
    async fn upsert(&self, record: RsvpRecord) -> Result<RsvpRecord, StoreError>;

    async fn list_all(&self) -> Result<Vec<RsvpRecord>, StoreError>;

    /// Remove the record carrying this store-assigned id. Returns whether
    /// anything was deleted.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}

/// In-memory store backing the API tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, RsvpRecord>>,
}

#[async_trait]
impl RsvpStore for MemoryStore {
    async fn find_by_group(&self, group_id: &str) -> Result<Option<RsvpRecord>, StoreError> {
        Ok(self.records.lock().await.get(group_id).cloned())
    }

    async fn upsert(&self, mut record: RsvpRecord) -> Result<RsvpRecord, StoreError> {
        let mut records = self.records.lock().await;
        if let Some(existing) = records.get(&record.group_id) {
            record.id = existing.id.clone();
        }
        records.insert(record.group_id.clone(), record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<RsvpRecord>, StoreError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        let group_id = records
            .values()
            .find(|record| record.id == id)
            .map(|record| record.group_id.clone());
        match group_id {
            Some(group_id) => {
                records.remove(&group_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
