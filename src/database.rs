//! # Redis
//!
//! Persistent store for RSVP records.
//!
//! ## Requirements
//!
//! - One record per group identifier, replaced in full on resubmission
//! - Atomic upsert so concurrent submissions for the same group can only
//!   race last-write-wins, never interleave fields
//! - Small dataset, tens to low hundreds of parties for a single event
//!
//! ## Implementation
//!
//! - Single Redis hash: field is the group identifier, value is the record
//!   serialized as JSON
//! - `HSET` gives the atomic replace-or-insert, `HGET` the point lookup
//! - The upsert reads the prior record first only to carry its assigned id
//!   forward; the write itself is still a single `HSET`, last write wins
//! - Listing and delete-by-id read the whole hash, which is fine at this
//!   dataset size
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};

use crate::{
    rsvp::RsvpRecord,
    store::{RsvpStore, StoreError},
};

pub const RSVP_HASH: &str = "rsvp:records";

/// Failing to reach Redis here is fatal: the process must not serve
/// requests against a store it could not connect to.
pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100))
        .set_response_timeout(Duration::from_secs(10));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl RsvpStore for RedisStore {
    async fn find_by_group(&self, group_id: &str) -> Result<Option<RsvpRecord>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(RSVP_HASH, group_id).await?;
        raw.as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    async fn upsert(&self, mut record: RsvpRecord) -> Result<RsvpRecord, StoreError> {
        if let Some(existing) = self.find_by_group(&record.group_id).await? {
            record.id = existing.id;
        }
        let mut connection = self.connection.clone();
        let raw = serde_json::to_string(&record)?;
        let _: () = connection.hset(RSVP_HASH, &record.group_id, raw).await?;
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<RsvpRecord>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Vec<String> = connection.hvals(RSVP_HASH).await?;
        raw.iter()
            .map(|value| serde_json::from_str(value).map_err(Into::into))
            .collect()
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let target = self
            .list_all()
            .await?
            .into_iter()
            .find(|record| record.id == id);
        match target {
            Some(record) => {
                let mut connection = self.connection.clone();
                let removed: i64 = connection.hdel(RSVP_HASH, &record.group_id).await?;
                Ok(removed > 0)
            }
            None => Ok(false),
        }
    }
}
