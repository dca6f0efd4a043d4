//! Cache for the public job list, stored under one fixed key.
//!
//! Every invalidation bumps a generation counter. A reader notes the
//! generation before loading from the store and its `put` is dropped when an
//! invalidation happened in between, so a list loaded before a write can
//! never be cached after it.

use anyhow::Result;
use async_trait::async_trait;

use crate::jobs::models::JobListing;

/// Fixed cache key for the mapped public job list.
pub const LISTING_KEY: &str = "jobs:active";
pub const GENERATION_KEY: &str = "jobs:active:generation";

/// Writes the list only while the generation still matches ARGV[1].
const PUT_IF_CURRENT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[2]) or '0')
if current ~= tonumber(ARGV[1]) then
    return 0
end
redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
return 1
"#;

#[async_trait]
pub trait ListingCache: Send + Sync {
    async fn get(&self) -> Result<Option<Vec<JobListing>>>;

    /// Current invalidation counter, read before loading from the store.
    async fn generation(&self) -> Result<u64>;

    /// Stores `jobs` unless the cache was invalidated after `generation` was read.
    /// Returns whether the list was written.
    async fn put(&self, jobs: &[JobListing], generation: u64) -> Result<bool>;

    async fn invalidate(&self) -> Result<()>;
}

pub struct RedisListingCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisListingCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl ListingCache for RedisListingCache {
    async fn get(&self) -> Result<Option<Vec<JobListing>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(LISTING_KEY)
            .query_async(&mut conn)
            .await?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn generation(&self) -> Result<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<u64> = redis::cmd("GET")
            .arg(GENERATION_KEY)
            .query_async(&mut conn)
            .await?;
        Ok(raw.unwrap_or(0))
    }

    async fn put(&self, jobs: &[JobListing], generation: u64) -> Result<bool> {
        let payload = serde_json::to_string(jobs)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let written: i32 = redis::Script::new(PUT_IF_CURRENT)
            .key(LISTING_KEY)
            .key(GENERATION_KEY)
            .arg(generation)
            .arg(payload)
            .arg(self.ttl_secs)
            .invoke_async(&mut conn)
            .await?;
        Ok(written == 1)
    }

    async fn invalidate(&self) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(GENERATION_KEY)
            .ignore()
            .cmd("DEL")
            .arg(LISTING_KEY)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
