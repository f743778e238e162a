//! Data store capability
//!
//! Components that want persisted records receive a [`Store`] explicitly.
//! Sites without a backing store use [`NoopStore`], which accepts writes and
//! returns nothing.

use serde_json::{Map, Value};
use thiserror::Error;

/// A single stored record
pub type Record = Map<String, Value>;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Access to named collections of records
pub trait Store: Send + Sync {
    /// Fetch every record in `collection`
    fn select(&self, collection: &str) -> Result<Vec<Record>, StoreError>;

    /// Append a record to `collection`
    fn insert(&self, collection: &str, record: Record) -> Result<(), StoreError>;
}

/// Store that holds nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl Store for NoopStore {
    fn select(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        tracing::debug!("NoopStore: select from {} returns no records", collection);
        Ok(Vec::new())
    }

    fn insert(&self, collection: &str, _record: Record) -> Result<(), StoreError> {
        tracing::debug!("NoopStore: insert into {} discarded", collection);
        Ok(())
    }
}
