//! # Command Layer
//!
//! Record-level business logic over a [`KeyValueStore`]. Every function here is
//! fallible and returns [`Result`]; absorbing failures into booleans and
//! defaults is the job of [`crate::api`], not of this layer.
//!
//! ## Whole-Collection Overwrite
//!
//! A collection is one JSON value under one key. Every mutation loads the full
//! collection, edits it in memory and writes the whole thing back with a single
//! `set`. There is no index and no delta format.
//!
//! These read-modify-write sequences take no lock themselves. Two callers
//! racing through the same sequence can lose an update, so concurrent writers
//! must go through [`crate::api::BlockrApi`], which serializes them per key.
//!
//! ## Decoding During Updates
//!
//! When a read-modify-write finds a value that no longer decodes, it starts from
//! an empty collection and the next write replaces the corrupt value. The
//! decode error comes back in [`Applied::discarded`] so the caller can tell the
//! user. A store *read* failure aborts the update instead, so a transient I/O
//! error can never wipe a collection.

use crate::error::{BlockrError, Result};
use crate::store::{KeyValueStore, StorageKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

pub mod contacts;
pub mod maintenance;
pub mod preferences;
pub mod schedule;

/// Whether an upsert replaced an existing record or appended a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Outcome of a read-modify-write.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    /// Set when the stored collection did not decode and was overwritten.
    pub discarded: Option<serde_json::Error>,
}

/// Reads and decodes the value under `key`. `Ok(None)` if absent.
pub(crate) async fn read_json<S, T>(store: &S, key: StorageKey) -> Result<Option<T>>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match store.get(key.as_str()).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes `value` and overwrites `key` with a single `set`.
pub(crate) async fn write_json<S, T>(store: &S, key: StorageKey, value: &T) -> Result<()>
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key.as_str(), &raw).await
}

/// Loads a collection for a read-modify-write. Undecodable data is dropped in
/// favour of an empty collection and its decode error handed back; store
/// errors propagate.
pub(crate) async fn read_collection_for_update<S, T>(
    store: &S,
    key: StorageKey,
) -> Result<(Vec<T>, Option<serde_json::Error>)>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match read_json(store, key).await {
        Ok(items) => Ok((items.unwrap_or_default(), None)),
        Err(BlockrError::Serialization(e)) => {
            error!(%key, error = %e, "stored collection is corrupt, rebuilding from empty");
            Ok((Vec::new(), Some(e)))
        }
        Err(e) => Err(e),
    }
}

/// Replaces the first item whose id equals `item`'s, else appends.
pub(crate) fn upsert_by_id<T, F>(items: &mut Vec<T>, item: T, id_of: F) -> Upsert
where
    F: Fn(&T) -> &str,
{
    match items.iter().position(|existing| id_of(existing) == id_of(&item)) {
        Some(index) => {
            items[index] = item;
            Upsert::Updated
        }
        None => {
            items.push(item);
            Upsert::Inserted
        }
    }
}
