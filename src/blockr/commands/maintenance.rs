use crate::error::Result;
use crate::store::{KeyValueStore, StorageKey, NAMESPACE_PREFIX};
use tracing::{debug, info};

/// Removes every BlockR key, call history included, in one batch.
pub async fn clear_all_data<S: KeyValueStore>(store: &S) -> Result<()> {
    let keys: Vec<&str> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
    store.multi_remove(&keys).await?;
    info!("all stored data cleared");
    Ok(())
}

/// Total length, in characters, of every value stored under a BlockR key.
/// Keys outside the namespace are ignored.
pub async fn storage_size<S: KeyValueStore>(store: &S) -> Result<usize> {
    let keys = store.get_all_keys().await?;
    let entries = store.multi_get(&keys).await?;
    let total: usize = entries
        .iter()
        .filter(|(key, _)| key.starts_with(NAMESPACE_PREFIX))
        .map(|(_, value)| value.as_deref().map_or(0, |v| v.chars().count()))
        .sum();
    debug!(total, "storage size computed");
    Ok(total)
}
