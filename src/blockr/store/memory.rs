use super::KeyValueStore;
use crate::error::{BlockrError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory key-value store for testing.
///
/// The map sits behind a `std::sync::Mutex` that is never held across an
/// await point. Reads yield to the runtime first, so interleavings between
/// concurrent callers look like they would against a real async store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    simulate_read_error: AtomicBool,
    simulate_write_error: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable read error simulation for testing error handling.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| BlockrError::Store("Memory store lock poisoned".to_string()))
    }

    fn check_read(&self) -> Result<()> {
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(BlockrError::Store("Simulated read error".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(BlockrError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        tokio::task::yield_now().await;
        self.check_read()?;
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_write()?;
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_write()?;
        self.entries()?.remove(key);
        Ok(())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        self.check_write()?;
        let mut entries = self.entries()?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>> {
        self.check_read()?;
        Ok(self.entries()?.keys().cloned().collect())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        self.check_read()?;
        let entries = self.entries()?;
        Ok(keys
            .iter()
            .map(|k| (k.clone(), entries.get(k).cloned()))
            .collect())
    }
}
