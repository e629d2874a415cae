//! # Storage Layer
//!
//! This module defines the key-value abstraction BlockR persists through. The
//! [`KeyValueStore`] trait mirrors the small async string store a mobile app
//! gets from its platform: get, set, remove, batched remove, key listing and
//! batched get.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with [`memory::MemoryStore`] (no filesystem needed)
//! - Keep the record logic in `commands/` **decoupled** from where bytes land
//!
//! The store only guarantees that a single call is atomic. Nothing spans keys.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage
//!   - Every key lives in one JSON object file (`storage.json`)
//!   - Each write rewrites the file through a temp file and rename
//!
//! - [`memory::MemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate read and write failures
//!
//! ## Key Layout
//!
//! ```text
//! @BlockR_contacts        # JSON array of contacts
//! @BlockR_schedule_rules  # JSON array of schedule rules
//! @BlockR_preferences     # JSON preferences object
//! @BlockR_call_history    # reserved, only ever cleared
//! ```
//!
//! Keys are addressed through [`StorageKey`] so no call site spells them out.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

pub mod fs;
pub mod memory;

/// Prefix shared by every key BlockR owns in the store.
pub const NAMESPACE_PREFIX: &str = "@BlockR_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Contacts,
    ScheduleRules,
    Preferences,
    CallHistory,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Contacts,
        StorageKey::ScheduleRules,
        StorageKey::Preferences,
        StorageKey::CallHistory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Contacts => "@BlockR_contacts",
            StorageKey::ScheduleRules => "@BlockR_schedule_rules",
            StorageKey::Preferences => "@BlockR_preferences",
            StorageKey::CallHistory => "@BlockR_call_history",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract interface for an async string key-value store.
///
/// Implementations must make each individual call atomic. Callers await
/// operations one at a time and get no guarantees across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove several keys in one batch.
    async fn multi_remove(&self, keys: &[&str]) -> Result<()>;

    /// List every key currently present.
    async fn get_all_keys(&self) -> Result<Vec<String>>;

    /// Read several keys in one batch, preserving the requested order.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>>;
}
