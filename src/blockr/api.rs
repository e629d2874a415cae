//! # API Facade
//!
//! [`BlockrApi`] is the single entry point every consumer (the CLI today, any
//! other UI tomorrow) goes through to touch stored data.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Absorbs failures**: writes report a `bool`, reads fall back to an empty
//!   collection or default preferences. Nothing is thrown at the UI.
//! - **Serializes writers**: one async lock per collection key wraps every
//!   read-modify-write, so concurrent callers cannot lose each other's updates
//! - **Surfaces corruption once**: a value that fails to decode, whether a load
//!   ignored it or an update overwrote it, is logged and queued as a
//!   [`StorageWarning`] the UI can show a single time. So is a store file that
//!   is unreadable as a whole.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: upsert, stamp-once and filtering live in `commands/`
//! - **Retries**: a failed call stays failed
//! - **Presentation**: returns data, never formatted text
//!
//! ## Generic Over KeyValueStore
//!
//! `BlockrApi<S: KeyValueStore>` is generic over the store:
//! - Production: `BlockrApi<FileStore>`
//! - Testing: `BlockrApi<MemoryStore>`
//!
//! The facade is `Send + Sync`; share it across tasks with `Arc`.

use crate::commands::{contacts, maintenance, preferences, schedule, Applied};
use crate::error::{BlockrError, Result};
use crate::model::{BlockStats, Contact, ScheduleRule, UserPreferences};
use crate::store::{KeyValueStore, StorageKey};
use chrono::{NaiveTime, Utc};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Stored data that could not be decoded and was treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWarning {
    /// `None` when the store file itself is unreadable.
    pub key: Option<StorageKey>,
    pub message: String,
}

#[derive(Default)]
struct WarningLog {
    seen: HashSet<Option<StorageKey>>,
    pending: Vec<StorageWarning>,
}

pub struct BlockrApi<S: KeyValueStore> {
    store: S,
    contacts_lock: Mutex<()>,
    rules_lock: Mutex<()>,
    prefs_lock: Mutex<()>,
    warnings: std::sync::Mutex<WarningLog>,
}

impl<S: KeyValueStore> BlockrApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            contacts_lock: Mutex::new(()),
            rules_lock: Mutex::new(()),
            prefs_lock: Mutex::new(()),
            warnings: std::sync::Mutex::new(WarningLog::default()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Contacts ---

    pub async fn load_contacts(&self) -> Vec<Contact> {
        let result = contacts::load(&self.store).await;
        self.or_fallback(StorageKey::Contacts, result)
    }

    pub async fn save_contacts(&self, list: &[Contact]) -> bool {
        let _guard = self.contacts_lock.lock().await;
        self.succeeded(contacts::save(&self.store, list).await, "save contacts")
    }

    pub async fn add_or_update_contact(&self, contact: Contact) -> bool {
        let _guard = self.contacts_lock.lock().await;
        self.applied(
            StorageKey::Contacts,
            contacts::add_or_update(&self.store, contact).await,
            "add or update contact",
        )
    }

    pub async fn delete_contact(&self, id: &str) -> bool {
        let _guard = self.contacts_lock.lock().await;
        self.applied(
            StorageKey::Contacts,
            contacts::delete(&self.store, id).await,
            "delete contact",
        )
    }

    /// `false` if no contact has this id.
    pub async fn toggle_contact_block(&self, id: &str, is_blocked: bool) -> bool {
        let _guard = self.contacts_lock.lock().await;
        self.applied(
            StorageKey::Contacts,
            contacts::toggle_block(&self.store, id, is_blocked, Utc::now()).await,
            "toggle contact block",
        )
    }

    pub async fn load_blacklist(&self) -> Vec<Contact> {
        contacts::blacklist(self.load_contacts().await)
    }

    pub async fn search_contacts(&self, query: &str) -> Vec<Contact> {
        contacts::search(self.load_contacts().await, query)
    }

    // --- Schedule rules ---

    pub async fn load_schedule_rules(&self) -> Vec<ScheduleRule> {
        let result = schedule::load(&self.store).await;
        self.or_fallback(StorageKey::ScheduleRules, result)
    }

    pub async fn save_schedule_rules(&self, rules: &[ScheduleRule]) -> bool {
        let _guard = self.rules_lock.lock().await;
        self.succeeded(schedule::save(&self.store, rules).await, "save schedule rules")
    }

    pub async fn add_or_update_schedule_rule(&self, rule: ScheduleRule) -> bool {
        let _guard = self.rules_lock.lock().await;
        self.applied(
            StorageKey::ScheduleRules,
            schedule::add_or_update(&self.store, rule).await,
            "add or update schedule rule",
        )
    }

    pub async fn delete_schedule_rule(&self, id: &str) -> bool {
        let _guard = self.rules_lock.lock().await;
        self.applied(
            StorageKey::ScheduleRules,
            schedule::delete(&self.store, id).await,
            "delete schedule rule",
        )
    }

    /// Flips a rule's active flag. `false` if no rule has this id.
    pub async fn toggle_schedule_rule(&self, id: &str) -> bool {
        let _guard = self.rules_lock.lock().await;
        self.applied(
            StorageKey::ScheduleRules,
            schedule::toggle_active(&self.store, id).await,
            "toggle schedule rule",
        )
    }

    pub async fn rules_in_effect(&self, day: &str, time: NaiveTime) -> Vec<ScheduleRule> {
        schedule::in_effect(self.load_schedule_rules().await, day, time)
    }

    // --- Preferences ---

    pub async fn load_preferences(&self) -> UserPreferences {
        let result = preferences::load(&self.store).await;
        self.or_fallback(StorageKey::Preferences, result)
    }

    pub async fn save_preferences(&self, prefs: &UserPreferences) -> bool {
        let _guard = self.prefs_lock.lock().await;
        self.succeeded(preferences::save(&self.store, prefs).await, "save preferences")
    }

    // --- Maintenance ---

    pub async fn clear_all_data(&self) -> bool {
        let _contacts = self.contacts_lock.lock().await;
        let _rules = self.rules_lock.lock().await;
        let _prefs = self.prefs_lock.lock().await;
        self.succeeded(maintenance::clear_all_data(&self.store).await, "clear all data")
    }

    /// Diagnostic only. Zero when the store cannot be read.
    pub async fn get_storage_size(&self) -> usize {
        match maintenance::storage_size(&self.store).await {
            Ok(size) => size,
            Err(e) => {
                error!(error = %e, "storage size unavailable");
                self.note_unreadable(None, &e);
                0
            }
        }
    }

    pub async fn get_stats(&self) -> BlockStats {
        let contacts = self.load_contacts().await;
        let rules = self.load_schedule_rules().await;
        BlockStats::compute(&contacts, &rules)
    }

    /// Drains the warnings raised since the last call. Each key warns at most
    /// once per `BlockrApi` instance.
    pub fn take_warnings(&self) -> Vec<StorageWarning> {
        match self.warnings.lock() {
            Ok(mut log) => std::mem::take(&mut log.pending),
            Err(_) => Vec::new(),
        }
    }

    fn or_fallback<T: Default>(&self, key: StorageKey, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                error!(%key, error = %e, "load failed, using empty/default value");
                self.note_unreadable(Some(key), &e);
                T::default()
            }
        }
    }

    /// Like [`Self::succeeded`], and also warns when the update replaced an
    /// undecodable collection.
    fn applied<T>(&self, key: StorageKey, result: Result<Applied<T>>, action: &str) -> bool {
        let result = result.map(|applied| {
            if let Some(e) = applied.discarded {
                self.record_warning(
                    Some(key),
                    format!("Stored data under {} was unreadable and has been replaced: {}", key, e),
                );
            }
        });
        self.succeeded(result, action)
    }

    fn succeeded<T>(&self, result: Result<T>, action: &str) -> bool {
        match result {
            Ok(_) => true,
            Err(e @ (BlockrError::ContactNotFound(_) | BlockrError::RuleNotFound(_))) => {
                warn!(action, error = %e, "nothing to update");
                false
            }
            Err(e) => {
                error!(action, error = %e, "storage operation failed");
                self.note_unreadable(None, &e);
                false
            }
        }
    }

    /// Queues a warning for decode failures. Transient store errors only log.
    fn note_unreadable(&self, key: Option<StorageKey>, err: &BlockrError) {
        match (err, key) {
            (BlockrError::CorruptStore { .. }, _) => self.record_warning(None, err.to_string()),
            (BlockrError::Serialization(e), Some(key)) => self.record_warning(
                Some(key),
                format!("Stored data under {} is unreadable and was ignored: {}", key, e),
            ),
            _ => {}
        }
    }

    fn record_warning(&self, key: Option<StorageKey>, message: String) {
        let Ok(mut log) = self.warnings.lock() else {
            return;
        };
        if log.seen.insert(key) {
            log.pending.push(StorageWarning { key, message });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RuleType, Theme};
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn api() -> BlockrApi<MemoryStore> {
        BlockrApi::new(MemoryStore::new())
    }

    fn contact(id: &str, name: &str) -> Contact {
        Contact::new(id, name, "+33 6 12 34 56 78")
    }

    fn rule(id: &str) -> ScheduleRule {
        ScheduleRule {
            id: id.into(),
            name: "Nuit tranquille".into(),
            rule_type: RuleType::Block,
            time_start: "22:00".into(),
            time_end: "07:00".into(),
            days: vec!["Lun".into(), "Dim".into()],
            is_active: true,
        }
    }

    #[tokio::test]
    async fn empty_store_reads_do_not_fail() {
        let api = api();
        assert!(api.load_contacts().await.is_empty());
        assert!(api.load_schedule_rules().await.is_empty());
        assert_eq!(api.load_preferences().await, UserPreferences::default());
        assert!(api.take_warnings().is_empty());
    }

    #[tokio::test]
    async fn round_trip_every_collection() {
        let api = api();
        let mut spam = contact("1", "Spam");
        spam.is_blocked = true;
        spam.calls_blocked = Some(3);
        let prefs = UserPreferences {
            theme: Theme::Dark,
            notifications: false,
            auto_block: true,
            language: "en".into(),
        };

        assert!(api.save_contacts(&[spam.clone()]).await);
        assert!(api.save_schedule_rules(&[rule("r1")]).await);
        assert!(api.save_preferences(&prefs).await);

        assert_eq!(api.load_contacts().await, vec![spam]);
        assert_eq!(api.load_schedule_rules().await, vec![rule("r1")]);
        assert_eq!(api.load_preferences().await, prefs);
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_record() {
        let api = api();
        let alice = contact("1", "Alice");
        assert!(api.add_or_update_contact(alice.clone()).await);
        assert!(api.add_or_update_contact(alice.clone()).await);
        assert_eq!(api.load_contacts().await, vec![alice]);
    }

    #[tokio::test]
    async fn last_upsert_wins_for_shared_id() {
        let api = api();
        assert!(api.add_or_update_contact(contact("dup", "First")).await);
        assert!(api.add_or_update_contact(contact("dup", "Second")).await);
        let loaded = api.load_contacts().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Second");
    }

    #[tokio::test]
    async fn delete_twice_succeeds() {
        let api = api();
        api.save_contacts(&[contact("1", "A"), contact("2", "B")]).await;
        assert!(api.delete_contact("1").await);
        assert_eq!(api.load_contacts().await.len(), 1);
        assert!(api.delete_contact("1").await);
        assert_eq!(api.load_contacts().await.len(), 1);
    }

    #[tokio::test]
    async fn toggle_block_stamps_once_and_misses_report_false() {
        let api = api();
        api.add_or_update_contact(contact("1", "Bob")).await;

        assert!(api.toggle_contact_block("1", true).await);
        let stamped = api.load_contacts().await[0].date_blocked.clone();
        assert!(stamped.is_some());

        assert!(api.toggle_contact_block("1", true).await);
        assert_eq!(api.load_contacts().await[0].date_blocked, stamped);

        assert!(!api.toggle_contact_block("ghost", true).await);
        assert_eq!(api.load_blacklist().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_all_data_resets_everything() {
        let api = api();
        api.save_contacts(&[contact("A", "A"), contact("B", "B")]).await;
        api.save_schedule_rules(&[rule("R1")]).await;
        api.save_preferences(&UserPreferences {
            theme: Theme::Dark,
            ..UserPreferences::default()
        })
        .await;
        api.store()
            .set(StorageKey::CallHistory.as_str(), "[]")
            .await
            .unwrap();

        assert!(api.clear_all_data().await);

        assert!(api.load_contacts().await.is_empty());
        assert!(api.load_schedule_rules().await.is_empty());
        assert_eq!(api.load_preferences().await, UserPreferences::default());
        assert_eq!(api.get_storage_size().await, 0);
    }

    #[tokio::test]
    async fn corrupt_contacts_fall_back_and_warn_once() {
        let api = api();
        api.store()
            .set(StorageKey::Contacts.as_str(), "<<garbage>>")
            .await
            .unwrap();

        assert!(api.load_contacts().await.is_empty());
        assert!(api.load_contacts().await.is_empty());

        let warnings = api.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, Some(StorageKey::Contacts));
        assert!(api.take_warnings().is_empty());
    }

    #[tokio::test]
    async fn corrupt_preferences_fall_back_to_defaults() {
        let api = api();
        api.store()
            .set(StorageKey::Preferences.as_str(), "not json")
            .await
            .unwrap();
        assert_eq!(api.load_preferences().await, UserPreferences::default());
        assert_eq!(api.take_warnings()[0].key, Some(StorageKey::Preferences));
    }

    #[tokio::test]
    async fn upsert_over_corrupt_contacts_warns_once() {
        let api = api();
        api.store()
            .set(StorageKey::Contacts.as_str(), "<<garbage>>")
            .await
            .unwrap();

        assert!(api.add_or_update_contact(contact("1", "Fresh")).await);
        let warnings = api.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, Some(StorageKey::Contacts));
        assert!(warnings[0].message.contains("replaced"));

        assert!(api.add_or_update_contact(contact("2", "Next")).await);
        assert!(api.take_warnings().is_empty());
        assert_eq!(api.load_contacts().await.len(), 2);
    }

    #[tokio::test]
    async fn delete_over_corrupt_rules_warns() {
        let api = api();
        api.store()
            .set(StorageKey::ScheduleRules.as_str(), "{")
            .await
            .unwrap();

        assert!(!api.toggle_schedule_rule("r1").await);
        assert!(api.take_warnings().is_empty());

        assert!(api.delete_schedule_rule("r1").await);
        assert_eq!(
            api.take_warnings()
                .into_iter()
                .map(|w| w.key)
                .collect::<Vec<_>>(),
            vec![Some(StorageKey::ScheduleRules)]
        );
    }

    #[tokio::test]
    async fn any_iso_block_date_survives_updates() {
        let api = api();
        let stored = r#"[
            {"id":"1","name":"Spam","phone":"08","isBlocked":true,"dateBlocked":"2024-01-15"},
            {"id":"2","name":"Promo","phone":"09","isBlocked":true,"dateBlocked":"2024-01-15T10:00:00+01:00"}
        ]"#;
        api.store()
            .set(StorageKey::Contacts.as_str(), stored)
            .await
            .unwrap();

        assert_eq!(api.load_contacts().await.len(), 2);
        assert!(api.add_or_update_contact(contact("3", "Alice")).await);

        let contacts = api.load_contacts().await;
        let ids: Vec<_> = contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(contacts[0].date_blocked.as_deref(), Some("2024-01-15"));
        assert_eq!(
            contacts[1].date_blocked.as_deref(),
            Some("2024-01-15T10:00:00+01:00")
        );
        assert!(api.take_warnings().is_empty());
    }

    #[tokio::test]
    async fn write_failures_report_false_and_keep_data() {
        let api = api();
        api.save_contacts(&[contact("1", "A")]).await;

        api.store().set_simulate_write_error(true);
        assert!(!api.add_or_update_contact(contact("2", "B")).await);
        assert!(!api.save_preferences(&UserPreferences::default()).await);
        assert!(!api.clear_all_data().await);
        api.store().set_simulate_write_error(false);

        assert_eq!(api.load_contacts().await.len(), 1);
    }

    #[tokio::test]
    async fn read_failures_do_not_wipe_collections() {
        let api = api();
        api.save_contacts(&[contact("1", "A")]).await;

        api.store().set_simulate_read_error(true);
        assert!(api.load_contacts().await.is_empty());
        assert!(!api.add_or_update_contact(contact("2", "B")).await);
        assert_eq!(api.get_storage_size().await, 0);
        assert!(api.take_warnings().is_empty());
        api.store().set_simulate_read_error(false);

        assert_eq!(api.load_contacts().await.len(), 1);
    }

    #[tokio::test]
    async fn schedule_rule_helpers() {
        let api = api();
        assert!(api.add_or_update_schedule_rule(rule("r1")).await);
        assert!(api.toggle_schedule_rule("r1").await);
        assert!(!api.load_schedule_rules().await[0].is_active);
        assert!(!api.toggle_schedule_rule("missing").await);

        assert!(api.toggle_schedule_rule("r1").await);
        let late = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(api.rules_in_effect("Dim", late).await.len(), 1);
        assert!(api.rules_in_effect("Mer", late).await.is_empty());

        assert!(api.delete_schedule_rule("r1").await);
        assert!(api.load_schedule_rules().await.is_empty());
    }

    #[tokio::test]
    async fn stats_reflect_stored_state() {
        let api = api();
        let mut spam = contact("1", "Spam");
        spam.calls_blocked = Some(7);
        api.save_contacts(&[spam, contact("2", "Alice")]).await;
        api.toggle_contact_block("1", true).await;
        api.save_schedule_rules(&[rule("r1")]).await;

        let stats = api.get_stats().await;
        assert_eq!(stats.total_contacts, 2);
        assert_eq!(stats.blocked_contacts, 1);
        assert_eq!(stats.calls_blocked, 7);
        assert_eq!(stats.active_rules, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts_lose_nothing() {
        let api = Arc::new(api());
        let mut handles = Vec::new();
        for i in 0..32 {
            let api = api.clone();
            handles.push(tokio::spawn(async move {
                api.add_or_update_contact(Contact::new(i.to_string(), format!("C{}", i), "06"))
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let mut ids: Vec<u32> = api
            .load_contacts()
            .await
            .into_iter()
            .map(|c| c.id.parse().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..32).collect::<Vec<_>>());
    }
}
