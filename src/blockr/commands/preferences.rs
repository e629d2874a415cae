use super::{read_json, write_json};
use crate::error::Result;
use crate::model::UserPreferences;
use crate::store::{KeyValueStore, StorageKey};
use tracing::debug;

/// Loads the stored preferences, or the defaults when none were saved yet.
pub async fn load<S: KeyValueStore>(store: &S) -> Result<UserPreferences> {
    match read_json(store, StorageKey::Preferences).await? {
        Some(prefs) => {
            debug!("preferences loaded");
            Ok(prefs)
        }
        None => Ok(UserPreferences::default()),
    }
}

/// Overwrites the whole record. There is no partial update.
pub async fn save<S: KeyValueStore>(store: &S, prefs: &UserPreferences) -> Result<()> {
    write_json(store, StorageKey::Preferences, prefs).await?;
    debug!(theme = %prefs.theme, language = %prefs.language, "preferences saved");
    Ok(())
}
