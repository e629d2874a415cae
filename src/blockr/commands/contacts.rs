use super::{
    read_collection_for_update, read_json, upsert_by_id, write_json, Applied, Upsert,
};
use crate::error::{BlockrError, Result};
use crate::model::Contact;
use crate::store::{KeyValueStore, StorageKey};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub async fn load<S: KeyValueStore>(store: &S) -> Result<Vec<Contact>> {
    match read_json::<_, Vec<Contact>>(store, StorageKey::Contacts).await? {
        Some(contacts) => {
            debug!(count = contacts.len(), "contacts loaded");
            Ok(contacts)
        }
        None => {
            debug!("no contacts stored yet");
            Ok(Vec::new())
        }
    }
}

pub async fn save<S: KeyValueStore>(store: &S, contacts: &[Contact]) -> Result<()> {
    write_json(store, StorageKey::Contacts, contacts).await?;
    debug!(count = contacts.len(), "contacts saved");
    Ok(())
}

pub async fn add_or_update<S: KeyValueStore>(
    store: &S,
    contact: Contact,
) -> Result<Applied<Upsert>> {
    let (mut contacts, discarded): (Vec<Contact>, _) =
        read_collection_for_update(store, StorageKey::Contacts).await?;
    let id = contact.id.clone();
    let outcome = upsert_by_id(&mut contacts, contact, |c| c.id.as_str());
    save(store, &contacts).await?;
    info!(%id, ?outcome, "contact stored");
    Ok(Applied {
        value: outcome,
        discarded,
    })
}

/// Removes every contact with `id`. Returns how many were removed; zero is
/// not an error.
pub async fn delete<S: KeyValueStore>(store: &S, id: &str) -> Result<Applied<usize>> {
    let (mut contacts, discarded): (Vec<Contact>, _) =
        read_collection_for_update(store, StorageKey::Contacts).await?;
    let before = contacts.len();
    contacts.retain(|c| c.id != id);
    let removed = before - contacts.len();
    save(store, &contacts).await?;
    info!(%id, removed, "contact deleted");
    Ok(Applied {
        value: removed,
        discarded,
    })
}

/// Sets the blocked flag on contact `id`, stamping the block date the first
/// time it is blocked.
pub async fn toggle_block<S: KeyValueStore>(
    store: &S,
    id: &str,
    is_blocked: bool,
    now: DateTime<Utc>,
) -> Result<Applied<Contact>> {
    let (mut contacts, discarded): (Vec<Contact>, _) =
        read_collection_for_update(store, StorageKey::Contacts).await?;
    let contact = contacts
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| BlockrError::ContactNotFound(id.to_string()))?;
    contact.set_blocked(is_blocked, now);
    let updated = contact.clone();
    save(store, &contacts).await?;
    info!(%id, is_blocked, "contact block state changed");
    Ok(Applied {
        value: updated,
        discarded,
    })
}

/// The blocked subset, in stored order.
pub fn blacklist(contacts: Vec<Contact>) -> Vec<Contact> {
    contacts.into_iter().filter(|c| c.is_blocked).collect()
}

pub fn search(contacts: Vec<Contact>, query: &str) -> Vec<Contact> {
    contacts.into_iter().filter(|c| c.matches(query)).collect()
}
