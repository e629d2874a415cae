use super::{
    read_collection_for_update, read_json, upsert_by_id, write_json, Applied, Upsert,
};
use crate::error::{BlockrError, Result};
use crate::model::ScheduleRule;
use crate::store::{KeyValueStore, StorageKey};
use chrono::NaiveTime;
use tracing::{debug, info};

pub async fn load<S: KeyValueStore>(store: &S) -> Result<Vec<ScheduleRule>> {
    let rules: Vec<ScheduleRule> = read_json(store, StorageKey::ScheduleRules)
        .await?
        .unwrap_or_default();
    debug!(count = rules.len(), "schedule rules loaded");
    Ok(rules)
}

pub async fn save<S: KeyValueStore>(store: &S, rules: &[ScheduleRule]) -> Result<()> {
    write_json(store, StorageKey::ScheduleRules, rules).await?;
    debug!(count = rules.len(), "schedule rules saved");
    Ok(())
}

pub async fn add_or_update<S: KeyValueStore>(
    store: &S,
    rule: ScheduleRule,
) -> Result<Applied<Upsert>> {
    let (mut rules, discarded): (Vec<ScheduleRule>, _) =
        read_collection_for_update(store, StorageKey::ScheduleRules).await?;
    let id = rule.id.clone();
    let outcome = upsert_by_id(&mut rules, rule, |r| r.id.as_str());
    save(store, &rules).await?;
    info!(%id, ?outcome, "schedule rule stored");
    Ok(Applied {
        value: outcome,
        discarded,
    })
}

pub async fn delete<S: KeyValueStore>(store: &S, id: &str) -> Result<Applied<usize>> {
    let (mut rules, discarded): (Vec<ScheduleRule>, _) =
        read_collection_for_update(store, StorageKey::ScheduleRules).await?;
    let before = rules.len();
    rules.retain(|r| r.id != id);
    let removed = before - rules.len();
    save(store, &rules).await?;
    info!(%id, removed, "schedule rule deleted");
    Ok(Applied {
        value: removed,
        discarded,
    })
}

/// Flips `is_active` on rule `id` and returns the updated rule.
pub async fn toggle_active<S: KeyValueStore>(
    store: &S,
    id: &str,
) -> Result<Applied<ScheduleRule>> {
    let (mut rules, discarded): (Vec<ScheduleRule>, _) =
        read_collection_for_update(store, StorageKey::ScheduleRules).await?;
    let rule = rules
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| BlockrError::RuleNotFound(id.to_string()))?;
    rule.is_active = !rule.is_active;
    let updated = rule.clone();
    save(store, &rules).await?;
    info!(%id, is_active = updated.is_active, "schedule rule toggled");
    Ok(Applied {
        value: updated,
        discarded,
    })
}

/// Active rules whose window covers `day` at `time`.
pub fn in_effect(rules: Vec<ScheduleRule>, day: &str, time: NaiveTime) -> Vec<ScheduleRule> {
    rules.into_iter().filter(|r| r.covers(day, time)).collect()
}
