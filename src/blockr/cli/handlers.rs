use super::print::{
    print_contacts, print_info, print_preferences, print_rules, print_stats, print_success,
};
use super::setup::{ContactsAction, PrefsAction, RulesAction};
use blockr::api::BlockrApi;
use blockr::config::BlockrConfig;
use blockr::error::{BlockrError, Result};
use blockr::model::{Contact, RuleType, ScheduleRule, UserPreferences};
use blockr::store::fs::FileStore;
use chrono::{Datelike, Local, NaiveTime, Utc, Weekday};
use std::path::Path;
use uuid::Uuid;

pub(super) type Api = BlockrApi<FileStore>;

const WEEK: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

fn failed(action: &str) -> BlockrError {
    BlockrError::Store(format!("Could not {}", action))
}

pub(super) async fn handle_contacts(api: &Api, action: Option<ContactsAction>) -> Result<()> {
    match action.unwrap_or(ContactsAction::List { search: None }) {
        ContactsAction::List { search } => {
            let contacts = match search {
                Some(query) => api.search_contacts(&query).await,
                None => api.load_contacts().await,
            };
            print_contacts(&contacts);
            Ok(())
        }
        ContactsAction::Add {
            name,
            phone,
            blocked,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(BlockrError::Validation("Name cannot be empty".into()));
            }
            let mut contact = Contact::new(Uuid::new_v4().to_string(), name, phone.trim());
            if blocked {
                contact.set_blocked(true, Utc::now());
            }
            let id = contact.id.clone();
            if !api.add_or_update_contact(contact).await {
                return Err(failed("save the contact"));
            }
            print_success(&format!("Contact added: {}", id));
            Ok(())
        }
        ContactsAction::Remove { id } => {
            if !api.delete_contact(&id).await {
                return Err(failed("delete the contact"));
            }
            print_success(&format!("Contact removed: {}", id));
            Ok(())
        }
    }
}

pub(super) async fn handle_block(api: &Api, id: &str, blocked: bool) -> Result<()> {
    if !api.toggle_contact_block(id, blocked).await {
        return Err(BlockrError::ContactNotFound(id.to_string()));
    }
    if blocked {
        print_success(&format!("Contact blocked: {}", id));
    } else {
        print_success(&format!("Contact unblocked: {}", id));
    }
    Ok(())
}

pub(super) async fn handle_blacklist(api: &Api) -> Result<()> {
    print_contacts(&api.load_blacklist().await);
    Ok(())
}

pub(super) async fn handle_rules(api: &Api, action: Option<RulesAction>) -> Result<()> {
    match action.unwrap_or(RulesAction::List) {
        RulesAction::List => {
            print_rules(&api.load_schedule_rules().await);
            Ok(())
        }
        RulesAction::Add {
            name,
            rule_type,
            start,
            end,
            days,
            inactive,
        } => {
            let rule = build_rule(name, rule_type, &start, &end, days, !inactive)?;
            let id = rule.id.clone();
            if !api.add_or_update_schedule_rule(rule).await {
                return Err(failed("save the schedule rule"));
            }
            print_success(&format!("Schedule rule added: {}", id));
            Ok(())
        }
        RulesAction::Toggle { id } => {
            if !api.toggle_schedule_rule(&id).await {
                return Err(BlockrError::RuleNotFound(id));
            }
            print_success(&format!("Schedule rule toggled: {}", id));
            Ok(())
        }
        RulesAction::Remove { id } => {
            if !api.delete_schedule_rule(&id).await {
                return Err(failed("delete the schedule rule"));
            }
            print_success(&format!("Schedule rule removed: {}", id));
            Ok(())
        }
        RulesAction::Active { day, time } => {
            let now = Local::now();
            let day = day.unwrap_or_else(|| day_label(now.weekday()).to_string());
            let time = match time {
                Some(t) => parse_time(&t)?,
                None => now.time(),
            };
            print_rules(&api.rules_in_effect(&day, time).await);
            Ok(())
        }
    }
}

pub(super) async fn handle_prefs(api: &Api, action: Option<PrefsAction>) -> Result<()> {
    match action.unwrap_or(PrefsAction::Show) {
        PrefsAction::Show => {
            print_preferences(&api.load_preferences().await);
            Ok(())
        }
        PrefsAction::Set {
            theme,
            language,
            notifications,
            auto_block,
        } => {
            let mut prefs = api.load_preferences().await;
            if let Some(theme) = theme {
                prefs.theme = theme;
            }
            if let Some(language) = language {
                prefs.language = language;
            }
            if let Some(notifications) = notifications {
                prefs.notifications = notifications;
            }
            if let Some(auto_block) = auto_block {
                prefs.auto_block = auto_block;
            }
            save_prefs(api, &prefs).await
        }
        PrefsAction::ToggleTheme => {
            let mut prefs = api.load_preferences().await;
            prefs.theme = prefs.theme.toggled();
            save_prefs(api, &prefs).await
        }
    }
}

async fn save_prefs(api: &Api, prefs: &UserPreferences) -> Result<()> {
    if !api.save_preferences(prefs).await {
        return Err(failed("save preferences"));
    }
    print_preferences(prefs);
    Ok(())
}

pub(super) async fn handle_stats(api: &Api) -> Result<()> {
    print_stats(&api.get_stats().await);
    Ok(())
}

pub(super) async fn handle_size(api: &Api) -> Result<()> {
    println!("{} characters", api.get_storage_size().await);
    Ok(())
}

pub(super) async fn handle_clear(api: &Api, yes: bool) -> Result<()> {
    if !yes {
        print_info("This erases every contact, rule and preference. Re-run with --yes to confirm.");
        return Ok(());
    }
    if !api.clear_all_data().await {
        return Err(failed("clear stored data"));
    }
    print_success("All BlockR data erased.");
    Ok(())
}

pub(super) fn handle_config(dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut config = BlockrConfig::load(dir)?;
    match (key, value) {
        (None, _) => {
            for key in BlockrConfig::KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
        (Some(key), None) => match config.get(&key) {
            Some(val) => println!("{}", val),
            None => return Err(BlockrError::Config(format!("Unknown config key: {}", key))),
        },
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(dir)?;
            print_success(&format!("{} set to {}", key, value.trim()));
        }
    }
    Ok(())
}

fn build_rule(
    name: String,
    rule_type: RuleType,
    start: &str,
    end: &str,
    days: Vec<String>,
    is_active: bool,
) -> Result<ScheduleRule> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(BlockrError::Validation("Rule name cannot be empty".into()));
    }
    parse_time(start)?;
    parse_time(end)?;
    let days: Vec<String> = days
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    let days = if days.is_empty() {
        WEEK.iter().map(|d| d.to_string()).collect()
    } else {
        days
    };
    Ok(ScheduleRule {
        id: Uuid::new_v4().to_string(),
        name,
        rule_type,
        time_start: start.trim().to_string(),
        time_end: end.trim().to_string(),
        days,
        is_active,
    })
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| BlockrError::Validation(format!("Invalid time '{}', expected HH:MM", raw)))
}

fn day_label(day: Weekday) -> &'static str {
    WEEK[day.num_days_from_monday() as usize]
}
