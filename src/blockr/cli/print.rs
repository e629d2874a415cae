use blockr::api::StorageWarning;
use blockr::model::{BlockStats, Contact, RuleType, ScheduleRule, UserPreferences};
use colored::Colorize;

const DATE_FORMAT: &str = "%d %b %Y";

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn print_warnings(warnings: &[StorageWarning]) {
    for warning in warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning.message.yellow());
    }
}

pub(super) fn print_contacts(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts found.");
        return;
    }

    for contact in contacts {
        let marker = if contact.is_blocked {
            "⊘".red().to_string()
        } else {
            " ".to_string()
        };
        let since = match (contact.blocked_on(), &contact.date_blocked) {
            (Some(day), _) => format!("since {}", day.format(DATE_FORMAT)),
            (None, Some(raw)) => format!("since {}", raw),
            (None, None) => String::new(),
        };
        println!(
            "{} {:<24} {:<20} {} {}",
            marker,
            contact.name.bold(),
            contact.phone,
            contact.id.dimmed(),
            since.dimmed()
        );
        if contact.calls_blocked.is_some() || contact.messages_blocked.is_some() {
            println!(
                "    {} calls, {} messages blocked",
                contact.calls_blocked.unwrap_or(0),
                contact.messages_blocked.unwrap_or(0)
            );
        }
    }
}

pub(super) fn print_rules(rules: &[ScheduleRule]) {
    if rules.is_empty() {
        println!("No schedule rules found.");
        return;
    }

    for rule in rules {
        let kind = match rule.rule_type {
            RuleType::Block => rule.rule_type.to_string().red(),
            RuleType::Allow => rule.rule_type.to_string().green(),
        };
        let state = if rule.is_active {
            "on ".green()
        } else {
            "off".dimmed()
        };
        println!(
            "{} {:<6} {:<24} {}-{} {} {}",
            state,
            kind,
            rule.name.bold(),
            rule.time_start,
            rule.time_end,
            rule.days.join(","),
            rule.id.dimmed()
        );
    }
}

pub(super) fn print_preferences(prefs: &UserPreferences) {
    println!("theme          {}", prefs.theme);
    println!("language       {}", prefs.language);
    println!("notifications  {}", prefs.notifications);
    println!("auto_block     {}", prefs.auto_block);
}

pub(super) fn print_stats(stats: &BlockStats) {
    println!("{:<18} {}", "Blacklist", stats.blocked_contacts.to_string().red());
    println!("{:<18} {}", "Contacts", stats.total_contacts);
    println!("{:<18} {}", "Calls blocked", stats.calls_blocked);
    println!("{:<18} {}", "Messages blocked", stats.messages_blocked);
    println!("{:<18} {}", "Active rules", stats.active_rules.to_string().green());
}
