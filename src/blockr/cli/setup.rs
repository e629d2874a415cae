use blockr::model::{RuleType, Theme};
use clap::{Parser, Subcommand};
use std::sync::OnceLock;

/// `0.3.1` on tagged release builds, `0.3.1@abc1234 2024-01-15 14:30` otherwise.
fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let pkg = env!("CARGO_PKG_VERSION");
        match (env!("IS_RELEASE"), env!("GIT_HASH")) {
            ("true", _) | (_, "") => pkg.to_string(),
            (_, hash) => format!("{}@{} {}", pkg, hash, env!("GIT_COMMIT_DATE")),
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "blockr", bin_name = "blockr", version = version())]
#[command(about = "Manage BlockR contacts, blacklist, schedules and settings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose logging (overrides the configured log filter)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage contacts (lists them by default)
    #[command(alias = "c")]
    Contacts {
        #[command(subcommand)]
        action: Option<ContactsAction>,
    },

    /// Block a contact
    Block {
        /// Contact id
        id: String,
    },

    /// Unblock a contact
    Unblock {
        /// Contact id
        id: String,
    },

    /// List blocked contacts
    #[command(alias = "bl")]
    Blacklist,

    /// Manage schedule rules (lists them by default)
    #[command(alias = "r")]
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
    },

    /// Show or change preferences (shows them by default)
    #[command(alias = "p")]
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },

    /// Show blocking statistics
    Stats,

    /// Show how many characters BlockR keeps in storage
    Size,

    /// Erase every stored contact, rule and preference
    Clear {
        /// Confirm the erase
        #[arg(long)]
        yes: bool,
    },

    /// Get or set configuration values
    Config {
        /// Configuration key (storage_file, log_filter)
        key: Option<String>,

        /// New value
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactsAction {
    /// List contacts
    #[command(alias = "ls")]
    List {
        /// Only show contacts whose name or phone contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a contact
    Add {
        /// Display name
        name: String,

        /// Phone number
        phone: String,

        /// Block the contact right away
        #[arg(long)]
        blocked: bool,
    },

    /// Remove a contact
    #[command(alias = "rm")]
    Remove {
        /// Contact id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List schedule rules
    #[command(alias = "ls")]
    List,

    /// Add a schedule rule
    Add {
        /// Rule label
        name: String,

        /// Whether the rule blocks or allows
        #[arg(long = "type", default_value = "block")]
        rule_type: RuleType,

        /// Window start (HH:MM)
        #[arg(long)]
        start: String,

        /// Window end (HH:MM), may be earlier than start to wrap midnight
        #[arg(long)]
        end: String,

        /// Day labels, comma separated (defaults to every day)
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,

        /// Store the rule switched off
        #[arg(long)]
        inactive: bool,
    },

    /// Switch a rule on or off
    Toggle {
        /// Rule id
        id: String,
    },

    /// Remove a rule
    #[command(alias = "rm")]
    Remove {
        /// Rule id
        id: String,
    },

    /// Show the rules in effect at a given moment (defaults to now)
    Active {
        /// Day label (e.g. Lun)
        #[arg(long)]
        day: Option<String>,

        /// Time of day (HH:MM)
        #[arg(long)]
        time: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Show preferences
    Show,

    /// Change one or more preferences
    Set {
        #[arg(long)]
        theme: Option<Theme>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        auto_block: Option<bool>,
    },

    /// Switch between light and dark theme
    ToggleTheme,
}
