use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use iemono_core::models::ALERT_DAYS_OPTIONS;
use iemono_core::{
    alert_items, alert_summary, dashboard_stats, timeline, view, Category, Clock, Config,
    ExpiryContext, Filter, FixedClock, Inventory, ItemDraft, ItemStore, Location, Settings,
    SettingsStore, SortKey, SystemClock, Theme, ViewQuery,
};
use iemono_store::LocalStore;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(name = "iemono")]
#[command(version, about = "Household inventory tracker with expiry alerts", long_about = None)]
struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "IEMONO_DB")]
    db: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Register a new item
    Add(AddArgs),
    /// Change fields of an existing item
    Edit(EditArgs),
    /// Delete an item
    Delete {
        /// Item id (or a unique prefix of it)
        id: String,
    },
    /// Show one item in detail
    Show {
        /// Item id (or a unique prefix of it)
        id: String,
    },
    /// List items with filters and sorting
    List(ListArgs),
    /// Counts, expiry timeline and storage overview
    Dashboard {
        /// Number of timeline rows (defaults to the config value)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Items that are expired or about to be
    Alerts,
    /// View or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Delete all items and settings
    Clear {
        /// Required, this can't be undone
        #[arg(long)]
        yes: bool,
    },
    /// Print where the config file and database live
    Paths {
        /// Write a config file with the current values if none exists yet
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args)]
struct AddArgs {
    /// Item name
    name: String,
    #[arg(short, long, default_value = "food")]
    category: Category,
    #[arg(short, long, default_value = "fridge")]
    location: Location,
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
    /// Counter word, defaults to 個
    #[arg(short, long)]
    unit: Option<String>,
    /// Expiry date (YYYY-MM-DD); ignored for categories without expiry
    #[arg(short, long)]
    expiry: Option<NaiveDate>,
    /// Days before expiry to start warning (defaults to the global setting)
    #[arg(short, long, value_parser = parse_alert_days)]
    alert_days: Option<i64>,
    #[arg(short, long)]
    memo: Option<String>,
}

#[derive(clap::Args)]
struct EditArgs {
    /// Item id (or a unique prefix of it)
    id: String,
    #[arg(short, long)]
    name: Option<String>,
    #[arg(short, long)]
    category: Option<Category>,
    #[arg(short, long)]
    location: Option<Location>,
    #[arg(short, long)]
    quantity: Option<u32>,
    #[arg(short, long)]
    unit: Option<String>,
    #[arg(short, long, conflicts_with = "clear_expiry")]
    expiry: Option<NaiveDate>,
    #[arg(long)]
    clear_expiry: bool,
    #[arg(short, long, value_parser = parse_alert_days)]
    alert_days: Option<i64>,
    /// Go back to the global alert threshold
    #[arg(long, conflicts_with = "alert_days")]
    inherit_alert_days: bool,
    #[arg(short, long)]
    memo: Option<String>,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Case-insensitive name search
    #[arg(short, long, default_value = "")]
    search: String,
    /// Category id or "all"
    #[arg(short, long, default_value = "all")]
    category: Filter<Category>,
    /// Location id or "all"
    #[arg(short, long, default_value = "all")]
    location: Filter<Location>,
    /// expiry, name, category or newest
    #[arg(long, default_value = "expiry")]
    sort: SortKey,
    #[arg(long)]
    reverse: bool,
    /// Hide expired items regardless of the saved setting
    #[arg(long, conflicts_with = "show_expired")]
    hide_expired: bool,
    /// Show expired items regardless of the saved setting
    #[arg(long)]
    show_expired: bool,
}

#[derive(clap::Subcommand)]
enum SettingsAction {
    /// Print current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long, value_parser = parse_alert_days)]
        default_alert_days: Option<i64>,
        #[arg(long)]
        show_expired: Option<bool>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        theme: Option<Theme>,
    },
    /// Back to defaults
    Reset,
}

/// Whole days; negatives are accepted here and clamped to 0 downstream
fn parse_alert_days(raw: &str) -> Result<i64, String> {
    raw.trim().parse::<i64>().map_err(|_| {
        let presets: Vec<String> = ALERT_DAYS_OPTIONS.iter().map(|d| d.to_string()).collect();
        format!(
            "'{}' is not a number of days (common choices: {})",
            raw,
            presets.join(", ")
        )
    })
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iemono=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config")?;

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };
    let store = LocalStore::open(&db_path)
        .with_context(|| format!("Failed to open store at {}", db_path.display()))?;

    let clock: Box<dyn Clock> = match cli.today {
        Some(day) => Box::new(FixedClock::new(day)),
        None => Box::new(SystemClock),
    };

    let app = App {
        store,
        clock,
        config,
        db_path,
        json: cli.json,
    };

    match cli.command {
        Some(Commands::Add(args)) => app.add(args),
        Some(Commands::Edit(args)) => app.edit(args),
        Some(Commands::Delete { id }) => app.delete(&id),
        Some(Commands::Show { id }) => app.show(&id),
        Some(Commands::List(args)) => app.list(args),
        Some(Commands::Dashboard { limit }) => app.dashboard(limit),
        Some(Commands::Alerts) => app.alerts(),
        Some(Commands::Settings { action }) => app.settings(action),
        Some(Commands::Clear { yes }) => app.clear(yes),
        Some(Commands::Paths { init }) => app.paths(init),
        // The home screen is the dashboard
        None => app.dashboard(None),
    }
}

struct App {
    store: LocalStore,
    clock: Box<dyn Clock>,
    config: Config,
    db_path: PathBuf,
    json: bool,
}

impl App {
    fn context<'a>(&self, settings: &'a Settings) -> ExpiryContext<'a> {
        ExpiryContext::new(self.clock.today(), settings).with_options(self.config.classify_options())
    }

    fn add(&self, args: AddArgs) -> anyhow::Result<()> {
        let settings = self.store.load_settings();
        let mut inventory = Inventory::load(&self.store);

        let draft = ItemDraft {
            name: args.name,
            category: args.category,
            location: args.location,
            quantity: args.quantity,
            unit: args.unit.unwrap_or_default(),
            expiry_date: args.expiry,
            alert_days: args.alert_days,
            memo: args.memo,
        };

        let item = inventory.add(draft, self.clock.as_ref())?.clone();
        inventory.save(&self.store).context("Failed to save items")?;

        render::item_detail(&item, &self.context(&settings), self.json)
    }

    fn edit(&self, args: EditArgs) -> anyhow::Result<()> {
        let settings = self.store.load_settings();
        let mut inventory = Inventory::load(&self.store);

        let existing = inventory.resolve(&args.id)?;
        let id = existing.id.clone();
        let mut draft = ItemDraft::from_item(existing);

        if let Some(name) = args.name {
            draft.name = name;
        }
        if let Some(category) = args.category {
            draft.category = category;
        }
        if let Some(location) = args.location {
            draft.location = location;
        }
        if let Some(quantity) = args.quantity {
            draft.quantity = quantity;
        }
        if let Some(unit) = args.unit {
            draft.unit = unit;
        }
        if args.clear_expiry {
            draft.expiry_date = None;
        } else if let Some(expiry) = args.expiry {
            draft.expiry_date = Some(expiry);
        }
        if args.inherit_alert_days {
            draft.alert_days = None;
        } else if let Some(days) = args.alert_days {
            draft.alert_days = Some(days);
        }
        if let Some(memo) = args.memo {
            draft.memo = Some(memo);
        }

        let item = inventory.update(&id, draft, self.clock.as_ref())?.clone();
        inventory.save(&self.store).context("Failed to save items")?;

        render::item_detail(&item, &self.context(&settings), self.json)
    }

    fn delete(&self, id: &str) -> anyhow::Result<()> {
        let mut inventory = Inventory::load(&self.store);
        let id = inventory.resolve(id)?.id.clone();

        let removed = inventory.delete(&id)?;
        inventory.save(&self.store).context("Failed to save items")?;

        println!("Deleted {} ({})", removed.name, removed.id);
        Ok(())
    }

    fn show(&self, id: &str) -> anyhow::Result<()> {
        let settings = self.store.load_settings();
        let inventory = Inventory::load(&self.store);
        let item = inventory.resolve(id)?;

        render::item_detail(item, &self.context(&settings), self.json)
    }

    fn list(&self, args: ListArgs) -> anyhow::Result<()> {
        let settings = self.store.load_settings();
        let inventory = Inventory::load(&self.store);
        let ctx = self.context(&settings);

        let mut query = ViewQuery::from_settings(&settings);
        query.search = args.search;
        query.category = args.category;
        query.location = args.location;
        query.sort = args.sort;
        query.descending = args.reverse;
        if args.hide_expired {
            query.show_expired = false;
        } else if args.show_expired {
            query.show_expired = true;
        }

        let items = view(inventory.items(), &query, &ctx);
        render::item_list(&items, &ctx, self.json)
    }

    fn dashboard(&self, limit: Option<usize>) -> anyhow::Result<()> {
        let settings = self.store.load_settings();
        let inventory = Inventory::load(&self.store);
        let ctx = self.context(&settings);
        let limit = limit.unwrap_or(self.config.dashboard.timeline_limit);

        let stats = dashboard_stats(inventory.items(), &ctx);
        let entries = timeline(inventory.items(), &ctx, limit);
        let banner = alert_summary(inventory.items(), &ctx);

        render::dashboard(ctx.today, &stats, &entries, banner, self.json)
    }

    fn alerts(&self) -> anyhow::Result<()> {
        let settings = self.store.load_settings();
        let inventory = Inventory::load(&self.store);
        let ctx = self.context(&settings);

        let summary = alert_summary(inventory.items(), &ctx);
        let entries = alert_items(inventory.items(), &ctx);
        render::alerts(summary, &entries, settings.notifications_enabled, self.json)
    }

    fn settings(&self, action: SettingsAction) -> anyhow::Result<()> {
        let mut settings = self.store.load_settings();

        match action {
            SettingsAction::Show => {}
            SettingsAction::Set {
                default_alert_days,
                show_expired,
                notifications,
                theme,
            } => {
                if let Some(days) = default_alert_days {
                    if days < 0 {
                        tracing::warn!("Negative default alert days {} stored as 0", days);
                    }
                    settings.default_alert_days = days.max(0);
                }
                if let Some(show) = show_expired {
                    settings.show_expired = show;
                }
                if let Some(enabled) = notifications {
                    settings.notifications_enabled = enabled;
                }
                if let Some(theme) = theme {
                    settings.theme = theme;
                }
                self.store.save_settings(&settings).context("Failed to save settings")?;
                tracing::info!("Settings updated");
            }
            SettingsAction::Reset => {
                settings = Settings::default();
                self.store.save_settings(&settings).context("Failed to save settings")?;
                tracing::info!("Settings reset to defaults");
            }
        }

        render::settings(&settings, self.json)
    }

    fn clear(&self, yes: bool) -> anyhow::Result<()> {
        if !yes {
            bail!("Refusing to delete all data without --yes");
        }

        let count = self.store.load_items().len();
        self.store.clear().context("Failed to clear store")?;
        println!("Deleted {} items and reset settings", count);
        Ok(())
    }

    fn paths(&self, init: bool) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        if init && !config_path.exists() {
            self.config.save().context("Failed to write config")?;
            tracing::info!("Wrote config to {}", config_path.display());
        }

        println!("config:   {}", config_path.display());
        println!("database: {}", self.db_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alert_days() {
        assert_eq!(parse_alert_days("7"), Ok(7));
        assert_eq!(parse_alert_days(" 14 "), Ok(14));
        assert_eq!(parse_alert_days("-2"), Ok(-2));

        let err = parse_alert_days("soon").unwrap_err();
        assert!(err.contains("1, 3, 5, 7, 14, 30"));
    }

    #[test]
    fn test_cli_accepts_alert_days_and_paths_init() {
        let cli = Cli::try_parse_from(["iemono", "add", "milk", "--alert-days", "5"]).unwrap();
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.alert_days, Some(5)),
            _ => panic!("expected add"),
        }

        assert!(Cli::try_parse_from(["iemono", "add", "milk", "--alert-days", "x"]).is_err());

        let cli = Cli::try_parse_from(["iemono", "paths", "--init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Paths { init: true })));
    }
}
