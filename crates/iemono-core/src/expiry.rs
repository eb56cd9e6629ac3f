use crate::models::{Item, Settings};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where an item sits relative to its expiry date
///
/// Declaration order is urgency order, so sorting by status puts the
/// fires first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryStatus {
    /// Expiry date is in the past
    Expired,
    /// Expires today (only produced when `separate_today_status` is on)
    Today,
    /// Inside the alert window
    Warning,
    /// Further out than the alert window
    Ok,
    /// No expiry date at all
    None,
}

impl ExpiryStatus {
    pub const ALL: [ExpiryStatus; 5] = [
        ExpiryStatus::Expired,
        ExpiryStatus::Today,
        ExpiryStatus::Warning,
        ExpiryStatus::Ok,
        ExpiryStatus::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::Today => "today",
            ExpiryStatus::Warning => "warning",
            ExpiryStatus::Ok => "ok",
            ExpiryStatus::None => "none",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "#FF4757",
            ExpiryStatus::Today => "#FF6B4A",
            ExpiryStatus::Warning => "#FBBF24",
            ExpiryStatus::Ok => "#4A9FFF",
            ExpiryStatus::None => "transparent",
        }
    }

    /// Expiring today or inside the alert window
    pub fn is_due_soon(&self) -> bool {
        matches!(self, ExpiryStatus::Today | ExpiryStatus::Warning)
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Knobs for the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Five-state model when true. When false, a same-day expiry is folded
    /// into `Warning` and `Today` is never produced.
    pub separate_today_status: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            separate_today_status: true,
        }
    }
}

/// Which threshold decides the warning window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AlertDaysSource {
    /// `item.alert_days`, falling back to the global default when unset
    #[default]
    PerItem,
    /// Always the global default, ignoring per-item values
    GlobalDefault,
}

/// Whole days from `today` until `expiry`; `None` without a date
///
/// Both sides are calendar dates, so the difference is already a whole
/// number of days: a same-day expiry is exactly 0 and yesterday is -1.
pub fn days_until(expiry: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    expiry.map(|date| date.signed_duration_since(today).num_days())
}

/// Map an expiry date and a resolved threshold onto a status
///
/// First match wins: absent, past, today, inside the window, beyond it.
pub fn classify(
    expiry: Option<NaiveDate>,
    alert_days: u32,
    today: NaiveDate,
    options: ClassifyOptions,
) -> ExpiryStatus {
    let Some(days) = days_until(expiry, today) else {
        return ExpiryStatus::None;
    };

    match days {
        d if d < 0 => ExpiryStatus::Expired,
        0 if options.separate_today_status => ExpiryStatus::Today,
        d if d <= i64::from(alert_days) => ExpiryStatus::Warning,
        _ => ExpiryStatus::Ok,
    }
}

/// Negative thresholds make no sense; treat them as zero
pub fn clamp_alert_days(raw: i64) -> u32 {
    if raw < 0 {
        tracing::debug!("Clamping negative alert days {} to 0", raw);
    }
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// `item.alert_days` if set, otherwise the global default
pub fn effective_alert_days(item: &Item, settings: &Settings) -> u32 {
    clamp_alert_days(item.alert_days.unwrap_or(settings.default_alert_days))
}

/// Human readable countdown for a signed day count
pub fn format_label(days: Option<i64>) -> String {
    match days {
        None => String::new(),
        Some(d) if d < 0 => {
            let over = d.unsigned_abs();
            format!("{} {} overdue", over, plural_days(over))
        }
        Some(0) => "due today".to_string(),
        Some(d) => format!("{} {} remaining", d, plural_days(d.unsigned_abs())),
    }
}

/// Compact variant for the dashboard timeline
pub fn format_short_label(days: Option<i64>) -> String {
    match days {
        None => String::new(),
        Some(d) if d < 0 => format!("{}d over", d.unsigned_abs()),
        Some(0) => "today".to_string(),
        Some(d) => format!("{}d", d),
    }
}

fn plural_days(n: u64) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// Everything needed to classify items on a given day
///
/// Callers build one of these from a settings snapshot and hand it to the
/// dashboard, view and alert functions; nothing in here reads global state.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryContext<'a> {
    pub today: NaiveDate,
    pub settings: &'a Settings,
    pub options: ClassifyOptions,
    pub source: AlertDaysSource,
}

impl<'a> ExpiryContext<'a> {
    pub fn new(today: NaiveDate, settings: &'a Settings) -> Self {
        Self {
            today,
            settings,
            options: ClassifyOptions::default(),
            source: AlertDaysSource::default(),
        }
    }

    pub fn with_options(mut self, options: ClassifyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_source(mut self, source: AlertDaysSource) -> Self {
        self.source = source;
        self
    }

    pub fn alert_days(&self, item: &Item) -> u32 {
        match self.source {
            AlertDaysSource::PerItem => effective_alert_days(item, self.settings),
            AlertDaysSource::GlobalDefault => clamp_alert_days(self.settings.default_alert_days),
        }
    }

    pub fn days(&self, item: &Item) -> Option<i64> {
        days_until(item.expiry_date, self.today)
    }

    pub fn status(&self, item: &Item) -> ExpiryStatus {
        classify(item.expiry_date, self.alert_days(item), self.today, self.options)
    }
}
