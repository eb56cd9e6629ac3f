use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Categories where an expiry date actually means something
pub const EXPIRY_CATEGORIES: [Category; 2] = [Category::Food, Category::Medicine];

/// Alert thresholds offered by the item form
pub const ALERT_DAYS_OPTIONS: [i64; 6] = [1, 3, 5, 7, 14, 30];

pub const DEFAULT_ALERT_DAYS: i64 = 3;

/// Counter word used when the unit field is left blank
pub const DEFAULT_UNIT: &str = "個";

/// A physical thing sitting somewhere in the house
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub location: Location,
    #[serde(deserialize_with = "quantity_at_least_one")]
    pub quantity: u32,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Calendar date only. Stored as `YYYY-MM-DD`, empty string when unset
    #[serde(default, with = "date_format")]
    pub expiry_date: Option<NaiveDate>,
    /// Per-item threshold; falls back to `Settings::default_alert_days`
    #[serde(default)]
    pub alert_days: Option<i64>,
    #[serde(default, with = "blank_as_none")]
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

// Stored quantities below 1 are bumped up to 1 rather than rejected
fn quantity_at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    if raw < 1 {
        tracing::warn!("Stored quantity {} is below 1, using 1", raw);
        return Ok(1);
    }
    Ok(u32::try_from(raw).unwrap_or(u32::MAX))
}

impl Item {
    pub fn is_expiry_relevant(&self) -> bool {
        self.category.is_expiry_relevant()
    }
}

/// Item category - a closed set, ids are the persisted form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Daily,
    Electronics,
    Clothing,
    Medicine,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Daily,
        Category::Electronics,
        Category::Clothing,
        Category::Medicine,
        Category::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Daily => "daily",
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Medicine => "medicine",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "食品",
            Category::Daily => "日用品",
            Category::Electronics => "家電",
            Category::Clothing => "衣類",
            Category::Medicine => "薬・医療品",
            Category::Other => "その他",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Food => "🍱",
            Category::Daily => "🧴",
            Category::Electronics => "🔌",
            Category::Clothing => "👕",
            Category::Medicine => "💊",
            Category::Other => "📦",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#FF6B4A",
            Category::Daily => "#4A9FFF",
            Category::Electronics => "#A855F7",
            Category::Clothing => "#F59E0B",
            Category::Medicine => "#10B981",
            Category::Other => "#6B7280",
        }
    }

    pub fn is_expiry_relevant(&self) -> bool {
        EXPIRY_CATEGORIES.contains(self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| crate::Error::Validation(format!("unknown category: {}", s)))
    }
}

// Persisted data is read leniently: a category we no longer know lands in "other"
// instead of taking the whole collection down with it.
impl From<String> for Category {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown category '{}' in stored data, using 'other'", s);
            Category::Other
        })
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.id().to_string()
    }
}

/// Storage location tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum Location {
    Fridge,
    Freezer,
    Pantry,
    Kitchen,
    Bathroom,
    Closet,
    Living,
    Other,
}

impl Location {
    pub const ALL: [Location; 8] = [
        Location::Fridge,
        Location::Freezer,
        Location::Pantry,
        Location::Kitchen,
        Location::Bathroom,
        Location::Closet,
        Location::Living,
        Location::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Location::Fridge => "fridge",
            Location::Freezer => "freezer",
            Location::Pantry => "pantry",
            Location::Kitchen => "kitchen",
            Location::Bathroom => "bathroom",
            Location::Closet => "closet",
            Location::Living => "living",
            Location::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Location::Fridge => "冷蔵庫",
            Location::Freezer => "冷凍庫",
            Location::Pantry => "パントリー",
            Location::Kitchen => "キッチン",
            Location::Bathroom => "洗面所",
            Location::Closet => "クローゼット",
            Location::Living => "リビング",
            Location::Other => "その他",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Location::Fridge => "❄️",
            Location::Freezer => "🧊",
            Location::Pantry => "🏠",
            Location::Kitchen => "🍳",
            Location::Bathroom => "🚿",
            Location::Closet => "🚪",
            Location::Living => "🛋️",
            Location::Other => "📍",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Location {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Location::ALL
            .into_iter()
            .find(|l| l.id() == s)
            .ok_or_else(|| crate::Error::Validation(format!("unknown location: {}", s)))
    }
}

impl From<String> for Location {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown location '{}' in stored data, using 'other'", s);
            Location::Other
        })
    }
}

impl From<Location> for String {
    fn from(l: Location) -> Self {
        l.id().to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl FromStr for Theme {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(crate::Error::Validation(format!("unknown theme: {}", other))),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

/// Global user settings
///
/// `#[serde(default)]` on the struct means a stored object missing some keys
/// still loads, with the gaps filled from `Settings::default()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub default_alert_days: i64,
    /// List visibility only, never changes classification
    pub show_expired: bool,
    /// Gates the alert banner
    pub notifications_enabled: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_alert_days: DEFAULT_ALERT_DAYS,
            show_expired: true,
            notifications_enabled: true,
            theme: Theme::default(),
        }
    }
}

/// What the item form submits, before it becomes an `Item`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub category: Category,
    pub location: Location,
    pub quantity: u32,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub alert_days: Option<i64>,
    pub memo: Option<String>,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::Food,
            location: Location::ALL[0],
            quantity: 1,
            unit: DEFAULT_UNIT.to_string(),
            expiry_date: None,
            alert_days: Some(DEFAULT_ALERT_DAYS),
            memo: None,
        }
    }
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Pre-fill a draft from an existing item (the edit form)
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category,
            location: item.location,
            quantity: item.quantity,
            unit: item.unit.clone(),
            expiry_date: item.expiry_date,
            alert_days: item.alert_days,
            memo: item.memo.clone(),
        }
    }

    /// Validate and normalize at the data-entry boundary
    ///
    /// Everything downstream assumes the result is sane: non-empty name,
    /// quantity >= 1, no expiry date on categories that don't track one.
    pub fn normalize(self) -> crate::Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(crate::Error::Validation("name must not be empty".into()));
        }

        if self.quantity < 1 {
            return Err(crate::Error::Validation("quantity must be at least 1".into()));
        }

        let unit = match self.unit.trim() {
            "" => DEFAULT_UNIT.to_string(),
            u => u.to_string(),
        };

        let memo = self
            .memo
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let expiry_date = if self.category.is_expiry_relevant() {
            self.expiry_date
        } else {
            None
        };

        let alert_days = self.alert_days.map(|days| {
            if days < 0 {
                tracing::debug!("Clamping negative alert days {} to 0", days);
            }
            days.max(0)
        });

        Ok(Self {
            name,
            category: self.category,
            location: self.location,
            quantity: self.quantity,
            unit,
            expiry_date,
            alert_days,
            memo,
        })
    }
}

/// `Option<NaiveDate>` <-> `"YYYY-MM-DD"` with `""`/`null` for absent
///
/// A date that doesn't parse is read as absent rather than failing the load.
mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        // Tolerate full timestamps by looking at the date part only
        let date_part = raw.get(..10).unwrap_or(raw);
        match NaiveDate::parse_from_str(date_part, FORMAT) {
            Ok(d) => Ok(Some(d)),
            Err(e) => {
                tracing::warn!("Ignoring unparseable expiry date '{}': {}", raw, e);
                Ok(None)
            }
        }
    }
}

mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.as_deref().unwrap_or("").serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }
}
