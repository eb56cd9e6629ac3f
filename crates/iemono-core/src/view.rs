use crate::expiry::{ExpiryContext, ExpiryStatus};
use crate::models::{Category, Item, Location, Settings};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sentinel accepted wherever a filter can be switched off
pub const ALL: &str = "all";

/// How the item list is ordered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Soonest expiry first, undated items last
    #[default]
    Expiry,
    Name,
    /// By category id, not by display label
    Category,
    /// Most recently created first
    Newest,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Expiry => "expiry",
            SortKey::Name => "name",
            SortKey::Category => "category",
            SortKey::Newest => "newest",
        }
    }
}

impl FromStr for SortKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "expiry" => Ok(SortKey::Expiry),
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            "newest" => Ok(SortKey::Newest),
            other => Err(crate::Error::Validation(format!("unknown sort key: {}", other))),
        }
    }
}

/// Exact-match filter that can be disabled with `all`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Filter<T>
where
    T: FromStr<Err = crate::Error>,
{
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        if s == ALL {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

/// Everything the list screen lets the user pick
#[derive(Debug, Clone, PartialEq)]
pub struct ViewQuery {
    /// Case-insensitive substring of the name; empty matches everything
    pub search: String,
    pub category: Filter<Category>,
    pub location: Filter<Location>,
    pub sort: SortKey,
    /// Flip the sort. Undated items stay last under `Expiry` either way
    pub descending: bool,
    /// When false, items currently classified expired are dropped
    pub show_expired: bool,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: Filter::All,
            location: Filter::All,
            sort: SortKey::default(),
            descending: false,
            show_expired: true,
        }
    }
}

impl ViewQuery {
    /// Start from the user's saved visibility preference
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_expired: settings.show_expired,
            ..Self::default()
        }
    }
}

/// Filter and sort the collection for display
///
/// All predicates are ANDed together. The source slice is never touched;
/// the result is a fresh list of references recomputed from scratch.
pub fn view<'a>(items: &'a [Item], query: &ViewQuery, ctx: &ExpiryContext<'_>) -> Vec<&'a Item> {
    let needle = query.search.to_lowercase();

    let mut result: Vec<&Item> = items
        .iter()
        .filter(|item| query.show_expired || ctx.status(item) != ExpiryStatus::Expired)
        .filter(|item| query.category.matches(&item.category))
        .filter(|item| query.location.matches(&item.location))
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .collect();

    result.sort_by(|a, b| compare_items(a, b, query.sort, query.descending));

    tracing::debug!(
        "View kept {} of {} items (sort: {})",
        result.len(),
        items.len(),
        query.sort.label()
    );

    result
}

fn compare_items(a: &Item, b: &Item, key: SortKey, descending: bool) -> Ordering {
    let ordering = match key {
        // Direction is handled inside so missing dates never float to the top
        SortKey::Expiry => return compare_expiry(a.expiry_date, b.expiry_date, descending),
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Category => a.category.id().cmp(b.category.id()),
        SortKey::Newest => b.created_at.cmp(&a.created_at),
    };

    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Dates in the requested direction, absent dates always after present ones
pub fn compare_expiry(a: Option<NaiveDate>, b: Option<NaiveDate>, descending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

/// Name ordering close to what a Japanese-locale collator gives
///
/// Case is folded and katakana is folded onto hiragana for the primary
/// comparison; the raw strings break ties so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            // ァ..=ヶ sit exactly 0x60 above their hiragana counterparts
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}
