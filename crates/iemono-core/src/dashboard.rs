use crate::expiry::{format_label, format_short_label, ExpiryContext, ExpiryStatus};
use crate::models::{Category, Item, Location};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many entries the dashboard timeline shows by default
pub const DEFAULT_TIMELINE_LIMIT: usize = 6;

/// Anything this many days out renders at the bar's floor width
pub const BAR_CAP_DAYS: i64 = 30;

const BAR_MIN_WIDTH: f64 = 5.0;
const BAR_MAX_WIDTH: f64 = 100.0;

/// At-a-glance numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    /// Always carries all five statuses, zero counts included
    pub counts_by_status: BTreeMap<ExpiryStatus, usize>,
    /// Non-empty buckets only, in canonical category order
    pub counts_by_category: Vec<(Category, usize)>,
    /// Non-empty buckets only, in canonical location order
    pub counts_by_location: Vec<(Location, usize)>,
}

impl DashboardStats {
    pub fn count(&self, status: ExpiryStatus) -> usize {
        self.counts_by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn expired_count(&self) -> usize {
        self.count(ExpiryStatus::Expired)
    }

    /// Items due today plus items inside their warning window
    pub fn due_soon_count(&self) -> usize {
        self.count(ExpiryStatus::Today) + self.count(ExpiryStatus::Warning)
    }
}

/// One row of the expiry timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry<'a> {
    pub item: &'a Item,
    pub days: i64,
    pub status: ExpiryStatus,
    pub label: String,
    pub short_label: String,
    /// Urgency bar width in percent, 5..=100
    pub bar_width: f64,
}

/// Count everything in a single pass over the collection
pub fn dashboard_stats(items: &[Item], ctx: &ExpiryContext<'_>) -> DashboardStats {
    let mut by_status: BTreeMap<ExpiryStatus, usize> =
        ExpiryStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_category = vec![0usize; Category::ALL.len()];
    let mut by_location = vec![0usize; Location::ALL.len()];

    for item in items {
        *by_status.entry(ctx.status(item)).or_insert(0) += 1;
        by_category[item.category as usize] += 1;
        by_location[item.location as usize] += 1;
    }

    let counts_by_category = Category::ALL
        .into_iter()
        .zip(by_category)
        .filter(|(_, count)| *count > 0)
        .collect();
    let counts_by_location = Location::ALL
        .into_iter()
        .zip(by_location)
        .filter(|(_, count)| *count > 0)
        .collect();

    tracing::debug!("Computed dashboard stats over {} items", items.len());

    DashboardStats {
        total: items.len(),
        counts_by_status: by_status,
        counts_by_category,
        counts_by_location,
    }
}

/// Soonest-expiring food and medicine, capped at `limit`
///
/// Ties keep their collection order (the sort is stable).
pub fn timeline<'a>(
    items: &'a [Item],
    ctx: &ExpiryContext<'_>,
    limit: usize,
) -> Vec<TimelineEntry<'a>> {
    let mut dated: Vec<(&Item, i64)> = items
        .iter()
        .filter(|item| item.is_expiry_relevant())
        .filter_map(|item| ctx.days(item).map(|days| (item, days)))
        .collect();

    dated.sort_by_key(|(item, _)| item.expiry_date);

    dated
        .into_iter()
        .take(limit)
        .map(|(item, days)| TimelineEntry {
            item,
            days,
            status: ctx.status(item),
            label: format_label(Some(days)),
            short_label: format_short_label(Some(days)),
            bar_width: bar_width(days),
        })
        .collect()
}

/// `clamp(((cap - min(days, cap)) / cap) * 100, 5, 100)` with cap = 30
pub fn bar_width(days: i64) -> f64 {
    let cap = BAR_CAP_DAYS as f64;
    let days = days.min(BAR_CAP_DAYS) as f64;
    (((cap - days) / cap) * 100.0).clamp(BAR_MIN_WIDTH, BAR_MAX_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::AlertDaysSource;
    use crate::models::Settings;
    use crate::testing::{item, today};

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(30), 5.0);
        assert_eq!(bar_width(90), 5.0);
        assert_eq!(bar_width(29), 5.0);
        assert_eq!(bar_width(0), 100.0);
        assert_eq!(bar_width(-4), 100.0);
        assert_eq!(bar_width(15), 50.0);
        assert!((bar_width(10) - 66.666_666).abs() < 0.001);
    }

    #[test]
    fn test_stats_counts() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let items = vec![
            item("yogurt", Category::Food, Location::Fridge, Some(-1)),
            item("milk", Category::Food, Location::Fridge, Some(0)),
            item("bread", Category::Food, Location::Kitchen, Some(2)),
            item("miso", Category::Food, Location::Fridge, Some(60)),
            item("shampoo", Category::Daily, Location::Bathroom, None),
        ];

        let stats = dashboard_stats(&items, &ctx);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.expired_count(), 1);
        assert_eq!(stats.due_soon_count(), 2);
        assert_eq!(stats.count(ExpiryStatus::Ok), 1);
        assert_eq!(stats.count(ExpiryStatus::None), 1);
        assert_eq!(stats.counts_by_status.len(), 5);
        assert_eq!(stats.counts_by_status.values().sum::<usize>(), 5);

        assert_eq!(
            stats.counts_by_category,
            vec![(Category::Food, 4), (Category::Daily, 1)]
        );
        assert_eq!(
            stats.counts_by_location,
            vec![(Location::Fridge, 3), (Location::Kitchen, 1), (Location::Bathroom, 1)]
        );
    }

    #[test]
    fn test_stats_empty_collection() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let stats = dashboard_stats(&[], &ctx);

        assert_eq!(stats.total, 0);
        assert!(stats.counts_by_category.is_empty());
        assert!(stats.counts_by_location.is_empty());
        assert!(stats.counts_by_status.values().all(|c| *c == 0));
    }

    #[test]
    fn test_json_field_names_are_camel_case() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let items = vec![item("milk", Category::Food, Location::Fridge, Some(1))];

        let stats = serde_json::to_value(dashboard_stats(&items, &ctx)).unwrap();
        assert!(stats.get("countsByStatus").is_some());
        assert!(stats.get("countsByCategory").is_some());
        assert!(stats.get("counts_by_status").is_none());

        let entries = serde_json::to_value(timeline(&items, &ctx, 6)).unwrap();
        assert!(entries[0].get("shortLabel").is_some());
        assert!(entries[0].get("barWidth").is_some());
        assert_eq!(entries[0]["item"]["expiryDate"], "2024-06-11");
    }

    #[test]
    fn test_global_default_source_ignores_item_threshold() {
        let settings = Settings {
            default_alert_days: 1,
            ..Settings::default()
        };
        let mut bread = item("bread", Category::Food, Location::Kitchen, Some(5));
        bread.alert_days = Some(7);
        let items = vec![bread];

        let per_item = ExpiryContext::new(today(), &settings);
        assert_eq!(dashboard_stats(&items, &per_item).count(ExpiryStatus::Warning), 1);

        let global = per_item.with_source(AlertDaysSource::GlobalDefault);
        assert_eq!(dashboard_stats(&items, &global).count(ExpiryStatus::Ok), 1);
    }

    #[test]
    fn test_timeline_filters_and_sorts() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let items = vec![
            item("miso", Category::Food, Location::Fridge, Some(60)),
            item("charger", Category::Electronics, Location::Living, Some(1)),
            item("aspirin", Category::Medicine, Location::Bathroom, Some(3)),
            item("rice", Category::Food, Location::Pantry, None),
            item("yogurt", Category::Food, Location::Fridge, Some(-1)),
        ];

        let entries = timeline(&items, &ctx, DEFAULT_TIMELINE_LIMIT);
        let names: Vec<_> = entries.iter().map(|e| e.item.name.as_str()).collect();
        assert_eq!(names, vec!["yogurt", "aspirin", "miso"]);

        assert_eq!(entries[0].status, ExpiryStatus::Expired);
        assert_eq!(entries[0].days, -1);
        assert_eq!(entries[0].bar_width, 100.0);
        assert_eq!(entries[0].short_label, "1d over");
        assert_eq!(entries[2].bar_width, 5.0);
    }

    #[test]
    fn test_timeline_ties_keep_collection_order() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let items = vec![
            item("b", Category::Food, Location::Fridge, Some(2)),
            item("a", Category::Food, Location::Fridge, Some(2)),
            item("c", Category::Food, Location::Fridge, Some(1)),
        ];

        let names: Vec<_> = timeline(&items, &ctx, 6)
            .iter()
            .map(|e| e.item.name.clone())
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
