// The in-app alert banner. Not an OS notification, just a computed view.
use crate::expiry::{format_label, ExpiryContext, ExpiryStatus};
use crate::models::Item;
use serde::Serialize;

/// Counts shown in the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub expired: usize,
    /// Due today plus inside the warning window
    pub due_soon: usize,
}

impl AlertSummary {
    pub fn total(&self) -> usize {
        self.expired + self.due_soon
    }
}

/// One alerting item with its countdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEntry<'a> {
    pub item: &'a Item,
    pub status: ExpiryStatus,
    pub days: i64,
    pub label: String,
}

/// Banner counts, or `None` when there is nothing to show
///
/// Notifications being switched off also yields `None`.
pub fn alert_summary(items: &[Item], ctx: &ExpiryContext<'_>) -> Option<AlertSummary> {
    if !ctx.settings.notifications_enabled {
        return None;
    }

    let mut summary = AlertSummary {
        expired: 0,
        due_soon: 0,
    };
    for item in items {
        match ctx.status(item) {
            ExpiryStatus::Expired => summary.expired += 1,
            s if s.is_due_soon() => summary.due_soon += 1,
            _ => {}
        }
    }

    if summary.total() == 0 {
        None
    } else {
        Some(summary)
    }
}

/// Alerting items grouped expired, then today, then warning
///
/// Within a group the collection order is kept. Respects
/// `notifications_enabled` the same way `alert_summary` does.
pub fn alert_items<'a>(items: &'a [Item], ctx: &ExpiryContext<'_>) -> Vec<AlertEntry<'a>> {
    if !ctx.settings.notifications_enabled {
        return Vec::new();
    }

    let mut entries: Vec<AlertEntry<'a>> = items
        .iter()
        .filter_map(|item| {
            let status = ctx.status(item);
            if status != ExpiryStatus::Expired && !status.is_due_soon() {
                return None;
            }
            let days = ctx.days(item)?;
            Some(AlertEntry {
                item,
                status,
                days,
                label: format_label(Some(days)),
            })
        })
        .collect();

    entries.sort_by_key(|e| e.status);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Location, Settings};
    use crate::testing::{item, today};

    fn sample() -> Vec<Item> {
        vec![
            item("bread", Category::Food, Location::Kitchen, Some(2)),
            item("yogurt", Category::Food, Location::Fridge, Some(-1)),
            item("miso", Category::Food, Location::Fridge, Some(60)),
            item("milk", Category::Food, Location::Fridge, Some(0)),
            item("shampoo", Category::Daily, Location::Bathroom, None),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let summary = alert_summary(&sample(), &ctx).unwrap();

        assert_eq!(summary.expired, 1);
        assert_eq!(summary.due_soon, 2);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_summary_disabled() {
        let settings = Settings {
            notifications_enabled: false,
            ..Settings::default()
        };
        let ctx = ExpiryContext::new(today(), &settings);

        assert_eq!(alert_summary(&sample(), &ctx), None);
        assert!(alert_items(&sample(), &ctx).is_empty());
    }

    #[test]
    fn test_summary_nothing_to_report() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let calm = vec![item("miso", Category::Food, Location::Fridge, Some(60))];

        assert_eq!(alert_summary(&calm, &ctx), None);
    }

    #[test]
    fn test_alert_items_grouped() {
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today(), &settings);
        let items = sample();
        let entries = alert_items(&items, &ctx);

        let names: Vec<_> = entries.iter().map(|e| e.item.name.as_str()).collect();
        assert_eq!(names, vec!["yogurt", "milk", "bread"]);
        assert_eq!(entries[0].label, "1 day overdue");
        assert_eq!(entries[1].label, "due today");
        assert_eq!(entries[2].label, "2 days remaining");
    }

    #[test]
    fn test_summary_json_is_camel_case() {
        let summary = AlertSummary {
            expired: 1,
            due_soon: 2,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["dueSoon"], 2);
        assert_eq!(json["expired"], 1);
    }
}
