// Plain-text and JSON output for the CLI
use chrono::{Datelike, NaiveDate};
use iemono_core::{
    format_label, AlertEntry, AlertSummary, DashboardStats, ExpiryContext, ExpiryStatus, Item,
    Settings, TimelineEntry,
};
use serde_json::json;

const BAR_CELLS: usize = 20;
const WEEKDAYS_JA: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// `2024年6月10日(月)`, the one date style the app speaks
fn format_date_ja(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_JA[date.weekday().num_days_from_monday() as usize];
    format!("{}年{}月{}日({})", date.year(), date.month(), date.day(), weekday)
}

fn status_marker(status: ExpiryStatus) -> &'static str {
    match status {
        ExpiryStatus::Expired => "🔥",
        ExpiryStatus::Today => "❗",
        ExpiryStatus::Warning => "⚡",
        ExpiryStatus::Ok => "  ",
        ExpiryStatus::None => "  ",
    }
}

fn item_json(item: &Item, ctx: &ExpiryContext<'_>) -> serde_json::Value {
    let days = ctx.days(item);
    let status = ctx.status(item);
    json!({
        "item": item,
        "status": status,
        "statusColor": status.color(),
        "categoryColor": item.category.color(),
        "days": days,
        "label": format_label(days),
        "alertDays": ctx.alert_days(item),
    })
}

pub fn item_list(items: &[&Item], ctx: &ExpiryContext<'_>, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let out: Vec<_> = items.iter().map(|item| item_json(item, ctx)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items found");
        return Ok(());
    }

    for item in items {
        let days = ctx.days(item);
        let expiry = item
            .expiry_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {}  {} {}  {} x{}{}  {} {}  {}",
            status_marker(ctx.status(item)),
            short_id(&item.id),
            item.category.emoji(),
            item.name,
            item.location.label(),
            item.quantity,
            item.unit,
            expiry,
            ctx.status(item),
            format_label(days),
        );
    }
    println!("{} items", items.len());
    Ok(())
}

pub fn item_detail(item: &Item, ctx: &ExpiryContext<'_>, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&item_json(item, ctx))?);
        return Ok(());
    }

    let days = ctx.days(item);
    println!("{} {}", item.category.emoji(), item.name);
    println!("  id:         {}", item.id);
    println!("  category:   {} ({})", item.category.label(), item.category);
    println!("  location:   {} {} ({})", item.location.emoji(), item.location.label(), item.location);
    println!("  quantity:   {}{}", item.quantity, item.unit);
    match item.expiry_date {
        Some(date) => println!(
            "  expiry:     {} [{}] {}",
            format_date_ja(date),
            ctx.status(item),
            format_label(days)
        ),
        None => println!("  expiry:     -"),
    }
    let inherited = if item.alert_days.is_none() { " (default)" } else { "" };
    println!("  alert days: {}{}", ctx.alert_days(item), inherited);
    if let Some(memo) = &item.memo {
        println!("  memo:       {}", memo);
    }
    println!("  created:    {}", item.created_at.to_rfc3339());
    println!("  updated:    {}", item.updated_at.to_rfc3339());
    Ok(())
}

fn bar(width: f64) -> String {
    let filled = ((width / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_CELLS - filled))
}

fn banner_line(summary: &AlertSummary) -> String {
    let mut parts = Vec::new();
    if summary.expired > 0 {
        parts.push(format!("{} expired", summary.expired));
    }
    if summary.due_soon > 0 {
        parts.push(format!("{} expiring soon", summary.due_soon));
    }
    format!("⚠️  {}", parts.join(" · "))
}

pub fn dashboard(
    today: NaiveDate,
    stats: &DashboardStats,
    entries: &[TimelineEntry<'_>],
    banner: Option<AlertSummary>,
    as_json: bool,
) -> anyhow::Result<()> {
    if as_json {
        let out = json!({
            "today": today,
            "stats": stats,
            "expiredCount": stats.expired_count(),
            "dueSoonCount": stats.due_soon_count(),
            "timeline": entries,
            "banner": banner,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", format_date_ja(today));
    if let Some(summary) = &banner {
        println!("{}", banner_line(summary));
    }
    println!();
    println!(
        "📦 {} items   ⚡ {} due soon   🔥 {} expired",
        stats.total,
        stats.due_soon_count(),
        stats.expired_count()
    );

    if !entries.is_empty() {
        println!();
        println!("📅 Expiry timeline");
        for entry in entries {
            println!(
                "  {} {:<16} {} {:>8}  {}",
                entry.item.category.emoji(),
                entry.item.name,
                bar(entry.bar_width),
                entry.short_label,
                entry.item.expiry_date.map(|d| d.to_string()).unwrap_or_default(),
            );
        }
    }

    if !stats.counts_by_category.is_empty() {
        println!();
        println!("📊 By category");
        for (category, count) in &stats.counts_by_category {
            println!("  {} {:<10} {}", category.emoji(), category.label(), count);
        }
    }

    if !stats.counts_by_location.is_empty() {
        println!();
        println!("🏠 By location");
        let line: Vec<String> = stats
            .counts_by_location
            .iter()
            .map(|(location, count)| format!("{} {} {}", location.emoji(), location.label(), count))
            .collect();
        println!("  {}", line.join("   "));
    }

    Ok(())
}

pub fn alerts(
    summary: Option<AlertSummary>,
    entries: &[AlertEntry<'_>],
    enabled: bool,
    as_json: bool,
) -> anyhow::Result<()> {
    if as_json {
        let out = json!({
            "enabled": enabled,
            "summary": summary,
            "items": entries,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if !enabled {
        println!("Notifications are turned off");
        return Ok(());
    }

    let Some(summary) = summary else {
        println!("Nothing is expiring soon");
        return Ok(());
    };

    println!("{}", banner_line(&summary));
    for entry in entries {
        println!(
            "  {} {}  {} {}  {}",
            status_marker(entry.status),
            short_id(&entry.item.id),
            entry.item.category.emoji(),
            entry.item.name,
            entry.label,
        );
    }
    Ok(())
}

pub fn settings(settings: &Settings, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    println!("default alert days: {}", settings.default_alert_days);
    println!("show expired:       {}", settings.show_expired);
    println!("notifications:      {}", settings.notifications_enabled);
    println!("theme:              {}", settings.theme);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use iemono_core::{Category, Location};

    #[test]
    fn test_format_date_ja() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(format_date_ja(date), "2024年6月10日(月)");
    }

    #[test]
    fn test_bar_cells() {
        assert_eq!(bar(100.0).chars().filter(|c| *c == '█').count(), BAR_CELLS);
        assert_eq!(bar(5.0).chars().filter(|c| *c == '█').count(), 1);
        assert_eq!(bar(50.0).chars().count(), BAR_CELLS);
    }

    #[test]
    fn test_banner_line() {
        let both = AlertSummary {
            expired: 1,
            due_soon: 2,
        };
        assert_eq!(banner_line(&both), "⚠️  1 expired · 2 expiring soon");

        let soon_only = AlertSummary {
            expired: 0,
            due_soon: 3,
        };
        assert_eq!(banner_line(&soon_only), "⚠️  3 expiring soon");
    }

    #[test]
    fn test_item_json_carries_colors() {
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let item = Item {
            id: "0123456789".to_string(),
            name: "yogurt".to_string(),
            category: Category::Food,
            location: Location::Fridge,
            quantity: 2,
            unit: "個".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 6, 9),
            alert_days: None,
            memo: None,
            created_at: created,
            updated_at: created,
        };
        let settings = Settings::default();
        let ctx = ExpiryContext::new(today, &settings);

        let out = item_json(&item, &ctx);
        assert_eq!(out["status"], "expired");
        assert_eq!(out["statusColor"], ExpiryStatus::Expired.color());
        assert_eq!(out["categoryColor"], Category::Food.color());
        assert_eq!(out["days"], -1);
        assert_eq!(out["alertDays"], 3);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
