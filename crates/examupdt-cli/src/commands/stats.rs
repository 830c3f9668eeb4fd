//! Dashboard statistics.

use anyhow::{Context, Result};
use colored::Colorize;
use examupdt_core::views::DashboardStats;

use super::admin_client;
use crate::output;

const BAR_WIDTH: usize = 30;

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "█".repeat((count * BAR_WIDTH).div_ceil(max))
}

pub async fn run(service_url: &str) -> Result<()> {
    let (client, _) = admin_client(service_url).await?;
    let mut body = client.get("analytics", &[]).await?;
    let stats: DashboardStats = serde_json::from_value(body["analytics"].take())
        .context("Service returned unreadable statistics")?;

    output::field("Posts", &stats.total_posts.to_string());
    output::field("Published", &stats.published_posts.to_string());
    output::field("Drafts", &stats.draft_posts.to_string());
    output::field("Views", &stats.total_views.to_string());
    output::field("Downloads", &stats.total_downloads.to_string());
    output::field("Unread messages", &stats.unread_messages.to_string());

    if !stats.categories.is_empty() {
        println!();
        println!("{}", "Categories".bold());
        for (category, count) in &stats.categories {
            println!("  {category:<20} {count}");
        }
    }

    println!();
    println!("{}", "Posts, last 7 days".bold());
    let max = stats.trend.iter().map(|point| point.count).max().unwrap_or(0);
    for point in &stats.trend {
        println!("  {:<8} {:>3} {}", point.label, point.count, bar(point.count, max).cyan());
    }

    if !stats.recent.is_empty() {
        println!();
        println!("{}", "Recent activity".bold());
        for activity in &stats.recent {
            println!(
                "  {:<6} {} {}",
                activity.age.dimmed(),
                activity.title,
                activity.status.dimmed()
            );
        }
    }
    Ok(())
}
