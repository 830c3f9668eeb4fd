//! Display formatting shared by the view models.
//!
//! Each screen owns one age formatter; they differ on purpose and must not be
//! merged.

use chrono::{DateTime, Utc};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

fn elapsed_ms(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds()
}

/// Age label on the jobs and internships board.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = elapsed_ms(then, now);
    let hours = elapsed.div_euclid(HOUR_MS);
    let days = elapsed.div_euclid(DAY_MS);

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{days} days ago")
    }
}

/// Upload label on the video gallery.
///
/// Dates in the future read as "Today".
pub fn relative_date(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = elapsed_ms(then, now).div_euclid(DAY_MS).max(0);

    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => then.format("%-m/%-d/%Y").to_string(),
    }
}

/// Short age used in the dashboard activity feed.
pub fn compact_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = elapsed_ms(then, now).max(0);
    let minutes = elapsed / MINUTE_MS;
    let hours = elapsed / HOUR_MS;

    if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{}d ago", elapsed / DAY_MS)
    }
}

pub fn file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// "Jan 5, 2024"
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Jan 5, 2024, 09:30 AM"
pub fn display_date_time(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

pub fn exam_label(exam_type: &str, semester: &str) -> String {
    format!("{exam_type} {semester}")
}

/// Splits an exam filter such as `"B.Tech 1-1"` into exam type and semester.
///
/// `"All"`, an empty value or a value with no space means no filter.
pub fn parse_exam_filter(value: &str) -> Option<(&str, &str)> {
    let value = value.trim();
    if crate::listing::is_unconstrained(value) {
        return None;
    }
    value
        .split_once(' ')
        .map(|(exam_type, semester)| (exam_type, semester.trim()))
}

/// Extracts the video id from a watch, short or embed link, or a bare id.
///
/// Anything else is returned unchanged.
pub fn video_id(url: &str) -> &str {
    const MARKERS: [&str; 3] = ["youtube.com/watch?v=", "youtu.be/", "youtube.com/embed/"];

    for marker in MARKERS {
        if let Some(start) = url.find(marker) {
            let rest = &url[start + marker.len()..];
            let end = rest
                .find(|c| matches!(c, '&' | '\n' | '?' | '#'))
                .unwrap_or(rest.len());
            if end > 0 {
                return &rest[..end];
            }
        }
    }

    // A bare id and an unrecognised link both come back as given.
    url.trim()
}

/// Whether `value` looks like a bare 11-character video id.
pub fn is_bare_video_id(value: &str) -> bool {
    value.len() == 11
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn embed_url(video_link: &str, custom: Option<&str>) -> String {
    match custom.filter(|value| !value.is_empty()) {
        Some(custom) => custom.to_string(),
        None => format!("https://www.youtube.com/embed/{}", video_id(video_link)),
    }
}

pub fn thumbnail_url(video_link: &str, custom: Option<&str>) -> String {
    match custom.filter(|value| !value.is_empty()) {
        Some(custom) => custom.to_string(),
        None => format!(
            "https://img.youtube.com/vi/{}/maxresdefault.jpg",
            video_id(video_link)
        ),
    }
}

/// First `limit` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_time_ago_hour_boundary() {
        assert_eq!(time_ago(now() - Duration::minutes(59), now()), "Just now");
        assert_eq!(time_ago(now() - Duration::minutes(60), now()), "1 hours ago");
        assert_eq!(time_ago(now() - Duration::hours(23), now()), "23 hours ago");
    }

    #[test]
    fn test_time_ago_days() {
        assert_eq!(time_ago(now() - Duration::hours(24), now()), "1 day ago");
        assert_eq!(time_ago(now() - Duration::hours(47), now()), "1 day ago");
        assert_eq!(time_ago(now() - Duration::days(3), now()), "3 days ago");
    }

    #[test]
    fn test_time_ago_future_is_just_now() {
        assert_eq!(time_ago(now() + Duration::minutes(5), now()), "Just now");
    }

    #[test]
    fn test_relative_date_buckets() {
        assert_eq!(relative_date(now() - Duration::hours(3), now()), "Today");
        assert_eq!(relative_date(now() - Duration::days(1), now()), "Yesterday");
        assert_eq!(relative_date(now() - Duration::days(6), now()), "6 days ago");
        assert_eq!(relative_date(now() - Duration::days(14), now()), "2 weeks ago");
        assert_eq!(relative_date(now() - Duration::days(90), now()), "3 months ago");
        assert_eq!(relative_date(now() - Duration::days(400), now()), "5/12/2023");
    }

    #[test]
    fn test_compact_age() {
        assert_eq!(compact_age(now() - Duration::minutes(5), now()), "5m ago");
        assert_eq!(compact_age(now() - Duration::minutes(60), now()), "1h ago");
        assert_eq!(compact_age(now() - Duration::hours(30), now()), "1d ago");
    }

    #[test]
    fn test_file_size_boundaries() {
        assert_eq!(file_size(0), "0 B");
        assert_eq!(file_size(1023), "1023 B");
        assert_eq!(file_size(1024), "1.0 KB");
        assert_eq!(file_size(1536), "1.5 KB");
        assert_eq!(file_size(1_048_576), "1.0 MB");
    }

    #[test]
    fn test_display_dates() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(display_date(date), "Jan 5, 2024");
        assert_eq!(display_date_time(date), "Jan 5, 2024, 09:30 AM");
    }

    #[test]
    fn test_parse_exam_filter() {
        assert_eq!(parse_exam_filter("B.Tech 1-1"), Some(("B.Tech", "1-1")));
        assert_eq!(parse_exam_filter("M.Tech II Sem"), Some(("M.Tech", "II Sem")));
        assert_eq!(parse_exam_filter("All"), None);
        assert_eq!(parse_exam_filter("PharmD"), None);
        assert_eq!(exam_label("B.Tech", "1-1"), "B.Tech 1-1");
    }

    #[test]
    fn test_video_id_formats() {
        assert_eq!(video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"), "dQw4w9WgXcQ");
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), "dQw4w9WgXcQ");
        assert_eq!(video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(video_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(video_id("https://vimeo.com/123"), "https://vimeo.com/123");
        assert!(is_bare_video_id("dQw4w9WgXcQ"));
        assert!(!is_bare_video_id("https://youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_custom_urls_win() {
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ", None),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            thumbnail_url("https://youtu.be/dQw4w9WgXcQ", Some("https://cdn/x.jpg")),
            "https://cdn/x.jpg"
        );
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ", Some("")),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("a longer body of text", 8), "a longer...");
    }
}
