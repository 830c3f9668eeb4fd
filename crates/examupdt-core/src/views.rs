//! Screen-ready shapes built from stored records.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{
    ContactMessage, ExamResult, Internship, Job, MessageStatus, Note, Post, PostStatus,
    YouTubeVideo,
};
use crate::format;
use crate::listing::{FieldValue, Listable};

const EXCERPT_LENGTH: usize = 160;
const TREND_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub id: String,
    pub title: String,
    pub exam: String,
    pub exam_type: String,
    pub semester: String,
    pub year: i64,
    pub link: String,
    pub pdf_link: Option<String>,
    pub status: String,
    pub date: String,
    pub views: i64,
}

impl From<&ExamResult> for ResultView {
    fn from(result: &ExamResult) -> Self {
        Self {
            id: result.id.clone(),
            title: result.title.clone(),
            exam: format::exam_label(result.exam_type.as_str(), &result.semester),
            exam_type: result.exam_type.to_string(),
            semester: result.semester.clone(),
            year: result.year,
            link: result.link.clone(),
            pdf_link: result.pdf_file.clone(),
            status: result.status.to_string(),
            date: format::display_date(result.date),
            views: result.views,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    /// Notes are shelved by subject, which the public page calls semester.
    pub semester: String,
    pub units: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size: String,
    pub upload_date: String,
    pub downloads: i64,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            semester: note.subject.clone(),
            units: note.topic.clone(),
            file_url: note.file_url.clone(),
            file_type: note.file_type.to_string(),
            file_size: format::file_size(note.file_size),
            upload_date: format::display_date(note.upload_date),
            downloads: note.downloads,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Job,
    Internship,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Job => "job",
            ListingKind::Internship => "internship",
        }
    }
}

/// A job or internship as shown on the combined opportunities board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingView {
    pub id: String,
    pub kind: ListingKind,
    pub position: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub mode: String,
    pub compensation: Option<String>,
    pub duration: Option<String>,
    pub description: String,
    pub apply_link: String,
    pub status: String,
    pub posted_date: DateTime<Utc>,
    pub posted_time: String,
    pub applicants: i64,
    pub trending: bool,
}

impl ListingView {
    pub fn from_job(job: &Job, now: DateTime<Utc>) -> Self {
        Self {
            id: job.id.clone(),
            kind: ListingKind::Job,
            position: job.title.clone(),
            company: job.company.clone(),
            company_logo: job.company_logo.clone(),
            location: job.location.clone(),
            mode: job.job_mode.to_string(),
            compensation: job.salary.clone(),
            duration: None,
            description: job.description.clone(),
            apply_link: job.apply_link.clone(),
            status: job.status.to_string(),
            posted_date: job.posted_date,
            posted_time: format::time_ago(job.posted_date, now),
            applicants: job.applicants,
            trending: job.trending,
        }
    }

    pub fn from_internship(internship: &Internship, now: DateTime<Utc>) -> Self {
        Self {
            id: internship.id.clone(),
            kind: ListingKind::Internship,
            position: internship.title.clone(),
            company: internship.company.clone(),
            company_logo: None,
            location: internship.location.clone(),
            mode: internship.mode.to_string(),
            compensation: internship.stipend.clone(),
            duration: Some(internship.duration.clone()),
            description: internship.description.clone(),
            apply_link: internship.apply_link.clone(),
            status: internship.status.to_string(),
            posted_date: internship.posted_date,
            posted_time: format::time_ago(internship.posted_date, now),
            applicants: internship.applicants,
            trending: internship.trending,
        }
    }

    /// Merges both boards into one list, jobs first.
    pub fn merge(jobs: &[Job], internships: &[Internship], now: DateTime<Utc>) -> Vec<Self> {
        jobs.iter()
            .map(|job| Self::from_job(job, now))
            .chain(
                internships
                    .iter()
                    .map(|internship| Self::from_internship(internship, now)),
            )
            .collect()
    }
}

impl Listable for ListingView {
    const SEARCH_FIELDS: &'static [&'static str] = &["position", "company", "location"];
    const FILTER_FIELDS: &'static [&'static str] = &["kind", "mode", "location"];
    const SORT_FIELDS: &'static [&'static str] =
        &["posted_date", "position", "title", "company", "applicants", "trending"];
    const DATE_FIELD: &'static str = "posted_date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "position" | "title" => Some(FieldValue::text(&self.position)),
            "company" => Some(FieldValue::text(&self.company)),
            "location" => Some(FieldValue::text(&self.location)),
            "kind" => Some(FieldValue::text(self.kind.as_str())),
            "mode" => Some(FieldValue::text(&self.mode)),
            "posted_date" => Some(self.posted_date.into()),
            "applicants" => Some(self.applicants.into()),
            "trending" => Some(self.trending.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub video_id: String,
    pub video_link: String,
    pub embed_url: String,
    pub thumbnail_url: String,
    pub uploaded: String,
    pub views: i64,
}

impl VideoView {
    pub fn new(video: &YouTubeVideo, now: DateTime<Utc>) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            description: video.description.clone(),
            category: video.category.clone(),
            video_id: format::video_id(&video.video_link).to_string(),
            video_link: video.video_link.clone(),
            embed_url: format::embed_url(&video.video_link, video.embed_link.as_deref()),
            thumbnail_url: format::thumbnail_url(
                &video.video_link,
                video.thumbnail_url.as_deref(),
            ),
            uploaded: format::relative_date(video.uploaded_date, now),
            views: video.views,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: String,
    pub date: String,
    pub excerpt: String,
    pub views: i64,
    pub trending: bool,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            category: post.category.clone(),
            status: post.status.to_string(),
            date: format::display_date(post.date),
            excerpt: format::excerpt(&post.content, EXCERPT_LENGTH),
            views: post.views,
            trending: post.trending,
        }
    }
}

/// One row of the dashboard's recent activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityView {
    pub id: String,
    pub title: String,
    pub status: String,
    pub age: String,
}

impl ActivityView {
    /// The `limit` most recent posts, newest first.
    pub fn recent(posts: &[Post], now: DateTime<Utc>, limit: usize) -> Vec<Self> {
        let mut posts: Vec<&Post> = posts.iter().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
            .into_iter()
            .take(limit)
            .map(|post| Self {
                id: post.id.clone(),
                title: post.title.clone(),
                status: post.status.to_string(),
                age: format::compact_age(post.date, now),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub label: String,
    pub count: usize,
}

/// Figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub total_views: i64,
    pub total_downloads: i64,
    pub unread_messages: usize,
    pub categories: BTreeMap<String, usize>,
    pub trend: Vec<TrendPoint>,
    pub recent: Vec<ActivityView>,
}

impl DashboardStats {
    pub fn compute(
        posts: &[Post],
        results: &[ExamResult],
        notes: &[Note],
        messages: &[ContactMessage],
        now: DateTime<Utc>,
    ) -> Self {
        let published_posts = posts
            .iter()
            .filter(|post| post.status == PostStatus::Published)
            .count();

        let mut categories = BTreeMap::new();
        for post in posts.iter().filter(|post| !post.category.is_empty()) {
            *categories.entry(post.category.clone()).or_insert(0) += 1;
        }

        let today = now.date_naive();
        let trend = (0..TREND_DAYS)
            .rev()
            .map(|offset| {
                let day = today - Duration::days(offset);
                TrendPoint {
                    day,
                    label: day.format("%b %-d").to_string(),
                    count: posts
                        .iter()
                        .filter(|post| post.date.date_naive() == day)
                        .count(),
                }
            })
            .collect();

        Self {
            total_posts: posts.len(),
            published_posts,
            draft_posts: posts.len() - published_posts,
            total_views: posts.iter().map(|post| post.views).sum::<i64>()
                + results.iter().map(|result| result.views).sum::<i64>(),
            total_downloads: notes.iter().map(|note| note.downloads).sum(),
            unread_messages: messages
                .iter()
                .filter(|message| message.status == MessageStatus::Unread)
                .count(),
            categories,
            trend,
            recent: ActivityView::recent(posts, now, 5),
        }
    }
}
