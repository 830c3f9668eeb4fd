//! Canonical record shapes for every content type.
//!
//! Field names are snake_case on the wire. The original camelCase spellings
//! some rows still carry are accepted as aliases and never written back.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::listing::{FieldValue, Listable};

/// A stored content record owned by one backing collection.
pub trait Record: Listable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Singular name used in messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Checks required fields before anything reaches the store.
    fn validate(&self) -> Result<(), Error>;

    /// Whether the record is visible on the public site.
    fn is_public(&self) -> bool {
        true
    }
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), Error> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing_fields(&missing))
    }
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
                    .ok_or_else(|| {
                        Error::Validation(format!("unknown {}: {value}", stringify!($name)))
                    })
            }
        }

        impl<'a> From<$name> for FieldValue<'a> {
            fn from(value: $name) -> Self {
                FieldValue::text(value.as_str())
            }
        }
    };
}

text_enum!(PostStatus { Draft => "draft", Published => "published" } default Draft);
text_enum!(ResultStatus {
    Released => "Released",
    Pending => "Pending",
    Updated => "Updated",
} default Released);
text_enum!(ExamType { BTech => "B.Tech", MTech => "M.Tech", PharmD => "PharmD" } default BTech);
text_enum!(FileType { Pdf => "PDF", Doc => "DOC", Ppt => "PPT", Zip => "ZIP" } default Pdf);
text_enum!(Difficulty { Easy => "Easy", Medium => "Medium", Hard => "Hard" } default Medium);
text_enum!(WorkMode { Remote => "Remote", Hybrid => "Hybrid", Onsite => "Onsite" } default Onsite);
text_enum!(ListingStatus { Active => "Active", Closed => "Closed" } default Active);
text_enum!(MessageStatus { Unread => "unread", Read => "read" } default Unread);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A notification shown on the updates feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, alias = "youtubeLinks")]
    pub youtube_links: Vec<String>,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub trending: bool,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for Post {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "content", "category"];
    const FILTER_FIELDS: &'static [&'static str] = &["category", "status", "author"];
    const SORT_FIELDS: &'static [&'static str] =
        &["date", "views", "title", "category", "status", "trending"];
    const DATE_FIELD: &'static str = "date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "content" => Some(FieldValue::text(&self.content)),
            "category" => Some(FieldValue::text(&self.category)),
            "status" => Some(self.status.into()),
            "date" => Some(self.date.into()),
            "views" => Some(self.views.into()),
            "author" => self.author.as_deref().map(FieldValue::text),
            "trending" => Some(self.trending.into()),
            _ => None,
        }
    }
}

impl Record for Post {
    const COLLECTION: &'static str = "posts";
    const KIND: &'static str = "post";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[("title", &self.title), ("content", &self.content)])
    }

    fn is_public(&self) -> bool {
        self.status == PostStatus::Published
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub year: i64,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for ExamResult {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "exam_type", "semester"];
    const FILTER_FIELDS: &'static [&'static str] = &["exam_type", "semester", "status", "year"];
    const SORT_FIELDS: &'static [&'static str] =
        &["date", "views", "title", "year", "exam_type", "semester", "status"];
    const DATE_FIELD: &'static str = "date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "exam_type" => Some(self.exam_type.into()),
            "semester" => Some(FieldValue::text(&self.semester)),
            "year" => Some(self.year.into()),
            "status" => Some(self.status.into()),
            "date" => Some(self.date.into()),
            "views" => Some(self.views.into()),
            _ => None,
        }
    }
}

impl Record for ExamResult {
    const COLLECTION: &'static str = "results";
    const KIND: &'static str = "result";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[("title", &self.title), ("semester", &self.semester)])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default = "Utc::now", alias = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub downloads: i64,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for Note {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "subject", "topic"];
    const FILTER_FIELDS: &'static [&'static str] = &["subject", "file_type"];
    const SORT_FIELDS: &'static [&'static str] =
        &["upload_date", "downloads", "title", "subject", "file_size"];
    const DATE_FIELD: &'static str = "upload_date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "subject" => Some(FieldValue::text(&self.subject)),
            "topic" => Some(FieldValue::text(&self.topic)),
            "file_type" => Some(self.file_type.into()),
            "file_size" => Some(i64::try_from(self.file_size).unwrap_or(i64::MAX).into()),
            "upload_date" => Some(self.upload_date.into()),
            "downloads" => Some(self.downloads.into()),
            _ => None,
        }
    }
}

impl Record for Note {
    const COLLECTION: &'static str = "notes";
    const KIND: &'static str = "note";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[
            ("title", &self.title),
            ("subject", &self.subject),
            ("file_url", &self.file_url),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for Question {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "subject", "topic", "content"];
    const FILTER_FIELDS: &'static [&'static str] = &["subject", "topic", "difficulty"];
    const SORT_FIELDS: &'static [&'static str] =
        &["created_at", "views", "title", "subject", "difficulty"];
    const DATE_FIELD: &'static str = "created_at";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "subject" => Some(FieldValue::text(&self.subject)),
            "topic" => Some(FieldValue::text(&self.topic)),
            "content" => Some(FieldValue::text(&self.content)),
            "difficulty" => Some(self.difficulty.into()),
            "created_at" => Some(self.created_at.into()),
            "views" => Some(self.views.into()),
            _ => None,
        }
    }
}

impl Record for Question {
    const COLLECTION: &'static str = "questions";
    const KIND: &'static str = "question";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[
            ("title", &self.title),
            ("subject", &self.subject),
            ("topic", &self.topic),
            ("content", &self.content),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, alias = "companyLogo", skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, alias = "jobMode")]
    pub job_mode: WorkMode,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "applyLink")]
    pub apply_link: String,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default = "Utc::now", alias = "postedDate")]
    pub posted_date: DateTime<Utc>,
    #[serde(default)]
    pub applicants: i64,
    #[serde(default)]
    pub trending: bool,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for Job {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "company", "location"];
    const FILTER_FIELDS: &'static [&'static str] = &["job_mode", "status", "location", "company"];
    const SORT_FIELDS: &'static [&'static str] =
        &["posted_date", "title", "company", "applicants", "status", "trending"];
    const DATE_FIELD: &'static str = "posted_date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "company" => Some(FieldValue::text(&self.company)),
            "location" => Some(FieldValue::text(&self.location)),
            "salary" => self.salary.as_deref().map(FieldValue::text),
            "job_mode" => Some(self.job_mode.into()),
            "status" => Some(self.status.into()),
            "posted_date" => Some(self.posted_date.into()),
            "applicants" => Some(self.applicants.into()),
            "trending" => Some(self.trending.into()),
            _ => None,
        }
    }
}

impl Record for Job {
    const COLLECTION: &'static str = "jobs";
    const KIND: &'static str = "job";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
        ])
    }

    fn is_public(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stipend: Option<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub mode: WorkMode,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "applyLink")]
    pub apply_link: String,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default = "Utc::now", alias = "postedDate")]
    pub posted_date: DateTime<Utc>,
    #[serde(default)]
    pub applicants: i64,
    #[serde(default)]
    pub trending: bool,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for Internship {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "company", "location"];
    const FILTER_FIELDS: &'static [&'static str] = &["mode", "status", "location", "company"];
    const SORT_FIELDS: &'static [&'static str] =
        &["posted_date", "title", "company", "applicants", "status", "trending"];
    const DATE_FIELD: &'static str = "posted_date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "company" => Some(FieldValue::text(&self.company)),
            "location" => Some(FieldValue::text(&self.location)),
            "stipend" => self.stipend.as_deref().map(FieldValue::text),
            "duration" => Some(FieldValue::text(&self.duration)),
            "mode" => Some(self.mode.into()),
            "status" => Some(self.status.into()),
            "posted_date" => Some(self.posted_date.into()),
            "applicants" => Some(self.applicants.into()),
            "trending" => Some(self.trending.into()),
            _ => None,
        }
    }
}

impl Record for Internship {
    const COLLECTION: &'static str = "internships";
    const KIND: &'static str = "internship";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[
            ("title", &self.title),
            ("company", &self.company),
            ("duration", &self.duration),
        ])
    }

    fn is_public(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for ContactMessage {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "message"];
    const FILTER_FIELDS: &'static [&'static str] = &["status"];
    const SORT_FIELDS: &'static [&'static str] = &["date", "name", "email", "status"];
    const DATE_FIELD: &'static str = "date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "name" => Some(FieldValue::text(&self.name)),
            "email" => Some(FieldValue::text(&self.email)),
            "message" => Some(FieldValue::text(&self.message)),
            "date" => Some(self.date.into()),
            "status" => Some(self.status.into()),
            _ => None,
        }
    }
}

impl Record for ContactMessage {
    const COLLECTION: &'static str = "contact_messages";
    const KIND: &'static str = "message";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ])?;
        if !self.email.contains('@') {
            return Err(Error::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }

    fn is_public(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YouTubeVideo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "videoLink")]
    pub video_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_link: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "Utc::now", alias = "uploadedDate")]
    pub uploaded_date: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for YouTubeVideo {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description", "category"];
    const FILTER_FIELDS: &'static [&'static str] = &["category"];
    const SORT_FIELDS: &'static [&'static str] = &["uploaded_date", "views", "title", "category"];
    const DATE_FIELD: &'static str = "uploaded_date";

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "title" => Some(FieldValue::text(&self.title)),
            "description" => self.description.as_deref().map(FieldValue::text),
            "category" => Some(FieldValue::text(&self.category)),
            "uploaded_date" => Some(self.uploaded_date.into()),
            "views" => Some(self.views.into()),
            _ => None,
        }
    }
}

impl Record for YouTubeVideo {
    const COLLECTION: &'static str = "youtube_videos";
    const KIND: &'static str = "video";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), Error> {
        require(&[("title", &self.title), ("video_link", &self.video_link)])
    }
}

/// Every content collection, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Posts,
    Results,
    Notes,
    Questions,
    Jobs,
    Internships,
    Messages,
    Videos,
}

impl ContentKind {
    pub const ALL: [ContentKind; 8] = [
        ContentKind::Posts,
        ContentKind::Results,
        ContentKind::Notes,
        ContentKind::Questions,
        ContentKind::Jobs,
        ContentKind::Internships,
        ContentKind::Messages,
        ContentKind::Videos,
    ];

    /// Path segment used by the HTTP routes.
    pub fn slug(&self) -> &'static str {
        match self {
            ContentKind::Posts => "posts",
            ContentKind::Results => "results",
            ContentKind::Notes => "notes",
            ContentKind::Questions => "questions",
            ContentKind::Jobs => "jobs",
            ContentKind::Internships => "internships",
            ContentKind::Messages => "contact",
            ContentKind::Videos => "videos",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Posts => Post::COLLECTION,
            ContentKind::Results => ExamResult::COLLECTION,
            ContentKind::Notes => Note::COLLECTION,
            ContentKind::Questions => Question::COLLECTION,
            ContentKind::Jobs => Job::COLLECTION,
            ContentKind::Internships => Internship::COLLECTION,
            ContentKind::Messages => ContactMessage::COLLECTION,
            ContentKind::Videos => YouTubeVideo::COLLECTION,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.to_ascii_lowercase();
        ContentKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.slug() == value
                    || kind.collection() == value
                    || (*kind == ContentKind::Posts && value == "notifications")
                    || (*kind == ContentKind::Messages && value == "messages")
            })
            .ok_or_else(|| Error::Validation(format!("unknown content type: {value}")))
    }
}
