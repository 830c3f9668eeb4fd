//! Admin list screens: the whole collection is fetched once and the list
//! pipeline runs locally.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use examupdt_core::content::{
    ContactMessage, ExamResult, Internship, Job, Note, Post, Question, YouTubeVideo,
};
use examupdt_core::lifecycle::ViewScope;
use examupdt_core::listing::{self, DEFAULT_PAGE_SIZE};
use examupdt_core::views::{ListingView, NoteView, PostSummary, ResultView, VideoView};
use examupdt_core::{ContentKind, ListQuery, ListResult, Record, SortDirection, SortPreset};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{admin_client, loaded, parse_pairs, rows};
use crate::client::{admin_path, list_key};
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection: posts, results, notes, questions, jobs, internships,
    /// contact or videos
    pub kind: ContentKind,

    /// Free-text search
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact field filter as key=value; "all" means no constraint
    #[arg(short, long = "filter")]
    pub filters: Vec<String>,

    /// Sort preset: newest, oldest, views, title or trending
    #[arg(long, conflicts_with = "sort_by")]
    pub sort: Option<SortPreset>,

    /// Sort by a named field instead of a preset
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Direction for --sort-by
    #[arg(long, default_value = "desc")]
    pub direction: SortDirection,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ListArgs {
    pub fn query<T: Record>(&self) -> Result<ListQuery> {
        let mut query = ListQuery::new()
            .search(&self.search)
            .page(self.page)
            .page_size(self.page_size);
        query = match &self.sort_by {
            Some(field) => query.sort_by(field, self.direction),
            None => query.sort_preset::<T>(self.sort.unwrap_or(SortPreset::Newest)),
        };
        for (field, value) in parse_pairs(&self.filters)? {
            query = query.filter(field, value);
        }
        Ok(query)
    }
}

/// Decodes the fetched rows and cuts the requested page.
pub fn render<T, V>(
    rows: Vec<Value>,
    query: &ListQuery,
    view: impl FnMut(T) -> V,
) -> Result<ListResult<V>>
where
    T: Record,
    V: Serialize,
{
    let records: Vec<T> = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .context("Service returned a record this client cannot read")?;
    Ok(listing::process(records, query).map(view))
}

fn page_of(kind: ContentKind, rows: Vec<Value>, args: &ListArgs) -> Result<ListResult<Value>> {
    let now = Utc::now();
    fn to_value<V: Serialize>(page: ListResult<V>) -> Result<ListResult<Value>> {
        let ListResult {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        } = page;
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;
        Ok(ListResult {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        })
    }

    match kind {
        ContentKind::Posts => to_value(render::<Post, _>(rows, &args.query::<Post>()?, |post| {
            PostSummary::from(&post)
        })?),
        ContentKind::Results => to_value(render::<ExamResult, _>(
            rows,
            &args.query::<ExamResult>()?,
            |result| ResultView::from(&result),
        )?),
        ContentKind::Notes => to_value(render::<Note, _>(rows, &args.query::<Note>()?, |note| {
            NoteView::from(&note)
        })?),
        ContentKind::Questions => to_value(render::<Question, _>(
            rows,
            &args.query::<Question>()?,
            |question| question,
        )?),
        ContentKind::Jobs => to_value(render::<Job, _>(rows, &args.query::<Job>()?, |job| {
            ListingView::from_job(&job, now)
        })?),
        ContentKind::Internships => to_value(render::<Internship, _>(
            rows,
            &args.query::<Internship>()?,
            |internship| ListingView::from_internship(&internship, now),
        )?),
        ContentKind::Messages => to_value(render::<ContactMessage, _>(
            rows,
            &args.query::<ContactMessage>()?,
            |message| message,
        )?),
        ContentKind::Videos => to_value(render::<YouTubeVideo, _>(
            rows,
            &args.query::<YouTubeVideo>()?,
            |video| VideoView::new(&video, now),
        )?),
    }
}

pub async fn run(service_url: &str, args: ListArgs) -> Result<()> {
    let (client, _) = admin_client(service_url).await?;

    let scope = ViewScope::new();
    let path = admin_path(args.kind);
    let fetch = client.get(&path, &[]);
    let loaded = tokio::select! {
        loaded = scope.load(fetch) => loaded,
        _ = tokio::signal::ctrl_c() => {
            scope.dispose();
            None
        }
    };
    let Some(body) = loaded else {
        output::notice("Cancelled");
        return Ok(());
    };

    let fetched = super::loaded(body)
        .map(|body| rows(&body, list_key(args.kind)))
        .unwrap_or_default();
    debug!(kind = %args.kind, rows = fetched.len(), "Fetched collection");

    let page = page_of(args.kind, fetched, &args)?;
    output::page(&page, args.pretty)
}
