//! Public listings, paged by the service.

use anyhow::{Result, bail};
use clap::Args;
use examupdt_core::ListResult;
use examupdt_core::listing::{DEFAULT_PAGE_SIZE, paginate};
use serde_json::Value;

use super::{loaded, parse_pairs, rows};
use crate::client::ApiClient;
use crate::output;

const SECTIONS: [&str; 8] = [
    "posts",
    "results",
    "notes",
    "questions",
    "jobs",
    "internships",
    "listings",
    "videos",
];

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Section to browse: posts, results, notes, questions, jobs,
    /// internships, listings or videos
    pub section: String,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Field filter as key=value, e.g. category=Exams or exam="B.Tech 1-1"
    #[arg(short, long = "filter")]
    pub filters: Vec<String>,

    /// Sort preset (newest, oldest, views, title, trending) or field name
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc; requires --sort with a field name
    #[arg(long)]
    pub direction: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

fn query(args: &BrowseArgs) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", args.page.to_string()),
        ("page_size", args.page_size.to_string()),
    ];
    if let Some(search) = &args.search {
        query.push(("search", search.clone()));
    }
    if let Some(sort) = &args.sort {
        query.push(("sort", sort.clone()));
    }
    if let Some(direction) = &args.direction {
        query.push(("direction", direction.clone()));
    }
    query
}

fn count(body: &Value, key: &str) -> Option<usize> {
    body[key].as_u64().map(|n| n as usize)
}

/// The service's page, or an empty page when the read failed.
fn page_from(body: Option<Value>, section: &str, args: &BrowseArgs) -> ListResult<Value> {
    let empty = || paginate(Vec::new(), args.page, args.page_size);
    let Some(body) = body else {
        return empty();
    };
    let paging = (
        count(&body, "total"),
        count(&body, "page"),
        count(&body, "page_size"),
        count(&body, "total_pages"),
    );
    match paging {
        (Some(total_count), Some(page), Some(page_size), Some(total_pages)) => ListResult {
            items: rows(&body, section),
            total_count,
            page,
            page_size,
            total_pages,
        },
        _ => empty(),
    }
}

pub async fn run(service_url: &str, args: BrowseArgs) -> Result<()> {
    let section = args.section.to_lowercase();
    if !SECTIONS.contains(&section.as_str()) {
        bail!("unknown section {section:?}; expected one of {}", SECTIONS.join(", "));
    }

    let client = ApiClient::new(service_url)?;
    let mut params: Vec<(&str, String)> = query(&args);
    let filters = parse_pairs(&args.filters)?;
    params.extend(filters.iter().map(|(key, value)| (key.as_str(), value.clone())));

    let body = loaded(client.get(&section, &params).await);
    let page = page_from(body, &section, &args);
    output::page(&page, args.pretty)
}
