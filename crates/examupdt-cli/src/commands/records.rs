//! Single-record admin operations and bulk delete.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use examupdt_core::content::{
    ContactMessage, ExamResult, Internship, Job, Note, Post, Question, YouTubeVideo,
};
use examupdt_core::selection::{BulkDeleteReport, Selection, bulk_delete as delete_selected};
use examupdt_core::{ContentKind, Record};
use serde_json::{Map, Value};
use tracing::info;

use super::{admin_client, parse_pairs};
use crate::client::{ApiClient, RemoteCollection, admin_path, list_key};
use crate::output;

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub kind: ContentKind,
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    pub kind: ContentKind,

    /// JSON file holding the record; "-" reads stdin
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub kind: ContentKind,
    pub id: String,

    /// Field to change as key=value; JSON values are accepted
    #[arg(long = "set")]
    pub fields: Vec<String>,

    /// JSON file with the fields to change
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub kind: ContentKind,
    pub id: String,
}

#[derive(Args, Debug)]
pub struct BulkDeleteArgs {
    pub kind: ContentKind,

    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

fn read_json(path: &PathBuf) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}

/// `--set` values are taken as JSON when they parse, otherwise as text.
fn patch_from(fields: &[String]) -> Result<Map<String, Value>> {
    Ok(parse_pairs(fields)?
        .into_iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect())
}

async fn fetch_rows(client: &ApiClient, kind: ContentKind) -> Result<Vec<Value>> {
    let body = client.get(&admin_path(kind), &[]).await?;
    body[list_key(kind)]
        .as_array()
        .cloned()
        .context("response has no rows")
}

pub async fn show(service_url: &str, args: ShowArgs) -> Result<()> {
    let (client, _) = admin_client(service_url).await?;

    let record = match args.kind {
        // Messages have no by-id route.
        ContentKind::Messages => fetch_rows(&client, args.kind)
            .await?
            .into_iter()
            .find(|row| row["id"] == args.id.as_str())
            .with_context(|| format!("message {} not found", args.id))?,
        kind => {
            let path = format!("{}/{}", admin_path(kind), args.id);
            client.get(&path, &[]).await?["record"].take()
        }
    };
    output::json_pretty(&record)
}

pub async fn create(service_url: &str, args: CreateArgs) -> Result<()> {
    let (client, _) = admin_client(service_url).await?;
    let body = read_json(&args.file)?;

    let created = client.post(&admin_path(args.kind), &body).await?;
    let id = created["record"]["id"]
        .as_str()
        .or_else(|| created["id"].as_str())
        .unwrap_or_default();
    output::success(&format!("Created {} {id}", args.kind));
    Ok(())
}

pub async fn update(service_url: &str, args: UpdateArgs) -> Result<()> {
    if args.kind == ContentKind::Messages {
        bail!("messages are changed with 'examupdt contact read' or 'examupdt contact reply'");
    }
    let mut patch = match &args.file {
        Some(path) => match read_json(path)? {
            Value::Object(map) => map,
            _ => bail!("{} must hold a JSON object", path.display()),
        },
        None => Map::new(),
    };
    patch.extend(patch_from(&args.fields)?);
    if patch.is_empty() {
        bail!("nothing to update; pass --set key=value or --file");
    }

    let (client, _) = admin_client(service_url).await?;
    let path = format!("{}/{}", admin_path(args.kind), args.id);
    let updated = client.put(&path, &Value::Object(patch)).await?;
    output::success(&format!("Updated {} {}", args.kind, args.id));
    output::json_pretty(&updated["record"])
}

pub async fn delete(service_url: &str, args: DeleteArgs) -> Result<()> {
    let (client, _) = admin_client(service_url).await?;
    let path = format!("{}/{}", admin_path(args.kind), args.id);
    client.delete(&path).await?;
    output::success(&format!("Deleted {} {}", args.kind, args.id));
    Ok(())
}

async fn delete_typed<T: Record>(
    client: &ApiClient,
    kind: ContentKind,
    rows: Vec<Value>,
    ids: &[String],
) -> Result<(BulkDeleteReport, usize)> {
    let mut items: Vec<T> = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .context("Service returned a record this client cannot read")?;

    let mut selection = Selection::new();
    for id in ids {
        if !selection.contains(id) {
            selection.toggle(id);
        }
    }

    let remote = RemoteCollection::new(client, kind);
    let report = delete_selected(&remote, &mut selection, &mut items).await;
    Ok((report, items.len()))
}

pub async fn bulk_delete(service_url: &str, args: BulkDeleteArgs) -> Result<()> {
    let (client, _) = admin_client(service_url).await?;
    let rows = fetch_rows(&client, args.kind).await?;

    let (report, remaining) = match args.kind {
        ContentKind::Posts => delete_typed::<Post>(&client, args.kind, rows, &args.ids).await?,
        ContentKind::Results => {
            delete_typed::<ExamResult>(&client, args.kind, rows, &args.ids).await?
        }
        ContentKind::Notes => delete_typed::<Note>(&client, args.kind, rows, &args.ids).await?,
        ContentKind::Questions => {
            delete_typed::<Question>(&client, args.kind, rows, &args.ids).await?
        }
        ContentKind::Jobs => delete_typed::<Job>(&client, args.kind, rows, &args.ids).await?,
        ContentKind::Internships => {
            delete_typed::<Internship>(&client, args.kind, rows, &args.ids).await?
        }
        ContentKind::Messages => {
            delete_typed::<ContactMessage>(&client, args.kind, rows, &args.ids).await?
        }
        ContentKind::Videos => {
            delete_typed::<YouTubeVideo>(&client, args.kind, rows, &args.ids).await?
        }
    };
    info!(deleted = report.deleted.len(), failed = report.failed.len(), "Bulk delete done");

    for (id, err) in &report.failed {
        output::error(&format!("{id}: {}", err.notice()));
    }
    output::field("Remaining", &remaining.to_string());

    let deleted = report.into_result()?;
    output::success(&format!("Deleted {deleted} {}", args.kind));
    Ok(())
}
