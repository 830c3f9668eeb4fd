use std::collections::BTreeMap;

use axum::{Json, Router};
use examupdt_core::listing::{self, ListQuery, Listable, SortDirection, SortPreset};
use serde::Serialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::errors::ApiError;

mod analytics;
mod auth;
mod contact;
mod content;
mod listings;
mod notes;
mod posts;
mod questions;
mod results;
mod videos;

pub fn create_api_v1_router<S: AppState>() -> Router<S> {
    Router::new()
        .merge(auth::router())
        .merge(posts::router())
        .merge(results::router())
        .merge(notes::router())
        .merge(questions::router())
        .merge(listings::router())
        .merge(videos::router())
        .merge(contact::router())
        .merge(content::router())
        .merge(analytics::router())
}

pub(crate) fn sort_preset(value: Option<&str>) -> Result<SortPreset, ApiError> {
    match value.filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map_err(ApiError::BadRequest),
        None => Ok(SortPreset::Newest),
    }
}

fn page_number(name: &str, value: &str) -> Result<usize, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{name} must be a positive integer")))
}

/// A list request decoded from the query string.
#[derive(Debug, Clone)]
pub(crate) struct ListParams {
    pub query: ListQuery,
    /// Whether the caller asked for a page; otherwise the whole refined list
    /// is returned.
    pub paged: bool,
}

impl ListParams {
    /// `search`, `sort`, `direction`, `page` and `page_size` are reserved;
    /// every other key is a field filter.
    pub fn parse<T: Listable>(mut params: BTreeMap<String, String>) -> Result<Self, ApiError> {
        let search = params.remove("search").unwrap_or_default();
        let sort = params.remove("sort");
        let direction = params.remove("direction");
        let page = params.remove("page");
        let page_size = params.remove("page_size");

        let mut query = ListQuery::new().search(search);
        match (sort, direction) {
            (Some(key), Some(direction)) => {
                let direction: SortDirection = direction.parse().map_err(ApiError::BadRequest)?;
                query = query.sort_by(key, direction);
            }
            (sort, None) => {
                query = query.sort_preset::<T>(sort_preset(sort.as_deref())?);
            }
            (None, Some(_)) => {
                return Err(ApiError::BadRequest(
                    "direction requires a sort field".to_string(),
                ));
            }
        }

        let paged = page.is_some() || page_size.is_some();
        if let Some(page) = page {
            query = query.page(page_number("page", &page)?);
        }
        if let Some(page_size) = page_size {
            query = query.page_size(page_number("page_size", &page_size)?);
        }

        for (field, value) in params {
            query = query.filter(field, value);
        }
        Ok(Self { query, paged })
    }

    /// Runs the list pipeline and renders the JSON envelope, with the rows
    /// under `key`.
    pub fn respond<T, V>(&self, key: &str, items: Vec<T>, view: impl FnMut(T) -> V) -> Json<Value>
    where
        T: Listable,
        V: Serialize,
    {
        if self.paged {
            let page = listing::process(items, &self.query).map(view);
            Json(json!({
                "success": true,
                key: page.items,
                "total": page.total_count,
                "page": page.page,
                "page_size": page.page_size,
                "total_pages": page.total_pages,
            }))
        } else {
            let rows: Vec<V> = listing::refine(items, &self.query)
                .into_iter()
                .map(view)
                .collect();
            Json(json!({
                "success": true,
                "total": rows.len(),
                key: rows,
            }))
        }
    }
}
