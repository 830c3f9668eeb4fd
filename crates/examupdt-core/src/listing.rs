//! Search, filter, sort and paginate in-memory collections.
//!
//! Every list screen runs the same pipeline over an already-fetched
//! collection: search narrows, filters constrain, the sort orders and the
//! page slice is cut last. Each stage is a pure function so the pipeline can
//! be replayed at will.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter value meaning "no constraint".
pub const ALL: &str = "all";

/// Page sizes offered by the admin tables.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A field value as seen by the list engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Date(DateTime<Utc>),
    Number(i64),
    Flag(bool),
}

impl<'a> FieldValue<'a> {
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(value) => Cow::Borrowed(value.as_ref()),
            FieldValue::Date(value) => Cow::Owned(value.to_rfc3339()),
            FieldValue::Number(value) => Cow::Owned(value.to_string()),
            FieldValue::Flag(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
        }
    }

    fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(b),
            _ => self.as_text().cmp(&other.as_text()),
        }
    }
}

impl From<String> for FieldValue<'_> {
    fn from(value: String) -> Self {
        FieldValue::Text(Cow::Owned(value))
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Describes how a collection element is searched, filtered and sorted.
pub trait Listable {
    /// Fields matched by the free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields accepted as exact-match filters.
    const FILTER_FIELDS: &'static [&'static str];

    /// Fields accepted as sort keys.
    const SORT_FIELDS: &'static [&'static str];

    /// Field ordered by the `newest` and `oldest` presets.
    const DATE_FIELD: &'static str;

    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Named orderings offered by the admin list screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortPreset {
    #[default]
    Newest,
    Oldest,
    Views,
    Title,
    Trending,
}

impl SortPreset {
    pub fn resolve<T: Listable>(self) -> (&'static str, SortDirection) {
        match self {
            SortPreset::Newest => (T::DATE_FIELD, SortDirection::Descending),
            SortPreset::Oldest => (T::DATE_FIELD, SortDirection::Ascending),
            SortPreset::Views => ("views", SortDirection::Descending),
            SortPreset::Title => ("title", SortDirection::Ascending),
            SortPreset::Trending => ("trending", SortDirection::Descending),
        }
    }
}

impl FromStr for SortPreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "newest" | "latest" => Ok(SortPreset::Newest),
            "oldest" => Ok(SortPreset::Oldest),
            "views" => Ok(SortPreset::Views),
            "title" => Ok(SortPreset::Title),
            "trending" => Ok(SortPreset::Trending),
            other => Err(format!("unknown sort preset: {other}")),
        }
    }
}

impl fmt::Display for SortPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortPreset::Newest => "newest",
            SortPreset::Oldest => "oldest",
            SortPreset::Views => "views",
            SortPreset::Title => "title",
            SortPreset::Trending => "trending",
        };
        write!(f, "{name}")
    }
}

/// One list-rendering request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search_text: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn first_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            filters: BTreeMap::new(),
            sort_key: None,
            sort_direction: SortDirection::default(),
            page: first_page(),
            page_size: default_page_size(),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn sort_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = direction;
        self
    }

    pub fn sort_preset<T: Listable>(self, preset: SortPreset) -> Self {
        let (key, direction) = preset.resolve::<T>();
        self.sort_by(key, direction)
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One rendered page plus the counts needed for pager controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> ListResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-based `(first, last, total)` of the visible slice, for
    /// "Showing 11 to 20 of 42 results".
    pub fn showing(&self) -> Option<(usize, usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        let last = first + self.items.len() - 1;
        Some((first, last, self.total_count))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Runs search, filter, sort and pagination in that order.
pub fn process<T: Listable>(items: Vec<T>, query: &ListQuery) -> ListResult<T> {
    paginate(refine(items, query), query.page, query.page_size)
}

/// Runs search, filter and sort without cutting a page.
pub fn refine<T: Listable>(items: Vec<T>, query: &ListQuery) -> Vec<T> {
    let items = apply_search(items, &query.search_text);
    let mut items = apply_filters(items, &query.filters);
    apply_sort(&mut items, query.sort_key.as_deref(), query.sort_direction);
    items
}

pub fn apply_search<T: Listable>(items: Vec<T>, search_text: &str) -> Vec<T> {
    if search_text.is_empty() {
        return items;
    }
    let needle = search_text.to_lowercase();

    items
        .into_iter()
        .filter(|item| {
            T::SEARCH_FIELDS.iter().any(|name| {
                item.field(name)
                    .is_some_and(|value| value.as_text().to_lowercase().contains(&needle))
            })
        })
        .collect()
}

pub fn apply_filters<T: Listable>(mut items: Vec<T>, filters: &BTreeMap<String, String>) -> Vec<T> {
    for (name, expected) in filters {
        if is_unconstrained(expected) || !T::FILTER_FIELDS.contains(&name.as_str()) {
            continue;
        }
        items.retain(|item| {
            item.field(name)
                .is_some_and(|value| value.as_text() == expected.as_str())
        });
    }
    items
}

/// Stable in both directions: equal elements keep their input order.
pub fn apply_sort<T: Listable>(items: &mut [T], sort_key: Option<&str>, direction: SortDirection) {
    let Some(key) = sort_key.filter(|key| T::SORT_FIELDS.contains(key)) else {
        return;
    };

    items.sort_by(|a, b| {
        let ordering = match (a.field(key), b.field(key)) {
            (Some(a), Some(b)) => a.compare(&b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Cuts one page. `page` and `page_size` below 1 are clamped to 1.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> ListResult<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    let items = items.into_iter().skip(start).take(page_size).collect();

    ListResult {
        items,
        total_count,
        page,
        page_size,
        total_pages,
    }
}

pub fn is_unconstrained(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}
