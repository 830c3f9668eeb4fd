//! Multi-row selection on admin list screens and the bulk delete it drives.

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::content::Record;
use crate::error::Error;

/// Ids currently ticked on a list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Header checkbox state.
    ///
    /// Compares counts only, so a selection carried over from a wider view
    /// can read as "all selected" for a narrower one. An empty view is never
    /// all selected.
    pub fn all_selected(&self, visible: &[&str]) -> bool {
        !visible.is_empty() && self.ids.len() == visible.len()
    }

    /// Clears the selection when it already covers `visible`, otherwise
    /// replaces it with exactly the visible ids.
    pub fn toggle_all(&mut self, visible: &[&str]) {
        if self.all_selected(visible) {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|id| id.to_string()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Anything that can remove a record by id.
#[async_trait]
pub trait Deleter: Send + Sync {
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_result(self) -> Result<usize, Error> {
        if self.failed.is_empty() {
            Ok(self.deleted.len())
        } else {
            Err(Error::BulkPartialFailure {
                deleted: self.deleted.len(),
                failed: self.failed.len(),
            })
        }
    }
}

/// Issues every delete concurrently and waits for all of them.
///
/// There is no rollback; records whose delete succeeded stay deleted even
/// when a sibling fails.
pub async fn delete_all<D, I, S>(deleter: &D, ids: I) -> BulkDeleteReport
where
    D: Deleter + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
    debug!(count = ids.len(), "Starting bulk delete");

    let outcomes = join_all(ids.iter().map(|id| deleter.delete(id))).await;

    let mut report = BulkDeleteReport::default();
    for (id, outcome) in ids.into_iter().zip(outcomes) {
        match outcome {
            Ok(()) => report.deleted.push(id),
            Err(err) => {
                warn!(id = %id, error = %err, "Bulk delete entry failed");
                report.failed.push((id, err));
            }
        }
    }
    report
}

/// Deletes every selected record and reconciles the local view.
///
/// Deleted ids leave both `items` and `selection`; failed ids stay in both so
/// the user can retry them.
pub async fn bulk_delete<T, D>(
    deleter: &D,
    selection: &mut Selection,
    items: &mut Vec<T>,
) -> BulkDeleteReport
where
    T: Record,
    D: Deleter + ?Sized,
{
    let ids: Vec<String> = selection.ids().map(str::to_string).collect();
    let report = delete_all(deleter, ids).await;

    for id in &report.deleted {
        selection.ids.remove(id);
    }
    items.retain(|item| !report.deleted.iter().any(|id| id == item.id()));
    report
}
