use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Lifetime of one rendered view.
///
/// Loads started inside the scope hand back `None` once it has been disposed,
/// so late results are dropped instead of being applied to a view that is
/// gone. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    disposed: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub async fn load<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        if self.is_disposed() {
            return None;
        }
        let value = fut.await;
        if self.is_disposed() {
            debug!("Discarding load result for disposed view");
            return None;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_load_returns_value_while_live() {
        let scope = ViewScope::new();
        assert_eq!(scope.load(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_result_after_dispose_is_discarded() {
        let scope = ViewScope::new();
        let handle = scope.clone();

        let load = scope.load(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.dispose();
            "late"
        });

        assert_eq!(load.await, None);
        assert!(scope.is_disposed());
    }

    #[tokio::test]
    async fn test_disposed_scope_skips_the_load() {
        let scope = ViewScope::new();
        scope.dispose();
        assert_eq!(scope.load(async { 1 }).await, None);
    }
}
