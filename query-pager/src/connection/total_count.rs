//! Lazily computed total count

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, TryFutureExt};
use tokio::sync::OnceCell;

use crate::error::{Error, Result};
use crate::repository::RepositoryResult;

type CountFn = dyn Fn() -> BoxFuture<'static, Result<u64>> + Send + Sync;

/// Number of rows matching a connection's filter
///
/// A lazy count runs its query the first time [`TotalCount::get`] is awaited
/// and remembers the value; clones share the memoised value. Failed counts
/// are not remembered and run again on the next call.
///
/// # Example
///
/// ```rust
/// use query_pager::connection::TotalCount;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let count = TotalCount::lazy(|| async { Ok(42) });
/// assert!(!count.is_resolved());
/// assert_eq!(count.get().await.unwrap(), 42);
/// assert!(count.is_resolved());
///
/// assert_eq!(TotalCount::resolved(3).get().await.unwrap(), 3);
/// assert!(TotalCount::disabled().get().await.is_err());
/// # });
/// ```
#[derive(Clone)]
pub struct TotalCount(Repr);

#[derive(Clone)]
enum Repr {
    Resolved(u64),
    Disabled,
    Lazy(Arc<LazyCount>),
}

struct LazyCount {
    value: OnceCell<u64>,
    count: Box<CountFn>,
}

impl TotalCount {
    /// A count known up front
    pub const fn resolved(total: u64) -> Self {
        Self(Repr::Resolved(total))
    }

    /// A count computed by `count` on first access
    pub fn lazy<F, Fut>(count: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RepositoryResult<u64>> + Send + 'static,
    {
        let count: Box<CountFn> = Box::new(move || count().map_err(Error::from).boxed());
        Self(Repr::Lazy(Arc::new(LazyCount {
            value: OnceCell::new(),
            count,
        })))
    }

    /// A count that was switched off
    pub const fn disabled() -> Self {
        Self(Repr::Disabled)
    }

    /// Resolve the count, running the count query at most once on success
    pub async fn get(&self) -> Result<u64> {
        match &self.0 {
            Repr::Resolved(total) => Ok(*total),
            Repr::Disabled => Err(Error::TotalCountDisabled),
            Repr::Lazy(lazy) => {
                let total = lazy
                    .value
                    .get_or_try_init(|| {
                        tracing::debug!("running total count query");
                        (lazy.count)()
                    })
                    .await?;
                Ok(*total)
            }
        }
    }

    /// The count, if already known
    pub fn peek(&self) -> Option<u64> {
        match &self.0 {
            Repr::Resolved(total) => Some(*total),
            Repr::Disabled => None,
            Repr::Lazy(lazy) => lazy.value.get().copied(),
        }
    }

    /// Whether the count is known without running a query
    pub fn is_resolved(&self) -> bool {
        self.peek().is_some()
    }

    /// Whether the count was switched off
    pub fn is_disabled(&self) -> bool {
        matches!(self.0, Repr::Disabled)
    }
}

impl Default for TotalCount {
    fn default() -> Self {
        Self::resolved(0)
    }
}

impl fmt::Debug for TotalCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Resolved(total) => f.debug_tuple("Resolved").field(total).finish(),
            Repr::Disabled => f.write_str("Disabled"),
            Repr::Lazy(lazy) => f.debug_tuple("Lazy").field(&lazy.value.get()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{RepositoryError, RepositoryOperation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_lazy_count_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let total = TotalCount::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(9) }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(total.peek(), None);

        let shared = total.clone();
        assert_eq!(total.get().await.unwrap(), 9);
        assert_eq!(shared.get().await.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(shared.peek(), Some(9));
    }

    #[tokio::test]
    async fn test_concurrent_access_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let total = TotalCount::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::task::yield_now().await;
                Ok(4)
            }
        });

        let (a, b) = tokio::join!(total.get(), total.get());
        assert_eq!(a.unwrap(), 4);
        assert_eq!(b.unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_count_is_retried_on_next_access() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let total = TotalCount::lazy(move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(RepositoryError::timeout(RepositoryOperation::Count, "slow"))
                } else {
                    Ok(2)
                }
            }
        });

        assert!(matches!(total.get().await, Err(Error::Repository(_))));
        assert_eq!(total.get().await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled() {
        let total = TotalCount::disabled();
        assert!(total.is_disabled());
        assert!(!total.is_resolved());
        assert!(matches!(total.get().await, Err(Error::TotalCountDisabled)));
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", TotalCount::resolved(5)), "Resolved(5)");
        assert_eq!(format!("{:?}", TotalCount::disabled()), "Disabled");
    }
}
