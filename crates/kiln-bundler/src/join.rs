//! Batch joins with explicit failure policies.
//!
//! [`settle_tolerant`] is for optional work: failures are logged and dropped.
//! [`settle_strict`] is for work the run depends on: the first failure becomes
//! the batch's error.

use futures::future::{join_all, try_join_all};
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

use crate::error::{Error, Result};

/// Run every task to completion and keep the successes.
///
/// Each failure is logged as a warning tagged with `label`.
pub async fn settle_tolerant<I, F, T, E>(label: &str, tasks: I) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    join_all(tasks)
        .await
        .into_iter()
        .filter_map(|result| match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(task = label, "{err}");
                None
            }
        })
        .collect()
}

/// Run every task on its own tokio task and collect the results in order.
///
/// Returns as soon as any task fails. Tasks still in flight are detached,
/// not aborted: they run to completion on their own.
pub async fn settle_strict<I, F, T>(tasks: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = tasks.into_iter().map(tokio::spawn).collect();

    try_join_all(handles.into_iter().map(|handle| async move {
        handle.await.map_err(|e| Error::Task(e.to_string()))?
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    type Task<T, E> = Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send>>;

    #[tokio::test]
    async fn test_tolerant_keeps_successes() {
        let tasks: Vec<Task<i32, String>> = vec![
            Box::pin(async { Ok::<i32, String>(1) }),
            Box::pin(async { Err::<i32, String>("copy failed".to_string()) }),
            Box::pin(async { Ok::<i32, String>(3) }),
        ];

        let values = settle_tolerant("test", tasks).await;
        assert_eq!(values, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_strict_preserves_order() {
        let tasks = (0..4u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(20 - i * 5)).await;
            Ok::<_, Error>(i)
        });

        let values = settle_strict(tasks).await.unwrap();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_strict_surfaces_failure_without_cancelling_siblings() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let tasks: Vec<Task<(), Error>> = vec![
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<(), Error>(())
            }),
            Box::pin(async { Err::<(), Error>(BuildError::new("renderer", "boom").into()) }),
        ];

        let err = settle_strict(tasks).await.unwrap_err();
        assert!(matches!(err, Error::Build(_)));
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(finished.load(Ordering::SeqCst));
    }
}
