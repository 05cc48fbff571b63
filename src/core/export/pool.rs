//! Bounded worker pool for insert tasks
//!
//! Tasks are spawned onto the tokio runtime immediately and then wait for one
//! of `size` slots before doing any work, so at most `size` inserts touch the
//! store at once no matter how many export calls share the pool. Slots are
//! handed out in FIFO order.
//!
//! Every task holds a clone of the pool's drain sender until it finishes.
//! Shutdown drops the pool's own sender and waits for the receiver to report
//! that all clones are gone.

use crate::domain::{Result, SinkError};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Fixed-size pool of execution slots shared by all export calls of one exporter
#[derive(Debug)]
pub struct WorkerPool {
    size: usize,
    slots: Arc<Semaphore>,
    in_flight: Mutex<Option<mpsc::Sender<()>>>,
    drained: tokio::sync::Mutex<mpsc::Receiver<()>>,
}

impl WorkerPool {
    /// Create a pool with `size` slots
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `size` is zero or too large.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > Semaphore::MAX_PERMITS || u32::try_from(size).is_err() {
            return Err(SinkError::Configuration(format!(
                "Worker pool size must be between 1 and {}, got {size}",
                u32::MAX
            )));
        }

        let (tx, rx) = mpsc::channel(1);
        Ok(Self {
            size,
            slots: Arc::new(Semaphore::new(size)),
            in_flight: Mutex::new(Some(tx)),
            drained: tokio::sync::Mutex::new(rx),
        })
    }

    /// Number of slots currently running a task
    pub fn busy(&self) -> usize {
        self.size.saturating_sub(self.slots.available_permits())
    }

    /// True once [`shutdown`](Self::shutdown) has been called
    pub fn is_closed(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    /// Spawn `work` into `tasks`; it runs once a slot is free
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::PoolClosed`] after shutdown.
    pub fn submit<F, T>(&self, tasks: &mut JoinSet<Result<T>>, work: F) -> Result<()>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(SinkError::PoolClosed)?;
        let slots = Arc::clone(&self.slots);

        tasks.spawn(async move {
            let _guard = guard;
            let _slot = slots
                .acquire_owned()
                .await
                .map_err(|_| SinkError::PoolClosed)?;
            work.await
        });

        Ok(())
    }

    /// Stop accepting tasks and wait until every submitted task has finished
    ///
    /// Calling this more than once is harmless; later calls return immediately.
    pub async fn shutdown(&self) -> Result<()> {
        let sender = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let Some(sender) = sender else {
            tracing::debug!("Worker pool already shut down");
            return Ok(());
        };
        drop(sender);

        tracing::debug!(busy = self.busy(), "Waiting for in-flight insert tasks");

        // recv() yields None only once every task-held sender is dropped
        let mut drained = self.drained.lock().await;
        if drained.recv().await.is_some() {
            return Err(SinkError::Export(
                "Worker pool received an unexpected message while draining".to_string(),
            ));
        }

        self.slots.close();
        tracing::info!(size = self.size, "Worker pool shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(SinkError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_size() {
        let pool = WorkerPool::new(3).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for _ in 0..12 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.submit(&mut tasks, async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, SinkError>(())
            })
            .unwrap();
        }

        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_in_flight_tasks() {
        let pool = WorkerPool::new(2).unwrap();
        let finished = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for _ in 0..4 {
            let finished = Arc::clone(&finished);
            pool.submit(&mut tasks, async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, SinkError>(())
            })
            .unwrap();
        }

        pool.shutdown().await.unwrap();
        assert_eq!(finished.load(Ordering::SeqCst), 4);
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_fails() {
        let pool = WorkerPool::new(1).unwrap();
        pool.shutdown().await.unwrap();

        let mut tasks: JoinSet<Result<()>> = JoinSet::new();
        let result = pool.submit(&mut tasks, async { Ok::<_, SinkError>(()) });
        assert!(matches!(result, Err(SinkError::PoolClosed)));
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_second_shutdown_is_noop() {
        let pool = WorkerPool::new(1).unwrap();
        pool.shutdown().await.unwrap();
        pool.shutdown().await.unwrap();
    }
}
