//! Render pass completion barrier.
//!
//! Component invocations never await. Work that needs to suspend, such as
//! resolving a lazy style reference, is pushed into the pass's
//! [`CompletionBarrier`] as a boxed future and the invocation returns
//! immediately. When the pass finishes, the barrier drives every task
//! concurrently and waits until all of them have settled. Only then are
//! values written by those tasks final.
//!
//! # Failure semantics
//!
//! A failing task does not cancel its siblings: every task runs to completion
//! and all failures are reported together in a [`BarrierError`].

use core::fmt;
use core::future::Future;
use core::pin::Pin;

use futures::future::join_all;

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type produced by background tasks.
pub type TaskError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// A background task registered against a render pass.
pub type PendingTask = BoxFuture<'static, Result<(), TaskError>>;

/// A background task that failed.
#[derive(Debug)]
pub struct TaskFailure {
    /// Label given when the task was registered.
    pub label: String,
    /// The error the task returned.
    pub error: TaskError,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.error)
    }
}

/// Errors returned when a render pass settles with failed tasks.
#[derive(Debug, thiserror::Error)]
#[error("{failed} of {total} render task(s) failed", failed = .failures.len())]
pub struct BarrierError {
    /// Number of tasks that were awaited.
    pub total: usize,
    /// Every failed task, in registration order.
    pub failures: Vec<TaskFailure>,
}

impl BarrierError {
    /// Returns the first failure's error downcast to `E`, if it has that type.
    #[must_use]
    pub fn first_as<E: core::error::Error + 'static>(&self) -> Option<&E> {
        self.failures
            .first()
            .and_then(|failure| failure.error.downcast_ref::<E>())
    }
}

/// Outstanding tasks of one render pass.
#[derive(Default)]
pub struct CompletionBarrier {
    tasks: Vec<(String, PendingTask)>,
}

impl fmt::Debug for CompletionBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionBarrier")
            .field(
                "tasks",
                &self.tasks.iter().map(|(label, _)| label).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CompletionBarrier {
    /// Creates an empty barrier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task. The task is not polled until the barrier settles.
    pub fn push<F>(&mut self, label: impl Into<String>, task: F)
    where
        F: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.tasks.push((label.into(), Box::pin(task)));
    }

    /// Returns the number of outstanding tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if no task is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drives every task to completion.
    ///
    /// Returns the number of settled tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BarrierError`] listing every failed task once all tasks
    /// have settled.
    pub async fn settle(self) -> Result<usize, BarrierError> {
        let total = self.tasks.len();
        let (labels, tasks): (Vec<String>, Vec<PendingTask>) = self.tasks.into_iter().unzip();

        let results = join_all(tasks).await;

        let failures: Vec<TaskFailure> = labels
            .into_iter()
            .zip(results)
            .filter_map(|(label, result)| result.err().map(|error| TaskFailure { label, error }))
            .collect();

        if failures.is_empty() {
            return Ok(total);
        }

        for failure in &failures {
            tracing::warn!(task = %failure.label, error = %failure.error, "render task failed");
        }
        Err(BarrierError { total, failures })
    }
}
