//! Concurrency scope for a store and its reactions
//!
//! A [`TaskScope`] is an explicitly created, explicitly cancelled group of tokio tasks.
//! The store's consumer loop and every side-effect task run inside one. Cancelling the
//! scope stops all of them at their next suspension point; afterwards nothing new can be
//! spawned and dispatching to stores bound to the scope is a no-op.
//!
//! Task failures are never swallowed: an `Err` result or a panic becomes a [`TaskFailure`]
//! that is logged and forwarded to the supervisor attached with [`TaskScope::supervise`].

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

/// A task of a [`TaskScope`] that did not finish cleanly
#[derive(Debug, Error)]
pub enum TaskFailure {
    #[error("task `{task}` failed: {error:#}")]
    Failed { task: String, error: anyhow::Error },

    #[error("task `{task}` panicked: {message}")]
    Panicked { task: String, message: String },
}

impl TaskFailure {
    /// Name the task was spawned with
    pub fn task(&self) -> &str {
        match self {
            TaskFailure::Failed { task, .. } | TaskFailure::Panicked { task, .. } => task,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, TaskFailure::Panicked { .. })
    }
}

/// Whether a failing task takes the whole scope down with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Supervision {
    /// Failure is reported, siblings keep running
    Isolated,
    /// Failure is reported and the scope is cancelled
    Critical,
}

struct Inner {
    name: String,
    handle: Handle,
    cancelled: watch::Sender<bool>,
    supervisor: Mutex<Option<mpsc::UnboundedSender<TaskFailure>>>,
}

/// Cloneable handle to a group of tasks sharing one lifecycle
#[derive(Clone)]
pub struct TaskScope {
    inner: Arc<Inner>,
}

impl TaskScope {
    /// Create a scope on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime, like `tokio::spawn`.
    pub fn new() -> Self {
        Self::named("scope")
    }

    /// Create a named scope on the current tokio runtime; the name shows up in log lines
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_handle(Handle::current(), name)
    }

    /// Create a scope spawning onto the runtime behind `handle`
    pub fn with_handle(handle: Handle, name: impl Into<String>) -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                handle,
                cancelled,
                supervisor: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Spawn a task whose failure is reported but does not affect sibling tasks
    ///
    /// Returns `false` (and drops `task` without running it) if the scope is already
    /// cancelled.
    pub fn spawn<F>(&self, name: impl Into<String>, task: F) -> bool
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.spawn_supervised(name.into(), task, Supervision::Isolated)
    }

    /// Spawn a task whose failure cancels the whole scope
    pub fn spawn_critical<F>(&self, name: impl Into<String>, task: F) -> bool
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.spawn_supervised(name.into(), task, Supervision::Critical)
    }

    fn spawn_supervised<F>(&self, name: String, task: F, supervision: Supervision) -> bool
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        if self.is_cancelled() {
            log::debug!(
                "TaskScope `{}`: cancelled, not spawning task `{}`",
                self.inner.name,
                name
            );
            return false;
        }

        log::trace!("TaskScope `{}`: spawning task `{}`", self.inner.name, name);

        let cancelled = self.inner.cancelled.subscribe();
        let task_handle = self.inner.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = wait_cancelled(cancelled) => Ok(()),
                result = task => result,
            }
        });

        let scope = self.clone();
        self.inner.handle.spawn(async move {
            let failure = match task_handle.await {
                Ok(Ok(())) => None,
                Ok(Err(error)) => Some(TaskFailure::Failed { task: name, error }),
                Err(join_error) if join_error.is_panic() => Some(TaskFailure::Panicked {
                    task: name,
                    message: panic_message(join_error.into_panic()),
                }),
                Err(_) => None,
            };

            if let Some(failure) = failure {
                scope.report(failure);
                if supervision == Supervision::Critical {
                    scope.cancel();
                }
            }
        });

        true
    }

    /// Cancel every task of the scope and refuse new ones
    pub fn cancel(&self) {
        let was_cancelled = self.inner.cancelled.send_replace(true);
        if !was_cancelled {
            log::debug!("TaskScope `{}`: cancelled", self.inner.name);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.borrow()
    }

    /// Resolves once the scope has been cancelled
    pub async fn cancelled(&self) {
        wait_cancelled(self.inner.cancelled.subscribe()).await;
    }

    /// Attach a supervisor receiving every failure of this scope's tasks
    ///
    /// Replaces any previously attached supervisor.
    pub fn supervise(&self) -> mpsc::UnboundedReceiver<TaskFailure> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut supervisor) = self.inner.supervisor.lock() {
            *supervisor = Some(tx);
        }
        rx
    }

    fn report(&self, failure: TaskFailure) {
        log::error!("TaskScope `{}`: {}", self.inner.name, failure);

        let supervisor = match self.inner.supervisor.lock() {
            Ok(supervisor) => supervisor.clone(),
            Err(_) => None,
        };
        if let Some(supervisor) = supervisor {
            if supervisor.send(failure).is_err() {
                log::debug!(
                    "TaskScope `{}`: supervisor went away, failure only logged",
                    self.inner.name
                );
            }
        }
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScope")
            .field("name", &self.inner.name)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

async fn wait_cancelled(mut cancelled: watch::Receiver<bool>) {
    while !*cancelled.borrow_and_update() {
        if cancelled.changed().await.is_err() {
            // sender gone: nobody can cancel any more
            std::future::pending::<()>().await;
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
