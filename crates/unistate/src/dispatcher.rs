//! Dispatcher - the non-blocking entry point into a store's action queue
//!
//! Every dispatch, whether it comes from the application, from a middleware or from a
//! side-effect task, ends up as a send on the same unbounded channel that feeds the
//! store's single consumer loop. Actions are therefore applied strictly in arrival order,
//! and a dispatch made while an action is being processed is queued behind it instead of
//! recursing into the chain.
//!
//! The queue is unbounded: a producer outpacing the consumer grows memory without limit.
//! Back-pressure, rate limiting or coalescing belong in a middleware above this layer.

use crate::task_scope::TaskScope;
use std::fmt;
use tokio::sync::mpsc;

/// Cloneable handle for sending actions to a store
pub struct Dispatcher<A> {
    tx: mpsc::UnboundedSender<A>,
    scope: TaskScope,
}

impl<A> Dispatcher<A> {
    /// Create a dispatcher feeding `tx`, bound to the lifetime of `scope`
    pub fn new(tx: mpsc::UnboundedSender<A>, scope: TaskScope) -> Self {
        Self { tx, scope }
    }

    /// Queue an action and return immediately
    ///
    /// Once the store's scope has been torn down (or its loop has died) this is a
    /// silent no-op: the action is dropped.
    pub fn dispatch(&self, action: A) {
        if self.scope.is_cancelled() {
            log::trace!(
                "Dispatcher: scope `{}` is torn down, dropping action",
                self.scope.name()
            );
            return;
        }

        if self.tx.send(action).is_err() {
            log::trace!("Dispatcher: store loop has stopped, dropping action");
        }
    }

    /// Weak handle to the queue that does not keep it open
    pub(crate) fn downgrade(&self) -> mpsc::WeakUnboundedSender<A> {
        self.tx.downgrade()
    }

    /// Whether dispatched actions are still being processed
    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled() || self.tx.is_closed()
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("scope", &self.scope)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
