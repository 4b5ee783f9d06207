//! Middleware system
//!
//! Middleware wraps the call from dispatch to the reducer, allowing side effects,
//! logging, and other cross-cutting concerns to be handled in a composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch(action) → queue → A → B → C → Reducer
//!                            A ← B ← C ←──┘  → published state
//! ```
//!
//! Each middleware can:
//! - Inspect the action and the state as of the start of this dispatch
//! - Rewrite the action before passing it on with `scope.next(action)`
//! - Rewrite the state returned by the rest of the chain
//! - Skip `next` entirely, vetoing the reducer (its return value becomes the new state)
//! - Dispatch new actions; they are queued behind the current one
//! - Spawn concurrent work on the store's [`TaskScope`]
//!
//! ## Example
//!
//! ```rust
//! use unistate::{Middleware, MiddlewareScope};
//!
//! struct Doubling;
//!
//! impl Middleware<i32, i32> for Doubling {
//!     fn handle(&self, scope: &MiddlewareScope<'_, i32, i32>, action: i32) -> i32 {
//!         scope.next(action * 2)
//!     }
//! }
//! ```

use crate::dispatcher::Dispatcher;
use crate::task_scope::TaskScope;

mod chain;
mod logging;

pub use chain::{compose, ComposedMiddleware};
pub use logging::LoggingMiddleware;

/// Middleware trait - intercepts every action on its way to the reducer
///
/// Middleware runs inside the store's consumer loop, one action at a time. It must not
/// block; slow work goes onto the scope's [`TaskScope`] and reports back via `dispatch`.
pub trait Middleware<S, A>: Send + Sync {
    /// Handle an action and return the next state
    ///
    /// - `scope`: state snapshot, `next`, `dispatch` and the task scope for this pass
    /// - `action`: the action being processed
    fn handle(&self, scope: &MiddlewareScope<'_, S, A>, action: A) -> S;
}

impl<S, A> Middleware<S, A> for Box<dyn Middleware<S, A>> {
    fn handle(&self, scope: &MiddlewareScope<'_, S, A>, action: A) -> S {
        (**self).handle(scope, action)
    }
}

/// Per-dispatch handle given to every middleware
///
/// Lives for exactly one pass through the chain.
pub struct MiddlewareScope<'a, S, A> {
    state: &'a S,
    next: &'a (dyn Fn(A) -> S + 'a),
    dispatcher: &'a Dispatcher<A>,
    tasks: &'a TaskScope,
}

impl<'a, S, A> MiddlewareScope<'a, S, A> {
    /// Create the outermost scope of a pass. `next` is the real reducer invocation.
    pub fn new(
        state: &'a S,
        next: &'a (dyn Fn(A) -> S + 'a),
        dispatcher: &'a Dispatcher<A>,
        tasks: &'a TaskScope,
    ) -> Self {
        Self {
            state,
            next,
            dispatcher,
            tasks,
        }
    }

    /// State of the store when this dispatch started
    pub fn state(&self) -> &S {
        self.state
    }

    /// Run the rest of the chain (eventually the reducer) and return its state
    pub fn next(&self, action: A) -> S {
        (self.next)(action)
    }

    /// Queue a new action behind the one currently being processed
    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        self.dispatcher
    }

    /// Concurrency scope of the store, for spawning reactions
    pub fn task_scope(&self) -> &TaskScope {
        self.tasks
    }

    /// Same scope with `next` rebound to another continuation
    fn with_next<'b>(&'b self, next: &'b (dyn Fn(A) -> S + 'b)) -> MiddlewareScope<'b, S, A> {
        MiddlewareScope {
            state: self.state,
            next,
            dispatcher: self.dispatcher,
            tasks: self.tasks,
        }
    }
}

/// Middleware built from a closure, see [`middleware_fn`]
pub struct MiddlewareFn<F>(F);

/// Create a [`Middleware`] from a closure
///
/// ```rust
/// use unistate::{middleware_fn, MiddlewareScope};
///
/// let clamp = middleware_fn(|scope: &MiddlewareScope<'_, i32, i32>, action: i32| {
///     scope.next(action).min(100)
/// });
/// # let _ = clamp;
/// ```
pub fn middleware_fn<S, A, F>(handle: F) -> MiddlewareFn<F>
where
    F: Fn(&MiddlewareScope<'_, S, A>, A) -> S + Send + Sync,
{
    MiddlewareFn(handle)
}

impl<S, A, F> Middleware<S, A> for MiddlewareFn<F>
where
    F: Fn(&MiddlewareScope<'_, S, A>, A) -> S + Send + Sync,
{
    fn handle(&self, scope: &MiddlewareScope<'_, S, A>, action: A) -> S {
        (self.0)(scope, action)
    }
}
