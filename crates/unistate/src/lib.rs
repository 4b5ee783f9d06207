//! Unidirectional state management
//!
//! A [`Store`] owns one immutable state value. Actions are dispatched into a queue and
//! applied strictly one at a time by a single consumer task: each action passes through
//! the middleware chain, then the reducer, and the result replaces the state and is
//! published to every subscriber.
//!
//! ```text
//! dispatch ─→ queue ─→ middleware chain ─→ reducer ─→ state ─→ subscribers
//!    ↑                        │
//!    └──── side effects ←─────┘
//! ```
//!
//! - [`Reducer`]s are pure `(state, action) -> state` functions; [`combine_reducers`]
//!   builds one from several child reducers
//! - [`Middleware`] intercepts actions on their way to the reducer and may rewrite, veto
//!   or follow them up
//! - Long-running work runs on the store's [`TaskScope`] and reports back by dispatching

pub mod combine;
pub mod dispatcher;
pub mod middleware;
pub mod reducer;
pub mod selection;
pub mod store;
pub mod task_scope;

pub use combine::{
    child, child_with_action, combine_reducer_list, combine_reducers, BoxedChild, Child,
    ChildReducer, Children, CombineError, CombinedReducer, MappedChild,
};
pub use dispatcher::Dispatcher;
pub use middleware::{
    compose, middleware_fn, ComposedMiddleware, LoggingMiddleware, Middleware, MiddlewareFn,
    MiddlewareScope,
};
pub use reducer::{create_reducer, Reducer, ReducerFn};
pub use selection::Selection;
pub use store::{StateReceiver, Store, StoreBuilder};
pub use task_scope::{TaskFailure, TaskScope};
