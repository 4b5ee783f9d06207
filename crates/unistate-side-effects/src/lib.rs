//! Side effects for unistate stores
//!
//! A side effect observes dispatched actions and reacts with asynchronous work: calling a
//! service, waiting on a timer, reading a file. It never touches the state directly;
//! results come back into the store as new actions.
//!
//! ```rust
//! use std::time::Duration;
//! use unistate::{create_reducer, Store, TaskScope};
//! use unistate_side_effects::{SideEffectScope, SideEffects};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Action {
//!     Request,
//!     Loaded(u32),
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let load = |scope: SideEffectScope<Option<u32>, Action>, _action| async move {
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     scope.dispatch(Action::Loaded(42));
//!     Ok(())
//! };
//! let side_effects = SideEffects::builder()
//!     .collect_action(Action::Request, load)
//!     .build();
//!
//! let reducer = create_reducer(None, |state, action: &Action| match action {
//!     Action::Request => state,
//!     Action::Loaded(value) => Some(*value),
//! });
//! let store = Store::builder(reducer, TaskScope::new())
//!     .middleware(side_effects)
//!     .build();
//!
//! store.dispatch(Action::Request);
//! store.subscribe().wait_for(|state| *state == Some(42)).await.unwrap();
//! # }
//! ```

mod effect;
mod middleware;

pub use effect::{SideEffect, SideEffectScope};
pub use middleware::{SideEffects, SideEffectsBuilder, SideEffectsMiddleware};
