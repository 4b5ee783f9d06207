//! Reducer - pure function that produces new state from current state + action

use std::sync::Arc;

/// A reducer returns the next state, given the current state and an action to handle.
///
/// Reducers must be total and pure. They must not block, suspend or touch anything
/// outside of the state they return; that work belongs in middleware.
///
/// Most reducers are built with [`create_reducer`] instead of implementing this trait by hand.
pub trait Reducer<S, A>: Send + Sync {
    /// State used by a store when no explicit initial state is given
    fn initial_state(&self) -> S;

    /// Returns the next state for `action`
    fn reduce(&self, state: S, action: &A) -> S;
}

/// Reducer built from an initial state and a closure
#[derive(Debug, Clone)]
pub struct ReducerFn<S, F> {
    initial_state: S,
    reduce: F,
}

/// Create a [`Reducer`] from an initial state and a transition closure
///
/// ```rust
/// use unistate::{create_reducer, Reducer};
///
/// enum Action {
///     Increment,
///     Decrement,
/// }
///
/// let counter = create_reducer(0, |count, action: &Action| match action {
///     Action::Increment => count + 1,
///     Action::Decrement => count - 1,
/// });
///
/// assert_eq!(counter.reduce(counter.initial_state(), &Action::Increment), 1);
/// ```
pub fn create_reducer<S, A, F>(initial_state: S, reduce: F) -> ReducerFn<S, F>
where
    S: Clone + Send + Sync,
    F: Fn(S, &A) -> S + Send + Sync,
{
    ReducerFn {
        initial_state,
        reduce,
    }
}

impl<S, A, F> Reducer<S, A> for ReducerFn<S, F>
where
    S: Clone + Send + Sync,
    F: Fn(S, &A) -> S + Send + Sync,
{
    fn initial_state(&self) -> S {
        self.initial_state.clone()
    }

    fn reduce(&self, state: S, action: &A) -> S {
        (self.reduce)(state, action)
    }
}

// Reducers are stateless, so one instance can back several stores or child slots.
impl<S, A, R> Reducer<S, A> for Arc<R>
where
    R: Reducer<S, A> + ?Sized,
{
    fn initial_state(&self) -> S {
        (**self).initial_state()
    }

    fn reduce(&self, state: S, action: &A) -> S {
        (**self).reduce(state, action)
    }
}

impl<S, A> Reducer<S, A> for Box<dyn Reducer<S, A>> {
    fn initial_state(&self) -> S {
        (**self).initial_state()
    }

    fn reduce(&self, state: S, action: &A) -> S {
        (**self).reduce(state, action)
    }
}
