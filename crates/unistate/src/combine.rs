//! Reducer composition
//!
//! Turns several child reducers into one parent [`Reducer`]. Every child is wrapped in an
//! adapter ([`child`] or [`child_with_action`]) that knows how to project its slice out of
//! the parent state, and optionally how to translate the parent action into its own action
//! type. The combined reducer calls every child against the *same* parent snapshot and
//! builds the next parent state from their results with a `transform` function.
//!
//! ```rust
//! use unistate::{child, combine_reducers, create_reducer, Reducer};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct State {
//!     clicks: u32,
//!     label: String,
//! }
//!
//! enum Action {
//!     Click,
//!     Rename(String),
//! }
//!
//! let clicks = create_reducer(0, |count, action: &Action| match action {
//!     Action::Click => count + 1,
//!     _ => count,
//! });
//! let label = create_reducer(String::new(), |label, action: &Action| match action {
//!     Action::Rename(name) => name.clone(),
//!     _ => label,
//! });
//!
//! let reducer = combine_reducers(
//!     (
//!         child(clicks, |state: &State| state.clicks),
//!         child(label, |state: &State| state.label.clone()),
//!     ),
//!     |(clicks, label): (u32, String)| State { clicks, label },
//! );
//!
//! let state = reducer.reduce(reducer.initial_state(), &Action::Click);
//! assert_eq!(state, State { clicks: 1, label: String::new() });
//! ```

use crate::reducer::Reducer;
use thiserror::Error;

/// Errors raised while assembling a combined reducer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombineError {
    #[error("cannot combine an empty list of child reducers")]
    NoChildren,
}

/// A reducer adapted for [`combine_reducers`]: computes the next child state from the
/// parent state and the parent action.
///
/// A child never keeps state of its own; everything it needs is derived from the parent
/// snapshot it is handed.
pub trait ChildReducer<P, A>: Send + Sync {
    type State;

    /// Initial state of this child's slice
    fn initial_state(&self) -> Self::State;

    /// Next state of this child's slice
    fn reduce(&self, parent: &P, action: &A) -> Self::State;

    /// Box the adapter so it can live in a list next to differently typed adapters
    fn boxed(self) -> BoxedChild<P, A, Self::State>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Type-erased child adapter used by [`combine_reducer_list`]
pub type BoxedChild<P, A, C> = Box<dyn ChildReducer<P, A, State = C>>;

/// Adapter produced by [`child`]
#[derive(Debug, Clone)]
pub struct Child<R, F> {
    reducer: R,
    project: F,
}

/// Wrap `reducer` as a child of a combined reducer. `project` extracts the child's slice
/// from the parent state.
pub fn child<P, A, C, R, F>(reducer: R, project: F) -> Child<R, F>
where
    R: Reducer<C, A>,
    F: Fn(&P) -> C + Send + Sync,
{
    Child { reducer, project }
}

impl<P, A, C, R, F> ChildReducer<P, A> for Child<R, F>
where
    R: Reducer<C, A>,
    F: Fn(&P) -> C + Send + Sync,
{
    type State = C;

    fn initial_state(&self) -> C {
        self.reducer.initial_state()
    }

    fn reduce(&self, parent: &P, action: &A) -> C {
        let state = (self.project)(parent);
        self.reducer.reduce(state, action)
    }
}

/// Adapter produced by [`child_with_action`]
#[derive(Debug, Clone)]
pub struct MappedChild<R, M, F> {
    reducer: R,
    map_action: M,
    project: F,
}

/// Wrap `reducer` as a child that only sees the parent actions `map_action` translates.
///
/// When `map_action` returns `None` the child reducer is not called and the child keeps
/// its current slice (the projection of the parent state), not its initial state.
pub fn child_with_action<P, PA, C, CA, R, M, F>(
    reducer: R,
    map_action: M,
    project: F,
) -> MappedChild<R, M, F>
where
    R: Reducer<C, CA>,
    M: Fn(&PA) -> Option<CA> + Send + Sync,
    F: Fn(&P) -> C + Send + Sync,
{
    MappedChild {
        reducer,
        map_action,
        project,
    }
}

impl<P, PA, C, CA, R, M, F> ChildReducer<P, PA> for MappedChild<R, M, F>
where
    R: Reducer<C, CA>,
    M: Fn(&PA) -> Option<CA> + Send + Sync,
    F: Fn(&P) -> C + Send + Sync,
{
    type State = C;

    fn initial_state(&self) -> C {
        self.reducer.initial_state()
    }

    fn reduce(&self, parent: &P, action: &PA) -> C {
        let state = (self.project)(parent);
        match (self.map_action)(action) {
            Some(action) => self.reducer.reduce(state, &action),
            None => state,
        }
    }
}

/// A fixed group of child adapters that can be evaluated together.
///
/// Implemented for tuples of two to five [`ChildReducer`]s (each with its own state type)
/// and for lists of [`BoxedChild`]ren sharing one state type.
pub trait Children<P, A>: Send + Sync {
    type States;

    fn initial_states(&self) -> Self::States;

    /// Reduce every child against the same parent snapshot
    fn reduce_all(&self, parent: &P, action: &A) -> Self::States;
}

macro_rules! impl_children_for_tuple {
    ($($child:ident : $idx:tt),+) => {
        impl<P, A, $($child),+> Children<P, A> for ($($child,)+)
        where
            $($child: ChildReducer<P, A>,)+
        {
            type States = ($($child::State,)+);

            fn initial_states(&self) -> Self::States {
                ($(self.$idx.initial_state(),)+)
            }

            fn reduce_all(&self, parent: &P, action: &A) -> Self::States {
                ($(self.$idx.reduce(parent, action),)+)
            }
        }
    };
}

impl_children_for_tuple!(C1: 0, C2: 1);
impl_children_for_tuple!(C1: 0, C2: 1, C3: 2);
impl_children_for_tuple!(C1: 0, C2: 1, C3: 2, C4: 3);
impl_children_for_tuple!(C1: 0, C2: 1, C3: 2, C4: 3, C5: 4);

impl<P, A, C> Children<P, A> for Vec<BoxedChild<P, A, C>> {
    type States = Vec<C>;

    fn initial_states(&self) -> Vec<C> {
        self.iter().map(|child| child.initial_state()).collect()
    }

    fn reduce_all(&self, parent: &P, action: &A) -> Vec<C> {
        self.iter().map(|child| child.reduce(parent, action)).collect()
    }
}

/// Reducer produced by [`combine_reducers`] and [`combine_reducer_list`]
#[derive(Debug, Clone)]
pub struct CombinedReducer<T, F> {
    children: T,
    transform: F,
}

/// Combine a tuple of two to five child adapters into one reducer.
///
/// `transform` receives a tuple with one state per child, in the order the children
/// were given, and builds the parent state from it.
pub fn combine_reducers<P, A, T, F>(children: T, transform: F) -> CombinedReducer<T, F>
where
    T: Children<P, A>,
    F: Fn(T::States) -> P + Send + Sync,
{
    CombinedReducer {
        children,
        transform,
    }
}

/// Combine any number of child adapters sharing one state type.
///
/// Fails with [`CombineError::NoChildren`] for an empty list.
pub fn combine_reducer_list<P, A, C, F>(
    children: Vec<BoxedChild<P, A, C>>,
    transform: F,
) -> Result<CombinedReducer<Vec<BoxedChild<P, A, C>>, F>, CombineError>
where
    F: Fn(Vec<C>) -> P + Send + Sync,
{
    if children.is_empty() {
        return Err(CombineError::NoChildren);
    }

    Ok(CombinedReducer {
        children,
        transform,
    })
}

impl<P, A, T, F> Reducer<P, A> for CombinedReducer<T, F>
where
    T: Children<P, A>,
    F: Fn(T::States) -> P + Send + Sync,
{
    fn initial_state(&self) -> P {
        (self.transform)(self.children.initial_states())
    }

    fn reduce(&self, state: P, action: &A) -> P {
        (self.transform)(self.children.reduce_all(&state, action))
    }
}
