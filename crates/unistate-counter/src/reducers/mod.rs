//! Reducers
//!
//! The app reducer is combined from one reducer per state slice. Both counters share the
//! same counter reducer; their actions are unwrapped from `Action::Left` / `Action::Right`
//! before it sees them.

mod counter_reducer;
mod status_reducer;

pub use counter_reducer::counter_reducer;
pub use status_reducer::status_reducer;

use crate::actions::{Action, CounterAction};
use crate::state::{AppState, CounterState, StatusState};
use unistate::{child, child_with_action, combine_reducers, Reducer};

/// Reducer for the whole application state
pub fn app_reducer() -> impl Reducer<AppState, Action> {
    combine_reducers(
        (
            child_with_action(counter_reducer(), left_action, |state: &AppState| {
                state.left.clone()
            }),
            child_with_action(counter_reducer(), right_action, |state: &AppState| {
                state.right.clone()
            }),
            child(status_reducer(), |state: &AppState| state.status.clone()),
        ),
        |(left, right, status): (CounterState, CounterState, StatusState)| AppState {
            left,
            right,
            status,
        },
    )
}

fn left_action(action: &Action) -> Option<CounterAction> {
    match action {
        Action::Left(action) => Some(action.clone()),
        Action::LuckyResult(value) => Some(CounterAction::Add(*value)),
        _ => None,
    }
}

fn right_action(action: &Action) -> Option<CounterAction> {
    match action {
        Action::Right(action) => Some(action.clone()),
        _ => None,
    }
}
