use crate::actions::CounterAction;
use crate::state::CounterState;
use unistate::{create_reducer, Reducer};

pub fn counter_reducer() -> impl Reducer<CounterState, CounterAction> {
    create_reducer(CounterState::default(), reduce_counter)
}

fn reduce_counter(mut state: CounterState, action: &CounterAction) -> CounterState {
    match action {
        CounterAction::Increment => state.value += 1,
        CounterAction::Decrement => state.value -= 1,
        CounterAction::Add(amount) => state.value += amount,
        CounterAction::Reset => state.value = 0,
    }
    state
}
