use crate::actions::Action;
use crate::state::StatusState;
use unistate::{create_reducer, Reducer};

pub fn status_reducer() -> impl Reducer<StatusState, Action> {
    create_reducer(StatusState::default(), reduce_status)
}

fn reduce_status(mut state: StatusState, action: &Action) -> StatusState {
    match action {
        Action::RequestLucky => {
            state.pending_requests += 1;
            state.message = Some("Feeling lucky...".to_string());
        }
        Action::LuckyResult(value) => {
            state.pending_requests = state.pending_requests.saturating_sub(1);
            state.message = Some(format!("Lucky! +{value}"));
        }
        Action::Quit => {
            state.running = false;
        }
        Action::QuitBlocked(reason) => {
            state.message = Some(reason.clone());
        }
        Action::KeyPressed(_) | Action::Left(_) | Action::Right(_) => {}
    }
    state
}
