use crate::actions::Action;
use crate::state::AppState;
use unistate::{Middleware, MiddlewareScope};

/// Refuses to quit while lucky requests are still in flight
pub struct QuitGuardMiddleware;

impl Middleware<AppState, Action> for QuitGuardMiddleware {
    fn handle(&self, scope: &MiddlewareScope<'_, AppState, Action>, action: Action) -> AppState {
        let status = &scope.state().status;
        if matches!(action, Action::Quit) && status.is_busy() {
            log::info!(
                "Quit refused, {} lucky request(s) pending",
                status.pending_requests
            );
            scope.dispatch(Action::QuitBlocked(format!(
                "Waiting for {} lucky request(s) before quitting",
                status.pending_requests
            )));
            return scope.state().clone();
        }

        scope.next(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducers::app_reducer;
    use crate::state::StatusState;
    use pretty_assertions::assert_eq;
    use unistate::{Store, TaskScope};

    #[tokio::test]
    async fn test_quit_when_idle() {
        let store = Store::builder(app_reducer(), TaskScope::new())
            .middleware(QuitGuardMiddleware)
            .build();

        store.dispatch(Action::Quit);
        store
            .subscribe()
            .wait_for(|state| !state.status.running)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_quit_vetoed_while_busy() {
        let busy = AppState {
            status: StatusState {
                pending_requests: 1,
                ..StatusState::default()
            },
            ..AppState::default()
        };
        let store = Store::builder(app_reducer(), TaskScope::new())
            .initial_state(busy)
            .middleware(QuitGuardMiddleware)
            .build();

        store.dispatch(Action::Quit);
        let mut state = store.subscribe();
        state
            .wait_for(|state| state.status.message.is_some())
            .await
            .unwrap();

        let state = store.state();
        assert!(state.status.running);
        assert_eq!(
            state.status.message.as_deref(),
            Some("Waiting for 1 lucky request(s) before quitting")
        );
    }
}
