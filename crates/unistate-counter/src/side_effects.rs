//! Asynchronous reactions of the counter app

use crate::actions::Action;
use crate::state::AppState;
use std::time::Duration;
use unistate_side_effects::{SideEffectScope, SideEffects, SideEffectsMiddleware};

/// Answers every `RequestLucky` with `LuckyResult(step)` after `delay`
pub fn lucky_side_effects(delay: Duration, step: i64) -> SideEffectsMiddleware<AppState, Action> {
    SideEffects::builder()
        .collect_action(
            Action::RequestLucky,
            move |scope: SideEffectScope<AppState, Action>, _action| async move {
                log::debug!("Lucky request started, answering in {:?}", delay);
                tokio::time::sleep(delay).await;
                scope.dispatch(Action::LuckyResult(step));
                Ok(())
            },
        )
        .named("lucky")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::QuitGuardMiddleware;
    use crate::reducers::app_reducer;
    use pretty_assertions::assert_eq;
    use unistate::{Store, TaskScope};

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lucky_result_after_delay() {
        let store = Store::builder(app_reducer(), TaskScope::new())
            .middleware(lucky_side_effects(Duration::from_millis(500), 7))
            .build();

        store.dispatch(Action::RequestLucky);
        settle().await;
        assert_eq!(store.state().status.pending_requests, 1);
        assert_eq!(store.state().left.value, 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;
        let state = store.state();
        assert_eq!(state.status.pending_requests, 0);
        assert_eq!(state.left.value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_allowed_once_lucky_arrived() {
        let store = Store::builder(app_reducer(), TaskScope::new())
            .middleware(QuitGuardMiddleware)
            .middleware(lucky_side_effects(Duration::from_millis(100), 1))
            .build();

        store.dispatch(Action::RequestLucky);
        store.dispatch(Action::Quit);
        settle().await;
        assert!(store.state().status.running);

        tokio::time::sleep(Duration::from_millis(100)).await;
        settle().await;
        store.dispatch(Action::Quit);
        settle().await;
        assert!(!store.state().status.running);
    }
}
