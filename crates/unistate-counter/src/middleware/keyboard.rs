use crate::actions::{Action, CounterAction};
use crate::state::AppState;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unistate::{Middleware, MiddlewareScope};

/// KeyboardMiddleware - converts raw keyboard events to semantic actions
///
/// Raw key presses are consumed here and never reach the reducer.
pub struct KeyboardMiddleware;

impl Middleware<AppState, Action> for KeyboardMiddleware {
    fn handle(&self, scope: &MiddlewareScope<'_, AppState, Action>, action: Action) -> AppState {
        if let Action::KeyPressed(key) = action {
            for action in translate_key(&key) {
                scope.dispatch(action);
            }
            return scope.state().clone();
        }

        scope.next(action)
    }
}

/// Semantic actions for a key press; empty for unbound keys
pub fn translate_key(key: &KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![Action::Quit],
        KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],

        // Left counter
        KeyCode::Char('a') => vec![Action::Left(CounterAction::Increment)],
        KeyCode::Char('z') => vec![Action::Left(CounterAction::Decrement)],

        // Right counter
        KeyCode::Char('k') | KeyCode::Up => vec![Action::Right(CounterAction::Increment)],
        KeyCode::Char('j') | KeyCode::Down => vec![Action::Right(CounterAction::Decrement)],

        KeyCode::Char('r') => vec![
            Action::Left(CounterAction::Reset),
            Action::Right(CounterAction::Reset),
        ],
        KeyCode::Char(' ') => vec![Action::RequestLucky],

        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducers::app_reducer;
    use pretty_assertions::assert_eq;
    use unistate::{Store, TaskScope};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_translate_key() {
        assert_eq!(translate_key(&key(KeyCode::Char('q'))), vec![Action::Quit]);
        assert_eq!(
            translate_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            vec![Action::Quit]
        );
        assert_eq!(
            translate_key(&key(KeyCode::Up)),
            vec![Action::Right(CounterAction::Increment)]
        );
        assert_eq!(translate_key(&key(KeyCode::Char(' '))), vec![Action::RequestLucky]);
        assert!(translate_key(&key(KeyCode::F(5))).is_empty());
    }

    #[tokio::test]
    async fn test_key_presses_become_actions() {
        let store = Store::builder(app_reducer(), TaskScope::new())
            .middleware(KeyboardMiddleware)
            .build();
        let mut state = store.subscribe();

        store.dispatch(Action::KeyPressed(key(KeyCode::Char('a'))));
        store.dispatch(Action::KeyPressed(key(KeyCode::Char('a'))));
        store.dispatch(Action::KeyPressed(key(KeyCode::Char('j'))));

        state
            .wait_for(|state| state.left.value == 2 && state.right.value == -1)
            .await
            .unwrap();
    }
}
