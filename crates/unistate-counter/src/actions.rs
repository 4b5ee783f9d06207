//! Actions of the counter app
//!
//! `Left` and `Right` wrap the same [`CounterAction`]; the combined reducer routes each one
//! to its own counter slice.

use ratatui::crossterm::event::KeyEvent;

/// Root action enum
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Raw key press, translated by the keyboard middleware
    KeyPressed(KeyEvent),

    /// Action for the left counter
    Left(CounterAction),
    /// Action for the right counter
    Right(CounterAction),

    /// Ask for a lucky number; answered asynchronously with `LuckyResult`
    RequestLucky,
    /// A lucky number arrived; added to the left counter
    LuckyResult(i64),

    /// Quit the application
    Quit,
    /// Quit was refused
    QuitBlocked(String),
}

/// Actions understood by a single counter
#[derive(Debug, Clone, PartialEq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Add(i64),
    Reset,
}
