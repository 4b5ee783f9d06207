//! Middleware of the counter app
//!
//! Installed outermost first: logging, keyboard translation, quit guard, then the
//! lucky side effect (see [`crate::side_effects`]).

pub mod keyboard;
pub mod quit_guard;

pub use keyboard::KeyboardMiddleware;
pub use quit_guard::QuitGuardMiddleware;
