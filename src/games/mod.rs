//! Concrete implementations of [`crate::environment::GameState`].

pub mod scripted;
pub mod toetactic;
