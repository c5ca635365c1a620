//! Declarative conditions over the game state.
//!
//! This module handles:
//! - The read-only game state snapshot and its file format
//! - Composable state matchers with short-circuit evaluation

pub mod matcher;
pub mod state;

pub use matcher::StateMatcher;
pub use state::{GameState, StoryletPhase, parse_state_file};
