use crate::error::{FixerError, Result};
use serde::Deserialize;
use std::path::Path;

/// Where the player is within a storylet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryletPhase {
	#[default]
	Unstarted,
	In,
	Finished,
}

/// Read-only snapshot of the application state that matchers inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GameState {
	#[serde(default)]
	pub area_id: i64,

	#[serde(default)]
	pub setting_id: i64,

	#[serde(default)]
	pub storylet_id: i64,

	#[serde(default)]
	pub storylet_phase: StoryletPhase,
}

/// Load a game state snapshot from a TOML file.
pub fn parse_state_file(path: &Path) -> Result<GameState> {
	let content = std::fs::read_to_string(path).map_err(|source| FixerError::StateReadError {
		path: path.to_path_buf(),
		source,
	})?;

	toml::from_str(&content).map_err(|source| FixerError::StateParseError {
		path: path.to_path_buf(),
		source,
	})
}
