use std::path::PathBuf;

/// Library-level structured errors for the fixers crate.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
///
/// The fixer and matcher core never produce these: a missing landmark or an
/// empty text node is a normal transient state, not a failure. Only loading
/// configuration and game-state files can fail.
#[derive(Debug, thiserror::Error)]
pub enum FixerError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid value for setting `{key}`: expected {expected}")]
	InvalidSetting { key: String, expected: &'static str },

	#[error("Duplicate rule name: {name}")]
	DuplicateRule { name: String },

	#[error("Failed to read game state file: {path}")]
	StateReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse game state file: {path}")]
	StateParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using FixerError.
pub type Result<T> = std::result::Result<T, FixerError>;
