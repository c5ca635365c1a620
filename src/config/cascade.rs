use crate::config::parser::parse_config_file;
use crate::config::types::Config;
use crate::error::{FixerError, Result};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the home directory.
pub const CONFIG_FILE_NAME: &str = ".fixers.toml";

/// Find the config file to use.
///
/// The lookup order is:
/// 1. `start_dir/.fixers.toml`
/// 2. `~/.fixers.toml`
///
/// Returns `None` when neither exists.
pub fn locate_config(start_dir: &Path) -> Result<Option<PathBuf>> {
	let local = start_dir.join(CONFIG_FILE_NAME);
	if local.exists() {
		return Ok(Some(local));
	}

	let user = user_config_path()?;
	if user.exists() {
		tracing::debug!(path = %user.display(), "using user config");
		return Ok(Some(user));
	}

	Ok(None)
}

/// Load the config at `path`, or the located one when `path` is `None`.
///
/// An explicit path must exist. Without one, a missing config yields the
/// defaults: no settings and no rules.
pub fn load_config(path: Option<&Path>, start_dir: &Path) -> Result<(Config, Option<PathBuf>)> {
	let resolved = match path {
		Some(explicit) => {
			if !explicit.exists() {
				return Err(FixerError::ConfigNotFound {
					path: explicit.to_path_buf(),
				});
			}
			Some(explicit.to_path_buf())
		}
		None => locate_config(start_dir)?,
	};

	match resolved {
		Some(found) => Ok((parse_config_file(&found)?, Some(found))),
		None => Ok((Config::default(), None)),
	}
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(FixerError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
