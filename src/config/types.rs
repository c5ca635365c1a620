use crate::error::FixerError;
use crate::matchers::{GameState, StateMatcher};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Setting key that enables the thousands separator fixer.
pub const ADD_THOUSANDS_SEPARATOR: &str = "add_thousands_separator";

/// Recognised setting keys and the value type each must have.
const KNOWN_SETTINGS: &[(&str, &str)] = &[(ADD_THOUSANDS_SEPARATOR, "boolean")];

/// Snapshot of feature toggles, delivered wholesale on every change.
///
/// Consumers read the keys they recognise and ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, toml::Value>);

impl Settings {
	/// Build a snapshot from key/value pairs.
	pub fn from_pairs<I, K>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, toml::Value)>,
		K: Into<String>,
	{
		Settings(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	pub fn get(&self, key: &str) -> Option<&toml::Value> {
		self.0.get(key)
	}

	/// Read a boolean toggle. Missing or non-boolean values read as `false`.
	pub fn flag(&self, key: &str) -> bool {
		self.get(key).and_then(toml::Value::as_bool).unwrap_or(false)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &toml::Value)> {
		self.0.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Check that recognised keys carry the expected value type.
	pub fn validate(&self) -> Result<(), FixerError> {
		for (key, expected) in KNOWN_SETTINGS {
			if let Some(value) = self.get(key)
				&& !value.is_bool()
			{
				return Err(FixerError::InvalidSetting {
					key: key.to_string(),
					expected: *expected,
				});
			}
		}
		Ok(())
	}
}

/// Top-level configuration from a `.fixers.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Feature toggles handed to fixers.
	#[serde(default)]
	pub settings: Settings,

	/// Named conditions deciding when an augmentation should run.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A named augmentation rule gated by a state matcher.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Unique name, used in diagnostics.
	pub name: String,

	/// Condition under which the rule is active.
	pub when: StateMatcher,
}

impl Rule {
	/// Whether this rule should run for the given state.
	pub fn is_active(&self, state: &GameState) -> bool {
		let active = self.when.matches(state);
		tracing::trace!(rule = %self.name, matcher = %self.when, active, "evaluated rule");
		active
	}
}

impl Config {
	/// Validate settings and rule names.
	pub fn validate(&self) -> Result<(), FixerError> {
		self.settings.validate()?;

		let mut seen = HashSet::new();
		for rule in &self.rules {
			if !seen.insert(rule.name.as_str()) {
				return Err(FixerError::DuplicateRule {
					name: rule.name.clone(),
				});
			}
		}

		Ok(())
	}

	/// Rules whose matcher holds for `state`, in declaration order.
	pub fn active_rules<'a>(&'a self, state: &GameState) -> Vec<&'a Rule> {
		self.rules.iter().filter(|rule| rule.is_active(state)).collect()
	}
}
