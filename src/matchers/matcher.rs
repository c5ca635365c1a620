use crate::matchers::state::{GameState, StoryletPhase};
use serde::Deserialize;
use std::fmt;

/// Boolean expression over a [`GameState`] snapshot.
///
/// In config files a matcher is written as a single-key table:
///
/// ```toml
/// when = { and = [{ in_area = 3 }, { or = [{ in_storylet = 7 }, { in_setting = 4 }] }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateMatcher {
	/// Both sides match. The right side is skipped when the left fails.
	And(Box<StateMatcher>, Box<StateMatcher>),

	/// Either side matches. The right side is skipped when the left holds.
	Or(Box<StateMatcher>, Box<StateMatcher>),

	/// The current area id equals the value.
	InArea(i64),

	/// The current setting id equals the value.
	InSetting(i64),

	/// The player is inside the storylet with this id.
	InStorylet(i64),
}

impl StateMatcher {
	pub fn and(left: StateMatcher, right: StateMatcher) -> Self {
		StateMatcher::And(Box::new(left), Box::new(right))
	}

	pub fn or(left: StateMatcher, right: StateMatcher) -> Self {
		StateMatcher::Or(Box::new(left), Box::new(right))
	}

	pub fn in_area(area_id: i64) -> Self {
		StateMatcher::InArea(area_id)
	}

	pub fn in_setting(setting_id: i64) -> Self {
		StateMatcher::InSetting(setting_id)
	}

	pub fn in_storylet(storylet_id: i64) -> Self {
		StateMatcher::InStorylet(storylet_id)
	}

	/// Check whether this expression holds for `state`.
	pub fn matches(&self, state: &GameState) -> bool {
		self.evaluate_with(state, &mut |_, _| {})
	}

	/// Evaluate, reporting every node actually evaluated together with its
	/// result. Nodes are reported children-first, so a short-circuited right
	/// operand never appears.
	pub fn evaluate_with<F>(&self, state: &GameState, visit: &mut F) -> bool
	where
		F: FnMut(&StateMatcher, bool),
	{
		let result = match self {
			StateMatcher::And(left, right) => {
				left.evaluate_with(state, visit) && right.evaluate_with(state, visit)
			}
			StateMatcher::Or(left, right) => {
				left.evaluate_with(state, visit) || right.evaluate_with(state, visit)
			}
			StateMatcher::InArea(id) => state.area_id == *id,
			StateMatcher::InSetting(id) => state.setting_id == *id,
			StateMatcher::InStorylet(id) => {
				state.storylet_phase == StoryletPhase::In && state.storylet_id == *id
			}
		};

		visit(self, result);
		result
	}

	/// Render the expression shape, e.g. `And(InArea(3), InStorylet(7))`.
	pub fn describe(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for StateMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StateMatcher::And(left, right) => write!(f, "And({left}, {right})"),
			StateMatcher::Or(left, right) => write!(f, "Or({left}, {right})"),
			StateMatcher::InArea(id) => write!(f, "InArea({id})"),
			StateMatcher::InSetting(id) => write!(f, "InSetting({id})"),
			StateMatcher::InStorylet(id) => write!(f, "InStorylet({id})"),
		}
	}
}
