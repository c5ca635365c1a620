//! Routes document changes and settings to fixers.

use crate::config::Settings;
use crate::dom::{Document, NodeId};
use crate::fixers::MutationAwareFixer;

/// Upper bound on delivery rounds per [`FixerDispatcher::deliver`] call.
///
/// Each round drains every queued record. Fixers that respect their own
/// writes settle in one or two rounds; hitting this limit means two fixers
/// keep re-triggering each other.
pub const MAX_DELIVERY_ROUNDS: usize = 32;

/// Owns the registered fixers and feeds them events.
#[derive(Default)]
pub struct FixerDispatcher {
	fixers: Vec<Box<dyn MutationAwareFixer>>,
}

impl FixerDispatcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, fixer: Box<dyn MutationAwareFixer>) {
		tracing::debug!(fixer = fixer.name(), "registered fixer");
		self.fixers.push(fixer);
	}

	pub fn len(&self) -> usize {
		self.fixers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fixers.is_empty()
	}

	/// Hand a new settings snapshot to every fixer.
	pub fn apply_settings(&mut self, doc: &mut Document, settings: &Settings) {
		for fixer in &mut self.fixers {
			fixer.apply_settings(doc, settings);
		}
	}

	/// Pass an inserted subtree to every fixer that is eligible for it.
	pub fn node_added(&mut self, doc: &mut Document, node: NodeId) {
		for fixer in &mut self.fixers {
			if fixer.check_eligibility(node) {
				fixer.on_node_added(doc, node);
			} else {
				tracing::trace!(fixer = fixer.name(), ?node, "fixer not eligible");
			}
		}
	}

	/// Pass a removed subtree to every fixer.
	pub fn node_removed(&mut self, doc: &mut Document, node: NodeId) {
		for fixer in &mut self.fixers {
			fixer.on_node_removed(doc, node);
		}
	}

	/// Deliver queued mutation records until the document is quiet.
	///
	/// Returns the number of batches delivered.
	pub fn deliver(&mut self, doc: &mut Document) -> usize {
		let mut delivered = 0;

		for _ in 0..MAX_DELIVERY_ROUNDS {
			let batches = doc.take_records();
			if batches.is_empty() {
				return delivered;
			}

			for (observer, records) in batches {
				match self.fixers.iter_mut().find(|f| f.owns_observer(observer)) {
					Some(fixer) => {
						fixer.on_mutations(doc, observer, &records);
						delivered += 1;
					}
					None => {
						tracing::trace!(?observer, "no fixer owns observer, dropping batch");
					}
				}
			}
		}

		if doc.take_records().is_empty() {
			return delivered;
		}

		tracing::warn!(
			rounds = MAX_DELIVERY_ROUNDS,
			delivered,
			"mutation delivery did not settle, dropping remaining records"
		);
		delivered
	}
}
