//! Mutation-aware fixers.
//!
//! This module handles:
//! - The fixer capability driven by the DOM-change dispatcher
//! - The thousands separator fixer for currency and shop prices

pub mod thousands;

pub use thousands::ThousandSeparatorFixer;

use crate::config::Settings;
use crate::dom::{Document, MutationRecord, NodeId, ObserverId};

/// A fixer that rewrites parts of the live document as they appear.
///
/// The dispatcher calls [`apply_settings`](Self::apply_settings) whenever the
/// settings change and consults [`check_eligibility`](Self::check_eligibility)
/// before handing a new subtree to [`on_node_added`](Self::on_node_added).
pub trait MutationAwareFixer {
	/// Short name for diagnostics.
	fn name(&self) -> &'static str;

	/// A subtree was inserted into the document.
	fn on_node_added(&mut self, doc: &mut Document, node: NodeId);

	/// A subtree was removed from the document.
	fn on_node_removed(&mut self, doc: &mut Document, node: NodeId);

	/// A new settings snapshot arrived.
	fn apply_settings(&mut self, doc: &mut Document, settings: &Settings);

	/// Whether this fixer wants `node` passed to `on_node_added`.
	fn check_eligibility(&self, node: NodeId) -> bool;

	/// Whether `observer` belongs to this fixer.
	fn owns_observer(&self, _observer: ObserverId) -> bool {
		false
	}

	/// A batch of records for one of this fixer's observers.
	fn on_mutations(
		&mut self,
		_doc: &mut Document,
		_observer: ObserverId,
		_records: &[MutationRecord],
	) {
	}
}
