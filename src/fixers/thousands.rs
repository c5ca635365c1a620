use crate::config::{ADD_THOUSANDS_SEPARATOR, Settings};
use crate::dom::{
	Document, LandmarkLocator, MutationKind, MutationRecord, NodeId, ObserveOptions, ObserverId,
	SidebarLocator,
};
use crate::fixers::MutationAwareFixer;
use crate::numbers::number_with_commas;
use std::collections::BTreeSet;

/// Regions observed while the fixer is enabled.
#[derive(Debug, Default)]
struct Observations {
	/// Currency indicators watched for character-data changes.
	currency_regions: BTreeSet<NodeId>,

	/// Shop panels watched for new list items.
	shop_panels: BTreeSet<NodeId>,
}

#[derive(Debug, Default)]
enum FixerState {
	#[default]
	Disabled,
	Enabled(Observations),
}

/// Groups currency amounts and shop prices with thousands separators.
///
/// Currency indicators are formatted when they appear and again whenever
/// their text changes. Each rewrite happens with observation of that
/// indicator stopped, so the fixer never sees its own writes. Shop items are
/// formatted once when inserted into an observed shop panel; items already
/// present when the panel is found are left as they are.
#[derive(Debug)]
pub struct ThousandSeparatorFixer<L = SidebarLocator> {
	locator: L,
	state: FixerState,
	currency_observer: ObserverId,
	shop_observer: ObserverId,
	rewrites: usize,
}

impl Default for ThousandSeparatorFixer<SidebarLocator> {
	fn default() -> Self {
		Self::new()
	}
}

impl ThousandSeparatorFixer<SidebarLocator> {
	pub fn new() -> Self {
		Self::with_locator(SidebarLocator::new())
	}
}

impl<L: LandmarkLocator> ThousandSeparatorFixer<L> {
	/// Create a disabled fixer using `locator` to find landmarks.
	pub fn with_locator(locator: L) -> Self {
		ThousandSeparatorFixer {
			locator,
			state: FixerState::Disabled,
			currency_observer: ObserverId::next(),
			shop_observer: ObserverId::next(),
			rewrites: 0,
		}
	}

	pub fn is_enabled(&self) -> bool {
		matches!(self.state, FixerState::Enabled(_))
	}

	/// Number of text writes performed so far.
	pub fn rewrites(&self) -> usize {
		self.rewrites
	}

	pub fn currency_observer(&self) -> ObserverId {
		self.currency_observer
	}

	pub fn shop_observer(&self) -> ObserverId {
		self.shop_observer
	}

	/// Currency indicators currently tracked.
	pub fn currency_regions(&self) -> Vec<NodeId> {
		match &self.state {
			FixerState::Enabled(obs) => obs.currency_regions.iter().copied().collect(),
			FixerState::Disabled => Vec::new(),
		}
	}

	/// Shop panels currently tracked.
	pub fn shop_panels(&self) -> Vec<NodeId> {
		match &self.state {
			FixerState::Enabled(obs) => obs.shop_panels.iter().copied().collect(),
			FixerState::Disabled => Vec::new(),
		}
	}

	/// Format the text at `target` in place. Empty text is left alone.
	fn rewrite(&mut self, doc: &mut Document, target: NodeId) {
		let amount = doc.text_content(target);
		if amount.is_empty() {
			tracing::trace!(node = ?target, "empty amount, nothing to format");
			return;
		}

		let formatted = number_with_commas(&amount);
		doc.write_text(target, &formatted);
		self.rewrites += 1;
		tracing::debug!(node = ?target, from = %amount, to = %formatted, "rewrote amount");
	}

	/// Rewrite `target` with the currency observer detached from `region`.
	///
	/// The order is stop, mutate, resume: the write happens while the region
	/// has no registration, so it cannot queue a record for this observer.
	fn rewrite_unobserved(&mut self, doc: &mut Document, region: NodeId, target: NodeId) {
		let options = doc
			.unobserve(self.currency_observer, region)
			.unwrap_or(ObserveOptions::CHARACTER_DATA_SUBTREE);
		self.rewrite(doc, target);
		doc.observe(self.currency_observer, region, options);
	}

	fn on_currency_changed(&mut self, doc: &mut Document, records: &[MutationRecord]) {
		let regions = self.currency_regions();

		for record in records {
			let Some(region) = regions
				.iter()
				.copied()
				.find(|&region| doc.is_inclusive_ancestor(region, record.target))
			else {
				tracing::trace!(node = ?record.target, "change outside tracked regions");
				continue;
			};

			self.rewrite_unobserved(doc, region, record.target);
		}
	}

	fn on_shop_changed(&mut self, doc: &mut Document, records: &[MutationRecord]) {
		for record in records {
			if record.kind != MutationKind::ChildList {
				continue;
			}

			for &added in &record.added_nodes {
				if !self.locator.is_shop_item(doc, added) {
					continue;
				}
				if let Some(price) = self.locator.price_field(doc, added) {
					self.rewrite(doc, price);
				}
			}
		}
	}
}

impl<L: LandmarkLocator> MutationAwareFixer for ThousandSeparatorFixer<L> {
	fn name(&self) -> &'static str {
		"thousands-separator"
	}

	fn on_node_added(&mut self, doc: &mut Document, node: NodeId) {
		if !self.is_enabled() {
			tracing::trace!(?node, "disabled, ignoring added node");
			return;
		}

		for indicator in self.locator.currency_indicators(doc, node) {
			self.rewrite_unobserved(doc, indicator, indicator);
			if let FixerState::Enabled(obs) = &mut self.state
				&& obs.currency_regions.insert(indicator)
			{
				tracing::debug!(
					?indicator,
					locator = self.locator.version(),
					"observing currency indicator"
				);
			}
		}

		if let Some(panel) = self.locator.shop_panel(doc, node) {
			doc.observe(self.shop_observer, panel, ObserveOptions::CHILD_LIST_SUBTREE);
			if let FixerState::Enabled(obs) = &mut self.state
				&& obs.shop_panels.insert(panel)
			{
				tracing::debug!(?panel, "observing shop panel");
			}
		}
	}

	fn on_node_removed(&mut self, _doc: &mut Document, _node: NodeId) {
		// Registrations on detached nodes go quiet on their own.
	}

	fn apply_settings(&mut self, doc: &mut Document, settings: &Settings) {
		let enable = settings.flag(ADD_THOUSANDS_SEPARATOR);

		match (self.is_enabled(), enable) {
			(false, true) => {
				self.state = FixerState::Enabled(Observations::default());
				tracing::debug!("thousands separator enabled");
			}
			(true, false) => {
				doc.disconnect(self.shop_observer);
				doc.disconnect(self.currency_observer);
				self.state = FixerState::Disabled;
				tracing::debug!("thousands separator disabled, observation torn down");
			}
			_ => {}
		}
	}

	fn check_eligibility(&self, _node: NodeId) -> bool {
		self.is_enabled()
	}

	fn owns_observer(&self, observer: ObserverId) -> bool {
		observer == self.currency_observer || observer == self.shop_observer
	}

	fn on_mutations(
		&mut self,
		doc: &mut Document,
		observer: ObserverId,
		records: &[MutationRecord],
	) {
		if !self.is_enabled() {
			return;
		}

		if observer == self.currency_observer {
			self.on_currency_changed(doc, records);
		} else if observer == self.shop_observer {
			self.on_shop_changed(doc, records);
		}
	}
}
