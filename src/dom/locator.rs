use crate::dom::selector::{Compound, Selector, query_selector, query_selector_all};
use crate::dom::tree::{Document, NodeId};

/// Finds the structural landmarks a fixer cares about.
///
/// Fixers never match markup directly; when the host page changes its
/// layout, a new locator version is added instead of touching fixer logic.
pub trait LandmarkLocator {
	/// Markup revision this locator understands.
	fn version(&self) -> u32;

	/// Elements holding a currency amount, in document order, deduplicated.
	fn currency_indicators(&self, doc: &Document, root: NodeId) -> Vec<NodeId>;

	/// The shop panel below `root`, if any.
	fn shop_panel(&self, doc: &Document, root: NodeId) -> Option<NodeId>;

	/// Whether `node` is a shop list item.
	fn is_shop_item(&self, doc: &Document, node: NodeId) -> bool;

	/// The price field inside a shop item.
	fn price_field(&self, doc: &Document, item: NodeId) -> Option<NodeId>;
}

/// Heading text that marks the scrip currency row.
pub const SCRIP_HEADING: &str = "Hinterland Scrip";

/// Locator for the sidebar and shop markup.
#[derive(Debug, Clone)]
pub struct SidebarLocator {
	echoes_indicator: Selector,
	currency_heading: Selector,
	currency_value: Selector,
	shop_panel: Selector,
	price_field: Selector,
}

impl Default for SidebarLocator {
	fn default() -> Self {
		Self::new()
	}
}

impl SidebarLocator {
	pub fn new() -> Self {
		SidebarLocator {
			echoes_indicator: Selector::new(vec![
				Compound::tag("div").class_contains("sidebar"),
				Compound::tag("ul"),
				Compound::tag("li"),
				Compound::tag("div"),
				Compound::tag("div").class_equals("item__value"),
				Compound::tag("div").class_contains("item__price"),
			]),
			currency_heading: Selector::new(vec![Compound::tag("span").class_equals("item__name")]),
			currency_value: Selector::new(vec![Compound::tag("div").class_equals("item__value")]),
			shop_panel: Selector::new(vec![Compound::tag("div").class_contains("shop")]),
			price_field: Selector::new(vec![Compound::tag("div").class_contains("item__price")]),
		}
	}

	fn scrip_indicators(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
		query_selector_all(doc, root, &self.currency_heading)
			.into_iter()
			.filter(|&heading| doc.text_content(heading) == SCRIP_HEADING)
			.filter_map(|heading| doc.parent(heading))
			.filter_map(|row| query_selector(doc, row, &self.currency_value))
			.collect()
	}
}

impl LandmarkLocator for SidebarLocator {
	fn version(&self) -> u32 {
		1
	}

	fn currency_indicators(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
		let mut found: Vec<NodeId> = query_selector(doc, root, &self.echoes_indicator)
			.into_iter()
			.collect();

		for indicator in self.scrip_indicators(doc, root) {
			if !found.contains(&indicator) {
				found.push(indicator);
			}
		}

		found
	}

	fn shop_panel(&self, doc: &Document, root: NodeId) -> Option<NodeId> {
		query_selector(doc, root, &self.shop_panel)
	}

	fn is_shop_item(&self, doc: &Document, node: NodeId) -> bool {
		doc.node_name(node) == "li"
	}

	fn price_field(&self, doc: &Document, item: NodeId) -> Option<NodeId> {
		query_selector(doc, item, &self.price_field)
	}
}
