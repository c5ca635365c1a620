use storylet_fixers::config::{ADD_THOUSANDS_SEPARATOR, Settings};
use storylet_fixers::dispatcher::FixerDispatcher;
use storylet_fixers::dom::{Document, NodeId};
use storylet_fixers::fixers::{MutationAwareFixer, ThousandSeparatorFixer};

fn settings(enabled: bool) -> Settings {
	Settings::from_pairs([(ADD_THOUSANDS_SEPARATOR, toml::Value::from(enabled))])
}

fn el(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
	let id = doc.create_element(tag, class);
	doc.append_child(parent, id);
	id
}

fn text(doc: &mut Document, parent: NodeId, data: &str) -> NodeId {
	let id = doc.create_text(data);
	doc.append_child(parent, id);
	id
}

/// Sidebar with an echoes indicator. Returns (sidebar, indicator, text).
fn sidebar(doc: &mut Document, amount: &str) -> (NodeId, NodeId, NodeId) {
	let root = doc.root();
	let sidebar = el(doc, root, "div", "col sidebar");
	let ul = el(doc, sidebar, "ul", "items");
	let li = el(doc, ul, "li", "");
	let item = el(doc, li, "div", "item");
	let value = el(doc, item, "div", "item__value");
	let price = el(doc, value, "div", "item__price");
	let amount = text(doc, price, amount);
	(sidebar, price, amount)
}

/// Shop panel with one list. Returns (panel, list).
fn shop(doc: &mut Document) -> (NodeId, NodeId) {
	let root = doc.root();
	let panel = el(doc, root, "div", "shop");
	let list = el(doc, panel, "ul", "shop__items");
	(panel, list)
}

/// Detached shop item holding a price. Returns (item, price field).
fn shop_item(doc: &mut Document, amount: &str) -> (NodeId, NodeId) {
	let item = doc.create_element("li", "shop__item");
	let name = el(doc, item, "span", "item__name");
	text(doc, name, "Bottle of Greyfields 1882");
	let price = el(doc, item, "div", "item__price");
	text(doc, price, amount);
	(item, price)
}

fn enabled_fixer(doc: &mut Document) -> ThousandSeparatorFixer {
	let mut fixer = ThousandSeparatorFixer::new();
	fixer.apply_settings(doc, &settings(true));
	fixer
}

/// Deliver every queued batch to `fixer` until the document is quiet.
fn pump(doc: &mut Document, fixer: &mut ThousandSeparatorFixer) -> usize {
	let mut batches = 0;
	loop {
		let queued = doc.take_records();
		if queued.is_empty() {
			return batches;
		}
		for (observer, records) in queued {
			assert!(fixer.owns_observer(observer));
			fixer.on_mutations(doc, observer, &records);
			batches += 1;
		}
	}
}

// ============================================================================
// Currency indicator
// ============================================================================

#[test]
fn test_indicator_formatted_when_added() {
	let mut doc = Document::new();
	let (sidebar, indicator, _) = sidebar(&mut doc, "1234567");
	let mut fixer = enabled_fixer(&mut doc);

	fixer.on_node_added(&mut doc, sidebar);

	assert_eq!(doc.text_content(indicator), "1,234,567");
	assert_eq!(fixer.rewrites(), 1);
	assert!(doc.is_observing(fixer.currency_observer(), indicator));
	assert_eq!(fixer.currency_regions(), vec![indicator]);
}

#[test]
fn test_added_root_may_be_an_ancestor() {
	let mut doc = Document::new();
	let (_, indicator, _) = sidebar(&mut doc, "1000.00");
	let mut fixer = enabled_fixer(&mut doc);

	let root = doc.root();
	fixer.on_node_added(&mut doc, root);

	assert_eq!(doc.text_content(indicator), "1,000");
}

#[test]
fn test_external_changes_rewritten_exactly_once_each() {
	let mut doc = Document::new();
	let (sidebar, indicator, amount) = sidebar(&mut doc, "100");
	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);
	let after_add = fixer.rewrites();

	let changes = ["1500", "25000", "999", "1234567", "7000000"];
	for change in changes {
		doc.set_data(amount, change);
		let batches = pump(&mut doc, &mut fixer);

		assert_eq!(batches, 1, "the rewrite must not notify the fixer again");
		assert!(doc.is_observing(fixer.currency_observer(), indicator));
	}

	assert_eq!(fixer.rewrites() - after_add, changes.len());
	assert_eq!(doc.text_content(indicator), "7,000,000");
}

#[test]
fn test_rewrite_keeps_host_text_node() {
	let mut doc = Document::new();
	let (sidebar, indicator, amount) = sidebar(&mut doc, "5000");
	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);

	assert_eq!(doc.children(indicator), &[amount]);
	assert_eq!(doc.text_content(amount), "5,000");
}

#[test]
fn test_batched_changes_all_rewritten() {
	let mut doc = Document::new();
	let (sidebar, indicator, amount) = sidebar(&mut doc, "1");
	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);
	let after_add = fixer.rewrites();

	doc.set_data(amount, "2000");
	doc.set_data(amount, "30000");
	let batches = pump(&mut doc, &mut fixer);

	assert_eq!(batches, 1);
	assert_eq!(fixer.rewrites() - after_add, 2);
	assert_eq!(doc.text_content(indicator), "30,000");
}

#[test]
fn test_empty_amount_is_skipped() {
	let mut doc = Document::new();
	let (sidebar, indicator, amount) = sidebar(&mut doc, "10");
	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);
	let after_add = fixer.rewrites();

	doc.set_data(amount, "");
	pump(&mut doc, &mut fixer);

	assert_eq!(fixer.rewrites(), after_add);
	assert_eq!(doc.text_content(indicator), "");
	assert!(doc.is_observing(fixer.currency_observer(), indicator));
}

#[test]
fn test_suspending_one_indicator_leaves_others_observed() {
	let mut doc = Document::new();
	let (sidebar, echoes, echoes_text) = sidebar(&mut doc, "1000");

	let row = el(&mut doc, sidebar, "div", "item");
	let heading = el(&mut doc, row, "span", "item__name");
	text(&mut doc, heading, "Hinterland Scrip");
	let scrip = el(&mut doc, row, "div", "item__value");
	let scrip_text = text(&mut doc, scrip, "25000");

	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);
	assert_eq!(doc.text_content(scrip), "25,000");
	assert_eq!(fixer.currency_regions().len(), 2);

	doc.set_data(echoes_text, "2000");
	pump(&mut doc, &mut fixer);
	assert!(doc.is_observing(fixer.currency_observer(), scrip));

	doc.set_data(scrip_text, "30000");
	pump(&mut doc, &mut fixer);
	assert_eq!(doc.text_content(echoes), "2,000");
	assert_eq!(doc.text_content(scrip), "30,000");
}

#[test]
fn test_removed_node_is_a_no_op() {
	let mut doc = Document::new();
	let (sidebar, indicator, _) = sidebar(&mut doc, "1234");
	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);

	let root = doc.root();
	doc.remove_child(root, sidebar);
	fixer.on_node_removed(&mut doc, sidebar);

	assert!(fixer.is_enabled());
	assert_eq!(fixer.currency_regions(), vec![indicator]);
}

#[test]
fn test_no_landmarks_no_observation() {
	let mut doc = Document::new();
	let root = doc.root();
	let story = el(&mut doc, root, "div", "storylet");
	text(&mut doc, story, "You have 1234 echoes");

	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, root);

	assert_eq!(fixer.rewrites(), 0);
	assert!(doc.observed_targets(fixer.currency_observer()).is_empty());
	assert!(doc.observed_targets(fixer.shop_observer()).is_empty());
	assert_eq!(doc.text_content(story), "You have 1234 echoes");
}

// ============================================================================
// Shop panel
// ============================================================================

#[test]
fn test_new_shop_items_formatted_once() {
	let mut doc = Document::new();
	let (_, list) = shop(&mut doc);
	let mut fixer = enabled_fixer(&mut doc);
	let root = doc.root();
	fixer.on_node_added(&mut doc, root);

	let (item, price) = shop_item(&mut doc, "12500");
	doc.append_child(list, item);
	pump(&mut doc, &mut fixer);

	assert_eq!(doc.text_content(price), "12,500");
	assert_eq!(fixer.rewrites(), 1);
}

#[test]
fn test_existing_shop_items_left_alone() {
	let mut doc = Document::new();
	let (_, list) = shop(&mut doc);
	let (item, price) = shop_item(&mut doc, "12500");
	doc.append_child(list, item);

	let mut fixer = enabled_fixer(&mut doc);
	let root = doc.root();
	fixer.on_node_added(&mut doc, root);
	pump(&mut doc, &mut fixer);

	assert_eq!(doc.text_content(price), "12500");
}

#[test]
fn test_non_item_insertions_ignored() {
	let mut doc = Document::new();
	let (panel, _) = shop(&mut doc);
	let mut fixer = enabled_fixer(&mut doc);
	let root = doc.root();
	fixer.on_node_added(&mut doc, root);

	let banner = doc.create_element("div", "shop__banner");
	let price = el(&mut doc, banner, "div", "item__price");
	text(&mut doc, price, "5000");
	doc.append_child(panel, banner);
	pump(&mut doc, &mut fixer);

	assert_eq!(doc.text_content(price), "5000");
}

#[test]
fn test_shop_item_removal_ignored() {
	let mut doc = Document::new();
	let (_, list) = shop(&mut doc);
	let mut fixer = enabled_fixer(&mut doc);
	let root = doc.root();
	fixer.on_node_added(&mut doc, root);

	let (item, _) = shop_item(&mut doc, "12500");
	doc.append_child(list, item);
	pump(&mut doc, &mut fixer);
	let after_insert = fixer.rewrites();

	doc.remove_child(list, item);
	pump(&mut doc, &mut fixer);
	assert_eq!(fixer.rewrites(), after_insert);
}

// ============================================================================
// Eligibility
// ============================================================================

#[test]
fn test_disabled_fixer_starts_no_observation() {
	let mut doc = Document::new();
	let (sidebar, indicator, _) = sidebar(&mut doc, "1234");
	shop(&mut doc);

	let mut fixer = ThousandSeparatorFixer::new();
	fixer.apply_settings(&mut doc, &settings(false));
	fixer.on_node_added(&mut doc, sidebar);
	let root = doc.root();
	fixer.on_node_added(&mut doc, root);

	assert_eq!(doc.text_content(indicator), "1234");
	assert!(doc.observed_targets(fixer.currency_observer()).is_empty());
	assert!(doc.observed_targets(fixer.shop_observer()).is_empty());
}

#[test]
fn test_disabling_stops_all_rewrites() {
	let mut doc = Document::new();
	let (sidebar, indicator, amount) = sidebar(&mut doc, "1234");
	let (_, list) = shop(&mut doc);
	let mut fixer = enabled_fixer(&mut doc);
	let root = doc.root();
	fixer.on_node_added(&mut doc, root);
	assert!(!fixer.currency_regions().is_empty());
	assert!(!fixer.shop_panels().is_empty());

	// A change queued before disabling must not be applied either.
	doc.set_data(amount, "9999");
	fixer.apply_settings(&mut doc, &settings(false));
	let rewrites = fixer.rewrites();

	doc.set_data(amount, "5555");
	let (item, price) = shop_item(&mut doc, "7777");
	doc.append_child(list, item);
	pump(&mut doc, &mut fixer);

	assert!(!fixer.check_eligibility(sidebar));
	assert_eq!(fixer.rewrites(), rewrites);
	assert_eq!(doc.text_content(indicator), "5555");
	assert_eq!(doc.text_content(price), "7777");
	assert!(doc.observed_targets(fixer.currency_observer()).is_empty());
	assert!(doc.observed_targets(fixer.shop_observer()).is_empty());
}

#[test]
fn test_reenabling_requires_rediscovery() {
	let mut doc = Document::new();
	let (sidebar, indicator, amount) = sidebar(&mut doc, "1234");
	let mut fixer = enabled_fixer(&mut doc);
	fixer.on_node_added(&mut doc, sidebar);

	fixer.apply_settings(&mut doc, &settings(false));
	fixer.apply_settings(&mut doc, &settings(true));

	doc.set_data(amount, "4321");
	pump(&mut doc, &mut fixer);
	assert_eq!(doc.text_content(indicator), "4321");

	fixer.on_node_added(&mut doc, sidebar);
	assert_eq!(doc.text_content(indicator), "4,321");
	assert!(doc.is_observing(fixer.currency_observer(), indicator));
}

// ============================================================================
// Dispatcher
// ============================================================================

#[test]
fn test_dispatcher_end_to_end() {
	let mut doc = Document::new();
	let mut dispatcher = FixerDispatcher::new();
	dispatcher.register(Box::new(ThousandSeparatorFixer::new()));
	dispatcher.apply_settings(&mut doc, &settings(true));

	let (sidebar, indicator, amount) = sidebar(&mut doc, "48000");
	dispatcher.node_added(&mut doc, sidebar);
	assert_eq!(doc.text_content(indicator), "48,000");

	doc.set_data(amount, "1250000");
	assert_eq!(dispatcher.deliver(&mut doc), 1);
	assert_eq!(doc.text_content(indicator), "1,250,000");

	dispatcher.apply_settings(&mut doc, &Settings::default());
	doc.set_data(amount, "1250001");
	assert_eq!(dispatcher.deliver(&mut doc), 0);
	assert_eq!(doc.text_content(indicator), "1250001");
}

#[test]
fn test_dispatcher_skips_ineligible_fixers() {
	let mut doc = Document::new();
	let mut dispatcher = FixerDispatcher::new();
	dispatcher.register(Box::new(ThousandSeparatorFixer::new()));

	let (sidebar, indicator, _) = sidebar(&mut doc, "48000");
	dispatcher.node_added(&mut doc, sidebar);
	dispatcher.deliver(&mut doc);

	assert_eq!(doc.text_content(indicator), "48000");
}
