use crate::dom::tree::{Document, NodeId};

/// Test applied to an element's class attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassMatch {
	/// The whole attribute equals the value, like `[class='x']`.
	Equals(String),

	/// The attribute contains the value as a substring, like `[class*='x']`.
	Contains(String),
}

impl ClassMatch {
	fn matches(&self, class: &str) -> bool {
		match self {
			ClassMatch::Equals(value) => class == value,
			ClassMatch::Contains(value) => class.contains(value.as_str()),
		}
	}
}

/// A compound selector: optional tag plus optional class test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
	pub tag: Option<String>,
	pub class: Option<ClassMatch>,
}

impl Compound {
	/// Match elements with this tag.
	pub fn tag(tag: &str) -> Self {
		Compound {
			tag: Some(tag.to_ascii_lowercase()),
			class: None,
		}
	}

	pub fn class_equals(mut self, value: &str) -> Self {
		self.class = Some(ClassMatch::Equals(value.to_string()));
		self
	}

	pub fn class_contains(mut self, value: &str) -> Self {
		self.class = Some(ClassMatch::Contains(value.to_string()));
		self
	}

	fn matches(&self, doc: &Document, id: NodeId) -> bool {
		let Some(tag) = doc.tag(id) else {
			return false;
		};
		if let Some(ref expected) = self.tag
			&& expected != tag
		{
			return false;
		}
		match (&self.class, doc.class_name(id)) {
			(Some(test), Some(class)) => test.matches(class),
			(Some(_), None) => false,
			(None, _) => true,
		}
	}
}

/// Compound selectors joined by descendant combinators, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
	parts: Vec<Compound>,
}

impl Selector {
	pub fn new(parts: Vec<Compound>) -> Self {
		Selector { parts }
	}

	/// Whether `id` matches the whole chain.
	///
	/// The last compound must match `id`; each earlier compound must match
	/// some ancestor, in order. Ancestors are not limited to any query scope.
	pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
		let Some((last, rest)) = self.parts.split_last() else {
			return false;
		};
		if !last.matches(doc, id) {
			return false;
		}

		// Greedy nearest-ancestor matching is exact for descendant-only chains.
		let mut remaining = rest.iter().rev().peekable();
		let mut ancestor = doc.parent(id);
		while let Some(part) = remaining.peek() {
			let Some(current) = ancestor else {
				return false;
			};
			if part.matches(doc, current) {
				remaining.next();
			}
			ancestor = doc.parent(current);
		}

		true
	}
}

/// All descendants of `scope` matching `selector`, in document order.
pub fn query_selector_all(doc: &Document, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
	doc.descendants(scope)
		.into_iter()
		.filter(|&id| selector.matches(doc, id))
		.collect()
}

/// First descendant of `scope` matching `selector`.
pub fn query_selector(doc: &Document, scope: NodeId, selector: &Selector) -> Option<NodeId> {
	doc.descendants(scope)
		.into_iter()
		.find(|&id| selector.matches(doc, id))
}
