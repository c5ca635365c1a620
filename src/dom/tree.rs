use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle to a node in a [`Document`].
///
/// Handles identify nodes structurally. A detached node keeps its handle and
/// its contents; it can be re-inserted later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Identity of a mutation observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

static NEXT_OBSERVER: AtomicU64 = AtomicU64::new(1);

impl ObserverId {
	/// Allocate a process-unique observer id.
	pub fn next() -> Self {
		ObserverId(NEXT_OBSERVER.fetch_add(1, Ordering::Relaxed))
	}
}

/// What an observation registration listens for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserveOptions {
	/// Insertions and removals of children.
	pub child_list: bool,

	/// Changes to text node data.
	pub character_data: bool,

	/// Extend the registration to all descendants of the target.
	pub subtree: bool,
}

impl ObserveOptions {
	/// Character-data changes anywhere below the target.
	pub const CHARACTER_DATA_SUBTREE: ObserveOptions = ObserveOptions {
		child_list: false,
		character_data: true,
		subtree: true,
	};

	/// Child insertions and removals anywhere below the target.
	pub const CHILD_LIST_SUBTREE: ObserveOptions = ObserveOptions {
		child_list: true,
		character_data: false,
		subtree: true,
	};

	fn accepts(&self, kind: MutationKind) -> bool {
		match kind {
			MutationKind::ChildList => self.child_list,
			MutationKind::CharacterData => self.character_data,
		}
	}
}

/// Kind of a recorded mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
	ChildList,
	CharacterData,
}

/// A single mutation, as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
	pub kind: MutationKind,

	/// The node whose children or data changed.
	pub target: NodeId,

	pub added_nodes: Vec<NodeId>,
	pub removed_nodes: Vec<NodeId>,

	/// Previous data, for character-data mutations.
	pub old_value: Option<String>,
}

#[derive(Debug, Clone)]
enum NodeKind {
	Element { tag: String, class: String },
	Text { data: String },
}

#[derive(Debug, Clone)]
struct Node {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// An arena-backed live document tree with mutation observation.
///
/// Mutations are queued as [`MutationRecord`]s for every observer whose
/// registration covers the mutated node at the moment of mutation, and are
/// handed out in per-observer batches by [`Document::take_records`]. A write
/// made while a target is not observed therefore never produces a record for
/// that target.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<Node>,
	root: NodeId,
	registrations: BTreeMap<(ObserverId, NodeId), ObserveOptions>,
	queues: BTreeMap<ObserverId, Vec<MutationRecord>>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Create a document containing only a `body` root element.
	pub fn new() -> Self {
		let body = Node {
			kind: NodeKind::Element {
				tag: "body".to_string(),
				class: String::new(),
			},
			parent: None,
			children: Vec::new(),
		};

		Document {
			nodes: vec![body],
			root: NodeId(0),
			registrations: BTreeMap::new(),
			queues: BTreeMap::new(),
		}
	}

	/// The root element.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Create a detached element. Tags are stored lowercase.
	pub fn create_element(&mut self, tag: &str, class: &str) -> NodeId {
		self.push_node(NodeKind::Element {
			tag: tag.to_ascii_lowercase(),
			class: class.to_string(),
		})
	}

	/// Create a detached text node.
	pub fn create_text(&mut self, data: &str) -> NodeId {
		self.push_node(NodeKind::Text {
			data: data.to_string(),
		})
	}

	fn push_node(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			kind,
			parent: None,
			children: Vec::new(),
		});
		id
	}

	fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	// ------------------------------------------------------------------
	// Reads
	// ------------------------------------------------------------------

	/// Lowercase tag for elements, `None` for text nodes.
	pub fn tag(&self, id: NodeId) -> Option<&str> {
		match &self.node(id).kind {
			NodeKind::Element { tag, .. } => Some(tag),
			NodeKind::Text { .. } => None,
		}
	}

	/// The node name: the tag for elements, `#text` for text nodes.
	pub fn node_name(&self, id: NodeId) -> &str {
		self.tag(id).unwrap_or("#text")
	}

	/// The raw class attribute of an element.
	pub fn class_name(&self, id: NodeId) -> Option<&str> {
		match &self.node(id).kind {
			NodeKind::Element { class, .. } => Some(class),
			NodeKind::Text { .. } => None,
		}
	}

	pub fn is_text(&self, id: NodeId) -> bool {
		matches!(self.node(id).kind, NodeKind::Text { .. })
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.node(id).parent
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.node(id).children
	}

	/// All descendants of `id` in document order, excluding `id` itself.
	pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
		let mut out = Vec::new();
		let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();

		while let Some(next) = stack.pop() {
			out.push(next);
			stack.extend(self.children(next).iter().rev().copied());
		}

		out
	}

	/// Whether `ancestor` is `node` or one of its ancestors.
	pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(id) = current {
			if id == ancestor {
				return true;
			}
			current = self.parent(id);
		}
		false
	}

	/// Whether the node is attached under the document root.
	pub fn is_connected(&self, id: NodeId) -> bool {
		self.is_inclusive_ancestor(self.root, id)
	}

	/// Concatenated data of all text nodes at or below `id`.
	pub fn text_content(&self, id: NodeId) -> String {
		match &self.node(id).kind {
			NodeKind::Text { data } => data.clone(),
			NodeKind::Element { .. } => self
				.descendants(id)
				.into_iter()
				.filter_map(|d| match &self.node(d).kind {
					NodeKind::Text { data } => Some(data.as_str()),
					NodeKind::Element { .. } => None,
				})
				.collect(),
		}
	}

	// ------------------------------------------------------------------
	// Mutations
	// ------------------------------------------------------------------

	/// Append `child` to `parent`, moving it out of its current parent first.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		if let Some(old_parent) = self.parent(child) {
			self.remove_child(old_parent, child);
		}

		self.node_mut(child).parent = Some(parent);
		self.node_mut(parent).children.push(child);

		self.queue(MutationRecord {
			kind: MutationKind::ChildList,
			target: parent,
			added_nodes: vec![child],
			removed_nodes: Vec::new(),
			old_value: None,
		});
	}

	/// Detach `child` from `parent`. Does nothing if it is not a child.
	pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
		let children = &mut self.node_mut(parent).children;
		let Some(pos) = children.iter().position(|&c| c == child) else {
			return;
		};
		children.remove(pos);
		self.node_mut(child).parent = None;

		self.queue(MutationRecord {
			kind: MutationKind::ChildList,
			target: parent,
			added_nodes: Vec::new(),
			removed_nodes: vec![child],
			old_value: None,
		});
	}

	/// Replace the data of a text node. Does nothing for elements.
	pub fn set_data(&mut self, id: NodeId, data: &str) {
		let old = match &mut self.node_mut(id).kind {
			NodeKind::Text { data: current } => std::mem::replace(current, data.to_string()),
			NodeKind::Element { .. } => return,
		};

		self.queue(MutationRecord {
			kind: MutationKind::CharacterData,
			target: id,
			added_nodes: Vec::new(),
			removed_nodes: Vec::new(),
			old_value: Some(old),
		});
	}

	/// Set the text content of a node.
	///
	/// For a text node this replaces its data. For an element, all children
	/// are replaced by a single new text node (none if `text` is empty) in
	/// one child-list mutation.
	pub fn set_text_content(&mut self, id: NodeId, text: &str) {
		if self.is_text(id) {
			self.set_data(id, text);
			return;
		}

		let removed = std::mem::take(&mut self.node_mut(id).children);
		for &child in &removed {
			self.node_mut(child).parent = None;
		}

		let mut added = Vec::new();
		if !text.is_empty() {
			let text_node = self.create_text(text);
			self.node_mut(text_node).parent = Some(id);
			self.node_mut(id).children.push(text_node);
			added.push(text_node);
		}

		if removed.is_empty() && added.is_empty() {
			return;
		}

		self.queue(MutationRecord {
			kind: MutationKind::ChildList,
			target: id,
			added_nodes: added,
			removed_nodes: removed,
			old_value: None,
		});
	}

	/// Write text into a node's text leaf without restructuring.
	///
	/// A text node, or an element whose only child is a text node, has that
	/// node's data replaced in place (a character-data mutation, as a
	/// rendering library updating its own text would do). Anything else falls
	/// back to [`Document::set_text_content`].
	pub fn write_text(&mut self, id: NodeId, text: &str) {
		let leaf = if self.is_text(id) {
			Some(id)
		} else {
			match self.children(id) {
				[only] if self.is_text(*only) => Some(*only),
				_ => None,
			}
		};

		match leaf {
			Some(leaf) => self.set_data(leaf, text),
			None => self.set_text_content(id, text),
		}
	}

	// ------------------------------------------------------------------
	// Observation
	// ------------------------------------------------------------------

	/// Start observing `target`. Observing the same target again with the
	/// same observer replaces its options.
	pub fn observe(&mut self, observer: ObserverId, target: NodeId, options: ObserveOptions) {
		self.registrations.insert((observer, target), options);
	}

	/// Stop observing a single target, returning the options it had.
	///
	/// Records already queued for the observer are kept.
	pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) -> Option<ObserveOptions> {
		self.registrations.remove(&(observer, target))
	}

	/// Stop observing every target and drop any queued records.
	pub fn disconnect(&mut self, observer: ObserverId) {
		self.registrations.retain(|(obs, _), _| *obs != observer);
		self.queues.remove(&observer);
	}

	pub fn is_observing(&self, observer: ObserverId, target: NodeId) -> bool {
		self.registrations.contains_key(&(observer, target))
	}

	/// Targets currently observed by `observer`.
	pub fn observed_targets(&self, observer: ObserverId) -> Vec<NodeId> {
		self.registrations
			.keys()
			.filter(|(obs, _)| *obs == observer)
			.map(|(_, target)| *target)
			.collect()
	}

	/// Records waiting for `observer`.
	pub fn pending_records(&self, observer: ObserverId) -> usize {
		self.queues.get(&observer).map_or(0, Vec::len)
	}

	/// Drain every queued record, batched per observer.
	pub fn take_records(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
		std::mem::take(&mut self.queues)
			.into_iter()
			.filter(|(_, records)| !records.is_empty())
			.collect()
	}

	fn queue(&mut self, record: MutationRecord) {
		let mut interested: Vec<ObserverId> = Vec::new();

		for (&(observer, target), options) in &self.registrations {
			if interested.last() == Some(&observer) || !options.accepts(record.kind) {
				continue;
			}
			let covered = target == record.target
				|| (options.subtree && self.is_inclusive_ancestor(target, record.target));
			if covered {
				interested.push(observer);
			}
		}

		for observer in interested {
			self.queues
				.entry(observer)
				.or_default()
				.push(record.clone());
		}
	}
}
