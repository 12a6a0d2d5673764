use std::collections::HashMap;

use crate::{NodeId, NodeSet};

/// One accepted node, with what is needed to replay its acceptance.
#[derive(Clone, Debug)]
struct Entry {
	node: NodeId,
	parent: Option<NodeId>,
	frequency: u64,
	occupied: bool,
	children: usize,
	/// Valid children not accepted yet.
	open_children: usize,
	/// Position of the acceptance that left this node with no members.
	emptied_at: Option<usize>,
	/// Clusters in the selection once this entry was accepted.
	clusters_after: usize,
}

/// Tree nodes chosen as cluster representatives, in the order they were
/// taken from the frontier.
///
/// A split node with no occupant of its own stops being a cluster once every
/// one of its valid children has been accepted as well; it still stays in the
/// selection so that its parent's merge keeps skipping it. `len` counts
/// clusters, not accepted nodes.
#[derive(Clone, Debug, Default)]
pub struct Selection {
	entries: Vec<Entry>,
	positions: HashMap<NodeId, usize>,
	clusters: usize,
}

impl Selection {
	/// Records `node` as taken from the frontier.
	///
	/// `parent` must already be accepted.
	pub(crate) fn accept(
		&mut self,
		node: NodeId,
		parent: Option<NodeId>,
		frequency: u64,
		occupied: bool,
		children: usize
	) {
		let position = self.entries.len();
		self.clusters += 1;
		if let Some(p) = parent.and_then(|p| self.positions.get(&p).copied()) {
			let parent_entry = &mut self.entries[p];
			parent_entry.open_children -= 1;
			if parent_entry.open_children == 0 && !parent_entry.occupied {
				parent_entry.emptied_at = Some(position);
				self.clusters -= 1;
			}
		}
		self.entries.push(Entry {
			node,
			parent,
			frequency,
			occupied,
			children,
			open_children: children,
			emptied_at: None,
			clusters_after: self.clusters,
		});
		self.positions.insert(node, position);
	}

	/// Number of clusters, which is at most the number of accepted nodes.
	pub fn len(&self) -> usize {
		self.clusters
	}

	pub fn is_empty(&self) -> bool {
		self.clusters == 0
	}

	/// Every accepted node, in acceptance order.
	pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.entries.iter().map(|e| e.node)
	}

	/// Recursive frequency of every accepted node when it was accepted.
	pub fn frequencies(&self) -> impl Iterator<Item = u64> + '_ {
		self.entries.iter().map(|e| e.frequency)
	}

	/// Accepted nodes that still have members of their own.
	pub fn clusters(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.entries.iter().filter(|e| e.emptied_at.is_none()).map(|e| e.node)
	}

	/// The selection as it stood when it first reached `clusters` clusters,
	/// or all of it if it never did.
	///
	/// Identical to selecting `clusters` from scratch on the same tree.
	pub fn prefix(&self, clusters: usize) -> Selection {
		let mut prefix = Selection::default();
		if clusters == 0 {
			return prefix;
		}
		let end = self.entries.iter()
			.position(|e| e.clusters_after >= clusters)
			.map_or(self.entries.len(), |p| p + 1);
		for e in self.entries[..end].iter() {
			prefix.accept(e.node, e.parent, e.frequency, e.occupied, e.children);
		}
		prefix
	}

	/// Accepted nodes as a `NodeSet` for a tree of `node_count` nodes.
	pub fn exclusion(&self, node_count: usize) -> NodeSet {
		let mut set = NodeSet::repeat(false, node_count);
		for e in self.entries.iter() {
			set.set(e.node.index(), true);
		}
		set
	}
}
