pub mod error;
pub mod image;
pub mod quantize;

use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;

use crate::vector::Vector3;
use crate::Color;

/// Center of the root cell on every axis.
pub const ROOT_CENTER: f64 = 128.;
/// Half-width of the root cell, so that it covers `0..=255` on every axis.
pub const ROOT_SIZE: f64 = 128.;

/// A set of nodes of one `Octree`, indexed by `NodeId::index`.
pub type NodeSet = BitVec;

/// Handle to a node inside the `Octree` that created it.
///
/// Handles are only meaningful for the tree they came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	pub fn index(self) -> usize {
		self.0
	}
}

/// Cell of an octree over the RGB cube.
///
/// A node is empty, holds exactly one key (occupied), or has been split into
/// eight children; never occupied and split at once.
#[derive(Clone, Debug)]
pub struct OctreeNode<V> {
	pub position: Vector3,
	pub size: f64,
	depth: u8,
	occupant: Option<(Color, V)>,
	children: Option<[NodeId; 8]>,
}

impl<V> OctreeNode<V> {
	fn new(position: Vector3, size: f64, depth: u8) -> Self {
		OctreeNode { position, size, depth, occupant: None, children: None }
	}

	pub fn depth(&self) -> u8 {
		self.depth
	}

	pub fn occupant(&self) -> Option<&(Color, V)> {
		self.occupant.as_ref()
	}

	pub fn children(&self) -> Option<&[NodeId; 8]> {
		self.children.as_ref()
	}

	pub fn is_empty(&self) -> bool {
		self.occupant.is_none() && self.children.is_none()
	}

	pub fn is_split(&self) -> bool {
		self.children.is_some()
	}

	/// Index of the child cell containing `key`: bit 0 is set on the upper
	/// red half, bit 1 on the upper green half, bit 2 on the upper blue half.
	///
	/// A coordinate equal to the center belongs to the upper half, so each
	/// child covers exactly half of its parent's integer range. Keep the
	/// comparison inclusive: with a strict `>` neighbours such as 0 and 1 only
	/// separate at depth 9, past the eight levels an 8-bit channel needs.
	pub fn octant(&self, key: &Color) -> usize {
		let mut region = 0;
		if key.0[0] as f64 >= self.position.x {
			region |= 1;
		}
		if key.0[1] as f64 >= self.position.y {
			region |= 2;
		}
		if key.0[2] as f64 >= self.position.z {
			region |= 4;
		}
		region
	}
}

/// Adaptive octree keyed by exact RGB colors.
///
/// Cells are only split when a second, different key has to be stored in
/// them. The first key to reach a cell stays there until the split, at
/// which point it moves down into its octant.
///
/// Nodes live in one arena and are never removed.
#[derive(Clone, Debug)]
pub struct Octree<V> {
	nodes: Vec<OctreeNode<V>>,
}

impl<V: Copy> Default for Octree<V> {
	fn default() -> Self {
		let center = Vector3::new(ROOT_CENTER, ROOT_CENTER, ROOT_CENTER);
		Octree { nodes: vec![OctreeNode::new(center, ROOT_SIZE, 0)] }
	}
}

/// What `insert_or_update` does at the node it is currently looking at.
enum Step {
	Descend(NodeId),
	Store,
	Split,
}

impl<V: Copy> Octree<V> {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	pub fn node(&self, id: NodeId) -> &OctreeNode<V> {
		&self.nodes[id.0]
	}

	/// Number of nodes allocated so far, including empty ones.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// An empty `NodeSet` large enough for every node of this tree.
	pub fn node_set(&self) -> NodeSet {
		BitVec::repeat(false, self.nodes.len())
	}

	/// Depth of the deepest node; the root is at depth 0.
	pub fn max_depth(&self) -> u8 {
		self.nodes.iter().map(OctreeNode::depth).max().unwrap_or(0)
	}

	/// Stores `value` under `key`, replacing the value if `key` is already
	/// present.
	pub fn insert_or_update(&mut self, key: Color, value: V) {
		let mut id = self.root();
		loop {
			let step = {
				let node = &self.nodes[id.0];
				match (&node.children, &node.occupant) {
					(Some(children), _) => Step::Descend(children[node.octant(&key)]),
					(None, Some((k, _))) if *k != key => Step::Split,
					(None, _) => Step::Store,
				}
			};
			match step {
				Step::Descend(child) => id = child,
				Step::Store => {
					self.nodes[id.0].occupant = Some((key, value));
					return;
				}
				// The next iteration descends into the new children.
				Step::Split => self.split(id),
			}
		}
	}

	fn split(&mut self, id: NodeId) {
		let parent = &mut self.nodes[id.0];
		let evicted = parent.occupant.take();
		let (center, half, depth) = (parent.position, parent.size / 2., parent.depth + 1);

		let first = self.nodes.len();
		for octant in 0..8 {
			let offset = |bit: usize| if octant & bit != 0 { half } else { -half };
			let position = center.add(&Vector3::new(offset(1), offset(2), offset(4)));
			self.nodes.push(OctreeNode::new(position, half, depth));
		}
		let mut children = [NodeId(0); 8];
		for (octant, child) in children.iter_mut().enumerate() {
			*child = NodeId(first + octant);
		}

		let parent = &mut self.nodes[id.0];
		parent.children = Some(children);
		if let Some((key, value)) = evicted {
			let target = children[parent.octant(&key)];
			self.nodes[target.0].occupant = Some((key, value));
		}
	}

	/// Finds the value stored under exactly `key`.
	pub fn lookup(&self, key: &Color) -> Option<&V> {
		let mut node = &self.nodes[self.root().0];
		loop {
			if let Some((k, v)) = &node.occupant {
				if k == key {
					return Some(v);
				}
			}
			match &node.children {
				Some(children) => node = &self.nodes[children[node.octant(key)].0],
				None => return None,
			}
		}
	}

	pub fn contains(&self, key: &Color) -> bool {
		self.lookup(key).is_some()
	}

	/// Every value in the subtree under `start`, depth first.
	///
	/// Descendants whose bit is set in `excluding` are skipped along with
	/// their whole subtree. `start` itself is always visited.
	pub fn collect_all(&self, start: NodeId, excluding: &BitSlice) -> Vec<V> {
		let mut values = Vec::new();
		self.collect_into(start, excluding, &mut values);
		values
	}

	fn collect_into(&self, id: NodeId, excluding: &BitSlice, values: &mut Vec<V>) {
		let node = &self.nodes[id.0];
		if let Some((_, v)) = &node.occupant {
			values.push(*v);
		}
		if let Some(children) = &node.children {
			for child in children.iter() {
				if !excluding.get(child.0).map_or(false, |bit| *bit) {
					self.collect_into(*child, excluding, values);
				}
			}
		}
	}

	/// Children of `id` that are occupied or split.
	pub fn valid_children(&self, id: NodeId) -> Vec<NodeId> {
		match &self.nodes[id.0].children {
			Some(children) => children.iter()
				.copied()
				.filter(|c| !self.nodes[c.0].is_empty())
				.collect(),
			None => Vec::new(),
		}
	}

	pub fn keys(&self) -> Vec<Color> {
		self.nodes.iter()
			.filter_map(|n| n.occupant.as_ref().map(|o| o.0))
			.collect()
	}

	pub fn values(&self) -> Vec<V> {
		self.collect_all(self.root(), BitSlice::empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rgb(r: u8, g: u8, b: u8) -> Color {
		::image::Rgb([r, g, b])
	}

	#[test]
	fn first_key_occupies_root() {
		let mut tree = Octree::new();
		tree.insert_or_update(rgb(10, 20, 30), 1);
		let root = tree.node(tree.root());
		assert_eq!(root.occupant(), Some(&(rgb(10, 20, 30), 1)));
		assert!(!root.is_split());
		assert_eq!(tree.node_count(), 1);
	}

	#[test]
	fn collision_evicts_into_children() {
		let mut tree = Octree::new();
		tree.insert_or_update(rgb(0, 0, 0), 'a');
		tree.insert_or_update(rgb(255, 255, 255), 'b');
		let root = tree.node(tree.root());
		assert!(root.is_split());
		assert!(root.occupant().is_none());
		let children = *root.children().unwrap();
		assert_eq!(tree.node(children[0]).occupant(), Some(&(rgb(0, 0, 0), 'a')));
		assert_eq!(tree.node(children[7]).occupant(), Some(&(rgb(255, 255, 255), 'b')));
		assert_eq!(tree.valid_children(tree.root()), vec![children[0], children[7]]);
	}

	#[test]
	fn children_partition_parent() {
		let mut tree = Octree::new();
		tree.insert_or_update(rgb(0, 0, 0), ());
		tree.insert_or_update(rgb(200, 0, 0), ());
		let children = *tree.node(tree.root()).children().unwrap();
		for (octant, id) in children.iter().enumerate() {
			let child = tree.node(*id);
			assert_eq!(child.size, 64.);
			assert_eq!(child.depth(), 1);
			let expect = |bit| if octant & bit != 0 { 192. } else { 64. };
			assert_eq!(child.position, Vector3::new(expect(1), expect(2), expect(4)));
		}
	}

	#[test]
	fn update_replaces_value() {
		let mut tree = Octree::new();
		tree.insert_or_update(rgb(1, 2, 3), 5);
		tree.insert_or_update(rgb(9, 9, 9), 6);
		tree.insert_or_update(rgb(1, 2, 3), 7);
		assert_eq!(tree.lookup(&rgb(1, 2, 3)), Some(&7));
		assert_eq!(tree.lookup(&rgb(9, 9, 9)), Some(&6));
		assert_eq!(tree.values().len(), 2);
	}

	#[test]
	fn every_inserted_key_is_found() {
		let mut tree = Octree::new();
		let mut keys = Vec::new();
		for i in 0..600u32 {
			// A spread of colors, some very close together
			let k = rgb((i * 37 % 256) as u8, (i * 101 % 256) as u8, (i / 3 % 256) as u8);
			if !keys.contains(&k) {
				keys.push(k);
			}
		}
		for (n, k) in keys.iter().enumerate() {
			tree.insert_or_update(*k, n);
		}
		for (n, k) in keys.iter().enumerate() {
			assert_eq!(tree.lookup(k), Some(&n), "{:?}", k);
		}
		assert_eq!(tree.keys().len(), keys.len());
		for k in [rgb(255, 254, 253), rgb(1, 1, 1), rgb(128, 128, 128)].iter() {
			if !keys.contains(k) {
				assert!(!tree.contains(k));
			}
		}
	}

	#[test]
	fn lookup_on_empty_tree() {
		let tree: Octree<u8> = Octree::new();
		assert_eq!(tree.lookup(&rgb(0, 0, 0)), None);
		assert!(tree.node(tree.root()).is_empty());
		assert!(tree.values().is_empty());
	}

	#[test]
	fn depth_is_bounded_by_eight() {
		let pairs = [
			(rgb(0, 0, 0), rgb(1, 0, 0)),
			(rgb(255, 255, 255), rgb(254, 255, 255)),
			(rgb(127, 128, 128), rgb(128, 128, 128)),
			(rgb(63, 64, 200), rgb(64, 64, 200)),
		];
		for (a, b) in pairs.iter() {
			let mut tree = Octree::new();
			tree.insert_or_update(*a, 0);
			tree.insert_or_update(*b, 1);
			assert!(tree.max_depth() <= 8, "{:?} {:?} -> {}", a, b, tree.max_depth());
			assert_eq!(tree.lookup(a), Some(&0));
			assert_eq!(tree.lookup(b), Some(&1));
		}

		// Neighbours on the lowest and highest edge need the full depth.
		let mut tree = Octree::new();
		tree.insert_or_update(rgb(0, 0, 0), 0);
		tree.insert_or_update(rgb(1, 0, 0), 1);
		assert_eq!(tree.max_depth(), 8);

		let mut tree = Octree::new();
		for r in 0..=255u8 {
			for g in (0..=255u8).step_by(51) {
				tree.insert_or_update(rgb(r, g, r / 2), ());
			}
		}
		assert!(tree.max_depth() <= 8);
	}

	#[test]
	fn never_occupied_and_split() {
		let mut tree = Octree::new();
		for i in 0..200u32 {
			tree.insert_or_update(rgb((i * 7) as u8, (i * 13) as u8, (i * 29) as u8), i);
		}
		for i in 0..tree.node_count() {
			let node = tree.node(NodeId(i));
			assert!(!(node.occupant().is_some() && node.is_split()));
		}
	}

	#[test]
	fn collect_all_honours_exclusions_below_start() {
		let mut tree = Octree::new();
		tree.insert_or_update(rgb(0, 0, 0), 'k');
		tree.insert_or_update(rgb(255, 255, 255), 'w');
		tree.insert_or_update(rgb(255, 0, 0), 'r');
		let root = tree.root();
		let children = *tree.node(root).children().unwrap();

		let mut excluding = tree.node_set();
		assert_eq!(tree.collect_all(root, &excluding), vec!['k', 'r', 'w']);

		excluding.set(children[7].index(), true);
		assert_eq!(tree.collect_all(root, &excluding), vec!['k', 'r']);

		// The starting node is reported even when it is in the set itself.
		excluding.set(root.index(), true);
		assert_eq!(tree.collect_all(root, &excluding), vec!['k', 'r']);
		assert_eq!(tree.collect_all(children[7], &excluding), vec!['w']);
	}
}
