pub mod palette;
pub mod sample;
pub mod selection;

use std::collections::HashMap;

use bitvec::slice::BitSlice;
use log::debug;

use crate::error::{MergeError, QueueError};
use crate::queue::PriorityQueue;
use crate::vector::Vector3;
use crate::{Color, NodeId, Octree};

use palette::{Cluster, Palette};
use sample::{color_from_vector, ColorRegistry, ColorSample};
use selection::Selection;

/// Subtree frequency sums, valid for one tree during one selection.
#[derive(Debug)]
pub struct FrequencyMemo(Vec<Option<u64>>);

impl FrequencyMemo {
	pub fn new(node_count: usize) -> Self {
		FrequencyMemo(vec![None; node_count])
	}

	fn get(&self, node: NodeId) -> Option<u64> {
		self.0.get(node.index()).copied().flatten()
	}

	fn set(&mut self, node: NodeId, frequency: u64) {
		if let Some(slot) = self.0.get_mut(node.index()) {
			*slot = Some(frequency);
		}
	}
}

/// Reduces a set of observed colors to a small palette.
///
/// Colors are fed in with `observe`; `select_top_clusters` picks the heaviest
/// cells of the octree and `merge` averages each of them into a single
/// representative. After a merge, every observed color has a `replacement`.
#[derive(Clone, Debug, Default)]
pub struct Quantizer {
	tree: Octree<usize>,
	registry: ColorRegistry,
	representatives: Vec<ColorSample>,
}

impl Quantizer {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn from_colors<I: IntoIterator<Item = Color>>(colors: I) -> Self {
		let mut quantizer = Quantizer::new();
		for color in colors {
			quantizer.observe(color);
		}
		quantizer
	}

	/// Counts one pixel of `color`. Only the first sighting of a color
	/// touches the tree.
	pub fn observe(&mut self, color: Color) {
		if let Some(index) = self.registry.observe(color) {
			self.tree.insert_or_update(color, index);
		}
	}

	pub fn tree(&self) -> &Octree<usize> {
		&self.tree
	}

	pub fn registry(&self) -> &ColorRegistry {
		&self.registry
	}

	pub fn distinct_colors(&self) -> usize {
		self.registry.len()
	}

	/// The sample stored in the tree for exactly `color`.
	pub fn sample(&self, color: &Color) -> Option<&ColorSample> {
		self.tree.lookup(color).map(|&i| &self.registry.samples()[i])
	}

	/// Sum of sample frequencies in the subtree under `node`.
	pub fn recursive_frequency(&self, node: NodeId, memo: &mut FrequencyMemo) -> u64 {
		if let Some(frequency) = memo.get(node) {
			return frequency;
		}
		let own = self.tree.node(node).occupant()
			.map_or(0, |o| self.registry.samples()[o.1].frequency);
		let below = self.tree.valid_children(node)
			.into_iter()
			.map(|child| self.recursive_frequency(child, memo))
			.sum::<u64>();
		memo.set(node, own + below);
		own + below
	}

	/// Greedily picks up to `desired` clusters, heaviest first.
	///
	/// Starting from the root, the heaviest node on the frontier is accepted
	/// and its valid children join the frontier. Selection stops once there are
	/// `desired` clusters or the frontier runs dry, which happens when the tree
	/// holds fewer colors than that.
	pub fn select_top_clusters(&self, desired: usize) -> Selection {
		let mut selection = Selection::default();
		let mut memo = FrequencyMemo::new(self.tree.node_count());
		let root = self.tree.root();
		let total = self.recursive_frequency(root, &mut memo);
		if desired == 0 || total == 0 {
			return selection;
		}

		let mut frontier = PriorityQueue::new();
		frontier.push(total, (root, None));
		while selection.len() < desired {
			let (node, parent) = match frontier.pop() {
				Ok(candidate) => candidate,
				Err(QueueError::Empty) => break,
			};
			let children = self.tree.valid_children(node);
			for &child in children.iter() {
				frontier.push(self.recursive_frequency(child, &mut memo), (child, Some(node)));
			}
			selection.accept(
				node,
				parent,
				self.recursive_frequency(node, &mut memo),
				self.tree.node(node).occupant().is_some(),
				children.len()
			);
		}
		debug!("selected {} clusters from {} nodes", selection.len(), selection.nodes().count());
		selection
	}

	/// Averages the subtree under `node` into one new representative color,
	/// skipping descendants set in `excluding`.
	///
	/// The node's own occupant, if any, is counted first. Every member gets
	/// its replacement pointed at the new representative. Fails without
	/// touching any sample if a member was already merged; `merge` starts
	/// from a clean slate.
	pub fn merge_cluster(
		&mut self,
		node: NodeId,
		excluding: &BitSlice
	) -> Result<Cluster, MergeError> {
		let members = self.tree.collect_all(node, excluding);
		let samples = self.registry.samples_mut();

		if let Some(&m) = members.iter().find(|&&m| samples[m].replacement().is_some()) {
			return Err(MergeError::AlreadyMerged(samples[m].color));
		}

		let mut sum = Vector3::default();
		let mut count = 0u64;
		for &m in members.iter() {
			sum.add_in_place(&samples[m].weighted());
			count += samples[m].frequency;
		}
		if count == 0 {
			return Err(MergeError::ZeroOccupancy);
		}

		let color = color_from_vector(&sum.scale(1. / count as f64));
		let target = Vector3::from(color);
		let representative = self.representatives.len();
		let mut squared_error = 0.;
		for &m in members.iter() {
			let sample = &mut samples[m];
			sample.assign_replacement(representative);
			squared_error += sample.vector().squared_distance(&target) * sample.frequency as f64;
		}
		self.representatives.push(ColorSample::with_frequency(color, count));

		Ok(Cluster { node, color, population: count, squared_error })
	}

	/// Merges every cluster of `selection`, replacing the result of any
	/// earlier merge.
	pub fn merge(&mut self, selection: &Selection) -> Result<Palette, MergeError> {
		self.representatives.clear();
		for sample in self.registry.samples_mut() {
			sample.clear_replacement();
		}

		let excluding = selection.exclusion(self.tree.node_count());
		let mut clusters = Vec::with_capacity(selection.len());
		for node in selection.clusters() {
			let cluster = self.merge_cluster(node, &excluding)?;
			debug!(
				"cluster at depth {}: {:?} from {} pixels, squared error {:.1}",
				self.tree.node(node).depth(),
				cluster.color.0,
				cluster.population,
				cluster.squared_error
			);
			clusters.push(cluster);
		}
		Ok(Palette::new(clusters))
	}

	/// The color `color` is drawn as after the last merge.
	pub fn replacement(&self, color: &Color) -> Result<Color, MergeError> {
		self.sample(color)
			.and_then(ColorSample::replacement)
			.map(|r| self.representatives[r].color)
			.ok_or(MergeError::UnknownColor(*color))
	}

	/// Every observed color and its replacement after the last merge.
	pub fn mapping(&self) -> Result<HashMap<Color, Color>, MergeError> {
		self.registry.samples()
			.iter()
			.map(|s| self.replacement(&s.color).map(|r| (s.color, r)))
			.collect()
	}
}
