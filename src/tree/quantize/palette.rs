use crate::{Color, NodeId};

/// One merged cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
	/// The selected node the cluster was merged from.
	pub node: NodeId,
	/// Frequency-weighted mean of the members.
	pub color: Color,
	/// Sum of the members' frequencies.
	pub population: u64,
	/// Sum over members of frequency times squared distance to `color`.
	pub squared_error: f64,
}

/// The representative colors produced by one merge, in selection order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
	clusters: Vec<Cluster>,
}

impl Palette {
	pub fn new(clusters: Vec<Cluster>) -> Self {
		Palette { clusters }
	}

	pub fn clusters(&self) -> &[Cluster] {
		&self.clusters
	}

	pub fn colors(&self) -> Vec<Color> {
		self.clusters.iter().map(|c| c.color).collect()
	}

	pub fn len(&self) -> usize {
		self.clusters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clusters.is_empty()
	}

	/// Pixels covered by the palette.
	pub fn population(&self) -> u64 {
		self.clusters.iter().map(|c| c.population).sum()
	}

	/// Mean squared RGB distance between a pixel and its replacement.
	pub fn mean_squared_error(&self) -> f64 {
		match self.population() {
			0 => 0.,
			n => self.clusters.iter().map(|c| c.squared_error).sum::<f64>() / n as f64,
		}
	}
}
