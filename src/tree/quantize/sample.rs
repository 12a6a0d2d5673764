use std::collections::HashMap;

use crate::vector::Vector3;
use crate::Color;

/// One distinct color seen in the source, and how often it was seen.
///
/// After a merge, `replacement` indexes the representative color this
/// sample is drawn as.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorSample {
	pub color: Color,
	pub frequency: u64,
	replacement: Option<usize>,
}

impl ColorSample {
	/// A sample that has been seen once.
	pub fn new(color: Color) -> Self {
		ColorSample::with_frequency(color, 1)
	}

	pub fn with_frequency(color: Color, frequency: u64) -> Self {
		ColorSample { color, frequency, replacement: None }
	}

	pub fn vector(&self) -> Vector3 {
		self.color.into()
	}

	/// The color scaled by its frequency.
	pub fn weighted(&self) -> Vector3 {
		self.vector().scale(self.frequency as f64)
	}

	pub fn replacement(&self) -> Option<usize> {
		self.replacement
	}

	/// Points this sample at a representative.
	pub(crate) fn assign_replacement(&mut self, representative: usize) {
		self.replacement = Some(representative);
	}

	pub(crate) fn clear_replacement(&mut self) {
		self.replacement = None;
	}
}

/// Rounds a mean back onto the 8-bit grid.
pub fn color_from_vector(v: &Vector3) -> Color {
	let channel = |c: f64| c.round().max(0.).min(255.) as u8;
	image::Rgb([channel(v.x), channel(v.y), channel(v.z)])
}

/// Owns every `ColorSample`, keyed by exact color.
#[derive(Clone, Debug, Default)]
pub struct ColorRegistry {
	index: HashMap<Color, usize>,
	samples: Vec<ColorSample>,
}

impl ColorRegistry {
	pub fn new() -> Self {
		Default::default()
	}

	/// Counts one sighting of `color`.
	///
	/// Returns the index of the new sample if this is the first sighting.
	pub fn observe(&mut self, color: Color) -> Option<usize> {
		match self.index.get(&color) {
			Some(&i) => {
				self.samples[i].frequency += 1;
				None
			}
			None => {
				let i = self.samples.len();
				self.samples.push(ColorSample::new(color));
				self.index.insert(color, i);
				Some(i)
			}
		}
	}

	pub fn len(&self) -> usize {
		self.samples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}

	pub fn samples(&self) -> &[ColorSample] {
		&self.samples
	}

	pub(crate) fn samples_mut(&mut self) -> &mut [ColorSample] {
		&mut self.samples
	}

	/// Total sightings over all samples.
	pub fn total_frequency(&self) -> u64 {
		self.samples.iter().map(|s| s.frequency).sum()
	}
}
