use image::{Rgba, RgbaImage};
use log::info;

use super::error::*;
use super::quantize::palette::Palette;
use super::quantize::Quantizer;
use crate::Color;

/// Width and height of one palette entry in a swatch, in pixels.
pub const SWATCH_BLOCK: u32 = 4;

fn rgb_of(pix: &Rgba<u8>) -> Color {
	image::Rgb([pix.0[0], pix.0[1], pix.0[2]])
}

fn opaque(c: Color) -> Rgba<u8> {
	Rgba([c.0[0], c.0[1], c.0[2], 255])
}

impl Quantizer {
	/// Counts every pixel of `img`. Alpha is ignored.
	///
	/// Images without any pixels are rejected.
	pub fn from_image(img: &RgbaImage) -> Result<Quantizer, ReduceError> {
		if img.width() == 0 || img.height() == 0 {
			return Err(ReduceError::ZeroDimensions);
		}
		let quantizer = Quantizer::from_colors(img.pixels().map(rgb_of));
		info!(
			"read {}x{} pixels containing {} unique colors",
			img.width(),
			img.height(),
			quantizer.distinct_colors()
		);
		Ok(quantizer)
	}

	/// Redraws `img` with the replacements from the last merge.
	///
	/// Output pixels are opaque.
	pub fn remap_image(&self, img: &RgbaImage) -> Result<RgbaImage, MergeError> {
		let mut output = RgbaImage::new(img.width(), img.height());
		for (x, y, pix) in img.enumerate_pixels() {
			output.put_pixel(x, y, opaque(self.replacement(&rgb_of(pix))?));
		}
		Ok(output)
	}
}

/// Blocks per swatch row for `n` colors: the smallest `c` with `c * c >= n`,
/// and at least one.
pub fn swatch_columns(n: usize) -> u32 {
	let mut columns = 1u32;
	while (columns as usize) * (columns as usize) < n {
		columns += 1;
	}
	columns
}

impl Palette {
	/// Draws the palette as a square grid of `SWATCH_BLOCK`-sized blocks,
	/// row-major in palette order.
	///
	/// Unused cells are left transparent black. An empty palette gives a
	/// single empty cell.
	pub fn to_swatch(&self) -> RgbaImage {
		let columns = swatch_columns(self.len());
		let mut swatch = RgbaImage::new(columns * SWATCH_BLOCK, columns * SWATCH_BLOCK);
		for (ind, color) in self.colors().into_iter().enumerate() {
			let ind = ind as u32;
			image::imageops::replace(
				&mut swatch,
				&RgbaImage::from_pixel(SWATCH_BLOCK, SWATCH_BLOCK, opaque(color)),
				(ind % columns) * SWATCH_BLOCK,
				(ind / columns) * SWATCH_BLOCK,
			);
		}
		swatch
	}
}
