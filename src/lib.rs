pub mod queue;
pub mod tree;
pub mod vector;

pub use tree::*;

use ::image::RgbaImage;
use log::info;

use tree::error::{ReduceError, SizeError};
use tree::quantize::palette::Palette;
use tree::quantize::Quantizer;

use std::path::{Path, PathBuf};

/// An exact 8-bit RGB color.
pub type Color = ::image::Rgb<u8>;

/// Parses a palette size, or a comma-separated list of them.
///
/// Sizes are returned in the order given.
pub fn parse_sizes(list: &str) -> Result<Vec<usize>, SizeError> {
	if list.trim().is_empty() {
		return Err(SizeError::Empty);
	}
	list.split(',')
		.map(str::trim)
		.map(|s| match s.parse::<i64>() {
			Ok(n) if n > 0 => Ok(n as usize),
			Ok(_) => Err(SizeError::NonPositive(s.to_string())),
			Err(_) => Err(SizeError::NotAnInteger(s.to_string())),
		})
		.collect()
}

/// The result of reducing an image to one palette size.
#[derive(Debug)]
pub struct Reduction {
	/// The palette size that was asked for; `palette` may hold fewer colors.
	pub size: usize,
	pub image: RgbaImage,
	pub swatch: RgbaImage,
	pub palette: Palette,
}

/// Reduces `img` to each of `sizes`, smallest first, handing every result to
/// `sink` as soon as it is ready.
///
/// The selection is made once for the largest size and cut down for the
/// others. Duplicate sizes are only reduced once. The first error from
/// `sink` stops the run.
pub fn reduce<F>(img: &RgbaImage, sizes: &[usize], mut sink: F) -> Result<(), ReduceError>
where
	F: FnMut(Reduction) -> Result<(), ReduceError>,
{
	let mut sizes = sizes.to_vec();
	sizes.sort_unstable();
	sizes.dedup();
	let largest = match (sizes.first(), sizes.last()) {
		(Some(&0), _) => return Err(SizeError::NonPositive("0".to_string()).into()),
		(_, Some(&n)) => n,
		_ => return Err(SizeError::Empty.into()),
	};

	let mut quantizer = Quantizer::from_image(img)?;
	let superset = quantizer.select_top_clusters(largest);
	for size in sizes {
		let palette = quantizer.merge(&superset.prefix(size))?;
		if palette.len() < size {
			info!("only {} colors available for a palette of {}", palette.len(), size);
		}
		info!(
			"reduced to {} colors, mean squared error {:.2}",
			palette.len(),
			palette.mean_squared_error()
		);
		let image = quantizer.remap_image(img)?;
		let swatch = palette.to_swatch();
		sink(Reduction { size, image, swatch, palette })?;
	}
	Ok(())
}

/// Default output prefix: `input` without its extension.
pub fn default_stem(input: &Path) -> PathBuf {
	input.with_extension("")
}

/// Paths of the reduced image and the palette swatch for one size.
pub fn output_paths(stem: &Path, size: usize) -> (PathBuf, PathBuf) {
	let stem = stem.display();
	(
		PathBuf::from(format!("{}_reduced_{}.png", stem, size)),
		PathBuf::from(format!("{}_palette_{}.png", stem, size)),
	)
}

/// Reads the image at `input`, reduces it to every size and writes the
/// results next to `stem`.
///
/// Returns the written paths. Files written before a failure are left in
/// place.
pub fn reduce_file(input: &Path, sizes: &[usize], stem: &Path) -> Result<Vec<PathBuf>, ReduceError> {
	let img = ::image::open(input)?.into_rgba8();
	let mut written = Vec::new();
	reduce(&img, sizes, |reduction| {
		let (reduced, swatch) = output_paths(stem, reduction.size);
		reduction.image.save(&reduced)?;
		info!("wrote {}", reduced.display());
		reduction.swatch.save(&swatch)?;
		info!("wrote {}", swatch.display());
		written.push(reduced);
		written.push(swatch);
		Ok(())
	})?;
	Ok(written)
}
