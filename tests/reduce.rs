use image::{Rgba, RgbaImage};

use octree_reduce::error::ReduceError;
use octree_reduce::{output_paths, reduce_file};

use std::collections::HashSet;

/// Horizontal bands of a few hues, each with slight noise.
fn banded() -> RgbaImage {
	let hues = [[200u8, 30, 30], [30, 200, 30], [30, 30, 200], [240, 240, 240], [10, 10, 10]];
	RgbaImage::from_fn(40, 50, |x, y| {
		let base = hues[(y / 10) as usize];
		let jitter = ((x * 7 + y * 3) % 5) as u8;
		Rgba([base[0] + jitter, base[1] + jitter, base[2], 255])
	})
}

fn distinct(img: &RgbaImage) -> HashSet<[u8; 4]> {
	img.pixels().map(|p| p.0).collect()
}

#[test]
fn writes_every_size() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("bands.png");
	banded().save(&input).unwrap();
	let stem = dir.path().join("bands");

	let written = reduce_file(&input, &[16, 1, 5], &stem).unwrap();
	assert_eq!(written.len(), 6);

	for &k in [1usize, 5, 16].iter() {
		let (reduced, swatch) = output_paths(&stem, k);
		assert!(written.contains(&reduced) && written.contains(&swatch));

		let reduced = image::open(&reduced).unwrap().into_rgba8();
		assert_eq!(reduced.dimensions(), (40, 50));
		let colors = distinct(&reduced);
		assert!(colors.len() <= k, "{} colors for k = {}", colors.len(), k);
		assert!(colors.iter().all(|c| c[3] == 255));

		let swatch = image::open(&swatch).unwrap().into_rgba8();
		let side = match k { 1 => 4, 5 => 12, _ => 16 };
		assert_eq!(swatch.dimensions(), (side, side));
		// Every palette block shows up in the reduced image.
		for c in 0..k as u32 {
			let cols = side / 4;
			let pix = swatch.get_pixel((c % cols) * 4, (c / cols) * 4);
			assert!(colors.contains(&pix.0), "swatch block {} of {}", c, k);
		}
	}
}

#[test]
fn band_colors_survive_at_five() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("bands.png");
	banded().save(&input).unwrap();
	let stem = dir.path().join("out");
	reduce_file(&input, &[5], &stem).unwrap();

	let (reduced, _) = output_paths(&stem, 5);
	let reduced = image::open(&reduced).unwrap().into_rgba8();
	// Rows in one band are all noise around one hue, so each band should end
	// up close to its hue.
	for band in 0..5u32 {
		let pix = reduced.get_pixel(0, band * 10 + 5).0;
		let orig = banded().get_pixel(0, band * 10 + 5).0;
		for ch in 0..3 {
			assert!((pix[ch] as i32 - orig[ch] as i32).abs() <= 40, "band {}: {:?} vs {:?}", band, pix, orig);
		}
	}
}

#[test]
fn missing_input_is_an_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("nope.png");
	match reduce_file(&input, &[4], &dir.path().join("nope")) {
		Err(ReduceError::Image(image::ImageError::IoError(_))) => (),
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn write_failure_stops_the_run() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("bands.png");
	banded().save(&input).unwrap();
	let stem = dir.path().join("bands");
	let (blocked, _) = output_paths(&stem, 2);
	std::fs::create_dir(&blocked).unwrap();

	match reduce_file(&input, &[3, 1, 2], &stem) {
		Err(ReduceError::Image(image::ImageError::IoError(_))) => (),
		other => panic!("unexpected {:?}", other),
	}
	let (reduced, swatch) = output_paths(&stem, 1);
	assert!(reduced.is_file() && swatch.is_file());
	let (reduced, swatch) = output_paths(&stem, 3);
	assert!(!reduced.exists() && !swatch.exists());
}
