use image::error::ImageError;

use octree_reduce::error::{ReduceError, SizeError};

use std::path::Path;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Message and exit status for an error that ended a run.
fn describe(e: &ReduceError) -> (String, i32) {
	match e {
		ReduceError::Size(SizeError::Empty) => ("No palette sizes given".to_string(), 2),
		ReduceError::Size(e) => (format!("Invalid palette size list: {}", e), 2),
		ReduceError::ZeroDimensions => ("Input image has no pixels".to_string(), 4),
		ReduceError::Image(ImageError::IoError(e)) => (format!("File could not be read or written: {}", e), 3),
		ReduceError::Image(ImageError::Decoding(_)) |
		ReduceError::Image(ImageError::Unsupported(_)) => ("Invalid image data".to_string(), 4),
		ReduceError::Image(ImageError::Limits(_)) => ("Computation limits exceeded".to_string(), 5),
		e => (format!("An error occurred: {}", e), 10),
	}
}

/// `clap`-based CLI for reducing the colors of an image.
///
/// Writes `<STEM>_reduced_<N>.png` and `<STEM>_palette_<N>.png` for every
/// requested palette size `N`.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	let clap_matches = clap::App::new("octree_reduce")
		.version("0.1.0")
		.author("vkcz")
		.about("Reduces the colors of an image to one or more palette sizes using an octree.")
		.arg_from_usage("-o, --output=[STEM] 'Prefix for output files; defaults to INPUT without its extension'")
		.arg_from_usage("-v, --verbose 'Log every merged cluster'")
		.arg_from_usage("<INPUT> 'Path to input image'")
		.arg_from_usage("<SIZES> 'Palette size, or a comma-separated list of sizes'")
		.get_matches();

	let level = if clap_matches.is_present("verbose") { "debug" } else { "info" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

	let input_path = Path::new(clap_matches.value_of("INPUT").unwrap());
	let sizes = match octree_reduce::parse_sizes(clap_matches.value_of("SIZES").unwrap()) {
		Ok(s) => s,
		Err(e) => error_exit(&format!("Invalid palette size list: {}", e), 2)
	};
	let stem = clap_matches.value_of("output")
		.map(Into::into)
		.unwrap_or_else(|| octree_reduce::default_stem(input_path));

	match octree_reduce::reduce_file(input_path, &sizes, &stem) {
		Ok(written) => log::debug!("{} files written", written.len()),
		Err(e) => {
			let (msg, code) = describe(&e);
			error_exit(&msg, code)
		}
	}
}
