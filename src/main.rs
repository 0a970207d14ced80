use image::error::ImageError;
use tracing::{error, info, warn};

use quadtree_seg::error::EncodeError;
use quadtree_seg::{logger, PixelGrid, SegmentationParameters, Segmenter};

/// Side of the built-in demo image.
const DEMO_SIZE: u32 = 64;
/// Side of one cell of the built-in demo checkerboard.
const DEMO_CELL: u32 = 8;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	error!("{}", msg);
	std::process::exit(code)
}

/// Parses an optional numeric argument, exiting with status 2 on garbage.
fn numeric_arg<T: std::str::FromStr>(matches: &clap::ArgMatches<'_>, name: &str) -> Option<T> {
	matches.value_of(name).map(|v| match v.parse() {
		Ok(n) => n,
		Err(_) => error_exit(&format!("Non-numeric value for {}", name), 2)
	})
}

fn load_grid(path: &str) -> PixelGrid {
	let img = match image::open(path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) | ImageError::Unsupported(_) => ("Invalid image data", 4),
				ImageError::Limits(_) => ("Computation limits exceeded", 5),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(msg, code)
		}
	}.into_rgb8();
	match PixelGrid::new(img) {
		Ok(g) => g,
		Err(e) => error_exit(&e.to_string(), 4)
	}
}

/// `clap`-based CLI for segmenting an image into a flat-colored quadtree.
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
	let clap_matches = clap::App::new("quadtree_seg")
		.version("0.1.0")
		.author("vkcz")
		.about("Splits an image into a quadtree of flat-colored rectangles by color variance.")
		.arg_from_usage("-l, --leaf=[N] 'Minimum leaf size in pixels; defaults to 1'")
		.arg_from_usage("-s, --stddev=[N] 'Standard deviation threshold below which a region stops splitting; defaults to 8'")
		.arg_from_usage("-L, --leaf-power=[N] 'Minimum leaf size as a power of two, 0 to 8 (overrides --leaf)'")
		.arg_from_usage("-S, --stddev-power=[N] 'Threshold as a power of two, 0 to 6 (overrides --stddev)'")
		.arg_from_usage("-d, --depth=[N] 'Only render this many levels below the root'")
		.arg_from_usage("-g, --grid 'Outline each leaf in the output'")
		.arg_from_usage("--no-fill 'Do not fill leaves; outline them on white instead'")
		.arg_from_usage("[INPUT] 'Path to input image; a checkerboard is used if omitted'")
		.arg_from_usage("[OUTPUT] 'Path to write the rendered quadtree to, as PNG'")
		.get_matches();

	logger::init();

	let (grid, source_bytes) = match clap_matches.value_of("INPUT") {
		Some(path) => {
			let grid = load_grid(path);
			info!("Loaded: {} ({}x{})", path, grid.width(), grid.height());
			(grid, std::fs::metadata(path).ok().map(|m| m.len()))
		},
		None => {
			warn!("No input given, using {}x{} checkerboard", DEMO_SIZE, DEMO_SIZE);
			let grid = PixelGrid::checkerboard(
				DEMO_SIZE,
				DEMO_SIZE,
				DEMO_CELL,
				image::Rgb([220, 220, 220]),
				image::Rgb([40, 40, 40])
			);
			match grid {
				Ok(g) => (g, None),
				Err(e) => error_exit(&e.to_string(), 10)
			}
		}
	};

	let defaults = SegmentationParameters::default();
	let params = match (
		numeric_arg::<u32>(&clap_matches, "leaf-power"),
		numeric_arg::<u32>(&clap_matches, "stddev-power"),
	) {
		(Some(lp), Some(sp)) => SegmentationParameters::from_powers(lp, sp),
		(lp, sp) => {
			let leaf = lp.map(|p| 1 << p.min(quadtree_seg::params::MAX_LEAF_POWER))
				.or_else(|| numeric_arg(&clap_matches, "leaf"))
				.unwrap_or_else(|| defaults.min_leaf_size());
			let sd = sp.map(|p| (1u32 << p.min(quadtree_seg::params::MAX_STD_DEV_POWER)) as f64)
				.or_else(|| numeric_arg(&clap_matches, "stddev"))
				.unwrap_or_else(|| defaults.std_dev_threshold());
			match SegmentationParameters::new(leaf, sd) {
				Ok(p) => p,
				Err(e) => error_exit(&e.to_string(), 2)
			}
		}
	};
	let depth = numeric_arg::<usize>(&clap_matches, "depth");

	let mut segmenter = match Segmenter::new(grid, params) {
		Ok(s) => s,
		// The grid always covers itself, so this only fires on a bug.
		Err(e) => error_exit(&e.to_string(), 10)
	};
	segmenter.set_source_bytes(source_bytes);

	let stats = *segmenter.stats();
	info!("Leaf size: {} px, StdDev threshold: {}", params.min_leaf_size(), params.std_dev_threshold());
	info!("Nodes:  {}", stats.nodes);
	info!("Leaves: {} ({:.0}% of nodes)", stats.leaves, stats.leaf_percent());
	info!("Depth:  {}", stats.max_depth);
	info!("Build:  {:.3} ms", stats.elapsed_ms());

	match segmenter.size_report() {
		Ok(report) => {
			info!("Raw leaf data: {:.2} KB ({} bytes)",
				report.raw_leaf_bytes as f64 / 1024., report.raw_leaf_bytes);
			info!("Quadtree PNG size: {:.2} KB ({} bytes)",
				report.encoded_bytes as f64 / 1024., report.encoded_bytes);
			match report.source_bytes {
				Some(n) => info!("Original file size: {:.2} KB ({} bytes)", n as f64 / 1024., n),
				None => info!("Original file size: (unknown)")
			}
			if let Some(r) = report.ratio() {
				info!("PNG / original: {:.1}%", r * 100.);
			}
		},
		Err(EncodeError::Png(e)) => warn!("Could not measure PNG size: {}", e)
	}

	if let Some(out_path) = clap_matches.value_of("OUTPUT") {
		let tree = segmenter.tree();
		let mut output = if clap_matches.is_present("no-fill") {
			image::RgbImage::from_pixel(tree.width, tree.height, image::Rgb([255, 255, 255]))
		} else {
			match depth {
				Some(d) => tree.rasterize_at_depth(d),
				None => tree.rasterize()
			}
		};
		if clap_matches.is_present("grid") || clap_matches.is_present("no-fill") {
			tree.root.draw_outlines(&mut output, image::Rgb([102, 105, 149]));
		}
		match output.save(out_path) {
			Ok(_) => info!("Saved: {}", out_path),
			Err(_) => error_exit("Could not save output", 3)
		}
	}
}
