//! Per-channel color statistics over rectangular regions of a grid.

use crate::grid::{Color, PixelGrid, Rect};

/// Mean and population standard deviation of the R, G and B channels
/// of one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionStats {
	pub mean: [f64; 3],
	pub std_dev: [f64; 3],
	/// The mean as 8-bit channels, truncated toward zero.
	pub mean_color: Color,
}

impl RegionStats {
	/// Measures every pixel of `rect` in a single pass.
	///
	/// `rect` must be non-empty and inside the grid; every caller in the
	/// crate has already checked this.
	pub fn measure(grid: &PixelGrid, rect: Rect) -> RegionStats {
		let mut sum = [0u64; 3];
		let mut sq = [0u64; 3];
		for row in rect.y..rect.y + rect.h {
			for px in grid.row_span(rect.x, row, rect.w).chunks_exact(3) {
				for c in 0..3 {
					let v = px[c] as u64;
					sum[c] += v;
					sq[c] += v * v;
				}
			}
		}

		let n = rect.area();
		let mut mean = [0.; 3];
		let mut std_dev = [0.; 3];
		let mut mean_color = [0u8; 3];
		for c in 0..3 {
			mean[c] = sum[c] as f64 / n as f64;
			// Cancellation can push the variance slightly below zero.
			let var = sq[c] as f64 / n as f64 - mean[c] * mean[c];
			std_dev[c] = var.max(0.).sqrt();
			mean_color[c] = (sum[c] / n) as u8;
		}
		RegionStats { mean, std_dev, mean_color: image::Rgb(mean_color) }
	}

	/// The unweighted mean of the three channel deviations; this is the
	/// number compared against the split threshold.
	pub fn score(&self) -> f64 {
		(self.std_dev[0] + self.std_dev[1] + self.std_dev[2]) / 3.
	}
}

/// Per-channel means and population standard deviations of `rect`.
pub fn mean_and_std_dev(grid: &PixelGrid, rect: Rect) -> ([f64; 3], [f64; 3]) {
	let s = RegionStats::measure(grid, rect);
	(s.mean, s.std_dev)
}

/// Mean color of `rect`, each channel truncated toward zero.
pub fn mean_color(grid: &PixelGrid, rect: Rect) -> Color {
	RegionStats::measure(grid, rect).mean_color
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn uniform_region_has_no_spread() {
		let grid = PixelGrid::from_fn(5, 3, |_, _| image::Rgb([10, 200, 33])).unwrap();
		let s = RegionStats::measure(&grid, grid.bounds());
		assert_eq!(s.std_dev, [0.; 3]);
		assert_eq!(s.mean, [10., 200., 33.]);
		assert_eq!(s.mean_color, image::Rgb([10, 200, 33]));
		assert_eq!(s.score(), 0.);
	}

	#[test]
	fn two_valued_region() {
		// Left half 0, right half 100 in red only: std = 50.
		let grid = PixelGrid::from_fn(4, 4, |x, _| {
			image::Rgb([if x < 2 { 0 } else { 100 }, 0, 0])
		}).unwrap();
		let (mean, std_dev) = mean_and_std_dev(&grid, grid.bounds());
		assert!(approx(mean[0], 50.));
		assert!(approx(std_dev[0], 50.));
		assert!(approx(std_dev[1], 0.));
		let s = RegionStats::measure(&grid, grid.bounds());
		assert!(approx(s.score(), 50. / 3.));
	}

	#[test]
	fn sub_rectangle_only() {
		let grid = PixelGrid::from_fn(4, 4, |x, y| {
			if x >= 2 && y >= 2 { image::Rgb([9, 9, 9]) } else { image::Rgb([250, 0, 0]) }
		}).unwrap();
		let s = RegionStats::measure(&grid, Rect::new(2, 2, 2, 2));
		assert_eq!(s.mean_color, image::Rgb([9, 9, 9]));
		assert_eq!(s.score(), 0.);
	}

	#[test]
	fn mean_color_truncates() {
		// Red values 0, 1, 1: mean 0.67 truncates to 0.
		let grid = PixelGrid::from_fn(3, 1, |x, _| {
			image::Rgb([if x == 0 { 0 } else { 1 }, 255, 254 + (x % 2) as u8])
		}).unwrap();
		let c = mean_color(&grid, grid.bounds());
		assert_eq!(c, image::Rgb([0, 255, 254]));
	}
}
