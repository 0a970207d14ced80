use std::time::Instant;

use tracing::debug;

use super::error::BuildError;
use super::{BuildStatistics, Quadtree, QuadtreeNode};
use crate::grid::{PixelGrid, Rect};
use crate::params::SegmentationParameters;
use crate::stats::RegionStats;

impl QuadtreeNode {
	/// Decomposes `rect` of `grid` into a quadtree, adding every node it
	/// creates to `stats`.
	///
	/// A region stops splitting once its width or height is at most the
	/// minimum leaf size, or once the mean of its per-channel standard
	/// deviations is at most the threshold. Otherwise it is split into
	/// quadrants, see `Rect::split`.
	///
	/// `rect` is checked once here; the recursion below it runs unchecked.
	pub fn decompose(
		grid: &PixelGrid,
		rect: Rect,
		params: &SegmentationParameters,
		stats: &mut BuildStatistics
	) -> Result<QuadtreeNode, BuildError> {
		if rect.is_empty() {
			return Err(BuildError::EmptyRegion { rect });
		}
		if !grid.bounds().contains_rect(&rect) {
			return Err(BuildError::OutOfBounds { rect, width: grid.width(), height: grid.height() });
		}
		Ok(QuadtreeNode::grow(grid, rect, params, stats, 0))
	}

	fn grow(
		grid: &PixelGrid,
		rect: Rect,
		params: &SegmentationParameters,
		stats: &mut BuildStatistics,
		depth: usize
	) -> QuadtreeNode {
		stats.nodes += 1;
		stats.max_depth = stats.max_depth.max(depth);

		let region = RegionStats::measure(grid, rect);
		let min_leaf = params.min_leaf_size();
		let quadrants = if rect.w <= min_leaf || rect.h <= min_leaf ||
			region.score() <= params.std_dev_threshold() {
			None
		} else {
			rect.split()
		};

		match quadrants {
			None => {
				stats.leaves += 1;
				QuadtreeNode::leaf(rect, region.mean_color)
			},
			Some([nw, ne, sw, se]) => QuadtreeNode {
				rect,
				color: region.mean_color,
				sections: Some(Box::new([
					QuadtreeNode::grow(grid, nw, params, stats, depth + 1),
					QuadtreeNode::grow(grid, ne, params, stats, depth + 1),
					QuadtreeNode::grow(grid, sw, params, stats, depth + 1),
					QuadtreeNode::grow(grid, se, params, stats, depth + 1),
				])),
			},
		}
	}
}

impl Quadtree {
	/// Decomposes the whole of `grid`.
	pub fn build(grid: &PixelGrid, params: SegmentationParameters) -> Result<Quadtree, BuildError> {
		let mut stats = BuildStatistics::default();
		let start = Instant::now();
		let root = QuadtreeNode::decompose(grid, grid.bounds(), &params, &mut stats)?;
		stats.elapsed = start.elapsed();
		debug!(
			nodes = stats.nodes,
			leaves = stats.leaves,
			depth = stats.max_depth,
			ms = stats.elapsed_ms(),
			"built quadtree for {}x{} grid", grid.width(), grid.height()
		);
		Ok(Quadtree {
			root,
			width: grid.width(),
			height: grid.height(),
			params,
			stats,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn noise(width: u32, height: u32) -> PixelGrid {
		let mut state = 0x2545_f491_4f6c_dd1du64;
		PixelGrid::from_fn(width, height, |_, _| {
			state ^= state << 13;
			state ^= state >> 7;
			state ^= state << 17;
			let b = state.to_le_bytes();
			::image::Rgb([b[0], b[1], b[2]])
		}).unwrap()
	}

	#[test]
	fn rejects_bad_regions() {
		let grid = noise(8, 8);
		let params = SegmentationParameters::default();
		let mut stats = BuildStatistics::default();
		assert!(matches!(
			QuadtreeNode::decompose(&grid, Rect::new(0, 0, 0, 4), &params, &mut stats),
			Err(BuildError::EmptyRegion { .. })
		));
		assert!(matches!(
			QuadtreeNode::decompose(&grid, Rect::new(4, 4, 5, 4), &params, &mut stats),
			Err(BuildError::OutOfBounds { width: 8, height: 8, .. })
		));
		assert_eq!(stats.nodes, 0);
	}

	#[test]
	fn sub_region_decomposition() {
		let grid = noise(16, 16);
		let params = SegmentationParameters::new(2, 0.).unwrap();
		let mut stats = BuildStatistics::default();
		let rect = Rect::new(4, 4, 8, 8);
		let node = QuadtreeNode::decompose(&grid, rect, &params, &mut stats).unwrap();
		assert_eq!(node.rect, rect);
		// 8 -> 4 -> 2: 1 + 4 + 16 nodes.
		assert_eq!(stats.nodes, 21);
		assert_eq!(stats.leaves, 16);
		assert_eq!(stats.max_depth, 2);
		assert!(node.leaves().all(|l| rect.contains_rect(&l.rect)));
	}

	#[test]
	fn statistics_match_tree() {
		let grid = noise(37, 23);
		let tree = Quadtree::build(&grid, SegmentationParameters::new(1, 40.).unwrap()).unwrap();
		assert_eq!(tree.stats.nodes, tree.root.node_count());
		assert_eq!(tree.stats.leaves, tree.root.leaf_count());
		assert_eq!(tree.stats.max_depth, tree.root.depth());
		assert_eq!((tree.width, tree.height), (37, 23));
	}

	#[test]
	fn single_pixel_grid() {
		let grid = noise(1, 1);
		let tree = Quadtree::build(&grid, SegmentationParameters::new(1, 0.).unwrap()).unwrap();
		assert!(tree.root.is_leaf());
		assert_eq!(tree.root.color, grid.get(0, 0));
	}

	#[test]
	fn branch_keeps_region_mean() {
		let grid = PixelGrid::from_fn(4, 4, |x, _| {
			::image::Rgb([if x < 2 { 0 } else { 101 }, 0, 0])
		}).unwrap();
		let tree = Quadtree::build(&grid, SegmentationParameters::new(1, 0.).unwrap()).unwrap();
		assert!(!tree.root.is_leaf());
		assert_eq!(tree.root.color, ::image::Rgb([50, 0, 0]));
	}
}
