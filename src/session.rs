//! Keeps a grid, its parameters and the tree built from them in step.
//!
//! Any change to the grid or the parameters throws the old tree away and
//! grows a new one from the root; there is no incremental update.

use tracing::trace;

use crate::error::{BuildError, EncodeError};
use crate::grid::PixelGrid;
use crate::node::size::SizeReport;
use crate::node::{BuildStatistics, Quadtree};
use crate::params::SegmentationParameters;

#[derive(Debug)]
pub struct Segmenter {
	grid: PixelGrid,
	params: SegmentationParameters,
	tree: Quadtree,
	source_bytes: Option<u64>,
}

impl Segmenter {
	/// Takes ownership of `grid` and builds its first tree.
	pub fn new(grid: PixelGrid, params: SegmentationParameters) -> Result<Self, BuildError> {
		let tree = Quadtree::build(&grid, params)?;
		Ok(Segmenter { grid, params, tree, source_bytes: None })
	}

	/// Replaces the grid and rebuilds. The previous grid and tree are dropped.
	///
	/// The recorded source file size is cleared, as it described the old grid.
	pub fn load(&mut self, grid: PixelGrid) -> Result<(), BuildError> {
		trace!("loading {}x{} grid", grid.width(), grid.height());
		self.tree = Quadtree::build(&grid, self.params)?;
		self.grid = grid;
		self.source_bytes = None;
		Ok(())
	}

	/// Switches to `params`, rebuilding only if they differ from the
	/// current ones. Returns whether a rebuild happened.
	pub fn set_parameters(&mut self, params: SegmentationParameters) -> Result<bool, BuildError> {
		if params == self.params {
			trace!("parameters unchanged, keeping tree");
			return Ok(false);
		}
		self.params = params;
		self.rebuild()?;
		Ok(true)
	}

	/// Discards the current tree and decomposes the grid again.
	pub fn rebuild(&mut self) -> Result<(), BuildError> {
		trace!(params = ?self.params, "rebuilding");
		self.tree = Quadtree::build(&self.grid, self.params)?;
		Ok(())
	}

	/// Records the on-disk size of the file the grid was decoded from.
	pub fn set_source_bytes(&mut self, bytes: Option<u64>) {
		self.source_bytes = bytes;
	}

	pub fn size_report(&self) -> Result<SizeReport, EncodeError> {
		self.tree.size_report(self.source_bytes)
	}

	pub fn grid(&self) -> &PixelGrid {
		&self.grid
	}

	pub fn parameters(&self) -> SegmentationParameters {
		self.params
	}

	pub fn tree(&self) -> &Quadtree {
		&self.tree
	}

	pub fn stats(&self) -> &BuildStatistics {
		&self.tree.stats
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn board() -> PixelGrid {
		PixelGrid::checkerboard(32, 32, 4, image::Rgb([255, 255, 255]), image::Rgb([0, 0, 0])).unwrap()
	}

	#[test]
	fn unchanged_parameters_skip_rebuild() {
		let params = SegmentationParameters::new(4, 0.).unwrap();
		let mut seg = Segmenter::new(board(), params).unwrap();
		assert!(!seg.set_parameters(params).unwrap());
		assert!(seg.set_parameters(SegmentationParameters::new(8, 0.).unwrap()).unwrap());
		assert_eq!(seg.parameters().min_leaf_size(), 8);
		// 32 -> 16 -> 8: 16 leaves.
		assert_eq!(seg.stats().leaves, 16);
	}

	#[test]
	fn load_replaces_grid_and_tree() {
		let mut seg = Segmenter::new(board(), SegmentationParameters::new(1, 0.).unwrap()).unwrap();
		seg.set_source_bytes(Some(1234));
		assert_eq!(seg.stats().leaves, 64);
		let flat = PixelGrid::from_fn(10, 6, |_, _| image::Rgb([1, 2, 3])).unwrap();
		seg.load(flat).unwrap();
		assert_eq!(seg.grid().width(), 10);
		assert_eq!(seg.stats().nodes, 1);
		assert_eq!(seg.tree().root.color, image::Rgb([1, 2, 3]));
		assert_eq!(seg.size_report().unwrap().source_bytes, None);
	}

	#[test]
	fn size_report_carries_source_size() {
		let mut seg = Segmenter::new(board(), SegmentationParameters::new(4, 0.).unwrap()).unwrap();
		seg.set_source_bytes(Some(4096));
		let report = seg.size_report().unwrap();
		assert_eq!(report.source_bytes, Some(4096));
		assert_eq!(report.raw_leaf_bytes, 64 * 19);
		assert!(report.encoded_bytes > 0);
	}
}
