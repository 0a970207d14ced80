use thiserror::Error;

use crate::grid::Rect;

/// Reason why a pixel buffer couldn't be turned into a `PixelGrid`.
#[derive(Debug, Error)]
pub enum GridError {
	/// One of the dimensions is zero; there is nothing to decompose.
	#[error("image has no pixels ({width}x{height})")]
	Empty { width: u32, height: u32 },
	/// The raw buffer length disagrees with the declared dimensions.
	#[error("pixel buffer holds {actual} bytes, expected {expected}")]
	DimensionMismatch { expected: usize, actual: usize },
}

/// Reason why a `SegmentationParameters` value was refused.
#[derive(Debug, Error)]
pub enum ParameterError {
	/// Leaves must be at least one pixel wide.
	#[error("minimum leaf size must be at least 1, got {0}")]
	MinLeafSize(u32),
	/// The threshold must be a finite, non-negative number.
	#[error("standard deviation threshold must be finite and non-negative, got {0}")]
	StdDevThreshold(f64),
}

/// Reason why a region couldn't be decomposed into a quadtree.
#[derive(Debug, Error)]
pub enum BuildError {
	/// The requested region has zero area.
	#[error("cannot decompose empty region {rect}")]
	EmptyRegion { rect: Rect },
	/// The requested region reaches past the edge of the grid.
	#[error("region {rect} lies outside the {width}x{height} grid")]
	OutOfBounds { rect: Rect, width: u32, height: u32 },
}

/// Reason why a rasterized quadtree couldn't be measured as PNG.
#[derive(Debug, Error)]
pub enum EncodeError {
	#[error("PNG encoding failed: {0}")]
	Png(#[from] image::ImageError),
}
