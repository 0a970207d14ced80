use crate::error::ParameterError;

/// Largest exponent accepted by `from_powers` for the leaf size (256 px).
pub const MAX_LEAF_POWER: u32 = 8;
/// Largest exponent accepted by `from_powers` for the threshold (64).
pub const MAX_STD_DEV_POWER: u32 = 6;

/// The two knobs controlling a decomposition.
///
/// A value is immutable; changing either knob means constructing a new
/// value and rebuilding the tree from scratch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentationParameters {
	min_leaf_size: u32,
	std_dev_threshold: f64,
}

impl SegmentationParameters {
	/// `min_leaf_size` is conventionally a power of two but any value of
	/// at least 1 is accepted. `std_dev_threshold` must be finite and
	/// non-negative.
	pub fn new(min_leaf_size: u32, std_dev_threshold: f64) -> Result<Self, ParameterError> {
		if min_leaf_size == 0 {
			return Err(ParameterError::MinLeafSize(min_leaf_size));
		}
		if !std_dev_threshold.is_finite() || std_dev_threshold < 0. {
			return Err(ParameterError::StdDevThreshold(std_dev_threshold));
		}
		Ok(SegmentationParameters { min_leaf_size, std_dev_threshold })
	}

	/// Builds parameters from two exponents: a leaf size of
	/// `2^leaf_pow` and a threshold of `2^sd_pow`.
	///
	/// Exponents are clamped to `0..=MAX_LEAF_POWER` and
	/// `0..=MAX_STD_DEV_POWER`, so this never fails.
	pub fn from_powers(leaf_pow: u32, sd_pow: u32) -> Self {
		SegmentationParameters {
			min_leaf_size: 1 << leaf_pow.min(MAX_LEAF_POWER),
			std_dev_threshold: (1u32 << sd_pow.min(MAX_STD_DEV_POWER)) as f64,
		}
	}

	pub fn min_leaf_size(&self) -> u32 {
		self.min_leaf_size
	}

	pub fn std_dev_threshold(&self) -> f64 {
		self.std_dev_threshold
	}
}

impl Default for SegmentationParameters {
	/// One-pixel leaves, threshold 8.
	fn default() -> Self {
		SegmentationParameters::from_powers(0, 3)
	}
}
