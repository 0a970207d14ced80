use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::error::EncodeError;

/// Bytes for one leaf's RGB color.
pub const LEAF_COLOR_BYTES: usize = 3;
/// Bytes for one leaf's rectangle, as four 32-bit fields (x, y, w, h).
pub const LEAF_RECT_BYTES: usize = 16;

/// Size measurements of a decomposition, for judging how well it
/// compresses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeReport {
	/// Estimated size of storing each leaf's color and rectangle raw.
	pub raw_leaf_bytes: usize,
	/// Length of the rasterized tree encoded as PNG.
	pub encoded_bytes: usize,
	/// Size of the source image file, when it came from one.
	pub source_bytes: Option<u64>,
}

impl SizeReport {
	/// Encoded size as a fraction of the source file size.
	pub fn ratio(&self) -> Option<f64> {
		match self.source_bytes {
			Some(0) | None => None,
			Some(n) => Some(self.encoded_bytes as f64 / n as f64),
		}
	}
}

/// Closed-form estimate of an uncompressed leaf list: 3 bytes of color
/// per leaf, plus 16 bytes of rectangle if `include_rects` is set.
///
/// This is not a real file format, just a yardstick.
pub fn raw_leaf_bytes(leaves: usize, include_rects: bool) -> usize {
	let rect = if include_rects { LEAF_RECT_BYTES } else { 0 };
	leaves * (LEAF_COLOR_BYTES + rect)
}

/// Encodes `img` as PNG in memory and returns the byte count. The encoded
/// bytes themselves are thrown away.
pub fn encoded_size(img: &image::RgbImage) -> Result<usize, EncodeError> {
	let mut buf = Vec::new();
	PngEncoder::new(&mut buf).write_image(
		img.as_raw(),
		img.width(),
		img.height(),
		ExtendedColorType::Rgb8
	)?;
	Ok(buf.len())
}

impl super::Quadtree {
	/// Raw leaf estimate (with rectangles) and PNG size of the
	/// rasterized tree. `source_bytes` is passed through untouched.
	pub fn size_report(&self, source_bytes: Option<u64>) -> Result<SizeReport, EncodeError> {
		Ok(SizeReport {
			raw_leaf_bytes: raw_leaf_bytes(self.stats.leaves, true),
			encoded_bytes: encoded_size(&self.rasterize())?,
			source_bytes,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn raw_estimate() {
		assert_eq!(raw_leaf_bytes(0, true), 0);
		assert_eq!(raw_leaf_bytes(10, false), 30);
		assert_eq!(raw_leaf_bytes(10, true), 190);
	}

	#[test]
	fn flat_image_encodes_smaller_than_noise() {
		let flat = image::RgbImage::from_pixel(64, 64, image::Rgb([12, 34, 56]));
		let mut state = 0x9e37_79b9u32;
		let noisy = image::RgbImage::from_fn(64, 64, |_, _| {
			state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
			let b = state.to_be_bytes();
			image::Rgb([b[0], b[1], b[2]])
		});
		let flat_len = encoded_size(&flat).unwrap();
		let noisy_len = encoded_size(&noisy).unwrap();
		assert!(flat_len > 0);
		assert!(flat_len < noisy_len);
	}

	#[test]
	fn ratio_needs_a_source_size() {
		let mut report = SizeReport { raw_leaf_bytes: 3, encoded_bytes: 50, source_bytes: None };
		assert_eq!(report.ratio(), None);
		report.source_bytes = Some(0);
		assert_eq!(report.ratio(), None);
		report.source_bytes = Some(200);
		assert_eq!(report.ratio(), Some(0.25));
	}
}
