use std::fmt;

use crate::error::GridError;

/// An 8-bit RGB color.
pub type Color = image::Rgb<u8>;

/// An axis-aligned rectangle of pixels, `w` wide and `h` tall, with its
/// top-left corner at `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
	pub x: u32,
	pub y: u32,
	pub w: u32,
	pub h: u32,
}

impl Rect {
	pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
		Rect { x, y, w, h }
	}

	/// Number of pixels covered. Computed in `u64` so that a full-size
	/// grid can't overflow.
	pub fn area(&self) -> u64 {
		self.w as u64 * self.h as u64
	}

	pub fn is_empty(&self) -> bool {
		self.w == 0 || self.h == 0
	}

	/// One past the last column.
	pub fn right(&self) -> u64 {
		self.x as u64 + self.w as u64
	}

	/// One past the last row.
	pub fn bottom(&self) -> u64 {
		self.y as u64 + self.h as u64
	}

	/// Whether `other` lies entirely inside this rectangle.
	pub fn contains_rect(&self, other: &Rect) -> bool {
		other.x >= self.x && other.y >= self.y &&
			other.right() <= self.right() && other.bottom() <= self.bottom()
	}

	/// Whether the two rectangles share at least one pixel.
	pub fn intersects(&self, other: &Rect) -> bool {
		!self.is_empty() && !other.is_empty() &&
			(self.x as u64) < other.right() && (other.x as u64) < self.right() &&
			(self.y as u64) < other.bottom() && (other.y as u64) < self.bottom()
	}

	/// Splits into quadrants in NW, NE, SW, SE order.
	///
	/// The midpoints are `w / 2` and `h / 2`, so the east and south
	/// quadrants take the odd pixel when a dimension is odd. Returns `None`
	/// if either midpoint is zero, as a quadrant would then be empty.
	pub fn split(&self) -> Option<[Rect; 4]> {
		let (w2, h2) = (self.w / 2, self.h / 2);
		if w2 == 0 || h2 == 0 {
			return None;
		}
		Some([
			Rect::new(self.x, self.y, w2, h2),
			Rect::new(self.x + w2, self.y, self.w - w2, h2),
			Rect::new(self.x, self.y + h2, w2, self.h - h2),
			Rect::new(self.x + w2, self.y + h2, self.w - w2, self.h - h2),
		])
	}
}

impl fmt::Display for Rect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
	}
}

/// A decoded image, guaranteed to hold at least one pixel.
///
/// The grid is read-only once built; loading a different image means
/// building a new `PixelGrid`.
#[derive(Clone, Debug)]
pub struct PixelGrid {
	img: image::RgbImage,
}

impl PixelGrid {
	/// Wraps an already decoded image, refusing empty ones.
	pub fn new(img: image::RgbImage) -> Result<Self, GridError> {
		if img.width() == 0 || img.height() == 0 {
			return Err(GridError::Empty { width: img.width(), height: img.height() });
		}
		Ok(PixelGrid { img })
	}

	/// Builds a grid from tightly packed, row-major RGB bytes.
	pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, GridError> {
		if width == 0 || height == 0 {
			return Err(GridError::Empty { width, height });
		}
		let expected = width as usize * height as usize * 3;
		if data.len() != expected {
			return Err(GridError::DimensionMismatch { expected, actual: data.len() });
		}
		match image::RgbImage::from_raw(width, height, data) {
			Some(img) => Ok(PixelGrid { img }),
			None => Err(GridError::DimensionMismatch { expected, actual: 0 }),
		}
	}

	/// Builds a grid by evaluating `f(x, y)` for every pixel.
	pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self, GridError>
	where
		F: FnMut(u32, u32) -> Color,
	{
		PixelGrid::new(image::RgbImage::from_fn(width, height, f))
	}

	/// A two-color checkerboard with square cells of `cell` pixels.
	///
	/// The top-left cell uses `a`.
	pub fn checkerboard(
		width: u32,
		height: u32,
		cell: u32,
		a: Color,
		b: Color
	) -> Result<Self, GridError> {
		let cell = cell.max(1);
		PixelGrid::from_fn(width, height, |x, y| {
			if (x / cell + y / cell) & 1 == 0 { a } else { b }
		})
	}

	pub fn width(&self) -> u32 {
		self.img.width()
	}

	pub fn height(&self) -> u32 {
		self.img.height()
	}

	/// The rectangle covering the whole grid.
	pub fn bounds(&self) -> Rect {
		Rect::new(0, 0, self.width(), self.height())
	}

	pub fn get(&self, x: u32, y: u32) -> Color {
		*self.img.get_pixel(x, y)
	}

	/// Packed RGB bytes of row `y` between columns `x` and `x + w`.
	///
	/// Callers must keep the span inside the grid.
	pub(crate) fn row_span(&self, x: u32, y: u32, w: u32) -> &[u8] {
		let stride = self.width() as usize * 3;
		let start = y as usize * stride + x as usize * 3;
		&self.img.as_raw()[start..start + w as usize * 3]
	}

	pub fn as_image(&self) -> &image::RgbImage {
		&self.img
	}

	pub fn into_image(self) -> image::RgbImage {
		self.img
	}
}
