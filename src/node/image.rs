use bitvec::prelude::*;

use crate::grid::{Color, Rect};

/// One bit per pixel, row-major.
pub type CoverageMask = BitVec<u8, Msb0>;

/// Which pixels of a `width` x `height` buffer the leaves of a tree cover.
#[derive(Clone, Debug)]
pub struct Coverage {
	pub mask: CoverageMask,
	/// Pixels covered by more than one leaf, counted once per extra leaf.
	pub overlaps: usize,
	/// Leaf pixels that fall outside the buffer.
	pub outside: usize,
}

impl Coverage {
	pub fn covered(&self) -> usize {
		self.mask.count_ones()
	}

	/// Whether every pixel was covered by exactly one leaf and no leaf
	/// reached past the buffer.
	pub fn is_exact(&self) -> bool {
		self.overlaps == 0 && self.outside == 0 && self.mask.all()
	}
}

/// Clips `rect` to a `width` x `height` buffer, returning the covered
/// column and row ranges.
fn clip(rect: &Rect, width: u32, height: u32) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
	let x1 = rect.right().min(width as u64) as u32;
	let y1 = rect.bottom().min(height as u64) as u32;
	(rect.x.min(x1)..x1, rect.y.min(y1)..y1)
}

fn fill(img: &mut image::RgbImage, rect: &Rect, c: Color) {
	let (cols, rows) = clip(rect, img.width(), img.height());
	for row in rows {
		for col in cols.clone() {
			img.put_pixel(col, row, c);
		}
	}
}

impl super::QuadtreeNode {
	/// Paints every leaf below this node into `img` as a flat rectangle
	/// of its color.
	///
	/// Pixels a leaf would place outside `img` are skipped.
	pub fn to_image(&self, img: &mut image::RgbImage) {
		match self.sections {
			Some(ref sects) => {
				for section in sects.iter() {
					section.to_image(img);
				}
			},
			None => fill(img, &self.rect, self.color),
		}
	}

	/// Like `to_image`, but nodes `max_depth` levels below this one are
	/// painted with their own color instead of being descended into.
	///
	/// A depth of 0 paints this node's mean color over its whole rectangle.
	pub fn to_image_at_depth(&self, img: &mut image::RgbImage, max_depth: usize) {
		match self.sections {
			Some(ref sects) if max_depth > 0 => {
				for section in sects.iter() {
					section.to_image_at_depth(img, max_depth - 1);
				}
			},
			_ => fill(img, &self.rect, self.color),
		}
	}

	/// Draws a one pixel border around each leaf's rectangle.
	pub fn draw_outlines(&self, img: &mut image::RgbImage, c: Color) {
		for leaf in self.leaves() {
			let (cols, rows) = clip(&leaf.rect, img.width(), img.height());
			if cols.start == cols.end || rows.start == rows.end {
				continue;
			}
			let (last_col, last_row) = (cols.end - 1, rows.end - 1);
			for col in cols.clone() {
				if leaf.rect.y == rows.start {
					img.put_pixel(col, rows.start, c);
				}
				if leaf.rect.bottom() == rows.end as u64 {
					img.put_pixel(col, last_row, c);
				}
			}
			for row in rows {
				if leaf.rect.x == cols.start {
					img.put_pixel(cols.start, row, c);
				}
				if leaf.rect.right() == cols.end as u64 {
					img.put_pixel(last_col, row, c);
				}
			}
		}
	}

	/// Records which pixels of a `width` x `height` buffer the leaves
	/// below this node would paint, and how often they collide.
	pub fn coverage(&self, width: u32, height: u32) -> Coverage {
		let mut mask = CoverageMask::repeat(false, width as usize * height as usize);
		let (mut overlaps, mut outside) = (0, 0);
		for leaf in self.leaves() {
			let (cols, rows) = clip(&leaf.rect, width, height);
			let inside = (cols.end - cols.start) as u64 * (rows.end - rows.start) as u64;
			outside += (leaf.rect.area() - inside) as usize;
			for row in rows {
				for col in cols.clone() {
					let ind = row as usize * width as usize + col as usize;
					if mask[ind] {
						overlaps += 1;
					} else {
						mask.set(ind, true);
					}
				}
			}
		}
		Coverage { mask, overlaps, outside }
	}
}

impl super::Quadtree {
	/// Renders the tree as flat-colored leaves into a new buffer the size
	/// of the source grid.
	pub fn rasterize(&self) -> image::RgbImage {
		let mut img = image::RgbImage::new(self.width, self.height);
		self.root.to_image(&mut img);
		img
	}

	/// Renders a coarser preview, stopping `max_depth` levels below the root.
	pub fn rasterize_at_depth(&self, max_depth: usize) -> image::RgbImage {
		let mut img = image::RgbImage::new(self.width, self.height);
		self.root.to_image_at_depth(&mut img, max_depth);
		img
	}

	pub fn coverage(&self) -> Coverage {
		self.root.coverage(self.width, self.height)
	}
}
