pub mod error;

use std::time::Duration;

use crate::grid::{Color, Rect};
use crate::params::SegmentationParameters;

/// Node in a quadtree covering one rectangle of an image.
///
/// May contain subnodes (branch node) or no subnodes and just a color
/// (leaf node). Subnodes are stored NW, NE, SW, SE and exactly tile the
/// node's rectangle.
///
/// It must always contain a color, such that tree descent
/// can stop at any level and give a meaningful preview. For a leaf this
/// is the flat color of its rectangle; for a branch it is the mean of the
/// whole region, kept from the pass that decided to split it.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadtreeNode {
	pub rect: Rect,
	pub color: Color,
	pub sections: Option<Box<[QuadtreeNode; 4]>>,
}

/// Counters gathered over one decomposition pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildStatistics {
	pub nodes: usize,
	pub leaves: usize,
	/// Depth of the deepest node; the root is depth 0.
	pub max_depth: usize,
	pub elapsed: Duration,
}

impl BuildStatistics {
	pub fn elapsed_ms(&self) -> f64 {
		self.elapsed.as_secs_f64() * 1000.
	}

	/// Share of nodes that are leaves, in percent.
	pub fn leaf_percent(&self) -> f64 {
		if self.nodes == 0 {
			0.
		} else {
			100. * self.leaves as f64 / self.nodes as f64
		}
	}
}

/// A complete decomposition of one grid: the root node, the dimensions it
/// covers, and what it took to build.
#[derive(Clone, Debug)]
pub struct Quadtree {
	pub root: QuadtreeNode,
	pub width: u32,
	pub height: u32,
	pub params: SegmentationParameters,
	pub stats: BuildStatistics,
}

impl QuadtreeNode {
	/// A node with no subsections.
	pub fn leaf(rect: Rect, color: Color) -> Self {
		QuadtreeNode { rect, color, sections: None }
	}

	pub fn is_leaf(&self) -> bool {
		self.sections.is_none()
	}

	/// Iterates over the leaves below (or at) this node, NW to SE.
	pub fn leaves(&self) -> Leaves<'_> {
		Leaves { stack: vec![self] }
	}

	pub fn leaf_count(&self) -> usize {
		self.leaves().count()
	}

	pub fn node_count(&self) -> usize {
		1 + self.sections.as_ref()
			.map(|s| s.iter().map(QuadtreeNode::node_count).sum())
			.unwrap_or(0)
	}

	/// Number of levels below this node; 0 for a leaf.
	pub fn depth(&self) -> usize {
		self.sections.as_ref()
			.map(|s| 1 + s.iter().map(QuadtreeNode::depth).max().unwrap_or(0))
			.unwrap_or(0)
	}
}

/// Depth-first iterator over leaf nodes, see `QuadtreeNode::leaves`.
pub struct Leaves<'a> {
	stack: Vec<&'a QuadtreeNode>,
}

impl<'a> Iterator for Leaves<'a> {
	type Item = &'a QuadtreeNode;

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(node) = self.stack.pop() {
			match node.sections {
				Some(ref sects) => self.stack.extend(sects.iter().rev()),
				None => return Some(node),
			}
		}
		None
	}
}

impl Quadtree {
	pub fn leaves(&self) -> Leaves<'_> {
		self.root.leaves()
	}

	/// The rectangle of the whole source grid.
	pub fn bounds(&self) -> Rect {
		Rect::new(0, 0, self.width, self.height)
	}
}

pub mod build;
pub mod image;
pub mod size;

#[cfg(test)]
mod tests {
	use super::*;

	fn px(v: u8) -> Color {
		::image::Rgb([v, v, v])
	}

	fn sample_tree() -> QuadtreeNode {
		let parent = Rect::new(0, 0, 4, 4);
		let q = parent.split().unwrap();
		let nw = q[0].split().unwrap();
		QuadtreeNode {
			rect: parent,
			color: px(0),
			sections: Some(Box::new([
				QuadtreeNode {
					rect: q[0],
					color: px(1),
					sections: Some(Box::new([
						QuadtreeNode::leaf(nw[0], px(10)),
						QuadtreeNode::leaf(nw[1], px(11)),
						QuadtreeNode::leaf(nw[2], px(12)),
						QuadtreeNode::leaf(nw[3], px(13)),
					])),
				},
				QuadtreeNode::leaf(q[1], px(2)),
				QuadtreeNode::leaf(q[2], px(3)),
				QuadtreeNode::leaf(q[3], px(4)),
			])),
		}
	}

	#[test]
	fn counts_and_depth() {
		let tree = sample_tree();
		assert_eq!(tree.node_count(), 9);
		assert_eq!(tree.leaf_count(), 7);
		assert_eq!(tree.depth(), 2);
		assert!(!tree.is_leaf());
	}

	#[test]
	fn leaves_come_out_nw_to_se() {
		let tree = sample_tree();
		let colors = tree.leaves().map(|n| n.color.0[0]).collect::<Vec<_>>();
		assert_eq!(colors, vec![10, 11, 12, 13, 2, 3, 4]);
	}

	#[test]
	fn leaf_percent_handles_zero_nodes() {
		assert_eq!(BuildStatistics::default().leaf_percent(), 0.);
		let s = BuildStatistics { nodes: 5, leaves: 4, ..Default::default() };
		assert_eq!(s.leaf_percent(), 80.);
	}
}
