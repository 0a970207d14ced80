pub mod grid;
pub mod logger;
pub mod node;
pub mod params;
pub mod session;
pub mod stats;

pub use node::*;

pub use grid::{Color, PixelGrid, Rect};
pub use params::SegmentationParameters;
pub use session::Segmenter;
