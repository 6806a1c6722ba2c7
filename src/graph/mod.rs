mod build;
mod model;
mod palette;

pub use build::BuildSummary;
pub use model::{Edge, EdgeStyle, GraphModel, Node, NodeStyle, Visual};
pub use palette::Palette;
