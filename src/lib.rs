//! Visualization engine for package dependency graphs: force-directed
//! layout, node selection, subgraph filtering and cycle highlighting with
//! animated pulses along cyclic edges.

pub mod error;
pub mod graph;
pub mod input;
pub mod layout;
pub mod scenario;
pub mod session;
pub mod util;
pub mod wave;

pub use error::EngineError;
pub use graph::{GraphModel, Palette};
pub use session::{InteractionState, Mode, Session};
