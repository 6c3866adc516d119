//! Layout engine: row/column geometry, merged cells and viewport culling.
//!
//! This module handles:
//! - Pre-computing row/column offsets and slice checkpoints
//! - Resolving merged cells to their anchor
//! - Choosing the rows and columns each frame has to draw

mod geometry;
mod merge;
mod viewport;

pub use geometry::{AxisIndex, AxisItem, GeometryIndex, SliceCheckpoint};
pub use merge::{MergeResolver, MergeRole, PositionSpans};
pub use viewport::{calculate_render_cells, RenderSet, Viewport};
