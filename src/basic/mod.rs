pub use dir::Dir;
pub use grid::Grid;
pub use hex_point::{HexDim, HexPoint};

mod dir;
mod grid;
mod hex_point;

/// Discrete elevation band of a cell
pub type Elevation = u8;
