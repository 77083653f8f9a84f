//! Height grid data structure.

mod heightgrid;

pub use heightgrid::HeightGrid;
