/// Nine-cell grid composition.
pub mod grid;
