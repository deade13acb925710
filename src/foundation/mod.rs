/// Grid geometry, canvas and response metadata.
pub mod core;
/// Error types for every pipeline stage.
pub mod error;
