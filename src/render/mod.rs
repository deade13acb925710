/// Direct string builder used when the vector engine fails.
pub mod fallback;
/// Card markup, placeholders and XML escaping.
pub mod markup;
/// PNG export and response metadata.
pub mod raster;
/// Primary vector renderer and output validation.
pub mod vector;
