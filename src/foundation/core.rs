pub use kurbo::Rect;

/// Number of grid columns in a card.
pub const GRID_COLUMNS: usize = 3;
/// Number of grid rows in a card.
pub const GRID_ROWS: usize = 3;
/// Number of cells (album slots) in a card.
pub const SLOT_COUNT: usize = GRID_COLUMNS * GRID_ROWS;
/// Default cell edge length in logical units.
pub const DEFAULT_CELL_PX: u32 = 300;

/// Logical canvas size of a card document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in logical units.
    pub width: u32,
    /// Height in logical units.
    pub height: u32,
}

impl Canvas {
    /// Canvas covering the full grid for cells of `cell_px` units.
    pub fn for_grid(cell_px: u32) -> Self {
        Self {
            width: cell_px.saturating_mul(GRID_COLUMNS as u32),
            height: cell_px.saturating_mul(GRID_ROWS as u32),
        }
    }

    /// Horizontal centre in logical units.
    pub fn center_x(self) -> f64 {
        f64::from(self.width) / 2.0
    }

    /// Vertical centre in logical units.
    pub fn center_y(self) -> f64 {
        f64::from(self.height) / 2.0
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::for_grid(DEFAULT_CELL_PX)
    }
}

/// `(column, row)` of a 0-based cell index in row-major order.
pub fn cell_coords(index: usize) -> (usize, usize) {
    (index % GRID_COLUMNS, index / GRID_COLUMNS)
}

/// Rectangle covered by cell `index` for cells of `cell_px` units.
///
/// Cells tile the canvas with no spacing: cell 0 is top-left, cell 8 bottom-right.
pub fn cell_rect(index: usize, cell_px: u32) -> Rect {
    let (col, row) = cell_coords(index);
    let size = f64::from(cell_px);
    let x0 = col as f64 * size;
    let y0 = row as f64 * size;
    Rect::new(x0, y0, x0 + size, y0 + size)
}

/// Content type of an image body handed to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `image/png`
    Png,
    /// `image/svg+xml`
    Svg,
}

impl ContentType {
    /// MIME string suitable for a `Content-Type` header.
    pub fn as_mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Caching policy of an image response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Stored artifacts never change once written.
    Immutable,
    /// Placeholders and error images must not be cached.
    NoCache,
}

impl CachePolicy {
    /// Value for a `Cache-Control` header.
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Immutable => "public, max-age=31536000, immutable",
            Self::NoCache => "no-cache",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
