use crate::assets::encode::EmbeddableImage;
use crate::config::CardOpts;
use crate::foundation::core::{Canvas, Rect, SLOT_COUNT, cell_rect};
use crate::model::SlotGrid;

/// What a single cell shows.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    /// A cover image, scaled to cover the cell and clipped to it.
    Image {
        /// Data URI of the cover.
        href: String,
        /// `name / artist`, carried as an accessible label.
        label: String,
    },
    /// Translucent empty box.
    Placeholder,
}

/// One positioned cell of the card.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutCell {
    /// 0-based row-major cell index.
    pub index: usize,
    /// Area covered by the cell.
    pub rect: Rect,
    /// Cell content.
    pub content: CellContent,
}

/// Renderer-neutral description of a whole card: a root frame filled with the background colour
/// and nine children in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutDoc {
    /// Root frame size.
    pub canvas: Canvas,
    /// Root frame fill.
    pub background: String,
    /// Empty-cell fill colour.
    pub placeholder_fill: String,
    /// Empty-cell fill opacity.
    pub placeholder_opacity: f32,
    /// Exactly nine cells.
    pub cells: Vec<LayoutCell>,
}

impl LayoutDoc {
    /// Number of cells showing a cover.
    pub fn image_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c.content, CellContent::Image { .. }))
            .count()
    }

    /// Number of cells showing the placeholder box.
    pub fn placeholder_count(&self) -> usize {
        self.cells.len() - self.image_count()
    }
}

/// Build the layout document for `grid`.
///
/// `embeds` is indexed by cell; a missing entry (or a short slice) means the cover could not be
/// obtained. A cell shows its image only when it holds an album and an embeddable cover.
pub fn compose(grid: &SlotGrid, embeds: &[Option<EmbeddableImage>], opts: &CardOpts) -> LayoutDoc {
    let cells = (0..SLOT_COUNT)
        .map(|index| LayoutCell {
            index,
            rect: cell_rect(index, opts.cell_px),
            content: match resolve_cell(grid, embeds, index) {
                Some((label, img)) => CellContent::Image {
                    href: img.data_uri().to_string(),
                    label,
                },
                None => CellContent::Placeholder,
            },
        })
        .collect();

    LayoutDoc {
        canvas: opts.canvas(),
        background: opts.background_color.clone(),
        placeholder_fill: opts.placeholder_fill.clone(),
        placeholder_opacity: opts.placeholder_opacity,
        cells,
    }
}

/// The one image-or-placeholder decision shared by the layout composer and the direct fallback
/// builder. Returns the cell label and cover when the cell should show an image.
pub(crate) fn resolve_cell<'a>(
    grid: &SlotGrid,
    embeds: &'a [Option<EmbeddableImage>],
    index: usize,
) -> Option<(String, &'a EmbeddableImage)> {
    let album = grid.get(index)?;
    let img = embeds.get(index)?.as_ref()?;
    Some((album.label(), img))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
