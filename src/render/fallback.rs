use std::fmt::Write as _;

use crate::assets::encode::EmbeddableImage;
use crate::config::CardOpts;
use crate::foundation::core::{SLOT_COUNT, cell_rect};
use crate::layout::grid::resolve_cell;
use crate::model::SlotGrid;
use crate::render::markup::{CardMarkup, escape_comment, escape_xml};

/// Build the card markup directly as text, without the vector engine.
///
/// Produces the same visual result as the primary renderer for the same inputs: background rect,
/// then per cell either the cover (cover-scaled and clipped to the cell) or the translucent
/// placeholder box. Cannot fail.
pub fn build_direct(
    grid: &SlotGrid,
    embeds: &[Option<EmbeddableImage>],
    opts: &CardOpts,
) -> CardMarkup {
    let canvas = opts.canvas();
    let (w, h) = (canvas.width, canvas.height);

    let payload: usize = embeds
        .iter()
        .flatten()
        .map(|e| e.data_uri().len())
        .sum();
    let mut out = String::with_capacity(4096 + payload);

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect width="{w}" height="{h}" fill="{}"/>"#,
        escape_xml(&opts.background_color)
    );

    for index in 0..SLOT_COUNT {
        let r = cell_rect(index, opts.cell_px);
        if let Some(album) = grid.get(index) {
            let _ = writeln!(
                out,
                "  <!-- cell {index}: {} -->",
                escape_comment(&album.label())
            );
        }
        match resolve_cell(grid, embeds, index) {
            Some((label, img)) => {
                let _ = writeln!(
                    out,
                    r#"  <clipPath id="cell-{index}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height()
                );
                let _ = writeln!(
                    out,
                    r#"  <image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#cell-{index})" aria-label="{}" href="{}"/>"#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height(),
                    escape_xml(&label),
                    img.data_uri()
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height(),
                    escape_xml(&opts.placeholder_fill),
                    opts.placeholder_opacity
                );
            }
        }
    }

    out.push_str("</svg>\n");
    CardMarkup::new(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/fallback.rs"]
mod tests;
