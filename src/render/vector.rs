use std::fmt::Write as _;

use crate::assets::font::FontResource;
use crate::foundation::error::RenderError;
use crate::layout::grid::{CellContent, LayoutDoc};
use crate::render::markup::{CardMarkup, escape_xml};

/// Primary renderer: resolve the layout document through the vector engine and serialize the
/// normalized result.
///
/// The engine resolves clipping, aspect-ratio scaling and embedded images itself; any failure is
/// card-wide and the caller falls back to the direct builder.
#[tracing::instrument(skip_all, fields(images = doc.image_count()))]
pub fn render_vector(doc: &LayoutDoc, font: &FontResource) -> Result<CardMarkup, RenderError> {
    if doc.canvas.width == 0 || doc.canvas.height == 0 {
        return Err(RenderError::Engine(format!(
            "empty canvas {}x{}",
            doc.canvas.width, doc.canvas.height
        )));
    }

    let source = layout_source(doc);
    let opts = usvg::Options {
        fontdb: font.database(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&source, &opts)
        .map_err(|e| RenderError::Engine(format!("parse layout document: {e}")))?;

    let markup = tree.to_string(&usvg::WriteOptions::default());
    validate_markup(&markup)?;
    Ok(CardMarkup::new(markup))
}

/// Check that `markup` is a usable vector document: non-empty, rooted at `<svg`, and parseable.
pub fn validate_markup(markup: &str) -> Result<(), RenderError> {
    let s = markup.trim_start();
    if s.is_empty() {
        return Err(RenderError::invalid_output("empty document"));
    }
    let body = if s.starts_with("<?xml") {
        match s.find("?>") {
            Some(end) => s[end + 2..].trim_start(),
            None => return Err(RenderError::invalid_output("unterminated xml declaration")),
        }
    } else {
        s
    };
    if !body.starts_with("<svg") {
        let head: String = body.chars().take(16).collect();
        return Err(RenderError::invalid_output(format!(
            "document does not start with <svg: '{head}'"
        )));
    }
    usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| RenderError::invalid_output(format!("document does not parse: {e}")))?;
    Ok(())
}

fn layout_source(doc: &LayoutDoc) -> String {
    let (w, h) = (doc.canvas.width, doc.canvas.height);
    let image_bytes: usize = doc
        .cells
        .iter()
        .map(|c| match &c.content {
            CellContent::Image { href, .. } => href.len(),
            CellContent::Placeholder => 0,
        })
        .sum();

    let mut out = String::with_capacity(2048 + image_bytes);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    out.push_str("<defs>");
    for cell in &doc.cells {
        let r = cell.rect;
        let _ = write!(
            out,
            r#"<clipPath id="cell-{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            cell.index,
            r.x0,
            r.y0,
            r.width(),
            r.height()
        );
    }
    out.push_str("</defs>");

    let _ = write!(
        out,
        r#"<rect width="{w}" height="{h}" fill="{}"/>"#,
        escape_xml(&doc.background)
    );

    for cell in &doc.cells {
        let r = cell.rect;
        match &cell.content {
            CellContent::Image { href, label } => {
                let _ = write!(
                    out,
                    r#"<g id="cell-{i}-content" clip-path="url(#cell-{i})"><title>{}</title><image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" href="{}"/></g>"#,
                    escape_xml(label),
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height(),
                    href,
                    i = cell.index,
                );
            }
            CellContent::Placeholder => {
                let _ = write!(
                    out,
                    r#"<rect id="cell-{}-content" x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
                    cell.index,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height(),
                    escape_xml(&doc.placeholder_fill),
                    doc.placeholder_opacity
                );
            }
        }
    }

    out.push_str("</svg>");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/vector.rs"]
mod tests;
