use std::io::Cursor;
use std::sync::Arc;

use crate::assets::font::FontResource;
use crate::foundation::core::{CachePolicy, ContentType};
use crate::foundation::error::ExportError;
use crate::render::markup::CardMarkup;

/// Largest raster edge the exporter will allocate.
const MAX_DIM: u32 = 16_384;

/// Body of an image response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardBody {
    /// Encoded PNG.
    Png(Vec<u8>),
    /// SVG markup.
    Svg(String),
}

/// Image handed to clients, with the headers that go with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardImage {
    /// Response body.
    pub body: CardBody,
    /// Caching policy.
    pub cache: CachePolicy,
}

impl CardImage {
    /// Non-cacheable vector placeholder.
    pub fn placeholder(markup: CardMarkup) -> Self {
        Self {
            body: CardBody::Svg(markup.into_string()),
            cache: CachePolicy::NoCache,
        }
    }

    /// Content type of the body.
    pub fn content_type(&self) -> ContentType {
        match self.body {
            CardBody::Png(_) => ContentType::Png,
            CardBody::Svg(_) => ContentType::Svg,
        }
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        match &self.body {
            CardBody::Png(b) => b,
            CardBody::Svg(s) => s.as_bytes(),
        }
    }

    /// `Cache-Control` header value.
    pub fn cache_control(&self) -> &'static str {
        self.cache.header_value()
    }

    /// Response headers as `(name, value)` pairs.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = vec![
            ("Content-Type", self.content_type().as_mime()),
            ("Cache-Control", self.cache_control()),
        ];
        if self.content_type() == ContentType::Svg {
            out.push(("X-Content-Type-Options", "nosniff"));
        }
        out
    }
}

/// Export a stored card: PNG when rasterization works, the unchanged markup otherwise.
///
/// Never fails; a rasterization error is logged and the vector document is served instead.
#[tracing::instrument(skip_all)]
pub fn export_card(markup: &CardMarkup, font: Option<&FontResource>) -> CardImage {
    let fontdb = font.map(FontResource::database);
    let body = match rasterize_png(markup.as_str(), fontdb) {
        Ok(png) => CardBody::Png(png),
        Err(e) => {
            tracing::warn!(error = %e, "raster export failed; serving vector document");
            CardBody::Svg(markup.as_str().to_string())
        }
    };
    CardImage {
        body,
        cache: CachePolicy::Immutable,
    }
}

/// Rasterize SVG markup at its intrinsic size and encode it as PNG.
pub fn rasterize_png(
    markup: &str,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
) -> Result<Vec<u8>, ExportError> {
    let mut opts = usvg::Options::default();
    if let Some(db) = fontdb {
        opts.fontdb = db;
    }
    let tree =
        usvg::Tree::from_str(markup, &opts).map_err(|e| ExportError::Parse(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    if width > MAX_DIM || height > MAX_DIM {
        return Err(ExportError::Size { width, height });
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(ExportError::Size { width, height })?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    let mut rgba = pixmap.take();
    demultiply_rgba8_in_place(&mut rgba);
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or(ExportError::Size { width, height })?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(buf)
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
