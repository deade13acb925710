use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::EncodeError;

/// Input bytes are base64-encoded in slices of this size.
///
/// A multiple of three, so no slice but the last carries padding and the concatenation is a single
/// valid base64 string.
pub const ENCODE_CHUNK_BYTES: usize = 8_190;

/// A decoded-header image ready to be placed into a vector document as a data URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddableImage {
    mime: &'static str,
    data_uri: String,
    width: u32,
    height: u32,
}

impl EmbeddableImage {
    /// MIME type derived from the image bytes.
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// `data:<mime>;base64,<payload>` string.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Intrinsic pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Turn fetched bytes into an [`EmbeddableImage`].
///
/// The MIME type comes from the bytes themselves; `content_type` (as declared by the server) is
/// only reported in errors. The image header must decode to non-zero dimensions, so truncated or
/// mislabelled payloads never reach the renderer.
pub fn encode_embeddable(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<EmbeddableImage, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::Empty);
    }

    let unsupported = || EncodeError::UnsupportedFormat {
        declared: content_type.unwrap_or("none").to_string(),
    };
    let format = image::guess_format(bytes).map_err(|_| unsupported())?;
    let mime = match format {
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Jpeg => "image/jpeg",
        image::ImageFormat::Gif => "image/gif",
        image::ImageFormat::WebP => "image/webp",
        _ => return Err(unsupported()),
    };

    let (width, height) = image::ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| EncodeError::Corrupt(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(EncodeError::Corrupt(format!(
            "zero-sized image {width}x{height}"
        )));
    }

    Ok(EmbeddableImage {
        mime,
        data_uri: to_data_uri(mime, bytes),
        width,
        height,
    })
}

fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    let prefix = format!("data:{mime};base64,");
    let mut out = String::with_capacity(
        prefix.len() + base64::encoded_len(bytes.len(), true).unwrap_or(0),
    );
    out.push_str(&prefix);
    for chunk in bytes.chunks(ENCODE_CHUNK_BYTES) {
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
