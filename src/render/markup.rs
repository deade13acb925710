use std::fmt::Write as _;

use crate::config::CardOpts;
use crate::foundation::core::Canvas;

/// Serialized vector document of a card (SVG markup).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CardMarkup(String);

impl CardMarkup {
    /// Wrap markup produced elsewhere (for example read back from a store).
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Borrow the markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the markup.
    pub fn into_string(self) -> String {
        self.0
    }

    /// `true` when the markup is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for CardMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardMarkup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a placeholder document is shown instead of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaceholderReason {
    /// The read path was called without a post id.
    MissingPostId,
    /// The post does not exist.
    PostNotFound,
    /// The post has no albums.
    NoAlbums,
    /// The card could not be generated.
    GenerationFailed,
    /// Anything else went wrong on the read path.
    Unexpected,
}

impl PlaceholderReason {
    /// Fixed text drawn in the placeholder.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingPostId => "postId is required",
            Self::PostNotFound => "Post not found",
            Self::NoAlbums => "No albums found",
            Self::GenerationFailed => "Failed to generate image",
            Self::Unexpected => "Failed to generate vibe card",
        }
    }

    /// Placeholder document for this reason.
    pub fn document(self, opts: &CardOpts) -> CardMarkup {
        placeholder_document(opts.canvas(), &opts.background_color, self.message(), None)
    }

    /// Placeholder document with a secondary detail line (for example an error message).
    pub fn document_with_detail(self, opts: &CardOpts, detail: &str) -> CardMarkup {
        placeholder_document(
            opts.canvas(),
            &opts.background_color,
            self.message(),
            Some(detail),
        )
    }
}

/// Longest detail line drawn in a placeholder, in characters.
pub const PLACEHOLDER_DETAIL_CHARS: usize = 50;

/// Build a placeholder document: background rect plus a centred message.
///
/// With `detail`, the message moves up and the detail (truncated to
/// [`PLACEHOLDER_DETAIL_CHARS`]) is drawn below it, smaller and dimmed.
pub fn placeholder_document(
    canvas: Canvas,
    background: &str,
    message: &str,
    detail: Option<&str>,
) -> CardMarkup {
    let (w, h) = (canvas.width, canvas.height);
    let cx = canvas.center_x();
    let cy = canvas.center_y();

    let mut out = String::with_capacity(512);
    let _ = write!(
        out,
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
    );
    let _ = write!(
        out,
        r#"<rect width="{w}" height="{h}" fill="{}"/>"#,
        escape_xml(background)
    );
    match detail {
        None => {
            let _ = write!(
                out,
                r##"<text x="{cx}" y="{cy}" font-family="Arial" font-size="24" fill="#ffffff" text-anchor="middle">{}</text>"##,
                escape_xml(message)
            );
        }
        Some(detail) => {
            let detail: String = detail.chars().take(PLACEHOLDER_DETAIL_CHARS).collect();
            let _ = write!(
                out,
                r##"<text x="{cx}" y="{}" font-family="Arial" font-size="24" fill="#ffffff" text-anchor="middle">{}</text>"##,
                cy - 50.0,
                escape_xml(message)
            );
            let _ = write!(
                out,
                r##"<text x="{cx}" y="{cy}" font-family="Arial" font-size="16" fill="#ffffff" text-anchor="middle" opacity="0.7">{}</text>"##,
                escape_xml(&detail)
            );
        }
    }
    out.push_str("</svg>");
    CardMarkup(out)
}

/// Escape text for use in XML character data and attribute values.
///
/// Characters XML 1.0 does not allow (most C0 controls, `U+FFFE`, `U+FFFF`) become `U+FFFD`.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Make text safe inside an XML comment (`--` is not allowed there).
pub(crate) fn escape_comment(input: &str) -> String {
    let mut s = escape_xml(input);
    while s.contains("--") {
        s = s.replace("--", "- -");
    }
    if s.ends_with('-') {
        s.push(' ');
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/render/markup.rs"]
mod tests;
