/// Convenience result type used across vibecard.
pub type VibeResult<T> = Result<T, VibeError>;

/// Top-level error taxonomy used by the public APIs.
///
/// Pipeline stages return their own narrower error type ([`FetchError`], [`EncodeError`],
/// [`RenderError`], [`ExportError`]); each converts into this enum with `?`.
#[derive(thiserror::Error, Debug)]
pub enum VibeError {
    /// Invalid user-provided input (album slots, options, post ids).
    #[error("validation error: {0}")]
    Validation(String),

    /// A remote asset could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Fetched bytes could not be turned into an embeddable image.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The vector renderer failed for the whole card.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The raster exporter failed for the whole card.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Artifact persistence failed.
    #[error("store error: {0}")]
    Store(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VibeError {
    /// Build a [`VibeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VibeError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

/// Failure to retrieve one remote image. Always carries the offending URL.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("fetch error for '{url}': {kind}")]
pub struct FetchError {
    /// URL that was requested.
    pub url: String,
    /// Classified cause.
    pub kind: FetchErrorKind,
}

impl FetchError {
    /// Build a [`FetchError`] for `url`.
    pub fn new(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Classified cause of a [`FetchError`].
///
/// Callers treat every kind identically; the classification only feeds logs.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The URL was empty or whitespace.
    #[error("empty url")]
    EmptyUrl,
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("network failure: {0}")]
    Network(String),
    /// The request exceeded the configured timeout.
    #[error("timed out")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[error("http status {0}")]
    Status(u16),
    /// The server answered 2xx with no body.
    #[error("empty body")]
    EmptyBody,
    /// The body exceeded the configured size limit.
    #[error("body exceeds {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes.
        limit: u64,
    },
}

/// Failure to turn fetched bytes into an embeddable data URI.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// No bytes to encode.
    #[error("encode error: empty payload")]
    Empty,
    /// Bytes are not PNG, JPEG, GIF or WebP.
    #[error("encode error: unsupported image format (declared '{declared}')")]
    UnsupportedFormat {
        /// Content type the server declared, or `"none"`.
        declared: String,
    },
    /// Bytes carry a known signature but the header cannot be read.
    #[error("encode error: corrupt image: {0}")]
    Corrupt(String),
}

/// Card-wide failure of the primary vector renderer.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The font table could not be loaded or has no faces.
    #[error("render error: font unavailable: {0}")]
    FontUnavailable(String),
    /// The vector engine rejected the layout document.
    #[error("render error: vector engine: {0}")]
    Engine(String),
    /// The engine produced something that is not an SVG document.
    #[error("render error: invalid output: {0}")]
    InvalidOutput(String),
}

impl RenderError {
    /// Build a [`RenderError::FontUnavailable`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }

    /// Build a [`RenderError::InvalidOutput`] value.
    pub fn invalid_output(msg: impl Into<String>) -> Self {
        Self::InvalidOutput(msg.into())
    }
}

/// Card-wide failure of the raster exporter.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ExportError {
    /// The stored markup could not be parsed as SVG.
    #[error("export error: parse svg: {0}")]
    Parse(String),
    /// The document size cannot be rasterized.
    #[error("export error: invalid raster size {width}x{height}")]
    Size {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// PNG encoding failed.
    #[error("export error: png encode: {0}")]
    Encode(String),
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
