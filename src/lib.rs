//! vibecard composes nine album covers into a fixed 3x3 "vibe card".
//!
//! A card is generated once, when a post is created, and served many times afterwards:
//!
//! - [`CardRenderer::generate`] fetches and encodes covers concurrently, lays out the grid and
//!   renders a vector document, falling back to a direct builder if the vector engine fails
//! - [`CardService::create_card`] persists that document in an [`ArtifactStore`]
//! - [`CardService::read_card`] exports the stored document as PNG (or serves it as SVG when
//!   rasterization fails), and maps every other outcome to a placeholder image
//!
//! Per-cell failures never fail a card: a cover that cannot be fetched or decoded becomes a
//! translucent placeholder cell.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Remote cover fetching, data-URI encoding and font loading.
pub mod assets;
/// Card rendering options.
pub mod config;
/// Shared geometry, content types and the error taxonomy.
pub mod foundation;
/// Grid layout composer.
pub mod layout;
/// Album slots, card requests and post identifiers.
pub mod model;
/// Concurrent fetch/encode, layout, render and export.
pub mod pipeline;
/// Vector, fallback, placeholder and raster rendering.
pub mod render;
/// Post lifecycle: generate at creation, serve on read.
pub mod service;
/// Artifact stores and the post catalogue seam.
pub mod store;

pub use crate::assets::encode::{EmbeddableImage, encode_embeddable};
pub use crate::assets::fetch::{AssetFetcher, FetchedAsset, HttpFetcher, MemoryFetcher};
pub use crate::assets::font::FontResource;
pub use crate::config::{CardOpts, FetchOpts, FontSource};
pub use crate::foundation::core::{CachePolicy, Canvas, ContentType, Rect, SLOT_COUNT};
pub use crate::foundation::error::{
    EncodeError, ExportError, FetchError, FetchErrorKind, RenderError, VibeError, VibeResult,
};
pub use crate::layout::grid::{CellContent, LayoutCell, LayoutDoc, compose};
pub use crate::model::{AlbumSlot, CardRequest, PostEntry, PostId, SlotGrid};
pub use crate::pipeline::{CardRenderer, GeneratedCard, RenderStage, gather_embeds};
pub use crate::render::fallback::build_direct;
pub use crate::render::markup::{CardMarkup, PlaceholderReason, placeholder_document};
pub use crate::render::raster::{CardBody, CardImage, export_card, rasterize_png};
pub use crate::render::vector::{render_vector, validate_markup};
pub use crate::service::{CardService, CreatedCard};
pub use crate::store::{
    ArtifactStore, FsArtifactStore, MemoryArtifactStore, MemoryPostCatalog, PostCatalog,
};
