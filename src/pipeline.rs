use futures::future::join_all;
use tokio::sync::OnceCell;

use crate::assets::encode::{EmbeddableImage, encode_embeddable};
use crate::assets::fetch::{AssetFetcher, HttpFetcher};
use crate::assets::font::FontResource;
use crate::config::CardOpts;
use crate::foundation::error::{RenderError, VibeResult};
use crate::layout::grid::compose;
use crate::model::SlotGrid;
use crate::render::fallback::build_direct;
use crate::render::markup::CardMarkup;
use crate::render::raster::{CardImage, export_card};
use crate::render::vector::render_vector;

/// Which renderer produced a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStage {
    /// The vector engine.
    Primary,
    /// The direct string builder, after the vector engine failed.
    Fallback,
}

/// Result of one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedCard {
    /// Card markup, ready to persist.
    pub markup: CardMarkup,
    /// Renderer that produced `markup`.
    pub stage: RenderStage,
    /// Number of cells that show a cover.
    pub images_embedded: usize,
}

/// Runs the card pipeline: fetch and encode covers concurrently, lay out the grid, render the
/// vector document (falling back to the direct builder), and export it.
///
/// The font table is loaded on first use and kept for the renderer's lifetime.
#[derive(Debug)]
pub struct CardRenderer<F> {
    opts: CardOpts,
    fetcher: F,
    font: OnceCell<FontResource>,
}

impl CardRenderer<HttpFetcher> {
    /// Renderer fetching over HTTP with the limits in `opts.fetch`.
    pub fn with_http(opts: CardOpts) -> VibeResult<Self> {
        let fetcher = HttpFetcher::new(&opts.fetch)?;
        Self::new(opts, fetcher)
    }
}

impl<F: AssetFetcher> CardRenderer<F> {
    /// Build a renderer; `opts` are validated here.
    pub fn new(opts: CardOpts, fetcher: F) -> VibeResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            fetcher,
            font: OnceCell::new(),
        })
    }

    /// Options this renderer was built with.
    pub fn opts(&self) -> &CardOpts {
        &self.opts
    }

    /// Fetcher used for covers and remote fonts.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Font table, loaded on first call. A failed load is retried on the next call.
    pub async fn font(&self) -> Result<&FontResource, RenderError> {
        self.font
            .get_or_try_init(|| FontResource::load(&self.opts.font, &self.fetcher))
            .await
    }

    /// Produce the card markup for `grid`. Never fails: per-cell problems become placeholders and
    /// a card-wide renderer failure switches to the direct builder.
    #[tracing::instrument(skip_all, fields(albums = grid.album_count()))]
    pub async fn generate(&self, grid: &SlotGrid) -> GeneratedCard {
        let embeds = gather_embeds(&self.fetcher, grid).await;
        let images_embedded = embeds.iter().flatten().count();

        let primary = match self.font().await {
            Ok(font) => render_vector(&compose(grid, &embeds, &self.opts), font),
            Err(e) => Err(e),
        };

        let (markup, stage) = match primary {
            Ok(markup) => (markup, RenderStage::Primary),
            Err(e) => {
                tracing::warn!(error = %e, "vector renderer failed; building card directly");
                (build_direct(grid, &embeds, &self.opts), RenderStage::Fallback)
            }
        };

        tracing::info!(?stage, images_embedded, "card generated");
        GeneratedCard {
            markup,
            stage,
            images_embedded,
        }
    }

    /// Rasterize stored markup, serving the markup itself if rasterization fails.
    pub async fn export(&self, markup: &CardMarkup) -> CardImage {
        let font = match self.font().await {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::debug!(error = %e, "exporting without a font table");
                None
            }
        };
        export_card(markup, font)
    }
}

/// Fetch and encode every cover of `grid` concurrently.
///
/// Returns one entry per cell (always nine). A cell without an album or URL, or whose fetch or
/// encode fails, yields `None`; failures are logged and never affect other cells.
pub async fn gather_embeds<F: AssetFetcher + ?Sized>(
    fetcher: &F,
    grid: &SlotGrid,
) -> Vec<Option<EmbeddableImage>> {
    let tasks = grid.iter().map(|(index, album)| async move {
        let url = album?.image_url()?;
        let asset = match fetcher.fetch(url).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(cell = index, error = %e, "cover fetch failed; using placeholder");
                return None;
            }
        };
        match encode_embeddable(&asset.bytes, asset.content_type.as_deref()) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(
                    cell = index,
                    url,
                    error = %e,
                    "cover encode failed; using placeholder"
                );
                None
            }
        }
    });
    join_all(tasks).await
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
