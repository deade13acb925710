use crate::assets::fetch::AssetFetcher;
use crate::foundation::error::VibeResult;
use crate::model::{AlbumSlot, PostId, SlotGrid};
use crate::pipeline::{CardRenderer, RenderStage};
use crate::render::markup::{CardMarkup, PlaceholderReason};
use crate::render::raster::CardImage;
use crate::store::{ArtifactStore, PostCatalog};

/// What `create_card` persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedCard {
    /// The stored markup.
    pub markup: CardMarkup,
    /// Renderer that produced a real card, `None` for placeholders.
    pub stage: Option<RenderStage>,
    /// Placeholder stored instead of a card, if any.
    pub placeholder: Option<PlaceholderReason>,
    /// Cells showing a cover.
    pub images_embedded: usize,
}

/// Card lifecycle around a store: generate once at post creation, serve many times.
#[derive(Debug)]
pub struct CardService<F, S> {
    renderer: CardRenderer<F>,
    store: S,
}

impl<F: AssetFetcher, S: ArtifactStore> CardService<F, S> {
    /// Service over `renderer` persisting into `store`.
    pub fn new(renderer: CardRenderer<F>, store: S) -> Self {
        Self { renderer, store }
    }

    /// Underlying renderer.
    pub fn renderer(&self) -> &CardRenderer<F> {
        &self.renderer
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate and persist the card for a newly created post.
    ///
    /// Only a store failure is an error. A post without albums stores the "No albums found"
    /// placeholder; albums that cannot be placed store the generation-failure placeholder with the
    /// reason as a detail line.
    #[tracing::instrument(skip_all, fields(post = %post, albums = albums.len()))]
    pub async fn create_card(
        &self,
        post: &PostId,
        albums: &[AlbumSlot],
    ) -> VibeResult<CreatedCard> {
        let opts = self.renderer.opts();
        let created = if albums.is_empty() {
            placeholder_card(
                PlaceholderReason::NoAlbums.document(opts),
                PlaceholderReason::NoAlbums,
            )
        } else {
            match SlotGrid::from_slots(albums) {
                Ok(grid) => {
                    let card = self.renderer.generate(&grid).await;
                    CreatedCard {
                        markup: card.markup,
                        stage: Some(card.stage),
                        placeholder: None,
                        images_embedded: card.images_embedded,
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "albums cannot be placed; storing error card");
                    let reason = PlaceholderReason::GenerationFailed;
                    placeholder_card(reason.document_with_detail(opts, &e.to_string()), reason)
                }
            }
        };

        self.store.put(post, &created.markup)?;
        Ok(created)
    }

    /// Serve the card for `post_id`.
    ///
    /// Never fails: every problem maps to a non-cacheable placeholder. A stored artifact is
    /// exported as-is; a missing or blank one is regenerated from the catalogue without being
    /// persisted.
    #[tracing::instrument(skip(self, catalog))]
    pub async fn read_card<C: PostCatalog + ?Sized>(
        &self,
        post_id: Option<&str>,
        catalog: &C,
    ) -> CardImage {
        let opts = self.renderer.opts();
        let placeholder = |reason: PlaceholderReason| CardImage::placeholder(reason.document(opts));

        let Some(raw) = post_id.filter(|s| !s.trim().is_empty()) else {
            return placeholder(PlaceholderReason::MissingPostId);
        };
        let post = match PostId::parse(raw) {
            Ok(post) => post,
            Err(e) => {
                tracing::debug!(error = %e, "malformed post id");
                return placeholder(PlaceholderReason::PostNotFound);
            }
        };
        let entry = match catalog.lookup(&post) {
            Ok(Some(entry)) => entry,
            Ok(None) => return placeholder(PlaceholderReason::PostNotFound),
            Err(e) => {
                tracing::warn!(error = %e, "post lookup failed");
                return placeholder(PlaceholderReason::Unexpected);
            }
        };

        match self.store.get(&post) {
            Ok(Some(markup)) if !markup.is_blank() => return self.renderer.export(&markup).await,
            Ok(_) => tracing::debug!("no stored artifact; regenerating"),
            Err(e) => tracing::warn!(error = %e, "artifact read failed; regenerating"),
        }

        if entry.albums.is_empty() {
            return placeholder(PlaceholderReason::NoAlbums);
        }
        match SlotGrid::from_slots(&entry.albums) {
            Ok(grid) => {
                let card = self.renderer.generate(&grid).await;
                self.renderer.export(&card.markup).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "regeneration failed");
                placeholder(PlaceholderReason::GenerationFailed)
            }
        }
    }
}

fn placeholder_card(markup: CardMarkup, reason: PlaceholderReason) -> CreatedCard {
    CreatedCard {
        markup,
        stage: None,
        placeholder: Some(reason),
        images_embedded: 0,
    }
}

#[cfg(test)]
#[path = "../tests/unit/service.rs"]
mod tests;
