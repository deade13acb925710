use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::SLOT_COUNT;
use crate::foundation::error::{VibeError, VibeResult};

/// One album placed on a card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlbumSlot {
    /// 1-based grid position (`1..=9`). `0` in JSON input means "assign from list order".
    #[serde(default)]
    pub position: u8,
    /// Album title.
    pub name: String,
    /// Artist name.
    pub artist: String,
    /// Remote cover URL, if the catalogue has one.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AlbumSlot {
    /// Build a slot without a cover URL.
    pub fn new(position: u8, name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            artist: artist.into(),
            image_url: None,
        }
    }

    /// Attach a cover URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Cover URL, or `None` when absent or blank.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Human-readable `name / artist` label.
    pub fn label(&self) -> String {
        format!("{} / {}", self.name, self.artist)
    }

    /// Assign positions `1..=9` from list order, keeping at most nine albums.
    pub fn sequence(albums: impl IntoIterator<Item = AlbumSlot>) -> Vec<AlbumSlot> {
        let mut out = Vec::with_capacity(SLOT_COUNT);
        let mut dropped = 0usize;
        for (i, mut album) in albums.into_iter().enumerate() {
            if i >= SLOT_COUNT {
                dropped += 1;
                continue;
            }
            album.position = (i + 1) as u8;
            out.push(album);
        }
        if dropped > 0 {
            tracing::warn!(dropped, "more than {SLOT_COUNT} albums supplied; extra albums ignored");
        }
        out
    }
}

/// Give albums without a position (`0`) the lowest free positions, in list order.
///
/// Explicit positions are kept as given, so duplicates and out-of-range values still reach
/// [`SlotGrid::from_slots`]. Unpositioned albums left without a free cell are dropped.
fn fill_positions(albums: Vec<AlbumSlot>) -> Vec<AlbumSlot> {
    let mut taken = [false; SLOT_COUNT];
    for album in &albums {
        let cell = usize::from(album.position).checked_sub(1);
        if let Some(t) = cell.and_then(|c| taken.get_mut(c)) {
            *t = true;
        }
    }

    let mut free = (1..=SLOT_COUNT).filter(|p| !taken[p - 1]);
    let mut out = Vec::with_capacity(albums.len());
    let mut dropped = 0usize;
    for mut album in albums {
        if album.position == 0 {
            match free.next() {
                Some(p) => album.position = p as u8,
                None => {
                    dropped += 1;
                    continue;
                }
            }
        }
        out.push(album);
    }
    if dropped > 0 {
        tracing::warn!(dropped, "no free cell for unpositioned albums; extra albums ignored");
    }
    out
}

/// Input handed to the core by the post-creation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardRequest {
    /// Display title. Not drawn into the card.
    #[serde(default)]
    pub title: Option<String>,
    /// Author display name. Not drawn into the card.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Albums in display order.
    #[serde(default)]
    pub albums: Vec<AlbumSlot>,
}

impl CardRequest {
    /// Parse a request from a JSON reader.
    ///
    /// Albums with `position` omitted (or `0`) take the free cells in list order; explicit
    /// positions are left untouched.
    pub fn from_reader<R: std::io::Read>(r: R) -> VibeResult<Self> {
        let mut req: Self = serde_json::from_reader(r)
            .map_err(|e| VibeError::validation(format!("parse card request JSON: {e}")))?;
        if req.albums.iter().any(|a| a.position == 0) {
            req.albums = fill_positions(std::mem::take(&mut req.albums));
        }
        Ok(req)
    }

    /// Parse a request from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VibeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VibeError::validation(format!("open card request JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// The nine cells of a card, each either holding an album or empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotGrid {
    cells: [Option<AlbumSlot>; SLOT_COUNT],
}

impl SlotGrid {
    /// A grid with every cell empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Place albums by their 1-based `position`.
    ///
    /// Gaps are allowed. Positions outside `1..=9` and duplicate positions are rejected.
    pub fn from_slots(slots: &[AlbumSlot]) -> VibeResult<Self> {
        let mut grid = Self::empty();
        for slot in slots {
            let pos = usize::from(slot.position);
            if !(1..=SLOT_COUNT).contains(&pos) {
                return Err(VibeError::validation(format!(
                    "album '{}' has position {pos}; positions must be within 1..={SLOT_COUNT}",
                    slot.name
                )));
            }
            let cell = &mut grid.cells[pos - 1];
            if cell.is_some() {
                return Err(VibeError::validation(format!(
                    "duplicate album position {pos}"
                )));
            }
            *cell = Some(slot.clone());
        }
        Ok(grid)
    }

    /// Album at 0-based cell `index`.
    pub fn get(&self, index: usize) -> Option<&AlbumSlot> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&AlbumSlot>)> {
        self.cells.iter().enumerate().map(|(i, c)| (i, c.as_ref()))
    }

    /// Number of cells holding an album.
    pub fn album_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// `true` when no cell holds an album.
    pub fn is_empty(&self) -> bool {
        self.album_count() == 0
    }
}

/// Identifier of a published post, safe to use as a file name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(String);

impl PostId {
    /// Longest accepted id.
    pub const MAX_LEN: usize = 128;

    /// Validate `raw` as a post id: 1..=128 characters from `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> VibeResult<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(VibeError::validation("post id must be non-empty"));
        }
        if id.len() > Self::MAX_LEN {
            return Err(VibeError::validation(format!(
                "post id must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(VibeError::validation(format!(
                "post id '{id}' contains characters outside [A-Za-z0-9_-]"
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the post catalogue knows about one post.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostEntry {
    /// Display title.
    pub title: Option<String>,
    /// Albums linked to the post, by position.
    pub albums: Vec<AlbumSlot>,
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
