use std::path::Path;
use std::sync::Arc;

use crate::assets::fetch::AssetFetcher;
use crate::config::FontSource;
use crate::foundation::error::RenderError;

/// Font table handed to the vector renderer and the raster exporter.
///
/// Cheap to clone; the underlying database is shared.
#[derive(Clone, Debug)]
pub struct FontResource {
    db: Arc<usvg::fontdb::Database>,
}

impl FontResource {
    /// Load fonts from `source`, fetching remote fonts through `fetcher`.
    #[tracing::instrument(skip(fetcher))]
    pub async fn load<F: AssetFetcher + ?Sized>(
        source: &FontSource,
        fetcher: &F,
    ) -> Result<Self, RenderError> {
        match source {
            FontSource::System => Self::system(),
            FontSource::File { path } => Self::from_path(path),
            FontSource::Url { url } => {
                let asset = fetcher
                    .fetch(url)
                    .await
                    .map_err(|e| RenderError::font(e.to_string()))?;
                Self::from_bytes(asset.bytes)
            }
        }
    }

    /// Fonts installed on the host.
    pub fn system() -> Result<Self, RenderError> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::finish(db, "system fonts")
    }

    /// A single font file held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes);
        Self::finish(db, "font data")
    }

    /// A font file, or every `.ttf`/`.otf`/`.ttc` file directly inside a directory.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let mut db = usvg::fontdb::Database::new();
        if path.is_dir() {
            load_fonts_from_dir(&mut db, path);
        } else {
            db.load_font_file(path).map_err(|e| {
                RenderError::font(format!("read font file '{}': {e}", path.display()))
            })?;
        }
        Self::finish(db, &path.display().to_string())
    }

    fn finish(db: usvg::fontdb::Database, origin: &str) -> Result<Self, RenderError> {
        if db.is_empty() {
            return Err(RenderError::font(format!("no font faces found in {origin}")));
        }
        tracing::debug!(faces = db.len(), origin, "font table loaded");
        Ok(Self { db: Arc::new(db) })
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Distinct family names, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .db
            .faces()
            .flat_map(|f| f.families.iter().map(|(name, _)| name.clone()))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Shared database for `usvg::Options::fontdb`.
    pub fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.db)
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
