use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::core::{Canvas, DEFAULT_CELL_PX};
use crate::foundation::error::{VibeError, VibeResult};

/// Rendering options for a vibe card.
///
/// Every field has a documented default, so a JSON file only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardOpts {
    /// Card background behind the grid. Default `#1a1a1a`.
    pub background_color: String,
    /// Cell edge length in logical units. Default `300` (canvas `900x900`).
    pub cell_px: u32,
    /// Fill colour of empty cells. Default `#ffffff`.
    pub placeholder_fill: String,
    /// Fill opacity of empty cells, `0.0..=1.0`. Default `0.05`.
    pub placeholder_opacity: f32,
    /// Where the renderer's font table comes from. Default [`FontSource::System`].
    pub font: FontSource,
    /// Remote fetch limits.
    pub fetch: FetchOpts,
}

impl Default for CardOpts {
    fn default() -> Self {
        Self {
            background_color: "#1a1a1a".to_string(),
            cell_px: DEFAULT_CELL_PX,
            placeholder_fill: "#ffffff".to_string(),
            placeholder_opacity: 0.05,
            font: FontSource::default(),
            fetch: FetchOpts::default(),
        }
    }
}

impl CardOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VibeResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| VibeError::validation(format!("parse card options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VibeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VibeError::validation(format!("open card options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Canvas covered by the grid.
    pub fn canvas(&self) -> Canvas {
        Canvas::for_grid(self.cell_px)
    }

    /// Reject options that would produce a malformed card.
    pub fn validate(&self) -> VibeResult<()> {
        if self.cell_px == 0 {
            return Err(VibeError::validation("cell_px must be > 0"));
        }
        if self.cell_px > 4096 {
            return Err(VibeError::validation("cell_px must be <= 4096"));
        }
        validate_color("background_color", &self.background_color)?;
        validate_color("placeholder_fill", &self.placeholder_fill)?;
        if !self.placeholder_opacity.is_finite() || !(0.0..=1.0).contains(&self.placeholder_opacity)
        {
            return Err(VibeError::validation(
                "placeholder_opacity must be finite and within 0..=1",
            ));
        }
        self.fetch.validate()
    }
}

fn validate_color(field: &str, value: &str) -> VibeResult<()> {
    let v = value.trim();
    if v.is_empty() {
        return Err(VibeError::validation(format!("{field} must be non-empty")));
    }
    if v.contains(['"', '<', '>', '&']) {
        return Err(VibeError::validation(format!(
            "{field} contains characters not allowed in a colour: '{v}'"
        )));
    }
    Ok(())
}

/// Source of the font table handed to the vector renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FontSource {
    /// Fonts installed on the host.
    #[default]
    System,
    /// A font file, or a directory of `.ttf`/`.otf`/`.ttc` files.
    File {
        /// Filesystem path.
        path: PathBuf,
    },
    /// A font downloaded through the configured fetcher.
    Url {
        /// Absolute URL.
        url: String,
    },
}

/// Limits applied to every remote fetch.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FetchOpts {
    /// Per-request timeout in milliseconds. Default `5000`.
    pub timeout_ms: u64,
    /// Largest accepted body in bytes. Default 10 MiB.
    pub max_body_bytes: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for FetchOpts {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_body_bytes: 10 * 1024 * 1024,
            user_agent: concat!("vibecard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchOpts {
    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> VibeResult<()> {
        if self.timeout_ms == 0 {
            return Err(VibeError::validation("fetch.timeout_ms must be > 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(VibeError::validation("fetch.max_body_bytes must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
