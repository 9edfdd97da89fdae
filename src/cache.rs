// Cookie cache: persists the parsed cookie set to a local JSON file so
// the user can reuse a browser session across runs instead of pasting
// the header string every time.

use crate::cookies::CookieMap;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default cache file, created next to wherever the tool is run.
pub const COOKIE_CACHE_FILE: &str = "saved_cookies.json";

/// On-disk cookie store. The file is a pretty-printed JSON object of
/// string→string pairs and is replaced wholesale on every save.
pub struct CookieCache {
    path: PathBuf,
}

impl CookieCache {
    /// Cache at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CookieCache { path: path.into() }
    }

    /// Cache at the default working-directory path.
    pub fn default_path() -> Self {
        CookieCache::new(COOKIE_CACHE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `cookies` to the cache file, overwriting any previous
    /// contents.
    pub fn save(&self, cookies: &CookieMap) -> Result<()> {
        let json = serde_json::to_string_pretty(cookies)
            .context("Serializing cookies to JSON")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Writing cookie cache {}", self.path.display()))?;
        Ok(())
    }

    /// Read the cache file if it exists. `Ok(None)` means no cache; a
    /// file that exists but does not parse is an error surfaced to the
    /// caller.
    pub fn load(&self) -> Result<Option<CookieMap>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Reading cookie cache {}", self.path.display()))?;
        let cookies: CookieMap = serde_json::from_str(&data)
            .with_context(|| format!("Parsing cookie cache {}", self.path.display()))?;
        Ok(Some(cookies))
    }
}
