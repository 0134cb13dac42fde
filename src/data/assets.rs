use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// An image reference that resolved to something displayable.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub path: PathBuf,
    pub bytes: u64,
}

impl Asset {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

pub trait AssetSource {
    fn resolve(&self, reference: &str) -> Result<Asset>;
}

/// Resolves `/name.png` style references against a directory on disk.
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: PathBuf) -> Self {
        AssetDir { root }
    }
}

impl AssetSource for AssetDir {
    fn resolve(&self, reference: &str) -> Result<Asset> {
        let relative = Path::new(reference.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            bail!("empty image reference");
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("image reference {reference} leaves the asset directory");
        }
        let path = self.root.join(relative);
        let meta = fs::metadata(&path)
            .with_context(|| format!("cannot resolve {}", path.display()))?;
        if !meta.is_file() {
            bail!("{} is not a file", path.display());
        }
        Ok(Asset {
            path,
            bytes: meta.len(),
        })
    }
}

/// Remembers every resolution for the session. A failed reference is
/// reported once and then shown as a placeholder.
pub struct AssetCache {
    source: Box<dyn AssetSource>,
    resolved: HashMap<String, Option<Asset>>,
}

impl AssetCache {
    pub fn new(source: Box<dyn AssetSource>) -> Self {
        AssetCache {
            source,
            resolved: HashMap::new(),
        }
    }

    pub fn get(&mut self, reference: &str) -> Option<&Asset> {
        if !self.resolved.contains_key(reference) {
            let outcome = match self.source.resolve(reference) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!(reference, error = %e, "image unavailable, showing placeholder");
                    None
                }
            };
            self.resolved.insert(reference.to_string(), outcome);
        }
        self.resolved.get(reference).and_then(|a| a.as_ref())
    }
}
