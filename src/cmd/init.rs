use crate::data::{EventCatalog, KioskSettings, Persistable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    run_in_dir(&dir)?;
    println!("Data files initialized in {}.", dir.display());
    Ok(())
}

/// Writes the default config, catalog and an empty asset directory into `dir`.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let settings = KioskSettings::default();
    settings.save_to(dir)?;
    EventCatalog::builtin().save_to(dir)?;
    let assets = settings.resolved_asset_dir(dir);
    fs::create_dir_all(&assets)
        .with_context(|| format!("failed to create {}", assets.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_writes_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists());
        assert!(tmp.path().join("events.yaml").exists());
        assert!(tmp.path().join("assets").is_dir());
    }

    #[test]
    fn test_written_files_load_back() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let settings = KioskSettings::load_from(tmp.path()).unwrap();
        assert_eq!(settings, KioskSettings::default());
        let catalog = EventCatalog::load_from(tmp.path()).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.events[1].title, "Operational Landscape");
    }

    #[test]
    fn test_run_in_dir_creates_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("kiosk").join("config");
        run_in_dir(&nested).unwrap();
        assert!(nested.join("events.yaml").exists());
    }
}
