use crate::data::persistence::Persistable;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Timings {
    pub card_rotation_ms: u64,
    pub gallery_autoplay_ms: u64,
    pub inactivity_timeout_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            card_rotation_ms: 7_000,
            gallery_autoplay_ms: 5_000,
            inactivity_timeout_ms: 25_000,
        }
    }
}

impl Timings {
    pub fn card_rotation(&self) -> Duration {
        Duration::from_millis(self.card_rotation_ms)
    }

    pub fn gallery_autoplay(&self) -> Duration {
        Duration::from_millis(self.gallery_autoplay_ms)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KioskSettings {
    pub title: String,
    pub subtitle: String,
    pub logo: Option<String>,
    /// Where the Back control on the carousel sends the kiosk.
    pub back_destination: String,
    /// Image references are resolved below this directory. Relative paths
    /// are taken from the data directory.
    pub asset_dir: PathBuf,
    /// Width of one terminal cell in px, used to turn columns into a viewport width.
    pub cell_width_px: f32,
    pub swipe_threshold_px: f32,
    pub timings: Timings,
}

impl Default for KioskSettings {
    fn default() -> Self {
        KioskSettings {
            title: "Pictorial Glimpses".to_string(),
            subtitle: "Event Highlights".to_string(),
            logo: Some("/logo.png".to_string()),
            back_destination: "/history".to_string(),
            asset_dir: PathBuf::from("assets"),
            cell_width_px: 10.0,
            swipe_threshold_px: 50.0,
            timings: Timings::default(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsWrapper {
    #[serde(default)]
    pub(crate) settings: KioskSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl KioskSettings {
    pub fn load_from(dir: &Path) -> Result<Self> {
        let settings = SettingsWrapper::load_from(dir)?.settings;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsWrapper {
            settings: self.clone(),
        }
        .save_to(dir)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.timings;
        if t.card_rotation_ms == 0 || t.gallery_autoplay_ms == 0 || t.inactivity_timeout_ms == 0 {
            bail!("timings must be greater than zero: {t:?}");
        }
        if !(self.cell_width_px > 0.0) {
            bail!("cell_width_px must be positive, got {}", self.cell_width_px);
        }
        if !(self.swipe_threshold_px > 0.0) {
            bail!(
                "swipe_threshold_px must be positive, got {}",
                self.swipe_threshold_px
            );
        }
        Ok(())
    }

    pub fn resolved_asset_dir(&self, data_dir: &Path) -> PathBuf {
        if self.asset_dir.is_absolute() {
            self.asset_dir.clone()
        } else {
            data_dir.join(&self.asset_dir)
        }
    }
}
