use crate::color::Rgb;
use crate::error::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything tunable about the show. Every field has a default, so an
/// empty file (or no file) gives the stock sequence.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub timing: Timing,
    pub photos: Photos,
    pub display: Display,
    pub music: Music,
    /// Fixed seed for a reproducible show.
    pub seed: Option<u64>,
}

/// Phase delays and cadences.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    pub reveal_delay_ms: u64,
    pub tree_duration_ms: u64,
    pub album_duration_secs: f32,
    pub slide_duration_secs: f32,
    pub fireworks_duration_secs: f32,
    pub base_cadence_ms: u64,
    pub blessing_cadence_ms: u64,
    pub blink_count: u32,
    pub blink_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 500,
            tree_duration_ms: 3000,
            album_duration_secs: 30.0,
            slide_duration_secs: 2.0,
            fireworks_duration_secs: 20.0,
            base_cadence_ms: 800,
            blessing_cadence_ms: 1500,
            blink_count: 6,
            blink_interval_ms: 500,
        }
    }
}

impl Timing {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn tree_duration(&self) -> Duration {
        Duration::from_millis(self.tree_duration_ms)
    }

    pub fn album_duration(&self) -> Duration {
        secs(self.album_duration_secs)
    }

    pub fn slide_duration(&self) -> Duration {
        secs(self.slide_duration_secs)
    }

    pub fn fireworks_duration(&self) -> Duration {
        secs(self.fireworks_duration_secs)
    }

    pub fn base_cadence(&self) -> Duration {
        Duration::from_millis(self.base_cadence_ms)
    }

    pub fn blessing_cadence(&self) -> Duration {
        Duration::from_millis(self.blessing_cadence_ms)
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }
}

/// Whole milliseconds, so `1.6` lands exactly on 1600 ms. Negative and NaN
/// give zero, out-of-range values saturate.
fn secs(value: f32) -> Duration {
    Duration::from_millis((f64::from(value) * 1000.0).round() as u64)
}

/// Where the album looks for pictures: `{dir}/{prefix}{n}{extension}`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Photos {
    pub dir: PathBuf,
    pub count: usize,
    pub prefix: String,
    pub extension: String,
}

impl Default for Photos {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            count: 14,
            prefix: "photo".into(),
            extension: ".jpg".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Display {
    /// Background as `RRGGBB`.
    pub bg_color: Option<String>,
    /// Logical pixels per raster pixel.
    pub pixel_scale: f32,
    pub title: String,
    pub blessing: String,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            bg_color: None,
            pixel_scale: 8.0,
            title: "Press any key to open your surprise".into(),
            blessing: "Wishing you every happiness, today and always".into(),
        }
    }
}

impl Display {
    pub fn background(&self) -> Result<Rgb, Error> {
        match &self.bg_color {
            None => Ok(crate::color::BLACK),
            Some(hex) => Rgb::from_hex(hex).ok_or_else(|| Error::InvalidColor(hex.clone())),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Music {
    pub track: Option<PathBuf>,
    pub volume: f32,
}

impl Default for Music {
    fn default() -> Self {
        Self { track: None, volume: 0.7 }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}
