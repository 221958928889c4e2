//! Application settings
//!
//! Persisted as pretty JSON in a user-chosen file. Missing fields take their
//! defaults and out-of-range values are pulled back into range on load.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::consts::{MAX_TICKS_PER_FRAME, TICK_MS};
use crate::persistence::atomic;
use crate::registry::SimKind;
use crate::renderer::Viewport;
use crate::sim::FixedClock;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Ticks run per host frame before the rest is deferred
    pub max_ticks_per_frame: u32,
    /// Directory for CSV exports
    pub export_dir: PathBuf,
    /// Simulation selected at startup
    pub default_simulation: SimKind,
    /// Drawing area
    pub viewport: Viewport,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_MS,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
            export_dir: PathBuf::from("."),
            default_simulation: SimKind::Pendulum,
            viewport: Viewport::default(),
        }
    }
}

impl Settings {
    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    /// Write to `path` atomically
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source: io::Error| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        atomic::write(path, json.as_bytes()).map_err(write_err)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Pull every field back into its valid range
    pub fn sanitized(mut self) -> Self {
        self.tick_interval_ms = self.tick_interval_ms.max(1);
        self.max_ticks_per_frame = self.max_ticks_per_frame.max(1);
        self.viewport = Viewport::new(self.viewport.width, self.viewport.height);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Fresh clock for one simulation instance
    pub fn clock(&self) -> FixedClock {
        FixedClock::new(self.tick_interval(), self.max_ticks_per_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.json");
        let settings = Settings {
            tick_interval_ms: 20,
            default_simulation: SimKind::Optics,
            viewport: Viewport::new(1024.0, 768.0),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_sanitizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "tick_interval_ms": 0, "viewport": { "width": 0, "height": 300 } }"#)
            .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.tick_interval_ms, 1);
        assert_eq!(settings.viewport, Viewport::new(1.0, 300.0));
        assert_eq!(settings.max_ticks_per_frame, MAX_TICKS_PER_FRAME);
        assert_eq!(settings.default_simulation, SimKind::Pendulum);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_clock_uses_interval() {
        let settings = Settings {
            tick_interval_ms: 10,
            ..Settings::default()
        };
        assert_eq!(settings.clock().interval(), Duration::from_millis(10));
    }
}
