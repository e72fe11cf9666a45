//! Runtime settings read from the environment (and an optional `.env` file).
//!
//! Gameplay constants live with each game; only presentation and I/O knobs
//! are configurable here.

use std::{env, path::PathBuf, time::Duration};

use crate::{Error, Result};

pub const SFX_VOLUME_VAR: &str = "ARCADE_SFX_VOLUME";
pub const MUTE_VAR: &str = "ARCADE_MUTE";
pub const FRAME_MS_VAR: &str = "ARCADE_FRAME_MS";
pub const KEY_HOLD_MS_VAR: &str = "ARCADE_KEY_HOLD_MS";
pub const LOG_FILE_VAR: &str = "ARCADE_LOG_FILE";
pub const LOG_FILTER_VAR: &str = "ARCADE_LOG";

const DEFAULT_FRAME_MS: u64 = 16;
const DEFAULT_KEY_HOLD_MS: u64 = 180;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Effects volume, 0.0 - 1.0
    pub sfx_volume: f32,
    pub muted: bool,
    /// Sleep between frames
    pub frame_interval: Duration,
    /// How long a key counts as held after its last press/repeat when the
    /// terminal does not report releases
    pub key_hold: Duration,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sfx_volume: 1.0,
            muted: false,
            frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
            key_hold: Duration::from_millis(DEFAULT_KEY_HOLD_MS),
            log_file: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(SFX_VOLUME_VAR) {
            let volume: f32 = parse(SFX_VOLUME_VAR, &raw)?;
            if !(0.0..=1.0).contains(&volume) {
                return Err(invalid(SFX_VOLUME_VAR, &raw));
            }
            settings.sfx_volume = volume;
        }

        if let Some(raw) = lookup(MUTE_VAR) {
            settings.muted = parse_bool(MUTE_VAR, &raw)?;
        }

        if let Some(raw) = lookup(FRAME_MS_VAR) {
            let ms: u64 = parse(FRAME_MS_VAR, &raw)?;
            if ms == 0 {
                return Err(invalid(FRAME_MS_VAR, &raw));
            }
            settings.frame_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(KEY_HOLD_MS_VAR) {
            settings.key_hold = Duration::from_millis(parse(KEY_HOLD_MS_VAR, &raw)?);
        }

        settings.log_file = lookup(LOG_FILE_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            settings.log_filter = filter;
        }

        Ok(settings)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, raw)),
    }
}

fn invalid(key: &'static str, raw: &str) -> Error {
    Error::InvalidSetting { key, value: raw.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(settings_from(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let s = settings_from(&[
            (SFX_VOLUME_VAR, "0.25"),
            (MUTE_VAR, "yes"),
            (FRAME_MS_VAR, "33"),
            (KEY_HOLD_MS_VAR, "250"),
            (LOG_FILE_VAR, "/tmp/arcade.log"),
            (LOG_FILTER_VAR, "arcade=debug"),
        ])
        .unwrap();

        assert_eq!(s.sfx_volume, 0.25);
        assert!(s.muted);
        assert_eq!(s.frame_interval, Duration::from_millis(33));
        assert_eq!(s.key_hold, Duration::from_millis(250));
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/arcade.log")));
        assert_eq!(s.log_filter, "arcade=debug");
    }

    #[test]
    fn test_rejects_bad_values() {
        for pair in [
            (SFX_VOLUME_VAR, "1.5"),
            (SFX_VOLUME_VAR, "loud"),
            (MUTE_VAR, "maybe"),
            (FRAME_MS_VAR, "0"),
            (KEY_HOLD_MS_VAR, "-3"),
        ] {
            match settings_from(&[pair]) {
                Err(Error::InvalidSetting { key, .. }) => assert_eq!(key, pair.0),
                other => panic!("expected InvalidSetting for {:?}, got {:?}", pair, other),
            }
        }
    }

    #[test]
    fn test_blank_log_file_is_none() {
        let s = settings_from(&[(LOG_FILE_VAR, "  ")]).unwrap();
        assert_eq!(s.log_file, None);
    }
}
