//! Session settings assembled from the environment.
//!
//! | variable | effect |
//! |---|---|
//! | `AIRSOFT_CONFIG` | path of a legacy settings file carrying `Audio:<bool>` |
//! | `AIRSOFT_DISABLE_AUDIO` | mute every cue |
//! | `AIRSOFT_NFC_AUTO_UNLOCK` | skip the card step on Hard |
//! | `AIRSOFT_DEV_SKIP` | `*` also jumps the countdown forward |
//! | `AIRSOFT_AUDIO_DIR` | directory holding the cue files |
//!
//! Flags follow the truthy rule of [`is_truthy`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use suitcase_core::GameConfig;
use tracing::{debug, warn};

pub const CONFIG_VAR: &str = "AIRSOFT_CONFIG";
pub const DISABLE_AUDIO_VAR: &str = "AIRSOFT_DISABLE_AUDIO";
pub const NFC_AUTO_UNLOCK_VAR: &str = "AIRSOFT_NFC_AUTO_UNLOCK";
pub const DEV_SKIP_VAR: &str = "AIRSOFT_DEV_SKIP";
pub const AUDIO_DIR_VAR: &str = "AIRSOFT_AUDIO_DIR";

const DEFAULT_AUDIO_DIR: &str = "assets/audio";

/// Values accepted as "on": `1`, `true`, `yes`, `on`, trimmed and
/// case-insensitive. Anything else, including an unset variable, is off.
pub fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Everything the harness needs to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub game: GameConfig,
    pub dev_skip: bool,
    pub audio_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            dev_skip: false,
            audio_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
        }
    }
}

impl Settings {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| is_truthy(lookup(name).as_deref());
        let mut settings = Self::default();

        if let Some(path) = lookup(CONFIG_VAR) {
            settings.game.audio_enabled = read_audio_setting(&path, settings.game.audio_enabled);
        }
        if flag(DISABLE_AUDIO_VAR) {
            settings.game.audio_enabled = false;
        }
        settings.game.hard_mode_auto_unlock = flag(NFC_AUTO_UNLOCK_VAR);
        settings.dev_skip = flag(DEV_SKIP_VAR);
        if let Some(dir) = lookup(AUDIO_DIR_VAR) {
            settings.audio_dir = PathBuf::from(dir);
        }

        debug!(?settings, "settings loaded");
        settings
    }
}

/// Read the `Audio` entry of a legacy settings file.
///
/// The file holds comma-separated `key:value` cells. The first `audio` key
/// (case-insensitive) wins; it is off only for `false`, `0`, `no` or `off`.
/// A missing file, an unreadable file or a file without the key yields
/// `default`.
pub fn read_audio_setting(path: impl AsRef<Path>, default: bool) -> bool {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => parse_audio_setting(&contents).unwrap_or(default),
        Err(e) if e.kind() == io::ErrorKind::NotFound => default,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read settings file");
            default
        }
    }
}

fn parse_audio_setting(contents: &str) -> Option<bool> {
    contents
        .lines()
        .flat_map(|line| line.split(','))
        .find_map(|cell| {
            let (key, value) = cell.split_once(':')?;
            key.trim().eq_ignore_ascii_case("audio").then(|| {
                !matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "false" | "0" | "no" | "off"
                )
            })
        })
}
