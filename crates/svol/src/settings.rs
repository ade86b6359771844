//! Runtime settings: built-in defaults, optionally overridden by a RON file.
//!
//! The file lives at `~/.config/svol/config.ron` unless `--config` names
//! another one. A broken default file is logged and ignored; a broken
//! `--config` file is an error. Every field is optional:
//!
//! ```ron
//! (
//!     mixer: "amixer",
//!     channel: "Master",
//!     notifier: "notify-send.sh",
//!     display_duration_ms: 3000,
//!     freshness_factor: 2,
//!     cache_path: "~/.cache/svol/notify_id",
//! )
//! ```

use std::{
    env, fs,
    path::{Path, PathBuf},
    result::Result as StdResult,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Directory name used under the cache and config roots.
pub const APP_NAME: &str = "svol";
/// Mixer program.
pub const DEFAULT_MIXER: &str = "amixer";
/// Mixer channel to adjust.
pub const DEFAULT_CHANNEL: &str = "Master";
/// Notification program.
pub const DEFAULT_NOTIFIER: &str = "notify-send.sh";
/// Notification title.
pub const DEFAULT_TITLE: &str = "Volume:";
/// How long the notification stays on screen.
pub const DISPLAY_DURATION_MS: u64 = 3000;
/// A cached notification id is reused for this many display durations.
pub const FRESHNESS_FACTOR: u32 = 2;
/// Interior width of the volume bar.
pub const BAR_WIDTH: usize = 37;
/// Character the volume bar is filled with.
pub const BAR_FILL: char = '=';
/// Widest bar a config file may ask for.
pub const MAX_BAR_WIDTH: usize = 1000;

/// Everything an invocation needs to know about its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Mixer program, invoked as `<mixer> sset <channel> <directive>`.
    pub mixer: String,
    /// Mixer channel.
    pub channel: String,
    /// Notification program.
    pub notifier: String,
    /// Notification title.
    pub title: String,
    /// Display duration passed to the notifier, in milliseconds.
    pub display_duration_ms: u64,
    /// Multiple of the display duration during which a cached id is reused.
    ///
    /// Assumes the notification daemon dismisses popups after the display
    /// duration; tune it when the daemon keeps them longer.
    pub freshness_factor: u32,
    /// Interior width of the volume bar.
    pub bar_width: usize,
    /// Bar fill character.
    pub fill: char,
    /// Where the last notification id is stored. `~` expands to `$HOME`.
    pub cache_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mixer: DEFAULT_MIXER.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            notifier: DEFAULT_NOTIFIER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            display_duration_ms: DISPLAY_DURATION_MS,
            freshness_factor: FRESHNESS_FACTOR,
            bar_width: BAR_WIDTH,
            fill: BAR_FILL,
            cache_path: default_cache_path(),
        }
    }
}

impl Settings {
    /// Load settings from `explicit`, or from the default config path.
    ///
    /// An explicit path was asked for on the command line, so a missing or
    /// broken file is an error. The default file is optional: see
    /// [`load_or_default`](Self::load_or_default).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(&expand_home(path)),
            None => Ok(Self::load_or_default(&default_config_path())),
        }
    }

    /// Load `path` if it exists, falling back to the defaults otherwise.
    ///
    /// An unreadable or malformed file is logged and ignored, so a typo in the
    /// config never stops the volume keys from working.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        Self::load_file(path).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring config file, using defaults");
            Self::default()
        })
    }

    /// Read and parse the config file at `path`.
    fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings = Self::from_ron(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    /// Parse settings from RON text; fields not mentioned keep their defaults.
    pub fn from_ron(text: &str) -> StdResult<Self, String> {
        let mut settings: Self = ron::from_str(text).map_err(|e| e.to_string())?;
        if settings.bar_width > MAX_BAR_WIDTH {
            return Err(format!(
                "bar_width {} exceeds the maximum of {MAX_BAR_WIDTH}",
                settings.bar_width
            ));
        }
        settings.cache_path = expand_home(&settings.cache_path);
        Ok(settings)
    }

    /// How long the notification stays on screen.
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_duration_ms)
    }

    /// Age up to which a cached notification id may be reused.
    pub fn freshness_window(&self) -> Duration {
        self.display_duration().saturating_mul(self.freshness_factor)
    }
}

/// The user's home directory, empty when `HOME` is unset.
fn home_dir() -> PathBuf {
    PathBuf::from(env::var_os("HOME").unwrap_or_default())
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Default cache file (`~/.cache/svol/notify_id`).
pub fn default_cache_path() -> PathBuf {
    let mut p = home_dir();
    p.push(".cache");
    p.push(APP_NAME);
    p.push("notify_id");
    p
}

/// Default config file (`~/.config/svol/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = home_dir();
    p.push(".config");
    p.push(APP_NAME);
    p.push("config.ron");
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unique_tmp_dir;

    #[test]
    fn defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.mixer, "amixer");
        assert_eq!(s.channel, "Master");
        assert_eq!(s.notifier, "notify-send.sh");
        assert_eq!(s.title, "Volume:");
        assert_eq!(s.freshness_window(), Duration::from_millis(6000));
        assert!(s.cache_path.ends_with(".cache/svol/notify_id"));
    }

    #[test]
    fn partial_ron_overrides_fields() {
        let s = Settings::from_ron(
            r#"(mixer: "/usr/bin/amixer", display_duration_ms: 1500, cache_path: "/tmp/x/id")"#,
        )
        .unwrap();
        assert_eq!(s.mixer, "/usr/bin/amixer");
        assert_eq!(s.channel, "Master");
        assert_eq!(s.freshness_window(), Duration::from_millis(3000));
        assert_eq!(s.cache_path, PathBuf::from("/tmp/x/id"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Settings::from_ron("(volume: 3)").unwrap_err();
        assert!(err.contains("volume"), "{err}");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = home_dir();
        assert_eq!(expand_home(Path::new("~/a/b")), home.join("a/b"));
        assert_eq!(expand_home(Path::new("/a/~")), PathBuf::from("/a/~"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = unique_tmp_dir("settings");
        let path = dir.join("config.ron");
        fs::write(&path, "(channel: \"PCM\", fill: '#')").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.channel, "PCM");
        assert_eq!(s.fill, '#');
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_fails_for_missing_or_broken_explicit_file() {
        let dir = unique_tmp_dir("settings-bad");
        let missing = dir.join("missing.ron");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(Error::Config { .. })
        ));
        let broken = dir.join("broken.ron");
        fs::write(&broken, "(mixer: ").unwrap();
        assert!(matches!(
            Settings::load(Some(&broken)),
            Err(Error::Config { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn oversized_bar_width_is_rejected() {
        let err = Settings::from_ron("(bar_width: 100000000000000000)").unwrap_err();
        assert!(err.contains("bar_width"), "{err}");
        let s = Settings::from_ron(&format!("(bar_width: {MAX_BAR_WIDTH})")).unwrap();
        assert_eq!(s.bar_width, MAX_BAR_WIDTH);
    }

    #[test]
    fn default_config_problems_fall_back_to_defaults() {
        let dir = unique_tmp_dir("settings-default");
        let path = dir.join("config.ron");
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        fs::write(&path, "(mixer: ").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        fs::write(&path, "(bar_width: 100000000000000000)").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        fs::write(&path, "(mixer: \"/opt/amixer\")").unwrap();
        assert_eq!(Settings::load_or_default(&path).mixer, "/opt/amixer");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_without_explicit_path_never_fails() {
        assert!(Settings::load(None).is_ok());
    }
}
