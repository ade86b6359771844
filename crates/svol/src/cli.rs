//! Command-line interface definitions for svol.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logging::LogArgs;
use svol::{Settings, VolumeOperation, settings::expand_home};

/// Command-line interface for the `svol` binary.
#[derive(Parser, Debug)]
#[command(
    name = "svol",
    about = "Change master volume and send notification.",
    version
)]
pub struct Cli {
    /// Logging controls.
    #[command(flatten)]
    pub log: LogArgs,

    /// Path to a RON config file (default: ~/.config/svol/config.ron when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the notification id cache file.
    #[arg(long, global = true, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Override the mixer program.
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub mixer: Option<String>,

    /// Override the notification program.
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub notifier: Option<String>,

    /// What to do with the volume.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(path) = &self.cache {
            settings.cache_path = expand_home(path);
        }
        if let Some(mixer) = &self.mixer {
            settings.mixer.clone_from(mixer);
        }
        if let Some(notifier) = &self.notifier {
            settings.notifier.clone_from(notifier);
        }
    }
}

/// Volume commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// mute the sounds
    Mute,
    /// unmute the sounds
    Unmute,
    /// toggle mute
    Toggle,
    /// rise the volume
    Up {
        /// percent to upper the volume
        #[arg(value_name = "V")]
        percent: u32,
    },
    /// low the volume
    Down {
        /// percent to lower the volume
        #[arg(value_name = "V")]
        percent: u32,
    },
}

impl Commands {
    /// The volume operation this command requests.
    pub fn operation(self) -> VolumeOperation {
        match self {
            Self::Mute => VolumeOperation::Mute,
            Self::Unmute => VolumeOperation::Unmute,
            Self::Toggle => VolumeOperation::ToggleMute,
            Self::Up { percent } => VolumeOperation::Raise(percent),
            Self::Down { percent } => VolumeOperation::Lower(percent),
        }
    }
}
