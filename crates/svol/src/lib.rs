#![warn(missing_docs)]

//! Change the master volume through an external mixer and show a popup with
//! the new level, replacing the previous popup instead of stacking a new one.
//!
//! - [`mixer`]: operations, mixer directives, and status report parsing
//! - [`render`]: popup body text
//! - [`cache`]: the persisted id of the last popup
//! - [`controller`]: the invoke → parse → notify pipeline

pub mod cache;
pub mod controller;
mod error;
pub mod exec;
pub mod mixer;
pub mod notify;
pub mod render;
pub mod settings;
pub mod test_support;

pub use cache::{CacheError, NotificationHandle, NotifyCache};
pub use controller::{Outcome, SkipReason, VolumeController};
pub use error::{Error, Result};
pub use exec::{CommandRunner, SystemRunner};
pub use mixer::{MixerState, ParseError, VolumeOperation};
pub use notify::NotifyError;
pub use settings::Settings;
