//! Apply a volume operation and show the result.
//!
//! Every operation runs the same pipeline: invoke the mixer, parse its report,
//! then show (or replace) the volume popup. Only the mixer step can fail the
//! operation; the rest degrades to "volume changed, no popup".

use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    cache::NotifyCache,
    exec::CommandRunner,
    mixer::{self, Directive, MixerState, ParseError, VolumeOperation},
    notify::{self, Notification, NotifyError},
    render,
    settings::Settings,
};

/// Why no notification was attempted.
#[derive(Debug)]
pub enum SkipReason {
    /// The mixer report could not be parsed.
    Unparsed(ParseError),
    /// The report carried no volume percentage.
    NoPercent,
}

/// What happened after the volume was changed.
#[derive(Debug)]
pub enum Outcome {
    /// A popup was shown.
    Notified {
        /// Id printed by the notifier.
        id: String,
        /// Whether an earlier popup was replaced in place.
        replaced: bool,
    },
    /// No popup was attempted.
    Skipped(SkipReason),
    /// The notifier failed.
    NotifyFailed(NotifyError),
}

/// Drives the mixer and notifier for one invocation.
#[derive(Debug)]
pub struct VolumeController<R> {
    /// Process runner for both collaborators.
    runner: R,
    /// Programs, channel, and rendering parameters.
    settings: Settings,
    /// Last-notification store.
    cache: NotifyCache,
}

impl<R: CommandRunner> VolumeController<R> {
    /// A controller using `settings`, with the cache at `settings.cache_path`.
    pub fn new(runner: R, settings: Settings) -> Self {
        let cache = NotifyCache::new(&settings.cache_path, settings.freshness_window());
        Self {
            runner,
            settings,
            cache,
        }
    }

    /// The process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The notification cache.
    pub fn cache(&self) -> &NotifyCache {
        &self.cache
    }

    /// Switch playback off.
    pub fn mute(&self) -> Result<Outcome> {
        self.apply(VolumeOperation::Mute)
    }

    /// Switch playback on.
    pub fn unmute(&self) -> Result<Outcome> {
        self.apply(VolumeOperation::Unmute)
    }

    /// Flip the playback switch.
    pub fn toggle_mute(&self) -> Result<Outcome> {
        self.apply(VolumeOperation::ToggleMute)
    }

    /// Raise the volume by `percent`.
    pub fn raise(&self, percent: u32) -> Result<Outcome> {
        self.apply(VolumeOperation::Raise(percent))
    }

    /// Lower the volume by `percent`.
    pub fn lower(&self, percent: u32) -> Result<Outcome> {
        self.apply(VolumeOperation::Lower(percent))
    }

    /// Run `op` through the mixer, then notify.
    pub fn apply(&self, op: VolumeOperation) -> Result<Outcome> {
        let report = self.invoke(op.directive())?;
        info!(?op, "volume changed");
        let state = match mixer::parse(&report) {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "could not read volume from mixer output");
                return Ok(Outcome::Skipped(SkipReason::Unparsed(err)));
            }
        };
        Ok(self.notify(state))
    }

    /// Run `<mixer> sset <channel> <directive>` and return its combined output.
    fn invoke(&self, directive: Directive) -> Result<String> {
        let program = &self.settings.mixer;
        let args = vec![
            "sset".to_string(),
            self.settings.channel.clone(),
            directive.to_string(),
        ];
        debug!(program, ?args, "invoking mixer");
        let captured = self
            .runner
            .run(program, &args)
            .map_err(|source| Error::MixerStart {
                program: program.clone(),
                source,
            })?;
        let output = captured.combined();
        if !captured.success() {
            return Err(Error::MixerFailed {
                program: program.clone(),
                code: captured.code,
                output,
            });
        }
        Ok(output)
    }

    /// Show the popup for `state`, replacing the previous one when still fresh.
    fn notify(&self, state: MixerState) -> Outcome {
        let Some(percent) = state.percent else {
            debug!("mixer reported no volume, skipping notification");
            return Outcome::Skipped(SkipReason::NoPercent);
        };
        let body = render::body(
            percent,
            state.muted.unwrap_or(false),
            self.settings.bar_width,
            self.settings.fill,
        );
        let previous = self.cache.read();
        let popup = Notification {
            title: &self.settings.title,
            body: &body,
            duration_ms: self.settings.display_duration_ms,
            replace_id: previous.as_ref().map(|h| h.id.as_str()),
        };
        let id = match notify::send(&self.runner, &self.settings.notifier, &popup) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "notification failed");
                return Outcome::NotifyFailed(err);
            }
        };
        if let Err(err) = self.cache.write(&id) {
            warn!(error = %err, path = %self.cache.path().display(), "could not store notification id");
        }
        Outcome::Notified {
            id,
            replaced: previous.is_some(),
        }
    }
}
