//! Volume operations, mixer directives, and parsing of the mixer status report.

use std::fmt;

use thiserror::Error;

/// Zero-based index of the status line carrying the first channel's levels.
pub const STATUS_LINE: usize = 5;
/// Whitespace-delimited token on [`STATUS_LINE`] holding `[NN%]`.
pub const PERCENT_TOKEN: usize = 4;
/// Whitespace-delimited token on [`STATUS_LINE`] holding `[on]` or `[off]`.
pub const SWITCH_TOKEN: usize = 6;

/// A requested change to the master channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeOperation {
    /// Switch playback off.
    Mute,
    /// Switch playback on.
    Unmute,
    /// Flip the playback switch.
    ToggleMute,
    /// Raise the volume by this many percent.
    Raise(u32),
    /// Lower the volume by this many percent.
    Lower(u32),
}

impl VolumeOperation {
    /// The mixer directive implementing this operation.
    pub fn directive(self) -> Directive {
        match self {
            Self::Mute => Directive::Off,
            Self::Unmute => Directive::On,
            Self::ToggleMute => Directive::Toggle,
            Self::Raise(percent) => Directive::Up(percent),
            Self::Lower(percent) => Directive::Down(percent),
        }
    }
}

/// Argument passed to `<mixer> sset <channel>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `off`
    Off,
    /// `on`
    On,
    /// `toggle`
    Toggle,
    /// `<N>%+`
    Up(u32),
    /// `<N>%-`
    Down(u32),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::On => f.write_str("on"),
            Self::Toggle => f.write_str("toggle"),
            Self::Up(n) => write!(f, "{n}%+"),
            Self::Down(n) => write!(f, "{n}%-"),
        }
    }
}

/// Channel state reported by the mixer after a change.
///
/// `None` means the value was not reported, never zero or unmuted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MixerState {
    /// Volume in percent, `0..=100`.
    pub percent: Option<u8>,
    /// Whether the playback switch is off.
    pub muted: Option<bool>,
}

/// The mixer report did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fewer lines than expected.
    #[error("mixer output has {found} lines, expected at least {}", STATUS_LINE + 1)]
    MissingLine {
        /// Number of lines present.
        found: usize,
    },
    /// The status line is too short.
    #[error("status line has no token {index}: {line:?}")]
    MissingToken {
        /// The token index that was needed.
        index: usize,
        /// The status line as reported.
        line: String,
    },
    /// The percent token is not of the form `[NN%]`.
    #[error("malformed volume token {0:?}")]
    MalformedPercent(String),
    /// The percent value is above 100.
    #[error("volume {0}% is out of range")]
    PercentOutOfRange(u32),
    /// The switch token is not of the form `[on]`/`[off]`.
    #[error("malformed switch token {0:?}")]
    MalformedSwitch(String),
}

/// Extract volume and mute state from the mixer's status report.
pub fn parse(raw: &str) -> Result<MixerState, ParseError> {
    let line = raw
        .lines()
        .nth(STATUS_LINE)
        .ok_or_else(|| ParseError::MissingLine {
            found: raw.lines().count(),
        })?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let token = |index: usize| {
        tokens
            .get(index)
            .copied()
            .ok_or_else(|| ParseError::MissingToken {
                index,
                line: line.to_string(),
            })
    };

    let percent = parse_percent(token(PERCENT_TOKEN)?)?;
    let muted = parse_switch(token(SWITCH_TOKEN)?)?;
    Ok(MixerState {
        percent: Some(percent),
        muted: Some(muted),
    })
}

/// Contents after the first `[` of `token`, when the token ends in `suffix`.
fn bracketed<'a>(token: &'a str, suffix: &str) -> Option<&'a str> {
    let start = token.find('[')?;
    token[start + 1..].strip_suffix(suffix)
}

/// Parse `[NN%]`.
fn parse_percent(token: &str) -> Result<u8, ParseError> {
    let malformed = || ParseError::MalformedPercent(token.to_string());
    let digits = bracketed(token, "%]").ok_or_else(malformed)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let value: u32 = digits.parse().map_err(|_| malformed())?;
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or(ParseError::PercentOutOfRange(value))
}

/// Parse `[on]`/`[off]`; only `off` means muted.
fn parse_switch(token: &str) -> Result<bool, ParseError> {
    bracketed(token, "]")
        .map(|flag| flag == "off")
        .ok_or_else(|| ParseError::MalformedSwitch(token.to_string()))
}
