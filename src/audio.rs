//! Audio port: the session fires named sound events synchronously; playback
//! lives entirely behind the port.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioEvent {
    /// A bird jumped.
    Flap,
    /// A bird rotated one step further into its nose-dive.
    DiveStep,
    /// A bird touched a pipe.
    Hit,
    /// A pipe was passed.
    Score,
    /// A bird hit the floor or left the top of the screen.
    Die,
}

impl AudioEvent {
    pub const ALL: [AudioEvent; 5] = [
        AudioEvent::Flap,
        AudioEvent::DiveStep,
        AudioEvent::Hit,
        AudioEvent::Score,
        AudioEvent::Die,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flap => "flap",
            Self::DiveStep => "dive-step",
            Self::Hit => "hit",
            Self::Score => "score",
            Self::Die => "die",
        }
    }
}

impl fmt::Display for AudioEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives sound events. Implementations must return promptly; they are
/// called from inside a tick.
pub trait AudioPort {
    fn play(&mut self, event: AudioEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn play(&mut self, _event: AudioEvent) {}
}

/// Logs events at debug level instead of playing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAudio;

impl AudioPort for LoggingAudio {
    fn play(&mut self, event: AudioEvent) {
        tracing::debug!("Audio event: {}", event);
    }
}
