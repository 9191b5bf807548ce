//! Playback session state
//!
//! `Empty -> Loading -> Ready(Playing) <-> Ready(Paused)`, with `Errored`
//! reachable from `Loading` and from both `Ready` states.

use crate::output::Volume;
use serde::Serialize;
use tazasource::format_time;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Transport {
    Playing,
    Paused,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SessionState {
    #[default]
    Empty,
    Loading,
    Ready(Transport),
    Errored,
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionState::Ready(Transport::Playing))
    }

    /// A source is loading or loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, SessionState::Loading | SessionState::Ready(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Empty => "EMPTY",
            SessionState::Loading => "LOADING",
            SessionState::Ready(Transport::Playing) => "PLAYING",
            SessionState::Ready(Transport::Paused) => "PAUSED",
            SessionState::Errored => "ERRORED",
        }
    }
}

/// The single selected item and its transport state
#[derive(Clone, Debug)]
pub struct PlaybackSession<P> {
    pub(crate) item: Option<P>,
    pub(crate) state: SessionState,
    pub(crate) elapsed: f64,
    pub(crate) duration: f64,
    pub(crate) volume: Volume,
}

impl<P> Default for PlaybackSession<P> {
    fn default() -> Self {
        Self {
            item: None,
            state: SessionState::Empty,
            elapsed: 0.0,
            duration: 0.0,
            volume: Volume::default(),
        }
    }
}

impl<P> PlaybackSession<P> {
    pub fn item(&self) -> Option<&P> {
        self.item.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Elapsed seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Duration in seconds, 0 while unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.elapsed, self.duration)
    }

    /// Back to `Empty`, keeping the volume
    pub(crate) fn clear(&mut self) {
        *self = Self {
            volume: self.volume,
            ..Self::default()
        };
    }
}

/// Position snapshot as shown under the seek bar
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Progress {
    pub elapsed: f64,
    pub duration: f64,
    /// Position in [0, 1], 0 while the duration is unknown
    pub fraction: f64,
    pub elapsed_label: String,
    pub duration_label: String,
}

impl Progress {
    pub fn new(elapsed: f64, duration: f64) -> Self {
        let fraction = if duration > 0.0 && elapsed.is_finite() {
            (elapsed / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            elapsed,
            duration,
            fraction,
            elapsed_label: format_time(elapsed),
            duration_label: format_time(duration),
        }
    }
}
