//! Playback coordinator
//!
//! Sole writer of the audio output. Every selection, transport command and
//! device event goes through [`PlaybackCoordinator`], which keeps the
//! [`PlaybackSession`] and the device binding consistent.

use crate::errors::{ControlError, Result};
use crate::output::{AudioOutput, DeviceEvent, DeviceSignal, Subscription, Volume};
use crate::playable::Playable;
use crate::session::{PlaybackSession, Progress, SessionState, Transport};
use tazasource::{ItemKey, Notifier, PlayableItem, StreamResolver};
use tracing::{debug, trace, warn};

const NOW_PLAYING_TITLE: &str = "Now Playing";
const AUDIO_ERROR_TITLE: &str = "Audio Error";
const AUDIO_ERROR_DESCRIPTION: &str = "This song is currently unavailable. Please try another one.";
const PLAYBACK_ERROR_TITLE: &str = "Playback Error";
const TOGGLE_ERROR_DESCRIPTION: &str = "Failed to toggle playback.";

/// What a device event did to the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Event of a released binding, or irrelevant in the current state
    Ignored,
    Updated,
    /// The loaded item played to its end
    Ended,
}

#[derive(Debug)]
pub struct PlaybackCoordinator<O: AudioOutput, P: Playable = PlayableItem> {
    output: O,
    resolver: StreamResolver,
    notifier: Notifier,
    session: PlaybackSession<P>,
    subscription: Option<Subscription>,
}

impl<O: AudioOutput, P: Playable> PlaybackCoordinator<O, P> {
    pub fn new(output: O, resolver: StreamResolver, notifier: Notifier) -> Self {
        Self {
            output,
            resolver,
            notifier,
            session: PlaybackSession::default(),
            subscription: None,
        }
    }

    /// Initial volume, applied to the device right away
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.set_volume(volume.percent());
        self
    }

    pub fn session(&self) -> &PlaybackSession<P> {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn current(&self) -> Option<&P> {
        self.session.item.as_ref()
    }

    pub fn progress(&self) -> Progress {
        self.session.progress()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// True when `key` is the item loading or loaded right now
    pub fn is_current(&self, key: &ItemKey) -> bool {
        self.session.state.is_loaded()
            && self
                .session
                .item
                .as_ref()
                .is_some_and(|item| &item.key() == key)
    }

    /// Selects `item` for playback.
    ///
    /// Selecting the loaded item toggles play/pause without reloading.
    /// Otherwise the previous binding is released and rewound, the session
    /// restarts at zero in `Loading`, and the resolved stream is bound.
    /// Playback starts when the device reports it can play.
    pub fn select(&mut self, item: P) -> Result<()> {
        if self.is_current(&item.key()) {
            debug!(key = %item.key(), "Selected item already loaded, toggling");
            return self.toggle();
        }

        self.release_binding();

        self.session.item = Some(item.clone());
        self.session.elapsed = 0.0;
        self.session.duration = 0.0;
        self.session.state = SessionState::Loading;

        let url = match item.resolve_stream(&self.resolver) {
            Ok(url) => url,
            Err(err) => {
                warn!(key = %item.key(), "No stream resolvable: {}", err);
                self.session.state = SessionState::Errored;
                self.notifier.error(
                    PLAYBACK_ERROR_TITLE,
                    format!("No playable stream for {}.", item.title()),
                );
                return Err(err);
            }
        };

        debug!(key = %item.key(), url = %url, "Binding stream");
        match self.output.bind(&url) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.output.set_volume(self.session.volume);
                Ok(())
            }
            Err(err) => {
                self.fail_load(&err.to_string());
                Err(ControlError::playback_load(&item.title(), err.to_string()))
            }
        }
    }

    /// Pauses a playing item or resumes a paused one.
    ///
    /// No-op in `Empty`, `Loading` and `Errored`. A rejected resume keeps the
    /// session paused.
    pub fn toggle(&mut self) -> Result<()> {
        match self.session.state {
            SessionState::Ready(Transport::Playing) => {
                self.output.pause();
                self.session.state = SessionState::Ready(Transport::Paused);
                Ok(())
            }
            SessionState::Ready(Transport::Paused) => match self.output.play() {
                Ok(()) => {
                    self.session.state = SessionState::Ready(Transport::Playing);
                    Ok(())
                }
                Err(err) => {
                    warn!("Resume rejected: {}", err);
                    self.notifier
                        .error(PLAYBACK_ERROR_TITLE, TOGGLE_ERROR_DESCRIPTION);
                    Err(ControlError::PlaybackResume(err.to_string()))
                }
            },
            state => {
                trace!(state = state.as_str(), "Toggle ignored");
                Ok(())
            }
        }
    }

    /// Seeks to `fraction` of the duration, clamped to [0, 1].
    ///
    /// Returns false while the duration is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        self.seek_to(fraction.clamp(0.0, 1.0) * self.session.duration)
    }

    /// Seek bar variant taking a percentage in [0, 100]
    pub fn seek_percent(&mut self, percent: f64) -> bool {
        self.seek_fraction(percent / 100.0)
    }

    /// Seeks to `position` seconds, clamped to the duration
    pub fn seek_to(&mut self, position: f64) -> bool {
        let duration = self.session.duration;
        if duration <= 0.0 || !position.is_finite() || self.subscription.is_none() {
            return false;
        }
        let position = position.clamp(0.0, duration);
        self.output.seek(position);
        self.session.elapsed = position;
        true
    }

    /// Applies `level` (0 to 100) to the device, whatever the state
    pub fn set_volume(&mut self, level: u8) {
        self.session.volume = Volume::new(level);
        self.output.set_volume(self.session.volume);
    }

    /// Applies one device event.
    ///
    /// Events of any binding other than the current one are ignored.
    pub fn handle_event(&mut self, event: &DeviceEvent) -> EventOutcome {
        let Some(subscription) = &self.subscription else {
            trace!(binding = %event.binding, "Event without binding ignored");
            return EventOutcome::Ignored;
        };
        if subscription.binding() != event.binding {
            trace!(binding = %event.binding, "Stale event ignored");
            return EventOutcome::Ignored;
        }

        match &event.signal {
            DeviceSignal::MetadataReady { duration } => {
                if duration.is_finite() && *duration > 0.0 {
                    self.session.duration = *duration;
                }
                EventOutcome::Updated
            }
            DeviceSignal::CanPlay if self.session.state == SessionState::Loading => {
                match self.output.play() {
                    Ok(()) => {
                        self.session.state = SessionState::Ready(Transport::Playing);
                        if let Some(description) =
                            self.session.item.as_ref().and_then(Playable::now_playing)
                        {
                            self.notifier.info(NOW_PLAYING_TITLE, description);
                        }
                    }
                    Err(err) => self.fail_load(&err.to_string()),
                }
                EventOutcome::Updated
            }
            DeviceSignal::CanPlay => EventOutcome::Ignored,
            DeviceSignal::TimeUpdate { position } => {
                if position.is_finite() {
                    self.session.elapsed = position.max(0.0);
                }
                EventOutcome::Updated
            }
            DeviceSignal::Ended if self.session.state.is_playing() => {
                self.session.state = SessionState::Ready(Transport::Paused);
                self.session.elapsed = self.session.duration;
                EventOutcome::Ended
            }
            DeviceSignal::Ended => EventOutcome::Ignored,
            DeviceSignal::Error(message) => {
                self.fail_load(message);
                EventOutcome::Updated
            }
        }
    }

    /// Releases the device and returns the session to `Empty`
    pub fn close(&mut self) {
        if self.subscription.take().is_some() {
            self.output.pause();
            self.output.unbind();
        }
        self.session.clear();
        debug!("Playback session closed");
    }

    /// Detaches the previous source's handlers, then stops and rewinds it
    fn release_binding(&mut self) {
        if self.subscription.take().is_some() {
            self.output.pause();
            self.output.seek(0.0);
        }
    }

    fn fail_load(&mut self, reason: &str) {
        warn!(
            key = ?self.session.item.as_ref().map(|i| i.key()),
            "Playback failed: {}", reason
        );
        self.subscription = None;
        self.output.pause();
        self.output.unbind();
        self.session.state = SessionState::Errored;
        self.notifier.error(AUDIO_ERROR_TITLE, AUDIO_ERROR_DESCRIPTION);
    }
}
