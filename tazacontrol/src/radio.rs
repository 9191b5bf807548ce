//! Radio station player
//!
//! Simpler than [`crate::PlaybackCoordinator`]: playback is attempted right
//! after binding, without waiting for the device to report it can play, and
//! a failed start leaves the player `Empty`.

use crate::errors::{ControlError, Result};
use crate::output::{AudioOutput, DeviceEvent, DeviceSignal, Subscription, Volume};
use crate::session::{SessionState, Transport};
use tazaradio::RadioStation;
use tazasource::Notifier;
use tracing::{debug, info, trace, warn};

const NOW_PLAYING_TITLE: &str = "Now Playing";
const PLAYBACK_ERROR_TITLE: &str = "Playback Error";
const PLAY_ERROR_DESCRIPTION: &str = "Unable to play this radio station";
const RESUME_ERROR_DESCRIPTION: &str = "Unable to resume playback";

#[derive(Debug)]
pub struct RadioPlayer<O: AudioOutput> {
    output: O,
    notifier: Notifier,
    station: Option<RadioStation>,
    state: SessionState,
    volume: Volume,
    subscription: Option<Subscription>,
}

impl<O: AudioOutput> RadioPlayer<O> {
    pub fn new(output: O, notifier: Notifier) -> Self {
        Self {
            output,
            notifier,
            station: None,
            state: SessionState::Empty,
            volume: Volume::default(),
            subscription: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn station(&self) -> Option<&RadioStation> {
        self.station.as_ref()
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Tunes to `station`, or toggles it when it is already playing or paused
    pub fn select_station(&mut self, station: &RadioStation) -> Result<()> {
        let is_current = matches!(self.state, SessionState::Ready(_))
            && self.station.as_ref().is_some_and(|s| s.id == station.id);
        if is_current {
            return self.toggle();
        }

        self.release();

        let Some(url) = station.stream_url().map(str::to_string) else {
            warn!(station = %station.name, "Station has no stream URL");
            self.notifier.error(PLAYBACK_ERROR_TITLE, PLAY_ERROR_DESCRIPTION);
            return Err(ControlError::NoStreamResolvable(station.name.clone()));
        };

        self.state = SessionState::Loading;
        let started = self.output.bind(&url).and_then(|subscription| {
            self.subscription = Some(subscription);
            self.output.set_volume(self.volume);
            self.output.play()
        });

        match started {
            Ok(()) => {
                info!(station = %station.name, url = %url, "Radio playing");
                self.station = Some(station.clone());
                self.state = SessionState::Ready(Transport::Playing);
                self.notifier.info(
                    NOW_PLAYING_TITLE,
                    format!("{} - {}", station.name, station.country),
                );
                Ok(())
            }
            Err(err) => {
                warn!(station = %station.name, "Radio start failed: {}", err);
                self.release();
                self.notifier.error(PLAYBACK_ERROR_TITLE, PLAY_ERROR_DESCRIPTION);
                Err(ControlError::playback_load(&station.name, err.to_string()))
            }
        }
    }

    /// Pause or resume; a rejected resume stays paused
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            SessionState::Ready(Transport::Playing) => {
                self.output.pause();
                self.state = SessionState::Ready(Transport::Paused);
                Ok(())
            }
            SessionState::Ready(Transport::Paused) => match self.output.play() {
                Ok(()) => {
                    self.state = SessionState::Ready(Transport::Playing);
                    Ok(())
                }
                Err(err) => {
                    warn!("Radio resume rejected: {}", err);
                    self.notifier
                        .error(PLAYBACK_ERROR_TITLE, RESUME_ERROR_DESCRIPTION);
                    Err(ControlError::PlaybackResume(err.to_string()))
                }
            },
            state => {
                trace!(state = state.as_str(), "Radio toggle ignored");
                Ok(())
            }
        }
    }

    /// Clears the bound source and returns to `Empty`
    pub fn stop(&mut self) {
        self.release();
        debug!("Radio stopped");
    }

    pub fn set_volume(&mut self, level: u8) {
        self.volume = Volume::new(level);
        self.output.set_volume(self.volume);
    }

    /// Applies a device event; returns true if the state changed
    pub fn handle_event(&mut self, event: &DeviceEvent) -> bool {
        let is_current = self
            .subscription
            .as_ref()
            .is_some_and(|s| s.binding() == event.binding);
        if !is_current {
            return false;
        }

        match &event.signal {
            DeviceSignal::Error(message) => {
                warn!(
                    station = ?self.station.as_ref().map(|s| &s.name),
                    "Radio stream error: {}", message
                );
                self.subscription = None;
                self.output.pause();
                self.output.unbind();
                self.state = SessionState::Errored;
                self.notifier.error(PLAYBACK_ERROR_TITLE, PLAY_ERROR_DESCRIPTION);
                true
            }
            DeviceSignal::Ended if self.state.is_playing() => {
                self.state = SessionState::Ready(Transport::Paused);
                true
            }
            _ => false,
        }
    }

    fn release(&mut self) {
        if self.subscription.take().is_some() {
            self.output.pause();
            self.output.unbind();
        }
        self.station = None;
        self.state = SessionState::Empty;
    }
}
