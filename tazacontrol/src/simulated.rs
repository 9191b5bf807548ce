//! In-process audio output
//!
//! Records every command it receives and emits device events on an
//! unbounded channel. Used by the command-line front-end, which has no
//! audio backend, and by tests.

use crate::errors::{ControlError, Result};
use crate::library::ObjectUrls;
use crate::output::{
    AudioOutput, BindingId, DeviceEvent, DeviceSignal, Subscription, SubscriptionHandle, Volume,
};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// A command received by the device
#[derive(Clone, Debug, PartialEq)]
pub enum OutputOp {
    Bind(String),
    Unbind,
    Play,
    Pause,
    Seek(f64),
    SetVolume(u8),
}

#[derive(Debug)]
pub struct SimulatedOutput {
    events: mpsc::UnboundedSender<DeviceEvent>,
    object_urls: Option<ObjectUrls>,
    next_binding: u64,
    current: Option<SubscriptionHandle>,
    source: Option<String>,
    duration: f64,
    position: f64,
    playing: bool,
    volume: Volume,
    auto_load: Option<f64>,
    reject_play: bool,
    broken: HashSet<String>,
    ops: Vec<OutputOp>,
}

impl SimulatedOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeviceEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let output = Self {
            events,
            object_urls: None,
            next_binding: 0,
            current: None,
            source: None,
            duration: 0.0,
            position: 0.0,
            playing: false,
            volume: Volume::default(),
            auto_load: None,
            reject_play: false,
            broken: HashSet::new(),
            ops: Vec::new(),
        };
        (output, rx)
    }

    /// Resolve `blob:` URLs through `urls`; revoked ones fail to load
    pub fn with_object_urls(mut self, urls: ObjectUrls) -> Self {
        self.object_urls = Some(urls);
        self
    }

    /// Report a source of `duration` seconds as ready right after binding
    pub fn with_auto_load(mut self, duration: f64) -> Self {
        self.auto_load = Some(duration);
        self
    }

    /// Makes `play()` fail, like a browser refusing autoplay
    pub fn set_reject_play(&mut self, reject: bool) {
        self.reject_play = reject;
    }

    /// Binding `url` will report a load error
    pub fn mark_broken(&mut self, url: impl Into<String>) {
        self.broken.insert(url.into());
    }

    pub fn ops(&self) -> &[OutputOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of sources bound so far
    pub fn bind_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, OutputOp::Bind(_)))
            .count()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn current_binding(&self) -> Option<BindingId> {
        self.current.as_ref().map(|h| h.binding())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Emits `signal` for the current binding.
    ///
    /// Returns false when nothing is bound or its subscription was dropped.
    pub fn emit(&self, signal: DeviceSignal) -> bool {
        let Some(handle) = self.current.as_ref().filter(|h| h.is_active()) else {
            trace!(?signal, "No active subscription, signal dropped");
            return false;
        };
        self.events
            .send(DeviceEvent::new(handle.binding(), signal))
            .is_ok()
    }

    /// Plays `seconds` of the bound source, reporting the position and the
    /// end of the source when reached.
    pub fn advance(&mut self, seconds: f64) {
        if !self.playing || !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        self.position += seconds;
        if self.duration > 0.0 && self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            self.emit(DeviceSignal::TimeUpdate {
                position: self.position,
            });
            self.emit(DeviceSignal::Ended);
        } else {
            self.emit(DeviceSignal::TimeUpdate {
                position: self.position,
            });
        }
    }

    fn is_loadable(&self, url: &str) -> bool {
        if self.broken.contains(url) {
            return false;
        }
        match &self.object_urls {
            Some(urls) if ObjectUrls::is_object_url(url) => urls.resolve(url).is_some(),
            _ => true,
        }
    }
}

impl AudioOutput for SimulatedOutput {
    fn bind(&mut self, url: &str) -> Result<Subscription> {
        self.next_binding += 1;
        let binding = BindingId(self.next_binding);
        let (subscription, handle) = Subscription::new(binding);

        self.current = Some(handle);
        self.source = Some(url.to_string());
        self.duration = 0.0;
        self.position = 0.0;
        self.playing = false;
        self.ops.push(OutputOp::Bind(url.to_string()));
        debug!(%binding, url, "Source bound");

        if !self.is_loadable(url) {
            self.emit(DeviceSignal::Error(format!("Cannot load {}", url)));
        } else if let Some(duration) = self.auto_load {
            self.duration = duration;
            self.emit(DeviceSignal::MetadataReady { duration });
            self.emit(DeviceSignal::CanPlay);
        }

        Ok(subscription)
    }

    fn unbind(&mut self) {
        self.current = None;
        self.source = None;
        self.playing = false;
        self.position = 0.0;
        self.ops.push(OutputOp::Unbind);
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(ControlError::output("no source bound"));
        }
        if self.reject_play {
            return Err(ControlError::output("play() was rejected"));
        }
        self.playing = true;
        self.ops.push(OutputOp::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.ops.push(OutputOp::Pause);
    }

    fn seek(&mut self, position: f64) {
        self.position = position;
        self.ops.push(OutputOp::Seek(position));
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.ops.push(OutputOp::SetVolume(volume.percent()));
    }
}
