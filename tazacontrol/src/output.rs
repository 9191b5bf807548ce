//! Audio output device abstraction
//!
//! A device holds at most one bound source. Binding returns a
//! [`Subscription`] scoped to that source: the device only delivers lifecycle
//! events for a binding whose subscription is still alive, so dropping the
//! subscription detaches every handler at once, on success and error paths
//! alike.

use crate::errors::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Identifies one bind() call on a device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle signals emitted by a device for its bound source
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceSignal {
    /// Duration in seconds is known
    MetadataReady { duration: f64 },
    /// Enough data is buffered to start playback
    CanPlay,
    /// Current position in seconds
    TimeUpdate { position: f64 },
    Ended,
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceEvent {
    pub binding: BindingId,
    pub signal: DeviceSignal,
}

impl DeviceEvent {
    pub fn new(binding: BindingId, signal: DeviceSignal) -> Self {
        Self { binding, signal }
    }
}

/// Owner side of a binding's event registration.
///
/// Held by whoever bound the source; the device keeps the matching
/// [`SubscriptionHandle`].
#[derive(Debug)]
pub struct Subscription {
    binding: BindingId,
    active: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new(binding: BindingId) -> (Self, SubscriptionHandle) {
        let active = Arc::new(AtomicBool::new(true));
        let handle = SubscriptionHandle {
            binding,
            active: active.clone(),
        };
        (Self { binding, active }, handle)
    }

    pub fn binding(&self) -> BindingId {
        self.binding
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        trace!(binding = %self.binding, "Subscription released");
    }
}

/// Device side of a [`Subscription`]
#[derive(Clone, Debug)]
pub struct SubscriptionHandle {
    binding: BindingId,
    active: Arc<AtomicBool>,
}

impl SubscriptionHandle {
    pub fn binding(&self) -> BindingId {
        self.binding
    }

    /// False once the owner dropped its [`Subscription`]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Playback volume, 0 to 100
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 80;

    /// Clamps `level` to 100
    pub fn new(level: u8) -> Self {
        Volume(level.min(Self::MAX))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Device gain in [0.0, 1.0]
    pub fn gain(&self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume(Self::DEFAULT)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A single audio output.
///
/// Binding a new source replaces the previous one; events of the previous
/// binding must no longer be delivered.
pub trait AudioOutput: Send {
    /// Loads `url` and returns the subscription for its lifecycle events.
    fn bind(&mut self, url: &str) -> Result<Subscription>;

    /// Clears the bound source entirely.
    fn unbind(&mut self);

    /// Starts or resumes playback of the bound source.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Moves to `position` seconds.
    fn seek(&mut self, position: f64);

    fn set_volume(&mut self, volume: Volume);
}
