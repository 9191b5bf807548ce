//! # TazaControl - playback coordination
//!
//! Drives a single [`AudioOutput`] for the three players of TazaTunes:
//!
//! - [`PlaybackCoordinator`]: search results ([`tazasource::PlayableItem`]),
//!   with load gating on the device's can-play signal
//! - [`RadioPlayer`]: internet radio stations, started immediately
//! - [`LibraryPlayer`]: local files with object URLs and auto-advance
//!
//! Device lifecycle events are delivered through the channel returned by the
//! output (see [`SimulatedOutput::new`]) and fed back with `handle_event`.
//!
//! ```no_run
//! use tazacontrol::{PlaybackCoordinator, SimulatedOutput};
//! use tazasource::{Notifier, PlayableItem, StreamResolver};
//!
//! # fn run(item: PlayableItem) -> tazacontrol::Result<()> {
//! let (output, mut events) = SimulatedOutput::new();
//! let mut player: PlaybackCoordinator<_> =
//!     PlaybackCoordinator::new(output, StreamResolver::default(), Notifier::default());
//!
//! player.select(item)?;
//! while let Ok(event) = events.try_recv() {
//!     player.handle_event(&event);
//! }
//! println!("{}", player.state().as_str());
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod errors;
pub mod library;
pub mod output;
pub mod playable;
pub mod radio;
pub mod session;
pub mod simulated;

pub use coordinator::{EventOutcome, PlaybackCoordinator};
pub use errors::{ControlError, Result};
pub use library::{AUDIO_EXTENSIONS, LibraryPlayer, LocalLibrary, LocalTrack, ObjectUrls, is_audio_file};
pub use output::{
    AudioOutput, BindingId, DeviceEvent, DeviceSignal, Subscription, SubscriptionHandle, Volume,
};
pub use playable::Playable;
pub use radio::RadioPlayer;
pub use session::{PlaybackSession, Progress, SessionState, Transport};
pub use simulated::{OutputOp, SimulatedOutput};
