use crate::errors::Result;
use std::fmt::Debug;
use tazasource::{ItemKey, PlayableItem, StreamResolver};

/// Anything the playback coordinator can load
pub trait Playable: Clone + Debug + Send {
    /// Playback identity, `(source, id)`
    fn key(&self) -> ItemKey;

    fn title(&self) -> String;

    /// Description of the "Now Playing" notification, `None` to stay silent
    fn now_playing(&self) -> Option<String>;

    /// Stream URL handed to the output device
    fn resolve_stream(&self, resolver: &StreamResolver) -> Result<String>;
}

impl Playable for PlayableItem {
    fn key(&self) -> ItemKey {
        PlayableItem::key(self)
    }

    fn title(&self) -> String {
        self.display_name().to_string()
    }

    fn now_playing(&self) -> Option<String> {
        Some(format!("{} by {}", self.display_name(), self.artist_label()))
    }

    fn resolve_stream(&self, resolver: &StreamResolver) -> Result<String> {
        Ok(resolver.resolve(self)?)
    }
}
