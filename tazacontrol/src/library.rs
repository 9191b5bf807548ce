//! Local music library
//!
//! Each added file gets an object URL (`blob:tazatunes/<uuid>`) registered
//! in a shared [`ObjectUrls`] registry, which output devices use to find the
//! file behind the URL. The library owns its tracks' URLs: they are revoked
//! when a track is removed and when the library is dropped.

use crate::coordinator::{EventOutcome, PlaybackCoordinator};
use crate::errors::{ControlError, Result};
use crate::output::{AudioOutput, DeviceEvent};
use crate::playable::Playable;
use crate::session::SessionState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tazasource::{ItemKey, Notifier, SourceTag, StreamResolver};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Extensions accepted as audio files
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "ogg", "oga", "flac", "m4a", "aac", "opus", "weba", "webm",
];

const OBJECT_URL_PREFIX: &str = "blob:tazatunes/";

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

// ============================================================================
// Object URLs
// ============================================================================

/// Registry of live object URLs, shared between libraries and devices
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls {
    urls: Arc<Mutex<HashMap<String, PathBuf>>>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_object_url(url: &str) -> bool {
        url.starts_with(OBJECT_URL_PREFIX)
    }

    /// Registers a new URL for `path`
    pub fn create(&self, path: &Path) -> String {
        let url = format!("{}{}", OBJECT_URL_PREFIX, Uuid::new_v4());
        self.urls
            .lock()
            .unwrap()
            .insert(url.clone(), path.to_path_buf());
        url
    }

    /// Returns false if `url` was not live
    pub fn revoke(&self, url: &str) -> bool {
        self.urls.lock().unwrap().remove(url).is_some()
    }

    /// File behind a live URL
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.urls.lock().unwrap().get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tracks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTrack {
    pub id: String,
    /// File name without its extension
    pub name: String,
    pub url: String,
    pub path: PathBuf,
}

impl Playable for LocalTrack {
    fn key(&self) -> ItemKey {
        ItemKey::new(SourceTag::Local, &self.id)
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    // Starting a local file is not announced
    fn now_playing(&self) -> Option<String> {
        None
    }

    fn resolve_stream(&self, _resolver: &StreamResolver) -> Result<String> {
        Ok(self.url.clone())
    }
}

/// Tracks added by the user, in insertion order
#[derive(Debug)]
pub struct LocalLibrary {
    tracks: Vec<LocalTrack>,
    urls: ObjectUrls,
    notifier: Notifier,
}

impl LocalLibrary {
    pub fn new(urls: ObjectUrls, notifier: Notifier) -> Self {
        Self {
            tracks: Vec::new(),
            urls,
            notifier,
        }
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.urls
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LocalTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Adds one audio file. Files with another extension are rejected.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<LocalTrack> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !is_audio_file(path) {
            warn!(file = %file_name, "Rejected non-audio file");
            return Err(ControlError::UnsupportedFile(file_name));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        let track = LocalTrack {
            id: Uuid::new_v4().to_string(),
            name,
            url: self.urls.create(path),
            path: path.to_path_buf(),
        };
        debug!(id = %track.id, url = %track.url, "Track added");
        self.tracks.push(track.clone());
        self.notifier.info(
            "Music Added",
            format!("{} has been added to your library", file_name),
        );
        Ok(track)
    }

    /// Adds every file, one result per input
    pub fn add_files<I, T>(&mut self, paths: I) -> Vec<Result<LocalTrack>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<Path>,
    {
        paths.into_iter().map(|p| self.add_file(p)).collect()
    }

    /// Removes a track and revokes its URL
    pub fn remove(&mut self, id: &str) -> Result<LocalTrack> {
        let index = self
            .position(id)
            .ok_or_else(|| ControlError::TrackNotFound(id.to_string()))?;
        let track = self.tracks.remove(index);
        self.urls.revoke(&track.url);
        debug!(id = %track.id, "Track removed, URL revoked");
        Ok(track)
    }

    pub fn first(&self) -> Option<&LocalTrack> {
        self.tracks.first()
    }

    /// Track after `id`, wrapping to the first
    pub fn next_after(&self, id: &str) -> Option<&LocalTrack> {
        let index = self.position(id)?;
        self.tracks.get((index + 1) % self.tracks.len())
    }

    /// Track before `id`, wrapping to the last
    pub fn previous_before(&self, id: &str) -> Option<&LocalTrack> {
        let index = self.position(id)?;
        let len = self.tracks.len();
        self.tracks.get((index + len - 1) % len)
    }
}

impl Drop for LocalLibrary {
    fn drop(&mut self) {
        for track in &self.tracks {
            self.urls.revoke(&track.url);
        }
        if !self.tracks.is_empty() {
            debug!("Revoked {} object URLs", self.tracks.len());
        }
    }
}

// ============================================================================
// Player
// ============================================================================

/// Playlist player over a [`LocalLibrary`], advancing on track end
#[derive(Debug)]
pub struct LibraryPlayer<O: AudioOutput> {
    library: LocalLibrary,
    coordinator: PlaybackCoordinator<O, LocalTrack>,
}

impl<O: AudioOutput> LibraryPlayer<O> {
    pub fn new(library: LocalLibrary, output: O, notifier: Notifier) -> Self {
        Self {
            library,
            coordinator: PlaybackCoordinator::new(output, StreamResolver::default(), notifier),
        }
    }

    pub fn library(&self) -> &LocalLibrary {
        &self.library
    }

    pub fn coordinator(&self) -> &PlaybackCoordinator<O, LocalTrack> {
        &self.coordinator
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.coordinator.output_mut()
    }

    pub fn state(&self) -> SessionState {
        self.coordinator.state()
    }

    pub fn current_track(&self) -> Option<&LocalTrack> {
        self.coordinator.current()
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<LocalTrack> {
        self.library.add_file(path)
    }

    /// Removes a track; playback stops if it was the current one
    pub fn remove(&mut self, id: &str) -> Result<LocalTrack> {
        if self.current_track().is_some_and(|t| t.id == id) {
            self.coordinator.close();
        }
        self.library.remove(id)
    }

    /// Plays the track `id`, or toggles it when already loaded
    pub fn play_track(&mut self, id: &str) -> Result<()> {
        let track = self
            .library
            .get(id)
            .cloned()
            .ok_or_else(|| ControlError::TrackNotFound(id.to_string()))?;
        info!(track = %track.name, "Playing local track");
        self.coordinator.select(track)
    }

    /// Toggles playback, starting the first track when nothing is loaded
    pub fn toggle(&mut self) -> Result<()> {
        if self.current_track().is_none() {
            let first = self.library.first().ok_or(ControlError::EmptyLibrary)?;
            let id = first.id.clone();
            return self.play_track(&id);
        }
        self.coordinator.toggle()
    }

    pub fn next(&mut self) -> Result<()> {
        let target = match self.current_track() {
            Some(current) => self.library.next_after(&current.id),
            None => self.library.first(),
        }
        .map(|t| t.id.clone());
        self.jump(target)
    }

    pub fn previous(&mut self) -> Result<()> {
        let target = match self.current_track() {
            Some(current) => self.library.previous_before(&current.id),
            None => self.library.first(),
        }
        .map(|t| t.id.clone());
        self.jump(target)
    }

    fn jump(&mut self, id: Option<String>) -> Result<()> {
        let id = id.ok_or(ControlError::EmptyLibrary)?;
        let track = self
            .library
            .get(&id)
            .cloned()
            .ok_or_else(|| ControlError::TrackNotFound(id.clone()))?;
        // A one-track playlist restarts instead of toggling
        if self.coordinator.is_current(&track.key()) {
            self.coordinator.close();
        }
        self.coordinator.select(track)
    }

    /// Seeks to `position` seconds
    pub fn seek_to(&mut self, position: f64) -> bool {
        self.coordinator.seek_to(position)
    }

    pub fn set_volume(&mut self, level: u8) {
        self.coordinator.set_volume(level);
    }

    /// Applies a device event; a finished track moves to the next one
    pub fn handle_event(&mut self, event: &DeviceEvent) -> Result<EventOutcome> {
        let outcome = self.coordinator.handle_event(event);
        if outcome == EventOutcome::Ended {
            debug!("Track ended, advancing");
            self.next()?;
        }
        Ok(outcome)
    }

    /// Stops playback and releases the device
    pub fn close(&mut self) {
        self.coordinator.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> LocalLibrary {
        LocalLibrary::new(ObjectUrls::new(), Notifier::default())
    }

    #[test]
    fn test_same_stem_gives_distinct_tracks() {
        let mut lib = library();
        let mp3 = lib.add_file("/music/song.mp3").unwrap();
        let wav = lib.add_file("/music/song.wav").unwrap();

        assert_eq!(mp3.name, "song");
        assert_eq!(wav.name, "song");
        assert_ne!(mp3.id, wav.id);
        assert_ne!(mp3.url, wav.url);
        assert!(ObjectUrls::is_object_url(&mp3.url));
    }

    #[test]
    fn test_non_audio_rejected() {
        let mut lib = library();
        let results = lib.add_files(["a.MP3", "notes.txt", "b.flac"]);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(ControlError::UnsupportedFile("notes.txt".into()))
        );
        assert!(results[2].is_ok());
        assert_eq!(lib.len(), 2);
    }

    #[test]
    fn test_added_file_notifies() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();
        let mut lib = LocalLibrary::new(ObjectUrls::new(), notifier);
        lib.add_file("/music/song.mp3").unwrap();

        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.title, "Music Added");
        assert_eq!(notice.description, "song.mp3 has been added to your library");
    }

    #[test]
    fn test_remove_revokes_url() {
        let urls = ObjectUrls::new();
        let mut lib = LocalLibrary::new(urls.clone(), Notifier::default());
        let track = lib.add_file("/music/a.mp3").unwrap();
        assert_eq!(urls.resolve(&track.url), Some(PathBuf::from("/music/a.mp3")));

        lib.remove(&track.id).unwrap();
        assert_eq!(urls.resolve(&track.url), None);
        assert_eq!(
            lib.remove(&track.id),
            Err(ControlError::TrackNotFound(track.id.clone()))
        );
    }

    #[test]
    fn test_drop_revokes_all_urls() {
        let urls = ObjectUrls::new();
        {
            let mut lib = LocalLibrary::new(urls.clone(), Notifier::default());
            lib.add_files(["a.mp3", "b.ogg", "c.opus"]);
            assert_eq!(urls.len(), 3);
        }
        assert!(urls.is_empty());
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut lib = library();
        let a = lib.add_file("a.mp3").unwrap();
        let b = lib.add_file("b.mp3").unwrap();
        let c = lib.add_file("c.mp3").unwrap();

        assert_eq!(lib.next_after(&a.id), Some(&b));
        assert_eq!(lib.next_after(&c.id), Some(&a));
        assert_eq!(lib.previous_before(&a.id), Some(&c));
        assert_eq!(lib.previous_before(&b.id), Some(&a));
        assert_eq!(lib.next_after("missing"), None);
    }
}
