//! Local library player against the simulated output

use tazacontrol::{
    ControlError, EventOutcome, LibraryPlayer, LocalLibrary, ObjectUrls, SessionState,
    SimulatedOutput, Transport,
};
use tazasource::Notifier;
use tokio::sync::mpsc::UnboundedReceiver;

struct Harness {
    player: LibraryPlayer<SimulatedOutput>,
    events: UnboundedReceiver<tazacontrol::DeviceEvent>,
    urls: ObjectUrls,
}

impl Harness {
    fn new(files: &[&str]) -> Self {
        let urls = ObjectUrls::new();
        let notifier = Notifier::default();
        let mut library = LocalLibrary::new(urls.clone(), notifier.clone());
        for file in files {
            library.add_file(file).unwrap();
        }
        let (output, events) = SimulatedOutput::new();
        let output = output.with_object_urls(urls.clone()).with_auto_load(60.0);
        Self {
            player: LibraryPlayer::new(library, output, notifier),
            events,
            urls,
        }
    }

    fn pump(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            outcomes.push(self.player.handle_event(&event).unwrap());
        }
        outcomes
    }

    fn id(&self, index: usize) -> String {
        self.player.library().tracks()[index].id.clone()
    }

    fn current_name(&self) -> Option<String> {
        self.player.current_track().map(|t| t.name.clone())
    }
}

#[test]
fn test_play_by_id() {
    let mut h = Harness::new(&["/music/a.mp3", "/music/b.mp3"]);
    let id = h.id(1);
    h.player.play_track(&id).unwrap();
    h.pump();

    assert_eq!(h.current_name().as_deref(), Some("b"));
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Playing));
    assert_eq!(
        h.player.play_track("missing"),
        Err(ControlError::TrackNotFound("missing".into()))
    );
}

#[test]
fn test_local_playback_is_not_announced() {
    let urls = ObjectUrls::new();
    let notifier = Notifier::default();
    let mut library = LocalLibrary::new(urls.clone(), notifier.clone());
    library.add_file("/music/a.mp3").unwrap();
    let mut notices = notifier.subscribe();

    let (output, mut events) = SimulatedOutput::new();
    let output = output.with_object_urls(urls).with_auto_load(60.0);
    let mut player = LibraryPlayer::new(library, output, notifier);
    player.toggle().unwrap();
    while let Ok(event) = events.try_recv() {
        player.handle_event(&event).unwrap();
    }

    assert_eq!(player.state(), SessionState::Ready(Transport::Playing));
    assert!(notices.try_recv().is_err());
}

#[test]
fn test_toggle_starts_first_track() {
    let mut h = Harness::new(&["/music/a.mp3", "/music/b.mp3"]);
    h.player.toggle().unwrap();
    h.pump();
    assert_eq!(h.current_name().as_deref(), Some("a"));

    h.player.toggle().unwrap();
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Paused));
}

#[test]
fn test_empty_library() {
    let mut h = Harness::new(&[]);
    assert_eq!(h.player.toggle(), Err(ControlError::EmptyLibrary));
    assert_eq!(h.player.next(), Err(ControlError::EmptyLibrary));
}

#[test]
fn test_next_and_previous_wrap() {
    let mut h = Harness::new(&["a.mp3", "b.mp3", "c.mp3"]);
    let last = h.id(2);
    h.player.play_track(&last).unwrap();

    h.player.next().unwrap();
    assert_eq!(h.current_name().as_deref(), Some("a"));
    h.player.previous().unwrap();
    assert_eq!(h.current_name().as_deref(), Some("c"));
}

#[test]
fn test_end_of_track_advances() {
    let mut h = Harness::new(&["a.mp3", "b.mp3"]);
    let first = h.id(0);
    h.player.play_track(&first).unwrap();
    h.pump();

    h.player.output_mut().advance(61.0);
    let outcomes = h.pump();
    assert!(outcomes.contains(&EventOutcome::Ended));
    assert_eq!(h.current_name().as_deref(), Some("b"));
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Playing));
}

#[test]
fn test_single_track_restarts_on_end() {
    let mut h = Harness::new(&["only.flac"]);
    h.player.toggle().unwrap();
    h.pump();

    h.player.output_mut().advance(61.0);
    h.pump();
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Playing));
    assert_eq!(h.player.coordinator().output().bind_count(), 2);
}

#[test]
fn test_seek_in_seconds() {
    let mut h = Harness::new(&["a.mp3"]);
    h.player.toggle().unwrap();
    h.pump();

    assert!(h.player.seek_to(42.0));
    assert_eq!(h.player.coordinator().session().elapsed(), 42.0);
    assert!(h.player.seek_to(600.0));
    assert_eq!(h.player.coordinator().session().elapsed(), 60.0);
}

#[test]
fn test_removing_current_track_stops_and_revokes() {
    let mut h = Harness::new(&["a.mp3", "b.mp3"]);
    let first = h.id(0);
    h.player.play_track(&first).unwrap();
    h.pump();

    let removed = h.player.remove(&first).unwrap();
    assert_eq!(h.player.state(), SessionState::Empty);
    assert_eq!(h.player.coordinator().output().source(), None);
    assert!(h.urls.resolve(&removed.url).is_none());
    assert_eq!(h.urls.len(), 1);
}

#[test]
fn test_dropping_player_revokes_urls() {
    let h = Harness::new(&["a.mp3", "b.wav"]);
    let urls = h.urls.clone();
    assert_eq!(urls.len(), 2);
    drop(h);
    assert!(urls.is_empty());
}
