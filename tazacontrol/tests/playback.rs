//! Playback coordinator against the simulated output

use serde_json::json;
use tazacontrol::{
    ControlError, DeviceEvent, DeviceSignal, EventOutcome, OutputOp, PlaybackCoordinator,
    SessionState, SimulatedOutput, Transport,
};
use tazasource::{
    CatalogSong, IndependentTrack, Notification, Notifier, PlayableItem, StreamResolver,
};
use tokio::sync::broadcast;
use tokio::sync::mpsc::UnboundedReceiver;

type Player = PlaybackCoordinator<SimulatedOutput>;

fn indie(id: &str, title: &str) -> PlayableItem {
    let track: IndependentTrack = serde_json::from_value(json!({
        "id": id,
        "title": title,
        "user": { "name": "Lo Fi Kid" },
        "duration": 180
    }))
    .unwrap();
    track.into()
}

fn song(id: &str, with_links: bool) -> PlayableItem {
    let links = if with_links {
        json!([
            { "quality": "96kbps", "link": "https://cdn.example/96.mp4" },
            { "quality": "320kbps", "link": "https://cdn.example/320.mp4" }
        ])
    } else {
        json!([])
    };
    let song: CatalogSong = serde_json::from_value(json!({
        "id": id,
        "name": "Perfect",
        "artist": { "primary": [{ "name": "Ed Sheeran" }] },
        "album": { "name": "Divide" },
        "downloadUrl": links
    }))
    .unwrap();
    song.into()
}

struct Harness {
    player: Player,
    events: UnboundedReceiver<DeviceEvent>,
    notices: broadcast::Receiver<Notification>,
}

impl Harness {
    fn new() -> Self {
        let (output, events) = SimulatedOutput::new();
        Self::with_output(output.with_auto_load(180.0), events)
    }

    fn with_output(output: SimulatedOutput, events: UnboundedReceiver<DeviceEvent>) -> Self {
        let notifier = Notifier::default();
        let notices = notifier.subscribe();
        let player = PlaybackCoordinator::new(output, StreamResolver::default(), notifier);
        Self {
            player,
            events,
            notices,
        }
    }

    fn pump(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            outcomes.push(self.player.handle_event(&event));
        }
        outcomes
    }

    fn last_notice(&mut self) -> Option<Notification> {
        let mut last = None;
        while let Ok(notice) = self.notices.try_recv() {
            last = Some(notice);
        }
        last
    }
}

#[test]
fn test_select_loads_then_plays_on_can_play() {
    let mut h = Harness::new();
    h.player.select(indie("abc123", "Night Drive")).unwrap();

    assert_eq!(h.player.state(), SessionState::Loading);
    assert_eq!(
        h.player.output().source(),
        Some("https://discoveryprovider.audius.co/v1/tracks/abc123/stream")
    );

    h.pump();
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Playing));
    assert_eq!(h.player.session().duration(), 180.0);
    assert!(h.player.output().is_playing());

    let notice = h.last_notice().unwrap();
    assert_eq!(notice.title, "Now Playing");
    assert_eq!(notice.description, "Night Drive by Lo Fi Kid");
}

#[test]
fn test_selecting_loaded_item_toggles_without_reload() {
    let mut h = Harness::new();
    let item = indie("abc123", "Night Drive");
    h.player.select(item.clone()).unwrap();
    h.pump();
    assert_eq!(h.player.output().bind_count(), 1);

    h.player.select(item.clone()).unwrap();
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Paused));
    h.player.select(item).unwrap();
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Playing));
    assert_eq!(h.player.output().bind_count(), 1);
}

#[test]
fn test_same_id_from_other_source_is_a_new_item() {
    let mut h = Harness::new();
    h.player.select(indie("42", "Indie 42")).unwrap();
    h.pump();

    h.player.select(song("42", true)).unwrap();
    assert_eq!(h.player.output().bind_count(), 2);
    assert_eq!(h.player.output().source(), Some("https://cdn.example/320.mp4"));
}

#[test]
fn test_new_selection_resets_elapsed_before_load() {
    let mut h = Harness::new();
    h.player.select(indie("a", "First")).unwrap();
    h.pump();
    h.player.output_mut().advance(30.0);
    h.pump();
    assert_eq!(h.player.session().elapsed(), 30.0);
    h.player.output_mut().clear_ops();

    h.player.select(indie("b", "Second")).unwrap();
    assert_eq!(h.player.session().elapsed(), 0.0);
    assert_eq!(h.player.state(), SessionState::Loading);

    let ops = h.player.output().ops();
    assert_eq!(ops[0], OutputOp::Pause);
    assert_eq!(ops[1], OutputOp::Seek(0.0));
    assert!(matches!(ops[2], OutputOp::Bind(_)));
}

#[test]
fn test_events_of_previous_binding_are_ignored() {
    let (output, events) = SimulatedOutput::new();
    let mut h = Harness::with_output(output, events);

    h.player.select(indie("a", "First")).unwrap();
    let first = h.player.output().current_binding().unwrap();
    h.player.select(indie("b", "Second")).unwrap();

    let outcome = h
        .player
        .handle_event(&DeviceEvent::new(first, DeviceSignal::Error("late".into())));
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(h.player.state(), SessionState::Loading);
}

#[test]
fn test_missing_stream_errors_without_device_interaction() {
    let mut h = Harness::new();
    let err = h.player.select(song("s1", false)).unwrap_err();

    assert_eq!(err, ControlError::NoStreamResolvable("Perfect".into()));
    assert_eq!(h.player.state(), SessionState::Errored);
    assert_eq!(h.player.output().bind_count(), 0);

    let notice = h.last_notice().unwrap();
    assert_eq!(notice.title, "Playback Error");
    assert_eq!(notice.description, "No playable stream for Perfect.");
}

#[test]
fn test_load_error_stops_playback() {
    let (mut output, events) = SimulatedOutput::new();
    output.mark_broken("https://discoveryprovider.audius.co/v1/tracks/bad/stream");
    let mut h = Harness::with_output(output, events);

    h.player.select(indie("bad", "Broken")).unwrap();
    h.pump();

    assert_eq!(h.player.state(), SessionState::Errored);
    assert!(!h.player.output().is_playing());
    assert_eq!(h.player.output().source(), None);

    let notice = h.last_notice().unwrap();
    assert_eq!(notice.title, "Audio Error");
    assert_eq!(
        notice.description,
        "This song is currently unavailable. Please try another one."
    );
}

#[test]
fn test_reselecting_errored_item_retries() {
    let (mut output, events) = SimulatedOutput::new();
    output.mark_broken("https://discoveryprovider.audius.co/v1/tracks/bad/stream");
    let mut h = Harness::with_output(output, events);

    let item = indie("bad", "Broken");
    h.player.select(item.clone()).unwrap();
    h.pump();
    h.player.select(item).unwrap();
    assert_eq!(h.player.output().bind_count(), 2);
}

#[test]
fn test_toggle_is_noop_when_empty_or_loading() {
    let (output, events) = SimulatedOutput::new();
    let mut h = Harness::with_output(output, events);

    h.player.toggle().unwrap();
    assert_eq!(h.player.state(), SessionState::Empty);

    h.player.select(indie("a", "First")).unwrap();
    h.player.toggle().unwrap();
    assert_eq!(h.player.state(), SessionState::Loading);
    assert!(!h.player.output().ops().contains(&OutputOp::Play));
}

#[test]
fn test_rejected_resume_stays_paused() {
    let mut h = Harness::new();
    h.player.select(indie("a", "First")).unwrap();
    h.pump();
    h.player.toggle().unwrap();
    h.last_notice();

    h.player.output_mut().set_reject_play(true);
    let err = h.player.toggle().unwrap_err();
    assert!(matches!(err, ControlError::PlaybackResume(_)));
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Paused));

    let notice = h.last_notice().unwrap();
    assert_eq!(notice.title, "Playback Error");
    assert_eq!(notice.description, "Failed to toggle playback.");
}

#[test]
fn test_volume_changes_keep_transport_state() {
    let mut h = Harness::new();
    h.player.select(indie("a", "First")).unwrap();
    h.pump();

    h.player.set_volume(0);
    h.player.set_volume(80);
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Playing));
    assert_eq!(h.player.output().volume().percent(), 80);

    h.player.toggle().unwrap();
    h.player.set_volume(0);
    h.player.set_volume(80);
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Paused));
}

#[test]
fn test_seek_requires_known_duration() {
    let (output, events) = SimulatedOutput::new();
    let mut h = Harness::with_output(output, events);
    h.player.select(indie("a", "First")).unwrap();
    assert!(!h.player.seek_fraction(0.5));

    let binding = h.player.output().current_binding().unwrap();
    h.player.handle_event(&DeviceEvent::new(
        binding,
        DeviceSignal::MetadataReady { duration: 200.0 },
    ));
    assert!(h.player.seek_fraction(0.5));
    assert_eq!(h.player.output().position(), 100.0);
    assert!(h.player.seek_percent(25.0));
    assert_eq!(h.player.session().elapsed(), 50.0);
    assert!(h.player.seek_fraction(3.0));
    assert_eq!(h.player.session().elapsed(), 200.0);
}

#[test]
fn test_end_of_item_pauses_at_end() {
    let mut h = Harness::new();
    h.player.select(indie("a", "First")).unwrap();
    h.pump();
    h.player.output_mut().advance(500.0);

    let outcomes = h.pump();
    assert_eq!(outcomes.last(), Some(&EventOutcome::Ended));
    assert_eq!(h.player.state(), SessionState::Ready(Transport::Paused));
    assert_eq!(h.player.progress().fraction, 1.0);
}

#[test]
fn test_close_returns_to_empty() {
    let mut h = Harness::new();
    h.player.set_volume(30);
    h.player.select(indie("a", "First")).unwrap();
    h.pump();

    h.player.close();
    assert_eq!(h.player.state(), SessionState::Empty);
    assert!(h.player.current().is_none());
    assert_eq!(h.player.output().source(), None);
    assert_eq!(h.player.session().volume().percent(), 30);
}
