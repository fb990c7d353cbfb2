//! Play-now preemption and backlog reporting
//!
//! Real clock with hour-long tracks, so advance timers never fire during
//! the test and every transition is driven explicitly.

mod helpers;

use helpers::*;
use spinq_common::{Event, TrackId};
use spinq_qd::playback::{paginate, BACKLOG_PAGE_SIZE};

#[tokio::test]
async fn test_play_now_interrupts_and_discards_current() {
    let provider = FakeProvider::new();
    provider.insert("long", FakeTrack::new("Long", 3600));
    provider.insert("urgent", FakeTrack::new("Urgent", 3600));
    let mut rig = Rig::start(provider, false).await;

    rig.handle.enqueue(TrackId::new("long"), false, false);
    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackStarted { id, .. } if id.as_str() == "long")
    })
    .await;

    rig.handle.enqueue(TrackId::new("urgent"), false, true);

    // Front insert reports position zero.
    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::TrackQueued { id, position, .. }
            if id.as_str() == "urgent" && *position == 0)
    })
    .await;

    // The interrupted track finishes as not-completed and is gone for good.
    let finished = wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackFinished { id, .. } if id.as_str() == "long")
    })
    .await;
    match finished {
        Event::PlaybackFinished { completed, .. } => assert!(!completed),
        other => panic!("unexpected event: {:?}", other),
    }

    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackStarted { id, .. } if id.as_str() == "urgent")
    })
    .await;

    let lines = rig.handle.list_backlog().await.unwrap();
    assert!(
        lines[0].starts_with("Now: [urgent] Urgent"),
        "unexpected head line: {}",
        lines[0]
    );
    assert!(
        !lines.iter().any(|l| l.contains("[long]")),
        "interrupted track must not be re-queued: {:?}",
        lines
    );
    assert!(lines.last().unwrap().starts_with("Total remaining playtime:"));
}

#[tokio::test]
async fn test_skip_advances_to_next_track() {
    let provider = FakeProvider::new();
    provider.insert("first", FakeTrack::new("First", 3600));
    provider.insert("second", FakeTrack::new("Second", 3600));
    let mut rig = Rig::start(provider, false).await;

    rig.handle.enqueue(TrackId::new("first"), false, false);
    rig.handle.enqueue(TrackId::new("second"), false, false);

    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackStarted { id, .. } if id.as_str() == "first")
    })
    .await;

    rig.handle.request_advance();

    let finished = wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackFinished { id, .. } if id.as_str() == "first")
    })
    .await;
    match finished {
        Event::PlaybackFinished { completed, .. } => {
            assert!(!completed, "a skip is not a natural completion")
        }
        other => panic!("unexpected event: {:?}", other),
    }

    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackStarted { id, .. } if id.as_str() == "second")
    })
    .await;
}

#[tokio::test]
async fn test_playback_waits_for_session() {
    let provider = FakeProvider::new();
    provider.insert("alpha", FakeTrack::new("Alpha", 3600));

    let dir = tempfile::tempdir().unwrap();
    let mut rig = Rig::start_in(dir, provider, false).await;

    // No session yet: the track resolves and preloads but never starts.
    rig.handle.enqueue(TrackId::new("alpha"), false, false);
    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PreloadStarted { id, .. } if id.as_str() == "alpha")
    })
    .await;

    rig.connect().await;

    wait_for_event(&mut rig.events, WAIT, |e| {
        matches!(e, Event::PlaybackStarted { id, .. } if id.as_str() == "alpha")
    })
    .await;
    assert_eq!(rig.voice.play_count(), 1);
}

#[tokio::test]
async fn test_backlog_listing_paginates() {
    let lines: Vec<String> = (0..25).map(|i| format!("{}. track", i + 1)).collect();
    let pages = paginate(&lines, BACKLOG_PAGE_SIZE);
    assert_eq!(pages.len(), 3);
    assert!(pages[2].starts_with("21. track"));
}
