use super::*;
use crate::test_support::{entries, entry, AdapterCall, RecordingAdapter};

fn ready_controller(control: VolumeControl) -> (PlaybackController<RecordingAdapter>, RecordingAdapter) {
    let probe = RecordingAdapter::new();
    let mut controller = PlaybackController::new(PlaybackConfig::default(), control);
    controller.attach(probe.clone());
    controller.on_adapter_ready();
    (controller, probe)
}

#[test]
fn play_before_ready_queues_and_ready_plays_it() {
    let probe = RecordingAdapter::new();
    let mut controller = PlaybackController::new(PlaybackConfig::default(), VolumeControl::Full);
    let a = Entry::new("A", "https://www.youtube.com/embed/VID123?x=1");

    assert_eq!(controller.play(&a), PlayOutcome::Queued);
    assert_eq!(controller.phase(), PlaybackPhase::Queued);
    assert_eq!(controller.active_id(), None);

    controller.attach(probe.clone());
    let outcome = controller.on_adapter_event(AdapterEvent::Ready);

    assert_eq!(
        outcome,
        Some(PlayOutcome::Started {
            media_id: "VID123".to_string()
        })
    );
    assert!(controller.pending().is_none());
    assert!(controller.is_active("A"));
    assert_eq!(probe.loads()[0].media_id, "VID123");
}

#[test]
fn ready_before_attach_plays_pending_on_attach() {
    let probe = RecordingAdapter::new();
    let mut controller = PlaybackController::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.play(&entry("A"));

    assert_eq!(controller.on_adapter_ready(), Some(PlayOutcome::Queued));
    assert!(controller.pending().is_some());

    let outcome = controller.attach(probe.clone());
    assert_eq!(
        outcome,
        Some(PlayOutcome::Started {
            media_id: "VIDA00".to_string()
        })
    );
    assert!(controller.is_active("A"));
}

#[test]
fn repeated_play_while_queued_replaces_pending() {
    let mut controller =
        PlaybackController::<RecordingAdapter>::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.play(&entry("A"));
    controller.play(&entry("B"));
    assert_eq!(controller.pending().map(|e| e.id.as_str()), Some("B"));
}

#[test]
fn attached_but_not_ready_still_queues() {
    let probe = RecordingAdapter::new();
    let mut controller = PlaybackController::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.attach(probe.clone());
    assert_eq!(controller.play(&entry("A")), PlayOutcome::Queued);
    assert!(probe.calls().is_empty());
}

#[test]
fn play_loads_segment_and_applies_entry_volume() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    let a = entry("A").with_segment(10.0, Some(30.0)).with_volume(55);

    controller.play(&a);

    assert_eq!(
        probe.calls(),
        vec![
            AdapterCall::Load(LoadRequest {
                media_id: "VIDA00".to_string(),
                start_seconds: 10.0,
                end_seconds: Some(30.0),
            }),
            AdapterCall::SetVolume(55),
            AdapterCall::Unmute,
        ]
    );
    assert_eq!(controller.segment(), (10.0, Some(30.0)));
    assert_eq!(controller.volume(), 55);
    assert!(!controller.is_paused());
    assert!(controller.guard().is_active());
}

#[test]
fn default_volume_is_twenty() {
    let (mut controller, _probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A"));
    assert_eq!(controller.volume(), 20);
}

#[test]
fn display_only_platform_skips_adapter_volume() {
    let (mut controller, probe) = ready_controller(VolumeControl::DisplayOnly);
    controller.play(&entry("A").with_volume(70));

    assert_eq!(controller.volume(), 70);
    assert!(!probe
        .calls()
        .iter()
        .any(|call| matches!(call, AdapterCall::SetVolume(_) | AdapterCall::Unmute)));
}

#[test]
fn unresolvable_media_leaves_session_untouched() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A").with_segment(5.0, Some(9.0)));
    probe.clear_calls();

    let broken = Entry::new("B", "https://example.com/clip.mp4").with_segment(1.0, None);
    assert_eq!(controller.play(&broken), PlayOutcome::Unresolvable);

    assert!(controller.is_active("A"));
    assert_eq!(controller.segment(), (5.0, Some(9.0)));
    assert!(probe.calls().is_empty());
}

#[test]
fn open_ended_segment_does_not_start_guard() {
    let (mut controller, _probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A").with_segment(0.0, None));
    assert!(!controller.guard().is_active());
}

#[test]
fn guard_needs_time_query_capability() {
    let mut probe = RecordingAdapter::new();
    probe.time_query = false;
    let mut controller = PlaybackController::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.attach(probe);
    controller.on_adapter_ready();
    controller.play(&entry("A").with_segment(0.0, Some(12.0)));
    assert!(!controller.guard().is_active());
}

#[test]
fn guard_tick_loops_near_segment_end() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A").with_segment(10.0, Some(30.0)));
    probe.clear_calls();

    probe.set_current_time(29.6);
    assert!(!controller.on_guard_tick());
    assert!(probe.calls().is_empty());

    probe.set_current_time(29.8);
    assert!(controller.on_guard_tick());
    assert_eq!(
        probe.calls(),
        vec![AdapterCall::Seek(10.0, true), AdapterCall::Play]
    );
}

#[test]
fn ended_state_seeks_back_to_segment_start() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A").with_segment(4.0, None));
    probe.clear_calls();

    controller.on_adapter_event(AdapterEvent::StateChanged(PlayerState::Ended));
    controller.on_adapter_event(AdapterEvent::StateChanged(PlayerState::Buffering));

    assert_eq!(
        probe.calls(),
        vec![AdapterCall::Seek(4.0, true), AdapterCall::Play]
    );
}

#[test]
fn toggle_pauses_and_resumes_active_entry() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    let a = entry("A");
    controller.toggle(&a);
    probe.clear_calls();

    assert_eq!(controller.toggle(&a), None);
    assert!(controller.is_paused());
    assert_eq!(controller.phase(), PlaybackPhase::Paused);

    controller.toggle(&a);
    assert!(!controller.is_paused());
    assert_eq!(probe.calls(), vec![AdapterCall::Pause, AdapterCall::Play]);
}

#[test]
fn toggle_other_entry_switches_playback() {
    let (mut controller, _probe) = ready_controller(VolumeControl::Full);
    controller.toggle(&entry("A"));
    controller.pause();
    controller.toggle(&entry("B"));
    assert!(controller.is_active("B"));
    assert!(!controller.is_paused());
}

#[test]
fn stop_resets_session_and_is_idempotent() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A").with_segment(0.0, Some(8.0)));

    controller.stop();
    controller.stop();

    assert_eq!(controller.active_id(), None);
    assert_eq!(controller.volume(), 0);
    assert!(!controller.is_paused());
    assert!(!controller.guard().is_active());
    assert_eq!(controller.phase(), PlaybackPhase::Idle);
    assert_eq!(
        probe
            .calls()
            .iter()
            .filter(|call| **call == AdapterCall::Stop)
            .count(),
        2
    );
}

#[test]
fn stop_falls_back_to_pause_when_unsupported() {
    let mut probe = RecordingAdapter::new();
    probe.stop_supported = false;
    let mut controller = PlaybackController::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.attach(probe.clone());
    controller.on_adapter_ready();
    controller.play(&entry("A"));
    probe.clear_calls();

    controller.stop();
    assert_eq!(probe.calls(), vec![AdapterCall::Pause]);
}

#[test]
fn stop_clears_state_even_when_adapter_fails() {
    let mut probe = RecordingAdapter::new();
    probe.fail_stop = true;
    let mut controller = PlaybackController::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.attach(probe);
    controller.on_adapter_ready();
    controller.play(&entry("A"));

    controller.stop();
    assert_eq!(controller.active_id(), None);
}

#[test]
fn stop_without_adapter_is_safe() {
    let mut controller =
        PlaybackController::<RecordingAdapter>::new(PlaybackConfig::default(), VolumeControl::Full);
    controller.stop();
    assert_eq!(controller.phase(), PlaybackPhase::Idle);
}

#[test]
fn play_next_advances_and_wraps() {
    let (mut controller, _probe) = ready_controller(VolumeControl::Full);
    let starters = entries(&["A", "B", "C"]);

    controller.play(&starters[1]);
    controller.play_next(&starters);
    assert!(controller.is_active("C"));

    controller.play_next(&starters);
    assert!(controller.is_active("A"));
}

#[test]
fn play_next_starts_from_first_when_idle_or_unknown() {
    let (mut controller, _probe) = ready_controller(VolumeControl::Full);
    let starters = entries(&["A", "B"]);

    controller.play_next(&starters);
    assert!(controller.is_active("A"));

    controller.play(&entry("Z"));
    controller.play_next(&starters);
    assert!(controller.is_active("A"));
}

#[test]
fn play_next_on_empty_starters_is_noop() {
    let (mut controller, _probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("B"));
    assert_eq!(controller.play_next(&[]), None);
    assert!(controller.is_active("B"));
}

#[test]
fn teardown_destroys_adapter_once() {
    let (mut controller, probe) = ready_controller(VolumeControl::Full);
    controller.play(&entry("A").with_segment(0.0, Some(3.0)));

    controller.teardown();
    controller.teardown();

    assert!(!controller.guard().is_active());
    assert!(controller.adapter().is_none());
    assert_eq!(
        probe
            .calls()
            .iter()
            .filter(|call| **call == AdapterCall::Destroy)
            .count(),
        1
    );
}

#[tokio::test]
async fn guard_tick_future_fires_while_active() {
    let config = PlaybackConfig {
        guard_interval: Duration::from_millis(5),
        ..PlaybackConfig::default()
    };
    let probe = RecordingAdapter::new();
    let mut controller = PlaybackController::new(config, VolumeControl::Full);
    controller.attach(probe.clone());
    controller.on_adapter_ready();
    controller.play(&entry("A").with_segment(2.0, Some(6.0)));
    probe.set_current_time(5.9);

    tokio::time::timeout(Duration::from_secs(1), controller.guard_tick())
        .await
        .expect("guard tick");
    assert!(controller.on_guard_tick());
}
