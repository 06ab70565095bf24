use super::*;
use std::time::Duration;

fn player() -> (SimulatedPlayer, mpsc::UnboundedReceiver<AdapterEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SimulatedPlayer::new(tx), rx)
}

fn load(player: &mut SimulatedPlayer, start: f64) {
    player
        .load(&LoadRequest {
            media_id: "QImBolnTVH8".to_string(),
            start_seconds: start,
            end_seconds: None,
        })
        .expect("load");
}

#[tokio::test(start_paused = true)]
async fn position_advances_while_playing() {
    let (mut player, _rx) = player();
    load(&mut player, 10.0);

    tokio::time::advance(Duration::from_secs(2)).await;
    let now = player.current_time().expect("time");
    assert!((now - 12.0).abs() < 0.01, "position was {now}");

    player.pause().expect("pause");
    tokio::time::advance(Duration::from_secs(5)).await;
    let frozen = player.current_time().expect("time");
    assert!((frozen - 12.0).abs() < 0.01, "position was {frozen}");
}

#[tokio::test(start_paused = true)]
async fn seek_rebases_position() {
    let (mut player, _rx) = player();
    load(&mut player, 0.0);
    tokio::time::advance(Duration::from_secs(3)).await;

    player.seek(1.5, true).expect("seek");
    let now = player.current_time().expect("time");
    assert!((now - 1.5).abs() < 0.01, "position was {now}");
}

#[test]
fn reports_state_changes() {
    let (mut player, mut rx) = player();
    load(&mut player, 0.0);
    player.pause().expect("pause");
    player.stop().expect("stop");

    let states: Vec<AdapterEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(
        states,
        vec![
            AdapterEvent::StateChanged(PlayerState::Playing),
            AdapterEvent::StateChanged(PlayerState::Paused),
            AdapterEvent::StateChanged(PlayerState::Unstarted),
        ]
    );
}

#[test]
fn volume_and_unmute_are_tracked() {
    let (mut player, _rx) = player();
    assert!(player.is_muted());
    player.set_volume(35).expect("volume");
    player.unmute().expect("unmute");
    assert_eq!(player.volume(), 35);
    assert!(!player.is_muted());
}

#[test]
fn destroyed_player_rejects_commands() {
    let (mut player, _rx) = player();
    player.destroy().expect("destroy");
    assert!(player.play().is_err());
    assert!(player.current_time().is_err());
}

#[test]
fn host_refuses_unmounted_container() {
    let host = SimulatedHost::default();
    let (tx, _rx) = mpsc::unbounded_channel();
    assert!(host.create_player("yt-hidden", tx).is_err());
}

#[test]
fn ready_host_emits_ready_on_creation() {
    let host = SimulatedHost::ready("yt-hidden");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let player = host.create_player("yt-hidden", tx).expect("player");
    assert!(!player.is_playing());
    assert_eq!(rx.try_recv().ok(), Some(AdapterEvent::Ready));
}
