use super::*;
use serde_json::json;

fn row(value: Value) -> RawRow {
    serde_json::from_value(value).expect("row")
}

#[test]
fn normalizes_full_row() {
    let entry = row(json!({
        "Player": "#1 Chen",
        "StartSec": 10,
        "EndSec": 30,
        "EmbedURL": "https://www.youtube.com/embed/QImBolnTVH8?enablejsapi=1",
        "Title": "Warmup Theme A",
        "Volume": 35
    }))
    .normalize();

    assert_eq!(entry.id, EntryId::from("#1 Chen"));
    assert_eq!(entry.start_sec, 10.0);
    assert_eq!(entry.end_sec, Some(30.0));
    assert_eq!(entry.title, "Warmup Theme A");
    assert_eq!(entry.volume, Some(35));
}

#[test]
fn empty_end_sec_means_natural_end_not_zero() {
    let entry = row(json!({ "Player": "#2 Lee", "EndSec": "", "EmbedURL": "x" })).normalize();
    assert_eq!(entry.end_sec, None);
    assert_eq!(entry.start_sec, 0.0);
    assert_eq!(entry.volume, None);
    assert_eq!(entry.effective_volume(), 20);
}

#[test]
fn numeric_strings_are_coerced() {
    let entry = row(json!({
        "Player": 7,
        "StartSec": " 12.5 ",
        "EndSec": "40",
        "Volume": "250"
    }))
    .normalize();

    assert_eq!(entry.id.as_str(), "7");
    assert_eq!(entry.start_sec, 12.5);
    assert_eq!(entry.end_sec, Some(40.0));
    assert_eq!(entry.volume, Some(100));
}

#[test]
fn falls_back_through_alternate_keys() {
    let entry = row(json!({ "player": null, "name": "Backup", "url": "https://youtu.be/abcdef1" }))
        .normalize();
    assert_eq!(entry.id.as_str(), "Backup");
    assert_eq!(entry.media_ref, "https://youtu.be/abcdef1");
}

#[test]
fn missing_everything_yields_empty_entry() {
    let entry = RawRow::default().normalize();
    assert_eq!(entry.id.as_str(), "");
    assert_eq!(entry.media_ref, "");
    assert_eq!(entry.end_sec, None);
}

#[test]
fn clamp_volume_floors_and_bounds() {
    assert_eq!(clamp_volume(137.0), 100);
    assert_eq!(clamp_volume(-5.0), 0);
    assert_eq!(clamp_volume(42.9), 42);
    assert_eq!(clamp_volume(f64::NAN), 0);
}
