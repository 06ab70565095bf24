use super::*;

#[test]
fn resolves_embed_form() {
    assert_eq!(
        resolve_media_id("https://www.youtube.com/embed/VID123?x=1").as_deref(),
        Some("VID123")
    );
}

#[test]
fn resolves_watch_query_form() {
    assert_eq!(
        resolve_media_id("https://www.youtube.com/watch?list=abc&v=QImBolnTVH8&t=4").as_deref(),
        Some("QImBolnTVH8")
    );
}

#[test]
fn resolves_short_link_form() {
    assert_eq!(
        resolve_media_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
        Some("dQw4w9WgXcQ")
    );
}

#[test]
fn embed_form_wins_over_query_form() {
    assert_eq!(
        resolve_media_id("https://host/embed/EMBED01?v=QUERY01").as_deref(),
        Some("EMBED01")
    );
}

#[test]
fn rejects_short_or_missing_ids() {
    assert_eq!(resolve_media_id(""), None);
    assert_eq!(resolve_media_id("https://www.youtube.com/embed/abc"), None);
    assert_eq!(resolve_media_id("https://example.com/video.mp4"), None);
}
