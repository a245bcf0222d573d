use super::*;
use serde_json::json;

fn sample() -> Storyboard {
    Storyboard::from_value(&json!({
        "title": "正方形面积问题",
        "segments": [
            {"id": "intro", "type": "title", "title": "t", "narration": "  同学，我们来看这道题。 "},
            {"type": "summary", "narration": "总结"},
            {"id": "quiet", "type": "summary"},
            {"id": "blank", "type": "summary", "narration": "   "}
        ]
    }))
    .unwrap()
}

#[test]
fn narration_items_skip_silent_segments_and_default_ids() {
    let items = sample().narration_items();
    assert_eq!(
        items,
        vec![
            NarrationItem {
                id: "intro".to_owned(),
                text: "同学，我们来看这道题。".to_owned()
            },
            NarrationItem {
                id: "seg2".to_owned(),
                text: "总结".to_owned()
            },
        ]
    );
}

#[test]
fn apply_durations_matches_by_id() {
    let mut sb = sample();
    let n = sb.apply_durations([("intro", 4.2), ("missing", 1.0), ("quiet", f64::NAN)]);
    assert_eq!(n, 1);
    assert_eq!(sb.segments[0].duration_secs, Some(4.2));
    assert_eq!(sb.segments[2].duration_secs, None);
}

#[test]
fn invalid_json_is_a_schema_error() {
    let err = Storyboard::from_json_str("{ not json").unwrap_err();
    assert!(err.is_schema());
    assert!(err.to_string().contains("not valid JSON"));
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = Storyboard::from_path("definitely/not/here.json").unwrap_err();
    assert!(matches!(err, StoryError::Validation(_)));
}
