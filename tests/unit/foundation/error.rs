use super::*;
use crate::normalize::schema::PathElem;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StoryError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StoryError::media("x").to_string().contains("media error:"));
    assert!(StoryError::sync("x").to_string().contains("sync error:"));
    assert!(
        StoryError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn schema_errors_render_their_path() {
    let err = StoryError::from(SchemaError::at(
        &[PathElem::Field("segments")],
        "must be an array",
    ));
    assert!(err.is_schema());
    assert_eq!(err.to_string(), "schema error: $.segments: must be an array");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StoryError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_schema());
}
