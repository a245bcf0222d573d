use super::*;
use serde_json::json;

#[test]
fn text_keeps_empty_and_stringifies_scalars() {
    assert_eq!(value_text(&json!("")), Some(String::new()));
    assert_eq!(value_text(&json!(12)), Some("12".to_owned()));
    assert_eq!(value_text(&json!(null)), None);
    assert_eq!(value_text(&json!(["a"])), None);
}

#[test]
fn text_list_promotes_single_values() {
    assert_eq!(value_text_list(&json!("one")), vec!["one".to_owned()]);
    assert_eq!(
        value_text_list(&json!(["a", 2, null, "c"])),
        vec!["a".to_owned(), "2".to_owned(), "c".to_owned()]
    );
    assert!(value_text_list(&json!({"k": "v"})).is_empty());
}

#[test]
fn numbers_accept_numeric_strings() {
    assert_eq!(value_u32(&json!("3")), Some(3));
    assert_eq!(value_u32(&json!(-1)), None);
    assert_eq!(value_f64(&json!("2.5")), Some(2.5));
    assert_eq!(value_f64(&json!("abc")), None);
}

#[test]
fn vertices_distinguish_resolved_from_placeholders() {
    match value_vertices(&json!([[-1, 1, 0], [1, 1, 0], [0, -1]])) {
        Some(Vertices::Resolved(pts)) => {
            assert_eq!(pts.len(), 3);
            assert_eq!(pts[2], Point3::new(0.0, -1.0, 0.0));
        }
        other => panic!("expected resolved, got {other:?}"),
    }

    match value_vertices(&json!(["A_PT", "B_PT", "C_PT"])) {
        Some(Vertices::Unresolved(items)) => assert_eq!(items, vec!["A_PT", "B_PT", "C_PT"]),
        other => panic!("expected unresolved, got {other:?}"),
    }

    // One bad item poisons the whole list.
    assert!(matches!(
        value_vertices(&json!([[0, 0, 0], "M_PT"])),
        Some(Vertices::Unresolved(_))
    ));
    assert_eq!(value_vertices(&json!([])), None);
    assert_eq!(value_vertices(&json!(null)), None);
    assert!(matches!(
        value_vertices(&json!("see figure")),
        Some(Vertices::Unresolved(_))
    ));
}

#[test]
fn coords_keep_placeholders() {
    assert_eq!(
        value_coord(&json!({"x": 1, "y": 2})),
        Some(Coord::At(Point3::new(1.0, 2.0, 0.0)))
    );
    assert_eq!(
        value_coord(&json!("A_PT + UP")),
        Some(Coord::Placeholder("A_PT + UP".to_owned()))
    );
    assert_eq!(value_coord(&json!(null)), None);
}
