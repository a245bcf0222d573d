use super::*;
use crate::emit::ops::Op;
use crate::emit::python::write_ops;
use crate::script::opts::GeneratorOpts;
use crate::storyboard::model::{PointMark, StyleSpec};

fn el(role: &str) -> VisualElement {
    VisualElement {
        role: role.to_owned(),
        ..VisualElement::default()
    }
}

fn tri() -> Vertices {
    Vertices::Resolved(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(0.0, 3.0, 0.0),
    ])
}

fn styled(fill: &str) -> StyleSpec {
    StyleSpec {
        keys: [("fill".to_owned(), serde_json::json!(fill))].into_iter().collect(),
        descriptor: None,
    }
}

type Handler = fn(&SegmentCtx<'_>, &Figure, &mut SegmentCode, CarryOver) -> CarryOver;

fn run(handler: Handler, elements: Vec<VisualElement>, carry: CarryOver) -> (SegmentCode, CarryOver, String) {
    let opts = GeneratorOpts::default();
    let cx = SegmentCtx {
        ordinal: 3,
        duration: None,
        opts: &opts,
    };
    let mut code = SegmentCode::new(3);
    let carry = handler(&cx, &Figure { elements }, &mut code, carry);
    let mut out = String::new();
    write_ops(&mut out, code.ops(), 0);
    (code, carry, out)
}

#[test]
fn shaded_triangle_with_vertex_labels() {
    let shaded = VisualElement {
        vertices: Some(tri()),
        style: styled("#3b82f6"),
        ..el("阴影区域")
    };
    let labels = VisualElement {
        vertices: Some(tri()),
        labels: Some(
            ["A", "B", "C"]
                .iter()
                .map(|t| Label {
                    text: (*t).to_owned(),
                    position: None,
                })
                .collect(),
        ),
        ..el("顶点标签")
    };
    let (code, carry, out) = run(geometry_drawing, vec![shaded, labels], CarryOver::default());

    assert!(out.contains(
        "s3_shaded_0 = Polygon(np.array([0, 0, 0]), np.array([3, 0, 0]), np.array([0, 3, 0]), \
         fill_color=\"#3b82f6\""
    ));
    assert!(out.contains("stroke_width=0"));
    // Multiple labels sit on their vertex, pushed away from the centroid (1, 1).
    assert!(out.contains("s3_label_1_0 = self._tx(\"A\""));
    assert!(out.contains(".move_to(np.array([-0.212, -0.212, 0]))"));
    let live = carry.get(Slot::Figure).unwrap();
    assert_eq!(live.len(), 4);
    assert!(code.diagnostics.is_empty());
    // The figure stays on screen for later segments.
    assert!(code.disposed().is_empty());
    assert!(matches!(code.ops().last(), Some(Op::Wait(_))));
}

#[test]
fn placeholder_vertices_degrade_to_one_marker() {
    let bad = VisualElement {
        vertices: Some(Vertices::Unresolved(vec!["A".to_owned(), "B".to_owned()])),
        ..el("主图形")
    };
    let good = VisualElement {
        vertices: Some(tri()),
        ..el("三角形")
    };
    let (code, carry, out) = run(geometry_drawing, vec![bad, good], CarryOver::default());
    assert_eq!(out.matches(UNRESOLVED_MARKER).count(), 1);
    assert_eq!(out.matches("Polygon(").count(), 1);
    assert!(out.contains("# UNRESOLVED GEOMETRY: element 0 (主图形) [A, B]"));
    assert_eq!(code.diagnostics.len(), 1);
    assert_eq!(code.diagnostics[0].kind, DiagnosticKind::UnresolvedGeometry);
    assert_eq!(carry.get(Slot::Figure).map(<[_]>::len), Some(1));
}

#[test]
fn primitives_follow_the_shape_hint() {
    let circle = VisualElement {
        shape: Some("Circle".to_owned()),
        ..el("轮廓")
    };
    let line = VisualElement {
        vertices: Some(Vertices::Resolved(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ])),
        ..el("辅助线")
    };
    let (_, _, out) = run(geometry_drawing, vec![circle, line], CarryOver::default());
    assert!(out.contains("s3_outline_0 = Circle(radius=1.25,"));
    assert!(out.contains("Create(s3_outline_0)"));
    assert!(out.contains("s3_shape_1 = Line(np.array([0, 0, 0]), np.array([1, 1, 0])"));
}

#[test]
fn special_points_get_dots_and_labels() {
    let pts = VisualElement {
        points: Some(vec![
            PointMark {
                label: Some("M".to_owned()),
                position: Some(Coord::At(Point3::new(1.5, 0.0, 0.0))),
            },
            PointMark {
                label: Some("N".to_owned()),
                position: Some(Coord::Placeholder("midpoint of AC".to_owned())),
            },
        ]),
        ..el("中点")
    };
    let (code, carry, out) = run(geometry_drawing, vec![pts], CarryOver::default());
    assert!(out.contains("s3_dot_0_0 = Dot(np.array([1.5, 0, 0])"));
    assert!(out.contains("s3_dot_label_0_0 = self._tx(\"M\""));
    assert!(out.contains(".next_to(s3_dot_0_0, UP, buff=0.1)"));
    assert_eq!(out.matches(UNRESOLVED_MARKER).count(), 1);
    assert_eq!(code.diagnostics.len(), 1);
    assert_eq!(carry.get(Slot::Figure).map(<[_]>::len), Some(2));
}

#[test]
fn unclassified_elements_pass_through() {
    let (code, carry, out) = run(geometry_drawing, vec![el("神秘物体")], CarryOver::default());
    assert!(out.contains("# unclassified element 0 (神秘物体) passed through"));
    assert_eq!(code.diagnostics[0].kind, DiagnosticKind::UnclassifiedElement);
    assert!(carry.is_empty());
}

#[test]
fn second_drawing_replaces_the_live_figure() {
    let first = VisualElement {
        vertices: Some(tri()),
        ..el("三角形")
    };
    let mut prior = SegmentCode::new(1);
    let carry = CarryOver::default().fill(Slot::Figure, vec![Handle::new(1, "shape_0")], &mut prior);

    let (code, carry, _) = run(geometry_drawing, vec![first], carry);
    assert_eq!(code.disposed_slots, vec![Slot::Figure]);
    assert_eq!(carry.get(Slot::Figure), Some(&[Handle::new(3, "shape_0")][..]));
}

#[test]
fn highlight_pairs_labels_with_polygons_and_clears_captions() {
    let poly = VisualElement {
        vertices: Some(tri()),
        style: styled("#f43f5e"),
        ..el("高亮三角形")
    };
    let label = VisualElement {
        text: Some("△ABC".to_owned()),
        ..el("名称标签")
    };
    let caption = VisualElement {
        text: Some("两个三角形全等".to_owned()),
        ..el("底部结论")
    };
    let (code, carry, out) = run(
        highlight_geometry,
        vec![poly, label, caption],
        CarryOver::default(),
    );

    assert!(out.contains("s3_hl_0 = Polygon("));
    assert!(out.contains("s3_hl_label_1 = self._tx(\"△ABC\""));
    assert!(out.contains(".move_to(np.array([1, 1, 0]))"));
    assert!(out.contains("Indicate(s3_hl_0, color=\"#f43f5e\", scale_factor=1.15)"));
    assert!(out.contains("font_size=26"));
    assert!(out.contains(".to_edge(DOWN, buff=0.8)"));
    assert!(out.contains("self.play(FadeOut(VGroup(s3_caption_2)), run_time=0.3)"));

    assert_eq!(
        carry.get(Slot::Highlight),
        Some(&[Handle::new(3, "hl_0"), Handle::new(3, "hl_label_1")][..])
    );
    assert_eq!(code.disposed(), &[Handle::new(3, "caption_2")]);
}

#[test]
fn empty_highlight_leaves_slot_empty() {
    let (code, carry, out) = run(highlight_geometry, Vec::new(), CarryOver::default());
    assert!(carry.is_empty());
    assert!(out.contains("# highlight has no drawable elements"));
    assert!(code.bound.is_empty());
}
