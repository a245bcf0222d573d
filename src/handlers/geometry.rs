//! `geometry_drawing` and `highlight_geometry`.
//!
//! Every element is classified, styled and emitted in input order. Vertex lists that are still
//! authoring placeholders never reach drawing code: they become an `UNRESOLVED GEOMETRY`
//! marker comment plus a diagnostic.

use crate::classify::role::{RoleCategory, RoleContext, classify_role};
use crate::emit::ops::{DiagnosticKind, Handle, SegmentCode, Slot};
use crate::emit::python::{py_num, py_point, py_str};
use crate::foundation::core::Point3;
use crate::handlers::carry::CarryOver;
use crate::handlers::{SegmentCtx, nonblank, tx};
use crate::style::extract::{DEFAULT_FONT_SIZE, ExtractedStyle, extract_style};
use crate::storyboard::model::{Coord, Figure, Label, VisualElement, Vertices};

/// Marker text for placeholder geometry in the generated code.
pub const UNRESOLVED_MARKER: &str = "UNRESOLVED GEOMETRY";

const LABEL_OFFSET: f64 = 0.3;
const CAPTION_FONT_SIZE: u32 = 26;

fn resolved(el: &VisualElement) -> Option<&[Point3]> {
    match &el.vertices {
        Some(Vertices::Resolved(pts)) => Some(pts),
        _ => None,
    }
}

fn role_display(el: &VisualElement) -> String {
    match (el.role.trim(), el.shape.as_deref()) {
        ("", Some(shape)) => format!("<no role> shape={shape}"),
        ("", None) => "<no role>".to_owned(),
        (role, Some(shape)) => format!("{role} shape={shape}"),
        (role, None) => role.to_owned(),
    }
}

fn unresolved(code: &mut SegmentCode, what: String, raw: &[String]) {
    code.comment(format!("{UNRESOLVED_MARKER}: {what} [{}]", raw.join(", ")));
    code.diagnose(DiagnosticKind::UnresolvedGeometry, what);
}

fn passthrough(code: &mut SegmentCode, i: usize, el: &VisualElement) {
    code.comment(format!(
        "unclassified element {i} ({}) passed through",
        role_display(el)
    ));
    code.diagnose(
        DiagnosticKind::UnclassifiedElement,
        format!("element {i} ({})", role_display(el)),
    );
}

fn point_list(pts: &[Point3]) -> String {
    pts.iter()
        .map(|p| py_point(*p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn text_kwargs(style: &ExtractedStyle, font_size: u32) -> String {
    format!("font_size={font_size}, color={}", py_str(style.color.as_str()))
}

/// Keyword arguments for closed shapes of `cat`.
fn shape_kwargs(cat: RoleCategory, style: &ExtractedStyle) -> String {
    let c = py_str(style.color.as_str());
    let o = py_num(style.opacity);
    match cat {
        RoleCategory::ShadedRegion => format!("fill_color={c}, fill_opacity={o}, stroke_width=0"),
        RoleCategory::Outline => format!("fill_opacity={o}, stroke_color={c}, stroke_width=2.5"),
        _ => format!("fill_color={c}, fill_opacity={o}, stroke_color={c}, stroke_width=2"),
    }
}

/// Drawing expression for a shape-like element, or `None` when its vertices are placeholders.
fn shape_expr(el: &VisualElement, cat: RoleCategory, style: &ExtractedStyle) -> Option<String> {
    let c = py_str(style.color.as_str());
    let kw = shape_kwargs(cat, style);
    match &el.vertices {
        Some(Vertices::Unresolved(_)) => None,
        Some(Vertices::Resolved(pts)) => Some(match pts.as_slice() {
            [p] => format!("Dot({}, radius=0.08, color={c})", py_point(*p)),
            [a, b] => format!(
                "Line({}, {}, color={c}, stroke_width=2.5)",
                py_point(*a),
                py_point(*b)
            ),
            pts => format!("Polygon({}, {kw})", point_list(pts)),
        }),
        None => {
            let shape = el.shape.as_deref().unwrap_or_default().to_lowercase();
            Some(if shape.contains("square") {
                format!("Square(side_length=2.5, {kw})")
            } else if shape.contains("circle") {
                format!("Circle(radius=1.25, {kw})")
            } else if shape.contains("triangle") {
                format!("Triangle({kw}).scale(1.25)")
            } else if shape.contains("line") {
                format!("Line(LEFT * 1.5, RIGHT * 1.5, color={c}, stroke_width=2.5)")
            } else {
                format!("Rectangle(width=4, height=2.5, {kw})")
            })
        }
    }
}

fn draw_shape(
    code: &mut SegmentCode,
    i: usize,
    el: &VisualElement,
    cat: RoleCategory,
    style: &ExtractedStyle,
) -> Vec<Handle> {
    let Some(expr) = shape_expr(el, cat, style) else {
        if let Some(Vertices::Unresolved(raw)) = &el.vertices {
            unresolved(code, format!("element {i} ({})", role_display(el)), raw);
        }
        return Vec::new();
    };
    let (local, anim, run_time) = match cat {
        RoleCategory::ShadedRegion => ("shaded", "FadeIn", 0.6),
        RoleCategory::Outline => ("outline", "Create", 0.8),
        _ => ("shape", "Create", 0.6),
    };
    let h = code.create(&format!("{local}_{i}"), expr);
    code.reveal(vec![format!("{anim}({h})")], run_time);
    let mut made = vec![h];
    if el.labels.as_ref().is_some_and(|l| !l.is_empty()) {
        made.extend(draw_labels(code, i, el, style));
    }
    made
}

/// Labels of `el`; a bare `text` stands in for a single label.
fn element_labels(el: &VisualElement) -> Vec<Label> {
    match &el.labels {
        Some(labels) if !labels.is_empty() => labels.clone(),
        _ => nonblank(el.text.as_deref())
            .map(|t| {
                vec![Label {
                    text: t.to_owned(),
                    position: None,
                }]
            })
            .unwrap_or_default(),
    }
}

fn draw_labels(
    code: &mut SegmentCode,
    i: usize,
    el: &VisualElement,
    style: &ExtractedStyle,
) -> Vec<Handle> {
    let labels = element_labels(el);
    if labels.is_empty() {
        code.comment(format!("element {i} has no label text"));
        return Vec::new();
    }
    let verts = resolved(el);
    let center = verts.and_then(Point3::centroid);
    let mut made = Vec::with_capacity(labels.len());
    let mut vertices_flagged = false;
    for (j, label) in labels.iter().enumerate() {
        let pos = match &label.position {
            Some(Coord::At(p)) => Some(*p),
            Some(Coord::Placeholder(raw)) => {
                unresolved(
                    code,
                    format!("label {j} of element {i} ({})", label.text),
                    std::slice::from_ref(raw),
                );
                continue;
            }
            None => match (&el.vertices, verts, center) {
                (Some(Vertices::Unresolved(raw)), _, _) => {
                    if !vertices_flagged {
                        unresolved(code, format!("element {i} ({})", role_display(el)), raw);
                        vertices_flagged = true;
                    }
                    continue;
                }
                (_, Some(v), Some(c)) if labels.len() > 1 => {
                    v.get(j).map(|p| p.pushed_away_from(c, LABEL_OFFSET))
                }
                (_, _, Some(c)) => Some(c),
                _ => None,
            },
        };
        let mut expr = tx(&label.text, &text_kwargs(style, style.font_size));
        if let Some(p) = pos {
            expr.push_str(&format!(".move_to({})", py_point(p)));
        }
        made.push(code.create(&format!("label_{i}_{j}"), expr));
    }
    if !made.is_empty() {
        let anims = made.iter().map(Handle::as_str).collect::<Vec<_>>().join(", ");
        code.reveal(vec![format!("FadeIn({anims})")], 0.5);
    }
    made
}

fn draw_points(
    code: &mut SegmentCode,
    i: usize,
    el: &VisualElement,
    style: &ExtractedStyle,
) -> Vec<Handle> {
    let marks: Vec<(Option<String>, Option<Coord>)> = match (&el.points, &el.vertices) {
        (Some(points), _) if !points.is_empty() => points
            .iter()
            .map(|m| (m.label.clone(), m.position.clone()))
            .collect(),
        (_, Some(Vertices::Resolved(pts))) => {
            let labels = element_labels(el);
            pts.iter()
                .enumerate()
                .map(|(j, p)| (labels.get(j).map(|l| l.text.clone()), Some(Coord::At(*p))))
                .collect()
        }
        (_, Some(Vertices::Unresolved(raw))) => {
            unresolved(code, format!("element {i} ({})", role_display(el)), raw);
            return Vec::new();
        }
        _ => {
            code.comment(format!("element {i} has no points"));
            return Vec::new();
        }
    };

    let c = py_str(style.color.as_str());
    let mut made = Vec::new();
    for (j, (label, position)) in marks.into_iter().enumerate() {
        let what = format!(
            "point {j} of element {i} ({})",
            label.as_deref().unwrap_or("unlabeled")
        );
        let p = match position {
            Some(Coord::At(p)) => p,
            Some(Coord::Placeholder(raw)) => {
                unresolved(code, what, &[raw]);
                continue;
            }
            None => {
                unresolved(code, what, &["<no position>".to_owned()]);
                continue;
            }
        };
        let dot = code.create(
            &format!("dot_{i}_{j}"),
            format!("Dot({}, radius=0.08, color={c})", py_point(p)),
        );
        made.push(dot.clone());
        if let Some(label) = nonblank(label.as_deref()) {
            let expr = format!(
                "{}.next_to({dot}, UP, buff=0.1)",
                tx(label, &text_kwargs(style, style.font_size))
            );
            made.push(code.create(&format!("dot_label_{i}_{j}"), expr));
        }
    }
    if !made.is_empty() {
        let anims = made.iter().map(Handle::as_str).collect::<Vec<_>>().join(", ");
        code.reveal(vec![format!("FadeIn({anims})")], 0.5);
    }
    made
}

enum Placement {
    At(Point3),
    Free,
    Unresolved,
}

/// Where a single text element goes: its own label position, else the centre of its vertices.
fn text_placement(code: &mut SegmentCode, i: usize, el: &VisualElement) -> Placement {
    let explicit = el
        .labels
        .as_ref()
        .and_then(|l| l.first())
        .and_then(|l| l.position.as_ref());
    match (explicit, &el.vertices) {
        (Some(Coord::At(p)), _) => Placement::At(*p),
        (Some(Coord::Placeholder(raw)), _) => {
            unresolved(
                code,
                format!("element {i} ({})", role_display(el)),
                std::slice::from_ref(raw),
            );
            Placement::Unresolved
        }
        (None, Some(Vertices::Resolved(pts))) => {
            Point3::centroid(pts).map_or(Placement::Free, Placement::At)
        }
        (None, Some(Vertices::Unresolved(raw))) => {
            unresolved(code, format!("element {i} ({})", role_display(el)), raw);
            Placement::Unresolved
        }
        (None, None) => Placement::Free,
    }
}

fn annotation_text(el: &VisualElement) -> Option<String> {
    nonblank(el.text.as_deref()).map(str::to_owned).or_else(|| {
        let labels = el.labels.as_ref()?;
        let joined = labels
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        nonblank(Some(joined.as_str())).map(str::to_owned)
    })
}

fn draw_annotation(
    code: &mut SegmentCode,
    i: usize,
    el: &VisualElement,
    style: &ExtractedStyle,
) -> Vec<Handle> {
    let Some(text) = annotation_text(el) else {
        code.comment(format!("element {i} has no annotation text"));
        return Vec::new();
    };
    let pos = match text_placement(code, i, el) {
        Placement::At(p) => Some(p),
        Placement::Free => None,
        Placement::Unresolved => return Vec::new(),
    };
    let mut expr = tx(&text, &text_kwargs(style, style.font_size));
    if let Some(p) = pos {
        expr.push_str(&format!(".move_to({})", py_point(p)));
    }
    let h = code.create(&format!("note_{i}"), expr);
    code.reveal(vec![format!("FadeIn({h})")], 0.4);
    vec![h]
}

pub(crate) fn geometry_drawing(
    cx: &SegmentCtx<'_>,
    fig: &Figure,
    code: &mut SegmentCode,
    carry: CarryOver,
) -> CarryOver {
    let carry = carry.dispose_stale(Slot::Figure, code);
    let mut members = Vec::new();
    for (i, el) in fig.elements.iter().enumerate() {
        let cat = classify_role(RoleContext::GeometryDrawing, &el.role, el.shape.as_deref());
        let style = extract_style(&el.style, cat);
        tracing::debug!(segment = cx.ordinal, element = i, role = %el.role, ?cat, "classified");
        code.comment(format!("element {i}: {} -> {cat:?}", role_display(el)));
        let made = match cat {
            RoleCategory::ShadedRegion | RoleCategory::Outline | RoleCategory::GenericPolygon => {
                draw_shape(code, i, el, cat, &style)
            }
            RoleCategory::VertexLabelSet => draw_labels(code, i, el, &style),
            RoleCategory::SpecialPointSet => draw_points(code, i, el, &style),
            RoleCategory::TextAnnotation => draw_annotation(code, i, el, &style),
            _ => {
                passthrough(code, i, el);
                Vec::new()
            }
        };
        members.extend(made);
    }
    let carry = if members.is_empty() {
        code.comment("figure has no drawable elements");
        carry
    } else {
        carry.fill(Slot::Figure, members, code)
    };
    cx.hold(code);
    carry
}

pub(crate) fn highlight_geometry(
    cx: &SegmentCtx<'_>,
    fig: &Figure,
    code: &mut SegmentCode,
    carry: CarryOver,
) -> CarryOver {
    let carry = carry.dispose_stale(Slot::Highlight, code);
    let classified: Vec<(RoleCategory, ExtractedStyle)> = fig
        .elements
        .iter()
        .map(|el| {
            let cat = classify_role(RoleContext::HighlightGeometry, &el.role, el.shape.as_deref());
            (cat, extract_style(&el.style, cat))
        })
        .collect();
    // Labels without a position of their own pair, in order, with the drawn polygons.
    let anchors: Vec<Option<Point3>> = fig
        .elements
        .iter()
        .zip(&classified)
        .filter(|(_, (cat, _))| *cat == RoleCategory::HighlightPolygon)
        .map(|(el, _)| resolved(el).and_then(Point3::centroid))
        .collect();

    let mut polygons: Vec<(Handle, String)> = Vec::new();
    let mut labels = Vec::new();
    let mut captions = Vec::new();
    let mut label_rank = 0;
    for (i, (el, (cat, style))) in fig.elements.iter().zip(&classified).enumerate() {
        tracing::debug!(segment = cx.ordinal, element = i, role = %el.role, ?cat, "classified");
        code.comment(format!("element {i}: {} -> {cat:?}", role_display(el)));
        match cat {
            RoleCategory::HighlightPolygon => match shape_expr(el, *cat, style) {
                Some(expr) => {
                    let h = code.create(&format!("hl_{i}"), expr);
                    code.reveal(vec![format!("FadeIn({h})")], 0.7);
                    polygons.push((h, py_str(style.color.as_str())));
                }
                None => {
                    if let Some(Vertices::Unresolved(raw)) = &el.vertices {
                        unresolved(code, format!("element {i} ({})", role_display(el)), raw);
                    }
                }
            },
            RoleCategory::LabelForHighlight => {
                let rank = label_rank;
                label_rank += 1;
                let Some(text) = annotation_text(el) else {
                    code.comment(format!("element {i} has no label text"));
                    continue;
                };
                let pos = match text_placement(code, i, el) {
                    Placement::At(p) => Some(p),
                    Placement::Free => anchors.get(rank).copied().flatten(),
                    Placement::Unresolved => continue,
                };
                let mut expr = tx(&text, &text_kwargs(style, style.font_size));
                if let Some(p) = pos {
                    expr.push_str(&format!(".move_to({})", py_point(p)));
                }
                let h = code.create(&format!("hl_label_{i}"), expr);
                code.reveal(vec![format!("FadeIn({h})")], 0.4);
                labels.push(h);
            }
            RoleCategory::BottomCaption => {
                let Some(text) = annotation_text(el) else {
                    code.comment(format!("element {i} has no caption text"));
                    continue;
                };
                let size = if style.font_size == DEFAULT_FONT_SIZE {
                    CAPTION_FONT_SIZE
                } else {
                    style.font_size
                };
                let expr = format!(
                    "{}.to_edge(DOWN, buff=0.8)",
                    tx(&text, &format!("{}, weight=BOLD", text_kwargs(style, size)))
                );
                captions.push(code.create(&format!("caption_{i}"), expr));
            }
            _ => passthrough(code, i, el),
        }
    }

    if !polygons.is_empty() {
        let anims = polygons
            .iter()
            .map(|(h, c)| format!("Indicate({h}, color={c}, scale_factor=1.15)"))
            .collect();
        code.reveal(anims, 1.0);
    }
    for caption in &captions {
        code.reveal(vec![format!("FadeIn({caption})")], 0.5);
    }
    cx.hold(code);
    code.clear(captions, Vec::new(), 0.3);

    let members: Vec<Handle> = polygons.into_iter().map(|(h, _)| h).chain(labels).collect();
    if members.is_empty() {
        code.comment("highlight has no drawable elements");
        carry
    } else {
        carry.fill(Slot::Highlight, members, code)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/handlers/geometry.rs"]
mod tests;
