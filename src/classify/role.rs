//! Free-text role labels → structural categories.
//!
//! Matching is plain substring containment over the lowercased role, walked in a fixed
//! priority order per segment kind. The first category with a matching trigger wins. When no
//! role trigger matches, the element's `shape` gets one more chance through a small shape
//! table. Nothing here ever fails: an unmatched element is [`RoleCategory::Unclassified`].
//!
//! Because matching is substring-based, vocabulary not seen so far can land in an unintended
//! category (e.g. a role mentioning both "阴影" and "标注" is an annotation). Keep the tables
//! ordered from most to least specific.

/// Structural category of a [`crate::VisualElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    ShadedRegion,
    Outline,
    GenericPolygon,
    VertexLabelSet,
    SpecialPointSet,
    TextAnnotation,
    HighlightPolygon,
    LabelForHighlight,
    BottomCaption,
    Unclassified,
}

/// Which segment kind the element belongs to. The same words mean different things in a
/// drawing segment and a highlight segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleContext {
    GeometryDrawing,
    HighlightGeometry,
}

type TriggerTable = &'static [(RoleCategory, &'static [&'static str])];

const GEOMETRY_ROLE_TRIGGERS: TriggerTable = &[
    (
        RoleCategory::TextAnnotation,
        &["标注", "注释", "文字", "annotation", "caption", "note", "text"],
    ),
    (
        RoleCategory::VertexLabelSet,
        &["顶点标签", "顶点", "标签", "vertex", "label"],
    ),
    (
        RoleCategory::SpecialPointSet,
        &["中点", "特殊点", "交点", "点", "midpoint", "point", "dot"],
    ),
    (
        RoleCategory::ShadedRegion,
        &["阴影", "填充区域", "shade", "shaded", "fill region"],
    ),
    (
        RoleCategory::Outline,
        &["主图形", "轮廓", "外框", "边框", "outline", "main shape", "border", "frame"],
    ),
    (
        RoleCategory::GenericPolygon,
        &[
            "三角形", "四边形", "多边形", "图形", "辅助线", "斜边", "线段", "polygon", "triangle",
            "shape", "line",
        ],
    ),
];

const HIGHLIGHT_ROLE_TRIGGERS: TriggerTable = &[
    (
        RoleCategory::BottomCaption,
        &["底部", "结论", "说明", "caption", "conclusion", "note"],
    ),
    (
        RoleCategory::LabelForHighlight,
        &["标签", "名称", "标注", "label", "name"],
    ),
    (
        RoleCategory::HighlightPolygon,
        &[
            "高亮", "三角形", "多边形", "区域", "图形", "highlight", "triangle", "polygon",
            "region", "shape",
        ],
    ),
];

const GEOMETRY_SHAPE_TRIGGERS: TriggerTable = &[
    (RoleCategory::TextAnnotation, &["text", "tex"]),
    (RoleCategory::SpecialPointSet, &["dot", "point"]),
    (
        RoleCategory::GenericPolygon,
        &["polygon", "triangle", "square", "rectangle", "circle", "line"],
    ),
];

const HIGHLIGHT_SHAPE_TRIGGERS: TriggerTable = &[
    (RoleCategory::LabelForHighlight, &["text", "tex"]),
    (
        RoleCategory::HighlightPolygon,
        &["polygon", "triangle", "square", "rectangle", "circle"],
    ),
];

impl RoleContext {
    /// Role triggers in priority order.
    pub fn role_triggers(self) -> TriggerTable {
        match self {
            Self::GeometryDrawing => GEOMETRY_ROLE_TRIGGERS,
            Self::HighlightGeometry => HIGHLIGHT_ROLE_TRIGGERS,
        }
    }

    /// Shape triggers consulted only when no role trigger matched.
    pub fn shape_triggers(self) -> TriggerTable {
        match self {
            Self::GeometryDrawing => GEOMETRY_SHAPE_TRIGGERS,
            Self::HighlightGeometry => HIGHLIGHT_SHAPE_TRIGGERS,
        }
    }
}

fn first_match(table: TriggerTable, haystack: &str) -> Option<RoleCategory> {
    if haystack.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| haystack.contains(t)))
        .map(|(cat, _)| *cat)
}

/// Resolve an element's role (and, failing that, its shape) to a category.
pub fn classify_role(ctx: RoleContext, role: &str, shape: Option<&str>) -> RoleCategory {
    let role = role.trim().to_lowercase();
    if let Some(cat) = first_match(ctx.role_triggers(), &role) {
        return cat;
    }
    let shape = shape.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    first_match(ctx.shape_triggers(), &shape).unwrap_or(RoleCategory::Unclassified)
}

#[cfg(test)]
#[path = "../../tests/unit/classify/role.rs"]
mod tests;
