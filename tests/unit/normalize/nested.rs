use super::*;
use crate::storyboard::model::Coord;
use crate::foundation::core::Point3;
use serde_json::json;

#[test]
fn style_object_keys_win_over_element_keys() {
    let el = element(&json!({
        "role": "阴影",
        "fill": "#000000",
        "opacity": 0.9,
        "style": {"fill": "#112233", "descriptor": "opacity 0.2"}
    }));
    assert_eq!(el.style.keys.get("fill"), Some(&json!("#112233")));
    assert_eq!(el.style.keys.get("opacity"), Some(&json!(0.9)));
    assert_eq!(el.style.descriptor.as_deref(), Some("opacity 0.2"));
}

#[test]
fn labels_accept_list_and_map_forms() {
    let el = element(&json!({
        "role": "顶点标签",
        "labels": [{"text": "A", "position": [-1, 1, 0]}, "B", {"label": "C", "pos": "C_PT"}]
    }));
    let labels = el.labels.unwrap();
    assert_eq!(labels.len(), 3);
    assert_eq!(labels[0].position, Some(Coord::At(Point3::new(-1.0, 1.0, 0.0))));
    assert_eq!(labels[1].text, "B");
    assert_eq!(labels[1].position, None);
    assert_eq!(labels[2].position, Some(Coord::Placeholder("C_PT".to_owned())));

    let el = element(&json!({"role": "顶点标签", "labels": {"D": [1, 1, 0]}}));
    assert_eq!(el.labels.unwrap()[0].text, "D");
}

#[test]
fn points_accept_list_and_map_forms() {
    let el = element(&json!({
        "role": "中点",
        "points": [{"label": "M", "position": [0, 1.25, 0]}, {"name": "N"}]
    }));
    let pts = el.points.unwrap();
    assert_eq!(pts[0].label.as_deref(), Some("M"));
    assert_eq!(pts[1].position, None);

    let el = element(&json!({"role": "中点", "points": {"M": [0, 1, 0]}}));
    assert_eq!(el.points.unwrap()[0].label.as_deref(), Some("M"));
}

#[test]
fn non_object_entry_keeps_its_text() {
    let el = element(&json!("loose note"));
    assert_eq!(el.role, "");
    assert_eq!(el.text.as_deref(), Some("loose note"));
}

#[test]
fn text_card_takes_label_then_lines() {
    let card = fill_text_card(
        TextCard::default(),
        &[
            json!({"role": "题目标签", "text": "题  目"}),
            json!({"role": "正文", "text": "第一行"}),
            json!({"role": "正文", "lines": ["第二行", "第三行"]}),
        ],
    );
    assert_eq!(card.label.as_deref(), Some("题  目"));
    assert_eq!(card.lines, vec!["第一行", "第二行", "第三行"]);
}

#[test]
fn answer_slots_fill_only_missing_fields() {
    let card = fill_answer(
        AnswerReveal {
            answer: Some("18 cm²".to_owned()),
            ..AnswerReveal::default()
        },
        &[
            json!({"role": "问题回顾", "text": "三角形 BEF 的面积 ="}),
            json!({"role": "最终答案", "text": "ignored"}),
            json!({"role": "关键提示", "text": "化整为零"}),
        ],
    );
    assert_eq!(card.answer.as_deref(), Some("18 cm²"));
    assert_eq!(card.question.as_deref(), Some("三角形 BEF 的面积 ="));
    assert_eq!(card.key_insight.as_deref(), Some("化整为零"));
}
