use super::*;

#[test]
fn defaults_are_valid() {
    let opts = GeneratorOpts::default();
    opts.validate().unwrap();
    assert_eq!(opts.scene_name, "TutorScene");
    assert_eq!(opts.font, "PingFang SC");
}

#[test]
fn scene_name_must_be_an_identifier() {
    for bad in ["", "1Scene", "My Scene", "场景"] {
        let opts = GeneratorOpts {
            scene_name: bad.to_owned(),
            ..GeneratorOpts::default()
        };
        assert!(matches!(opts.validate(), Err(StoryError::Validation(_))), "{bad:?}");
    }
    let ok = GeneratorOpts {
        scene_name: "_Lesson2".to_owned(),
        ..GeneratorOpts::default()
    };
    ok.validate().unwrap();
}

#[test]
fn rejects_bad_colors_and_holds() {
    let bg = GeneratorOpts {
        background: "navy".to_owned(),
        ..GeneratorOpts::default()
    };
    assert!(bg.validate().is_err());
    let hold = GeneratorOpts {
        min_hold_secs: f64::NAN,
        ..GeneratorOpts::default()
    };
    assert!(hold.validate().is_err());
    let neg = GeneratorOpts {
        default_hold_secs: -1.0,
        ..GeneratorOpts::default()
    };
    assert!(neg.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let opts: GeneratorOpts = serde_json::from_str(r#"{"font":"Noto Sans CJK SC"}"#).unwrap();
    assert_eq!(opts.font, "Noto Sans CJK SC");
    assert_eq!(opts.background, "#0f172a");
    assert!(serde_json::from_str::<GeneratorOpts>(r#"{"fps":30}"#).is_err());
}
