use super::*;

#[test]
fn partial_block_fills_defaults() {
    let s: EngineSettings =
        serde_json::from_str(r#"{ "show_ms": 500, "fade_ease": "out_quad" }"#).unwrap();
    assert_eq!(s.show_ms, Millis(500));
    assert_eq!(s.fade_ease, Ease::OutQuad);
    assert_eq!(s.hide_ms, Millis(250));
    assert_eq!(s.debounce_ms, Millis(30));
    assert_eq!(s.fade_steps, 20);
    assert_eq!(s.popup_max_width, 300);
    s.validate().unwrap();
}

#[test]
fn degenerate_values_are_rejected() {
    let mut s = EngineSettings::default();
    s.fade_steps = 0;
    assert!(s.validate().is_err());

    let mut s = EngineSettings::default();
    s.densify_target_m = f64::NAN;
    assert!(s.validate().is_err());

    let mut s = EngineSettings::default();
    s.default_icon_size = -1.0;
    assert!(s.validate().is_err());
}
