use super::*;

const HOME: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- generator -->
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" preserveAspectRatio="none"><path d="M0 0L24 24" stroke="{color}" stroke-width="2"/><rect width="4" height="4"/></svg>"#;

#[test]
fn strips_prolog_and_forces_fill_sizing() {
    let t = IconTemplate::parse(HOME).unwrap();
    let m = t.markup();
    assert!(m.starts_with(
        r#"<svg width="100%" height="100%" preserveAspectRatio="xMidYMid meet" viewBox="0 0 24 24" xmlns="#
    ));
    assert!(!m.contains("<?xml"));
    assert!(!m.contains(r#"preserveAspectRatio="none""#));
    // Child attributes are untouched.
    assert!(m.contains(r#"<rect width="4" height="4"/>"#));
    assert!(m.contains(r#"stroke-width="2""#));
}

#[test]
fn keeps_existing_viewbox() {
    let raw = r#"<svg viewBox="0 0 10 5" width='100' height='50'><circle r="{size}"/></svg>"#;
    let t = IconTemplate::parse(raw).unwrap();
    assert_eq!(t.markup().matches("viewBox").count(), 1);
    assert!(t.markup().contains(r#"viewBox="0 0 10 5""#));
    assert!(t.render("red", 50.0).contains(r#"<circle r="50"/>"#));
}

#[test]
fn substitutes_tokens() {
    let t = IconTemplate::parse(HOME).unwrap();
    let out = t.render("#ff0000", 50.0);
    assert!(out.contains(r##"stroke="#ff0000""##));
    assert!(!out.contains("{color}"));
    let sized = t.render_sized("#ff0000", 50.0);
    assert!(sized.starts_with(r#"<svg width="50" height="50" preserveAspectRatio="xMidYMid meet""#));
}

#[test]
fn rejects_non_svg() {
    assert!(IconTemplate::parse("not an icon").is_none());
    assert!(IconTemplate::parse("<html></html>").is_none());
}

#[test]
fn validate_parses_with_usvg() {
    let t = IconTemplate::parse(HOME).unwrap();
    t.validate(32.0).unwrap();

    let broken = IconTemplate::parse("<svg><path d=").unwrap();
    assert!(broken.validate(32.0).is_err());
}
