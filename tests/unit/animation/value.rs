use super::*;

#[test]
fn parse_picks_shape_from_text() {
    assert_eq!(PropValue::parse("1").unwrap(), PropValue::Number(1.0));
    assert_eq!(
        PropValue::parse("-15vw").unwrap(),
        PropValue::Length(Length::vw(-15.0))
    );
    assert_eq!(
        PropValue::parse("35%").unwrap(),
        PropValue::Length(Length::percent(35.0))
    );
    assert_eq!(
        PropValue::parse("0% 0%").unwrap(),
        PropValue::Pair(Length::percent(0.0), Length::percent(0.0))
    );
    assert_eq!(
        PropValue::parse("#fff").unwrap(),
        PropValue::Color(Rgba8::rgb(255, 255, 255))
    );
    assert_eq!(
        PropValue::parse("images/img2.jpg").unwrap(),
        PropValue::Source("images/img2.jpg".to_owned())
    );
}

#[test]
fn clip_path_parses_and_displays() {
    let c = ClipPath::parse("polygon(20% 10%, 80% 10%, 80% 90%, 20% 90%)").unwrap();
    assert_eq!(c, ClipPath::rect(20.0, 10.0, 80.0, 90.0));
    assert_eq!(c.to_string(), "polygon(20% 10%, 80% 10%, 80% 90%, 20% 90%)");
    assert!((c.coverage() - 0.48).abs() < 1e-9);

    assert!(ClipPath::parse("polygon(0% 0%, 100% 0%)").is_err());
    assert!(ClipPath::parse("polygon(0px 0%, 100% 0%, 0% 100%)").is_err());
    assert!(ClipPath::parse("circle(50%)").is_err());
}

#[test]
fn coerce_maps_numbers_to_px_lengths() {
    assert_eq!(
        PropValue::Number(-50.0).coerce(Prop::Y).unwrap(),
        PropValue::Length(Length::px(-50.0))
    );
    assert!(PropValue::Number(1.0).coerce(Prop::ClipPath).is_err());
    assert!(
        PropValue::Color(Rgba8::rgb(1, 2, 3))
            .coerce(Prop::Opacity)
            .is_err()
    );
    assert!(PropValue::Number(f64::NAN).coerce(Prop::Opacity).is_err());
}

#[test]
fn interpolate_numbers_and_lengths() {
    let v = PropValue::interpolate(&PropValue::Number(0.0), &PropValue::Number(4.0), 0.25);
    assert_eq!(v, PropValue::Number(1.0));

    // A zero px start adopts the target unit.
    let v = PropValue::interpolate(
        &PropValue::Length(Length::px(0.0)),
        &PropValue::Length(Length::vw(-15.0)),
        0.5,
    );
    assert_eq!(v, PropValue::Length(Length::vw(-7.5)));
}

#[test]
fn incompatible_shapes_hold_then_snap() {
    let from = PropValue::Length(Length::px(10.0));
    let to = PropValue::Length(Length::percent(50.0));
    assert_eq!(PropValue::interpolate(&from, &to, 0.5), from);
    assert_eq!(PropValue::interpolate(&from, &to, 1.0), to);

    let a = PropValue::Source("a.jpg".to_owned());
    let b = PropValue::Source("b.jpg".to_owned());
    assert_eq!(PropValue::interpolate(&a, &b, 0.99), a);
    assert_eq!(PropValue::interpolate(&a, &b, 1.0), b);
}

#[test]
fn clip_paths_blend_pointwise() {
    let from = PropValue::ClipPath(ClipPath::rect(0.0, 100.0, 100.0, 100.0));
    let to = PropValue::ClipPath(ClipPath::full());
    let PropValue::ClipPath(mid) = PropValue::interpolate(&from, &to, 0.5) else {
        panic!("expected clip path");
    };
    assert_eq!(mid, ClipPath::rect(0.0, 50.0, 100.0, 100.0));
}

#[test]
fn json_uses_numbers_and_css_text() {
    let v: PropValue = serde_json::from_str("0.5").unwrap();
    assert_eq!(v, PropValue::Number(0.5));
    let v: PropValue = serde_json::from_str("\"-125%\"").unwrap();
    assert_eq!(serde_json::to_string(&v).unwrap(), "\"-125%\"");
    assert!(serde_json::from_str::<PropValue>("\"#zz\"").is_err());
}
