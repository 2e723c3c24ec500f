use super::*;
use crate::animation::ease::Ease;
use crate::animation::value::{Prop, PropValue};

fn fade(sel: &str) -> TweenSpec {
    TweenSpec::new(vec![sel.into()]).to(Prop::Opacity, PropValue::Number(0.0))
}

fn board() -> Storyboard {
    let mut sb = Storyboard::new();
    sb.eases.register("hop", [0.9, 0.0, 0.1, 1.0]).unwrap();
    sb.push_timeline(
        Timeline::new("images")
            .to("reveal", fade(".img").ease(Ease::parse("hop")))
            .to("grow", fade(".hero")),
    );
    sb.push_timeline(Timeline::new("text").triggered().to("words", fade(".word")));
    sb.push_stage(Stage::new("rotate", Action::StartRotation));
    sb.push_stage(Stage::new("play-text", Action::PlayTimeline("text".into())));
    sb.push_trigger(Trigger::on_start("reveal", "rotate").after(1.0));
    sb.push_trigger(Trigger::on_start("grow", "play-text"));
    sb
}

fn err_text(sb: &Storyboard) -> String {
    sb.validate().unwrap_err().to_string()
}

#[test]
fn well_formed_board_validates() {
    board().validate().unwrap();
}

#[test]
fn lookup_distinguishes_stage_kinds() {
    let sb = board();
    assert!(matches!(sb.lookup("images"), Some(StageRef::Timeline(_))));
    assert!(matches!(
        sb.lookup("grow"),
        Some(StageRef::Step { index: 1, .. })
    ));
    assert!(matches!(sb.lookup("rotate"), Some(StageRef::Detached(_))));
    assert!(sb.lookup("nope").is_none());
}

#[test]
fn triggers_from_filters_by_edge() {
    let sb = board();
    let t = sb.triggers_from("reveal", Edge::Start);
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].target, "rotate");
    assert_eq!(t[0].delay, 1.0);
    assert!(sb.triggers_from("reveal", Edge::Complete).is_empty());
    assert_eq!(sb.triggers_from("grow", Edge::Start)[0].target, "play-text");
}

#[test]
fn duplicate_names_rejected() {
    let mut sb = board();
    sb.push_stage(Stage::new("reveal", Action::StartRotation));
    assert!(err_text(&sb).contains("duplicate stage name \"reveal\""));
}

#[test]
fn unknown_ease_rejected() {
    let mut sb = board();
    sb.eases = EaseRegistry::new();
    assert!(err_text(&sb).contains("hop"));
}

#[test]
fn dangling_trigger_endpoints_rejected() {
    let mut sb = board();
    sb.push_trigger(Trigger::on_complete("ghost", "rotate"));
    assert!(err_text(&sb).contains("unknown source \"ghost\""));

    let mut sb = board();
    sb.push_trigger(Trigger::on_complete("reveal", "ghost"));
    assert!(err_text(&sb).contains("unknown target \"ghost\""));

    let mut sb = board();
    sb.push_trigger(Trigger::on_complete("rotate", "grow"));
    assert!(err_text(&sb).contains("timeline step"));

    let mut sb = board();
    sb.push_stage(Stage::new("bad", Action::PlayTimeline("nope".into())));
    assert!(err_text(&sb).contains("unknown timeline \"nope\""));
}

#[test]
fn negative_trigger_delay_rejected() {
    let mut sb = board();
    sb.push_trigger(Trigger::on_start("images", "rotate").after(-0.5));
    assert!(err_text(&sb).contains("delay"));
}

#[test]
fn cycles_rejected() {
    let mut sb = board();
    // words completing replays its own timeline.
    sb.push_trigger(Trigger::on_complete("words", "text"));
    assert!(err_text(&sb).contains("trigger cycle"));

    let mut sb = board();
    sb.push_stage(Stage::new("a", Action::Set(SetSpec::new(vec![]))));
    sb.push_stage(Stage::new("b", Action::Set(SetSpec::new(vec![]))));
    sb.push_trigger(Trigger::on_start("a", "b"));
    sb.push_trigger(Trigger::on_complete("b", "a"));
    assert!(err_text(&sb).contains("a -> b -> a") || err_text(&sb).contains("b -> a -> b"));
}

#[test]
fn json_round_trip_preserves_board() {
    let sb = board();
    let json = serde_json::to_string(&sb).unwrap();
    let back = Storyboard::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, sb);
    back.validate().unwrap();
}

#[test]
fn loaded_board_with_invalid_curve_rejected() {
    let mut json = serde_json::to_value(board()).unwrap();
    json["eases"]["curves"]["hop"] = serde_json::json!([2.0, 0.0, 0.1, 1.0]);
    let text = json.to_string();
    assert!(Storyboard::from_reader(text.as_bytes()).is_err());
}
