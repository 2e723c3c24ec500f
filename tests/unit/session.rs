use super::*;
use crate::animation::value::{Prop, PropValue};
use crate::config::RotationConfig;
use crate::content::pool::ImagePool;
use crate::timeline::step::{SetSpec, TweenSpec};
use crate::timeline::storyboard::{Stage, Trigger};
use crate::timeline::timeline::Timeline;

fn tree() -> (SceneTree, NodeId, NodeId) {
    let mut tree = SceneTree::new();
    let a = tree.append_element(tree.root(), "div", &["a"]).unwrap();
    let b = tree.append_element(tree.root(), "div", &["b"]).unwrap();
    (tree, a, b)
}

fn fade(sel: &str, to: f64, duration: f64) -> TweenSpec {
    TweenSpec::new(vec![sel.into()])
        .to(Prop::Opacity, PropValue::Number(to))
        .duration(duration)
        .ease(crate::animation::ease::Ease::Linear)
}

fn opacity(s: &IntroSession, n: NodeId) -> f64 {
    match s.tree().computed(n, Prop::Opacity) {
        PropValue::Number(v) => v,
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn construction_starts_autostart_timelines() {
    let (tree, _, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("fade-a", fade(".a", 0.0, 1.0)));
    sb.push_timeline(Timeline::new("later").triggered().to("fade-b", fade(".b", 0.0, 1.0)));
    let s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();

    assert_eq!(s.timeline_state("main"), Some(TimelineState::Running));
    assert_eq!(s.timeline_state("later"), Some(TimelineState::NotStarted));
    assert_eq!(s.timeline_state("nope"), None);
    assert_eq!(s.trace().started_at("main"), Some(0.0));
    assert_eq!(s.trace().started_at("fade-a"), Some(0.0));
}

#[test]
fn tweens_interpolate_and_complete() {
    let (tree, a, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(
        Timeline::new("main")
            .to("out", fade(".a", 0.0, 1.0))
            .to("in", fade(".a", 1.0, 2.0)),
    );
    let mut s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();

    s.advance_to(0.5).unwrap();
    assert!((opacity(&s, a) - 0.5).abs() < 1e-9);
    s.advance_to(2.0).unwrap();
    assert!((opacity(&s, a) - 0.5).abs() < 1e-9);
    let end = s.run_to_end().unwrap();
    assert_eq!(end, 3.0);
    assert_eq!(opacity(&s, a), 1.0);
    assert_eq!(s.timeline_state("main"), Some(TimelineState::Complete));
    assert_eq!(s.trace().completed_at("out"), Some(1.0));
    assert_eq!(s.trace().completed_at("main"), Some(3.0));
    assert!(s.is_finished());
}

#[test]
fn missing_targets_keep_timing() {
    let (tree, a, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(
        Timeline::new("main")
            .to("ghost", fade(".missing", 0.0, 1.0))
            .to("real", fade(".a", 0.0, 1.0)),
    );
    let mut s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();
    s.run_to_end().unwrap();
    assert_eq!(s.trace().started_at("real"), Some(1.0));
    assert_eq!(opacity(&s, a), 0.0);
    assert!(s.trace().entries().iter().any(|e| e.event
        == TraceEvent::StepStarted {
            step: "ghost".into(),
            targets: 0
        }));
}

#[test]
fn completion_trigger_starts_when_source_finishes() {
    let (tree, _, b) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("first", fade(".a", 0.0, 1.0).delay(0.5)));
    sb.push_stage(Stage::new("second", Action::Tween(fade(".b", 0.0, 1.0))));
    sb.push_trigger(Trigger::on_complete("first", "second"));
    let mut s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();
    s.advance_to(1.49).unwrap();
    assert_eq!(opacity(&s, b), 1.0);
    s.run_to_end().unwrap();
    assert_eq!(s.trace().started_at("second"), Some(1.5));
    assert_eq!(s.trace().completed_at("second"), Some(2.5));
    assert_eq!(opacity(&s, b), 0.0);
}

#[test]
fn delayed_start_trigger_and_set_stage() {
    let (tree, _, b) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("first", fade(".a", 0.0, 2.0)));
    sb.push_stage(Stage::new(
        "hide-b",
        Action::Set(SetSpec::new(vec![".b".into()]).value(Prop::Opacity, PropValue::Number(0.25))),
    ));
    sb.push_trigger(Trigger::on_start("first", "hide-b").after(1.0));
    let mut s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();
    s.advance_to(0.99).unwrap();
    assert_eq!(opacity(&s, b), 1.0);
    s.advance_to(1.0).unwrap();
    assert_eq!(opacity(&s, b), 0.25);
    assert_eq!(s.trace().completed_at("hide-b"), Some(1.0));
}

#[test]
fn triggered_timeline_plays_once() {
    let (tree, _, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(
        Timeline::new("main")
            .to("one", fade(".a", 0.0, 1.0))
            .to("two", fade(".a", 1.0, 1.0)),
    );
    sb.push_timeline(Timeline::new("text").triggered().to("words", fade(".b", 0.0, 1.0)));
    sb.push_stage(Stage::new("play", Action::PlayTimeline("text".into())));
    sb.push_trigger(Trigger::on_start("one", "play"));
    sb.push_trigger(Trigger::on_start("two", "play"));
    let mut s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();
    s.run_to_end().unwrap();
    let starts = s
        .trace()
        .entries()
        .iter()
        .filter(|e| e.event == TraceEvent::TimelineStarted { timeline: "text".into() })
        .count();
    assert_eq!(starts, 1);
    assert_eq!(s.trace().started_at("text"), Some(0.0));
    assert_eq!(s.timeline_state("text"), Some(TimelineState::Complete));
}

#[test]
fn same_time_events_dispatch_in_declaration_order() {
    let (tree, _, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("go", fade(".a", 0.0, 1.0)));
    for name in ["x", "y", "z"] {
        sb.push_stage(Stage::new(name, Action::Set(SetSpec::new(vec![]))));
        sb.push_trigger(Trigger::on_start("go", name));
    }
    let s = IntroSession::from_storyboard(tree, sb, None, Some(1)).unwrap();
    let invoked: Vec<&str> = s
        .trace()
        .entries()
        .iter()
        .filter(|e| matches!(e.event, TraceEvent::StageInvoked { .. }))
        .filter_map(|e| e.event.name())
        .collect();
    assert_eq!(invoked, vec!["x", "y", "z"]);
}

#[test]
fn rotation_runs_on_the_session_clock() {
    let (tree, a, b) = tree();
    let mut img_tree = tree;
    let img_a = img_tree.append_element(a, "img", &[]).unwrap();
    let img_b = img_tree.append_element(b, "img", &[]).unwrap();
    let settings = RotationConfig {
        total_cycles: 3,
        interval: 0.5,
        ..RotationConfig::default()
    };
    let pool = ImagePool::from_pattern("p{n}.jpg", 4).unwrap();
    let rotator = ImageRotator::new(pool, vec![Some(img_a), Some(img_b)], Some(1), Some(img_b), settings);

    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("reveal", fade(".a", 0.0, 1.0).delay(1.0)));
    sb.push_stage(Stage::new("rotate", Action::StartRotation));
    sb.push_trigger(Trigger::on_start("reveal", "rotate").after(1.0));
    let mut s = IntroSession::from_storyboard(img_tree, sb, Some(rotator), Some(3)).unwrap();
    s.run_to_end().unwrap();

    assert_eq!(s.trace().rotation_times(), vec![2.0, 2.5, 3.0]);
    assert_eq!(
        s.tree().computed(img_b, Prop::Src),
        PropValue::Source("images/img2.jpg".into())
    );
    assert_eq!(s.rotator().map(|r| r.cycles_fired()), Some(3));
}

#[test]
fn start_rotation_without_rotator_is_tolerated() {
    let (tree, _, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("go", fade(".a", 0.0, 1.0)));
    sb.push_stage(Stage::new("rotate", Action::StartRotation));
    sb.push_trigger(Trigger::on_start("go", "rotate"));
    let mut s = IntroSession::from_storyboard(tree, sb, None, None).unwrap();
    s.run_to_end().unwrap();
    assert!(s.trace().rotation_times().is_empty());
    assert_eq!(s.trace().completed_at("rotate"), Some(0.0));
}

#[test]
fn invalid_storyboard_and_times_rejected() {
    let (tree, _, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_trigger(Trigger::on_start("a", "b"));
    assert!(IntroSession::from_storyboard(tree.clone(), sb, None, None).is_err());

    let mut s = IntroSession::from_storyboard(tree, Storyboard::new(), None, None).unwrap();
    assert!(s.advance_to(f64::NAN).is_err());
    s.advance_to(5.0).unwrap();
    assert_eq!(s.now(), 5.0);
    s.advance_to(1.0).unwrap();
    assert_eq!(s.now(), 5.0);
}

#[test]
fn trace_serializes_with_kind_tags() {
    let (tree, _, _) = tree();
    let mut sb = Storyboard::new();
    sb.push_timeline(Timeline::new("main").to("go", fade(".a", 0.0, 1.0)));
    let mut s = IntroSession::from_storyboard(tree, sb, None, None).unwrap();
    s.run_to_end().unwrap();
    let json = serde_json::to_value(s.trace()).unwrap();
    assert_eq!(json[0]["kind"], "timeline_started");
    assert_eq!(json[0]["timeline"], "main");
    assert_eq!(json[1]["kind"], "step_started");
    assert_eq!(json[1]["targets"], 1);
    assert_eq!(json.as_array().unwrap().last().unwrap()["kind"], "timeline_completed");
}
