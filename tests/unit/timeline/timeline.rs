use super::*;
use crate::animation::value::{Prop, PropValue};

fn fade(duration: f64, delay: f64, stagger: f64) -> TweenSpec {
    TweenSpec::new(vec![".x".into()])
        .to(Prop::Opacity, PropValue::Number(1.0))
        .duration(duration)
        .delay(delay)
        .stagger(stagger)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn appended_steps_chain_after_each_other() {
    let tl = Timeline::new("t")
        .to("a", fade(1.0, 0.5, 0.0))
        .to("b", fade(0.5, 1.0, 0.0));
    let slots = tl.layout(&[1, 1]);
    assert!(close(slots[0].start, 0.5) && close(slots[0].end, 1.5));
    assert!(close(slots[1].start, 2.5) && close(slots[1].end, 3.0));
    assert!(close(tl.duration(&[1, 1]), 3.0));
}

#[test]
fn overlapping_step_shares_previous_start() {
    let tl = Timeline::new("t")
        .to("a", fade(0.15, 1.0, 0.075))
        .with_previous("b", fade(0.15, 0.0, 0.075));
    let slots = tl.layout(&[4, 6]);
    assert!(close(slots[1].start, slots[0].start));
    assert!(close(slots[0].end, 1.0 + 0.15 + 3.0 * 0.075));
    assert!(close(slots[1].end, 1.0 + 0.15 + 5.0 * 0.075));
}

#[test]
fn overlap_delay_is_added_to_the_anchor() {
    let tl = Timeline::new("t")
        .to("a", fade(1.0, 1.5, 0.1))
        .with_previous("b", fade(1.0, 0.25, 0.1));
    let slots = tl.layout(&[3, 5]);
    assert!(close(slots[0].start, 1.5));
    assert!(close(slots[1].start, 1.75));
}

#[test]
fn append_after_overlap_waits_for_the_longest() {
    let tl = Timeline::new("t")
        .to("a", fade(1.0, 0.0, 0.0))
        .with_previous("b", fade(3.0, 0.0, 0.0))
        .to("c", fade(1.0, 0.0, 0.0));
    let slots = tl.layout(&[1, 1, 1]);
    assert!(close(slots[2].start, 3.0));
}

#[test]
fn chained_steps_never_start_early() {
    let tl = Timeline::new("t")
        .to("a", fade(1.0, 2.5, 0.05))
        .to("b", fade(1.0, 2.5, 0.05))
        .to("c", fade(1.5, 0.0, 0.0))
        .to("d", fade(1.5, 0.5, 0.0));
    let counts = [9, 8, 1, 1];
    let slots = tl.layout(&counts);
    for (i, w) in slots.windows(2).enumerate() {
        let prev = &tl.steps[i].tween;
        assert!(w[1].start >= w[0].start + prev.duration - 1e-9);
        assert!(w[1].start >= w[0].end - 1e-9);
    }
    assert!(close(slots[0].end, 3.9));
    assert!(close(slots[1].start, 6.4));
    assert!(close(slots[2].start, 7.75));
}

#[test]
fn empty_step_keeps_its_slot() {
    let tl = Timeline::new("t")
        .to("a", fade(1.0, 0.0, 0.5))
        .to("b", fade(1.0, 0.0, 0.0));
    let slots = tl.layout(&[0, 1]);
    assert!(close(slots[0].end, 1.0));
    assert!(close(slots[1].start, 1.0));
}

#[test]
fn absolute_position() {
    let tl = Timeline::new("t")
        .to("a", fade(1.0, 0.0, 0.0))
        .at("b", 0.25, fade(1.0, 0.0, 0.0));
    let slots = tl.layout(&[1, 1]);
    assert!(close(slots[1].start, 0.25));
    assert_eq!(tl.step_index("b"), Some(1));
    assert_eq!(tl.step_index("zz"), None);
}

#[test]
fn triggered_timelines_do_not_autostart() {
    assert!(Timeline::new("a").autostart);
    assert!(!Timeline::new("a").triggered().autostart);
    let tl: Timeline = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
    assert!(tl.autostart);
    assert!(tl.steps.is_empty());
    assert_eq!(tl.duration(&[]), 0.0);
}
