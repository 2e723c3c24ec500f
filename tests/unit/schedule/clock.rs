use super::*;

fn drain(clock: &mut Clock<&'static str>, until: f64) -> Vec<(f64, &'static str)> {
    let mut out = Vec::new();
    while let Some(e) = clock.pop_due(until) {
        out.push(e);
    }
    out
}

#[test]
fn events_pop_in_time_order() {
    let mut c = Clock::new();
    c.schedule_at(2.0, "b").unwrap();
    c.schedule_at(0.5, "a").unwrap();
    c.schedule_at(3.0, "c").unwrap();
    assert_eq!(c.next_at(), Some(0.5));
    assert_eq!(drain(&mut c, 2.5), vec![(0.5, "a"), (2.0, "b")]);
    assert_eq!(c.now(), 2.0);
    assert_eq!(c.len(), 1);
}

#[test]
fn equal_times_keep_insertion_order() {
    let mut c = Clock::new();
    for name in ["first", "second", "third"] {
        c.schedule_at(1.0, name).unwrap();
    }
    let got: Vec<&str> = drain(&mut c, 1.0).into_iter().map(|(_, e)| e).collect();
    assert_eq!(got, vec!["first", "second", "third"]);
}

#[test]
fn past_and_non_finite_times_rejected() {
    let mut c: Clock<&str> = Clock::new();
    c.advance(5.0);
    assert!(c.schedule_at(4.0, "late").is_err());
    assert!(c.schedule_at(f64::INFINITY, "never").is_err());
    assert!(c.schedule_in(-1.0, "neg").is_err());
    c.schedule_in(0.0, "now").unwrap();
    assert_eq!(c.next_at(), Some(5.0));
}

#[test]
fn advance_never_goes_backwards() {
    let mut c: Clock<()> = Clock::new();
    c.advance(3.0);
    c.advance(1.0);
    c.advance(f64::NAN);
    assert_eq!(c.now(), 3.0);
    assert!(c.is_idle());
    assert!(c.pop_due(10.0).is_none());
}

#[test]
fn relative_scheduling_uses_current_time() {
    let mut c = Clock::new();
    c.schedule_at(1.0, "tick").unwrap();
    let _ = c.pop_due(1.0);
    for i in 0..20 {
        c.schedule_in(f64::from(i) * 0.15, "cycle").unwrap();
    }
    let times: Vec<f64> = drain(&mut c, 100.0).into_iter().map(|(t, _)| t).collect();
    assert_eq!(times.len(), 20);
    assert!((times[19] - (1.0 + 2.85)).abs() < 1e-9);
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}
