use super::*;

#[test]
fn time_window_contains_boundaries() {
    let w = TimeWindow::new(2.0, 5.0).unwrap();
    assert!(!w.contains(1.999));
    assert!(w.contains(2.0));
    assert!(w.contains(4.9));
    assert!(!w.contains(5.0));
    assert_eq!(w.duration(), 3.0);
}

#[test]
fn time_window_rejects_inverted_and_nan() {
    assert!(TimeWindow::new(5.0, 5.0).is_err());
    assert!(TimeWindow::new(6.0, 5.0).is_err());
    assert!(TimeWindow::new(-1.0, 5.0).is_err());
    assert!(TimeWindow::new(f64::NAN, 5.0).is_err());
}

#[test]
fn clock_text_formats_minutes_and_hours() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(9.7), "0:09");
    assert_eq!(format_clock(75.0), "1:15");
    assert_eq!(format_clock(3725.0), "1:02:05");
    assert_eq!(format_clock(-3.0), "0:00");
    assert_eq!(format_clock(f64::NAN), "0:00");
}

#[test]
fn ms_conversions_are_inverse() {
    assert_eq!(ms_to_secs(secs_to_ms(12.5)), 12.5);
}
