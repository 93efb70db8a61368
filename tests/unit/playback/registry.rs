use super::*;
use crate::playback::sink::SimulatedSink;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn bind_replace_and_unbind() {
    let mut reg = SinkRegistry::new();
    assert!(reg.bind("a", Box::new(SimulatedSink::new())).is_none());
    assert!(reg.bind("a", Box::new(SimulatedSink::new())).is_some());
    assert!(reg.bind("b", Box::new(SimulatedSink::new())).is_none());
    assert_eq!(reg.len(), 2);
    assert!(reg.contains("a"));

    assert!(reg.unbind("a").is_some());
    assert!(reg.unbind("a").is_none());
    assert!(!reg.contains("a"));

    reg.clear();
    assert!(reg.is_empty());
}

#[test]
fn for_each_reaches_every_sink() {
    let a = SimulatedSink::new();
    let b = SimulatedSink::new();
    let mut reg = SinkRegistry::new();
    reg.bind("a", Box::new(a.clone()));
    reg.bind("b", Box::new(b.clone()));

    reg.for_each_mut(|_, s| s.set_muted(true));
    assert!(a.muted() && b.muted());

    reg.get_mut("a").unwrap().set_current_time(4.0);
    assert_eq!(reg.get("a").unwrap().current_time(), 4.0);
    assert_eq!(format!("{reg:?}"), "SinkRegistry { ids: [\"a\", \"b\"] }");
}

#[test]
fn ui_sinks_update_both_handles() {
    let text = Rc::new(RefCell::new(String::new()));
    let ratio = Rc::new(RefCell::new(0.0));
    let mut ui = UiSinks::default();
    {
        let text = text.clone();
        ui.time_text = Some(Box::new(move |t: &str| *text.borrow_mut() = t.to_owned()));
    }
    {
        let ratio = ratio.clone();
        ui.progress = Some(Box::new(move |r: f64| *ratio.borrow_mut() = r));
    }

    ui.update("1:05", 0.5);
    assert_eq!(text.borrow().as_str(), "1:05");
    assert_eq!(*ratio.borrow(), 0.5);

    ui.clear();
    ui.update("9:99", 1.0);
    assert_eq!(text.borrow().as_str(), "1:05");
}
