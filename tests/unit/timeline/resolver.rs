use super::*;
use crate::timeline::builder::build_timeline;
use crate::timeline::canvas::Canvas;
use crate::timeline::model::ResourceType;

fn worked_keyframes() -> Vec<Keyframe> {
    let canvas = Canvas::from_json_str(include_str!("../../data/worked_scenario.json")).unwrap();
    build_timeline(&canvas)
        .timeline()
        .unwrap()
        .keyframes()
        .to_vec()
}

fn summary(changes: &[Keyframe]) -> Vec<(&str, KeyframeKind, f64, bool)> {
    changes
        .iter()
        .map(|k| (k.id.as_str(), k.kind, k.time, k.is_prime))
        .collect()
}

#[test]
fn zero_to_eight_reveals_background_and_first_caption() {
    let kfs = worked_keyframes();
    let r = resolve(0, &kfs, 0.0, 8.0);
    assert_eq!(r.next_index, 2);
    assert_eq!(
        summary(&r.changes),
        vec![
            ("anno1", KeyframeKind::Enter, 0.0, false),
            ("anno2", KeyframeKind::Enter, 2.0, false),
        ]
    );
}

#[test]
fn enter_and_exit_inside_window_cancel_out() {
    let kfs = worked_keyframes();
    let r = resolve(0, &kfs, 0.0, 9.0);
    assert_eq!(r.next_index, 4);
    assert_eq!(
        summary(&r.changes),
        vec![
            ("anno1", KeyframeKind::Enter, 0.0, false),
            ("anno4", KeyframeKind::Enter, 9.0, false),
        ]
    );
}

#[test]
fn first_video_enters_as_prime() {
    let kfs = worked_keyframes();
    let r = resolve(0, &kfs, 0.0, 13.0);
    assert_eq!(r.next_index, 5);
    assert!(
        r.changes
            .iter()
            .any(|k| k.id == "anno5" && k.kind == KeyframeKind::Enter && k.is_prime)
    );
}

#[test]
fn prime_transfers_at_exact_exit_timestamp() {
    let kfs = worked_keyframes();
    let r = resolve(5, &kfs, 13.0, 26.0);
    assert_eq!(r.next_index, 8);
    assert_eq!(
        summary(&r.changes),
        vec![
            ("anno4", KeyframeKind::Exit, 20.0, false),
            ("anno5", KeyframeKind::Exit, 26.0, false),
            ("anno6", KeyframeKind::Enter, 26.0, true),
        ]
    );
}

#[test]
fn overlapping_video_is_promoted_when_prime_exits() {
    let kfs = worked_keyframes();
    let r = resolve(9, &kfs, 30.0, 40.0);
    assert_eq!(r.next_index, 12);
    assert_eq!(
        summary(&r.changes),
        vec![
            ("anno6", KeyframeKind::Exit, 38.0, false),
            ("anno8", KeyframeKind::Change, 38.0, true),
            ("anno7", KeyframeKind::Enter, 38.0, false),
        ]
    );
}

#[test]
fn resolve_is_idempotent() {
    let kfs = worked_keyframes();
    let a = resolve(0, &kfs, 0.0, 33.0);
    let b = resolve(0, &kfs, 0.0, 33.0);
    assert_eq!(a, b);
}

#[test]
fn nothing_beyond_target_leaves_pointer_unchanged() {
    let kfs = worked_keyframes();
    let r = resolve(3, &kfs, 9.0, 500.0);
    assert_eq!(r.next_index, 3);
    assert!(r.changes.is_empty());
}

#[test]
fn no_motion_inside_a_gap_yields_nothing() {
    let kfs = worked_keyframes();
    let r = resolve(2, &kfs, 8.0, 8.5);
    assert_eq!(r.next_index, 2);
    assert!(r.changes.is_empty());
}

#[test]
fn stepwise_and_single_jump_reach_the_same_visible_set() {
    let kfs = worked_keyframes();

    let mut stepped: std::collections::BTreeSet<String> = Default::default();
    let mut ptr = 0;
    let mut t = 0.0;
    while t < 47.0 {
        let next = t + 0.25;
        let r = resolve(ptr, &kfs, t, next);
        ptr = r.next_index;
        for k in r.changes {
            if k.reveals() {
                stepped.insert(k.id);
            } else {
                stepped.remove(&k.id);
            }
        }
        t = next;
    }

    let jumped: std::collections::BTreeSet<String> = resolve(0, &kfs, 0.0, 47.0)
        .changes
        .into_iter()
        .filter(|k| k.reveals())
        .map(|k| k.id)
        .collect();
    assert_eq!(stepped, jumped);
    assert_eq!(
        jumped.into_iter().collect::<Vec<_>>(),
        vec!["anno1".to_owned(), "anno8".to_owned()]
    );
}

#[test]
fn exit_after_change_hides_an_item_that_was_already_visible() {
    let kfs = vec![
        Keyframe::enter("a", ResourceType::Audio, 0.0).prime(),
        Keyframe::enter("b", ResourceType::Audio, 1.0),
        Keyframe::exit("a", ResourceType::Audio, 2.0),
        Keyframe::change("b", ResourceType::Audio, 2.0),
        Keyframe::exit("b", ResourceType::Audio, 3.0),
        Keyframe::exit("z", ResourceType::Image, 10.0),
    ];
    let r = resolve(2, &kfs, 1.5, 3.5);
    assert_eq!(
        summary(&r.changes),
        vec![
            ("a", KeyframeKind::Exit, 2.0, false),
            ("b", KeyframeKind::Exit, 3.0, false),
        ]
    );
}

#[test]
fn collapse_applies_cancellation_to_a_trailing_run() {
    let run = vec![
        Keyframe::enter("a", ResourceType::Image, 12.0),
        Keyframe::exit("a", ResourceType::Image, 14.0),
        Keyframe::exit("b", ResourceType::Video, 15.0),
    ];
    let changes = collapse(&run);
    assert_eq!(changes, vec![Keyframe::exit("b", ResourceType::Video, 15.0)]);
}
