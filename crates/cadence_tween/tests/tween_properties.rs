//! Integration tests for tween playback
//!
//! These tests verify that:
//! - Tweens land exactly on their targets however time is sliced
//! - From, relative and waypoint tweens resolve their endpoints correctly
//! - Yoyo repeats alternate direction and backward play restores start values
//! - Buffer limits are enforced without corrupting state

mod common;

use cadence_tween::{
    AnimationEvent, EventMask, Interpolation, Playback, TargetRef, TweenError, TweenLimits,
    TweenMode,
};
use common::{engine, Sprite, ALPHA, POSITION};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_converges_to_target_for_any_slicing() {
    let engine = engine();
    for deltas in [
        vec![2.0],
        vec![0.5, 1.0],
        vec![0.1, 0.3, 0.25, 0.35, 0.6],
        vec![0.7, 0.0, 0.05, 0.9],
    ] {
        let sprite = Sprite::at(0.0, 0.0);
        let mut manager = engine.manager();
        manager
            .add(
                engine
                    .to(&sprite, POSITION, 1.0)
                    .unwrap()
                    .target(&[30.0, -12.5])
                    .unwrap()
                    .delay(0.5)
                    .unwrap(),
            )
            .unwrap();

        for delta in deltas {
            manager.update(delta);
        }

        let sprite = sprite.borrow();
        assert_eq!(sprite.x, 30.0);
        assert_eq!(sprite.y, -12.5);
    }
}

#[test]
fn test_converges_for_equal_slices() {
    let engine = engine();
    for slices in [3, 7, 12, 19, 23, 27, 28, 31, 33, 37, 60] {
        let sprite = Sprite::at(0.0, 0.0);
        let mut tween = engine.to(&sprite, ALPHA, 1.0).unwrap().target(&[0.0]).unwrap();
        tween.start().unwrap();

        for _ in 0..slices {
            tween.update(1.0 / slices as f32);
        }

        assert_eq!(sprite.borrow().alpha, 0.0, "{slices} slices");
        assert!(tween.is_finished(), "{slices} slices");
    }
}

#[test]
fn test_from_is_symmetric_to_to() {
    let engine = engine();
    let sprite = Sprite::at(4.0, 8.0);
    let mut manager = engine.manager();
    manager
        .add(engine.from(&sprite, POSITION, 1.0).unwrap().target(&[-2.0, 100.0]).unwrap())
        .unwrap();

    manager.update(0.0);
    assert_eq!(sprite.borrow().x, -2.0);
    assert_eq!(sprite.borrow().y, 100.0);

    manager.update(1.0);
    assert_eq!(sprite.borrow().x, 4.0);
    assert_eq!(sprite.borrow().y, 8.0);
}

#[test]
fn test_restarted_from_snaps_back_to_given_values() {
    let engine = engine();
    let sprite = Sprite::at(4.0, 8.0);
    let mut tween = engine.from(&sprite, POSITION, 1.0).unwrap().target(&[-2.0, 100.0]).unwrap();

    for _ in 0..2 {
        tween.start().unwrap();
        tween.update(0.0);
        assert_eq!(sprite.borrow().x, -2.0);
        assert_eq!(sprite.borrow().y, 100.0);

        tween.update(1.0);
        assert_eq!(sprite.borrow().x, 4.0);
        assert_eq!(sprite.borrow().y, 8.0);
    }
}

#[test]
fn test_restarted_relative_moves_from_live_values() {
    let engine = engine();
    let sprite = Sprite::at(10.0, 20.0);
    let mut tween = engine
        .to(&sprite, POSITION, 1.0)
        .unwrap()
        .target_relative(&[5.0, -5.0])
        .unwrap();

    tween.start().unwrap();
    tween.update(1.0);
    assert_eq!(sprite.borrow().x, 15.0);
    assert_eq!(sprite.borrow().y, 15.0);

    tween.start().unwrap();
    tween.update(1.0);
    assert_eq!(sprite.borrow().x, 20.0);
    assert_eq!(sprite.borrow().y, 10.0);
}

#[test]
fn test_relative_targets_resolve_once() {
    let engine = engine();
    let sprite = Sprite::at(10.0, 20.0);
    let mut tween = engine.to(&sprite, POSITION, 1.0).unwrap();
    tween.set_target_relative(&[5.0, -5.0]).unwrap();
    tween.set_target_relative(&[5.0, -5.0]).unwrap();

    let mut manager = engine.manager();
    manager.add(tween).unwrap();
    manager.update(0.5);
    assert!((sprite.borrow().x - 12.5).abs() < 1e-5);

    manager.update(0.5);
    assert_eq!(sprite.borrow().x, 15.0);
    assert_eq!(sprite.borrow().y, 15.0);
}

#[test]
fn test_yoyo_alternates_direction() {
    let engine = engine();
    let sprite = Sprite::at(0.0, 0.0);
    let mut manager = engine.manager();
    let id = manager
        .add(
            engine
                .to(&sprite, ALPHA, 1.0)
                .unwrap()
                .target(&[0.0])
                .unwrap()
                .repeat_yoyo(1, 0.0)
                .unwrap(),
        )
        .unwrap();

    // Alpha starts at 1.0 and fades to 0.0, then back
    manager.update(0.25);
    assert!((sprite.borrow().alpha - 0.75).abs() < 1e-5);

    manager.update(1.0);
    let animation = manager.get(id).unwrap();
    assert_eq!(animation.state().step(), 2);
    assert!(animation.state().is_reverse(2));
    assert!((sprite.borrow().alpha - 0.25).abs() < 1e-5);

    manager.update(0.75);
    assert_eq!(sprite.borrow().alpha, 1.0);
    assert!(manager.get(id).unwrap().is_finished());
}

#[test]
fn test_backward_play_restores_start() {
    let engine = engine();
    let sprite = Sprite::at(1.0, 2.0);
    let mut manager = engine.manager();
    manager
        .add(
            engine
                .to(&sprite, POSITION, 1.0)
                .unwrap()
                .target(&[11.0, 12.0])
                .unwrap()
                .delay(0.5)
                .unwrap()
                .auto_remove(false),
        )
        .unwrap();

    manager.update(1.5);
    assert_eq!(sprite.borrow().x, 11.0);

    manager.update(-0.5);
    assert!((sprite.borrow().x - 6.0).abs() < 1e-5);

    manager.update(-1.0);
    assert_eq!(sprite.borrow().x, 1.0);
    assert_eq!(sprite.borrow().y, 2.0);
}

#[test]
fn test_waypoint_path_hits_both_ends() {
    let engine = engine();
    for path in [Interpolation::CatmullRom, Interpolation::Linear] {
        let sprite = Sprite::at(3.0, -3.0);
        let tween = engine
            .tween_with_limits(
                TweenMode::To,
                Some(TargetRef::new(&sprite)),
                POSITION,
                1.0,
                TweenLimits::new(3, 2),
            )
            .unwrap()
            .waypoint(&[50.0, 50.0])
            .unwrap()
            .waypoint(&[-50.0, 0.0])
            .unwrap()
            .target(&[10.0, 10.0])
            .unwrap()
            .path(path);

        let mut manager = engine.manager();
        manager.add(tween).unwrap();

        manager.update(0.0);
        assert_eq!(sprite.borrow().x, 3.0);
        assert_eq!(sprite.borrow().y, -3.0);

        manager.update(1.0 / 3.0);
        assert!((sprite.borrow().x - 50.0).abs() < 1e-3);

        manager.update(1.0);
        assert_eq!(sprite.borrow().x, 10.0);
        assert_eq!(sprite.borrow().y, 10.0);
    }
}

#[test]
fn test_limits_enforced_without_side_effects() {
    let engine = engine();
    let sprite = Sprite::at(0.0, 0.0);
    let mut tween = engine.to(&sprite, POSITION, 1.0).unwrap().target(&[1.0, 2.0]).unwrap();

    let err = tween.set_target(&[1.0, 2.0, 3.0, 4.0]).unwrap_err();
    assert!(matches!(err, TweenError::CombinedAttrsLimit { given: 4, limit: 3 }));
    assert!(matches!(
        tween.add_waypoint(&[0.0, 0.0]),
        Err(TweenError::WaypointsLimit { limit: 0 })
    ));

    let mut manager = engine.manager();
    manager.add(tween).unwrap();
    manager.update(1.0);
    assert_eq!(sprite.borrow().x, 1.0);
    assert_eq!(sprite.borrow().y, 2.0);
}

#[test]
fn test_zero_duration_snaps_by_direction() {
    let engine = engine();
    let sprite = Sprite::at(0.0, 0.0);
    let mut manager = engine.manager();
    manager
        .add(
            engine
                .set(&sprite, POSITION)
                .unwrap()
                .target(&[7.0, 7.0])
                .unwrap()
                .delay(1.0)
                .unwrap()
                .auto_remove(false),
        )
        .unwrap();

    manager.update(0.5);
    assert_eq!(sprite.borrow().x, 0.0);
    manager.update(0.5);
    assert_eq!(sprite.borrow().x, 7.0);

    manager.update(-0.5);
    assert_eq!(sprite.borrow().x, 0.0);
}

#[test]
fn test_events_in_order() {
    let engine = engine();
    let sprite = Sprite::at(0.0, 0.0);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();

    let mut manager = engine.manager();
    manager
        .add(
            engine
                .to(&sprite, ALPHA, 1.0)
                .unwrap()
                .repeat(1, 0.5)
                .unwrap()
                .on(EventMask::ANY_FORWARD, move |event| sink.borrow_mut().push(event)),
        )
        .unwrap();

    manager.update(1.2);
    manager.update(2.0);

    use AnimationEvent::*;
    assert_eq!(*events.borrow(), vec![Begin, Start, End, Start, End, Complete]);
}

#[test]
fn test_call_runs_inside_sequence() {
    let engine = engine();
    let fired = Rc::new(RefCell::new(false));
    let flag = fired.clone();

    let timeline = engine
        .sequence()
        .push_pause(1.0)
        .unwrap()
        .push(engine.call(move |_| *flag.borrow_mut() = true))
        .unwrap();

    let mut manager = engine.manager();
    manager.add(timeline).unwrap();

    manager.update(0.9);
    assert!(!*fired.borrow());
    manager.update(0.2);
    assert!(*fired.borrow());
}
