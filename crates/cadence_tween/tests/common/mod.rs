//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cadence_tween::{Accessor, EngineConfig, TweenEngine};
use std::cell::RefCell;
use std::rc::Rc;

pub const POSITION: i32 = 1;
pub const ALPHA: i32 = 2;

#[derive(Debug, Default)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

impl Sprite {
    pub fn at(x: f32, y: f32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self { x, y, alpha: 1.0 }))
    }
}

pub struct SpriteAccessor;

impl Accessor<Sprite> for SpriteAccessor {
    fn retrieve(&self, target: &Sprite, tween_type: i32, values: &mut [f32]) -> usize {
        match tween_type {
            POSITION => {
                values[0] = target.x;
                values[1] = target.y;
                2
            }
            ALPHA => {
                values[0] = target.alpha;
                1
            }
            _ => 0,
        }
    }

    fn animate(&self, target: &mut Sprite, tween_type: i32, values: &[f32]) {
        match tween_type {
            POSITION => {
                target.x = values[0];
                target.y = values[1];
            }
            ALPHA => target.alpha = values[0],
            _ => {}
        }
    }
}

/// Engine with linear easing and the sprite accessor registered
pub fn engine() -> TweenEngine {
    engine_with(EngineConfig {
        easing: cadence_tween::Easing::Linear,
        ..EngineConfig::default()
    })
}

pub fn engine_with(config: EngineConfig) -> TweenEngine {
    let engine = TweenEngine::new(config);
    engine.register::<Sprite, _>(SpriteAccessor);
    engine
}
