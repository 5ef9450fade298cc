//! cadence_tween Timeline Demo
//!
//! Run with:
//! `cargo run -p cadence_tween --example timeline_demo`
//!
//! Optional:
//! - Set `RUST_LOG=cadence_tween=trace` to see step crossings and reaping
//! - Pass a path to a `cadence.toml` to override the engine defaults

use anyhow::{Context, Result};
use cadence_tween::{Accessor, EngineConfig, Playback, TweenEngine};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const POSITION: i32 = 0;
const SCALE: i32 = 1;

#[derive(Debug, Default)]
struct Card {
    x: f32,
    y: f32,
    scale: f32,
}

struct CardAccessor;

impl Accessor<Card> for CardAccessor {
    fn retrieve(&self, card: &Card, tween_type: i32, values: &mut [f32]) -> usize {
        match tween_type {
            POSITION => {
                values[0] = card.x;
                values[1] = card.y;
                2
            }
            SCALE => {
                values[0] = card.scale;
                1
            }
            _ => 0,
        }
    }

    fn animate(&self, card: &mut Card, tween_type: i32, values: &[f32]) {
        match tween_type {
            POSITION => {
                card.x = values[0];
                card.y = values[1];
            }
            SCALE => card.scale = values[0],
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))
            .with_context(|| format!("Failed to load {path}"))?,
        None => EngineConfig::default(),
    };

    let engine = TweenEngine::new(config);
    engine.register::<Card, _>(CardAccessor);

    let card = Rc::new(RefCell::new(Card {
        scale: 1.0,
        ..Default::default()
    }));

    let slide_in = engine
        .sequence()
        .push(engine.to(&card, POSITION, 0.5)?.target(&[200.0, 0.0])?)?
        .push(engine.to(&card, SCALE, 0.25)?.target(&[1.5])?.repeat_yoyo(1, 0.1)?)?
        .push_pause(0.2)?
        .push(engine.call(|_| tracing::info!("slide-in done")))?;

    let mut manager = engine.manager();
    manager.add(slide_in)?;

    let dt = 1.0 / 60.0;
    let mut frame = 0;
    while !manager.is_empty() {
        manager.update(dt);
        if frame % 10 == 0 {
            let card = card.borrow();
            println!(
                "frame {frame:3}: x={:7.2} y={:5.2} scale={:4.2}",
                card.x, card.y, card.scale
            );
        }
        frame += 1;
    }

    println!("finished after {frame} frames, final {:?}", card.borrow());
    Ok(())
}
