//! Path interpolation across waypoints
//!
//! A tween with waypoints evaluates, per combined attribute, the control sequence
//! `[start, waypoint 0, .., waypoint n-1, target]` at eased progress `t`.

use serde::{Deserialize, Serialize};

/// Navigates a control-point sequence as progress advances.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Straight segments between consecutive control points
    Linear,
    /// Catmull-Rom spline through every control point
    #[default]
    CatmullRom,
    /// Caller-supplied navigator, `(t, points) -> value`
    #[serde(skip)]
    Custom(fn(f32, &[f32]) -> f32),
}

impl Interpolation {
    /// Evaluate the path at `t` in `[0, 1]`.
    ///
    /// Returns `points[0]` at `t = 0` and the last point at `t = 1`. An empty slice
    /// yields `0.0` and a single point is returned as-is.
    pub fn compute(&self, t: f32, points: &[f32]) -> f32 {
        match points {
            [] => return 0.0,
            [only] => return *only,
            _ => {}
        }

        match self {
            Interpolation::Linear => linear(t, points),
            Interpolation::CatmullRom if points.len() < 3 => linear(t, points),
            Interpolation::CatmullRom => catmull_rom(t, points),
            Interpolation::Custom(f) => f(t, points),
        }
    }
}

/// Segment index and local progress for `t` over `count` points.
fn segment(t: f32, count: usize) -> (usize, f32) {
    let spans = (count - 1) as f32;
    let segment = ((spans * t).floor().max(0.0) as usize).min(count - 2);
    (segment, t * spans - segment as f32)
}

fn linear(t: f32, points: &[f32]) -> f32 {
    let (segment, local) = segment(t, points.len());
    let a = points[segment];
    let b = points[segment + 1];
    a * (1.0 - local) + b * local
}

fn catmull_rom(t: f32, points: &[f32]) -> f32 {
    let count = points.len();
    let (segment, local) = segment(t, count);

    if segment == 0 {
        return catmull_rom_spline(points[0], points[0], points[1], points[2], local);
    }
    if segment == count - 2 {
        return catmull_rom_spline(
            points[count - 3],
            points[count - 2],
            points[count - 1],
            points[count - 1],
            local,
        );
    }
    catmull_rom_spline(
        points[segment - 1],
        points[segment],
        points[segment + 1],
        points[segment + 2],
        local,
    )
}

/// Hermite form of the uniform Catmull-Rom segment between `b` and `c`.
#[inline]
fn catmull_rom_spline(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let t1 = (c - a) * 0.5;
    let t2 = (d - b) * 0.5;
    let t_2 = t * t;
    let t_3 = t_2 * t;
    let h1 = 2.0 * t_3 - 3.0 * t_2 + 1.0;
    let h2 = -2.0 * t_3 + 3.0 * t_2;
    let h3 = t_3 - 2.0 * t_2 + t;
    let h4 = t_3 - t_2;
    b * h1 + c * h2 + t1 * h3 + t2 * h4
}
