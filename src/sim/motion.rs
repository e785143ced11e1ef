//! Path and motion evaluation
//!
//! Pure functions from (motion, age) to a position or velocity. Nothing in
//! here writes to an entity; the tick applies the result.

use glam::Vec2;

use super::entity::TrailHistory;
use super::spawn::{Axis, MotionSpec};
use crate::{heading, norm_to_px};

/// Inputs a path may depend on besides its own parameters
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    /// Current viewport size in pixels
    pub viewport: Vec2,
    /// Center for orbits, base for static offsets, fallback for trails
    pub anchor: Vec2,
    /// Drift applied on the non-oscillating axis of a sine path
    pub base_velocity: Vec2,
    /// Recorded leader positions (newest first)
    pub trail: Option<&'a TrailHistory>,
}

impl<'a> MotionContext<'a> {
    pub fn new(viewport: Vec2, anchor: Vec2) -> Self {
        Self {
            viewport,
            anchor,
            base_velocity: Vec2::ZERO,
            trail: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.base_velocity = velocity;
        self
    }

    pub fn with_trail(mut self, trail: &'a TrailHistory) -> Self {
        self.trail = Some(trail);
        self
    }
}

/// Result of evaluating a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSample {
    /// Absolute position this tick
    Position(Vec2),
    /// Velocity to integrate this tick (px/s)
    Velocity(Vec2),
}

impl MotionSample {
    /// Position after applying this sample for `dt` seconds
    pub fn advance(self, pos: Vec2, dt: f32) -> Vec2 {
        match self {
            MotionSample::Position(p) => p,
            MotionSample::Velocity(v) => pos + v * dt,
        }
    }
}

/// Evaluate `motion` for an entity born at `origin`, `age_secs` ago
pub fn evaluate(motion: &MotionSpec, age_secs: f32, origin: Vec2, ctx: &MotionContext) -> MotionSample {
    let age = age_secs.max(0.0);
    match motion {
        MotionSpec::Linear { vx, vy } => MotionSample::Velocity(Vec2::new(*vx, *vy)),

        MotionSpec::Sine {
            amplitude_norm,
            frequency_hz,
            phase,
            axis,
        } => {
            let theta = std::f32::consts::TAU * frequency_hz * age + phase;
            let wave = theta.sin();
            let drift = origin + ctx.base_velocity * age;
            let pos = match axis {
                Axis::X => {
                    let amplitude = amplitude_norm / 100.0 * ctx.viewport.x;
                    Vec2::new(origin.x + amplitude * wave, drift.y)
                }
                Axis::Y => {
                    let amplitude = amplitude_norm / 100.0 * ctx.viewport.y;
                    Vec2::new(drift.x, origin.y + amplitude * wave)
                }
            };
            MotionSample::Position(pos)
        }

        MotionSpec::CubicBezier {
            control_points_norm,
            duration_ms,
        } => {
            let Some(first) = control_points_norm.first() else {
                return MotionSample::Position(origin);
            };
            if control_points_norm.len() < 4 {
                return MotionSample::Position(norm_to_px(*first, ctx.viewport));
            }
            let p: [Vec2; 4] = [
                norm_to_px(control_points_norm[0], ctx.viewport),
                norm_to_px(control_points_norm[1], ctx.viewport),
                norm_to_px(control_points_norm[2], ctx.viewport),
                norm_to_px(control_points_norm[3], ctx.viewport),
            ];
            let t = if *duration_ms > 0.0 {
                (age * 1000.0 / duration_ms).clamp(0.0, 1.0)
            } else {
                1.0
            };
            MotionSample::Position(cubic_bezier(p, t))
        }

        MotionSpec::AngleSpeed {
            angle_deg,
            speed_px_per_sec,
        } => MotionSample::Position(origin + heading(*angle_deg) * speed_px_per_sec * age),

        MotionSpec::Orbit {
            radius_px,
            angular_speed_deg_per_sec,
            base_angle_deg,
        } => {
            let angle = base_angle_deg + angular_speed_deg_per_sec * age;
            MotionSample::Position(ctx.anchor + heading(angle) * radius_px)
        }

        MotionSpec::TrailFollow { delay_samples } => {
            let pos = ctx
                .trail
                .and_then(|trail| trail.sample(*delay_samples))
                .unwrap_or(ctx.anchor);
            MotionSample::Position(pos)
        }

        MotionSpec::StaticOffset { offset_px } => MotionSample::Position(ctx.anchor + *offset_px),
    }
}

/// Standard cubic Bernstein blend
#[inline]
pub fn cubic_bezier(p: [Vec2; 4], t: f32) -> Vec2 {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn ctx() -> MotionContext<'static> {
        MotionContext::new(VIEWPORT, Vec2::new(400.0, 500.0))
    }

    fn bezier() -> MotionSpec {
        MotionSpec::CubicBezier {
            control_points_norm: vec![
                Vec2::new(10.0, 0.0),
                Vec2::new(90.0, 30.0),
                Vec2::new(10.0, 60.0),
                Vec2::new(50.0, 100.0),
            ],
            duration_ms: 2000.0,
        }
    }

    fn position(sample: MotionSample) -> Vec2 {
        match sample {
            MotionSample::Position(p) => p,
            MotionSample::Velocity(v) => panic!("expected position, got velocity {v:?}"),
        }
    }

    #[test]
    fn test_linear_is_velocity() {
        let sample = evaluate(&MotionSpec::Linear { vx: 5.0, vy: 70.0 }, 3.0, Vec2::ZERO, &ctx());
        assert_eq!(sample, MotionSample::Velocity(Vec2::new(5.0, 70.0)));
        assert_eq!(sample.advance(Vec2::new(1.0, 1.0), 0.5), Vec2::new(3.5, 36.0));
    }

    #[test]
    fn test_bezier_endpoints() {
        let start = position(evaluate(&bezier(), 0.0, Vec2::ZERO, &ctx()));
        assert!((start - Vec2::new(80.0, 0.0)).length() < 1e-3);

        let end = position(evaluate(&bezier(), 2.0, Vec2::ZERO, &ctx()));
        assert!((end - Vec2::new(400.0, 600.0)).length() < 1e-3);

        // Past the duration the path stays on the last point
        let late = position(evaluate(&bezier(), 10.0, Vec2::ZERO, &ctx()));
        assert!((late - end).length() < 1e-3);
    }

    #[test]
    fn test_bezier_degenerate_is_stationary() {
        let motion = MotionSpec::CubicBezier {
            control_points_norm: vec![Vec2::new(25.0, 50.0), Vec2::new(75.0, 50.0)],
            duration_ms: 1000.0,
        };
        for age in [0.0, 0.5, 1.0, 4.0] {
            let p = position(evaluate(&motion, age, Vec2::ZERO, &ctx()));
            assert!((p - Vec2::new(200.0, 300.0)).length() < 1e-3);
        }

        let empty = MotionSpec::CubicBezier {
            control_points_norm: Vec::new(),
            duration_ms: 1000.0,
        };
        let origin = Vec2::new(7.0, 9.0);
        assert_eq!(position(evaluate(&empty, 1.0, origin, &ctx())), origin);
    }

    #[test]
    fn test_angle_speed_defaults_down() {
        let motion = MotionSpec::AngleSpeed {
            angle_deg: MotionSpec::DEFAULT_ANGLE_DEG,
            speed_px_per_sec: MotionSpec::DEFAULT_SPEED,
        };
        let p = position(evaluate(&motion, 2.0, Vec2::new(100.0, 0.0), &ctx()));
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_half_turn_is_opposite() {
        let motion = MotionSpec::Orbit {
            radius_px: 50.0,
            angular_speed_deg_per_sec: 90.0,
            base_angle_deg: 0.0,
        };
        let anchor = ctx().anchor;
        let start = position(evaluate(&motion, 0.0, Vec2::ZERO, &ctx()));
        assert!((start.x - (anchor.x + 50.0)).abs() < 1e-3);

        let half = position(evaluate(&motion, 2.0, Vec2::ZERO, &ctx()));
        assert!((half.x - (anchor.x - 50.0)).abs() < 1e-3);
        assert!((half.y - anchor.y).abs() < 1e-3);
    }

    #[test]
    fn test_sine_drifts_on_other_axis() {
        let motion = MotionSpec::Sine {
            amplitude_norm: 10.0,
            frequency_hz: 1.0,
            phase: 0.0,
            axis: Axis::X,
        };
        let origin = Vec2::new(400.0, 0.0);
        let c = ctx().with_velocity(Vec2::new(0.0, 50.0));

        // Quarter period: full amplitude (10% of 800 px)
        let p = position(evaluate(&motion, 0.25, origin, &c));
        assert!((p.x - 480.0).abs() < 1e-2);
        assert!((p.y - 12.5).abs() < 1e-3);
    }

    #[test]
    fn test_trail_follow_falls_back_to_anchor() {
        let mut trail = TrailHistory::new(8);
        trail.record(Vec2::new(1.0, 1.0));
        trail.record(Vec2::new(2.0, 2.0));

        let motion = MotionSpec::TrailFollow { delay_samples: 1 };
        let c = ctx().with_trail(&trail);
        assert_eq!(position(evaluate(&motion, 0.0, Vec2::ZERO, &c)), Vec2::new(1.0, 1.0));

        let deep = MotionSpec::TrailFollow { delay_samples: 30 };
        assert_eq!(position(evaluate(&deep, 0.0, Vec2::ZERO, &c)), c.anchor);
    }

    #[test]
    fn test_static_offset() {
        let motion = MotionSpec::StaticOffset {
            offset_px: Vec2::new(-40.0, 20.0),
        };
        let p = position(evaluate(&motion, 9.0, Vec2::ZERO, &ctx()));
        assert_eq!(p, Vec2::new(360.0, 520.0));
    }

    proptest! {
        #[test]
        fn prop_sine_is_periodic(
            amplitude in 0.0f32..50.0,
            frequency in 0.1f32..5.0,
            phase in -3.0f32..3.0,
            age in 0.0f32..10.0,
        ) {
            let motion = MotionSpec::Sine {
                amplitude_norm: amplitude,
                frequency_hz: frequency,
                phase,
                axis: Axis::X,
            };
            let origin = Vec2::new(400.0, 100.0);
            let a = position(evaluate(&motion, age, origin, &ctx()));
            let b = position(evaluate(&motion, age + 1.0 / frequency, origin, &ctx()));
            // f32 phase error grows with the argument; 1 px is well under a sprite
            prop_assert!((a.x - b.x).abs() < 1.0);
            prop_assert!((a.y - b.y).abs() < 1e-3);
        }

        #[test]
        fn prop_bezier_interpolates_endpoints(
            xs in proptest::array::uniform4(0.0f32..100.0),
            ys in proptest::array::uniform4(0.0f32..100.0),
            duration in 1.0f32..10_000.0,
        ) {
            let points: Vec<Vec2> = xs.iter().zip(ys.iter()).map(|(x, y)| Vec2::new(*x, *y)).collect();
            let motion = MotionSpec::CubicBezier {
                control_points_norm: points.clone(),
                duration_ms: duration,
            };
            let start = position(evaluate(&motion, 0.0, Vec2::ZERO, &ctx()));
            let end = position(evaluate(&motion, duration / 1000.0, Vec2::ZERO, &ctx()));
            prop_assert!((start - norm_to_px(points[0], VIEWPORT)).length() < 1e-2);
            prop_assert!((end - norm_to_px(points[3], VIEWPORT)).length() < 1e-2);
        }
    }
}
