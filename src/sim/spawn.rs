//! Spawn specifications and motion descriptions
//!
//! Pure data. Produced once by the loader from external files, consumed by
//! the scheduler. Nothing here is mutated after loading.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Enemy archetype, selects the firing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Scout,
    Bruiser,
    Ace,
    /// A type name the game does not know
    Other,
}

impl EnemyKind {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "scout" => EnemyKind::Scout,
            "bruiser" => EnemyKind::Bruiser,
            "ace" => EnemyKind::Ace,
            _ => EnemyKind::Other,
        }
    }
}

/// Which screen axis a sine path oscillates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    X,
    Y,
}

/// How an entity moves after it is born
///
/// Every variant is immutable; the caller tracks the entity's age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionSpec {
    /// Constant velocity (px/s)
    Linear { vx: f32, vy: f32 },
    /// Oscillation on one axis, linear drift on the other
    Sine {
        /// Percentage of the viewport extent along `axis`
        amplitude_norm: f32,
        frequency_hz: f32,
        /// Radians
        phase: f32,
        axis: Axis,
    },
    /// Cubic Bézier through four 0-100 control points
    CubicBezier {
        control_points_norm: Vec<Vec2>,
        duration_ms: f32,
    },
    /// Constant heading, 0° = right, 90° = down
    AngleSpeed { angle_deg: f32, speed_px_per_sec: f32 },
    /// Circle around a moving center
    Orbit {
        radius_px: f32,
        angular_speed_deg_per_sec: f32,
        base_angle_deg: f32,
    },
    /// Replay the leader's position from `delay_samples` ticks ago
    TrailFollow { delay_samples: usize },
    /// Fixed offset from the anchor
    StaticOffset { offset_px: Vec2 },
}

impl MotionSpec {
    pub const DEFAULT_LINEAR_VY: f32 = 70.0;
    pub const DEFAULT_ANGLE_DEG: f32 = 90.0;
    pub const DEFAULT_SPEED: f32 = 100.0;

    /// Motion that never moves away from the anchor
    pub fn stationary() -> Self {
        MotionSpec::StaticOffset {
            offset_px: Vec2::ZERO,
        }
    }
}

/// One timed enemy birth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    /// Milliseconds after the schedule starts
    pub trigger_time_ms: f64,
    /// 0-100 of the viewport on each axis
    pub position_norm: Vec2,
    /// px/s, `None` means the default drift
    pub velocity: Option<Vec2>,
    pub hp: i32,
    pub size: f32,
    /// `None` when the file gave no type (uses the escalation firing rule)
    pub enemy_kind: Option<EnemyKind>,
    pub motion: Option<MotionSpec>,
}

impl SpawnSpec {
    pub const DEFAULT_X_NORM: f32 = 50.0;
    pub const DEFAULT_Y_NORM: f32 = 0.0;
    pub const DEFAULT_HP: i32 = 1;

    /// A spec with every optional field at its default
    pub fn at(trigger_time_ms: f64, position_norm: Vec2, size: f32) -> Self {
        Self {
            trigger_time_ms,
            position_norm,
            velocity: None,
            hp: Self::DEFAULT_HP,
            size,
            enemy_kind: None,
            motion: None,
        }
    }

    /// Same spec, shifted later in time
    pub fn delayed(&self, offset_ms: f64) -> Self {
        Self {
            trigger_time_ms: self.trigger_time_ms + offset_ms,
            ..self.clone()
        }
    }
}

/// Stable sort by trigger time (ties keep file order)
pub fn sort_by_trigger(specs: &mut [SpawnSpec]) {
    specs.sort_by(|a, b| a.trigger_time_ms.total_cmp(&b.trigger_time_ms));
}
