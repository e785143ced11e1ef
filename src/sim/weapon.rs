//! Weapon patterns
//!
//! Player weapons are fixed shot tables. Enemies fire either by their
//! kind's profile or, when spawned without a type, by the escalation rule
//! that reads their remaining hp.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spawn::EnemyKind;
use crate::heading;

/// Visual class of a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletStyle {
    #[default]
    Basic,
    Spread,
    Laser,
    Wide,
    Enemy,
}

/// One bullet to emit, relative to the shooter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub offset: Vec2,
    /// px/s
    pub vel: Vec2,
    pub style: BulletStyle,
}

impl Shot {
    fn enemy(offset: Vec2, vel: Vec2) -> Self {
        Self {
            offset,
            vel,
            style: BulletStyle::Enemy,
        }
    }
}

/// Player weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    #[default]
    Basic,
    Spread,
    Laser,
    Wide,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [WeaponKind::Basic, WeaponKind::Spread, WeaponKind::Laser, WeaponKind::Wide];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(WeaponKind::Basic),
            "spread" => Some(WeaponKind::Spread),
            "laser" => Some(WeaponKind::Laser),
            "wide" => Some(WeaponKind::Wide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Basic => "basic",
            WeaponKind::Spread => "spread",
            WeaponKind::Laser => "laser",
            WeaponKind::Wide => "wide",
        }
    }

    /// Seconds between volleys
    pub fn cooldown_secs(&self) -> f32 {
        match self {
            WeaponKind::Basic => 0.4,
            WeaponKind::Spread => 0.5,
            WeaponKind::Laser => 0.8,
            WeaponKind::Wide => 0.6,
        }
    }

    /// Bullets of one volley (negative y is up)
    pub fn volley(&self) -> Vec<Shot> {
        let shot = |offset: Vec2, vel: Vec2, style| Shot { offset, vel, style };
        match self {
            WeaponKind::Basic => vec![shot(Vec2::new(0.0, -20.0), Vec2::new(0.0, -400.0), BulletStyle::Basic)],
            WeaponKind::Spread => [-80.0, 0.0, 80.0]
                .into_iter()
                .map(|vx| shot(Vec2::new(0.0, -20.0), Vec2::new(vx, -300.0), BulletStyle::Spread))
                .collect(),
            WeaponKind::Laser => vec![shot(Vec2::new(0.0, -30.0), Vec2::new(0.0, -600.0), BulletStyle::Laser)],
            WeaponKind::Wide => [-10.0, 10.0]
                .into_iter()
                .map(|dx| shot(Vec2::new(dx, -20.0), Vec2::new(0.0, -350.0), BulletStyle::Wide))
                .collect(),
        }
    }
}

/// Shape of an enemy volley
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringPattern {
    Straight,
    /// Three bullets, ±0.2 rad
    Spread,
    /// Five bullets, 0.15 rad apart
    Burst,
    /// Straight shot on a coin flip
    Random,
}

/// Per-kind enemy gun
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringProfile {
    pub pattern: FiringPattern,
    pub interval_ms: f32,
    /// px/s
    pub speed: f32,
}

impl FiringProfile {
    pub fn for_kind(kind: EnemyKind) -> Self {
        let (pattern, interval_ms, speed) = match kind {
            EnemyKind::Bruiser => (FiringPattern::Spread, 2000.0, 120.0),
            EnemyKind::Scout => (FiringPattern::Straight, 1500.0, 180.0),
            EnemyKind::Ace => (FiringPattern::Burst, 1800.0, 160.0),
            EnemyKind::Other => (FiringPattern::Random, 2500.0, 150.0),
        };
        Self {
            pattern,
            interval_ms,
            speed,
        }
    }

    pub fn interval_secs(&self) -> f32 {
        self.interval_ms / 1000.0
    }

    /// Angular offsets from straight down, in radians
    fn offsets(&self, rng: &mut impl Rng) -> Vec<f32> {
        match self.pattern {
            FiringPattern::Straight => vec![0.0],
            FiringPattern::Spread => vec![-0.2, 0.0, 0.2],
            FiringPattern::Burst => (-2..=2).map(|i| i as f32 * 0.15).collect(),
            FiringPattern::Random => {
                if rng.random_bool(0.5) {
                    vec![0.0]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn shots(&self, rng: &mut impl Rng) -> Vec<Shot> {
        self.offsets(rng)
            .into_iter()
            .map(|offset| Shot::enemy(Vec2::ZERO, heading(90.0 + offset.to_degrees()) * self.speed))
            .collect()
    }
}

/// What an enemy emits when its cooldown runs out
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyVolley {
    pub shots: Vec<Shot>,
    /// Seconds until the next volley
    pub cooldown: f32,
}

const ESCALATION_SPREAD_COOLDOWN: f32 = 1.2;
const ESCALATION_AIMED_COOLDOWN: f32 = 2.0;
const ESCALATION_STRAIGHT_COOLDOWN: f32 = 1.0;
const ESCALATION_AIMED_CHANCE: f64 = 0.3;
const ESCALATION_AIMED_SPEED: f32 = 200.0;

/// Cooldown a freshly spawned enemy starts with
pub fn initial_enemy_cooldown(kind: Option<EnemyKind>) -> f32 {
    match kind {
        Some(kind) => FiringProfile::for_kind(kind).interval_secs(),
        None => 0.0,
    }
}

/// Decide an enemy's next volley
///
/// `targets` are the live formation members; the aimed shot picks the
/// nearest by Manhattan distance.
pub fn enemy_volley(kind: Option<EnemyKind>, hp: i32, pos: Vec2, targets: &[Vec2], rng: &mut impl Rng) -> EnemyVolley {
    if let Some(kind) = kind {
        let profile = FiringProfile::for_kind(kind);
        return EnemyVolley {
            shots: profile.shots(rng),
            cooldown: profile.interval_secs(),
        };
    }

    let muzzle = Vec2::new(0.0, 10.0);
    if hp > 2 {
        return EnemyVolley {
            shots: [-80.0, 0.0, 80.0]
                .into_iter()
                .map(|vx| Shot::enemy(muzzle, Vec2::new(vx, 200.0)))
                .collect(),
            cooldown: ESCALATION_SPREAD_COOLDOWN,
        };
    }

    if rng.random_bool(ESCALATION_AIMED_CHANCE) {
        if let Some(target) = nearest_manhattan(pos, targets) {
            let dir = (target - pos).normalize_or(Vec2::Y);
            return EnemyVolley {
                shots: vec![Shot::enemy(muzzle, dir * ESCALATION_AIMED_SPEED)],
                cooldown: ESCALATION_AIMED_COOLDOWN,
            };
        }
    }

    EnemyVolley {
        shots: vec![Shot::enemy(muzzle, Vec2::new(0.0, 250.0))],
        cooldown: ESCALATION_STRAIGHT_COOLDOWN,
    }
}

/// Closest point by |dx| + |dy|
pub fn nearest_manhattan(from: Vec2, targets: &[Vec2]) -> Option<Vec2> {
    targets.iter().copied().min_by(|a, b| {
        let da = (*a - from).abs().element_sum();
        let db = (*b - from).abs().element_sum();
        da.total_cmp(&db)
    })
}
