//! Entities, the player's formation, and the leader's trail
//!
//! Bullets and enemies share one `Entity` struct so both pools are
//! homogeneous; `EntityKind` carries what differs.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::{MotionContext, MotionSample, evaluate};
use super::spawn::{EnemyKind, MotionSpec};
use super::weapon::{BulletStyle, WeaponKind};
use crate::consts::HITBOX_FACTOR;
use crate::norm_to_px;

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

/// Per-kind state of a pooled entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Bullet {
        damage: i32,
        /// Seconds left before the bullet expires
        ttl: f32,
        style: BulletStyle,
    },
    Enemy {
        /// `None` fires by the escalation rule
        enemy_kind: Option<EnemyKind>,
    },
}

impl Default for EntityKind {
    fn default() -> Self {
        EntityKind::Bullet {
            damage: 1,
            ttl: 0.0,
            style: BulletStyle::Basic,
        }
    }
}

/// A bullet or an enemy
#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub kind: EntityKind,
    /// Fixed at activation
    pub owner: Owner,
    pub pos: Vec2,
    /// Where the entity was born (paths are relative to it)
    pub origin: Vec2,
    pub birth_time_ms: f64,
    pub hp: i32,
    /// Display size in pixels
    pub size: f32,
    pub vel: Vec2,
    pub motion: Option<MotionSpec>,
    /// Seconds until the entity may fire again
    pub cooldown: f32,
}

impl Entity {
    /// A fresh bullet
    #[allow(clippy::too_many_arguments)]
    pub fn bullet(owner: Owner, pos: Vec2, vel: Vec2, damage: i32, ttl: f32, size: f32, style: BulletStyle, now_ms: f64) -> Self {
        Self {
            kind: EntityKind::Bullet { damage, ttl, style },
            owner,
            pos,
            origin: pos,
            birth_time_ms: now_ms,
            hp: 1,
            size,
            vel,
            motion: None,
            cooldown: 0.0,
        }
    }

    /// A fresh enemy
    #[allow(clippy::too_many_arguments)]
    pub fn enemy(pos: Vec2, vel: Vec2, hp: i32, size: f32, enemy_kind: Option<EnemyKind>, motion: Option<MotionSpec>, now_ms: f64) -> Self {
        Self {
            kind: EntityKind::Enemy { enemy_kind },
            owner: Owner::Enemy,
            pos,
            origin: pos,
            birth_time_ms: now_ms,
            hp,
            size,
            vel,
            motion,
            cooldown: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size * HITBOX_FACTOR
    }

    /// Seconds since activation
    #[inline]
    pub fn age_secs(&self, now_ms: f64) -> f32 {
        ((now_ms - self.birth_time_ms) / 1000.0).max(0.0) as f32
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Apply damage; hp only ever goes down
    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount.max(0);
    }

    pub fn damage(&self) -> i32 {
        match self.kind {
            EntityKind::Bullet { damage, .. } => damage,
            EntityKind::Enemy { .. } => 0,
        }
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        match self.kind {
            EntityKind::Enemy { enemy_kind } => enemy_kind,
            EntityKind::Bullet { .. } => None,
        }
    }

    /// Advance along the entity's path, or by plain velocity without one
    pub fn step(&mut self, now_ms: f64, dt: f32, viewport: Vec2) {
        match &self.motion {
            Some(motion) => {
                let ctx = MotionContext::new(viewport, self.origin).with_velocity(self.vel);
                let sample = evaluate(motion, self.age_secs(now_ms), self.origin, &ctx);
                if let MotionSample::Velocity(v) = sample {
                    self.vel = v;
                }
                self.pos = sample.advance(self.pos, dt);
            }
            None => self.pos += self.vel * dt,
        }
    }
}

/// Recent leader positions, newest first
#[derive(Debug, Clone, Default)]
pub struct TrailHistory {
    samples: VecDeque<Vec2>,
    capacity: usize,
}

impl TrailHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, pos: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_back();
        }
        self.samples.push_front(pos);
    }

    /// Position `delay` samples ago (0 = the latest)
    pub fn sample(&self, delay: usize) -> Option<Vec2> {
        self.samples.get(delay).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// The steerable point the formation is arranged around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub pos: Vec2,
    /// px/s
    pub speed: f32,
}

impl Leader {
    /// Move horizontally by `axis * speed * dt`, keeping `margin` from both edges
    pub fn steer(&mut self, axis: f32, dt: f32, viewport_w: f32, margin: f32) {
        let min = margin.min(viewport_w / 2.0);
        let max = (viewport_w - margin).max(min);
        self.pos.x = (self.pos.x + axis.clamp(-1.0, 1.0) * self.speed * dt).clamp(min, max);
    }
}

/// How formation members hold their place around the leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationBehavior {
    #[default]
    Static,
    Line,
    Trail,
    Orbit,
}

impl FormationBehavior {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "line" => FormationBehavior::Line,
            "trail" | "follow" => FormationBehavior::Trail,
            "orbit" => FormationBehavior::Orbit,
            _ => FormationBehavior::Static,
        }
    }
}

/// One ship of an insect formation file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub x_norm: f32,
    pub y_norm: f32,
    pub hp: Option<i32>,
    pub weapon: Option<WeaponKind>,
}

/// A named player formation as loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSpec {
    pub id: String,
    pub behavior: FormationBehavior,
    pub ships: Vec<ShipSpec>,
}

/// Layout parameters that do not come from the file
#[derive(Debug, Clone, Copy)]
pub struct FormationLayout {
    pub trail_delay_step: usize,
    pub orbit_radius: f32,
    pub orbit_radius_step: f32,
    pub orbit_speed_deg: f32,
}

/// A formation resolved against the current viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Formation {
    pub behavior: FormationBehavior,
    pub member_offsets_px: Vec<Vec2>,
}

impl Formation {
    /// Offsets are relative to the viewport center: a ship at 50/50 sits on the leader
    pub fn build(spec: &FormationSpec, viewport: Vec2) -> Self {
        let center = Vec2::splat(50.0);
        let member_offsets_px = spec
            .ships
            .iter()
            .map(|ship| norm_to_px(Vec2::new(ship.x_norm, ship.y_norm) - center, viewport))
            .collect();
        Self {
            behavior: spec.behavior,
            member_offsets_px,
        }
    }

    /// Path for member `index` relative to the leader
    pub fn member_motion(&self, index: usize, layout: &FormationLayout) -> MotionSpec {
        let offset = self.member_offsets_px.get(index).copied().unwrap_or(Vec2::ZERO);
        match self.behavior {
            FormationBehavior::Static | FormationBehavior::Line => MotionSpec::StaticOffset { offset_px: offset },
            FormationBehavior::Trail => MotionSpec::TrailFollow {
                delay_samples: (index + 1) * layout.trail_delay_step,
            },
            FormationBehavior::Orbit => {
                let count = self.member_offsets_px.len().max(1) as f32;
                MotionSpec::Orbit {
                    radius_px: layout.orbit_radius + index as f32 * layout.orbit_radius_step,
                    angular_speed_deg_per_sec: layout.orbit_speed_deg,
                    base_angle_deg: index as f32 * 360.0 / count,
                }
            }
        }
    }
}

/// A player-side ship
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerShip {
    pub pos: Vec2,
    pub motion: MotionSpec,
    pub weapon: WeaponKind,
    /// Seconds until the weapon is ready
    pub cooldown: f32,
    pub hp: i32,
    pub size: f32,
    /// Sim time until which hits are ignored
    pub invulnerable_until_ms: f64,
}

impl PlayerShip {
    pub fn new(pos: Vec2, motion: MotionSpec, weapon: WeaponKind, hp: i32, size: f32) -> Self {
        Self {
            pos,
            motion,
            weapon,
            cooldown: 0.0,
            hp,
            size,
            invulnerable_until_ms: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size * HITBOX_FACTOR
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    /// Apply a hit unless inside the grace window. Returns whether damage landed.
    pub fn hit(&mut self, amount: i32, now_ms: f64, grace_ms: f64) -> bool {
        if !self.is_alive() || self.is_invulnerable(now_ms) {
            return false;
        }
        self.hp = (self.hp - amount.max(1)).max(0);
        self.invulnerable_until_ms = now_ms + grace_ms;
        true
    }

    /// Blink while invulnerable: hidden on every other `period_ms` window
    pub fn blink_visible(&self, now_ms: f64, period_ms: f64) -> bool {
        if !self.is_invulnerable(now_ms) || period_ms <= 0.0 {
            return true;
        }
        let remaining = self.invulnerable_until_ms - now_ms;
        ((remaining / period_ms) as u64) % 2 == 0
    }
}
