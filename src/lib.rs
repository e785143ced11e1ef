//! Hive Shooter - A vertical arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Real-time simulation (spawning, motion, weapons, collisions)
//! - `tuning`: Data-driven game balance
//! - `web`: Browser facade (wasm32 only)
//!
//! Rendering, asset loading and input wiring live in the host page. The
//! crate only decides what exists, where it moves, and when it dies.

pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use tuning::{RammingDamage, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default viewport used before the host reports its size
    pub const DEFAULT_VIEWPORT_W: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_H: f32 = 600.0;

    /// Nominal frame delta for headless runs (60 Hz)
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;

    /// Collision radius as a fraction of an entity's display size
    pub const HITBOX_FACTOR: f32 = 0.4;

    /// Default enemy spawn velocity when a spec gives none (px/s)
    pub const DEFAULT_ENEMY_VX: f32 = 0.0;
    pub const DEFAULT_ENEMY_VY: f32 = 50.0;

    /// Damage dealt by a bullet that does not say otherwise
    pub const DEFAULT_BULLET_DAMAGE: i32 = 1;

    /// Pointer steering dead zone (px)
    pub const POINTER_DEAD_ZONE: f32 = 5.0;
}

/// Convert a 0-100 screen-relative position to pixels
#[inline]
pub fn norm_to_px(norm: Vec2, viewport: Vec2) -> Vec2 {
    norm / 100.0 * viewport
}

/// Unit vector for a heading in degrees (0° = screen-right, 90° = screen-down)
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
