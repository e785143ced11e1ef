//! Game balance and configuration
//!
//! Every field has a default so a tuning file only needs the values it
//! overrides. Loaded once at startup and handed to the `World`.

use serde::{Deserialize, Serialize};

/// How much damage a formation member takes when it rams an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RammingDamage {
    /// The enemy's remaining hp (at least 1)
    #[default]
    EnemyHp,
    /// A fixed amount
    Flat(i32),
}

impl RammingDamage {
    /// Damage dealt to the ship for an enemy with `enemy_hp` left
    pub fn amount(&self, enemy_hp: i32) -> i32 {
        match self {
            RammingDamage::EnemyHp => enemy_hp.max(1),
            RammingDamage::Flat(n) => (*n).max(0),
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pools ===
    pub player_bullet_capacity: usize,
    pub enemy_bullet_capacity: usize,
    pub enemy_capacity: usize,

    // === Leader ===
    /// Horizontal speed (px/s)
    pub leader_speed: f32,
    /// Distance kept from the left/right viewport edges
    pub leader_margin: f32,
    /// Start height measured up from the bottom edge
    pub leader_bottom_offset: f32,

    // === Ships ===
    pub ship_hp: i32,
    pub ship_size: f32,
    /// Grace period after a hit (0 disables)
    pub invulnerability_ms: f64,
    /// Blink half-period while invulnerable
    pub blink_period_ms: f64,

    // === Formation ===
    /// Trail member `i` replays the leader `(i + 1) * step` samples back
    pub trail_delay_step: usize,
    pub trail_history_len: usize,
    pub orbit_radius: f32,
    pub orbit_radius_step: f32,
    pub orbit_speed_deg: f32,

    // === Bullets ===
    pub bullet_size: f32,
    pub bullet_ttl_sec: f32,
    pub bullet_margin: f32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_margin: f32,
    /// Delay between ships of an immediate `{ships: [...]}` formation
    pub spawn_stagger_ms: f64,

    // === Combat ===
    pub kill_score: u64,
    pub ramming: RammingDamage,

    // === Frame pacing ===
    /// Frame cap (0 = uncapped)
    pub max_fps: f64,
    /// Largest delta a single tick may consume (s)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_bullet_capacity: 200,
            enemy_bullet_capacity: 200,
            enemy_capacity: 50,

            leader_speed: 300.0,
            leader_margin: 20.0,
            leader_bottom_offset: 100.0,

            ship_hp: 10,
            ship_size: 30.0,
            invulnerability_ms: 1000.0,
            blink_period_ms: 150.0,

            trail_delay_step: 10,
            trail_history_len: 128,
            orbit_radius: 50.0,
            orbit_radius_step: 4.0,
            orbit_speed_deg: 60.0,

            bullet_size: 10.0,
            bullet_ttl_sec: 5.0,
            bullet_margin: 40.0,

            enemy_size: 40.0,
            enemy_margin: 120.0,
            spawn_stagger_ms: 150.0,

            kill_score: 100,
            ramming: RammingDamage::EnemyHp,

            max_fps: 30.0,
            max_frame_dt: 0.05,
        }
    }
}

impl Tuning {
    /// Parse a tuning file
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a tuning file, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring malformed tuning file: {}", err);
                Self::default()
            }
        }
    }

    /// Clamp a raw frame delta to what a single tick may consume
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "enemy_capacity": 8, "kill_score": 250 }"#).unwrap();
        assert_eq!(tuning.enemy_capacity, 8);
        assert_eq!(tuning.kill_score, 250);
        assert_eq!(tuning.player_bullet_capacity, 200);
        assert_eq!(tuning.ramming, RammingDamage::EnemyHp);
    }

    #[test]
    fn test_ramming_variants() {
        let flat = Tuning::from_json(r#"{ "ramming": { "flat": 1 } }"#).unwrap();
        assert_eq!(flat.ramming, RammingDamage::Flat(1));
        assert_eq!(flat.ramming.amount(7), 1);
        assert_eq!(RammingDamage::EnemyHp.amount(3), 3);
        assert_eq!(RammingDamage::EnemyHp.amount(0), 1);
    }

    #[test]
    fn test_malformed_falls_back() {
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning.enemy_capacity, 50);
    }

    #[test]
    fn test_clamp_dt() {
        let tuning = Tuning::default();
        assert_eq!(tuning.clamp_dt(1.0), 0.05);
        assert_eq!(tuning.clamp_dt(-0.2), 0.0);
        assert_eq!(tuning.clamp_dt(f32::NAN), 0.0);
        assert_eq!(tuning.clamp_dt(0.016), 0.016);
    }
}
