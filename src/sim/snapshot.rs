//! Render-facing view of the world
//!
//! The renderer never touches pools or handles. It gets a flat copy of
//! what is visible this frame.

use glam::Vec2;
use serde::Serialize;

use super::entity::{EntityKind, Owner};
use super::spawn::EnemyKind;
use super::state::{GamePhase, World};
use super::weapon::{BulletStyle, WeaponKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub size: f32,
    pub hp: i32,
    pub weapon: WeaponKind,
    /// False on the off beat of the post-hit blink
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: f32,
    pub hp: i32,
    pub enemy_kind: Option<EnemyKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub size: f32,
    pub owner: Owner,
    pub style: BulletStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time_ms: f64,
    pub viewport: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub leader: Vec2,
    pub formation: Option<String>,
    /// Live formation members only
    pub ships: Vec<ShipView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub pending_spawns: usize,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let now = world.now_ms;
        let ships = world
            .ships
            .iter()
            .filter(|s| s.is_alive())
            .map(|s| ShipView {
                pos: s.pos,
                size: s.size,
                hp: s.hp,
                weapon: s.weapon,
                visible: s.blink_visible(now, world.tuning.blink_period_ms),
            })
            .collect();

        let enemies = world
            .enemies
            .iter_active()
            .map(|(_, e)| EnemyView {
                pos: e.pos,
                size: e.size,
                hp: e.hp,
                enemy_kind: e.enemy_kind(),
            })
            .collect();

        let bullets = world
            .player_bullets
            .iter_active()
            .chain(world.enemy_bullets.iter_active())
            .filter_map(|(_, b)| match b.kind {
                EntityKind::Bullet { style, .. } => Some(BulletView {
                    pos: b.pos,
                    size: b.size,
                    owner: b.owner,
                    style,
                }),
                EntityKind::Enemy { .. } => None,
            })
            .collect();

        Self {
            time_ms: now,
            viewport: world.viewport,
            phase: world.phase,
            score: world.score,
            leader: world.leader.pos,
            formation: world
                .player_formations()
                .get(world.formation_index())
                .map(|f| f.id.clone()),
            ships,
            enemies,
            bullets,
            pending_spawns: world.scheduler.pending(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
