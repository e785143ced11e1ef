//! World state
//!
//! The `World` is the one context object the tick mutates. It owns the
//! pools, the scheduler, the player's formation and the seeded RNG; the
//! driver constructs it once and feeds it already-parsed data.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Formation, FormationBehavior, FormationLayout, FormationSpec, Leader, Owner, PlayerShip, ShipSpec, TrailHistory};
use super::motion::{MotionContext, evaluate};
use super::pool::Pool;
use super::scheduler::SpawnScheduler;
use super::spawn::{EnemyKind, SpawnSpec};
use super::weapon::{Shot, WeaponKind, initial_enemy_cooldown};
use crate::consts::{DEFAULT_BULLET_DAMAGE, DEFAULT_ENEMY_VX, DEFAULT_ENEMY_VY};
use crate::norm_to_px;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    /// Every formation member destroyed
    GameOver,
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    EnemySpawned { pos: Vec2, enemy_kind: Option<EnemyKind> },
    /// Due spawn with no free enemy slot
    SpawnDropped { trigger_time_ms: f64 },
    EnemyKilled { pos: Vec2, enemy_kind: Option<EnemyKind>, rammed: bool },
    ShipHit { ship: usize, damage: i32, hp: i32 },
    ShipDestroyed { ship: usize },
    FormationChanged { id: String, ships: usize },
    ScheduleCancelled { pending: usize },
    GameOver { score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Viewport in pixels
    pub viewport: Vec2,
    /// Simulation clock (advances only while playing)
    pub now_ms: f64,
    pub player_bullets: Pool<Entity>,
    pub enemy_bullets: Pool<Entity>,
    pub enemies: Pool<Entity>,
    pub scheduler: SpawnScheduler,
    pub leader: Leader,
    pub trail: TrailHistory,
    pub ships: Vec<PlayerShip>,
    pub formation: Formation,
    /// Loaded player formations
    formations: Vec<FormationSpec>,
    formation_index: usize,
    /// When the current formation was selected (orbit phase reference)
    formation_started_ms: f64,
    pub seed: u64,
    rng: Pcg32,
    pub score: u64,
    pub phase: GamePhase,
    events: Vec<SimEvent>,
}

impl World {
    pub fn new(tuning: Tuning, viewport: Vec2, seed: u64) -> Self {
        let leader = Leader {
            pos: Vec2::new(viewport.x / 2.0, viewport.y - tuning.leader_bottom_offset),
            speed: tuning.leader_speed,
        };
        let mut world = Self {
            player_bullets: Pool::new(tuning.player_bullet_capacity),
            enemy_bullets: Pool::new(tuning.enemy_bullet_capacity),
            enemies: Pool::new(tuning.enemy_capacity),
            scheduler: SpawnScheduler::new(),
            trail: TrailHistory::new(tuning.trail_history_len),
            leader,
            ships: Vec::new(),
            formation: Formation {
                behavior: FormationBehavior::Static,
                member_offsets_px: Vec::new(),
            },
            formations: Vec::new(),
            formation_index: 0,
            formation_started_ms: 0.0,
            viewport,
            now_ms: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
            tuning,
        };
        world.rebuild_ships();
        world
    }

    /// Replace the enemy schedule
    ///
    /// Pending spawns of the old schedule are cancelled and its enemies
    /// released right away, so nothing from it can reappear.
    pub fn load_spawns(&mut self, specs: Vec<SpawnSpec>) {
        let pending = self.scheduler.pending();
        self.scheduler.cancel();
        let released = self.enemies.release_all();
        if pending > 0 || released > 0 {
            log::info!("Replacing schedule: {} pending spawns dropped, {} enemies released", pending, released);
            self.events.push(SimEvent::ScheduleCancelled { pending });
        }
        self.scheduler.schedule(specs, self.now_ms);
    }

    /// Install the player formations of an insect file and select the first
    pub fn load_player_formations(&mut self, formations: Vec<FormationSpec>) {
        log::info!("Loaded {} player formations", formations.len());
        self.formations = formations;
        self.formation_index = 0;
        self.rebuild_ships();
    }

    pub fn player_formations(&self) -> &[FormationSpec] {
        &self.formations
    }

    pub fn formation_index(&self) -> usize {
        self.formation_index
    }

    /// Switch to the next loaded formation (wrapping)
    pub fn cycle_formation(&mut self) {
        if self.formations.is_empty() {
            return;
        }
        self.select_formation((self.formation_index + 1) % self.formations.len());
    }

    pub fn select_formation(&mut self, index: usize) {
        if index >= self.formations.len() {
            log::warn!("No player formation at index {}", index);
            return;
        }
        self.formation_index = index;
        self.rebuild_ships();
    }

    /// New viewport size: offsets are screen-relative, so the formation is rebuilt
    pub fn resize(&mut self, viewport: Vec2) {
        if viewport == self.viewport || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        log::info!("Viewport resized to {}x{}", viewport.x, viewport.y);
        self.viewport = viewport;
        self.leader.pos.y = viewport.y - self.tuning.leader_bottom_offset;
        self.leader.steer(0.0, 0.0, viewport.x, self.tuning.leader_margin);
        if let Some(spec) = self.formations.get(self.formation_index) {
            self.formation = Formation::build(spec, viewport);
        }
        let layout = self.formation_layout();
        for (i, ship) in self.ships.iter_mut().enumerate() {
            ship.motion = self.formation.member_motion(i, &layout);
        }
        self.place_ships();
    }

    pub fn formation_layout(&self) -> FormationLayout {
        FormationLayout {
            trail_delay_step: self.tuning.trail_delay_step,
            orbit_radius: self.tuning.orbit_radius,
            orbit_radius_step: self.tuning.orbit_radius_step,
            orbit_speed_deg: self.tuning.orbit_speed_deg,
        }
    }

    /// Recreate the formation members from the selected spec (fresh hp)
    fn rebuild_ships(&mut self) {
        let fallback = FormationSpec {
            id: "single".into(),
            behavior: FormationBehavior::Static,
            ships: vec![ShipSpec {
                x_norm: 50.0,
                y_norm: 50.0,
                hp: None,
                weapon: None,
            }],
        };
        let spec = match self.formations.get(self.formation_index) {
            Some(spec) if !spec.ships.is_empty() => spec.clone(),
            _ => fallback,
        };

        self.formation = Formation::build(&spec, self.viewport);
        let layout = self.formation_layout();
        self.ships = spec
            .ships
            .iter()
            .enumerate()
            .map(|(i, ship)| {
                PlayerShip::new(
                    self.leader.pos,
                    self.formation.member_motion(i, &layout),
                    ship.weapon.unwrap_or_default(),
                    ship.hp.unwrap_or(self.tuning.ship_hp).max(1),
                    self.tuning.ship_size,
                )
            })
            .collect();
        self.formation_started_ms = self.now_ms;
        // The last trail member replays `ships * step` samples back
        let trail_len = self
            .tuning
            .trail_history_len
            .max(self.ships.len() * layout.trail_delay_step + 1);
        self.trail = TrailHistory::new(trail_len);
        self.place_ships();

        log::info!("Formation '{}' ({:?}) with {} ships", spec.id, spec.behavior, self.ships.len());
        self.events.push(SimEvent::FormationChanged {
            id: spec.id,
            ships: self.ships.len(),
        });
    }

    /// Put every member where its path says, relative to the leader
    pub fn place_ships(&mut self) {
        let age = ((self.now_ms - self.formation_started_ms) / 1000.0).max(0.0) as f32;
        let ctx = MotionContext::new(self.viewport, self.leader.pos).with_trail(&self.trail);
        for ship in self.ships.iter_mut().filter(|s| s.is_alive()) {
            ship.pos = evaluate(&ship.motion, age, self.leader.pos, &ctx).advance(ship.pos, 0.0);
        }
    }

    /// Change one member's weapon. False if there is no such member.
    pub fn set_weapon(&mut self, ship: usize, weapon: WeaponKind) -> bool {
        match self.ships.get_mut(ship) {
            Some(ship) => {
                ship.weapon = weapon;
                ship.cooldown = 0.0;
                true
            }
            None => false,
        }
    }

    /// Positions of the members still flying
    pub fn live_ship_positions(&self) -> Vec<Vec2> {
        self.ships.iter().filter(|s| s.is_alive()).map(|s| s.pos).collect()
    }

    pub fn live_ship_count(&self) -> usize {
        self.ships.iter().filter(|s| s.is_alive()).count()
    }

    /// Put a bullet into its owner's pool. Exhaustion drops the shot.
    pub fn fire_bullet(&mut self, owner: Owner, from: Vec2, shot: &Shot) -> bool {
        let pool = match owner {
            Owner::Player => &mut self.player_bullets,
            Owner::Enemy => &mut self.enemy_bullets,
        };
        let bullet = Entity::bullet(
            owner,
            from + shot.offset,
            shot.vel,
            DEFAULT_BULLET_DAMAGE,
            self.tuning.bullet_ttl_sec,
            self.tuning.bullet_size,
            shot.style,
            self.now_ms,
        );
        if pool.spawn(bullet).is_some() {
            true
        } else {
            log::debug!("{:?} bullet pool exhausted, shot dropped", owner);
            false
        }
    }

    /// Materialize a spawn spec into the enemy pool
    pub fn activate_enemy(&mut self, spec: &SpawnSpec) -> bool {
        let pos = norm_to_px(spec.position_norm, self.viewport);
        let vel = spec.velocity.unwrap_or(Vec2::new(DEFAULT_ENEMY_VX, DEFAULT_ENEMY_VY));
        let mut enemy = Entity::enemy(pos, vel, spec.hp.max(1), spec.size, spec.enemy_kind, spec.motion.clone(), self.now_ms);
        enemy.cooldown = initial_enemy_cooldown(spec.enemy_kind);

        if self.enemies.spawn(enemy).is_some() {
            self.events.push(SimEvent::EnemySpawned {
                pos,
                enemy_kind: spec.enemy_kind,
            });
            true
        } else {
            log::debug!("Enemy pool exhausted, dropping spawn at t={}ms", spec.trigger_time_ms);
            self.events.push(SimEvent::SpawnDropped {
                trigger_time_ms: spec.trigger_time_ms,
            });
            false
        }
    }

    /// Fire every due spawn
    pub fn run_scheduler(&mut self) {
        let mut scheduler = std::mem::take(&mut self.scheduler);
        let result = scheduler.tick(self.now_ms, |spec| self.activate_enemy(spec));
        self.scheduler = scheduler;
        if result.dropped > 0 {
            log::debug!("{} spawns dropped this tick", result.dropped);
        }
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take the events buffered since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
        log::info!("Phase now {:?}", self.phase);
    }

    /// Fresh run with the same data: pools emptied, formation restored, score reset
    pub fn restart(&mut self, specs: Vec<SpawnSpec>) {
        self.player_bullets.release_all();
        self.enemy_bullets.release_all();
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.leader.pos.x = self.viewport.x / 2.0;
        self.rebuild_ships();
        self.load_spawns(specs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::MotionSpec;

    fn world() -> World {
        World::new(Tuning::default(), Vec2::new(800.0, 600.0), 1)
    }

    fn formation(id: &str, behavior: FormationBehavior, ships: usize) -> FormationSpec {
        FormationSpec {
            id: id.into(),
            behavior,
            ships: (0..ships)
                .map(|i| ShipSpec {
                    x_norm: 40.0 + i as f32 * 10.0,
                    y_norm: 50.0,
                    hp: Some(3),
                    weapon: Some(WeaponKind::Spread),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_world_has_single_ship_at_leader() {
        let world = world();
        assert_eq!(world.leader.pos, Vec2::new(400.0, 500.0));
        assert_eq!(world.ships.len(), 1);
        assert_eq!(world.ships[0].pos, world.leader.pos);
        assert_eq!(world.ships[0].hp, 10);
        assert_eq!(world.enemies.capacity(), 50);
    }

    #[test]
    fn test_load_player_formations_and_cycle() {
        let mut world = world();
        world.load_player_formations(vec![
            formation("wing", FormationBehavior::Line, 3),
            formation("duo", FormationBehavior::Static, 2),
        ]);
        assert_eq!(world.ships.len(), 3);
        assert_eq!(world.ships[0].weapon, WeaponKind::Spread);
        assert_eq!(world.ships[0].hp, 3);
        // x_norm 40 -> 80 px left of the leader
        assert!((world.ships[0].pos.x - 320.0).abs() < 1e-3);

        world.cycle_formation();
        assert_eq!(world.formation_index(), 1);
        assert_eq!(world.ships.len(), 2);
        world.cycle_formation();
        assert_eq!(world.formation_index(), 0);
    }

    #[test]
    fn test_activate_enemy_defaults_and_exhaustion() {
        let tuning = Tuning {
            enemy_capacity: 1,
            ..Tuning::default()
        };
        let mut world = World::new(tuning, Vec2::new(800.0, 600.0), 1);
        let spec = SpawnSpec::at(0.0, Vec2::new(50.0, 0.0), 40.0);
        assert!(world.activate_enemy(&spec));
        assert!(!world.activate_enemy(&spec));

        let (_, enemy) = world.enemies.iter_active().next().unwrap();
        assert_eq!(enemy.pos, Vec2::new(400.0, 0.0));
        assert_eq!(enemy.vel, Vec2::new(0.0, 50.0));

        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(e, SimEvent::SpawnDropped { .. })));
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_load_spawns_releases_old_enemies() {
        let mut world = world();
        let spec = SpawnSpec {
            motion: Some(MotionSpec::Linear { vx: 0.0, vy: 70.0 }),
            ..SpawnSpec::at(0.0, Vec2::new(10.0, 0.0), 40.0)
        };
        world.load_spawns(vec![spec.clone(), spec.delayed(5000.0)]);
        world.run_scheduler();
        assert_eq!(world.enemies.active_count(), 1);

        world.load_spawns(Vec::new());
        assert_eq!(world.enemies.active_count(), 0);
        assert!(!world.scheduler.has_pending());
    }

    #[test]
    fn test_resize_rebuilds_offsets() {
        let mut world = world();
        world.load_player_formations(vec![formation("pair", FormationBehavior::Static, 2)]);
        let before = world.ships[0].pos.x - world.leader.pos.x;
        world.resize(Vec2::new(400.0, 300.0));
        let after = world.ships[0].pos.x - world.leader.pos.x;
        assert!((after - before / 2.0).abs() < 1e-3);
        assert_eq!(world.leader.pos.y, 200.0);
    }

    #[test]
    fn test_fire_bullet_routes_by_owner() {
        let mut world = world();
        let shot = WeaponKind::Basic.volley()[0];
        assert!(world.fire_bullet(Owner::Player, Vec2::new(100.0, 100.0), &shot));
        assert_eq!(world.player_bullets.active_count(), 1);
        assert_eq!(world.enemy_bullets.active_count(), 0);
        let (_, bullet) = world.player_bullets.iter_active().next().unwrap();
        assert_eq!(bullet.pos, Vec2::new(100.0, 80.0));
    }

    #[test]
    fn test_set_weapon() {
        let mut world = world();
        world.ships[0].cooldown = 0.4;
        assert!(world.set_weapon(0, WeaponKind::Laser));
        assert_eq!(world.ships[0].weapon, WeaponKind::Laser);
        assert_eq!(world.ships[0].cooldown, 0.0);
        assert!(!world.set_weapon(5, WeaponKind::Wide));
    }

    #[test]
    fn test_restart_replays_schedule() {
        let mut world = world();
        world.load_player_formations(vec![formation("wing", FormationBehavior::Line, 3)]);
        let specs = vec![
            SpawnSpec::at(0.0, Vec2::new(50.0, 10.0), 40.0),
            SpawnSpec::at(2_000.0, Vec2::new(20.0, 10.0), 40.0),
        ];
        world.load_spawns(specs.clone());
        world.run_scheduler();
        world.fire_bullet(Owner::Player, world.leader.pos, &WeaponKind::Basic.volley()[0]);
        world.ships[1].hp = 0;
        world.leader.pos.x = 100.0;
        world.score = 700;
        world.phase = GamePhase::GameOver;

        world.restart(specs);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.score, 0);
        assert_eq!(world.player_bullets.active_count(), 0);
        assert_eq!(world.enemies.active_count(), 0);
        assert_eq!(world.leader.pos.x, 400.0);
        assert_eq!(world.live_ship_count(), 3);
        assert_eq!(world.scheduler.pending(), 2);

        world.run_scheduler();
        assert_eq!(world.enemies.active_count(), 1);
    }
}
