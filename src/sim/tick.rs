//! Simulation tick
//!
//! One call per animation frame. Stages run in a fixed order and each
//! finishes before the next starts: leader, formation, player weapons,
//! spawns, enemies, bullets, collisions, cleanup.

use glam::Vec2;

use super::collision::{self, CollisionRules};
use super::entity::{EntityKind, Owner};
use super::pool::SlotId;
use super::spawn::EnemyKind;
use super::state::{GamePhase, SimEvent, World};
use super::weapon::enemy_volley;
use crate::consts::POINTER_DEAD_ZONE;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// -1 left, 0 idle, 1 right
    pub move_axis: f32,
    /// Fire held
    pub firing: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Touch/pointer x to steer toward when no key is held
    pub pointer_x: Option<f32>,
    /// Switch to the next player formation (one-shot)
    pub cycle_formation: bool,
}

/// Advance the world by `dt` seconds of wall-clock time
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if input.pause {
        world.toggle_pause();
    }

    // Don't tick if paused or game over
    match world.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    let dt = world.tuning.clamp_dt(dt);
    world.now_ms += f64::from(dt) * 1000.0;

    if input.cycle_formation {
        world.cycle_formation();
    }

    // 1. Leader
    steer_leader(world, input, dt);
    world.trail.record(world.leader.pos);

    // 2. Formation members follow the (possibly just moved) leader
    world.place_ships();

    // 3. Player weapons
    fire_player_weapons(world, input.firing, dt);

    // 4. Due spawns
    world.run_scheduler();

    // 5. Enemies move and shoot
    update_enemies(world, dt);

    // 6. Bullets
    update_bullets(world, dt);

    // 7. Collisions
    resolve_collisions(world);

    // 8. Reclaim dead and out-of-bounds entities
    cleanup(world);

    if world.live_ship_count() == 0 {
        world.phase = GamePhase::GameOver;
        log::info!("Game over, score {}", world.score);
        let score = world.score;
        world.push_event(SimEvent::GameOver { score });
    }
}

fn steer_leader(world: &mut World, input: &TickInput, dt: f32) {
    let mut axis = input.move_axis.clamp(-1.0, 1.0);
    if axis == 0.0 {
        if let Some(target) = input.pointer_x {
            let diff = target - world.leader.pos.x;
            let reach = world.leader.speed * dt;
            if diff.abs() > POINTER_DEAD_ZONE && reach > 0.0 {
                // Never overshoot the pointer
                axis = (diff / reach).clamp(-1.0, 1.0);
            }
        }
    }
    world
        .leader
        .steer(axis, dt, world.viewport.x, world.tuning.leader_margin);
}

fn fire_player_weapons(world: &mut World, firing: bool, dt: f32) {
    let mut volleys = Vec::new();
    for ship in world.ships.iter_mut().filter(|s| s.is_alive()) {
        ship.cooldown -= dt;
        if firing && ship.cooldown <= 0.0 {
            volleys.push((ship.pos, ship.weapon.volley()));
            ship.cooldown = ship.weapon.cooldown_secs();
        } else if ship.cooldown < 0.0 {
            ship.cooldown = 0.0;
        }
    }

    for (from, shots) in volleys {
        for shot in &shots {
            world.fire_bullet(Owner::Player, from, shot);
        }
    }
}

fn update_enemies(world: &mut World, dt: f32) {
    let now_ms = world.now_ms;
    let viewport = world.viewport;

    let mut ready: Vec<(SlotId, Option<EnemyKind>, i32, Vec2)> = Vec::new();
    for (id, enemy) in world.enemies.iter_active_mut() {
        enemy.step(now_ms, dt, viewport);
        enemy.cooldown -= dt;
        if enemy.cooldown <= 0.0 {
            ready.push((id, enemy.enemy_kind(), enemy.hp, enemy.pos));
        }
    }
    if ready.is_empty() {
        return;
    }

    let targets = world.live_ship_positions();
    for (id, kind, hp, pos) in ready {
        let volley = enemy_volley(kind, hp, pos, &targets, world.rng_mut());
        for shot in &volley.shots {
            world.fire_bullet(Owner::Enemy, pos, shot);
        }
        if let Some(enemy) = world.enemies.get_mut(id) {
            enemy.cooldown = volley.cooldown;
        }
    }
}

fn update_bullets(world: &mut World, dt: f32) {
    for pool in [&mut world.player_bullets, &mut world.enemy_bullets] {
        pool.for_each_active(|id, bullet, release| {
            bullet.pos += bullet.vel * dt;
            if let EntityKind::Bullet { ttl, .. } = &mut bullet.kind {
                *ttl -= dt;
                if *ttl <= 0.0 {
                    release.push(id);
                }
            }
        });
    }
}

fn resolve_collisions(world: &mut World) {
    let rules = CollisionRules {
        invulnerability_ms: world.tuning.invulnerability_ms,
        ramming: world.tuning.ramming,
    };
    let report = collision::resolve(
        &mut world.player_bullets,
        &mut world.enemy_bullets,
        &mut world.enemies,
        &mut world.ships,
        world.now_ms,
        &rules,
    );

    for down in report.enemies_down {
        // Ramming destroys the enemy but scores nothing
        if !down.rammed {
            world.score += world.tuning.kill_score;
        }
        world.push_event(SimEvent::EnemyKilled {
            pos: down.pos,
            enemy_kind: down.enemy_kind,
            rammed: down.rammed,
        });
    }

    for hit in report.ship_hits {
        let hp = world.ships.get(hit.ship).map_or(0, |s| s.hp);
        world.push_event(SimEvent::ShipHit {
            ship: hit.ship,
            damage: hit.damage,
            hp,
        });
        if hit.destroyed {
            log::info!("Ship {} destroyed", hit.ship);
            world.push_event(SimEvent::ShipDestroyed { ship: hit.ship });
        }
    }
}

/// Inside the viewport grown by `margin` on every side
#[inline]
fn in_bounds(pos: Vec2, viewport: Vec2, margin: f32) -> bool {
    pos.x >= -margin && pos.x <= viewport.x + margin && pos.y >= -margin && pos.y <= viewport.y + margin
}

fn cleanup(world: &mut World) {
    let viewport = world.viewport;
    let bullet_margin = world.tuning.bullet_margin;
    let enemy_margin = world.tuning.enemy_margin;

    world
        .player_bullets
        .release_where(|b| b.is_dead() || !in_bounds(b.pos, viewport, bullet_margin));
    world
        .enemy_bullets
        .release_where(|b| b.is_dead() || !in_bounds(b.pos, viewport, bullet_margin));
    world
        .enemies
        .release_where(|e| e.is_dead() || !in_bounds(e.pos, viewport, enemy_margin));
}
