//! Collision detection and damage resolution
//!
//! Everything is a circle. Pairs resolve in a fixed order (player bullets
//! vs enemies, enemy bullets vs ships, ships ramming enemies) and an entity
//! removed by an earlier pair is not seen by a later one.

use glam::Vec2;

use super::entity::{Entity, Owner, PlayerShip};
use super::pool::{Pool, SlotId};
use super::spawn::EnemyKind;
use crate::tuning::RammingDamage;

/// Overlap test without a square root
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Only entities of opposite sides interact
#[inline]
pub fn hostile(a: Owner, b: Owner) -> bool {
    a != b
}

/// Parameters of the damage rules
#[derive(Debug, Clone, Copy)]
pub struct CollisionRules {
    pub invulnerability_ms: f64,
    pub ramming: RammingDamage,
}

/// An enemy removed this pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyDown {
    pub pos: Vec2,
    pub enemy_kind: Option<EnemyKind>,
    /// Destroyed by contact with a ship rather than shot down
    pub rammed: bool,
}

/// Damage a formation member took this pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDamage {
    pub ship: usize,
    pub damage: i32,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub enemies_down: Vec<EnemyDown>,
    pub ship_hits: Vec<ShipDamage>,
    pub bullets_consumed: usize,
}

/// Run every collision pair once
pub fn resolve(
    player_bullets: &mut Pool<Entity>,
    enemy_bullets: &mut Pool<Entity>,
    enemies: &mut Pool<Entity>,
    ships: &mut [PlayerShip],
    now_ms: f64,
    rules: &CollisionRules,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    bullets_vs_enemies(player_bullets, enemies, &mut report);
    bullets_vs_ships(enemy_bullets, ships, now_ms, rules, &mut report);
    ships_vs_enemies(ships, enemies, now_ms, rules, &mut report);
    report
}

/// Snapshot of the colliders in a pool, so the pool can be mutated while walking them
fn colliders(pool: &Pool<Entity>) -> Vec<(SlotId, Vec2, f32, Owner, i32)> {
    pool.iter_active()
        .map(|(id, e)| (id, e.pos, e.radius(), e.owner, e.damage()))
        .collect()
}

/// Bullets hit at most one target and are always consumed
pub fn bullets_vs_enemies(bullets: &mut Pool<Entity>, enemies: &mut Pool<Entity>, report: &mut CollisionReport) {
    let targets = colliders(enemies);
    for (bullet_id, bullet_pos, bullet_r, bullet_owner, damage) in colliders(bullets) {
        for &(enemy_id, _, enemy_r, enemy_owner, _) in &targets {
            if !hostile(bullet_owner, enemy_owner) {
                continue;
            }
            // Resolve again: an earlier bullet may have removed it
            let Some(enemy) = enemies.get_mut(enemy_id) else {
                continue;
            };
            if !circles_overlap(bullet_pos, bullet_r, enemy.pos, enemy_r) {
                continue;
            }

            enemy.take_damage(damage);
            bullets.release(bullet_id);
            report.bullets_consumed += 1;

            if enemy.is_dead() {
                report.enemies_down.push(EnemyDown {
                    pos: enemy.pos,
                    enemy_kind: enemy.enemy_kind(),
                    rammed: false,
                });
                enemies.release(enemy_id);
            }
            break;
        }
    }
}

/// Enemy bullets against each live formation member
pub fn bullets_vs_ships(
    bullets: &mut Pool<Entity>,
    ships: &mut [PlayerShip],
    now_ms: f64,
    rules: &CollisionRules,
    report: &mut CollisionReport,
) {
    for (bullet_id, bullet_pos, bullet_r, bullet_owner, damage) in colliders(bullets) {
        if !hostile(bullet_owner, Owner::Player) {
            continue;
        }
        let hit = ships
            .iter_mut()
            .enumerate()
            .find(|(_, ship)| ship.is_alive() && circles_overlap(bullet_pos, bullet_r, ship.pos, ship.radius()));
        let Some((index, ship)) = hit else {
            continue;
        };

        bullets.release(bullet_id);
        report.bullets_consumed += 1;
        if ship.hit(damage, now_ms, rules.invulnerability_ms) {
            report.ship_hits.push(ShipDamage {
                ship: index,
                damage,
                destroyed: !ship.is_alive(),
            });
        }
    }
}

/// Contact between a ship and an enemy removes the enemy and hurts the ship
pub fn ships_vs_enemies(
    ships: &mut [PlayerShip],
    enemies: &mut Pool<Entity>,
    now_ms: f64,
    rules: &CollisionRules,
    report: &mut CollisionReport,
) {
    for (index, ship) in ships.iter_mut().enumerate() {
        for (enemy_id, enemy_pos, enemy_r, enemy_owner, _) in colliders(enemies) {
            if !ship.is_alive() {
                break;
            }
            if !hostile(Owner::Player, enemy_owner) || !circles_overlap(ship.pos, ship.radius(), enemy_pos, enemy_r) {
                continue;
            }
            let Some(enemy) = enemies.get(enemy_id) else {
                continue;
            };

            let damage = rules.ramming.amount(enemy.hp);
            report.enemies_down.push(EnemyDown {
                pos: enemy.pos,
                enemy_kind: enemy.enemy_kind(),
                rammed: true,
            });
            enemies.release(enemy_id);

            if damage > 0 && ship.hit(damage, now_ms, rules.invulnerability_ms) {
                report.ship_hits.push(ShipDamage {
                    ship: index,
                    damage,
                    destroyed: !ship.is_alive(),
                });
            }
        }
    }
}
