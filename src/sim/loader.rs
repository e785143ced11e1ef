//! Formation and spawn file parsing
//!
//! Files come in several shapes written over time. Everything is normalized
//! here into `SpawnSpec`/`MotionSpec`/`FormationSpec` so the simulation never
//! looks at raw JSON. Parsing a decoded `Value` never fails: missing or
//! malformed fields fall back to defaults with a warning.

use glam::Vec2;
use serde_json::{Map, Value};

use super::entity::{FormationBehavior, FormationSpec, ShipSpec};
use super::spawn::{Axis, EnemyKind, MotionSpec, SpawnSpec, sort_by_trigger};
use super::weapon::WeaponKind;
use crate::tuning::Tuning;

/// Legacy wave files predate normalized coordinates and carry their own defaults
const LEGACY_VY: f32 = 120.0;
const LEGACY_SIZE: f32 = 48.0;

/// Immediate `{ships, behavior}` files
const IMMEDIATE_Y_NORM: f32 = 10.0;
const IMMEDIATE_FOLLOW_VY: f32 = 40.0;
const IMMEDIATE_LINE_VY: f32 = 60.0;
const IMMEDIATE_ORBIT_CENTER_NORM: Vec2 = Vec2::new(50.0, 25.0);
const IMMEDIATE_ORBIT_RADIUS: f32 = 80.0;
const IMMEDIATE_ORBIT_RADIUS_STEP: f32 = 4.0;
const IMMEDIATE_ORBIT_SPEED_DEG: f32 = 60.0;
const IMMEDIATE_ORBIT_ANGLE_STEP: f32 = 30.0;

/// Values a spawn file may leave out
#[derive(Debug, Clone, Copy)]
pub struct SpawnDefaults {
    pub size: f32,
    /// Delay between ships of an immediate formation
    pub stagger_ms: f64,
}

impl Default for SpawnDefaults {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

impl From<&Tuning> for SpawnDefaults {
    fn from(tuning: &Tuning) -> Self {
        Self {
            size: tuning.enemy_size,
            stagger_ms: tuning.spawn_stagger_ms,
        }
    }
}

// === Field helpers ===

/// First of `keys` holding a number
fn number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::Number(n)) => return n.as_f64(),
            Some(other) => {
                log::warn!("Ignoring non-numeric '{}': {}", key, other);
                return None;
            }
        }
    }
    None
}

fn number_f32(obj: &Map<String, Value>, keys: &[&str]) -> Option<f32> {
    number(obj, keys).map(|n| n as f32)
}

fn string<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_str))
}

fn array<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_array))
}

/// `[x, y]` or `{x, y}`
fn point(value: &Value) -> Option<Vec2> {
    match value {
        Value::Array(items) if items.len() >= 2 => Some(Vec2::new(items[0].as_f64()? as f32, items[1].as_f64()? as f32)),
        Value::Object(obj) => Some(Vec2::new(
            number_f32(obj, &["x", "x_norm"])?,
            number_f32(obj, &["y", "y_norm"])?,
        )),
        _ => None,
    }
}

// === Motion ===

/// Parse a `path` value
///
/// Accepts a bare tag string (`"sine"`) or an object tagged by `type` or
/// `kind`. Unknown tags degrade to a stationary path.
pub fn parse_motion(value: &Value) -> Option<MotionSpec> {
    let empty = Map::new();
    let (tag, obj) = match value {
        Value::Null => return None,
        Value::String(tag) => (tag.as_str(), &empty),
        Value::Object(obj) => match string(obj, &["type", "kind"]) {
            Some(tag) => (tag, obj),
            None => {
                log::warn!("Path without a type, treating as stationary");
                return Some(MotionSpec::stationary());
            }
        },
        other => {
            log::warn!("Unreadable path {}, treating as stationary", other);
            return Some(MotionSpec::stationary());
        }
    };

    let motion = match tag.trim().to_lowercase().as_str() {
        "linear" | "straight" => MotionSpec::Linear {
            vx: number_f32(obj, &["vx", "vx_px_s"]).unwrap_or(0.0),
            vy: number_f32(obj, &["vy", "vy_px_s"]).unwrap_or(MotionSpec::DEFAULT_LINEAR_VY),
        },
        "sine" | "sin" | "wave" => MotionSpec::Sine {
            amplitude_norm: number_f32(obj, &["amplitude_norm", "amplitude", "amp"]).unwrap_or(10.0),
            frequency_hz: number_f32(obj, &["frequency_hz", "frequency", "freq"]).unwrap_or(0.5),
            phase: number_f32(obj, &["phase"]).unwrap_or(0.0),
            axis: match string(obj, &["axis"]) {
                Some(a) if a.eq_ignore_ascii_case("y") => Axis::Y,
                _ => Axis::X,
            },
        },
        "bezier" | "cubic_bezier" | "cubicbezier" => {
            let control_points_norm: Vec<Vec2> = array(obj, &["control_points_norm", "control_points", "points"])
                .map(|points| points.iter().filter_map(point).collect())
                .unwrap_or_default();
            if control_points_norm.len() < 4 {
                log::warn!("Bezier path with {} control points stays on the first", control_points_norm.len());
            }
            MotionSpec::CubicBezier {
                control_points_norm,
                duration_ms: number_f32(obj, &["duration_ms", "duration"]).unwrap_or(3000.0),
            }
        }
        "angle" | "angle_speed" | "bulletml" => MotionSpec::AngleSpeed {
            angle_deg: number_f32(obj, &["angle_deg", "angle", "direction"]).unwrap_or(MotionSpec::DEFAULT_ANGLE_DEG),
            speed_px_per_sec: number_f32(obj, &["speed_px_per_sec", "speed_px_s", "speed"]).unwrap_or(MotionSpec::DEFAULT_SPEED),
        },
        "orbit" | "circle" => MotionSpec::Orbit {
            radius_px: number_f32(obj, &["radius_px", "radius"]).unwrap_or(50.0),
            angular_speed_deg_per_sec: number_f32(obj, &["angular_speed_deg_per_sec", "angular_speed", "speed_deg"])
                .unwrap_or(60.0),
            base_angle_deg: number_f32(obj, &["base_angle_deg", "base_angle", "angle"]).unwrap_or(0.0),
        },
        "trail" | "trail_follow" | "follow" => MotionSpec::TrailFollow {
            delay_samples: number(obj, &["delay_samples", "delay"]).unwrap_or(10.0).max(0.0) as usize,
        },
        "static" | "static_offset" | "offset" => MotionSpec::StaticOffset {
            offset_px: obj
                .get("offset_px")
                .or_else(|| obj.get("offset"))
                .and_then(point)
                .unwrap_or_else(|| {
                    Vec2::new(
                        number_f32(obj, &["offset_x", "dx"]).unwrap_or(0.0),
                        number_f32(obj, &["offset_y", "dy"]).unwrap_or(0.0),
                    )
                }),
        },
        unknown => {
            log::warn!("Unknown path type '{}', treating as stationary", unknown);
            MotionSpec::stationary()
        }
    };
    Some(motion)
}

// === Spawn files ===

/// One `spawn` entry
fn parse_spawn_entry(obj: &Map<String, Value>, defaults: &SpawnDefaults) -> SpawnSpec {
    let t = number(obj, &["t_ms", "t", "delay"]).unwrap_or(0.0);
    let x = number_f32(obj, &["x_norm", "x"]).unwrap_or(SpawnSpec::DEFAULT_X_NORM);
    let y = number_f32(obj, &["y_norm", "y"]).unwrap_or(SpawnSpec::DEFAULT_Y_NORM);
    let vx = number_f32(obj, &["vx_px_s", "vx"]);
    let vy = number_f32(obj, &["vy_px_s", "vy"]);
    let velocity = match (vx, vy) {
        (None, None) => None,
        (vx, vy) => Some(Vec2::new(
            vx.unwrap_or(crate::consts::DEFAULT_ENEMY_VX),
            vy.unwrap_or(crate::consts::DEFAULT_ENEMY_VY),
        )),
    };
    let hp = number(obj, &["hp"]).map_or(SpawnSpec::DEFAULT_HP, |hp| {
        if hp < 1.0 {
            log::warn!("Spawn hp {} raised to 1", hp);
        }
        (hp as i32).max(1)
    });

    SpawnSpec {
        trigger_time_ms: t.max(0.0),
        position_norm: Vec2::new(x, y),
        velocity,
        hp,
        size: number_f32(obj, &["size"]).filter(|s| *s > 0.0).unwrap_or(defaults.size),
        enemy_kind: string(obj, &["type", "enemy_kind"]).map(EnemyKind::from_str),
        motion: obj.get("path").or_else(|| obj.get("motion")).and_then(parse_motion),
    }
}

fn parse_spawn_entries(entries: &[Value], defaults: &SpawnDefaults) -> Vec<SpawnSpec> {
    entries
        .iter()
        .filter_map(|entry| match entry.as_object() {
            Some(obj) => Some(parse_spawn_entry(obj, defaults)),
            None => {
                log::warn!("Skipping spawn entry that is not an object: {}", entry);
                None
            }
        })
        .collect()
}

/// `{ships, behavior}`: every ship at once, staggered by index
fn parse_immediate_formation(obj: &Map<String, Value>, ships: &[Value], defaults: &SpawnDefaults) -> Vec<SpawnSpec> {
    let behavior = string(obj, &["behavior"]).unwrap_or("static").trim().to_lowercase();
    ships
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .map(|(i, ship)| {
            let t = i as f64 * defaults.stagger_ms;
            let x = number_f32(ship, &["x_norm", "x"]).unwrap_or(SpawnSpec::DEFAULT_X_NORM);
            let y = number_f32(ship, &["y_norm", "y"]).unwrap_or(IMMEDIATE_Y_NORM);
            let mut spec = SpawnSpec {
                hp: number(ship, &["hp"]).map_or(SpawnSpec::DEFAULT_HP, |hp| (hp as i32).max(1)),
                enemy_kind: string(ship, &["type"]).map(EnemyKind::from_str),
                ..SpawnSpec::at(t, Vec2::new(x, y), number_f32(ship, &["size"]).unwrap_or(defaults.size))
            };
            match behavior.as_str() {
                "orbit" => {
                    spec.position_norm = IMMEDIATE_ORBIT_CENTER_NORM;
                    spec.velocity = Some(Vec2::ZERO);
                    spec.motion = Some(MotionSpec::Orbit {
                        radius_px: IMMEDIATE_ORBIT_RADIUS + i as f32 * IMMEDIATE_ORBIT_RADIUS_STEP,
                        angular_speed_deg_per_sec: IMMEDIATE_ORBIT_SPEED_DEG,
                        base_angle_deg: i as f32 * IMMEDIATE_ORBIT_ANGLE_STEP,
                    });
                }
                "follow" => {
                    spec.velocity = Some(Vec2::new(0.0, number_f32(ship, &["vy"]).unwrap_or(IMMEDIATE_FOLLOW_VY)));
                }
                "line" => {
                    spec.velocity = Some(Vec2::new(0.0, number_f32(ship, &["vy"]).unwrap_or(IMMEDIATE_LINE_VY)));
                }
                "static" => spec.velocity = Some(Vec2::ZERO),
                other => {
                    log::warn!("Unknown formation behavior '{}', ships stay put", other);
                    spec.velocity = Some(Vec2::ZERO);
                }
            }
            spec
        })
        .collect()
}

/// `{waves: [{enemies: [...], delay, x, speed, size}]}`
fn parse_legacy_waves(waves: &[Value]) -> Vec<SpawnSpec> {
    let mut specs = Vec::new();
    for wave in waves.iter().filter_map(Value::as_object) {
        let Some(enemies) = array(wave, &["enemies"]) else {
            continue;
        };
        for enemy in enemies.iter().filter_map(Value::as_object) {
            let pick = |keys: &[&str]| number_f32(enemy, keys).or_else(|| number_f32(wave, keys));
            let t = number(enemy, &["delay"]).or_else(|| number(wave, &["delay"])).unwrap_or(0.0);
            specs.push(SpawnSpec {
                velocity: Some(Vec2::new(
                    number_f32(enemy, &["vx"]).unwrap_or(0.0),
                    pick(&["speed"]).unwrap_or(LEGACY_VY),
                )),
                ..SpawnSpec::at(
                    t.max(0.0),
                    Vec2::new(pick(&["x"]).unwrap_or(SpawnSpec::DEFAULT_X_NORM), SpawnSpec::DEFAULT_Y_NORM),
                    pick(&["size"]).unwrap_or(LEGACY_SIZE),
                )
            });
        }
    }
    specs
}

/// Normalize any accepted spawn-file shape into a time-sorted spawn list
pub fn parse_spawn_file(value: &Value, defaults: &SpawnDefaults) -> Vec<SpawnSpec> {
    let mut specs = match value {
        Value::Array(entries) => parse_spawn_entries(entries, defaults),
        Value::Object(obj) => {
            if let Some(entries) = array(obj, &["spawn", "spawns", "wave"]) {
                parse_spawn_entries(entries, defaults)
            } else if let Some(ships) = array(obj, &["ships"]) {
                parse_immediate_formation(obj, ships, defaults)
            } else if let Some(waves) = array(obj, &["waves"]) {
                parse_legacy_waves(waves)
            } else {
                log::warn!("Spawn file has no spawn list");
                Vec::new()
            }
        }
        Value::Null => Vec::new(),
        other => {
            log::warn!("Spawn file is neither an object nor an array: {}", other);
            Vec::new()
        }
    };
    sort_by_trigger(&mut specs);
    specs
}

pub fn spawn_file_from_str(json: &str, defaults: &SpawnDefaults) -> Result<Vec<SpawnSpec>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(parse_spawn_file(&value, defaults))
}

// === Formation index ===

/// `{files: [...]}` or a bare array of file names
pub fn parse_formation_index(value: &Value) -> Vec<String> {
    let entries = match value {
        Value::Array(entries) => Some(entries),
        Value::Object(obj) => array(obj, &["files", "formations"]),
        _ => None,
    };
    let Some(entries) = entries else {
        log::warn!("Formation index has no file list");
        return Vec::new();
    };
    entries.iter().filter_map(Value::as_str).map(str::to_owned).collect()
}

pub fn formation_index_from_str(json: &str) -> Result<Vec<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(parse_formation_index(&value))
}

// === Player formations ===

fn parse_ship(obj: &Map<String, Value>) -> ShipSpec {
    let weapon = string(obj, &["weapon"]).and_then(|name| {
        let weapon = WeaponKind::from_str(name);
        if weapon.is_none() {
            log::warn!("Unknown weapon '{}', using basic", name);
        }
        weapon
    });
    ShipSpec {
        x_norm: number_f32(obj, &["x_norm", "x"]).unwrap_or(50.0),
        y_norm: number_f32(obj, &["y_norm", "y"]).unwrap_or(50.0),
        hp: number(obj, &["hp"]).map(|hp| (hp as i32).max(1)),
        weapon,
    }
}

/// `{formations: [{id, behavior, ships}]}` or a bare array of formations
pub fn parse_player_formations(value: &Value) -> Vec<FormationSpec> {
    let entries = match value {
        Value::Array(entries) => Some(entries),
        Value::Object(obj) => array(obj, &["formations"]),
        _ => None,
    };
    let Some(entries) = entries else {
        log::warn!("Insect file has no formations");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .map(|(i, obj)| FormationSpec {
            id: string(obj, &["id", "name"]).map_or_else(|| format!("formation-{}", i), str::to_owned),
            behavior: string(obj, &["behavior"]).map_or(FormationBehavior::Static, FormationBehavior::from_str),
            ships: array(obj, &["ships"])
                .map(|ships| ships.iter().filter_map(Value::as_object).map(parse_ship).collect())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn player_formations_from_str(json: &str) -> Result<Vec<FormationSpec>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(parse_player_formations(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> SpawnDefaults {
        SpawnDefaults::default()
    }

    #[test]
    fn test_canonical_spawn_file() {
        let value = json!({
            "spawn": [
                { "t_ms": 500, "x_norm": 20, "y_norm": 5, "vx_px_s": 10, "hp": 3, "type": "bruiser" },
                { "t_ms": 0 }
            ]
        });
        let specs = parse_spawn_file(&value, &defaults());
        assert_eq!(specs.len(), 2);

        // Sorted by trigger time
        let first = &specs[0];
        assert_eq!(first.trigger_time_ms, 0.0);
        assert_eq!(first.position_norm, Vec2::new(50.0, 0.0));
        assert_eq!(first.velocity, None);
        assert_eq!(first.hp, 1);
        assert_eq!(first.size, 40.0);
        assert_eq!(first.enemy_kind, None);

        let second = &specs[1];
        assert_eq!(second.velocity, Some(Vec2::new(10.0, 50.0)));
        assert_eq!(second.hp, 3);
        assert_eq!(second.enemy_kind, Some(EnemyKind::Bruiser));
    }

    #[test]
    fn test_alternate_shapes_and_aliases() {
        let bare = json!([{ "t": 100, "x": 30, "vy": 90 }]);
        let specs = parse_spawn_file(&bare, &defaults());
        assert_eq!(specs[0].trigger_time_ms, 100.0);
        assert_eq!(specs[0].position_norm.x, 30.0);
        assert_eq!(specs[0].velocity, Some(Vec2::new(0.0, 90.0)));

        for key in ["spawns", "wave"] {
            let value = json!({ key: [{ "t_ms": 1 }, { "t_ms": 2 }] });
            assert_eq!(parse_spawn_file(&value, &defaults()).len(), 2, "{key}");
        }
    }

    #[test]
    fn test_malformed_fields_default() {
        let value = json!({ "spawn": [{ "t_ms": "soon", "hp": -4, "size": 0 }, 17, null] });
        let specs = parse_spawn_file(&value, &defaults());
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].trigger_time_ms, 0.0);
        assert_eq!(specs[0].hp, 1);
        assert_eq!(specs[0].size, 40.0);

        assert!(parse_spawn_file(&json!({ "nothing": true }), &defaults()).is_empty());
        assert!(parse_spawn_file(&Value::Null, &defaults()).is_empty());
    }

    #[test]
    fn test_immediate_orbit_formation() {
        let value = json!({ "behavior": "orbit", "ships": [{ "x_norm": 10 }, { "x_norm": 90, "hp": 2 }] });
        let specs = parse_spawn_file(&value, &defaults());
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].trigger_time_ms, 150.0);
        assert_eq!(specs[1].position_norm, Vec2::new(50.0, 25.0));
        assert_eq!(specs[1].hp, 2);
        assert_eq!(
            specs[1].motion,
            Some(MotionSpec::Orbit {
                radius_px: 84.0,
                angular_speed_deg_per_sec: 60.0,
                base_angle_deg: 30.0,
            })
        );
    }

    #[test]
    fn test_immediate_line_and_follow_speeds() {
        let line = parse_spawn_file(&json!({ "behavior": "line", "ships": [{}] }), &defaults());
        assert_eq!(line[0].velocity, Some(Vec2::new(0.0, 60.0)));
        assert_eq!(line[0].position_norm.y, 10.0);

        let follow = parse_spawn_file(&json!({ "behavior": "follow", "ships": [{ "vy": 33 }] }), &defaults());
        assert_eq!(follow[0].velocity, Some(Vec2::new(0.0, 33.0)));
    }

    #[test]
    fn test_legacy_waves_inherit_wave_fields() {
        let value = json!({
            "waves": [
                { "delay": 200, "x": 40, "speed": 80, "enemies": [{}, { "x": 60, "delay": 900, "vx": 5 }] },
                { "enemies": [{ "size": 30 }] }
            ]
        });
        let specs = parse_spawn_file(&value, &defaults());
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].trigger_time_ms, 0.0);
        assert_eq!(specs[0].velocity, Some(Vec2::new(0.0, 120.0)));
        assert_eq!(specs[0].size, 30.0);
        assert_eq!(specs[1].position_norm.x, 40.0);
        assert_eq!(specs[1].velocity, Some(Vec2::new(0.0, 80.0)));
        assert_eq!(specs[1].size, 48.0);
        assert_eq!(specs[2].trigger_time_ms, 900.0);
        assert_eq!(specs[2].velocity, Some(Vec2::new(5.0, 80.0)));
    }

    #[test]
    fn test_parse_motion_tags() {
        assert_eq!(parse_motion(&Value::Null), None);
        assert_eq!(
            parse_motion(&json!("linear")),
            Some(MotionSpec::Linear { vx: 0.0, vy: 70.0 })
        );
        assert_eq!(
            parse_motion(&json!({ "type": "bulletml" })),
            Some(MotionSpec::AngleSpeed {
                angle_deg: 90.0,
                speed_px_per_sec: 100.0,
            })
        );
        assert_eq!(
            parse_motion(&json!({ "type": "sine", "amplitude": 20, "frequency": 2, "axis": "y" })),
            Some(MotionSpec::Sine {
                amplitude_norm: 20.0,
                frequency_hz: 2.0,
                phase: 0.0,
                axis: Axis::Y,
            })
        );
        assert_eq!(
            parse_motion(&json!({ "kind": "bezier", "points": [[0, 0], { "x": 50, "y": 50 }, [100, 0], [50, 100]], "duration_ms": 1200 })),
            Some(MotionSpec::CubicBezier {
                control_points_norm: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(50.0, 50.0),
                    Vec2::new(100.0, 0.0),
                    Vec2::new(50.0, 100.0),
                ],
                duration_ms: 1200.0,
            })
        );
        assert_eq!(
            parse_motion(&json!({ "type": "static", "offset": [5, -5] })),
            Some(MotionSpec::StaticOffset {
                offset_px: Vec2::new(5.0, -5.0)
            })
        );
    }

    #[test]
    fn test_unknown_motion_is_stationary() {
        assert_eq!(parse_motion(&json!({ "type": "teleport" })), Some(MotionSpec::stationary()));
        assert_eq!(parse_motion(&json!({ "speed": 3 })), Some(MotionSpec::stationary()));
        assert_eq!(parse_motion(&json!(42)), Some(MotionSpec::stationary()));
    }

    #[test]
    fn test_unknown_immediate_behavior_holds_still() {
        let value = json!({ "behavior": "zigzag", "ships": [{ "x_norm": 30, "vx": 90, "vy": 45 }] });
        let specs = parse_spawn_file(&value, &defaults());
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].velocity, Some(Vec2::ZERO));
        assert_eq!(specs[0].position_norm, Vec2::new(30.0, 10.0));
    }

    #[test]
    fn test_formation_index_shapes() {
        assert_eq!(parse_formation_index(&json!({ "files": ["a.json", "b.json"] })), vec!["a.json", "b.json"]);
        assert_eq!(parse_formation_index(&json!(["c.json", 4])), vec!["c.json"]);
        assert!(parse_formation_index(&json!({ "other": 1 })).is_empty());
    }

    #[test]
    fn test_player_formations() {
        let value = json!({
            "formations": [
                { "id": "vee", "behavior": "trail", "ships": [{ "x_norm": 45, "y_norm": 55, "hp": 4, "weapon": "laser" }, { "weapon": "plasma" }] },
                { "behavior": "spin" }
            ]
        });
        let formations = parse_player_formations(&value);
        assert_eq!(formations.len(), 2);
        assert_eq!(formations[0].id, "vee");
        assert_eq!(formations[0].behavior, FormationBehavior::Trail);
        assert_eq!(formations[0].ships[0].hp, Some(4));
        assert_eq!(formations[0].ships[0].weapon, Some(WeaponKind::Laser));
        assert_eq!(formations[0].ships[1].weapon, None);
        assert_eq!(formations[0].ships[1].x_norm, 50.0);
        assert_eq!(formations[1].id, "formation-1");
        assert_eq!(formations[1].behavior, FormationBehavior::Static);
        assert!(formations[1].ships.is_empty());
    }

    #[test]
    fn test_from_str_errors_only_on_syntax() {
        assert!(spawn_file_from_str("{ broken", &defaults()).is_err());
        assert!(spawn_file_from_str("{}", &defaults()).unwrap().is_empty());
        assert!(player_formations_from_str("[]").unwrap().is_empty());
        assert!(formation_index_from_str("nope").is_err());
    }
}
