//! Browser facade
//!
//! The host page owns the canvas, fetches JSON and draws sprites. It hands
//! already-fetched text to `HiveShooter`, calls `frame` from
//! `requestAnimationFrame`, and renders from `snapshot_json`.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::sim::{
    FramePacer, LevelPlan, Snapshot, SpawnDefaults, SpawnSpec, TickInput, WeaponKind, World, formation_index_from_str,
    player_formations_from_str, spawn_file_from_str, tick,
};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already installed by an earlier instance
        log::debug!("Logger already initialized");
    }
}

#[wasm_bindgen]
pub struct HiveShooter {
    world: World,
    pacer: FramePacer,
    input: TickInput,
    defaults: SpawnDefaults,
    /// Formation files available to levels, by file name
    library: HashMap<String, Vec<SpawnSpec>>,
    /// Last schedule handed to the world, replayed by `restart`
    timeline: Vec<SpawnSpec>,
}

#[wasm_bindgen]
impl HiveShooter {
    /// `tuning_json` may be empty for the default balance
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: u64, tuning_json: &str) -> HiveShooter {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json_or_default(tuning_json)
        };
        log::info!("Hive Shooter starting, seed {}", seed);
        Self {
            pacer: FramePacer::from_tuning(&tuning),
            defaults: SpawnDefaults::from(&tuning),
            world: World::new(tuning, Vec2::new(width, height), seed),
            input: TickInput::default(),
            library: HashMap::new(),
            timeline: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(Vec2::new(width, height));
    }

    /// Parse a formation index; returns the file names as a JSON array
    pub fn formation_index(&self, json: &str) -> String {
        let files = formation_index_from_str(json).unwrap_or_else(|err| {
            log::warn!("Formation index unreadable: {}", err);
            Vec::new()
        });
        serde_json::to_string(&files).unwrap_or_else(|_| "[]".into())
    }

    /// Register a formation file for levels without scheduling it
    pub fn add_formation_file(&mut self, name: &str, json: &str) -> usize {
        let specs = self.parse_spawns(name, json);
        let count = specs.len();
        self.library.insert(name.to_owned(), specs);
        count
    }

    /// Replace the running schedule with this file's spawns
    pub fn load_formation(&mut self, name: &str, json: &str) -> usize {
        let specs = self.parse_spawns(name, json);
        let count = specs.len();
        self.library.insert(name.to_owned(), specs.clone());
        self.timeline = specs.clone();
        self.world.load_spawns(specs);
        count
    }

    /// Schedule a level built from previously added formation files
    pub fn load_level(&mut self, json: &str) -> usize {
        let plan = match LevelPlan::from_json(json) {
            Ok(plan) => plan,
            Err(err) => {
                log::warn!("Level file unreadable: {}", err);
                return 0;
            }
        };
        let timeline = plan.expand(|name| self.library.get(name).map(Vec::as_slice));
        let count = timeline.len();
        self.timeline = timeline.clone();
        self.world.load_spawns(timeline);
        count
    }

    /// Install player formations from an insect file
    pub fn load_insects(&mut self, json: &str) -> usize {
        match player_formations_from_str(json) {
            Ok(formations) => {
                let count = formations.len();
                self.world.load_player_formations(formations);
                count
            }
            Err(err) => {
                log::warn!("Insect file unreadable: {}", err);
                0
            }
        }
    }

    pub fn set_input(&mut self, move_axis: f32, firing: bool) {
        self.input.move_axis = move_axis;
        self.input.firing = firing;
    }

    /// Pointer/touch x in canvas pixels; NaN clears it
    pub fn set_pointer(&mut self, x: f32) {
        self.input.pointer_x = x.is_finite().then_some(x);
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
        self.pacer.reset();
    }

    pub fn cycle_formation(&mut self) {
        self.input.cycle_formation = true;
    }

    /// Give one formation member another gun; unknown names are ignored
    pub fn set_weapon(&mut self, ship: usize, weapon: &str) -> bool {
        match WeaponKind::from_str(weapon) {
            Some(kind) => self.world.set_weapon(ship, kind),
            None => {
                log::warn!("Unknown weapon '{}'", weapon);
                false
            }
        }
    }

    /// Start over with the last loaded formation or level
    pub fn restart(&mut self) {
        self.world.restart(self.timeline.clone());
        self.input = TickInput::default();
        self.pacer.reset();
    }

    /// Advance on an animation frame. Returns false when the frame was skipped by the cap.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let Some(dt) = self.pacer.frame(now_ms) else {
            return false;
        };
        tick(&mut self.world, &self.input, dt);

        // Clear one-shot inputs after processing
        self.input.pause = false;
        self.input.cycle_formation = false;
        true
    }

    pub fn snapshot_json(&self) -> String {
        Snapshot::capture(&self.world).to_json().unwrap_or_else(|err| {
            log::error!("Snapshot serialization failed: {}", err);
            "null".into()
        })
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = self.world.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|err| {
            log::error!("Event serialization failed: {}", err);
            "[]".into()
        })
    }

    pub fn score(&self) -> f64 {
        self.world.score as f64
    }

    pub fn fps(&self) -> u32 {
        self.pacer.fps()
    }
}

impl HiveShooter {
    fn parse_spawns(&self, name: &str, json: &str) -> Vec<SpawnSpec> {
        spawn_file_from_str(json, &self.defaults).unwrap_or_else(|err| {
            log::warn!("Formation '{}' unreadable, no spawns: {}", name, err);
            Vec::new()
        })
    }
}
