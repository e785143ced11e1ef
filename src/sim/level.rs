//! Level files
//!
//! A level is a list of waves, each replaying one formation file at a start
//! time, optionally repeated. Expansion flattens it into one spawn timeline
//! that the scheduler runs like any other file.

use serde::{Deserialize, Serialize};

use super::spawn::{SpawnSpec, sort_by_trigger};

fn one() -> u32 {
    1
}

/// One wave of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    pub formation_file: String,
    #[serde(default)]
    pub start_time_ms: f64,
    #[serde(default = "one")]
    pub repeat: u32,
    #[serde(default)]
    pub interval_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPlan {
    #[serde(default)]
    pub level_id: String,
    #[serde(default)]
    pub waves: Vec<WaveSpec>,
}

impl LevelPlan {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Formation files the level refers to, first use order, no duplicates
    pub fn formation_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for wave in &self.waves {
            if !files.contains(&wave.formation_file.as_str()) {
                files.push(&wave.formation_file);
            }
        }
        files
    }

    /// Flatten into one sorted timeline
    ///
    /// `library` resolves a formation file name to its already-parsed
    /// spawns. Files it does not know are skipped.
    pub fn expand<'a>(&self, mut library: impl FnMut(&str) -> Option<&'a [SpawnSpec]>) -> Vec<SpawnSpec> {
        let mut timeline = Vec::new();
        for wave in &self.waves {
            let Some(spawns) = library(&wave.formation_file) else {
                log::warn!("Level '{}': formation '{}' not loaded, wave skipped", self.level_id, wave.formation_file);
                continue;
            };
            for i in 0..wave.repeat {
                let offset = wave.start_time_ms.max(0.0) + f64::from(i) * wave.interval_ms.max(0.0);
                timeline.extend(spawns.iter().map(|spec| spec.delayed(offset)));
            }
        }
        sort_by_trigger(&mut timeline);
        log::info!("Level '{}' expanded to {} spawns", self.level_id, timeline.len());
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let plan = LevelPlan::from_json(r#"{ "level_id": "l1", "waves": [{ "formation_file": "a.json" }] }"#).unwrap();
        assert_eq!(plan.waves[0].repeat, 1);
        assert_eq!(plan.waves[0].start_time_ms, 0.0);
        assert_eq!(plan.waves[0].interval_ms, 0.0);
    }

    #[test]
    fn test_expand_repeats_and_skips_missing() {
        let plan = LevelPlan::from_json(
            r#"{
                "level_id": "l1",
                "waves": [
                    { "formation_file": "a.json", "start_time_ms": 1000, "repeat": 3, "interval_ms": 500 },
                    { "formation_file": "missing.json", "start_time_ms": 0 },
                    { "formation_file": "a.json", "start_time_ms": 0 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(plan.formation_files(), vec!["a.json", "missing.json"]);

        let mut library: HashMap<&str, Vec<SpawnSpec>> = HashMap::new();
        library.insert(
            "a.json",
            vec![
                SpawnSpec::at(0.0, Vec2::new(10.0, 0.0), 40.0),
                SpawnSpec::at(100.0, Vec2::new(20.0, 0.0), 40.0),
            ],
        );

        let timeline = plan.expand(|name| library.get(name).map(Vec::as_slice));
        let times: Vec<f64> = timeline.iter().map(|s| s.trigger_time_ms).collect();
        assert_eq!(times, vec![0.0, 100.0, 1000.0, 1100.0, 1500.0, 1600.0, 2000.0, 2100.0]);
    }
}
