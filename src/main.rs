//! Hive Shooter entry point
//!
//! The browser build is driven from JavaScript through `hive_shooter::web`.
//! Natively this runs the simulation headless over files on disk and logs a
//! summary, which is handy for checking formation and level files.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use glam::Vec2;

    use hive_shooter::consts::{DEFAULT_VIEWPORT_H, DEFAULT_VIEWPORT_W, NOMINAL_DT};
    use hive_shooter::sim::{
        GamePhase, LevelPlan, SimEvent, SpawnDefaults, SpawnSpec, TickInput, World, player_formations_from_str,
        spawn_file_from_str, tick,
    };
    use hive_shooter::Tuning;

    const USAGE: &str = "usage: hive-shooter [SPAWN_FILE] [--level FILE] [--formations DIR] [--insects FILE] [--tuning FILE] [--ticks N] [--seed N]";

    #[derive(Debug, Default)]
    struct Options {
        spawn_file: Option<PathBuf>,
        level: Option<PathBuf>,
        formations_dir: Option<PathBuf>,
        insects: Option<PathBuf>,
        tuning: Option<PathBuf>,
        ticks: u32,
        seed: u64,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
        let mut opts = Options {
            ticks: 60 * 30,
            seed: 1,
            ..Default::default()
        };
        while let Some(arg) = args.next() {
            let mut value = |name: &str| args.next().ok_or_else(|| format!("{} needs a value", name));
            match arg.as_str() {
                "--level" => opts.level = Some(value("--level")?.into()),
                "--formations" => opts.formations_dir = Some(value("--formations")?.into()),
                "--insects" => opts.insects = Some(value("--insects")?.into()),
                "--tuning" => opts.tuning = Some(value("--tuning")?.into()),
                "--ticks" => {
                    opts.ticks = value("--ticks")?
                        .parse()
                        .map_err(|e| format!("bad --ticks: {}", e))?
                }
                "--seed" => opts.seed = value("--seed")?.parse().map_err(|e| format!("bad --seed: {}", e))?,
                "-h" | "--help" => return Err(USAGE.into()),
                flag if flag.starts_with("--") => return Err(format!("unknown option {}\n{}", flag, USAGE)),
                file => opts.spawn_file = Some(file.into()),
            }
        }
        Ok(opts)
    }

    /// Missing or unreadable files are "no data", never fatal
    fn read(path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(err) => {
                log::warn!("Could not read {}: {}", path.display(), err);
                None
            }
        }
    }

    fn load_spawns(path: &Path, defaults: &SpawnDefaults) -> Vec<SpawnSpec> {
        let Some(text) = read(path) else {
            return Vec::new();
        };
        spawn_file_from_str(&text, defaults).unwrap_or_else(|err| {
            log::warn!("{} is not valid JSON: {}", path.display(), err);
            Vec::new()
        })
    }

    fn load_level(path: &Path, formations_dir: &Path, defaults: &SpawnDefaults) -> Vec<SpawnSpec> {
        let Some(text) = read(path) else {
            return Vec::new();
        };
        let plan = match LevelPlan::from_json(&text) {
            Ok(plan) => plan,
            Err(err) => {
                log::warn!("{} is not a level file: {}", path.display(), err);
                return Vec::new();
            }
        };
        let library: HashMap<&str, Vec<SpawnSpec>> = plan
            .formation_files()
            .into_iter()
            .map(|name| (name, load_spawns(&formations_dir.join(name), defaults)))
            .collect();
        plan.expand(|name| library.get(name).map(Vec::as_slice))
    }

    /// Sweep side to side every two seconds, always firing
    fn scripted_input(tick_index: u32) -> TickInput {
        let phase = (tick_index as f32 * NOMINAL_DT / 2.0) as u32;
        TickInput {
            move_axis: if phase % 2 == 0 { 1.0 } else { -1.0 },
            firing: true,
            ..Default::default()
        }
    }

    pub fn run() {
        let opts = match parse_args(std::env::args().skip(1)) {
            Ok(opts) => opts,
            Err(msg) => {
                eprintln!("{}", msg);
                std::process::exit(2);
            }
        };

        let tuning = opts
            .tuning
            .as_deref()
            .and_then(read)
            .map_or_else(Tuning::default, |text| Tuning::from_json_or_default(&text));
        let defaults = SpawnDefaults::from(&tuning);
        let mut world = World::new(tuning, Vec2::new(DEFAULT_VIEWPORT_W, DEFAULT_VIEWPORT_H), opts.seed);

        if let Some(text) = opts.insects.as_deref().and_then(read) {
            match player_formations_from_str(&text) {
                Ok(formations) => world.load_player_formations(formations),
                Err(err) => log::warn!("Insect file is not valid JSON: {}", err),
            }
        }

        let specs = match (&opts.level, &opts.spawn_file) {
            (Some(level), _) => {
                let dir = opts
                    .formations_dir
                    .clone()
                    .or_else(|| level.parent().map(Path::to_path_buf))
                    .unwrap_or_default();
                load_level(level, &dir, &defaults)
            }
            (None, Some(file)) => load_spawns(file, &defaults),
            (None, None) => {
                log::warn!("No spawn file given, running an empty sky");
                Vec::new()
            }
        };
        world.load_spawns(specs);

        let mut spawned = 0usize;
        let mut dropped = 0usize;
        let mut kills = 0usize;
        let mut hits = 0usize;
        for i in 0..opts.ticks {
            tick(&mut world, &scripted_input(i), NOMINAL_DT);
            for event in world.drain_events() {
                match event {
                    SimEvent::EnemySpawned { .. } => spawned += 1,
                    SimEvent::SpawnDropped { .. } => dropped += 1,
                    SimEvent::EnemyKilled { .. } => kills += 1,
                    SimEvent::ShipHit { .. } => hits += 1,
                    _ => {}
                }
            }
            if world.phase == GamePhase::GameOver {
                log::info!("Formation destroyed after {} ticks", i + 1);
                break;
            }
        }

        log::info!(
            "Run finished at t={:.1}s: score {}, {} spawned, {} dropped, {} killed, {} hits taken, {}/{} ships left, {} spawns pending",
            world.now_ms / 1000.0,
            world.score,
            spawned,
            dropped,
            kills,
            hits,
            world.live_ship_count(),
            world.ships.len(),
            world.scheduler.pending(),
        );
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> impl Iterator<Item = String> {
            list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
        }

        #[test]
        fn test_parse_args() {
            let opts = parse_args(args(&["waves.json", "--ticks", "120", "--seed", "9"])).unwrap();
            assert_eq!(opts.spawn_file, Some(PathBuf::from("waves.json")));
            assert_eq!(opts.ticks, 120);
            assert_eq!(opts.seed, 9);

            assert!(parse_args(args(&["--ticks"])).is_err());
            assert!(parse_args(args(&["--bogus"])).is_err());
        }

        #[test]
        fn test_scripted_input_alternates() {
            assert_eq!(scripted_input(0).move_axis, 1.0);
            assert_eq!(scripted_input(130).move_axis, -1.0);
            assert!(scripted_input(7).firing);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hive Shooter (native, headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is hive_shooter::web::start, this is just to satisfy the compiler
}
