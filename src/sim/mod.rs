//! Simulation core
//!
//! Everything that decides what exists, where it moves, and when it dies:
//! - Seeded RNG only, owned by the `World`
//! - Fixed-capacity pools, no allocation per spawned entity
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod level;
pub mod loader;
pub mod motion;
pub mod pool;
pub mod scheduler;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use clock::FramePacer;
pub use collision::{CollisionReport, CollisionRules, circles_overlap};
pub use entity::{Entity, EntityKind, Formation, FormationBehavior, FormationSpec, Leader, Owner, PlayerShip, ShipSpec, TrailHistory};
pub use level::{LevelPlan, WaveSpec};
pub use loader::{
    SpawnDefaults, formation_index_from_str, parse_formation_index, parse_motion, parse_player_formations, parse_spawn_file,
    player_formations_from_str, spawn_file_from_str,
};
pub use motion::{MotionContext, MotionSample, evaluate};
pub use pool::{Pool, SlotId};
pub use scheduler::{SchedulerState, SpawnScheduler};
pub use snapshot::Snapshot;
pub use spawn::{Axis, EnemyKind, MotionSpec, SpawnSpec};
pub use state::{GamePhase, SimEvent, World};
pub use tick::{TickInput, tick};
pub use weapon::{BulletStyle, FiringPattern, FiringProfile, WeaponKind};
