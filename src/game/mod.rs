//=========================================================================
// Game
//=========================================================================
//
// The lantern festival itself, built on the core scene and input systems.
//
// Architecture:
// ```text
//   GameStateMachine
//     ├─ StartScene / CutsceneScene / LoseScene
//     └─ GameplayScene
//          └─ World
//               ├─ CharacterController ── GroundProbe ── CollisionWorld
//               ├─ CameraRig
//               ├─ TriggerTracker ── Level triggers
//               ├─ ObjectiveTracker
//               └─ FireworkShow
//          + SparklerTimer / MatchTimer on the scene's TaskScheduler
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod camera;
pub mod collision;
pub mod controller;
pub mod fireworks;
pub mod ground_probe;
pub mod level;
pub mod objectives;
pub mod signals;
pub mod state_machine;
pub mod states;
pub mod timers;
pub mod triggers;
pub mod world;

//=== Public API ==========================================================

pub use level::{Level, LevelError, LevelLayout};
pub use signals::{FrameSignals, GameEvent, HudSnapshot, SoundCue};
pub use state_machine::{GameState, GameStateMachine, SessionContext};
