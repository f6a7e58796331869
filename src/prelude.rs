//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use lantern_festival::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::engine::{Engine, EngineBuilder, EngineError};
pub use crate::core::config::GameConfig;
pub use crate::core::Simulation;

// Input
pub use crate::core::input::{ControlAction, InputEvent, InputFrame, KeyBindings, KeyCode, VirtualButton};

// Scene system
pub use crate::core::scene::{Scene, SceneKey, SceneTransition};

// Game
pub use crate::game::level::{LevelError, LevelLayout};
pub use crate::game::signals::{FrameSignals, GameEvent, HudSnapshot, SoundCue};
pub use crate::game::state_machine::{GameState, GameStateMachine};
