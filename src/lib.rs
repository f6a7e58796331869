//=========================================================================
// Lantern Festival Library Root
//
// Gameplay core of a small 3D platformer: light all 22 lanterns with a
// sparkler and reach the festival before midnight passes.
//
// Responsibilities:
// - Expose the runtime entry point (`Engine`, `EngineBuilder`)
// - Expose the headless state machine (`game::GameStateMachine`) so the
//   game can be driven tick by tick without a window
// - Keep the winit platform layer private
//
// Typical usage:
// ```no_run
// use lantern_festival::EngineBuilder;
//
// fn main() -> Result<(), lantern_festival::EngineError> {
//     EngineBuilder::new().build()?.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the game-agnostic systems: input, scenes, scheduling,
// session flags and the fixed-tick orchestrator.
//
// `game` holds the lantern festival: level, player, objectives, timers
// and the four scenes.
//
pub mod core;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit window and event loop and is not part of the
// public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder, EngineError};
