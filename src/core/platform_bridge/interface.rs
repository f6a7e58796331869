//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
// Defines the contract for communication between platform and core
// threads. Input flows platform → core as `PlatformEvent`; the per-tick
// HUD snapshot flows core → platform on a second channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;
use winit::error::EventLoopError;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Input events buffered since the previous redraw, in arrival order.
    Inputs(Vec<InputEvent>),

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: if the event loop can't be created the game cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}
