//=========================================================================
// Lantern Festival Engine
//
// Main entry point: wires the game state machine, the core thread and the
// platform together.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              └─ spawns the core thread
//         ├─ with_channel_capacity()    runs the platform
//         ├─ with_config()              blocks until exit
//         └─ with_level()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::input::KeyBindings;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::CoreSystemsOrchestrator;
use crate::game::level::{LevelError, LevelLayout};
use crate::game::signals::FrameSignals;
use crate::game::state_machine::GameStateMachine;
use crate::platform::Platform;

//=== EngineError =========================================================

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid level: {0}")]
    Level(#[from] LevelError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Core thread panicked")]
    CoreThreadPanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 messages in each direction
/// - **Level**: the built-in festival level
/// - **Bindings**: arrows, Space, Shift, Escape, Enter, Q, Tab
///
/// # Examples
///
/// ```no_run
/// use lantern_festival::EngineBuilder;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_channel_capacity(256)
///     .build()?
///     .run()?;
/// # Ok::<(), lantern_festival::EngineError>(())
/// ```
pub struct EngineBuilder {
    channel_capacity: usize,
    config: GameConfig,
    level: Option<LevelLayout>,
    bindings: KeyBindings,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            channel_capacity: 128,
            config: GameConfig::default(),
            level: None,
            bindings: KeyBindings::default(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Game timers are expressed in milliseconds and converted with this
    /// rate, so changing it does not change how long a match lasts.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.config.tps = tps;
        self
    }

    /// Sets the capacity of both channels between platform and core.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Replaces every tunable; the tick rate comes from `config.tps`.
    ///
    /// # Panics
    ///
    /// Panics if `config.tps <= 0.0`.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        assert!(config.tps > 0.0, "TPS must be positive, got {}", config.tps);
        self.config = config;
        self
    }

    pub fn with_level(mut self, level: LevelLayout) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Validates the level and builds the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Level`] if the level is incomplete.
    pub fn build(self) -> Result<Engine, EngineError> {
        info!(
            "Building engine (TPS: {}, channel: {})",
            self.config.tps, self.channel_capacity
        );

        let tps = self.config.tps;
        let level = self.level.unwrap_or_else(LevelLayout::festival);
        let machine = GameStateMachine::new(self.config, level, self.bindings)?;

        Ok(Engine {
            orchestrator: CoreSystemsOrchestrator::new(machine, tps),
            tps,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Game runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► GameStateMachine
///   │
///   └─► Platform (Event Loop)
///         └─► Window, keyboard
///
/// Communication: crossbeam channels (PlatformEvent in, FrameSignals out)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator<GameStateMachine>,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the input and output channels
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: platform exits → channels disconnect → logic
    ///    thread terminates
    ///
    /// # Errors
    ///
    /// Returns the platform error if the event loop fails, or
    /// [`EngineError::CoreThreadPanicked`] if the logic thread panicked.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channels ----------------------------
        let (event_tx, event_rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);
        let (signal_tx, signal_rx): (Sender<FrameSignals>, Receiver<FrameSignals>) =
            bounded(self.channel_capacity);

        info!("Channels created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(event_rx, signal_tx);
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(event_tx, signal_rx);
        info!("Platform initialized, entering event loop");

        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: wait for the logic thread ------------------------
        let core_result = core_handle.join();
        if core_result.is_err() {
            error!("Core thread panicked");
        }

        info!("Engine shutdown complete");

        platform_result?;
        core_result.map_err(|_| EngineError::CoreThreadPanicked)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.config.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert!(builder.level.is_none());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.config.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_config_panics_on_negative_tps() {
        EngineBuilder::new().with_config(GameConfig {
            tps: -60.0,
            ..GameConfig::default()
        });
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_build_creates_engine() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .build()
            .expect("default level is valid");

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
    }

    #[test]
    fn builder_refuses_invalid_level() {
        let result = EngineBuilder::new().with_level(LevelLayout::new()).build();
        assert!(matches!(result, Err(EngineError::Level(LevelError::MissingStart))));
    }
}
