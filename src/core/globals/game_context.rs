//=========================================================================
// Game Context
//=========================================================================
//
// Shared data container passed to every scene callback.
//
// Contains state data that scenes read/write:
// - input: this tick's InputFrame
// - session: pause / quit / fade flags
// - signals: outbound events for the presentation layer
// - scene_transitions: command queue for scene changes
// - clock: tick counter and scene-independent time
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::SessionState;
use crate::core::config::GameConfig;
use crate::core::input::InputFrame;
use crate::core::scene::{SceneKey, TransitionQueue};
use crate::core::signal_bus::SignalBus;

//=== GameContext =========================================================

/// Shared context data accessible to scenes during updates.
///
/// Scenes receive `&mut GameContext` in their lifecycle methods. This
/// separates scene-accessible data from the systems that produce it.
pub struct GameContext<S: SceneKey, E> {
    /// Input snapshot for the current tick.
    pub input: InputFrame,

    /// Session-wide flags (pause, quit, fade).
    pub session: SessionState,

    /// Outbound events, cleared at the start of every tick.
    pub signals: SignalBus<E>,

    /// Transition queue for scene changes.
    ///
    /// Scenes queue transitions here during updates. The scene manager
    /// processes this queue at tick boundaries.
    pub scene_transitions: TransitionQueue<S>,

    /// Shared configuration.
    pub config: Arc<GameConfig>,

    tick: u64,
}

impl<S: SceneKey, E> GameContext<S, E> {
    /// Creates a new context with empty state.
    pub fn new(config: Arc<GameConfig>) -> Self {
        Self {
            input: InputFrame::neutral(),
            session: SessionState::new(),
            signals: SignalBus::new(),
            scene_transitions: TransitionQueue::new(),
            config,
            tick: 0,
        }
    }

    //--- Clock ------------------------------------------------------------

    /// Advances the tick counter by one.
    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Ticks elapsed since the context was created.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Milliseconds elapsed since the context was created.
    pub fn now_ms(&self) -> u64 {
        self.config.ms_at_tick(self.tick)
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.config.tick_secs()
    }
}
