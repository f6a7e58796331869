//=========================================================================
// Session State
//=========================================================================
//
// Session-wide flags shared by every scene update.
//
// Holds the pause flag, the quit request and the screen-fade transition.
// Passed explicitly through `GameContext`; there is no ambient copy.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== FadeProgress ========================================================

/// Result of advancing a fade by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeProgress {
    /// No fade is running.
    Idle,
    /// Fade still running.
    Fading,
    /// Fade reached black this tick. Reported exactly once per fade.
    Finished,
}

//=== SessionState ========================================================

/// Pause, quit and transition flags for the running session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Gameplay timers and movement are frozen.
    pub paused: bool,
    /// Player asked to leave the game scene; consumed by the game scene.
    pub quit_requested: bool,
    transition_in_progress: bool,
    fade_level: f32,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            paused: false,
            quit_requested: false,
            transition_in_progress: false,
            fade_level: 1.0,
        }
    }

    //--- Pause ------------------------------------------------------------

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        debug!(target: "game", "Paused: {}", self.paused);
        self.paused
    }

    //--- Fade Transition --------------------------------------------------

    /// Starts a fade to black. Ignored while a fade is already running.
    pub fn begin_transition(&mut self) -> bool {
        if self.transition_in_progress {
            return false;
        }
        self.transition_in_progress = true;
        self.fade_level = 1.0;
        true
    }

    /// Lowers the fade level by `step`.
    pub fn advance_fade(&mut self, step: f32) -> FadeProgress {
        if !self.transition_in_progress {
            return FadeProgress::Idle;
        }

        self.fade_level -= step;
        if self.fade_level <= 0.0 {
            self.fade_level = 0.0;
            self.transition_in_progress = false;
            FadeProgress::Finished
        } else {
            FadeProgress::Fading
        }
    }

    pub fn transition_in_progress(&self) -> bool {
        self.transition_in_progress
    }

    /// Screen brightness in `[0, 1]` for the fade post-process.
    pub fn fade_level(&self) -> f32 {
        self.fade_level
    }

    //--- Reset ------------------------------------------------------------

    /// Restores defaults when a new scene becomes active.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
