//=========================================================================
// Input Frame
//=========================================================================
//
// Per-tick normalized input snapshot consumed by gameplay code.
//
// Architecture:
//   StateTracker + KeyBindings + paused → InputFrame::next() → InputFrame
//
// Axes: the discrete axis (-1/0/1) follows the held keys directly; the
// analog axis eases toward it by AXIS_SMOOTHING per tick. Left is checked
// before right and up before down, so opposing keys never cancel out.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::bindings::{ControlAction, KeyBindings};
use super::state_tracker::StateTracker;

//=== Constants ===========================================================

/// Fraction of the remaining distance the analog axis covers per tick.
pub const AXIS_SMOOTHING: f32 = 0.2;

//=== InputFrame ==========================================================

/// Immutable per-tick input snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    /// Smoothed left/right input in `[-1, 1]`.
    pub horizontal: f32,
    /// Smoothed back/forward input in `[-1, 1]`.
    pub vertical: f32,
    /// Discrete left/right direction (-1, 0, 1).
    pub horizontal_axis: i8,
    /// Discrete back/forward direction (-1, 0, 1).
    pub vertical_axis: i8,
    /// Jump held this tick.
    pub jump_key_down: bool,
    /// Dash held this tick.
    pub dashing: bool,

    //--- Menu edges (pressed this tick) ----------------------------------
    pub pause_pressed: bool,
    pub confirm_pressed: bool,
    pub quit_pressed: bool,
    pub skip_pressed: bool,
}

impl InputFrame {
    /// Neutral frame (no input).
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Builds the next frame from held input, easing analog axes from `previous`.
    ///
    /// While `paused`, movement, jump and dash read neutral and the analog
    /// axes snap to zero; menu edges are still reported.
    pub fn next(
        previous: &InputFrame,
        tracker: &StateTracker,
        bindings: &KeyBindings,
        paused: bool,
    ) -> Self {
        let held = |action| !paused && bindings.is_held(tracker, action);
        let pressed = |action| bindings.was_pressed(tracker, action);

        let horizontal_axis = if held(ControlAction::MoveLeft) {
            -1
        } else if held(ControlAction::MoveRight) {
            1
        } else {
            0
        };

        let vertical_axis = if held(ControlAction::MoveForward) {
            1
        } else if held(ControlAction::MoveBack) {
            -1
        } else {
            0
        };

        let (horizontal, vertical) = if paused {
            (0.0, 0.0)
        } else {
            (
                ease(previous.horizontal, horizontal_axis as f32),
                ease(previous.vertical, vertical_axis as f32),
            )
        };

        Self {
            horizontal,
            vertical,
            horizontal_axis,
            vertical_axis,
            jump_key_down: held(ControlAction::Jump),
            dashing: held(ControlAction::Dash),
            pause_pressed: pressed(ControlAction::Pause),
            confirm_pressed: pressed(ControlAction::Confirm),
            quit_pressed: pressed(ControlAction::Quit),
            skip_pressed: pressed(ControlAction::Skip),
        }
    }

    /// Returns `true` if either discrete axis is non-zero.
    pub fn has_direction(&self) -> bool {
        self.horizontal_axis != 0 || self.vertical_axis != 0
    }
}

//--- ease() --------------------------------------------------------------

fn ease(current: f32, target: f32) -> f32 {
    current + (target - current) * AXIS_SMOOTHING
}

//=========================================================================
// Unit Tests
//=========================================================================
