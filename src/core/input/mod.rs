//=========================================================================
// Input System
//
// High-level interface for input handling within the game.
// Owns the low-level `StateTracker` and the key bindings, and turns each
// tick's event batches into one `InputFrame`.
//
// Responsibilities:
// - Aggregate and process batches of raw input events
// - Track held keys and overlay buttons across ticks
// - Produce the smoothed, pause-gated `InputFrame`
//
// Notes:
// This system is owned by the game state machine and updated once per
// tick before any scene runs. Input can be detached during scene
// switches; a detached system swallows events and yields neutral frames.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod bindings;
pub mod event;
pub mod frame;
mod state_tracker;

//=== Public API ==========================================================

pub use bindings::{ControlAction, KeyBindings};
pub use event::{InputEvent, KeyCode, VirtualButton};
pub use frame::InputFrame;
pub use state_tracker::StateTracker;

//=== External Crates =====================================================

use log::{debug, trace};

//=== InputSystem =========================================================

/// Owns input state and produces one [`InputFrame`] per tick.
#[derive(Debug)]
pub struct InputSystem {
    tracker: StateTracker,
    bindings: KeyBindings,
    frame: InputFrame,
    attached: bool,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            tracker: StateTracker::new(),
            bindings,
            frame: InputFrame::neutral(),
            attached: true,
        }
    }

    //--- process_frame() -------------------------------------------------
    //
    // Consumes all input batches received during the current tick and
    // rebuilds the InputFrame. `paused` gates movement and actions.
    //
    pub fn process_frame(&mut self, batches: &[Vec<InputEvent>], paused: bool) -> InputFrame {
        self.tracker.clear();

        if !self.attached {
            trace!("Input detached, dropping {} batches", batches.len());
            self.frame = InputFrame::neutral();
            return self.frame;
        }

        for batch in batches {
            self.tracker.process_events(batch);
        }

        self.frame = InputFrame::next(&self.frame, &self.tracker, &self.bindings, paused);
        self.frame
    }

    //--- Attachment -------------------------------------------------------

    /// Stops routing input to the active scene (scene switch in progress).
    pub fn detach(&mut self) {
        if self.attached {
            debug!("Input detached");
        }
        self.attached = false;
        self.frame = InputFrame::neutral();
    }

    /// Resumes routing input; keys held across the switch are forgotten.
    pub fn attach(&mut self) {
        if !self.attached {
            debug!("Input attached");
        }
        self.attached = true;
        self.tracker.release_all();
    }

    //--- Query Methods ----------------------------------------------------

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Last frame produced.
    pub fn frame(&self) -> &InputFrame {
        &self.frame
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------
    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }
    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn held_key_persists_across_ticks() {
        let mut system = InputSystem::default();

        let frame = system.process_frame(&[vec![key_down(KeyCode::ArrowRight)]], false);
        assert_eq!(frame.horizontal_axis, 1);

        let frame = system.process_frame(&[], false);
        assert_eq!(frame.horizontal_axis, 1);

        let frame = system.process_frame(&[vec![key_up(KeyCode::ArrowRight)]], false);
        assert_eq!(frame.horizontal_axis, 0);
    }

    #[test]
    fn multiple_batches_merge_in_order() {
        let mut system = InputSystem::default();

        let frame = system.process_frame(
            &[vec![key_down(KeyCode::Space)], vec![key_up(KeyCode::Space)]],
            false,
        );
        assert!(!frame.jump_key_down, "Released within the same tick");
    }

    #[test]
    fn detached_system_yields_neutral_frames() {
        let mut system = InputSystem::default();
        system.detach();

        let frame = system.process_frame(&[vec![key_down(KeyCode::ArrowUp)]], false);
        assert_eq!(frame, InputFrame::neutral());
        assert!(!system.tracker.is_key_down(KeyCode::ArrowUp));
    }

    #[test]
    fn attach_forgets_keys_held_before_switch() {
        let mut system = InputSystem::default();
        system.process_frame(&[vec![key_down(KeyCode::Enter)]], false);

        system.detach();
        system.attach();

        let frame = system.process_frame(&[], false);
        assert!(!frame.confirm_pressed);
        assert!(!system.tracker.is_key_down(KeyCode::Enter));
    }
}
