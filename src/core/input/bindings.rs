//=========================================================================
// Key Bindings
//=========================================================================
//
// Maps physical keys and overlay buttons to control actions.
//
// Architecture:
//   KeyCode → HashMap → ControlAction ← VirtualButton (fixed mapping)
//
// Several keys may drive the same action; an action is "held" when any of
// its keys or its overlay button is held.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, VirtualButton};
use super::state_tracker::StateTracker;

//=== ControlAction =======================================================

/// High-level controls the game reads each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    Jump,
    Dash,
    Pause,
    Confirm,
    Quit,
    Skip,
}

impl ControlAction {
    /// Overlay button that also drives this action, if any.
    pub fn virtual_button(self) -> Option<VirtualButton> {
        match self {
            Self::MoveLeft => Some(VirtualButton::Left),
            Self::MoveRight => Some(VirtualButton::Right),
            Self::MoveForward => Some(VirtualButton::Up),
            Self::MoveBack => Some(VirtualButton::Down),
            Self::Jump => Some(VirtualButton::Jump),
            Self::Dash => Some(VirtualButton::Dash),
            Self::Pause => Some(VirtualButton::Pause),
            Self::Confirm | Self::Quit | Self::Skip => None,
        }
    }
}

//=== KeyBindings =========================================================

/// Key → action table.
///
/// Defaults mirror the keyboard layout of the game: arrows move, Space
/// jumps, either Shift dashes, Escape pauses, Enter confirms menus, Q quits
/// from the pause menu and Tab skips the cutscene.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, ControlAction>,
}

impl KeyBindings {
    /// Creates an empty table (nothing bound).
    pub fn empty() -> Self {
        Self { bindings: HashMap::new() }
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key to an action, replacing any previous binding of that key.
    pub fn bind(&mut self, key: KeyCode, action: ControlAction) {
        self.bindings.insert(key, action);
    }

    /// Removes the binding of a key.
    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    /// Returns the action bound to a key.
    pub fn action_for(&self, key: KeyCode) -> Option<ControlAction> {
        self.bindings.get(&key).copied()
    }

    //--- Queries ----------------------------------------------------------

    /// Returns `true` while any key bound to `action` (or its overlay button) is held.
    pub fn is_held(&self, tracker: &StateTracker, action: ControlAction) -> bool {
        let button_held = action
            .virtual_button()
            .is_some_and(|b| tracker.is_button_down(b));

        button_held
            || tracker
                .keys_down()
                .any(|key| self.action_for(*key) == Some(action))
    }

    /// Returns `true` if `action` was pressed this frame.
    pub fn was_pressed(&self, tracker: &StateTracker, action: ControlAction) -> bool {
        let button_pressed = action
            .virtual_button()
            .is_some_and(|b| tracker.is_button_pressed(b));

        button_pressed
            || tracker
                .keys_pressed()
                .any(|key| self.action_for(*key) == Some(action))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(KeyCode::ArrowLeft, ControlAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, ControlAction::MoveRight);
        bindings.bind(KeyCode::ArrowUp, ControlAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, ControlAction::MoveBack);
        bindings.bind(KeyCode::Space, ControlAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, ControlAction::Dash);
        bindings.bind(KeyCode::ShiftRight, ControlAction::Dash);
        bindings.bind(KeyCode::Escape, ControlAction::Pause);
        bindings.bind(KeyCode::Enter, ControlAction::Confirm);
        bindings.bind(KeyCode::KeyQ, ControlAction::Quit);
        bindings.bind(KeyCode::Tab, ControlAction::Skip);
        bindings
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::InputEvent;

    fn tracker_with(events: &[InputEvent]) -> StateTracker {
        let mut tracker = StateTracker::new();
        tracker.process_events(events);
        tracker
    }

    #[test]
    fn default_layout_binds_arrows_and_space() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(KeyCode::ArrowLeft), Some(ControlAction::MoveLeft));
        assert_eq!(bindings.action_for(KeyCode::Space), Some(ControlAction::Jump));
        assert_eq!(bindings.action_for(KeyCode::ShiftRight), Some(ControlAction::Dash));
        assert_eq!(bindings.action_for(KeyCode::KeyZ), None);
    }

    #[test]
    fn either_shift_key_holds_dash() {
        let bindings = KeyBindings::default();
        let tracker = tracker_with(&[InputEvent::KeyDown { key: KeyCode::ShiftRight }]);
        assert!(bindings.is_held(&tracker, ControlAction::Dash));
    }

    #[test]
    fn overlay_button_holds_action() {
        let bindings = KeyBindings::default();
        let tracker = tracker_with(&[InputEvent::ButtonDown { button: VirtualButton::Up }]);
        assert!(bindings.is_held(&tracker, ControlAction::MoveForward));
        assert!(!bindings.is_held(&tracker, ControlAction::MoveBack));
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyCode::KeyW, ControlAction::MoveForward);
        bindings.unbind(KeyCode::ArrowUp);

        let tracker = tracker_with(&[InputEvent::KeyDown { key: KeyCode::ArrowUp }]);
        assert!(!bindings.is_held(&tracker, ControlAction::MoveForward));

        let tracker = tracker_with(&[InputEvent::KeyDown { key: KeyCode::KeyW }]);
        assert!(bindings.was_pressed(&tracker, ControlAction::MoveForward));
    }
}
