//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level input state tracking with per-frame delta tracking.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: clear() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, VirtualButton};

//=== StateTracker ========================================================

/// Tracks persistent state (keys/buttons held) and per-frame presses.
/// Frame lifecycle: clear() → process_events() → query.
#[derive(Debug)]
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<VirtualButton>,

    //--- Frame Deltas (reset each frame via clear()) --------------------
    keys_pressed_this_frame: HashSet<KeyCode>,
    buttons_pressed_this_frame: HashSet<VirtualButton>,
}

impl StateTracker {
    /// Creates a new state tracker with empty state.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            keys_pressed_this_frame: HashSet::new(),
            buttons_pressed_this_frame: HashSet::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific deltas.
    pub(crate) fn clear(&mut self) {
        self.keys_pressed_this_frame.clear();
        self.buttons_pressed_this_frame.clear();
    }

    /// Processes input events, updating internal state.
    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Drops every held key and button.
    ///
    /// Used when input is re-attached to a freshly activated scene so keys
    /// held across the switch do not leak into it.
    pub(crate) fn release_all(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
        self.clear();
    }

    //--- Internal Helpers -------------------------------------------------
    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } => {
                // Only mark as pressed if it wasn't already down
                if self.keys_down.insert(*key) {
                    self.keys_pressed_this_frame.insert(*key);
                }
            }

            InputEvent::KeyUp { key } => {
                self.keys_down.remove(key);
            }

            InputEvent::ButtonDown { button } => {
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed_this_frame.insert(*button);
                }
            }

            InputEvent::ButtonUp { button } => {
                self.buttons_down.remove(button);
            }

            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` if key transitioned UP → DOWN (one frame only).
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }

    /// Returns `true` while key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Like [`is_key_pressed`](Self::is_key_pressed) but for overlay buttons.
    pub fn is_button_pressed(&self, button: VirtualButton) -> bool {
        self.buttons_pressed_this_frame.contains(&button)
    }

    /// Like [`is_key_down`](Self::is_key_down) but for overlay buttons.
    pub fn is_button_down(&self, button: VirtualButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Returns an iterator over all keys currently held.
    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    /// Returns an iterator over all keys pressed this frame.
    pub fn keys_pressed(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_pressed_this_frame.iter()
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
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

    fn button_down(button: VirtualButton) -> InputEvent {
        InputEvent::ButtonDown { button }
    }

    fn button_up(button: VirtualButton) -> InputEvent {
        InputEvent::ButtonUp { button }
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_pressed_only_on_transition_frame() {
        let mut tracker = StateTracker::new();

        // Frame 1: Key down
        tracker.clear();
        tracker.process_events(&[key_down(KeyCode::Space)]);
        assert!(tracker.is_key_pressed(KeyCode::Space));
        assert!(tracker.is_key_down(KeyCode::Space));

        // Frame 2: Still held
        tracker.clear();
        tracker.process_events(&[]);
        assert!(!tracker.is_key_pressed(KeyCode::Space));
        assert!(tracker.is_key_down(KeyCode::Space));

        // Frame 3: Released
        tracker.clear();
        tracker.process_events(&[key_up(KeyCode::Space)]);
        assert!(!tracker.is_key_down(KeyCode::Space));
    }

    #[test]
    fn fast_tap_registers_press_but_not_hold() {
        let mut tracker = StateTracker::new();

        tracker.process_events(&[key_down(KeyCode::Enter), key_up(KeyCode::Enter)]);

        assert!(tracker.is_key_pressed(KeyCode::Enter));
        assert!(!tracker.is_key_down(KeyCode::Enter));
    }

    #[test]
    fn duplicate_key_down_ignored() {
        let mut tracker = StateTracker::new();

        tracker.process_events(&[key_down(KeyCode::ArrowUp)]);
        tracker.clear();
        tracker.process_events(&[key_down(KeyCode::ArrowUp)]);

        assert!(!tracker.is_key_pressed(KeyCode::ArrowUp), "Repeat should not re-trigger");
        assert!(tracker.is_key_down(KeyCode::ArrowUp));
    }

    //=====================================================================
    // Virtual Button Tests
    //=====================================================================

    #[test]
    fn buttons_tracked_independently_of_keys() {
        let mut tracker = StateTracker::new();

        tracker.process_events(&[button_down(VirtualButton::Left)]);
        assert!(tracker.is_button_down(VirtualButton::Left));
        assert!(tracker.is_button_pressed(VirtualButton::Left));
        assert!(!tracker.is_key_down(KeyCode::ArrowLeft));

        tracker.clear();
        tracker.process_events(&[button_up(VirtualButton::Left)]);
        assert!(!tracker.is_button_down(VirtualButton::Left));
    }

    #[test]
    fn release_all_drops_held_state() {
        let mut tracker = StateTracker::new();
        tracker.process_events(&[key_down(KeyCode::ArrowLeft), button_down(VirtualButton::Dash)]);

        tracker.release_all();

        assert_eq!(tracker.keys_down().count(), 0);
        assert!(!tracker.is_button_down(VirtualButton::Dash));
        assert_eq!(tracker.keys_pressed().count(), 0);
    }
}
