//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit, an
// on-screen touch overlay) into a unified format used by the input
// subsystem.
//
// Responsibilities:
// - Represent keyboard keys in a stable, portable way
// - Represent the mobile overlay's virtual buttons
// - Provide equality and hashing semantics for deduplication
//
// Event Flow:
// ```text
// Platform Layer (Winit / touch overlay)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (keys + buttons held)
//         ↓
//    InputFrame (axes, jump, dash)
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Only keys the game can bind are listed; everything else maps to
/// `Unidentified` and is filtered by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    /// Directional movement keys
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    /// Spacebar
    Space,

    /// Return/Enter key
    Enter,

    /// Escape key
    Escape,

    /// Tab key
    Tab,

    /// Left Shift
    ShiftLeft,

    /// Right Shift
    ShiftRight,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== VirtualButton =======================================================

/// On-screen buttons of the mobile overlay.
///
/// The overlay only reports press/release; the input system ORs these
/// flags with the keyboard state each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualButton {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Dash,
    Pause,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Event Types
///
/// - **KeyDown/KeyUp**: Discrete keyboard events
/// - **ButtonDown/ButtonUp**: Mobile overlay press/release
/// - **Unidentified**: Unknown/unsupported events (ignored by system)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown { key: KeyCode },

    /// Key released.
    KeyUp { key: KeyCode },

    /// Virtual button pressed on the touch overlay.
    ButtonDown { button: VirtualButton },

    /// Virtual button released on the touch overlay.
    ButtonUp { button: VirtualButton },

    /// Unrecognized or unsupported event.
    Unidentified,
}

impl InputEvent {
    /// Returns `true` for press events (key or button).
    pub fn is_press(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::ButtonDown { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn press_events_are_classified() {
        assert!(InputEvent::KeyDown { key: KeyCode::Space }.is_press());
        assert!(InputEvent::ButtonDown { button: VirtualButton::Jump }.is_press());
        assert!(!InputEvent::KeyUp { key: KeyCode::Space }.is_press());
        assert!(!InputEvent::ButtonUp { button: VirtualButton::Jump }.is_press());
        assert!(!InputEvent::Unidentified.is_press());
    }

    #[test]
    fn events_deduplicate_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(InputEvent::KeyDown { key: KeyCode::ArrowUp });
        set.insert(InputEvent::KeyDown { key: KeyCode::ArrowUp });
        set.insert(InputEvent::KeyUp { key: KeyCode::ArrowUp });

        assert_eq!(set.len(), 2);
    }
}
