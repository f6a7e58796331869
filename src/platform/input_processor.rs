//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into game InputEvents.
//
// Architecture:
//   Winit KeyEvent → InputProcessor → InputEvent (game type) → InputBuffer
//
// OS key repeat is filtered here: a held key produces one KeyDown, which
// the state tracker keeps held until KeyUp. Unmapped keys (F-keys, numpad,
// media keys) return None.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode};

//=== InputProcessor ======================================================

/// Converts Winit keyboard events to game InputEvents.
pub(crate) struct InputProcessor;

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit KeyEvent (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        if key_event.repeat {
            return None;
        }

        let PhysicalKey::Code(code) = key_event.physical_key else {
            return None;
        };

        Self::key_input_event(KeyCode::from(code), key_event.state)
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_input_event(key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }

        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key },
            ElementState::Released => InputEvent::KeyUp { key },
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to game key codes.
///
/// Maps A-Z, arrows and the menu keys. Everything else returns
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_and_released_map_to_down_and_up() {
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::Space, ElementState::Pressed),
            Some(InputEvent::KeyDown { key: KeyCode::Space })
        );
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::Space, ElementState::Released),
            Some(InputEvent::KeyUp { key: KeyCode::Space })
        );
    }

    #[test]
    fn unidentified_keys_are_dropped() {
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::Unidentified, ElementState::Pressed),
            None
        );
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
    }

    #[test]
    fn keycode_conversion_covers_game_keys() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::KeyQ);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowLeft), KeyCode::ArrowLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert_eq!(KeyCode::from(WinitKeyCode::Tab), KeyCode::Tab);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftLeft), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftRight), KeyCode::ShiftRight);
    }
}
