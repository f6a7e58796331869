//=========================================================================
// Input Buffer
//
// Collects key events between two redraws. Acts as a transient event
// aggregator between the Platform and the core thread.
//
// Responsibilities:
// - Store incoming platform events in arrival order
// - Drop consecutive duplicates (a second KeyDown without a KeyUp)
// - Hand the batch over via `drain()`
//
// Notes:
// Press order matters to the state tracker (a key pressed and released
// in the same batch still counts as pressed), so events are never
// reordered or coalesced beyond exact repeats.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::event::InputEvent;

//=== InputBuffer Struct ==================================================

pub struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates so typical frames never reallocate.
    //
    pub fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- push() -----------------------------------------------------------
    //
    // Appends an event. Duplicate consecutive events are ignored to
    // prevent flooding.
    //
    pub fn push(&mut self, event: InputEvent) {
        if self.events.last() != Some(&event) {
            self.events.push(event);
        }
    }

    //--- drain() ----------------------------------------------------------
    //
    // Returns the batch and empties the buffer, or None if nothing came in.
    //
    pub fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::KeyCode;

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    #[test]
    fn consecutive_duplicates_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push(key_down(KeyCode::KeyA));
        buffer.push(key_down(KeyCode::KeyA));
        buffer.push(key_down(KeyCode::KeyB));
        assert_eq!(buffer.len(), 2, "Duplicates should be ignored");
    }

    #[test]
    fn arrival_order_is_kept() {
        let mut buffer = InputBuffer::new();
        buffer.push(key_down(KeyCode::Enter));
        buffer.push(key_up(KeyCode::Enter));
        buffer.push(key_down(KeyCode::Enter));

        assert_eq!(
            buffer.drain(),
            Some(vec![
                key_down(KeyCode::Enter),
                key_up(KeyCode::Enter),
                key_down(KeyCode::Enter),
            ])
        );
    }

    #[test]
    fn drain_empties_the_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push(key_down(KeyCode::Space));

        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert_eq!(buffer.drain(), None);
    }

    //--- Memory Retention -------------------------------------------------
    //
    // Draining keeps the underlying storage for the next frame.
    //
    #[test]
    fn drain_does_not_deallocate() {
        let mut buffer = InputBuffer::new();
        for i in 0..200 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push(key_down(key));
        }
        let capacity = buffer.events.capacity();

        buffer.drain();

        assert_eq!(buffer.events.capacity(), capacity);
    }
}
