//=========================================================================
// Signal Bus
//=========================================================================
//
// Per-tick outbound event queue read by the presentation layer.
//
// Architecture:
//   Scenes → push() → Vec<E>
//                       ↓
//   Presentation ← read() (any number of readers)
//                       ↓
//   State machine ─→ clear() at the start of the next tick
//
// Pattern: clear → push (during tick) → read (after tick) → repeat
//
// Readers pull once per tick; nothing is pushed into subscriber
// callbacks, so a scene disposed mid-tick can't leave dangling observers.
//
//=========================================================================

//=== SignalBus ===========================================================

/// Ordered event queue for one tick.
#[derive(Debug, Clone)]
pub struct SignalBus<E> {
    events: Vec<E>,
}

impl<E> SignalBus<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    //--- Message Operations -----------------------------------------------

    /// Appends an event for this tick.
    pub fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// All events pushed since the last clear, in push order.
    pub fn read(&self) -> &[E] {
        &self.events
    }

    /// Moves the events out, leaving the bus empty.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    //--- Query API --------------------------------------------------------

    pub fn count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if any queued event matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&E) -> bool) -> bool {
        self.events.iter().any(predicate)
    }

    /// Clears all events, preserving allocated capacity.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<E> Default for SignalBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
