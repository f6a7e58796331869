//=========================================================================
// Global Session State
//=========================================================================
//
// Separates session data (flags, clock, signals) from the systems that
// update it.
//
// Architecture:
//   SessionState: pause / quit / fade flags
//   GameContext:  InputFrame + SessionState + SignalBus + TransitionQueue
//
//=========================================================================

//=== Module Declarations =================================================

mod game_context;
mod session_state;

//=== Public API ==========================================================

pub use game_context::GameContext;
pub use session_state::{FadeProgress, SessionState};
