//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit window, touch overlay) with the core
// tick loop.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and batching
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;
pub use interface::PlatformError;
