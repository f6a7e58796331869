//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene lifecycle and single-active scene switching.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<S, Box<dyn Scene>>
//     ├─ active: Option<S>
//     └─ pending: Option<S>   (entered, not yet ready)
//
// Flow:
//   update() → Scene::update() → process_transitions() → SceneSwitch
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::GameContext;

//=== Module Declarations =================================================

mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_manager::{SceneKey, SceneManager, SceneSwitch, SceneTransition};
pub use transition_queue::TransitionQueue;

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks and update logic.
///
/// Scenes are registered in SceneManager and activated one at a time.
/// A switch runs: `on_enter` (incoming loads) → `poll_ready` until true →
/// `on_exit` (outgoing disposes) → incoming becomes active.
///
/// # Minimal Implementation
///
/// Only `update()` is required. Lifecycle hooks have default implementations:
///
/// ```rust
/// # use lantern_festival::core::globals::GameContext;
/// # use lantern_festival::core::scene::{Scene, SceneKey};
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title }
/// # impl SceneKey for Screen {}
/// struct TitleScreen;
///
/// impl Scene<Screen, ()> for TitleScreen {
///     fn update(&mut self, _context: &mut GameContext<Screen, ()>) {
///         // Only this method is required
///     }
/// }
/// ```
pub trait Scene<S: SceneKey, E>: Send {
    /// Called when the scene is chosen as the next active scene.
    ///
    /// Build the scene's resources here. Input is detached until the
    /// scene reports ready.
    fn on_enter(&mut self, _context: &mut GameContext<S, E>) {}

    /// Polled once per tick after `on_enter` until it returns `true`.
    ///
    /// The previously active scene stays alive (but is not updated) while
    /// this returns `false`.
    fn poll_ready(&mut self, _context: &mut GameContext<S, E>) -> bool {
        true
    }

    /// Called when the scene stops being active.
    ///
    /// Must release everything created in `on_enter`, including any
    /// scheduled tasks.
    fn on_exit(&mut self, _context: &mut GameContext<S, E>) {}

    /// Called every tick while the scene is active.
    fn update(&mut self, context: &mut GameContext<S, E>);
}
