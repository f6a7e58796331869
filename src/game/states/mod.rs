//=========================================================================
// Game States
//=========================================================================
//
// One scene per game state.
//
// Architecture:
// ```text
//   StartScene    ── confirm, fade ──→ Cutscene
//   CutsceneScene ── last dialogue frame or skip ──→ Game
//   GameplayScene ── timeout ──→ Lose
//                 └─ quit fade (pause menu or win screen) ──→ Start
//   LoseScene     ── confirm, fade ──→ Start
// ```
//
//=========================================================================

//=== Module Declarations =================================================

mod cutscene;
mod gameplay;
mod lose;
mod start;

//=== Public API ==========================================================

pub use cutscene::{CutsceneScene, DIALOGUE_FRAMES};
pub use gameplay::GameplayScene;
pub use lose::LoseScene;
pub use start::StartScene;

//=== Internal Dependencies ===============================================

use crate::core::globals::FadeProgress;
use crate::core::scene::SceneTransition;
use super::state_machine::{GameState, SessionContext};

//--- fade_to() -----------------------------------------------------------
//
// Menu screens share one pattern: confirm starts a fade and the switch
// happens on the tick the fade reaches black.
//
fn fade_to(context: &mut SessionContext, target: GameState) {
    if context.input.confirm_pressed && context.session.begin_transition() {
        log::debug!(target: "scene", "Fading out toward {:?}", target);
    }

    let step = context.config.fade_step;
    if context.session.advance_fade(step) == FadeProgress::Finished {
        context.scene_transitions.push(SceneTransition::Switch(target));
    }
}
