//=========================================================================
// Start Scene
//=========================================================================
//
// Title screen. Confirm fades out and moves on to the cutscene.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::Scene;
use crate::game::signals::GameEvent;
use crate::game::state_machine::{GameState, SessionContext};
use super::fade_to;

//=== StartScene ==========================================================

#[derive(Debug, Default)]
pub struct StartScene;

impl Scene<GameState, GameEvent> for StartScene {
    fn update(&mut self, context: &mut SessionContext) {
        fade_to(context, GameState::Cutscene);
    }
}
