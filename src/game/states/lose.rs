//=========================================================================
// Lose Scene
//=========================================================================
//
// "There's no fireworks this year" screen. Confirm fades back to the
// title screen.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::Scene;
use crate::game::signals::GameEvent;
use crate::game::state_machine::{GameState, SessionContext};
use super::fade_to;

//=== LoseScene ===========================================================

#[derive(Debug, Default)]
pub struct LoseScene;

impl Scene<GameState, GameEvent> for LoseScene {
    fn on_enter(&mut self, _context: &mut SessionContext) {
        log::info!(target: "scene", "Match lost");
    }

    fn update(&mut self, context: &mut SessionContext) {
        fade_to(context, GameState::Start);
    }
}
