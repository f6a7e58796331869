//=========================================================================
// Cutscene Scene
//=========================================================================
//
// Intro animation followed by click-through dialogue.
//
// Flow:
// ```text
//   on_enter → IntroFinished scheduled after cutscene_intro_ms
//   IntroFinished → dialogue frame 0
//   confirm → next frame ... confirm on the last frame → Game
//   skip (any time) → Game
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::scene::{Scene, SceneTransition};
use crate::core::scheduler::TaskScheduler;
use crate::game::signals::GameEvent;
use crate::game::state_machine::{GameState, SessionContext};

//=== Constants ===========================================================

/// Index of the last dialogue frame.
pub const DIALOGUE_FRAMES: u8 = 8;

//=== CutsceneTask ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutsceneTask {
    IntroFinished,
}

//=== CutsceneScene =======================================================

#[derive(Debug, Default)]
pub struct CutsceneScene {
    scheduler: TaskScheduler<CutsceneTask>,
    /// Current dialogue frame; `None` while the intro plays.
    dialogue: Option<u8>,
}

impl CutsceneScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialogue_frame(&self) -> Option<u8> {
        self.dialogue
    }
}

impl Scene<GameState, GameEvent> for CutsceneScene {
    fn on_enter(&mut self, context: &mut SessionContext) {
        self.dialogue = None;
        self.scheduler.schedule_once(
            context.now_ms(),
            context.config.cutscene_intro_ms,
            CutsceneTask::IntroFinished,
        );
    }

    fn on_exit(&mut self, _context: &mut SessionContext) {
        self.scheduler.cancel_all();
        self.dialogue = None;
    }

    fn update(&mut self, context: &mut SessionContext) {
        for task in self.scheduler.poll(context.now_ms()) {
            match task {
                CutsceneTask::IntroFinished => {
                    debug!(target: "scene", "Cutscene intro finished");
                    self.dialogue = Some(0);
                    context.signals.push(GameEvent::DialogueFrame(0));
                }
            }
        }

        if context.input.skip_pressed {
            debug!(target: "scene", "Cutscene skipped");
            context.scene_transitions.push(SceneTransition::Switch(GameState::Game));
            return;
        }

        let Some(frame) = self.dialogue else {
            return;
        };

        if context.input.confirm_pressed {
            if frame < DIALOGUE_FRAMES {
                self.dialogue = Some(frame + 1);
                context.signals.push(GameEvent::DialogueFrame(frame + 1));
            } else {
                context.scene_transitions.push(SceneTransition::Switch(GameState::Game));
            }
        }
    }
}
