//=========================================================================
// Game State Machine
//=========================================================================
//
// Owns the four game scenes, the input system and the session context,
// and turns one tick of raw input into one `FrameSignals`.
//
// Architecture:
// ```text
//   tick(batches)
//     ├─ context.advance_tick(), signals.clear()
//     ├─ InputSystem::process_frame(batches, paused) → context.input
//     ├─ SceneManager::update(context)
//     │     Loading(next)        → input detached
//     │     Activated{from, to}  → input attached, StateChanged
//     └─ FrameSignals::collect(signals.drain())
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::globals::GameContext;
use crate::core::input::{InputEvent, InputSystem, KeyBindings};
use crate::core::scene::{SceneKey, SceneManager, SceneSwitch};
use crate::core::Simulation;
use super::level::{Level, LevelError, LevelLayout};
use super::signals::{FrameSignals, GameEvent};
use super::states::{CutsceneScene, GameplayScene, LoseScene, StartScene};

//=== GameState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Start,
    Cutscene,
    Game,
    Lose,
}

impl SceneKey for GameState {}

/// Context every game scene receives.
pub type SessionContext = GameContext<GameState, GameEvent>;

//=== GameStateMachine ====================================================

pub struct GameStateMachine {
    scenes: SceneManager<GameState, GameEvent>,
    context: SessionContext,
    input: InputSystem,
    level: Arc<Level>,
}

impl GameStateMachine {
    /// Validates the level and registers the scenes. Nothing runs until
    /// [`start`](Self::start).
    pub fn new(
        config: GameConfig,
        layout: LevelLayout,
        bindings: KeyBindings,
    ) -> Result<Self, LevelError> {
        let level = Arc::new(layout.validate()?);

        let mut scenes = SceneManager::new();
        scenes.register_default(GameState::Start, StartScene);
        scenes.register_scene(GameState::Cutscene, CutsceneScene::new());
        scenes.register_scene(GameState::Game, GameplayScene::new(Arc::clone(&level)));
        scenes.register_scene(GameState::Lose, LoseScene);

        info!(target: "game", "State machine ready ({} TPS)", config.tps);

        Ok(Self {
            scenes,
            context: SessionContext::new(Arc::new(config)),
            input: InputSystem::new(bindings),
            level,
        })
    }

    //--- start() ----------------------------------------------------------

    /// Enters the start scene.
    pub fn start(&mut self) -> FrameSignals {
        self.context.signals.clear();
        let switch = self.scenes.start(&mut self.context);
        self.apply_switch(switch);
        self.collect()
    }

    //--- tick() -----------------------------------------------------------

    pub fn tick(&mut self, batches: &[Vec<InputEvent>]) -> FrameSignals {
        self.context.advance_tick();
        self.context.signals.clear();

        self.context.input = self
            .input
            .process_frame(batches, self.context.session.paused);

        let switch = self.scenes.update(&mut self.context);
        self.apply_switch(switch);
        self.collect()
    }

    fn apply_switch(&mut self, switch: SceneSwitch<GameState>) {
        match switch {
            SceneSwitch::None => {}
            SceneSwitch::Loading(next) => {
                debug!(target: "game", "Waiting for {:?} to load", next);
                self.input.detach();
            }
            SceneSwitch::Activated { from, to } => {
                self.input.attach();
                self.context
                    .signals
                    .push(GameEvent::StateChanged { from, to });
            }
        }
    }

    fn collect(&mut self) -> FrameSignals {
        let drained = self.context.signals.drain();
        FrameSignals::collect(
            self.context.tick(),
            self.scenes.active(),
            self.scenes.pending().is_some(),
            &self.context.session,
            drained,
        )
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> Option<GameState> {
        self.scenes.active()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }
}

impl Simulation for GameStateMachine {
    type Output = FrameSignals;

    fn start(&mut self) -> FrameSignals {
        GameStateMachine::start(self)
    }

    fn tick(&mut self, batches: &[Vec<InputEvent>]) -> FrameSignals {
        GameStateMachine::tick(self, batches)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crate::game::states::DIALOGUE_FRAMES;

    //--- Test Helpers -----------------------------------------------------

    fn machine() -> GameStateMachine {
        let config = GameConfig {
            cutscene_intro_ms: 500,
            ..GameConfig::default()
        };
        GameStateMachine::new(config, LevelLayout::festival(), KeyBindings::default())
            .expect("festival level is valid")
    }

    fn press(machine: &mut GameStateMachine, key: KeyCode) -> FrameSignals {
        machine.tick(&[vec![InputEvent::KeyDown { key }, InputEvent::KeyUp { key }]])
    }

    fn idle(machine: &mut GameStateMachine, ticks: usize) -> Vec<FrameSignals> {
        (0..ticks).map(|_| machine.tick(&[])).collect()
    }

    fn changed_to(signals: &[FrameSignals], state: GameState) -> bool {
        signals.iter().any(|s| {
            s.has_event(|e| matches!(e, GameEvent::StateChanged { to, .. } if *to == state))
        })
    }

    fn reach_cutscene(machine: &mut GameStateMachine) {
        machine.start();
        press(machine, KeyCode::Enter);
        let frames = idle(machine, 30);
        assert!(changed_to(&frames, GameState::Cutscene));
    }

    //=====================================================================
    // Construction Tests
    //=====================================================================

    #[test]
    fn invalid_level_is_refused() {
        let result = GameStateMachine::new(
            GameConfig::default(),
            LevelLayout::new(),
            KeyBindings::default(),
        );
        assert!(matches!(result, Err(LevelError::MissingStart)));
    }

    #[test]
    fn start_enters_start_scene() {
        let mut machine = machine();
        let signals = machine.start();

        assert_eq!(signals.state, Some(GameState::Start));
        assert!(signals.has_event(|e| *e
            == GameEvent::StateChanged {
                from: None,
                to: GameState::Start
            }));
    }

    //=====================================================================
    // Flow Tests
    //=====================================================================

    #[test]
    fn confirm_on_start_fades_into_cutscene() {
        let mut machine = machine();
        machine.start();

        let first = press(&mut machine, KeyCode::Enter);
        assert!(first.fade_level < 1.0);
        assert_eq!(first.state, Some(GameState::Start));

        let frames = idle(&mut machine, 30);
        assert!(changed_to(&frames, GameState::Cutscene));
        assert_eq!(machine.state(), Some(GameState::Cutscene));
        // Session resets on activation
        assert_eq!(machine.context().session.fade_level(), 1.0);
    }

    #[test]
    fn skip_leaves_cutscene_at_once() {
        let mut machine = machine();
        reach_cutscene(&mut machine);

        let signals = press(&mut machine, KeyCode::Tab);

        assert_eq!(signals.state, Some(GameState::Game));
        assert!(signals.hud.is_none(), "Game scene has not ticked yet");
        let next = machine.tick(&[]);
        assert!(next.hud.is_some());
    }

    #[test]
    fn dialogue_advances_to_game() {
        let mut machine = machine();
        reach_cutscene(&mut machine);

        // Confirm is ignored until the intro has played
        press(&mut machine, KeyCode::Enter);
        assert_eq!(machine.state(), Some(GameState::Cutscene));

        let frames = idle(&mut machine, 40);
        assert!(frames
            .iter()
            .any(|s| s.has_event(|e| *e == GameEvent::DialogueFrame(0))));

        for frame in 1..=DIALOGUE_FRAMES {
            let signals = press(&mut machine, KeyCode::Enter);
            assert!(signals.has_event(|e| *e == GameEvent::DialogueFrame(frame)));
        }

        let signals = press(&mut machine, KeyCode::Enter);
        assert_eq!(signals.state, Some(GameState::Game));
    }

    #[test]
    fn keys_held_across_a_switch_are_released() {
        let mut machine = machine();
        reach_cutscene(&mut machine);

        machine.tick(&[vec![
            InputEvent::KeyDown { key: KeyCode::ArrowUp },
            InputEvent::KeyDown { key: KeyCode::Tab },
        ]]);
        assert_eq!(machine.state(), Some(GameState::Game));

        let signals = machine.tick(&[]);
        assert_eq!(machine.context().input.vertical_axis, 0);
        assert!(signals.hud.is_some());
    }

    #[test]
    fn pause_reaches_frame_signals() {
        let mut machine = machine();
        reach_cutscene(&mut machine);
        press(&mut machine, KeyCode::Tab);

        let signals = press(&mut machine, KeyCode::Escape);

        assert!(signals.paused);
        assert!(signals.has_event(|e| *e == GameEvent::PauseChanged(true)));
        assert!(signals.title().ends_with("| Paused"));
    }
}
