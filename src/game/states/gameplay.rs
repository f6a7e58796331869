//=========================================================================
// Gameplay Scene
//=========================================================================
//
// The game proper: player, lanterns, sparkler, match clock, fireworks.
//
// Architecture:
// ```text
//   GameplayScene
//     ├─ level: Arc<Level>           (shared, survives re-entry)
//     └─ run: Option<GameRun>        (built in on_enter, dropped in on_exit)
//          ├─ world: World
//          ├─ scheduler: TaskScheduler<GameTask>
//          ├─ sparkler: SparklerTimer
//          └─ timer: MatchTimer
// ```
//
// Tick order:
// ```text
//   1. scheduled tasks (sparkler step, flicker, win delay)
//   2. pause toggle
//   3. match clock        → timeout ends the match (LOSE)
//   4. quit request       → START
//   5. quit fade          (pause menu Q, win screen confirm)
//   6. world step         → win pauses the session, schedules WinDelay
//   7. fireworks
//   8. HUD snapshot
// ```
//
// Timeout is checked before quit and quit before the world step, so a
// tick where several conditions meet resolves as timeout → quit → win.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::globals::FadeProgress;
use crate::core::scene::{Scene, SceneTransition};
use crate::core::scheduler::TaskScheduler;
use crate::game::level::Level;
use crate::game::signals::{GameEvent, SoundCue};
use crate::game::state_machine::{GameState, SessionContext};
use crate::game::timers::{GameTask, MatchTimer, SparklerTimer};
use crate::game::world::World;

//=== GameRun =============================================================

/// Everything that lives for one activation of the game scene.
struct GameRun {
    world: World,
    scheduler: TaskScheduler<GameTask>,
    sparkler: SparklerTimer,
    timer: MatchTimer,
    win_screen: bool,
}

impl GameRun {
    fn new(level: Arc<Level>, context: &mut SessionContext) -> Self {
        let now = context.now_ms();
        let mut run = Self {
            world: World::new(level, &context.config),
            scheduler: TaskScheduler::new(),
            sparkler: SparklerTimer::new(),
            timer: MatchTimer::new(),
            win_screen: false,
        };

        run.timer.start(now);
        run.sparkler.restart(&mut run.scheduler, now, &context.config);
        run
    }

    //--- run_tasks() ------------------------------------------------------

    fn run_tasks(&mut self, context: &mut SessionContext) {
        let paused = context.session.paused;

        for task in self.scheduler.poll(context.now_ms()) {
            match task {
                GameTask::SparklerStep => {
                    if let Some(change) = self.sparkler.on_life_step(paused) {
                        context.signals.push(GameEvent::Sound(SoundCue::Warning(change)));
                    }
                }
                GameTask::Flicker => self.sparkler.on_flicker(paused),
                GameTask::WinDelay => {
                    self.world.start_fireworks();
                    self.win_screen = true;
                    context.signals.push(GameEvent::WinScreen);
                }
            }
        }
    }

    //--- toggle_pause() ---------------------------------------------------

    fn toggle_pause(&mut self, context: &mut SessionContext) {
        let paused = context.session.toggle_pause();
        if paused {
            self.timer.pause();
        } else {
            self.timer.resume(context.now_ms());
            if let Some(change) = self.sparkler.resume() {
                context.signals.push(GameEvent::Sound(SoundCue::Warning(change)));
            }
        }
        context.signals.push(GameEvent::PauseChanged(paused));
    }

    //--- step_world() -----------------------------------------------------

    fn step_world(&mut self, context: &mut SessionContext) {
        let dt = context.dt();
        let step = self.world.step(
            &context.input,
            self.sparkler.is_lit(),
            dt,
            &mut context.signals,
        );

        if step.won {
            info!(target: "game", "All lanterns lit, destination reached");
            context.session.paused = true;
            self.timer.pause();
            self.scheduler
                .schedule_once(context.now_ms(), context.config.win_delay_ms, GameTask::WinDelay);
            context.signals.push(GameEvent::PauseChanged(true));
        }

        if step.sparkler_reset {
            if let Some(change) =
                self.sparkler
                    .restart(&mut self.scheduler, context.now_ms(), &context.config)
            {
                context.signals.push(GameEvent::Sound(SoundCue::Warning(change)));
            }
        } else {
            self.sparkler.extinguish_if_depleted();
        }
    }

    fn push_hud(&self, context: &mut SessionContext) {
        let hud = self.world.hud(&self.sparkler, &self.timer);
        context.signals.push(GameEvent::HudUpdated(hud));
    }
}

//=== GameplayScene =======================================================

pub struct GameplayScene {
    level: Arc<Level>,
    run: Option<GameRun>,
}

impl GameplayScene {
    pub fn new(level: Arc<Level>) -> Self {
        Self { level, run: None }
    }

    /// Scheduled tasks still alive; zero whenever the scene is inactive.
    pub fn pending_tasks(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.scheduler.len())
    }

    pub fn world(&self) -> Option<&World> {
        self.run.as_ref().map(|run| &run.world)
    }
}

impl Scene<GameState, GameEvent> for GameplayScene {
    fn on_enter(&mut self, context: &mut SessionContext) {
        info!(target: "game", "Starting a new run");
        self.run = Some(GameRun::new(Arc::clone(&self.level), context));
    }

    fn on_exit(&mut self, _context: &mut SessionContext) {
        if let Some(mut run) = self.run.take() {
            run.scheduler.cancel_all();
            debug!(target: "game", "Run disposed at {}s", run.timer.elapsed_secs());
        }
    }

    fn update(&mut self, context: &mut SessionContext) {
        let Some(run) = self.run.as_mut() else {
            return;
        };

        run.run_tasks(context);

        let won = run.world.has_won();
        if context.input.pause_pressed && !won && !context.session.transition_in_progress() {
            run.toggle_pause(context);
        }

        let elapsed = run.timer.update(context.now_ms(), context.session.paused);
        if elapsed >= context.config.match_duration_secs && !won {
            info!(target: "game", "Time is up with {} lanterns lit", run.world.objectives().lanterns_lit());
            context.signals.push(GameEvent::Lost);
            context.scene_transitions.push(SceneTransition::Switch(GameState::Lose));
            run.push_hud(context);
            return;
        }

        if context.session.quit_requested {
            context.scene_transitions.push(SceneTransition::Switch(GameState::Start));
            return;
        }

        let quit_from_pause = context.session.paused && context.input.quit_pressed && !won;
        let leave_win_screen = run.win_screen && context.input.confirm_pressed;
        if (quit_from_pause || leave_win_screen) && context.session.begin_transition() {
            debug!(target: "game", "Quit fade started");
        }
        if context.session.advance_fade(context.config.fade_step) == FadeProgress::Finished {
            context.session.quit_requested = true;
        }

        if !context.session.paused {
            run.step_world(context);
        }

        run.world.tick_fireworks(&mut context.signals);
        run.push_hud(context);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
