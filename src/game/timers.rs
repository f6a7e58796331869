//=========================================================================
// Game Timers
//=========================================================================
//
// Sparkler countdown and match clock for the game scene.
//
// Architecture:
// ```text
//   TaskScheduler<GameTask> (owned by the game scene)
//     ├─ SparklerStep every 2000 ms → SparklerTimer::on_life_step()
//     ├─ Flicker      every  185 ms → SparklerTimer::on_flicker()
//     └─ WinDelay     once          → fireworks + win screen
//
//   MatchTimer: elapsed seconds = floor((now - start) / 1000) + carried
// ```
//
// Scheduled ticks keep firing while the session is paused; the handlers
// receive the pause flag and do nothing except pause the warning cue.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::scheduler::{CancelToken, TaskScheduler};

//=== Constants ===========================================================

/// Life step that depletes the sparkler.
pub const SPARKLER_LIFE_STEPS: u32 = 10;

/// Life step that starts the warning cue.
const WARNING_STEP: u32 = 9;

/// Highest flicker frame before it wraps.
pub const FLICKER_FRAMES: u32 = 5;

/// Real seconds per in-universe minute.
const SECONDS_PER_CLOCK_MINUTE: u64 = 4;

/// Real seconds in one full clock cycle (one in-universe hour).
const CLOCK_CYCLE_SECS: u64 = 240;

//=== GameTask ============================================================

/// Payloads scheduled by the game scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTask {
    SparklerStep,
    Flicker,
    WinDelay,
}

//=== WarningCue ==========================================================

/// Low-sparkler warning sound state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningCue {
    #[default]
    Silent,
    Playing,
    Paused,
}

/// Change to the warning sound requested by a sparkler handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningChange {
    Play,
    Pause,
    Resume,
    Stop,
}

//=== SparklerTimer =======================================================

/// Ten-step sparkler life plus its flicker animation.
#[derive(Debug, Clone)]
pub struct SparklerTimer {
    life: u32,
    flicker: u32,
    lit: bool,
    depleted: bool,
    warning: WarningCue,
    step_task: Option<CancelToken>,
    flicker_task: Option<CancelToken>,
}

impl SparklerTimer {
    pub fn new() -> Self {
        Self {
            life: 0,
            flicker: 0,
            lit: true,
            depleted: false,
            warning: WarningCue::Silent,
            step_task: None,
            flicker_task: None,
        }
    }

    //--- restart() --------------------------------------------------------
    //
    // Cancels any running tasks, refills the sparkler and schedules fresh
    // life and flicker tasks from `now_ms`.
    //
    pub fn restart(
        &mut self,
        scheduler: &mut TaskScheduler<GameTask>,
        now_ms: u64,
        config: &GameConfig,
    ) -> Option<WarningChange> {
        self.cancel_tasks();

        self.life = 0;
        self.flicker = 0;
        self.depleted = false;
        self.lit = true;
        let change = self.set_warning(WarningCue::Silent);

        self.step_task = Some(scheduler.schedule_every(
            now_ms,
            config.sparkler_step_ms,
            GameTask::SparklerStep,
        ));
        self.flicker_task = Some(scheduler.schedule_every(
            now_ms,
            config.flicker_step_ms,
            GameTask::Flicker,
        ));

        debug!(target: "game", "Sparkler restarted at {}ms", now_ms);
        change
    }

    //--- on_life_step() ---------------------------------------------------

    pub fn on_life_step(&mut self, paused: bool) -> Option<WarningChange> {
        if paused {
            return self.pause_warning();
        }

        if self.life < SPARKLER_LIFE_STEPS {
            self.life += 1;
        }

        if self.life == WARNING_STEP {
            return self.set_warning(WarningCue::Playing);
        }

        if self.life == SPARKLER_LIFE_STEPS {
            self.depleted = true;
            if let Some(token) = self.step_task.take() {
                token.cancel();
            }
            debug!(target: "game", "Sparkler depleted");
            return self.set_warning(WarningCue::Silent);
        }

        None
    }

    //--- on_flicker() -----------------------------------------------------

    pub fn on_flicker(&mut self, paused: bool) {
        if paused {
            return;
        }

        if self.life < SPARKLER_LIFE_STEPS {
            self.flicker = if self.flicker < FLICKER_FRAMES {
                self.flicker + 1
            } else {
                0
            };
        } else {
            self.flicker = 0;
            if let Some(token) = self.flicker_task.take() {
                token.cancel();
            }
        }
    }

    //--- Pause / Resume ---------------------------------------------------

    fn pause_warning(&mut self) -> Option<WarningChange> {
        if self.warning == WarningCue::Playing {
            self.warning = WarningCue::Paused;
            Some(WarningChange::Pause)
        } else {
            None
        }
    }

    /// Resumes a warning paused while the game was paused.
    pub fn resume(&mut self) -> Option<WarningChange> {
        if self.warning == WarningCue::Paused {
            self.warning = WarningCue::Playing;
            Some(WarningChange::Resume)
        } else {
            None
        }
    }

    fn set_warning(&mut self, next: WarningCue) -> Option<WarningChange> {
        let previous = std::mem::replace(&mut self.warning, next);
        match (previous, next) {
            (WarningCue::Silent, WarningCue::Playing) => Some(WarningChange::Play),
            (WarningCue::Playing | WarningCue::Paused, WarningCue::Silent) => Some(WarningChange::Stop),
            _ => None,
        }
    }

    //--- extinguish() -----------------------------------------------------

    /// Puts the sparkler out once it is depleted. Returns `true` on the
    /// tick the light goes out.
    pub fn extinguish_if_depleted(&mut self) -> bool {
        if self.depleted && self.lit {
            self.lit = false;
            debug!(target: "game", "Sparkler went out");
            return true;
        }
        false
    }

    fn cancel_tasks(&mut self) {
        for token in [self.step_task.take(), self.flicker_task.take()].into_iter().flatten() {
            token.cancel();
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn life(&self) -> u32 {
        self.life
    }

    pub fn flicker(&self) -> u32 {
        self.flicker
    }

    /// The player is carrying a burning sparkler.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    pub fn warning(&self) -> WarningCue {
        self.warning
    }
}

impl Default for SparklerTimer {
    fn default() -> Self {
        Self::new()
    }
}

//=== MatchTimer ==========================================================

/// Elapsed match seconds, frozen while paused.
#[derive(Debug, Clone, Default)]
pub struct MatchTimer {
    start_ms: Option<u64>,
    carried_secs: u64,
    elapsed_secs: u64,
    stopped: bool,
}

impl MatchTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now_ms: u64) {
        self.start_ms = Some(now_ms);
        self.stopped = false;
    }

    /// Recomputes elapsed seconds unless paused or not yet started.
    pub fn update(&mut self, now_ms: u64, paused: bool) -> u64 {
        if paused || self.stopped {
            return self.elapsed_secs;
        }
        if let Some(start) = self.start_ms {
            self.elapsed_secs = now_ms.saturating_sub(start) / 1000 + self.carried_secs;
        }
        self.elapsed_secs
    }

    /// Freezes the time shown; `resume` continues from it.
    pub fn pause(&mut self) {
        self.carried_secs = self.elapsed_secs;
        self.stopped = true;
    }

    pub fn resume(&mut self, now_ms: u64) {
        self.start(now_ms);
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn clock_text(&self) -> String {
        format_clock(self.elapsed_secs)
    }
}

//--- format_clock() ------------------------------------------------------
//
// Four real seconds are one in-universe minute from 11:00 PM. The minute
// only advances on multiples of four seconds and wraps every 240 s.
//
pub fn format_clock(elapsed_secs: u64) -> String {
    let t = elapsed_secs - elapsed_secs % SECONDS_PER_CLOCK_MINUTE;
    let hour = t / 60 / SECONDS_PER_CLOCK_MINUTE + 11;
    let minute = (t % CLOCK_CYCLE_SECS) / SECONDS_PER_CLOCK_MINUTE;
    let period = if hour == 11 { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, minute, period)
}

//=========================================================================
// Unit Tests
//=========================================================================
