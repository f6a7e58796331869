//=========================================================================
// Game Signals
//=========================================================================
//
// Outbound data read by the presentation layer once per tick.
//
// Architecture:
// ```text
//   Scenes ── push(GameEvent) ──→ SignalBus<GameEvent>
//                                      ↓ drain() after the tick
//   FrameSignals::collect() ──→ { hud: last HudUpdated, events: the rest }
//                                      ↓
//   Renderer / audio / window title
// ```
//
// `HudSnapshot` is the full gameplay picture for the tick; `GameEvent`s
// are the discrete things that happened during it.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::globals::SessionState;
use super::camera::CameraPose;
use super::controller::{AnimationTag, TutorialFlags};
use super::fireworks::BurstEmitter;
use super::state_machine::GameState;
use super::timers::WarningChange;

//=== SoundCue ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Dash,
    /// Player fell into the void and was put back.
    Respawn,
    /// A lantern lit up.
    LanternLight,
    /// Sparkler refilled from a lit lantern.
    SparklerReset,
    Warning(WarningChange),
    FireworkRocket,
    FireworkExplosion,
    /// Footstep loop starts or stops.
    Walking(bool),
}

//=== GameEvent ===========================================================

/// Discrete event raised during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged { from: Option<GameState>, to: GameState },
    LanternLit { id: usize, count: u32 },
    LanternRefueled { id: usize },
    Sound(SoundCue),
    FireworkLaunched { index: usize, position: Vec3 },
    FireworkBurst {
        index: usize,
        position: Vec3,
        emitters: Vec<BurstEmitter>,
    },
    /// Destination reached with every lantern lit.
    Won,
    /// Win delay elapsed; show the win screen.
    WinScreen,
    /// Match time ran out.
    Lost,
    Respawned { position: Vec3 },
    DialogueFrame(u8),
    PauseChanged(bool),
    /// Gameplay snapshot for this tick.
    HudUpdated(HudSnapshot),
}

//=== HudSnapshot =========================================================

/// Everything the HUD and renderer need from the game scene.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub lanterns_lit: u32,
    pub lantern_total: u32,
    /// Lit flag per lantern id.
    pub lit_lanterns: Vec<bool>,
    pub win: bool,
    pub elapsed_secs: u64,
    pub clock_text: String,
    pub sparkler_life: u32,
    pub sparkler_flicker: u32,
    pub sparkler_lit: bool,
    pub animation: AnimationTag,
    pub running: bool,
    pub player_position: Vec3,
    pub player_rotation: Quat,
    pub camera: CameraPose,
    pub tutorial: TutorialFlags,
    /// Direction hint after the tutorial, until lantern 1 is lit.
    pub show_hint: bool,
}

impl HudSnapshot {
    pub fn lantern_text(&self) -> String {
        format!("Lanterns: {} / {}", self.lanterns_lit, self.lantern_total)
    }
}

//=== FrameSignals ========================================================

/// Per-tick output of the state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSignals {
    pub tick: u64,
    /// Active scene; `None` before the first scene is ready.
    pub state: Option<GameState>,
    /// A scene switch is loading.
    pub loading: bool,
    pub paused: bool,
    pub quit_requested: bool,
    pub fade_level: f32,
    /// Latest gameplay snapshot, present while the game scene runs.
    pub hud: Option<HudSnapshot>,
    pub events: Vec<GameEvent>,
}

impl FrameSignals {
    /// Splits drained events into the HUD snapshot and the rest.
    pub fn collect(
        tick: u64,
        state: Option<GameState>,
        loading: bool,
        session: &SessionState,
        drained: Vec<GameEvent>,
    ) -> Self {
        let mut hud = None;
        let mut events = Vec::with_capacity(drained.len());

        for event in drained {
            match event {
                GameEvent::HudUpdated(snapshot) => hud = Some(snapshot),
                other => events.push(other),
            }
        }

        Self {
            tick,
            state,
            loading,
            paused: session.paused,
            quit_requested: session.quit_requested,
            fade_level: session.fade_level(),
            hud,
            events,
        }
    }

    pub fn has_event(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }

    /// Short status line for the window title.
    pub fn title(&self) -> String {
        let state = match self.state {
            Some(state) => format!("{:?}", state),
            None => "Loading".to_string(),
        };

        match &self.hud {
            Some(hud) => {
                let paused = if self.paused { " | Paused" } else { "" };
                format!(
                    "Lantern Festival | {} | {} | {}{}",
                    state,
                    hud.lantern_text(),
                    hud.clock_text,
                    paused
                )
            }
            None => format!("Lantern Festival | {}", state),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(lit: u32) -> HudSnapshot {
        HudSnapshot {
            lanterns_lit: lit,
            lantern_total: 22,
            lit_lanterns: vec![false; 22],
            win: false,
            elapsed_secs: 0,
            clock_text: "11:00 PM".to_string(),
            sparkler_life: 0,
            sparkler_flicker: 0,
            sparkler_lit: true,
            animation: AnimationTag::Idle,
            running: false,
            player_position: Vec3::ZERO,
            player_rotation: Quat::IDENTITY,
            camera: CameraPose::default(),
            tutorial: TutorialFlags::default(),
            show_hint: false,
        }
    }

    #[test]
    fn collect_keeps_last_snapshot_and_other_events() {
        let session = SessionState::new();
        let drained = vec![
            GameEvent::HudUpdated(snapshot(1)),
            GameEvent::LanternLit { id: 4, count: 2 },
            GameEvent::HudUpdated(snapshot(2)),
        ];

        let signals = FrameSignals::collect(7, Some(GameState::Game), false, &session, drained);

        assert_eq!(signals.tick, 7);
        assert_eq!(signals.hud.as_ref().map(|h| h.lanterns_lit), Some(2));
        assert_eq!(signals.events, vec![GameEvent::LanternLit { id: 4, count: 2 }]);
        assert!(signals.has_event(|e| matches!(e, GameEvent::LanternLit { .. })));
    }

    #[test]
    fn title_shows_progress_in_game() {
        let mut session = SessionState::new();
        session.paused = true;

        let signals = FrameSignals::collect(
            1,
            Some(GameState::Game),
            false,
            &session,
            vec![GameEvent::HudUpdated(snapshot(5))],
        );

        assert_eq!(
            signals.title(),
            "Lantern Festival | Game | Lanterns: 5 / 22 | 11:00 PM | Paused"
        );
    }

    #[test]
    fn title_without_hud_names_the_state() {
        let signals = FrameSignals::collect(0, None, true, &SessionState::new(), Vec::new());
        assert_eq!(signals.title(), "Lantern Festival | Loading");
    }
}
