//=========================================================================
// Game World
//=========================================================================
//
// Composition of everything that lives inside the game scene.
//
// Architecture:
// ```text
//   World
//     ├─ level: Arc<Level>          (geometry + trigger volumes)
//     ├─ controller: CharacterController
//     ├─ camera: CameraRig
//     ├─ triggers: TriggerTracker
//     ├─ objectives: ObjectiveTracker
//     └─ fireworks: FireworkShow
// ```
//
// Step order per tick: controller → trigger entries (void, lanterns,
// destination) → camera volumes → camera follow.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::input::InputFrame;
use crate::core::signal_bus::SignalBus;
use super::camera::CameraRig;
use super::controller::CharacterController;
use super::fireworks::{FireworkEvent, FireworkShow};
use super::level::Level;
use super::objectives::{LanternTouch, ObjectiveTracker, WIN_LANTERN_COUNT};
use super::signals::{GameEvent, HudSnapshot, SoundCue};
use super::timers::{MatchTimer, SparklerTimer};
use super::triggers::{TriggerKind, TriggerTracker};

//=== WorldStep ===========================================================

/// Results of one world step the game scene acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldStep {
    /// A lantern touch asked for a sparkler restart.
    pub sparkler_reset: bool,
    /// The destination was reached with every lantern lit.
    pub won: bool,
}

//=== World ===============================================================

pub struct World {
    level: Arc<Level>,
    controller: CharacterController,
    camera: CameraRig,
    triggers: TriggerTracker,
    objectives: ObjectiveTracker,
    fireworks: FireworkShow,
}

impl World {
    /// Sets up a fresh run: player at the start, lantern 0 lit, rockets rolled.
    pub fn new(level: Arc<Level>, config: &GameConfig) -> Self {
        let mut objectives = ObjectiveTracker::new(level.lantern_positions());
        objectives.prelight(0);

        let fireworks = FireworkShow::new(
            level.fireworks_anchor(),
            config.firework_count,
            config.rng_seed,
        );

        Self {
            controller: CharacterController::new(level.start()),
            camera: CameraRig::new(),
            triggers: TriggerTracker::new(),
            objectives,
            fireworks,
            level,
        }
    }

    //--- step() -----------------------------------------------------------

    pub fn step(
        &mut self,
        input: &InputFrame,
        sparkler_lit: bool,
        dt: f32,
        signals: &mut SignalBus<GameEvent>,
    ) -> WorldStep {
        let mut outcome = WorldStep::default();
        let was_running = self.controller.running();

        let report = self
            .controller
            .update(input, &self.camera, self.level.geometry(), dt);
        if report.jumped {
            signals.push(GameEvent::Sound(SoundCue::Jump));
        }
        if report.dash_started {
            signals.push(GameEvent::Sound(SoundCue::Dash));
        }
        if self.controller.running() != was_running {
            signals.push(GameEvent::Sound(SoundCue::Walking(self.controller.running())));
        }

        let body = self.controller.state().body();
        let triggers = self.triggers.update(self.level.triggers(), &body);

        for kind in &triggers.entered {
            match *kind {
                TriggerKind::Void => {
                    self.controller.respawn();
                    signals.push(GameEvent::Sound(SoundCue::Respawn));
                    signals.push(GameEvent::Respawned {
                        position: self.controller.state().position,
                    });
                }
                TriggerKind::Lantern(id) => {
                    outcome.sparkler_reset |= self.touch_lantern(id, sparkler_lit, signals);
                }
                TriggerKind::Destination => {
                    if self.objectives.enter_destination() {
                        self.camera.set_win_pose();
                        signals.push(GameEvent::Won);
                        outcome.won = true;
                    }
                }
                TriggerKind::Corner | TriggerKind::FestivalArea | TriggerKind::DestinationArea => {}
            }
        }

        self.camera.apply_triggers(&triggers, input);
        self.camera.follow(self.controller.state().position);

        outcome
    }

    fn touch_lantern(&mut self, id: usize, sparkler_lit: bool, signals: &mut SignalBus<GameEvent>) -> bool {
        let touch = self.objectives.touch_lantern(id, sparkler_lit);
        match touch {
            LanternTouch::Lit { id, count } => {
                signals.push(GameEvent::LanternLit { id, count });
                signals.push(GameEvent::Sound(SoundCue::LanternLight));
            }
            LanternTouch::Refuel { id } => {
                signals.push(GameEvent::LanternRefueled { id });
                signals.push(GameEvent::Sound(SoundCue::SparklerReset));
            }
            LanternTouch::Ignored => {}
        }
        touch.resets_sparkler()
    }

    //--- Fireworks --------------------------------------------------------

    pub fn start_fireworks(&mut self) {
        info!(target: "game", "Starting the firework show");
        self.fireworks.start();
    }

    /// Advances the show and forwards launches and bursts as events.
    pub fn tick_fireworks(&mut self, signals: &mut SignalBus<GameEvent>) {
        for event in self.fireworks.tick() {
            match event {
                FireworkEvent::Launched { index, position } => {
                    signals.push(GameEvent::Sound(SoundCue::FireworkRocket));
                    signals.push(GameEvent::FireworkLaunched { index, position });
                }
                FireworkEvent::Burst {
                    index,
                    position,
                    emitters,
                } => {
                    signals.push(GameEvent::Sound(SoundCue::FireworkExplosion));
                    signals.push(GameEvent::FireworkBurst {
                        index,
                        position,
                        emitters,
                    });
                }
            }
        }
    }

    //--- hud() ------------------------------------------------------------

    pub fn hud(&self, sparkler: &SparklerTimer, timer: &MatchTimer) -> HudSnapshot {
        let state = self.controller.state();
        let tutorial = self.controller.tutorial();

        HudSnapshot {
            lanterns_lit: self.objectives.lanterns_lit(),
            lantern_total: WIN_LANTERN_COUNT,
            lit_lanterns: self.objectives.lanterns().iter().map(|l| l.is_lit()).collect(),
            win: self.objectives.has_won(),
            elapsed_secs: timer.elapsed_secs(),
            clock_text: timer.clock_text(),
            sparkler_life: sparkler.life(),
            sparkler_flicker: sparkler.flicker(),
            sparkler_lit: sparkler.is_lit(),
            animation: state.animation,
            running: self.controller.running(),
            player_position: state.position,
            player_rotation: state.rotation,
            camera: *self.camera.pose(),
            tutorial,
            show_hint: tutorial.all_done() && !self.objectives.is_lit(1),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn controller(&self) -> &CharacterController {
        &self.controller
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn objectives(&self) -> &ObjectiveTracker {
        &self.objectives
    }

    pub fn fireworks(&self) -> &FireworkShow {
        &self.fireworks
    }

    pub fn has_won(&self) -> bool {
        self.objectives.has_won()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::collision::{Aabb, Collider};
    use crate::game::level::{LevelLayout, LANTERN_COUNT};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    /// Flat test level: start at the origin, lantern 1 right under it,
    /// destination far away.
    fn level_with_lantern_under_start() -> Arc<Level> {
        let mut layout = LevelLayout::new()
            .with_start(Vec3::ZERO)
            .with_fireworks_anchor(Vec3::new(0.0, 0.0, -100.0))
            .with_collider(Collider::solid_box(
                "floor",
                Vec3::new(-50.0, -1.0, -50.0),
                Vec3::new(50.0, 0.0, 50.0),
            ))
            .with_trigger(
                TriggerKind::Void,
                Aabb::new(Vec3::new(-100.0, -40.0, -100.0), Vec3::new(100.0, -30.0, 100.0)),
            )
            .with_trigger(TriggerKind::Destination, Aabb::new(Vec3::new(30.0, 0.0, 30.0), Vec3::new(32.0, 3.0, 32.0)))
            .with_trigger(TriggerKind::Corner, Aabb::new(Vec3::splat(40.0), Vec3::splat(41.0)))
            .with_trigger(TriggerKind::FestivalArea, Aabb::new(Vec3::splat(42.0), Vec3::splat(43.0)))
            .with_trigger(TriggerKind::DestinationArea, Aabb::new(Vec3::splat(44.0), Vec3::splat(45.0)));

        layout = layout.with_lantern(0, Vec3::new(-20.0, 0.0, -20.0));
        layout = layout.with_lantern(1, Vec3::ZERO);
        for id in 2..LANTERN_COUNT {
            layout = layout.with_lantern(id, Vec3::new(20.0, 0.0, id as f32 * 2.0 - 40.0));
        }
        Arc::new(layout.validate().expect("test level is complete"))
    }

    #[test]
    fn new_world_prelights_lantern_zero() {
        let world = World::new(level_with_lantern_under_start(), &GameConfig::default());
        assert!(world.objectives().is_lit(0));
        assert_eq!(world.objectives().lanterns_lit(), 1);
    }

    #[test]
    fn touching_lantern_lights_it_once() {
        let mut world = World::new(level_with_lantern_under_start(), &GameConfig::default());
        let mut signals = SignalBus::new();

        let first = world.step(&InputFrame::neutral(), true, DT, &mut signals);
        assert!(first.sparkler_reset);
        assert!(signals.any(|e| *e == GameEvent::LanternLit { id: 1, count: 2 }));

        // Standing still inside the trigger is not a new entry
        signals.clear();
        let second = world.step(&InputFrame::neutral(), true, DT, &mut signals);
        assert!(!second.sparkler_reset);
        assert!(signals.is_empty());
        assert_eq!(world.objectives().lanterns_lit(), 2);
    }

    #[test]
    fn dark_sparkler_leaves_lantern_unlit() {
        let mut world = World::new(level_with_lantern_under_start(), &GameConfig::default());
        let mut signals = SignalBus::new();

        let step = world.step(&InputFrame::neutral(), false, DT, &mut signals);

        assert!(!step.sparkler_reset);
        assert!(!world.objectives().is_lit(1));
    }

    #[test]
    fn hud_reflects_world() {
        let world = World::new(level_with_lantern_under_start(), &GameConfig::default());
        let hud = world.hud(&SparklerTimer::new(), &MatchTimer::new());

        assert_eq!(hud.lanterns_lit, 1);
        assert_eq!(hud.lantern_total, 22);
        assert_eq!(hud.clock_text, "11:00 PM");
        assert!(hud.lit_lanterns[0]);
        assert!(!hud.show_hint);
    }

    /// Small platform over the void; every lantern is out of reach.
    fn platform_over_void() -> Arc<Level> {
        let mut layout = LevelLayout::new()
            .with_start(Vec3::ZERO)
            .with_fireworks_anchor(Vec3::new(0.0, 0.0, -100.0))
            .with_collider(Collider::solid_box(
                "platform",
                Vec3::new(-2.0, -1.0, -2.0),
                Vec3::new(2.0, 0.0, 2.0),
            ))
            .with_trigger(
                TriggerKind::Void,
                Aabb::new(Vec3::new(-100.0, -40.0, -100.0), Vec3::new(100.0, -30.0, 100.0)),
            )
            .with_trigger(TriggerKind::Destination, Aabb::new(Vec3::splat(30.0), Vec3::splat(32.0)))
            .with_trigger(TriggerKind::Corner, Aabb::new(Vec3::splat(40.0), Vec3::splat(41.0)))
            .with_trigger(TriggerKind::FestivalArea, Aabb::new(Vec3::splat(42.0), Vec3::splat(43.0)))
            .with_trigger(TriggerKind::DestinationArea, Aabb::new(Vec3::splat(44.0), Vec3::splat(45.0)));

        for id in 0..LANTERN_COUNT {
            layout = layout.with_lantern(id, Vec3::new(60.0, 0.0, id as f32 * 2.0));
        }
        Arc::new(layout.validate().expect("test level is complete"))
    }

    #[test]
    fn falling_into_the_void_respawns_at_last_ground() {
        let mut world = World::new(platform_over_void(), &GameConfig::default());
        let mut signals = SignalBus::new();
        let walk = InputFrame {
            horizontal: 1.0,
            horizontal_axis: 1,
            ..InputFrame::neutral()
        };

        let mut respawned = None;
        for _ in 0..600 {
            signals.clear();
            world.step(&walk, true, DT, &mut signals);

            let event = signals.read().iter().find_map(|e| match e {
                GameEvent::Respawned { position } => Some(*position),
                _ => None,
            });
            if event.is_some() {
                respawned = event;
                break;
            }
        }

        let position = respawned.expect("player should fall into the void");
        let state = world.controller().state();
        assert_eq!(position, state.last_ground_position);
        assert_eq!(state.position, state.last_ground_position);
        assert_eq!(position.y, 0.0);
        assert!(position.x.abs() <= 2.0 && position.z.abs() <= 2.0, "Back on the platform");
        assert!(signals.any(|e| *e == GameEvent::Sound(SoundCue::Respawn)));
    }
}
