//=========================================================================
// Session Flow Tests
//=========================================================================
//
// Full sessions driven only through `GameStateMachine::tick`, the way the
// core thread drives it.
//
//=========================================================================

use glam::Vec3;
use lantern_festival::core::config::GameConfig;
use lantern_festival::core::input::{InputEvent, KeyBindings, KeyCode};
use lantern_festival::game::collision::{Aabb, Collider};
use lantern_festival::game::level::{LevelLayout, LANTERN_COUNT};
use lantern_festival::game::triggers::TriggerKind;
use lantern_festival::game::{FrameSignals, GameEvent, GameState, GameStateMachine};

//=== Helpers =============================================================

const TPS: u64 = 60;

fn machine_with(layout: LevelLayout) -> GameStateMachine {
    GameStateMachine::new(GameConfig::default(), layout, KeyBindings::default())
        .expect("level is valid")
}

fn press(machine: &mut GameStateMachine, key: KeyCode) -> FrameSignals {
    machine.tick(&[vec![InputEvent::KeyDown { key }, InputEvent::KeyUp { key }]])
}

fn run_until(
    machine: &mut GameStateMachine,
    limit: u64,
    mut done: impl FnMut(&FrameSignals) -> bool,
) -> Vec<FrameSignals> {
    let mut frames = Vec::new();
    for _ in 0..limit {
        let signals = machine.tick(&[]);
        let finished = done(&signals);
        frames.push(signals);
        if finished {
            return frames;
        }
    }
    panic!("Condition not reached within {} ticks", limit);
}

fn idle(machine: &mut GameStateMachine, ticks: u64) -> Vec<FrameSignals> {
    (0..ticks).map(|_| machine.tick(&[])).collect()
}

/// Start screen → fade → cutscene → skip → game.
fn enter_game(machine: &mut GameStateMachine) {
    machine.start();
    press(machine, KeyCode::Enter);
    run_until(machine, 60, |s| s.state == Some(GameState::Cutscene));
    let signals = press(machine, KeyCode::Tab);
    assert_eq!(signals.state, Some(GameState::Game));
}

fn count(frames: &[FrameSignals], event: &GameEvent) -> usize {
    frames
        .iter()
        .flat_map(|f| f.events.iter())
        .filter(|e| *e == event)
        .count()
}

/// Every lantern hangs at the start; the destination is on the floor
/// right below it.
fn shortcut_level() -> LevelLayout {
    let start = Vec3::new(0.0, 3.0, 0.0);
    let mut layout = LevelLayout::new()
        .with_start(start)
        .with_fireworks_anchor(Vec3::new(0.0, 0.0, -50.0))
        .with_collider(Collider::solid_box(
            "floor",
            Vec3::new(-20.0, -1.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
        ))
        .with_trigger(
            TriggerKind::Void,
            Aabb::new(Vec3::new(-100.0, -40.0, -100.0), Vec3::new(100.0, -30.0, 100.0)),
        )
        .with_trigger(
            TriggerKind::Destination,
            Aabb::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 1.0, 2.0)),
        )
        .with_trigger(TriggerKind::Corner, Aabb::new(Vec3::splat(40.0), Vec3::splat(41.0)))
        .with_trigger(TriggerKind::FestivalArea, Aabb::new(Vec3::splat(42.0), Vec3::splat(43.0)))
        .with_trigger(TriggerKind::DestinationArea, Aabb::new(Vec3::splat(44.0), Vec3::splat(45.0)));

    for id in 0..LANTERN_COUNT {
        layout = layout.with_lantern(id, start);
    }
    layout
}

//=== Lose ================================================================

#[test]
fn match_is_lost_exactly_once_after_four_minutes() {
    let mut machine = machine_with(LevelLayout::festival());
    enter_game(&mut machine);

    let frames = run_until(&mut machine, 240 * TPS + 10, |s| {
        s.has_event(|e| *e == GameEvent::Lost)
    });

    // Lost on the tick the clock reaches 240 s
    assert_eq!(frames.len() as u64, 240 * TPS);
    let last = frames.last().expect("at least one frame");
    assert_eq!(last.state, Some(GameState::Lose));
    assert_eq!(last.hud.as_ref().map(|h| h.clock_text.as_str()), Some("12:00 AM"));

    let after = idle(&mut machine, 120);
    assert_eq!(count(&frames, &GameEvent::Lost) + count(&after, &GameEvent::Lost), 1);
    assert_eq!(machine.state(), Some(GameState::Lose));

    // Confirm fades back to the title screen
    press(&mut machine, KeyCode::Enter);
    run_until(&mut machine, 60, |s| s.state == Some(GameState::Start));
}

//=== Quit ================================================================

#[test]
fn quitting_from_pause_returns_to_start() {
    let mut machine = machine_with(LevelLayout::festival());
    enter_game(&mut machine);

    let paused = press(&mut machine, KeyCode::Escape);
    assert!(paused.paused);

    let fading = press(&mut machine, KeyCode::KeyQ);
    assert!(fading.fade_level < 1.0);

    let frames = run_until(&mut machine, 60, |s| s.state == Some(GameState::Start));
    assert!(frames.iter().any(|s| s.quit_requested));
    assert!(!frames.iter().any(|s| s.has_event(|e| *e == GameEvent::Lost)));

    // Fresh start screen
    let last = frames.last().expect("at least one frame");
    assert!(!last.paused);
    assert_eq!(last.fade_level, 1.0);
}

#[test]
fn resuming_continues_the_clock() {
    let mut machine = machine_with(LevelLayout::festival());
    enter_game(&mut machine);

    run_until(&mut machine, 10 * TPS, |s| {
        s.hud.as_ref().is_some_and(|h| h.elapsed_secs == 8)
    });
    press(&mut machine, KeyCode::Escape);
    idle(&mut machine, 30 * TPS);
    let resumed = press(&mut machine, KeyCode::Escape);
    assert!(!resumed.paused);
    let elapsed = resumed.hud.map(|h| h.elapsed_secs);
    assert_eq!(elapsed, Some(8), "Paused time is not counted");
}

//=== Win =================================================================

#[test]
fn winning_plays_fireworks_and_leaves_through_the_win_screen() {
    let mut machine = machine_with(shortcut_level());
    enter_game(&mut machine);

    let frames = run_until(&mut machine, 120, |s| s.has_event(|e| *e == GameEvent::Won));
    let won = frames.last().expect("at least one frame");
    assert!(won.paused);
    let hud = won.hud.as_ref().expect("game scene publishes a HUD");
    assert!(hud.win);
    assert_eq!(hud.lanterns_lit, 22);
    assert_eq!(count(&frames, &GameEvent::Won), 1);

    let frames = run_until(&mut machine, 11 * TPS, |s| {
        s.has_event(|e| *e == GameEvent::WinScreen)
    });
    assert_eq!(frames.len() as u64, 10 * TPS, "Win screen after ten seconds");

    let show = run_until(&mut machine, 5_000, |s| {
        s.has_event(|e| matches!(e, GameEvent::FireworkBurst { .. }))
    });
    assert!(show
        .iter()
        .any(|s| s.has_event(|e| matches!(e, GameEvent::FireworkLaunched { .. }))));

    // The win never turns into a loss, however long the show runs
    let late = idle(&mut machine, 240 * TPS);
    assert_eq!(count(&late, &GameEvent::Lost), 0);

    press(&mut machine, KeyCode::Enter);
    run_until(&mut machine, 60, |s| s.state == Some(GameState::Start));
}
