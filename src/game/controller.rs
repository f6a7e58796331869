//=========================================================================
// Character Controller
//=========================================================================
//
// Per-tick player movement: camera-relative walking, jump, air dash,
// gravity, ground detection and animation selection.
//
// Architecture:
// ```text
//   InputFrame + CameraRig + CollisionWorld
//        ↓ update()
//   1. tutorial flags
//   2. dash start / dash frames → move direction
//   3. facing (skipped without a held direction)
//   4. ground & slope detection, gravity
//   5. move_with_collisions(move + gravity)
//   6. landing reset, then jump
//   7. animation tag
//        ↓
//   PlayerState (plain data) + StepReport (what happened this tick)
// ```
//
// Gravity is a per-tick displacement, not a velocity scaled by dt: the
// accumulator gains `dt * GRAVITY` each airborne tick and is applied as
// is, clamped at `-JUMP_FORCE`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::input::InputFrame;
use super::camera::CameraRig;
use super::collision::{Aabb, CollisionWorld};
use super::ground_probe::GroundProbe;

//=== Constants ===========================================================

pub const PLAYER_SPEED: f32 = 0.45;
pub const JUMP_FORCE: f32 = 0.80;
pub const GRAVITY: f32 = -2.8;
pub const DASH_FACTOR: f32 = 2.5;

/// Last dash frame that still moves at `DASH_FACTOR`.
pub const DASH_TIME: u32 = 10;

/// Facing slerp speed, scaled by dt.
const TURN_RATE: f32 = 10.0;

/// Half extents of the player's collision box (2 wide, 3 tall, 1 deep).
pub const BODY_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 1.5, 0.5);

//=== DashState ===========================================================

/// Air dash lifecycle. A dash is available again only after landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashState {
    #[default]
    Idle,
    /// Dashing; the value is the frame index since the dash began.
    Dashing(u32),
    /// Dash used up; waits for the next landing.
    CooldownUntilGrounded,
}

impl DashState {
    pub fn can_dash(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self, Self::Dashing(_))
    }
}

//=== AnimationTag ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationTag {
    #[default]
    Idle,
    Run,
    Jump,
    Land,
    Dash,
}

//=== PlayerState =========================================================

/// Plain player data read by the renderer and the objectives.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Feet position.
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical displacement applied per tick.
    pub gravity: Vec3,
    pub grounded: bool,
    /// Remaining jumps, 0 or 1.
    pub jump_charges: u8,
    pub dash: DashState,
    pub falling: bool,
    pub jumped: bool,
    pub last_ground_position: Vec3,
    pub animation: AnimationTag,
}

impl PlayerState {
    pub fn spawn(position: Vec3) -> Self {
        Self {
            position,
            // Facing away from the camera
            rotation: Quat::from_xyzw(0.0, 1.0, 0.0, 0.0),
            gravity: Vec3::ZERO,
            grounded: false,
            jump_charges: 1,
            dash: DashState::Idle,
            falling: false,
            jumped: false,
            last_ground_position: position,
            animation: AnimationTag::Idle,
        }
    }

    /// Collision box around the player.
    pub fn body(&self) -> Aabb {
        Aabb::from_feet(self.position, BODY_HALF_EXTENTS)
    }
}

//=== TutorialFlags =======================================================

/// First-use flags; each flips to true once and stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TutorialFlags {
    pub moved: bool,
    pub jumped: bool,
    pub dashed: bool,
}

impl TutorialFlags {
    pub fn all_done(&self) -> bool {
        self.moved && self.jumped && self.dashed
    }
}

//=== StepReport ==========================================================

/// What changed during one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub jumped: bool,
    pub dash_started: bool,
    pub landed: bool,
}

//=== CharacterController =================================================

#[derive(Debug, Clone)]
pub struct CharacterController {
    state: PlayerState,
    tutorial: TutorialFlags,
    running: bool,
}

impl CharacterController {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            state: PlayerState::spawn(spawn),
            tutorial: TutorialFlags::default(),
            running: false,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn tutorial(&self) -> TutorialFlags {
        self.tutorial
    }

    /// Running animation is playing (drives the footstep loop).
    pub fn running(&self) -> bool {
        self.running
    }

    //--- update() ---------------------------------------------------------
    //
    // One fixed tick of movement. `dt` is the tick length in seconds.
    //
    pub fn update<W: CollisionWorld + ?Sized>(
        &mut self,
        input: &InputFrame,
        camera: &CameraRig,
        world: &W,
        dt: f32,
    ) -> StepReport {
        let mut report = StepReport::default();

        if input.horizontal != 0.0 || input.vertical != 0.0 {
            self.tutorial.moved = true;
        }

        report.dash_started = self.start_dash(input);
        let move_direction = self.move_direction(input, camera);
        self.turn(input, camera, dt);

        self.integrate_gravity(world, dt);
        let state = &mut self.state;
        state.position = world.move_with_collisions(
            state.position,
            BODY_HALF_EXTENTS,
            move_direction + state.gravity,
        );

        report.landed = self.land_if_grounded(world);

        if input.jump_key_down && self.state.jump_charges > 0 {
            let state = &mut self.state;
            state.gravity.y = JUMP_FORCE;
            state.jump_charges -= 1;
            state.jumped = true;
            state.falling = false;
            state.grounded = false;
            self.tutorial.jumped = true;
            report.jumped = true;
            trace!(target: "game", "Jump from {:?}", state.position);
        }

        self.animate(input, report.dash_started);
        report
    }

    //--- Dash -------------------------------------------------------------

    fn start_dash(&mut self, input: &InputFrame) -> bool {
        let state = &mut self.state;
        if !(input.dashing && state.dash.can_dash() && !state.grounded) {
            return false;
        }

        state.dash = DashState::Dashing(0);
        self.tutorial.dashed = true;
        debug!(target: "game", "Dash started at {:?}", state.position);
        true
    }

    /// Advances the dash and returns this tick's speed multiplier.
    fn dash_factor(&mut self) -> f32 {
        match self.state.dash {
            DashState::Dashing(frame) if frame > DASH_TIME => {
                self.state.dash = DashState::CooldownUntilGrounded;
                1.0
            }
            DashState::Dashing(frame) => {
                self.state.dash = DashState::Dashing(frame + 1);
                DASH_FACTOR
            }
            _ => 1.0,
        }
    }

    //--- Movement ---------------------------------------------------------

    fn move_direction(&mut self, input: &InputFrame, camera: &CameraRig) -> Vec3 {
        let dash_factor = self.dash_factor();

        let planar = camera.right() * input.horizontal + camera.forward() * input.vertical;
        let planar = planar.normalize_or_zero() * dash_factor;

        let amount = (input.horizontal.abs() + input.vertical.abs()).clamp(0.0, 1.0);
        Vec3::new(planar.x, 0.0, planar.z) * (amount * PLAYER_SPEED)
    }

    fn turn(&mut self, input: &InputFrame, camera: &CameraRig, dt: f32) {
        if !input.has_direction() {
            return;
        }

        let angle = (input.horizontal_axis as f32).atan2(input.vertical_axis as f32) + camera.yaw();
        let target = Quat::from_rotation_y(angle);
        self.state.rotation = self
            .state
            .rotation
            .slerp(target, (TURN_RATE * dt).min(1.0));
    }

    //--- Ground Detection -------------------------------------------------

    fn integrate_gravity<W: CollisionWorld + ?Sized>(&mut self, world: &W, dt: f32) {
        let probe = GroundProbe::new(world, self.state.position);
        let state = &mut self.state;

        if !probe.is_grounded() {
            if probe.check_slope() && state.gravity.y <= 0.0 {
                state.gravity.y = 0.0;
                state.jump_charges = 1;
                state.grounded = true;
            } else {
                state.gravity.y += dt * GRAVITY;
                state.grounded = false;
            }
        }

        state.gravity.y = state.gravity.y.max(-JUMP_FORCE);

        if state.gravity.y < 0.0 && state.jumped {
            state.falling = true;
        }
    }

    fn land_if_grounded<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        if !GroundProbe::new(world, self.state.position).is_grounded() {
            return false;
        }

        let state = &mut self.state;
        let was_airborne = state.jumped || state.falling || !state.grounded;

        state.gravity.y = 0.0;
        state.grounded = true;
        state.last_ground_position = state.position;
        state.jump_charges = 1;
        state.dash = DashState::Idle;
        state.jumped = false;
        state.falling = false;

        was_airborne
    }

    //--- animate() --------------------------------------------------------
    //
    // Dash → Run → Jump → Idle → Land; no match keeps the previous tag.
    //
    fn animate(&mut self, input: &InputFrame, dash_started: bool) {
        let state = &mut self.state;
        let dashing = state.dash.is_dashing();

        if dash_started {
            state.animation = AnimationTag::Dash;
        }

        if !dashing && !state.falling && !state.jumped && input.has_direction() {
            state.animation = AnimationTag::Run;
            self.running = true;
        } else if state.jumped && !state.falling && !dashing {
            state.animation = AnimationTag::Jump;
        } else if !state.falling && state.grounded {
            state.animation = AnimationTag::Idle;
            self.running = false;
        } else if state.falling {
            state.animation = AnimationTag::Land;
        }
    }

    //--- respawn() --------------------------------------------------------

    /// Teleports back to the last grounded position.
    pub fn respawn(&mut self) {
        self.state.position = self.state.last_ground_position;
        debug!(target: "game", "Respawned at {:?}", self.state.position);
    }

    /// Turns the player to face `direction` on the horizontal plane.
    pub fn face(&mut self, direction: Vec3) {
        if let Some(dir) = Vec3::new(direction.x, 0.0, direction.z).try_normalize() {
            self.state.rotation = Quat::from_rotation_y(dir.x.atan2(dir.z));
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
