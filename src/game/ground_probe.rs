//=========================================================================
// Ground Probe
//=========================================================================
//
// Raycast-based grounded and slope classification.
//
// Architecture:
// ```text
//   GroundProbe { world, position }
//     ├─ floor_raycast(ox, oz, len) → Option<Vec3>   (from feet + 0.5)
//     ├─ is_grounded()              → ray (0, 0, 0.6)
//     └─ check_slope()              → front, back, right, left rays
// ```
//
// Only pickable, enabled geometry is considered. The probe borrows the
// world for a single query pass and holds no state between ticks.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::collision::{pickable_and_enabled, CollisionWorld, RayHit, SurfaceKind};

//=== Constants ===========================================================

/// Height above the feet the floor rays start from.
const RAY_LIFT: f32 = 0.5;

/// Length of the straight-down grounded ray.
const GROUNDED_RAY_LENGTH: f32 = 0.6;

/// Horizontal offset of the slope rays.
const SLOPE_RAY_OFFSET: f32 = 0.25;

const SLOPE_RAY_LENGTH: f32 = 1.5;

/// Normals closer than this to straight up count as flat.
const FLAT_TOLERANCE: f32 = 1e-3;

//=== SurfaceTag ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceTag {
    Flat,
    Slope,
    #[default]
    None,
}

//=== GroundSample ========================================================

/// One downward ray result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundSample {
    pub hit: bool,
    pub point: Vec3,
    pub normal: Vec3,
    pub surface: SurfaceTag,
    /// Hit geometry is tagged as stairs.
    pub stair: bool,
}

impl GroundSample {
    fn from_hit(hit: Option<RayHit>) -> Self {
        let Some(hit) = hit else {
            return Self::default();
        };

        let surface = if hit.normal.abs_diff_eq(Vec3::Y, FLAT_TOLERANCE) {
            SurfaceTag::Flat
        } else {
            SurfaceTag::Slope
        };

        Self {
            hit: true,
            point: hit.point,
            normal: hit.normal,
            surface,
            stair: hit.surface == SurfaceKind::Stair,
        }
    }

    /// Sloped stair geometry; what the controller treats as walkable slope.
    pub fn is_stair_slope(&self) -> bool {
        self.hit && self.surface == SurfaceTag::Slope && self.stair
    }
}

//=== GroundProbe =========================================================

/// Floor queries for a body standing at `position`.
pub struct GroundProbe<'a, W: CollisionWorld + ?Sized> {
    world: &'a W,
    position: Vec3,
}

impl<'a, W: CollisionWorld + ?Sized> GroundProbe<'a, W> {
    pub fn new(world: &'a W, position: Vec3) -> Self {
        Self { world, position }
    }

    /// Casts down from half a unit above the feet, offset horizontally.
    pub fn sample(&self, offset_x: f32, offset_z: f32, max_length: f32) -> GroundSample {
        let origin = Vec3::new(
            self.position.x + offset_x,
            self.position.y + RAY_LIFT,
            self.position.z + offset_z,
        );
        let hit = self
            .world
            .raycast(origin, Vec3::NEG_Y, max_length, &pickable_and_enabled);
        GroundSample::from_hit(hit)
    }

    /// Hit point of a downward ray, if any.
    pub fn floor_raycast(&self, offset_x: f32, offset_z: f32, max_length: f32) -> Option<Vec3> {
        let sample = self.sample(offset_x, offset_z, max_length);
        sample.hit.then_some(sample.point)
    }

    pub fn is_grounded(&self) -> bool {
        self.floor_raycast(0.0, 0.0, GROUNDED_RAY_LENGTH).is_some()
    }

    //--- check_slope() ----------------------------------------------------
    //
    // Front, back, right and left rays in that order. The first ray that
    // lands on sloped geometry decides; it only counts if that geometry is
    // tagged as stairs.
    //
    pub fn check_slope(&self) -> bool {
        const OFFSETS: [(f32, f32); 4] = [
            (0.0, SLOPE_RAY_OFFSET),
            (0.0, -SLOPE_RAY_OFFSET),
            (SLOPE_RAY_OFFSET, 0.0),
            (-SLOPE_RAY_OFFSET, 0.0),
        ];

        OFFSETS
            .iter()
            .map(|&(ox, oz)| self.sample(ox, oz, SLOPE_RAY_LENGTH))
            .find(|sample| sample.hit && sample.surface == SurfaceTag::Slope)
            .is_some_and(|sample| sample.stair)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
