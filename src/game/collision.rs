//=========================================================================
// Collision World
//=========================================================================
//
// Collision queries consumed by the ground probe and the controller.
//
// Architecture:
// ```text
//   CollisionWorld (trait)
//     ├─ raycast(origin, dir, max, filter) → Option<RayHit>
//     └─ move_with_collisions(pos, extents, delta) → resolved pos
//
//   StaticLevel: Vec<Collider>
//     Collider { shape: Box | Ramp, surface: Solid | Stair,
//                pickable, enabled, solid }
// ```
//
// Bodies are axis-aligned boxes whose origin sits at the feet. Movement
// resolves one axis at a time (Y, X, Z) against solid boxes and the tall
// faces of ramps, then settles the feet onto any solid ramp under the
// body's centre.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Constants ===========================================================

const EPSILON: f32 = 1e-4;

/// Largest gap below the feet a downhill move still sticks to a ramp.
const RAMP_SNAP: f32 = 0.3;

/// Deepest the feet may sink into a ramp and still be lifted onto it.
const RAMP_STEP: f32 = 1.0;

/// Tallest ledge a horizontal move climbs instead of being blocked.
const STEP_HEIGHT: f32 = 0.35;

//=== Aabb ================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of a body standing at `feet` with the given half extents.
    pub fn from_feet(feet: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: Vec3::new(feet.x - half_extents.x, feet.y, feet.z - half_extents.z),
            max: Vec3::new(
                feet.x + half_extents.x,
                feet.y + half_extents.y * 2.0,
                feet.z + half_extents.z,
            ),
        }
    }

    /// Strict overlap; touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x - EPSILON
            && self.max.x > other.min.x + EPSILON
            && self.min.y < other.max.y - EPSILON
            && self.max.y > other.min.y + EPSILON
            && self.min.z < other.max.z - EPSILON
            && self.max.z > other.min.z + EPSILON
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    //--- ray_hit() --------------------------------------------------------
    //
    // Slab test. Returns the entry distance and the normal of the face the
    // ray enters through. A ray starting inside reports distance 0 with a
    // normal facing back along the ray.
    //
    fn ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        const AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

        let mut t_enter = 0.0_f32;
        let mut t_exit = max_distance;
        let mut normal = Vec3::ZERO;

        for (axis, unit) in AXES.iter().enumerate() {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < EPSILON {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }

            let mut t0 = (self.min[axis] - o) / d;
            let mut t1 = (self.max[axis] - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = *unit * -d.signum();
            }
            t_exit = t_exit.min(t1);

            if t_enter > t_exit {
                return None;
            }
        }

        if normal == Vec3::ZERO {
            normal = -direction;
        }
        Some((t_enter, normal))
    }
}

//=== Ramp ================================================================

/// Direction a ramp climbs toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampRise {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

/// Wedge whose top face climbs from `bounds.min.y` to `bounds.max.y`
/// across its footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub bounds: Aabb,
    pub rise: RampRise,
}

impl Ramp {
    fn covers(&self, x: f32, z: f32) -> bool {
        x >= self.bounds.min.x
            && x <= self.bounds.max.x
            && z >= self.bounds.min.z
            && z <= self.bounds.max.z
    }

    /// Fraction of the climb completed at `(x, z)`, in `[0, 1]`.
    fn progress(&self, x: f32, z: f32) -> f32 {
        let (min, max) = (self.bounds.min, self.bounds.max);
        let t = match self.rise {
            RampRise::PosX => (x - min.x) / (max.x - min.x),
            RampRise::NegX => (max.x - x) / (max.x - min.x),
            RampRise::PosZ => (z - min.z) / (max.z - min.z),
            RampRise::NegZ => (max.z - z) / (max.z - min.z),
        };
        t.clamp(0.0, 1.0)
    }

    /// Top-face height at `(x, z)`.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let rise = self.bounds.max.y - self.bounds.min.y;
        self.bounds.min.y + rise * self.progress(x, z)
    }

    /// Height gained per unit moved along x and z.
    fn gradient(&self) -> (f32, f32) {
        let (min, max) = (self.bounds.min, self.bounds.max);
        let rise = max.y - min.y;
        match self.rise {
            RampRise::PosX => (rise / (max.x - min.x), 0.0),
            RampRise::NegX => (-rise / (max.x - min.x), 0.0),
            RampRise::PosZ => (0.0, rise / (max.z - min.z)),
            RampRise::NegZ => (0.0, -rise / (max.z - min.z)),
        }
    }

    /// Unit normal of the top face.
    pub fn normal(&self) -> Vec3 {
        let (gx, gz) = self.gradient();
        Vec3::new(-gx, 1.0, -gz).normalize()
    }

    fn ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let (gx, gz) = self.gradient();
        let above = origin.y - self.height_at(origin.x, origin.z);

        if above < 0.0 {
            // Starting inside the wedge
            let inside = self.covers(origin.x, origin.z) && origin.y >= self.bounds.min.y;
            return inside.then_some((0.0, self.normal()));
        }

        let approach = direction.y - gx * direction.x - gz * direction.z;
        if approach >= -EPSILON {
            return None;
        }

        let t = -above / approach;
        if t > max_distance {
            return None;
        }

        let point = origin + direction * t;
        self.covers(point.x, point.z).then_some((t, self.normal()))
    }
}

//=== Collider ============================================================

/// Surface category used by slope detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Solid,
    Stair,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box(Aabb),
    Ramp(Ramp),
}

/// One piece of static level geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub name: String,
    pub shape: Shape,
    pub surface: SurfaceKind,
    /// Visible to raycasts.
    pub pickable: bool,
    pub enabled: bool,
    /// Blocks body movement.
    pub solid: bool,
}

impl Collider {
    pub fn solid_box(name: impl Into<String>, min: Vec3, max: Vec3) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Box(Aabb::new(min, max)),
            surface: SurfaceKind::Solid,
            pickable: true,
            enabled: true,
            solid: true,
        }
    }

    pub fn stair_ramp(name: impl Into<String>, min: Vec3, max: Vec3, rise: RampRise) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Ramp(Ramp {
                bounds: Aabb::new(min, max),
                rise,
            }),
            surface: SurfaceKind::Stair,
            pickable: true,
            enabled: true,
            solid: true,
        }
    }

    /// Hidden from raycasts (decorative or non-standable).
    pub fn not_pickable(mut self) -> Self {
        self.pickable = false;
        self
    }

    /// Lets bodies pass through.
    pub fn passable(mut self) -> Self {
        self.solid = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        match &self.shape {
            Shape::Box(aabb) => aabb.ray_hit(origin, direction, max_distance),
            Shape::Ramp(ramp) => ramp.ray_hit(origin, direction, max_distance),
        }
    }
}

/// Ray filter matching geometry the player can stand on.
pub fn pickable_and_enabled(collider: &Collider) -> bool {
    collider.pickable && collider.enabled
}

//=== RayHit ==============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub surface: SurfaceKind,
    /// Index of the collider that was hit.
    pub collider: usize,
}

//=== CollisionWorld ======================================================

/// Collision queries the gameplay core needs from the surrounding engine.
pub trait CollisionWorld {
    /// Nearest hit along `direction` within `max_distance`, considering
    /// only colliders accepted by `filter`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &dyn Fn(&Collider) -> bool,
    ) -> Option<RayHit>;

    /// Moves a body standing at `position` by `delta`, sliding along
    /// blocking geometry. Returns the resolved feet position.
    fn move_with_collisions(&self, position: Vec3, half_extents: Vec3, delta: Vec3) -> Vec3;
}

//=== StaticLevel =========================================================

/// Immutable collider list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticLevel {
    colliders: Vec<Collider>,
}

impl StaticLevel {
    pub fn new(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn find(&self, name: &str) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.name == name)
    }

    fn blocking_boxes(&self) -> impl Iterator<Item = &Aabb> {
        self.colliders
            .iter()
            .filter(|c| c.solid && c.enabled)
            .filter_map(|c| match &c.shape {
                Shape::Box(aabb) => Some(aabb),
                Shape::Ramp(_) => None,
            })
    }

    fn blocking_ramps(&self) -> impl Iterator<Item = &Ramp> {
        self.colliders
            .iter()
            .filter(|c| c.solid && c.enabled)
            .filter_map(|c| match &c.shape {
                Shape::Ramp(ramp) => Some(ramp),
                Shape::Box(_) => None,
            })
    }

    //--- resolve_axis() ---------------------------------------------------
    //
    // Pushes the body out of every blocking box it overlaps, back against
    // the direction it travelled on `axis`. Horizontal moves climb ledges
    // no taller than STEP_HEIGHT.
    //
    fn resolve_axis(&self, position: &mut Vec3, half_extents: Vec3, axis: usize, travel: f32) {
        if travel == 0.0 {
            return;
        }

        for aabb in self.blocking_boxes() {
            let body = Aabb::from_feet(*position, half_extents);
            if !body.intersects(aabb) {
                continue;
            }

            let ledge = aabb.max.y - position.y;
            if axis != 1 && ledge <= STEP_HEIGHT {
                position.y = aabb.max.y;
                continue;
            }

            // Offsets from the feet origin to the body's faces on this axis
            let (low, high) = if axis == 1 {
                (0.0, half_extents.y * 2.0)
            } else {
                (-half_extents[axis], half_extents[axis])
            };

            position[axis] = if travel > 0.0 {
                aabb.min[axis] - high
            } else {
                aabb.max[axis] - low
            };
        }

        if axis != 1 {
            self.resolve_ramp_walls(position, half_extents, axis, travel);
        }
    }

    //--- resolve_ramp_walls() ---------------------------------------------
    //
    // A ramp is a wall wherever its surface under the body's footprint
    // stands more than STEP_HEIGHT above the feet: its high end and the
    // upper part of its sides. Lower parts are left to settle_on_ramps.
    //
    fn resolve_ramp_walls(&self, position: &mut Vec3, half_extents: Vec3, axis: usize, travel: f32) {
        for ramp in self.blocking_ramps() {
            let body = Aabb::from_feet(*position, half_extents);
            let bounds = &ramp.bounds;

            let overlaps = body.min.x < bounds.max.x - EPSILON
                && body.max.x > bounds.min.x + EPSILON
                && body.min.z < bounds.max.z - EPSILON
                && body.max.z > bounds.min.z + EPSILON
                && body.max.y > bounds.min.y + EPSILON;
            if !overlaps {
                continue;
            }

            let footprint_x = position.x.clamp(bounds.min.x, bounds.max.x);
            let footprint_z = position.z.clamp(bounds.min.z, bounds.max.z);
            let wall = ramp.height_at(footprint_x, footprint_z) - position.y;
            if wall <= STEP_HEIGHT {
                continue;
            }

            position[axis] = if travel > 0.0 {
                bounds.min[axis] - half_extents[axis]
            } else {
                bounds.max[axis] + half_extents[axis]
            };
        }
    }

    fn settle_on_ramps(&self, position: &mut Vec3, travel_y: f32) {
        for ramp in self.blocking_ramps() {
            if !ramp.covers(position.x, position.z) {
                continue;
            }

            let surface = ramp.height_at(position.x, position.z);
            let gap = position.y - surface;

            let sunk = gap < 0.0 && -gap <= RAMP_STEP;
            let hovering = travel_y <= 0.0 && gap > 0.0 && gap <= RAMP_SNAP;
            if sunk || hovering {
                position.y = surface;
            }
        }
    }
}

impl CollisionWorld for StaticLevel {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &dyn Fn(&Collider) -> bool,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, collider)| filter(collider))
            .filter_map(|(index, collider)| {
                collider
                    .ray_hit(origin, direction, max_distance)
                    .map(|(distance, normal)| RayHit {
                        point: origin + direction * distance,
                        normal,
                        distance,
                        surface: collider.surface,
                        collider: index,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn move_with_collisions(&self, position: Vec3, half_extents: Vec3, delta: Vec3) -> Vec3 {
        let mut resolved = position;

        resolved.y += delta.y;
        self.resolve_axis(&mut resolved, half_extents, 1, delta.y);

        resolved.x += delta.x;
        self.resolve_axis(&mut resolved, half_extents, 0, delta.x);

        resolved.z += delta.z;
        self.resolve_axis(&mut resolved, half_extents, 2, delta.z);

        self.settle_on_ramps(&mut resolved, delta.y);
        resolved
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
