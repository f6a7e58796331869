//=========================================================================
// Level Layout
//=========================================================================
//
// Description of a playable level and its startup validation.
//
// Architecture:
// ```text
//   LevelLayout (builder, anchors optional)
//        ↓ validate()
//   Level (every anchor present, lantern triggers generated)
//        └─ geometry: StaticLevel, triggers, start, fireworks, lanterns
// ```
//
// A missing anchor is a startup contract violation: `validate` fails and
// the game refuses to start.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::collision::{Aabb, Collider, RampRise, StaticLevel};
use super::triggers::{TriggerKind, TriggerVolume};

//=== Constants ===========================================================

/// Lanterns placed in every level.
pub const LANTERN_COUNT: usize = 22;

/// Half extents of the box around a lantern that lights it on contact.
const LANTERN_TRIGGER_HALF_EXTENTS: Vec3 = Vec3::new(0.8, 1.0, 0.8);

/// Named volumes every level must provide.
const REQUIRED_TRIGGERS: [TriggerKind; 5] = [
    TriggerKind::Destination,
    TriggerKind::Void,
    TriggerKind::Corner,
    TriggerKind::FestivalArea,
    TriggerKind::DestinationArea,
];

//=== LevelError ==========================================================

/// Level description errors, reported once at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("Level has no start position")]
    MissingStart,

    #[error("Level has no fireworks anchor")]
    MissingFireworksAnchor,

    #[error("Lantern slot {0} is missing")]
    MissingLantern(usize),

    #[error("Lantern slot {0} is out of range (0..{LANTERN_COUNT})")]
    UnknownLantern(usize),

    #[error("Lantern slot {0} is defined twice")]
    DuplicateLantern(usize),

    #[error("Trigger volume '{0}' is missing")]
    MissingTrigger(TriggerKind),
}

//=== LevelLayout =========================================================

/// Unvalidated level description.
#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    colliders: Vec<Collider>,
    triggers: Vec<TriggerVolume>,
    start: Option<Vec3>,
    fireworks_anchor: Option<Vec3>,
    lantern_slots: Vec<(usize, Vec3)>,
}

impl LevelLayout {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Builder ----------------------------------------------------------

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn with_trigger(mut self, kind: TriggerKind, bounds: Aabb) -> Self {
        self.triggers.push(TriggerVolume::new(kind, bounds));
        self
    }

    pub fn with_start(mut self, position: Vec3) -> Self {
        self.start = Some(position);
        self
    }

    pub fn with_fireworks_anchor(mut self, position: Vec3) -> Self {
        self.fireworks_anchor = Some(position);
        self
    }

    pub fn with_lantern(mut self, id: usize, position: Vec3) -> Self {
        self.lantern_slots.push((id, position));
        self
    }

    //--- validate() -------------------------------------------------------
    //
    // Checks every anchor the game looks up by name and produces the
    // immutable `Level`. Lantern trigger volumes are generated around the
    // lantern slots.
    //
    pub fn validate(self) -> Result<Level, LevelError> {
        let start = self.start.ok_or(LevelError::MissingStart)?;
        let fireworks_anchor = self
            .fireworks_anchor
            .ok_or(LevelError::MissingFireworksAnchor)?;

        let mut slots: [Option<Vec3>; LANTERN_COUNT] = [None; LANTERN_COUNT];
        for &(id, position) in &self.lantern_slots {
            let slot = slots.get_mut(id).ok_or(LevelError::UnknownLantern(id))?;
            if slot.replace(position).is_some() {
                return Err(LevelError::DuplicateLantern(id));
            }
        }

        let lanterns = slots
            .iter()
            .enumerate()
            .map(|(id, slot)| slot.ok_or(LevelError::MissingLantern(id)))
            .collect::<Result<Vec<_>, _>>()?;

        for required in REQUIRED_TRIGGERS {
            if !self.triggers.iter().any(|t| t.kind == required) {
                return Err(LevelError::MissingTrigger(required));
            }
        }

        let mut triggers = self.triggers;
        triggers.extend(lanterns.iter().enumerate().map(|(id, &position)| {
            TriggerVolume::new(
                TriggerKind::Lantern(id),
                Aabb::from_feet(position, LANTERN_TRIGGER_HALF_EXTENTS),
            )
        }));

        debug!(
            target: "game",
            "Level validated: {} colliders, {} triggers",
            self.colliders.len(),
            triggers.len()
        );

        Ok(Level {
            geometry: StaticLevel::new(self.colliders),
            triggers,
            start,
            fireworks_anchor,
            lanterns,
        })
    }

    //--- festival() -------------------------------------------------------
    //
    // Built-in demo level: a courtyard path with thirteen lanterns, a
    // staircase up to the festival platform holding the last eight, and
    // the destination at the far end.
    //
    pub fn festival() -> Self {
        let mut layout = LevelLayout::new()
            .with_start(Vec3::new(0.0, 0.0, 6.0))
            .with_fireworks_anchor(Vec3::new(5.0, 5.0, -180.0))
            .with_collider(Collider::solid_box(
                "courtyard_collision",
                Vec3::new(-12.0, -1.0, -110.0),
                Vec3::new(12.0, 0.0, 12.0),
            ))
            .with_collider(Collider::stair_ramp(
                "stairs_collision",
                Vec3::new(-6.0, 0.0, -122.0),
                Vec3::new(6.0, 5.0, -110.0),
                RampRise::NegZ,
            ))
            .with_collider(Collider::solid_box(
                "festival_collision",
                Vec3::new(-12.0, 4.0, -170.0),
                Vec3::new(12.0, 5.0, -122.0),
            ))
            .with_trigger(
                TriggerKind::Void,
                Aabb::new(Vec3::new(-200.0, -40.0, -300.0), Vec3::new(200.0, -30.0, 200.0)),
            )
            .with_trigger(
                TriggerKind::Corner,
                Aabb::new(Vec3::new(8.0, 0.0, -60.0), Vec3::new(12.0, 6.0, -50.0)),
            )
            .with_trigger(
                TriggerKind::FestivalArea,
                Aabb::new(Vec3::new(-12.0, 0.0, -126.0), Vec3::new(12.0, 10.0, -116.0)),
            )
            .with_trigger(
                TriggerKind::DestinationArea,
                Aabb::new(Vec3::new(-12.0, 4.0, -158.0), Vec3::new(12.0, 10.0, -150.0)),
            )
            .with_trigger(
                TriggerKind::Destination,
                Aabb::new(Vec3::new(-4.0, 5.0, -168.0), Vec3::new(4.0, 9.0, -160.0)),
            );

        // The camera starts behind the player looking down -z
        layout = layout.with_lantern(0, Vec3::new(4.0, 0.0, 0.0));
        for id in 1..14 {
            let side = if id % 2 == 0 { -5.0 } else { 5.0 };
            layout = layout.with_lantern(id, Vec3::new(side, 0.0, -8.0 * id as f32));
        }
        for id in 14..LANTERN_COUNT {
            let side = if id % 2 == 0 { -6.0 } else { 6.0 };
            let row = ((id - 14) / 2) as f32;
            layout = layout.with_lantern(id, Vec3::new(side, 5.0, -128.0 - 6.0 * row));
        }

        layout
    }
}

//=== Level ===============================================================

/// Validated level; every named anchor is guaranteed to exist.
#[derive(Debug, Clone)]
pub struct Level {
    geometry: StaticLevel,
    triggers: Vec<TriggerVolume>,
    start: Vec3,
    fireworks_anchor: Vec3,
    lanterns: Vec<Vec3>,
}

impl Level {
    pub fn geometry(&self) -> &StaticLevel {
        &self.geometry
    }

    pub fn triggers(&self) -> &[TriggerVolume] {
        &self.triggers
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn fireworks_anchor(&self) -> Vec3 {
        self.fireworks_anchor
    }

    /// Lantern positions indexed by lantern id.
    pub fn lantern_positions(&self) -> &[Vec3] {
        &self.lanterns
    }

    /// Bounds of the first trigger of `kind`.
    pub fn trigger_bounds(&self, kind: TriggerKind) -> Option<Aabb> {
        self.triggers.iter().find(|t| t.kind == kind).map(|t| t.bounds)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
