//=========================================================================
// Trigger Volumes
//=========================================================================
//
// Non-colliding regions tested against the player body every tick.
//
// `TriggerTracker` remembers which volumes the body was inside last tick
// so entry fires once per visit, while `overlapping` answers continuous
// "is the body inside?" queries for camera volumes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;

//=== Internal Dependencies ===============================================

use super::collision::Aabb;

//=== TriggerKind =========================================================

/// What a trigger volume means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Finish line; wins when every lantern is lit.
    Destination,
    /// Catch-all plane under the level; respawns the player.
    Void,
    /// Lantern with the given id.
    Lantern(usize),
    /// Turns the camera around the level's corner.
    Corner,
    /// Tilts the camera down over the festival.
    FestivalArea,
    /// Tilts the camera back up near the destination.
    DestinationArea,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destination => write!(f, "destination"),
            Self::Void => write!(f, "ground"),
            Self::Lantern(id) => write!(f, "lantern{}", id),
            Self::Corner => write!(f, "cornerTrigger"),
            Self::FestivalArea => write!(f, "festivalTrigger"),
            Self::DestinationArea => write!(f, "destinationTrigger"),
        }
    }
}

//=== TriggerVolume =======================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    pub kind: TriggerKind,
    pub bounds: Aabb,
}

impl TriggerVolume {
    pub fn new(kind: TriggerKind, bounds: Aabb) -> Self {
        Self { kind, bounds }
    }
}

//=== TriggerReport =======================================================

/// Trigger state for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerReport {
    /// Volumes entered this tick, in volume order.
    pub entered: Vec<TriggerKind>,
    /// Every volume the body currently overlaps.
    pub overlapping: Vec<TriggerKind>,
}

impl TriggerReport {
    pub fn is_inside(&self, kind: TriggerKind) -> bool {
        self.overlapping.contains(&kind)
    }
}

//=== TriggerTracker ======================================================

/// Edge detector over a fixed set of trigger volumes.
#[derive(Debug, Clone, Default)]
pub struct TriggerTracker {
    inside: HashSet<TriggerKind>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests `body` against every volume and reports entries and overlaps.
    pub fn update(&mut self, volumes: &[TriggerVolume], body: &Aabb) -> TriggerReport {
        let mut report = TriggerReport::default();
        let mut now_inside = HashSet::with_capacity(self.inside.len());

        for volume in volumes {
            if !volume.bounds.intersects(body) {
                continue;
            }
            if now_inside.insert(volume.kind) && !self.inside.contains(&volume.kind) {
                report.entered.push(volume.kind);
            }
            report.overlapping.push(volume.kind);
        }

        self.inside = now_inside;
        report
    }

    /// Forgets a volume so the next overlap counts as a fresh entry.
    pub fn forget(&mut self, kind: TriggerKind) {
        self.inside.remove(&kind);
    }

    pub fn is_inside(&self, kind: TriggerKind) -> bool {
        self.inside.contains(&kind)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
