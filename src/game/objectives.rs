//=========================================================================
// Objective Tracker
//=========================================================================
//
// Lantern bookkeeping and the win condition.
//
// Architecture:
// ```text
//   Level lantern slots → Vec<Lantern>
//   touch_lantern(id, sparkler_lit) → LanternTouch { Lit | Refuel | Ignored }
//   enter_destination()             → win iff every lantern is lit
// ```
//
// The count starts at 1: lantern 0 is lit during level setup through
// `prelight`, which never touches the counter. Each lantern flips to lit
// at most once, so repeated touches can't inflate the count.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::level::LANTERN_COUNT;

//=== Constants ===========================================================

/// Lit count required at the destination.
pub const WIN_LANTERN_COUNT: u32 = 22;

/// Light intensity of a lit lantern.
pub const LIT_INTENSITY: f32 = 30.0;

//=== Lantern =============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Lantern {
    pub id: usize,
    pub position: Vec3,
    is_lit: bool,
    /// Names of the meshes this lantern's light affects.
    pub light_includes: Vec<String>,
}

impl Lantern {
    pub fn new(id: usize, position: Vec3) -> Self {
        Self {
            id,
            position,
            is_lit: false,
            light_includes: light_includes(id),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.is_lit
    }

    pub fn light_intensity(&self) -> f32 {
        if self.is_lit {
            LIT_INTENSITY
        } else {
            0.0
        }
    }

    /// Lights the lantern; returns `false` if it already was.
    fn light(&mut self) -> bool {
        !std::mem::replace(&mut self.is_lit, true)
    }
}

//--- light_includes() ----------------------------------------------------
//
// Festival lanterns also light the platform segment they stand on.
//
fn light_includes(id: usize) -> Vec<String> {
    let mut includes = Vec::with_capacity(2);
    let platform = match id {
        14 | 15 => Some(1),
        16 | 17 => Some(2),
        18 | 19 => Some(3),
        20 | 21 => Some(4),
        _ => None,
    };
    if let Some(platform) = platform {
        includes.push(format!("festivalPlatform{}", platform));
    }
    includes.push(format!("lantern{}lights", id));
    includes
}

//=== LanternTouch ========================================================

/// Outcome of the player touching a lantern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanternTouch {
    /// Newly lit; `count` is the lit total afterwards.
    Lit { id: usize, count: u32 },
    /// Already lit; the sparkler is refuelled.
    Refuel { id: usize },
    /// Unlit and the sparkler is out.
    Ignored,
}

impl LanternTouch {
    /// The sparkler restarts on this touch.
    pub fn resets_sparkler(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

//=== ObjectiveTracker ====================================================

#[derive(Debug, Clone)]
pub struct ObjectiveTracker {
    lanterns: Vec<Lantern>,
    lanterns_lit: u32,
    win: bool,
}

impl ObjectiveTracker {
    pub fn new(positions: &[Vec3]) -> Self {
        debug_assert_eq!(positions.len(), LANTERN_COUNT);
        Self {
            lanterns: positions
                .iter()
                .enumerate()
                .map(|(id, &position)| Lantern::new(id, position))
                .collect(),
            lanterns_lit: 1,
            win: false,
        }
    }

    /// Lights a lantern during setup without counting it.
    pub fn prelight(&mut self, id: usize) {
        if let Some(lantern) = self.lanterns.get_mut(id) {
            lantern.light();
        }
    }

    //--- touch_lantern() --------------------------------------------------

    pub fn touch_lantern(&mut self, id: usize, sparkler_lit: bool) -> LanternTouch {
        let Some(lantern) = self.lanterns.get_mut(id) else {
            return LanternTouch::Ignored;
        };

        if !lantern.is_lit() && sparkler_lit {
            lantern.light();
            self.lanterns_lit += 1;
            debug!(target: "game", "Lantern {} lit ({} total)", id, self.lanterns_lit);
            LanternTouch::Lit {
                id,
                count: self.lanterns_lit,
            }
        } else if lantern.is_lit() {
            LanternTouch::Refuel { id }
        } else {
            LanternTouch::Ignored
        }
    }

    //--- enter_destination() ----------------------------------------------

    /// Sets the win flag when every lantern is lit. Returns `true` only on
    /// the entry that wins.
    pub fn enter_destination(&mut self) -> bool {
        if self.win || self.lanterns_lit != WIN_LANTERN_COUNT {
            return false;
        }
        self.win = true;
        info!(target: "game", "Destination reached with every lantern lit");
        true
    }

    //--- Queries ----------------------------------------------------------

    pub fn lanterns_lit(&self) -> u32 {
        self.lanterns_lit
    }

    pub fn has_won(&self) -> bool {
        self.win
    }

    pub fn lanterns(&self) -> &[Lantern] {
        &self.lanterns
    }

    pub fn is_lit(&self, id: usize) -> bool {
        self.lanterns.get(id).is_some_and(Lantern::is_lit)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker() -> ObjectiveTracker {
        let positions: Vec<Vec3> = (0..LANTERN_COUNT).map(|i| Vec3::new(0.0, 0.0, i as f32)).collect();
        let mut tracker = ObjectiveTracker::new(&positions);
        tracker.prelight(0);
        tracker
    }

    //=====================================================================
    // Lantern Tests
    //=====================================================================

    #[test]
    fn prelight_does_not_count() {
        let tracker = tracker();
        assert!(tracker.is_lit(0));
        assert_eq!(tracker.lanterns_lit(), 1);
    }

    #[test]
    fn lit_sparkler_lights_lantern() {
        let mut tracker = tracker();

        assert_eq!(tracker.touch_lantern(5, true), LanternTouch::Lit { id: 5, count: 2 });
        assert!(tracker.is_lit(5));
        assert_eq!(tracker.lanterns()[5].light_intensity(), LIT_INTENSITY);
    }

    #[test]
    fn second_touch_only_refuels() {
        let mut tracker = tracker();
        tracker.touch_lantern(5, true);

        let touch = tracker.touch_lantern(5, true);
        assert_eq!(touch, LanternTouch::Refuel { id: 5 });
        assert!(touch.resets_sparkler());
        assert_eq!(tracker.lanterns_lit(), 2);

        // Refuel works even with the sparkler out
        assert_eq!(tracker.touch_lantern(0, false), LanternTouch::Refuel { id: 0 });
    }

    #[test]
    fn dark_sparkler_does_nothing_on_unlit_lantern() {
        let mut tracker = tracker();

        let touch = tracker.touch_lantern(3, false);
        assert_eq!(touch, LanternTouch::Ignored);
        assert!(!touch.resets_sparkler());
        assert!(!tracker.is_lit(3));
        assert_eq!(tracker.lanterns_lit(), 1);
    }

    #[test]
    fn unknown_lantern_is_ignored() {
        let mut tracker = tracker();
        assert_eq!(tracker.touch_lantern(99, true), LanternTouch::Ignored);
    }

    #[test]
    fn light_includes_follow_platform_pairs() {
        assert_eq!(light_includes(3), vec!["lantern3lights"]);
        assert_eq!(light_includes(15), vec!["festivalPlatform1", "lantern15lights"]);
        assert_eq!(light_includes(20), vec!["festivalPlatform4", "lantern20lights"]);
    }

    //=====================================================================
    // Win Tests
    //=====================================================================

    #[test]
    fn destination_needs_twenty_two_lit() {
        let mut tracker = tracker();
        for id in 1..LANTERN_COUNT - 1 {
            tracker.touch_lantern(id, true);
        }
        assert_eq!(tracker.lanterns_lit(), 21);
        assert!(!tracker.enter_destination());
        assert!(!tracker.has_won());

        tracker.touch_lantern(LANTERN_COUNT - 1, true);
        assert!(tracker.enter_destination());
        assert!(tracker.has_won());
        assert!(!tracker.enter_destination(), "Win fires once");
    }

    //=====================================================================
    // Property Tests
    //=====================================================================

    proptest! {
        #[test]
        fn count_is_monotonic_and_bounded(
            touches in prop::collection::vec((0usize..LANTERN_COUNT, any::<bool>()), 0..200)
        ) {
            let mut tracker = tracker();
            let mut previous = tracker.lanterns_lit();

            for (id, sparkler_lit) in touches {
                tracker.touch_lantern(id, sparkler_lit);
                let count = tracker.lanterns_lit();
                prop_assert!(count >= previous);
                prop_assert!((1..=WIN_LANTERN_COUNT).contains(&count));
                previous = count;
            }

            let lit = tracker.lanterns().iter().filter(|l| l.is_lit()).count() as u32;
            prop_assert_eq!(lit, tracker.lanterns_lit());
        }
    }
}
