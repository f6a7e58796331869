//=========================================================================
// Fireworks
//=========================================================================
//
// Win-sequence rockets: each waits out a random fuse, rises to a random
// height and bursts into a ring of coloured emitters.
//
// Lifecycle (per firework):
// ```text
//   Waiting { fuse } ──fuse ≤ 0──→ Launched ──y ≥ height──→ Exploded
//        fuse -= 1                  y += 0.2                (terminal)
// ```
//
// Fuses, heights, offsets and burst colours come from a seeded `StdRng`
// so a show replays identically for the same seed.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Constants ===========================================================

/// Frames per unit of random fuse.
const FUSE_FRAMES: f32 = 60.0;

/// Rise per tick while launched.
const RISE_PER_TICK: f32 = 0.2;

/// Widest leftward offset from the anchor.
const SPREAD_X: f32 = 10.0;

const MIN_EXTRA_HEIGHT: f32 = 4.0;
const HEIGHT_RANGE: f32 = 19.0;

/// Burst sphere tessellation: rings from pole to pole, slices around.
const BURST_RINGS: usize = 6;
const BURST_SLICES: usize = 12;
const BURST_RADIUS: f32 = 0.5;

/// Particle settings shared by every burst stream.
const BURST_LIFETIME: (f32, f32) = (1.0, 2.0);
const BURST_POWER: (f32, f32) = (10.0, 13.0);
const BURST_GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

/// Seconds a burst stream keeps emitting.
const BURST_EMIT_SECS: f32 = 0.2;

//=== FireworkPhase =======================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireworkPhase {
    /// Counting down; `fuse` is in frames.
    Waiting { fuse: f32 },
    Launched,
    Exploded,
}

//=== Firework ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Firework {
    pub position: Vec3,
    /// Height at which the rocket bursts.
    pub burst_height: f32,
    pub phase: FireworkPhase,
}

impl Firework {
    /// Rolls the `index`-th rocket of a show launched from `anchor`.
    /// Later rockets get longer fuses on average.
    pub fn new(rng: &mut StdRng, anchor: Vec3, index: usize) -> Self {
        let offset = rng.gen::<f32>() * SPREAD_X;
        let position = Vec3::new(anchor.x - offset, anchor.y, anchor.z);
        let burst_height = position.y + rng.gen::<f32>() * HEIGHT_RANGE + MIN_EXTRA_HEIGHT;
        let fuse = (rng.gen::<f32>() * index as f32 + 1.0) * FUSE_FRAMES;

        Self {
            position,
            burst_height,
            phase: FireworkPhase::Waiting { fuse },
        }
    }

    fn tick(&mut self, index: usize, rng: &mut StdRng) -> Option<FireworkEvent> {
        match self.phase {
            FireworkPhase::Waiting { fuse } if fuse <= 0.0 => {
                self.phase = FireworkPhase::Launched;
                trace!(target: "game", "Firework {} launched", index);
                Some(FireworkEvent::Launched {
                    index,
                    position: self.position,
                })
            }
            FireworkPhase::Waiting { fuse } => {
                self.phase = FireworkPhase::Waiting { fuse: fuse - 1.0 };
                None
            }
            FireworkPhase::Launched if self.position.y >= self.burst_height => {
                self.phase = FireworkPhase::Exploded;
                trace!(target: "game", "Firework {} burst at {:?}", index, self.position);
                Some(FireworkEvent::Burst {
                    index,
                    position: self.position,
                    emitters: burst_emitters(self.position, rng),
                })
            }
            FireworkPhase::Launched => {
                self.position.y += RISE_PER_TICK;
                None
            }
            FireworkPhase::Exploded => None,
        }
    }
}

//=== BurstEmitter ========================================================

/// One particle stream of a burst, fired along `direction`.
///
/// Streams emit for a fixed short time; `lifetime` and `power` are the
/// min/max ranges each particle rolls from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstEmitter {
    pub position: Vec3,
    pub direction: Vec3,
    /// RGBA, alpha always 1.
    pub color: [f32; 4],
    /// Particle lifetime range in seconds.
    pub lifetime: (f32, f32),
    /// Particle launch speed range.
    pub power: (f32, f32),
    pub gravity: Vec3,
    pub emit_secs: f32,
}

//--- sphere_samples() ----------------------------------------------------
//
// Vertices of a unit-diameter UV sphere: ring 0 is the top pole, each of
// the (RINGS + 1) rings repeats its first point at the seam.
//
pub fn sphere_samples() -> Vec<(Vec3, Vec3)> {
    use std::f32::consts::{PI, TAU};

    let mut samples = Vec::with_capacity((BURST_RINGS + 1) * (BURST_SLICES + 1));
    for ring in 0..=BURST_RINGS {
        let polar = ring as f32 / BURST_RINGS as f32 * PI;
        for slice in 0..=BURST_SLICES {
            let azimuth = slice as f32 / BURST_SLICES as f32 * TAU;
            let normal = Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                -polar.sin() * azimuth.sin(),
            );
            samples.push((normal * BURST_RADIUS, normal.normalize_or_zero()));
        }
    }
    samples
}

fn burst_emitters(center: Vec3, rng: &mut StdRng) -> Vec<BurstEmitter> {
    sphere_samples()
        .into_iter()
        .map(|(offset, normal)| BurstEmitter {
            position: center + offset,
            direction: normal,
            color: [rng.gen(), rng.gen(), rng.gen(), 1.0],
            lifetime: BURST_LIFETIME,
            power: BURST_POWER,
            gravity: BURST_GRAVITY,
            emit_secs: BURST_EMIT_SECS,
        })
        .collect()
}

//=== FireworkEvent =======================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FireworkEvent {
    /// Rocket left the ground (rocket sound).
    Launched { index: usize, position: Vec3 },
    /// Rocket burst (explosion sound plus particles).
    Burst {
        index: usize,
        position: Vec3,
        emitters: Vec<BurstEmitter>,
    },
}

//=== FireworkShow ========================================================

/// The finale's rockets. Nothing moves until `start` is called.
#[derive(Debug, Clone)]
pub struct FireworkShow {
    fireworks: Vec<Firework>,
    rng: StdRng,
    started: bool,
}

impl FireworkShow {
    pub fn new(anchor: Vec3, count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fireworks = (0..count)
            .map(|index| Firework::new(&mut rng, anchor, index))
            .collect();

        Self {
            fireworks,
            rng,
            started: false,
        }
    }

    pub fn start(&mut self) {
        if !self.started {
            debug!(target: "game", "Firework show started ({} rockets)", self.fireworks.len());
        }
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Advances every rocket one frame.
    pub fn tick(&mut self) -> Vec<FireworkEvent> {
        if !self.started {
            return Vec::new();
        }

        let rng = &mut self.rng;
        self.fireworks
            .iter_mut()
            .enumerate()
            .filter_map(|(index, firework)| firework.tick(index, rng))
            .collect()
    }

    pub fn all_exploded(&self) -> bool {
        self.fireworks
            .iter()
            .all(|f| f.phase == FireworkPhase::Exploded)
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: Vec3 = Vec3::new(5.0, 5.0, -180.0);

    fn run_to_completion(show: &mut FireworkShow) -> Vec<FireworkEvent> {
        let mut events = Vec::new();
        for _ in 0..10_000 {
            events.extend(show.tick());
            if show.all_exploded() {
                break;
            }
        }
        events
    }

    //=====================================================================
    // Rolling Tests
    //=====================================================================

    #[test]
    fn rolls_stay_in_range() {
        let show = FireworkShow::new(ANCHOR, 20, 7);

        for (index, firework) in show.fireworks().iter().enumerate() {
            assert!(firework.position.x <= ANCHOR.x && firework.position.x > ANCHOR.x - SPREAD_X);
            assert_eq!(firework.position.y, ANCHOR.y);
            assert_eq!(firework.position.z, ANCHOR.z);
            assert!(firework.burst_height >= ANCHOR.y + MIN_EXTRA_HEIGHT);
            assert!(firework.burst_height < ANCHOR.y + MIN_EXTRA_HEIGHT + HEIGHT_RANGE);

            let FireworkPhase::Waiting { fuse } = firework.phase else {
                panic!("Fresh firework must be waiting");
            };
            assert!(fuse >= FUSE_FRAMES);
            assert!(fuse <= (index as f32 + 1.0) * FUSE_FRAMES);
        }
    }

    #[test]
    fn same_seed_replays_same_show() {
        let a = FireworkShow::new(ANCHOR, 20, 42);
        let b = FireworkShow::new(ANCHOR, 20, 42);
        assert_eq!(a.fireworks(), b.fireworks());
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn nothing_happens_before_start() {
        let mut show = FireworkShow::new(ANCHOR, 3, 1);
        for _ in 0..1_000 {
            assert!(show.tick().is_empty());
        }
        assert!(!show.all_exploded());
    }

    #[test]
    fn every_rocket_launches_and_bursts_exactly_once() {
        let mut show = FireworkShow::new(ANCHOR, 20, 3);
        show.start();

        let events = run_to_completion(&mut show);

        assert!(show.all_exploded());
        for index in 0..20 {
            let launches = events
                .iter()
                .filter(|e| matches!(e, FireworkEvent::Launched { index: i, .. } if *i == index))
                .count();
            let bursts = events
                .iter()
                .filter(|e| matches!(e, FireworkEvent::Burst { index: i, .. } if *i == index))
                .count();
            assert_eq!((launches, bursts), (1, 1), "Firework {}", index);
        }

        // Exploded is terminal
        for _ in 0..100 {
            assert!(show.tick().is_empty());
        }
    }

    #[test]
    fn rocket_bursts_at_its_height() {
        let mut show = FireworkShow::new(ANCHOR, 1, 9);
        let target = show.fireworks()[0].burst_height;
        show.start();

        let events = run_to_completion(&mut show);
        let Some(FireworkEvent::Burst { position, emitters, .. }) = events.last() else {
            panic!("Last event must be the burst");
        };

        assert!(position.y >= target);
        assert!(position.y < target + RISE_PER_TICK + 1e-3);
        assert_eq!(emitters.len(), 91);
    }

    //=====================================================================
    // Burst Tests
    //=====================================================================

    #[test]
    fn sphere_samples_are_on_the_surface() {
        let samples = sphere_samples();

        assert_eq!(samples.len(), 7 * 13);
        assert!(samples[0].1.abs_diff_eq(Vec3::Y, 1e-6));
        assert!(samples.last().unwrap().1.abs_diff_eq(Vec3::NEG_Y, 1e-6));
        for (point, normal) in samples {
            assert!((point.length() - BURST_RADIUS).abs() < 1e-5);
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn burst_colors_are_opaque() {
        let mut rng = StdRng::seed_from_u64(5);
        for emitter in burst_emitters(Vec3::ZERO, &mut rng) {
            assert_eq!(emitter.color[3], 1.0);
            assert!(emitter.color[..3].iter().all(|c| (0.0..1.0).contains(c)));
        }
    }

    #[test]
    fn burst_streams_are_short_and_fall() {
        let mut rng = StdRng::seed_from_u64(5);
        for emitter in burst_emitters(Vec3::new(0.0, 20.0, 0.0), &mut rng) {
            assert_eq!(emitter.lifetime, (1.0, 2.0));
            assert_eq!(emitter.power, (10.0, 13.0));
            assert!(emitter.gravity.y < 0.0);
            assert!(emitter.emit_secs > 0.0 && emitter.emit_secs < emitter.lifetime.0);
        }
    }
}
