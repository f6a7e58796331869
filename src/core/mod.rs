//=========================================================================
// Core Systems Orchestrator
//
// Runs the simulation on the logic (non-platform) thread.
//
// Responsibilities:
// - Own the simulation and tick it at a fixed rate (TPS)
// - Receive platform input batches over a crossbeam channel
// - Publish one output per tick back to the platform
//
// Notes:
// The orchestrator runs independently from the platform layer.
// Communication happens only through message passing: input batches in,
// simulation output out. A full output channel drops that tick's output;
// a closed one ends the loop.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{info, trace, warn};

//=== Internal Modules ====================================================
pub mod config;
pub mod globals;
pub mod input;
pub(crate) mod platform_bridge;
pub mod scene;
pub mod scheduler;
pub mod signal_bus;

use input::InputEvent;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== Simulation ==========================================================

/// Anything the core thread can tick.
pub trait Simulation {
    /// Published to the platform after every tick.
    type Output: Send + 'static;

    /// Called once before the first tick.
    fn start(&mut self) -> Self::Output;

    /// Advances one fixed step with the input gathered since the last one.
    fn tick(&mut self, batches: &[Vec<InputEvent>]) -> Self::Output;
}

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator<Sim: Simulation> {
    simulation: Sim,
    tps: f64,
}

impl<Sim> CoreSystemsOrchestrator<Sim>
where
    Sim: Simulation + Send + 'static,
{
    //--- Construction -----------------------------------------------------

    pub fn new(simulation: Sim, tps: f64) -> Self {
        Self { simulation, tps }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread.
    //
    // Each tick:
    //  1. Collects platform input (exits on WindowClosed / disconnect)
    //  2. Ticks the simulation
    //  3. Publishes its output
    //  4. Sleeps to maintain fixed pacing
    //
    pub fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        output: Sender<Sim::Output>,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);

        thread::spawn(move || {
            let mut simulation = self.simulation;
            let mut collector = EventCollector::new(receiver);

            if let TickControl::Exit = Self::publish(&output, simulation.start()) {
                info!("Core thread exiting before first tick.");
                return;
            }

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if let TickControl::Exit = collector.collect_frame() {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 2: Tick the simulation ---------------------------
                let result = simulation.tick(collector.batches());

                //--- Step 3: Publish ---------------------------------------
                if let TickControl::Exit = Self::publish(&output, result) {
                    info!("Output channel closed, core thread exiting.");
                    break;
                }

                //--- Step 4: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                } else {
                    trace!("Tick overran by {:?}", elapsed - frame_duration);
                }
            }
        })
    }

    fn publish(output: &Sender<Sim::Output>, result: Sim::Output) -> TickControl {
        match output.try_send(result) {
            Ok(()) => TickControl::Continue,
            Err(TrySendError::Full(_)) => {
                trace!("Output channel full, dropping tick output");
                TickControl::Continue
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Output receiver dropped");
                TickControl::Exit
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use crate::core::input::KeyCode;

    /// Counts ticks and input events.
    struct Counter {
        ticks: u64,
        events: usize,
    }

    impl Simulation for Counter {
        type Output = (u64, usize);

        fn start(&mut self) -> Self::Output {
            (0, 0)
        }

        fn tick(&mut self, batches: &[Vec<InputEvent>]) -> Self::Output {
            self.ticks += 1;
            self.events += batches.iter().map(Vec::len).sum::<usize>();
            (self.ticks, self.events)
        }
    }

    fn counter() -> Counter {
        Counter { ticks: 0, events: 0 }
    }

    #[test]
    fn core_thread_ticks_until_window_closes() {
        let (event_tx, event_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();

        event_tx
            .send(PlatformEvent::Inputs(vec![InputEvent::KeyDown { key: KeyCode::Space }]))
            .unwrap();

        let handle = CoreSystemsOrchestrator::new(counter(), 1000.0)
            .spawn_core_thread(event_rx, out_tx);

        assert_eq!(out_rx.recv().unwrap(), (0, 0));
        assert_eq!(out_rx.recv().unwrap(), (1, 1));

        event_tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn core_thread_exits_when_output_is_dropped() {
        let (_event_tx, event_rx) = unbounded::<PlatformEvent>();
        let (out_tx, out_rx) = bounded(1);
        drop(out_rx);

        let handle = CoreSystemsOrchestrator::new(counter(), 1000.0)
            .spawn_core_thread(event_rx, out_tx);

        handle.join().unwrap();
    }

    #[test]
    fn full_output_channel_does_not_stall() {
        let (event_tx, event_rx) = unbounded();
        let (out_tx, out_rx) = bounded(1);

        let handle = CoreSystemsOrchestrator::new(counter(), 1000.0)
            .spawn_core_thread(event_rx, out_tx);

        thread::sleep(Duration::from_millis(20));
        event_tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        // Only the start output fit; later ticks were dropped
        assert_eq!(out_rx.try_recv().unwrap(), (0, 0));
    }
}
