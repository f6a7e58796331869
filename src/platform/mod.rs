//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via crossbeam
// channels.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  GameStateMachine    │
//  │   ↓                      │    │   ├─ InputSystem     │
//  │  InputProcessor          │    │   └─ Scenes          │
//  │   └─ Winit → InputEvent  │    │                      │
//  │   ↓                      │    └──────────────────────┘
//  │  InputBuffer             │        ↑            │
//  │   ↓                      │        │            │
//  │  RedrawRequested (flush) ┼────────┘            │
//  │                          │   PlatformEvent     │
//  │  Window title  ←─────────┼─────────────────────┘
//  └──────────────────────────┘   FrameSignals
//
//  Frame Boundary: RedrawRequested
//    → Buffered input sent as one batch
//    → Latest FrameSignals applied to the window
//    → Empty buffers NOT sent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: batches input atomically, in
//   arrival order
// - **Graceful channel disconnect**: if the core thread dies, the platform
//   logs a warning and keeps running so the window can be closed
// - **Main thread requirement**: Winit mandates the main thread on
//   macOS/iOS, so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::game::signals::FrameSignals;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Constants ===========================================================

const WINDOW_TITLE: &str = "Lantern Festival";

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread and exchanges batches with the core thread.
///
/// # Fields
///
/// - `window`: Created lazily in `resumed()` (mobile compatibility)
/// - `buffer`: Accumulates events until `RedrawRequested`
/// - `event_sender`: Input batches to the core thread
/// - `signal_receiver`: Per-tick output from the core thread
pub(crate) struct Platform {
    window: Option<Window>,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    signal_receiver: Receiver<FrameSignals>,
    input_processor: InputProcessor,
    last_title: String,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, signal_receiver: Receiver<FrameSignals>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            buffer: InputBuffer::new(),
            event_sender,
            signal_receiver,
            input_processor: InputProcessor::new(),
            last_title: WINDOW_TITLE.to_string(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered input to the core thread.
    ///
    /// A disconnected channel (core thread gone) drops the batch with a
    /// warning; the window stays usable so it can still be closed.
    fn flush_input_buffer(&mut self) {
        let Some(batch) = self.buffer.drain() else {
            return;
        };

        let count = batch.len();
        trace!(target: "platform::input", "Flushing {} input events", count);

        if self.event_sender.send(PlatformEvent::Inputs(batch)).is_err() {
            warn!(
                target: "platform::input",
                "Channel disconnected, dropping {} events",
                count
            );
        }
    }

    /// Applies the newest signals; older ones this frame are skipped.
    fn apply_signals(&mut self) {
        let Some(signals) = self.signal_receiver.try_iter().last() else {
            return;
        };

        for event in &signals.events {
            trace!(target: "platform", "Tick {}: {:?}", signals.tick, event);
        }

        let title = signals.title();
        if title != self.last_title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.last_title = title;
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when the app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.last_title.as_str())
            .with_inner_size(LogicalSize::new(1280, 720));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push(event);
                } else {
                    trace!(target: "platform::input", "Unmapped or repeated key ignored");
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                self.apply_signals();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crossbeam_channel::unbounded;

    fn platform() -> (Platform, Receiver<PlatformEvent>, Sender<FrameSignals>) {
        let (event_tx, event_rx) = unbounded();
        let (signal_tx, signal_rx) = unbounded();
        (Platform::new(event_tx, signal_rx), event_rx, signal_tx)
    }

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx, _tx) = platform();
        assert!(platform.window.is_none());
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, rx, _tx) = platform();
        platform.flush_input_buffer();
        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_one_batch() {
        let (mut platform, rx, _tx) = platform();
        platform.buffer.push(InputEvent::KeyDown { key: KeyCode::Space });
        platform.buffer.push(InputEvent::KeyUp { key: KeyCode::Space });

        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs(batch)) => assert_eq!(batch.len(), 2),
            other => panic!("Expected Inputs event, got {:?}", other),
        }
        platform.flush_input_buffer();
        assert!(rx.try_recv().is_err(), "Second flush should not send");
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (mut platform, rx, _tx) = platform();
        platform.buffer.push(InputEvent::KeyDown { key: KeyCode::Space });
        drop(rx);

        platform.flush_input_buffer();
    }

    #[test]
    fn newest_signals_win() {
        let (mut platform, _rx, tx) = platform();
        tx.send(FrameSignals { tick: 1, ..FrameSignals::default() }).unwrap();
        tx.send(FrameSignals { tick: 2, ..FrameSignals::default() }).unwrap();

        platform.apply_signals();

        assert_eq!(platform.last_title, "Lantern Festival | Loading");
        assert!(platform.signal_receiver.is_empty());
    }
}
