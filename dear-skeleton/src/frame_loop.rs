//! Per-frame sequencing
//!
//! One [`FrameLoop::step`] is one frame: drain events, back off while the
//! surface is occluded, apply a pending resize, build and render the UI,
//! present. The stages run in that order and only in that order; each one
//! reads state the previous one wrote.
//!
//! The platform side is behind [`FrameDriver`]. `crate::app::App` drives a
//! real window and GPU; tests drive scripted fakes.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::demo::UiState;
use crate::error::Result;
use crate::surface::{PresentStatus, SurfaceSize};
use crate::window_proc::{EventState, WindowState};

/// Where the loop currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePhase {
    Polling,
    Occluded,
    Resizing,
    Rendering,
    Presenting,
    Shutdown,
}

/// How a single iteration ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was rendered and handed to the presentation engine
    Presented(PresentStatus),
    /// Surface still occluded; nothing rendered, backoff slept
    Occluded,
    /// Quit observed while draining events
    Quit,
}

/// Platform operations the frame loop sequences
pub trait FrameDriver {
    /// Drain every pending event without waiting, feeding each into `events`.
    /// Returns true once a quit has been observed.
    fn pump_messages(&mut self, events: &mut EventState) -> bool;

    /// Cheap check whether a present would be visible right now
    fn present_test(&mut self, window: WindowState) -> PresentStatus;

    /// Apply a non-zero resize to the swap chain and render target
    fn resize(&mut self, size: SurfaceSize) -> Result<()>;

    /// Begin a UI frame, build the content, clear the target and submit the
    /// UI draw data
    fn render(&mut self, state: &mut UiState) -> Result<()>;

    /// Present with vsync and report whether the surface is occluded
    fn present(&mut self, window: WindowState) -> PresentStatus;

    fn sleep(&mut self, duration: Duration);

    /// Release UI and GPU resources
    fn shutdown(&mut self);
}

/// Loop-level state: events, UI values and the occlusion flag
pub struct FrameLoop {
    events: EventState,
    ui_state: UiState,
    occluded: bool,
    phase: FramePhase,
    backoff: Duration,
    frames_presented: u64,
}

impl FrameLoop {
    pub fn new(ui_state: UiState, backoff: Duration) -> Self {
        Self {
            events: EventState::new(),
            ui_state,
            occluded: false,
            phase: FramePhase::Polling,
            backoff,
            frames_presented: 0,
        }
    }

    /// Run one iteration.
    pub fn step<D: FrameDriver>(&mut self, driver: &mut D) -> Result<FrameOutcome> {
        self.phase = FramePhase::Polling;
        if driver.pump_messages(&mut self.events) {
            self.phase = FramePhase::Shutdown;
            return Ok(FrameOutcome::Quit);
        }

        if self.occluded {
            self.phase = FramePhase::Occluded;
            if driver.present_test(self.events.window_state()) == PresentStatus::Occluded {
                trace!("Surface still occluded, backing off");
                driver.sleep(self.backoff);
                return Ok(FrameOutcome::Occluded);
            }
            debug!("Surface visible again");
            self.occluded = false;
        }

        if let Some(size) = self.events.take_pending_resize() {
            self.phase = FramePhase::Resizing;
            driver.resize(size)?;
        }

        self.phase = FramePhase::Rendering;
        driver.render(&mut self.ui_state)?;

        self.phase = FramePhase::Presenting;
        let status = driver.present(self.events.window_state());
        if status == PresentStatus::Occluded {
            debug!("Surface occluded after present");
            self.occluded = true;
        }
        self.frames_presented += 1;
        Ok(FrameOutcome::Presented(status))
    }

    /// Step until quit, then shut the driver down.
    ///
    /// The driver is shut down on the error path as well.
    pub fn run<D: FrameDriver>(&mut self, driver: &mut D) -> Result<()> {
        let result = loop {
            match self.step(driver) {
                Ok(FrameOutcome::Quit) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };
        self.phase = FramePhase::Shutdown;
        info!(frames = self.frames_presented, "Frame loop finished");
        driver.shutdown();
        result
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn is_occluded(&self) -> bool {
        self.occluded
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}
