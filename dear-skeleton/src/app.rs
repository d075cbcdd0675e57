//! Application context: the one struct that owns window, GPU and UI
//!
//! `App` is the concrete [`FrameDriver`]. Nothing here is global; the frame
//! loop and the event pump both work through `&mut App`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::Window;

use crate::config::AppConfig;
use crate::demo::UiState;
use crate::error::{Result, SkeletonError};
use crate::frame_loop::{FrameDriver, FrameLoop};
use crate::surface::{
    self, Acquired, GpuDevice, PresentStatus, SurfaceManager, SurfaceSize, WgpuSwapChain,
};
use crate::ui_layer::UiLayer;
use crate::window::{self, pump_messages};
use crate::window_proc::{EventState, WindowState};

pub struct App {
    // Dropped top to bottom: frame, UI renderer, GPU, window, event loop.
    pending_frame: Option<wgpu::SurfaceTexture>,
    ui: Option<UiLayer>,
    surface: SurfaceManager<WgpuSwapChain, GpuDevice>,
    window: Arc<Window>,
    event_loop: EventLoop<()>,
}

impl App {
    /// Bring up window, GPU device and UI backends.
    ///
    /// A failure here is fatal; whatever was already created is dropped
    /// before the error is returned.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let window = window::create_window(&mut event_loop, config)?;
        let surface = surface::initialize(window.clone(), config)?;

        let (gpu, swap_chain) = match (surface.device(), surface.swap_chain()) {
            (Some(gpu), Some(swap_chain)) => (gpu, swap_chain),
            _ => return Err(SkeletonError::NoAdapter),
        };
        let ui = UiLayer::new(
            &window,
            &gpu.device,
            &gpu.queue,
            swap_chain.config().format,
            config,
        )?;

        window.set_visible(true);
        info!(driver = ?gpu.driver, "Application initialized");

        Ok(Self {
            pending_frame: None,
            ui: Some(ui),
            surface,
            window,
            event_loop,
        })
    }
}

impl FrameDriver for App {
    fn pump_messages(&mut self, events: &mut EventState) -> bool {
        pump_messages(&mut self.event_loop, &self.window, self.ui.as_mut(), events)
    }

    fn present_test(&mut self, window: WindowState) -> PresentStatus {
        match present_status(window, true) {
            PresentStatus::Visible => self.surface.present_test(),
            PresentStatus::Occluded => PresentStatus::Occluded,
        }
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        // A frame acquired at the old size must not outlive the old buffers.
        self.pending_frame = None;
        self.surface.resize(size);
        Ok(())
    }

    fn render(&mut self, state: &mut UiState) -> Result<()> {
        let Some(ui) = self.ui.as_mut() else {
            return Ok(());
        };
        let Some((gpu, swap_chain)) = self.surface.device_and_swap_chain() else {
            return Ok(());
        };
        let frame = match swap_chain.acquire() {
            Acquired::Frame(frame) => frame,
            Acquired::Occluded | Acquired::Skipped => return Ok(()),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dear-skeleton frame encoder"),
            });

        ui.render(&self.window, &mut encoder, &view, state)?;

        gpu.queue.submit(Some(encoder.finish()));
        self.pending_frame = Some(frame);
        Ok(())
    }

    fn present(&mut self, window: WindowState) -> PresentStatus {
        let frame = self.pending_frame.take();
        let acquired = frame.is_some();
        if let Some(frame) = frame {
            frame.present();
        }
        present_status(window, acquired)
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn shutdown(&mut self) {
        self.pending_frame = None;
        if self.ui.take().is_some() {
            debug!("UI backends shut down");
        }
        self.surface.shutdown();
    }
}

/// Run the application until the window is closed.
pub fn run(config: AppConfig) -> Result<()> {
    let mut app = App::new(&config).inspect_err(|e| error!("Initialization failed: {e}"))?;
    let mut frame_loop = FrameLoop::new(
        UiState::with_clear_color(config.clear_color),
        config.occlusion_backoff,
    );
    frame_loop.run(&mut app)
}

/// Whether a present for this frame counts as visible.
///
/// Minimized counts as occluded: not every platform reports occlusion for
/// a minimized window, but all of them report the zero-size resize.
/// `acquired` is false when no back buffer was obtained this frame.
pub fn present_status(window: WindowState, acquired: bool) -> PresentStatus {
    if window.occluded || window.minimized || !acquired {
        PresentStatus::Occluded
    } else {
        PresentStatus::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(minimized: bool, occluded: bool) -> WindowState {
        WindowState {
            minimized,
            occluded,
        }
    }

    #[test]
    fn minimized_without_occlusion_event_is_occluded() {
        assert_eq!(
            present_status(window(true, false), true),
            PresentStatus::Occluded
        );
    }

    #[test]
    fn reported_occlusion_is_occluded() {
        assert_eq!(
            present_status(window(false, true), true),
            PresentStatus::Occluded
        );
    }

    #[test]
    fn missing_back_buffer_is_occluded() {
        assert_eq!(
            present_status(window(false, false), false),
            PresentStatus::Occluded
        );
    }

    #[test]
    fn visible_window_with_frame_is_visible() {
        assert_eq!(
            present_status(window(false, false), true),
            PresentStatus::Visible
        );
    }
}
