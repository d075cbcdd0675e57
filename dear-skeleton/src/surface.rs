//! Device and surface management
//!
//! [`SurfaceManager`] owns the GPU device, the swap chain and the render
//! target and enforces their lifecycle: the render target only exists while
//! the swap chain has valid, non-zero sized buffers, and a resize always
//! tears it down and rebuilds it together with the buffers.
//!
//! The swap chain sits behind the [`SwapChain`] trait; [`WgpuSwapChain`] is
//! the real implementation on top of a `wgpu::Surface`.

use std::sync::Arc;

use pollster::block_on;
use tracing::{debug, info, trace, warn};
use winit::window::Window;

use crate::config::AppConfig;
use crate::error::{Result, SkeletonError};

/// Size of the drawable area in physical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (minimized window)
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Result of a presentation or of a presentation test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentStatus {
    Visible,
    Occluded,
}

/// Description of the swap chain's current back buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackBuffer {
    pub size: SurfaceSize,
    pub format: wgpu::TextureFormat,
}

/// View over the swap chain's back buffer.
///
/// Never mutated; a resize produces a new one with a higher generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTarget {
    pub size: SurfaceSize,
    pub format: wgpu::TextureFormat,
    pub generation: u64,
}

/// The presentation surface as seen by [`SurfaceManager`]
pub trait SwapChain {
    /// Current back buffer description
    fn back_buffer(&self) -> BackBuffer;
    /// Reallocate the buffers at a new size; format, present mode and buffer
    /// count stay as they are.
    fn resize_buffers(&mut self, size: SurfaceSize);
    /// Cheap check whether presenting would currently be visible
    fn present_test(&self) -> PresentStatus;
}

/// Which adapter path produced the device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    Hardware,
    /// wgpu's fallback adapter (a software rasterizer where available)
    Software,
}

/// What [`SurfaceManager::shutdown`] released, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released {
    RenderTarget,
    SwapChain,
    Device,
}

/// Owns device, swap chain and render target
pub struct SurfaceManager<S: SwapChain, D = GpuDevice> {
    // Field order matters for drop: dependents first.
    render_target: Option<RenderTarget>,
    swap_chain: Option<S>,
    device: Option<D>,
    generation: u64,
}

impl<S: SwapChain, D> SurfaceManager<S, D> {
    /// Take ownership of an already created device and swap chain and build
    /// the first render target.
    pub fn from_parts(device: D, swap_chain: S) -> Self {
        let mut manager = Self {
            render_target: None,
            swap_chain: Some(swap_chain),
            device: Some(device),
            generation: 0,
        };
        manager.create_render_target();
        manager
    }

    /// Build a render target over the current back buffer.
    ///
    /// Does nothing when the buffers are zero sized or the swap chain is gone.
    pub fn create_render_target(&mut self) -> Option<RenderTarget> {
        let back_buffer = self.swap_chain.as_ref()?.back_buffer();
        if back_buffer.size.is_empty() {
            debug!("Skipping render target creation for empty back buffer");
            return None;
        }
        self.generation += 1;
        let target = RenderTarget {
            size: back_buffer.size,
            format: back_buffer.format,
            generation: self.generation,
        };
        self.render_target = Some(target);
        Some(target)
    }

    /// Release the render target. Safe to call when there is none.
    pub fn destroy_render_target(&mut self) -> bool {
        self.render_target.take().is_some()
    }

    /// Resize the swap chain buffers and rebuild the render target.
    ///
    /// Zero sizes are ignored and leave the current target in place.
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        if size.is_empty() {
            debug!(?size, "Ignoring resize to empty size");
            return false;
        }
        let Some(swap_chain) = self.swap_chain.as_mut() else {
            warn!("Resize requested after shutdown");
            return false;
        };
        self.render_target = None;
        swap_chain.resize_buffers(size);
        let target = self.create_render_target();
        debug!(
            width = size.width,
            height = size.height,
            generation = target.map(|t| t.generation),
            "Surface resized"
        );
        true
    }

    pub fn present_test(&self) -> PresentStatus {
        match self.swap_chain.as_ref() {
            Some(swap_chain) if self.render_target.is_some() => swap_chain.present_test(),
            _ => PresentStatus::Occluded,
        }
    }

    pub fn render_target(&self) -> Option<&RenderTarget> {
        self.render_target.as_ref()
    }

    pub fn swap_chain(&self) -> Option<&S> {
        self.swap_chain.as_ref()
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn device_and_swap_chain(&mut self) -> Option<(&D, &mut S)> {
        match (self.device.as_ref(), self.swap_chain.as_mut()) {
            (Some(device), Some(swap_chain)) => Some((device, swap_chain)),
            _ => None,
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.swap_chain.is_none() && self.device.is_none()
    }

    /// Release render target, swap chain and device, in that order.
    ///
    /// A second call releases nothing.
    pub fn shutdown(&mut self) -> Vec<Released> {
        let mut released = Vec::with_capacity(3);
        if self.destroy_render_target() {
            released.push(Released::RenderTarget);
        }
        if let Some(swap_chain) = self.swap_chain.take() {
            drop(swap_chain);
            released.push(Released::SwapChain);
        }
        if let Some(device) = self.device.take() {
            drop(device);
            released.push(Released::Device);
        }
        if !released.is_empty() {
            info!(?released, "GPU resources released");
        }
        released
    }
}

/// GPU device and its immediate queue
pub struct GpuDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub driver: DriverKind,
}

/// Outcome of asking the surface for a back buffer
pub enum Acquired {
    Frame(wgpu::SurfaceTexture),
    /// The presentation engine reports the window as not visible
    Occluded,
    /// Transient failure; try again next frame
    Skipped,
}

/// `wgpu::Surface` configured for one window
pub struct WgpuSwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    window: Arc<Window>,
}

impl WgpuSwapChain {
    pub fn config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    /// Acquire the next back buffer.
    ///
    /// Outdated and lost surfaces are reconfigured and the frame is skipped.
    pub fn acquire(&mut self) -> Acquired {
        match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(frame) => Acquired::Frame(frame),
            wgpu::CurrentSurfaceTexture::Suboptimal(frame) => {
                trace!("Suboptimal back buffer acquired");
                Acquired::Frame(frame)
            }
            wgpu::CurrentSurfaceTexture::Occluded => Acquired::Occluded,
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                debug!("Surface lost/outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Acquired::Skipped
            }
            wgpu::CurrentSurfaceTexture::Timeout => {
                debug!("Surface acquire timed out");
                Acquired::Skipped
            }
            wgpu::CurrentSurfaceTexture::Validation => {
                warn!("Validation error while acquiring back buffer; skipping frame");
                Acquired::Skipped
            }
        }
    }
}

impl SwapChain for WgpuSwapChain {
    fn back_buffer(&self) -> BackBuffer {
        BackBuffer {
            size: SurfaceSize::new(self.config.width, self.config.height),
            format: self.config.format,
        }
    }

    fn resize_buffers(&mut self, size: SurfaceSize) {
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn present_test(&self) -> PresentStatus {
        if self.window.is_minimized() == Some(true) {
            PresentStatus::Occluded
        } else {
            PresentStatus::Visible
        }
    }
}

/// Pick an 8-bit-per-channel back buffer format.
///
/// Linear RGBA first, then BGRA, then the sRGB variants, then whatever the
/// surface lists first.
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    const PREFERRED: [wgpu::TextureFormat; 4] = [
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        wgpu::TextureFormat::Bgra8UnormSrgb,
    ];
    PREFERRED
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.first().copied())
}

/// Run `attempt` on the hardware path and, if that fails, once more on the
/// software path.
pub fn with_driver_fallback<T>(
    mut attempt: impl FnMut(DriverKind) -> Result<T>,
) -> Result<(T, DriverKind)> {
    match attempt(DriverKind::Hardware) {
        Ok(value) => Ok((value, DriverKind::Hardware)),
        Err(hw_err) => {
            warn!("Hardware adapter unavailable ({hw_err}); trying software adapter");
            match attempt(DriverKind::Software) {
                Ok(value) => Ok((value, DriverKind::Software)),
                Err(sw_err) => {
                    warn!("Software adapter unavailable ({sw_err})");
                    Err(SkeletonError::NoAdapter)
                }
            }
        }
    }
}

/// Create device, queue and a double-buffered surface for `window`.
///
/// Anything created before a failure is dropped before the error returns.
pub fn initialize(
    window: Arc<Window>,
    config: &AppConfig,
) -> Result<SurfaceManager<WgpuSwapChain, GpuDevice>> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..wgpu::InstanceDescriptor::new_without_display_handle()
    });

    let surface = instance.create_surface(window.clone())?;

    let ((adapter, device, queue), driver) = with_driver_fallback(|driver| {
        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: driver == DriverKind::Software,
        }))
        .map_err(|_| SkeletonError::NoAdapter)?;

        let (device, queue) = block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("dear-skeleton device"),
            ..Default::default()
        }))?;
        Ok((adapter, device, queue))
    })?;

    let info = adapter.get_info();
    info!(
        adapter = %info.name,
        backend = ?info.backend,
        ?driver,
        "GPU device created"
    );

    let caps = surface.get_capabilities(&adapter);
    let format = choose_surface_format(&caps.formats)
        .ok_or_else(|| SkeletonError::incompatible_surface("surface reports no formats"))?;
    let present_mode = if caps.present_modes.contains(&config.present_mode) {
        config.present_mode
    } else {
        warn!(
            "Present mode {:?} unsupported, using Fifo",
            config.present_mode
        );
        wgpu::PresentMode::Fifo
    };

    let physical = SurfaceSize::from(window.inner_size());
    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: physical.width.max(1),
        height: physical.height.max(1),
        present_mode,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &surface_config);

    let swap_chain = WgpuSwapChain {
        surface,
        config: surface_config,
        device: device.clone(),
        window,
    };
    let gpu = GpuDevice {
        device,
        queue,
        driver,
    };
    Ok(SurfaceManager::from_parts(gpu, swap_chain))
}
