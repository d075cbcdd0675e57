//! dear-skeleton: minimal Dear ImGui desktop application
//!
//! One window (winit), one GPU surface (wgpu), one Dear ImGui context, and
//! a single-threaded loop that per frame
//! - drains native events without blocking,
//! - backs off while the surface is occluded,
//! - applies a deferred resize,
//! - builds the demo UI, clears and draws,
//! - presents with vsync.
//!
//! ```no_run
//! use dear_skeleton::{AppConfig, logging, run};
//!
//! fn main() {
//!     logging::init_tracing();
//!     if run(AppConfig::default()).is_err() {
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod frame_loop;
pub mod logging;
pub mod surface;
pub mod ui_layer;
pub mod window;
pub mod window_proc;

pub use app::{App, present_status, run};
pub use config::AppConfig;
pub use demo::{UiState, Widgets, build_demo};
pub use error::{Result, SkeletonError};
pub use frame_loop::{FrameDriver, FrameLoop, FrameOutcome, FramePhase};
pub use surface::{
    Acquired, BackBuffer, DriverKind, PresentStatus, Released, RenderTarget, SurfaceManager,
    SurfaceSize, SwapChain,
};
pub use window_proc::{
    Disposition, EventState, ResizeRequest, Transition, WindowMessage, WindowState, window_proc,
};
