//! Error types for the skeleton application
//!
//! Only startup failures and unrecoverable GPU errors end up here. Surface
//! occlusion and degenerate resizes are handled in place by the frame loop
//! and never become errors.

use thiserror::Error;

/// Result type for skeleton operations
pub type Result<T> = std::result::Result<T, SkeletonError>;

/// Errors that can stop the application
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// The winit event loop could not be created or driven
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The native window could not be created
    #[error("Window creation failed: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// The event loop exited before the window was created
    #[error("Event loop exited before the window was created")]
    WindowNotCreated,

    /// The wgpu surface could not be created for the window
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// Neither the hardware nor the software adapter path produced an adapter
    #[error("No suitable GPU adapter found (hardware and software paths both failed)")]
    NoAdapter,

    /// The adapter refused to hand out a device
    #[error("request_device failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// The surface is not usable with the selected adapter
    #[error("Surface is incompatible with the adapter: {reason}")]
    IncompatibleSurface { reason: String },

    /// The Dear ImGui renderer failed to initialize or draw
    #[error("Renderer error: {message}")]
    Renderer { message: String },

    /// The Dear ImGui context rejected a setting
    #[error("UI context error: {0}")]
    UiContext(#[from] dear_imgui_rs::ImGuiError),
}

impl SkeletonError {
    /// Create a renderer error from any displayable backend error
    pub fn renderer(err: impl std::fmt::Display) -> Self {
        Self::Renderer {
            message: err.to_string(),
        }
    }

    /// Create an incompatible-surface error
    pub fn incompatible_surface(reason: impl Into<String>) -> Self {
        Self::IncompatibleSurface {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_error_keeps_message() {
        let err = SkeletonError::renderer("pipeline creation failed");
        assert_eq!(err.to_string(), "Renderer error: pipeline creation failed");
    }
}
