//! Application configuration
//!
//! Everything is fixed at startup; no command-line arguments are read.
//! Defaults give the stock 720x500 demo window.

use std::path::PathBuf;
use std::time::Duration;

/// Startup configuration for the window, surface and UI context
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub window_title: String,
    /// Logical window size before DPI scaling
    pub base_size: (f64, f64),
    /// Top-left position of the window in physical screen pixels
    pub position: (f64, f64),
    /// Initial clear color (RGBA, straight alpha)
    pub clear_color: [f32; 4],
    /// How long to sleep while the surface stays occluded
    pub occlusion_backoff: Duration,
    pub present_mode: wgpu::PresentMode,
    pub nav_keyboard: bool,
    pub nav_gamepad: bool,
    /// Dear ImGui ini file. `None` keeps UI state from persisting between runs.
    pub ini_filename: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: format!("Dear ImGui wgpu Skeleton - {}", env!("CARGO_PKG_VERSION")),
            base_size: (720.0, 500.0),
            position: (100.0, 100.0),
            clear_color: [0.45, 0.55, 0.60, 1.00],
            occlusion_backoff: Duration::from_millis(10),
            present_mode: wgpu::PresentMode::Fifo,
            nav_keyboard: true,
            nav_gamepad: true,
            ini_filename: None,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_base_size(mut self, width: f64, height: f64) -> Self {
        self.base_size = (width, height);
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_occlusion_backoff(mut self, backoff: Duration) -> Self {
        self.occlusion_backoff = backoff;
        self
    }

    pub fn with_ini_filename(mut self, path: Option<PathBuf>) -> Self {
        self.ini_filename = path;
        self
    }

    /// Window size after applying the monitor's DPI factor.
    ///
    /// Non-finite or non-positive factors fall back to 1.0.
    pub fn scaled_size(&self, scale_factor: f64) -> (f64, f64) {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        (
            (self.base_size.0 * scale).trunc(),
            (self.base_size.1 * scale).trunc(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_window() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.base_size, (720.0, 500.0));
        assert_eq!(cfg.clear_color, [0.45, 0.55, 0.60, 1.00]);
        assert_eq!(cfg.occlusion_backoff, Duration::from_millis(10));
        assert_eq!(cfg.present_mode, wgpu::PresentMode::Fifo);
        assert!(cfg.ini_filename.is_none());
    }

    #[test]
    fn scaled_size_truncates_like_integer_cast() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scaled_size(1.0), (720.0, 500.0));
        assert_eq!(cfg.scaled_size(1.25), (900.0, 625.0));
        assert_eq!(cfg.scaled_size(1.333), (959.0, 666.0));
    }

    #[test]
    fn scaled_size_ignores_bogus_factors() {
        let cfg = AppConfig::default().with_base_size(640.0, 480.0);
        assert_eq!(cfg.scaled_size(0.0), (640.0, 480.0));
        assert_eq!(cfg.scaled_size(f64::NAN), (640.0, 480.0));
    }
}
