//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise this crate logs at info and
//! everything else (wgpu, winit, the ImGui backends) at warn.

use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "dear_skeleton=info,warn";

/// Initialize the global tracing subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Rolling frame-time statistics, logged every `window` frames
pub(crate) struct FrameStats {
    window: u64,
    frames: u64,
    accumulated: f32,
}

impl FrameStats {
    pub(crate) fn new(window: u64) -> Self {
        Self {
            window: window.max(1),
            frames: 0,
            accumulated: 0.0,
        }
    }

    /// Record one frame; returns the average frame time when a window completes.
    pub(crate) fn record(&mut self, delta_secs: f32) -> Option<f32> {
        self.frames += 1;
        self.accumulated += delta_secs;
        if self.frames % self.window != 0 {
            return None;
        }
        let avg = self.accumulated / self.window as f32;
        self.accumulated = 0.0;
        if avg > 0.0 {
            debug!("Frame time: {:.2}ms, FPS: {:.1}", avg * 1000.0, 1.0 / avg);
        }
        Some(avg)
    }
}

pub(crate) fn log_backend_init(platform: &str, renderer: &str) {
    info!("Dear ImGui {platform} platform and {renderer} renderer initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_report_once_per_window() {
        let mut stats = FrameStats::new(4);
        assert_eq!(stats.record(0.01), None);
        assert_eq!(stats.record(0.01), None);
        assert_eq!(stats.record(0.02), None);
        let avg = stats.record(0.02).expect("window complete");
        assert!((avg - 0.015).abs() < 1e-6);
        assert_eq!(stats.record(0.5), None);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
