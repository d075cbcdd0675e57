//! Demo UI content
//!
//! Rebuilt from [`UiState`] every frame. Widget calls go through the
//! [`Widgets`] trait so the content can be driven without a live ImGui
//! context.

use dear_imgui_rs::{Condition, Ui};

/// Values behind the demo widgets. Lives only as long as the process.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    /// Shows the library's built-in demo window. Off at startup, so the
    /// first frame carries only "Hello, world!".
    pub show_demo_window: bool,
    pub show_another_window: bool,
    pub slider_value: f32,
    pub counter: i32,
    /// RGBA, straight alpha. The color editor touches RGB only.
    pub clear_color: [f32; 4],
}

impl Default for UiState {
    fn default() -> Self {
        Self::with_clear_color([0.45, 0.55, 0.60, 1.00])
    }
}

impl UiState {
    pub fn with_clear_color(clear_color: [f32; 4]) -> Self {
        Self {
            show_demo_window: false,
            show_another_window: false,
            slider_value: 0.0,
            counter: 0,
            clear_color,
        }
    }

    /// Clear color with RGB multiplied by alpha
    pub fn premultiplied_clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color {
            r: (r * a) as f64,
            g: (g * a) as f64,
            b: (b * a) as f64,
            a: a as f64,
        }
    }
}

/// The handful of widget calls the demo needs
pub trait Widgets {
    /// A top-level window; `build` runs only when the window is visible
    fn panel<F: FnOnce()>(&self, title: &str, build: F);
    fn text(&self, text: &str);
    fn checkbox(&self, label: &str, value: &mut bool) -> bool;
    fn slider(&self, label: &str, value: &mut f32, min: f32, max: f32) -> bool;
    fn color_edit(&self, label: &str, rgb: &mut [f32; 3]) -> bool;
    fn button(&self, label: &str) -> bool;
    fn same_line(&self);
    fn library_demo(&self, open: &mut bool);
}

impl Widgets for Ui {
    fn panel<F: FnOnce()>(&self, title: &str, build: F) {
        Ui::window(self, title)
            .size([400.0, 220.0], Condition::FirstUseEver)
            .build(build);
    }

    fn text(&self, text: &str) {
        Ui::text(self, text);
    }

    fn checkbox(&self, label: &str, value: &mut bool) -> bool {
        Ui::checkbox(self, label, value)
    }

    fn slider(&self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        Ui::slider_f32(self, label, value, min, max)
    }

    fn color_edit(&self, label: &str, rgb: &mut [f32; 3]) -> bool {
        Ui::color_edit3(self, label, rgb)
    }

    fn button(&self, label: &str) -> bool {
        Ui::button(self, label)
    }

    fn same_line(&self) {
        Ui::same_line(self);
    }

    fn library_demo(&self, open: &mut bool) {
        Ui::show_demo_window(self, open);
    }
}

/// Declare the demo UI for this frame.
pub fn build_demo<W: Widgets>(ui: &W, state: &mut UiState, framerate: f32) {
    if state.show_demo_window {
        ui.library_demo(&mut state.show_demo_window);
    }

    ui.panel("Hello, world!", || {
        ui.text("This is some useful text.");
        ui.checkbox("Demo Window", &mut state.show_demo_window);
        ui.checkbox("Another Window", &mut state.show_another_window);

        ui.slider("float", &mut state.slider_value, 0.0, 1.0);

        let [r, g, b, a] = state.clear_color;
        let mut rgb = [r, g, b];
        if ui.color_edit("clear color", &mut rgb) {
            state.clear_color = [rgb[0], rgb[1], rgb[2], a];
        }

        if ui.button("Button") {
            state.counter += 1;
        }
        ui.same_line();
        ui.text(&format!("counter = {}", state.counter));

        ui.text(&frame_time_label(framerate));
    });

    if state.show_another_window {
        ui.panel("Another Window", || {
            ui.text("Hello from another window!");
            if ui.button("Close Me") {
                state.show_another_window = false;
            }
        });
    }
}

fn frame_time_label(framerate: f32) -> String {
    if framerate > 0.0 {
        format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            1000.0 / framerate,
            framerate
        )
    } else {
        "Application average -- ms/frame (-- FPS)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiplies_by_alpha() {
        let state = UiState::with_clear_color([1.0, 0.5, 0.25, 0.5]);
        let c = state.premultiplied_clear_color();
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 0.125, 0.5));
    }

    #[test]
    fn frame_time_label_handles_zero_framerate() {
        assert_eq!(
            frame_time_label(0.0),
            "Application average -- ms/frame (-- FPS)"
        );
        assert_eq!(
            frame_time_label(50.0),
            "Application average 20.000 ms/frame (50.0 FPS)"
        );
    }
}
