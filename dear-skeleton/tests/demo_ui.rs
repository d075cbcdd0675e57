//! Demo UI content, scripted and against a headless Dear ImGui context

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use dear_imgui_rs as imgui;
use dear_skeleton::{UiState, Widgets, build_demo};

fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(())).lock().unwrap()
}

/// Records what was drawn and "clicks" the labels it is told to
#[derive(Default)]
struct ScriptedWidgets {
    press: HashSet<&'static str>,
    toggle: HashSet<&'static str>,
    slider_to: Option<f32>,
    color_to: Option<[f32; 3]>,
    panels: RefCell<Vec<String>>,
    texts: RefCell<Vec<String>>,
    library_demo_shown: RefCell<bool>,
}

impl ScriptedWidgets {
    fn pressing(labels: &[&'static str]) -> Self {
        Self {
            press: labels.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn texts(&self) -> Vec<String> {
        self.texts.borrow().clone()
    }
}

impl Widgets for ScriptedWidgets {
    fn panel<F: FnOnce()>(&self, title: &str, build: F) {
        self.panels.borrow_mut().push(title.to_string());
        build();
    }

    fn text(&self, text: &str) {
        self.texts.borrow_mut().push(text.to_string());
    }

    fn checkbox(&self, label: &str, value: &mut bool) -> bool {
        if self.toggle.contains(label) {
            *value = !*value;
            return true;
        }
        false
    }

    fn slider(&self, _label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        match self.slider_to {
            Some(v) => {
                *value = v.clamp(min, max);
                true
            }
            None => false,
        }
    }

    fn color_edit(&self, _label: &str, rgb: &mut [f32; 3]) -> bool {
        match self.color_to {
            Some(c) => {
                *rgb = c;
                true
            }
            None => false,
        }
    }

    fn button(&self, label: &str) -> bool {
        self.press.contains(label)
    }

    fn same_line(&self) {}

    fn library_demo(&self, _open: &mut bool) {
        *self.library_demo_shown.borrow_mut() = true;
    }
}

#[test]
fn fresh_state_starts_at_zero() {
    let state = UiState::default();
    assert_eq!(state.counter, 0);
    assert_eq!(state.slider_value, 0.0);
    assert!(!state.show_demo_window);
    assert!(!state.show_another_window);
}

#[test]
fn default_frame_draws_only_the_main_panel() {
    let widgets = ScriptedWidgets::default();
    let mut state = UiState::default();
    build_demo(&widgets, &mut state, 60.0);
    assert_eq!(*widgets.panels.borrow(), vec!["Hello, world!".to_string()]);
    assert!(!*widgets.library_demo_shown.borrow());
}

#[test]
fn clicking_button_n_times_counts_to_n() {
    let clicking = ScriptedWidgets::pressing(&["Button"]);
    let mut state = UiState::default();

    for _ in 0..7 {
        build_demo(&clicking, &mut state, 60.0);
    }

    assert_eq!(state.counter, 7);
    let idle = ScriptedWidgets::default();
    build_demo(&idle, &mut state, 60.0);
    assert!(idle.texts().contains(&"counter = 7".to_string()));
}

#[test]
fn frames_without_clicks_leave_counter_alone() {
    let idle = ScriptedWidgets::default();
    let mut state = UiState::default();
    for _ in 0..3 {
        build_demo(&idle, &mut state, 60.0);
    }
    assert_eq!(state.counter, 0);
}

#[test]
fn color_edit_keeps_alpha() {
    let widgets = ScriptedWidgets {
        color_to: Some([0.1, 0.2, 0.3]),
        ..Default::default()
    };
    let mut state = UiState::with_clear_color([0.45, 0.55, 0.60, 0.5]);

    build_demo(&widgets, &mut state, 60.0);

    assert_eq!(state.clear_color, [0.1, 0.2, 0.3, 0.5]);
}

#[test]
fn slider_stays_in_range() {
    let widgets = ScriptedWidgets {
        slider_to: Some(4.0),
        ..Default::default()
    };
    let mut state = UiState::default();
    build_demo(&widgets, &mut state, 60.0);
    assert_eq!(state.slider_value, 1.0);
}

#[test]
fn another_window_opens_and_closes() {
    let open = ScriptedWidgets {
        toggle: ["Another Window"].into_iter().collect(),
        ..Default::default()
    };
    let mut state = UiState::default();
    build_demo(&open, &mut state, 60.0);
    assert!(state.show_another_window);

    let shown = ScriptedWidgets::default();
    build_demo(&shown, &mut state, 60.0);
    assert_eq!(
        *shown.panels.borrow(),
        vec!["Hello, world!".to_string(), "Another Window".to_string()]
    );

    let close = ScriptedWidgets::pressing(&["Close Me"]);
    build_demo(&close, &mut state, 60.0);
    assert!(!state.show_another_window);
}

#[test]
fn library_demo_follows_checkbox() {
    let mut state = UiState::default();
    let show = ScriptedWidgets {
        toggle: ["Demo Window"].into_iter().collect(),
        ..Default::default()
    };
    build_demo(&show, &mut state, 60.0);
    assert!(state.show_demo_window);

    let shown = ScriptedWidgets::default();
    build_demo(&shown, &mut state, 60.0);
    assert!(*shown.library_demo_shown.borrow());

    let hide = ScriptedWidgets {
        toggle: ["Demo Window"].into_iter().collect(),
        ..Default::default()
    };
    build_demo(&hide, &mut state, 60.0);
    assert!(!state.show_demo_window);

    let after = ScriptedWidgets::default();
    build_demo(&after, &mut state, 60.0);
    assert!(!*after.library_demo_shown.borrow());
}

#[test]
fn demo_builds_in_headless_context() {
    let _guard = test_guard();

    let mut ctx = imgui::Context::create();
    {
        let io = ctx.io_mut();
        io.set_display_size([1280.0, 720.0]);
        io.set_delta_time(1.0 / 60.0);
        let flags = io.backend_flags() | imgui::BackendFlags::RENDERER_HAS_TEXTURES;
        io.set_backend_flags(flags);
    }
    let _ = ctx.set_ini_filename::<std::path::PathBuf>(None);

    let mut state = UiState::default();
    for _ in 0..2 {
        let ui = ctx.frame();
        build_demo(&*ui, &mut state, 60.0);
        let _ = ctx.render();
    }

    assert_eq!(state.counter, 0);
    assert!(!state.show_demo_window);
}
