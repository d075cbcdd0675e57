//! winit adapter for the window procedure
//!
//! Creates the window and drains native events with
//! `EventLoopExtPumpEvents::pump_app_events` and a zero timeout, so the
//! frame loop keeps control of the thread. Each event goes to the UI
//! backend first, then through [`crate::window_proc`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::error::OsError;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::error::{Result, SkeletonError};
use crate::surface::SurfaceSize;
use crate::ui_layer::UiLayer;
use crate::window_proc::{Disposition, EventState, WindowMessage};

/// Pump attempts allowed before giving up on window creation
const CREATE_ATTEMPTS: usize = 1000;

/// The bits of window state [`translate`] needs besides the event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub minimized: bool,
    pub inner_size: SurfaceSize,
}

impl WindowSnapshot {
    pub fn of(window: &Window) -> Self {
        Self {
            minimized: window.is_minimized() == Some(true),
            inner_size: window.inner_size().into(),
        }
    }
}

/// Keys that would activate the OS system menu
pub fn is_system_menu_key(key: &Key) -> bool {
    matches!(key, Key::Named(NamedKey::Alt | NamedKey::F10))
}

/// A fresh press of a system menu key; releases and auto-repeats don't count
pub fn is_system_menu_press(key: &Key, state: ElementState, repeat: bool) -> bool {
    state == ElementState::Pressed && !repeat && is_system_menu_key(key)
}

/// Map a winit event onto the window procedure's message set.
pub fn translate(event: &WindowEvent, snapshot: WindowSnapshot) -> WindowMessage {
    match event {
        WindowEvent::Resized(size) => {
            let size = SurfaceSize::from(*size);
            WindowMessage::Resize {
                size,
                minimized: snapshot.minimized || size.is_empty(),
            }
        }
        WindowEvent::ScaleFactorChanged { .. } => WindowMessage::Resize {
            size: snapshot.inner_size,
            minimized: snapshot.minimized || snapshot.inner_size.is_empty(),
        },
        WindowEvent::Occluded(occluded) => WindowMessage::Occlusion(*occluded),
        WindowEvent::CloseRequested => WindowMessage::CloseRequested,
        WindowEvent::Destroyed => WindowMessage::Destroyed,
        WindowEvent::KeyboardInput { event, .. }
            if is_system_menu_press(&event.logical_key, event.state, event.repeat) =>
        {
            WindowMessage::SystemMenuKey
        }
        _ => WindowMessage::Other,
    }
}

struct WindowCreator<'a> {
    config: &'a AppConfig,
    created: Option<std::result::Result<Window, OsError>>,
}

impl ApplicationHandler for WindowCreator<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.created.is_some() {
            return;
        }
        let scale = event_loop
            .primary_monitor()
            .map(|monitor| monitor.scale_factor())
            .unwrap_or(1.0);
        let (width, height) = self.config.scaled_size(scale);
        let (x, y) = self.config.position;
        debug!(scale, width, height, "Creating window");

        let attributes = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_position(PhysicalPosition::new(x, y))
            .with_visible(false);
        self.created = Some(event_loop.create_window(attributes));
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Create the main window, hidden until the GPU stack is up.
pub fn create_window(event_loop: &mut EventLoop<()>, config: &AppConfig) -> Result<Arc<Window>> {
    let mut creator = WindowCreator {
        config,
        created: None,
    };
    for _ in 0..CREATE_ATTEMPTS {
        if creator.created.is_some() {
            break;
        }
        if let PumpStatus::Exit(_) = event_loop.pump_app_events(Some(Duration::ZERO), &mut creator)
        {
            break;
        }
    }
    match creator.created {
        Some(Ok(window)) => {
            info!("Window created");
            Ok(Arc::new(window))
        }
        Some(Err(e)) => Err(SkeletonError::WindowCreation(e)),
        None => Err(SkeletonError::WindowNotCreated),
    }
}

struct Dispatch<'a> {
    window: &'a Window,
    ui: Option<&'a mut UiLayer>,
    events: &'a mut EventState,
}

impl ApplicationHandler for Dispatch<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if window_id != self.window.id() {
            return;
        }

        let ui_consumed = match self.ui.as_deref_mut() {
            Some(ui) => ui.handle_window_event(self.window, &event),
            None => false,
        };

        let message = translate(&event, WindowSnapshot::of(self.window));
        if self.events.dispatch(&message, ui_consumed) == Disposition::Suppressed {
            debug!(?message, "Message suppressed");
        }
        if self.events.quit_requested() {
            event_loop.exit();
        }
    }
}

/// Drain every pending event without blocking.
///
/// Returns true once a quit has been observed.
pub fn pump_messages(
    event_loop: &mut EventLoop<()>,
    window: &Window,
    ui: Option<&mut UiLayer>,
    events: &mut EventState,
) -> bool {
    let mut dispatch = Dispatch {
        window,
        ui,
        events: &mut *events,
    };
    let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut dispatch);
    matches!(status, PumpStatus::Exit(_)) || events.quit_requested()
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn visible(width: u32, height: u32) -> WindowSnapshot {
        WindowSnapshot {
            minimized: false,
            inner_size: SurfaceSize::new(width, height),
        }
    }

    #[test]
    fn resized_maps_to_resize() {
        let msg = translate(
            &WindowEvent::Resized(PhysicalSize::new(800, 600)),
            visible(800, 600),
        );
        assert_eq!(
            msg,
            WindowMessage::Resize {
                size: SurfaceSize::new(800, 600),
                minimized: false
            }
        );
    }

    #[test]
    fn zero_resize_is_minimized() {
        let msg = translate(
            &WindowEvent::Resized(PhysicalSize::new(0, 0)),
            visible(800, 600),
        );
        assert!(matches!(
            msg,
            WindowMessage::Resize {
                minimized: true,
                ..
            }
        ));
    }

    #[test]
    fn minimized_snapshot_marks_resize() {
        let snapshot = WindowSnapshot {
            minimized: true,
            inner_size: SurfaceSize::new(800, 600),
        };
        let msg = translate(&WindowEvent::Resized(PhysicalSize::new(800, 600)), snapshot);
        assert!(matches!(
            msg,
            WindowMessage::Resize {
                minimized: true,
                ..
            }
        ));
    }

    #[test]
    fn lifecycle_events_map() {
        let snap = visible(1, 1);
        assert_eq!(
            translate(&WindowEvent::CloseRequested, snap),
            WindowMessage::CloseRequested
        );
        assert_eq!(
            translate(&WindowEvent::Destroyed, snap),
            WindowMessage::Destroyed
        );
        assert_eq!(
            translate(&WindowEvent::Occluded(true), snap),
            WindowMessage::Occlusion(true)
        );
        assert_eq!(
            translate(&WindowEvent::Focused(true), snap),
            WindowMessage::Other
        );
    }

    #[test]
    fn system_menu_keys() {
        assert!(is_system_menu_key(&Key::Named(NamedKey::Alt)));
        assert!(is_system_menu_key(&Key::Named(NamedKey::F10)));
        assert!(!is_system_menu_key(&Key::Named(NamedKey::F4)));
        assert!(!is_system_menu_key(&Key::Character(SmolStr::new("a"))));
    }

    #[test]
    fn only_fresh_presses_open_the_system_menu() {
        let alt = Key::Named(NamedKey::Alt);
        assert!(is_system_menu_press(&alt, ElementState::Pressed, false));
        assert!(!is_system_menu_press(&alt, ElementState::Released, false));
        assert!(!is_system_menu_press(&alt, ElementState::Pressed, true));
        assert!(!is_system_menu_press(
            &Key::Named(NamedKey::Enter),
            ElementState::Pressed,
            false
        ));
    }
}
