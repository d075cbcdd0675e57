//! Window procedure as a pure state machine
//!
//! The winit adapter in [`crate::window`] translates native events into
//! [`WindowMessage`]s, hands each one to the UI backend first and then calls
//! [`window_proc`]. The result says what the frame loop has to do later:
//! a resize is only ever recorded here and applied between frames.

use tracing::{debug, trace};

use crate::surface::SurfaceSize;

/// Platform-neutral view of the native messages the skeleton reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMessage {
    /// Client area changed size. `minimized` mirrors the OS "minimized" reason.
    Resize { size: SurfaceSize, minimized: bool },
    /// Press of a key that would open the system menu (bare Alt, F10).
    ///
    /// winit delivers the event after the OS has seen the key and offers no
    /// way to cancel the default action, so on platforms with a system menu
    /// this only keeps the key away from local handling.
    SystemMenuKey,
    /// The OS reports the window as hidden (`true`) or visible again
    Occlusion(bool),
    /// User asked to close the window
    CloseRequested,
    /// Window is being destroyed
    Destroyed,
    /// Everything else; only the UI backend cares
    Other,
}

/// State carried between messages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowState {
    pub minimized: bool,
    pub occluded: bool,
}

/// What happens to the pending resize slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeRequest {
    Keep,
    Set(SurfaceSize),
    Clear,
}

/// Who ended up handling a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The UI backend reported the message as consumed
    ConsumedByUi,
    /// Handled locally
    Handled,
    /// Dropped without local handling; the OS default is not cancelled
    Suppressed,
    /// Left to default OS handling
    Default,
}

/// Output of one [`window_proc`] step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: WindowState,
    pub resize: ResizeRequest,
    pub quit: bool,
    pub disposition: Disposition,
}

impl Transition {
    fn unchanged(state: WindowState, disposition: Disposition) -> Self {
        Self {
            state,
            resize: ResizeRequest::Keep,
            quit: false,
            disposition,
        }
    }
}

/// Process one message.
///
/// `ui_consumed` is the UI backend's verdict for the same message; when it
/// is set no local handling happens.
pub fn window_proc(state: WindowState, message: &WindowMessage, ui_consumed: bool) -> Transition {
    if ui_consumed {
        return Transition::unchanged(state, Disposition::ConsumedByUi);
    }

    match *message {
        WindowMessage::Resize { size, minimized } => {
            if minimized || size.is_empty() {
                Transition {
                    state: WindowState {
                        minimized: true,
                        ..state
                    },
                    resize: ResizeRequest::Clear,
                    quit: false,
                    disposition: Disposition::Handled,
                }
            } else {
                Transition {
                    state: WindowState {
                        minimized: false,
                        ..state
                    },
                    resize: ResizeRequest::Set(size),
                    quit: false,
                    disposition: Disposition::Handled,
                }
            }
        }
        WindowMessage::SystemMenuKey => Transition::unchanged(state, Disposition::Suppressed),
        WindowMessage::Occlusion(occluded) => Transition::unchanged(
            WindowState { occluded, ..state },
            Disposition::Handled,
        ),
        WindowMessage::CloseRequested | WindowMessage::Destroyed => Transition {
            state,
            resize: ResizeRequest::Keep,
            quit: true,
            disposition: Disposition::Handled,
        },
        WindowMessage::Other => Transition::unchanged(state, Disposition::Default),
    }
}

/// Event-side state owned by the application context.
///
/// Holds the window state, the single pending resize slot and the quit flag.
#[derive(Debug, Default)]
pub struct EventState {
    window: WindowState,
    pending_resize: Option<SurfaceSize>,
    quit: bool,
}

impl EventState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one message through [`window_proc`] and fold the result in.
    pub fn dispatch(&mut self, message: &WindowMessage, ui_consumed: bool) -> Disposition {
        let transition = window_proc(self.window, message, ui_consumed);
        if transition.state != self.window {
            debug!(from = ?self.window, to = ?transition.state, "window state changed");
        }
        self.window = transition.state;
        match transition.resize {
            ResizeRequest::Keep => {}
            ResizeRequest::Set(size) => {
                trace!(width = size.width, height = size.height, "resize queued");
                self.pending_resize = Some(size);
            }
            ResizeRequest::Clear => self.pending_resize = None,
        }
        self.quit |= transition.quit;
        transition.disposition
    }

    /// Take the queued resize, if any. Each recorded resize is returned once.
    pub fn take_pending_resize(&mut self) -> Option<SurfaceSize> {
        self.pending_resize.take()
    }

    pub fn pending_resize(&self) -> Option<SurfaceSize> {
        self.pending_resize
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn window_state(&self) -> WindowState {
        self.window
    }
}
