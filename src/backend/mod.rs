//! Display backend abstraction
//!
//! Every exul operation is phrased against [`DisplayBackend`], the handful of
//! X11 requests the library needs. [`X11Connection`] is the real
//! implementation; tests swap in a recording fake or a mock.

mod x11;

#[cfg(test)]
pub(crate) mod fake;

use serde::Serialize;

use crate::error::Result;
use crate::keys::KeyboardMapping;

pub use x11::X11Connection;

/// Server-assigned window id
pub type WindowId = u32;

/// Server-interned property name
pub type Atom = u32;

/// Window geometry as reported by GetGeometry (relative to the parent)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// The two halves of `WM_CLASS`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WmClass {
    /// Instance name, the first string
    pub instance: String,
    /// Class, the second string
    pub class: String,
}

/// Kind of synthetic input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    KeyPress,
    KeyRelease,
    ButtonPress,
    ButtonRelease,
    Motion,
}

/// One synthetic input event addressed to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Keycode for key events, button for button events, motion hint for motion
    pub detail: u8,
    /// Pointer position relative to the target window
    pub x: i16,
    pub y: i16,
    /// Modifier and button state just before the event
    pub state: u16,
}

/// Raw Z-pixmap bytes returned by GetImage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImage {
    pub depth: u8,
    pub data: Vec<u8>,
}

/// Unrefined QueryPointer reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointerState {
    pub same_screen: bool,
    pub root: WindowId,
    pub child: WindowId,
    pub root_x: i16,
    pub root_y: i16,
    pub win_x: i16,
    pub win_y: i16,
    pub mask: u16,
}

/// The X11 requests exul is built from
#[cfg_attr(test, mockall::automock)]
pub trait DisplayBackend {
    /// Root window of the default screen
    fn root(&self) -> WindowId;

    /// Direct children of a window, bottom-most first
    fn children(&self, window: WindowId) -> Result<Vec<WindowId>>;

    /// Window title, if it has one
    fn window_name(&self, window: WindowId) -> Result<Option<String>>;

    /// `WM_CLASS`, if set
    fn window_class(&self, window: WindowId) -> Result<Option<WmClass>>;

    fn geometry(&self, window: WindowId) -> Result<Geometry>;

    /// Send an event to a window and flush; delivery is not confirmed
    fn send_event(&self, window: WindowId, event: &InputEvent) -> Result<()>;

    /// Keyboard mapping as the server holds it right now
    fn keyboard_mapping(&self) -> Result<KeyboardMapping>;

    fn get_image(
        &self,
        window: WindowId,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
    ) -> Result<RawImage>;

    fn query_pointer(&self) -> Result<PointerState>;

    /// Look up an existing atom without creating it
    fn intern_atom(&self, name: &str) -> Result<Option<Atom>>;

    /// Read up to `length` 32-bit items of a property of any type
    fn property_u32(&self, window: WindowId, property: Atom, length: u32) -> Result<Vec<u32>>;
}
