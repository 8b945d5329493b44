//! Input simulation via synthetic X events
//!
//! Every event is sent straight to the target window with SendEvent, so it
//! reaches the application without moving the real pointer or changing
//! focus. Fixed sleeps separate presses from releases so applications see
//! them as distinct.

mod hold;

use std::thread::sleep;
use std::time::Duration;

use crate::backend::{DisplayBackend, EventKind, InputEvent, WindowId};
use crate::error::Result;
use crate::keys::{parse_key_spec, resolve_key_spec};

pub use hold::{KeyHold, with_key_held};

/// Pause after every key press or release
pub const KEY_EVENT_INTERVAL: Duration = Duration::from_millis(24);

/// How long a mouse button stays down during a click
pub const MOUSE_HELD_DURATION: Duration = Duration::from_millis(24);

/// Motion detail for an ordinary (non-hint) motion event
const MOTION_NORMAL: u8 = 0;

/// X pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    /// Button 3 in the core protocol; 2 is the middle button
    Right,
    ScrollUp,
    ScrollDown,
}

impl MouseButton {
    /// Core protocol button number
    pub fn code(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

/// Send one synthetic event to `window` and flush
///
/// `x`/`y` are window-relative. The event's root coordinates are left at
/// zero.
pub fn send<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    kind: EventKind,
    detail: u8,
    x: i16,
    y: i16,
    modifiers: u16,
) -> Result<()> {
    let event = InputEvent {
        kind,
        detail,
        x,
        y,
        state: modifiers,
    };
    tracing::debug!("Sending {:?} to {:#x}", event, window);
    backend.send_event(window, &event)
}

pub fn mouse_move<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId, x: i16, y: i16) -> Result<()> {
    send(backend, window, EventKind::Motion, MOTION_NORMAL, x, y, 0)
}

pub fn mouse_down<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    button: MouseButton,
) -> Result<()> {
    send(backend, window, EventKind::ButtonPress, button.code(), x, y, 0)
}

pub fn mouse_up<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    button: MouseButton,
) -> Result<()> {
    send(backend, window, EventKind::ButtonRelease, button.code(), x, y, 0)
}

/// Move to `(x, y)`, press `button`, hold briefly, release
///
/// Returns the button clicked.
pub fn click<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    button: MouseButton,
) -> Result<MouseButton> {
    mouse_move(backend, window, x, y)?;
    mouse_down(backend, window, x, y, button)?;
    sleep(MOUSE_HELD_DURATION);
    mouse_up(backend, window, x, y, button)?;
    Ok(button)
}

pub fn click_left<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId, x: i16, y: i16) -> Result<MouseButton> {
    click(backend, window, x, y, MouseButton::Left)
}

pub fn click_right<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId, x: i16, y: i16) -> Result<MouseButton> {
    click(backend, window, x, y, MouseButton::Right)
}

/// Scroll up `repeat` notches at `(x, y)`; returns `repeat`
pub fn scroll_up<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    repeat: usize,
) -> Result<usize> {
    scroll(backend, window, x, y, repeat, MouseButton::ScrollUp)
}

/// Scroll down `repeat` notches at `(x, y)`; returns `repeat`
pub fn scroll_down<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    repeat: usize,
) -> Result<usize> {
    scroll(backend, window, x, y, repeat, MouseButton::ScrollDown)
}

fn scroll<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    repeat: usize,
    wheel: MouseButton,
) -> Result<usize> {
    mouse_move(backend, window, x, y)?;
    for _ in 0..repeat {
        mouse_down(backend, window, x, y, wheel)?;
        sleep(MOUSE_HELD_DURATION);
        mouse_up(backend, window, x, y, wheel)?;
    }
    Ok(repeat)
}

pub fn key_press<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId, keycode: u8, modifiers: u16) -> Result<()> {
    send(backend, window, EventKind::KeyPress, keycode, 0, 0, modifiers)
}

pub fn key_release<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId, keycode: u8, modifiers: u16) -> Result<()> {
    send(backend, window, EventKind::KeyRelease, keycode, 0, 0, modifiers)
}

/// Type a key spec such as `a`, `Return` or `control+shift+t`
///
/// Modifiers are pressed in order and held while the primary keys are
/// pressed and released `repeat` times, then released in reverse order.
/// Every key is resolved before the first event goes out.
pub fn send_key<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    spec: &str,
    repeat: usize,
    modifiers: u16,
) -> Result<()> {
    let keys = resolve_key_spec(backend, &parse_key_spec(spec))?;

    for &keycode in &keys.modifiers {
        key_press(backend, window, keycode, modifiers)?;
        sleep(KEY_EVENT_INTERVAL);
    }

    for _ in 0..repeat {
        for &keycode in &keys.primaries {
            key_press(backend, window, keycode, modifiers)?;
            sleep(KEY_EVENT_INTERVAL);
            key_release(backend, window, keycode, modifiers)?;
            sleep(KEY_EVENT_INTERVAL);
        }
    }

    for &keycode in keys.modifiers.iter().rev() {
        key_release(backend, window, keycode, modifiers)?;
        sleep(KEY_EVENT_INTERVAL);
    }

    Ok(())
}

/// `send_key` each spec once; returns how many were sent
pub fn send_keys<B, I, S>(backend: &B, window: WindowId, specs: I) -> Result<usize>
where
    B: DisplayBackend + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sent = 0;
    for spec in specs {
        send_key(backend, window, spec.as_ref(), 1, 0)?;
        sent += 1;
    }
    Ok(sent)
}
