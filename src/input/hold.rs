//! Keep a key held down while other input happens

use crate::backend::{DisplayBackend, WindowId};
use crate::error::Result;
use crate::keys::key_code;

use super::{key_press, key_release};

/// A key pressed on a window until the guard goes away
///
/// The release is sent exactly once: by [`KeyHold::release`], or on drop if
/// the guard is dropped first (including while unwinding). A release that
/// fails during drop is logged, since it cannot be returned.
pub struct KeyHold<'a, B: DisplayBackend + ?Sized> {
    backend: &'a B,
    window: WindowId,
    keycode: u8,
    held: bool,
}

impl<'a, B: DisplayBackend + ?Sized> KeyHold<'a, B> {
    /// Resolve `key` and press it on `window`
    pub fn press(backend: &'a B, window: WindowId, key: &str) -> Result<Self> {
        let keycode = key_code(backend, key)?;
        key_press(backend, window, keycode, 0)?;

        Ok(Self {
            backend,
            window,
            keycode,
            held: true,
        })
    }

    pub fn keycode(&self) -> u8 {
        self.keycode
    }

    /// Release the key now and report whether the release was sent
    pub fn release(mut self) -> Result<()> {
        self.held = false;
        key_release(self.backend, self.window, self.keycode, 0)
    }
}

impl<B: DisplayBackend + ?Sized> Drop for KeyHold<'_, B> {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        if let Err(e) = key_release(self.backend, self.window, self.keycode, 0) {
            tracing::warn!("Failed to release keycode {} on {:#x}: {}", self.keycode, self.window, e);
        }
    }
}

/// Run `f` with `key` held on `window`
pub fn with_key_held<B, T, F>(backend: &B, window: WindowId, key: &str, f: F) -> Result<T>
where
    B: DisplayBackend + ?Sized,
    F: FnOnce() -> T,
{
    let hold = KeyHold::press(backend, window, key)?;
    let output = f();
    hold.release()?;
    Ok(output)
}
