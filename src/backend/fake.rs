//! In-memory display used by unit tests
//!
//! Serves a fixed window tree and keyboard mapping, and records every event
//! sent so tests can assert on the exact sequence.

use std::cell::RefCell;
use std::collections::HashMap;

use x11rb::errors::ConnectionError;

use super::{Atom, DisplayBackend, EventKind, Geometry, InputEvent, PointerState, RawImage, WmClass, WindowId};
use crate::error::{Error, Result};
use crate::keys::KeyboardMapping;

pub(crate) struct FakeDisplay {
    root: WindowId,
    children: HashMap<WindowId, Vec<WindowId>>,
    names: HashMap<WindowId, String>,
    classes: HashMap<WindowId, WmClass>,
    mapping: KeyboardMapping,
    /// Window whose QueryTree fails
    failing: Option<WindowId>,
    sent: RefCell<Vec<(WindowId, InputEvent)>>,
}

const MIN_KEYCODE: u8 = 8;

impl FakeDisplay {
    pub const ROOT: WindowId = 0x100;

    pub const KEY_A: u8 = 38;
    pub const KEY_B: u8 = 56;
    pub const KEY_SHIFT: u8 = 50;
    pub const KEY_CONTROL: u8 = 37;
    pub const KEY_ALT: u8 = 64;
    pub const KEY_RETURN: u8 = 36;

    pub fn new() -> Self {
        let mut keysyms = vec![0u32; 2 * 248];
        let mut bind = |keycode: u8, unshifted: u32, shifted: u32| {
            let index = usize::from(keycode - MIN_KEYCODE) * 2;
            keysyms[index] = unshifted;
            keysyms[index + 1] = shifted;
        };
        bind(Self::KEY_A, 0x61, 0x41);
        bind(Self::KEY_B, 0x62, 0x42);
        bind(Self::KEY_SHIFT, 0xffe1, 0);
        bind(Self::KEY_CONTROL, 0xffe3, 0);
        bind(Self::KEY_ALT, 0xffe9, 0xffe7);
        bind(Self::KEY_RETURN, 0xff0d, 0);

        Self {
            root: Self::ROOT,
            children: HashMap::new(),
            names: HashMap::new(),
            classes: HashMap::new(),
            mapping: KeyboardMapping {
                min_keycode: MIN_KEYCODE,
                keysyms_per_keycode: 2,
                keysyms,
            },
            failing: None,
            sent: RefCell::new(Vec::new()),
        }
    }

    /// Add `window` as the top-most child of `parent`
    pub fn with_window(mut self, parent: WindowId, window: WindowId, name: Option<&str>, class: Option<(&str, &str)>) -> Self {
        self.children.entry(parent).or_default().push(window);
        if let Some(name) = name {
            self.names.insert(window, name.to_string());
        }
        if let Some((instance, class)) = class {
            self.classes.insert(
                window,
                WmClass {
                    instance: instance.to_string(),
                    class: class.to_string(),
                },
            );
        }
        self
    }

    /// Make listing the children of `window` fail as a dropped connection would
    pub fn with_failing_window(mut self, window: WindowId) -> Self {
        self.failing = Some(window);
        self
    }

    /// Every event sent so far
    pub fn sent(&self) -> Vec<(WindowId, InputEvent)> {
        self.sent.borrow().clone()
    }

    /// Sent events reduced to kind and detail
    pub fn sent_kinds(&self) -> Vec<(EventKind, u8)> {
        self.sent.borrow().iter().map(|(_, e)| (e.kind, e.detail)).collect()
    }
}

impl DisplayBackend for FakeDisplay {
    fn root(&self) -> WindowId {
        self.root
    }

    fn children(&self, window: WindowId) -> Result<Vec<WindowId>> {
        if self.failing == Some(window) {
            return Err(Error::Connection(ConnectionError::UnknownError));
        }
        Ok(self.children.get(&window).cloned().unwrap_or_default())
    }

    fn window_name(&self, window: WindowId) -> Result<Option<String>> {
        Ok(self.names.get(&window).cloned())
    }

    fn window_class(&self, window: WindowId) -> Result<Option<WmClass>> {
        Ok(self.classes.get(&window).cloned())
    }

    fn geometry(&self, _window: WindowId) -> Result<Geometry> {
        Ok(Geometry {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        })
    }

    fn send_event(&self, window: WindowId, event: &InputEvent) -> Result<()> {
        self.sent.borrow_mut().push((window, *event));
        Ok(())
    }

    fn keyboard_mapping(&self) -> Result<KeyboardMapping> {
        Ok(self.mapping.clone())
    }

    fn get_image(&self, _window: WindowId, _x: i16, _y: i16, width: u16, height: u16) -> Result<RawImage> {
        Ok(RawImage {
            depth: 24,
            data: vec![0; usize::from(width) * usize::from(height) * 4],
        })
    }

    fn query_pointer(&self) -> Result<PointerState> {
        Ok(PointerState {
            same_screen: true,
            root: self.root,
            ..PointerState::default()
        })
    }

    fn intern_atom(&self, _name: &str) -> Result<Option<Atom>> {
        Ok(None)
    }

    fn property_u32(&self, _window: WindowId, _property: Atom, _length: u32) -> Result<Vec<u32>> {
        Ok(Vec::new())
    }
}
