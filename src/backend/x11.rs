//! X11 display backend using x11rb

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    self, AtomEnum, ButtonPressEvent, ConnectionExt, EventMask, ImageFormat, KeyButMask,
    KeyPressEvent, Motion, MotionNotifyEvent, Window,
};
use x11rb::rust_connection::RustConnection;

use super::{Atom, DisplayBackend, EventKind, Geometry, InputEvent, PointerState, RawImage, WmClass, WindowId};
use crate::error::Result;
use crate::keys::KeyboardMapping;

/// An owned connection to an X server
pub struct X11Connection {
    conn: RustConnection,
    root: Window,
    atoms: X11Atoms,
}

/// Atoms needed to read window attributes
struct X11Atoms {
    net_wm_name: Atom,
    wm_class: Atom,
    wm_name: Atom,
    utf8_string: Atom,
}

impl X11Connection {
    /// Connect to `display`, or to `$DISPLAY` when `None`
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(display)?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = Self::intern_atoms(&conn)?;

        tracing::debug!("Connected to X server (screen {}, root {:#x})", screen_num, root);
        Ok(Self { conn, root, atoms })
    }

    /// Flush anything still queued and drop the connection
    pub fn close(self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }

    fn intern_atoms(conn: &RustConnection) -> Result<X11Atoms> {
        let net_wm_name = conn.intern_atom(false, b"_NET_WM_NAME")?.reply()?.atom;
        let wm_class = conn.intern_atom(false, b"WM_CLASS")?.reply()?.atom;
        let wm_name = conn.intern_atom(false, b"WM_NAME")?.reply()?.atom;
        let utf8_string = conn.intern_atom(false, b"UTF8_STRING")?.reply()?.atom;

        Ok(X11Atoms {
            net_wm_name,
            wm_class,
            wm_name,
            utf8_string,
        })
    }

    fn get_window_property(&self, window: Window, property: Atom, type_: Atom) -> Result<Option<Vec<u8>>> {
        let reply = self
            .conn
            .get_property(false, window, property, type_, 0, u32::MAX)?
            .reply()?;

        if reply.value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(reply.value))
        }
    }
}

impl DisplayBackend for X11Connection {
    fn root(&self) -> WindowId {
        self.root
    }

    fn children(&self, window: WindowId) -> Result<Vec<WindowId>> {
        Ok(self.conn.query_tree(window)?.reply()?.children)
    }

    fn window_name(&self, window: WindowId) -> Result<Option<String>> {
        // Prefer _NET_WM_NAME (UTF-8), fall back to WM_NAME
        if let Some(data) = self.get_window_property(window, self.atoms.net_wm_name, self.atoms.utf8_string)? {
            return Ok(Some(String::from_utf8_lossy(&data).into_owned()));
        }
        let name = self
            .get_window_property(window, self.atoms.wm_name, AtomEnum::STRING.into())?
            .map(|data| String::from_utf8_lossy(&data).into_owned());
        Ok(name)
    }

    fn window_class(&self, window: WindowId) -> Result<Option<WmClass>> {
        let Some(data) = self.get_window_property(window, self.atoms.wm_class, AtomEnum::STRING.into())? else {
            return Ok(None);
        };

        // Two NUL-terminated strings: instance then class
        let mut parts = data
            .split(|&b| b == 0)
            .map(|part| String::from_utf8_lossy(part).into_owned());
        let instance = parts.next().unwrap_or_default();
        let class = parts.next().unwrap_or_default();
        Ok(Some(WmClass { instance, class }))
    }

    fn geometry(&self, window: WindowId) -> Result<Geometry> {
        let geom = self.conn.get_geometry(window)?.reply()?;
        Ok(Geometry {
            x: geom.x,
            y: geom.y,
            width: geom.width,
            height: geom.height,
        })
    }

    fn send_event(&self, window: WindowId, event: &InputEvent) -> Result<()> {
        let bytes = encode_event(window, event);
        self.conn.send_event(false, window, EventMask::NO_EVENT, bytes)?;
        self.conn.flush()?;
        Ok(())
    }

    fn keyboard_mapping(&self) -> Result<KeyboardMapping> {
        let setup = self.conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode - min_keycode + 1;
        let reply = self.conn.get_keyboard_mapping(min_keycode, count)?.reply()?;

        Ok(KeyboardMapping {
            min_keycode,
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms,
        })
    }

    fn get_image(&self, window: WindowId, x: i16, y: i16, width: u16, height: u16) -> Result<RawImage> {
        let reply = self
            .conn
            .get_image(ImageFormat::Z_PIXMAP, window, x, y, width, height, u32::MAX)?
            .reply()?;

        Ok(RawImage {
            depth: reply.depth,
            data: reply.data,
        })
    }

    fn query_pointer(&self) -> Result<PointerState> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok(PointerState {
            same_screen: reply.same_screen,
            root: reply.root,
            child: reply.child,
            root_x: reply.root_x,
            root_y: reply.root_y,
            win_x: reply.win_x,
            win_y: reply.win_y,
            mask: u16::from(reply.mask),
        })
    }

    fn intern_atom(&self, name: &str) -> Result<Option<Atom>> {
        let atom = self.conn.intern_atom(true, name.as_bytes())?.reply()?.atom;
        Ok((atom != x11rb::NONE).then_some(atom))
    }

    fn property_u32(&self, window: WindowId, property: Atom, length: u32) -> Result<Vec<u32>> {
        let reply = self
            .conn
            .get_property(false, window, property, AtomEnum::ANY, 0, length)?
            .reply()?;

        Ok(reply.value32().map(|values| values.collect()).unwrap_or_default())
    }
}

/// Wire form of a synthetic event addressed to `window`
///
/// Root coordinates are not resolved; the server only sees event_x/event_y.
pub(crate) fn encode_event(window: Window, event: &InputEvent) -> [u8; 32] {
    let state = KeyButMask::from(event.state);

    match event.kind {
        EventKind::KeyPress | EventKind::KeyRelease => {
            let response_type = if event.kind == EventKind::KeyPress {
                xproto::KEY_PRESS_EVENT
            } else {
                xproto::KEY_RELEASE_EVENT
            };
            KeyPressEvent {
                response_type,
                detail: event.detail,
                sequence: 0,
                time: x11rb::CURRENT_TIME,
                root: x11rb::NONE,
                event: window,
                child: x11rb::NONE,
                root_x: 0,
                root_y: 0,
                event_x: event.x,
                event_y: event.y,
                state,
                same_screen: true,
            }
            .into()
        }
        EventKind::ButtonPress | EventKind::ButtonRelease => {
            let response_type = if event.kind == EventKind::ButtonPress {
                xproto::BUTTON_PRESS_EVENT
            } else {
                xproto::BUTTON_RELEASE_EVENT
            };
            ButtonPressEvent {
                response_type,
                detail: event.detail,
                sequence: 0,
                time: x11rb::CURRENT_TIME,
                root: x11rb::NONE,
                event: window,
                child: x11rb::NONE,
                root_x: 0,
                root_y: 0,
                event_x: event.x,
                event_y: event.y,
                state,
                same_screen: true,
            }
            .into()
        }
        EventKind::Motion => MotionNotifyEvent {
            response_type: xproto::MOTION_NOTIFY_EVENT,
            detail: Motion::from(event.detail),
            sequence: 0,
            time: x11rb::CURRENT_TIME,
            root: x11rb::NONE,
            event: window,
            child: x11rb::NONE,
            root_x: 0,
            root_y: 0,
            event_x: event.x,
            event_y: event.y,
            state,
            same_screen: true,
        }
        .into(),
    }
}
