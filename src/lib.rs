//! exul - X11 desktop automation
//!
//! This library talks to an X server directly to find windows and drive
//! them without touching the real keyboard or pointer.
//!
//! ## Features
//!
//! - Window enumeration and lookup by id, name or `WM_CLASS`
//! - Window geometry and screenshots
//! - Synthetic input (clicks, scrolling, key sequences, held keys)
//!
//! Every operation takes a [`DisplayBackend`]; [`X11Connection`] is the one
//! that talks to a real server.
//!
//! ```no_run
//! use exul::{X11Connection, WindowFilter, input, locator};
//!
//! # fn main() -> exul::Result<()> {
//! let display = X11Connection::connect(None)?;
//! let window = locator::find(&display, &WindowFilter::new().class_type("XTerm"))?;
//! input::send_key(&display, window, "control+shift+t", 1, 0)?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod core;
pub mod error;
pub mod input;
pub mod keys;
pub mod screenshot;

pub use backend::{DisplayBackend, Geometry, WindowId, X11Connection};
pub use crate::core::locator::{self, WindowFilter};
pub use error::{Error, Result};
