//! Window locator - walks the window tree and matches windows by attributes
//!
//! Nothing is cached: names and classes are fetched from the server as the
//! walk reaches each window, and only for the filters actually supplied.

use std::fmt;

use serde::Serialize;

use crate::backend::{DisplayBackend, WindowId};
use crate::error::{Error, Result};

/// Attributes a window must have to be found
///
/// Every `Some` field must equal the window's attribute. With no fields set,
/// the first window of the walk matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowFilter {
    pub window_id: Option<WindowId>,
    pub window_name: Option<String>,
    /// Second half of `WM_CLASS`
    pub class_type: Option<String>,
    /// First half of `WM_CLASS`
    pub class_name: Option<String>,
}

impl WindowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window_id(mut self, id: WindowId) -> Self {
        self.window_id = Some(id);
        self
    }

    pub fn window_name(mut self, name: impl Into<String>) -> Self {
        self.window_name = Some(name.into());
        self
    }

    pub fn class_type(mut self, class_type: impl Into<String>) -> Self {
        self.class_type = Some(class_type.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.window_id.is_none()
            && self.window_name.is_none()
            && self.class_type.is_none()
            && self.class_name.is_none()
    }

    /// Check `window` against every supplied filter
    pub fn matches<B: DisplayBackend + ?Sized>(&self, backend: &B, window: WindowId) -> Result<bool> {
        if self.window_id.is_some_and(|id| id != window) {
            return Ok(false);
        }

        if let Some(expected) = &self.window_name {
            if backend.window_name(window)?.as_ref() != Some(expected) {
                return Ok(false);
            }
        }

        if self.class_type.is_some() || self.class_name.is_some() {
            let Some(class) = backend.window_class(window)? else {
                return Ok(false);
            };
            if self.class_type.as_ref().is_some_and(|t| *t != class.class) {
                return Ok(false);
            }
            if self.class_name.as_ref().is_some_and(|n| *n != class.instance) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl fmt::Display for WindowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("any window");
        }

        let mut parts = Vec::new();
        if let Some(id) = self.window_id {
            parts.push(format!("window_id={id:#x}"));
        }
        if let Some(name) = &self.window_name {
            parts.push(format!("window_name={name:?}"));
        }
        if let Some(class_type) = &self.class_type {
            parts.push(format!("class_type={class_type:?}"));
        }
        if let Some(class_name) = &self.class_name {
            parts.push(format!("class_name={class_name:?}"));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Depth-first walk over every window below the root
///
/// Yields `(window, depth)` in pre-order; children of the root have depth 0.
/// A failed QueryTree is yielded once and ends the walk.
pub struct WindowTree<'a, B: ?Sized> {
    backend: &'a B,
    stack: Vec<(WindowId, usize)>,
    /// Window whose children go on the stack before the next pop
    expand: Option<(WindowId, usize)>,
}

impl<'a, B: DisplayBackend + ?Sized> WindowTree<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            stack: Vec::new(),
            expand: Some((backend.root(), 0)),
        }
    }
}

impl<B: DisplayBackend + ?Sized> Iterator for WindowTree<'_, B> {
    type Item = Result<(WindowId, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((parent, depth)) = self.expand.take() {
            match self.backend.children(parent) {
                Ok(children) => self.stack.extend(children.into_iter().rev().map(|child| (child, depth))),
                Err(e) => {
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }

        let (window, depth) = self.stack.pop()?;
        self.expand = Some((window, depth + 1));
        Some(Ok((window, depth)))
    }
}

/// Walk every window on the screen
pub fn enumerate<B: DisplayBackend + ?Sized>(backend: &B) -> WindowTree<'_, B> {
    WindowTree::new(backend)
}

/// Find the first window, in walk order, matching `filter`
pub fn find<B: DisplayBackend + ?Sized>(backend: &B, filter: &WindowFilter) -> Result<WindowId> {
    for entry in enumerate(backend) {
        let (window, depth) = entry?;
        if filter.matches(backend, window)? {
            tracing::debug!("Found window {:#x} at depth {} for {}", window, depth, filter);
            return Ok(window);
        }
    }

    Err(Error::NotFound(filter.to_string()))
}

/// Attributes of a window, read for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WindowDetails {
    pub id: WindowId,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub class_type: Option<String>,
}

impl fmt::Display for WindowDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.id)?;
        if let Some(name) = &self.name {
            write!(f, " {name:?}")?;
        }
        if let (Some(class_name), Some(class_type)) = (&self.class_name, &self.class_type) {
            write!(f, " ({class_name}, {class_type})")?;
        }
        Ok(())
    }
}

/// Read the id, name and class of a window
pub fn describe<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId) -> Result<WindowDetails> {
    let name = backend.window_name(window)?;
    let (class_name, class_type) = match backend.window_class(window)? {
        Some(class) => (Some(class.instance), Some(class.class)),
        None => (None, None),
    };

    Ok(WindowDetails {
        id: window,
        name,
        class_name,
        class_type,
    })
}
