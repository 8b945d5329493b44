//! Error type shared by every exul operation

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

use crate::backend::WindowId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no window matches {0}")]
    NotFound(String),

    #[error("no keysym found for key: {0}")]
    InvalidKey(String),

    #[error("keysym {keysym:#x} for key {name} is not mapped to any keycode")]
    UnmappedKey { name: String, keysym: u32 },

    #[error("atom {0} does not exist on this display")]
    MissingAtom(&'static str),

    #[error("window {window:#x} has no {property} property")]
    MissingProperty {
        window: WindowId,
        property: &'static str,
    },

    #[error("image buffer holds {actual} bytes, expected at least {expected}")]
    ImageData { expected: usize, actual: usize },

    #[error("failed to encode image: {0}")]
    ImageEncode(#[from] image::ImageError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

pub type Result<T> = std::result::Result<T, Error>;
