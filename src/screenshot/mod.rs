//! Screenshots and other read-only window queries
//!
//! Pixels come straight from GetImage in Z-pixmap format, which on the
//! usual 24/32-bit visuals is four bytes per pixel in BGRX order.

use image::{ImageEncoder, Rgb, RgbImage};

use crate::backend::{DisplayBackend, Geometry, PointerState, WindowId};
use crate::error::{Error, Result};

const BYTES_PER_PIXEL: usize = 4;

/// Number of 32-bit items read from `_NET_WM_PID`
const PID_PROPERTY_LENGTH: u32 = 10;

/// Geometry of a window, as the server reports it
pub fn geometry<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId) -> Result<Geometry> {
    backend.geometry(window)
}

/// Capture a region of a window as an RGB image
pub fn capture<B: DisplayBackend + ?Sized>(
    backend: &B,
    window: WindowId,
    x: i16,
    y: i16,
    width: u16,
    height: u16,
) -> Result<RgbImage> {
    let raw = backend.get_image(window, x, y, width, height)?;
    tracing::debug!(
        "Captured {}x{} at ({}, {}) from {:#x}, depth {}",
        width,
        height,
        x,
        y,
        window,
        raw.depth
    );
    decode_bgrx(&raw.data, u32::from(width), u32::from(height))
}

/// Capture the whole of a window
pub fn capture_full<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId) -> Result<RgbImage> {
    let geom = backend.geometry(window)?;
    capture(backend, window, 0, 0, geom.width, geom.height)
}

fn decode_bgrx(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if data.len() < expected {
        return Err(Error::ImageData {
            expected,
            actual: data.len(),
        });
    }

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let i = (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL;
        Rgb([data[i + 2], data[i + 1], data[i]])
    }))
}

/// Encode an image as PNG
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(buffer)
}

/// Current pointer state, straight from QueryPointer on the root window
pub fn pointer_position<B: DisplayBackend + ?Sized>(backend: &B) -> Result<PointerState> {
    backend.query_pointer()
}

/// Process id the window's client advertises in `_NET_WM_PID`
pub fn owning_process_id<B: DisplayBackend + ?Sized>(backend: &B, window: WindowId) -> Result<u32> {
    const PROPERTY: &str = "_NET_WM_PID";

    let atom = backend.intern_atom(PROPERTY)?.ok_or(Error::MissingAtom(PROPERTY))?;
    let value = backend.property_u32(window, atom, PID_PROPERTY_LENGTH)?;
    value.first().copied().ok_or(Error::MissingProperty {
        window,
        property: PROPERTY,
    })
}
