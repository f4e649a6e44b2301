//! tinyqr - a minimal QR code generator.
//!
//! Encodes short payloads such as `otpauth://` URIs in byte mode at error
//! correction level M, using the smallest of the versions 1 to 10 that fits, and
//! always with mask pattern 0. Rendering goes to an `image::GrayImage` or to any
//! other surface implementing [`Canvas`].
//!
//! ```no_run
//! let img = tinyqr::render_qr_image("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP",
//!                                   &tinyqr::RenderOptions::default()).unwrap();
//! img.save("enroll.png").unwrap();
//! ```

#[macro_use]
extern crate lazy_static;

pub use config::{EncodeOptions, OverflowPolicy, RenderOptions, DEFAULT_MARGIN, DEFAULT_SCALE};
pub use error::{Error, Result};
pub use matrix::{Cell, QrMatrix};
pub use render::{Canvas, DrawContext};
pub use tables::{version_for_length, VersionInfo};

pub mod bitcoding;
pub mod config;
pub mod gf256;
pub mod matrix;
pub mod render;
pub mod rscoding;
pub mod serialization;
pub mod tables;

mod error;

use tracing::{debug, warn};


/// Encode a byte payload into a finished module matrix.
pub fn encode(payload: &[u8], options: &EncodeOptions) -> Result<QrMatrix> {
    let info = tables::version_for_length(payload.len());

    let payload = if info.fits(payload.len()) {
        payload
    } else {
        let max = info.max_payload_len();
        match options.overflow {
            OverflowPolicy::Reject => {
                return Err(Error::PayloadTooLarge { len: payload.len(), max });
            },
            OverflowPolicy::Clamp => {
                let end = utf8_boundary(payload, max);
                warn!(len = payload.len(), max, kept = end, "payload too large, truncating");
                &payload[..end]
            }
        }
    };
    debug!(version = info.version, size = info.dimension(), len = payload.len(), "encoding payload");

    let codewords = bitcoding::encode_codewords(payload, info)?;
    let mut matrix = serialization::create_qr_canvas(info);
    serialization::insert_data_payload(&mut matrix, &codewords.interleaved())?;
    serialization::masking::apply_mask(&mut matrix);
    Ok(matrix)
}

/// Largest cut position not above `max`. Text payloads are never cut inside a
/// multi-byte character; other byte strings are cut at `max`.
fn utf8_boundary(payload: &[u8], max: usize) -> usize {
    match std::str::from_utf8(payload) {
        Ok(text) => (0..=max).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0),
        Err(_) => max,
    }
}

/// Encode the UTF-8 bytes of `text` with default options.
pub fn make_qr_matrix(text: &str) -> Result<QrMatrix> {
    encode(text.as_bytes(), &EncodeOptions::default())
}

/// Encode `text` and paint it onto the canvas. A canvas without a drawing
/// context is left resized but otherwise untouched.
pub fn draw_qr_to_canvas<C: Canvas + ?Sized>(canvas: &mut C, text: &str, options: &RenderOptions) -> Result<()> {
    let matrix = make_qr_matrix(text)?;
    render::draw_matrix(canvas, &matrix, options)
}

/// Encode `text` and render it into a new grayscale image.
pub fn render_qr_image(text: &str, options: &RenderOptions) -> Result<image::GrayImage> {
    let matrix = make_qr_matrix(text)?;
    render::render_image(&matrix, options)
}
