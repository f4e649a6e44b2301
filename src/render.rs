//! Rasterization of a finished module matrix onto a pixel surface.

use image::{GrayImage, Luma};
use itertools::iproduct;

use crate::config::RenderOptions;
use crate::error::Result;
use crate::matrix::QrMatrix;

pub const BIT_WHITE: Luma<u8> = Luma([255u8]);
pub const BIT_BLACK: Luma<u8> = Luma([0u8]);

/// Something that can be painted with filled rectangles.
pub trait DrawContext {
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Luma<u8>);
}

/// A resizable drawing surface. Obtaining the drawing context may fail, e.g. for a
/// surface that is not attached to anything yet; drawing is then skipped.
pub trait Canvas {
    fn resize(&mut self, width: u32, height: u32);
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

impl DrawContext for GrayImage {
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Luma<u8>) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for (py, px) in iproduct!(y..y_end, x..x_end) {
            self.put_pixel(px, py, color);
        }
    }
}

impl Canvas for GrayImage {
    fn resize(&mut self, width: u32, height: u32) {
        if self.dimensions() != (width, height) {
            *self = GrayImage::new(width, height);
        }
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        Some(self)
    }
}

/// Paint the matrix onto the canvas: the canvas is resized to
/// `(size + 2 * margin) * scale` pixels square, cleared to white, and every dark
/// module becomes a black `scale` x `scale` square offset by the margin.
pub fn draw_matrix<C: Canvas + ?Sized>(canvas: &mut C, m: &QrMatrix, options: &RenderOptions) -> Result<()> {
    options.validate()?;
    let side = options.canvas_side(m.size())?;
    canvas.resize(side, side);

    let ctx = match canvas.context() {
        Some(ctx) => ctx,
        None => {
            tracing::debug!("drawing context unavailable, skipping");
            return Ok(());
        }
    };

    ctx.fill_rect(0, 0, side, side, BIT_WHITE);
    // every module lies inside the side checked above, so these products cannot overflow
    let scale = options.scale;
    for (x, y, cell) in m.cells() {
        if cell.is_dark() {
            let px = (x as u32 + options.margin) * scale;
            let py = (y as u32 + options.margin) * scale;
            ctx.fill_rect(px, py, scale, scale, BIT_BLACK);
        }
    }
    Ok(())
}

/// Render the matrix into a new grayscale image.
pub fn render_image(m: &QrMatrix, options: &RenderOptions) -> Result<GrayImage> {
    let mut img = GrayImage::new(0, 0);
    draw_matrix(&mut img, m, options)?;
    Ok(img)
}
