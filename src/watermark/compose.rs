use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Fill: white at ~20% opacity. Stroke: black at ~10% opacity. The low
/// opacities with a contrasting outline are the visual signature of the
/// watermark.
pub const FILL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 51]);
pub const STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 26]);

/// Font pixel size as a fraction of the image width.
const FONT_SIZE_RATIO: f64 = 0.08;
/// Stroke width as a fraction of the font size, rounded up.
const STROKE_WIDTH_RATIO: f64 = 0.04;

pub(crate) fn font_size_for_width(base_width: u32) -> u32 {
    ((base_width as f64 * FONT_SIZE_RATIO) as u32).max(1)
}

pub(crate) fn stroke_width_for(font_size: u32) -> i32 {
    (font_size as f64 * STROKE_WIDTH_RATIO).ceil() as i32
}

/// Top-left anchor for text of the given measured size: centered
/// horizontally, and vertically offset above center by 75% of the text
/// height.
pub(crate) fn anchor_for(base: (u32, u32), text: (u32, u32)) -> (i32, i32) {
    let (base_width, base_height) = base;
    let (text_width, text_height) = text;
    let x = (base_width as f64 / 2.0 - text_width as f64 / 2.0) as i32;
    let y = (base_height as f64 / 2.0 - text_height as f64 * 0.75) as i32;
    (x, y)
}

/// Render the watermark text onto a fully transparent layer of the given
/// size. The stroke is drawn first, at every integer offset within the
/// stroke radius, then the fill on top.
pub fn render_text_overlay(width: u32, height: u32, font: &FontVec, text: &str) -> RgbaImage {
    let font_size = font_size_for_width(width);
    let scale = PxScale::from(font_size as f32);

    // Measurement, not estimation: glyph metrics vary per text, so the
    // rendered bounding box drives centering.
    let (text_width, text_height) = text_size(scale, font, text);
    let (x, y) = anchor_for((width, height), (text_width, text_height));
    let stroke = stroke_width_for(font_size);

    let mut overlay = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));
    for dy in -stroke..=stroke {
        for dx in -stroke..=stroke {
            if dx * dx + dy * dy <= stroke * stroke {
                draw_text_mut(&mut overlay, STROKE_COLOR, x + dx, y + dy, scale, font, text);
            }
        }
    }
    draw_text_mut(&mut overlay, FILL_COLOR, x, y, scale, font, text);

    overlay
}

/// Composite the text overlay onto the base image with alpha-over blending.
/// The base is normalized to RGBA first so sources of any channel layout
/// blend the same way.
pub fn composite_watermark(base: &DynamicImage, font: &FontVec, text: &str) -> RgbaImage {
    let mut canvas = base.to_rgba8();
    let overlay = render_text_overlay(canvas.width(), canvas.height(), font, text);
    image::imageops::overlay(&mut canvas, &overlay, 0, 0);
    canvas
}
