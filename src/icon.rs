use egui::IconData;
use image::{Rgba, RgbaImage};

const ICON_SIZE: u32 = 64;
const BODY: Rgba<u8> = Rgba([0, 0, 0, 255]);
const SHINE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A round mine with four spikes and a highlight.
fn mine_pixel(x: u32, y: u32) -> Rgba<u8> {
    let c = ICON_SIZE as f32 / 2.0;
    let (dx, dy) = (x as f32 + 0.5 - c, y as f32 + 0.5 - c);
    let r = ICON_SIZE as f32 * 0.3;

    let shine = (dx + r * 0.35).powi(2) + (dy + r * 0.35).powi(2) <= (r * 0.22).powi(2);
    let body = dx * dx + dy * dy <= r * r;
    let spike_width = ICON_SIZE as f32 * 0.05;
    let spike_length = ICON_SIZE as f32 * 0.45;
    let straight = (dx.abs() <= spike_width && dy.abs() <= spike_length)
        || (dy.abs() <= spike_width && dx.abs() <= spike_length);
    let diagonal = (dx - dy).abs() <= spike_width * 1.4 || (dx + dy).abs() <= spike_width * 1.4;
    let diagonal = diagonal && dx.abs().max(dy.abs()) <= spike_length * 0.75;

    if shine {
        SHINE
    } else if body || straight || diagonal {
        BODY
    } else {
        CLEAR
    }
}

pub fn mine_icon() -> RgbaImage {
    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, mine_pixel)
}

pub fn app_icon() -> IconData {
    let image = mine_icon();
    let (width, height) = image.dimensions();

    IconData {
        rgba: image.into_raw(),
        width,
        height,
    }
}
