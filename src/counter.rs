use egui::{pos2, vec2, Color32, Rect, Response, Sense, Shape, Ui, Vec2, Widget};

use crate::{game::BoardSize, ms_frame::bevel, texture::Palette};

pub const DIGIT_WIDTH: f32 = 13.0;
pub const DIGIT_HEIGHT: f32 = 23.0;
const DIGIT_SPACING: f32 = 2.0;
const PADDING: f32 = 3.0;
const BORDER: f32 = 1.0;

/// Lit segments per glyph, bit 0 = top (a) through bit 6 = middle (g).
fn segments(c: char) -> u8 {
    match c {
        '0' => 0b0111111,
        '1' => 0b0000110,
        '2' => 0b1011011,
        '3' => 0b1001111,
        '4' => 0b1100110,
        '5' => 0b1101101,
        '6' => 0b1111101,
        '7' => 0b0000111,
        '8' => 0b1111111,
        '9' => 0b1101111,
        '-' => 0b1000000,
        _ => 0,
    }
}

/// Zero padded to exactly `digits` characters, a leading `-` taking one of them.
/// Values that do not fit are clamped.
pub fn format_counter(value: isize, digits: usize) -> String {
    let digits = digits.max(1);
    let max = 10_isize.saturating_pow(digits as u32) - 1;
    let min = -(10_isize.saturating_pow(digits as u32 - 1) - 1);
    let value = value.clamp(min, max);

    if value < 0 {
        format!("-{:0width$}", -value, width = digits - 1)
    } else {
        format!("{:0width$}", value, width = digits)
    }
}

/// Enough digits for the mine counter to show both the full mine count and the most
/// negative value over-flagging can reach.
pub fn mine_counter_digits(size: BoardSize) -> usize {
    let lowest = size.mines() as isize - size.cells() as isize;
    size.mines()
        .to_string()
        .len()
        .max(lowest.to_string().len())
}

/// A sunken seven segment display.
pub struct CounterView {
    value: isize,
    digits: usize,
    palette: &'static Palette,
}

impl CounterView {
    pub fn new(value: isize, digits: usize, palette: &'static Palette) -> Self {
        Self {
            value,
            digits,
            palette,
        }
    }

    pub fn size(digits: usize) -> Vec2 {
        let digits = digits.max(1) as f32;
        vec2(
            digits * DIGIT_WIDTH + (digits - 1.0) * DIGIT_SPACING,
            DIGIT_HEIGHT,
        ) + Vec2::splat(2.0 * (PADDING + BORDER))
    }

    fn paint_digit(&self, shapes: &mut Vec<Shape>, rect: Rect, c: char) {
        let lit = segments(c);
        let t = rect.width() * 0.2;
        let (x0, y0, x1, y1) = (rect.min.x, rect.min.y, rect.max.x, rect.max.y);
        let mid = rect.center().y;

        let bars = [
            Rect::from_min_max(pos2(x0 + t, y0), pos2(x1 - t, y0 + t)),
            Rect::from_min_max(pos2(x1 - t, y0 + t), pos2(x1, mid - t / 2.0)),
            Rect::from_min_max(pos2(x1 - t, mid + t / 2.0), pos2(x1, y1 - t)),
            Rect::from_min_max(pos2(x0 + t, y1 - t), pos2(x1 - t, y1)),
            Rect::from_min_max(pos2(x0, mid + t / 2.0), pos2(x0 + t, y1 - t)),
            Rect::from_min_max(pos2(x0, y0 + t), pos2(x0 + t, mid - t / 2.0)),
            Rect::from_min_max(pos2(x0 + t, mid - t / 2.0), pos2(x1 - t, mid + t / 2.0)),
        ];

        for (i, bar) in bars.into_iter().enumerate() {
            let color: Color32 = if lit & (1 << i) != 0 {
                self.palette.counter_on
            } else {
                self.palette.counter_off
            };
            shapes.push(Shape::rect_filled(bar, 0.0, color));
        }
    }
}

impl Widget for CounterView {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(Self::size(self.digits), Sense::hover());

        if !ui.is_rect_visible(rect) {
            return response;
        }

        let mut shapes = bevel(rect, BORDER, self.palette.shadow, self.palette.highlight);
        shapes.push(Shape::rect_filled(
            rect.shrink(BORDER),
            0.0,
            self.palette.counter_background,
        ));

        let mut x = rect.min.x + BORDER + PADDING;
        let y = rect.min.y + BORDER + PADDING;
        for c in format_counter(self.value, self.digits).chars() {
            let digit = Rect::from_min_size(pos2(x, y), vec2(DIGIT_WIDTH, DIGIT_HEIGHT));
            self.paint_digit(&mut shapes, digit, c);
            x += DIGIT_WIDTH + DIGIT_SPACING;
        }

        ui.painter().extend(shapes);

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ConventionalSize;

    #[test]
    fn test_format_counter() {
        assert_eq!(format_counter(7, 3), "007");
        assert_eq!(format_counter(-5, 3), "-05");
        assert_eq!(format_counter(1234, 3), "999");
        assert_eq!(format_counter(-1234, 3), "-99");
        assert_eq!(format_counter(-3, 1), "0");
    }

    #[test]
    fn test_mine_counter_digits() {
        assert_eq!(mine_counter_digits(ConventionalSize::Beginner.size()), 3);
        assert_eq!(mine_counter_digits(ConventionalSize::Expert.size()), 4);
        assert_eq!(mine_counter_digits(BoardSize::new(2, 2, 3).unwrap()), 2);
    }

    #[test]
    fn test_every_glyph_has_segments() {
        for c in "0123456789-".chars() {
            assert_ne!(segments(c), 0, "{c} has no segments");
        }
        assert_eq!(segments('8').count_ones(), 7);
    }
}
