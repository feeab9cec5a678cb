use crate::texture::{Palette, Texture};
use egui::{pos2, Color32, InnerResponse, Margin, Rect, Sense, Shape, Stroke, Ui};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameKind {
    Protruded,
    Floating,
    Inscribed,
    Pressed,
}

/// The bevelled edge of a raised or sunken rectangle. The two mixed corners are
/// split along the diagonal.
pub fn bevel(outer: Rect, border: f32, top_left: Color32, bottom_right: Color32) -> Vec<Shape> {
    let b = border;

    vec![
        // top
        Shape::rect_filled(
            Rect::from_min_max(outer.min, pos2(outer.max.x, outer.min.y + b)),
            0.0,
            top_left,
        ),
        // left
        Shape::rect_filled(
            Rect::from_min_max(outer.min, pos2(outer.min.x + b, outer.max.y)),
            0.0,
            top_left,
        ),
        // bottom
        Shape::rect_filled(
            Rect::from_min_max(pos2(outer.min.x + b, outer.max.y - b), outer.max),
            0.0,
            bottom_right,
        ),
        // right
        Shape::rect_filled(
            Rect::from_min_max(pos2(outer.max.x - b, outer.min.y + b), outer.max),
            0.0,
            bottom_right,
        ),
        Shape::convex_polygon(
            vec![
                pos2(outer.max.x, outer.min.y),
                pos2(outer.max.x, outer.min.y + b),
                pos2(outer.max.x - b, outer.min.y + b),
            ],
            bottom_right,
            Stroke::NONE,
        ),
        Shape::convex_polygon(
            vec![
                pos2(outer.min.x + b, outer.max.y - b),
                pos2(outer.min.x + b, outer.max.y),
                pos2(outer.min.x, outer.max.y),
            ],
            bottom_right,
            Stroke::NONE,
        ),
    ]
}

pub struct MinesweeperFrame {
    margin: Margin,
    border: usize,
    kind: FrameKind,
    sense: Sense,
    palette: &'static Palette,
}

impl Default for MinesweeperFrame {
    fn default() -> Self {
        Self {
            margin: Margin::ZERO,
            border: 0,
            kind: FrameKind::Inscribed,
            sense: Sense::hover(),
            palette: Texture::default().palette(),
        }
    }
}

impl MinesweeperFrame {
    pub fn new(border: usize) -> Self {
        Self {
            border,
            ..Default::default()
        }
    }

    pub fn border(mut self, border: usize) -> Self {
        self.border = border;
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn palette(mut self, palette: &'static Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn protruded(mut self) -> Self {
        self.kind = FrameKind::Protruded;
        self
    }

    pub fn floating(mut self) -> Self {
        self.kind = FrameKind::Floating;
        self
    }

    pub fn pressed(mut self) -> Self {
        self.kind = FrameKind::Pressed;
        self
    }

    pub fn sense(mut self, sense: Sense) -> Self {
        self.sense = sense;
        self
    }

    fn border_margin(&self) -> Margin {
        Margin::same(self.border as f32)
    }

    fn inner_rect(&self, content_rect: Rect) -> Rect {
        self.margin.expand_rect(content_rect)
    }

    fn outer_rect(&self, content_rect: Rect) -> Rect {
        self.border_margin()
            .expand_rect(self.inner_rect(content_rect))
    }

    /// Total space the frame adds around its contents on each axis.
    pub fn extra_size(&self) -> egui::Vec2 {
        (self.border_margin() + self.margin).sum()
    }

    pub fn paint(&self, content_rect: Rect) -> Shape {
        let b = self.border as f32;
        let p = self.palette;
        let outer_rect = self.outer_rect(content_rect);

        let mut shapes = vec![Shape::rect_filled(
            self.inner_rect(content_rect),
            0.0,
            p.background,
        )];

        match self.kind {
            FrameKind::Floating => shapes.extend(bevel(outer_rect, b, p.highlight, p.shadow)),
            FrameKind::Inscribed => shapes.extend(bevel(outer_rect, b, p.shadow, p.highlight)),
            FrameKind::Protruded => shapes.extend(bevel(outer_rect, b, p.shadow, p.shadow)),
            FrameKind::Pressed => {
                shapes.push(Shape::rect_filled(
                    Rect::from_min_max(outer_rect.min, pos2(outer_rect.max.x, outer_rect.min.y + b)),
                    0.0,
                    p.shadow,
                ));
                shapes.push(Shape::rect_filled(
                    Rect::from_min_max(outer_rect.min, pos2(outer_rect.min.x + b, outer_rect.max.y)),
                    0.0,
                    p.shadow,
                ));
            }
        }

        Shape::Vec(shapes)
    }

    pub fn show_inner_contents<R>(
        &self,
        ui: &mut Ui,
        add_contents: impl FnOnce(&mut Ui) -> R,
    ) -> (InnerResponse<R>, Ui) {
        let outer_rect_bounds = ui.available_rect_before_wrap();
        let inner_rect_bounds = (self.border_margin() + self.margin).shrink_rect(outer_rect_bounds);

        let mut content_ui = ui.child_ui(inner_rect_bounds, *ui.layout());

        let ret = add_contents(&mut content_ui);

        let content_rect = content_ui.min_rect();

        let response = ui.allocate_rect(self.outer_rect(content_rect), self.sense);

        (InnerResponse::new(ret, response), content_ui)
    }

    pub fn show<R>(&self, ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> InnerResponse<R> {
        let frame = ui.painter().add(Shape::Noop);

        let (ret, content_ui) = self.show_inner_contents(ui, add_contents);

        ui.painter().set(frame, self.paint(content_ui.min_rect()));

        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn test_extra_size() {
        let frame = MinesweeperFrame::new(3).margin(Margin::same(6.0));
        assert_eq!(frame.extra_size(), vec2(18.0, 18.0));
    }

    #[test]
    fn test_bevel_covers_edges() {
        let outer = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
        let shapes = bevel(outer, 2.0, Color32::WHITE, Color32::BLACK);
        assert_eq!(shapes.len(), 6);
        let Shape::Rect(top) = &shapes[0] else {
            panic!("top edge is not a rect");
        };
        assert_eq!(top.rect, Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 2.0)));
        assert_eq!(top.fill, Color32::WHITE);
    }
}
