use std::collections::HashMap;

use egui::{
    vec2, Align2, Color32, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2,
};

use crate::{
    game::{Board, BoardSize, Cell, CellState, CellType, GameState, Point},
    ms_frame::bevel,
    texture::Palette,
    utils::{flag_image, mine_image},
};

pub const CELL_SIZE: f32 = 30.0;
pub const MIN_CELL_SIZE: f32 = 12.0;

/// How a single cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVisual {
    Up,
    Down,
    Number(u8),
    /// The mine that was clicked.
    Blast,
    /// A mine shown after the game was lost.
    RevealedMine,
    /// A flag on a cell that turned out to be safe.
    FalseFlag,
    Flag,
}

pub fn cell_visual(cell: Cell, down: bool) -> CellVisual {
    match (cell.state, cell.kind) {
        (CellState::Revealed, CellType::Safe(0)) => CellVisual::Down,
        (CellState::Revealed, CellType::Safe(n)) => CellVisual::Number(n),
        (CellState::Revealed, CellType::Mine) => CellVisual::Blast,
        (CellState::Revealed, CellType::Unknown) => CellVisual::Down,
        (CellState::Unknown, CellType::Mine) => CellVisual::RevealedMine,
        (CellState::Unknown, _) if down => CellVisual::Down,
        (CellState::Unknown, _) => CellVisual::Up,
        (CellState::Flagged, CellType::Safe(_)) => CellVisual::FalseFlag,
        (CellState::Flagged, _) => CellVisual::Flag,
    }
}

/// Square cells fitted into a rectangle and centred in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    origin: Pos2,
    cell: f32,
    width: usize,
    height: usize,
}

impl BoardLayout {
    pub fn new(bounds: Rect, width: usize, height: usize) -> Self {
        let cell = (bounds.width() / width as f32)
            .min(bounds.height() / height as f32)
            .floor()
            .max(1.0);
        let size = vec2(cell * width as f32, cell * height as f32);
        let origin = (bounds.center() - size / 2.0).round();

        BoardLayout {
            origin,
            cell,
            width,
            height,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            self.origin,
            vec2(self.cell * self.width as f32, self.cell * self.height as f32),
        )
    }

    pub fn cell_rect(&self, point: Point) -> Rect {
        Rect::from_min_size(
            self.origin + vec2(point.x as f32, point.y as f32) * self.cell,
            Vec2::splat(self.cell),
        )
    }

    pub fn point_at(&self, pos: Pos2) -> Option<Point> {
        let local = (pos - self.origin) / self.cell;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let point = Point::new(local.x as usize, local.y as usize);
        (point.x < self.width && point.y < self.height).then_some(point)
    }
}

/// What the pointer did on the board this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoardEvents {
    /// Cell under the primary button while it is held.
    pub pressed: Option<Point>,
    pub hovered: Option<Point>,
    /// Cell the primary button was released over.
    pub released: Option<Point>,
    /// Cell that was right clicked or long touched.
    pub flagged: Option<Point>,
}

pub struct BoardOutput {
    pub response: Response,
    pub events: BoardEvents,
}

/// Whether holding the primary button on `pressed` sinks any cell: a hidden cell
/// itself, or a hidden neighbour of a revealed number.
pub fn presses_down(board: &Board, pressed: Point) -> bool {
    match board.get(pressed).state {
        CellState::Unknown => true,
        CellState::Revealed => board
            .neighbors(pressed)
            .any(|n| board.get(n).state == CellState::Unknown),
        CellState::Flagged => false,
    }
}

pub struct BoardView<'a> {
    state: &'a GameState,
    palette: &'static Palette,
    overlays: &'a HashMap<Point, Color32>,
}

impl<'a> BoardView<'a> {
    pub fn new(
        state: &'a GameState,
        palette: &'static Palette,
        overlays: &'a HashMap<Point, Color32>,
    ) -> Self {
        BoardView {
            state,
            palette,
            overlays,
        }
    }

    pub fn preferred_size(size: BoardSize) -> Vec2 {
        vec2(size.width() as f32, size.height() as f32) * CELL_SIZE
    }

    pub fn minimum_size(size: BoardSize) -> Vec2 {
        vec2(size.width() as f32, size.height() as f32) * MIN_CELL_SIZE
    }

    /// Cells drawn sunken while `pressed` is held: the cell itself, or the hidden
    /// neighbours of a revealed number about to be chorded.
    fn is_down(&self, point: Point, pressed: Option<Point>) -> bool {
        let Some(pressed) = pressed else {
            return false;
        };
        let board = &self.state.board;

        if pressed == point {
            return true;
        }

        board.get(pressed).state == CellState::Revealed
            && point.x.abs_diff(pressed.x) <= 1
            && point.y.abs_diff(pressed.y) <= 1
    }

    fn paint_cell(&self, ui: &Ui, rect: Rect, visual: CellVisual) {
        let p = self.palette;
        let painter = ui.painter();
        let border = (rect.width() / 10.0).round().max(1.0);

        let paint_down = |fill: Color32| {
            painter.rect_filled(rect, 0.0, fill);
            painter.line_segment(
                [rect.left_top(), rect.right_top()],
                Stroke::new(1.0, p.shadow),
            );
            painter.line_segment(
                [rect.left_top(), rect.left_bottom()],
                Stroke::new(1.0, p.shadow),
            );
        };
        let paint_up = || {
            painter.rect_filled(rect, 0.0, p.cell);
            painter.extend(bevel(rect, border, p.highlight, p.shadow));
        };
        let icon_rect = rect.shrink(rect.width() * 0.15);

        match visual {
            CellVisual::Up => paint_up(),
            CellVisual::Down => paint_down(p.cell_down),
            CellVisual::Number(n) => {
                paint_down(p.cell_down);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    n.to_string(),
                    FontId::monospace(rect.height() * 0.7),
                    p.number(n),
                );
            }
            CellVisual::Blast => {
                paint_down(p.blast);
                mine_image().paint_at(ui, icon_rect);
            }
            CellVisual::RevealedMine => {
                paint_down(p.cell_down);
                mine_image().paint_at(ui, icon_rect);
            }
            CellVisual::FalseFlag => {
                paint_down(p.cell_down);
                mine_image().paint_at(ui, icon_rect);
                let stroke = Stroke::new(border, p.cross);
                painter.add(Shape::line_segment(
                    [icon_rect.left_top(), icon_rect.right_bottom()],
                    stroke,
                ));
                painter.add(Shape::line_segment(
                    [icon_rect.right_top(), icon_rect.left_bottom()],
                    stroke,
                ));
            }
            CellVisual::Flag => {
                paint_up();
                flag_image().paint_at(ui, icon_rect);
            }
        }
    }

    pub fn show(self, ui: &mut Ui) -> BoardOutput {
        let bounds = ui.available_rect_before_wrap();
        let board = &self.state.board;
        let layout = BoardLayout::new(bounds, board.width(), board.height());

        let (_, response) = ui.allocate_exact_size(bounds.size(), Sense::click());

        let pointer = ui.input(|i| i.pointer.latest_pos());
        let over = pointer.and_then(|pos| layout.point_at(pos));
        let hovered = over.filter(|_| response.hovered());

        let pressed = over.filter(|_| {
            response.is_pointer_button_down_on() && ui.input(|i| i.pointer.primary_down())
        });
        let released = over.filter(|_| ui.input(|i| i.pointer.primary_released()));
        let flagged = over.filter(|_| response.secondary_clicked() || response.long_touched());

        if ui.is_rect_visible(layout.rect()) {
            for point in board.points() {
                let rect = layout.cell_rect(point);
                let visual = cell_visual(board.get(point), self.is_down(point, pressed));
                self.paint_cell(ui, rect, visual);

                if let Some(color) = self.overlays.get(&point) {
                    ui.painter().rect_filled(rect, 0.0, *color);
                }
            }
        }

        BoardOutput {
            response,
            events: BoardEvents {
                pressed,
                hovered,
                released,
                flagged,
            },
        }
    }
}
