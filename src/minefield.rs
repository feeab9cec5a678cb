use rand::{seq::SliceRandom, Rng};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Mine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Hidden,
    Opened,
    Flagged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub state: CellState,
}

impl Cell {
    const HIDDEN_EMPTY: Cell = Cell {
        kind: CellKind::Empty,
        state: CellState::Hidden,
    };
}

/// In-bounds neighbours of `(x, y)` on a `width` x `height` grid, row by row.
pub fn neighbors(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> impl Iterator<Item = (usize, usize)> {
    (-1..=1)
        .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
        .filter(move |&(dx, dy)| dx != 0 || dy != 0)
        .filter_map(move |(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            if nx >= width || ny >= height {
                return None;
            }

            Some((nx, ny))
        })
}

/// The actual mine layout together with what the player has done to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Minefield {
    pub cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
}

impl Minefield {
    pub fn new(width: usize, height: usize) -> Self {
        Minefield {
            cells: vec![Cell::HIDDEN_EMPTY; width * height],
            width,
            height,
        }
    }

    /// Places exactly `mines` mines uniformly at random, never on an index in `exclude`.
    ///
    /// Panics if there are fewer free cells than mines.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        width: usize,
        height: usize,
        mines: usize,
        exclude: &[usize],
    ) -> Self {
        let mut minefield = Minefield::new(width, height);

        let mut candidates = (0..width * height)
            .filter(|idx| !exclude.contains(idx))
            .collect::<Vec<_>>();

        assert!(
            mines <= candidates.len(),
            "{mines} mines do not fit in {} free cells",
            candidates.len()
        );

        let (chosen, _) = candidates.partial_shuffle(rng, mines);

        for &idx in chosen.iter() {
            minefield.cells[idx].kind = CellKind::Mine;
        }

        minefield
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    pub fn mine_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.kind == CellKind::Mine)
            .count()
    }

    pub fn flag_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.state == CellState::Flagged)
            .count()
    }

    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        neighbors(self.width, self.height, x, y)
    }

    pub fn count_mines(&self, x: usize, y: usize) -> usize {
        self.neighbors(x, y)
            .filter(|&(x, y)| self.cell(x, y).kind == CellKind::Mine)
            .count()
    }

    pub fn count_flags(&self, x: usize, y: usize) -> usize {
        self.neighbors(x, y)
            .filter(|&(x, y)| self.cell(x, y).state == CellState::Flagged)
            .count()
    }

    /// Opens a hidden cell, or chords an opened one whose flags match its number.
    /// Flagged cells are left alone.
    pub fn open(&mut self, x: usize, y: usize) {
        match self.cell(x, y).state {
            CellState::Flagged => {}
            CellState::Hidden => self.reveal(x, y),
            CellState::Opened => {
                if self.cell(x, y).kind == CellKind::Mine
                    || self.count_mines(x, y) != self.count_flags(x, y)
                {
                    return;
                }

                let hidden = self
                    .neighbors(x, y)
                    .filter(|&(x, y)| self.cell(x, y).state == CellState::Hidden)
                    .collect::<Vec<_>>();

                for (x, y) in hidden {
                    self.reveal(x, y);
                }
            }
        }
    }

    fn reveal(&mut self, x: usize, y: usize) {
        let mut stack = vec![(x, y)];

        while let Some((x, y)) = stack.pop() {
            let idx = self.index(x, y);
            if self.cells[idx].state != CellState::Hidden {
                continue;
            }

            self.cells[idx].state = CellState::Opened;

            if self.cells[idx].kind == CellKind::Mine || self.count_mines(x, y) != 0 {
                continue;
            }

            let hidden = self
                .neighbors(x, y)
                .filter(|&(x, y)| self.cell(x, y).state == CellState::Hidden)
                .collect::<Vec<_>>();
            stack.extend(hidden);
        }
    }

    pub fn toggle_flag(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        self.cells[idx].state = match self.cells[idx].state {
            CellState::Hidden => CellState::Flagged,
            CellState::Flagged => CellState::Hidden,
            CellState::Opened => CellState::Opened,
        };
    }

    pub fn set_flagged(&mut self, x: usize, y: usize, flagged: bool) {
        let idx = self.index(x, y);
        self.cells[idx].state = match (self.cells[idx].state, flagged) {
            (CellState::Opened, _) => CellState::Opened,
            (_, true) => CellState::Flagged,
            (_, false) => CellState::Hidden,
        };
    }

    /// Flags every mine that is still hidden.
    pub fn flag_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.kind == CellKind::Mine && cell.state == CellState::Hidden {
                cell.state = CellState::Flagged;
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.kind == CellKind::Mine || cell.state == CellState::Opened)
    }

    pub fn is_lost(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.kind == CellKind::Mine && cell.state == CellState::Opened)
    }

    /// Reads the text form written by [`Minefield::format`]. Any digit is an opened
    /// empty cell; the number itself is recomputed from the layout.
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();

        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());

        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| {
                let (kind, state) = match c {
                    'm' => (CellKind::Mine, CellState::Hidden),
                    'X' => (CellKind::Mine, CellState::Opened),
                    'F' => (CellKind::Mine, CellState::Flagged),
                    'f' => (CellKind::Empty, CellState::Flagged),
                    '0'..='8' => (CellKind::Empty, CellState::Opened),
                    _ => (CellKind::Empty, CellState::Hidden),
                };
                Cell { kind, state }
            })
            .collect::<Vec<_>>();

        assert_eq!(cells.len(), width * height, "ragged minefield text");

        Minefield {
            cells,
            width,
            height,
        }
    }

    pub fn format(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cell(x, y);
                let c = match (cell.kind, cell.state) {
                    (CellKind::Mine, CellState::Hidden) => 'm',
                    (CellKind::Mine, CellState::Opened) => 'X',
                    (CellKind::Mine, CellState::Flagged) => 'F',
                    (CellKind::Empty, CellState::Flagged) => 'f',
                    (CellKind::Empty, CellState::Hidden) => '.',
                    (CellKind::Empty, CellState::Opened) => {
                        char::from_digit(self.count_mines(x, y) as u32, 10).unwrap_or('?')
                    }
                };
                out.push(c);
            }
            let _ = writeln!(out);
        }

        out
    }
}
