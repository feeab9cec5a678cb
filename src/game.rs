use std::{
    fmt,
    sync::{atomic::AtomicBool, Arc},
};

use log::{debug, info};
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    generating::generate_guessfree,
    minefield::{self, CellKind, Minefield},
    solver::{Action, Click, Move, Solver},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("width and height must be at least 1")]
    EmptyBoard,
    #[error("{mines} mines do not fit on a {width}x{height} board")]
    TooManyMines {
        width: usize,
        height: usize,
        mines: usize,
    },
    #[error("({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("layout is {got_width}x{got_height}, expected {width}x{height}")]
    LayoutMismatch {
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions and mine count of a board. Always holds at least one safe cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSize", into = "RawBoardSize")]
pub struct BoardSize {
    width: usize,
    height: usize,
    mines: usize,
}

#[derive(Serialize, Deserialize)]
struct RawBoardSize {
    width: usize,
    height: usize,
    mines: usize,
}

impl BoardSize {
    pub fn new(width: usize, height: usize, mines: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mines >= width.saturating_mul(height) {
            return Err(GameError::TooManyMines {
                width,
                height,
                mines,
            });
        }

        Ok(BoardSize {
            width,
            height,
            mines,
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn mines(&self) -> usize {
        self.mines
    }

    pub const fn cells(&self) -> usize {
        self.width * self.height
    }
}

impl TryFrom<RawBoardSize> for BoardSize {
    type Error = GameError;

    fn try_from(raw: RawBoardSize) -> Result<Self> {
        BoardSize::new(raw.width, raw.height, raw.mines)
    }
}

impl From<BoardSize> for RawBoardSize {
    fn from(size: BoardSize) -> Self {
        RawBoardSize {
            width: size.width,
            height: size.height,
            mines: size.mines,
        }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} with {} mines", self.width, self.height, self.mines)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConventionalSize {
    Beginner,
    Intermediate,
    Expert,
}

impl ConventionalSize {
    pub const ALL: [ConventionalSize; 3] = [
        ConventionalSize::Beginner,
        ConventionalSize::Intermediate,
        ConventionalSize::Expert,
    ];

    pub const fn size(self) -> BoardSize {
        match self {
            ConventionalSize::Beginner => BoardSize {
                width: 9,
                height: 9,
                mines: 10,
            },
            ConventionalSize::Intermediate => BoardSize {
                width: 16,
                height: 16,
                mines: 40,
            },
            ConventionalSize::Expert => BoardSize {
                width: 30,
                height: 16,
                mines: 99,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ConventionalSize::Beginner => "Beginner",
            ConventionalSize::Intermediate => "Intermediate",
            ConventionalSize::Expert => "Expert",
        }
    }
}

/// What the player knows about a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellType {
    Safe(u8),
    Mine,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Unknown,
    Revealed,
    Flagged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellType,
    pub state: CellState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// The player's view of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
    size: BoardSize,
}

impl Board {
    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn get(&self, point: Point) -> Cell {
        self.cells[point.y * self.size.width + point.x]
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.size.width && point.y < self.size.height
    }

    pub fn points(&self) -> impl Iterator<Item = Point> {
        let width = self.size.width;
        (0..self.cells.len()).map(move |idx| Point::new(idx % width, idx / width))
    }

    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> {
        minefield::neighbors(self.size.width, self.size.height, point.x, point.y)
            .map(|(x, y)| Point::new(x, y))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub status: GameStatus,
    pub remaining_mines: isize,
}

/// A single game: the hidden layout, the player's moves on it, and the solver the
/// layout must be solvable by.
pub struct Game {
    size: BoardSize,
    solver: Arc<dyn Solver>,
    minefield: Minefield,
    generated: bool,
    status: GameStatus,
}

impl Game {
    /// A game whose layout is generated on the first reveal.
    pub fn new(size: BoardSize, solver: Arc<dyn Solver>) -> Self {
        Game {
            size,
            solver,
            minefield: Minefield::new(size.width, size.height),
            generated: false,
            status: GameStatus::Playing,
        }
    }

    /// A game on a fixed layout, possibly with moves already made on it.
    pub fn from_layout(minefield: Minefield, solver: Arc<dyn Solver>) -> Result<Self> {
        let size = BoardSize::new(minefield.width, minefield.height, minefield.mine_count())?;
        let mut game = Game {
            size,
            solver,
            minefield,
            generated: true,
            status: GameStatus::Playing,
        };
        game.update_status();
        Ok(game)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn solver(&self) -> &Arc<dyn Solver> {
        &self.solver
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    fn check(&self, point: Point) -> Result<usize> {
        if point.x >= self.size.width || point.y >= self.size.height {
            return Err(GameError::OutOfBounds {
                x: point.x,
                y: point.y,
            });
        }
        Ok(point.y * self.size.width + point.x)
    }

    /// Installs a layout generated elsewhere. Flags already placed are kept.
    pub fn apply_layout(&mut self, layout: Minefield) -> Result<()> {
        if layout.width != self.size.width || layout.height != self.size.height {
            return Err(GameError::LayoutMismatch {
                width: self.size.width,
                height: self.size.height,
                got_width: layout.width,
                got_height: layout.height,
            });
        }

        for (cell, generated) in self.minefield.cells.iter_mut().zip(layout.cells) {
            cell.kind = generated.kind;
        }
        self.generated = true;

        info!(
            "Started game with minefield: \n{}",
            self.minefield.format()
        );

        Ok(())
    }

    pub fn left_click(&mut self, point: Point) -> Result<GameState> {
        let idx = self.check(point)?;

        if self.status != GameStatus::Playing
            || self.minefield.cells[idx].state == minefield::CellState::Flagged
        {
            return Ok(self.state());
        }

        if !self.generated {
            let layout = generate_guessfree(
                &mut thread_rng(),
                self.size,
                idx,
                &self.solver,
                &Default::default(),
                &AtomicBool::new(false),
            );
            if let Some(layout) = layout {
                self.apply_layout(layout)?;
            }
        }

        self.minefield.open(point.x, point.y);
        self.update_status();

        Ok(self.state())
    }

    pub fn right_click(&mut self, point: Point) -> Result<GameState> {
        self.check(point)?;

        if self.status == GameStatus::Playing {
            self.minefield.toggle_flag(point.x, point.y);
        }

        Ok(self.state())
    }

    pub fn set_flagged(&mut self, point: Point, flagged: bool) -> Result<GameState> {
        self.check(point)?;

        if self.status == GameStatus::Playing {
            self.minefield.set_flagged(point.x, point.y, flagged);
        }

        Ok(self.state())
    }

    pub fn click(&mut self, click: Click) -> Result<GameState> {
        match click.action {
            Action::Left => self.left_click(click.point),
            Action::Right => self.right_click(click.point),
        }
    }

    /// Plays every click of a solver move, stopping early if the game ends.
    pub fn apply(&mut self, mv: &Move) -> Result<GameState> {
        for click in mv.clicks.iter() {
            self.click(*click)?;
            if self.status != GameStatus::Playing {
                break;
            }
        }

        Ok(self.state())
    }

    fn update_status(&mut self) {
        if self.minefield.is_lost() {
            self.status = GameStatus::Lost;
            debug!("game lost");
        } else if self.minefield.is_solved() {
            self.minefield.flag_mines();
            self.status = GameStatus::Won;
            debug!("game won");
        }
    }

    pub fn state(&self) -> GameState {
        let lost = self.status == GameStatus::Lost;
        let width = self.size.width;

        let cells = self
            .minefield
            .cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let known = || match cell.kind {
                    CellKind::Mine => CellType::Mine,
                    CellKind::Empty => {
                        CellType::Safe(self.minefield.count_mines(idx % width, idx / width) as u8)
                    }
                };

                match cell.state {
                    minefield::CellState::Opened => Cell {
                        kind: known(),
                        state: CellState::Revealed,
                    },
                    minefield::CellState::Hidden => Cell {
                        kind: if lost && cell.kind == CellKind::Mine {
                            CellType::Mine
                        } else {
                            CellType::Unknown
                        },
                        state: CellState::Unknown,
                    },
                    minefield::CellState::Flagged => Cell {
                        kind: if lost { known() } else { CellType::Unknown },
                        state: CellState::Flagged,
                    },
                }
            })
            .collect();

        GameState {
            board: Board {
                cells,
                size: self.size,
            },
            status: self.status,
            remaining_mines: self.size.mines as isize - self.minefield.flag_count() as isize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{default_solver, find_solver};

    fn game(text: &str) -> Game {
        Game::from_layout(Minefield::parse(text), default_solver()).unwrap()
    }

    #[test]
    fn test_board_size_validation() {
        assert!(BoardSize::new(9, 9, 10).is_ok());
        assert!(BoardSize::new(3, 3, 0).is_ok());
        assert_eq!(BoardSize::new(0, 9, 1), Err(GameError::EmptyBoard));
        assert_eq!(
            BoardSize::new(3, 3, 9),
            Err(GameError::TooManyMines {
                width: 3,
                height: 3,
                mines: 9
            })
        );
    }

    #[test]
    fn test_board_size_json_is_validated() {
        let size: BoardSize =
            serde_json::from_str(r#"{"width":16,"height":16,"mines":40}"#).unwrap();
        assert_eq!(size, ConventionalSize::Intermediate.size());

        assert!(serde_json::from_str::<BoardSize>(r#"{"width":2,"height":2,"mines":4}"#).is_err());
    }

    #[test]
    fn test_left_click_reveals_and_wins() {
        let mut game = game("..m");
        let state = game.left_click(Point::new(0, 0)).unwrap();

        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.remaining_mines, 0);
        assert_eq!(state.board.get(Point::new(0, 0)).kind, CellType::Safe(0));
        assert_eq!(state.board.get(Point::new(1, 0)).kind, CellType::Safe(1));
        assert_eq!(state.board.get(Point::new(2, 0)).state, CellState::Flagged);
    }

    #[test]
    fn test_loss_reveals_mines_and_false_flags() {
        let mut game = game(
            r#"m.m
f..
..."#,
        );
        let state = game.left_click(Point::new(0, 0)).unwrap();

        assert_eq!(state.status, GameStatus::Lost);
        assert_eq!(
            state.board.get(Point::new(0, 0)),
            Cell {
                kind: CellType::Mine,
                state: CellState::Revealed
            }
        );
        assert_eq!(
            state.board.get(Point::new(2, 0)),
            Cell {
                kind: CellType::Mine,
                state: CellState::Unknown
            }
        );
        assert_eq!(
            state.board.get(Point::new(0, 1)),
            Cell {
                kind: CellType::Safe(1),
                state: CellState::Flagged
            }
        );

        let after = game.left_click(Point::new(2, 2)).unwrap();
        assert_eq!(after, state);
    }

    #[test]
    fn test_unknown_cells_stay_hidden_while_playing() {
        let game = game(".m.");
        let state = game.state();
        assert!(state
            .board
            .points()
            .all(|p| state.board.get(p).kind == CellType::Unknown));
    }

    #[test]
    fn test_flags_count_against_remaining_mines() {
        let mut game = game("...m");
        game.right_click(Point::new(0, 0)).unwrap();
        let state = game.right_click(Point::new(1, 0)).unwrap();
        assert_eq!(state.remaining_mines, -1);

        let state = game.set_flagged(Point::new(1, 0), false).unwrap();
        assert_eq!(state.remaining_mines, 0);
        assert_eq!(state.board.get(Point::new(0, 0)).state, CellState::Flagged);

        // flagged cells ignore left clicks
        let state = game.left_click(Point::new(0, 0)).unwrap();
        assert_eq!(state.board.get(Point::new(0, 0)).state, CellState::Flagged);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut game = game("..m");
        assert_eq!(
            game.left_click(Point::new(3, 0)),
            Err(GameError::OutOfBounds { x: 3, y: 0 })
        );
        assert!(game.right_click(Point::new(0, 1)).is_err());
    }

    #[test]
    fn test_first_click_generates_safe_board() {
        let solver = find_solver("Simple").unwrap();
        let mut game = Game::new(ConventionalSize::Beginner.size(), solver);
        assert!(!game.is_generated());

        let state = game.left_click(Point::new(4, 4)).unwrap();

        assert!(game.is_generated());
        assert_ne!(state.status, GameStatus::Lost);
        assert_eq!(game.minefield().mine_count(), 10);
        assert_eq!(state.board.get(Point::new(4, 4)).kind, CellType::Safe(0));
    }

    #[test]
    fn test_first_click_on_dense_board_returns() {
        let mut game = Game::new(BoardSize::new(3, 3, 7).unwrap(), default_solver());

        let state = game.left_click(Point::new(0, 0)).unwrap();

        assert!(game.is_generated());
        assert_eq!(game.minefield().mine_count(), 7);
        assert_eq!(state.board.get(Point::new(0, 0)).state, CellState::Revealed);
        assert_ne!(state.status, GameStatus::Lost);
    }

    #[test]
    fn test_apply_layout_keeps_flags() {
        let mut game = Game::new(BoardSize::new(3, 1, 1).unwrap(), default_solver());
        game.right_click(Point::new(2, 0)).unwrap();
        game.apply_layout(Minefield::parse("..m")).unwrap();

        assert_eq!(game.minefield().format(), "..F\n");
        assert!(game.apply_layout(Minefield::new(2, 2)).is_err());
    }
}
