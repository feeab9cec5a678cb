use crate::game::{Board, CellState, CellType, GameState, GameStatus, Point};
use log::warn;
use once_cell::sync::Lazy;
use peroxide::{
    fuga::{LinearAlgebra, Shape},
    structure::matrix::matrix,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

const EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Click {
    pub point: Point,
    pub action: Action,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logic {
    FirstClick,
    SingleCellSafe,
    SingleCellMines,
    NoMinesLeft,
    AllRemainingMines,
    Linear,
}

impl Logic {
    pub const fn description(self) -> &'static str {
        match self {
            Logic::FirstClick => "Nothing is revealed yet, and the first click is always safe.",
            Logic::SingleCellSafe => {
                "This number already touches as many flags as it needs, so its other neighbours are safe."
            }
            Logic::SingleCellMines => {
                "This number needs every one of its unrevealed neighbours to be a mine."
            }
            Logic::NoMinesLeft => "Every mine is flagged, so all remaining cells are safe.",
            Logic::AllRemainingMines => {
                "The remaining unrevealed cells are exactly the remaining mines."
            }
            Logic::Linear => {
                "Combining the constraints of the surrounding numbers pins these cells down."
            }
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reason {
    pub logic: Logic,
    /// Revealed cells the deduction was made from.
    pub related: BTreeSet<Point>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub clicks: Vec<Click>,
    pub reason: Option<Reason>,
}

impl Move {
    fn new(clicks: Vec<Click>, logic: Logic, related: BTreeSet<Point>) -> Self {
        Move {
            clicks,
            reason: Some(Reason { logic, related }),
        }
    }
}

/// Finds the next move that needs no guessing, if there is one.
pub trait Solver: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, state: &GameState) -> Option<Move>;
}

/// Single-number rules plus the global mine count.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleSolver;

impl Solver for SimpleSolver {
    fn name(&self) -> &'static str {
        "Simple"
    }

    fn solve(&self, state: &GameState) -> Option<Move> {
        solve_simple(state)
    }
}

/// The simple rules first, then Gaussian elimination over the whole frontier.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearSolver;

impl Solver for LinearSolver {
    fn name(&self) -> &'static str {
        "Linear"
    }

    fn solve(&self, state: &GameState) -> Option<Move> {
        solve_simple(state).or_else(|| solve_linear(state))
    }
}

static SOLVERS: Lazy<Vec<Arc<dyn Solver>>> =
    Lazy::new(|| vec![Arc::new(LinearSolver), Arc::new(SimpleSolver)]);

/// Every solver the client knows about, default first.
pub fn solvers() -> &'static [Arc<dyn Solver>] {
    &SOLVERS
}

pub fn default_solver() -> Arc<dyn Solver> {
    SOLVERS[0].clone()
}

pub fn find_solver(name: &str) -> Option<Arc<dyn Solver>> {
    SOLVERS.iter().find(|solver| solver.name() == name).cloned()
}

fn unknown_neighbors(board: &Board, point: Point) -> Vec<Point> {
    board
        .neighbors(point)
        .filter(|&n| board.get(n).state == CellState::Unknown)
        .collect()
}

fn flagged_neighbors(board: &Board, point: Point) -> usize {
    board
        .neighbors(point)
        .filter(|&n| board.get(n).state == CellState::Flagged)
        .count()
}

fn clicks(points: impl IntoIterator<Item = Point>, action: Action) -> Vec<Click> {
    points
        .into_iter()
        .map(|point| Click { point, action })
        .collect()
}

pub fn solve_simple(state: &GameState) -> Option<Move> {
    if state.status != GameStatus::Playing {
        return None;
    }

    let board = &state.board;

    if board
        .points()
        .all(|p| board.get(p).state != CellState::Revealed)
    {
        let center = Point::new(board.width() / 2, board.height() / 2);
        return Some(Move::new(
            clicks([center], Action::Left),
            Logic::FirstClick,
            BTreeSet::new(),
        ));
    }

    for point in board.points() {
        let cell = board.get(point);
        let CellType::Safe(number) = cell.kind else {
            continue;
        };
        if cell.state != CellState::Revealed {
            continue;
        }

        let unknown = unknown_neighbors(board, point);
        if unknown.is_empty() {
            continue;
        }

        let number = number as usize;
        let flags = flagged_neighbors(board, point);

        if flags == number {
            return Some(Move::new(
                clicks(unknown, Action::Left),
                Logic::SingleCellSafe,
                BTreeSet::from([point]),
            ));
        }

        if number > flags && number - flags == unknown.len() {
            return Some(Move::new(
                clicks(unknown, Action::Right),
                Logic::SingleCellMines,
                BTreeSet::from([point]),
            ));
        }
    }

    let unknown = board
        .points()
        .filter(|&p| board.get(p).state == CellState::Unknown)
        .collect::<Vec<_>>();

    if unknown.is_empty() {
        return None;
    }

    if state.remaining_mines == 0 {
        return Some(Move::new(
            clicks(unknown, Action::Left),
            Logic::NoMinesLeft,
            BTreeSet::new(),
        ));
    }

    if state.remaining_mines == unknown.len() as isize {
        return Some(Move::new(
            clicks(unknown, Action::Right),
            Logic::AllRemainingMines,
            BTreeSet::new(),
        ));
    }

    None
}

/// Builds one row per frontier number over the unknown cells next to it, reduces the
/// system, and reads off every row whose right hand side hits one of its bounds.
pub fn solve_linear(state: &GameState) -> Option<Move> {
    if state.status != GameStatus::Playing {
        return None;
    }

    let board = &state.board;

    let frontier = board
        .points()
        .filter_map(|p| {
            let cell = board.get(p);
            match (cell.state, cell.kind) {
                (CellState::Revealed, CellType::Safe(number)) => {
                    let unknown = unknown_neighbors(board, p);
                    if unknown.is_empty() {
                        None
                    } else {
                        let value = number as f64 - flagged_neighbors(board, p) as f64;
                        Some((p, unknown, value))
                    }
                }
                _ => None,
            }
        })
        .collect::<Vec<_>>();

    if frontier.is_empty() {
        return None;
    }

    let variables = frontier
        .iter()
        .flat_map(|(_, unknown, _)| unknown.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    let column = |point: &Point| variables.binary_search(point).ok();

    let mut rows = frontier
        .iter()
        .map(|(_, unknown, value)| {
            let mut row = vec![0.0; variables.len() + 1];
            for point in unknown {
                if let Some(col) = column(point) {
                    row[col] = 1.0;
                }
            }
            row[variables.len()] = *value;
            row
        })
        .collect::<Vec<_>>();

    let interior = board
        .points()
        .filter(|p| board.get(*p).state == CellState::Unknown)
        .count()
        - variables.len();

    if interior == 0 && state.remaining_mines >= 0 {
        let mut row = vec![1.0; variables.len() + 1];
        row[variables.len()] = state.remaining_mines as f64;
        rows.push(row);
    }

    let matrix_height = rows.len();
    let matrix_width = variables.len() + 1;

    let reduced = matrix(rows.concat(), matrix_height, matrix_width, Shape::Row).rref();

    let mut found = BTreeMap::new();

    for r in 0..matrix_height {
        let coefficients = (0..variables.len())
            .map(|c| reduced[(r, c)])
            .collect::<Vec<_>>();
        let value = reduced[(r, variables.len())];

        let upper_bound = coefficients.iter().filter(|c| **c > EPSILON).sum::<f64>();
        let lower_bound = coefficients.iter().filter(|c| **c < -EPSILON).sum::<f64>();

        if upper_bound == 0.0 && lower_bound == 0.0 {
            if value.abs() > EPSILON {
                warn!("Inconsistent constraints, the board has a wrong flag");
                return None;
            }
            continue;
        }

        let positive_is_mine = if (value - upper_bound).abs() < EPSILON {
            true
        } else if (value - lower_bound).abs() < EPSILON {
            false
        } else {
            continue;
        };

        for (c, point) in coefficients.iter().zip(variables.iter()) {
            let action = if *c > EPSILON {
                if positive_is_mine {
                    Action::Right
                } else {
                    Action::Left
                }
            } else if *c < -EPSILON {
                if positive_is_mine {
                    Action::Left
                } else {
                    Action::Right
                }
            } else {
                continue;
            };
            found.entry(*point).or_insert(action);
        }
    }

    if found.is_empty() {
        return None;
    }

    let related = frontier
        .iter()
        .filter(|(_, unknown, _)| unknown.iter().any(|p| found.contains_key(p)))
        .map(|(p, _, _)| *p)
        .collect::<BTreeSet<_>>();

    let clicks = found
        .into_iter()
        .map(|(point, action)| Click { point, action })
        .collect();

    Some(Move::new(clicks, Logic::Linear, related))
}

/// Applies solver moves until the game ends or the solver is stuck.
pub fn solve(game: &mut crate::game::Game) -> GameStatus {
    let solver = game.solver().clone();
    let limit = game.size().cells() * 2 + 1;

    for _ in 0..limit {
        let state = game.state();
        if state.status != GameStatus::Playing {
            return state.status;
        }

        let Some(mv) = solver.solve(&state) else {
            return state.status;
        };

        match game.apply(&mv) {
            Ok(next) if next == state => return next.status,
            Ok(_) => {}
            Err(err) => {
                warn!("Solver produced an invalid move: {err}");
                return state.status;
            }
        }
    }

    game.status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{BoardSize, Game},
        minefield::Minefield,
    };

    fn state(text: &str) -> GameState {
        Game::from_layout(Minefield::parse(text), default_solver())
            .unwrap()
            .state()
    }

    fn actions(mv: &Move) -> Vec<(usize, usize, Action)> {
        mv.clicks
            .iter()
            .map(|c| (c.point.x, c.point.y, c.action))
            .collect()
    }

    #[test]
    fn test_registry() {
        assert_eq!(default_solver().name(), "Linear");
        assert_eq!(
            solvers().iter().map(|s| s.name()).collect::<Vec<_>>(),
            vec!["Linear", "Simple"]
        );
        assert!(find_solver("Simple").is_some());
        assert!(find_solver("Psychic").is_none());
    }

    #[test]
    fn test_first_click_is_center() {
        let game = Game::new(BoardSize::new(5, 3, 2).unwrap(), default_solver());
        let mv = SimpleSolver.solve(&game.state()).unwrap();
        assert_eq!(actions(&mv), vec![(2, 1, Action::Left)]);
        assert_eq!(mv.reason.unwrap().logic, Logic::FirstClick);
    }

    #[test]
    fn test_single_cell_mines() {
        let mv = SimpleSolver.solve(&state("m10.")).unwrap();
        assert_eq!(actions(&mv), vec![(0, 0, Action::Right)]);
        let reason = mv.reason.unwrap();
        assert_eq!(reason.logic, Logic::SingleCellMines);
        assert_eq!(reason.related, BTreeSet::from([Point::new(1, 0)]));
    }

    #[test]
    fn test_single_cell_safe() {
        let mv = SimpleSolver.solve(&state("F1.")).unwrap();
        assert_eq!(actions(&mv), vec![(2, 0, Action::Left)]);
        assert_eq!(mv.reason.unwrap().logic, Logic::SingleCellSafe);
    }

    #[test]
    fn test_no_mines_left() {
        // none of the hidden cells touches a number, only the mine count gives them away
        let mv = SimpleSolver.solve(&state("1F...")).unwrap();
        assert_eq!(
            actions(&mv),
            vec![(2, 0, Action::Left), (3, 0, Action::Left), (4, 0, Action::Left)]
        );
        assert_eq!(mv.reason.unwrap().logic, Logic::NoMinesLeft);
    }

    #[test]
    fn test_linear_finds_what_simple_cannot() {
        let state = state(
            r#".m.
111
000"#,
        );
        assert_eq!(SimpleSolver.solve(&state), None);

        let mv = LinearSolver.solve(&state).unwrap();
        assert_eq!(
            actions(&mv),
            vec![
                (0, 0, Action::Left),
                (1, 0, Action::Right),
                (2, 0, Action::Left),
            ]
        );
        let reason = mv.reason.unwrap();
        assert_eq!(reason.logic, Logic::Linear);
        assert_eq!(
            reason.related,
            BTreeSet::from([Point::new(0, 1), Point::new(1, 1), Point::new(2, 1)])
        );
    }

    #[test]
    fn test_finished_games_have_no_moves() {
        assert_eq!(LinearSolver.solve(&state("X1")), None);
        assert_eq!(LinearSolver.solve(&state("F1")), None);
    }

    #[test]
    fn test_solve_to_completion() {
        let mut game = Game::from_layout(
            Minefield::parse(
                r#".m.
111
000"#,
            ),
            default_solver(),
        )
        .unwrap();
        assert_eq!(solve(&mut game), GameStatus::Won);
        assert_eq!(game.minefield().format(), "1F1\n111\n000\n");

        let mut game = Game::from_layout(
            Minefield::parse(
                r#".m.
111
000"#,
            ),
            find_solver("Simple").unwrap(),
        )
        .unwrap();
        assert_eq!(solve(&mut game), GameStatus::Playing);
    }
}
