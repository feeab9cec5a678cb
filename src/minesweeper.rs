use std::{collections::HashMap, sync::Arc, time::Duration};

use egui::{vec2, Color32, Image, Margin, Response, Sense, Ui, Vec2, Widget};
use log::{debug, error, info, warn};
use web_time::Instant;

use crate::{
    board_ui::{presses_down, BoardEvents, BoardView},
    counter::{mine_counter_digits, CounterView},
    game::{self, Board, BoardSize, CellState, CellType, Game, GameState, GameStatus, Point},
    generating::{GeneratorStatus, ParallelGuessfreeGenerator},
    minefield::Minefield,
    ms_button::MinesweeperButton,
    ms_frame::MinesweeperFrame,
    ms_modal::MinesweeperModal,
    solver::{Action, Move, Solver},
    texture::{Palette, Texture},
    utils::face_images,
};

const FACE_SIZE: f32 = 24.0;
const TIME_DIGITS: usize = 3;
const MAX_SECONDS: u64 = 999;
const SECTION_SPACING: f32 = 6.0;
const TIMER_REPAINT_INTERVAL: Duration = Duration::from_millis(250);
const GENERATOR_POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const AUTO_MOVE_INTERVAL: Duration = Duration::from_millis(10);

const RELATED_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0x80, 0x80, 0x80);
const LEFT_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0x80, 0, 0x80);
const RIGHT_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0x80, 0, 0, 0x80);

const NO_LOGIC: &str = "no logic provided";
const NO_MOVE: &str = "There is no move that can be made without guessing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Smile,
    Pressed,
    Click,
    Won,
    Lost,
}

pub fn face_for(status: GameStatus, face_down: bool, cell_down: bool) -> Face {
    if face_down {
        return Face::Pressed;
    }

    match status {
        GameStatus::Won => Face::Won,
        GameStatus::Lost => Face::Lost,
        GameStatus::Playing if cell_down => Face::Click,
        GameStatus::Playing => Face::Smile,
    }
}

/// Unknown neighbours to flag before chording `point`: all of them, when the
/// unrevealed neighbours are exactly its mines.
pub fn flag_chord_targets(board: &Board, point: Point) -> Vec<Point> {
    let cell = board.get(point);
    let CellType::Safe(n) = cell.kind else {
        return Vec::new();
    };
    if cell.state != CellState::Revealed || n == 0 {
        return Vec::new();
    }

    let unrevealed: Vec<Point> = board
        .neighbors(point)
        .filter(|&p| board.get(p).state != CellState::Revealed)
        .collect();

    if unrevealed.len() != n as usize {
        return Vec::new();
    }

    unrevealed
        .into_iter()
        .filter(|&p| board.get(p).state == CellState::Unknown)
        .collect()
}

pub fn hint_overlays(mv: &Move) -> HashMap<Point, Color32> {
    let mut overlays = HashMap::new();

    if let Some(reason) = &mv.reason {
        for point in reason.related.iter() {
            overlays.insert(*point, RELATED_OVERLAY);
        }
    }

    for click in mv.clicks.iter() {
        let color = match click.action {
            Action::Left => LEFT_OVERLAY,
            Action::Right => RIGHT_OVERLAY,
        };
        overlays.insert(click.point, color);
    }

    overlays
}

#[derive(Debug, Default, Clone, Copy)]
struct Timer {
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl Timer {
    fn start(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    fn stop(&mut self, now: Instant) {
        if self.started.is_some() && self.stopped.is_none() {
            self.stopped = Some(now);
        }
    }

    fn is_running(&self) -> bool {
        self.started.is_some() && self.stopped.is_none()
    }

    fn seconds(&self, now: Instant) -> u64 {
        match self.started {
            None => 0,
            Some(started) => self
                .stopped
                .unwrap_or(now)
                .duration_since(started)
                .as_secs()
                .min(MAX_SECONDS),
        }
    }
}

struct Hint {
    overlays: HashMap<Point, Color32>,
    description: String,
    open: bool,
}

fn outer_frame() -> MinesweeperFrame {
    MinesweeperFrame::new(3)
        .floating()
        .margin(Margin::same(6.0))
}

fn header_frame() -> MinesweeperFrame {
    MinesweeperFrame::new(2).margin(Margin::symmetric(7.0, 4.0))
}

fn board_frame() -> MinesweeperFrame {
    MinesweeperFrame::new(3)
}

fn face_frame() -> MinesweeperFrame {
    MinesweeperFrame::new(1).protruded()
}

fn header_size(size: BoardSize) -> Vec2 {
    let mines = CounterView::size(mine_counter_digits(size));
    let time = CounterView::size(TIME_DIGITS);
    let face = Vec2::splat(FACE_SIZE) + face_frame().extra_size();

    vec2(mines.x + face.x + time.x, mines.y.max(face.y)) + header_frame().extra_size()
}

fn fit_around(board: Vec2, size: BoardSize) -> Vec2 {
    let board = board + board_frame().extra_size();
    let header = header_size(size);

    vec2(board.x.max(header.x), board.y + header.y + SECTION_SPACING) + outer_frame().extra_size()
}

/// A full game: counters, face button and board, plus the cheats layered on top.
pub struct MinesweeperGame {
    game: Game,
    state: GameState,
    solver: Arc<dyn Solver>,
    texture: Texture,
    auto: bool,
    flag_chord: bool,
    hover_chord: bool,
    timer: Timer,
    last_pressed: Option<Point>,
    last_hovered: Option<Point>,
    generator: Option<ParallelGuessfreeGenerator>,
    auto_running: bool,
    last_auto_move: Option<Instant>,
    hint: Option<Hint>,
    faces: [Image<'static>; 5],
}

impl MinesweeperGame {
    pub fn new(size: BoardSize, solver: Arc<dyn Solver>, texture: Texture) -> Self {
        Self::with_game(Game::new(size, solver.clone()), solver, texture)
    }

    /// A game on a known layout, skipping generation.
    pub fn from_layout(
        layout: Minefield,
        solver: Arc<dyn Solver>,
        texture: Texture,
    ) -> game::Result<Self> {
        let game = Game::from_layout(layout, solver.clone())?;
        Ok(Self::with_game(game, solver, texture))
    }

    fn with_game(game: Game, solver: Arc<dyn Solver>, texture: Texture) -> Self {
        MinesweeperGame {
            state: game.state(),
            game,
            solver,
            texture,
            auto: false,
            flag_chord: false,
            hover_chord: false,
            timer: Timer::default(),
            last_pressed: None,
            last_hovered: None,
            generator: None,
            auto_running: false,
            last_auto_move: None,
            hint: None,
            faces: face_images(),
        }
    }

    pub fn size(&self) -> BoardSize {
        self.game.size()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = texture;
    }

    /// Used for hints and auto mode right away, and for generating the next game.
    pub fn set_solver(&mut self, solver: Arc<dyn Solver>) {
        self.solver = solver;
    }

    /// Auto mode starts playing on the next click.
    pub fn set_auto(&mut self, auto: bool) {
        self.auto = auto;
        if !auto {
            self.auto_running = false;
        }
    }

    pub fn set_flag_chord(&mut self, flag_chord: bool) {
        self.flag_chord = flag_chord;
    }

    pub fn set_hover_chord(&mut self, hover_chord: bool) {
        self.hover_chord = hover_chord;
    }

    pub fn restart(&mut self) {
        self.start(self.game.size());
    }

    /// Starts a fresh game, possibly of a different size.
    pub fn start(&mut self, size: BoardSize) {
        self.generator = None;
        self.game = Game::new(size, self.solver.clone());
        self.state = self.game.state();
        self.timer = Timer::default();
        self.last_pressed = None;
        self.last_hovered = None;
        self.auto_running = false;
        self.last_auto_move = None;
        self.hint = None;
        debug!("New game: {size}");
    }

    pub fn preferred_size_for(size: BoardSize) -> Vec2 {
        fit_around(BoardView::preferred_size(size), size)
    }

    pub fn minimum_size_for(size: BoardSize) -> Vec2 {
        fit_around(BoardView::minimum_size(size), size)
    }

    fn accepts_input(&self) -> bool {
        self.state.status == GameStatus::Playing && self.generator.is_none()
    }

    fn update(&mut self, result: game::Result<GameState>) {
        match result {
            Ok(state) => {
                self.state = state;
                self.hint = None;

                if self.state.status != GameStatus::Playing {
                    self.auto_running = false;
                }

                if self.state.status != GameStatus::Playing && self.timer.is_running() {
                    let now = Instant::now();
                    self.timer.stop(now);
                    info!(
                        "Game {:?} after {} seconds",
                        self.state.status,
                        self.timer.seconds(now)
                    );
                }
            }
            Err(err) => error!("Rejected move: {err}"),
        }
    }

    pub fn left_click(&mut self, point: Point) {
        if !self.accepts_input() {
            return;
        }
        if !self.state.board.contains(point) {
            warn!("Ignoring click outside the board at {point}");
            return;
        }

        if !self.game.is_generated() {
            if self.state.board.get(point).state == CellState::Flagged {
                return;
            }
            self.generator = Some(ParallelGuessfreeGenerator::new(
                self.game.size(),
                point,
                self.solver.clone(),
            ));
            return;
        }

        if self.flag_chord {
            for target in flag_chord_targets(&self.state.board, point) {
                let result = self.game.set_flagged(target, true);
                self.update(result);
            }
        }

        self.timer.start(Instant::now());
        let result = self.game.left_click(point);
        self.update(result);
        self.resume_auto();
    }

    pub fn right_click(&mut self, point: Point) {
        if !self.accepts_input() {
            return;
        }

        let result = self.game.right_click(point);
        self.update(result);
        self.resume_auto();
    }

    fn resume_auto(&mut self) {
        if self.auto && self.state.status == GameStatus::Playing {
            self.auto_running = true;
        }
    }

    /// Stops a running generation and starts over on a fresh board.
    pub fn cancel_generation(&mut self) {
        if self.generator.is_some() {
            info!("Generation cancelled");
            self.restart();
        }
    }

    /// Shows the solver's next move on the board together with its reasoning.
    pub fn hint(&mut self) {
        if !self.accepts_input() {
            return;
        }

        let hint = match self.solver.solve(&self.state) {
            Some(mv) => Hint {
                overlays: hint_overlays(&mv),
                description: mv
                    .reason
                    .as_ref()
                    .map_or(NO_LOGIC, |reason| reason.logic.description())
                    .to_owned(),
                open: true,
            },
            None => Hint {
                overlays: HashMap::new(),
                description: NO_MOVE.to_owned(),
                open: true,
            },
        };

        self.hint = Some(hint);
    }

    /// Plays one solver move if auto mode is running and one is due. Returns whether
    /// auto mode is still running.
    pub fn auto_step(&mut self, now: Instant) -> bool {
        if !self.auto || !self.auto_running {
            return false;
        }
        if self.generator.is_some() {
            return true;
        }
        if self.state.status != GameStatus::Playing {
            self.auto_running = false;
            return false;
        }
        if self
            .last_auto_move
            .is_some_and(|last| now.duration_since(last) < AUTO_MOVE_INTERVAL)
        {
            return true;
        }

        self.last_auto_move = Some(now);

        match self.solver.solve(&self.state) {
            Some(mv) => {
                let before = self.state.clone();
                let result = self.game.apply(&mv);
                self.update(result);
                if self.state == before {
                    debug!("Auto mode made no progress");
                    self.auto_running = false;
                }
            }
            None => {
                debug!("Auto mode is stuck");
                self.auto_running = false;
            }
        }

        self.auto_running
    }

    fn poll_generator(&mut self) {
        let Some(generator) = &mut self.generator else {
            return;
        };

        match generator.run() {
            GeneratorStatus::Found(layout) => {
                let start = generator.start();
                self.generator = None;
                match self.game.apply_layout(layout) {
                    Ok(()) => self.left_click(start),
                    Err(err) => error!("Generated layout does not fit: {err}"),
                }
            }
            GeneratorStatus::StillSolving => {}
            GeneratorStatus::Stopped => {
                warn!("Generator stopped without a layout");
                self.generator = None;
            }
        }
    }

    /// A left click lands where the primary button is released, provided it was
    /// pressed on the board.
    pub fn handle_board(&mut self, events: BoardEvents) {
        if self.accepts_input() {
            if let (Some(point), Some(_)) = (events.released, self.last_pressed) {
                self.left_click(point);
            } else if let Some(point) = events.flagged {
                self.right_click(point);
            }

            if self.hover_chord && events.hovered != self.last_hovered {
                if let Some(point) = events.hovered {
                    let cell = self.state.board.get(point);
                    if cell.state == CellState::Revealed && matches!(cell.kind, CellType::Safe(_))
                    {
                        self.left_click(point);
                    }
                }
            }
        }

        self.last_pressed = events.pressed;
        self.last_hovered = events.hovered;
    }

    /// Whether the held button currently sinks some cell of the board.
    fn cell_down(&self) -> bool {
        self.last_pressed
            .is_some_and(|pressed| presses_down(&self.state.board, pressed))
    }

    fn face(&self, ui: &mut Ui, palette: &'static Palette) -> Response {
        face_frame()
            .palette(palette)
            .show(ui, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::splat(FACE_SIZE), Sense::click());

                let face = face_for(
                    self.state.status,
                    response.is_pointer_button_down_on(),
                    self.cell_down(),
                );
                self.faces[face as usize].paint_at(ui, rect);

                response
            })
            .inner
    }

    fn header(&mut self, ui: &mut Ui, palette: &'static Palette) {
        let size = self.game.size();
        let digits = mine_counter_digits(size);
        let mines = match self.state.status {
            GameStatus::Won => 0,
            _ => self.state.remaining_mines,
        };
        let seconds = self.timer.seconds(Instant::now()) as isize;

        header_frame().palette(palette).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;

                let total = ui.available_width();
                let mine_width = CounterView::size(digits).x;
                let time_width = CounterView::size(TIME_DIGITS).x;
                let face_width = FACE_SIZE + face_frame().extra_size().x;
                let before_face = ((total - face_width) / 2.0 - mine_width).max(0.0);
                let after_face =
                    (total - mine_width - before_face - face_width - time_width).max(0.0);

                ui.add(CounterView::new(mines, digits, palette));
                ui.add_space(before_face);
                if self.face(ui, palette).clicked() {
                    info!("Restarting");
                    self.restart();
                }
                ui.add_space(after_face);
                ui.add(CounterView::new(seconds, TIME_DIGITS, palette));
            });
        });
    }

    fn modals(&mut self, ui: &mut Ui, palette: &'static Palette) {
        let mut cancel = false;

        if let Some(generator) = &self.generator {
            let attempts = generator.attempts();
            MinesweeperModal::new("generating", true, palette).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label("Generating a board that needs no guessing");
                    ui.label(format!("Attempts: {attempts}"));
                    ui.add_space(6.0);
                    cancel = MinesweeperButton::text(palette, ui, "Cancel").clicked();
                });
            });
            ui.ctx().request_repaint_after(GENERATOR_POLL_INTERVAL);
        }

        if cancel {
            self.cancel_generation();
        }

        if let Some(hint) = &mut self.hint {
            let mut modal = MinesweeperModal::new("hint", hint.open, palette);
            let description = hint.description.as_str();
            let mut ok = false;

            modal.show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(description);
                    ui.add_space(6.0);
                    ok = MinesweeperButton::text(palette, ui, "OK").clicked();
                });
            });

            hint.open = modal.open && !ok;
        }
    }
}

impl Widget for &mut MinesweeperGame {
    fn ui(self, ui: &mut Ui) -> Response {
        self.poll_generator();
        if self.auto_step(Instant::now()) {
            ui.ctx().request_repaint_after(AUTO_MOVE_INTERVAL);
        }

        let palette = self.texture.palette();
        let no_overlays = HashMap::new();

        let output = outer_frame()
            .palette(palette)
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;

                self.header(ui, palette);
                ui.add_space(SECTION_SPACING);

                board_frame()
                    .palette(palette)
                    .show(ui, |ui| {
                        let overlays = self
                            .hint
                            .as_ref()
                            .map_or(&no_overlays, |hint| &hint.overlays);
                        BoardView::new(&self.state, palette, overlays).show(ui)
                    })
                    .inner
            })
            .inner;

        self.handle_board(output.events);
        self.modals(ui, palette);

        if self.timer.is_running() {
            ui.ctx().request_repaint_after(TIMER_REPAINT_INTERVAL);
        }

        output.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{default_solver, find_solver, Logic};

    fn game(text: &str) -> MinesweeperGame {
        MinesweeperGame::from_layout(Minefield::parse(text), default_solver(), Texture::Light)
            .unwrap()
    }

    #[test]
    fn test_face() {
        assert_eq!(face_for(GameStatus::Playing, false, false), Face::Smile);
        assert_eq!(face_for(GameStatus::Playing, false, true), Face::Click);
        assert_eq!(face_for(GameStatus::Won, true, false), Face::Pressed);
        assert_eq!(face_for(GameStatus::Won, false, true), Face::Won);
        assert_eq!(face_for(GameStatus::Lost, false, false), Face::Lost);
    }

    #[test]
    fn test_timer() {
        let start = Instant::now();
        let mut timer = Timer::default();
        assert_eq!(timer.seconds(start), 0);

        timer.start(start);
        timer.start(start + Duration::from_secs(5));
        assert!(timer.is_running());
        assert_eq!(timer.seconds(start + Duration::from_secs(12)), 12);
        assert_eq!(timer.seconds(start + Duration::from_secs(5000)), 999);

        timer.stop(start + Duration::from_secs(20));
        assert!(!timer.is_running());
        assert_eq!(timer.seconds(start + Duration::from_secs(60)), 20);
    }

    #[test]
    fn test_flag_chord_targets() {
        let game = game("m1..\n11..\n00..\n");
        let board = &game.state().board;

        assert_eq!(
            flag_chord_targets(board, Point::new(0, 1)),
            vec![Point::new(0, 0)]
        );
        assert!(flag_chord_targets(board, Point::new(1, 0)).is_empty());
        assert!(flag_chord_targets(board, Point::new(0, 2)).is_empty());
        assert!(flag_chord_targets(board, Point::new(3, 0)).is_empty());
    }

    #[test]
    fn test_flag_chord_click() {
        let mut plain = game("m1..\n11..\n00..\n");
        plain.left_click(Point::new(0, 1));
        assert_eq!(
            plain.state().board.get(Point::new(0, 0)).state,
            CellState::Unknown
        );

        let mut chording = game("m1..\n11..\n00..\n");
        chording.set_flag_chord(true);
        chording.left_click(Point::new(0, 1));
        assert_eq!(
            chording.state().board.get(Point::new(0, 0)).state,
            CellState::Flagged
        );
        assert_eq!(chording.state().remaining_mines, 0);
    }

    #[test]
    fn test_hint() {
        let mut game = game(".m.\n111\n000\n");
        game.hint();

        let hint = game.hint.as_ref().unwrap();
        assert_eq!(hint.description, Logic::Linear.description());
        assert_eq!(hint.overlays[&Point::new(0, 0)], LEFT_OVERLAY);
        assert_eq!(hint.overlays[&Point::new(1, 0)], RIGHT_OVERLAY);
        assert_eq!(hint.overlays[&Point::new(1, 1)], RELATED_OVERLAY);
        assert!(!hint.overlays.contains_key(&Point::new(1, 2)));

        game.right_click(Point::new(1, 0));
        assert!(game.hint.is_none());
    }

    #[test]
    fn test_hint_when_stuck() {
        let mut game = MinesweeperGame::from_layout(
            Minefield::parse(".m.\n111\n000\n"),
            find_solver("Simple").unwrap(),
            Texture::Light,
        )
        .unwrap();
        game.hint();

        let hint = game.hint.as_ref().unwrap();
        assert_eq!(hint.description, NO_MOVE);
        assert!(hint.overlays.is_empty());
    }

    #[test]
    fn test_auto_plays_to_the_end() {
        let mut game = game(".m.\n111\n000\n");
        game.set_auto(true);
        game.left_click(Point::new(1, 2));

        let mut now = Instant::now();
        for _ in 0..10 {
            now += AUTO_MOVE_INTERVAL;
            if !game.auto_step(now) {
                break;
            }
        }

        assert_eq!(game.state().status, GameStatus::Won);
        assert!(!game.auto_step(now + AUTO_MOVE_INTERVAL));
    }

    #[test]
    fn test_auto_waits_between_moves() {
        let mut game = game("m10.\n");
        game.set_auto(true);
        game.left_click(Point::new(1, 0));

        let now = Instant::now();
        assert!(game.auto_step(now));
        let after_first = game.state().clone();
        assert!(game.auto_step(now + Duration::from_millis(1)));
        assert_eq!(game.state(), &after_first);
    }

    #[test]
    fn test_auto_starts_on_next_click() {
        let mut game = game("m10.\n");
        game.set_auto(true);

        let before = game.state().clone();
        assert!(!game.auto_step(Instant::now()));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_auto_starts_after_right_click() {
        let mut game = MinesweeperGame::from_layout(
            Minefield::parse("m1.m\n"),
            find_solver("Simple").unwrap(),
            Texture::Light,
        )
        .unwrap();
        game.set_auto(true);
        game.right_click(Point::new(3, 0));
        game.right_click(Point::new(0, 0));

        let mut now = Instant::now();
        for _ in 0..5 {
            now += AUTO_MOVE_INTERVAL;
            game.auto_step(now);
        }

        assert_eq!(game.state().status, GameStatus::Won);
    }

    #[test]
    fn test_click_on_release() {
        let mut game = game("m1.\n11.\n...\n");
        let corner = Point::new(2, 2);

        game.handle_board(BoardEvents {
            released: Some(corner),
            ..Default::default()
        });
        assert_eq!(game.state().board.get(corner).state, CellState::Unknown);

        game.handle_board(BoardEvents {
            pressed: Some(corner),
            hovered: Some(corner),
            ..Default::default()
        });
        game.handle_board(BoardEvents {
            hovered: Some(corner),
            released: Some(corner),
            ..Default::default()
        });
        assert_eq!(game.state().board.get(corner).state, CellState::Revealed);
    }

    #[test]
    fn test_hover_chord() {
        let hover = BoardEvents {
            hovered: Some(Point::new(1, 0)),
            ..Default::default()
        };

        let mut plain = game("F1.\n11.\n");
        plain.handle_board(hover);
        assert_eq!(plain.state().status, GameStatus::Playing);
        assert_eq!(
            plain.state().board.get(Point::new(2, 0)).state,
            CellState::Unknown
        );

        let mut chording = game("F1.\n11.\n");
        chording.set_hover_chord(true);
        chording.handle_board(hover);
        assert_eq!(chording.state().status, GameStatus::Won);
    }

    #[test]
    fn test_face_clicks_only_over_sinking_cells() {
        let mut game = game("F1.\n11.\n000\n");
        assert!(!game.cell_down());

        game.last_pressed = Some(Point::new(0, 0));
        assert!(!game.cell_down());
        game.last_pressed = Some(Point::new(0, 2));
        assert!(!game.cell_down());
        game.last_pressed = Some(Point::new(1, 0));
        assert!(game.cell_down());
    }

    #[test]
    fn test_cancel_generation() {
        let size = BoardSize::new(9, 9, 10).unwrap();
        let mut game = MinesweeperGame::new(size, default_solver(), Texture::Light);
        game.left_click(Point::new(4, 4));
        assert!(game.generator.is_some());

        game.cancel_generation();
        assert!(game.generator.is_none());
        assert!(!game.game.is_generated());
        assert_eq!(game.size(), size);
        assert!(game
            .state()
            .board
            .points()
            .all(|p| game.state().board.get(p).state == CellState::Unknown));
    }

    #[test]
    fn test_clicks_ignored_after_game_end() {
        let mut game = game("m1.\n11.\n...\n");
        game.left_click(Point::new(0, 0));
        assert_eq!(game.state().status, GameStatus::Lost);

        game.right_click(Point::new(2, 2));
        assert_eq!(
            game.state().board.get(Point::new(2, 2)).state,
            CellState::Unknown
        );
    }

    #[test]
    fn test_restart_keeps_size() {
        let mut game = game("m1.\n11.\n...\n");
        game.left_click(Point::new(0, 0));
        game.restart();

        assert_eq!(game.state().status, GameStatus::Playing);
        assert_eq!(game.size(), BoardSize::new(3, 3, 1).unwrap());
        assert!(game
            .state()
            .board
            .points()
            .all(|p| game.state().board.get(p).state == CellState::Unknown));
    }

    #[test]
    fn test_preferred_size() {
        let size = BoardSize::new(9, 9, 10).unwrap();
        assert_eq!(MinesweeperGame::preferred_size_for(size), vec2(294.0, 343.0));
        assert!(
            MinesweeperGame::minimum_size_for(size).x < MinesweeperGame::preferred_size_for(size).x
        );
    }
}
