use std::path::PathBuf;

use egui::{Button, DragValue, Frame, Key, Ui, Vec2, ViewportCommand};
use log::{debug, error, info};

use crate::{
    game::{BoardSize, ConventionalSize, Result},
    keybind::Keybind,
    minesweeper::MinesweeperGame,
    settings::Settings,
    solver::solvers,
    texture::Texture,
    theme::Theme,
};

const MENU_BAR_HEIGHT: f32 = 24.0;
const CUSTOM_DEFAULT: usize = 10;
const CUSTOM_MAX_SIDE: usize = 200;

const CUSTOM: Keybind = Keybind::command(Key::C);
const AUTO: Keybind = Keybind::command(Key::A);
const FLAG_CHORD: Keybind = Keybind::command(Key::F);
const HOVER_CHORD: Keybind = Keybind::command(Key::G);
const HINT: Keybind = Keybind::command(Key::H);

const fn size_keybind(size: ConventionalSize) -> Keybind {
    match size {
        ConventionalSize::Beginner => Keybind::command(Key::B),
        ConventionalSize::Intermediate => Keybind::command(Key::I),
        ConventionalSize::Expert => Keybind::command(Key::E),
    }
}

/// Inner window size that fits a game of `size` at its preferred cell size.
pub fn window_size_for(size: BoardSize) -> Vec2 {
    MinesweeperGame::preferred_size_for(size) + Vec2::new(0.0, MENU_BAR_HEIGHT)
}

pub fn min_window_size_for(size: BoardSize) -> Vec2 {
    MinesweeperGame::minimum_size_for(size) + Vec2::new(0.0, MENU_BAR_HEIGHT)
}

/// The saved window size if there is one, never smaller than the game allows.
pub fn initial_window_size(settings: &Settings) -> Vec2 {
    settings
        .window_size
        .map(Vec2::from)
        .unwrap_or_else(|| window_size_for(settings.size))
        .max(min_window_size_for(settings.size))
}

/// A window that was not enlarged past either preferred size snaps to the new one.
fn should_resize(current: Option<Vec2>, old_preferred: Vec2, new_preferred: Vec2) -> bool {
    let Some(current) = current else {
        return true;
    };
    let fits = |preferred: Vec2| current.x <= preferred.x && current.y <= preferred.y;

    fits(old_preferred) || fits(new_preferred)
}

struct CustomSizeDialog {
    open: bool,
    width: usize,
    height: usize,
    mines: usize,
    error: Option<String>,
}

impl Default for CustomSizeDialog {
    fn default() -> Self {
        Self {
            open: false,
            width: CUSTOM_DEFAULT,
            height: CUSTOM_DEFAULT,
            mines: CUSTOM_DEFAULT,
            error: None,
        }
    }
}

impl CustomSizeDialog {
    fn size(&self) -> Result<BoardSize> {
        BoardSize::new(self.width, self.height, self.mines)
    }
}

pub struct MinsweeperApp {
    settings: Settings,
    settings_path: Option<PathBuf>,
    game: MinesweeperGame,
    custom: CustomSizeDialog,
    applied_theme: Option<eframe::Theme>,
}

impl MinsweeperApp {
    /// `settings_path` is where every change gets written, or nowhere if `None`.
    pub fn new(mut settings: Settings, settings_path: Option<PathBuf>) -> Self {
        let solver = settings.solver();
        settings.solver = solver.name().to_owned();

        let mut game = MinesweeperGame::new(settings.size, solver, settings.texture);
        game.set_auto(settings.auto);
        game.set_flag_chord(settings.flag_chord);
        game.set_hover_chord(settings.hover_chord);

        MinsweeperApp {
            settings,
            settings_path,
            game,
            custom: CustomSizeDialog::default(),
            applied_theme: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn save(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };

        match self.settings.save_to(path) {
            Ok(()) => debug!("Saved settings to {}", path.display()),
            Err(err) => error!("Failed to save settings to {}: {err}", path.display()),
        }
    }

    fn change_game(&mut self, ctx: &egui::Context, size: BoardSize) {
        let old_preferred = window_size_for(self.settings.size);
        let new_preferred = window_size_for(size);
        let current = ctx.input(|i| i.viewport().inner_rect).map(|rect| rect.size());

        info!("Starting a {size} game");
        self.set_size(size);

        ctx.send_viewport_cmd(ViewportCommand::MinInnerSize(min_window_size_for(size)));
        if should_resize(current, old_preferred, new_preferred) {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(new_preferred));
        }
    }

    fn set_size(&mut self, size: BoardSize) {
        self.settings.size = size;
        self.game.start(size);
        self.save();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.applied_theme = None;
        self.save();
    }

    fn set_texture(&mut self, texture: Texture) {
        self.settings.texture = texture;
        self.game.set_texture(texture);
        self.save();
    }

    fn set_solver(&mut self, name: &str) {
        self.settings.solver = name.to_owned();
        self.game.set_solver(self.settings.solver());
        self.game.restart();
        self.save();
    }

    fn toggle_auto(&mut self) {
        self.settings.auto = !self.settings.auto;
        self.game.set_auto(self.settings.auto);
        self.save();
    }

    fn toggle_flag_chord(&mut self) {
        self.settings.flag_chord = !self.settings.flag_chord;
        self.game.set_flag_chord(self.settings.flag_chord);
        self.save();
    }

    fn toggle_hover_chord(&mut self) {
        self.settings.hover_chord = !self.settings.hover_chord;
        self.game.set_hover_chord(self.settings.hover_chord);
        self.save();
    }

    fn apply_theme(&mut self, ctx: &egui::Context, system: Option<eframe::Theme>) {
        let resolved = self.settings.theme.resolve(system);
        let dark = resolved == eframe::Theme::Dark;
        if self.applied_theme != Some(resolved) || ctx.style().visuals.dark_mode != dark {
            ctx.set_visuals(self.settings.theme.visuals(system));
            self.applied_theme = Some(resolved);
        }
    }

    fn track_window_size(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_size = Some(rect.size().into());
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        for size in ConventionalSize::ALL {
            if size_keybind(size).consume(ctx) {
                self.change_game(ctx, size.size());
            }
        }
        if CUSTOM.consume(ctx) {
            self.custom.open = true;
        }
        if AUTO.consume(ctx) {
            self.toggle_auto();
        }
        if FLAG_CHORD.consume(ctx) {
            self.toggle_flag_chord();
        }
        if HOVER_CHORD.consume(ctx) {
            self.toggle_hover_chord();
        }
        if HINT.consume(ctx) {
            self.game.hint();
        }
    }

    fn menu_bar(&mut self, ui: &mut Ui) {
        ui.menu_button("Size", |ui| {
            for size in ConventionalSize::ALL {
                let button = Button::new(size.name())
                    .selected(self.settings.size == size.size())
                    .shortcut_text(size_keybind(size).to_string());
                if ui.add(button).clicked() {
                    self.change_game(ui.ctx(), size.size());
                    ui.close_menu();
                }
            }

            ui.separator();

            if ui
                .add(Button::new("Custom…").shortcut_text(CUSTOM.to_string()))
                .clicked()
            {
                self.custom.open = true;
                ui.close_menu();
            }
        });

        ui.menu_button("Theme", |ui| {
            ui.label("Look and Feel");
            for theme in Theme::ALL {
                if ui
                    .radio(self.settings.theme == theme, theme.name())
                    .clicked()
                {
                    self.set_theme(theme);
                }
            }

            ui.separator();

            ui.label("Texture");
            for texture in Texture::ALL {
                if ui
                    .radio(self.settings.texture == texture, texture.readable_name())
                    .clicked()
                {
                    self.set_texture(texture);
                }
            }
        });

        ui.menu_button("Solver", |ui| {
            for solver in solvers() {
                if ui
                    .radio(self.settings.solver == solver.name(), solver.name())
                    .clicked()
                {
                    self.set_solver(solver.name());
                }
            }
        });

        ui.menu_button("Cheats", |ui| {
            let toggles: [(&str, bool, Keybind, fn(&mut Self)); 3] = [
                ("Auto Mode", self.settings.auto, AUTO, Self::toggle_auto),
                (
                    "Flag Chord",
                    self.settings.flag_chord,
                    FLAG_CHORD,
                    Self::toggle_flag_chord,
                ),
                (
                    "Hover Chord",
                    self.settings.hover_chord,
                    HOVER_CHORD,
                    Self::toggle_hover_chord,
                ),
            ];

            for (label, on, keybind, toggle) in toggles {
                let button = Button::new(label)
                    .selected(on)
                    .shortcut_text(keybind.to_string());
                if ui.add(button).clicked() {
                    toggle(self);
                }
            }

            ui.separator();

            if ui
                .add(Button::new("Hint").shortcut_text(HINT.to_string()))
                .clicked()
            {
                self.game.hint();
                ui.close_menu();
            }
        });
    }

    fn custom_size_window(&mut self, ctx: &egui::Context) {
        if !self.custom.open {
            return;
        }

        let mut open = true;
        let mut accepted = None;
        let dialog = &mut self.custom;

        egui::Window::new("Custom Size")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("custom_size").num_columns(2).show(ui, |ui| {
                    ui.label("Width");
                    ui.add(DragValue::new(&mut dialog.width).clamp_range(1..=CUSTOM_MAX_SIDE));
                    ui.end_row();

                    ui.label("Height");
                    ui.add(DragValue::new(&mut dialog.height).clamp_range(1..=CUSTOM_MAX_SIDE));
                    ui.end_row();

                    ui.label("Mines");
                    ui.add(
                        DragValue::new(&mut dialog.mines)
                            .clamp_range(0..=CUSTOM_MAX_SIDE * CUSTOM_MAX_SIDE),
                    );
                    ui.end_row();
                });

                if let Some(error) = &dialog.error {
                    ui.colored_label(ui.visuals().error_fg_color, error.as_str());
                }

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        match dialog.size() {
                            Ok(size) => accepted = Some(size),
                            Err(err) => dialog.error = Some(format!("Invalid Size: {err}")),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        dialog.open = false;
                    }
                });
            });

        self.custom.open &= open && accepted.is_none();
        if !self.custom.open {
            self.custom.error = None;
        }

        if let Some(size) = accepted {
            self.change_game(ctx, size);
        }
    }
}

impl eframe::App for MinsweeperApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.apply_theme(ctx, frame.info().system_theme);
        self.track_window_size(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| self.menu_bar(ui));
        });

        egui::CentralPanel::default()
            .frame(Frame::none())
            .show(ctx, |ui| {
                ui.add(&mut self.game);
            });

        self.custom_size_window(ctx);
    }
}

impl Drop for MinsweeperApp {
    fn drop(&mut self) {
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;
    use tempfile::tempdir;

    #[test]
    fn test_should_resize() {
        let small = vec2(100.0, 100.0);
        let large = vec2(300.0, 200.0);

        assert!(should_resize(None, small, large));
        assert!(should_resize(Some(small), small, large));
        assert!(should_resize(Some(vec2(250.0, 150.0)), large, small));
        assert!(!should_resize(Some(vec2(400.0, 150.0)), small, large));

        let wide = vec2(300.0, 100.0);
        let tall = vec2(100.0, 300.0);
        assert!(!should_resize(Some(vec2(250.0, 250.0)), wide, tall));
        assert!(should_resize(Some(vec2(250.0, 100.0)), wide, tall));
    }

    #[test]
    fn test_theme_is_reapplied() {
        let ctx = egui::Context::default();
        let mut app = MinsweeperApp::new(Settings::default(), None);

        app.set_theme(Theme::Dark);
        app.apply_theme(&ctx, None);
        assert!(ctx.style().visuals.dark_mode);

        ctx.set_visuals(egui::Visuals::light());
        app.apply_theme(&ctx, None);
        assert!(ctx.style().visuals.dark_mode);

        app.set_theme(Theme::System);
        app.apply_theme(&ctx, Some(eframe::Theme::Light));
        assert!(!ctx.style().visuals.dark_mode);
        app.apply_theme(&ctx, Some(eframe::Theme::Dark));
        assert!(ctx.style().visuals.dark_mode);
    }

    #[test]
    fn test_solver_change_restarts() {
        let mut app = MinsweeperApp::new(Settings::default(), None);
        app.game = MinesweeperGame::from_layout(
            crate::minefield::Minefield::parse("m1.\n11.\n...\n"),
            app.settings.solver(),
            Texture::Light,
        )
        .unwrap();
        app.game.left_click(crate::game::Point::new(2, 2));

        app.set_solver("Simple");
        assert_eq!(app.settings().solver, "Simple");
        let board = &app.game.state().board;
        assert!(board
            .points()
            .all(|p| board.get(p).state == crate::game::CellState::Unknown));
    }

    #[test]
    fn test_initial_window_size() {
        let mut settings = Settings::default();
        assert_eq!(initial_window_size(&settings), window_size_for(settings.size));

        settings.window_size = Some([1.0, 1.0]);
        assert_eq!(initial_window_size(&settings), min_window_size_for(settings.size));

        settings.window_size = Some([1000.0, 900.0]);
        assert_eq!(initial_window_size(&settings), vec2(1000.0, 900.0));
    }

    #[test]
    fn test_custom_size_validation() {
        let mut dialog = CustomSizeDialog::default();
        assert_eq!(dialog.size(), BoardSize::new(10, 10, 10));

        dialog.mines = 100;
        assert!(dialog.size().is_err());
    }

    #[test]
    fn test_unknown_solver_is_replaced() {
        let settings = Settings {
            solver: "Oracle".to_owned(),
            ..Settings::default()
        };
        let app = MinsweeperApp::new(settings, None);
        assert_eq!(app.settings().solver, "Linear");
    }

    #[test]
    fn test_changes_are_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut app = MinsweeperApp::new(Settings::default(), Some(path.clone()));
        app.toggle_flag_chord();
        app.set_texture(Texture::Dark);

        let saved = Settings::load_from(&path).unwrap();
        assert!(saved.flag_chord);
        assert_eq!(saved.texture, Texture::Dark);

        app.settings.window_size = Some([500.0, 400.0]);
        drop(app);

        let saved = Settings::load_from(&path).unwrap();
        assert_eq!(saved.window_size, Some([500.0, 400.0]));
    }
}
