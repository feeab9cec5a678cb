pub mod app;
pub mod board_ui;
pub mod counter;
pub mod game;
pub mod generating;
pub mod icon;
pub mod keybind;
pub mod minefield;
pub mod minesweeper;
pub mod ms_button;
pub mod ms_frame;
pub mod ms_modal;
pub mod settings;
pub mod solver;
pub mod texture;
pub mod theme;
mod utils;
