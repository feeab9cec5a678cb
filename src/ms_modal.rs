use egui::{Align2, Frame, Id, Margin, Response, Rounding, Sense, Ui, Window};

use crate::{ms_frame::MinesweeperFrame, texture::Palette};

const OVERLAY_COLOR: egui::Color32 = egui::Color32::from_black_alpha(100);

/// A centred window over a dimmed backdrop. Clicking the backdrop closes it.
pub struct MinesweeperModal {
    pub open: bool,
    id: Id,
    palette: &'static Palette,
}

impl MinesweeperModal {
    pub fn new(id: impl Into<Id>, open: bool, palette: &'static Palette) -> Self {
        Self {
            open,
            id: id.into(),
            palette,
        }
    }

    /// Returns the backdrop's response while the modal is open.
    pub fn show<R>(
        &mut self,
        ui: &mut Ui,
        add_contents: impl FnOnce(&mut Ui) -> R,
    ) -> Option<Response> {
        if !self.open {
            return None;
        }

        let screen_rect = ui.ctx().input(|i| i.screen_rect);
        let area_resp = ui.allocate_rect(screen_rect, Sense::click());

        if area_resp.clicked() {
            self.open = false;
        }

        ui.painter()
            .rect_filled(screen_rect, Rounding::ZERO, OVERLAY_COLOR);

        let palette = self.palette;

        let window = Window::new("")
            .id(self.id)
            .frame(Frame::default())
            .open(&mut self.open)
            .title_bar(false)
            .vscroll(true)
            .anchor(Align2::CENTER_CENTER, [0., 0.])
            .resizable(false);

        window.show(ui.ctx(), |ui| {
            ui.visuals_mut().override_text_color = Some(palette.text);
            MinesweeperFrame::new(3)
                .palette(palette)
                .margin(Margin::same(10.0))
                .floating()
                .show(ui, add_contents)
        });

        Some(area_resp)
    }
}
