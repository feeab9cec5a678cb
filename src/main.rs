use log::warn;
use minsweeper_client::{
    app::{self, MinsweeperApp},
    icon::app_icon,
    settings::{Settings, APP_DIR_NAME},
};

fn main() -> Result<(), eframe::Error> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let settings_path = match Settings::default_path() {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("Settings will not be saved: {err}");
            None
        }
    };
    let settings = settings_path
        .as_ref()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Minsweeper")
            .with_app_id(APP_DIR_NAME)
            .with_inner_size(app::initial_window_size(&settings))
            .with_min_inner_size(app::min_window_size_for(settings.size))
            .with_icon(app_icon()),
        follow_system_theme: true,
        ..Default::default()
    };

    let app = MinsweeperApp::new(settings, settings_path);

    eframe::run_native(
        "Minsweeper",
        options,
        Box::new(move |cc| {
            // This gives us image support:
            egui_extras::install_image_loaders(&cc.egui_ctx);

            Box::new(app)
        }),
    )
}
