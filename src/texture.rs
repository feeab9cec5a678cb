use egui::Color32;
use serde::{Deserialize, Serialize};

/// Colours a texture paints the game with.
pub struct Palette {
    pub background: Color32,
    pub highlight: Color32,
    pub shadow: Color32,
    pub cell: Color32,
    pub cell_down: Color32,
    pub blast: Color32,
    pub cross: Color32,
    pub numbers: [Color32; 8],
    pub counter_background: Color32,
    pub counter_on: Color32,
    pub counter_off: Color32,
    pub text: Color32,
}

const LIGHT: Palette = Palette {
    background: Color32::from_rgb(192, 192, 192),
    highlight: Color32::WHITE,
    shadow: Color32::from_rgb(128, 128, 128),
    cell: Color32::from_rgb(192, 192, 192),
    cell_down: Color32::from_rgb(189, 189, 189),
    blast: Color32::from_rgb(255, 0, 0),
    cross: Color32::from_rgb(220, 0, 0),
    numbers: [
        Color32::from_rgb(0, 0, 255),
        Color32::from_rgb(0, 128, 0),
        Color32::from_rgb(255, 0, 0),
        Color32::from_rgb(0, 0, 128),
        Color32::from_rgb(128, 0, 0),
        Color32::from_rgb(0, 128, 128),
        Color32::BLACK,
        Color32::from_rgb(128, 128, 128),
    ],
    counter_background: Color32::BLACK,
    counter_on: Color32::from_rgb(255, 0, 0),
    counter_off: Color32::from_rgb(70, 0, 0),
    text: Color32::BLACK,
};

const DARK: Palette = Palette {
    background: Color32::from_rgb(58, 60, 64),
    highlight: Color32::from_rgb(98, 101, 107),
    shadow: Color32::from_rgb(26, 27, 29),
    cell: Color32::from_rgb(66, 68, 73),
    cell_down: Color32::from_rgb(46, 48, 51),
    blast: Color32::from_rgb(170, 30, 30),
    cross: Color32::from_rgb(255, 90, 90),
    numbers: [
        Color32::from_rgb(110, 160, 255),
        Color32::from_rgb(110, 200, 110),
        Color32::from_rgb(255, 115, 115),
        Color32::from_rgb(175, 145, 255),
        Color32::from_rgb(255, 170, 95),
        Color32::from_rgb(95, 210, 210),
        Color32::from_rgb(225, 225, 225),
        Color32::from_rgb(150, 150, 150),
    ],
    counter_background: Color32::from_rgb(12, 12, 12),
    counter_on: Color32::from_rgb(255, 80, 80),
    counter_off: Color32::from_rgb(52, 18, 18),
    text: Color32::from_rgb(225, 225, 225),
};

/// The skin the board is drawn with, independent of the look and feel of the menus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Texture {
    #[default]
    Light,
    Dark,
}

impl Texture {
    pub const ALL: [Texture; 2] = [Texture::Light, Texture::Dark];

    pub const fn readable_name(self) -> &'static str {
        match self {
            Texture::Light => "Light",
            Texture::Dark => "Dark",
        }
    }

    pub const fn palette(self) -> &'static Palette {
        match self {
            Texture::Light => &LIGHT,
            Texture::Dark => &DARK,
        }
    }
}

impl Palette {
    /// Colour of a revealed number, `1..=8`.
    pub fn number(&self, n: u8) -> Color32 {
        self.numbers[(n.clamp(1, 8) - 1) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_colors() {
        let palette = Texture::Light.palette();
        assert_eq!(palette.number(1), Color32::from_rgb(0, 0, 255));
        assert_eq!(palette.number(8), Color32::from_rgb(128, 128, 128));
    }

    #[test]
    fn test_texture_json_names() {
        assert_eq!(serde_json::to_string(&Texture::Dark).unwrap(), r#""Dark""#);
        assert_eq!(
            serde_json::from_str::<Texture>(r#""Light""#).unwrap(),
            Texture::Light
        );
    }
}
