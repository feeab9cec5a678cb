use egui::{Context, Key, KeyboardShortcut, Modifiers};
use std::fmt;

/// The modifier menu accelerators use: Cmd on macOS, Ctrl on Windows, Alt elsewhere.
pub const fn platform_modifier() -> Modifiers {
    if cfg!(target_os = "macos") {
        Modifiers::MAC_CMD
    } else if cfg!(target_os = "windows") {
        Modifiers::CTRL
    } else {
        Modifiers::ALT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keybind {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Keybind {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Keybind { key, modifiers }
    }

    pub const fn command(key: Key) -> Self {
        Keybind::new(key, platform_modifier())
    }

    pub fn shortcut(&self) -> KeyboardShortcut {
        KeyboardShortcut::new(self.modifiers, self.key)
    }

    /// Removes the key press from this frame's input if it happened.
    pub fn consume(&self, ctx: &Context) -> bool {
        ctx.input_mut(|i| i.consume_shortcut(&self.shortcut()))
    }
}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        let names = [
            (m.ctrl || (m.command && !m.mac_cmd), "Ctrl"),
            (m.mac_cmd, "Cmd"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
        ];

        for (_, name) in names.iter().filter(|(held, _)| *held) {
            write!(f, "{name}+")?;
        }

        f.write_str(self.key.name())
    }
}
