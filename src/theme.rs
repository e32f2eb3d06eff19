use gpui::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_appearance(appearance: WindowAppearance) -> Self {
        match appearance {
            WindowAppearance::Dark | WindowAppearance::VibrantDark => ThemeMode::Dark,
            WindowAppearance::Light | WindowAppearance::VibrantLight => ThemeMode::Light,
        }
    }
}

/// Colors for the widget card. Backgrounds carry alpha so the desktop shows
/// through the transparent window.
pub struct Theme {
    pub background: Rgba,
    pub foreground: Rgba,
    pub close_background: Rgba,
    pub close_hover: Rgba,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: rgba(0xf3f4f6e6),
            foreground: rgb(0x111827),
            close_background: rgba(0x0000001a),
            close_hover: rgba(0xff0000b3),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: rgba(0x282828e6),
            foreground: rgb(0xffffff),
            close_background: rgba(0xffffff1a),
            close_hover: rgba(0xff0000b3),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}
