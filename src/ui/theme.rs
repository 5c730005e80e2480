use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_secondary: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}

impl Theme {
    /// Palette in field order, primary through highlight_fg.
    ///
    fn palette(name: &str, colors: [(u8, u8, u8); 17]) -> Self {
        let c = |i: usize| ColorSpec::rgb(colors[i].0, colors[i].1, colors[i].2);
        Theme {
            name: name.to_string(),
            primary: c(0),
            secondary: c(1),
            accent: c(2),
            banner: c(3),
            text: c(4),
            text_secondary: c(5),
            text_muted: c(6),
            background: c(7),
            surface: c(8),
            success: c(9),
            warning: c(10),
            error: c(11),
            info: c(12),
            border_active: c(13),
            border_normal: c(14),
            highlight_bg: c(15),
            highlight_fg: c(16),
        }
    }

    /// Tokyo Night theme.
    ///
    pub fn tokyo_night() -> Self {
        Self::palette(
            "tokyo-night",
            [
                (125, 207, 255),
                (158, 206, 106),
                (255, 159, 196),
                (255, 159, 196),
                (169, 177, 214),
                (192, 202, 245),
                (117, 121, 148),
                (26, 27, 38),
                (36, 40, 59),
                (158, 206, 106),
                (255, 202, 40),
                (247, 118, 142),
                (125, 207, 255),
                (125, 207, 255),
                (117, 121, 148),
                (125, 207, 255),
                (26, 27, 38),
            ],
        )
    }

    /// Dracula theme.
    ///
    pub fn dracula() -> Self {
        Self::palette(
            "dracula",
            [
                (189, 147, 249),
                (139, 233, 253),
                (255, 121, 198),
                (255, 121, 198),
                (248, 248, 242),
                (189, 147, 249),
                (98, 114, 164),
                (40, 42, 54),
                (68, 71, 90),
                (80, 250, 123),
                (255, 184, 108),
                (255, 85, 85),
                (139, 233, 253),
                (189, 147, 249),
                (98, 114, 164),
                (139, 233, 253),
                (40, 42, 54),
            ],
        )
    }

    /// Rose Pine Dawn theme.
    ///
    pub fn rose_pine_dawn() -> Self {
        Self::palette(
            "rose-pine-dawn",
            [
                (161, 119, 255),
                (59, 247, 209),
                (255, 109, 146),
                (255, 109, 146),
                (88, 82, 96),
                (121, 117, 147),
                (152, 147, 165),
                (250, 244, 237),
                (255, 250, 243),
                (59, 247, 209),
                (255, 210, 0),
                (235, 111, 146),
                (61, 174, 233),
                (161, 119, 255),
                (88, 82, 96),
                (61, 174, 233),
                (0, 0, 0),
            ],
        )
    }

    /// Get a theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "dracula" => Some(Self::dracula()),
            "rose-pine-dawn" => Some(Self::rose_pine_dawn()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec![
            "tokyo-night".to_string(),
            "dracula".to_string(),
            "rose-pine-dawn".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        for name in Theme::available_themes() {
            assert_eq!(Theme::from_name(&name).unwrap().name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn test_palette_order() {
        let theme = Theme::dracula();
        assert_eq!(theme.primary, ColorSpec::rgb(189, 147, 249));
        assert_eq!(theme.highlight_fg.to_color(), Color::Rgb(40, 42, 54));
    }
}
