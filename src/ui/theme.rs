use ratatui::style::Color;

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

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

/// Color specification in RGB.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
    ColorSpec { r, g, b }
}

impl ColorSpec {
    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for Theme {
    /// Tokyo Night.
    ///
    fn default() -> Self {
        Self::tokyo_night()
    }
}

impl Theme {
    /// Tokyo Night theme.
    ///
    pub fn tokyo_night() -> Self {
        Theme {
            name: "tokyo-night".to_string(),
            primary: rgb(125, 207, 255),       // Blue
            accent: rgb(255, 159, 196),        // Magenta
            banner: rgb(255, 159, 196),        // Magenta
            text: rgb(169, 177, 214),          // Foreground
            text_muted: rgb(117, 121, 148),    // Comment
            success: rgb(158, 206, 106),       // Green
            warning: rgb(255, 202, 40),        // Yellow
            error: rgb(247, 118, 142),         // Red
            info: rgb(125, 207, 255),          // Blue
            border_active: rgb(125, 207, 255), // Blue
            border_normal: rgb(117, 121, 148), // Comment
            highlight_bg: rgb(125, 207, 255),  // Blue
            highlight_fg: rgb(26, 27, 38),     // Background
        }
    }

    /// Dracula theme.
    ///
    pub fn dracula() -> Self {
        Theme {
            name: "dracula".to_string(),
            primary: rgb(189, 147, 249),       // Purple
            accent: rgb(255, 121, 198),        // Pink
            banner: rgb(255, 121, 198),        // Pink
            text: rgb(248, 248, 242),          // Foreground
            text_muted: rgb(98, 114, 164),     // Comment
            success: rgb(80, 250, 123),        // Green
            warning: rgb(255, 184, 108),       // Orange
            error: rgb(255, 85, 85),           // Red
            info: rgb(139, 233, 253),          // Cyan
            border_active: rgb(189, 147, 249), // Purple
            border_normal: rgb(98, 114, 164),  // Comment
            highlight_bg: rgb(139, 233, 253),  // Cyan
            highlight_fg: rgb(40, 42, 54),     // Background
        }
    }

    /// Catppuccin Latte theme, for light terminals.
    ///
    pub fn catppuccin_latte() -> Self {
        Theme {
            name: "catppuccin-latte".to_string(),
            primary: rgb(136, 57, 239),       // Mauve
            accent: rgb(234, 118, 203),       // Pink
            banner: rgb(234, 118, 203),       // Pink
            text: rgb(76, 79, 105),           // Text
            text_muted: rgb(108, 111, 133),   // Subtext0
            success: rgb(40, 205, 130),       // Green
            warning: rgb(223, 142, 29),       // Yellow
            error: rgb(210, 15, 57),          // Red
            info: rgb(32, 159, 181),          // Blue
            border_active: rgb(136, 57, 239), // Mauve
            border_normal: rgb(108, 111, 133), // Subtext0
            highlight_bg: rgb(32, 159, 181),  // Blue
            highlight_fg: rgb(239, 241, 245), // Base
        }
    }

    /// Look up a theme by its configured name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "dracula" => Some(Self::dracula()),
            "catppuccin-latte" => Some(Self::catppuccin_latte()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<&'static str> {
        vec!["tokyo-night", "dracula", "catppuccin-latte"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in Theme::available_themes() {
            assert_eq!(Theme::from_name(name).unwrap().name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }
}
