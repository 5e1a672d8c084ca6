//! Immutable configuration snapshot handed to the preview loop.

use ray_arena_core::GridMap;
use ray_arena_rendering::Color;
use ray_arena_system_combat::DEFAULT_COOLDOWN;
use ray_arena_system_movement::PlayerTuning;
use thiserror::Error;

/// Window title used when the map does not name the game.
pub const DEFAULT_GAME_NAME: &str = "Preview";

/// Menu title used when the author leaves it blank.
pub const DEFAULT_MENU_TITLE: &str = "My Game";

/// Win banner used when the author leaves it blank.
pub const DEFAULT_WIN_TEXT: &str = "YOU WIN!";

/// Labels used for menu buttons left empty by the author.
pub const DEFAULT_BUTTON_LABELS: [&str; 3] = ["Start Game", "Options", "Exit"];

/// Horizontal placement of the menu title and buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuAlignment {
    /// Anchored 50 px from the left edge.
    Left,
    /// Centered horizontally.
    #[default]
    Middle,
    /// Anchored 50 px from the right edge.
    Right,
}

impl MenuAlignment {
    /// Parses the map file spelling. Unknown values yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "middle" | "center" | "centre" => Some(Self::Middle),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// What is drawn behind the menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuBackground {
    /// Solid color fill.
    Color(Color),
    /// The menu background image over an off-white fill.
    Image,
}

/// Main menu appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuConfig {
    /// Title drawn above the buttons.
    pub title: String,
    /// Labels of the start, options and exit buttons.
    pub buttons: [String; 3],
    /// Horizontal placement.
    pub alignment: MenuAlignment,
    /// Background fill.
    pub background: MenuBackground,
    /// Title text color.
    pub title_color: Color,
    /// Label colors of the three buttons.
    pub button_colors: [Color; 3],
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_MENU_TITLE.to_owned(),
            buttons: DEFAULT_BUTTON_LABELS.map(str::to_owned),
            alignment: MenuAlignment::Middle,
            background: MenuBackground::Color(Color::WHITE),
            title_color: Color::from_rgb_u8(0, 0, 255),
            button_colors: [Color::BLACK; 3],
        }
    }
}

impl MenuConfig {
    /// Title to draw, falling back to the default when blank.
    #[must_use]
    pub fn title(&self) -> &str {
        non_blank_or(&self.title, DEFAULT_MENU_TITLE)
    }

    /// Label of button `index`, falling back to the default when empty.
    #[must_use]
    pub fn label(&self, index: usize) -> &str {
        match self.buttons.get(index) {
            Some(label) if !label.trim().is_empty() => label.as_str(),
            _ => DEFAULT_BUTTON_LABELS.get(index).copied().unwrap_or_default(),
        }
    }
}

/// Banner shown once every enemy is gone.
#[derive(Clone, Debug, PartialEq)]
pub struct WinMessage {
    /// Banner text.
    pub text: String,
    /// Banner color.
    pub color: Color,
}

impl WinMessage {
    /// Banner text to draw, falling back to the default when blank.
    #[must_use]
    pub fn text(&self) -> &str {
        non_blank_or(&self.text, DEFAULT_WIN_TEXT)
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

impl Default for WinMessage {
    fn default() -> Self {
        Self {
            text: DEFAULT_WIN_TEXT.to_owned(),
            color: Color::from_rgb_u8(0, 255, 0),
        }
    }
}

/// Everything a preview session needs, built once before the loop starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Name shown in the window title.
    pub game_name: String,
    /// Authored level.
    pub grid: GridMap,
    /// Clear color of the world pass.
    pub sky_color: Color,
    /// Color of the sun sphere.
    pub sun_color: Color,
    /// Seconds between accepted shots.
    pub cooldown: f64,
    /// Player physics and input tuning.
    pub tuning: PlayerTuning,
    /// Banner shown when the arena is cleared.
    pub win_message: WinMessage,
    /// Main menu appearance.
    pub menu: MenuConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_name: DEFAULT_GAME_NAME.to_owned(),
            grid: GridMap::default(),
            sky_color: Color::from_rgb_u8(0x87, 0xce, 0xeb),
            sun_color: Color::from_rgb_u8(0xff, 0xff, 0x00),
            cooldown: DEFAULT_COOLDOWN,
            tuning: PlayerTuning::default(),
            win_message: WinMessage::default(),
            menu: MenuConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Title for the preview window.
    #[must_use]
    pub fn window_title(&self) -> &str {
        let name = self.game_name.trim();
        if name.is_empty() {
            DEFAULT_GAME_NAME
        } else {
            name
        }
    }

    /// Checks numeric settings, returning the configuration unchanged when valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !self.cooldown.is_finite() || self.cooldown < 0.0 {
            return Err(ConfigError::InvalidCooldown(self.cooldown));
        }

        let tuning = &self.tuning;
        let positive = [
            ("radius", tuning.radius),
            ("height", tuning.height),
            ("base_speed", tuning.base_speed),
            ("run_multiplier", tuning.run_multiplier),
            ("gravity", tuning.gravity),
            ("mouse_sensitivity", tuning.mouse_sensitivity),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }
        if !tuning.jump_impulse.is_finite() || tuning.jump_impulse < 0.0 {
            return Err(ConfigError::InvalidTuning {
                field: "jump_impulse",
                value: tuning.jump_impulse,
            });
        }

        Ok(self)
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Shot cooldown was negative or not finite.
    #[error("shot cooldown must be a non-negative number of seconds (got {0})")]
    InvalidCooldown(f64),
    /// A tuning value was out of range.
    #[error("player tuning `{field}` is out of range (got {value})")]
    InvalidTuning {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}
