//! Editor map, menu and tuning files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ray_arena_core::GridMap;
use ray_arena_rendering::{AssetRequests, AssetSlot, Color};
use ray_arena_session::{
    MenuAlignment, MenuBackground, MenuConfig, SessionConfig, WinMessage, DEFAULT_BUTTON_LABELS,
};
use ray_arena_system_movement::PlayerTuning;
use serde::Deserialize;

/// Map file written by the level editor. Only `grid` and `sky_color` are
/// required.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct MapDocument {
    grid: Vec<Vec<u8>>,
    sky_color: String,
    sun_color: Option<String>,
    wall_texture: Option<String>,
    ground_texture: Option<String>,
    handgun_idle_texture: Option<String>,
    handgun_shoot_texture: Option<String>,
    handgun_shoot_sound: Option<String>,
    enemy_idle_texture: Option<String>,
    enemy_shot_texture: Option<String>,
    enemy_model: Option<String>,
    game_name: Option<String>,
    shot_delay: Option<f64>,
    win_message_text: Option<String>,
    win_message_color: Option<String>,
    main_menu_title: Option<String>,
    main_menu_buttons: Option<Vec<String>>,
    main_menu_alignment: Option<String>,
    main_menu_bg_mode: Option<String>,
    main_menu_bg_color: Option<String>,
    main_menu_bg_image: Option<String>,
    main_menu_title_color: Option<String>,
    main_menu_button1_color: Option<String>,
    main_menu_button2_color: Option<String>,
    main_menu_button3_color: Option<String>,
}

impl MapDocument {
    fn menu_fields(&self) -> MenuFields {
        MenuFields {
            title: self.main_menu_title.clone(),
            buttons: self.main_menu_buttons.clone(),
            alignment: self.main_menu_alignment.clone(),
            bg_mode: self.main_menu_bg_mode.clone(),
            bg_color: self.main_menu_bg_color.clone(),
            bg_image: self.main_menu_bg_image.clone(),
            title_color: self.main_menu_title_color.clone(),
            button_colors: [
                self.main_menu_button1_color.clone(),
                self.main_menu_button2_color.clone(),
                self.main_menu_button3_color.clone(),
            ],
        }
    }
}

/// Stand-alone main menu file. Replaces the menu section of the map.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct MenuDocument {
    title: String,
    buttons: Vec<String>,
    alignment: Option<String>,
    bg_mode: Option<String>,
    bg_color: Option<String>,
    bg_image: Option<String>,
    title_color: Option<String>,
    button1_color: Option<String>,
    button2_color: Option<String>,
    button3_color: Option<String>,
}

impl MenuDocument {
    fn into_fields(self) -> MenuFields {
        MenuFields {
            title: Some(self.title),
            buttons: Some(self.buttons),
            alignment: self.alignment,
            bg_mode: self.bg_mode,
            bg_color: self.bg_color,
            bg_image: self.bg_image,
            title_color: self.title_color,
            button_colors: [self.button1_color, self.button2_color, self.button3_color],
        }
    }
}

/// Menu settings common to both file layouts.
#[derive(Debug, Default)]
struct MenuFields {
    title: Option<String>,
    buttons: Option<Vec<String>>,
    alignment: Option<String>,
    bg_mode: Option<String>,
    bg_color: Option<String>,
    bg_image: Option<String>,
    title_color: Option<String>,
    button_colors: [Option<String>; 3],
}

impl MenuFields {
    fn into_config(self, media: &MediaResolver, assets: &mut AssetRequests) -> MenuConfig {
        let defaults = MenuConfig::default();

        let buttons = match self.buttons {
            Some(labels) if labels.len() >= DEFAULT_BUTTON_LABELS.len() => {
                [labels[0].clone(), labels[1].clone(), labels[2].clone()]
            }
            Some(labels) => {
                log::warn!(
                    "menu lists {} button labels, expected 3; using defaults",
                    labels.len()
                );
                defaults.buttons
            }
            None => defaults.buttons,
        };

        let alignment = match self.alignment.as_deref() {
            Some(name) => MenuAlignment::from_name(name).unwrap_or_else(|| {
                log::warn!("unknown menu alignment {name:?}; centering");
                MenuAlignment::Middle
            }),
            None => defaults.alignment,
        };

        let background = match self.bg_mode.as_deref() {
            None | Some("color") => {
                MenuBackground::Color(color_or(self.bg_color.as_deref(), Color::WHITE))
            }
            Some("image") => {
                if let Some(path) = media.resolve(self.bg_image.as_deref()) {
                    assets.insert(AssetSlot::MenuBackground, path);
                }
                MenuBackground::Image
            }
            Some(mode) => {
                log::warn!("unknown menu background mode {mode:?}; clearing to off-white");
                MenuBackground::Color(Color::RAY_WHITE)
            }
        };

        let [first, second, third] = self.button_colors;
        MenuConfig {
            title: self.title.unwrap_or(defaults.title),
            buttons,
            alignment,
            background,
            title_color: color_or(self.title_color.as_deref(), defaults.title_color),
            button_colors: [
                color_or(first.as_deref(), Color::BLACK),
                color_or(second.as_deref(), Color::BLACK),
                color_or(third.as_deref(), Color::BLACK),
            ],
        }
    }
}

fn color_or(value: Option<&str>, fallback: Color) -> Color {
    value.map_or(fallback, Color::parse_or_white)
}

/// Locates referenced media, preferring the media directory.
#[derive(Clone, Debug)]
pub(crate) struct MediaResolver {
    media_dir: PathBuf,
    exists: fn(&Path) -> bool,
}

impl MediaResolver {
    pub(crate) fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self::with_probe(media_dir, Path::exists)
    }

    fn with_probe(media_dir: impl Into<PathBuf>, exists: fn(&Path) -> bool) -> Self {
        Self {
            media_dir: media_dir.into(),
            exists,
        }
    }

    /// Resolves `<media>/<file name>` first, then the path as written.
    pub(crate) fn resolve(&self, reference: Option<&str>) -> Option<PathBuf> {
        let reference = reference.map(str::trim).filter(|value| !value.is_empty())?;
        let path = Path::new(reference);
        if let Some(file_name) = path.file_name() {
            let candidate = self.media_dir.join(file_name);
            if (self.exists)(&candidate) {
                return Some(candidate);
            }
        }
        if (self.exists)(path) {
            return Some(path.to_path_buf());
        }
        log::warn!(
            "asset {reference:?} not found in {} or at its own path",
            self.media_dir.display()
        );
        None
    }
}

/// Configuration and asset list for one preview run.
#[derive(Debug)]
pub(crate) struct PreviewSetup {
    pub(crate) config: SessionConfig,
    pub(crate) assets: AssetRequests,
}

/// Combines the optional map, menu override and tuning into a validated setup.
pub(crate) fn build_setup(
    map: Option<MapDocument>,
    menu: Option<MenuDocument>,
    tuning: PlayerTuning,
    media: &MediaResolver,
) -> Result<PreviewSetup> {
    let mut assets = AssetRequests::new();
    let defaults = SessionConfig::default();

    let Some(map) = map else {
        let menu = menu
            .map(|menu| menu.into_fields().into_config(media, &mut assets))
            .unwrap_or(defaults.menu);
        let config = SessionConfig {
            tuning,
            menu,
            ..SessionConfig::default()
        };
        return Ok(PreviewSetup {
            config: config.validated()?,
            assets,
        });
    };

    let grid = GridMap::from_codes(&map.grid).context("map grid is invalid")?;

    let slots = [
        (AssetSlot::WallTexture, &map.wall_texture),
        (AssetSlot::GroundTexture, &map.ground_texture),
        (AssetSlot::HandgunIdle, &map.handgun_idle_texture),
        (AssetSlot::HandgunShoot, &map.handgun_shoot_texture),
        (AssetSlot::ShotSound, &map.handgun_shoot_sound),
        (AssetSlot::EnemyIdle, &map.enemy_idle_texture),
        (AssetSlot::EnemyShot, &map.enemy_shot_texture),
        (AssetSlot::EnemyModel, &map.enemy_model),
    ];
    for (slot, reference) in slots {
        if let Some(path) = media.resolve(reference.as_deref()) {
            assets.insert(slot, path);
        }
    }

    let menu_fields = match menu {
        Some(menu) => menu.into_fields(),
        None => map.menu_fields(),
    };
    let menu = menu_fields.into_config(media, &mut assets);

    let config = SessionConfig {
        game_name: map.game_name.unwrap_or(defaults.game_name),
        grid,
        sky_color: Color::parse_or_white(&map.sky_color),
        sun_color: color_or(map.sun_color.as_deref(), defaults.sun_color),
        cooldown: map.shot_delay.unwrap_or(defaults.cooldown),
        tuning,
        win_message: WinMessage {
            text: map.win_message_text.unwrap_or(defaults.win_message.text),
            color: color_or(
                map.win_message_color.as_deref(),
                defaults.win_message.color,
            ),
        },
        menu,
    };

    Ok(PreviewSetup {
        config: config.validated()?,
        assets,
    })
}

pub(crate) fn load_map(path: &Path) -> Result<MapDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse map file {}", path.display()))
}

pub(crate) fn load_menu(path: &Path) -> Result<MenuDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read menu file at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse menu file {}", path.display()))
}

pub(crate) fn load_tuning(path: &Path) -> Result<PlayerTuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse tuning file {}", path.display()))
}
