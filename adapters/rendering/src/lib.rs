#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Ray Arena adapters.
//!
//! The preview runtime never talks to a graphics library directly. It reads a
//! [`FrameContext`] assembled by the backend and answers with a [`Frame`]: a
//! list of [`DrawCommand`] values, audio cues, the desired cursor mode and an
//! exit flag. Assets are addressed by [`AssetSlot`]; the backend reports which
//! slots actually loaded through [`AssetAvailability`].

use anyhow::Result as AnyResult;
use glam::{Vec2, Vec3};
use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);
    /// Off-white used behind menu background images.
    pub const RAY_WHITE: Self = Self::from_rgb_u8(245, 245, 245);
    /// Fill of menu buttons and untextured ground tiles.
    pub const LIGHT_GRAY: Self = Self::from_rgb_u8(200, 200, 200);
    /// Untextured wall cubes.
    pub const GRAY: Self = Self::from_rgb_u8(130, 130, 130);
    /// Untextured enemies.
    pub const RED: Self = Self::from_rgb_u8(230, 41, 55);
    /// Spawn marker.
    pub const GREEN: Self = Self::from_rgb_u8(0, 228, 48);
    /// HUD text.
    pub const MAROON: Self = Self::from_rgb_u8(190, 33, 55);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Parses `#RRGGBB`, `#RGB` or one of the named colors understood by the
    /// editor's color picker. Names are case-insensitive and ignore spaces.
    pub fn parse(value: &str) -> Result<Self, ColorParseError> {
        let trimmed = value.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::new(value));
        }

        let key: String = trimmed
            .chars()
            .filter(|character| !character.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, color)| *color)
            .ok_or_else(|| ColorParseError::new(value))
    }

    /// Parses a color, logging a warning and returning white when it is not
    /// understood.
    #[must_use]
    pub fn parse_or_white(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|error| {
            log::warn!("{error}; using white");
            Self::WHITE
        })
    }
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("white", Color::WHITE),
    ("black", Color::BLACK),
    ("red", Color::from_rgb_u8(255, 0, 0)),
    ("green", Color::from_rgb_u8(0, 255, 0)),
    ("blue", Color::from_rgb_u8(0, 0, 255)),
    ("yellow", Color::from_rgb_u8(255, 255, 0)),
    ("cyan", Color::from_rgb_u8(0, 255, 255)),
    ("magenta", Color::from_rgb_u8(255, 0, 255)),
    ("orange", Color::from_rgb_u8(255, 165, 0)),
    ("purple", Color::from_rgb_u8(160, 32, 240)),
    ("pink", Color::from_rgb_u8(255, 192, 203)),
    ("brown", Color::from_rgb_u8(165, 42, 42)),
    ("maroon", Color::from_rgb_u8(176, 48, 96)),
    ("gold", Color::from_rgb_u8(255, 215, 0)),
    ("gray", Color::from_rgb_u8(190, 190, 190)),
    ("grey", Color::from_rgb_u8(190, 190, 190)),
    ("lightgray", Color::from_rgb_u8(211, 211, 211)),
    ("lightgrey", Color::from_rgb_u8(211, 211, 211)),
    ("darkgray", Color::from_rgb_u8(169, 169, 169)),
    ("darkgrey", Color::from_rgb_u8(169, 169, 169)),
    ("skyblue", Color::from_rgb_u8(135, 206, 235)),
    ("navy", Color::from_rgb_u8(0, 0, 128)),
    ("darkgreen", Color::from_rgb_u8(0, 100, 0)),
];

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|character| character.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let channel =
                |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            Some(Color::from_rgb_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        }
        3 => {
            let channel = |index: usize| {
                u8::from_str_radix(&hex[index..=index], 16)
                    .ok()
                    .map(|nibble| nibble * 17)
            };
            Some(Color::from_rgb_u8(channel(0)?, channel(1)?, channel(2)?))
        }
        _ => None,
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorParseError {
    value: String,
}

impl ColorParseError {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }

    /// Input that failed to parse.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised color {:?}", self.value)
    }
}

impl Error for ColorParseError {}

/// Width and height of the drawable surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport of the provided size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Timing sampled once at the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds elapsed since the previous frame.
    pub dt: f32,
    /// Wall-clock seconds since the backend started.
    pub now: f64,
}

/// Input snapshot gathered by adapters before updating the session.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in screen pixels.
    pub mouse_position: Vec2,
    /// Cursor travel since the previous frame, in pixels.
    pub mouse_delta: Vec2,
    /// Primary mouse button went down this frame.
    pub fire_pressed: bool,
    /// Escape went down this frame.
    pub cancel_pressed: bool,
    /// `W` held.
    pub move_forward: bool,
    /// `S` held.
    pub move_backward: bool,
    /// `A` held.
    pub move_left: bool,
    /// `D` held.
    pub move_right: bool,
    /// Left shift held.
    pub run_held: bool,
    /// Space went down this frame.
    pub jump_pressed: bool,
    /// The window system asked the application to close.
    pub close_requested: bool,
}

/// Perspective camera used for the 3D world pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy_degrees: f32,
}

/// Loadable resources referenced by a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetSlot {
    /// Texture applied to wall cubes.
    WallTexture,
    /// Texture applied to ground tiles.
    GroundTexture,
    /// Weapon image while not firing.
    HandgunIdle,
    /// Weapon image while the shot display timer runs.
    HandgunShoot,
    /// Enemy texture while idle.
    EnemyIdle,
    /// Enemy texture while reacting to a hit.
    EnemyShot,
    /// Enemy mesh.
    EnemyModel,
    /// Main menu background image.
    MenuBackground,
    /// Sound played when a shot is accepted.
    ShotSound,
}

/// Broad category of an asset slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// Image decoded into a GPU texture.
    Texture,
    /// Mesh loaded from a Wavefront OBJ file.
    Model,
    /// Sound effect.
    Sound,
}

impl AssetSlot {
    /// Every slot, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::WallTexture,
        Self::GroundTexture,
        Self::HandgunIdle,
        Self::HandgunShoot,
        Self::EnemyIdle,
        Self::EnemyShot,
        Self::EnemyModel,
        Self::MenuBackground,
        Self::ShotSound,
    ];

    /// Category the slot belongs to.
    #[must_use]
    pub const fn kind(self) -> AssetKind {
        match self {
            Self::EnemyModel => AssetKind::Model,
            Self::ShotSound => AssetKind::Sound,
            Self::WallTexture
            | Self::GroundTexture
            | Self::HandgunIdle
            | Self::HandgunShoot
            | Self::EnemyIdle
            | Self::EnemyShot
            | Self::MenuBackground => AssetKind::Texture,
        }
    }

    /// Human readable name used in log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WallTexture => "wall texture",
            Self::GroundTexture => "ground texture",
            Self::HandgunIdle => "handgun idle texture",
            Self::HandgunShoot => "handgun shoot texture",
            Self::EnemyIdle => "enemy idle texture",
            Self::EnemyShot => "enemy shot texture",
            Self::EnemyModel => "enemy model",
            Self::MenuBackground => "menu background image",
            Self::ShotSound => "shot sound",
        }
    }
}

/// Files the backend should load before the first frame, keyed by slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetRequests {
    paths: BTreeMap<AssetSlot, PathBuf>,
}

impl AssetRequests {
    /// Creates an empty request set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that `slot` be loaded from `path`, replacing any earlier request.
    pub fn insert(&mut self, slot: AssetSlot, path: impl Into<PathBuf>) {
        let _ = self.paths.insert(slot, path.into());
    }

    /// Path requested for `slot`.
    #[must_use]
    pub fn get(&self, slot: AssetSlot) -> Option<&Path> {
        self.paths.get(&slot).map(PathBuf::as_path)
    }

    /// Iterates over the requested slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetSlot, &Path)> {
        self.paths.iter().map(|(slot, path)| (*slot, path.as_path()))
    }

    /// Number of requested slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Reports whether no slots were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Slots the backend managed to load. Absent slots must be drawn with fallbacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetAvailability {
    loaded: BTreeSet<AssetSlot>,
}

impl AssetAvailability {
    /// Availability with nothing loaded.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds availability from the provided loaded slots.
    #[must_use]
    pub fn from_slots(slots: impl IntoIterator<Item = AssetSlot>) -> Self {
        Self {
            loaded: slots.into_iter().collect(),
        }
    }

    /// Records that `slot` loaded successfully.
    pub fn mark_loaded(&mut self, slot: AssetSlot) {
        let _ = self.loaded.insert(slot);
    }

    /// Reports whether `slot` is usable.
    #[must_use]
    pub fn contains(&self, slot: AssetSlot) -> bool {
        self.loaded.contains(&slot)
    }

    /// Returns `slot` when it is usable.
    #[must_use]
    pub fn resolve(&self, slot: AssetSlot) -> Option<AssetSlot> {
        self.contains(slot).then_some(slot)
    }
}

/// Text measurement service supplied by the backend.
pub trait TextMetrics {
    /// Width in pixels of `text` rendered at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Single drawing instruction emitted by the preview runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fills the whole surface with a color.
    ClearBackground {
        /// Fill color.
        color: Color,
    },
    /// Draws a texture with its top-left corner at `position`.
    Texture {
        /// Texture to draw.
        slot: AssetSlot,
        /// Top-left corner in screen pixels.
        position: Vec2,
        /// Multiplicative tint.
        tint: Color,
    },
    /// Draws a filled rectangle.
    Rectangle {
        /// Top-left corner in screen pixels.
        position: Vec2,
        /// Width and height in pixels.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Draws text with its top-left corner at `position`.
    Text {
        /// Text to draw.
        text: String,
        /// Top-left corner in screen pixels.
        position: Vec2,
        /// Font size in pixels.
        font_size: f32,
        /// Text color.
        color: Color,
    },
    /// Starts the 3D world pass.
    BeginWorld {
        /// Camera used for the pass.
        camera: Camera,
    },
    /// Ends the 3D world pass and returns to screen space.
    EndWorld,
    /// Draws an axis-aligned box.
    Cube {
        /// Box center.
        center: Vec3,
        /// Extent along each axis.
        size: Vec3,
        /// Fill or tint color.
        color: Color,
        /// Texture applied to every face, when available.
        texture: Option<AssetSlot>,
    },
    /// Draws a solid sphere.
    Sphere {
        /// Sphere center.
        center: Vec3,
        /// Sphere radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Draws a loaded model instance.
    Model {
        /// Model to draw.
        model: AssetSlot,
        /// Texture bound to the model, when available.
        texture: Option<AssetSlot>,
        /// Model origin in world space.
        position: Vec3,
        /// Rotation about +Y in degrees.
        rotation_degrees: f32,
        /// Uniform scale.
        scale: f32,
        /// Multiplicative tint.
        tint: Color,
    },
}

/// Fire-and-forget audio requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    /// A shot was accepted.
    Shot,
}

/// Whether the pointer is free or captured for mouse look.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    /// Visible, unconstrained pointer.
    #[default]
    Free,
    /// Hidden pointer confined to the window.
    Captured,
}

/// Time spent in each phase of producing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSimulationBreakdown {
    /// Time spent advancing the simulation.
    pub simulation: Duration,
    /// Time spent assembling draw commands.
    pub present: Duration,
}

/// Everything the runtime hands back to the backend for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Drawing instructions in submission order.
    pub commands: Vec<DrawCommand>,
    /// Sounds to start this frame.
    pub audio: Vec<AudioCue>,
    /// Desired cursor mode.
    pub cursor: CursorMode,
    /// Stop the loop after this frame.
    pub exit: bool,
    /// Timing information for the frame report.
    pub breakdown: FrameSimulationBreakdown,
}

/// Per-frame data passed from the backend to the runtime.
pub struct FrameContext<'a> {
    /// Timing sampled at the start of the frame.
    pub clock: FrameClock,
    /// Input observed since the previous frame.
    pub input: FrameInput,
    /// Current surface size.
    pub viewport: Viewport,
    /// Frames per second reported by the backend.
    pub fps: u32,
    /// Slots that loaded successfully.
    pub assets: &'a AssetAvailability,
    /// Text measurement service.
    pub text: &'a dyn TextMetrics,
}

impl fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("clock", &self.clock)
            .field("input", &self.input)
            .field("viewport", &self.viewport)
            .field("fps", &self.fps)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window width in pixels.
    pub window_width: i32,
    /// Initial window height in pixels.
    pub window_height: i32,
    /// Assets to load before the first frame.
    pub assets: AssetRequests,
}

impl Presentation {
    /// Default window width in pixels.
    pub const DEFAULT_WIDTH: i32 = 1200;
    /// Default window height in pixels.
    pub const DEFAULT_HEIGHT: i32 = 900;

    /// Constructs a new presentation descriptor with the default window size.
    #[must_use]
    pub fn new<T>(window_title: T, assets: AssetRequests) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_width: Self::DEFAULT_WIDTH,
            window_height: Self::DEFAULT_HEIGHT,
            assets,
        }
    }
}

/// Rendering backend capable of presenting Ray Arena frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure requests an exit.
    ///
    /// The provided `update` closure receives the frame clock, input, viewport
    /// and asset availability captured by the adapter and returns the frame to
    /// present. Loaded assets are released before this method returns.
    fn run<F>(self, presentation: Presentation, update: F) -> AnyResult<()>
    where
        F: FnMut(FrameContext<'_>) -> Frame + 'static;
}
