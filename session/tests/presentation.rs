use glam::{Vec2, Vec3};
use ray_arena_core::GridMap;
use ray_arena_rendering::{
    AssetAvailability, AssetSlot, Color, DrawCommand, FrameClock, FrameContext, FrameInput,
    TextMetrics, Viewport,
};
use ray_arena_session::{
    MenuAction, MenuBackground, MenuConfig, MenuLayout, PreviewLoop, SessionConfig, WinMessage,
    HELP_TEXT,
};

const VIEWPORT: Viewport = Viewport::new(1200.0, 900.0);

/// Every glyph is half as wide as the font is tall.
struct HalfEmText;

impl TextMetrics for HalfEmText {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.5
    }
}

fn session_with(rows: &[Vec<u8>], menu: MenuConfig) -> PreviewLoop {
    PreviewLoop::new(SessionConfig {
        grid: GridMap::from_codes(rows).expect("valid grid"),
        menu,
        ..SessionConfig::default()
    })
}

fn playing(rows: &[Vec<u8>]) -> PreviewLoop {
    let mut session = session_with(rows, MenuConfig::default());
    let rect =
        MenuLayout::new(session.config().menu.alignment, VIEWPORT).button(MenuAction::Start);
    let input = FrameInput {
        mouse_position: rect.position + Vec2::splat(1.0),
        fire_pressed: true,
        ..FrameInput::default()
    };
    let _ = session.step(FrameClock { dt: 0.016, now: 0.0 }, &input, VIEWPORT);
    session
}

fn cubes(commands: &[DrawCommand]) -> Vec<(Vec3, Vec3, Color, Option<AssetSlot>)> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Cube {
                center,
                size,
                color,
                texture,
            } => Some((*center, *size, *color, *texture)),
            _ => None,
        })
        .collect()
}

fn textures(commands: &[DrawCommand]) -> Vec<AssetSlot> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Texture { slot, .. } => Some(*slot),
            _ => None,
        })
        .collect()
}

fn texts(commands: &[DrawCommand]) -> Vec<String> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn level() -> Vec<Vec<u8>> {
    vec![vec![1, 3], vec![2, 0]]
}

#[test]
fn missing_assets_fall_back_to_flat_primitives() {
    let session = playing(&level());

    let commands = session.present(VIEWPORT, 60, &AssetAvailability::none(), &HalfEmText);
    let cubes = cubes(&commands);

    let wall = cubes
        .iter()
        .find(|cube| cube.0 == Vec3::new(0.5, 0.5, 0.5) && cube.1 == Vec3::ONE)
        .expect("wall cube");
    assert_eq!(wall.2, Color::GRAY);
    assert_eq!(wall.3, None);

    let ground = cubes
        .iter()
        .find(|cube| cube.0 == Vec3::new(1.5, 0.05, 1.5))
        .expect("ground slab");
    assert_eq!(ground.1, Vec3::new(1.0, 0.1, 1.0));
    assert_eq!(ground.2, Color::LIGHT_GRAY);
    assert_eq!(ground.3, None);

    let enemy = cubes
        .iter()
        .find(|cube| cube.0 == Vec3::new(1.5, 0.5, 0.5))
        .expect("enemy stand-in");
    assert_eq!(enemy.2, Color::RED);

    assert!(textures(&commands).is_empty(), "weapon HUD must be skipped");
    assert!(!commands
        .iter()
        .any(|command| matches!(command, DrawCommand::Model { .. })));
}

#[test]
fn loaded_assets_are_used_when_available() {
    let session = playing(&level());
    let assets = AssetAvailability::from_slots(AssetSlot::ALL);

    let commands = session.present(VIEWPORT, 60, &assets, &HalfEmText);

    let wall = cubes(&commands)
        .into_iter()
        .find(|cube| cube.0 == Vec3::new(0.5, 0.5, 0.5))
        .expect("wall cube");
    assert_eq!(wall.3, Some(AssetSlot::WallTexture));
    assert_eq!(wall.2, Color::WHITE);

    let model = commands
        .iter()
        .find_map(|command| match command {
            DrawCommand::Model {
                model,
                texture,
                position,
                ..
            } => Some((*model, *texture, *position)),
            _ => None,
        })
        .expect("enemy model");
    assert_eq!(
        model,
        (
            AssetSlot::EnemyModel,
            Some(AssetSlot::EnemyIdle),
            Vec3::new(1.5, 0.5, 0.5)
        )
    );

    assert_eq!(textures(&commands), vec![AssetSlot::HandgunShoot]);
}

#[test]
fn weapon_switches_to_idle_image_after_display_timer() {
    let mut session = playing(&level());
    let _ = session.step(
        FrameClock { dt: 0.2, now: 0.2 },
        &FrameInput::default(),
        VIEWPORT,
    );
    let assets = AssetAvailability::from_slots([AssetSlot::HandgunIdle, AssetSlot::HandgunShoot]);

    let commands = session.present(VIEWPORT, 60, &assets, &HalfEmText);

    let weapon = commands
        .iter()
        .find_map(|command| match command {
            DrawCommand::Texture { slot, position, .. } => Some((*slot, *position)),
            _ => None,
        })
        .expect("weapon image");
    assert_eq!(weapon, (AssetSlot::HandgunIdle, Vec2::new(392.0, 484.0)));
}

#[test]
fn world_pass_is_bracketed_and_hud_follows() {
    let session = playing(&level());

    let commands = session.present(VIEWPORT, 42, &AssetAvailability::none(), &HalfEmText);

    assert!(matches!(
        commands.first(),
        Some(DrawCommand::ClearBackground { .. })
    ));
    assert!(matches!(commands.get(1), Some(DrawCommand::BeginWorld { .. })));
    let end = commands
        .iter()
        .position(|command| matches!(command, DrawCommand::EndWorld))
        .expect("world pass ends");
    assert!(commands[..end]
        .iter()
        .all(|command| !matches!(command, DrawCommand::Text { .. })));

    let texts = texts(&commands);
    assert!(texts.contains(&"FPS: 42".to_owned()));
    assert!(texts.contains(&HELP_TEXT.to_owned()));
    assert!(!texts.contains(&"YOU WIN!".to_owned()));
}

#[test]
fn win_banner_appears_without_enemies() {
    let session = playing(&[vec![2, 0], vec![0, 0]]);

    let commands = session.present(VIEWPORT, 60, &AssetAvailability::none(), &HalfEmText);

    let banner = commands
        .iter()
        .find_map(|command| match command {
            DrawCommand::Text {
                text,
                position,
                font_size,
                ..
            } if text == "YOU WIN!" => Some((*position, *font_size)),
            _ => None,
        })
        .expect("win banner");
    assert_eq!(banner, (Vec2::new(500.0, 425.0), 50.0));
}

#[test]
fn blank_win_text_shows_default_banner() {
    let mut session = PreviewLoop::new(SessionConfig {
        grid: GridMap::from_codes(&[vec![2, 0], vec![0, 0]]).expect("valid grid"),
        win_message: WinMessage {
            text: "  ".to_owned(),
            ..WinMessage::default()
        },
        ..SessionConfig::default()
    });
    let rect =
        MenuLayout::new(session.config().menu.alignment, VIEWPORT).button(MenuAction::Start);
    let input = FrameInput {
        mouse_position: rect.position,
        fire_pressed: true,
        ..FrameInput::default()
    };
    let _ = session.step(FrameClock { dt: 0.016, now: 0.0 }, &input, VIEWPORT);

    let commands = session.present(VIEWPORT, 60, &AssetAvailability::none(), &HalfEmText);

    assert!(texts(&commands).contains(&"YOU WIN!".to_owned()));
}

#[test]
fn blank_menu_title_shows_default() {
    let menu = MenuConfig {
        title: String::new(),
        ..MenuConfig::default()
    };
    let session = session_with(&level(), menu);

    let commands = session.present(VIEWPORT, 60, &AssetAvailability::none(), &HalfEmText);

    assert_eq!(
        texts(&commands),
        vec!["My Game", "Start Game", "Options", "Exit"]
    );
}

#[test]
fn menu_image_background_falls_back_to_plain_fill() {
    let menu = MenuConfig {
        background: MenuBackground::Image,
        ..MenuConfig::default()
    };
    let session = session_with(&level(), menu);

    let without = session.present(VIEWPORT, 60, &AssetAvailability::none(), &HalfEmText);
    let with = session.present(
        VIEWPORT,
        60,
        &AssetAvailability::from_slots([AssetSlot::MenuBackground]),
        &HalfEmText,
    );

    assert_eq!(
        without.first(),
        Some(&DrawCommand::ClearBackground {
            color: Color::RAY_WHITE
        })
    );
    assert!(textures(&without).is_empty());
    assert_eq!(textures(&with), vec![AssetSlot::MenuBackground]);
}

#[test]
fn menu_draws_title_and_three_labelled_buttons() {
    let session = session_with(&level(), MenuConfig::default());

    let commands = session.present(VIEWPORT, 60, &AssetAvailability::none(), &HalfEmText);

    let rectangles = commands
        .iter()
        .filter(|command| matches!(command, DrawCommand::Rectangle { .. }))
        .count();
    assert_eq!(rectangles, 3);
    assert_eq!(
        texts(&commands),
        vec!["My Game", "Start Game", "Options", "Exit"]
    );

    let title = commands
        .iter()
        .find_map(|command| match command {
            DrawCommand::Text { text, position, .. } if text == "My Game" => Some(*position),
            _ => None,
        })
        .expect("title");
    assert_eq!(title, Vec2::new(530.0, 225.0));
}

#[test]
fn frame_combines_step_and_present() {
    let mut session = playing(&level());
    let assets = AssetAvailability::none();

    let frame = session.frame(FrameContext {
        clock: FrameClock { dt: 0.016, now: 0.5 },
        input: FrameInput::default(),
        viewport: VIEWPORT,
        fps: 60,
        assets: &assets,
        text: &HalfEmText,
    });

    assert!(!frame.exit);
    assert!(frame.audio.is_empty());
    assert!(!frame.commands.is_empty());
}
