//! Draw-list assembly for first-person play.

use glam::{Vec2, Vec3};
use ray_arena_core::{EnemyState, EnemyView, GridCell, GridMap, PlayerPose, SpawnPoint};
use ray_arena_rendering::{
    AssetAvailability, AssetSlot, Camera, Color, DrawCommand, TextMetrics, Viewport,
};

use crate::config::SessionConfig;

/// Vertical field of view of the play camera, in degrees.
pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;
/// Side length of the square weapon image.
pub const WEAPON_IMAGE_SIZE: f32 = 416.0;
/// Font size of the FPS counter and controls help.
pub const HUD_FONT_SIZE: f32 = 20.0;
/// Font size of the win banner.
pub const WIN_FONT_SIZE: f32 = 50.0;
/// Controls reminder drawn in the top-left corner.
pub const HELP_TEXT: &str = "WASD: Move | SHIFT: Run | SPACE: Jump | ESC: Menu";

const GROUND_SLAB_HEIGHT: f32 = 0.1;
const SPAWN_MARKER_SIZE: f32 = 0.5;

/// Inputs to [`draw_world`] that change every frame.
pub(crate) struct WorldFrame<'a> {
    pub(crate) player: PlayerPose,
    pub(crate) spawn: SpawnPoint,
    pub(crate) enemies: &'a EnemyView,
    pub(crate) showing_shot: bool,
    pub(crate) fps: u32,
}

/// Camera placed at the player's eye, looking along the view direction.
#[must_use]
pub fn player_camera(pose: &PlayerPose, player_height: f32) -> Camera {
    let eye = pose.position + Vec3::new(0.0, player_height * 0.5, 0.0);
    Camera {
        position: eye,
        target: eye + pose.forward(),
        up: Vec3::Y,
        fovy_degrees: FIELD_OF_VIEW_DEGREES,
    }
}

/// Heading in degrees that turns an enemy model toward the player.
#[must_use]
pub fn enemy_facing_degrees(enemy: Vec3, player: Vec3) -> f32 {
    (player.x - enemy.x).atan2(player.z - enemy.z).to_degrees() + 180.0
}

pub(crate) fn draw_world(
    config: &SessionConfig,
    frame: &WorldFrame<'_>,
    viewport: Viewport,
    assets: &AssetAvailability,
    text: &dyn TextMetrics,
    out: &mut Vec<DrawCommand>,
) {
    out.push(DrawCommand::ClearBackground {
        color: config.sky_color,
    });
    out.push(DrawCommand::BeginWorld {
        camera: player_camera(&frame.player, config.tuning.height),
    });

    let columns = config.grid.columns() as f32;
    out.push(DrawCommand::Sphere {
        center: Vec3::new(columns * 1.5, 10.0, -columns * 0.5),
        radius: 1.0,
        color: config.sun_color,
    });

    draw_cells(&config.grid, assets, out);

    out.push(DrawCommand::Cube {
        center: frame.spawn.cell.floor_center() + Vec3::new(0.0, 0.5, 0.0),
        size: Vec3::splat(SPAWN_MARKER_SIZE),
        color: Color::GREEN,
        texture: None,
    });

    draw_enemies(frame.enemies, frame.player.position, assets, out);

    out.push(DrawCommand::EndWorld);

    draw_hud(config, frame, viewport, assets, text, out);
}

fn draw_cells(grid: &GridMap, assets: &AssetAvailability, out: &mut Vec<DrawCommand>) {
    let wall_texture = assets.resolve(AssetSlot::WallTexture);
    let ground_texture = assets.resolve(AssetSlot::GroundTexture);

    for (cell, kind) in grid.iter() {
        let base = cell.floor_center();
        let command = match kind {
            GridCell::Wall => DrawCommand::Cube {
                center: base + Vec3::new(0.0, 0.5, 0.0),
                size: Vec3::ONE,
                color: tint_or(wall_texture, Color::GRAY),
                texture: wall_texture,
            },
            GridCell::Ground | GridCell::Spawn | GridCell::Enemy => DrawCommand::Cube {
                center: base + Vec3::new(0.0, GROUND_SLAB_HEIGHT * 0.5, 0.0),
                size: Vec3::new(1.0, GROUND_SLAB_HEIGHT, 1.0),
                color: tint_or(ground_texture, Color::LIGHT_GRAY),
                texture: ground_texture,
            },
        };
        out.push(command);
    }
}

fn draw_enemies(
    enemies: &EnemyView,
    player: Vec3,
    assets: &AssetAvailability,
    out: &mut Vec<DrawCommand>,
) {
    let model = assets.resolve(AssetSlot::EnemyModel);
    for enemy in enemies.iter() {
        let Some(model) = model else {
            out.push(DrawCommand::Cube {
                center: enemy.position + Vec3::new(0.0, 0.5, 0.0),
                size: Vec3::ONE,
                color: Color::RED,
                texture: None,
            });
            continue;
        };

        let preferred = match enemy.state {
            EnemyState::Shot => AssetSlot::EnemyShot,
            EnemyState::Idle => AssetSlot::EnemyIdle,
        };
        let texture = assets
            .resolve(preferred)
            .or_else(|| assets.resolve(AssetSlot::EnemyIdle));
        out.push(DrawCommand::Model {
            model,
            texture,
            position: enemy.position + Vec3::new(0.0, 0.5, 0.0),
            rotation_degrees: enemy_facing_degrees(enemy.position, player),
            scale: 1.0,
            tint: Color::WHITE,
        });
    }
}

fn draw_hud(
    config: &SessionConfig,
    frame: &WorldFrame<'_>,
    viewport: Viewport,
    assets: &AssetAvailability,
    text: &dyn TextMetrics,
    out: &mut Vec<DrawCommand>,
) {
    let weapon = if frame.showing_shot && assets.contains(AssetSlot::HandgunShoot) {
        Some(AssetSlot::HandgunShoot)
    } else {
        assets.resolve(AssetSlot::HandgunIdle)
    };
    if let Some(slot) = weapon {
        out.push(DrawCommand::Texture {
            slot,
            position: Vec2::new(
                (viewport.width - WEAPON_IMAGE_SIZE) / 2.0,
                viewport.height - WEAPON_IMAGE_SIZE,
            ),
            tint: Color::WHITE,
        });
    }

    out.push(DrawCommand::Text {
        text: format!("FPS: {}", frame.fps),
        position: Vec2::new(viewport.width - 100.0, 10.0),
        font_size: HUD_FONT_SIZE,
        color: Color::MAROON,
    });
    out.push(DrawCommand::Text {
        text: HELP_TEXT.to_owned(),
        position: Vec2::new(10.0, 10.0),
        font_size: HUD_FONT_SIZE,
        color: Color::MAROON,
    });

    if frame.enemies.is_empty() {
        let banner = &config.win_message;
        let width = text.text_width(banner.text(), WIN_FONT_SIZE);
        out.push(DrawCommand::Text {
            text: banner.text().to_owned(),
            position: Vec2::new(
                (viewport.width - width) / 2.0,
                (viewport.height - WIN_FONT_SIZE) / 2.0,
            ),
            font_size: WIN_FONT_SIZE,
            color: banner.color,
        });
    }
}

fn tint_or(texture: Option<AssetSlot>, fallback: Color) -> Color {
    if texture.is_some() {
        Color::WHITE
    } else {
        fallback
    }
}
