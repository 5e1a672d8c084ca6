#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Preview frame loop for Ray Arena.
//!
//! [`PreviewLoop`] owns the world and every system for one preview session.
//! Each frame is split into [`PreviewLoop::step`], which advances the
//! simulation from sampled input, and [`PreviewLoop::present`], which turns
//! the resulting state into draw commands. [`PreviewLoop::frame`] runs both
//! for a backend-supplied [`FrameContext`].

mod config;
mod menu;
mod scene;

use std::time::Instant;

use ray_arena_core::{Command, Event, SessionMode};
use ray_arena_rendering::{
    AssetAvailability, AssetSlot, AudioCue, CursorMode, DrawCommand, Frame, FrameClock,
    FrameContext, FrameInput, FrameSimulationBreakdown, TextMetrics, Viewport,
};
use ray_arena_system_collision::WallCollider;
use ray_arena_system_combat::CombatController;
use ray_arena_system_hitscan::{Hitscan, Ray};
use ray_arena_system_movement::{Movement, MovementInput};
use ray_arena_world::{self as world, query, World};

pub use config::{
    ConfigError, MenuAlignment, MenuBackground, MenuConfig, SessionConfig, WinMessage,
    DEFAULT_BUTTON_LABELS, DEFAULT_GAME_NAME, DEFAULT_MENU_TITLE, DEFAULT_WIN_TEXT,
};
pub use menu::{
    title_position, ButtonRect, MenuAction, MenuLayout, BUTTON_FONT_SIZE, BUTTON_SIZE,
    BUTTON_SPACING, EDGE_MARGIN, TITLE_FONT_SIZE,
};
pub use scene::{
    enemy_facing_degrees, player_camera, FIELD_OF_VIEW_DEGREES, HELP_TEXT, HUD_FONT_SIZE,
    WEAPON_IMAGE_SIZE, WIN_FONT_SIZE,
};

/// Result of advancing the simulation by one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// Sounds to start this frame.
    pub audio: Vec<AudioCue>,
    /// The loop should stop after this frame.
    pub exit: bool,
}

/// State machine driving a single preview session.
#[derive(Debug)]
pub struct PreviewLoop {
    config: SessionConfig,
    world: World,
    movement: Movement,
    collider: WallCollider,
    hitscan: Hitscan,
    combat: CombatController,
    cursor: CursorMode,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl PreviewLoop {
    /// Creates a session in menu mode with the player at the spawn.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let world = World::new(config.grid.clone());
        Self {
            movement: Movement::new(config.tuning),
            collider: WallCollider::from_grid(&config.grid),
            hitscan: Hitscan::new(),
            combat: CombatController::new(config.cooldown),
            cursor: CursorMode::Free,
            commands: Vec::new(),
            events: Vec::new(),
            world,
            config,
        }
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Weapon cooldown state.
    #[must_use]
    pub fn combat(&self) -> &CombatController {
        &self.combat
    }

    /// Active session mode.
    #[must_use]
    pub fn mode(&self) -> SessionMode {
        query::mode(&self.world)
    }

    /// Cursor mode requested by the last step.
    #[must_use]
    pub fn cursor(&self) -> CursorMode {
        self.cursor
    }

    /// Events emitted by the world during the last step.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Advances the session by one frame.
    pub fn step(
        &mut self,
        clock: FrameClock,
        input: &FrameInput,
        viewport: Viewport,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        self.events.clear();

        if input.fire_pressed && self.combat.try_fire(clock.now) {
            log::debug!("shot accepted at {:.3}s", clock.now);
            outcome.audio.push(AudioCue::Shot);
        }
        self.combat.advance(clock.dt);

        match self.mode() {
            SessionMode::Menu => self.step_menu(input, viewport, &mut outcome),
            SessionMode::Playing => self.step_playing(clock, input),
        }

        if input.close_requested {
            log::info!("close requested");
            outcome.exit = true;
        }
        outcome
    }

    fn step_menu(&mut self, input: &FrameInput, viewport: Viewport, outcome: &mut StepOutcome) {
        self.cursor = CursorMode::Free;
        if !input.fire_pressed {
            return;
        }

        let layout = MenuLayout::new(self.config.menu.alignment, viewport);
        match layout.hit_test(input.mouse_position) {
            Some(MenuAction::Start) => {
                self.submit(Command::SetMode {
                    mode: SessionMode::Playing,
                });
                self.cursor = CursorMode::Captured;
            }
            Some(MenuAction::Options) => log::info!("options menu is not implemented"),
            Some(MenuAction::Exit) => {
                log::info!("exit selected from menu");
                outcome.exit = true;
            }
            None => {}
        }
    }

    fn step_playing(&mut self, clock: FrameClock, input: &FrameInput) {
        if input.cancel_pressed {
            self.submit(Command::SetMode {
                mode: SessionMode::Menu,
            });
            self.cursor = CursorMode::Free;
        }

        let intent = MovementInput {
            look_delta: input.mouse_delta,
            forward: input.move_forward,
            backward: input.move_backward,
            left: input.move_left,
            right: input.move_right,
            run: input.run_held,
            jump_pressed: input.jump_pressed,
        };
        let mut pose = self
            .movement
            .step(query::player(&self.world), &intent, clock.dt);
        pose.position = self.collider.resolve(pose.position, self.config.tuning.radius);
        self.submit(Command::PlacePlayer { pose });

        if input.fire_pressed && self.combat.hit_window_open(clock.now) {
            let ray = Ray::from_player(&pose, self.config.tuning.height);
            let enemies = query::enemy_view(&self.world);
            self.hitscan.handle(&ray, &enemies, &mut self.commands);
            self.flush();
        }

        self.submit(Command::Tick { dt: clock.dt });
    }

    fn submit(&mut self, command: Command) {
        self.commands.push(command);
        self.flush();
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Emits the draw commands for the current mode.
    #[must_use]
    pub fn present(
        &self,
        viewport: Viewport,
        fps: u32,
        assets: &AssetAvailability,
        text: &dyn TextMetrics,
    ) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        match self.mode() {
            SessionMode::Menu => menu::draw_menu(
                &self.config.menu,
                viewport,
                assets.contains(AssetSlot::MenuBackground),
                text,
                &mut commands,
            ),
            SessionMode::Playing => {
                let enemies = query::enemy_view(&self.world);
                let frame = scene::WorldFrame {
                    player: query::player(&self.world),
                    spawn: query::spawn(&self.world),
                    enemies: &enemies,
                    showing_shot: self.combat.is_displaying_shot(),
                    fps,
                };
                scene::draw_world(&self.config, &frame, viewport, assets, text, &mut commands);
            }
        }
        commands
    }

    /// Runs [`step`](Self::step) and [`present`](Self::present) for one
    /// backend frame.
    pub fn frame(&mut self, context: FrameContext<'_>) -> Frame {
        let simulation_start = Instant::now();
        let outcome = self.step(context.clock, &context.input, context.viewport);
        let simulation = simulation_start.elapsed();

        let present_start = Instant::now();
        let commands = self.present(context.viewport, context.fps, context.assets, context.text);
        let present = present_start.elapsed();

        Frame {
            commands,
            audio: outcome.audio,
            cursor: self.cursor,
            exit: outcome.exit,
            breakdown: FrameSimulationBreakdown {
                simulation,
                present,
            },
        }
    }
}
