#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Ray Arena.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! The adapter therefore depends on macroquad without its default `audio`
//! feature and exposes its own `audio` feature that turns playback back on.
//! Without it, audio cues are logged and dropped.
//!
//! Each frame the adapter samples input, hands a [`FrameContext`] to the
//! runtime and executes the returned [`DrawCommand`] list in order.

mod assets;

use anyhow::{anyhow, Result};
use glam::{Vec2, Vec3};
use macroquad::{
    camera::{set_camera, set_default_camera, Camera3D},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, is_quit_requested, mouse_position,
        prevent_quit, set_cursor_grab, show_mouse, KeyCode, MouseButton,
    },
    math::{Vec2 as MacroquadVec2, Vec3 as MacroquadVec3},
    models::{draw_cube, draw_mesh, draw_sphere, Mesh, Vertex},
    shapes::draw_rectangle,
    text::{draw_text, measure_text},
    texture::draw_texture,
};
use ray_arena_rendering::{
    AssetSlot, AudioCue, Camera, Color, CursorMode, DrawCommand, Frame, FrameClock, FrameContext,
    FrameInput, Presentation, RenderingBackend, TextMetrics, Viewport,
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};

use self::assets::{AssetCache, ObjModel};

/// Snapshot of the keys the preview reacts to during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Escape` returns to the menu.
    cancel_pressed: bool,
    /// `W` moves forward.
    forward: bool,
    /// `S` moves backward.
    backward: bool,
    /// `A` strafes left.
    left: bool,
    /// `D` strafes right.
    right: bool,
    /// Left shift runs.
    run: bool,
    /// `Space` jumps.
    jump_pressed: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        Self {
            cancel_pressed: is_key_pressed(KeyCode::Escape),
            forward: is_key_down(KeyCode::W),
            backward: is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::D),
            run: is_key_down(KeyCode::LeftShift),
            jump_pressed: is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    present: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    present_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_present: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);

        self.simulation_accum += breakdown.simulation;
        self.present_accum += breakdown.present;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let average = |total: Duration| {
            if frames == 0 {
                Duration::ZERO
            } else {
                total / frames
            }
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: average(self.simulation_accum),
            avg_present: average(self.present_accum),
            avg_render: average(self.render_accum),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.present_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

fn log_fps(metrics: FpsMetrics) {
    let FpsMetrics {
        per_second,
        trailing_ten_seconds,
        avg_simulation,
        avg_present,
        avg_render,
    } = metrics;
    log::info!(
        "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms present: {:>6.2}ms render: {:>6.2}ms",
        per_second,
        trailing_ten_seconds,
        avg_simulation.as_secs_f64() * 1_000.0,
        avg_present.as_secs_f64() * 1_000.0,
        avg_render.as_secs_f64() * 1_000.0,
    );
}

/// Text measurement backed by macroquad's default font.
#[derive(Clone, Copy, Debug, Default)]
struct MacroquadText;

impl TextMetrics for MacroquadText {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        measure_text(text, None, font_size_px(font_size), 1.0).width
    }
}

fn font_size_px(font_size: f32) -> u16 {
    font_size.round().clamp(1.0, f32::from(u16::MAX)) as u16
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update: F) -> Result<()>
    where
        F: FnMut(FrameContext<'_>) -> Frame + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_width,
            window_height,
            assets: requests,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (done_sender, done_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            prevent_quit();

            #[cfg(feature = "audio")]
            let cache = {
                let mut cache = AssetCache::from_requests(&requests);
                cache.load_sounds(&requests).await;
                cache
            };
            #[cfg(not(feature = "audio"))]
            let cache = AssetCache::from_requests(&requests);
            log::info!(
                "loaded {} of {} requested assets",
                loaded_slot_count(&cache),
                requests.len()
            );

            let mut fps_counter = FpsCounter::default();
            let mut cursor = CursorMode::Free;
            apply_cursor(cursor);
            let (x, y) = mouse_position();
            let mut last_mouse = Vec2::new(x, y);

            loop {
                let keyboard = KeyboardState::poll();
                let (x, y) = mouse_position();
                let mouse = Vec2::new(x, y);
                let input = FrameInput {
                    mouse_position: mouse,
                    mouse_delta: mouse - last_mouse,
                    fire_pressed: is_mouse_button_pressed(MouseButton::Left),
                    cancel_pressed: keyboard.cancel_pressed,
                    move_forward: keyboard.forward,
                    move_backward: keyboard.backward,
                    move_left: keyboard.left,
                    move_right: keyboard.right,
                    run_held: keyboard.run,
                    jump_pressed: keyboard.jump_pressed,
                    close_requested: is_quit_requested(),
                };
                last_mouse = mouse;

                let dt = macroquad::time::get_frame_time().max(0.0);
                let clock = FrameClock {
                    dt,
                    now: macroquad::time::get_time(),
                };
                let viewport = Viewport::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let frame = update(FrameContext {
                    clock,
                    input,
                    viewport,
                    fps: u32::try_from(macroquad::time::get_fps()).unwrap_or(0),
                    assets: cache.availability(),
                    text: &MacroquadText,
                });

                if frame.cursor != cursor {
                    cursor = frame.cursor;
                    apply_cursor(cursor);
                }

                let render_start = Instant::now();
                execute(&frame.commands, &cache);
                for cue in &frame.audio {
                    play(&cache, *cue);
                }
                let render = render_start.elapsed();

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: Duration::from_secs_f32(dt),
                    simulation: frame.breakdown.simulation,
                    present: frame.breakdown.present,
                    render,
                });
                if show_fps {
                    if let Some(metrics) = metrics {
                        log_fps(metrics);
                    }
                }

                if frame.exit {
                    break;
                }

                macroquad::window::next_frame().await;
            }

            apply_cursor(CursorMode::Free);
            cache.release();
            let _ = done_sender.send(Ok(()));
        });

        done_receiver
            .recv()
            .unwrap_or_else(|_| Err(anyhow!("render loop ended without finishing")))
    }
}

fn loaded_slot_count(cache: &AssetCache) -> usize {
    AssetSlot::ALL
        .into_iter()
        .filter(|slot| cache.availability().contains(*slot))
        .count()
}

fn apply_cursor(mode: CursorMode) {
    let captured = mode == CursorMode::Captured;
    set_cursor_grab(captured);
    show_mouse(!captured);
}

#[cfg(feature = "audio")]
fn play(cache: &AssetCache, cue: AudioCue) {
    let slot = match cue {
        AudioCue::Shot => AssetSlot::ShotSound,
    };
    if let Some(sound) = cache.sound(slot) {
        macroquad::audio::play_sound_once(sound);
    }
}

#[cfg(not(feature = "audio"))]
fn play(_cache: &AssetCache, cue: AudioCue) {
    log::debug!("audio disabled; dropping {cue:?}");
}

fn execute(commands: &[DrawCommand], cache: &AssetCache) {
    for command in commands {
        match command {
            DrawCommand::ClearBackground { color } => {
                macroquad::window::clear_background(to_macroquad_color(*color));
            }
            DrawCommand::Texture {
                slot,
                position,
                tint,
            } => {
                if let Some(texture) = cache.texture(*slot) {
                    draw_texture(texture, position.x, position.y, to_macroquad_color(*tint));
                }
            }
            DrawCommand::Rectangle {
                position,
                size,
                color,
            } => draw_rectangle(
                position.x,
                position.y,
                size.x,
                size.y,
                to_macroquad_color(*color),
            ),
            DrawCommand::Text {
                text,
                position,
                font_size,
                color,
            } => {
                let baseline = text_baseline(text, *position, *font_size);
                draw_text(
                    text,
                    baseline.x,
                    baseline.y,
                    *font_size,
                    to_macroquad_color(*color),
                );
            }
            DrawCommand::BeginWorld { camera } => set_camera(&to_macroquad_camera(camera)),
            DrawCommand::EndWorld => set_default_camera(),
            DrawCommand::Cube {
                center,
                size,
                color,
                texture,
            } => draw_cube(
                to_macroquad_vec3(*center),
                to_macroquad_vec3(*size),
                texture.and_then(|slot| cache.texture(slot)),
                to_macroquad_color(*color),
            ),
            DrawCommand::Sphere {
                center,
                radius,
                color,
            } => draw_sphere(
                to_macroquad_vec3(*center),
                *radius,
                None,
                to_macroquad_color(*color),
            ),
            DrawCommand::Model {
                model,
                texture,
                position,
                rotation_degrees,
                scale,
                tint,
            } => {
                let Some(obj) = cache.model(*model) else {
                    continue;
                };
                draw_mesh(&Mesh {
                    vertices: posed_vertices(obj, *position, *rotation_degrees, *scale, *tint),
                    indices: obj.indices().to_vec(),
                    texture: texture.and_then(|slot| cache.texture(slot)),
                });
            }
        }
    }
    set_default_camera();
}

fn posed_vertices(
    model: &ObjModel,
    position: Vec3,
    rotation_degrees: f32,
    scale: f32,
    tint: Color,
) -> Vec<Vertex> {
    let color = to_macroquad_color(tint);
    model
        .posed_positions(position, rotation_degrees, scale)
        .zip(model.uvs())
        .map(|(vertex, uv)| Vertex {
            position: to_macroquad_vec3(vertex),
            uv: MacroquadVec2::new(uv.x, uv.y),
            color,
        })
        .collect()
}

/// Draw commands place text by its top-left corner; macroquad draws from the baseline.
fn text_baseline(text: &str, top_left: Vec2, font_size: f32) -> Vec2 {
    let dimensions = measure_text(text, None, font_size_px(font_size), 1.0);
    Vec2::new(top_left.x, top_left.y + dimensions.offset_y)
}

fn to_macroquad_camera(camera: &Camera) -> Camera3D {
    Camera3D {
        position: to_macroquad_vec3(camera.position),
        target: to_macroquad_vec3(camera.target),
        up: to_macroquad_vec3(camera.up),
        fovy: camera.fovy_degrees.to_radians(),
        ..Camera3D::default()
    }
}

fn to_macroquad_vec3(vector: Vec3) -> MacroquadVec3 {
    MacroquadVec3::new(vector.x, vector.y, vector.z)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
