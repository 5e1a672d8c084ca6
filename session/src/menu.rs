//! Main menu layout and hit testing.

use glam::Vec2;
use ray_arena_rendering::{AssetSlot, Color, DrawCommand, TextMetrics, Viewport};

use crate::config::{MenuAlignment, MenuBackground, MenuConfig};

/// Font size of the menu title.
pub const TITLE_FONT_SIZE: f32 = 40.0;
/// Font size of button labels.
pub const BUTTON_FONT_SIZE: f32 = 20.0;
/// Width and height of every menu button.
pub const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);
/// Gap between stacked buttons.
pub const BUTTON_SPACING: f32 = 20.0;
/// Distance kept from the window edge by left and right alignments.
pub const EDGE_MARGIN: f32 = 50.0;

/// Action bound to a menu button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Enter first-person play.
    Start,
    /// Options screen (not implemented).
    Options,
    /// Leave the preview.
    Exit,
}

impl MenuAction {
    /// Actions in button order, top to bottom.
    pub const ALL: [Self; 3] = [Self::Start, Self::Options, Self::Exit];
}

/// Screen-space rectangle of a menu button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonRect {
    /// Top-left corner.
    pub position: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ButtonRect {
    /// Reports whether `point` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.position + self.size;
        point.x >= self.position.x
            && point.x <= max.x
            && point.y >= self.position.y
            && point.y <= max.y
    }
}

/// Button rectangles for a given viewport and alignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuLayout {
    buttons: [ButtonRect; 3],
}

impl MenuLayout {
    /// Lays out the three buttons stacked around the vertical center.
    #[must_use]
    pub fn new(alignment: MenuAlignment, viewport: Viewport) -> Self {
        let x = match alignment {
            MenuAlignment::Left => EDGE_MARGIN,
            MenuAlignment::Middle => (viewport.width - BUTTON_SIZE.x) / 2.0,
            MenuAlignment::Right => viewport.width - BUTTON_SIZE.x - EDGE_MARGIN,
        };
        let step = BUTTON_SIZE.y + BUTTON_SPACING;
        let first = viewport.height / 2.0 - step;
        let buttons = [0.0, 1.0, 2.0].map(|index| ButtonRect {
            position: Vec2::new(x, first + step * index),
            size: BUTTON_SIZE,
        });
        Self { buttons }
    }

    /// Rectangle of the button bound to `action`.
    #[must_use]
    pub fn button(&self, action: MenuAction) -> ButtonRect {
        match action {
            MenuAction::Start => self.buttons[0],
            MenuAction::Options => self.buttons[1],
            MenuAction::Exit => self.buttons[2],
        }
    }

    /// Action of the button under `point`, if any.
    #[must_use]
    pub fn hit_test(&self, point: Vec2) -> Option<MenuAction> {
        MenuAction::ALL
            .into_iter()
            .find(|action| self.button(*action).contains(point))
    }
}

/// Top-left corner of the menu title.
#[must_use]
pub fn title_position(alignment: MenuAlignment, viewport: Viewport, title_width: f32) -> Vec2 {
    let x = match alignment {
        MenuAlignment::Left => EDGE_MARGIN,
        MenuAlignment::Middle => (viewport.width - title_width) / 2.0,
        MenuAlignment::Right => viewport.width - title_width - EDGE_MARGIN,
    };
    Vec2::new(x, viewport.height / 4.0)
}

/// Emits the menu background, title and buttons.
pub(crate) fn draw_menu(
    menu: &MenuConfig,
    viewport: Viewport,
    background_loaded: bool,
    text: &dyn TextMetrics,
    out: &mut Vec<DrawCommand>,
) {
    match menu.background {
        MenuBackground::Color(color) => out.push(DrawCommand::ClearBackground { color }),
        MenuBackground::Image => {
            out.push(DrawCommand::ClearBackground {
                color: Color::RAY_WHITE,
            });
            if background_loaded {
                out.push(DrawCommand::Texture {
                    slot: AssetSlot::MenuBackground,
                    position: Vec2::ZERO,
                    tint: Color::WHITE,
                });
            }
        }
    }

    let title = menu.title();
    let title_width = text.text_width(title, TITLE_FONT_SIZE);
    out.push(DrawCommand::Text {
        text: title.to_owned(),
        position: title_position(menu.alignment, viewport, title_width),
        font_size: TITLE_FONT_SIZE,
        color: menu.title_color,
    });

    let layout = MenuLayout::new(menu.alignment, viewport);
    for (index, action) in MenuAction::ALL.into_iter().enumerate() {
        let rect = layout.button(action);
        out.push(DrawCommand::Rectangle {
            position: rect.position,
            size: rect.size,
            color: Color::LIGHT_GRAY,
        });

        let label = menu.label(index);
        let label_width = text.text_width(label, BUTTON_FONT_SIZE);
        out.push(DrawCommand::Text {
            text: label.to_owned(),
            position: rect.position
                + Vec2::new(
                    (rect.size.x - label_width) / 2.0,
                    (rect.size.y - BUTTON_FONT_SIZE) / 2.0,
                ),
            font_size: BUTTON_FONT_SIZE,
            color: menu.button_colors[index],
        });
    }
}
