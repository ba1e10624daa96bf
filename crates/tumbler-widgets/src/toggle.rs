//! Toggle switch widget.

use crate::toggle_controller::{ToggleState, ToggleVisualController};
use crate::toggle_painter::{GeometrySnapshot, ToggleFrame, TogglePainter};
use crate::toggle_style::{ThumbMotion, ToggleStyle};
use std::any::Any;
use std::rc::Rc;
use tumbler_core::{
    AccessibleRole, Canvas, Color, Constraints, Event, GestureState, HapticFeedback,
    LayoutDirection, LayoutResult, MouseButton, MouseCursor, Point, Rect, Size, TextStyle, TypeId,
    Widget,
};

/// Opacity of a toggle without a change callback.
pub const DISABLED_OPACITY: f32 = 0.5;
/// Gap between the switch and its label.
pub const LABEL_SPACING: f32 = 8.0;
/// Approximate advance of one label character.
const LABEL_CHAR_WIDTH: f32 = 8.0;
const LABEL_FONT_SIZE: f32 = 14.0;

/// Message emitted when the user asks for a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleChanged {
    /// The requested state
    pub on: bool,
}

/// Animated on/off switch.
///
/// The value is owned by the caller: a gesture emits [`ToggleChanged`] (and
/// calls the `on_changed` callback), and the caller confirms it with
/// [`Toggle::set_value`]. Without a callback the toggle is disabled.
#[derive(Debug)]
pub struct Toggle {
    controller: ToggleVisualController,
    painter: TogglePainter,
    style: ToggleStyle,
    direction: LayoutDirection,
    focused: bool,
    pressed: bool,
    dragged: bool,
    label: Option<String>,
    label_color: Color,
    accessible_name_value: Option<String>,
    test_id_value: Option<String>,
    bounds: Rect,
}

impl Toggle {
    /// Create a disabled toggle showing `value`.
    #[must_use]
    pub fn new(value: bool) -> Self {
        let style = ToggleStyle::default();
        let mut controller =
            ToggleVisualController::new(value, style.geometry.track_inner_length());
        controller.set_platform(style.platform);
        Self {
            controller,
            painter: TogglePainter::new(),
            style,
            direction: LayoutDirection::Ltr,
            focused: false,
            pressed: false,
            dragged: false,
            label: None,
            label_color: Color::BLACK,
            accessible_name_value: None,
            test_id_value: None,
            bounds: Rect::default(),
        }
    }

    /// Enable the toggle, reporting requested values to `on_changed`.
    #[must_use]
    pub fn on_changed(mut self, on_changed: impl Fn(bool) + 'static) -> Self {
        self.controller.set_on_changed(Some(Rc::new(on_changed)));
        self
    }

    /// Set the style.
    #[must_use]
    pub fn style(mut self, style: ToggleStyle) -> Self {
        self.set_style(style);
        self
    }

    /// Set the reading direction.
    #[must_use]
    pub const fn direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the haptic output.
    #[must_use]
    pub fn haptics(mut self, haptics: Rc<dyn HapticFeedback>) -> Self {
        self.controller.set_haptics(haptics, self.style.platform);
        self
    }

    /// Set the label drawn after the switch.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the label color.
    #[must_use]
    pub const fn label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }

    /// Set the accessible name.
    #[must_use]
    pub fn accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Set the test ID.
    #[must_use]
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace the style, e.g. with a fresh snapshot for this frame.
    pub fn set_style(&mut self, style: ToggleStyle) {
        self.controller
            .set_track_inner_length(style.geometry.track_inner_length());
        self.controller.set_platform(style.platform);
        self.style = style;
    }

    /// Confirm the value, starting the settle animation if needed.
    pub fn set_value(&mut self, value: bool) {
        self.controller.set_value(value);
    }

    /// Advance animations by `dt` seconds. Returns whether another frame is
    /// needed.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.controller.tick(dt)
    }

    /// The confirmed value.
    #[must_use]
    pub const fn value(&self) -> bool {
        self.controller.value()
    }

    /// Whether the toggle reacts to input.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.controller.is_interactive()
    }

    /// Whether the focus ring is shown.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Current animated values.
    #[must_use]
    pub fn state(&self) -> ToggleState {
        self.controller.state()
    }

    /// The style in use.
    #[must_use]
    pub const fn get_style(&self) -> &ToggleStyle {
        &self.style
    }

    /// The label, if any.
    #[must_use]
    pub fn get_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The painter, for registering repaint listeners.
    #[must_use]
    pub const fn painter(&self) -> &TogglePainter {
        &self.painter
    }

    /// Geometry of the current frame.
    #[must_use]
    pub fn geometry(&self) -> GeometrySnapshot {
        TogglePainter::geometry(&self.frame())
    }

    /// Size of the switch alone, including room for the thumb to overhang
    /// the track. The press stretch stays inside the resting thumb's span.
    #[must_use]
    pub fn switch_size(&self) -> Size {
        let g = &self.style.geometry;
        let pressed = g.max_thumb_radius() * 2.0;
        let mut thumb = Size::new(pressed, pressed);
        if self.style.thumb_motion == ThumbMotion::Sequenced {
            thumb.width = thumb.width.max(g.transitional_thumb_size.width);
            thumb.height = thumb.height.max(g.transitional_thumb_size.height);
        }
        Size::new(
            g.track_inner_length() + thumb.width.max(g.track_height),
            thumb.height.max(g.track_height),
        )
    }

    fn switch_bounds(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.switch_size().width.min(self.bounds.width),
            self.bounds.height,
        )
    }

    fn frame(&self) -> ToggleFrame<'_> {
        ToggleFrame::new(self.controller.state(), &self.style, self.switch_bounds())
            .direction(self.direction)
            .focused(self.focused)
            .enabled(self.is_enabled())
    }

    fn handle_pan(&mut self, delta: Point, state: GestureState) -> Option<bool> {
        match state {
            GestureState::Started => {
                self.dragged = true;
                self.controller.on_drag_start();
                if delta.x != 0.0 {
                    self.controller.on_drag_update(delta.x, self.direction);
                }
                None
            }
            GestureState::Changed => {
                self.controller.on_drag_update(delta.x, self.direction);
                None
            }
            GestureState::Ended => self.controller.on_drag_end(),
            GestureState::Cancelled => {
                self.controller.on_drag_cancel();
                None
            }
        }
    }
}

impl Widget for Toggle {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let switch = self.switch_size();
        let label_width = self.label.as_ref().map_or(0.0, |label| {
            (label.chars().count() as f32).mul_add(LABEL_CHAR_WIDTH, LABEL_SPACING)
        });
        constraints.constrain(Size::new(switch.width + label_width, switch.height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&mut self, canvas: &mut dyn Canvas) {
        let enabled = self.is_enabled();
        if !enabled {
            canvas.push_opacity(DISABLED_OPACITY);
        }

        let switch = self.switch_bounds();
        let frame = ToggleFrame::new(self.controller.state(), &self.style, switch)
            .direction(self.direction)
            .focused(self.focused)
            .enabled(enabled);
        self.painter.paint(canvas, &frame);

        if let Some(label) = &self.label {
            canvas.draw_text(
                label,
                Point::new(
                    switch.right() + LABEL_SPACING,
                    switch.center().y - LABEL_FONT_SIZE / 2.0,
                ),
                &TextStyle {
                    size: LABEL_FONT_SIZE,
                    color: self.label_color,
                    ..TextStyle::default()
                },
            );
        }

        if !enabled {
            canvas.pop_opacity();
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if !self.is_enabled() {
            return None;
        }

        let requested = match event {
            Event::GesturePan { delta, state, .. } => self.handle_pan(*delta, *state),
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } if self.bounds.contains_point(position) => {
                self.pressed = true;
                self.dragged = false;
                self.controller.on_tap_down();
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } if self.pressed => {
                self.pressed = false;
                self.controller.on_tap_cancel();
                if !self.dragged && self.bounds.contains_point(position) {
                    self.controller.on_tap()
                } else {
                    None
                }
            }
            Event::KeyDown { key } if key.is_activation() => self.controller.on_tap(),
            Event::FocusIn => {
                self.focused = true;
                None
            }
            Event::FocusOut => {
                self.focused = false;
                None
            }
            _ => None,
        };

        requested.map(|on| Box::new(ToggleChanged { on }) as Box<dyn Any + Send>)
    }

    fn is_interactive(&self) -> bool {
        self.is_enabled()
    }

    fn is_focusable(&self) -> bool {
        self.is_enabled()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value
            .as_deref()
            .or(self.label.as_deref())
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Switch
    }

    fn accessible_toggled(&self) -> Option<bool> {
        Some(self.value())
    }

    fn mouse_cursor(&self) -> MouseCursor {
        if self.is_enabled() && self.style.platform.web {
            MouseCursor::Click
        } else {
            MouseCursor::Basic
        }
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
