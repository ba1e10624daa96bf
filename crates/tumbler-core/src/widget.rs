//! Widget trait and the canvas it paints to.
//!
//! Widgets follow a measure-layout-paint cycle driven by the host:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Accept the bounds the host allocated
//! 3. **Paint**: Emit draw operations onto a [`Canvas`]
//!
//! Input arrives through [`Widget::event`]; a widget that reacts returns a
//! typed message for the host to route.
//!
//! # Examples
//!
//! ```
//! use tumbler_core::TypeId;
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//! ```

use crate::constraints::Constraints;
use crate::draw::{BoxStyle, ImageId};
use crate::event::{Event, MouseCursor};
use crate::geometry::{CornerRadius, Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type identifier for widget types (used for diffing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Accept allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Emit draw operations for the current frame.
    fn paint(&mut self, canvas: &mut dyn Canvas);

    /// Handle input events.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Toggled state reported to assistive technology, if the widget has one.
    fn accessible_toggled(&self) -> Option<bool> {
        None
    }

    /// Cursor to show while the pointer hovers the widget.
    fn mouse_cursor(&self) -> MouseCursor {
        MouseCursor::Basic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend. Clip and
/// opacity are scoped: every `push_*` must be matched by its `pop_*`.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a filled rounded rectangle.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: CornerRadius, color: Color);

    /// Draw a stroked rounded rectangle.
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: CornerRadius, color: Color, width: f32);

    /// Draw a rectangle with full box styling (fill, stroke, shadows).
    fn draw_box(&mut self, rect: Rect, radius: CornerRadius, style: &BoxStyle);

    /// Draw text with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a decoded image into `rect`, clipped to `radius`.
    fn draw_image(&mut self, image: ImageId, rect: Rect, radius: CornerRadius);

    /// Push a (rounded) clip region.
    fn push_clip(&mut self, rect: Rect, radius: CornerRadius);

    /// Pop the clip region.
    fn pop_clip(&mut self);

    /// Push an opacity layer.
    fn push_opacity(&mut self, alpha: f32);

    /// Pop the opacity layer.
    fn pop_opacity(&mut self);
}

/// Text style for rendering.
///
/// # Examples
///
/// ```
/// use tumbler_core::{Color, FontWeight, TextStyle};
///
/// let default_style = TextStyle::default();
/// assert_eq!(default_style.size, 16.0);
/// assert_eq!(default_style.weight, FontWeight::Normal);
///
/// let label = TextStyle {
///     size: 12.0,
///     color: Color::from_hex("#1a1a1a").expect("valid hex"),
///     weight: FontWeight::Medium,
///     family: None,
/// };
/// assert_eq!(label.size, 12.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
    /// Font family, `None` for the host default
    pub family: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
            family: None,
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Light (300)
    Light,
    /// Normal (400)
    #[default]
    Normal,
    /// Medium (500)
    Medium,
    /// Bold (700)
    Bold,
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Push button
    Button,
    /// Checkbox
    Checkbox,
    /// On/off switch
    Switch,
    /// Image
    Image,
}
