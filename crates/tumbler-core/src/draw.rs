//! Draw commands recorded by [`crate::RecordingCanvas`].
//!
//! All painting reduces to these primitives.

use crate::{Color, CornerRadius, Point, Rect};
use serde::{Deserialize, Serialize};

/// Identity of a decoded image held by the host's image cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u64);

/// Stroke style for outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Box style for rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color (None = no fill)
    pub fill: Option<Color>,
    /// Stroke style (None = no stroke)
    pub stroke: Option<StrokeStyle>,
    /// Shadows, painted in order beneath the box
    pub shadows: Vec<Shadow>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: None,
            shadows: Vec::new(),
        }
    }
}

impl BoxStyle {
    /// Create a box with only fill color.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            shadows: Vec::new(),
        }
    }

    /// Create a box with only stroke.
    #[must_use]
    pub const fn stroke(style: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(style),
            shadows: Vec::new(),
        }
    }

    /// Add a shadow to the box.
    #[must_use]
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadows.push(shadow);
        self
    }
}

/// Shadow configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Shadow color
    pub color: Color,
    /// Horizontal offset
    pub offset_x: f32,
    /// Vertical offset
    pub offset_y: f32,
    /// Blur radius
    pub blur: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::rgba(0.0, 0.0, 0.0, 0.3),
            offset_x: 0.0,
            offset_y: 2.0,
            blur: 4.0,
        }
    }
}

/// Drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw a (possibly rounded) rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Corner radius
        radius: CornerRadius,
        /// Box style
        style: BoxStyle,
    },

    /// Draw text
    Text {
        /// Text content
        content: String,
        /// Position of the text's top-left corner
        position: Point,
        /// Text style
        style: crate::widget::TextStyle,
    },

    /// Draw a decoded image
    Image {
        /// Image in the host cache
        image: ImageId,
        /// Destination bounds
        bounds: Rect,
        /// Corner radius the image is clipped to
        radius: CornerRadius,
    },

    /// Clip to bounds
    Clip {
        /// Clip bounds
        bounds: Rect,
        /// Corner radius of the clip shape
        radius: CornerRadius,
        /// Child command
        child: Box<DrawCommand>,
    },

    /// Apply opacity
    Opacity {
        /// Alpha value (0.0 - 1.0)
        alpha: f32,
        /// Child command
        child: Box<DrawCommand>,
    },
}

impl DrawCommand {
    /// Create a filled rectangle.
    #[must_use]
    pub const fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius: CornerRadius::ZERO,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a rounded rectangle.
    #[must_use]
    pub const fn rounded_rect(bounds: Rect, radius: CornerRadius, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a stroked rounded rectangle.
    #[must_use]
    pub const fn stroked_rect(bounds: Rect, radius: CornerRadius, stroke: StrokeStyle) -> Self {
        Self::Rect {
            bounds,
            radius,
            style: BoxStyle::stroke(stroke),
        }
    }

    /// Wrap with opacity.
    #[must_use]
    pub fn with_opacity(self, alpha: f32) -> Self {
        Self::Opacity {
            alpha,
            child: Box::new(self),
        }
    }

    /// Wrap with clip bounds.
    #[must_use]
    pub fn with_clip(self, bounds: Rect, radius: CornerRadius) -> Self {
        Self::Clip {
            bounds,
            radius,
            child: Box::new(self),
        }
    }

    /// The innermost command, with any clip/opacity wrappers peeled off.
    #[must_use]
    pub fn innermost(&self) -> &Self {
        match self {
            Self::Clip { child, .. } | Self::Opacity { child, .. } => child.innermost(),
            other => other,
        }
    }

    /// Product of every opacity wrapper around this command.
    #[must_use]
    pub fn effective_opacity(&self) -> f32 {
        match self {
            Self::Opacity { alpha, child } => alpha * child.effective_opacity(),
            Self::Clip { child, .. } => child.effective_opacity(),
            _ => 1.0,
        }
    }

    /// Whether any clip wrapper surrounds this command.
    #[must_use]
    pub fn is_clipped(&self) -> bool {
        match self {
            Self::Clip { .. } => true,
            Self::Opacity { child, .. } => child.is_clipped(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // BoxStyle Tests
    // =========================================================================

    #[test]
    fn test_box_style_fill() {
        let style = BoxStyle::fill(Color::RED);
        assert_eq!(style.fill, Some(Color::RED));
        assert!(style.stroke.is_none());
        assert!(style.shadows.is_empty());
    }

    #[test]
    fn test_box_style_with_shadows_keeps_order() {
        let a = Shadow {
            blur: 8.0,
            ..Shadow::default()
        };
        let b = Shadow {
            blur: 1.0,
            ..Shadow::default()
        };
        let style = BoxStyle::fill(Color::WHITE).with_shadow(a).with_shadow(b);
        assert_eq!(style.shadows, vec![a, b]);
    }

    // =========================================================================
    // DrawCommand Wrapper Tests
    // =========================================================================

    #[test]
    fn test_innermost_peels_wrappers() {
        let base = DrawCommand::filled_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::BLUE);
        let wrapped = base
            .clone()
            .with_clip(Rect::new(0.0, 0.0, 2.0, 2.0), CornerRadius::ZERO)
            .with_opacity(0.5);
        assert_eq!(wrapped.innermost(), &base);
        assert!(wrapped.is_clipped());
        assert!(!base.is_clipped());
    }

    #[test]
    fn test_effective_opacity_multiplies() {
        let cmd = DrawCommand::filled_rect(Rect::default(), Color::RED)
            .with_opacity(0.5)
            .with_opacity(0.5);
        assert!((cmd.effective_opacity() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_draw_command_serializes() {
        let cmd = DrawCommand::Image {
            image: ImageId(7),
            bounds: Rect::new(1.0, 2.0, 3.0, 4.0),
            radius: CornerRadius::uniform(1.5),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: DrawCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
